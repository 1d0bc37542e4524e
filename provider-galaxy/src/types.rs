//! Galaxy API request and response types
//!
//! Data structures for the library, folder and workflow endpoints.

use bridge_traits::WorkflowInput;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `GET /api/libraries/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct LibraryDetails {
    pub id: String,
    pub name: String,
    pub root_folder_id: String,
}

/// One entry of `GET /api/libraries/{id}/contents`
///
/// Folder names are full paths starting with `/`; file names are full paths
/// as well.
#[derive(Debug, Clone, Deserialize)]
pub struct LibraryContent {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub content_type: String,
}

impl LibraryContent {
    pub fn is_folder(&self) -> bool {
        self.content_type == "folder"
    }
}

/// `GET /api/folders/{id}/contents`
#[derive(Debug, Deserialize)]
pub struct FolderContentsResponse {
    #[serde(default)]
    pub metadata: FolderMetadata,
    pub folder_contents: Vec<FolderContentItem>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FolderMetadata {
    /// Total entries in the folder; absent on older servers that do not paginate
    #[serde(default)]
    pub total_rows: Option<u64>,
    #[serde(default)]
    pub parent_library_id: Option<String>,
}

/// One entry of a folder listing; `name` is the bare entry name
#[derive(Debug, Clone, Deserialize)]
pub struct FolderContentItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub content_type: String,
}

/// Element of the list returned by `POST /api/libraries/{id}/contents`
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Error body returned by Galaxy on failures
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub err_msg: String,
    #[serde(default)]
    pub err_code: Option<u64>,
}

/// `create_type=folder` payload
#[derive(Debug, Serialize)]
pub struct CreateFolderPayload<'a> {
    pub create_type: &'static str,
    pub folder_id: &'a str,
    pub name: &'a str,
}

impl<'a> CreateFolderPayload<'a> {
    pub fn new(parent_id: &'a str, name: &'a str) -> Self {
        Self {
            create_type: "folder",
            folder_id: parent_id,
            name,
        }
    }
}

/// `create_type=file` payload registering server-side paths by reference
#[derive(Debug, Serialize)]
pub struct LinkFilesPayload<'a> {
    pub create_type: &'static str,
    pub upload_option: &'static str,
    pub link_data_only: &'static str,
    pub folder_id: &'a str,
    pub filesystem_paths: &'a str,
    pub file_type: &'a str,
    pub dbkey: &'static str,
}

impl<'a> LinkFilesPayload<'a> {
    pub fn new(folder_id: &'a str, filesystem_paths: &'a str, file_type: &'a str) -> Self {
        Self {
            create_type: "file",
            upload_option: "upload_paths",
            link_data_only: "link_to_files",
            folder_id,
            filesystem_paths,
            file_type,
            dbkey: "?",
        }
    }
}

/// `POST /api/workflows/{id}/invocations` payload
#[derive(Debug, Serialize)]
pub struct InvocationPayload<'a> {
    pub workflow_id: &'a str,
    pub inputs: &'a BTreeMap<String, WorkflowInput>,
    pub parameters: &'a BTreeMap<String, BTreeMap<String, String>>,
    /// `hist_name=<name>` asks Galaxy for a fresh history
    pub history: String,
}

/// Invocation summary returned by Galaxy
#[derive(Debug, Clone, Deserialize)]
pub struct InvocationResponse {
    pub id: String,
    pub workflow_id: String,
    #[serde(default)]
    pub history_id: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}
