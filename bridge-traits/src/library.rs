//! Remote Data Library Contracts
//!
//! Abstractions over the remote content-management service that holds the
//! library entries and runs conversion workflows. The Galaxy connector in
//! `provider-galaxy` implements both traits; tests substitute recording fakes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;

/// A folder inside a data library.
///
/// `name` is the full slash-prefixed path of the folder inside the library
/// (e.g. `/H2020/2020/RAW_profile`), matching how the library lists folders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryFolder {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

/// Kind of an entry listed inside a library folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryItemKind {
    File,
    Folder,
}

/// An entry listed inside a library folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryItem {
    pub id: String,
    /// Bare entry name, without the folder path
    pub name: String,
    pub kind: LibraryItemKind,
}

/// A dataset registered in the library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryDataset {
    pub id: String,
    pub name: String,
    pub folder_id: String,
}

/// Request to register a file that already lives on the server's filesystem.
///
/// The file is linked, never copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRequest {
    pub folder_id: String,
    /// Absolute path as seen by the server
    pub filesystem_path: String,
    /// Declared datatype, e.g. `thermo.raw` or `mzml`
    pub file_type: String,
}

/// Source of a workflow input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputSource {
    /// Library dataset
    #[serde(rename = "ld")]
    LibraryDataset,
}

/// A dataset bound to a workflow input step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowInput {
    pub id: String,
    pub src: InputSource,
}

/// Request to start a named workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    pub workflow_id: String,
    /// Inputs keyed by step index
    pub inputs: BTreeMap<String, WorkflowInput>,
    /// Tool parameters keyed by step index, then parameter name
    pub parameters: BTreeMap<String, BTreeMap<String, String>>,
    /// Name of the history created for this run
    pub history_name: String,
}

/// A submitted workflow run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowInvocation {
    pub id: String,
    pub workflow_id: String,
    #[serde(default)]
    pub history_id: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

/// Data library operations scoped to a single library
#[async_trait]
pub trait DataLibrary: Send + Sync {
    /// Id of the library's root folder
    async fn root_folder_id(&self) -> Result<String>;

    /// Every folder in the library
    async fn list_folders(&self) -> Result<Vec<LibraryFolder>>;

    /// Folders whose full name equals `path` exactly
    ///
    /// More than one result means the library holds duplicate folders.
    async fn find_folders(&self, path: &str) -> Result<Vec<LibraryFolder>>;

    /// Entries directly inside a folder
    async fn folder_contents(&self, folder_id: &str) -> Result<Vec<LibraryItem>>;

    /// Create a folder named `name` under `parent_id`
    ///
    /// The service may report the new folder by its bare name rather than
    /// its full path.
    async fn create_folder(&self, parent_id: &str, name: &str) -> Result<LibraryFolder>;

    /// Register a server-side file by reference
    async fn link_file(&self, request: LinkRequest) -> Result<LibraryDataset>;
}

/// Workflow execution on the remote service
#[async_trait]
pub trait WorkflowRunner: Send + Sync {
    /// Submit a workflow run and return without waiting for it
    async fn invoke(&self, request: InvocationRequest) -> Result<WorkflowInvocation>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_input_serializes_library_source() {
        let input = WorkflowInput {
            id: "abc".to_string(),
            src: InputSource::LibraryDataset,
        };

        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json, serde_json::json!({ "id": "abc", "src": "ld" }));
    }

    #[test]
    fn test_item_kind_deserializes_lowercase() {
        let kind: LibraryItemKind = serde_json::from_str("\"folder\"").unwrap();
        assert_eq!(kind, LibraryItemKind::Folder);
    }
}
