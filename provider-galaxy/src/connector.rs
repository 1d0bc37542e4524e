//! Galaxy API connector implementation
//!
//! Implements `DataLibrary` and `WorkflowRunner` on top of the Galaxy REST API.

use async_trait::async_trait;
use bridge_traits::error::Result;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use bridge_traits::library::{
    DataLibrary, InvocationRequest, LibraryDataset, LibraryFolder, LibraryItem, LibraryItemKind,
    LinkRequest, WorkflowInvocation, WorkflowRunner,
};
use core_runtime::config::{LinkerConfig, DEFAULT_REQUEST_TIMEOUT};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::GalaxyError;
use crate::types::{
    CreateFolderPayload, CreatedEntry, ErrorResponse, FolderContentsResponse, InvocationPayload,
    InvocationResponse, LibraryContent, LibraryDetails, LinkFilesPayload,
};

/// Page size for folder listings
const FOLDER_PAGE_SIZE: u64 = 100;

/// Galaxy API connector
///
/// Scoped to a single data library. Every call is sent once; failures are
/// reported to the caller without retrying.
///
/// # Example
///
/// ```ignore
/// use provider_galaxy::GalaxyConnector;
/// use bridge_traits::DataLibrary;
///
/// let connector = GalaxyConnector::new(http_client, "https://galaxy.example.org", api_key, library_id);
/// let folders = connector.list_folders().await?;
/// ```
pub struct GalaxyConnector {
    /// HTTP client for API requests
    http_client: Arc<dyn HttpClient>,

    /// Server URL without trailing slash
    base_url: String,

    /// Galaxy API key
    api_key: String,

    /// Library every library call is scoped to
    library_id: String,

    /// Timeout for each request
    request_timeout: Duration,
}

impl GalaxyConnector {
    /// Create a new Galaxy connector
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client implementation
    /// * `base_url` - Galaxy server URL, e.g. `https://usegalaxy.example.org`
    /// * `api_key` - API key of a user allowed to add library datasets by path
    /// * `library_id` - Encoded id of the target library
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        library_id: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            library_id: library_id.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Build a connector from a validated linker configuration
    pub fn from_config(config: &LinkerConfig) -> Self {
        Self::new(
            Arc::clone(&config.http_client),
            config.base_url(),
            config.api_key.clone(),
            config.library_id.clone(),
        )
        .with_timeout(config.request_timeout)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    fn request(&self, method: HttpMethod, url: String) -> HttpRequest {
        HttpRequest::new(method, url)
            .api_key(self.api_key.clone())
            .header("Accept", "application/json")
            .timeout(self.request_timeout)
    }

    /// Send a request and turn non-2xx statuses into errors
    #[instrument(skip(self, request), fields(url = %request.url))]
    async fn send(&self, request: HttpRequest) -> std::result::Result<HttpResponse, GalaxyError> {
        let response = self.http_client.execute(request).await?;

        if response.is_success() {
            debug!(status = response.status, "API request succeeded");
            return Ok(response);
        }

        let message = match response.json::<ErrorResponse>() {
            Ok(body) => body.err_msg,
            Err(_) => String::from_utf8_lossy(&response.body).to_string(),
        };
        warn!(status = response.status, %message, "API request failed");

        Err(GalaxyError::from_status(response.status, message))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        url: String,
        what: &str,
    ) -> std::result::Result<T, GalaxyError> {
        let response = self.send(self.request(HttpMethod::Get, url)).await?;
        Self::parse(&response, what)
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        url: String,
        body: &B,
        what: &str,
    ) -> std::result::Result<T, GalaxyError> {
        let request = self.request(HttpMethod::Post, url).json(body)?;
        let response = self.send(request).await?;
        Self::parse(&response, what)
    }

    fn parse<T: DeserializeOwned>(
        response: &HttpResponse,
        what: &str,
    ) -> std::result::Result<T, GalaxyError> {
        serde_json::from_slice(&response.body)
            .map_err(|e| GalaxyError::ParseError(format!("Failed to parse {}: {}", what, e)))
    }

    async fn library_contents(&self) -> std::result::Result<Vec<LibraryContent>, GalaxyError> {
        let url = self.api_url(&format!("libraries/{}/contents", self.library_id));
        self.get(url, "library contents").await
    }

    fn to_folder(content: LibraryContent) -> LibraryFolder {
        LibraryFolder {
            id: content.id,
            name: content.name,
            parent_id: None,
        }
    }

    fn first_created(
        entries: Vec<CreatedEntry>,
        what: &str,
    ) -> std::result::Result<CreatedEntry, GalaxyError> {
        entries
            .into_iter()
            .next()
            .ok_or_else(|| GalaxyError::EmptyResponse(what.to_string()))
    }
}

#[async_trait]
impl DataLibrary for GalaxyConnector {
    #[instrument(skip(self), fields(library_id = %self.library_id))]
    async fn root_folder_id(&self) -> Result<String> {
        let url = self.api_url(&format!("libraries/{}", self.library_id));
        let details: LibraryDetails = self.get(url, "library details").await?;
        info!(library = %details.name, root_folder_id = %details.root_folder_id, "Resolved library root folder");

        Ok(details.root_folder_id)
    }

    #[instrument(skip(self), fields(library_id = %self.library_id))]
    async fn list_folders(&self) -> Result<Vec<LibraryFolder>> {
        let folders: Vec<LibraryFolder> = self
            .library_contents()
            .await?
            .into_iter()
            .filter(LibraryContent::is_folder)
            .map(Self::to_folder)
            .collect();

        info!("Listed {} library folders", folders.len());
        Ok(folders)
    }

    #[instrument(skip(self), fields(library_id = %self.library_id))]
    async fn find_folders(&self, path: &str) -> Result<Vec<LibraryFolder>> {
        let folders: Vec<LibraryFolder> = self
            .library_contents()
            .await?
            .into_iter()
            .filter(|c| c.is_folder() && c.name == path)
            .map(Self::to_folder)
            .collect();

        debug!(matches = folders.len(), "Looked up folder by name");
        Ok(folders)
    }

    #[instrument(skip(self))]
    async fn folder_contents(&self, folder_id: &str) -> Result<Vec<LibraryItem>> {
        let mut items = Vec::new();
        let mut offset = 0u64;

        loop {
            let url = self.api_url(&format!(
                "folders/{}/contents?limit={}&offset={}",
                folder_id, FOLDER_PAGE_SIZE, offset
            ));
            let page: FolderContentsResponse = self.get(url, "folder contents").await?;
            let received = page.folder_contents.len() as u64;

            items.extend(page.folder_contents.into_iter().map(|item| LibraryItem {
                kind: if item.content_type == "folder" {
                    LibraryItemKind::Folder
                } else {
                    LibraryItemKind::File
                },
                id: item.id,
                name: item.name,
            }));

            offset += received;
            match page.metadata.total_rows {
                Some(total) if received > 0 && offset < total => continue,
                _ => break,
            }
        }

        debug!(count = items.len(), "Listed folder contents");
        Ok(items)
    }

    #[instrument(skip(self), fields(library_id = %self.library_id))]
    async fn create_folder(&self, parent_id: &str, name: &str) -> Result<LibraryFolder> {
        let url = self.api_url(&format!("libraries/{}/contents", self.library_id));
        let created: Vec<CreatedEntry> = self
            .post(url, &CreateFolderPayload::new(parent_id, name), "created folder")
            .await?;
        let folder = Self::first_created(created, "folder creation")?;

        info!(folder_id = %folder.id, "Created library folder {}", name);
        Ok(LibraryFolder {
            id: folder.id,
            name: folder.name,
            parent_id: Some(parent_id.to_string()),
        })
    }

    #[instrument(skip(self, request), fields(library_id = %self.library_id, path = %request.filesystem_path))]
    async fn link_file(&self, request: LinkRequest) -> Result<LibraryDataset> {
        let url = self.api_url(&format!("libraries/{}/contents", self.library_id));
        let payload = LinkFilesPayload::new(
            &request.folder_id,
            &request.filesystem_path,
            &request.file_type,
        );
        let created: Vec<CreatedEntry> = self.post(url, &payload, "linked dataset").await?;
        let dataset = Self::first_created(created, "dataset link")?;

        info!(dataset_id = %dataset.id, file_type = %request.file_type, "Linked dataset {}", dataset.name);
        Ok(LibraryDataset {
            id: dataset.id,
            name: dataset.name,
            folder_id: request.folder_id,
        })
    }
}

#[async_trait]
impl WorkflowRunner for GalaxyConnector {
    #[instrument(skip(self, request), fields(workflow_id = %request.workflow_id))]
    async fn invoke(&self, request: InvocationRequest) -> Result<WorkflowInvocation> {
        let url = self.api_url(&format!("workflows/{}/invocations", request.workflow_id));
        let payload = InvocationPayload {
            workflow_id: &request.workflow_id,
            inputs: &request.inputs,
            parameters: &request.parameters,
            history: format!("hist_name={}", request.history_name),
        };
        let invocation: InvocationResponse = self.post(url, &payload, "invocation").await?;

        info!(invocation_id = %invocation.id, history = %request.history_name, "Invoked workflow");
        Ok(WorkflowInvocation {
            id: invocation.id,
            workflow_id: invocation.workflow_id,
            history_id: invocation.history_id,
            state: invocation.state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::BridgeError;
    use bridge_traits::library::{InputSource, WorkflowInput};
    use bytes::Bytes;
    use mockall::mock;
    use std::collections::{BTreeMap, HashMap};

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
        }
    }

    fn ok(body: &str) -> Result<HttpResponse> {
        Ok(HttpResponse {
            status: 200,
            headers: HashMap::new(),
            body: Bytes::from(body.to_string()),
        })
    }

    fn connector(mock_http: MockHttpClient) -> GalaxyConnector {
        GalaxyConnector::new(Arc::new(mock_http), "https://galaxy.test/", "key", "lib1")
    }

    const LIBRARY_CONTENTS: &str = r#"[
        {"id": "Froot", "name": "/", "type": "folder"},
        {"id": "Fa", "name": "/A", "type": "folder"},
        {"id": "Fb", "name": "/A/RAW", "type": "folder"},
        {"id": "d1", "name": "/A/RAW/x.raw", "type": "file"}
    ]"#;

    #[tokio::test]
    async fn test_list_folders_filters_files() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|req| {
            assert_eq!(req.method, HttpMethod::Get);
            assert_eq!(req.url, "https://galaxy.test/api/libraries/lib1/contents");
            assert_eq!(req.headers.get("x-api-key"), Some(&"key".to_string()));
            ok(LIBRARY_CONTENTS)
        });

        let folders = connector(mock_http).list_folders().await.unwrap();

        assert_eq!(folders.len(), 3);
        assert_eq!(folders[2].name, "/A/RAW");
    }

    #[tokio::test]
    async fn test_find_folders_matches_exact_name() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(2)
            .returning(|_| ok(LIBRARY_CONTENTS));
        let connector = connector(mock_http);

        let found = connector.find_folders("/A").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "Fa");

        assert!(connector.find_folders("/A/RAW/x.raw").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_root_folder_id_from_library() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|req| {
            assert!(req.url.ends_with("/api/libraries/lib1"));
            ok(r#"{"id": "lib1", "name": "rcx-da", "root_folder_id": "F2f94e8ae9edff68a"}"#)
        });

        let root = connector(mock_http).root_folder_id().await.unwrap();
        assert_eq!(root, "F2f94e8ae9edff68a");
    }

    #[tokio::test]
    async fn test_folder_contents_paginates() {
        let mut mock_http = MockHttpClient::new();
        let mut seq = mockall::Sequence::new();
        mock_http
            .expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|req| {
                assert!(req.url.contains("offset=0"));
                let items: Vec<String> = (0..100)
                    .map(|i| format!(r#"{{"id": "d{i}", "name": "f{i}.raw", "type": "file"}}"#))
                    .collect();
                ok(&format!(
                    r#"{{"metadata": {{"total_rows": 101}}, "folder_contents": [{}]}}"#,
                    items.join(",")
                ))
            });
        mock_http
            .expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|req| {
                assert!(req.url.contains("offset=100"));
                ok(r#"{"metadata": {"total_rows": 101}, "folder_contents": [
                    {"id": "sub", "name": "nested", "type": "folder"}
                ]}"#)
            });

        let items = connector(mock_http).folder_contents("Fb").await.unwrap();

        assert_eq!(items.len(), 101);
        assert_eq!(items[0].kind, LibraryItemKind::File);
        assert_eq!(items[100].kind, LibraryItemKind::Folder);
    }

    #[tokio::test]
    async fn test_folder_contents_single_page_without_total() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|_| {
            ok(r#"{"metadata": {}, "folder_contents": [{"id": "d1", "name": "x.raw", "type": "file"}]}"#)
        });

        let items = connector(mock_http).folder_contents("Fb").await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "x.raw");
    }

    #[tokio::test]
    async fn test_create_folder_posts_payload() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|req| {
            assert_eq!(req.method, HttpMethod::Post);
            let body: serde_json::Value = serde_json::from_slice(req.body.as_ref().unwrap()).unwrap();
            assert_eq!(body["create_type"], "folder");
            assert_eq!(body["folder_id"], "Froot");
            assert_eq!(body["name"], "A");
            ok(r#"[{"id": "Fnew", "name": "A", "url": "/api/folders/Fnew"}]"#)
        });

        let folder = connector(mock_http).create_folder("Froot", "A").await.unwrap();

        assert_eq!(folder.id, "Fnew");
        assert_eq!(folder.parent_id, Some("Froot".to_string()));
    }

    #[tokio::test]
    async fn test_link_file_returns_first_dataset() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|req| {
            let body: serde_json::Value = serde_json::from_slice(req.body.as_ref().unwrap()).unwrap();
            assert_eq!(body["link_data_only"], "link_to_files");
            assert_eq!(body["file_type"], "thermo.raw");
            ok(r#"[{"id": "ld1", "name": "x.raw", "url": "/api/libraries/lib1/contents/ld1"}]"#)
        });

        let dataset = connector(mock_http)
            .link_file(LinkRequest {
                folder_id: "Fb".to_string(),
                filesystem_path: "/mnt/export/A/RAW/x.raw".to_string(),
                file_type: "thermo.raw".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(dataset.id, "ld1");
        assert_eq!(dataset.folder_id, "Fb");
    }

    #[tokio::test]
    async fn test_link_file_empty_response_is_error() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|_| ok("[]"));

        let result = connector(mock_http)
            .link_file(LinkRequest {
                folder_id: "Fb".to_string(),
                filesystem_path: "/x.raw".to_string(),
                file_type: "thermo.raw".to_string(),
            })
            .await;

        assert!(matches!(result, Err(BridgeError::OperationFailed(msg)) if msg.contains("Empty response")));
    }

    #[tokio::test]
    async fn test_invoke_workflow() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|req| {
            assert_eq!(req.url, "https://galaxy.test/api/workflows/wf1/invocations");
            let body: serde_json::Value = serde_json::from_slice(req.body.as_ref().unwrap()).unwrap();
            assert_eq!(body["inputs"]["0"]["id"], "ld1");
            assert_eq!(body["history"], "hist_name=conversion of x.raw");
            ok(r#"{"id": "inv1", "workflow_id": "wf1", "history_id": "h1", "state": "new"}"#)
        });

        let mut inputs = BTreeMap::new();
        inputs.insert(
            "0".to_string(),
            WorkflowInput {
                id: "ld1".to_string(),
                src: InputSource::LibraryDataset,
            },
        );

        let invocation = connector(mock_http)
            .invoke(InvocationRequest {
                workflow_id: "wf1".to_string(),
                inputs,
                parameters: BTreeMap::new(),
                history_name: "conversion of x.raw".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(invocation.id, "inv1");
        assert_eq!(invocation.history_id, Some("h1".to_string()));
    }

    #[tokio::test]
    async fn test_api_error_uses_galaxy_message() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|_| {
            Ok(HttpResponse {
                status: 400,
                headers: HashMap::new(),
                body: Bytes::from(r#"{"err_msg": "Invalid folder id", "err_code": 400008}"#),
            })
        });

        let result = connector(mock_http).create_folder("bogus", "A").await;

        match result {
            Err(BridgeError::OperationFailed(msg)) => assert!(msg.contains("Invalid folder id")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_auth_error_is_not_retried() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|_| {
            Ok(HttpResponse {
                status: 403,
                headers: HashMap::new(),
                body: Bytes::from_static(b"Forbidden"),
            })
        });

        let result = connector(mock_http).list_folders().await;

        assert!(matches!(result, Err(BridgeError::OperationFailed(msg)) if msg.contains("Authentication failed")));
    }
}
