//! # Linker Configuration Module
//!
//! Connection settings and bridge dependencies for a linker run.
//!
//! ## Overview
//!
//! The configuration uses a builder to construct a `LinkerConfig` holding the
//! remote service coordinates and the bridges the run depends on. The builder
//! validates everything up front so a run never starts half-configured.
//!
//! ## Required Settings
//!
//! - Galaxy base URL
//! - API key
//! - Library id
//! - Path to the raw file list
//!
//! ## Optional Dependencies (with platform defaults)
//!
//! - `HttpClient` - HTTP operations (desktop default: reqwest)
//! - `FileSystemAccess` - File reads and existence checks (desktop default: tokio fs)
//!
//! When the `desktop-shims` feature is enabled the desktop implementations are
//! injected automatically if not provided.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::LinkerConfig;
//!
//! let config = LinkerConfig::builder()
//!     .galaxy_url("https://galaxy.example.org")
//!     .api_key("0123456789abcdef")
//!     .library_id("0a248a1f62a0cc04")
//!     .raw_list_path("/data/raw_list.txt")
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use crate::logging::redact_if_sensitive;
use bridge_traits::{FileSystemAccess, HttpClient};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Default timeout for a single remote call
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for one linker run.
///
/// Use [`LinkerConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct LinkerConfig {
    /// Base URL of the Galaxy server, without the `/api` suffix
    pub galaxy_url: String,

    /// Galaxy API key
    pub api_key: String,

    /// Id of the target data library
    pub library_id: String,

    /// Text file listing one raw file path per line
    pub raw_list_path: PathBuf,

    /// Timeout applied to every remote call
    pub request_timeout: Duration,

    /// HTTP client used by the remote connector
    pub http_client: Arc<dyn HttpClient>,

    /// Local file system access
    pub file_system: Arc<dyn FileSystemAccess>,
}

impl std::fmt::Debug for LinkerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkerConfig")
            .field("galaxy_url", &self.galaxy_url)
            .field("api_key", &redact_if_sensitive("api_key", &self.api_key))
            .field("library_id", &self.library_id)
            .field("raw_list_path", &self.raw_list_path)
            .field("request_timeout", &self.request_timeout)
            .field("http_client", &"HttpClient { ... }")
            .field("file_system", &"FileSystemAccess { ... }")
            .finish()
    }
}

impl LinkerConfig {
    /// Creates a new builder for constructing a `LinkerConfig`.
    pub fn builder() -> LinkerConfigBuilder {
        LinkerConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - The URL is non-empty and uses http or https
    /// - API key and library id are non-empty
    /// - The raw list path is non-empty
    /// - The request timeout is non-zero
    pub fn validate(&self) -> Result<()> {
        let url = self.galaxy_url.trim();
        if url.is_empty() {
            return Err(Error::Config("Galaxy URL cannot be empty".to_string()));
        }

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "Galaxy URL must start with http:// or https://, got '{}'",
                url
            )));
        }

        if self.api_key.trim().is_empty() {
            return Err(Error::Config("API key cannot be empty".to_string()));
        }

        if self.library_id.trim().is_empty() {
            return Err(Error::Config("Library id cannot be empty".to_string()));
        }

        if self.raw_list_path.as_os_str().is_empty() {
            return Err(Error::Config("Raw list path cannot be empty".to_string()));
        }

        if self.request_timeout.is_zero() {
            return Err(Error::Config(
                "Request timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Galaxy base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.galaxy_url.trim().trim_end_matches('/')
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn http_client_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "HttpClient implementation is required to reach the data library. \
                 Enable the 'desktop-shims' feature to use the default reqwest client \
                 or inject an implementation."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client = ReqwestHttpClient::with_timeout(timeout)
        .map_err(|e| Error::Internal(format!("Failed to create default HttpClient: {}", e)))?;
    let client: Arc<dyn HttpClient> = Arc::new(client);
    Ok(client)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(_timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    Err(http_client_missing_error())
}

#[cfg(feature = "desktop-shims")]
fn provide_default_file_system() -> Result<Arc<dyn FileSystemAccess>> {
    use bridge_desktop::TokioFileSystem;

    let fs: Arc<dyn FileSystemAccess> = Arc::new(TokioFileSystem::new());
    Ok(fs)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_file_system() -> Result<Arc<dyn FileSystemAccess>> {
    Err(Error::CapabilityMissing {
        capability: "FileSystemAccess".to_string(),
        message: "FileSystemAccess implementation is required to read the raw list \
                 and check for converted files. Enable the 'desktop-shims' feature to use \
                 the default tokio implementation or inject one."
            .to_string(),
    })
}

/// Builder for constructing [`LinkerConfig`] instances.
///
/// Call [`build()`](LinkerConfigBuilder::build) to validate and create the
/// final config.
#[derive(Default)]
pub struct LinkerConfigBuilder {
    galaxy_url: Option<String>,
    api_key: Option<String>,
    library_id: Option<String>,
    raw_list_path: Option<PathBuf>,
    request_timeout: Option<Duration>,
    http_client: Option<Arc<dyn HttpClient>>,
    file_system: Option<Arc<dyn FileSystemAccess>>,
}

impl LinkerConfigBuilder {
    /// Sets the Galaxy base URL.
    pub fn galaxy_url(mut self, url: impl Into<String>) -> Self {
        self.galaxy_url = Some(url.into());
        self
    }

    /// Sets the Galaxy API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the target library id.
    pub fn library_id(mut self, id: impl Into<String>) -> Self {
        self.library_id = Some(id.into());
        self
    }

    /// Sets the path of the raw file list.
    pub fn raw_list_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.raw_list_path = Some(path.into());
        self
    }

    /// Sets the timeout for each remote call.
    ///
    /// Default: 60 seconds
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the HTTP client implementation.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the file system access implementation.
    pub fn file_system(mut self, fs: Arc<dyn FileSystemAccess>) -> Self {
        self.file_system = Some(fs);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for missing or invalid settings and
    /// [`Error::CapabilityMissing`] when a bridge is absent and no desktop
    /// default is compiled in.
    pub fn build(self) -> Result<LinkerConfig> {
        let galaxy_url = self
            .galaxy_url
            .ok_or_else(|| Error::Config("Galaxy URL is required".to_string()))?;
        let api_key = self
            .api_key
            .ok_or_else(|| Error::Config("API key is required".to_string()))?;
        let library_id = self
            .library_id
            .ok_or_else(|| Error::Config("Library id is required".to_string()))?;
        let raw_list_path = self
            .raw_list_path
            .ok_or_else(|| Error::Config("Raw list path is required".to_string()))?;
        let request_timeout = self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client(request_timeout)?,
        };

        let file_system = match self.file_system {
            Some(fs) => fs,
            None => provide_default_file_system()?,
        };

        let config = LinkerConfig {
            galaxy_url,
            api_key,
            library_id,
            raw_list_path,
            request_timeout,
            http_client,
            file_system,
        };

        config.validate()?;
        Ok(config)
    }
}
