//! File System Access Implementation using Tokio

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::FileSystemAccess,
};
use bytes::Bytes;
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Tokio-based file system implementation
///
/// Paths are used as given; callers join them against the export root.
#[derive(Debug, Default, Clone)]
pub struct TokioFileSystem;

impl TokioFileSystem {
    pub fn new() -> Self {
        Self
    }

    /// Convert std::io::Error to BridgeError
    fn map_io_error(e: std::io::Error) -> BridgeError {
        BridgeError::Io(e)
    }
}

#[async_trait]
impl FileSystemAccess for TokioFileSystem {
    async fn exists(&self, path: &Path) -> Result<bool> {
        let exists = fs::try_exists(path).await.map_err(Self::map_io_error)?;
        debug!(path = ?path, exists, "Checked path");
        Ok(exists)
    }

    async fn read_file(&self, path: &Path) -> Result<Bytes> {
        let data = fs::read(path).await.map_err(Self::map_io_error)?;
        debug!(path = ?path, size = data.len(), "Read file");
        Ok(Bytes::from(data))
    }
}
