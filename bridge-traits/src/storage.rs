//! File System Abstraction
//!
//! Read-only view of the local export tree. The linker never writes locally;
//! it only checks for converted artifacts and reads the input list.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;

use crate::error::Result;

/// File system access trait
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::FileSystemAccess;
///
/// async fn has_mzml(fs: &dyn FileSystemAccess, path: &Path) -> Result<bool> {
///     fs.exists(path).await
/// }
/// ```
#[async_trait]
pub trait FileSystemAccess: Send + Sync {
    /// Check if a file or directory exists
    async fn exists(&self, path: &Path) -> Result<bool>;

    /// Read entire file contents into memory
    async fn read_file(&self, path: &Path) -> Result<Bytes>;
}
