//! Input path classification
//!
//! Decides whether a line of the input list names a raw acquisition file
//! that the linker should handle.

use crate::error::{Result, SyncError};
use crate::paths::{file_stem, normalize_path, split_path};

/// Directory names that mark raw acquisition folders
pub const DEFAULT_ALLOWED_RAW_FOLDERS: &[&str] = &["RAW_profile", "RAW", "raw"];

/// A normalized path, relative to the export root, accepted as a raw file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawFilePath {
    path: String,
}

impl RawFilePath {
    fn new(path: String) -> Self {
        Self { path }
    }

    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Directory holding the file, e.g. `A/B/RAW_profile`
    pub fn dir(&self) -> &str {
        split_path(&self.path).0
    }

    pub fn file_name(&self) -> &str {
        split_path(&self.path).1
    }

    /// File name without extension
    pub fn stem(&self) -> &str {
        file_stem(self.file_name())
    }

    /// Parent of the raw folder, where sibling artifact folders live
    pub fn project_dir(&self) -> &str {
        split_path(self.dir()).0
    }
}

impl std::fmt::Display for RawFilePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path)
    }
}

/// Accepts paths whose parent directory contains an allowed folder name
#[derive(Debug, Clone)]
pub struct PathClassifier {
    allowed_folders: Vec<String>,
}

impl Default for PathClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_RAW_FOLDERS.iter().map(|s| s.to_string()))
    }
}

impl PathClassifier {
    pub fn new(allowed_folders: impl IntoIterator<Item = String>) -> Self {
        Self {
            allowed_folders: allowed_folders.into_iter().collect(),
        }
    }

    /// Normalize `line` and accept it as a raw file path.
    ///
    /// The parent directory is matched by substring, so `A/RAW_profile_old`
    /// is accepted through `RAW_profile` and `A/raw/sub` through `raw`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::IneligiblePath`] when the path is absolute, leaves
    /// the export root, has no file name, or its directory matches none of
    /// the allowed folder names.
    pub fn classify(&self, line: &str) -> Result<RawFilePath> {
        let normalized = normalize_path(line);
        let reject = |reason: &str| SyncError::IneligiblePath {
            path: normalized.clone(),
            reason: reason.to_string(),
        };

        if normalized.starts_with('/') {
            return Err(reject("absolute paths are not relative to the export root"));
        }
        if normalized == "." || normalized == ".." || normalized.starts_with("../") {
            return Err(reject("path leaves the export root"));
        }

        let (dir, _) = split_path(&normalized);
        if !self
            .allowed_folders
            .iter()
            .any(|allowed| dir.contains(allowed.as_str()))
        {
            return Err(reject("parent directory is not a raw data folder"));
        }

        Ok(RawFilePath::new(normalized))
    }
}
