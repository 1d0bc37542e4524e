//! Remote folder resolution
//!
//! Walks a directory path one component at a time, looking up each
//! cumulative prefix (`/A`, `/A/B`, ...) in the library and creating the
//! folders that are missing.

use std::sync::Arc;

use bridge_traits::library::{DataLibrary, LibraryFolder};
use tracing::{debug, info};

use crate::error::{Result, SyncError};

/// Result of resolving a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFolder {
    pub folder: LibraryFolder,
    /// Folders created along the way
    pub created: usize,
}

pub struct FolderResolver {
    library: Arc<dyn DataLibrary>,
    root_folder_id: String,
}

impl FolderResolver {
    pub fn new(library: Arc<dyn DataLibrary>, root_folder_id: impl Into<String>) -> Self {
        Self {
            library,
            root_folder_id: root_folder_id.into(),
        }
    }

    pub fn root_folder_id(&self) -> &str {
        &self.root_folder_id
    }

    /// Return the remote folder for `dir`, creating missing levels.
    ///
    /// An empty `dir` resolves to the library root.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::AmbiguousFolder`] when a prefix matches more
    /// than one folder. Folders created before the failing level are kept.
    pub async fn resolve(&self, dir: &str) -> Result<ResolvedFolder> {
        let mut current = LibraryFolder {
            id: self.root_folder_id.clone(),
            name: "/".to_string(),
            parent_id: None,
        };
        let mut prefix = String::new();
        let mut created = 0;

        for component in dir.split('/').filter(|c| !c.is_empty()) {
            prefix.push('/');
            prefix.push_str(component);

            let mut matches = self.library.find_folders(&prefix).await?;
            current = match matches.len() {
                0 => {
                    let mut folder = self.library.create_folder(&current.id, component).await?;
                    info!(folder_id = %folder.id, "Created folder {}", prefix);
                    created += 1;
                    folder.name = prefix.clone();
                    folder
                }
                1 => {
                    let folder = matches.remove(0);
                    debug!(folder_id = %folder.id, "Descending into {}", prefix);
                    folder
                }
                count => {
                    return Err(SyncError::AmbiguousFolder {
                        path: prefix,
                        count,
                    })
                }
            };
        }

        Ok(ResolvedFolder {
            folder: current,
            created,
        })
    }
}
