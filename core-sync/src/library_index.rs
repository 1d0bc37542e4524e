//! Snapshot of the folders in the data library
//!
//! The index is loaded once per batch and is not refreshed when the batch
//! creates folders or links datasets. A file appearing twice in one input
//! list is therefore linked twice.

use bridge_traits::library::{DataLibrary, LibraryDataset, LibraryFolder, LibraryItemKind};
use tracing::{debug, info};

use crate::error::Result;
use crate::paths::split_path;

#[derive(Debug, Clone, Default)]
pub struct LibraryIndex {
    folders: Vec<LibraryFolder>,
}

impl LibraryIndex {
    /// Fetch every folder of the library
    pub async fn load(library: &dyn DataLibrary) -> Result<Self> {
        let folders = library.list_folders().await?;
        info!(folders = folders.len(), "Loaded library index");
        Ok(Self::from_folders(folders))
    }

    pub fn from_folders(folders: Vec<LibraryFolder>) -> Self {
        Self { folders }
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    /// Folders whose name, without leading slashes, equals `dir`
    pub fn folders_for_dir<'a>(&'a self, dir: &'a str) -> impl Iterator<Item = &'a LibraryFolder> {
        self.folders
            .iter()
            .filter(move |folder| folder.name.trim_start_matches('/') == dir)
    }

    /// Look up an existing dataset by export-relative path.
    ///
    /// Each indexed folder matching the directory is listed in turn; the
    /// first file with the same name wins.
    pub async fn find_dataset(
        &self,
        library: &dyn DataLibrary,
        path: &str,
    ) -> Result<Option<LibraryDataset>> {
        let (dir, file_name) = split_path(path);

        for folder in self.folders_for_dir(dir) {
            let contents = library.folder_contents(&folder.id).await?;
            let found = contents
                .into_iter()
                .find(|item| item.kind == LibraryItemKind::File && item.name == file_name);

            if let Some(item) = found {
                debug!(dataset_id = %item.id, folder_id = %folder.id, "Found existing dataset");
                return Ok(Some(LibraryDataset {
                    id: item.id,
                    name: item.name,
                    folder_id: folder.id.clone(),
                }));
            }
        }

        Ok(None)
    }
}
