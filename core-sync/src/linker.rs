//! Dataset linking
//!
//! Registers export files in the data library by reference. Nothing is
//! uploaded; the service reads the file from the shared mount.

use std::sync::Arc;

use bridge_traits::library::{DataLibrary, LibraryDataset, LinkRequest};
use tracing::{info, instrument};

use crate::conversion::FileKind;
use crate::error::Result;
use crate::folder_resolver::FolderResolver;
use crate::library_index::LibraryIndex;
use crate::paths::{join_root, split_path};

/// Datatype tags sent to the service for each kind of file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTypes {
    pub raw: String,
    pub converted: String,
    pub metadata: String,
    pub report: String,
}

impl Default for FileTypes {
    fn default() -> Self {
        Self {
            raw: "thermo.raw".to_string(),
            converted: "mzml".to_string(),
            metadata: "json".to_string(),
            report: "txt".to_string(),
        }
    }
}

impl FileTypes {
    pub fn for_kind(&self, kind: FileKind) -> &str {
        match kind {
            FileKind::Raw => &self.raw,
            FileKind::Converted => &self.converted,
            FileKind::Metadata => &self.metadata,
            FileKind::Report => &self.report,
        }
    }
}

/// How a dataset came to be available
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    /// Found in the library index
    Existing,
    /// Registered by this call
    Linked { folders_created: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedDataset {
    pub dataset: LibraryDataset,
    pub status: LinkStatus,
}

impl LinkedDataset {
    pub fn is_new(&self) -> bool {
        matches!(self.status, LinkStatus::Linked { .. })
    }
}

pub struct DatasetLinker {
    library: Arc<dyn DataLibrary>,
    resolver: FolderResolver,
    export_root: String,
    file_types: FileTypes,
}

impl DatasetLinker {
    /// Create a new linker
    ///
    /// # Arguments
    ///
    /// * `library` - Library datasets are registered in
    /// * `resolver` - Resolves and creates target folders
    /// * `export_root` - Absolute export root prefixed to relative paths
    /// * `file_types` - Datatype tags per file kind
    pub fn new(
        library: Arc<dyn DataLibrary>,
        resolver: FolderResolver,
        export_root: impl Into<String>,
        file_types: FileTypes,
    ) -> Self {
        Self {
            library,
            resolver,
            export_root: export_root.into(),
            file_types,
        }
    }

    /// Link an export-relative file into the folder mirroring its directory
    #[instrument(skip(self))]
    pub async fn link(&self, path: &str, kind: FileKind) -> Result<LinkedDataset> {
        let (dir, _) = split_path(path);
        let resolved = self.resolver.resolve(dir).await?;

        let request = LinkRequest {
            folder_id: resolved.folder.id.clone(),
            filesystem_path: join_root(&self.export_root, path),
            file_type: self.file_types.for_kind(kind).to_string(),
        };
        let mut dataset = self.library.link_file(request).await?;
        if dataset.folder_id.is_empty() {
            dataset.folder_id = resolved.folder.id;
        }

        info!(dataset_id = %dataset.id, ?kind, "Linked {}", path);
        Ok(LinkedDataset {
            dataset,
            status: LinkStatus::Linked {
                folders_created: resolved.created,
            },
        })
    }

    /// Return the dataset for `path`, linking it only when the index has no
    /// copy of it
    pub async fn ensure_linked(
        &self,
        index: &LibraryIndex,
        path: &str,
        kind: FileKind,
    ) -> Result<LinkedDataset> {
        if let Some(dataset) = index.find_dataset(self.library.as_ref(), path).await? {
            info!(dataset_id = %dataset.id, "Already in library: {}", path);
            return Ok(LinkedDataset {
                dataset,
                status: LinkStatus::Existing,
            });
        }

        self.link(path, kind).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::library::{LibraryFolder, LibraryItem, LibraryItemKind};
    use std::sync::Mutex;

    /// Library with one pre-existing `/A/RAW` folder holding `old.raw`
    #[derive(Default)]
    struct SingleFolderLibrary {
        links: Mutex<Vec<LinkRequest>>,
    }

    #[async_trait]
    impl DataLibrary for SingleFolderLibrary {
        async fn root_folder_id(&self) -> BridgeResult<String> {
            Ok("Froot".to_string())
        }

        async fn list_folders(&self) -> BridgeResult<Vec<LibraryFolder>> {
            Ok(vec![
                LibraryFolder {
                    id: "Fa".to_string(),
                    name: "/A".to_string(),
                    parent_id: None,
                },
                LibraryFolder {
                    id: "Fr".to_string(),
                    name: "/A/RAW".to_string(),
                    parent_id: Some("Fa".to_string()),
                },
            ])
        }

        async fn find_folders(&self, path: &str) -> BridgeResult<Vec<LibraryFolder>> {
            Ok(self
                .list_folders()
                .await?
                .into_iter()
                .filter(|f| f.name == path)
                .collect())
        }

        async fn folder_contents(&self, folder_id: &str) -> BridgeResult<Vec<LibraryItem>> {
            if folder_id == "Fr" {
                Ok(vec![LibraryItem {
                    id: "d-old".to_string(),
                    name: "old.raw".to_string(),
                    kind: LibraryItemKind::File,
                }])
            } else {
                Ok(Vec::new())
            }
        }

        async fn create_folder(&self, parent_id: &str, name: &str) -> BridgeResult<LibraryFolder> {
            Ok(LibraryFolder {
                id: format!("{}-{}", parent_id, name),
                name: name.to_string(),
                parent_id: Some(parent_id.to_string()),
            })
        }

        async fn link_file(&self, request: LinkRequest) -> BridgeResult<LibraryDataset> {
            let name = request
                .filesystem_path
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string();
            self.links.lock().unwrap().push(request);
            Ok(LibraryDataset {
                id: format!("d-{}", name),
                name,
                folder_id: String::new(),
            })
        }
    }

    fn linker(library: Arc<SingleFolderLibrary>) -> DatasetLinker {
        let resolver = FolderResolver::new(library.clone(), "Froot");
        DatasetLinker::new(library, resolver, "/export/", FileTypes::default())
    }

    #[tokio::test]
    async fn test_link_uses_absolute_path_and_type() {
        let library = Arc::new(SingleFolderLibrary::default());
        let linker = linker(library.clone());

        let linked = linker.link("A/RAW/new.raw", FileKind::Raw).await.unwrap();

        assert_eq!(linked.dataset.id, "d-new.raw");
        assert_eq!(linked.dataset.folder_id, "Fr");
        assert_eq!(linked.status, LinkStatus::Linked { folders_created: 0 });

        let links = library.links.lock().unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].folder_id, "Fr");
        assert_eq!(links[0].filesystem_path, "/export/A/RAW/new.raw");
        assert_eq!(links[0].file_type, "thermo.raw");
    }

    #[tokio::test]
    async fn test_link_creates_missing_folders() {
        let library = Arc::new(SingleFolderLibrary::default());
        let linker = linker(library.clone());

        let linked = linker
            .link("A/mzML_profile/new.mzml", FileKind::Converted)
            .await
            .unwrap();

        assert_eq!(linked.status, LinkStatus::Linked { folders_created: 1 });
        let links = library.links.lock().unwrap();
        assert_eq!(links[0].folder_id, "Fa-mzML_profile");
        assert_eq!(links[0].file_type, "mzml");
    }

    #[tokio::test]
    async fn test_ensure_linked_reuses_existing_dataset() {
        let library = Arc::new(SingleFolderLibrary::default());
        let index = LibraryIndex::load(library.as_ref()).await.unwrap();
        let linker = linker(library.clone());

        let existing = linker
            .ensure_linked(&index, "A/RAW/old.raw", FileKind::Raw)
            .await
            .unwrap();
        assert_eq!(existing.status, LinkStatus::Existing);
        assert_eq!(existing.dataset.id, "d-old");
        assert!(!existing.is_new());
        assert!(library.links.lock().unwrap().is_empty());

        let fresh = linker
            .ensure_linked(&index, "A/RAW/fresh.raw", FileKind::Raw)
            .await
            .unwrap();
        assert!(fresh.is_new());
        assert_eq!(library.links.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_file_types_per_kind() {
        let types = FileTypes::default();
        assert_eq!(types.for_kind(FileKind::Raw), "thermo.raw");
        assert_eq!(types.for_kind(FileKind::Metadata), "json");
        assert_eq!(types.for_kind(FileKind::Report), "txt");
    }
}
