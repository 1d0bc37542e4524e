//! # Library Sync
//!
//! Mirrors raw acquisition files from the shared export into a Galaxy data
//! library and starts their conversion.
//!
//! ## Overview
//!
//! Files are never uploaded. Each file is registered by reference to its
//! path on the export mount, inside a library folder tree mirroring the
//! export's directory layout.
//!
//! ## Components
//!
//! - **Path Classifier** (`classifier`): Normalizes input lines and accepts raw files
//! - **Conversion Checker** (`conversion`): Derives artifact paths and checks for outputs
//! - **Library Index** (`library_index`): Folder snapshot used to find existing datasets
//! - **Folder Resolver** (`folder_resolver`): Finds or creates the folder for a directory
//! - **Dataset Linker** (`linker`): Registers files by reference, skipping present ones
//! - **Workflow Invoker** (`workflow`): Starts the conversion workflow for a dataset
//! - **Sync Coordinator** (`coordinator`): Runs the above over an input list

pub mod classifier;
pub mod conversion;
pub mod coordinator;
pub mod error;
pub mod folder_resolver;
pub mod library_index;
pub mod linker;
pub mod paths;
pub mod workflow;

pub use classifier::{PathClassifier, RawFilePath, DEFAULT_ALLOWED_RAW_FOLDERS};
pub use conversion::{
    ConversionChecker, ConversionLayout, FileKind, DEFAULT_CONVERTED_FOLDER, DEFAULT_EXPORT_ROOT,
};
pub use coordinator::{
    BatchReport, ImportMode, Pacer, RandomPacer, SyncConfig, SyncCoordinator, DEFAULT_PACING_MAX,
};
pub use error::{Result, SyncError};
pub use folder_resolver::{FolderResolver, ResolvedFolder};
pub use library_index::LibraryIndex;
pub use linker::{DatasetLinker, FileTypes, LinkStatus, LinkedDataset};
pub use paths::normalize_path;
pub use workflow::{WorkflowInvoker, WorkflowSettings, DEFAULT_CONVERSION_WORKFLOW_ID};
