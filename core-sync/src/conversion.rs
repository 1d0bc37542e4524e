//! Conversion state probing
//!
//! A raw file counts as converted when its profile-mode output exists on
//! the shared export filesystem. The output lives in a folder next to the
//! raw folder:
//!
//! ```text
//! <project>/RAW_profile/<stem>.raw
//! <project>/mzML_profile/<stem>.mzml
//! <project>/mzML_profile/<stem>.json
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use bridge_traits::storage::FileSystemAccess;
use tracing::debug;

use crate::classifier::RawFilePath;
use crate::error::Result;
use crate::paths::{join_root, join_segments};

/// Folder name holding conversion outputs
pub const DEFAULT_CONVERTED_FOLDER: &str = "mzML_profile";

/// Export root mounted on both this host and the Galaxy server
pub const DEFAULT_EXPORT_ROOT: &str = "/mnt/sally/000020-Shares/rcx-da/";

/// Kinds of files the linker registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Instrument raw acquisition
    Raw,
    /// Profile-mode conversion output
    Converted,
    /// Metadata sidecar produced with the conversion
    Metadata,
    /// Processing report
    Report,
}

/// Where conversion artifacts are placed relative to a raw file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionLayout {
    /// Absolute path of the export root
    pub export_root: String,
    /// Sibling folder of the raw folder holding outputs
    pub converted_folder: String,
    pub converted_extension: String,
    pub metadata_extension: String,
    pub report_extension: String,
    /// Register the report alongside the converted output and metadata
    pub link_reports: bool,
}

impl Default for ConversionLayout {
    fn default() -> Self {
        Self {
            export_root: DEFAULT_EXPORT_ROOT.to_string(),
            converted_folder: DEFAULT_CONVERTED_FOLDER.to_string(),
            converted_extension: "mzml".to_string(),
            metadata_extension: "json".to_string(),
            report_extension: "txt".to_string(),
            link_reports: false,
        }
    }
}

/// Answers conversion questions for raw files
pub struct ConversionChecker {
    file_system: Arc<dyn FileSystemAccess>,
    layout: ConversionLayout,
}

impl ConversionChecker {
    pub fn new(file_system: Arc<dyn FileSystemAccess>, layout: ConversionLayout) -> Self {
        Self {
            file_system,
            layout,
        }
    }

    pub fn layout(&self) -> &ConversionLayout {
        &self.layout
    }

    /// Export-relative path of an artifact belonging to `raw`
    pub fn artifact_path(&self, raw: &RawFilePath, kind: FileKind) -> String {
        let extension = match kind {
            FileKind::Raw => return raw.as_str().to_string(),
            FileKind::Converted => &self.layout.converted_extension,
            FileKind::Metadata => &self.layout.metadata_extension,
            FileKind::Report => &self.layout.report_extension,
        };

        let file_name = format!("{}.{}", raw.stem(), extension);
        join_segments([
            raw.project_dir(),
            self.layout.converted_folder.as_str(),
            file_name.as_str(),
        ])
    }

    /// Export-relative path of the converted output
    pub fn converted_path(&self, raw: &RawFilePath) -> String {
        self.artifact_path(raw, FileKind::Converted)
    }

    /// Absolute path of an export-relative path, as seen by both hosts
    pub fn absolute_path(&self, relative: &str) -> String {
        join_root(&self.layout.export_root, relative)
    }

    /// Local filesystem location of an export-relative path
    pub fn local_path(&self, relative: &str) -> PathBuf {
        PathBuf::from(self.absolute_path(relative))
    }

    /// Whether the converted output exists on the export filesystem
    pub async fn is_converted(&self, raw: &RawFilePath) -> Result<bool> {
        let local = self.local_path(&self.converted_path(raw));
        let exists = self.file_system.exists(&local).await?;

        debug!(path = %local.display(), exists, "Checked conversion output");
        Ok(exists)
    }

    pub async fn needs_conversion(&self, raw: &RawFilePath) -> Result<bool> {
        Ok(!self.is_converted(raw).await?)
    }

    /// Export-relative artifacts to register for an already converted file
    pub fn result_artifacts(&self, raw: &RawFilePath) -> Vec<(String, FileKind)> {
        let mut kinds = vec![FileKind::Converted, FileKind::Metadata];
        if self.layout.link_reports {
            kinds.push(FileKind::Report);
        }

        kinds
            .into_iter()
            .map(|kind| (self.artifact_path(raw, kind), kind))
            .collect()
    }
}
