//! # Batch Coordinator
//!
//! Drives one run of the linker over an input list of raw file paths.
//!
//! ## Workflow
//!
//! 1. Resolve the library root folder (configured or fetched)
//! 2. Load the folder index once
//! 3. For each non-blank line, classify the path and skip it when ineligible
//! 4. Depending on [`ImportMode`] and whether the file is converted:
//!    - link the raw file and start the conversion workflow
//!    - or link the conversion results
//! 5. Sleep a random interval before the next entry
//!
//! Entries are handled strictly one after another. The first remote failure
//! aborts the run.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_sync::{SyncConfig, SyncCoordinator};
//!
//! let coordinator = SyncCoordinator::new(SyncConfig::default(), library, runner, fs);
//! let report = coordinator.run_from_file(Path::new("raw_files.txt")).await?;
//! println!("{} workflows started", report.workflows_invoked);
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use bridge_traits::library::{DataLibrary, WorkflowRunner};
use bridge_traits::storage::FileSystemAccess;
use rand::Rng;
use tracing::{debug, error, info, instrument};

use crate::classifier::{PathClassifier, RawFilePath, DEFAULT_ALLOWED_RAW_FOLDERS};
use crate::conversion::{ConversionLayout, ConversionChecker, FileKind};
use crate::error::{Result, SyncError};
use crate::folder_resolver::FolderResolver;
use crate::library_index::LibraryIndex;
use crate::linker::{DatasetLinker, FileTypes, LinkStatus, LinkedDataset};
use crate::workflow::{WorkflowInvoker, WorkflowSettings};

/// Upper bound of the random pause between entries
pub const DEFAULT_PACING_MAX: Duration = Duration::from_millis(1000);

/// Chooses the pause taken after each processed entry
pub trait Pacer: Send + Sync {
    fn next_delay(&self) -> Duration;
}

/// Uniform delay in `[0, max)`; a zero `max` never pauses
#[derive(Debug, Clone, Copy)]
pub struct RandomPacer {
    max: Duration,
}

impl RandomPacer {
    pub fn new(max: Duration) -> Self {
        Self { max }
    }
}

impl Pacer for RandomPacer {
    fn next_delay(&self) -> Duration {
        let max_ms = self.max.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..max_ms))
    }
}

/// What a run registers for each eligible file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Link and convert unconverted files, link results of converted ones
    Default,
    /// Only link raw files, never start conversions
    RawOnly,
    /// Only link results of converted files
    ResultsOnly,
}

impl Default for ImportMode {
    fn default() -> Self {
        ImportMode::Default
    }
}

impl ImportMode {
    /// Mode from the two command line switches; both at once is an error
    pub fn from_flags(raw_only: bool, results_only: bool) -> Result<Self> {
        match (raw_only, results_only) {
            (true, true) => Err(SyncError::InvalidInput(
                "raw-only and results-only imports are mutually exclusive".to_string(),
            )),
            (true, false) => Ok(ImportMode::RawOnly),
            (false, true) => Ok(ImportMode::ResultsOnly),
            (false, false) => Ok(ImportMode::Default),
        }
    }
}

/// Batch run configuration
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub mode: ImportMode,

    /// Directory names that mark raw folders (substring match)
    pub allowed_raw_folders: Vec<String>,

    /// Export root and artifact layout
    pub layout: ConversionLayout,

    /// Datatype tags per file kind
    pub file_types: FileTypes,

    /// Conversion workflow shape
    pub workflow: WorkflowSettings,

    /// Library root folder; fetched from the service when unset
    pub root_folder_id: Option<String>,

    /// Upper bound of the pause after each processed entry. Zero disables it.
    pub pacing_max: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            mode: ImportMode::default(),
            allowed_raw_folders: DEFAULT_ALLOWED_RAW_FOLDERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            layout: ConversionLayout::default(),
            file_types: FileTypes::default(),
            workflow: WorkflowSettings::default(),
            root_folder_id: None,
            pacing_max: DEFAULT_PACING_MAX,
        }
    }
}

/// Counters for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Eligible entries handled
    pub processed: u64,
    /// Entries rejected by the classifier
    pub skipped: u64,
    /// Datasets newly registered
    pub datasets_linked: u64,
    /// Datasets found already present
    pub datasets_existing: u64,
    /// Library folders created
    pub folders_created: u64,
    /// Conversion workflows started
    pub workflows_invoked: u64,
    /// Entries with no conversion output in results-only mode
    pub not_converted: u64,
}

impl BatchReport {
    /// Create empty report
    pub fn new() -> Self {
        Self::default()
    }

    fn record_link(&mut self, linked: &LinkedDataset) {
        match linked.status {
            LinkStatus::Existing => self.datasets_existing += 1,
            LinkStatus::Linked { folders_created } => {
                self.datasets_linked += 1;
                self.folders_created += folders_created as u64;
            }
        }
    }
}

/// Components built once per run
struct RunContext {
    index: LibraryIndex,
    linker: DatasetLinker,
}

/// Batch coordinator
pub struct SyncCoordinator {
    config: SyncConfig,
    library: Arc<dyn DataLibrary>,
    classifier: PathClassifier,
    checker: ConversionChecker,
    invoker: WorkflowInvoker,
    file_system: Arc<dyn FileSystemAccess>,
    pacer: Arc<dyn Pacer>,
}

impl SyncCoordinator {
    /// Create a new coordinator
    ///
    /// # Arguments
    ///
    /// * `config` - Run configuration
    /// * `library` - Target data library
    /// * `runner` - Service running the conversion workflow
    /// * `file_system` - Export filesystem access
    pub fn new(
        config: SyncConfig,
        library: Arc<dyn DataLibrary>,
        runner: Arc<dyn WorkflowRunner>,
        file_system: Arc<dyn FileSystemAccess>,
    ) -> Self {
        let classifier = PathClassifier::new(config.allowed_raw_folders.clone());
        let checker = ConversionChecker::new(file_system.clone(), config.layout.clone());
        let invoker = WorkflowInvoker::new(runner, config.workflow.clone());
        let pacer: Arc<dyn Pacer> = Arc::new(RandomPacer::new(config.pacing_max));

        Self {
            config,
            library,
            classifier,
            checker,
            invoker,
            file_system,
            pacer,
        }
    }

    /// Replace the random pause between entries
    pub fn with_pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Read an input list and run over its lines
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn run_from_file(&self, path: &Path) -> Result<BatchReport> {
        let bytes = self.file_system.read_file(path).await?;
        let content = String::from_utf8(bytes.to_vec()).map_err(|e| {
            SyncError::InvalidInput(format!("{} is not valid UTF-8: {}", path.display(), e))
        })?;

        self.run(content.lines()).await
    }

    /// Process every line in order
    pub async fn run<I, S>(&self, lines: I) -> Result<BatchReport>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let context = self.prepare().await?;
        let mut report = BatchReport::new();

        info!(mode = ?self.config.mode, "Starting batch");

        for line in lines {
            let line = line.as_ref();
            if line.trim().is_empty() {
                continue;
            }

            let raw = match self.classifier.classify(line) {
                Ok(raw) => raw,
                Err(e) => {
                    error!("Skipping entry: {}", e);
                    report.skipped += 1;
                    continue;
                }
            };

            info!("Processing path: {}", raw);
            self.process_entry(&context, &raw, &mut report).await?;
            report.processed += 1;

            self.pace().await;
        }

        info!(
            processed = report.processed,
            skipped = report.skipped,
            linked = report.datasets_linked,
            existing = report.datasets_existing,
            workflows = report.workflows_invoked,
            "Batch complete"
        );
        Ok(report)
    }

    async fn prepare(&self) -> Result<RunContext> {
        let root_folder_id = match &self.config.root_folder_id {
            Some(id) if id.trim().is_empty() => {
                return Err(SyncError::InvalidInput(
                    "root folder id cannot be empty when provided".to_string(),
                ))
            }
            Some(id) => id.clone(),
            None => self.library.root_folder_id().await?,
        };
        debug!(root_folder_id = %root_folder_id, "Using library root");

        let index = LibraryIndex::load(self.library.as_ref()).await?;
        let resolver = FolderResolver::new(self.library.clone(), root_folder_id);
        let linker = DatasetLinker::new(
            self.library.clone(),
            resolver,
            self.config.layout.export_root.clone(),
            self.config.file_types.clone(),
        );

        Ok(RunContext { index, linker })
    }

    async fn process_entry(
        &self,
        context: &RunContext,
        raw: &RawFilePath,
        report: &mut BatchReport,
    ) -> Result<()> {
        match self.config.mode {
            ImportMode::RawOnly => {
                self.link_raw(context, raw, report).await?;
            }
            ImportMode::ResultsOnly => {
                if self.checker.is_converted(raw).await? {
                    self.link_results(context, raw, report).await?;
                } else {
                    debug!("Not converted yet: {}", raw);
                    report.not_converted += 1;
                }
            }
            ImportMode::Default => {
                if self.checker.is_converted(raw).await? {
                    self.link_results(context, raw, report).await?;
                } else {
                    let linked = self.link_raw(context, raw, report).await?;
                    let output = self.checker.absolute_path(&self.checker.converted_path(raw));
                    self.invoker
                        .invoke_conversion(&linked.dataset, &output)
                        .await?;
                    report.workflows_invoked += 1;
                }
            }
        }

        Ok(())
    }

    async fn link_raw(
        &self,
        context: &RunContext,
        raw: &RawFilePath,
        report: &mut BatchReport,
    ) -> Result<LinkedDataset> {
        let linked = context
            .linker
            .ensure_linked(&context.index, raw.as_str(), FileKind::Raw)
            .await?;
        report.record_link(&linked);
        Ok(linked)
    }

    async fn link_results(
        &self,
        context: &RunContext,
        raw: &RawFilePath,
        report: &mut BatchReport,
    ) -> Result<()> {
        for (path, kind) in self.checker.result_artifacts(raw) {
            let linked = context
                .linker
                .ensure_linked(&context.index, &path, kind)
                .await?;
            report.record_link(&linked);
        }
        Ok(())
    }

    async fn pace(&self) {
        let delay = self.pacer.next_delay();
        if delay.is_zero() {
            return;
        }

        debug!(delay_ms = delay.as_millis() as u64, "Pacing");
        tokio::time::sleep(delay).await;
    }
}
