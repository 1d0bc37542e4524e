//! galaxy-linker
//!
//! Links raw acquisition files from the shared export into a Galaxy data
//! library and starts their conversion to profile-mode mzML.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::CliArgs;
use core_runtime::config::LinkerConfig;
use core_runtime::logging::init_logging;
use core_sync::{BatchReport, ImportMode, SyncConfig, SyncCoordinator};
use provider_galaxy::GalaxyConnector;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            // Help and version requests are not failures
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(e) = init_logging(args.logging_config()) {
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(report) => {
            info!(
                processed = report.processed,
                skipped = report.skipped,
                linked = report.datasets_linked,
                existing = report.datasets_existing,
                folders_created = report.folders_created,
                workflows = report.workflows_invoked,
                not_converted = report.not_converted,
                "Done"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: CliArgs) -> Result<BatchReport> {
    let sync_config = sync_config(&args)?;
    let config = linker_config(args)?;
    info!(?config, "Configuration loaded");

    let connector = Arc::new(GalaxyConnector::from_config(&config));
    let coordinator = SyncCoordinator::new(
        sync_config,
        connector.clone(),
        connector,
        Arc::clone(&config.file_system),
    );

    coordinator
        .run_from_file(&config.raw_list_path)
        .await
        .with_context(|| format!("Linking {} failed", config.raw_list_path.display()))
}

fn sync_config(args: &CliArgs) -> Result<SyncConfig> {
    let mut config = SyncConfig {
        mode: ImportMode::from_flags(args.import_raw_only, args.import_results_only)?,
        root_folder_id: args.root_folder_id.clone(),
        ..SyncConfig::default()
    };

    if let Some(root) = &args.export_root {
        config.layout.export_root = root.clone();
    }
    if let Some(workflow_id) = &args.workflow_id {
        config.workflow.workflow_id = workflow_id.clone();
    }
    if let Some(ms) = args.pacing_ms {
        config.pacing_max = Duration::from_millis(ms);
    }
    config.layout.link_reports = args.link_reports;

    Ok(config)
}

fn linker_config(args: CliArgs) -> Result<LinkerConfig> {
    let config = LinkerConfig::builder()
        .galaxy_url(args.galaxy_url)
        .api_key(args.api_key)
        .library_id(args.library_id)
        .raw_list_path(args.raw_list)
        .build()?;

    Ok(config)
}
