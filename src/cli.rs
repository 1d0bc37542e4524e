//! Command line parsing
//!
//! Connection settings fall back to environment variables.

use clap::{ArgAction, Parser};
use core_runtime::logging::{LogFormat, LogLevel, LoggingConfig};
use std::path::PathBuf;

/// Links raw files listed in a file into a Galaxy data library and starts
/// their conversion to mzML.
#[derive(Debug, Clone, Parser)]
#[command(name = "galaxy-linker", version)]
pub struct CliArgs {
    /// Galaxy server URL
    #[arg(long, env = "GALAXY_URL")]
    pub galaxy_url: String,

    /// Galaxy API key
    #[arg(long, env = "GALAXY_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Target data library
    #[arg(long, env = "GALAXY_LIBRARY_ID")]
    pub library_id: String,

    /// File with one export-relative path per line
    #[arg(long, value_name = "FILE")]
    pub raw_list: PathBuf,

    /// Library root folder, fetched from the server when omitted
    #[arg(long, value_name = "ID")]
    pub root_folder_id: Option<String>,

    /// Export mount prefix
    #[arg(long, value_name = "PATH")]
    pub export_root: Option<String>,

    /// Conversion workflow
    #[arg(long, value_name = "ID")]
    pub workflow_id: Option<String>,

    /// Only link raw files
    #[arg(long, conflicts_with = "import_results_only")]
    pub import_raw_only: bool,

    /// Only link conversion results
    #[arg(long)]
    pub import_results_only: bool,

    /// Also link .txt reports with the results
    #[arg(long)]
    pub link_reports: bool,

    /// Maximum pause between entries in milliseconds, 0 disables
    #[arg(long, value_name = "MS")]
    pub pacing_ms: Option<u64>,

    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Filter directives taking precedence over the level
    #[arg(long, env = "RUST_LOG", value_name = "FILTER")]
    pub log_filter: Option<String>,

    /// Raise verbosity, repeat for trace
    #[arg(short, action = ArgAction::Count)]
    pub verbose: u8,
}

impl CliArgs {
    /// Logging setup implied by the flags
    pub fn logging_config(&self) -> LoggingConfig {
        let level = match self.verbose {
            0 => self.log_level.unwrap_or(LogLevel::Info),
            1 => LogLevel::Debug,
            _ => LogLevel::Trace,
        };

        let mut config = LoggingConfig::default().with_level(level);
        if let Some(format) = self.log_format {
            config = config.with_format(format);
        }
        if let Some(filter) = self.log_filter.as_deref().filter(|f| !f.trim().is_empty()) {
            config = config.with_filter(filter.to_string());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    const CONNECTION: [&str; 6] = [
        "--galaxy-url",
        "https://galaxy.example.org",
        "--api-key",
        "secret",
        "--library-id",
        "lib1",
    ];

    fn parse(extra: &[&str]) -> Result<CliArgs, clap::Error> {
        let args = std::iter::once("galaxy-linker")
            .chain(CONNECTION)
            .chain(extra.iter().copied());
        CliArgs::try_parse_from(args)
    }

    #[test]
    fn test_parse_all_flags() {
        let args = parse(&[
            "--raw-list",
            "raw_files.txt",
            "--root-folder-id=F1",
            "--export-root",
            "/mnt/export",
            "--workflow-id",
            "wf1",
            "--import-results-only",
            "--link-reports",
            "--pacing-ms",
            "250",
            "--log-format",
            "json",
            "--log-level",
            "warning",
            "--log-filter",
            "core_sync=trace",
        ])
        .unwrap();

        assert_eq!(args.galaxy_url, "https://galaxy.example.org");
        assert_eq!(args.api_key, "secret");
        assert_eq!(args.library_id, "lib1");
        assert_eq!(args.raw_list, PathBuf::from("raw_files.txt"));
        assert_eq!(args.root_folder_id.as_deref(), Some("F1"));
        assert_eq!(args.export_root.as_deref(), Some("/mnt/export"));
        assert_eq!(args.workflow_id.as_deref(), Some("wf1"));
        assert!(args.import_results_only);
        assert!(!args.import_raw_only);
        assert!(args.link_reports);
        assert_eq!(args.pacing_ms, Some(250));
        assert_eq!(args.log_format, Some(LogFormat::Json));
        assert_eq!(args.log_level, Some(LogLevel::Warn));
        assert_eq!(
            args.logging_config().filter.as_deref(),
            Some("core_sync=trace")
        );
    }

    #[test]
    fn test_flag_is_not_taken_as_raw_list_value() {
        let err = parse(&["--raw-list", "--import-raw-only"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);

        let err = parse(&["--import-raw-only"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_conflicting_modes_are_rejected() {
        let err = parse(&[
            "--raw-list",
            "raw_files.txt",
            "--import-raw-only",
            "--import-results-only",
        ])
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_rejects_bad_arguments() {
        let err = parse(&["--raw-list", "r.txt", "--frobnicate"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);

        let err = parse(&["--raw-list", "r.txt", "--pacing-ms", "soon"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);

        let err = parse(&["--raw-list", "r.txt", "--log-format", "xml"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn test_verbosity_overrides_level() {
        let args = parse(&["--raw-list", "r.txt", "--log-level", "error", "-v"]).unwrap();
        assert_eq!(args.logging_config().level, LogLevel::Debug);

        let args = parse(&["--raw-list", "r.txt", "-vvv"]).unwrap();
        assert_eq!(args.verbose, 3);
        assert_eq!(args.logging_config().level, LogLevel::Trace);

        let args = parse(&["--raw-list", "r.txt", "-v", "-v"]).unwrap();
        assert_eq!(args.logging_config().level, LogLevel::Trace);

        let args = parse(&["--raw-list", "r.txt"]).unwrap();
        assert_eq!(args.logging_config().level, LogLevel::Info);
    }

    #[test]
    fn test_blank_log_filter_is_ignored() {
        let args = parse(&["--raw-list", "r.txt", "--log-filter", " "]).unwrap();
        assert!(args.logging_config().filter.is_none());
    }

    #[test]
    fn test_connection_settings_fall_back_to_environment() {
        // Only this test sets these variables; every other test passes
        // the connection flags explicitly, which take precedence.
        std::env::set_var("GALAXY_URL", "https://env.example.org");
        std::env::set_var("GALAXY_API_KEY", "env-key");
        std::env::set_var("GALAXY_LIBRARY_ID", "env-lib");

        let args = CliArgs::try_parse_from([
            "galaxy-linker",
            "--library-id",
            "flag-lib",
            "--raw-list",
            "r.txt",
        ])
        .unwrap();

        assert_eq!(args.galaxy_url, "https://env.example.org");
        assert_eq!(args.api_key, "env-key");
        assert_eq!(args.library_id, "flag-lib");
    }

    #[test]
    fn test_help_is_reported_as_display() {
        let err = CliArgs::try_parse_from(["galaxy-linker", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert!(!err.use_stderr());
    }
}
