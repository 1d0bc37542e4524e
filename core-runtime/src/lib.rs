//! # Core Runtime Module
//!
//! Provides the ambient runtime infrastructure for the linker:
//! - Logging and tracing infrastructure
//! - Connection configuration with fail-fast validation
//!
//! ## Overview
//!
//! Other crates depend on this one for the configuration they are built from
//! and for the logging conventions used throughout the workspace.

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
