//! # Galaxy Provider
//!
//! Implements `DataLibrary` and `WorkflowRunner` for the Galaxy REST API.
//!
//! ## Overview
//!
//! This module provides:
//! - Library folder listing and lookup by full folder path
//! - Folder creation under a parent folder
//! - Link-only dataset registration of server-side files (no bytes copied)
//! - Workflow invocation into a freshly named history
//!
//! Requests authenticate with the `x-api-key` header and are never retried.

pub mod connector;
pub mod error;
pub mod types;

pub use connector::GalaxyConnector;
pub use error::{GalaxyError, Result};
