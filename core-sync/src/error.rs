use bridge_traits::error::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Ineligible path {path}: {reason}")]
    IneligiblePath { path: String, reason: String },

    #[error("Multiple remote folders found for {path} ({count} matches)")]
    AmbiguousFolder { path: String, count: usize },

    #[error("Invalid input list: {0}")]
    InvalidInput(String),

    #[error("Bridge operation failed: {0}")]
    Bridge(#[from] BridgeError),
}

pub type Result<T> = std::result::Result<T, SyncError>;
