//! Error types for the Galaxy provider

use thiserror::Error;

/// Galaxy provider errors
#[derive(Error, Debug)]
pub enum GalaxyError {
    /// API key rejected or missing permissions
    #[error("Authentication failed (status {status_code}): {message}")]
    AuthenticationFailed { status_code: u16, message: String },

    /// API request returned an error
    #[error("Galaxy API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// A create call succeeded but returned nothing to work with
    #[error("Empty response from {0}")]
    EmptyResponse(String),

    /// Bridge error
    #[error(transparent)]
    BridgeError(#[from] bridge_traits::error::BridgeError),
}

/// Result type for Galaxy operations
pub type Result<T> = std::result::Result<T, GalaxyError>;

impl GalaxyError {
    /// Map a non-2xx status and its body to an error
    pub fn from_status(status_code: u16, message: String) -> Self {
        match status_code {
            401 | 403 => GalaxyError::AuthenticationFailed {
                status_code,
                message,
            },
            404 => GalaxyError::NotFound(message),
            _ => GalaxyError::ApiError {
                status_code,
                message,
            },
        }
    }
}

impl From<GalaxyError> for bridge_traits::error::BridgeError {
    fn from(error: GalaxyError) -> Self {
        use bridge_traits::error::BridgeError;

        match error {
            GalaxyError::AuthenticationFailed {
                status_code,
                message,
            } => BridgeError::OperationFailed(format!(
                "Authentication failed (status {}): {}",
                status_code, message
            )),
            GalaxyError::ApiError {
                status_code,
                message,
            } => BridgeError::OperationFailed(format!(
                "API error (status {}): {}",
                status_code, message
            )),
            GalaxyError::NotFound(msg) => BridgeError::NotFound(msg),
            GalaxyError::ParseError(msg) => {
                BridgeError::OperationFailed(format!("Parse error: {}", msg))
            }
            GalaxyError::EmptyResponse(what) => {
                BridgeError::OperationFailed(format!("Empty response from {}", what))
            }
            GalaxyError::BridgeError(e) => e,
        }
    }
}
