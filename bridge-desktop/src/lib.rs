//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop and server hosts.
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest`
//! - `FileSystemAccess` using `tokio::fs`
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{ReqwestHttpClient, TokioFileSystem};
//!
//! #[tokio::main]
//! async fn main() {
//!     let http_client = ReqwestHttpClient::with_timeout(Duration::from_secs(60))?;
//!     let fs = TokioFileSystem::new();
//!
//!     // Use in linker configuration
//! }
//! ```

mod filesystem;
mod http;

pub use filesystem::TokioFileSystem;
pub use http::ReqwestHttpClient;
