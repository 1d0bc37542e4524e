//! # Host Bridge Traits
//!
//! Abstractions that separate the linker's logic from the outside world.
//!
//! ## Traits
//!
//! ### Networking & I/O
//! - [`HttpClient`](http::HttpClient) - Async HTTP requests
//! - [`FileSystemAccess`](storage::FileSystemAccess) - Read-only local file access
//!
//! ### Remote collaborators
//! - [`DataLibrary`](library::DataLibrary) - Folder listing, folder creation, link-by-reference uploads
//! - [`WorkflowRunner`](library::WorkflowRunner) - Named workflow invocation
//!
//! ## Implementations
//!
//! | Trait | Crate |
//! |-------|-------|
//! | `HttpClient`, `FileSystemAccess` | `bridge-desktop` |
//! | `DataLibrary`, `WorkflowRunner` | `provider-galaxy` |
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! convert their own errors into it and keep the remote message intact so the
//! operator can see why a call failed.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so implementations can be shared
//! behind `Arc` across the runtime.

pub mod error;
pub mod http;
pub mod library;
pub mod storage;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use library::{
    DataLibrary, InputSource, InvocationRequest, LibraryDataset, LibraryFolder, LibraryItem,
    LibraryItemKind, LinkRequest, WorkflowInput, WorkflowInvocation, WorkflowRunner,
};
pub use storage::FileSystemAccess;
