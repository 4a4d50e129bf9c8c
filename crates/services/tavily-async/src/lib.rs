#![deny(clippy::all)]
#![deny(missing_docs)]

//! Async Tavily API client with typed requests/responses and per-request timeouts.
//!
//! The client performs exactly one HTTP request per call. Retry and fallback
//! policy belongs to the caller.

/// HTTP client implementation
pub mod client;
/// Configuration types for the client
pub mod config;
/// Error types
pub mod error;
/// API resource implementations
pub mod resources;
/// Test support utilities (for use in tests)
#[doc(hidden)]
pub mod test_support;
/// Request and response types
pub mod types;

pub use crate::client::Client;
pub use crate::config::TavilyConfig;
pub use crate::error::{ApiErrorObject, ConnectionFailure, TavilyError};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::types::*;
    pub use crate::{Client, TavilyConfig, TavilyError};
}
