//! Configuration for the Tavily MCP search server.
//!
//! This crate provides:
//! - [`SearchServerConfig`]: The root configuration with namespaced sections
//! - [`load`]: Defaults, then an optional JSON file, then env overrides
//! - [`validation`]: Advisory validation that produces warnings
//!
//! # Configuration Precedence (lowest to highest)
//! 1. Default values
//! 2. JSON file (`--config <path>`, or `./tavily-mcp.json` when present)
//! 3. Environment variables
//!
//! # Environment Variables
//! - `TAVILY_API_KEY`: Tavily API key (env-only, required to serve)
//! - `TAVILY_BASE_URL`: Override Tavily API base URL
//! - `MCP_HOST`: HTTP bind host
//! - `MCP_PORT`: HTTP bind port
//! - `MCP_BEARER_TOKEN`: Bearer token required on HTTP requests (env-only)
//! - `TAVILY_MCP_LOG_LEVEL`: Override log level
//! - `TAVILY_MCP_LOG_JSON`: Enable JSON logging ("true" or "1")

pub mod loader;
pub mod types;
pub mod validation;

pub use loader::{LOCAL_FILE, LoadedConfig, load};
pub use types::{
    HealthConfig, LoggingConfig, RetryConfig, SearchServerConfig, ServerConfig,
    TavilyServiceConfig, TimeoutsConfig,
};
pub use validation::AdvisoryWarning;
