//! Configuration types for the Tavily MCP server.
//!
//! The root type is [`SearchServerConfig`]. Every section uses
//! `#[serde(default)]` so partial JSON files work. Secrets are env-only and
//! never serialized.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchServerConfig {
    /// MCP server bind and auth settings.
    pub server: ServerConfig,

    /// Tavily API access.
    pub tavily: TavilyServiceConfig,

    /// Timeout planning constants.
    pub timeouts: TimeoutsConfig,

    /// Same-tier retry policy.
    pub retry: RetryConfig,

    /// Health probe thresholds.
    pub health: HealthConfig,

    /// Logging and diagnostics.
    pub logging: LoggingConfig,
}

/// MCP server bind settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host for the streamable HTTP transport.
    pub host: String,

    /// Port for the streamable HTTP transport.
    pub port: u16,

    /// Bearer token checked on HTTP requests (env-only).
    #[serde(skip)]
    pub bearer_token: Option<SecretString>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 7000,
            bearer_token: None,
        }
    }
}

/// Tavily API service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TavilyServiceConfig {
    /// Base URL for the Tavily API.
    pub base_url: String,

    /// API key (env-only, never serialized to config files).
    #[serde(skip)]
    pub api_key: Option<SecretString>,
}

impl Default for TavilyServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.tavily.com".into(),
            api_key: None,
        }
    }
}

/// Timeout planning constants, all in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutsConfig {
    /// Starting budget for every search.
    pub base_ms: u64,
    /// Added for advanced depth or `auto_parameters`.
    pub advanced_ms: u64,
    /// Added for `include_images`.
    pub images_ms: u64,
    /// Added for `include_image_descriptions`.
    pub image_descriptions_ms: u64,
    /// Added for `include_raw_content`.
    pub raw_content_ms: u64,
    /// Added for `include_favicon`.
    pub favicon_ms: u64,
    /// Added for `include_answer`.
    pub answer_ms: u64,
    /// `max_results` above this adds `many_results_ms`.
    pub many_results_threshold: u32,
    /// Added when `max_results` exceeds the threshold.
    pub many_results_ms: u64,
    /// Added per URL on extract.
    pub extract_per_url_ms: u64,
    /// Added for advanced extraction.
    pub extract_advanced_ms: u64,
    /// Added per crawl/map depth level.
    pub crawl_per_depth_ms: u64,
    /// Added per 50 pages of crawl/map limit.
    pub crawl_per_50_pages_ms: u64,
    /// Added when crawl/map carries instructions.
    pub crawl_instructions_ms: u64,
    /// Hard upper bound for any planned timeout.
    pub ceiling_ms: u64,
    /// Lower bound after tier scaling.
    pub floor_ms: u64,
    /// Multipliers for tiers 1, 2 and 3.
    pub tier_scale: [f64; 3],
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            base_ms: 15_000,
            advanced_ms: 10_000,
            images_ms: 5_000,
            image_descriptions_ms: 10_000,
            raw_content_ms: 10_000,
            favicon_ms: 2_000,
            answer_ms: 5_000,
            many_results_threshold: 10,
            many_results_ms: 5_000,
            extract_per_url_ms: 3_000,
            extract_advanced_ms: 15_000,
            crawl_per_depth_ms: 10_000,
            crawl_per_50_pages_ms: 5_000,
            crawl_instructions_ms: 10_000,
            ceiling_ms: 120_000,
            floor_ms: 5_000,
            tier_scale: [1.0, 0.75, 0.5],
        }
    }
}

/// Same-tier retry policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Same-tier retries after a timeout.
    pub timeout_retries: usize,
    /// Immediate same-tier retries after a transient connection failure.
    pub network_retries: usize,
    /// First backoff delay.
    pub backoff_min_ms: u64,
    /// Backoff delay cap.
    pub backoff_max_ms: u64,
    /// Backoff growth factor.
    pub backoff_factor: f32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            timeout_retries: 1,
            network_retries: 1,
            backoff_min_ms: 500,
            backoff_max_ms: 4_000,
            backoff_factor: 2.0,
        }
    }
}

/// Health probe thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Probes slower than this report `degraded`.
    pub slow_threshold_ms: u64,
    /// Timeout for the probe request itself.
    pub probe_timeout_ms: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            slow_threshold_ms: 3_000,
            probe_timeout_ms: 10_000,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,

    /// Whether to enable JSON-formatted logs.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
        }
    }
}
