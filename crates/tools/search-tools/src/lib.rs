#![deny(missing_docs)]

//! Tavily search MCP tools with a resilience core.
//!
//! Every tool call is validated, given a timeout planned from its
//! parameters, and executed on a three-tier ladder that degrades the request
//! when the remote API fails with a recoverable error.

pub mod classify;
pub mod credits;
pub mod error;
pub mod facade;
pub mod fallback;
pub mod fmt;
pub mod kind;
pub mod remote;
#[doc(hidden)]
pub mod test_support;
pub mod tier;
pub mod timeout;
pub mod tool;
pub mod tools;
pub mod types;
pub mod validate;

use std::sync::Arc;
use std::time::Duration;

use search_config::SearchServerConfig;
use secrecy::SecretString;
use tavily_async::{Client, TavilyConfig};

use crate::fallback::FallbackExecutor;
use crate::remote::SearchApi;
use crate::timeout::TimeoutPlanner;

pub use error::{ClassifiedError, ErrorKind, ErrorPayload, ToolError};
pub use kind::SearchKind;
pub use tier::Tier;
pub use tool::{ToolContext, ToolRegistry};
pub use tools::build_registry;

/// Shared state for every tool call.
///
/// Read-only after construction; calls share it through an `Arc`.
pub struct SearchTools {
    pub(crate) api: Arc<dyn SearchApi>,
    pub(crate) executor: FallbackExecutor,
    pub(crate) health: HealthSettings,
}

/// Health probe thresholds as durations.
#[derive(Debug, Clone, Copy)]
pub(crate) struct HealthSettings {
    pub(crate) slow_threshold: Duration,
    pub(crate) probe_timeout: Duration,
}

impl SearchTools {
    /// Build tool state around any [`SearchApi`].
    #[must_use]
    pub fn new(api: Arc<dyn SearchApi>, cfg: &SearchServerConfig) -> Self {
        let planner = TimeoutPlanner::new(cfg.timeouts.clone());
        Self {
            api,
            executor: FallbackExecutor::new(planner, cfg.retry.clone()),
            health: HealthSettings {
                slow_threshold: Duration::from_millis(cfg.health.slow_threshold_ms),
                probe_timeout: Duration::from_millis(cfg.health.probe_timeout_ms),
            },
        }
    }

    /// Build tool state backed by the real Tavily API.
    #[must_use]
    pub fn tavily(cfg: &SearchServerConfig, api_key: SecretString) -> Self {
        let client = Client::with_config(
            TavilyConfig::new()
                .with_api_base(cfg.tavily.base_url.clone())
                .with_secret_key(api_key),
        );
        Self::new(Arc::new(client), cfg)
    }

    /// The executor shared by all tools.
    #[must_use]
    pub const fn executor(&self) -> &FallbackExecutor {
        &self.executor
    }
}
