//! Advisory validation for `SearchServerConfig`.
//!
//! Validation is advisory: it produces warnings but doesn't prevent the
//! config from being used. The one fatal check, a missing API key, lives in
//! [`SearchServerConfig::require_api_key`](crate::SearchServerConfig::require_api_key).

use crate::types::SearchServerConfig;

/// An advisory warning about a configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisoryWarning {
    /// Machine-readable warning code.
    pub code: &'static str,

    /// Human-readable warning message.
    pub message: String,

    /// JSON path to the problematic config field.
    pub path: &'static str,
}

impl std::fmt::Display for AdvisoryWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.path, self.message)
    }
}

/// Validate a configuration and return advisory warnings.
pub fn validate(cfg: &SearchServerConfig) -> Vec<AdvisoryWarning> {
    let mut warnings = vec![];

    let url = &cfg.tavily.base_url;
    if !url.starts_with("http://") && !url.starts_with("https://") {
        warnings.push(AdvisoryWarning {
            code: "tavily.base_url.invalid",
            path: "tavily.base_url",
            message: format!("Expected an http(s) URL, got: '{url}'"),
        });
    }

    if cfg.server.port == 0 {
        warnings.push(AdvisoryWarning {
            code: "server.port.zero",
            path: "server.port",
            message: "Port 0 binds a random port; clients will not find the server".into(),
        });
    }

    let t = &cfg.timeouts;
    if t.ceiling_ms < t.base_ms {
        warnings.push(AdvisoryWarning {
            code: "timeouts.ceiling.below_base",
            path: "timeouts.ceiling_ms",
            message: format!(
                "ceiling ({}ms) is below base ({}ms); every request gets the ceiling",
                t.ceiling_ms, t.base_ms
            ),
        });
    }
    if t.floor_ms > t.ceiling_ms {
        warnings.push(AdvisoryWarning {
            code: "timeouts.floor.above_ceiling",
            path: "timeouts.floor_ms",
            message: format!(
                "floor ({}ms) is above ceiling ({}ms)",
                t.floor_ms, t.ceiling_ms
            ),
        });
    }
    let scale_in_range = t.tier_scale.iter().all(|s| *s > 0.0 && *s <= 1.0);
    let scale_non_increasing = t.tier_scale.windows(2).all(|w| w[0] >= w[1]);
    if !scale_in_range || !scale_non_increasing {
        warnings.push(AdvisoryWarning {
            code: "timeouts.tier_scale.invalid",
            path: "timeouts.tier_scale",
            message: format!(
                "tier multipliers should be in (0, 1] and non-increasing, got {:?}",
                t.tier_scale
            ),
        });
    }

    let r = &cfg.retry;
    if r.backoff_min_ms > r.backoff_max_ms {
        warnings.push(AdvisoryWarning {
            code: "retry.backoff.inverted",
            path: "retry.backoff_min_ms",
            message: format!(
                "backoff_min_ms ({}) exceeds backoff_max_ms ({})",
                r.backoff_min_ms, r.backoff_max_ms
            ),
        });
    }

    // Validate log level
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&cfg.logging.level.to_lowercase().as_str()) {
        warnings.push(AdvisoryWarning {
            code: "logging.level.invalid",
            path: "logging.level",
            message: format!(
                "Unknown log level '{}'. Expected one of: {}",
                cfg.logging.level,
                valid_levels.join(", ")
            ),
        });
    }

    warnings
}
