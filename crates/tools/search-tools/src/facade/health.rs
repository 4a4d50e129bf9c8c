use std::time::{Duration, Instant};

use chrono::Utc;
use tavily_async::TavilyError;
use tavily_async::types::UsageResponse;
use tracing::{info, warn};

use crate::SearchTools;
use crate::classify::classify;
use crate::error::{ClassifiedError, ErrorKind, ToolError};
use crate::tool::ToolContext;
use crate::types::{HealthState, HealthStatus};

/// Probe `GET /usage` once and report how the API looks.
///
/// No fallback and no retries. Only cancellation is an error; every probe
/// failure is reported as a status.
pub async fn run_health(tools: &SearchTools, ctx: &ToolContext) -> Result<HealthStatus, ToolError> {
    let timeout = tools.health.probe_timeout;
    let started = Instant::now();

    let outcome = tokio::select! {
        biased;
        () = ctx.cancellation().cancelled() => return Err(ToolError::Cancelled),
        res = tokio::time::timeout(timeout, tools.api.usage(timeout)) => {
            res.unwrap_or(Err(TavilyError::Timeout(timeout)))
        }
    };

    let status = assess(
        outcome.map_err(classify),
        started.elapsed(),
        tools.health.slow_threshold,
    );
    match status.status {
        HealthState::Healthy => info!(elapsed_ms = status.response_time_ms, "health probe ok"),
        _ => warn!(
            status = ?status.status,
            elapsed_ms = status.response_time_ms,
            "health probe: {}",
            status.diagnostics
        ),
    }
    Ok(status)
}

/// Map a probe outcome to a [`HealthStatus`].
#[must_use]
pub fn assess(
    outcome: Result<UsageResponse, ClassifiedError>,
    elapsed: Duration,
    slow_threshold: Duration,
) -> HealthStatus {
    let response_time_ms = elapsed.as_millis() as u64;
    let checked_at = Utc::now();

    match outcome {
        Ok(usage) => {
            let remaining_credits = usage.remaining_plan_credits();
            if elapsed <= slow_threshold {
                HealthStatus {
                    status: HealthState::Healthy,
                    response_time_ms,
                    diagnostics: "Tavily API reachable and API key accepted".into(),
                    fix_suggestions: Vec::new(),
                    error_kind: None,
                    remaining_credits,
                    checked_at,
                }
            } else {
                HealthStatus {
                    status: HealthState::Degraded,
                    response_time_ms,
                    diagnostics: format!(
                        "Tavily API reachable but slow: {response_time_ms}ms (threshold {}ms)",
                        slow_threshold.as_millis()
                    ),
                    fix_suggestions: vec![
                        "Expect slower tool calls; prefer search_depth=basic and fewer results"
                            .into(),
                        "Check network latency to api.tavily.com".into(),
                    ],
                    error_kind: None,
                    remaining_credits,
                    checked_at,
                }
            }
        }
        Err(err) => {
            let status = match err.kind {
                ErrorKind::QuotaExceeded | ErrorKind::TimeoutError => HealthState::Degraded,
                _ => HealthState::Unhealthy,
            };
            let mut fix_suggestions = vec![err.remediation_hint().to_string()];
            if err.kind == ErrorKind::AuthenticationError {
                fix_suggestions.push("Restart the server after updating the key".into());
            }
            HealthStatus {
                status,
                response_time_ms,
                diagnostics: format!("Health probe failed: {err}"),
                fix_suggestions,
                error_kind: Some(err.kind),
                remaining_credits: None,
                checked_at,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{api_error, timed_out};

    const THRESHOLD: Duration = Duration::from_secs(3);

    #[test]
    fn fast_success_is_healthy() {
        let s = assess(Ok(UsageResponse::default()), Duration::from_millis(200), THRESHOLD);
        assert_eq!(s.status, HealthState::Healthy);
        assert!(s.fix_suggestions.is_empty());
        assert_eq!(s.response_time_ms, 200);
    }

    #[test]
    fn slow_success_is_degraded() {
        let s = assess(Ok(UsageResponse::default()), Duration::from_secs(4), THRESHOLD);
        assert_eq!(s.status, HealthState::Degraded);
        assert!(!s.fix_suggestions.is_empty());
        assert!(s.error_kind.is_none());
    }

    #[test]
    fn quota_and_timeout_are_degraded() {
        for raw in [api_error(429, "rate limit"), timed_out()] {
            let s = assess(Err(classify(raw)), Duration::from_millis(10), THRESHOLD);
            assert_eq!(s.status, HealthState::Degraded);
            assert!(!s.fix_suggestions.is_empty());
        }
    }

    #[test]
    fn auth_failure_is_unhealthy_with_key_hint() {
        let s = assess(
            Err(classify(api_error(401, "Unauthorized: missing or invalid API key."))),
            Duration::from_millis(90),
            THRESHOLD,
        );
        assert_eq!(s.status, HealthState::Unhealthy);
        assert_eq!(s.error_kind, Some(ErrorKind::AuthenticationError));
        assert!(s.fix_suggestions.iter().any(|f| f.contains("API key")));
    }
}
