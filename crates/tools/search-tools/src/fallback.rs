//! Tiered degrade-and-retry execution around one logical request.
//!
//! Tiers run strictly in ascending order. A tier may be retried in place
//! (timeouts with backoff, transient connection drops immediately); nothing
//! ever goes back to an earlier tier.

use std::time::{Duration, Instant};

use backon::{BackoffBuilder, ExponentialBuilder};
use futures::future::BoxFuture;
use search_config::RetryConfig;
use tavily_async::TavilyError;
use tavily_async::types::{
    CrawlRequest, CrawlResponse, ExtractRequest, ExtractResponse, MapRequest, MapResponse,
    SearchRequest, SearchResponse,
};
use tracing::{debug, info, warn};

use crate::classify::classify;
use crate::error::{ClassifiedError, ErrorKind, ToolError};
use crate::remote::SearchApi;
use crate::tier::Tier;
use crate::timeout::TimeoutPlanner;
use crate::tool::ToolContext;

/// A request the executor can plan and send.
pub trait RemoteRequest: Send + Sync {
    /// Response type returned by the endpoint.
    type Response: Send;

    /// Tier-1 timeout for this request.
    fn plan(&self, planner: &TimeoutPlanner) -> Duration;

    /// Issue the request once.
    fn send<'a>(
        &'a self,
        api: &'a dyn SearchApi,
        timeout: Duration,
    ) -> BoxFuture<'a, Result<Self::Response, TavilyError>>;
}

impl RemoteRequest for SearchRequest {
    type Response = SearchResponse;

    fn plan(&self, planner: &TimeoutPlanner) -> Duration {
        planner.search(self)
    }

    fn send<'a>(
        &'a self,
        api: &'a dyn SearchApi,
        timeout: Duration,
    ) -> BoxFuture<'a, Result<SearchResponse, TavilyError>> {
        api.search(self, timeout)
    }
}

impl RemoteRequest for ExtractRequest {
    type Response = ExtractResponse;

    fn plan(&self, planner: &TimeoutPlanner) -> Duration {
        planner.extract(self)
    }

    fn send<'a>(
        &'a self,
        api: &'a dyn SearchApi,
        timeout: Duration,
    ) -> BoxFuture<'a, Result<ExtractResponse, TavilyError>> {
        api.extract(self, timeout)
    }
}

impl RemoteRequest for CrawlRequest {
    type Response = CrawlResponse;

    fn plan(&self, planner: &TimeoutPlanner) -> Duration {
        planner.crawl(self)
    }

    fn send<'a>(
        &'a self,
        api: &'a dyn SearchApi,
        timeout: Duration,
    ) -> BoxFuture<'a, Result<CrawlResponse, TavilyError>> {
        api.crawl(self, timeout)
    }
}

impl RemoteRequest for MapRequest {
    type Response = MapResponse;

    fn plan(&self, planner: &TimeoutPlanner) -> Duration {
        planner.map(self)
    }

    fn send<'a>(
        &'a self,
        api: &'a dyn SearchApi,
        timeout: Duration,
    ) -> BoxFuture<'a, Result<MapResponse, TavilyError>> {
        api.map(self, timeout)
    }
}

/// A successful result and how it was obtained.
#[derive(Debug, Clone)]
pub struct Attempted<T> {
    /// The response
    pub value: T,
    /// Tier that succeeded
    pub tier: Tier,
    /// Remote calls made, including the successful one
    pub attempts: u32,
    /// Wall time across all attempts and backoff
    pub elapsed: Duration,
}

/// Runs a three-tier ladder with classification and same-tier retries.
#[derive(Debug, Clone, Default)]
pub struct FallbackExecutor {
    planner: TimeoutPlanner,
    retry: RetryConfig,
}

impl FallbackExecutor {
    /// Create an executor from a planner and retry policy.
    #[must_use]
    pub const fn new(planner: TimeoutPlanner, retry: RetryConfig) -> Self {
        Self { planner, retry }
    }

    /// The planner used to compute per-tier timeouts.
    #[must_use]
    pub const fn planner(&self) -> &TimeoutPlanner {
        &self.planner
    }

    /// Backoff between same-tier timeout retries.
    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(self.retry.backoff_min_ms))
            .with_max_delay(Duration::from_millis(self.retry.backoff_max_ms))
            .with_factor(self.retry.backoff_factor)
            .with_max_times(self.retry.timeout_retries)
    }

    /// Execute `ladder` for `tool`.
    ///
    /// Returns the first success, or [`ToolError::Failed`] with the last
    /// classified error. Validation and authentication failures stop at the
    /// tier they occur on; anything else moves to the next tier.
    pub async fn run<R: RemoteRequest>(
        &self,
        tool: &str,
        api: &dyn SearchApi,
        ladder: &[R; 3],
        ctx: &ToolContext,
    ) -> Result<Attempted<R::Response>, ToolError> {
        let started = Instant::now();
        let mut attempts: u32 = 0;
        let mut last: Option<(ClassifiedError, Tier)> = None;

        for tier in Tier::ALL {
            let req = &ladder[tier.index()];
            let timeout = self.planner.for_tier(req.plan(&self.planner), tier);
            let mut delays = self.backoff().build();
            let mut network_retries = self.retry.network_retries;

            loop {
                attempts += 1;
                debug!(
                    tool,
                    tier = tier.number(),
                    attempt = attempts,
                    timeout_ms = timeout.as_millis() as u64,
                    "sending request"
                );

                let outcome = tokio::select! {
                    biased;
                    () = ctx.cancellation().cancelled() => return Err(cancelled(tool, tier)),
                    res = tokio::time::timeout(timeout, req.send(api, timeout)) => {
                        res.unwrap_or(Err(TavilyError::Timeout(timeout)))
                    }
                };

                let err = match outcome {
                    Ok(value) => {
                        if tier != Tier::Original {
                            info!(tool, tier = tier.number(), attempts, "succeeded on degraded tier");
                        }
                        return Ok(Attempted {
                            value,
                            tier,
                            attempts,
                            elapsed: started.elapsed(),
                        });
                    }
                    Err(raw) => classify(raw),
                };

                warn!(
                    tool,
                    tier = tier.number(),
                    attempt = attempts,
                    timeout_ms = timeout.as_millis() as u64,
                    kind = %err.kind,
                    "attempt failed: {}",
                    err.message
                );

                if err.kind.aborts_fallback() {
                    return Err(ToolError::Failed {
                        error: err,
                        tier,
                        tiers_exhausted: false,
                    });
                }

                let retry_after = match err.kind {
                    ErrorKind::TimeoutError => delays.next(),
                    ErrorKind::NetworkError if err.transient && network_retries > 0 => {
                        network_retries -= 1;
                        Some(Duration::ZERO)
                    }
                    _ => None,
                };

                let Some(delay) = retry_after else {
                    last = Some((err, tier));
                    break;
                };
                if !delay.is_zero() {
                    debug!(tool, tier = tier.number(), delay_ms = delay.as_millis() as u64, "backing off");
                    tokio::select! {
                        biased;
                        () = ctx.cancellation().cancelled() => return Err(cancelled(tool, tier)),
                        () = tokio::time::sleep(delay) => {}
                    }
                }
            }

            if let Some(next) = tier.next() {
                info!(
                    tool,
                    from = tier.number(),
                    to = next.number(),
                    "degrading to next tier"
                );
            }
        }

        let (error, tier) =
            last.ok_or_else(|| ToolError::internal("fallback ladder made no attempts"))?;
        Err(ToolError::Failed {
            error,
            tier,
            tiers_exhausted: true,
        })
    }
}

fn cancelled(tool: &str, tier: Tier) -> ToolError {
    info!(tool, tier = tier.number(), "cancelled by caller");
    ToolError::Cancelled
}
