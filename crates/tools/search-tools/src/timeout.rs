//! Request-specific timeouts derived from parameter complexity.
//!
//! Planning is pure: the same request and constants always give the same
//! duration, and turning on a feature flag never shortens it.

use std::time::Duration;

use search_config::TimeoutsConfig;
use tavily_async::types::{
    CrawlRequest, ExtractDepth, ExtractRequest, IncludeAnswer, IncludeRawContent, MapRequest,
    SearchDepth, SearchRequest,
};

use crate::tier::Tier;

/// Default crawl/map depth when unset.
const DEFAULT_DEPTH: u32 = 1;
/// Default crawl/map page limit when unset.
const DEFAULT_LIMIT: u32 = 50;

/// Computes per-request timeouts from [`TimeoutsConfig`] constants.
#[derive(Debug, Clone, Default)]
pub struct TimeoutPlanner {
    cfg: TimeoutsConfig,
}

impl TimeoutPlanner {
    /// Create a planner from configured constants.
    #[must_use]
    pub const fn new(cfg: TimeoutsConfig) -> Self {
        Self { cfg }
    }

    /// Configured constants.
    #[must_use]
    pub const fn config(&self) -> &TimeoutsConfig {
        &self.cfg
    }

    /// Timeout for a search request at tier 1.
    #[must_use]
    pub fn search(&self, req: &SearchRequest) -> Duration {
        let c = &self.cfg;
        let mut ms = c.base_ms;

        let advanced = req.search_depth == Some(SearchDepth::Advanced);
        if advanced || flag(req.auto_parameters) {
            ms += c.advanced_ms;
        }
        if flag(req.include_images) {
            ms += c.images_ms;
        }
        if flag(req.include_image_descriptions) {
            ms += c.image_descriptions_ms;
        }
        if req.include_raw_content.is_some_and(IncludeRawContent::is_on) {
            ms += c.raw_content_ms;
        }
        if flag(req.include_favicon) {
            ms += c.favicon_ms;
        }
        if req.include_answer.is_some_and(IncludeAnswer::is_on) {
            ms += c.answer_ms;
        }
        if req.max_results.unwrap_or(0) > c.many_results_threshold {
            ms += c.many_results_ms;
        }

        self.clamp(ms)
    }

    /// Timeout for an extract request at tier 1.
    #[must_use]
    pub fn extract(&self, req: &ExtractRequest) -> Duration {
        let c = &self.cfg;
        let urls = u64::try_from(req.urls.len()).unwrap_or(u64::MAX);
        let mut ms = c.base_ms.saturating_add(c.extract_per_url_ms.saturating_mul(urls));
        if req.extract_depth == Some(ExtractDepth::Advanced) {
            ms += c.extract_advanced_ms;
        }
        if flag(req.include_images) {
            ms += c.images_ms;
        }
        if flag(req.include_favicon) {
            ms += c.favicon_ms;
        }
        self.clamp(ms)
    }

    /// Timeout for a crawl request at tier 1.
    #[must_use]
    pub fn crawl(&self, req: &CrawlRequest) -> Duration {
        let c = &self.cfg;
        let mut ms = self.site_ms(req.max_depth, req.limit, req.instructions.as_deref());
        if req.extract_depth == Some(ExtractDepth::Advanced) {
            ms += c.extract_advanced_ms;
        }
        if flag(req.include_images) {
            ms += c.images_ms;
        }
        self.clamp(ms)
    }

    /// Timeout for a map request at tier 1.
    #[must_use]
    pub fn map(&self, req: &MapRequest) -> Duration {
        self.clamp(self.site_ms(req.max_depth, req.limit, req.instructions.as_deref()))
    }

    /// Scale a tier-1 plan for `tier`, bounded by floor and ceiling.
    #[must_use]
    pub fn for_tier(&self, planned: Duration, tier: Tier) -> Duration {
        let scale = self.cfg.tier_scale[tier.index()];
        let ceiling = Duration::from_millis(self.cfg.ceiling_ms);
        let scaled =
            Duration::try_from_secs_f64(planned.as_secs_f64() * scale.max(0.0)).unwrap_or(ceiling);
        scaled
            .max(Duration::from_millis(self.cfg.floor_ms))
            .min(ceiling)
    }

    fn site_ms(&self, depth: Option<u32>, limit: Option<u32>, instructions: Option<&str>) -> u64 {
        let c = &self.cfg;
        let depth = u64::from(depth.unwrap_or(DEFAULT_DEPTH));
        let pages = u64::from(limit.unwrap_or(DEFAULT_LIMIT));
        let mut ms = c.base_ms
            + c.crawl_per_depth_ms * depth
            + c.crawl_per_50_pages_ms * pages.div_ceil(50);
        if instructions.is_some() {
            ms += c.crawl_instructions_ms;
        }
        ms
    }

    fn clamp(&self, ms: u64) -> Duration {
        Duration::from_millis(ms.min(self.cfg.ceiling_ms))
    }
}

fn flag(v: Option<bool>) -> bool {
    SearchRequest::flag(v)
}
