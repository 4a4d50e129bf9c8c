//! Credit estimates following Tavily's published pricing.
//!
//! These are estimates for the caller's budgeting. The API's own `usage`
//! field, when present, is authoritative.

use tavily_async::types::{CrawlRequest, ExtractDepth, ExtractRequest, MapRequest, SearchDepth, SearchRequest};

/// Results that make up one full search charge.
const RESULTS_PER_CHARGE: f64 = 5.0;
/// URLs per extract charge.
const URLS_PER_CHARGE: u32 = 5;
/// Pages per map charge.
const PAGES_PER_MAP_CHARGE: u32 = 10;
/// Default crawl/map page limit.
const DEFAULT_LIMIT: u32 = 50;

/// Estimated credits for a search request.
#[must_use]
pub fn search(req: &SearchRequest) -> f64 {
    let advanced = req.search_depth == Some(SearchDepth::Advanced)
        || SearchRequest::flag(req.auto_parameters);
    let weight = if advanced { 2.0 } else { 1.0 };
    let results = f64::from(req.max_results.unwrap_or(5));
    round2(weight * (results / RESULTS_PER_CHARGE).min(1.0))
}

/// Estimated credits for an extract request.
#[must_use]
pub fn extract(req: &ExtractRequest) -> f64 {
    let urls = u32::try_from(req.urls.len()).unwrap_or(u32::MAX);
    extract_weight(req.extract_depth) * f64::from(urls.div_ceil(URLS_PER_CHARGE))
}

/// Estimated credits for a map request.
#[must_use]
pub fn map(req: &MapRequest) -> f64 {
    map_cost(req.limit, req.instructions.is_some())
}

/// Estimated credits for a crawl request: mapping plus extracting every page.
#[must_use]
pub fn crawl(req: &CrawlRequest) -> f64 {
    let pages = req.limit.unwrap_or(DEFAULT_LIMIT);
    map_cost(req.limit, req.instructions.is_some())
        + extract_weight(req.extract_depth) * f64::from(pages.div_ceil(URLS_PER_CHARGE))
}

fn map_cost(limit: Option<u32>, instructions: bool) -> f64 {
    let per = if instructions { 2.0 } else { 1.0 };
    per * f64::from(limit.unwrap_or(DEFAULT_LIMIT).div_ceil(PAGES_PER_MAP_CHARGE))
}

fn extract_weight(depth: Option<ExtractDepth>) -> f64 {
    if depth == Some(ExtractDepth::Advanced) {
        2.0
    } else {
        1.0
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
