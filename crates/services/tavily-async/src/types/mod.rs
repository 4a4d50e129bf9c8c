//! Request and response types for the Tavily API

/// Shared types used across endpoints
pub mod common;
/// Crawl and map endpoint types
pub mod crawl;
/// Extract endpoint types
pub mod extract;
/// Search endpoint types
pub mod search;
/// Usage endpoint types
pub mod usage;

pub use common::*;
pub use crawl::{CrawlRequest, CrawlResponse, CrawlResult, MapRequest, MapResponse};
pub use extract::{ExtractRequest, ExtractResponse, ExtractResult, FailedResult};
pub use search::{SearchImage, SearchRequest, SearchResponse, SearchResult};
pub use usage::UsageResponse;
