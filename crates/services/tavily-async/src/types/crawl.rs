//! Types for the Tavily `/crawl` and `/map` endpoints

use serde::{Deserialize, Serialize};

use super::common::{ContentFormat, ExtractDepth, Usage};

/// Request body for `POST /crawl`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrawlRequest {
    /// Root URL
    pub url: String,
    /// How far from the root to follow links
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,
    /// Links followed per page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_breadth: Option<u32>,
    /// Total pages processed before stopping
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Natural-language guidance for the crawler
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// Regex path patterns to include
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select_paths: Option<Vec<String>>,
    /// Regex path patterns to exclude
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_paths: Option<Vec<String>>,
    /// Follow links to other domains
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_external: Option<bool>,
    /// Include images found on pages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_images: Option<bool>,
    /// Extraction depth
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extract_depth: Option<ExtractDepth>,
    /// Output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ContentFormat>,
}

impl CrawlRequest {
    /// Create a crawl from the given root URL
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

/// Crawled page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlResult {
    /// Page URL
    pub url: String,
    /// Extracted content
    #[serde(default)]
    pub raw_content: String,
    /// Favicon URL (if requested)
    #[serde(default)]
    pub favicon: Option<String>,
    /// Images on the page (if requested)
    #[serde(default)]
    pub images: Vec<String>,
}

/// Response body for `POST /crawl`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlResponse {
    /// Root URL the crawl started from
    #[serde(default)]
    pub base_url: String,
    /// Crawled pages
    #[serde(default)]
    pub results: Vec<CrawlResult>,
    /// Server-side response time in seconds
    #[serde(default)]
    pub response_time: Option<f64>,
    /// Credits charged (if reported)
    #[serde(default)]
    pub usage: Option<Usage>,
}

/// Request body for `POST /map`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MapRequest {
    /// Root URL
    pub url: String,
    /// How far from the root to follow links
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,
    /// Links followed per page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_breadth: Option<u32>,
    /// Total pages processed before stopping
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Natural-language guidance for the mapper
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// Regex path patterns to include
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select_paths: Option<Vec<String>>,
    /// Regex path patterns to exclude
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_paths: Option<Vec<String>>,
    /// Follow links to other domains
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_external: Option<bool>,
}

impl MapRequest {
    /// Create a site map request from the given root URL
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

/// Response body for `POST /map`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapResponse {
    /// Root URL the map started from
    #[serde(default)]
    pub base_url: String,
    /// Discovered URLs
    #[serde(default)]
    pub results: Vec<String>,
    /// Server-side response time in seconds
    #[serde(default)]
    pub response_time: Option<f64>,
    /// Credits charged (if reported)
    #[serde(default)]
    pub usage: Option<Usage>,
}
