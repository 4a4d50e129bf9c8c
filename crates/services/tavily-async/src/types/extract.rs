//! Types for the Tavily `/extract` endpoint

use serde::{Deserialize, Serialize};

use super::common::{ContentFormat, ExtractDepth, Usage};

/// Request body for `POST /extract`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtractRequest {
    /// URLs to extract
    pub urls: Vec<String>,
    /// Extraction depth
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extract_depth: Option<ExtractDepth>,
    /// Include images found on the page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_images: Option<bool>,
    /// Include the favicon URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_favicon: Option<bool>,
    /// Output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ContentFormat>,
}

impl ExtractRequest {
    /// Create a request for the given URLs
    #[must_use]
    pub fn new(urls: Vec<String>) -> Self {
        Self {
            urls,
            ..Self::default()
        }
    }
}

/// Successfully extracted page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractResult {
    /// Page URL
    pub url: String,
    /// Extracted content
    #[serde(default)]
    pub raw_content: String,
    /// Images on the page (if requested)
    #[serde(default)]
    pub images: Vec<String>,
    /// Favicon URL (if requested)
    #[serde(default)]
    pub favicon: Option<String>,
}

/// URL the API could not extract
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FailedResult {
    /// Page URL
    pub url: String,
    /// Reason reported by the API
    #[serde(default)]
    pub error: Option<String>,
}

/// Response body for `POST /extract`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractResponse {
    /// Extracted pages
    #[serde(default)]
    pub results: Vec<ExtractResult>,
    /// Pages that failed
    #[serde(default)]
    pub failed_results: Vec<FailedResult>,
    /// Server-side response time in seconds
    #[serde(default)]
    pub response_time: Option<f64>,
    /// Credits charged (if reported)
    #[serde(default)]
    pub usage: Option<Usage>,
}
