//! Types for the Tavily `/search` endpoint

use serde::{Deserialize, Serialize};

use super::common::{
    AnswerLevel, IncludeAnswer, IncludeRawContent, SearchDepth, TimeRange, Topic, Usage,
};

/// Request body for `POST /search`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchRequest {
    /// The search query
    pub query: String,

    /// Topic category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<Topic>,

    /// Search depth; left unset when `auto_parameters` chooses it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_depth: Option<SearchDepth>,

    /// Maximum number of results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,

    /// Publication window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_range: Option<TimeRange>,

    /// Days back from today (news topic only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,

    /// Earliest publication date, `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    /// Latest publication date, `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,

    /// Snippets returned per source, 1-3 (advanced depth only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunks_per_source: Option<u32>,

    /// Boost results from this country (general topic only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// Ask for an LLM-generated answer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_answer: Option<IncludeAnswer>,

    /// Include the cleaned raw page content of each result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_raw_content: Option<IncludeRawContent>,

    /// Include query-related images
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_images: Option<bool>,

    /// Include descriptions for returned images
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_image_descriptions: Option<bool>,

    /// Include the favicon URL of each result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_favicon: Option<bool>,

    /// Restrict results to these domains
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_domains: Option<Vec<String>>,

    /// Exclude results from these domains
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_domains: Option<Vec<String>>,

    /// Let the API pick depth/topic from the query
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_parameters: Option<bool>,
}

impl SearchRequest {
    /// Create a new search request with the given query
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// Set the topic
    #[must_use]
    pub const fn with_topic(mut self, topic: Topic) -> Self {
        self.topic = Some(topic);
        self
    }

    /// Set the search depth
    #[must_use]
    pub const fn with_search_depth(mut self, depth: SearchDepth) -> Self {
        self.search_depth = Some(depth);
        self
    }

    /// Set the maximum number of results
    #[must_use]
    pub const fn with_max_results(mut self, n: u32) -> Self {
        self.max_results = Some(n);
        self
    }

    /// Request an answer
    #[must_use]
    pub const fn with_answer(mut self, on: bool) -> Self {
        self.include_answer = Some(IncludeAnswer::Flag(on));
        self
    }

    /// Request an answer at a given level
    #[must_use]
    pub const fn with_answer_level(mut self, level: AnswerLevel) -> Self {
        self.include_answer = Some(IncludeAnswer::Level(level));
        self
    }

    /// Request images, optionally with descriptions
    #[must_use]
    pub const fn with_images(mut self, images: bool, descriptions: bool) -> Self {
        self.include_images = Some(images);
        self.include_image_descriptions = Some(descriptions);
        self
    }

    /// Whether a flag is explicitly on
    #[must_use]
    pub fn flag(value: Option<bool>) -> bool {
        value.unwrap_or(false)
    }
}

/// An image returned by search; a bare URL unless descriptions were requested
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum SearchImage {
    /// Image URL only
    Url(String),
    /// Image URL with a generated description
    Described {
        /// Image URL
        url: String,
        /// Generated description
        #[serde(default)]
        description: Option<String>,
    },
}

impl SearchImage {
    /// Image URL regardless of shape
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Url(u) | Self::Described { url: u, .. } => u,
        }
    }

    /// Description, when present
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Url(_) => None,
            Self::Described { description, .. } => description.as_deref(),
        }
    }
}

/// A single search hit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResult {
    /// Page title
    #[serde(default)]
    pub title: String,
    /// Page URL
    pub url: String,
    /// Most relevant content snippet
    #[serde(default)]
    pub content: String,
    /// Relevance score (0.0-1.0)
    #[serde(default)]
    pub score: f64,
    /// Cleaned raw page content (if requested)
    #[serde(default)]
    pub raw_content: Option<String>,
    /// Favicon URL (if requested)
    #[serde(default)]
    pub favicon: Option<String>,
    /// Publication date (news topic)
    #[serde(default)]
    pub published_date: Option<String>,
}

/// Response body for `POST /search`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Echo of the query
    #[serde(default)]
    pub query: String,
    /// Generated answer (if requested)
    #[serde(default)]
    pub answer: Option<String>,
    /// Query-related images (if requested)
    #[serde(default)]
    pub images: Vec<SearchImage>,
    /// Ranked results
    #[serde(default)]
    pub results: Vec<SearchResult>,
    /// Server-side response time in seconds
    #[serde(default)]
    pub response_time: Option<f64>,
    /// Credits charged (if reported)
    #[serde(default)]
    pub usage: Option<Usage>,
    /// Request id for support tickets
    #[serde(default)]
    pub request_id: Option<String>,
}
