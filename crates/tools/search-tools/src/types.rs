//! Input/output types for the search tools.

use std::fmt::Write;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;
use crate::fmt::TextFormat;

// ============================================================================
// Inputs
// ============================================================================

/// Input for `tavily_search`.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct SearchInput {
    /// Search query (max 400 characters)
    pub query: String,
    /// Topic: general | news | finance | health | science | travel (default: general)
    #[serde(default)]
    pub topic: Option<String>,
    /// Search depth: basic (1 credit) | advanced (2 credits). Default: basic
    #[serde(default)]
    pub search_depth: Option<String>,
    /// Number of results (1-20, default 5)
    #[serde(default)]
    pub max_results: Option<u32>,
    /// Publication window: day | week | month | year (or d | w | m | y)
    #[serde(default)]
    pub time_range: Option<String>,
    /// Days back from today (1-365). Only valid with topic=news
    #[serde(default)]
    pub days: Option<u32>,
    /// Earliest publication date, YYYY-MM-DD
    #[serde(default)]
    pub start_date: Option<String>,
    /// Latest publication date, YYYY-MM-DD. Equal to start_date on news means "that day"
    #[serde(default)]
    pub end_date: Option<String>,
    /// Snippets per source (1-3). Requires search_depth=advanced
    #[serde(default)]
    pub chunks_per_source: Option<u32>,
    /// Boost results from this country, e.g. "united states". Requires topic=general
    #[serde(default)]
    pub country: Option<String>,
    /// Include an LLM-generated answer: true | false | basic | advanced
    #[serde(default)]
    pub include_answer: Option<FlagOrName>,
    /// Include cleaned page content for each result: true | false | markdown | text
    #[serde(default)]
    pub include_raw_content: Option<FlagOrName>,
    /// Include query-related images
    #[serde(default)]
    pub include_images: Option<bool>,
    /// Include image descriptions (turns include_images on)
    #[serde(default)]
    pub include_image_descriptions: Option<bool>,
    /// Include each result's favicon URL
    #[serde(default)]
    pub include_favicon: Option<bool>,
    /// Only return results from these domains
    #[serde(default)]
    pub include_domains: Option<Vec<String>>,
    /// Never return results from these domains
    #[serde(default)]
    pub exclude_domains: Option<Vec<String>>,
    /// Let Tavily choose depth and topic from the query (overrides search_depth)
    #[serde(default)]
    pub auto_parameters: Option<bool>,
}

/// A boolean switch or one of a fixed set of names, e.g. `true` or `"advanced"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum FlagOrName {
    /// Plain on/off
    Flag(bool),
    /// Named level or format
    Name(String),
}

/// Input for `tavily_qna`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct QnaInput {
    /// The question to answer
    pub query: String,
    /// Search depth: basic | advanced (default: basic)
    #[serde(default)]
    pub search_depth: Option<String>,
    /// Topic (default: general)
    #[serde(default)]
    pub topic: Option<String>,
}

/// Input for `tavily_news`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct NewsInput {
    /// News query
    pub query: String,
    /// Days back from today (1-365, default 7)
    #[serde(default)]
    pub days: Option<u32>,
    /// Number of articles (1-20, default 5)
    #[serde(default)]
    pub max_results: Option<u32>,
    /// Search depth: basic | advanced (default: basic)
    #[serde(default)]
    pub search_depth: Option<String>,
    /// Only return articles from these domains
    #[serde(default)]
    pub include_domains: Option<Vec<String>>,
    /// Never return articles from these domains
    #[serde(default)]
    pub exclude_domains: Option<Vec<String>>,
}

/// Input for `tavily_image_search` and `tavily_diagram_search`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct VisualInput {
    /// What to look for
    pub query: String,
    /// Number of source pages (1-20, default 5)
    #[serde(default)]
    pub max_results: Option<u32>,
    /// Search depth: basic | advanced (default: basic)
    #[serde(default)]
    pub search_depth: Option<String>,
}

/// Input for `tavily_context`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ContextInput {
    /// Query to gather context for
    pub query: String,
    /// Number of sources (1-20, default 5)
    #[serde(default)]
    pub max_results: Option<u32>,
    /// Token budget for the packed context (1-32000, default 4000)
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Search depth: basic | advanced (default: basic)
    #[serde(default)]
    pub search_depth: Option<String>,
    /// Topic (default: general)
    #[serde(default)]
    pub topic: Option<String>,
}

/// Input for `tavily_extract`.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ExtractInput {
    /// http(s) URLs to extract (1-20)
    pub urls: Vec<String>,
    /// Extraction depth: basic | advanced (default: basic)
    #[serde(default)]
    pub extract_depth: Option<String>,
    /// Include images found on each page
    #[serde(default)]
    pub include_images: Option<bool>,
    /// Include each page's favicon URL
    #[serde(default)]
    pub include_favicon: Option<bool>,
    /// Output format: markdown | text (default: markdown)
    #[serde(default)]
    pub format: Option<String>,
}

/// Input for `tavily_crawl`.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct CrawlInput {
    /// Root http(s) URL
    pub url: String,
    /// Link depth from the root (1-5, default 1)
    #[serde(default)]
    pub max_depth: Option<u32>,
    /// Links followed per page (1-500, default 20)
    #[serde(default)]
    pub max_breadth: Option<u32>,
    /// Total pages before stopping (1-500, default 50)
    #[serde(default)]
    pub limit: Option<u32>,
    /// Natural-language guidance, e.g. "only API reference pages"
    #[serde(default)]
    pub instructions: Option<String>,
    /// Regex path patterns to include
    #[serde(default)]
    pub select_paths: Option<Vec<String>>,
    /// Regex path patterns to exclude
    #[serde(default)]
    pub exclude_paths: Option<Vec<String>>,
    /// Follow links to other domains
    #[serde(default)]
    pub allow_external: Option<bool>,
    /// Include images found on pages
    #[serde(default)]
    pub include_images: Option<bool>,
    /// Extraction depth: basic | advanced (default: basic)
    #[serde(default)]
    pub extract_depth: Option<String>,
    /// Output format: markdown | text (default: markdown)
    #[serde(default)]
    pub format: Option<String>,
}

/// Input for `tavily_map`.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct MapInput {
    /// Root http(s) URL
    pub url: String,
    /// Link depth from the root (1-5, default 1)
    #[serde(default)]
    pub max_depth: Option<u32>,
    /// Links followed per page (1-500, default 20)
    #[serde(default)]
    pub max_breadth: Option<u32>,
    /// Total pages before stopping (1-500, default 50)
    #[serde(default)]
    pub limit: Option<u32>,
    /// Natural-language guidance for which pages to list
    #[serde(default)]
    pub instructions: Option<String>,
    /// Regex path patterns to include
    #[serde(default)]
    pub select_paths: Option<Vec<String>>,
    /// Regex path patterns to exclude
    #[serde(default)]
    pub exclude_paths: Option<Vec<String>>,
    /// Follow links to other domains
    #[serde(default)]
    pub allow_external: Option<bool>,
}

/// Input for `tavily_health` (takes no parameters).
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct HealthInput {}

/// Input for `tavily_current_date` (takes no parameters).
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct CurrentDateInput {}

impl From<QnaInput> for SearchInput {
    fn from(i: QnaInput) -> Self {
        Self {
            query: i.query,
            search_depth: i.search_depth,
            topic: i.topic,
            ..Self::default()
        }
    }
}

impl From<NewsInput> for SearchInput {
    fn from(i: NewsInput) -> Self {
        Self {
            query: i.query,
            topic: Some("news".into()),
            days: i.days,
            max_results: i.max_results,
            search_depth: i.search_depth,
            include_domains: i.include_domains,
            exclude_domains: i.exclude_domains,
            ..Self::default()
        }
    }
}

impl From<VisualInput> for SearchInput {
    fn from(i: VisualInput) -> Self {
        Self {
            query: i.query,
            max_results: i.max_results,
            search_depth: i.search_depth,
            ..Self::default()
        }
    }
}

// ============================================================================
// Outputs
// ============================================================================

/// How a result was obtained.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct CallMeta {
    /// Fallback tier that succeeded (1 = original, 2 = reduced, 3 = minimal)
    pub tier: u8,
    /// Remote calls made, retries included
    pub attempts: u32,
    /// Wall time across all attempts
    pub elapsed_ms: u64,
    /// Estimated Tavily credits for the successful request
    pub credits_estimate: f64,
    /// When the result was produced
    pub retrieved_at: DateTime<Utc>,
}

impl CallMeta {
    fn fmt_line(&self) -> String {
        let mut line = format!(
            "Tier: {} | Attempts: {} | Elapsed: {}ms | Credits: ~{}",
            self.tier, self.attempts, self.elapsed_ms, self.credits_estimate
        );
        if self.tier > 1 {
            line.push_str(" | DEGRADED");
        }
        line
    }
}

/// A single search hit.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ResultItem {
    /// Page title
    pub title: String,
    /// Page URL
    pub url: String,
    /// Content snippet (up to 1000 characters)
    pub content: String,
    /// Relevance score (0.0-1.0)
    pub score: f64,
    /// Favicon URL (if requested)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    /// Cleaned page content (if requested)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
    /// Publication date (news)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
}

/// An image found by search.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ImageItem {
    /// Image URL
    pub url: String,
    /// Generated description (if requested)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Output of the search-backed tools.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SearchOutput {
    /// Query as sent to Tavily (after suffixes)
    pub query: String,
    /// Generated answer (if requested)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    /// Ranked results
    pub results: Vec<ResultItem>,
    /// Query-related images
    pub images: Vec<ImageItem>,
    /// How the result was obtained
    pub meta: CallMeta,
}

impl TextFormat for SearchOutput {
    fn fmt_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Query: {}", self.query);
        let _ = writeln!(out, "{}", self.meta.fmt_line());

        if let Some(answer) = &self.answer {
            let _ = write!(out, "\n--- Answer ---\n{answer}\n");
        }

        let _ = write!(out, "\n--- Results ({}) ---\n", self.results.len());
        for (i, r) in self.results.iter().enumerate() {
            let title = if r.title.is_empty() {
                "(untitled)"
            } else {
                &r.title
            };
            let _ = write!(out, "\n{}. {title}\n   {}\n", i + 1, r.url);
            if let Some(date) = &r.published_date {
                let _ = writeln!(out, "   Date: {date}");
            }
            let _ = writeln!(out, "   Score: {:.2}", r.score);
            if !r.content.is_empty() {
                let _ = writeln!(out, "   {}", r.content);
            }
        }

        if !self.images.is_empty() {
            let _ = write!(out, "\n--- Images ({}) ---\n", self.images.len());
            for img in &self.images {
                match &img.description {
                    Some(d) => {
                        let _ = writeln!(out, "- {} : {d}", img.url);
                    }
                    None => {
                        let _ = writeln!(out, "- {}", img.url);
                    }
                }
            }
        }
        out
    }
}

/// Output of `tavily_context`.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ContextOutput {
    /// Query the context was gathered for
    pub query: String,
    /// JSON array of `{url, content}` sources, bounded by the token budget
    pub context: String,
    /// Sources included in `context`
    pub sources: usize,
    /// Whether sources were dropped to fit the budget
    pub truncated: bool,
    /// Token budget applied
    pub max_tokens: u32,
    /// How the result was obtained
    pub meta: CallMeta,
}

impl TextFormat for ContextOutput {
    fn fmt_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Query: {}", self.query);
        let _ = writeln!(out, "{}", self.meta.fmt_line());
        let _ = write!(
            out,
            "Sources: {} | Budget: {} tokens",
            self.sources, self.max_tokens
        );
        if self.truncated {
            out.push_str(" | TRUNCATED");
        }
        out.push_str("\n\n--- Context ---\n");
        out.push_str(&self.context);
        out
    }
}

/// A page returned by extract or crawl.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct PageContent {
    /// Page URL
    pub url: String,
    /// Extracted content
    pub content: String,
    /// Images on the page (if requested)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    /// Favicon URL (if requested)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
}

/// A URL Tavily could not extract.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct FailedUrl {
    /// Page URL
    pub url: String,
    /// Reason reported by the API
    pub error: String,
}

/// Output of `tavily_extract`.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ExtractOutput {
    /// Extracted pages
    pub results: Vec<PageContent>,
    /// URLs that could not be extracted
    pub failed: Vec<FailedUrl>,
    /// How the result was obtained
    pub meta: CallMeta,
}

impl TextFormat for ExtractOutput {
    fn fmt_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.meta.fmt_line());
        for page in &self.results {
            let _ = write!(
                out,
                "\n--- {} ({} chars) ---\n{}\n",
                page.url,
                page.content.chars().count(),
                page.content
            );
        }
        if !self.failed.is_empty() {
            let _ = write!(out, "\n--- Failed ({}) ---\n", self.failed.len());
            for f in &self.failed {
                let _ = writeln!(out, "- {}: {}", f.url, f.error);
            }
        }
        out
    }
}

/// Output of `tavily_crawl`.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct CrawlOutput {
    /// Root URL
    pub base_url: String,
    /// Crawled pages
    pub pages: Vec<PageContent>,
    /// How the result was obtained
    pub meta: CallMeta,
}

impl TextFormat for CrawlOutput {
    fn fmt_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Crawl: {} ({} pages)", self.base_url, self.pages.len());
        let _ = writeln!(out, "{}", self.meta.fmt_line());
        for page in &self.pages {
            let _ = write!(out, "\n--- {} ---\n{}\n", page.url, page.content);
        }
        out
    }
}

/// Output of `tavily_map`.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct MapOutput {
    /// Root URL
    pub base_url: String,
    /// Discovered URLs
    pub urls: Vec<String>,
    /// How the result was obtained
    pub meta: CallMeta,
}

impl TextFormat for MapOutput {
    fn fmt_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Map: {} ({} urls)", self.base_url, self.urls.len());
        let _ = writeln!(out, "{}", self.meta.fmt_line());
        out.push('\n');
        for url in &self.urls {
            let _ = writeln!(out, "- {url}");
        }
        out
    }
}

/// Overall health verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    /// Probe succeeded quickly
    Healthy,
    /// Probe succeeded slowly, or hit a quota or timeout
    Degraded,
    /// Probe failed
    Unhealthy,
}

/// Output of `tavily_health`.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct HealthStatus {
    /// Verdict
    pub status: HealthState,
    /// Probe round-trip time
    pub response_time_ms: u64,
    /// What was observed
    pub diagnostics: String,
    /// What to do about it (empty when healthy)
    pub fix_suggestions: Vec<String>,
    /// Failure category when the probe failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    /// Remaining plan credits, when the API reports them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_credits: Option<u64>,
    /// When the probe ran
    pub checked_at: DateTime<Utc>,
}

impl TextFormat for HealthStatus {
    fn fmt_text(&self) -> String {
        let mut out = String::new();
        let status = match self.status {
            HealthState::Healthy => "HEALTHY",
            HealthState::Degraded => "DEGRADED",
            HealthState::Unhealthy => "UNHEALTHY",
        };
        let _ = writeln!(out, "Status: {status} ({}ms)", self.response_time_ms);
        if let Some(kind) = self.error_kind {
            let _ = writeln!(out, "Error: {kind}");
        }
        if let Some(credits) = self.remaining_credits {
            let _ = writeln!(out, "Remaining credits: {credits}");
        }
        let _ = writeln!(out, "{}", self.diagnostics);
        if !self.fix_suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &self.fix_suggestions {
                let _ = writeln!(out, "- {s}");
            }
        }
        out
    }
}

/// Output of `tavily_current_date`, in the server's local time zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct CurrentDateOutput {
    /// `YYYY-MM-DD`
    pub current_date: String,
    /// RFC 3339 timestamp with offset
    pub current_datetime: String,
    /// e.g. "Friday"
    pub day_of_week: String,
    /// e.g. "October 16, 2026"
    pub formatted_date: String,
    /// Calendar year
    pub year: i32,
    /// Month, 1-12
    pub month: u32,
    /// Day of month, 1-31
    pub day: u32,
}

impl CurrentDateOutput {
    /// Describe `now`.
    #[must_use]
    pub fn at<Tz: TimeZone>(now: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            current_date: now.format("%Y-%m-%d").to_string(),
            current_datetime: now.to_rfc3339(),
            day_of_week: now.format("%A").to_string(),
            formatted_date: now.format("%B %d, %Y").to_string(),
            year: now.year(),
            month: now.month(),
            day: now.day(),
        }
    }
}

impl TextFormat for CurrentDateOutput {
    fn fmt_text(&self) -> String {
        format!(
            "Today is {}, {} ({})\n{}",
            self.day_of_week, self.formatted_date, self.current_date, self.current_datetime
        )
    }
}
