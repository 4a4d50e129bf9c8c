//! Shared types used across Tavily API endpoints

use serde::{Deserialize, Serialize};

/// Search depth; advanced costs 2 credits instead of 1
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    /// Fast, cheap search
    #[default]
    Basic,
    /// Deeper retrieval with better snippets
    Advanced,
}

impl SearchDepth {
    /// All variants in wire order
    pub const ALL: [Self; 2] = [Self::Basic, Self::Advanced];

    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Advanced => "advanced",
        }
    }
}

/// Search topic category
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    /// Broad web search
    #[default]
    General,
    /// Recent news; honors `days`
    News,
    /// Finance sources
    Finance,
    /// Health sources
    Health,
    /// Science sources
    Science,
    /// Travel sources
    Travel,
}

impl Topic {
    /// All variants in wire order
    pub const ALL: [Self; 6] = [
        Self::General,
        Self::News,
        Self::Finance,
        Self::Health,
        Self::Science,
        Self::Travel,
    ];

    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::News => "news",
            Self::Finance => "finance",
            Self::Health => "health",
            Self::Science => "science",
            Self::Travel => "travel",
        }
    }
}

/// Publication window filter
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    /// Past day
    Day,
    /// Past week
    Week,
    /// Past month
    Month,
    /// Past year
    Year,
}

impl TimeRange {
    /// All variants in wire order
    pub const ALL: [Self; 4] = [Self::Day, Self::Week, Self::Month, Self::Year];

    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

/// Extraction depth for `/extract` and `/crawl`
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExtractDepth {
    /// Main content only
    #[default]
    Basic,
    /// Tables and embedded content too; costs double
    Advanced,
}

impl ExtractDepth {
    /// All variants in wire order
    pub const ALL: [Self; 2] = [Self::Basic, Self::Advanced];

    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Advanced => "advanced",
        }
    }
}

/// Output format for extracted page content
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    /// Markdown
    #[default]
    Markdown,
    /// Plain text
    Text,
}

impl ContentFormat {
    /// All variants in wire order
    pub const ALL: [Self; 2] = [Self::Markdown, Self::Text];

    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Text => "text",
        }
    }
}

/// Quality of the generated answer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AnswerLevel {
    /// Short answer; what `true` means on the wire
    Basic,
    /// Longer, more detailed answer
    Advanced,
}

impl AnswerLevel {
    /// All variants in wire order
    pub const ALL: [Self; 2] = [Self::Basic, Self::Advanced];

    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Advanced => "advanced",
        }
    }
}

/// `include_answer`: a plain flag or an explicit answer level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum IncludeAnswer {
    /// `true` asks for a basic answer
    Flag(bool),
    /// Explicit level
    Level(AnswerLevel),
}

impl IncludeAnswer {
    /// Whether an answer is requested at all
    #[must_use]
    pub const fn is_on(self) -> bool {
        !matches!(self, Self::Flag(false))
    }

    /// Whether the advanced answer is requested
    #[must_use]
    pub const fn is_advanced(self) -> bool {
        matches!(self, Self::Level(AnswerLevel::Advanced))
    }

    /// The same request with an advanced answer lowered to basic
    #[must_use]
    pub const fn at_most_basic(self) -> Self {
        match self {
            Self::Level(AnswerLevel::Advanced) => Self::Level(AnswerLevel::Basic),
            other => other,
        }
    }
}

/// `include_raw_content`: a plain flag or an explicit output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum IncludeRawContent {
    /// `true` returns markdown
    Flag(bool),
    /// Explicit format
    Format(ContentFormat),
}

impl IncludeRawContent {
    /// Whether raw content is requested at all
    #[must_use]
    pub const fn is_on(self) -> bool {
        !matches!(self, Self::Flag(false))
    }
}

/// Credit usage reported by the API when `include_usage` is requested
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    /// Credits charged for the request
    #[serde(default)]
    pub credits: Option<f64>,
}
