//! Error types for the search tools.
//!
//! [`ClassifiedError`] is what the fallback executor reasons about;
//! [`ToolError`] is what a tool call returns to its caller.

use std::fmt;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tavily_async::TavilyError;
use thiserror::Error;

use crate::tier::Tier;

/// Failure category assigned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Credits exhausted, plan limit hit or rate limited
    QuotaExceeded,
    /// A parameter was rejected, locally or by the API
    ValidationError,
    /// The connection failed or dropped
    NetworkError,
    /// The request exceeded its planned timeout
    TimeoutError,
    /// Missing or rejected API key
    AuthenticationError,
    /// Anything else
    Unknown,
}

impl ErrorKind {
    /// Stable wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::QuotaExceeded => "quota_exceeded",
            Self::ValidationError => "validation_error",
            Self::NetworkError => "network_error",
            Self::TimeoutError => "timeout_error",
            Self::AuthenticationError => "authentication_error",
            Self::Unknown => "unknown",
        }
    }

    /// Whether this failure stops the fallback ladder immediately.
    ///
    /// A smaller request cannot fix a bad parameter or a bad key.
    #[must_use]
    pub const fn aborts_fallback(self) -> bool {
        matches!(self, Self::ValidationError | Self::AuthenticationError)
    }

    /// Operator-facing hint for this kind of failure.
    #[must_use]
    pub const fn remediation_hint(self) -> &'static str {
        match self {
            Self::QuotaExceeded => {
                "Tavily credits or rate limit exhausted: wait for the limit to reset, or upgrade the plan at app.tavily.com"
            }
            Self::ValidationError => "Fix the named parameter and call the tool again",
            Self::NetworkError => {
                "Check outbound connectivity to api.tavily.com (DNS, proxy, firewall)"
            }
            Self::TimeoutError => {
                "Reduce the request: fewer results, basic search_depth, no images or raw content"
            }
            Self::AuthenticationError => {
                "Check the API key: set TAVILY_API_KEY to a valid key (tvly-...)"
            }
            Self::Unknown => "Retry later; if it persists, check the server logs for the raw error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure with its category, created once per failed attempt.
#[derive(Debug, Clone, Error)]
#[error("{kind}{}: {message}", .status.map_or_else(String::new, |code| format!(" (HTTP {code})")))]
pub struct ClassifiedError {
    /// Category
    pub kind: ErrorKind,
    /// Human-readable message
    pub message: String,
    /// HTTP status, when the API answered
    pub status: Option<u16>,
    /// Connection dropped after it was established; worth one immediate retry
    pub transient: bool,
    /// The originating error, kept for diagnostics
    pub raw: Option<Arc<TavilyError>>,
}

impl ClassifiedError {
    /// Build a classified error without a raw source.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            transient: false,
            raw: None,
        }
    }

    /// Hint for this error's kind.
    #[must_use]
    pub const fn remediation_hint(&self) -> &'static str {
        self.kind.remediation_hint()
    }
}

/// Error returned by a tool call.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A parameter failed validation before any network call.
    #[error("invalid {field}: {message}")]
    Validation {
        /// Offending parameter
        field: String,
        /// What was wrong and what is allowed
        message: String,
    },

    /// The remote call failed and fallback could not recover.
    #[error("{error} (at tier {})", .tier.number())]
    Failed {
        /// Last classified failure
        error: ClassifiedError,
        /// Tier of the last attempt
        tier: Tier,
        /// Whether all three tiers were tried
        tiers_exhausted: bool,
    },

    /// The caller cancelled the request.
    #[error("request cancelled")]
    Cancelled,

    /// Internal error during tool execution.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal<S: ToString>(s: S) -> Self {
        Self::Internal(s.to_string())
    }

    /// Failure category, if the error has one.
    #[must_use]
    pub const fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Validation { .. } => Some(ErrorKind::ValidationError),
            Self::Failed { error, .. } => Some(error.kind),
            Self::Cancelled | Self::Internal(_) => None,
        }
    }

    /// Structured error object returned at the tool boundary.
    #[must_use]
    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            Self::Validation { field, message } => ErrorPayload {
                error_kind: ErrorKind::ValidationError.as_str().into(),
                message: message.clone(),
                remediation_hint: ErrorKind::ValidationError.remediation_hint().into(),
                field: Some(field.clone()),
                tier: None,
                tiers_exhausted: false,
            },
            Self::Failed {
                error,
                tier,
                tiers_exhausted,
            } => ErrorPayload {
                error_kind: error.kind.as_str().into(),
                message: error.message.clone(),
                remediation_hint: error.remediation_hint().into(),
                field: None,
                tier: Some(tier.number()),
                tiers_exhausted: *tiers_exhausted,
            },
            Self::Cancelled => ErrorPayload {
                error_kind: "cancelled".into(),
                message: self.to_string(),
                remediation_hint: "The caller cancelled the request; no results were kept".into(),
                field: None,
                tier: None,
                tiers_exhausted: false,
            },
            Self::Internal(msg) => ErrorPayload {
                error_kind: ErrorKind::Unknown.as_str().into(),
                message: msg.clone(),
                remediation_hint: ErrorKind::Unknown.remediation_hint().into(),
                field: None,
                tier: None,
                tiers_exhausted: false,
            },
        }
    }
}

/// Serialized form of a [`ToolError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ErrorPayload {
    /// Failure category (`validation_error`, `quota_exceeded`, ...)
    pub error_kind: String,
    /// Human-readable message
    pub message: String,
    /// What to do about it
    pub remediation_hint: String,
    /// Offending parameter for validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Tier of the last attempt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<u8>,
    /// Whether all three tiers were tried
    pub tiers_exhausted: bool,
}
