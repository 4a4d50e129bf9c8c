//! Maps raw client failures to a [`ClassifiedError`].

use std::sync::Arc;

use tavily_async::TavilyError;

use crate::error::{ClassifiedError, ErrorKind};

/// Phrases Tavily and upstream proxies use for credit and rate limits.
const QUOTA_PHRASES: [&str; 6] = [
    "credit",
    "quota",
    "usage limit",
    "plan limit",
    "rate limit",
    "too many requests",
];

/// Classify a failed call. Total: anything unrecognized becomes `Unknown`.
#[must_use]
pub fn classify(err: TavilyError) -> ClassifiedError {
    let status = err.status();
    let message = match &err {
        TavilyError::Api(obj) if !obj.message.is_empty() => obj.message.clone(),
        other => other.to_string(),
    };
    let transient = matches!(&err, TavilyError::Connection { kind, .. } if kind.is_transient());
    let kind = kind_of(&err, status, &message);

    ClassifiedError {
        kind,
        message,
        status,
        transient,
        raw: Some(Arc::new(err)),
    }
}

fn kind_of(err: &TavilyError, status: Option<u16>, message: &str) -> ErrorKind {
    // Quota signals rank ahead of every other status.
    if matches!(status, Some(429 | 432 | 433)) || mentions_quota(message) {
        return ErrorKind::QuotaExceeded;
    }

    match status {
        Some(400 | 422) => return ErrorKind::ValidationError,
        Some(408 | 504) => return ErrorKind::TimeoutError,
        Some(401 | 403) => return ErrorKind::AuthenticationError,
        _ => {}
    }

    match err {
        TavilyError::Connection { .. } => ErrorKind::NetworkError,
        TavilyError::Timeout(_) => ErrorKind::TimeoutError,
        TavilyError::Reqwest(e) if e.is_timeout() => ErrorKind::TimeoutError,
        TavilyError::Reqwest(e) if e.is_connect() => ErrorKind::NetworkError,
        TavilyError::Config(_) => ErrorKind::AuthenticationError,
        _ => ErrorKind::Unknown,
    }
}

fn mentions_quota(message: &str) -> bool {
    let lower = message.to_lowercase();
    QUOTA_PHRASES.iter().any(|p| lower.contains(p))
}
