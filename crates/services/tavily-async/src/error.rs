use std::error::Error as _;
use std::fmt;
use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when using the Tavily API client
#[derive(Debug, Error)]
pub enum TavilyError {
    /// HTTP error that could not be attributed to a connection or timeout failure
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// The connection could not be established or was lost mid-request
    #[error("connection failed ({kind}): {message}")]
    Connection {
        /// What went wrong at the connection level
        kind: ConnectionFailure,
        /// Underlying error text
        message: String,
    },

    /// The request exceeded its timeout
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// API error returned by Tavily
    #[error("API error: {0}")]
    Api(ApiErrorObject),

    /// Configuration error (e.g., missing credentials)
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(String),
}

/// Connection-level failure categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionFailure {
    /// The remote host refused the connection
    Refused,
    /// Name resolution failed
    Dns,
    /// The connection was reset by the peer
    Reset,
    /// The connection was aborted locally
    Aborted,
    /// The connection closed before a full response arrived
    Closed,
    /// Any other failure while connecting
    Connect,
}

impl ConnectionFailure {
    /// Whether the failure happened after the connection was up.
    ///
    /// These are worth one immediate retry; connect-phase failures are not.
    #[must_use]
    pub const fn is_transient(self) -> bool {
        matches!(self, Self::Reset | Self::Aborted | Self::Closed)
    }
}

impl fmt::Display for ConnectionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Refused => "refused",
            Self::Dns => "dns",
            Self::Reset => "reset",
            Self::Aborted => "aborted",
            Self::Closed => "closed",
            Self::Connect => "connect",
        };
        f.write_str(s)
    }
}

/// API error object from Tavily
///
/// Tavily reports errors as `{"detail": {"error": "..."}}`; plain-text bodies are
/// kept verbatim (capped).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorObject {
    /// HTTP status code
    #[serde(default)]
    pub status_code: Option<u16>,
    /// Human-readable error message
    #[serde(default)]
    pub message: String,
    /// Error type string, when the body carries one
    #[serde(default)]
    pub error: Option<String>,
}

impl fmt::Display for ApiErrorObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(code) => write!(f, "{code}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl TavilyError {
    /// Maps a transport-level reqwest error, separating timeouts and connection
    /// failures from everything else.
    #[must_use]
    pub fn from_transport(e: reqwest::Error, timeout: Duration) -> Self {
        if e.is_timeout() {
            return Self::Timeout(timeout);
        }
        if let Some(kind) = connection_failure(&e) {
            return Self::Connection {
                kind,
                message: e.to_string(),
            };
        }
        Self::Reqwest(e)
    }

    /// HTTP status code attached to the error, if any
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(obj) => obj.status_code,
            Self::Reqwest(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

fn connection_failure(e: &reqwest::Error) -> Option<ConnectionFailure> {
    let mut source = e.source();
    while let Some(err) = source {
        if let Some(io) = err.downcast_ref::<std::io::Error>() {
            use std::io::ErrorKind;
            match io.kind() {
                ErrorKind::ConnectionRefused => return Some(ConnectionFailure::Refused),
                ErrorKind::ConnectionReset => return Some(ConnectionFailure::Reset),
                ErrorKind::ConnectionAborted => return Some(ConnectionFailure::Aborted),
                ErrorKind::BrokenPipe | ErrorKind::UnexpectedEof => {
                    return Some(ConnectionFailure::Closed);
                }
                _ => {}
            }
        }
        let text = err.to_string().to_lowercase();
        if text.contains("dns error") || text.contains("failed to lookup address") {
            return Some(ConnectionFailure::Dns);
        }
        source = err.source();
    }

    if e.is_connect() {
        Some(ConnectionFailure::Connect)
    } else if e.is_request() || e.is_body() {
        Some(ConnectionFailure::Closed)
    } else {
        None
    }
}

/// Maps a serde deserialization error to a `TavilyError` with context
#[must_use]
pub fn map_deser(e: &serde_json::Error, body: &[u8]) -> TavilyError {
    let snippet = String::from_utf8_lossy(&body[..body.len().min(400)]).to_string();
    TavilyError::Serde(format!("{e}: {snippet}"))
}

/// Deserializes an API error from the response body
///
/// Understands `{"detail": {"error": ...}}`, `{"detail": "..."}` and
/// `{"error": ...}` shapes, falling back to the (capped) raw body.
#[must_use]
pub fn deserialize_api_error(status: StatusCode, body: &[u8]) -> TavilyError {
    let status_code = Some(status.as_u16());

    if let Ok(v) = serde_json::from_slice::<serde_json::Value>(body) {
        let detail = v.get("detail");
        let message = detail
            .and_then(|d| d.get("error"))
            .and_then(serde_json::Value::as_str)
            .or_else(|| detail.and_then(serde_json::Value::as_str))
            .or_else(|| v.get("error").and_then(serde_json::Value::as_str))
            .or_else(|| v.get("message").and_then(serde_json::Value::as_str));
        if let Some(message) = message {
            return TavilyError::Api(ApiErrorObject {
                status_code,
                message: message.to_string(),
                error: status.canonical_reason().map(str::to_string),
            });
        }
    }

    // Plain text (or unknown JSON); cap body to avoid log/memory bloat
    TavilyError::Api(ApiErrorObject {
        status_code,
        message: String::from_utf8_lossy(&body[..body.len().min(400)]).into_owned(),
        error: Some(format!("http_{}", status.as_u16())),
    })
}
