//! Text formatting for tool outputs.
//!
//! Every tool output implements [`TextFormat`]; the MCP server sends the text
//! alongside the JSON data.

use serde_json::Value as JsonValue;

/// Human-readable rendering of a tool output.
pub trait TextFormat {
    /// Format the value as human-readable text.
    fn fmt_text(&self) -> String;
}

/// Pretty JSON, or compact JSON if pretty-printing fails.
#[must_use]
pub fn fallback_text_from_json(v: &JsonValue) -> String {
    serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string())
}

/// Trim a string to `max` characters, appending an ellipsis if truncated.
#[must_use]
pub fn trim_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
