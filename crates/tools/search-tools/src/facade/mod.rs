//! One entry point per tool kind: validate, plan, execute, normalize.

mod context;
mod extract;
mod health;
mod search;
mod site;

pub use context::run_context;
pub use extract::run_extract;
pub use health::{assess, run_health};
pub use search::run_search;
pub use site::{run_crawl, run_map};

use chrono::Utc;

use crate::fallback::Attempted;
use crate::types::CallMeta;

/// Longest snippet kept per search result, ellipsis included.
pub const SNIPPET_CHARS: usize = 1000;

fn call_meta<T>(attempted: &Attempted<T>, credits_estimate: f64) -> CallMeta {
    CallMeta {
        tier: attempted.tier.number(),
        attempts: attempted.attempts,
        elapsed_ms: attempted.elapsed.as_millis() as u64,
        credits_estimate,
        retrieved_at: Utc::now(),
    }
}
