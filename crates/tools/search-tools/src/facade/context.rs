use serde_json::{Value, json};

use super::search::execute;
use crate::SearchTools;
use crate::error::ToolError;
use crate::kind::SearchKind;
use crate::tool::ToolContext;
use crate::types::{ContextInput, ContextOutput, ResultItem};
use crate::validate::validate_context;

/// Rough characters per token used for the budget.
pub const CHARS_PER_TOKEN: usize = 4;

/// Search, then pack sources into a JSON context string within `max_tokens`.
pub async fn run_context(
    tools: &SearchTools,
    input: ContextInput,
    ctx: &ToolContext,
) -> Result<ContextOutput, ToolError> {
    let req = validate_context(input)?;
    let found = execute(tools, SearchKind::Context, &req.search, ctx).await?;
    let budget = req.max_tokens as usize * CHARS_PER_TOKEN;
    let (context, sources, truncated) = pack(&found.results, budget);

    Ok(ContextOutput {
        query: found.query,
        context,
        sources,
        truncated,
        max_tokens: req.max_tokens,
        meta: found.meta,
    })
}

/// Pack `{url, content}` objects in rank order until the next one would
/// push the serialized array over `budget` bytes.
fn pack(results: &[ResultItem], budget: usize) -> (String, usize, bool) {
    let mut packed: Vec<Value> = Vec::with_capacity(results.len());
    let mut encoded = String::from("[]");

    for r in results {
        packed.push(json!({ "url": r.url, "content": r.content }));
        let candidate = Value::Array(packed.clone()).to_string();
        if candidate.len() > budget {
            packed.pop();
            return (encoded, packed.len(), true);
        }
        encoded = candidate;
    }
    (encoded, packed.len(), false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(i: usize, content: &str) -> ResultItem {
        ResultItem {
            title: format!("T{i}"),
            url: format!("https://example.com/{i}"),
            content: content.into(),
            score: 0.5,
            favicon: None,
            raw_content: None,
            published_date: None,
        }
    }

    #[test]
    fn everything_fits_under_a_large_budget() {
        let results = vec![item(1, "alpha"), item(2, "beta")];
        let (ctx, n, truncated) = pack(&results, 16_000);
        assert_eq!(n, 2);
        assert!(!truncated);
        let parsed: Vec<Value> = serde_json::from_str(&ctx).unwrap();
        assert_eq!(parsed[1]["content"], "beta");
    }

    #[test]
    fn budget_drops_trailing_sources() {
        let results: Vec<ResultItem> = (0..5).map(|i| item(i, &"z".repeat(300))).collect();
        let (ctx, n, truncated) = pack(&results, 800);
        assert!(truncated);
        assert_eq!(n, 2);
        assert!(ctx.len() <= 800);
    }

    #[test]
    fn tiny_budget_yields_empty_array() {
        let (ctx, n, truncated) = pack(&[item(0, "long enough")], 10);
        assert_eq!(ctx, "[]");
        assert_eq!(n, 0);
        assert!(truncated);
    }
}
