use tavily_async::types::{SearchRequest, SearchResponse};

use super::{SNIPPET_CHARS, call_meta};
use crate::SearchTools;
use crate::credits;
use crate::error::ToolError;
use crate::fallback::Attempted;
use crate::fmt::trim_chars;
use crate::kind::SearchKind;
use crate::tier::search_ladder;
use crate::tool::ToolContext;
use crate::types::{ImageItem, ResultItem, SearchInput, SearchOutput};
use crate::validate::validate_search;

/// Run a search-backed tool.
pub async fn run_search(
    tools: &SearchTools,
    kind: SearchKind,
    input: SearchInput,
    ctx: &ToolContext,
) -> Result<SearchOutput, ToolError> {
    let req = validate_search(kind, input)?;
    execute(tools, kind, &req, ctx).await
}

/// Run the ladder for an already validated request.
pub(super) async fn execute(
    tools: &SearchTools,
    kind: SearchKind,
    req: &SearchRequest,
    ctx: &ToolContext,
) -> Result<SearchOutput, ToolError> {
    let ladder = search_ladder(kind, req);
    let attempted = tools
        .executor
        .run(kind.label(), tools.api.as_ref(), &ladder, ctx)
        .await?;
    let sent = &ladder[attempted.tier.index()];
    Ok(normalize(sent, attempted))
}

fn normalize(sent: &SearchRequest, attempted: Attempted<SearchResponse>) -> SearchOutput {
    let meta = call_meta(&attempted, credits::search(sent));
    let resp = attempted.value;

    let results = resp
        .results
        .into_iter()
        .map(|r| ResultItem {
            title: r.title,
            url: r.url,
            content: trim_chars(&r.content, SNIPPET_CHARS - 3),
            score: r.score,
            favicon: r.favicon,
            raw_content: r.raw_content,
            published_date: r.published_date,
        })
        .collect();

    let images = resp
        .images
        .iter()
        .map(|img| ImageItem {
            url: img.url().to_string(),
            description: img.description().map(str::to_string),
        })
        .collect();

    SearchOutput {
        query: if resp.query.is_empty() {
            sent.query.clone()
        } else {
            resp.query
        },
        answer: resp.answer.filter(|a| !a.trim().is_empty()),
        results,
        images,
        meta,
    }
}
