use tavily_async::types::ExtractResponse;

use super::call_meta;
use crate::SearchTools;
use crate::credits;
use crate::error::ToolError;
use crate::tier::extract_ladder;
use crate::tool::ToolContext;
use crate::types::{ExtractInput, ExtractOutput, FailedUrl, PageContent};
use crate::validate::validate_extract;

const TOOL: &str = "extract";

/// Extract page content from a list of URLs.
///
/// URLs dropped by a degraded tier are reported as failed rather than
/// silently missing.
pub async fn run_extract(
    tools: &SearchTools,
    input: ExtractInput,
    ctx: &ToolContext,
) -> Result<ExtractOutput, ToolError> {
    let req = validate_extract(input)?;
    let ladder = extract_ladder(&req);
    let attempted = tools
        .executor
        .run(TOOL, tools.api.as_ref(), &ladder, ctx)
        .await?;
    let sent = &ladder[attempted.tier.index()];
    let meta = call_meta(&attempted, credits::extract(sent));

    let skipped = req
        .urls
        .iter()
        .filter(|u| !sent.urls.contains(u))
        .map(|u| FailedUrl {
            url: u.clone(),
            error: format!("not attempted: dropped on fallback tier {}", meta.tier),
        });
    let (results, mut failed) = split(attempted.value);
    failed.extend(skipped);

    Ok(ExtractOutput {
        results,
        failed,
        meta,
    })
}

fn split(resp: ExtractResponse) -> (Vec<PageContent>, Vec<FailedUrl>) {
    let pages = resp
        .results
        .into_iter()
        .map(|r| PageContent {
            url: r.url,
            content: r.raw_content,
            images: r.images,
            favicon: r.favicon,
        })
        .collect();
    let failed = resp
        .failed_results
        .into_iter()
        .map(|f| FailedUrl {
            url: f.url,
            error: f.error.unwrap_or_else(|| "extraction failed".into()),
        })
        .collect();
    (pages, failed)
}
