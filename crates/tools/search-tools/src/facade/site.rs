use super::call_meta;
use crate::SearchTools;
use crate::credits;
use crate::error::ToolError;
use crate::tier::{crawl_ladder, map_ladder};
use crate::tool::ToolContext;
use crate::types::{CrawlInput, CrawlOutput, MapInput, MapOutput, PageContent};
use crate::validate::{validate_crawl, validate_map};

/// Crawl a site from a root URL.
pub async fn run_crawl(
    tools: &SearchTools,
    input: CrawlInput,
    ctx: &ToolContext,
) -> Result<CrawlOutput, ToolError> {
    let req = validate_crawl(input)?;
    let ladder = crawl_ladder(&req);
    let attempted = tools
        .executor
        .run("crawl", tools.api.as_ref(), &ladder, ctx)
        .await?;
    let sent = &ladder[attempted.tier.index()];
    let meta = call_meta(&attempted, credits::crawl(sent));
    let resp = attempted.value;

    Ok(CrawlOutput {
        base_url: or_root(resp.base_url, &req.url),
        pages: resp
            .results
            .into_iter()
            .map(|r| PageContent {
                url: r.url,
                content: r.raw_content,
                images: r.images,
                favicon: r.favicon,
            })
            .collect(),
        meta,
    })
}

/// List the URLs of a site from a root URL.
pub async fn run_map(
    tools: &SearchTools,
    input: MapInput,
    ctx: &ToolContext,
) -> Result<MapOutput, ToolError> {
    let req = validate_map(input)?;
    let ladder = map_ladder(&req);
    let attempted = tools
        .executor
        .run("map", tools.api.as_ref(), &ladder, ctx)
        .await?;
    let sent = &ladder[attempted.tier.index()];
    let meta = call_meta(&attempted, credits::map(sent));
    let resp = attempted.value;

    Ok(MapOutput {
        base_url: or_root(resp.base_url, &req.url),
        urls: resp.results,
        meta,
    })
}

fn or_root(reported: String, root: &str) -> String {
    if reported.is_empty() {
        root.to_string()
    } else {
        reported
    }
}
