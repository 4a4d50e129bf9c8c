//! Tool trait implementations and registry builder.

use std::sync::Arc;

use chrono::Local;
use futures::future::BoxFuture;

use crate::SearchTools;
use crate::error::ToolError;
use crate::facade;
use crate::kind::SearchKind;
use crate::tool::{Tool, ToolContext, ToolRegistry};
use crate::types::{
    ContextInput, ContextOutput, CrawlInput, CrawlOutput, CurrentDateInput, CurrentDateOutput,
    ExtractInput, ExtractOutput, HealthInput, HealthStatus, MapInput, MapOutput, NewsInput,
    QnaInput, SearchInput, SearchOutput, VisualInput,
};

/// Declares a tool struct holding the shared [`SearchTools`].
macro_rules! tool_struct {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone)]
        pub struct $name {
            tools: Arc<SearchTools>,
        }

        impl $name {
            /// Create the tool with shared state.
            #[must_use]
            pub const fn new(tools: Arc<SearchTools>) -> Self {
                Self { tools }
            }
        }
    };
}

// ============================================================================
// Search family
// ============================================================================

tool_struct!(
    /// Generic web search with every parameter exposed.
    TavilySearchTool
);

impl Tool for TavilySearchTool {
    type Input = SearchInput;
    type Output = SearchOutput;

    const NAME: &'static str = "tavily_search";
    const DESCRIPTION: &'static str = "Web search via Tavily. Supports topic, search_depth (basic=1 credit, advanced=2), chunks_per_source, time_range, news days, start_date/end_date, country, domain filters, basic or advanced answers, images and raw content as markdown or text. Falls back to a smaller request when Tavily is over quota, slow or unreachable; meta.tier > 1 marks a degraded result.";

    fn call(
        &self,
        input: Self::Input,
        ctx: &ToolContext,
    ) -> BoxFuture<'static, Result<Self::Output, ToolError>> {
        let tools = Arc::clone(&self.tools);
        let ctx = ctx.clone();
        Box::pin(async move { facade::run_search(&tools, SearchKind::Search, input, &ctx).await })
    }
}

tool_struct!(
    /// Answer a question with an LLM-generated answer and three sources.
    TavilyQnaTool
);

impl Tool for TavilyQnaTool {
    type Input = QnaInput;
    type Output = SearchOutput;

    const NAME: &'static str = "tavily_qna";
    const DESCRIPTION: &'static str = "Ask a factual question and get a direct answer plus three supporting sources. Cheapest way to answer a single question (basic depth, ~0.6 credits).";

    fn call(
        &self,
        input: Self::Input,
        ctx: &ToolContext,
    ) -> BoxFuture<'static, Result<Self::Output, ToolError>> {
        let tools = Arc::clone(&self.tools);
        let ctx = ctx.clone();
        Box::pin(async move {
            facade::run_search(&tools, SearchKind::Qna, input.into(), &ctx).await
        })
    }
}

tool_struct!(
    /// Recent news within a day window.
    TavilyNewsTool
);

impl Tool for TavilyNewsTool {
    type Input = NewsInput;
    type Output = SearchOutput;

    const NAME: &'static str = "tavily_news";
    const DESCRIPTION: &'static str = "Search recent news articles. Results carry publication dates; days sets the window (default 7, max 365).";

    fn call(
        &self,
        input: Self::Input,
        ctx: &ToolContext,
    ) -> BoxFuture<'static, Result<Self::Output, ToolError>> {
        let tools = Arc::clone(&self.tools);
        let ctx = ctx.clone();
        Box::pin(async move {
            facade::run_search(&tools, SearchKind::News, input.into(), &ctx).await
        })
    }
}

tool_struct!(
    /// Image search with generated descriptions.
    TavilyImageSearchTool
);

impl Tool for TavilyImageSearchTool {
    type Input = VisualInput;
    type Output = SearchOutput;

    const NAME: &'static str = "tavily_image_search";
    const DESCRIPTION: &'static str = "Find images related to a query. Returns image URLs with generated descriptions plus the pages they came from.";

    fn call(
        &self,
        input: Self::Input,
        ctx: &ToolContext,
    ) -> BoxFuture<'static, Result<Self::Output, ToolError>> {
        let tools = Arc::clone(&self.tools);
        let ctx = ctx.clone();
        Box::pin(async move {
            facade::run_search(&tools, SearchKind::Image, input.into(), &ctx).await
        })
    }
}

tool_struct!(
    /// Diagram and illustration search.
    TavilyDiagramSearchTool
);

impl Tool for TavilyDiagramSearchTool {
    type Input = VisualInput;
    type Output = SearchOutput;

    const NAME: &'static str = "tavily_diagram_search";
    const DESCRIPTION: &'static str = "Find diagrams, charts and technical illustrations for a concept. Returns image URLs with descriptions.";

    fn call(
        &self,
        input: Self::Input,
        ctx: &ToolContext,
    ) -> BoxFuture<'static, Result<Self::Output, ToolError>> {
        let tools = Arc::clone(&self.tools);
        let ctx = ctx.clone();
        Box::pin(async move {
            facade::run_search(&tools, SearchKind::Diagram, input.into(), &ctx).await
        })
    }
}

tool_struct!(
    /// Sources packed into a token-bounded context string.
    TavilyContextTool
);

impl Tool for TavilyContextTool {
    type Input = ContextInput;
    type Output = ContextOutput;

    const NAME: &'static str = "tavily_context";
    const DESCRIPTION: &'static str = "Gather sources for a query and pack them into a JSON context string of {url, content} objects that fits within max_tokens (default 4000). Use for RAG-style grounding.";

    fn call(
        &self,
        input: Self::Input,
        ctx: &ToolContext,
    ) -> BoxFuture<'static, Result<Self::Output, ToolError>> {
        let tools = Arc::clone(&self.tools);
        let ctx = ctx.clone();
        Box::pin(async move { facade::run_context(&tools, input, &ctx).await })
    }
}

// ============================================================================
// Extract / crawl / map
// ============================================================================

tool_struct!(
    /// Extract page content from URLs.
    TavilyExtractTool
);

impl Tool for TavilyExtractTool {
    type Input = ExtractInput;
    type Output = ExtractOutput;

    const NAME: &'static str = "tavily_extract";
    const DESCRIPTION: &'static str = "Extract the main content of up to 20 web pages as markdown or text. URLs that could not be extracted are listed under failed.";

    fn call(
        &self,
        input: Self::Input,
        ctx: &ToolContext,
    ) -> BoxFuture<'static, Result<Self::Output, ToolError>> {
        let tools = Arc::clone(&self.tools);
        let ctx = ctx.clone();
        Box::pin(async move { facade::run_extract(&tools, input, &ctx).await })
    }
}

tool_struct!(
    /// Crawl a site and return page content.
    TavilyCrawlTool
);

impl Tool for TavilyCrawlTool {
    type Input = CrawlInput;
    type Output = CrawlOutput;

    const NAME: &'static str = "tavily_crawl";
    const DESCRIPTION: &'static str = "Crawl a website from a root URL and return the content of the pages found. Bound the crawl with max_depth, max_breadth and limit; guide it with instructions or path patterns.";

    fn call(
        &self,
        input: Self::Input,
        ctx: &ToolContext,
    ) -> BoxFuture<'static, Result<Self::Output, ToolError>> {
        let tools = Arc::clone(&self.tools);
        let ctx = ctx.clone();
        Box::pin(async move { facade::run_crawl(&tools, input, &ctx).await })
    }
}

tool_struct!(
    /// List the URLs of a site.
    TavilyMapTool
);

impl Tool for TavilyMapTool {
    type Input = MapInput;
    type Output = MapOutput;

    const NAME: &'static str = "tavily_map";
    const DESCRIPTION: &'static str = "Map a website's structure from a root URL and return the discovered URLs without page content.";

    fn call(
        &self,
        input: Self::Input,
        ctx: &ToolContext,
    ) -> BoxFuture<'static, Result<Self::Output, ToolError>> {
        let tools = Arc::clone(&self.tools);
        let ctx = ctx.clone();
        Box::pin(async move { facade::run_map(&tools, input, &ctx).await })
    }
}

// ============================================================================
// Health
// ============================================================================

tool_struct!(
    /// Probe the Tavily API and report health.
    TavilyHealthTool
);

impl Tool for TavilyHealthTool {
    type Input = HealthInput;
    type Output = HealthStatus;

    const NAME: &'static str = "tavily_health";
    const DESCRIPTION: &'static str = "Check that the Tavily API is reachable and the API key works. Reports healthy, degraded or unhealthy with response time and fix suggestions. Costs no credits.";

    fn call(
        &self,
        _input: Self::Input,
        ctx: &ToolContext,
    ) -> BoxFuture<'static, Result<Self::Output, ToolError>> {
        let tools = Arc::clone(&self.tools);
        let ctx = ctx.clone();
        Box::pin(async move { facade::run_health(&tools, &ctx).await })
    }
}

/// Today's date in the server's time zone. Makes no API call.
#[derive(Clone, Copy, Default)]
pub struct TavilyCurrentDateTool;

impl Tool for TavilyCurrentDateTool {
    type Input = CurrentDateInput;
    type Output = CurrentDateOutput;

    const NAME: &'static str = "tavily_current_date";
    const DESCRIPTION: &'static str = "Return today's date (ISO date, weekday, long form, year/month/day). Call before building time-bounded searches such as start_date/end_date or news windows. Costs no credits.";

    fn call(
        &self,
        _input: Self::Input,
        _ctx: &ToolContext,
    ) -> BoxFuture<'static, Result<Self::Output, ToolError>> {
        Box::pin(async { Ok(CurrentDateOutput::at(&Local::now())) })
    }
}

// ============================================================================
// Registry Builder
// ============================================================================

/// Build a [`ToolRegistry`] containing every Tavily tool.
#[must_use]
pub fn build_registry(tools: Arc<SearchTools>) -> ToolRegistry {
    ToolRegistry::builder()
        .register(TavilySearchTool::new(Arc::clone(&tools)))
        .register(TavilyQnaTool::new(Arc::clone(&tools)))
        .register(TavilyNewsTool::new(Arc::clone(&tools)))
        .register(TavilyImageSearchTool::new(Arc::clone(&tools)))
        .register(TavilyDiagramSearchTool::new(Arc::clone(&tools)))
        .register(TavilyContextTool::new(Arc::clone(&tools)))
        .register(TavilyExtractTool::new(Arc::clone(&tools)))
        .register(TavilyCrawlTool::new(Arc::clone(&tools)))
        .register(TavilyMapTool::new(Arc::clone(&tools)))
        .register(TavilyHealthTool::new(tools))
        .register(TavilyCurrentDateTool)
        .finish()
}
