//! MCP server handler backed by the search tool registry.

use std::collections::HashSet;
use std::sync::Arc;

use rmcp::model as m;
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler};
use search_tools::{ToolContext, ToolRegistry};
use tracing::{debug, warn};

/// Output mode for tool results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Formatted text only. Default.
    #[default]
    Text,
    /// Text plus `structured_content`; `list_tools` publishes output schemas.
    Structured,
}

/// MCP server handler over a [`ToolRegistry`].
///
/// Tool failures are returned as `is_error` results carrying the JSON error
/// payload, never as protocol errors. The request's cancellation token is
/// handed to the tool so a dropped call stops between tiers.
#[derive(Clone)]
pub struct RegistryServer {
    registry: Arc<ToolRegistry>,
    allowlist: Option<HashSet<String>>,
    output_mode: OutputMode,
    name: String,
    version: String,
}

impl RegistryServer {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            allowlist: None,
            output_mode: OutputMode::default(),
            name: "tavily-mcp".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Only tools in this list are visible and callable.
    pub fn with_allowlist(mut self, allowlist: impl IntoIterator<Item = String>) -> Self {
        self.allowlist = Some(allowlist.into_iter().collect());
        self
    }

    pub fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }

    pub fn with_info(mut self, name: &str, version: &str) -> Self {
        self.name = name.to_string();
        self.version = version.to_string();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    /// Registered tool names that pass the allowlist.
    pub fn effective_tool_names(&self) -> Vec<String> {
        self.registry
            .list_names()
            .into_iter()
            .filter(|n| self.is_allowed(n))
            .collect()
    }

    fn is_allowed(&self, name: &str) -> bool {
        self.allowlist.as_ref().is_none_or(|set| set.contains(name))
    }

    fn tool_descriptor(&self, name: String) -> Option<m::Tool> {
        let erased = self.registry.get(&name)?;
        let input_schema = serde_json::to_value(erased.input_schema())
            .ok()
            .and_then(|v| v.as_object().cloned())
            .unwrap_or_default();

        let output_schema = if self.output_mode == OutputMode::Structured {
            serde_json::to_value(erased.output_schema())
                .ok()
                .and_then(|v| v.as_object().cloned())
                .map(Arc::new)
        } else {
            None
        };

        Some(m::Tool {
            name: name.clone().into(),
            title: Some(name),
            description: Some(erased.description().into()),
            input_schema: Arc::new(input_schema),
            annotations: None,
            output_schema,
            icons: None,
            meta: None,
        })
    }
}

#[expect(clippy::manual_async_fn)]
impl ServerHandler for RegistryServer {
    fn initialize(
        &self,
        _params: m::InitializeRequestParam,
        _ctx: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<m::InitializeResult, m::ErrorData>> + Send + '_
    {
        async move {
            Ok(m::InitializeResult {
                server_info: m::Implementation {
                    name: self.name.clone(),
                    title: Some(self.name.clone()),
                    version: self.version.clone(),
                    website_url: None,
                    icons: None,
                },
                capabilities: m::ServerCapabilities::builder().enable_tools().build(),
                instructions: Some(
                    "Web search, extraction and crawling through Tavily. Start with tavily_qna for single factual questions; run tavily_health when calls fail."
                        .into(),
                ),
                ..Default::default()
            })
        }
    }

    fn list_tools(
        &self,
        _req: Option<m::PaginatedRequestParam>,
        _ctx: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<m::ListToolsResult, m::ErrorData>> + Send + '_
    {
        async move {
            let tools = self
                .effective_tool_names()
                .into_iter()
                .filter_map(|name| self.tool_descriptor(name))
                .collect();
            Ok(m::ListToolsResult {
                tools,
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn call_tool(
        &self,
        req: m::CallToolRequestParam,
        ctx: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<m::CallToolResult, m::ErrorData>> + Send + '_
    {
        async move {
            if !self.is_allowed(&req.name) {
                return Ok(m::CallToolResult::error(vec![m::Content::text(format!(
                    "Tool '{}' not enabled on this server",
                    req.name
                ))]));
            }

            debug!(tool = %req.name, "call_tool");
            let args = serde_json::Value::Object(req.arguments.unwrap_or_default());
            let tool_ctx = ToolContext::with_cancellation(ctx.ct.clone());

            match self
                .registry
                .dispatch_json_formatted(&req.name, args, &tool_ctx)
                .await
            {
                Ok(res) => {
                    let structured_content = (self.output_mode == OutputMode::Structured)
                        .then_some(res.data);
                    Ok(m::CallToolResult {
                        content: vec![m::Content::text(res.text)],
                        structured_content,
                        is_error: Some(false),
                        meta: None,
                    })
                }
                Err(e) => {
                    warn!(tool = %req.name, error = %e, "tool call failed");
                    let payload = serde_json::to_value(e.to_payload())
                        .unwrap_or_else(|_| serde_json::json!({ "message": e.to_string() }));
                    let text = serde_json::to_string_pretty(&payload)
                        .unwrap_or_else(|_| e.to_string());
                    Ok(m::CallToolResult {
                        content: vec![m::Content::text(text)],
                        structured_content: Some(payload),
                        is_error: Some(true),
                        meta: None,
                    })
                }
            }
        }
    }

    fn ping(
        &self,
        _ctx: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<(), m::ErrorData>> + Send + '_ {
        async { Ok(()) }
    }

    fn complete(
        &self,
        _req: m::CompleteRequestParam,
        _ctx: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<m::CompleteResult, m::ErrorData>> + Send + '_
    {
        async {
            Err(m::ErrorData::invalid_request(
                "Method not implemented",
                None,
            ))
        }
    }

    fn set_level(
        &self,
        _req: m::SetLevelRequestParam,
        _ctx: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<(), m::ErrorData>> + Send + '_ {
        async { Ok(()) }
    }

    fn get_prompt(
        &self,
        _req: m::GetPromptRequestParam,
        _ctx: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<m::GetPromptResult, m::ErrorData>> + Send + '_
    {
        async {
            Err(m::ErrorData::invalid_request(
                "Method not implemented",
                None,
            ))
        }
    }

    fn list_prompts(
        &self,
        _req: Option<m::PaginatedRequestParam>,
        _ctx: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<m::ListPromptsResult, m::ErrorData>> + Send + '_
    {
        async {
            Ok(m::ListPromptsResult {
                prompts: vec![],
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn list_resources(
        &self,
        _req: Option<m::PaginatedRequestParam>,
        _ctx: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<m::ListResourcesResult, m::ErrorData>> + Send + '_
    {
        async {
            Ok(m::ListResourcesResult {
                resources: vec![],
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn list_resource_templates(
        &self,
        _req: Option<m::PaginatedRequestParam>,
        _ctx: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<m::ListResourceTemplatesResult, m::ErrorData>>
    + Send
    + '_ {
        async {
            Ok(m::ListResourceTemplatesResult {
                resource_templates: vec![],
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn read_resource(
        &self,
        _req: m::ReadResourceRequestParam,
        _ctx: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<m::ReadResourceResult, m::ErrorData>> + Send + '_
    {
        async {
            Err(m::ErrorData::invalid_request(
                "Method not implemented",
                None,
            ))
        }
    }

    fn subscribe(
        &self,
        _req: m::SubscribeRequestParam,
        _ctx: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<(), m::ErrorData>> + Send + '_ {
        async {
            Err(m::ErrorData::invalid_request(
                "Method not implemented",
                None,
            ))
        }
    }

    fn unsubscribe(
        &self,
        _req: m::UnsubscribeRequestParam,
        _ctx: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<(), m::ErrorData>> + Send + '_ {
        async {
            Err(m::ErrorData::invalid_request(
                "Method not implemented",
                None,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::BoxFuture;
    use search_tools::ToolError;
    use search_tools::fmt::TextFormat;
    use search_tools::tool::Tool;

    #[derive(Clone)]
    struct EchoTool;

    #[derive(serde::Serialize, serde::Deserialize, schemars::JsonSchema)]
    struct EchoIn {
        message: String,
    }

    #[derive(serde::Serialize, schemars::JsonSchema)]
    struct EchoOut {
        message: String,
    }

    impl TextFormat for EchoOut {
        fn fmt_text(&self) -> String {
            format!("Echo: {}", self.message)
        }
    }

    impl Tool for EchoTool {
        type Input = EchoIn;
        type Output = EchoOut;
        const NAME: &'static str = "echo";
        const DESCRIPTION: &'static str = "echoes its input";

        fn call(
            &self,
            input: EchoIn,
            _ctx: &ToolContext,
        ) -> BoxFuture<'static, Result<EchoOut, ToolError>> {
            Box::pin(async move {
                Ok(EchoOut {
                    message: input.message,
                })
            })
        }
    }

    fn registry() -> Arc<ToolRegistry> {
        Arc::new(ToolRegistry::builder().register(EchoTool).finish())
    }

    #[test]
    fn allowlist_filters_tools() {
        let server = RegistryServer::new(registry())
            .with_allowlist(["tavily_qna".to_string(), "tavily_health".to_string()]);

        assert!(server.is_allowed("tavily_qna"));
        assert!(!server.is_allowed("echo"));
        assert!(server.effective_tool_names().is_empty());
    }

    #[test]
    fn no_allowlist_allows_everything() {
        let server = RegistryServer::new(registry());
        assert!(server.is_allowed("any_tool"));
        assert_eq!(server.effective_tool_names(), vec!["echo".to_string()]);
    }

    #[test]
    fn info_overrides_defaults() {
        let server = RegistryServer::new(registry()).with_info("my-server", "1.0.0");
        assert_eq!(server.name(), "my-server");
        assert_eq!(server.version(), "1.0.0");
    }

    #[test]
    fn output_schema_published_only_in_structured_mode() {
        let text = RegistryServer::new(registry());
        assert_eq!(text.output_mode(), OutputMode::Text);
        let tool = text.tool_descriptor("echo".into()).unwrap();
        assert!(tool.output_schema.is_none());
        assert!(tool.input_schema.contains_key("properties"));

        let structured = RegistryServer::new(registry()).with_output_mode(OutputMode::Structured);
        let tool = structured.tool_descriptor("echo".into()).unwrap();
        assert!(tool.output_schema.is_some());
    }

    #[test]
    fn unknown_tool_has_no_descriptor() {
        let server = RegistryServer::new(registry());
        assert!(server.tool_descriptor("missing".into()).is_none());
    }
}
