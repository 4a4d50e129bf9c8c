//! MCP server exposing Tavily search tools.
//!
//! Serves over stdio by default, or streamable HTTP with `--transport http`.
//! Every tool call runs through the validation, timeout planning and tiered
//! fallback in `search-tools`.

mod http;
mod server;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use rmcp::ServiceExt;
use rmcp::transport::stdio;
use search_config::LoggingConfig;
use search_tools::{SearchTools, build_registry};
use secrecy::SecretString;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::server::{OutputMode, RegistryServer};

#[derive(Parser, Debug)]
#[command(name = "tavily-mcp")]
#[command(about = "MCP server for Tavily web search with tiered fallback", version)]
struct Args {
    /// Transport to serve on
    #[arg(long, value_enum, default_value_t = Transport::Stdio)]
    transport: Transport,

    /// HTTP bind host (overrides config and MCP_HOST)
    #[arg(long)]
    host: Option<String>,

    /// HTTP bind port (overrides config and MCP_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// JSON config file path (default: ./tavily-mcp.json when present)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Comma-separated allowlist (case-insensitive). Example: tavily_qna,tavily_health
    #[arg(long, value_name = "NAMES")]
    allow: Option<String>,

    /// List available tools and exit
    #[arg(long)]
    list_tools: bool,

    /// Output mode: text | structured (default: text)
    #[arg(long, value_parser = ["text", "structured"])]
    output: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Transport {
    Stdio,
    Http,
}

/// stdout carries the stdio transport, so logs always go to stderr.
fn init_tracing(cfg: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if cfg.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn parse_allowlist(raw: &str) -> Option<HashSet<String>> {
    let set: HashSet<String> = raw
        .split(',')
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect();
    (!set.is_empty()).then_some(set)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let loaded = search_config::load(args.config.as_deref(), Path::new("."))?;
    let mut config = loaded.config;
    init_tracing(&config.logging);

    if let Some(src) = &loaded.source {
        info!("loaded config from {}", src.display());
    }
    for w in &loaded.warnings {
        warn!("{w}");
    }

    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    // Tool names are static; listing them does not need a working key.
    let api_key = if args.list_tools {
        SecretString::from(String::new())
    } else {
        config.require_api_key()?
    };
    let reg = build_registry(Arc::new(SearchTools::tavily(&config, api_key)));

    if args.list_tools {
        let names = reg.list_names();
        eprintln!("Available tools ({}):", names.len());
        for n in names {
            eprintln!("  - {n}");
        }
        return Ok(());
    }

    let output_mode = match args.output.as_deref() {
        Some("structured") => OutputMode::Structured,
        _ => OutputMode::Text,
    };

    let mut server = RegistryServer::new(Arc::new(reg))
        .with_info("tavily-mcp", env!("CARGO_PKG_VERSION"))
        .with_output_mode(output_mode);
    if let Some(allow) = args.allow.as_deref().and_then(parse_allowlist) {
        for name in &allow {
            if !server.effective_tool_names().contains(name) {
                warn!("allowlist names unknown tool '{name}'");
            }
        }
        server = server.with_allowlist(allow);
    }

    info!(
        tools = server.effective_tool_names().len(),
        transport = ?args.transport,
        output = ?output_mode,
        "starting tavily-mcp"
    );

    match args.transport {
        Transport::Stdio => {
            let service = server
                .serve(stdio())
                .await
                .context("Failed to start stdio transport")?;
            service.waiting().await?;
        }
        Transport::Http => {
            http::serve(
                server,
                &config.server.host,
                config.server.port,
                config.server.bearer_token.clone(),
            )
            .await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowlist_is_trimmed_and_lowercased() {
        let set = parse_allowlist(" Tavily_QNA , tavily_health,,").unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("tavily_qna"));
        assert!(set.contains("tavily_health"));
    }

    #[test]
    fn empty_allowlist_means_no_filter() {
        assert!(parse_allowlist(" , ").is_none());
    }

    #[test]
    fn transport_defaults_to_stdio() {
        let args = Args::parse_from(["tavily-mcp"]);
        assert_eq!(args.transport, Transport::Stdio);

        let args = Args::parse_from(["tavily-mcp", "--transport", "http", "--port", "8080"]);
        assert_eq!(args.transport, Transport::Http);
        assert_eq!(args.port, Some(8080));
    }
}
