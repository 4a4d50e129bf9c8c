//! Streamable HTTP transport at `/mcp` with a `/health` liveness route.

use std::sync::Arc;

use anyhow::Context;
use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use rmcp::transport::StreamableHttpService;
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use secrecy::{ExposeSecret, SecretString};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::server::RegistryServer;

/// Build the router. When `bearer` is set, `/mcp` requires
/// `Authorization: Bearer <token>`; `/health` stays open.
pub fn router(server: RegistryServer, bearer: Option<SecretString>) -> Router {
    let service = StreamableHttpService::new(
        move || Ok(server.clone()),
        Arc::new(LocalSessionManager::default()),
        Default::default(),
    );

    let mcp = Router::new().nest_service("/mcp", service);
    let mcp = match bearer {
        Some(token) => mcp.layer(middleware::from_fn_with_state(
            Arc::new(token),
            require_bearer,
        )),
        None => mcp,
    };
    mcp.route("/health", get(health))
}

/// Bind and serve until ctrl-c.
pub async fn serve(
    server: RegistryServer,
    host: &str,
    port: u16,
    bearer: Option<SecretString>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {host}:{port}"))?;
    let addr = listener.local_addr()?;
    info!(auth = bearer.is_some(), "tavily-mcp listening on http://{addr}/mcp");

    axum::serve(listener, router(server, bearer))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("failed to listen for ctrl-c: {e}");
            }
        })
        .await
        .context("HTTP server error")?;

    info!("tavily-mcp HTTP server stopped");
    Ok(())
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "tavily-mcp",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn require_bearer(
    State(token): State<Arc<SecretString>>,
    req: Request,
    next: Next,
) -> Response {
    let presented = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if authorized(presented, token.expose_secret()) {
        next.run(req).await
    } else {
        warn!(path = %req.uri().path(), "rejected request without valid bearer token");
        (StatusCode::UNAUTHORIZED, "missing or invalid bearer token").into_response()
    }
}

fn authorized(header: Option<&str>, expected: &str) -> bool {
    header
        .and_then(|h| h.strip_prefix("Bearer "))
        .is_some_and(|t| t.trim() == expected)
}
