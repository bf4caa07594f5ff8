//! hkfin server
//!
//! Hosts the MCP tool registry over stdio or streamable HTTP.

use std::sync::Arc;

use axum::{routing::get, Json, Router};
use rmcp::{
    transport::{
        stdio,
        streamable_http_server::{session::local::LocalSessionManager, StreamableHttpService},
    },
    ServiceExt,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::info;

use hkfin_core::DataSource;

pub mod mcp;

pub use mcp::HkFinanceMcpServer;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Router serving the MCP endpoint at `/mcp` and a health check at `/health`
pub fn create_router(source: Arc<dyn DataSource>) -> Router {
    let service = StreamableHttpService::new(
        move || Ok(HkFinanceMcpServer::new(source.clone())),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    Router::new()
        .route("/health", get(health))
        .nest_service("/mcp", service)
        .layer(TraceLayer::new_for_http())
}

/// Start the MCP server over streamable HTTP on the given address
pub async fn start_mcp_server(source: Arc<dyn DataSource>, host: &str, port: u16) -> anyhow::Result<()> {
    info!("Starting MCP server at http://{}:{}/mcp", host, port);

    let router = create_router(source);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("MCP server ready at http://{}/mcp", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            // Wait for shutdown signal
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    info!("MCP server stopped");
    Ok(())
}

/// Serve MCP over stdin/stdout until the client disconnects
pub async fn serve_stdio(source: Arc<dyn DataSource>) -> anyhow::Result<()> {
    info!("Starting MCP server via stdio");

    let server = HkFinanceMcpServer::new(source).serve(stdio()).await?;
    let quit_reason = server.waiting().await?;

    info!("MCP server shut down: {:?}", quit_reason);
    Ok(())
}

#[cfg(test)]
mod tests;
