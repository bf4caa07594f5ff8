//! Server command implementation

use std::path::Path;

use anyhow::Result;

use super::{load_config, open_source};

pub async fn cmd_serve(config_path: Option<&Path>, http: bool, host: &str, port: u16) -> Result<()> {
    let config = load_config(config_path)?;
    let source = open_source(&config)?;

    if http {
        // stdout is free on the HTTP transport
        println!("🚀 Starting hkfin MCP server...");
        println!("   Listening: http://{}:{}/mcp", host, port);
        println!("   Health:    http://{}:{}/health", host, port);
        println!("   HKMA:      {}", config.hkma_base_url);
        println!();
        hkfin_server::start_mcp_server(source, host, port).await
    } else {
        hkfin_server::serve_stdio(source).await
    }
}
