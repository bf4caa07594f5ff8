//! hkfin CLI - Hong Kong financial open data over MCP
//!
//! Usage:
//!   hkfin serve                 Serve MCP over stdio
//!   hkfin serve --http          Serve MCP over HTTP at /mcp
//!   hkfin tools                 List registered tools
//!   hkfin fetch hibor           Run one dataset and print JSON
//!   hkfin config                Print effective configuration

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // stdout carries MCP frames and fetch output, so logs go to stderr
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Serve { http, host, port } => {
            commands::cmd_serve(config_path, http, &host, port).await
        }
        Commands::Tools => commands::cmd_tools(config_path),
        Commands::Fetch { dataset } => commands::cmd_fetch(config_path, dataset).await,
        Commands::Config => commands::cmd_config(config_path),
    }
}
