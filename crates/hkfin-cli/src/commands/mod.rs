//! CLI command implementations
//!
//! - `serve` - MCP server over stdio or streamable HTTP
//! - `tools` - List registered tools
//! - `fetch` - Run one dataset adapter and print its JSON
//! - `config` - Print the effective configuration

pub mod config;
pub mod fetch;
pub mod serve;
pub mod tools;

// Re-export command functions for main.rs
pub use config::*;
pub use fetch::*;
pub use serve::*;
pub use tools::*;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use hkfin_core::{Config, DataSource, HttpSource};

/// Load layered configuration, honouring an explicit `--config` path
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    Config::load(config_path).context("Failed to load configuration")
}

/// HTTP data source for the given config
pub fn open_source(config: &Config) -> Result<Arc<dyn DataSource>> {
    let source = HttpSource::new(config).context("Failed to build HTTP client")?;
    Ok(Arc::new(source))
}
