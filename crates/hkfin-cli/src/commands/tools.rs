//! Tool listing command

use std::path::Path;

use anyhow::Result;
use hkfin_server::HkFinanceMcpServer;

use super::{load_config, open_source};

/// `(name, description)` for every registered tool, sorted by name
pub fn tool_summaries(server: &HkFinanceMcpServer) -> Vec<(String, String)> {
    server
        .tools()
        .into_iter()
        .map(|tool| {
            let description = tool.description.map(|d| d.to_string()).unwrap_or_default();
            (tool.name.to_string(), description)
        })
        .collect()
}

pub fn cmd_tools(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let server = HkFinanceMcpServer::new(open_source(&config)?);
    let summaries = tool_summaries(&server);

    println!("🔧 {} tools\n", summaries.len());
    for (name, description) in summaries {
        println!("  {}", name);
        println!("      {}", description);
    }

    Ok(())
}
