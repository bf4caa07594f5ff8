//! Config command

use std::path::Path;

use anyhow::Result;
use hkfin_core::config::default_config_path;

use super::load_config;

pub fn cmd_config(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;

    match (config_path, default_config_path()) {
        (Some(path), _) => println!("# Override: {}", path.display()),
        (None, Some(path)) if path.exists() => println!("# Override: {}", path.display()),
        (None, Some(path)) => println!("# No override file ({} not found)", path.display()),
        (None, None) => println!("# No override file"),
    }
    print!("{}", config.to_toml()?);

    Ok(())
}
