//! Upstream source configuration
//!
//! ## Configuration Resolution
//!
//! Config is loaded in layers:
//! 1. Embedded defaults (compiled into binary from `config/sources.toml`)
//! 2. Override file (`--config` path, else ~/.local/share/hkfin/config.toml)
//! 3. Environment variables (`HKFIN_HKMA_BASE_URL`, `HKFIN_IRD_BASE_URL`,
//!    `HKFIN_AOF_BASE_URL`, `HKFIN_TIMEOUT_SECS`)
//!
//! Keys missing from the override file keep their embedded values.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/sources.toml");

pub const ENV_HKMA_BASE_URL: &str = "HKFIN_HKMA_BASE_URL";
pub const ENV_IRD_BASE_URL: &str = "HKFIN_IRD_BASE_URL";
pub const ENV_AOF_BASE_URL: &str = "HKFIN_AOF_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "HKFIN_TIMEOUT_SECS";

/// Effective configuration for upstream calls
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Hong Kong Monetary Authority API root
    pub hkma_base_url: String,
    /// Inland Revenue Department root (CSV datasets)
    pub ird_base_url: String,
    /// Hong Kong Academy of Finance API root
    pub aof_base_url: String,
    /// Default request timeout; individual datasets may override it
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hkma_base_url: "https://api.hkma.gov.hk".to_string(),
            ird_base_url: "https://www.ird.gov.hk".to_string(),
            aof_base_url: "https://www.aof.org.hk".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("hkfin/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Load config from the override path (or the default location) and the
    /// process environment
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let mut config = load_file(override_path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply environment overrides using the given lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_HKMA_BASE_URL).filter(|s| !s.is_empty()) {
            self.hkma_base_url = trim_base(&url);
        }
        if let Some(url) = lookup(ENV_IRD_BASE_URL).filter(|s| !s.is_empty()) {
            self.ird_base_url = trim_base(&url);
        }
        if let Some(url) = lookup(ENV_AOF_BASE_URL).filter(|s| !s.is_empty()) {
            self.aof_base_url = trim_base(&url);
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS).filter(|s| !s.is_empty()) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                Error::Config(format!("{} must be a whole number of seconds: {}", ENV_TIMEOUT_SECS, secs))
            })?;
            if secs == 0 {
                return Err(Error::Config(format!("{} must be greater than zero", ENV_TIMEOUT_SECS)));
            }
            self.timeout = Duration::from_secs(secs);
        }
        Ok(())
    }

    /// Render the effective config in the same TOML layout it is read from
    pub fn to_toml(&self) -> Result<String> {
        let raw = RawConfig {
            sources: Some(RawSources {
                hkma: Some(self.hkma_base_url.clone()),
                ird: Some(self.ird_base_url.clone()),
                aof: Some(self.aof_base_url.clone()),
            }),
            http: Some(RawHttp {
                timeout_secs: Some(self.timeout.as_secs()),
                user_agent: Some(self.user_agent.clone()),
            }),
        };
        toml::to_string_pretty(&raw).map_err(|e| Error::Config(format!("Failed to render config: {}", e)))
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("hkfin").join("config.toml"))
}

/// Load embedded defaults, then layer the override file on top if present
fn load_file(override_path: Option<&Path>) -> Result<Config> {
    let mut config = parse_config(DEFAULT_CONFIG, Config::default())?;

    let path = match override_path {
        Some(path) => {
            if !path.exists() {
                return Err(Error::Config(format!("Config file not found: {}", path.display())));
            }
            Some(path.to_path_buf())
        }
        None => default_config_path().filter(|p| p.exists()),
    };

    if let Some(path) = path {
        debug!("Loading config override from {}", path.display());
        let content = fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        config = parse_config(&content, config)?;
    }

    Ok(config)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize, Serialize)]
struct RawConfig {
    sources: Option<RawSources>,
    http: Option<RawHttp>,
}

#[derive(Debug, Deserialize, Serialize)]
struct RawSources {
    hkma: Option<String>,
    ird: Option<String>,
    aof: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
struct RawHttp {
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
}

/// Parse TOML content on top of `base`
fn parse_config(content: &str, base: Config) -> Result<Config> {
    let raw: RawConfig =
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = base;

    if let Some(sources) = raw.sources {
        if let Some(hkma) = sources.hkma {
            config.hkma_base_url = trim_base(&hkma);
        }
        if let Some(ird) = sources.ird {
            config.ird_base_url = trim_base(&ird);
        }
        if let Some(aof) = sources.aof {
            config.aof_base_url = trim_base(&aof);
        }
    }

    if let Some(http) = raw.http {
        if let Some(timeout) = http.timeout_secs {
            if timeout == 0 {
                return Err(Error::Config("timeout_secs must be greater than zero".into()));
            }
            config.timeout = Duration::from_secs(timeout);
        }
        if let Some(agent) = http.user_agent {
            config.user_agent = agent;
        }
    }

    Ok(config)
}

fn trim_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
