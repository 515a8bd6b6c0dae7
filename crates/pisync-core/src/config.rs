use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// User configuration loaded from `~/.config/pisync/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PisyncConfig {
    /// Base URL of the sync endpoint, e.g. "http://pi:8000".
    pub endpoint_url: String,
    /// API key sent as `X-Api-Key` with each request; empty means no auth header.
    #[serde(default)]
    pub api_key: String,
}

impl Default for PisyncConfig {
    fn default() -> Self {
        Self {
            endpoint_url: "http://localhost:8000".to_string(),
            api_key: String::new(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pisync")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PisyncConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = PisyncConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: PisyncConfig = toml::from_str(&data)?;
    Ok(cfg)
}
