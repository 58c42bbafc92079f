use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

const CONFIG_PATH: &str = ".paddock/config.toml";

/// Environment variable holding the secret analysis webhook URL.
pub const WEBHOOK_URL_ENV: &str = "MAKE_WEBHOOK_URL";

/// Project-level paddock configuration from `.paddock/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Secret URL of the external analysis workflow.
    #[serde(default)]
    pub webhook_url: Option<String>,
}

/// Load configuration from `.paddock/config.toml` under `base_dir`.
///
/// Falls back to defaults if the file is missing.
pub fn load(base_dir: &Path) -> Result<Config> {
    let path = base_dir.join(CONFIG_PATH);
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents = std::fs::read_to_string(&path)?;
    let config: Config = toml::from_str(&contents)?;
    Ok(config)
}

/// Resolve the effective webhook URL: CLI flag, then environment, then config
/// file. Blank values are treated as unset.
pub fn resolve_webhook_url(
    cli: Option<String>,
    env: Option<String>,
    config: &Config,
) -> Option<String> {
    cli.or(env)
        .or_else(|| config.webhook_url.clone())
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
}

/// Read the webhook URL from the process environment.
pub fn webhook_url_from_env() -> Option<String> {
    std::env::var(WEBHOOK_URL_ENV)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
