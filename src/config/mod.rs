mod types;

pub use types::*;

use crate::{Error, Result};
use std::env;
use std::path::Path;
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Loads the configuration.
///
/// `CONFIG_PATH` names a file that must exist. Without it, `config.yaml` is
/// read when present and the built-in defaults are used otherwise.
pub async fn load() -> Result<Config> {
    load_with(
        env::var("CONFIG_PATH").ok(),
        Path::new(DEFAULT_CONFIG_PATH),
        env::var("HF_TOKEN").ok(),
    )
    .await
}

async fn load_with(
    config_path: Option<String>,
    default_path: &Path,
    hf_token: Option<String>,
) -> Result<Config> {
    let mut config = match config_path {
        Some(path) => load_from(&path).await?,
        None if default_path.exists() => load_from(&default_path.to_string_lossy()).await?,
        None => {
            debug!("No configuration file found, using defaults");
            Config::default()
        }
    };

    apply_token(&mut config, hf_token);
    Ok(config)
}

/// A blank token in the file counts as unset and is filled from the
/// environment.
fn apply_token(config: &mut Config, env_token: Option<String>) {
    config.remote.hf_token = config
        .remote
        .hf_token
        .take()
        .filter(|t| !t.is_empty())
        .or_else(|| env_token.filter(|t| !t.is_empty()));
}

pub async fn load_from(path: &str) -> Result<Config> {
    debug!("Loading configuration from: {}", path);

    let config_str = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::config(format!("Failed to read {}: {}", path, e)))?;
    let config: Config = serde_yaml::from_str(&config_str)?;

    Ok(config)
}
