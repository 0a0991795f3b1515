use crate::gradio::TextTo3dRequest;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub request: TextTo3dRequest,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logs: LogsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Hosted app id in `owner/name` form
    #[serde(default = "default_space")]
    pub space: String,
    /// Overrides the URL derived from `space`
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub hf_token: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Where downloaded artifacts are cached before the move
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_destination")]
    pub destination: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            space: default_space(),
            base_url: None,
            hf_token: None,
            timeout_secs: None,
            download_dir: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            destination: default_destination(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_space() -> String {
    "hysts/Shap-E".to_string()
}

fn default_destination() -> PathBuf {
    PathBuf::from("models/model.glb")
}

fn default_log_level() -> String {
    "info".to_string()
}
