use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Parameters of one text-to-3D generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextTo3dRequest {
    #[serde(default = "default_prompt")]
    pub prompt: String,
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_guidance_scale")]
    pub guidance_scale: f64,
    #[serde(default = "default_num_inference_steps")]
    pub num_inference_steps: u32,
    /// Endpoint selector, e.g. `/text-to-3d`
    #[serde(default = "default_api_name")]
    pub api_name: String,
}

impl TextTo3dRequest {
    /// Positional inputs in the order the endpoint declares them.
    pub fn data(&self) -> Vec<Value> {
        vec![
            json!(self.prompt),
            json!(self.seed),
            json!(self.guidance_scale),
            json!(self.num_inference_steps),
        ]
    }

    /// Route segment used in call URLs.
    pub fn route(&self) -> &str {
        self.api_name.trim_start_matches('/')
    }
}

impl Default for TextTo3dRequest {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            seed: 0,
            guidance_scale: default_guidance_scale(),
            num_inference_steps: default_num_inference_steps(),
            api_name: default_api_name(),
        }
    }
}

fn default_prompt() -> String {
    "show me a baby, as if from solaris".to_string()
}

fn default_guidance_scale() -> f64 {
    15.0
}

fn default_num_inference_steps() -> u32 {
    64
}

fn default_api_name() -> String {
    "/text-to-3d".to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct CallRequest {
    pub data: Vec<Value>,
    pub session_hash: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallResponse {
    pub event_id: String,
}

/// Subset of the app's `/config` document the client needs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api_prefix: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// A file produced by the remote app. Only the fields used to locate and
/// name the download are kept.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FileData {
    pub path: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub orig_name: Option<String>,
}

impl FileData {
    /// Accepts either a file object or a bare remote path.
    pub fn from_output(value: Value) -> Option<Self> {
        match value {
            Value::String(path) => Some(Self {
                path,
                url: None,
                orig_name: None,
            }),
            Value::Object(_) => serde_json::from_value(value).ok(),
            _ => None,
        }
    }

    /// Name the artifact is stored under locally.
    ///
    /// Always a single path component: directories in the server-supplied
    /// names are stripped, and `.`/`..` fall through to the next candidate.
    pub fn file_name(&self) -> String {
        self.orig_name
            .as_deref()
            .and_then(last_component)
            .or_else(|| last_component(&self.path))
            .unwrap_or_else(|| "output".to_string())
    }
}

fn last_component(name: &str) -> Option<String> {
    name.rsplit(['/', '\\'])
        .next()
        .filter(|part| !part.is_empty() && *part != "." && *part != "..")
        .map(str::to_string)
}
