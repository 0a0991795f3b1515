use serde_json::{Value, json};
use shap_e_fetch::config::RemoteConfig;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a temporary directory for test files
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Write a fake artifact and return its path
pub async fn write_artifact(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    tokio::fs::write(&path, content)
        .await
        .expect("Failed to write artifact");
    path
}

/// Create `models/` under `root` and return the destination inside it
pub async fn create_models_dir(root: &Path) -> PathBuf {
    let models = root.join("models");
    tokio::fs::create_dir_all(&models)
        .await
        .expect("Failed to create models directory");
    models.join("model.glb")
}

/// Remote config pointing at a mock server
pub fn remote_config(base_url: &str, download_dir: &Path) -> RemoteConfig {
    RemoteConfig {
        base_url: Some(base_url.to_string()),
        download_dir: Some(download_dir.to_path_buf()),
        ..RemoteConfig::default()
    }
}

/// The positional data the default request must send
pub fn expected_call_data() -> Value {
    json!(["show me a baby, as if from solaris", 0, 15.0, 64])
}

/// A `complete` event carrying one file output
pub fn complete_stream(file: Value) -> String {
    format!(
        "event: generating\ndata: null\n\nevent: complete\ndata: {}\n\n",
        json!([file])
    )
}

pub const GLB_BYTES: &[u8] = b"glTF\x02\x00\x00\x00mock-model";

/// Sample configuration YAML for testing
pub const SAMPLE_CONFIG_YAML: &str = r#"
remote:
  space: "someone/Other-Space"
  timeout_secs: 120
  download_dir: "/tmp/shap-e-cache"

request:
  prompt: "a red chair"
  seed: 7
  guidance_scale: 12.5
  num_inference_steps: 32

output:
  destination: "out/chair.glb"

logs:
  level: "debug"
"#;

/// Invalid configuration YAML for testing error cases
pub const INVALID_CONFIG_YAML: &str = r#"
request:
  seed: "not-a-number"
"#;
