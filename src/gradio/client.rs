use super::sse::parse_events;
use super::types::*;
use crate::{Error, Result, config::RemoteConfig};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Narrow capability the fetch step depends on: run one generation and
/// hand back a locally readable path to the produced artifact.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn submit(&self, request: &TextTo3dRequest) -> Result<PathBuf>;
}

/// Public URL of a hosted space given as `owner/name`.
///
/// Full URLs are returned unchanged.
pub fn space_url(space: &str) -> String {
    if space.starts_with("http://") || space.starts_with("https://") {
        return space.trim_end_matches('/').to_string();
    }

    let subdomain: String = space
        .chars()
        .map(|c| match c {
            '/' | '_' | '.' => '-',
            c => c.to_ascii_lowercase(),
        })
        .collect();

    format!("https://{}.hf.space", subdomain)
}

pub struct GradioClient {
    http: reqwest::Client,
    root: String,
    api_prefix: String,
    session_hash: String,
    download_dir: PathBuf,
}

impl GradioClient {
    /// Binds to the remote app and reads its API prefix from `/config`.
    pub async fn connect(config: RemoteConfig) -> Result<Self> {
        let root = config
            .base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| space_url(&config.space));

        let mut builder = reqwest::Client::builder();

        if let Some(token) = config.hf_token.as_deref().filter(|t| !t.is_empty()) {
            let mut headers = HeaderMap::new();
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| Error::config(format!("Invalid access token: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
            builder = builder.default_headers(headers);
        }

        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let http = builder.build()?;

        debug!("Connecting to remote app at {}", root);

        let response = http.get(format!("{}/config", root)).send().await?;
        let app_config: AppConfig = check_status(response, "Fetching app config")
            .await?
            .json()
            .await?;

        let api_prefix = normalize_prefix(app_config.api_prefix.as_deref().unwrap_or_default());

        info!(
            "Connected to {} (version: {}, api prefix: '{}')",
            root,
            app_config.version.as_deref().unwrap_or("unknown"),
            api_prefix
        );

        Ok(Self {
            http,
            root,
            api_prefix,
            session_hash: Uuid::new_v4().to_string(),
            download_dir: config
                .download_dir
                .unwrap_or_else(|| std::env::temp_dir().join("gradio")),
        })
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn api_prefix(&self) -> &str {
        &self.api_prefix
    }

    pub fn session_hash(&self) -> &str {
        &self.session_hash
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}/{}", self.root, self.api_prefix, path)
    }

    async fn start_call(&self, request: &TextTo3dRequest) -> Result<String> {
        let body = CallRequest {
            data: request.data(),
            session_hash: self.session_hash.clone(),
        };

        let response = self
            .http
            .post(self.api_url(&format!("call/{}", request.route())))
            .json(&body)
            .send()
            .await?;

        let call: CallResponse = check_status(response, "Submitting request")
            .await?
            .json()
            .await?;

        if !is_safe_event_id(&call.event_id) {
            return Err(Error::protocol(format!(
                "Refusing unsafe event id: {:?}",
                call.event_id
            )));
        }

        debug!("Request queued as event {}", call.event_id);
        Ok(call.event_id)
    }

    async fn await_output(&self, request: &TextTo3dRequest, event_id: &str) -> Result<Value> {
        let response = self
            .http
            .get(self.api_url(&format!("call/{}/{}", request.route(), event_id)))
            .send()
            .await?;

        let body = check_status(response, "Reading result stream")
            .await?
            .text()
            .await?;

        for event in parse_events(&body) {
            match event.event.as_str() {
                "complete" => {
                    let outputs: Value = serde_json::from_str(&event.data)?;
                    return match outputs {
                        Value::Array(mut items) if !items.is_empty() => Ok(items.swap_remove(0)),
                        other => Err(Error::protocol(format!(
                            "Expected a non-empty output list, got: {}",
                            other
                        ))),
                    };
                }
                "error" => return Err(Error::remote(error_message(&event.data))),
                other => debug!("Skipping '{}' event for {}", other, event_id),
            }
        }

        Err(Error::protocol(format!(
            "Result stream for event {} ended without completing",
            event_id
        )))
    }

    fn file_url(&self, file: &FileData) -> String {
        match file.url.as_deref() {
            Some(url) if url.starts_with('/') => format!("{}{}", self.root, url),
            Some(url) => url.to_string(),
            None => self.api_url(&format!("file={}", file.path)),
        }
    }

    async fn download(&self, file: &FileData, event_id: &str) -> Result<PathBuf> {
        let dir = self.download_dir.join(event_id);
        tokio::fs::create_dir_all(&dir).await?;
        let local_path = dir.join(file.file_name());

        let url = self.file_url(file);
        debug!("Downloading {} to {}", url, local_path.display());

        let response = self.http.get(&url).send().await?;
        let mut response = check_status(response, "Downloading artifact").await?;

        write_body(&mut response, &local_path).await?;
        Ok(local_path)
    }
}

#[async_trait]
impl InferenceClient for GradioClient {
    async fn submit(&self, request: &TextTo3dRequest) -> Result<PathBuf> {
        debug!(
            "Submitting '{}' to {} (seed: {}, guidance_scale: {}, steps: {})",
            request.prompt,
            request.api_name,
            request.seed,
            request.guidance_scale,
            request.num_inference_steps
        );

        let event_id = self.start_call(request).await?;
        let output = self.await_output(request, &event_id).await?;

        let file = FileData::from_output(output.clone()).ok_or_else(|| {
            Error::protocol(format!("Output is not a file: {}", output))
        })?;

        self.download(&file, &event_id).await
    }
}

async fn check_status(response: reqwest::Response, context: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(Error::remote(format!(
        "{} failed with HTTP {}: {}",
        context, status, body
    )))
}

async fn write_body(response: &mut reqwest::Response, path: &Path) -> Result<()> {
    let result = stream_to_file(response, path).await;
    discard_partial(path, result).await
}

async fn stream_to_file(response: &mut reqwest::Response, path: &Path) -> Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    Ok(())
}

/// Removes a half-written download so the cache never holds truncated files.
async fn discard_partial(path: &Path, result: Result<()>) -> Result<()> {
    if let Err(e) = &result {
        warn!("Download to {} failed, removing it: {}", path.display(), e);
        let _ = tokio::fs::remove_file(path).await;
    }
    result
}

/// Event ids become a directory name under the download cache, so they must
/// be a single plain path component.
fn is_safe_event_id(event_id: &str) -> bool {
    !event_id.is_empty()
        && event_id != "."
        && !event_id.contains("..")
        && !event_id.contains(['/', '\\'])
}

fn normalize_prefix(prefix: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        String::new()
    } else {
        format!("/{}", prefix)
    }
}

fn error_message(data: &str) -> String {
    match serde_json::from_str::<Value>(data) {
        Ok(Value::String(message)) => message,
        Ok(Value::Null) => "Remote app reported an error".to_string(),
        _ if data.trim().is_empty() => "Remote app reported an error".to_string(),
        _ => data.to_string(),
    }
}
