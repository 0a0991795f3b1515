use async_trait::async_trait;
use shap_e_fetch::{
    Error, Result,
    gradio::{InferenceClient, TextTo3dRequest},
};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Mock inference client for testing
#[derive(Debug, Default)]
pub struct MockInferenceClient {
    pub requests: Arc<Mutex<Vec<TextTo3dRequest>>>,
    pub result: Option<PathBuf>,
    pub error: Option<String>,
}

impl MockInferenceClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_result(mut self, path: PathBuf) -> Self {
        self.result = Some(path);
        self
    }

    pub fn with_error(mut self, error: String) -> Self {
        self.error = Some(error);
        self
    }

    pub fn get_requests(&self) -> Vec<TextTo3dRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceClient for MockInferenceClient {
    async fn submit(&self, request: &TextTo3dRequest) -> Result<PathBuf> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(ref error) = self.error {
            return Err(Error::remote(error.clone()));
        }

        self.result
            .clone()
            .ok_or_else(|| Error::remote("No mock result configured"))
    }
}
