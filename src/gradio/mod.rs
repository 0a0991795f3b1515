mod client;
mod sse;
mod types;

pub use client::{GradioClient, InferenceClient, space_url};
pub use sse::{SseEvent, parse_events};
pub use types::{AppConfig, CallRequest, CallResponse, FileData, TextTo3dRequest};
