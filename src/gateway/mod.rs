//! Boundary to the remote model backend. One request/response round trip
//! per call; no retry, no batching. Failures surface to the caller.

pub mod http;

pub use http::HttpGateway;

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub prompt: String,
    pub model_id: String,
    pub max_length: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    pub generated_text: String,
    pub inference_time_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranslateRequest {
    pub text: String,
    pub model_id: String,
    pub max_length: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslateResponse {
    pub translation: String,
    pub inference_time_ms: u64,
}

/// A 2xx transcribe response without the `transcription` field counts as
/// a failure, hence the Option here.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TranscribeResponse {
    pub transcription: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub device: String,
    pub loaded_models: u32,
}

/// The three remote operations the conversation core depends on.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse>;

    async fn translate(&self, request: TranslateRequest) -> Result<TranslateResponse>;

    /// Transcribe an encoded audio clip into text.
    async fn transcribe(&self, audio: Vec<u8>) -> Result<String>;
}
