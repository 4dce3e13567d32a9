use super::{
    GenerateRequest, GenerateResponse, HealthResponse, ModelBackend, TranscribeResponse,
    TranslateRequest, TranslateResponse,
};
use crate::{Result, RunyoroError};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// HTTP client for the model backend API.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    async fn post_json<Req, Resp>(&self, path: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.endpoint(path))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RunyoroError::BackendError(format!(
                "{} returned HTTP {}",
                path, status
            )));
        }

        response
            .json::<Resp>()
            .await
            .map_err(|e| RunyoroError::MalformedResponse(format!("{}: {}", path, e)))
    }

    /// Backend health probe, useful before the first send.
    pub async fn health(&self) -> Result<HealthResponse> {
        let response = self.client.get(self.endpoint("health")).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RunyoroError::BackendError(format!(
                "health returned HTTP {}",
                status
            )));
        }

        response
            .json::<HealthResponse>()
            .await
            .map_err(|e| RunyoroError::MalformedResponse(format!("health: {}", e)))
    }
}

#[async_trait]
impl ModelBackend for HttpGateway {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        debug!(model_id = %request.model_id, "dispatching generate");
        self.post_json("generate", &request).await
    }

    async fn translate(&self, request: TranslateRequest) -> Result<TranslateResponse> {
        debug!(model_id = %request.model_id, "dispatching translate");
        self.post_json("translate", &request).await
    }

    async fn transcribe(&self, audio: Vec<u8>) -> Result<String> {
        debug!(bytes = audio.len(), "dispatching transcribe");

        let part = Part::bytes(audio)
            .file_name("recording.wav")
            .mime_str("audio/wav")
            .map_err(|e| RunyoroError::BackendError(e.to_string()))?;
        let form = Form::new().part("audio", part);

        let response = self
            .client
            .post(self.endpoint("transcribe"))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RunyoroError::BackendError(format!(
                "transcribe returned HTTP {}",
                status
            )));
        }

        let body: TranscribeResponse = response
            .json()
            .await
            .map_err(|e| RunyoroError::MalformedResponse(format!("transcribe: {}", e)))?;

        body.transcription
            .ok_or_else(|| RunyoroError::TranscriptionError("No transcription returned".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let gateway = HttpGateway::new("http://localhost:8000/");
        assert_eq!(
            gateway.endpoint("generate"),
            "http://localhost:8000/api/generate"
        );
    }
}
