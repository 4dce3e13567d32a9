pub mod composer;
pub mod conversation;
pub mod gateway;
pub mod session;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum RunyoroError {
    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    #[error("Audio encoding error: {0}")]
    AudioEncodingError(String),

    #[error("Transcription error: {0}")]
    TranscriptionError(String),

    #[error("Backend error: {0}")]
    BackendError(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<reqwest::Error> for RunyoroError {
    fn from(e: reqwest::Error) -> Self {
        RunyoroError::BackendError(e.to_string())
    }
}

impl RunyoroError {
    /// Get a user-friendly description, falling back to a generic phrase
    /// when the underlying error carries no detail.
    pub fn user_message(&self) -> String {
        let detail = match self {
            RunyoroError::AudioDeviceError(s)
            | RunyoroError::AudioEncodingError(s)
            | RunyoroError::TranscriptionError(s)
            | RunyoroError::BackendError(s)
            | RunyoroError::MalformedResponse(s)
            | RunyoroError::ConfigError(s) => s,
        };

        if detail.trim().is_empty() {
            "Failed to process request. Please try again.".to_string()
        } else {
            detail.clone()
        }
    }
}

pub type Result<T> = std::result::Result<T, RunyoroError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_carries_detail() {
        let err = RunyoroError::BackendError("generate returned HTTP 500".into());
        assert_eq!(err.user_message(), "generate returned HTTP 500");
    }

    #[test]
    fn test_user_message_fallback_when_empty() {
        let err = RunyoroError::BackendError(String::new());
        assert_eq!(
            err.user_message(),
            "Failed to process request. Please try again."
        );
    }
}
