//! Configuration for the conversation orchestrator.

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_CHAT_MODEL: &str = "shona-100K-final";
pub const DEFAULT_TRANSLATION_MODEL: &str = "translation-final";
pub const DEFAULT_MAX_LENGTH: u32 = 100;
pub const DEFAULT_TEMPERATURE: f32 = 0.8;

/// Sampling temperature bounds accepted by the backend.
pub const MIN_TEMPERATURE: f32 = 0.1;
pub const MAX_TEMPERATURE: f32 = 2.0;

/// Model selection and sampling parameters applied to every send.
#[derive(Clone, Debug)]
pub struct ChatConfig {
    /// Base URL of the model backend
    pub base_url: String,

    /// Model used for chat-mode generation
    pub chat_model_id: String,

    /// Model used for translate-mode sends
    pub translation_model_id: String,

    /// Maximum length of generated or translated output
    pub max_length: u32,

    /// Sampling temperature for generation
    pub temperature: f32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            chat_model_id: DEFAULT_CHAT_MODEL.to_string(),
            translation_model_id: DEFAULT_TRANSLATION_MODEL.to_string(),
            max_length: DEFAULT_MAX_LENGTH,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl ChatConfig {
    /// Set the backend base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("Backend base URL is required".to_string());
        }
        if self.chat_model_id.is_empty() || self.translation_model_id.is_empty() {
            return Err("Model ids are required".to_string());
        }
        if !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&self.temperature) {
            return Err(format!(
                "Temperature {} outside {}..={}",
                self.temperature, MIN_TEMPERATURE, MAX_TEMPERATURE
            ));
        }
        Ok(())
    }
}
