//! Coordinates the session store, the composer, and the backend gateway:
//! one user message in, exactly one assistant message out per send.

use super::config::ChatConfig;
use crate::composer::{AudioCapture, Composer, RecordingState};
use crate::gateway::{GenerateRequest, ModelBackend, TranslateRequest};
use crate::session::{
    group_sessions, Feedback, Message, Mode, Role, SessionGroup, SessionId, SessionStore,
};
use crate::Result;
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

/// Prefix on the content of translate-mode assistant messages. The raw
/// translation also lives in `translated_content` so callers can render
/// it as its own block.
pub const TRANSLATION_LABEL: &str = "Translation: ";

/// Owns all conversation state behind a narrow interface: the session
/// store, the composer, the current mode, and the single-flight guard.
pub struct ChatOrchestrator<B: ModelBackend, C: AudioCapture> {
    store: SessionStore,
    composer: Composer<C>,
    backend: B,
    config: ChatConfig,
    mode: Mode,
    in_flight: bool,
}

impl<B: ModelBackend, C: AudioCapture> ChatOrchestrator<B, C> {
    pub fn new(backend: B, capture: C, config: ChatConfig) -> Self {
        Self {
            store: SessionStore::new(),
            composer: Composer::new(capture),
            backend,
            config,
            mode: Mode::Chat,
            in_flight: false,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn composer(&self) -> &Composer<C> {
        &self.composer
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Select the mode for subsequent sends. Past messages and each
    /// session's creation mode are untouched.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn set_temperature(&mut self, temperature: f32) {
        self.config.temperature = temperature;
    }

    /// Create a session in the given mode, make it active, and adopt that
    /// mode for subsequent sends.
    pub fn create_session(&mut self, mode: Mode) -> SessionId {
        self.mode = mode;
        self.store.create_session(mode)
    }

    pub fn delete_session(&mut self, id: SessionId) {
        self.store.delete_session(id);
    }

    pub fn select_session(&mut self, id: SessionId) {
        self.store.set_active(id);
    }

    pub fn set_feedback(&mut self, session_id: SessionId, message_id: Uuid, feedback: Feedback) {
        self.store.set_feedback(session_id, message_id, feedback);
    }

    /// Sessions bucketed by recency, filtered by title substring.
    pub fn grouped_sessions(&self, query: &str) -> Vec<SessionGroup<'_>> {
        group_sessions(self.store.sessions(), query, Utc::now())
    }

    pub fn draft(&self) -> &str {
        self.composer.draft()
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.composer.set_draft(text);
    }

    pub fn recording_state(&self) -> RecordingState {
        self.composer.state()
    }

    pub fn start_recording(&mut self) {
        self.composer.start_recording();
    }

    pub async fn stop_recording(&mut self) {
        self.composer.stop_recording(&self.backend).await;
    }

    /// Send the composer draft, clearing it only when the send is accepted.
    pub async fn send_draft(&mut self) {
        if self.composer.draft().trim().is_empty() || self.in_flight {
            return;
        }
        let draft = self.composer.take_draft();
        self.send(&draft).await;
    }

    /// Send one message in the current mode. Appends the user message
    /// immediately, then exactly one assistant message: the reply on
    /// success, or an error report on failure. Rejected while empty or
    /// while another send is in flight.
    pub async fn send(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            debug!("send rejected, empty input");
            return;
        }
        if self.in_flight {
            debug!("send rejected, another send is in flight");
            return;
        }

        let session_id = match self.store.active_id() {
            Some(id) => id,
            None => self.store.create_session(self.mode),
        };

        // Optimistic append: the user message is visible before the
        // backend responds.
        self.store
            .append_message(session_id, Message::new(Role::User, text));

        self.in_flight = true;
        self.composer.set_disabled(true);

        let outcome = self.dispatch(text).await;

        // Both arms run: the in-flight flag is never left set.
        let assistant = match outcome {
            Ok(message) => message,
            Err(e) => {
                info!("send failed: {}", e);
                Message::new(Role::Assistant, format!("Error: {}", e.user_message()))
            }
        };
        self.store.append_message(session_id, assistant);

        self.in_flight = false;
        self.composer.set_disabled(false);
    }

    async fn dispatch(&self, text: &str) -> Result<Message> {
        match self.mode {
            Mode::Chat => {
                let response = self
                    .backend
                    .generate(GenerateRequest {
                        prompt: text.to_string(),
                        model_id: self.config.chat_model_id.clone(),
                        max_length: self.config.max_length,
                        temperature: self.config.temperature,
                    })
                    .await?;
                debug!(
                    inference_time_ms = response.inference_time_ms,
                    "generate completed"
                );
                Ok(Message::new(Role::Assistant, response.generated_text))
            }
            Mode::Translate => {
                let response = self
                    .backend
                    .translate(TranslateRequest {
                        text: text.to_string(),
                        model_id: self.config.translation_model_id.clone(),
                        max_length: self.config.max_length,
                    })
                    .await?;
                debug!(
                    inference_time_ms = response.inference_time_ms,
                    "translate completed"
                );
                Ok(
                    Message::new(
                        Role::Assistant,
                        format!("{}{}", TRANSLATION_LABEL, response.translation),
                    )
                    .with_translation(response.translation),
                )
            }
        }
    }
}
