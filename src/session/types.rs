use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of characters kept when deriving a session title from
/// the first user message.
pub const TITLE_MAX_CHARS: usize = 50;

/// Marker appended to a derived title when the source content was longer
/// than [`TITLE_MAX_CHARS`].
pub const TITLE_TRUNCATION_MARKER: &str = "...";

/// Conversation mode. Fixed on a session at creation; the orchestrator's
/// current mode is selected independently per send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Chat,
    Translate,
}

impl Mode {
    /// Title a session starts with before the first user message names it.
    pub fn default_title(&self) -> &'static str {
        match self {
            Mode::Chat => "Mushandirapamwe Mutsva",
            Mode::Translate => "New Translation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// User-supplied quality signal on a message. Absent means no opinion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    Good,
    Bad,
}

/// Store-issued session identifier. Values increase with creation order,
/// so ids are unique and comparable by age.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SessionId(pub u64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    /// Raw translation, present only on assistant messages produced by a
    /// translate-mode send. `content` carries the labelled form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translated_content: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            translated_content: None,
            timestamp: Utc::now(),
            feedback: None,
        }
    }

    pub fn with_translation(mut self, translation: impl Into<String>) -> Self {
        self.translated_content = Some(translation.into());
        self
    }
}

/// A titled, mode-tagged, ordered conversation record. Messages only ever
/// append; nothing reorders or deletes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub title: String,
    pub mode: Mode,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub(crate) fn new(id: SessionId, mode: Mode) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: mode.default_title().to_string(),
            mode,
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Derive a session title from first-message content: the first
/// [`TITLE_MAX_CHARS`] characters, marked when anything was cut off.
pub(crate) fn derive_title(content: &str) -> String {
    let mut chars = content.char_indices();
    match chars.nth(TITLE_MAX_CHARS) {
        Some((byte_offset, _)) => {
            format!("{}{}", &content[..byte_offset], TITLE_TRUNCATION_MARKER)
        }
        None => content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_kept_when_short_enough() {
        assert_eq!(derive_title("Mhoro, makadini?"), "Mhoro, makadini?");
    }

    #[test]
    fn test_title_exactly_at_limit() {
        let content = "a".repeat(50);
        assert_eq!(derive_title(&content), content);
    }

    #[test]
    fn test_title_truncated_with_marker() {
        let content = "a".repeat(51);
        let title = derive_title(&content);
        assert_eq!(title, format!("{}...", "a".repeat(50)));
    }

    #[test]
    fn test_title_truncation_counts_chars_not_bytes() {
        // 51 multi-byte characters must truncate on a char boundary.
        let content = "ĉ".repeat(51);
        assert_eq!(derive_title(&content), format!("{}...", "ĉ".repeat(50)));
    }

    #[test]
    fn test_default_titles_per_mode() {
        assert_eq!(Mode::Chat.default_title(), "Mushandirapamwe Mutsva");
        assert_eq!(Mode::Translate.default_title(), "New Translation");
    }

    #[test]
    fn test_message_with_translation() {
        let msg = Message::new(Role::Assistant, "Translation: mhoro")
            .with_translation("mhoro");
        assert_eq!(msg.translated_content.as_deref(), Some("mhoro"));
        assert!(msg.feedback.is_none());
    }
}
