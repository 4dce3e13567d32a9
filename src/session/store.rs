//! Owns every session record. The conversation orchestrator is the only
//! writer of messages; everything else reads.

use super::types::{derive_title, Feedback, Message, Mode, Role, Session, SessionId};
use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Mapping of session identifiers to session records, newest created first.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Vec<Session>,
    active: Option<SessionId>,
    next_id: u64,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty session in the given mode and make it active.
    pub fn create_session(&mut self, mode: Mode) -> SessionId {
        let id = SessionId(self.next_id);
        self.next_id += 1;
        self.sessions.insert(0, Session::new(id, mode));
        self.active = Some(id);
        debug!(session_id = %id, ?mode, "session created");
        id
    }

    /// Remove a session. Clears the active pointer if it pointed there.
    /// Unknown ids are a no-op.
    pub fn delete_session(&mut self, id: SessionId) {
        self.sessions.retain(|s| s.id != id);
        if self.active == Some(id) {
            self.active = None;
        }
    }

    /// Merge-style mutation of one session, bumping `updated_at`. Unknown
    /// ids are a no-op.
    pub fn update_session(&mut self, id: SessionId, f: impl FnOnce(&mut Session)) {
        if let Some(session) = self.sessions.iter_mut().find(|s| s.id == id) {
            f(session);
            session.updated_at = Utc::now();
        }
    }

    /// Append a message to a session, deriving the title when this is the
    /// first user message. A message aimed at an id that no longer resolves
    /// is dropped; callers resolve the active session before composing.
    pub fn append_message(&mut self, id: SessionId, message: Message) {
        let Some(session) = self.sessions.iter_mut().find(|s| s.id == id) else {
            warn!(session_id = %id, "dropping message for unknown session");
            return;
        };

        session.messages.push(message);
        if session.messages.len() == 1 {
            let first = &session.messages[0];
            if first.role == Role::User {
                session.title = derive_title(&first.content);
            }
        }
        session.updated_at = Utc::now();
    }

    /// Record feedback on a message. Re-selecting the current value clears
    /// it back to absent.
    pub fn set_feedback(&mut self, session_id: SessionId, message_id: Uuid, feedback: Feedback) {
        let Some(session) = self.sessions.iter_mut().find(|s| s.id == session_id) else {
            return;
        };
        let Some(message) = session.messages.iter_mut().find(|m| m.id == message_id) else {
            return;
        };

        message.feedback = if message.feedback == Some(feedback) {
            None
        } else {
            Some(feedback)
        };
        session.updated_at = Utc::now();
    }

    /// Make an existing session active. Unknown ids are a no-op.
    pub fn set_active(&mut self, id: SessionId) {
        if self.sessions.iter().any(|s| s.id == id) {
            self.active = Some(id);
        }
    }

    pub fn active_id(&self) -> Option<SessionId> {
        self.active
    }

    pub fn active(&self) -> Option<&Session> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn get(&self, id: SessionId) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// All sessions, newest created first.
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
