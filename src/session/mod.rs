pub mod groups;
pub mod store;
pub mod types;

pub use groups::{group_sessions, RecencyBucket, SessionGroup};
pub use store::SessionStore;
pub use types::{Feedback, Message, Mode, Role, Session, SessionId};
