pub mod config;
pub mod orchestrator;

pub use config::ChatConfig;
pub use orchestrator::{ChatOrchestrator, TRANSLATION_LABEL};
