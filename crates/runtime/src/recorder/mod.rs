//! Session recording.
//!
//! A session is the durable identity of one game run: a generated id
//! combining the game name and a start timestamp, owning an append-only
//! combined snapshot+event log, an append-only chat-interaction log, a copy
//! of the resolved configuration, and a single final results file. Records
//! are newline-delimited JSON, each stamped with the owning session id.
//! Exactly one in-process writer owns a session directory for its duration.

mod file;
mod memory;

pub use file::{FileRecorder, JsonlLog};
pub use memory::MemoryRecorder;

use parlour_core::{GameConfig, PlayerId, ResultsDocument, StateSnapshot};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::events::EngineEvent;

/// One record in the combined session log, discriminated by `record_type`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "record_type", rename_all = "snake_case")]
pub enum LogRecord {
    Snapshot {
        session_id: String,
        record_id: u64,
        snapshot: StateSnapshot,
    },
    Event {
        session_id: String,
        record_id: u64,
        timestamp: String,
        event: EngineEvent,
    },
}

/// One agent interaction in the chat log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub session_id: String,
    pub phase_id: String,
    pub player_id: PlayerId,
    pub model: Option<String>,
    pub prompt_template: String,
    pub parser: String,
    pub action: Value,
    pub timestamp: String,
}

/// Append-only persistence contract consumed by the engine.
///
/// `save_snapshot`/`save_event` return opaque record ids (their index in the
/// combined log). `save_results` is terminal: a session is never written to
/// after its results file exists.
pub trait SessionRecorder {
    fn session_id(&self) -> &str;

    /// Persist a copy of the resolved configuration.
    fn save_config(&mut self, config: &GameConfig) -> Result<(), RecorderError>;

    fn save_snapshot(&mut self, snapshot: &StateSnapshot) -> Result<u64, RecorderError>;

    fn save_event(&mut self, event: &EngineEvent) -> Result<u64, RecorderError>;

    fn save_chat(&mut self, entry: &ChatEntry) -> Result<(), RecorderError>;

    fn save_results(&mut self, results: &ResultsDocument) -> Result<(), RecorderError>;

    fn flush(&mut self) -> Result<(), RecorderError>;
}

/// Recorder failures.
#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("session directory already exists: {0}")]
    SessionAlreadyExists(String),

    #[error("results were already saved for session `{0}`")]
    ResultsAlreadySaved(String),
}

/// Generate a session id from the game name and a start timestamp.
pub(crate) fn generate_session_id(game_name: &str) -> String {
    let stamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    format!("{game_name}_{stamp}")
}

pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
