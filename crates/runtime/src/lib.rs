//! Game runtime: engine loop, phase handlers, agents, and session recording.
//!
//! The runtime drives a [`parlour_core::GameState`] through the configured
//! phase graph. Everything is single-threaded and synchronous: phase handlers
//! run one after another, agent calls block the loop, and the session
//! recorder is the sole writer to its session directory. "Simultaneous"
//! phases are simulated by sequential iteration; only the collected result
//! set is simultaneous, never the execution.
//!
//! Construction follows the builder pattern: a validated configuration plus
//! an injected handler registry, agent client, and session recorder produce a
//! [`engine::GameEngine`], whose `run()` returns the session identity and the
//! final results document.

pub mod agent;
pub mod engine;
pub mod error;
pub mod events;
pub mod handlers;
pub mod recorder;
pub mod registry;

pub use agent::{ActionContext, AgentClient, AgentError, ConsoleAgent, MockAgent};
pub use engine::{EngineBuilder, GameEngine, GameReport};
pub use error::EngineError;
pub use events::EngineEvent;
pub use recorder::{
    ChatEntry, FileRecorder, LogRecord, MemoryRecorder, RecorderError, SessionRecorder,
};
pub use registry::HandlerRegistry;
