//! Runtime error taxonomy.
//!
//! Every variant is fatal at this layer: the engine has no in-loop retry or
//! fallback policy, so errors propagate to the process boundary carrying the
//! offending phase/handler/player id. Agent failures are never caught
//! internally.

use parlour_core::{ConfigError, PhaseError, PhaseKind, StateError};

use crate::agent::AgentError;
use crate::recorder::RecorderError;

/// Errors surfaced while driving a game.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Phase(#[from] PhaseError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Recorder(#[from] RecorderError),

    /// A phase names a handler the registry does not know.
    #[error("no handler registered under name `{name}`")]
    HandlerNotFound { name: String },

    /// An action phase omitted `handler` and no default is registered for
    /// its kind.
    #[error("no default handler registered for phase type `{kind}`")]
    DefaultHandlerNotFound { kind: PhaseKind },

    /// A handler was asked to collect player actions but does not implement
    /// that capability.
    #[error("handler `{name}` does not collect player actions")]
    HandlerCannotCollect { name: String },

    /// A handler found its phase configuration unusable.
    #[error("handler misconfiguration in phase `{phase_id}`: {message}")]
    HandlerMisconfigured { phase_id: String, message: String },

    /// A `single_player_action` phase needs exactly one active holder of the
    /// eligible role.
    #[error(
        "phase `{phase_id}`: expected exactly one eligible active player \
         with role `{role}`, found {found}"
    )]
    NoEligiblePlayer {
        phase_id: String,
        role: String,
        found: usize,
    },

    /// The phase-transition budget ran out, most likely a loop in the phase
    /// graph.
    #[error("phase budget exceeded: more than {limit} transitions without reaching game end")]
    PhaseBudgetExceeded { limit: u32 },

    /// The agent collaborator could not produce a valid parsed action.
    #[error("agent action failed for player `{player_id}` in phase `{phase_id}`: {source}")]
    Agent {
        phase_id: String,
        player_id: String,
        source: AgentError,
    },

    /// Builder misuse: no agent client was configured.
    #[error("no agent client configured")]
    AgentNotSet,
}
