//! Phase handler plugins.
//!
//! A handler implements per-phase game logic. Two independent capabilities
//! exist: [`PhaseHandler::process`] runs a whole-phase side effect and yields
//! the condition signal for branching (used by `automatic` phases and as the
//! post-collection step of action phases), while
//! [`PhaseHandler::process_player`] collects one player's action (used by the
//! three action phase types). A handler may implement either or both; the
//! same registered name can back an action phase and a later automatic
//! resolution phase.
//!
//! Failure policy: a handler that cannot produce a valid action fails loudly
//! with a typed error. Handlers never log-and-return a placeholder.

mod collect;
mod debate;
mod dilemma;
mod rounds;
mod vote;

pub use collect::AgentActionHandler;
pub use debate::{DebateJudgeHandler, DebateStatementHandler};
pub use dilemma::{DilemmaDecisionHandler, DilemmaScoringHandler};
pub use rounds::RoundProgressionHandler;
pub use vote::EliminationVoteHandler;

use parlour_core::{GameState, PhaseConfig, PlayerId};
use serde_json::Value;

use crate::agent::AgentClient;
use crate::error::EngineError;

/// Capability contract for phase plugins.
pub trait PhaseHandler {
    /// Registered name, used in error reporting.
    fn name(&self) -> &'static str;

    /// Whole-phase side effect. The returned boolean is the condition signal
    /// consumed by conditional branching. Defaults to a no-op "continue".
    fn process(&self, _state: &mut GameState) -> Result<bool, EngineError> {
        Ok(true)
    }

    /// Collect one player's action, typically by delegating to the agent
    /// collaborator. Handlers that only implement whole-phase logic keep the
    /// default, which reports the capability gap as a fatal error.
    fn process_player(
        &self,
        _state: &mut GameState,
        _player_id: &PlayerId,
        _agent: &mut dyn AgentClient,
    ) -> Result<Value, EngineError> {
        Err(EngineError::HandlerCannotCollect {
            name: self.name().to_string(),
        })
    }
}

/// Current phase descriptor, for handlers reading their own params.
///
/// The engine keeps `state.current_phase` pointing at the running phase, so
/// a missing descriptor here means the state was driven outside the engine.
pub(crate) fn current_phase<'a>(state: &'a GameState) -> Result<&'a PhaseConfig, EngineError> {
    let phase_id = state.current_phase();
    state
        .config()
        .phase(phase_id)
        .ok_or_else(|| EngineError::Phase(parlour_core::PhaseError::PhaseNotFound {
            phase_id: phase_id.to_string(),
        }))
}

/// Wrap an agent failure with the offending phase/player ids.
pub(crate) fn agent_failure(
    phase_id: &str,
    player_id: &PlayerId,
    source: crate::agent::AgentError,
) -> EngineError {
    EngineError::Agent {
        phase_id: phase_id.to_string(),
        player_id: player_id.as_str().to_string(),
        source,
    }
}
