//! Abstraction for sourcing player actions.
//!
//! Phase handlers plug in [`AgentClient`] implementations so a game can run
//! against LLM backends, scripted fixtures, or testing mocks. The engine only
//! sees the narrow "get an action for this player in this phase" contract;
//! prompt templating and response parsing live behind it.

mod console;
mod mock;

pub use console::ConsoleAgent;
pub use mock::MockAgent;

use parlour_core::{GameState, PlayerId};
use serde_json::Value;

/// Everything an agent needs to produce one action.
///
/// Prompt/parser/model identifiers are resolved from the configuration's
/// agent-integration section, falling back to the `default_{phase_type}`
/// template and `{phase_id}_parser` naming conventions when unspecified.
pub struct ActionContext<'a> {
    pub state: &'a GameState,
    pub player_id: &'a PlayerId,
    pub phase_id: &'a str,
    pub prompt_template: String,
    pub parser: String,
    pub system_prompt: Option<String>,
    pub model: Option<String>,
    /// Handler-supplied extra context (e.g. the statement being judged).
    pub extra: Option<Value>,
}

impl<'a> ActionContext<'a> {
    /// Resolve the agent-integration configuration for a phase/player pair.
    ///
    /// Returns `None` when the phase id is not declared; handlers treat that
    /// as a fatal misconfiguration.
    pub fn resolve(
        state: &'a GameState,
        player_id: &'a PlayerId,
        phase_id: &'a str,
    ) -> Option<Self> {
        let phase = state.config().phase(phase_id)?;
        let agents = &state.config().agents;
        Some(Self {
            state,
            player_id,
            phase_id,
            prompt_template: agents.prompt_template(phase_id, phase.kind),
            parser: agents.parser(phase_id),
            system_prompt: agents.system_prompt(phase_id).map(str::to_string),
            model: agents.model_for(player_id.as_str()).map(str::to_string),
            extra: None,
        })
    }

    pub fn with_extra(mut self, extra: Value) -> Self {
        self.extra = Some(extra);
        self
    }
}

/// Trait for producing one parsed action per request.
///
/// Implementations must raise rather than return an unparseable or ambiguous
/// value; the calling handler decides nothing silently. Calls are blocking:
/// a slow agent stalls the whole single-threaded loop by design.
pub trait AgentClient {
    fn get_action(&mut self, ctx: &ActionContext<'_>) -> Result<Value, AgentError>;
}

/// Failures of the agent collaborator.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    #[error("no response scripted for phase `{phase_id}`, player `{player_id}`, round {round}")]
    NoScriptedResponse {
        phase_id: String,
        player_id: String,
        round: u64,
    },

    #[error("parser `{parser}` could not extract a valid action: {detail}")]
    UnparseableResponse { parser: String, detail: String },

    #[error("backend request failed for model `{model}`: {detail}")]
    BackendFailure { model: String, detail: String },
}
