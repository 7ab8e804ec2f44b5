//! Generic agent-backed action collection.

use parlour_core::{GameState, PlayerId};
use serde_json::Value;

use crate::agent::{ActionContext, AgentClient};
use crate::error::EngineError;

use super::{PhaseHandler, agent_failure};

/// Default handler for action phases: resolve the phase's prompt/parser
/// configuration, delegate to the agent, and return the parsed action
/// unchanged. Registered as the default for all three action phase kinds.
pub struct AgentActionHandler;

impl PhaseHandler for AgentActionHandler {
    fn name(&self) -> &'static str {
        "agent_action"
    }

    fn process_player(
        &self,
        state: &mut GameState,
        player_id: &PlayerId,
        agent: &mut dyn AgentClient,
    ) -> Result<Value, EngineError> {
        let phase_id = state.current_phase().to_string();
        let ctx = ActionContext::resolve(state, player_id, &phase_id).ok_or_else(|| {
            EngineError::HandlerMisconfigured {
                phase_id: phase_id.clone(),
                message: "phase is not declared in configuration".to_string(),
            }
        })?;
        let action = agent
            .get_action(&ctx)
            .map_err(|e| agent_failure(&phase_id, player_id, e))?;
        tracing::debug!(
            target: "runtime::handlers",
            phase = %phase_id,
            player = %player_id,
            "collected action"
        );
        Ok(action)
    }
}
