//! Deterministic mock agent for tests and offline runs.

use std::collections::BTreeMap;

use serde_json::Value;

use super::{ActionContext, AgentClient, AgentError};

/// Canned-response agent keyed by (phase id, player id, round).
///
/// The round is read from the game state at call time, so scripting a
/// five-round game means five entries per player per action phase. Missing
/// entries fail loudly with [`AgentError::NoScriptedResponse`]; the mock
/// never invents an action.
#[derive(Default)]
pub struct MockAgent {
    responses: BTreeMap<(String, String, u64), Value>,
}

impl MockAgent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script one response for a specific phase/player/round.
    pub fn with_response(
        mut self,
        phase_id: impl Into<String>,
        player_id: impl Into<String>,
        round: u64,
        action: Value,
    ) -> Self {
        self.responses
            .insert((phase_id.into(), player_id.into(), round), action);
        self
    }

    /// Script responses for rounds `1..=n` of a phase in one call.
    pub fn with_sequence(
        mut self,
        phase_id: impl Into<String>,
        player_id: impl Into<String>,
        actions: impl IntoIterator<Item = Value>,
    ) -> Self {
        let phase_id = phase_id.into();
        let player_id = player_id.into();
        for (index, action) in actions.into_iter().enumerate() {
            self.responses.insert(
                (phase_id.clone(), player_id.clone(), index as u64 + 1),
                action,
            );
        }
        self
    }
}

impl AgentClient for MockAgent {
    fn get_action(&mut self, ctx: &ActionContext<'_>) -> Result<Value, AgentError> {
        let round = ctx.state.current_round();
        let key = (
            ctx.phase_id.to_string(),
            ctx.player_id.as_str().to_string(),
            round,
        );
        self.responses
            .get(&key)
            .cloned()
            .ok_or_else(|| AgentError::NoScriptedResponse {
                phase_id: ctx.phase_id.to_string(),
                player_id: ctx.player_id.as_str().to_string(),
                round,
            })
    }
}
