//! Prisoner's-dilemma handlers: per-player decision collection and the
//! automatic scoring phase that resolves each round from the payoff table.

use parlour_core::{GameState, PlayerId};
use serde_json::Value;

use crate::agent::{ActionContext, AgentClient, AgentError};
use crate::error::EngineError;

use super::{PhaseHandler, agent_failure, current_phase};

const COOPERATE: &str = "cooperate";
const DEFECT: &str = "defect";

/// Collects one `cooperate`/`defect` choice per player.
pub struct DilemmaDecisionHandler;

impl PhaseHandler for DilemmaDecisionHandler {
    fn name(&self) -> &'static str {
        "dilemma_decision"
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
        let parser = ctx.parser.clone();
        let action = agent
            .get_action(&ctx)
            .map_err(|e| agent_failure(&phase_id, player_id, e))?;

        match action.as_str() {
            Some(COOPERATE) | Some(DEFECT) => Ok(action),
            _ => Err(agent_failure(
                &phase_id,
                player_id,
                AgentError::UnparseableResponse {
                    parser,
                    detail: format!("expected `{COOPERATE}` or `{DEFECT}`, got {action}"),
                },
            )),
        }
    }
}

/// Automatic scoring: reads the decision phase's response map and applies the
/// configured payoff table to both players' score fields.
///
/// Phase params:
/// - `decision_phase` (default `decision`): whose responses to read.
/// - `payoff`: map from `{choice_a}_{choice_b}` to `[points_a, points_b]`,
///   defaulting to the classic 3/3, 5/0, 0/5, 1/1 table.
pub struct DilemmaScoringHandler;

impl DilemmaScoringHandler {
    fn payoff(params: &serde_json::Map<String, Value>, key: &str) -> Option<(i64, i64)> {
        if let Some(table) = params.get("payoff") {
            let entry = table.get(key)?;
            let a = entry.get(0)?.as_i64()?;
            let b = entry.get(1)?.as_i64()?;
            return Some((a, b));
        }
        match key {
            "cooperate_cooperate" => Some((3, 3)),
            "defect_cooperate" => Some((5, 0)),
            "cooperate_defect" => Some((0, 5)),
            "defect_defect" => Some((1, 1)),
            _ => None,
        }
    }
}

impl PhaseHandler for DilemmaScoringHandler {
    fn name(&self) -> &'static str {
        "dilemma_scoring"
    }

    fn process(&self, state: &mut GameState) -> Result<bool, EngineError> {
        let phase = current_phase(state)?;
        let phase_id = phase.id.clone();
        let params = phase.params.clone();
        let decision_phase = params
            .get("decision_phase")
            .and_then(Value::as_str)
            .unwrap_or("decision")
            .to_string();
        let score_field = state.config().win_condition.score_field.clone();

        let responses = state
            .shared()
            .get(&format!("{decision_phase}_responses"))
            .and_then(Value::as_object)
            .cloned()
            .ok_or_else(|| EngineError::HandlerMisconfigured {
                phase_id: phase_id.clone(),
                message: format!("no responses recorded for phase `{decision_phase}`"),
            })?;

        // Pairwise payoff is defined for the two-seat dilemma only.
        let pair: Vec<(PlayerId, String)> = state
            .active_players()
            .iter()
            .filter_map(|p| {
                responses
                    .get(p.id.as_str())
                    .and_then(Value::as_str)
                    .map(|choice| (p.id.clone(), choice.to_string()))
            })
            .collect();
        let [(first_id, first_choice), (second_id, second_choice)] = pair.as_slice() else {
            return Err(EngineError::HandlerMisconfigured {
                phase_id,
                message: format!(
                    "dilemma scoring needs exactly 2 responding players, found {}",
                    pair.len()
                ),
            });
        };

        let key = format!("{first_choice}_{second_choice}");
        let (first_points, second_points) =
            Self::payoff(&params, &key).ok_or_else(|| EngineError::HandlerMisconfigured {
                phase_id: phase_id.clone(),
                message: format!("payoff table has no entry for `{key}`"),
            })?;

        for (id, points) in [(first_id, first_points), (second_id, second_points)] {
            if let Some(player) = state.player_mut(id) {
                let current = player
                    .state
                    .get(&score_field)
                    .and_then(Value::as_i64)
                    .unwrap_or(0);
                player
                    .state
                    .insert(score_field.clone(), Value::from(current + points));
            }
        }

        tracing::debug!(
            target: "runtime::handlers",
            phase = %phase_id,
            outcome = %key,
            "applied payoff"
        );
        Ok(true)
    }
}
