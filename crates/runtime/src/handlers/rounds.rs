//! Round progression.

use parlour_core::{GameState, RoundProgression};
use serde_json::Value;

use crate::error::EngineError;

use super::PhaseHandler;

/// Signals whether the game continues and advances `shared.current_round`.
///
/// Condition result: `true` while more rounds remain. Under `fixed`
/// progression that means the current round is still below `rounds.count`;
/// under `until_win_condition` the configured win trigger decides. The round
/// counter only advances when another round will actually be played, so at
/// game end `current_round` equals the number of rounds played.
pub struct RoundProgressionHandler;

impl PhaseHandler for RoundProgressionHandler {
    fn name(&self) -> &'static str {
        "round_progression"
    }

    fn process(&self, state: &mut GameState) -> Result<bool, EngineError> {
        let round = state.current_round();
        let rounds = state.config().rounds.clone();
        let remaining = match rounds.progression {
            RoundProgression::Fixed => round < rounds.count as u64,
            RoundProgression::UntilWinCondition => {
                match state.config().win_condition.trigger.as_str() {
                    "player_count_equals_one" => state.active_players().len() > 1,
                    other => {
                        return Err(EngineError::HandlerMisconfigured {
                            phase_id: state.current_phase().to_string(),
                            message: format!("unknown win-condition trigger `{other}`"),
                        });
                    }
                }
            }
        };

        if remaining {
            state
                .shared_mut()
                .insert("current_round".to_string(), Value::from(round + 1));
        }
        tracing::debug!(
            target: "runtime::handlers",
            round,
            remaining,
            "round check"
        );
        Ok(remaining)
    }
}
