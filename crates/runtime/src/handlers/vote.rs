//! Elimination voting.

use std::collections::BTreeMap;

use parlour_core::{GameState, PlayerId};
use serde_json::Value;

use crate::agent::{ActionContext, AgentClient, AgentError};
use crate::error::EngineError;

use super::{PhaseHandler, agent_failure, current_phase};

/// Dual-capability handler for elimination votes.
///
/// As an action-phase handler it collects one vote per eligible player (the
/// target must name an active player and, unless `allow_self_vote` is set,
/// not the voter). Its whole-phase step then tallies the collected votes and
/// eliminates exactly one player: the sole vote leader, or a tie-break pick
/// among the leaders. Never zero, never more than one.
///
/// Phase params:
/// - `vote_phase`: phase id whose responses to tally (defaults to the
///   current phase, covering the collect-then-tally-in-one-phase layout).
/// - `tiebreaker`: `random` (seeded, default) or `first` (seating order).
/// - `allow_self_vote`: default `false`.
pub struct EliminationVoteHandler;

impl PhaseHandler for EliminationVoteHandler {
    fn name(&self) -> &'static str {
        "elimination_vote"
    }

    fn process_player(
        &self,
        state: &mut GameState,
        player_id: &PlayerId,
        agent: &mut dyn AgentClient,
    ) -> Result<Value, EngineError> {
        let phase_id = state.current_phase().to_string();
        let allow_self_vote = current_phase(state)?
            .params
            .get("allow_self_vote")
            .and_then(Value::as_bool)
            .unwrap_or(false);

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

        let unparseable = |detail: String| {
            agent_failure(
                &phase_id,
                player_id,
                AgentError::UnparseableResponse {
                    parser: parser.clone(),
                    detail,
                },
            )
        };

        let target = action
            .as_str()
            .ok_or_else(|| unparseable(format!("vote target must be a player id, got {action}")))?;
        let target_id = PlayerId::new(target);
        if !state.player(&target_id).is_some_and(|p| p.is_active()) {
            return Err(unparseable(format!("`{target}` is not an active player")));
        }
        if !allow_self_vote && &target_id == player_id {
            return Err(unparseable("self-votes are not allowed".to_string()));
        }
        Ok(action)
    }

    fn process(&self, state: &mut GameState) -> Result<bool, EngineError> {
        let phase = current_phase(state)?;
        let phase_id = phase.id.clone();
        let vote_phase = phase
            .params
            .get("vote_phase")
            .and_then(Value::as_str)
            .unwrap_or(&phase_id)
            .to_string();
        let tiebreaker = phase
            .params
            .get("tiebreaker")
            .and_then(Value::as_str)
            .unwrap_or("random")
            .to_string();

        let responses = state
            .shared()
            .get(&format!("{vote_phase}_responses"))
            .and_then(Value::as_object)
            .cloned()
            .ok_or_else(|| EngineError::HandlerMisconfigured {
                phase_id: phase_id.clone(),
                message: format!("no votes recorded for phase `{vote_phase}`"),
            })?;

        let mut tally: BTreeMap<String, usize> = BTreeMap::new();
        for target in responses.values().filter_map(Value::as_str) {
            *tally.entry(target.to_string()).or_default() += 1;
        }
        let Some(max_votes) = tally.values().copied().max() else {
            return Err(EngineError::HandlerMisconfigured {
                phase_id,
                message: format!("vote phase `{vote_phase}` produced an empty tally"),
            });
        };

        // Leaders in seating order so `first` and the seeded pick are both
        // deterministic for a given state.
        let leaders: Vec<PlayerId> = state
            .players()
            .iter()
            .filter(|p| tally.get(p.id.as_str()).copied() == Some(max_votes))
            .map(|p| p.id.clone())
            .collect();

        if leaders.is_empty() {
            return Err(EngineError::HandlerMisconfigured {
                phase_id,
                message: "vote targets do not name any seated player".to_string(),
            });
        }

        let eliminated = match (tiebreaker.as_str(), leaders.as_slice()) {
            (_, [sole]) => sole.clone(),
            ("first", [first, ..]) => first.clone(),
            (_, several) => {
                let index = state
                    .rng_mut()
                    .pick_index(several.len())
                    .unwrap_or_default();
                several[index].clone()
            }
        };

        state.eliminate_player(&eliminated);
        tracing::info!(
            target: "runtime::handlers",
            phase = %phase_id,
            player = %eliminated,
            votes = max_votes,
            "eliminated by vote"
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlour_core::{
        GameConfig, GameMeta, PhaseConfig, PhaseKind, PlayerBounds, StateFieldConfig,
    };
    use serde_json::json;

    fn vote_state(tiebreaker: &str) -> GameState {
        let mut config = GameConfig {
            game: GameMeta {
                name: "vote".to_string(),
                description: String::new(),
            },
            players: PlayerBounds { min: 4, max: 4 },
            phases: vec![
                PhaseConfig::new("vote", PhaseKind::SimultaneousAction)
                    .with_handler("elimination_vote")
                    .with_param("tiebreaker", json!(tiebreaker)),
            ],
            state: Default::default(),
            rounds: Default::default(),
            setup: Default::default(),
            win_condition: Default::default(),
            agents: Default::default(),
            engine: Default::default(),
        };
        config
            .state
            .shared_state
            .push(StateFieldConfig::new("current_round", json!(1)));
        GameState::new(config, 99).unwrap()
    }

    fn record_votes(state: &mut GameState, votes: &[(&str, &str)]) {
        let responses: BTreeMap<PlayerId, Value> = votes
            .iter()
            .map(|(voter, target)| (PlayerId::new(*voter), json!(target)))
            .collect();
        state.set_action_responses("vote", &responses);
    }

    #[test]
    fn clear_majority_eliminates_the_leader() {
        let mut state = vote_state("random");
        record_votes(
            &mut state,
            &[
                ("player_1", "player_3"),
                ("player_2", "player_3"),
                ("player_3", "player_1"),
                ("player_4", "player_3"),
            ],
        );

        assert!(EliminationVoteHandler.process(&mut state).unwrap());
        assert!(!state.player(&PlayerId::seat(3)).unwrap().is_active());
        assert_eq!(state.active_players().len(), 3);
    }

    #[test]
    fn two_two_tie_eliminates_exactly_one_leader() {
        let mut state = vote_state("random");
        record_votes(
            &mut state,
            &[
                ("player_1", "player_2"),
                ("player_2", "player_1"),
                ("player_3", "player_2"),
                ("player_4", "player_1"),
            ],
        );

        assert!(EliminationVoteHandler.process(&mut state).unwrap());
        let eliminated: Vec<&PlayerId> = state
            .players()
            .iter()
            .filter(|p| !p.is_active())
            .map(|p| &p.id)
            .collect();
        assert_eq!(eliminated.len(), 1);
        let loser = eliminated[0].as_str();
        assert!(loser == "player_1" || loser == "player_2");
    }

    #[test]
    fn first_tiebreaker_is_seating_order() {
        let mut state = vote_state("first");
        record_votes(
            &mut state,
            &[
                ("player_1", "player_4"),
                ("player_2", "player_3"),
                ("player_3", "player_4"),
                ("player_4", "player_3"),
            ],
        );

        assert!(EliminationVoteHandler.process(&mut state).unwrap());
        assert!(!state.player(&PlayerId::seat(3)).unwrap().is_active());
        assert!(state.player(&PlayerId::seat(4)).unwrap().is_active());
    }

    #[test]
    fn vote_for_inactive_or_self_is_rejected() {
        let mut state = vote_state("random");
        state.eliminate_player(&PlayerId::seat(4));
        let voter = PlayerId::seat(1);

        let mut agent =
            crate::agent::MockAgent::new().with_response("vote", "player_1", 1, json!("player_4"));
        assert!(matches!(
            EliminationVoteHandler.process_player(&mut state, &voter, &mut agent),
            Err(EngineError::Agent { .. })
        ));

        let mut agent =
            crate::agent::MockAgent::new().with_response("vote", "player_1", 1, json!("player_1"));
        assert!(matches!(
            EliminationVoteHandler.process_player(&mut state, &voter, &mut agent),
            Err(EngineError::Agent { .. })
        ));
    }
}
