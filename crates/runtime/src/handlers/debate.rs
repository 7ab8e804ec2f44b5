//! Debate handlers: free-text statements and a single-judge verdict.

use parlour_core::{GameState, PlayerId};
use serde_json::Value;

use crate::agent::{ActionContext, AgentClient, AgentError};
use crate::error::EngineError;

use super::{PhaseHandler, agent_failure};

/// Collects a free-text statement from each debater and stores it in the
/// player's state bag under `statement` so later phases (the judge, peer
/// rebuttals) can read it back.
pub struct DebateStatementHandler;

impl PhaseHandler for DebateStatementHandler {
    fn name(&self) -> &'static str {
        "debate_statement"
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

        let statement = action.as_str().filter(|s| !s.is_empty()).ok_or_else(|| {
            agent_failure(
                &phase_id,
                player_id,
                AgentError::UnparseableResponse {
                    parser,
                    detail: "statement must be non-empty text".to_string(),
                },
            )
        })?;

        let statement = Value::from(statement);
        if let Some(player) = state.player_mut(player_id) {
            player
                .state
                .insert("statement".to_string(), statement.clone());
        }
        Ok(statement)
    }
}

/// Single-player judge phase: the verdict names the winning debater, written
/// to `shared.verdict` for the win-condition and downstream analysis.
pub struct DebateJudgeHandler;

impl PhaseHandler for DebateJudgeHandler {
    fn name(&self) -> &'static str {
        "debate_judge"
    }

    fn process_player(
        &self,
        state: &mut GameState,
        player_id: &PlayerId,
        agent: &mut dyn AgentClient,
    ) -> Result<Value, EngineError> {
        let phase_id = state.current_phase().to_string();

        // The judge sees every debater's stored statement as extra context.
        let statements: serde_json::Map<String, Value> = state
            .players()
            .iter()
            .filter(|p| &p.id != player_id)
            .filter_map(|p| {
                p.state
                    .get("statement")
                    .map(|s| (p.id.as_str().to_string(), s.clone()))
            })
            .collect();

        let ctx = ActionContext::resolve(state, player_id, &phase_id)
            .ok_or_else(|| EngineError::HandlerMisconfigured {
                phase_id: phase_id.clone(),
                message: "phase is not declared in configuration".to_string(),
            })?
            .with_extra(Value::Object(statements));
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
        let verdict = action
            .as_str()
            .ok_or_else(|| unparseable(format!("verdict must name a player, got {action}")))?;
        let target = PlayerId::new(verdict);
        if state.player(&target).is_none() || &target == player_id {
            return Err(unparseable(format!("`{verdict}` is not a valid verdict target")));
        }

        state
            .shared_mut()
            .insert("verdict".to_string(), action.clone());
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlour_core::{
        AssignmentRule, AssignmentTarget, GameConfig, GameMeta, PhaseConfig, PhaseKind,
        PlayerBounds, StateFieldConfig,
    };
    use serde_json::json;

    fn debate_state() -> GameState {
        let mut config = GameConfig {
            game: GameMeta {
                name: "debate".to_string(),
                description: String::new(),
            },
            players: PlayerBounds { min: 3, max: 3 },
            phases: vec![
                PhaseConfig::new("statement", PhaseKind::SimultaneousAction)
                    .with_handler("debate_statement")
                    .with_next_phase("verdict"),
                PhaseConfig::new("verdict", PhaseKind::SinglePlayerAction)
                    .with_handler("debate_judge")
                    .with_eligible_role("judge"),
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
        config.setup.assignments = vec![AssignmentRule {
            role: "judge".to_string(),
            target: AssignmentTarget::Player("player_3".to_string()),
        }];
        GameState::new(config, 0).unwrap()
    }

    #[test]
    fn statement_is_stored_on_the_player() {
        let mut state = debate_state();
        let player = PlayerId::seat(1);
        let mut agent = crate::agent::MockAgent::new().with_response(
            "statement",
            "player_1",
            1,
            json!("hear me out"),
        );

        let action = DebateStatementHandler
            .process_player(&mut state, &player, &mut agent)
            .unwrap();
        assert_eq!(action, json!("hear me out"));
        assert_eq!(
            state.player(&player).unwrap().state.get("statement"),
            Some(&json!("hear me out"))
        );
    }

    #[test]
    fn judge_verdict_lands_in_shared_state() {
        let mut state = debate_state();
        state.set_current_phase("verdict");
        let judge = PlayerId::seat(3);
        let mut agent = crate::agent::MockAgent::new().with_response(
            "verdict",
            "player_3",
            1,
            json!("player_2"),
        );

        DebateJudgeHandler
            .process_player(&mut state, &judge, &mut agent)
            .unwrap();
        assert_eq!(state.shared().get("verdict"), Some(&json!("player_2")));
    }

    #[test]
    fn judge_cannot_rule_for_themselves() {
        let mut state = debate_state();
        state.set_current_phase("verdict");
        let judge = PlayerId::seat(3);
        let mut agent = crate::agent::MockAgent::new().with_response(
            "verdict",
            "player_3",
            1,
            json!("player_3"),
        );

        assert!(matches!(
            DebateJudgeHandler.process_player(&mut state, &judge, &mut agent),
            Err(EngineError::Agent { .. })
        ));
    }
}
