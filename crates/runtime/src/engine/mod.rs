//! Engine loop.
//!
//! [`GameEngine`] drives a [`GameState`] through the configured phase graph
//! until the terminal sentinel is reached: resolve the current phase's
//! handler, dispatch by phase kind, record responses, persist a snapshot,
//! then ask the pure controller for the next phase id. One snapshot is taken
//! after every phase, tagged with the phase that just completed.

use std::collections::BTreeMap;

use parlour_core::{
    GAME_END, GameConfig, GameState, PhaseConfig, PhaseKind, PlayerId, next_phase,
};
use serde_json::Value;

use crate::agent::{ActionContext, AgentClient, AgentError};
use crate::error::EngineError;
use crate::events::EngineEvent;
use crate::handlers::PhaseHandler;
use crate::recorder::{ChatEntry, MemoryRecorder, SessionRecorder};
use crate::registry::HandlerRegistry;

/// Outcome of a completed run.
#[derive(Clone, Debug)]
pub struct GameReport {
    pub session_id: String,
    pub results: parlour_core::ResultsDocument,
}

/// Builder for [`GameEngine`].
///
/// The configuration is required up front; registry and recorder have
/// defaults (the standard handler set, an in-memory recorder), the agent
/// client does not.
pub struct EngineBuilder {
    config: GameConfig,
    seed: u64,
    registry: Option<HandlerRegistry>,
    agent: Option<Box<dyn AgentClient>>,
    recorder: Option<Box<dyn SessionRecorder>>,
}

impl EngineBuilder {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            seed: 0,
            registry: None,
            agent: None,
            recorder: None,
        }
    }

    /// Seed for the deterministic random stream. Defaults to 0.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn registry(mut self, registry: HandlerRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn agent(mut self, agent: impl AgentClient + 'static) -> Self {
        self.agent = Some(Box::new(agent));
        self
    }

    pub fn recorder(mut self, recorder: impl SessionRecorder + 'static) -> Self {
        self.recorder = Some(Box::new(recorder));
        self
    }

    /// Validate the configuration and assemble the engine.
    pub fn build(self) -> Result<GameEngine, EngineError> {
        let agent = self.agent.ok_or(EngineError::AgentNotSet)?;
        let recorder = match self.recorder {
            Some(recorder) => recorder,
            None => Box::new(MemoryRecorder::new(&self.config.game.name)),
        };
        let state = GameState::new(self.config, self.seed)?;
        let session_id = recorder.session_id().to_string();
        Ok(GameEngine {
            state,
            registry: self.registry.unwrap_or_default(),
            agent: RecordingAgent::new(agent, session_id),
            recorder,
        })
    }
}

/// Wraps the user's agent client, buffering one [`ChatEntry`] per successful
/// interaction. The engine writes the buffer through to the recorder's chat
/// log after every player action, so entries survive a phase that aborts
/// mid-collection.
struct RecordingAgent {
    inner: Box<dyn AgentClient>,
    session_id: String,
    buffered: Vec<ChatEntry>,
}

impl RecordingAgent {
    fn new(inner: Box<dyn AgentClient>, session_id: String) -> Self {
        Self {
            inner,
            session_id,
            buffered: Vec::new(),
        }
    }

    fn drain(&mut self) -> Vec<ChatEntry> {
        std::mem::take(&mut self.buffered)
    }
}

impl AgentClient for RecordingAgent {
    fn get_action(&mut self, ctx: &ActionContext<'_>) -> Result<Value, AgentError> {
        let action = self.inner.get_action(ctx)?;
        self.buffered.push(ChatEntry {
            session_id: self.session_id.clone(),
            phase_id: ctx.phase_id.to_string(),
            player_id: ctx.player_id.clone(),
            model: ctx.model.clone(),
            prompt_template: ctx.prompt_template.clone(),
            parser: ctx.parser.clone(),
            action: action.clone(),
            timestamp: crate::recorder::now_rfc3339(),
        });
        Ok(action)
    }
}

/// Single-threaded synchronous game driver.
pub struct GameEngine {
    state: GameState,
    registry: HandlerRegistry,
    agent: RecordingAgent,
    recorder: Box<dyn SessionRecorder>,
}

impl GameEngine {
    pub fn builder(config: GameConfig) -> EngineBuilder {
        EngineBuilder::new(config)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Drive the game from the first phase to the terminal sentinel.
    pub fn run(mut self) -> Result<GameReport, EngineError> {
        let session_id = self.recorder.session_id().to_string();
        tracing::info!(
            target: "runtime::engine",
            session = %session_id,
            game = %self.state.config().game.name,
            "game starting"
        );

        self.recorder.save_config(self.state.config())?;
        self.recorder.save_event(&EngineEvent::GameStart {
            game: self.state.config().game.name.clone(),
            players: self.state.players().iter().map(|p| p.id.clone()).collect(),
        })?;
        let initial = self.state.take_snapshot(true);
        self.recorder.save_snapshot(&initial)?;

        let limit = self.state.config().engine.max_phase_transitions;
        let mut transitions: u32 = 0;
        while !self.state.is_game_over() {
            if transitions >= limit {
                return Err(EngineError::PhaseBudgetExceeded { limit });
            }
            transitions += 1;
            self.step()?;
        }

        let results = self.state.build_results()?;
        self.recorder.save_event(&EngineEvent::GameEnd {
            winner: results.winner.clone(),
            rounds_played: results.rounds_played,
        })?;
        self.recorder.save_results(&results)?;
        self.recorder.flush()?;
        tracing::info!(
            target: "runtime::engine",
            session = %session_id,
            winner = ?results.winner,
            "game over"
        );
        Ok(GameReport {
            session_id,
            results,
        })
    }

    /// Execute the current phase and advance to its successor.
    fn step(&mut self) -> Result<(), EngineError> {
        let phase = self
            .state
            .config()
            .phase(self.state.current_phase())
            .cloned()
            .ok_or_else(|| parlour_core::PhaseError::PhaseNotFound {
                phase_id: self.state.current_phase().to_string(),
            })?;
        let round = self.state.current_round();
        tracing::debug!(
            target: "runtime::engine",
            phase = %phase.id,
            kind = %phase.kind,
            round,
            "phase start"
        );
        self.recorder.save_event(&EngineEvent::PhaseStart {
            phase_id: phase.id.clone(),
            round,
        })?;

        let handler = match &phase.handler {
            Some(name) => self.registry.handler(name)?,
            None => self.registry.default_handler(phase.kind)?,
        };

        let condition = match phase.kind {
            PhaseKind::Automatic => handler.process(&mut self.state)?,
            PhaseKind::SimultaneousAction => {
                let eligible = self.eligible_players(&phase);
                self.collect_actions(&phase, handler.as_ref(), &eligible)?
            }
            PhaseKind::SequentialAction => {
                let eligible = self.eligible_players(&phase);
                self.collect_sequential(&phase, handler.as_ref(), &eligible)?
            }
            PhaseKind::SinglePlayerAction => {
                let role = phase.eligible_role.clone().ok_or_else(|| {
                    EngineError::HandlerMisconfigured {
                        phase_id: phase.id.clone(),
                        message: "single_player_action requires eligible_role".to_string(),
                    }
                })?;
                let eligible = self.eligible_players(&phase);
                if eligible.len() != 1 {
                    return Err(EngineError::NoEligiblePlayer {
                        phase_id: phase.id.clone(),
                        role,
                        found: eligible.len(),
                    });
                }
                self.collect_actions(&phase, handler.as_ref(), &eligible)?
            }
        };

        self.recorder.save_event(&EngineEvent::PhaseEnd {
            phase_id: phase.id.clone(),
            round: self.state.current_round(),
            condition,
        })?;
        let snapshot = self.state.take_snapshot(false);
        self.recorder.save_snapshot(&snapshot)?;

        let next = next_phase(self.state.config(), &phase.id, condition)?.to_string();
        if next == GAME_END {
            self.state.set_game_over();
        } else {
            self.state.set_current_phase(next);
        }
        Ok(())
    }

    /// Active players eligible for a phase, in seating order.
    fn eligible_players(&self, phase: &PhaseConfig) -> Vec<PlayerId> {
        self.state
            .active_players()
            .into_iter()
            .filter(|p| match &phase.eligible_role {
                Some(role) => p.has_role(role),
                None => true,
            })
            .map(|p| p.id.clone())
            .collect()
    }

    /// Collect one action per eligible player, then run the handler's
    /// post-collection step.
    fn collect_actions(
        &mut self,
        phase: &PhaseConfig,
        handler: &dyn PhaseHandler,
        eligible: &[PlayerId],
    ) -> Result<bool, EngineError> {
        let mut responses = BTreeMap::new();
        for player_id in eligible {
            let action = self.player_action(phase, handler, player_id)?;
            responses.insert(player_id.clone(), action);
        }
        self.state.set_action_responses(&phase.id, &responses);
        handler.process(&mut self.state)
    }

    /// Sequential variant: later players can observe earlier responses, and
    /// shared state tracks which seat is up.
    fn collect_sequential(
        &mut self,
        phase: &PhaseConfig,
        handler: &dyn PhaseHandler,
        eligible: &[PlayerId],
    ) -> Result<bool, EngineError> {
        let mut responses = BTreeMap::new();
        for (index, player_id) in eligible.iter().enumerate() {
            let action = self.player_action(phase, handler, player_id)?;
            responses.insert(player_id.clone(), action);
            self.state
                .shared_mut()
                .insert("current_player_index".to_string(), Value::from(index + 1));

            // Interim visibility: partial responses land in shared state so
            // the next player's prompt can include them.
            let partial: serde_json::Map<String, Value> = responses
                .iter()
                .map(|(id, a)| (id.as_str().to_string(), a.clone()))
                .collect();
            self.state
                .shared_mut()
                .insert(format!("{}_responses", phase.id), Value::Object(partial));
            if phase.snapshot_per_action {
                let snapshot = self.state.take_snapshot(false);
                self.recorder.save_snapshot(&snapshot)?;
            }
        }
        self.state
            .shared_mut()
            .insert("current_player_index".to_string(), Value::from(0));
        self.state.set_action_responses(&phase.id, &responses);
        handler.process(&mut self.state)
    }

    fn player_action(
        &mut self,
        phase: &PhaseConfig,
        handler: &dyn PhaseHandler,
        player_id: &PlayerId,
    ) -> Result<Value, EngineError> {
        self.recorder.save_event(&EngineEvent::PlayerActionStart {
            phase_id: phase.id.clone(),
            player_id: player_id.clone(),
        })?;
        // Persist any chat the handler produced even when it fails, so the
        // audit trail covers an aborted collection.
        let outcome = handler.process_player(&mut self.state, player_id, &mut self.agent);
        for entry in self.agent.drain() {
            self.recorder.save_chat(&entry)?;
        }
        let action = outcome?;
        tracing::debug!(
            target: "runtime::engine",
            phase = %phase.id,
            player = %player_id,
            "action collected"
        );
        self.recorder
            .save_event(&EngineEvent::PlayerActionComplete {
                phase_id: phase.id.clone(),
                player_id: player_id.clone(),
                action: action.clone(),
            })?;
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlour_core::{GameMeta, PlayerBounds, StateFieldConfig};
    use serde_json::json;

    fn two_phase_config() -> GameConfig {
        let mut config = GameConfig {
            game: GameMeta {
                name: "mini".to_string(),
                description: String::new(),
            },
            players: PlayerBounds { min: 2, max: 2 },
            phases: vec![
                PhaseConfig::new("decision", PhaseKind::SimultaneousAction)
                    .with_next_phase("wrap"),
                PhaseConfig::new("wrap", PhaseKind::Automatic).with_handler("round_progression"),
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
        config
    }

    fn scripted_agent() -> crate::MockAgent {
        crate::MockAgent::new()
            .with_response("decision", "player_1", 1, json!("left"))
            .with_response("decision", "player_2", 1, json!("right"))
    }

    #[test]
    fn builder_requires_an_agent() {
        let err = EngineBuilder::new(two_phase_config()).build();
        assert!(matches!(err, Err(EngineError::AgentNotSet)));
    }

    #[test]
    fn run_reaches_game_end_and_returns_results() {
        let engine = EngineBuilder::new(two_phase_config())
            .agent(scripted_agent())
            .build()
            .unwrap();
        let report = engine.run().unwrap();
        assert_eq!(report.results.game, "mini");
        assert_eq!(report.results.players.len(), 2);
    }

    #[test]
    fn phase_budget_stops_a_cyclic_graph() {
        let mut config = two_phase_config();
        // wrap unconditionally loops back to itself
        config.phases[1] = PhaseConfig::new("wrap", PhaseKind::Automatic)
            .with_handler("round_progression")
            .with_next_phase("wrap");
        config.engine.max_phase_transitions = 25;

        let engine = EngineBuilder::new(config)
            .agent(scripted_agent())
            .build()
            .unwrap();
        assert!(matches!(
            engine.run(),
            Err(EngineError::PhaseBudgetExceeded { limit: 25 })
        ));
    }
}
