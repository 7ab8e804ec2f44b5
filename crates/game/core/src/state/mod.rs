//! Mutable simulation state.
//!
//! [`GameState`] owns everything that changes during a run: the seated
//! players, the four state scopes (shared, hidden, history, per-player), the
//! current phase id, and the game-over flag. It is created once per game from
//! a validated [`GameConfig`] plus an explicit seed, mutated only from the
//! engine's single thread, and flushed into a results document after the
//! terminal phase.

mod player;
mod results;
mod snapshot;

pub use player::{Player, PlayerId, StateBag};
pub use results::{PlayerResult, ResultsDocument, Winner};
pub use snapshot::{HistoryEntry, INITIAL_SNAPSHOT_TAG, StateSnapshot};

use std::collections::BTreeMap;

use serde_json::Value;

use crate::config::{AssignmentTarget, GameConfig, WinKind};
use crate::error::{ConfigError, StateError};
use crate::rng::PcgRng;

/// All mutable simulation data for one game run.
pub struct GameState {
    config: GameConfig,
    current_phase: String,
    game_over: bool,
    players: Vec<Player>,
    shared: StateBag,
    hidden: StateBag,
    history: BTreeMap<String, Vec<HistoryEntry>>,
    snapshots: Vec<StateSnapshot>,
    rng: PcgRng,
}

impl GameState {
    /// Build the initial state for a run.
    ///
    /// Validates the configuration, seats `players.max` players, applies
    /// declared initial values for every scope, and runs the setup role
    /// assignments. All randomness (the `random_player` assignment target,
    /// handler tie-breaks) draws from the seeded stream, so a fixed seed
    /// reproduces the run.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let current_phase = config
            .first_phase()
            .map(|p| p.id.clone())
            .ok_or(ConfigError::NoPhases)?;

        let mut shared = StateBag::new();
        for field in &config.state.shared_state {
            shared.insert(field.name.clone(), field.initial.clone());
        }
        for (key, value) in &config.setup.resources {
            shared.insert(key.clone(), value.clone());
        }

        let mut hidden = StateBag::new();
        for field in &config.state.hidden_state {
            hidden.insert(field.name.clone(), field.initial.clone());
        }

        let history = config
            .state
            .history_state
            .iter()
            .map(|field| (field.name.clone(), Vec::new()))
            .collect();

        let mut state = Self {
            current_phase,
            game_over: false,
            players: Vec::new(),
            shared,
            hidden,
            history,
            snapshots: Vec::new(),
            rng: PcgRng::seed_from(seed),
            config,
        };
        state.initialize_players()?;
        Ok(state)
    }

    /// Seat `players.max` players and apply setup rules.
    fn initialize_players(&mut self) -> Result<(), ConfigError> {
        let count = self.config.players.max as usize;
        self.players = (1..=count)
            .map(|n| {
                let mut player = Player::new(PlayerId::seat(n));
                for field in &self.config.state.player_state {
                    player
                        .state
                        .insert(field.name.clone(), field.initial.clone());
                }
                player
            })
            .collect();

        let assignments = self.config.setup.assignments.clone();
        for rule in assignments {
            match rule.target {
                AssignmentTarget::RandomPlayer => {
                    // pick_index is Some: players.max >= 1 was validated
                    if let Some(index) = self.rng.pick_index(self.players.len()) {
                        self.players[index].add_role(&rule.role);
                    }
                }
                AssignmentTarget::AllPlayers => {
                    for player in &mut self.players {
                        player.add_role(&rule.role);
                    }
                }
                AssignmentTarget::Player(ref id) => {
                    let player = self
                        .players
                        .iter_mut()
                        .find(|p| p.id.as_str() == id)
                        .ok_or_else(|| ConfigError::UnknownAssignmentTarget {
                            role: rule.role.clone(),
                            target: id.clone(),
                        })?;
                    player.add_role(&rule.role);
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn current_phase(&self) -> &str {
        &self.current_phase
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub fn player_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| &p.id == id)
    }

    /// Players whose `state.active` is truthy or unset.
    pub fn active_players(&self) -> Vec<&Player> {
        self.players.iter().filter(|p| p.is_active()).collect()
    }

    pub fn shared(&self) -> &StateBag {
        &self.shared
    }

    pub fn shared_mut(&mut self) -> &mut StateBag {
        &mut self.shared
    }

    pub fn hidden(&self) -> &StateBag {
        &self.hidden
    }

    pub fn hidden_mut(&mut self) -> &mut StateBag {
        &mut self.hidden
    }

    pub fn history(&self) -> &BTreeMap<String, Vec<HistoryEntry>> {
        &self.history
    }

    /// Current round from shared state, 0 when undeclared.
    pub fn current_round(&self) -> u64 {
        self.shared
            .get("current_round")
            .and_then(Value::as_u64)
            .unwrap_or(0)
    }

    pub fn rng_mut(&mut self) -> &mut PcgRng {
        &mut self.rng
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    pub fn set_current_phase(&mut self, phase_id: impl Into<String>) {
        self.current_phase = phase_id.into();
    }

    pub fn set_game_over(&mut self) {
        self.game_over = true;
    }

    /// Mark a player eliminated. Returns whether the player existed.
    ///
    /// Eliminated players are never removed; only `state.active` flips. When
    /// the configuration declares an `elimination_record` history log, an
    /// entry is appended there.
    pub fn eliminate_player(&mut self, id: &PlayerId) -> bool {
        let round = self.current_round();
        let Some(player) = self.players.iter_mut().find(|p| &p.id == id) else {
            return false;
        };
        player.state.insert("active".to_string(), Value::Bool(false));

        if let Some(log) = self.history.get_mut("elimination_record") {
            log.push(HistoryEntry::elimination(round, id.clone()));
        }
        true
    }

    /// Record the collected responses for a completed phase.
    ///
    /// Always writes `shared["{phase_id}_responses"]`, the canonical
    /// transient read-path for handlers resolving the same phase, and
    /// appends `{round, responses, timestamp}` to every history log whose
    /// `tracking` matches the phase id.
    pub fn set_action_responses(
        &mut self,
        phase_id: &str,
        responses: &BTreeMap<PlayerId, Value>,
    ) {
        let as_object: StateBag = responses
            .iter()
            .map(|(id, action)| (id.as_str().to_string(), action.clone()))
            .collect();
        self.shared.insert(
            format!("{phase_id}_responses"),
            Value::Object(as_object.clone()),
        );

        let round = self.current_round();
        for field in &self.config.state.history_state {
            if field.tracking.matches(phase_id)
                && let Some(log) = self.history.get_mut(&field.name)
            {
                log.push(HistoryEntry::responses(
                    round,
                    Value::Object(as_object.clone()),
                ));
            }
        }
    }

    // ========================================================================
    // Outcomes
    // ========================================================================

    /// Winner under the configured win condition. `None` while the game is
    /// still running.
    pub fn winner(&self) -> Option<Winner> {
        if !self.game_over {
            return None;
        }

        let active = self.active_players();
        match self.config.win_condition.kind {
            WinKind::LastPlayerStanding => match active.as_slice() {
                [sole] => Some(Winner::Player {
                    id: sole.id.clone(),
                }),
                _ => None,
            },
            WinKind::HighestScore => {
                let field = &self.config.win_condition.score_field;
                let scores: Vec<(&Player, i64)> = active
                    .iter()
                    .map(|p| {
                        let score = p.state.get(field).and_then(Value::as_i64).unwrap_or(0);
                        (*p, score)
                    })
                    .collect();
                let max = scores.iter().map(|(_, s)| *s).max()?;
                let at_max: Vec<&Player> = scores
                    .iter()
                    .filter(|(_, s)| *s == max)
                    .map(|(p, _)| *p)
                    .collect();
                match at_max.as_slice() {
                    [sole] => Some(Winner::Player {
                        id: sole.id.clone(),
                    }),
                    several => Some(Winner::Tie {
                        players: several.iter().map(|p| p.id.clone()).collect(),
                        score: max,
                    }),
                }
            }
        }
    }

    /// Deep-copy the four scopes and player list into an immutable snapshot.
    ///
    /// The snapshot is retained in the in-memory list for this process and
    /// returned for durable persistence through the session recorder.
    pub fn take_snapshot(&mut self, is_initial: bool) -> StateSnapshot {
        let phase = if is_initial {
            INITIAL_SNAPSHOT_TAG.to_string()
        } else {
            self.current_phase.clone()
        };
        let snapshot = StateSnapshot {
            sequence: self.snapshots.len() as u64,
            phase,
            game_over: self.game_over,
            timestamp: snapshot::now_rfc3339(),
            players: self.players.clone(),
            shared: self.shared.clone(),
            hidden: self.hidden.clone(),
            history: self.history.clone(),
        };
        self.snapshots.push(snapshot.clone());
        snapshot
    }

    pub fn snapshots(&self) -> &[StateSnapshot] {
        &self.snapshots
    }

    /// Build the final results document.
    ///
    /// Precondition: the game is over; calling earlier is a misuse error,
    /// never swallowed. History logs are summarized by entry count only.
    pub fn build_results(&self) -> Result<ResultsDocument, StateError> {
        if !self.game_over {
            return Err(StateError::GameNotOver);
        }

        let players = self
            .players
            .iter()
            .map(|p| PlayerResult {
                id: p.id.clone(),
                primary_role: p.primary_role().map(str::to_string),
                state: p.state.clone(),
            })
            .collect();

        let history_summary = self
            .history
            .iter()
            .map(|(name, log)| (name.clone(), log.len()))
            .collect();

        Ok(ResultsDocument {
            game: self.config.game.name.clone(),
            timestamp: snapshot::now_rfc3339(),
            players,
            winner: self.winner(),
            rounds_played: self.current_round(),
            history_summary,
        })
    }
}
