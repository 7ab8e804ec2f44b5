//! Declarative game description.
//!
//! A [`GameConfig`] is loaded once per run and stays immutable: it names the
//! game, bounds the player count, lists the phase graph, declares the four
//! state scopes, and carries setup/win-condition/agent-integration rules.
//! Parsing is serde-driven with defaulted optional sections; structural rules
//! that serde cannot express (non-empty phase list, dangling phase
//! references) are checked by [`GameConfig::validate`].

mod agents;
mod phase;
mod state_field;
mod win;

pub use agents::{AgentIntegration, PhaseAgentConfig};
pub use phase::{PhaseConfig, PhaseKind};
pub use state_field::{StateFieldConfig, StateSchema, Tracking};
pub use win::{WinCondition, WinKind};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;
use crate::phase::GAME_END;

/// Complete declarative description of a game. Immutable for the run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub game: GameMeta,
    pub players: PlayerBounds,
    pub phases: Vec<PhaseConfig>,
    #[serde(default)]
    pub state: StateSchema,
    #[serde(default)]
    pub rounds: RoundsConfig,
    #[serde(default)]
    pub setup: SetupConfig,
    #[serde(default)]
    pub win_condition: WinCondition,
    #[serde(default)]
    pub agents: AgentIntegration,
    #[serde(default)]
    pub engine: EngineLimits,
}

impl GameConfig {
    /// Look up a phase descriptor by id.
    pub fn phase(&self, id: &str) -> Option<&PhaseConfig> {
        self.phases.iter().find(|p| p.id == id)
    }

    /// The phase the game starts in. `None` only for an unvalidated config
    /// with an empty phase list.
    pub fn first_phase(&self) -> Option<&PhaseConfig> {
        self.phases.first()
    }

    /// Check structural rules that serde-level parsing cannot enforce.
    ///
    /// Fatal at load time, never retried. Covers: non-empty phase list,
    /// non-empty unique phase ids, player bounds, phase-kind prerequisites
    /// (`automatic` needs a handler, `single_player_action` needs
    /// `eligible_role`), and every `next_phase*` target resolving to a
    /// declared phase or the terminal sentinel.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.game.name.is_empty() {
            return Err(ConfigError::MissingField("game.name".to_string()));
        }
        if self.players.max == 0 {
            return Err(ConfigError::NoPlayers);
        }
        if self.players.min > self.players.max {
            return Err(ConfigError::PlayerBoundsInverted {
                min: self.players.min,
                max: self.players.max,
            });
        }
        if self.phases.is_empty() {
            return Err(ConfigError::NoPhases);
        }

        let mut seen = BTreeMap::new();
        for (index, phase) in self.phases.iter().enumerate() {
            if phase.id.is_empty() {
                return Err(ConfigError::EmptyPhaseId { index });
            }
            if seen.insert(phase.id.as_str(), index).is_some() {
                return Err(ConfigError::DuplicatePhaseId {
                    phase_id: phase.id.clone(),
                });
            }
        }

        for phase in &self.phases {
            match phase.kind {
                PhaseKind::Automatic if phase.handler.is_none() => {
                    return Err(ConfigError::AutomaticWithoutHandler {
                        phase_id: phase.id.clone(),
                    });
                }
                PhaseKind::SinglePlayerAction if phase.eligible_role.is_none() => {
                    return Err(ConfigError::SinglePlayerWithoutRole {
                        phase_id: phase.id.clone(),
                    });
                }
                _ => {}
            }

            for (field, target) in [
                ("next_phase", phase.next_phase.as_ref()),
                ("next_phase_success", phase.next_phase_success.as_ref()),
                ("next_phase_failure", phase.next_phase_failure.as_ref()),
            ] {
                if let Some(target) = target
                    && target != GAME_END
                    && !seen.contains_key(target.as_str())
                {
                    return Err(ConfigError::DanglingPhaseRef {
                        phase_id: phase.id.clone(),
                        field,
                        target: target.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Game metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameMeta {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Player count bounds. The engine always seats `max` players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerBounds {
    pub min: u32,
    pub max: u32,
}

/// Round configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundsConfig {
    #[serde(default = "default_round_count")]
    pub count: u32,
    #[serde(default)]
    pub progression: RoundProgression,
}

fn default_round_count() -> u32 {
    1
}

impl Default for RoundsConfig {
    fn default() -> Self {
        Self {
            count: default_round_count(),
            progression: RoundProgression::default(),
        }
    }
}

/// How rounds advance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundProgression {
    /// Play exactly `rounds.count` rounds.
    #[default]
    Fixed,
    /// Keep playing rounds until the win-condition trigger fires.
    UntilWinCondition,
}

/// Initial resources and role-assignment rules applied at player setup.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SetupConfig {
    /// Shared resources seeded into shared state before the first phase.
    #[serde(default)]
    pub resources: serde_json::Map<String, Value>,
    /// Role assignment rules, applied in declaration order.
    #[serde(default)]
    pub assignments: Vec<AssignmentRule>,
}

/// One role-assignment rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRule {
    pub role: String,
    pub target: AssignmentTarget,
}

/// Who receives a role: a uniform-random player, every player, or a literal
/// player id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssignmentTarget {
    RandomPlayer,
    AllPlayers,
    Player(String),
}

impl From<String> for AssignmentTarget {
    fn from(value: String) -> Self {
        match value.as_str() {
            "random_player" => AssignmentTarget::RandomPlayer,
            "all_players" => AssignmentTarget::AllPlayers,
            _ => AssignmentTarget::Player(value),
        }
    }
}

impl From<AssignmentTarget> for String {
    fn from(value: AssignmentTarget) -> Self {
        match value {
            AssignmentTarget::RandomPlayer => "random_player".to_string(),
            AssignmentTarget::AllPlayers => "all_players".to_string(),
            AssignmentTarget::Player(id) => id,
        }
    }
}

/// Runtime safety limits.
///
/// The phase graph has no cycle detection; a misconfigured conditional branch
/// can loop forever. The transition budget turns such a loop into a fatal
/// error without changing the semantics of well-formed configs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineLimits {
    #[serde(default = "default_max_phase_transitions")]
    pub max_phase_transitions: u32,
}

fn default_max_phase_transitions() -> u32 {
    1000
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self {
            max_phase_transitions: default_max_phase_transitions(),
        }
    }
}
