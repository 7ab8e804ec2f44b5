//! Win-condition descriptors.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How the winner is determined once the game is over.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinKind {
    /// The sole remaining active player wins.
    #[default]
    LastPlayerStanding,
    /// The active player with the maximum score wins; a shared maximum
    /// produces a tie outcome, never an arbitrary single winner.
    HighestScore,
}

/// Win-condition descriptor: kind plus parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WinCondition {
    #[serde(rename = "type", default)]
    pub kind: WinKind,
    /// Trigger identifier consumed by `until_win_condition` round checks.
    /// `player_count_equals_one` is the only recognized value; anything else
    /// is rejected when the check runs.
    #[serde(default = "default_trigger")]
    pub trigger: String,
    /// Player-state field compared under `highest_score`.
    #[serde(default = "default_score_field")]
    pub score_field: String,
    #[serde(default)]
    pub params: serde_json::Map<String, Value>,
}

fn default_trigger() -> String {
    "player_count_equals_one".to_string()
}

fn default_score_field() -> String {
    "score".to_string()
}

impl Default for WinCondition {
    fn default() -> Self {
        Self {
            kind: WinKind::default(),
            trigger: default_trigger(),
            score_field: default_score_field(),
            params: serde_json::Map::new(),
        }
    }
}

impl WinCondition {
    pub fn highest_score(score_field: impl Into<String>) -> Self {
        Self {
            kind: WinKind::HighestScore,
            score_field: score_field.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_last_player_standing() {
        let condition: WinCondition = serde_json::from_str("{}").unwrap();
        assert_eq!(condition.kind, WinKind::LastPlayerStanding);
        assert_eq!(condition.trigger, "player_count_equals_one");
        assert_eq!(condition.score_field, "score");
    }
}
