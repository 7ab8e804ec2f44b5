//! Final results document and winner outcomes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::player::{PlayerId, StateBag};

/// Outcome of winner computation.
///
/// `highest_score` games with a shared maximum produce [`Winner::Tie`], not
/// an arbitrary single winner. Consumers must special-case that shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Winner {
    Player { id: PlayerId },
    Tie { players: Vec<PlayerId>, score: i64 },
}

/// Final results persisted once the game is over.
///
/// `history_summary` deliberately carries only entry counts per history log,
/// never the log contents; the full logs live in the session's snapshot
/// stream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultsDocument {
    pub game: String,
    pub timestamp: String,
    pub players: Vec<PlayerResult>,
    pub winner: Option<Winner>,
    pub rounds_played: u64,
    pub history_summary: BTreeMap<String, usize>,
}

/// One player's final standing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerResult {
    pub id: PlayerId,
    /// Computed primary role, serialized under the legacy `role` key.
    #[serde(rename = "role")]
    pub primary_role: Option<String>,
    pub state: StateBag,
}
