//! Immutable state snapshots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::player::{Player, PlayerId, StateBag};

/// Phase tag used for the snapshot taken before the first phase runs.
pub const INITIAL_SNAPSHOT_TAG: &str = "initial";

/// One append-only history log entry.
///
/// Phase completions append `{round, responses, timestamp}`; eliminations
/// append `{round, player, timestamp}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub round: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responses: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<PlayerId>,
    pub timestamp: String,
}

impl HistoryEntry {
    pub fn responses(round: u64, responses: Value) -> Self {
        Self {
            round,
            responses: Some(responses),
            player: None,
            timestamp: now_rfc3339(),
        }
    }

    pub fn elimination(round: u64, player: PlayerId) -> Self {
        Self {
            round,
            responses: None,
            player: Some(player),
            timestamp: now_rfc3339(),
        }
    }
}

/// Deep copy of all four state scopes and the player list, tagged with the
/// phase just completed (or [`INITIAL_SNAPSHOT_TAG`]). Durable persistence of
/// snapshots belongs to the session recorder; the in-memory list on
/// [`super::GameState`] only serves the current process.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Monotonic per-run sequence number, usable as an opaque snapshot id.
    pub sequence: u64,
    /// Phase id the snapshot was taken after, or `initial`.
    pub phase: String,
    pub game_over: bool,
    pub timestamp: String,
    pub players: Vec<Player>,
    pub shared: StateBag,
    pub hidden: StateBag,
    pub history: BTreeMap<String, Vec<HistoryEntry>>,
}

pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
