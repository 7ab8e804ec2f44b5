//! Typed engine events.
//!
//! Events form a secondary, redundant audit trail alongside snapshots:
//! snapshots only capture state after a phase, so consumers reconstructing
//! intra-phase ordering (who acted when, inside one phase) rely on these
//! records instead. They flow through the session recorder's combined log.

use parlour_core::{PlayerId, Winner};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One timeline event emitted by the engine loop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    GameStart {
        game: String,
        players: Vec<PlayerId>,
    },
    PhaseStart {
        phase_id: String,
        round: u64,
    },
    PhaseEnd {
        phase_id: String,
        round: u64,
        /// Condition signal fed into phase branching.
        condition: bool,
    },
    PlayerActionStart {
        phase_id: String,
        player_id: PlayerId,
    },
    PlayerActionComplete {
        phase_id: String,
        player_id: PlayerId,
        action: Value,
    },
    GameEnd {
        winner: Option<Winner>,
        rounds_played: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn events_serialize_with_discriminator() {
        let event = EngineEvent::PlayerActionComplete {
            phase_id: "decision".to_string(),
            player_id: PlayerId::seat(1),
            action: json!("cooperate"),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "player_action_complete");
        assert_eq!(value["player_id"], "player_1");

        let back: EngineEvent = serde_json::from_value(value).unwrap();
        assert_eq!(back, event);
    }
}
