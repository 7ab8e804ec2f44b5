//! Pure game model for configuration-driven parlour games.
//!
//! `parlour-core` defines the canonical data model (configuration, players,
//! state scopes, snapshots, win conditions) and exposes pure APIs that are
//! reused by the runtime and offline tools. All mutation happens on
//! [`state::GameState`]; phase sequencing is computed by the pure
//! [`phase::next_phase`] controller. Nothing in this crate performs I/O.
pub mod config;
pub mod error;
pub mod phase;
pub mod rng;
pub mod state;

pub use config::{
    AgentIntegration, AssignmentRule, AssignmentTarget, EngineLimits, GameConfig, GameMeta,
    PhaseAgentConfig, PhaseConfig, PhaseKind, PlayerBounds, RoundProgression, RoundsConfig,
    SetupConfig, StateFieldConfig, StateSchema, Tracking, WinCondition, WinKind,
};
pub use error::{ConfigError, PhaseError, StateError};
pub use phase::{GAME_END, next_phase};
pub use rng::PcgRng;
pub use state::{
    GameState, HistoryEntry, INITIAL_SNAPSHOT_TAG, Player, PlayerId, PlayerResult,
    ResultsDocument, StateBag, StateSnapshot, Winner,
};
