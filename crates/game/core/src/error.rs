//! Error types shared across the core model.

/// Errors surfaced while validating a game configuration.
///
/// All variants are fatal at load time and never retried. Each variant
/// carries enough context to point an engineer at the offending section of
/// the configuration file.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required section `{0}`")]
    MissingSection(&'static str),

    #[error("missing required field `{0}`")]
    MissingField(String),

    #[error("`phases` must be a non-empty list")]
    NoPhases,

    #[error("phase at index {index} has an empty `id`")]
    EmptyPhaseId { index: usize },

    #[error("duplicate phase id `{phase_id}`")]
    DuplicatePhaseId { phase_id: String },

    #[error("phase `{phase_id}` references unknown phase `{target}` via `{field}`")]
    DanglingPhaseRef {
        phase_id: String,
        field: &'static str,
        target: String,
    },

    #[error("phase `{phase_id}` of type `automatic` requires a `handler`")]
    AutomaticWithoutHandler { phase_id: String },

    #[error("phase `{phase_id}` of type `single_player_action` requires `eligible_role`")]
    SinglePlayerWithoutRole { phase_id: String },

    #[error("`players.min` ({min}) must not exceed `players.max` ({max})")]
    PlayerBoundsInverted { min: u32, max: u32 },

    #[error("`players.max` must be at least 1")]
    NoPlayers,

    #[error("setup assigns role `{role}` to unknown player `{target}`")]
    UnknownAssignmentTarget { role: String, target: String },
}

/// Errors surfaced by the pure phase controller.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PhaseError {
    /// The configuration does not declare the requested phase. A dangling id
    /// is a fatal configuration error, never retried.
    #[error("phase `{phase_id}` not found in configuration")]
    PhaseNotFound { phase_id: String },
}

/// Errors surfaced by game state operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// Results were requested before the game-over flag was set.
    #[error("cannot build results: game is not over")]
    GameNotOver,

    /// A player id was referenced that was never created.
    #[error("unknown player `{player_id}`")]
    UnknownPlayer { player_id: String },
}
