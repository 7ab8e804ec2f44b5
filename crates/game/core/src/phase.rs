//! Pure phase controller.
//!
//! Maps (phase descriptor, condition result) to the next phase id. This is
//! the entire branching model: an optional condition selects between a
//! success and a failure branch, otherwise the unconditional successor is
//! taken, and every unset branch defaults to the terminal sentinel.

use crate::config::GameConfig;
use crate::error::PhaseError;

/// Terminal sentinel phase id. Reaching it sets the game-over flag.
pub const GAME_END: &str = "game_end";

/// Compute the next phase id for `current_phase_id`.
///
/// Pure and idempotent: identical inputs always return the identical id.
/// Fails with [`PhaseError::PhaseNotFound`] when the current id is not
/// declared; a dangling id is a fatal configuration error.
pub fn next_phase<'a>(
    config: &'a GameConfig,
    current_phase_id: &str,
    condition_result: bool,
) -> Result<&'a str, PhaseError> {
    let phase = config
        .phase(current_phase_id)
        .ok_or_else(|| PhaseError::PhaseNotFound {
            phase_id: current_phase_id.to_string(),
        })?;

    let next = if phase.next_phase_condition.is_some() {
        if condition_result {
            phase.next_phase_success.as_deref()
        } else {
            phase.next_phase_failure.as_deref()
        }
    } else {
        phase.next_phase.as_deref()
    };

    Ok(next.unwrap_or(GAME_END))
}
