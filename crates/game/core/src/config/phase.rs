//! Phase descriptors and phase kinds.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Processing strategy for a phase.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PhaseKind {
    /// Whole-phase side effect run by a named handler; the handler's boolean
    /// result feeds conditional branching.
    Automatic,
    /// Collect one action per eligible player; only the result set is
    /// simultaneous, execution order carries no meaning.
    SimultaneousAction,
    /// Collect actions in player order, tracking progress in shared state.
    SequentialAction,
    /// Collect one action from the single active holder of `eligible_role`.
    SinglePlayerAction,
}

/// Declarative description of one phase in the game graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseConfig {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: PhaseKind,

    /// Handler name resolved through the handler registry. Required for
    /// `automatic` phases; action phases fall back to the registry's default
    /// handler for their kind.
    #[serde(default)]
    pub handler: Option<String>,

    /// Restrict the eligible player set to holders of this role.
    #[serde(default)]
    pub eligible_role: Option<String>,

    /// Unconditional successor. Defaults to the terminal sentinel.
    #[serde(default)]
    pub next_phase: Option<String>,

    /// When set, the handler's condition result selects between
    /// `next_phase_success` and `next_phase_failure` instead of `next_phase`.
    #[serde(default)]
    pub next_phase_condition: Option<String>,
    #[serde(default)]
    pub next_phase_success: Option<String>,
    #[serde(default)]
    pub next_phase_failure: Option<String>,

    /// Snapshot after every individual player action (sequential phases).
    #[serde(default)]
    pub snapshot_per_action: bool,

    /// Free-form handler parameters (payoff tables, tie-break policy, ...).
    #[serde(default)]
    pub params: serde_json::Map<String, Value>,
}

impl PhaseConfig {
    /// Bare descriptor with everything optional unset. Mostly for tests and
    /// programmatic config construction.
    pub fn new(id: impl Into<String>, kind: PhaseKind) -> Self {
        Self {
            id: id.into(),
            kind,
            handler: None,
            eligible_role: None,
            next_phase: None,
            next_phase_condition: None,
            next_phase_success: None,
            next_phase_failure: None,
            snapshot_per_action: false,
            params: serde_json::Map::new(),
        }
    }

    pub fn with_handler(mut self, handler: impl Into<String>) -> Self {
        self.handler = Some(handler.into());
        self
    }

    pub fn with_next_phase(mut self, next: impl Into<String>) -> Self {
        self.next_phase = Some(next.into());
        self
    }

    pub fn with_eligible_role(mut self, role: impl Into<String>) -> Self {
        self.eligible_role = Some(role.into());
        self
    }

    pub fn with_condition(
        mut self,
        condition: impl Into<String>,
        success: impl Into<String>,
        failure: impl Into<String>,
    ) -> Self {
        self.next_phase_condition = Some(condition.into());
        self.next_phase_success = Some(success.into());
        self.next_phase_failure = Some(failure.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: Value) -> Self {
        self.params.insert(key.into(), value);
        self
    }
}
