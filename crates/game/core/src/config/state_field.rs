//! Declared state fields for the four state scopes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The four independently-schema'd state scopes.
///
/// Initialization pre-populates declared keys only; handlers may still write
/// undeclared keys dynamically; the model is intentionally permissive.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateSchema {
    /// Per-player fields, applied to every player at setup.
    #[serde(default)]
    pub player_state: Vec<StateFieldConfig>,
    /// Global mutable values visible to all phases.
    #[serde(default)]
    pub shared_state: Vec<StateFieldConfig>,
    /// Values kept out of prompt visibility.
    #[serde(default)]
    pub hidden_state: Vec<StateFieldConfig>,
    /// Named append-only logs fed by phase completions.
    #[serde(default)]
    pub history_state: Vec<StateFieldConfig>,
}

/// One declared field in a state scope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateFieldConfig {
    pub name: String,
    /// Initial value written at state construction.
    #[serde(default)]
    pub initial: Value,
    /// Whether the field may appear in prompt-visible context.
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// For history fields: which phase completions append to this log.
    #[serde(default)]
    pub tracking: Tracking,
}

fn default_visible() -> bool {
    true
}

impl StateFieldConfig {
    pub fn new(name: impl Into<String>, initial: Value) -> Self {
        Self {
            name: name.into(),
            initial,
            visible: true,
            tracking: Tracking::default(),
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn tracking(mut self, tracking: Tracking) -> Self {
        self.tracking = tracking;
        self
    }
}

/// Which phase ids a history log tracks: a single id or a list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tracking {
    One(String),
    Many(Vec<String>),
}

impl Default for Tracking {
    fn default() -> Self {
        Tracking::Many(Vec::new())
    }
}

impl Tracking {
    /// Exact string match, or membership when a list is configured.
    pub fn matches(&self, phase_id: &str) -> bool {
        match self {
            Tracking::One(id) => id == phase_id,
            Tracking::Many(ids) => ids.iter().any(|id| id == phase_id),
        }
    }
}
