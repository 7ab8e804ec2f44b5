//! Player identity, roles, and per-player state bag.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Free-form named values. Declared fields are pre-populated from the
/// configuration; handlers may add scratch keys dynamically.
pub type StateBag = serde_json::Map<String, Value>;

/// Stable player identifier for the game's lifetime.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Conventional id for the `n`-th seat (1-based): `player_1`, `player_2`, ...
    pub fn seat(n: usize) -> Self {
        Self(format!("player_{n}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A seated player. Players are created once at state initialization and
/// never destroyed; elimination flips `state.active` to `false` so eliminated
/// players stay addressable for historical lookups.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Role tags in assignment order. The first entry is the primary role;
    /// there is no separately stored legacy mirror field.
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub state: StateBag,
}

impl Player {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            roles: Vec::new(),
            state: StateBag::new(),
        }
    }

    /// First role in the role set, if any. Serialized as `role` in snapshots
    /// and results for downstream compatibility.
    pub fn primary_role(&self) -> Option<&str> {
        self.roles.first().map(String::as_str)
    }

    /// Append a role tag without disturbing the primary role. No-op when the
    /// role is already held.
    pub fn add_role(&mut self, role: impl Into<String>) {
        let role = role.into();
        if !self.roles.contains(&role) {
            self.roles.push(role);
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Active unless `state.active` is present and falsy.
    pub fn is_active(&self) -> bool {
        match self.state.get("active") {
            None => true,
            Some(value) => value_truthy(value),
        }
    }
}

/// Truthiness for dynamic state values, matching the permissive state-bag
/// model: null and false are falsy, zero and empty collections are falsy,
/// everything else is truthy.
pub(crate) fn value_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
