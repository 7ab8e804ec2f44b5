//! Agent-integration descriptors.
//!
//! The engine never talks to a model directly; it resolves which prompt
//! template, parser, and backing model apply to a phase/player pair and hands
//! those identifiers to the agent collaborator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::PhaseKind;

/// Per-phase prompt/parser identifiers plus per-player model assignment.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentIntegration {
    /// Phase id → prompt/parser overrides.
    #[serde(default)]
    pub phases: BTreeMap<String, PhaseAgentConfig>,
    /// Player id → model identifier.
    #[serde(default)]
    pub players: BTreeMap<String, String>,
}

impl AgentIntegration {
    /// Prompt template for a phase, falling back to `default_{phase_kind}`.
    pub fn prompt_template(&self, phase_id: &str, kind: PhaseKind) -> String {
        self.phases
            .get(phase_id)
            .and_then(|p| p.prompt_template.clone())
            .unwrap_or_else(|| format!("default_{kind}"))
    }

    /// Parser for a phase, falling back to `{phase_id}_parser`.
    pub fn parser(&self, phase_id: &str) -> String {
        self.phases
            .get(phase_id)
            .and_then(|p| p.parser.clone())
            .unwrap_or_else(|| format!("{phase_id}_parser"))
    }

    /// System prompt override for a phase, if any.
    pub fn system_prompt(&self, phase_id: &str) -> Option<&str> {
        self.phases
            .get(phase_id)
            .and_then(|p| p.system_prompt.as_deref())
    }

    /// Model assigned to a player, if any.
    pub fn model_for(&self, player_id: &str) -> Option<&str> {
        self.players.get(player_id).map(String::as_str)
    }
}

/// Prompt/parser configuration for one phase.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseAgentConfig {
    #[serde(default)]
    pub prompt_template: Option<String>,
    #[serde(default)]
    pub parser: Option<String>,
    #[serde(default)]
    pub system_prompt: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_naming_conventions() {
        let agents = AgentIntegration::default();
        assert_eq!(
            agents.prompt_template("decision", PhaseKind::SimultaneousAction),
            "default_simultaneous_action"
        );
        assert_eq!(agents.parser("decision"), "decision_parser");
        assert_eq!(agents.system_prompt("decision"), None);
    }

    #[test]
    fn overrides_win_over_conventions() {
        let mut agents = AgentIntegration::default();
        agents.phases.insert(
            "decision".to_string(),
            PhaseAgentConfig {
                prompt_template: Some("dilemma_decision".to_string()),
                parser: Some("choice_parser".to_string()),
                system_prompt: None,
            },
        );
        agents
            .players
            .insert("player_1".to_string(), "mock-small".to_string());

        assert_eq!(
            agents.prompt_template("decision", PhaseKind::SimultaneousAction),
            "dilemma_decision"
        );
        assert_eq!(agents.parser("decision"), "choice_parser");
        assert_eq!(agents.model_for("player_1"), Some("mock-small"));
        assert_eq!(agents.model_for("player_2"), None);
    }
}
