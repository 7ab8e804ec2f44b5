//! Handler registry.
//!
//! Phase configurations reference behavior by string identifier; the
//! registry maps those names to factories so the engine never imports
//! concrete handler types. It is an explicit object constructed at startup
//! and injected into the engine. Registration is a plain call from a
//! plugin-loading step, with no import-time side effects or global state.

use std::collections::HashMap;

use parlour_core::PhaseKind;

use crate::error::EngineError;
use crate::handlers::{
    AgentActionHandler, DebateJudgeHandler, DebateStatementHandler, DilemmaDecisionHandler,
    DilemmaScoringHandler, EliminationVoteHandler, PhaseHandler, RoundProgressionHandler,
};

type HandlerFactory = Box<dyn Fn() -> Box<dyn PhaseHandler>>;

/// Name → factory lookup, plus a secondary phase-kind → default-factory map
/// for action phases that omit an explicit `handler`.
pub struct HandlerRegistry {
    by_name: HashMap<String, HandlerFactory>,
    defaults: HashMap<PhaseKind, HandlerFactory>,
}

impl HandlerRegistry {
    /// Empty registry. Callers register every handler explicitly.
    pub fn new() -> Self {
        Self {
            by_name: HashMap::new(),
            defaults: HashMap::new(),
        }
    }

    /// Registry pre-populated with the built-in plugin set and the generic
    /// agent-collection handler as the default for all action phase kinds.
    pub fn with_standard_handlers() -> Self {
        let mut registry = Self::new();
        registry.register("agent_action", || Box::new(AgentActionHandler));
        registry.register("dilemma_decision", || Box::new(DilemmaDecisionHandler));
        registry.register("dilemma_scoring", || Box::new(DilemmaScoringHandler));
        registry.register("round_progression", || Box::new(RoundProgressionHandler));
        registry.register("elimination_vote", || Box::new(EliminationVoteHandler));
        registry.register("debate_statement", || Box::new(DebateStatementHandler));
        registry.register("debate_judge", || Box::new(DebateJudgeHandler));
        for kind in [
            PhaseKind::SimultaneousAction,
            PhaseKind::SequentialAction,
            PhaseKind::SinglePlayerAction,
        ] {
            registry.register_default(kind, || Box::new(AgentActionHandler));
        }
        registry
    }

    /// Register a factory under a handler name. Later registrations replace
    /// earlier ones, letting games override built-ins.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn() -> Box<dyn PhaseHandler> + 'static,
    ) {
        self.by_name.insert(name.into(), Box::new(factory));
    }

    /// Register the default factory for a phase kind.
    pub fn register_default(
        &mut self,
        kind: PhaseKind,
        factory: impl Fn() -> Box<dyn PhaseHandler> + 'static,
    ) {
        self.defaults.insert(kind, Box::new(factory));
    }

    /// Instantiate the handler registered under `name`.
    pub fn handler(&self, name: &str) -> Result<Box<dyn PhaseHandler>, EngineError> {
        self.by_name
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| EngineError::HandlerNotFound {
                name: name.to_string(),
            })
    }

    /// Instantiate the default handler for a phase kind.
    pub fn default_handler(&self, kind: PhaseKind) -> Result<Box<dyn PhaseHandler>, EngineError> {
        self.defaults
            .get(&kind)
            .map(|factory| factory())
            .ok_or(EngineError::DefaultHandlerNotFound { kind })
    }

    /// Registered handler names, for diagnostics.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.by_name.keys().map(String::as_str)
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::with_standard_handlers()
    }
}
