//! Interactive agent reading actions from a terminal.

use std::io::{BufRead, Write};

use serde_json::Value;

use super::{ActionContext, AgentClient, AgentError};

/// Agent that prompts a human on a writer and reads one action per request
/// from a reader. Lines that parse as JSON are passed through as-is; anything
/// else becomes a JSON string, which covers the common `cooperate` /
/// `player_3` answers without quoting ceremony.
pub struct ConsoleAgent<R, W> {
    input: R,
    output: W,
}

impl ConsoleAgent<std::io::BufReader<std::io::Stdin>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self {
            input: std::io::BufReader::new(std::io::stdin()),
            output: std::io::stdout(),
        }
    }
}

impl<R: BufRead, W: Write> ConsoleAgent<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn io_failure(detail: std::io::Error) -> AgentError {
        AgentError::BackendFailure {
            model: "console".to_string(),
            detail: detail.to_string(),
        }
    }
}

impl<R: BufRead, W: Write> AgentClient for ConsoleAgent<R, W> {
    fn get_action(&mut self, ctx: &ActionContext<'_>) -> Result<Value, AgentError> {
        writeln!(
            self.output,
            "[round {}] phase `{}`: action for {}",
            ctx.state.current_round(),
            ctx.phase_id,
            ctx.player_id,
        )
        .map_err(Self::io_failure)?;
        if let Some(extra) = &ctx.extra {
            writeln!(self.output, "  context: {extra}").map_err(Self::io_failure)?;
        }

        loop {
            write!(self.output, "> ").map_err(Self::io_failure)?;
            self.output.flush().map_err(Self::io_failure)?;

            let mut line = String::new();
            let read = self.input.read_line(&mut line).map_err(Self::io_failure)?;
            if read == 0 {
                return Err(AgentError::BackendFailure {
                    model: "console".to_string(),
                    detail: "input closed before an action was given".to_string(),
                });
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            return Ok(serde_json::from_str(line).unwrap_or_else(|_| Value::from(line)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlour_core::{
        GameConfig, GameMeta, GameState, PhaseConfig, PhaseKind, PlayerBounds, PlayerId,
    };
    use serde_json::json;

    fn fixture_state() -> GameState {
        let config = GameConfig {
            game: GameMeta {
                name: "console".to_string(),
                description: String::new(),
            },
            players: PlayerBounds { min: 2, max: 2 },
            phases: vec![PhaseConfig::new("decision", PhaseKind::SimultaneousAction)],
            state: Default::default(),
            rounds: Default::default(),
            setup: Default::default(),
            win_condition: Default::default(),
            agents: Default::default(),
            engine: Default::default(),
        };
        GameState::new(config, 0).unwrap()
    }

    fn read_action(input: &str) -> Result<Value, AgentError> {
        let state = fixture_state();
        let player = PlayerId::seat(1);
        let ctx = ActionContext::resolve(&state, &player, "decision").unwrap();
        let mut agent = ConsoleAgent::new(input.as_bytes(), Vec::new());
        agent.get_action(&ctx)
    }

    #[test]
    fn bare_words_become_json_strings() {
        assert_eq!(read_action("cooperate\n").unwrap(), json!("cooperate"));
    }

    #[test]
    fn json_input_passes_through_and_blanks_are_skipped() {
        assert_eq!(
            read_action("\n  \n{\"bid\": 3}\n").unwrap(),
            json!({"bid": 3})
        );
    }

    #[test]
    fn closed_input_is_a_backend_failure() {
        assert!(matches!(
            read_action(""),
            Err(AgentError::BackendFailure { .. })
        ));
    }
}
