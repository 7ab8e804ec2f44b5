//! Interactive game runner.
//!
//! Loads a TOML game description, runs it with a console agent, and writes
//! the session directory under `--sessions` (default `sessions/`).

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use parlour_content::ConfigLoader;
use parlour_runtime::agent::ConsoleAgent;
use parlour_runtime::{EngineBuilder, FileRecorder};

struct Args {
    config: PathBuf,
    sessions: PathBuf,
    seed: u64,
}

fn parse_args() -> Result<Args> {
    let mut config = None;
    let mut sessions = PathBuf::from("sessions");
    let mut seed = 0;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--sessions" => {
                sessions = args
                    .next()
                    .map(PathBuf::from)
                    .context("--sessions needs a directory")?;
            }
            "--seed" => {
                seed = args
                    .next()
                    .context("--seed needs a value")?
                    .parse()
                    .context("--seed must be an unsigned integer")?;
            }
            other if config.is_none() => config = Some(PathBuf::from(other)),
            other => bail!("unexpected argument `{other}`"),
        }
    }

    Ok(Args {
        config: config.context("usage: parlour <game.toml> [--seed N] [--sessions DIR]")?,
        sessions,
        seed,
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    let config = ConfigLoader::load(&args.config)?;
    let recorder = FileRecorder::create(&args.sessions, &config.game.name)?;
    let session_dir = recorder.dir().to_path_buf();

    let report = EngineBuilder::new(config)
        .seed(args.seed)
        .agent(ConsoleAgent::stdio())
        .recorder(recorder)
        .build()?
        .run()?;

    println!("session: {}", report.session_id);
    println!("results: {}", session_dir.join("results.json").display());
    match &report.results.winner {
        Some(winner) => println!("winner: {}", serde_json::to_string(winner)?),
        None => println!("winner: none"),
    }
    Ok(())
}
