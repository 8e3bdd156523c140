//! Play command - game agent speaking the supervisor line protocol
//!
//! stdout carries only protocol lines; all logging goes to stderr.

use std::io;

use anyhow::{Context, Result};
use clap::Args;

use searchlab_core::{run_session, DEFAULT_NAME};

#[derive(Args)]
pub struct PlayArgs {
    /// Name announced to the supervisor
    #[arg(long, default_value = DEFAULT_NAME)]
    pub name: String,
}

/// Run play command until the supervisor sends FINAL or closes stdin
pub fn run(args: PlayArgs) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();

    let summary = run_session(stdin.lock(), stdout.lock(), &args.name).context("Agent session failed")?;

    match summary.final_score {
        Some((dark, light)) => tracing::info!(
            "Session finished after {} moves: dark {} light {}",
            summary.moves_played,
            dark,
            light
        ),
        None => tracing::info!("Session ended after {} moves", summary.moves_played),
    }

    Ok(())
}
