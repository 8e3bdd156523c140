//! Searchlab CLI - Command-line interface
//!
//! Commands:
//! - solve: Run anytime search on a snowman puzzle
//! - play: Act as an Othello agent over stdin/stdout

mod play;
mod solve;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "searchlab")]
#[command(about = "Heuristic puzzle search and adversarial game search")]
struct Cli {
    /// Debug logging unless RUST_LOG says otherwise
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a puzzle with anytime weighted A* or greedy best-first
    Solve(solve::SolveArgs),
    /// Play Othello against a supervisor
    Play(play::PlayArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Solve(args) => solve::run(args),
        Commands::Play(args) => play::run(args),
    }
}

/// Log to stderr; stdout belongs to command output and the game protocol
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
