//! Solve command - run an anytime search on a puzzle file
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_problem(), solve(), report_results()
//! - Level 3: plan replay
//! - Level 4: formatting utilities

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};

use searchlab_core::{
    anytime_gbfs, anytime_weighted_astar, AnytimeConfig, AnytimeOutcome, Direction, HeuristicKind, PuzzleSpec,
    PuzzleState, SnowmanPuzzle,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SolveAlgorithm {
    /// Anytime weighted A*
    Weighted,
    /// Anytime greedy best-first
    Greedy,
}

#[derive(Args)]
pub struct SolveArgs {
    /// Puzzle definition JSON file
    #[arg(long, value_name = "FILE")]
    pub problem: PathBuf,

    #[arg(long, value_enum, default_value = "weighted")]
    pub algorithm: SolveAlgorithm,

    /// manhattan, alternate, trivial or zero
    #[arg(long, default_value = "manhattan")]
    pub heuristic: HeuristicKind,

    /// Heuristic weight for weighted A*
    #[arg(long, default_value = "1.0")]
    pub weight: f64,

    /// Time budget in seconds
    #[arg(long, default_value = "5.0")]
    pub timebound: f64,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

type Outcome = AnytimeOutcome<PuzzleState, Direction>;

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run solve command
///
/// 1. Load and validate the puzzle
/// 2. Run the selected anytime driver
/// 3. Report the best plan
pub fn run(args: SolveArgs) -> Result<()> {
    let (name, initial) = load_problem(&args)?;

    tracing::info!(
        "Solving {}: {:?} search, {:?} heuristic, weight={}, timebound={}s",
        name,
        args.algorithm,
        args.heuristic,
        args.weight,
        args.timebound
    );

    let outcome = solve(initial.clone(), &args)?;

    report_results(&name, &initial, &outcome, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_problem(args: &SolveArgs) -> Result<(String, PuzzleState)> {
    let spec = PuzzleSpec::load(&args.problem)?;
    let state = spec
        .to_state()
        .with_context(|| format!("Invalid puzzle in {}", args.problem.display()))?;
    let name = spec
        .name
        .clone()
        .unwrap_or_else(|| args.problem.display().to_string());
    Ok((name, state))
}

fn solve(initial: PuzzleState, args: &SolveArgs) -> Result<Outcome> {
    if !args.timebound.is_finite() || args.timebound < 0.0 {
        bail!("timebound must be a non-negative number of seconds, got {}", args.timebound);
    }
    let timebound = Duration::from_secs_f64(args.timebound);
    let heuristic = args.heuristic.as_fn();

    let outcome = match args.algorithm {
        SolveAlgorithm::Weighted => {
            let config = AnytimeConfig::default()
                .with_timebound(timebound)
                .with_weight(args.weight);
            anytime_weighted_astar(SnowmanPuzzle, initial, heuristic, config)
        }
        SolveAlgorithm::Greedy => anytime_gbfs(SnowmanPuzzle, initial, heuristic, timebound),
    };
    Ok(outcome)
}

fn report_results(name: &str, initial: &PuzzleState, outcome: &Outcome, args: &SolveArgs) {
    if args.json {
        print_json_results(name, outcome, args);
    } else {
        print_text_results(name, initial, outcome);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// States visited by following `plan` from `initial`
fn replay(initial: &PuzzleState, plan: &[Direction]) -> Vec<PuzzleState> {
    let mut states = vec![initial.clone()];
    let mut current = initial.clone();
    for &direction in plan {
        match current.apply(direction) {
            Some(next) => {
                states.push(next.clone());
                current = next;
            }
            None => {
                tracing::warn!("plan step {} is not applicable; replay stopped", direction);
                break;
            }
        }
    }
    states
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn format_plan(plan: &[Direction]) -> String {
    plan.iter().map(|d| d.name()).collect::<Vec<_>>().join(" ")
}

fn print_json_results(name: &str, outcome: &Outcome, args: &SolveArgs) {
    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        name: &'a str,
        algorithm: String,
        heuristic: HeuristicKind,
        weight: f64,
        solved: bool,
        cost: Option<f64>,
        plan: Vec<&'static str>,
        rounds: usize,
        improvements: usize,
        expanded: usize,
    }

    let best = outcome.best.as_ref();
    let output = JsonOutput {
        name,
        algorithm: format!("{:?}", args.algorithm).to_lowercase(),
        heuristic: args.heuristic,
        weight: args.weight,
        solved: best.is_some(),
        cost: best.map(|s| s.gval),
        plan: best.map(|s| s.path.iter().map(|d| d.name()).collect()).unwrap_or_default(),
        rounds: outcome.rounds,
        improvements: outcome.improvements,
        expanded: best.map_or(0, |s| s.expanded),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

fn print_text_results(name: &str, initial: &PuzzleState, outcome: &Outcome) {
    println!("\n=== {} ===", name);
    println!("{}", initial);

    let Some(best) = &outcome.best else {
        println!("No solution found ({} rounds)", outcome.rounds);
        return;
    };

    println!("Cost:         {}", best.gval);
    println!("Rounds:       {} ({} improvements)", outcome.rounds, outcome.improvements);
    println!("Expanded:     {}", best.expanded);
    println!("Plan:         {}", format_plan(&best.path));

    if let Some(last) = replay(initial, &best.path).last() {
        println!("\nFinal state:\n{}", last);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_puzzle() -> PuzzleState {
        PuzzleSpec {
            name: None,
            map: [".....", "..b..", ".m*..", "..s..", "R...."].iter().map(|r| r.to_string()).collect(),
            destination: None,
        }
        .to_state()
        .unwrap()
    }

    fn args(algorithm: SolveAlgorithm) -> SolveArgs {
        SolveArgs {
            problem: PathBuf::from("unused.json"),
            algorithm,
            heuristic: HeuristicKind::Manhattan,
            weight: 2.0,
            timebound: 2.0,
            json: false,
        }
    }

    #[test]
    fn test_solve_and_replay() {
        let initial = small_puzzle();
        for algorithm in [SolveAlgorithm::Weighted, SolveAlgorithm::Greedy] {
            let outcome = solve(initial.clone(), &args(algorithm)).unwrap();
            let best = outcome.best.expect("puzzle is solvable");
            let states = replay(&initial, &best.path);
            assert_eq!(states.len(), best.path.len() + 1);
            assert!(states.last().unwrap().is_goal());
        }
    }

    #[test]
    fn test_negative_timebound_is_rejected() {
        let mut bad = args(SolveAlgorithm::Weighted);
        bad.timebound = -1.0;
        assert!(solve(small_puzzle(), &bad).is_err());
    }

    #[test]
    fn test_format_plan() {
        assert_eq!(format_plan(&[Direction::Up, Direction::Left]), "up left");
        assert_eq!(format_plan(&[]), "");
    }
}
