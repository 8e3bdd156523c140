//! Anytime search drivers
//!
//! Re-run a bounded frontier search until the time budget runs out,
//! tightening the cost bound after every improved solution.
//!
//! ## Architecture (4-layer granularity)
//! - Level 1: `anytime_weighted_astar()`, `anytime_gbfs()`
//! - Level 2: `run_anytime()` (improvement loop)
//! - Level 3: bound tightening
//! - Level 4: `AnytimeConfig`

use std::time::{Duration, Instant};

use crate::engine::{CostBound, FrontierExplorer, SearchEngine, SearchProblem, Solution, Strategy};
use crate::valuation::NodeValuation;

// ============================================================================
// CONFIGURATION (Level 4)
// ============================================================================

/// Anytime driver configuration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnytimeConfig {
    /// Wall-clock budget for the whole driver run
    pub timebound: Duration,
    /// Heuristic weight for the weighted variant (>= 1)
    pub weight: f64,
}

impl Default for AnytimeConfig {
    fn default() -> Self {
        Self {
            timebound: Duration::from_secs(5),
            weight: 1.0,
        }
    }
}

impl AnytimeConfig {
    pub fn with_timebound(mut self, timebound: Duration) -> Self {
        self.timebound = timebound;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

/// Result of a driver run
#[derive(Clone, Debug)]
pub struct AnytimeOutcome<S, A> {
    /// Cheapest solution found, if any
    pub best: Option<Solution<S, A>>,
    /// Bounded search calls made
    pub rounds: usize,
    /// Solutions that improved on the previous best
    pub improvements: usize,
}

// ============================================================================
// LEVEL 1 - ENTRY POINTS
// ============================================================================

/// Anytime weighted A*: rank by g + weight * h
pub fn anytime_weighted_astar<P, H>(
    problem: P,
    initial: P::State,
    heuristic: H,
    config: AnytimeConfig,
) -> AnytimeOutcome<P::State, P::Action>
where
    P: SearchProblem,
    H: Fn(&P::State) -> f64,
{
    if config.weight < 1.0 {
        tracing::warn!("weight {} is below 1; search is no longer greedy-biased", config.weight);
    }
    let strategy = Strategy::Custom(NodeValuation::new(config.weight));
    let mut engine = SearchEngine::new(problem, initial, heuristic, strategy);
    run_anytime(&mut engine, config.timebound)
}

/// Anytime greedy best-first: rank by h alone
pub fn anytime_gbfs<P, H>(
    problem: P,
    initial: P::State,
    heuristic: H,
    timebound: Duration,
) -> AnytimeOutcome<P::State, P::Action>
where
    P: SearchProblem,
    H: Fn(&P::State) -> f64,
{
    let mut engine = SearchEngine::new(problem, initial, heuristic, Strategy::BestFirst);
    run_anytime(&mut engine, timebound)
}

// ============================================================================
// LEVEL 2 - IMPROVEMENT LOOP
// ============================================================================

/// Drive `explorer` until the budget expires, a call fails, or a call
/// returns nothing cheaper than the current best. The explorer is
/// deterministic, so repeating a non-improving call under the same bound
/// cannot help.
pub fn run_anytime<E: FrontierExplorer>(explorer: &mut E, timebound: Duration) -> AnytimeOutcome<E::State, E::Action> {
    let deadline = Instant::now() + timebound;
    let mut bound = CostBound::UNBOUNDED;
    let mut outcome = AnytimeOutcome {
        best: None,
        rounds: 0,
        improvements: 0,
    };

    loop {
        outcome.rounds += 1;
        let Some(found) = explorer.search(deadline, bound) else {
            tracing::debug!("round {}: no solution within bound", outcome.rounds);
            break;
        };

        if found.gval <= bound.g {
            if is_improvement(outcome.best.as_ref(), &found) {
                tracing::debug!("round {}: improved solution g={}", outcome.rounds, found.gval);
                bound = CostBound::tightened(found.gval);
                outcome.best = Some(found);
                outcome.improvements += 1;
            } else {
                break;
            }
        }

        if Instant::now() >= deadline {
            break;
        }
    }

    match &outcome.best {
        Some(best) => tracing::info!(
            "anytime search finished: g={} after {} rounds",
            best.gval,
            outcome.rounds
        ),
        None => tracing::info!("anytime search found no solution in {} rounds", outcome.rounds),
    }

    outcome
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn is_improvement<S, A>(best: Option<&Solution<S, A>>, found: &Solution<S, A>) -> bool {
    best.map_or(true, |best| found.gval < best.gval)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Explorer that replays a fixed script of results
    struct Scripted {
        results: VecDeque<Option<f64>>,
        calls: usize,
        bounds: Vec<CostBound>,
    }

    impl Scripted {
        fn new(results: &[Option<f64>]) -> Self {
            Self {
                results: results.iter().copied().collect(),
                calls: 0,
                bounds: Vec::new(),
            }
        }
    }

    impl FrontierExplorer for Scripted {
        type State = u32;
        type Action = ();

        fn search(&mut self, _deadline: Instant, bound: CostBound) -> Option<Solution<u32, ()>> {
            self.calls += 1;
            self.bounds.push(bound);
            let gval = self.results.pop_front().flatten()?;
            Some(Solution {
                state: gval as u32,
                gval,
                path: Vec::new(),
                expanded: 0,
            })
        }
    }

    #[test]
    fn test_zero_budget_makes_exactly_one_call() {
        let mut explorer = Scripted::new(&[Some(9.0), Some(4.0)]);
        let outcome = run_anytime(&mut explorer, Duration::ZERO);
        assert_eq!(explorer.calls, 1);
        assert_eq!(outcome.best.unwrap().gval, 9.0);

        let mut explorer = Scripted::new(&[None]);
        let outcome = run_anytime(&mut explorer, Duration::ZERO);
        assert_eq!(explorer.calls, 1);
        assert!(outcome.best.is_none());
    }

    #[test]
    fn test_bound_tightens_after_each_improvement() {
        let mut explorer = Scripted::new(&[Some(10.0), Some(7.0), Some(5.0), None]);
        let outcome = run_anytime(&mut explorer, Duration::from_secs(10));
        assert_eq!(outcome.best.unwrap().gval, 5.0);
        assert_eq!(outcome.improvements, 3);
        assert_eq!(explorer.bounds[0], CostBound::UNBOUNDED);
        assert_eq!(explorer.bounds[1], CostBound { g: 10.0, h: 10.0, f: 20.0 });
        assert_eq!(explorer.bounds[3], CostBound::tightened(5.0));
    }

    #[test]
    fn test_failure_keeps_previous_best() {
        let mut explorer = Scripted::new(&[Some(6.0), None, Some(1.0)]);
        let outcome = run_anytime(&mut explorer, Duration::from_secs(10));
        assert_eq!(outcome.best.unwrap().gval, 6.0);
        assert_eq!(explorer.calls, 2);
    }

    #[test]
    fn test_stops_when_no_strict_improvement() {
        let mut explorer = Scripted::new(&[Some(6.0), Some(6.0), Some(2.0)]);
        let outcome = run_anytime(&mut explorer, Duration::from_secs(10));
        assert_eq!(outcome.best.unwrap().gval, 6.0);
        assert_eq!(explorer.calls, 2);
    }

    #[test]
    fn test_result_outside_bound_is_ignored() {
        let mut explorer = Scripted::new(&[Some(6.0), Some(8.0), Some(3.0), None]);
        let outcome = run_anytime(&mut explorer, Duration::from_secs(10));
        assert_eq!(outcome.best.unwrap().gval, 3.0);
        assert_eq!(outcome.improvements, 2);
    }

    #[test]
    fn test_config_builder() {
        let config = AnytimeConfig::default()
            .with_weight(2.5)
            .with_timebound(Duration::from_millis(250));
        assert_eq!(config.weight, 2.5);
        assert_eq!(config.timebound, Duration::from_millis(250));
    }
}
