//! Remaining-cost estimates for puzzle states
//!
//! All estimators return a non-negative value; the refined estimator
//! returns `f64::INFINITY` for states it can prove unsolvable.

use serde::{Deserialize, Serialize};

use crate::grid::Cell;
use crate::puzzle::{PuzzleState, SnowballSize};

/// Selectable heuristic, used by configuration and the CLI
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeuristicKind {
    Manhattan,
    Alternate,
    Trivial,
    Zero,
}

impl HeuristicKind {
    pub fn evaluate(self, state: &PuzzleState) -> f64 {
        match self {
            HeuristicKind::Manhattan => heur_manhattan_distance(state),
            HeuristicKind::Alternate => heur_alternate(state),
            HeuristicKind::Trivial => heur_trivial(state),
            HeuristicKind::Zero => heur_zero(state),
        }
    }

    pub fn as_fn(self) -> fn(&PuzzleState) -> f64 {
        match self {
            HeuristicKind::Manhattan => heur_manhattan_distance,
            HeuristicKind::Alternate => heur_alternate,
            HeuristicKind::Trivial => heur_trivial,
            HeuristicKind::Zero => heur_zero,
        }
    }
}

impl std::str::FromStr for HeuristicKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manhattan" => Ok(HeuristicKind::Manhattan),
            "alternate" => Ok(HeuristicKind::Alternate),
            "trivial" => Ok(HeuristicKind::Trivial),
            "zero" => Ok(HeuristicKind::Zero),
            other => Err(format!("unknown heuristic: {}", other)),
        }
    }
}

/// Sum of L1 distances from every snowball stack to the destination,
/// ignoring obstacles. Admissible: each move shifts one ball by one cell.
pub fn heur_manhattan_distance(state: &PuzzleState) -> f64 {
    let destination = state.destination();
    state
        .snowballs()
        .keys()
        .map(|cell| cell.manhattan(destination) as f64)
        .sum()
}

/// Manhattan distance scaled by stack size, or infinity as soon as any
/// stack is deadlocked.
pub fn heur_alternate(state: &PuzzleState) -> f64 {
    let destination = state.destination();
    let mut distance = 0.0;

    for (&cell, &size) in state.snowballs() {
        if is_deadlocked(state, cell) {
            return f64::INFINITY;
        }
        distance += cell.manhattan(destination) as f64 * size_multiplier(size);
    }

    distance
}

/// Number of snowball stacks left
pub fn heur_trivial(state: &PuzzleState) -> f64 {
    state.snowballs().len() as f64
}

/// Turns A* into uniform-cost search
pub fn heur_zero(_state: &PuzzleState) -> f64 {
    0.0
}

/// Snowman x3, two-ball stacks x2, single balls x1
pub fn size_multiplier(size: SnowballSize) -> f64 {
    match size {
        SnowballSize::Snowman => 3.0,
        SnowballSize::MediumOnBig | SnowballSize::SmallOnMedium | SnowballSize::SmallOnBig => 2.0,
        SnowballSize::Big | SnowballSize::Medium | SnowballSize::Small => 1.0,
    }
}

/// A stack at `cell` can never reach the destination
pub fn is_deadlocked(state: &PuzzleState, cell: Cell) -> bool {
    if cell == state.destination() {
        return false;
    }
    if state.obstacles().contains(&cell) || cell == state.robot() {
        return true;
    }
    if against_unaligned_wall(state, cell) {
        return true;
    }

    let left = state.is_blocked(Cell::new(cell.x - 1, cell.y));
    let right = state.is_blocked(Cell::new(cell.x + 1, cell.y));
    let top = state.is_blocked(Cell::new(cell.x, cell.y + 1));
    let bottom = state.is_blocked(Cell::new(cell.x, cell.y - 1));

    // Two blocked sides meeting at a corner pin the stack
    (left && top) || (top && right) || (right && bottom) || (bottom && left)
}

/// On an edge row/column the destination does not share
fn against_unaligned_wall(state: &PuzzleState, cell: Cell) -> bool {
    let destination = state.destination();
    let on_x_edge = cell.x == 0 || cell.x == state.width() - 1;
    let on_y_edge = cell.y == 0 || cell.y == state.height() - 1;
    (on_x_edge && destination.x != cell.x) || (on_y_edge && destination.y != cell.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::PuzzleSpec;

    fn state(map: &[&str], destination: (i32, i32)) -> PuzzleState {
        PuzzleSpec {
            name: None,
            map: map.iter().map(|s| s.to_string()).collect(),
            destination: Some(destination),
        }
        .to_state()
        .unwrap()
    }

    #[test]
    fn test_finished_snowman_scores_zero() {
        let s = state(&["R...", ".G..", "...."], (1, 1));
        assert_eq!(heur_manhattan_distance(&s), 0.0);
        assert_eq!(heur_alternate(&s), 0.0);
    }

    #[test]
    fn test_manhattan_sums_all_stacks() {
        let s = state(&["R....", ".b...", "...s.", "....."], (2, 2));
        // b at (1,1): 2, s at (3,2): 1
        assert_eq!(heur_manhattan_distance(&s), 3.0);
        assert_eq!(heur_trivial(&s), 2.0);
        assert_eq!(heur_zero(&s), 0.0);
    }

    #[test]
    fn test_corner_is_deadlock() {
        for corner in [(0, 0), (4, 0), (0, 4), (4, 4)] {
            let mut rows = vec![".....".to_string(); 5];
            rows[corner.1 as usize].replace_range(corner.0 as usize..corner.0 as usize + 1, "b");
            let robot_row = if corner.1 == 2 { 1 } else { 2 };
            rows[robot_row].replace_range(2..3, "R");
            let s = PuzzleSpec { name: None, map: rows, destination: Some((2, 2)) }
                .to_state()
                .unwrap();
            assert_eq!(heur_alternate(&s), f64::INFINITY, "corner {:?}", corner);
        }
    }

    #[test]
    fn test_corner_destination_is_not_deadlock() {
        let s = state(&["b....", ".....", "..R.."], (0, 0));
        assert!(!is_deadlocked(&s, Cell::new(0, 0)));
        assert_eq!(heur_alternate(&s), 0.0);
    }

    #[test]
    fn test_wall_aligned_with_destination_is_allowed() {
        // Ball on the left edge, destination on the same edge
        let s = state(&[".....", "b....", ".....", "..R.."], (0, 3));
        assert!(!is_deadlocked(&s, Cell::new(0, 1)));
        assert_eq!(heur_alternate(&s), 2.0);

        // Same ball, destination elsewhere
        let s = state(&[".....", "b....", ".....", "..R.."], (2, 3));
        assert_eq!(heur_alternate(&s), f64::INFINITY);
    }

    #[test]
    fn test_obstacle_corner_is_deadlock() {
        let s = state(&[".....", ".#...", ".#b#.", ".....", "R...."], (2, 4));
        // Interior ball with obstacles left and right: no corner pair
        assert!(!is_deadlocked(&s, Cell::new(2, 2)));

        let s = state(&[".....", "..#..", ".#b..", ".....", "R...."], (2, 4));
        // Obstacles at x - 1 and y - 1 meet at a corner
        assert!(is_deadlocked(&s, Cell::new(2, 2)));
    }

    #[test]
    fn test_size_multipliers() {
        let s = state(&["R......", ".A.....", "...s...", ".....G.", "......."], (3, 3));
        // A: (1,1) -> 4 * 2, s: (3,2) -> 1 * 1, G: (5,3) -> 2 * 3
        assert_eq!(heur_alternate(&s), 15.0);
        assert_eq!(heur_manhattan_distance(&s), 7.0);
        assert!(heur_alternate(&s) >= heur_manhattan_distance(&s));
    }

    #[test]
    fn test_manhattan_never_exceeds_optimal_cost() {
        use crate::engine::{CostBound, SearchEngine, Strategy};
        use crate::puzzle::SnowmanPuzzle;
        use std::time::{Duration, Instant};

        let maps: [(&[&str], (i32, i32)); 3] = [
            (&["Rs.A", "...."], (3, 0)),
            (&["R.....", "..s...", "...A.."], (3, 2)),
            (&[".....", "..b..", ".m...", "..s..", "R...."], (2, 2)),
        ];

        for (map, destination) in maps {
            let initial = state(map, destination);
            let engine = SearchEngine::new(SnowmanPuzzle, initial.clone(), heur_zero, Strategy::UniformCost);
            let deadline = Instant::now() + Duration::from_secs(30);
            let optimal = engine.run(deadline, CostBound::UNBOUNDED).expect("map is solvable");

            // Every suffix of an optimal plan is optimal from where it starts
            let mut current = initial;
            for (step, &direction) in optimal.path.iter().enumerate() {
                let remaining = optimal.gval - step as f64;
                assert!(heur_manhattan_distance(&current) <= remaining, "{:?} step {}", map, step);
                current = current.apply(direction).unwrap();
            }
            assert!(current.is_goal());
            assert_eq!(heur_manhattan_distance(&current), 0.0);
        }
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("manhattan".parse::<HeuristicKind>(), Ok(HeuristicKind::Manhattan));
        assert_eq!("alternate".parse::<HeuristicKind>(), Ok(HeuristicKind::Alternate));
        assert!("euclid".parse::<HeuristicKind>().is_err());
    }
}
