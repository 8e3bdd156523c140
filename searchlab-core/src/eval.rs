//! Position evaluation

use serde::{Deserialize, Serialize};

use crate::othello::{Board, Player, Square};

/// Wall directions scanned from an owned corner
const WALL_DIRECTIONS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Leaf scoring function used by the searchers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Evaluation {
    /// Disk difference
    #[default]
    Utility,
    /// Disk difference weighted with corner control
    Heuristic,
}

impl Evaluation {
    pub fn evaluate(self, board: &Board, player: Player) -> i32 {
        match self {
            Evaluation::Utility => compute_utility(board, player),
            Evaluation::Heuristic => compute_heuristic(board, player),
        }
    }
}

/// Disk count of `player` minus the opponent's
pub fn compute_utility(board: &Board, player: Player) -> i32 {
    let (dark, light) = board.score();
    let (dark, light) = (dark as i32, light as i32);
    match player {
        Player::Dark => dark - light,
        Player::Light => light - dark,
    }
}

/// Corner control: +1 per owned corner plus every same-color disk chained
/// to it along a wall, -2 per corner held by the opponent.
pub fn count_corners(board: &Board, player: Player) -> i32 {
    let Some(end) = board.size().checked_sub(1) else {
        return 0;
    };
    let corners = [(0, 0), (0, end), (end, 0), (end, end)];

    let mut count = 0;
    for (column, row) in corners {
        match board.get(column, row) {
            Square::Disk(p) if p == player => count += 1 + count_corner_adjacent(board, player, column, row),
            Square::Disk(_) => count -= 2,
            Square::Empty => {}
        }
    }
    count
}

fn count_corner_adjacent(board: &Board, player: Player, column: usize, row: usize) -> i32 {
    let end = board.size() as isize - 1;
    let mut count = 0;

    for (dc, dr) in WALL_DIRECTIONS {
        let (mut c, mut r) = (column as isize, row as isize);
        loop {
            c += dc;
            r += dr;
            if c < 0 || r < 0 || c > end || r > end {
                break;
            }
            if board.get(c as usize, r as usize) != Square::Disk(player) {
                break;
            }
            count += 1;
        }
    }
    count
}

/// `2 * utility + corner score`
pub fn compute_heuristic(board: &Board, player: Player) -> i32 {
    compute_utility(board, player) * 2 + count_corners(board, player)
}
