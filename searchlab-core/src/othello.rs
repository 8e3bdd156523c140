//! Othello board, moves and rules
//!
//! Boards are square grids of empty/dark/light squares, hashable so they
//! can key transposition caches. Moves are `(column, row)` pairs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BoardError;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player color. Dark (1) moves first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Dark = 1,
    Light = 2,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::Dark => Player::Light,
            Player::Light => Player::Dark,
        }
    }

    /// Protocol color number
    pub fn color(self) -> u8 {
        self as u8
    }

    pub fn from_color(color: u8) -> Option<Self> {
        match color {
            1 => Some(Player::Dark),
            2 => Some(Player::Light),
            _ => None,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Player::Dark => 0,
            Player::Light => 1,
        }
    }
}

/// Contents of one board square
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Square {
    Empty,
    Disk(Player),
}

impl Square {
    fn symbol(self) -> char {
        match self {
            Square::Empty => '0',
            Square::Disk(Player::Dark) => '1',
            Square::Disk(Player::Light) => '2',
        }
    }
}

/// Disk placement at `(column, row)`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub column: usize,
    pub row: usize,
}

impl Move {
    pub const fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column, self.row)
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// Square board, stored row-major
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    squares: Vec<Square>,
}

impl Board {
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            squares: vec![Square::Empty; size * size],
        }
    }

    /// Starting position: two disks of each color in the center
    pub fn initial(size: usize) -> Self {
        let mut board = Self::empty(size);
        let mid = size / 2;
        if mid > 0 {
            board.set(mid - 1, mid - 1, Square::Disk(Player::Light));
            board.set(mid, mid, Square::Disk(Player::Light));
            board.set(mid - 1, mid, Square::Disk(Player::Dark));
            board.set(mid, mid - 1, Square::Disk(Player::Dark));
        }
        board
    }

    /// Build from rows of protocol symbols (0 empty, 1 dark, 2 light)
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, BoardError> {
        let squares = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&v| match v {
                        0 => Ok(Square::Empty),
                        1 => Ok(Square::Disk(Player::Dark)),
                        2 => Ok(Square::Disk(Player::Light)),
                        other => Err(BoardError::InvalidSymbol(other.to_string())),
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_square_rows(squares)
    }

    fn from_square_rows(rows: Vec<Vec<Square>>) -> Result<Self, BoardError> {
        let size = rows.len();
        if size == 0 {
            return Err(BoardError::Empty);
        }
        let cols = rows[0].len();
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != cols {
                return Err(BoardError::RaggedRow { row, len: cells.len(), expected: cols });
            }
        }
        if cols != size {
            return Err(BoardError::NotSquare { rows: size, cols });
        }

        Ok(Self {
            size,
            squares: rows.into_iter().flatten().collect(),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, column: usize, row: usize) -> Square {
        self.squares[row * self.size + column]
    }

    pub fn set(&mut self, column: usize, row: usize, square: Square) {
        self.squares[row * self.size + column] = square;
    }

    /// Square at signed coordinates, `None` off the board
    fn get_signed(&self, column: isize, row: isize) -> Option<Square> {
        let n = self.size as isize;
        if column < 0 || row < 0 || column >= n || row >= n {
            None
        } else {
            Some(self.get(column as usize, row as usize))
        }
    }

    pub fn count(&self, player: Player) -> u32 {
        self.squares
            .iter()
            .filter(|&&s| s == Square::Disk(player))
            .count() as u32
    }

    /// (dark disks, light disks)
    pub fn score(&self) -> (u32, u32) {
        (self.count(Player::Dark), self.count(Player::Light))
    }

    /// Rows of protocol symbols
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.squares
            .chunks(self.size)
            .map(|row| row.iter().map(|s| s.symbol() as u8 - b'0').collect())
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = "-".repeat(2 * self.size.saturating_sub(1) + 5);
        writeln!(f, "{}", line)?;
        for row in self.squares.chunks(self.size) {
            write!(f, "| ")?;
            for square in row {
                match square {
                    Square::Empty => write!(f, ". ")?,
                    other => write!(f, "{} ", other.symbol())?,
                }
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "{}", line)
    }
}

/// Strict board literal parser: nested `(...)` or `[...]` rows of 0/1/2,
/// comma and/or whitespace separated, e.g. `((0, 1), (2, 0))`.
impl FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = parse_rows(s)?;
        Self::from_square_rows(rows)
    }
}

fn parse_rows(s: &str) -> Result<Vec<Vec<Square>>, BoardError> {
    let mut open: Vec<char> = Vec::new();
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut token = String::new();
    let mut finished = false;

    for ch in s.trim().chars() {
        if finished {
            if ch.is_whitespace() {
                continue;
            }
            return Err(BoardError::UnbalancedBrackets);
        }
        match ch {
            '(' | '[' => {
                if open.len() >= 2 {
                    return Err(BoardError::InvalidSymbol(ch.to_string()));
                }
                open.push(ch);
            }
            ')' | ']' => {
                flush_token(&mut token, &mut row)?;
                let opener = open.pop().ok_or(BoardError::UnbalancedBrackets)?;
                if !matches!((opener, ch), ('(', ')') | ('[', ']')) {
                    return Err(BoardError::UnbalancedBrackets);
                }
                match open.len() {
                    1 => rows.push(std::mem::take(&mut row)),
                    0 => finished = true,
                    _ => {}
                }
            }
            ',' => flush_token(&mut token, &mut row)?,
            c if c.is_whitespace() => flush_token(&mut token, &mut row)?,
            c => {
                if open.len() != 2 {
                    return Err(BoardError::InvalidSymbol(c.to_string()));
                }
                token.push(c);
            }
        }
    }

    if !finished {
        return Err(BoardError::UnbalancedBrackets);
    }
    Ok(rows)
}

fn flush_token(token: &mut String, row: &mut Vec<Square>) -> Result<(), BoardError> {
    if token.is_empty() {
        return Ok(());
    }
    let square = match token.as_str() {
        "0" => Square::Empty,
        "1" => Square::Disk(Player::Dark),
        "2" => Square::Disk(Player::Light),
        _ => return Err(BoardError::InvalidSymbol(std::mem::take(token))),
    };
    row.push(square);
    token.clear();
    Ok(())
}

// ============================================================================
// RULES
// ============================================================================

/// Game rules the searchers rely on
pub trait GameRules {
    /// Legal moves for `player`, in a fixed deterministic order
    fn possible_moves(&self, board: &Board, player: Player) -> Vec<Move>;

    /// Board after `player` plays `mv`. `mv` is assumed legal.
    fn play_move(&self, board: &Board, player: Player, mv: Move) -> Board;

    /// (dark disks, light disks)
    fn score(&self, board: &Board) -> (u32, u32) {
        board.score()
    }
}

/// Line directions as (column delta, row delta)
const LINE_DIRECTIONS: [(isize, isize); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Standard Othello flipping rules
#[derive(Clone, Copy, Debug, Default)]
pub struct Othello;

impl Othello {
    /// Opponent lines `player` would bracket by playing at (column, row)
    pub fn find_lines(board: &Board, column: usize, row: usize, player: Player) -> Vec<Vec<(usize, usize)>> {
        let mut lines = Vec::new();
        for (dc, dr) in LINE_DIRECTIONS {
            let mut c = column as isize;
            let mut r = row as isize;
            let mut line = Vec::new();
            loop {
                c += dc;
                r += dr;
                match board.get_signed(c, r) {
                    Some(Square::Disk(p)) if p == player => {
                        if !line.is_empty() {
                            lines.push(line);
                        }
                        break;
                    }
                    Some(Square::Disk(_)) => line.push((c as usize, r as usize)),
                    Some(Square::Empty) | None => break,
                }
            }
        }
        lines
    }
}

impl GameRules for Othello {
    fn possible_moves(&self, board: &Board, player: Player) -> Vec<Move> {
        let mut moves = Vec::new();
        for column in 0..board.size() {
            for row in 0..board.size() {
                if board.get(column, row) == Square::Empty
                    && !Self::find_lines(board, column, row, player).is_empty()
                {
                    moves.push(Move::new(column, row));
                }
            }
        }
        moves
    }

    fn play_move(&self, board: &Board, player: Player, mv: Move) -> Board {
        let mut next = board.clone();
        for line in Self::find_lines(board, mv.column, mv.row, player) {
            for (c, r) in line {
                next.set(c, r, Square::Disk(player));
            }
        }
        next.set(mv.column, mv.row, Square::Disk(player));
        next
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_board() {
        let board = Board::initial(4);
        assert_eq!(board.score(), (2, 2));
        assert_eq!(board.get(1, 1), Square::Disk(Player::Light));
        assert_eq!(board.get(2, 2), Square::Disk(Player::Light));
        assert_eq!(board.get(1, 2), Square::Disk(Player::Dark));
        assert_eq!(board.get(2, 1), Square::Disk(Player::Dark));
    }

    #[test]
    fn test_opening_moves() {
        let board = Board::initial(4);
        let moves = Othello.possible_moves(&board, Player::Dark);
        assert_eq!(
            moves,
            vec![Move::new(0, 1), Move::new(1, 0), Move::new(2, 3), Move::new(3, 2)]
        );
    }

    #[test]
    fn test_play_move_flips_line() {
        let board = Board::initial(4);
        let next = Othello.play_move(&board, Player::Dark, Move::new(0, 1));
        assert_eq!(next.get(0, 1), Square::Disk(Player::Dark));
        assert_eq!(next.get(1, 1), Square::Disk(Player::Dark));
        assert_eq!(next.score(), (4, 1));
        // Original untouched
        assert_eq!(board.score(), (2, 2));
    }

    #[test]
    fn test_no_moves_on_full_board() {
        let board: Board = "((1,1),(1,2))".parse().unwrap();
        assert!(Othello.possible_moves(&board, Player::Dark).is_empty());
        assert!(Othello.possible_moves(&board, Player::Light).is_empty());
    }

    #[test]
    fn test_parse_tuple_and_list_literals() {
        let a: Board = "((0, 0, 0, 0), (0, 2, 1, 0), (0, 1, 2, 0), (0, 0, 0, 0))".parse().unwrap();
        let b: Board = "[[0,0,0,0],[0,2,1,0],[0,1,2,0],[0,0,0,0]]".parse().unwrap();
        assert_eq!(a, Board::initial(4));
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!("((0, 3), (0, 0))".parse::<Board>(), Err(BoardError::InvalidSymbol("3".into())));
        assert_eq!("((0, 0), (0,))".parse::<Board>(), Err(BoardError::RaggedRow { row: 1, len: 1, expected: 2 }));
        assert_eq!("((0, 0, 0), (0, 0, 0))".parse::<Board>(), Err(BoardError::NotSquare { rows: 2, cols: 3 }));
        assert_eq!("((0, 0), (0, 0)".parse::<Board>(), Err(BoardError::UnbalancedBrackets));
        assert_eq!("((0, 0], (0, 0))".parse::<Board>(), Err(BoardError::UnbalancedBrackets));
        assert_eq!("()".parse::<Board>(), Err(BoardError::Empty));
        assert!("__import__('os')".parse::<Board>().is_err());
    }

    #[test]
    fn test_rows_round_trip() {
        let board = Board::initial(6);
        assert_eq!(Board::from_rows(&board.to_rows()).unwrap(), board);
        assert!(Board::from_rows(&[vec![0, 5]]).is_err());
    }

    #[test]
    fn test_display() {
        let board: Board = "((0,1),(2,0))".parse().unwrap();
        assert_eq!(board.to_string(), "------\n| . 1 |\n| 2 . |\n------\n");
    }

    #[test]
    fn test_random_games_flip_consistently() {
        use rand::{Rng, SeedableRng};
        use rand_chacha::ChaCha8Rng;

        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..20 {
            let mut board = Board::initial(6);
            let mut player = Player::Dark;
            loop {
                let moves = Othello.possible_moves(&board, player);
                if moves.is_empty() {
                    if Othello.possible_moves(&board, player.opponent()).is_empty() {
                        break;
                    }
                    player = player.opponent();
                    continue;
                }
                let mv = moves[rng.gen_range(0..moves.len())];
                let next = Othello.play_move(&board, player, mv);

                // One new disk, at least one flipped
                let disks = |b: &Board| b.count(Player::Dark) + b.count(Player::Light);
                assert_eq!(disks(&next), disks(&board) + 1);
                assert!(next.count(player) >= board.count(player) + 2);

                board = next;
                player = player.opponent();
            }
            assert!(Othello.possible_moves(&board, Player::Dark).is_empty());
        }
    }

    #[test]
    fn test_player_colors() {
        assert_eq!(Player::from_color(1), Some(Player::Dark));
        assert_eq!(Player::from_color(2), Some(Player::Light));
        assert_eq!(Player::from_color(3), None);
        assert_eq!(Player::Dark.opponent().color(), 2);
    }
}
