//! Snowman puzzle: a robot pushes snowballs around a grid and stacks
//! them into a snowman on the destination cell.
//!
//! - `SnowballSize`: the seven stack classes and the stacking table
//! - `PuzzleState`: immutable snapshot (clone to produce successors)
//! - `SnowmanPuzzle`: the `SearchProblem` the frontier explorer runs on
//! - `PuzzleSpec`: JSON problem definition with a textual map

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::engine::{SearchProblem, Successor};
use crate::error::PuzzleError;
use crate::grid::{Cell, Direction, DIRECTIONS};

// ============================================================================
// SNOWBALL SIZES
// ============================================================================

/// Size class of the snowball stack occupying a cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SnowballSize {
    Big,
    Medium,
    Small,
    /// Medium on big
    MediumOnBig,
    /// Small on medium
    SmallOnMedium,
    /// Small on big
    SmallOnBig,
    /// Small on medium on big
    Snowman,
}

impl SnowballSize {
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'b' => Some(SnowballSize::Big),
            'm' => Some(SnowballSize::Medium),
            's' => Some(SnowballSize::Small),
            'A' => Some(SnowballSize::MediumOnBig),
            'B' => Some(SnowballSize::SmallOnMedium),
            'C' => Some(SnowballSize::SmallOnBig),
            'G' => Some(SnowballSize::Snowman),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            SnowballSize::Big => 'b',
            SnowballSize::Medium => 'm',
            SnowballSize::Small => 's',
            SnowballSize::MediumOnBig => 'A',
            SnowballSize::SmallOnMedium => 'B',
            SnowballSize::SmallOnBig => 'C',
            SnowballSize::Snowman => 'G',
        }
    }

    /// Number of balls in the stack
    pub fn ball_count(self) -> u32 {
        match self {
            SnowballSize::Big | SnowballSize::Medium | SnowballSize::Small => 1,
            SnowballSize::MediumOnBig | SnowballSize::SmallOnMedium | SnowballSize::SmallOnBig => 2,
            SnowballSize::Snowman => 3,
        }
    }

    /// Split a two-ball stack into (top, bottom)
    pub fn split(self) -> Option<(SnowballSize, SnowballSize)> {
        match self {
            SnowballSize::MediumOnBig => Some((SnowballSize::Medium, SnowballSize::Big)),
            SnowballSize::SmallOnMedium => Some((SnowballSize::Small, SnowballSize::Medium)),
            SnowballSize::SmallOnBig => Some((SnowballSize::Small, SnowballSize::Big)),
            _ => None,
        }
    }

    /// Stack a single ball on top of `below`, if the sizes allow it
    pub fn stack_onto(self, below: SnowballSize) -> Option<SnowballSize> {
        match (self, below) {
            (SnowballSize::Medium, SnowballSize::Big) => Some(SnowballSize::MediumOnBig),
            (SnowballSize::Small, SnowballSize::Medium) => Some(SnowballSize::SmallOnMedium),
            (SnowballSize::Small, SnowballSize::Big) => Some(SnowballSize::SmallOnBig),
            (SnowballSize::Small, SnowballSize::MediumOnBig) => Some(SnowballSize::Snowman),
            _ => None,
        }
    }
}

// ============================================================================
// PUZZLE STATE
// ============================================================================

/// Fixed part of a puzzle, shared by every state of one problem
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    pub width: i32,
    pub height: i32,
    pub obstacles: BTreeSet<Cell>,
    pub destination: Cell,
}

/// Puzzle state (clone to mutate)
///
/// Equality and hashing only look at the robot and the snowballs: states
/// of one problem always share the same layout.
#[derive(Clone, Debug)]
pub struct PuzzleState {
    layout: Arc<Layout>,
    robot: Cell,
    snowballs: BTreeMap<Cell, SnowballSize>,
}

impl PartialEq for PuzzleState {
    fn eq(&self, other: &Self) -> bool {
        self.robot == other.robot
            && self.snowballs == other.snowballs
            && (Arc::ptr_eq(&self.layout, &other.layout) || self.layout == other.layout)
    }
}

impl Eq for PuzzleState {}

impl Hash for PuzzleState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.robot.hash(state);
        self.snowballs.hash(state);
    }
}

impl PuzzleState {
    /// Create a validated state. Robot, snowball and obstacle cells must be
    /// pairwise disjoint and on the grid.
    pub fn new(
        width: i32,
        height: i32,
        obstacles: BTreeSet<Cell>,
        robot: Cell,
        snowballs: BTreeMap<Cell, SnowballSize>,
        destination: Cell,
    ) -> Result<Self, PuzzleError> {
        if width <= 0 || height <= 0 {
            return Err(PuzzleError::InvalidDimensions { width, height });
        }
        let check = |what: &'static str, cell: Cell| {
            if cell.in_bounds(width, height) {
                Ok(())
            } else {
                Err(PuzzleError::OutOfBounds { what, cell })
            }
        };

        check("robot", robot)?;
        check("destination", destination)?;
        for &cell in &obstacles {
            check("obstacle", cell)?;
        }
        for &cell in snowballs.keys() {
            check("snowball", cell)?;
            if cell == robot || obstacles.contains(&cell) {
                return Err(PuzzleError::Overlap(cell));
            }
        }
        if obstacles.contains(&robot) {
            return Err(PuzzleError::Overlap(robot));
        }

        Ok(Self {
            layout: Arc::new(Layout { width, height, obstacles, destination }),
            robot,
            snowballs,
        })
    }

    pub fn width(&self) -> i32 {
        self.layout.width
    }

    pub fn height(&self) -> i32 {
        self.layout.height
    }

    pub fn obstacles(&self) -> &BTreeSet<Cell> {
        &self.layout.obstacles
    }

    pub fn destination(&self) -> Cell {
        self.layout.destination
    }

    pub fn robot(&self) -> Cell {
        self.robot
    }

    pub fn snowballs(&self) -> &BTreeMap<Cell, SnowballSize> {
        &self.snowballs
    }

    /// Cell is off the grid or holds an obstacle
    pub fn is_blocked(&self, cell: Cell) -> bool {
        !cell.in_bounds(self.layout.width, self.layout.height) || self.layout.obstacles.contains(&cell)
    }

    /// A snowman stands on the destination
    pub fn is_goal(&self) -> bool {
        self.snowballs.get(&self.layout.destination) == Some(&SnowballSize::Snowman)
    }

    /// Apply a robot move, returning `None` if it is illegal
    pub fn apply(&self, direction: Direction) -> Option<PuzzleState> {
        let target = self.robot.step(direction);
        if self.is_blocked(target) {
            return None;
        }

        let Some(&stack) = self.snowballs.get(&target) else {
            let mut next = self.clone();
            next.robot = target;
            return Some(next);
        };

        let beyond = target.step(direction);
        if self.is_blocked(beyond) {
            return None;
        }

        let mut next = self.clone();
        match stack.ball_count() {
            1 => {
                let landed = self.land(stack, beyond)?;
                next.snowballs.remove(&target);
                next.snowballs.insert(beyond, landed);
                next.robot = target;
            }
            2 => {
                let (top, bottom) = stack.split()?;
                let landed = self.land(top, beyond)?;
                next.snowballs.insert(target, bottom);
                next.snowballs.insert(beyond, landed);
            }
            _ => return None,
        }
        Some(next)
    }

    /// Size of the stack formed when a single `ball` lands on `cell`
    fn land(&self, ball: SnowballSize, cell: Cell) -> Option<SnowballSize> {
        match self.snowballs.get(&cell) {
            None => Some(ball),
            Some(&below) => ball.stack_onto(below),
        }
    }
}

impl fmt::Display for PuzzleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.layout.height {
            for x in 0..self.layout.width {
                let cell = Cell::new(x, y);
                let symbol = if cell == self.robot {
                    'R'
                } else if let Some(size) = self.snowballs.get(&cell) {
                    size.symbol()
                } else if self.layout.obstacles.contains(&cell) {
                    '#'
                } else if cell == self.layout.destination {
                    '*'
                } else {
                    '.'
                };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// ============================================================================
// SEARCH PROBLEM
// ============================================================================

/// The snowman puzzle as a search problem. Every move costs 1.
#[derive(Clone, Copy, Debug, Default)]
pub struct SnowmanPuzzle;

impl SearchProblem for SnowmanPuzzle {
    type State = PuzzleState;
    type Action = Direction;

    fn successors(&self, state: &PuzzleState) -> Vec<Successor<PuzzleState, Direction>> {
        DIRECTIONS
            .iter()
            .filter_map(|&direction| {
                state.apply(direction).map(|next| Successor {
                    action: direction,
                    state: next,
                    cost: 1.0,
                })
            })
            .collect()
    }

    fn is_goal(&self, state: &PuzzleState) -> bool {
        state.is_goal()
    }
}

// ============================================================================
// PROBLEM DEFINITIONS
// ============================================================================

/// Puzzle definition file.
///
/// Map symbols: `.` floor, `#` obstacle, `R` robot, `*` destination
/// (optional when `destination` is given), and the snowball sizes
/// `b m s A B C G`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PuzzleSpec {
    #[serde(default)]
    pub name: Option<String>,
    pub map: Vec<String>,
    /// Required when the destination cell is covered by a snowball
    #[serde(default)]
    pub destination: Option<(i32, i32)>,
}

impl PuzzleSpec {
    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read puzzle file {}", path.display()))?;
        let spec: PuzzleSpec = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse puzzle file {}", path.display()))?;
        Ok(spec)
    }

    /// Parse the map into a validated initial state
    pub fn to_state(&self) -> Result<PuzzleState, PuzzleError> {
        let height = self.map.len() as i32;
        let width = self.map.iter().map(|row| row.chars().count()).max().unwrap_or(0) as i32;

        let mut obstacles = BTreeSet::new();
        let mut snowballs = BTreeMap::new();
        let mut robot = None;
        let mut destination = self.destination.map(Cell::from);

        for (y, row) in self.map.iter().enumerate() {
            for (x, symbol) in row.chars().enumerate() {
                let cell = Cell::new(x as i32, y as i32);
                match symbol {
                    '.' | ' ' => {}
                    '#' => {
                        obstacles.insert(cell);
                    }
                    'R' => {
                        if robot.replace(cell).is_some() {
                            return Err(PuzzleError::Overlap(cell));
                        }
                    }
                    '*' => {
                        destination.get_or_insert(cell);
                    }
                    other => {
                        let size = SnowballSize::from_symbol(other)
                            .ok_or(PuzzleError::UnknownSize(other))?;
                        snowballs.insert(cell, size);
                    }
                }
            }
        }

        let robot = robot.ok_or(PuzzleError::Missing("robot"))?;
        let destination = destination.ok_or(PuzzleError::Missing("destination"))?;

        PuzzleState::new(width, height, obstacles, robot, snowballs, destination)
    }
}

// ============================================================================
// TESTS
// ============================================================================
