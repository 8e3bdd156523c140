//! Error types for input validation

use crate::grid::Cell;

/// Errors from the strict board deserializer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("board is empty")]
    Empty,

    #[error("invalid cell symbol {0:?} (expected 0, 1 or 2)")]
    InvalidSymbol(String),

    #[error("row {row} has {len} cells, expected {expected}")]
    RaggedRow { row: usize, len: usize, expected: usize },

    #[error("board has {rows} rows but {cols} columns")]
    NotSquare { rows: usize, cols: usize },

    #[error("unbalanced brackets in board literal")]
    UnbalancedBrackets,
}

/// Errors from the supervisor handshake line
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("expected 5 comma-separated fields, got {0}")]
    FieldCount(usize),

    #[error("field {field} is not an integer: {value:?}")]
    NotInteger { field: &'static str, value: String },

    #[error("color must be 1 or 2, got {0}")]
    InvalidColor(i64),

    #[error("depth limit must be -1 (unlimited) or non-negative, got {0}")]
    InvalidDepth(i64),

    #[error("flag {field} must be 0 or 1, got {value}")]
    InvalidFlag { field: &'static str, value: i64 },
}

/// Errors from puzzle definition validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PuzzleError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("{what} at ({}, {}) is outside the grid", .cell.x, .cell.y)]
    OutOfBounds { what: &'static str, cell: Cell },

    #[error("cell ({}, {}) is occupied twice", .0.x, .0.y)]
    Overlap(Cell),

    #[error("map has no {0}")]
    Missing(&'static str),

    #[error("unknown snowball size {0:?}")]
    UnknownSize(char),
}
