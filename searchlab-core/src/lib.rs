//! Searchlab Core - Heuristic and adversarial search
//!
//! This crate provides:
//! - A best-first search engine with cost bounds and cycle checking
//! - Anytime weighted A* and greedy best-first drivers
//! - The snowman block-pushing puzzle and its heuristics
//! - Othello rules, position evaluation and minimax/alpha-beta searchers
//!   with transposition caches and move ordering
//! - The line-protocol agent session used by game supervisors

pub mod grid;
pub mod error;
pub mod engine;
pub mod valuation;
pub mod anytime;
pub mod puzzle;
pub mod heuristics;
pub mod othello;
pub mod eval;
pub mod cache;
pub mod config;
pub mod minimax;
pub mod alphabeta;
pub mod agent;

// Re-exports for convenient access
pub use grid::{Cell, Direction, DIRECTIONS};
pub use error::{BoardError, ConfigError, PuzzleError};
pub use engine::{CostBound, FrontierExplorer, SearchEngine, SearchProblem, Solution, Strategy, Successor};
pub use valuation::{fval, NodeValuation};
pub use anytime::{anytime_gbfs, anytime_weighted_astar, run_anytime, AnytimeConfig, AnytimeOutcome};
pub use puzzle::{PuzzleSpec, PuzzleState, SnowballSize, SnowmanPuzzle};
pub use heuristics::{heur_alternate, heur_manhattan_distance, heur_trivial, heur_zero, HeuristicKind};
pub use othello::{Board, GameRules, Move, Othello, Player, Square};
pub use eval::{compute_heuristic, compute_utility, count_corners, Evaluation};
pub use cache::{CacheEntry, EntryType, TranspositionCache};
pub use config::{AgentConfig, Algorithm, SearchConfig};
pub use minimax::{select_move_minimax, MinimaxSearcher, Role, SearchResult, SearchStats};
pub use alphabeta::{select_move_alphabeta, AlphaBetaSearcher};
pub use agent::{run_session, Agent, SessionSummary, DEFAULT_NAME};
