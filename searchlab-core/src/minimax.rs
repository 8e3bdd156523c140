//! Depth-limited minimax
//!
//! ## Architecture (4-layer granularity)
//! - Level 1: `select_move_minimax()`, `MinimaxSearcher::search()`
//! - Level 2: `MinimaxSearcher::minimax()` (alternating MAX/MIN recursion)
//! - Level 3: leaf evaluation, cache probe/store
//! - Level 4: `Role`, `SearchStats`

use crate::cache::{CacheEntry, EntryType, TranspositionCache};
use crate::config::SearchConfig;
use crate::othello::{Board, GameRules, Move, Othello, Player};

// ============================================================================
// SHARED SEARCH TYPES (Level 4)
// ============================================================================

/// Side of the tree being evaluated. MAX is the searching agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Max,
    Min,
}

impl Role {
    pub fn opposite(self) -> Self {
        match self {
            Role::Max => Role::Min,
            Role::Min => Role::Max,
        }
    }

    /// Player to move at a node of this role
    pub fn mover(self, max_player: Player) -> Player {
        match self {
            Role::Max => max_player,
            Role::Min => max_player.opponent(),
        }
    }

    /// Starting value any real value improves on
    pub fn worst(self) -> i32 {
        match self {
            Role::Max => i32::MIN,
            Role::Min => i32::MAX,
        }
    }

    /// `candidate` strictly beats `current` for this role
    pub fn prefers(self, candidate: i32, current: i32) -> bool {
        match self {
            Role::Max => candidate > current,
            Role::Min => candidate < current,
        }
    }
}

/// Work counters for one search call
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes entered, including leaves and cache hits
    pub positions: u64,
    pub cache_hits: u64,
    /// Siblings skipped by alpha-beta cutoffs
    pub cutoffs: u64,
}

/// Chosen move and its backed-up value from MAX's perspective
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub value: i32,
    pub stats: SearchStats,
}

/// Remaining depth one ply further down
pub(crate) fn next_depth(depth: Option<u32>) -> Option<u32> {
    depth.map(|d| d.saturating_sub(1))
}

// ============================================================================
// MINIMAX SEARCHER
// ============================================================================

/// Minimax searcher owning one cache per role
pub struct MinimaxSearcher<R = Othello> {
    rules: R,
    config: SearchConfig,
    max_cache: TranspositionCache,
    min_cache: TranspositionCache,
    stats: SearchStats,
}

impl MinimaxSearcher<Othello> {
    pub fn new(config: SearchConfig) -> Self {
        Self::with_rules(Othello, config)
    }
}

impl<R: GameRules> MinimaxSearcher<R> {
    pub fn with_rules(rules: R, config: SearchConfig) -> Self {
        Self {
            rules,
            config,
            max_cache: TranspositionCache::new(),
            min_cache: TranspositionCache::new(),
            stats: SearchStats::default(),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search from `board` with `player` as MAX
    pub fn search(&mut self, board: &Board, player: Player) -> SearchResult {
        self.stats = SearchStats::default();
        let (best_move, value) = self.minimax(board, player, Role::Max, self.config.depth_limit);
        tracing::debug!(
            "minimax: move={:?} value={} positions={} cache_hits={}",
            best_move,
            value,
            self.stats.positions,
            self.stats.cache_hits
        );
        SearchResult {
            best_move,
            value,
            stats: self.stats,
        }
    }

    pub fn select_move(&mut self, board: &Board, player: Player) -> Option<Move> {
        self.search(board, player).best_move
    }

    /// Drop cached positions, e.g. between independent games
    pub fn reset(&mut self) {
        self.max_cache.clear();
        self.min_cache.clear();
    }

    fn cache(&self, role: Role) -> &TranspositionCache {
        match role {
            Role::Max => &self.max_cache,
            Role::Min => &self.min_cache,
        }
    }

    fn cache_mut(&mut self, role: Role) -> &mut TranspositionCache {
        match role {
            Role::Max => &mut self.max_cache,
            Role::Min => &mut self.min_cache,
        }
    }

    fn minimax(&mut self, board: &Board, max_player: Player, role: Role, depth: Option<u32>) -> (Option<Move>, i32) {
        self.stats.positions += 1;
        let mover = role.mover(max_player);

        if self.config.caching {
            if let Some(hit) = self.cache(role).probe(board, mover, depth, i32::MIN, i32::MAX) {
                self.stats.cache_hits += 1;
                return hit;
            }
        }

        let moves = self.rules.possible_moves(board, mover);
        if depth == Some(0) || moves.is_empty() {
            return (None, self.config.evaluation.evaluate(board, max_player));
        }

        let mut best_move = None;
        let mut best_value = role.worst();
        for mv in moves {
            let child = self.rules.play_move(board, mover, mv);
            let (_, value) = self.minimax(&child, max_player, role.opposite(), next_depth(depth));
            if role.prefers(value, best_value) {
                best_move = Some(mv);
                best_value = value;
            }
        }

        if self.config.caching {
            let entry = CacheEntry {
                best_move,
                value: best_value,
                depth,
                entry_type: EntryType::Exact,
            };
            self.cache_mut(role).store(board.clone(), mover, entry);
        }

        (best_move, best_value)
    }
}

/// Minimax move for `color` with a fresh searcher
pub fn select_move_minimax(board: &Board, color: Player, limit: Option<u32>, caching: bool) -> Option<Move> {
    let config = SearchConfig::default()
        .with_depth_limit(limit)
        .with_caching(caching);
    MinimaxSearcher::new(config).select_move(board, color)
}

// ============================================================================
// TESTS
// ============================================================================
