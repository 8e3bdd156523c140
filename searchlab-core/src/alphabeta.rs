//! Alpha-beta pruning with optional move ordering and caching
//!
//! ## Architecture (4-layer granularity)
//! - Level 1: `select_move_alphabeta()`, `AlphaBetaSearcher::search()`
//! - Level 2: `AlphaBetaSearcher::root()` (deterministic root choice)
//! - Level 3: `AlphaBetaSearcher::alphabeta()` (fail-soft recursion)
//! - Level 4: `expand()` (child generation and ordering)
//!
//! The root keeps the first legal move (in rules order) among those with
//! the best value, exactly like minimax, whatever order children are
//! searched in. Each later root child is searched with a window that still
//! proves ties exactly.

use std::cmp::Reverse;

use crate::cache::{CacheEntry, EntryType, TranspositionCache};
use crate::config::SearchConfig;
use crate::eval::compute_utility;
use crate::minimax::{next_depth, Role, SearchResult, SearchStats};
use crate::othello::{Board, GameRules, Move, Othello, Player};

/// Child position tagged with its index in the legal move list
struct Child {
    index: usize,
    mv: Move,
    board: Board,
}

/// Alpha-beta searcher owning one cache per role. Its caches hold bound
/// entries and are never shared with a minimax searcher.
pub struct AlphaBetaSearcher<R = Othello> {
    rules: R,
    config: SearchConfig,
    alpha_cache: TranspositionCache,
    beta_cache: TranspositionCache,
    stats: SearchStats,
}

impl AlphaBetaSearcher<Othello> {
    pub fn new(config: SearchConfig) -> Self {
        Self::with_rules(Othello, config)
    }
}

impl<R: GameRules> AlphaBetaSearcher<R> {
    pub fn with_rules(rules: R, config: SearchConfig) -> Self {
        Self {
            rules,
            config,
            alpha_cache: TranspositionCache::new(),
            beta_cache: TranspositionCache::new(),
            stats: SearchStats::default(),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    // ========================================================================
    // LEVEL 1 - ENTRY
    // ========================================================================

    /// Search from `board` with `player` as MAX
    pub fn search(&mut self, board: &Board, player: Player) -> SearchResult {
        self.stats = SearchStats::default();
        let (best_move, value) = self.root(board, player);
        tracing::debug!(
            "alphabeta: move={:?} value={} positions={} cutoffs={} cache_hits={}",
            best_move,
            value,
            self.stats.positions,
            self.stats.cutoffs,
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

    pub fn reset(&mut self) {
        self.alpha_cache.clear();
        self.beta_cache.clear();
    }

    // ========================================================================
    // LEVEL 2 - ROOT
    // ========================================================================

    fn root(&mut self, board: &Board, max_player: Player) -> (Option<Move>, i32) {
        self.stats.positions += 1;
        let depth = self.config.depth_limit;

        let moves = self.rules.possible_moves(board, max_player);
        if depth == Some(0) || moves.is_empty() {
            return (None, self.config.evaluation.evaluate(board, max_player));
        }

        let mut best: Option<(usize, Move, i32)> = None;
        for child in self.expand(board, max_player, Role::Max, moves) {
            // One below the best so far: a tie still comes back exact
            let alpha = best.map_or(i32::MIN, |(_, _, value)| value.saturating_sub(1));
            let (_, value) = self.alphabeta(&child.board, max_player, Role::Min, alpha, i32::MAX, next_depth(depth));

            let better = match best {
                None => true,
                Some((index, _, best_value)) => value > best_value || (value == best_value && child.index < index),
            };
            if better {
                best = Some((child.index, child.mv, value));
            }
        }

        match best {
            Some((_, mv, value)) => (Some(mv), value),
            None => (None, self.config.evaluation.evaluate(board, max_player)),
        }
    }

    // ========================================================================
    // LEVEL 3 - RECURSION
    // ========================================================================

    fn alphabeta(
        &mut self,
        board: &Board,
        max_player: Player,
        role: Role,
        mut alpha: i32,
        mut beta: i32,
        depth: Option<u32>,
    ) -> (Option<Move>, i32) {
        self.stats.positions += 1;
        let mover = role.mover(max_player);

        if self.config.caching {
            if let Some(hit) = self.cache(role).probe(board, mover, depth, alpha, beta) {
                self.stats.cache_hits += 1;
                return hit;
            }
        }

        let moves = self.rules.possible_moves(board, mover);
        if depth == Some(0) || moves.is_empty() {
            return (None, self.config.evaluation.evaluate(board, max_player));
        }

        let (alpha_in, beta_in) = (alpha, beta);
        let mut best_move = None;
        let mut best_value = role.worst();

        let children = self.expand(board, max_player, role, moves);
        let total = children.len();
        for (searched, child) in children.into_iter().enumerate() {
            let (_, value) = self.alphabeta(&child.board, max_player, role.opposite(), alpha, beta, next_depth(depth));
            if role.prefers(value, best_value) {
                best_move = Some(child.mv);
                best_value = value;
            }
            match role {
                Role::Max => alpha = alpha.max(best_value),
                Role::Min => beta = beta.min(best_value),
            }
            if beta <= alpha {
                self.stats.cutoffs += (total - searched - 1) as u64;
                break;
            }
        }

        if self.config.caching {
            let entry = CacheEntry {
                best_move,
                value: best_value,
                depth,
                entry_type: EntryType::classify(best_value, alpha_in, beta_in),
            };
            self.cache_mut(role).store(board.clone(), mover, entry);
        }

        (best_move, best_value)
    }

    // ========================================================================
    // LEVEL 4 - CHILDREN
    // ========================================================================

    /// Successor boards, best-looking first for the role when ordering is on
    fn expand(&self, board: &Board, max_player: Player, role: Role, moves: Vec<Move>) -> Vec<Child> {
        let mover = role.mover(max_player);
        let mut children: Vec<Child> = moves
            .into_iter()
            .enumerate()
            .map(|(index, mv)| Child {
                index,
                mv,
                board: self.rules.play_move(board, mover, mv),
            })
            .collect();

        if self.config.ordering {
            match role {
                Role::Max => children.sort_by_key(|c| Reverse(compute_utility(&c.board, max_player))),
                Role::Min => children.sort_by_key(|c| compute_utility(&c.board, max_player)),
            }
        }
        children
    }

    fn cache(&self, role: Role) -> &TranspositionCache {
        match role {
            Role::Max => &self.alpha_cache,
            Role::Min => &self.beta_cache,
        }
    }

    fn cache_mut(&mut self, role: Role) -> &mut TranspositionCache {
        match role {
            Role::Max => &mut self.alpha_cache,
            Role::Min => &mut self.beta_cache,
        }
    }
}

/// Alpha-beta move for `color` with a fresh searcher
pub fn select_move_alphabeta(
    board: &Board,
    color: Player,
    limit: Option<u32>,
    caching: bool,
    ordering: bool,
) -> Option<Move> {
    let config = SearchConfig::default()
        .with_depth_limit(limit)
        .with_caching(caching)
        .with_ordering(ordering);
    AlphaBetaSearcher::new(config).select_move(board, color)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minimax::{select_move_minimax, MinimaxSearcher};

    fn configs(depth: Option<u32>) -> Vec<SearchConfig> {
        let base = SearchConfig::default().with_depth_limit(depth);
        vec![
            base,
            base.with_caching(true),
            base.with_ordering(true),
            base.with_caching(true).with_ordering(true),
        ]
    }

    #[test]
    fn test_opening_matches_minimax() {
        let board = Board::initial(4);
        let expected = select_move_minimax(&board, Player::Dark, Some(4), false);
        let mv = select_move_alphabeta(&board, Player::Dark, Some(4), false, false);
        assert_eq!(mv, expected);
        assert!(Othello.possible_moves(&board, Player::Dark).contains(&mv.unwrap()));
    }

    #[test]
    fn test_all_variants_agree_with_minimax() {
        let board = Board::initial(6);
        for depth in [Some(1), Some(2), Some(3)] {
            for player in [Player::Dark, Player::Light] {
                let reference = MinimaxSearcher::new(SearchConfig::default().with_depth_limit(depth)).search(&board, player);
                for config in configs(depth) {
                    let result = AlphaBetaSearcher::new(config).search(&board, player);
                    assert_eq!(result.best_move, reference.best_move, "{:?} {:?}", config, player);
                    assert_eq!(result.value, reference.value, "{:?} {:?}", config, player);
                }
            }
        }
    }

    #[test]
    fn test_pruning_visits_fewer_positions() {
        let board = Board::initial(6);
        let config = SearchConfig::default().with_depth_limit(Some(4));
        let plain = MinimaxSearcher::new(config).search(&board, Player::Dark);
        let pruned = AlphaBetaSearcher::new(config).search(&board, Player::Dark);
        assert!(pruned.stats.positions < plain.stats.positions);
        assert!(pruned.stats.cutoffs > 0);
    }

    #[test]
    fn test_depth_zero_returns_no_move() {
        let result = AlphaBetaSearcher::new(SearchConfig::default().with_depth_limit(Some(0)))
            .search(&Board::initial(4), Player::Dark);
        assert_eq!(result.best_move, None);
        assert_eq!(result.value, 0);
    }

    #[test]
    fn test_cache_persists_between_calls() {
        let board = Board::initial(4);
        let mut searcher = AlphaBetaSearcher::new(SearchConfig::default().with_depth_limit(Some(3)).with_caching(true));
        let first = searcher.search(&board, Player::Dark);
        let second = searcher.search(&board, Player::Dark);
        assert_eq!(first.best_move, second.best_move);
        assert_eq!(first.value, second.value);
        assert!(second.stats.cache_hits > 0);
        assert!(second.stats.positions <= first.stats.positions);
    }

    #[test]
    fn test_ordering_puts_best_child_first_for_max() {
        let board = Board::initial(4);
        let searcher = AlphaBetaSearcher::new(SearchConfig::default().with_ordering(true));
        let moves = Othello.possible_moves(&board, Player::Dark);
        let children = searcher.expand(&board, Player::Dark, Role::Max, moves);
        let values: Vec<i32> = children.iter().map(|c| compute_utility(&c.board, Player::Dark)).collect();
        assert!(values.windows(2).all(|w| w[0] >= w[1]));
    }
}
