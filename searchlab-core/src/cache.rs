//! Transposition cache keyed by (board, side to move)
//!
//! Each searcher owns one cache per role. Entries remember the remaining
//! depth they were searched to and only answer probes at that same depth,
//! so a cache hit always reproduces what a fresh search would return.

use rustc_hash::FxHashMap;

use crate::othello::{Board, Move, Player};

/// How a stored value relates to the true value of the position
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryType {
    /// Search completed inside its window
    Exact,
    /// True value >= stored value (failed high)
    LowerBound,
    /// True value <= stored value (failed low)
    UpperBound,
}

impl EntryType {
    /// Classify a fail-soft result against the window it was searched with
    pub fn classify(value: i32, alpha: i32, beta: i32) -> Self {
        if value <= alpha {
            EntryType::UpperBound
        } else if value >= beta {
            EntryType::LowerBound
        } else {
            EntryType::Exact
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheEntry {
    pub best_move: Option<Move>,
    pub value: i32,
    /// Remaining depth, `None` for an unlimited search
    pub depth: Option<u32>,
    pub entry_type: EntryType,
}

#[derive(Clone, Debug, Default)]
pub struct TranspositionCache {
    /// Indexed by side to move
    tables: [FxHashMap<Board, CacheEntry>; 2],
}

impl TranspositionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached `(move, value)` usable inside the window `(alpha, beta)`.
    /// Bound entries answer only when they already prove a cutoff.
    pub fn probe(
        &self,
        board: &Board,
        player: Player,
        depth: Option<u32>,
        alpha: i32,
        beta: i32,
    ) -> Option<(Option<Move>, i32)> {
        let entry = self.tables[player.index()].get(board)?;
        if entry.depth != depth {
            return None;
        }
        match entry.entry_type {
            EntryType::Exact => Some((entry.best_move, entry.value)),
            EntryType::LowerBound if entry.value >= beta => Some((entry.best_move, entry.value)),
            EntryType::UpperBound if entry.value <= alpha => Some((entry.best_move, entry.value)),
            _ => None,
        }
    }

    pub fn get(&self, board: &Board, player: Player) -> Option<&CacheEntry> {
        self.tables[player.index()].get(board)
    }

    /// Insert or overwrite the entry for (board, player)
    pub fn store(&mut self, board: Board, player: Player, entry: CacheEntry) {
        self.tables[player.index()].insert(board, entry);
    }

    pub fn len(&self) -> usize {
        self.tables.iter().map(|t| t.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        for table in &mut self.tables {
            table.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(value: i32, depth: Option<u32>, entry_type: EntryType) -> CacheEntry {
        CacheEntry {
            best_move: Some(Move::new(0, 1)),
            value,
            depth,
            entry_type,
        }
    }

    #[test]
    fn test_exact_hit() {
        let mut cache = TranspositionCache::new();
        let board = Board::initial(4);
        cache.store(board.clone(), Player::Dark, entry(3, Some(2), EntryType::Exact));

        assert_eq!(cache.probe(&board, Player::Dark, Some(2), i32::MIN, i32::MAX), Some((Some(Move::new(0, 1)), 3)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_side_to_move_is_part_of_key() {
        let mut cache = TranspositionCache::new();
        let board = Board::initial(4);
        cache.store(board.clone(), Player::Dark, entry(3, None, EntryType::Exact));
        assert!(cache.probe(&board, Player::Light, None, i32::MIN, i32::MAX).is_none());
    }

    #[test]
    fn test_depth_must_match() {
        let mut cache = TranspositionCache::new();
        let board = Board::initial(4);
        cache.store(board.clone(), Player::Dark, entry(3, Some(4), EntryType::Exact));
        assert!(cache.probe(&board, Player::Dark, Some(2), i32::MIN, i32::MAX).is_none());
        assert!(cache.probe(&board, Player::Dark, None, i32::MIN, i32::MAX).is_none());
    }

    #[test]
    fn test_bounds_only_answer_cutoffs() {
        let mut cache = TranspositionCache::new();
        let board = Board::initial(4);

        cache.store(board.clone(), Player::Dark, entry(5, Some(1), EntryType::LowerBound));
        assert!(cache.probe(&board, Player::Dark, Some(1), 0, 10).is_none());
        assert_eq!(cache.probe(&board, Player::Dark, Some(1), 0, 5).map(|(_, v)| v), Some(5));

        cache.store(board.clone(), Player::Dark, entry(-2, Some(1), EntryType::UpperBound));
        assert!(cache.probe(&board, Player::Dark, Some(1), -5, 10).is_none());
        assert_eq!(cache.probe(&board, Player::Dark, Some(1), -2, 10).map(|(_, v)| v), Some(-2));
    }

    #[test]
    fn test_classify() {
        assert_eq!(EntryType::classify(0, 0, 10), EntryType::UpperBound);
        assert_eq!(EntryType::classify(10, 0, 10), EntryType::LowerBound);
        assert_eq!(EntryType::classify(4, 0, 10), EntryType::Exact);
    }

    #[test]
    fn test_clear() {
        let mut cache = TranspositionCache::new();
        cache.store(Board::initial(4), Player::Light, entry(1, None, EntryType::Exact));
        assert!(!cache.is_empty());
        cache.clear();
        assert!(cache.is_empty());
    }
}
