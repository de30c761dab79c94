//! High score leaderboard
//!
//! Tracks the top 10 finished rounds.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::persistence::Store;
use crate::sim::GameState;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Level reached
    pub level: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard, sorted by descending score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "celestialGuardian_highScores";
    /// Single-number key written by earlier browser builds
    pub const LEGACY_KEY: &'static str = "celestialGuardianHighScore";

    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Rank a score would achieve (1-indexed), None if it doesn't qualify
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert a score if it qualifies; returns the rank achieved
    pub fn add_score(&mut self, score: u64, level: u32, timestamp: f64) -> Option<usize> {
        let rank = self.potential_rank(score)?;
        self.entries.insert(
            rank - 1,
            HighScoreEntry {
                score,
                level,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    /// Record a finished round
    pub fn record(&mut self, state: &GameState, timestamp: f64) -> Option<usize> {
        let rank = self.add_score(state.score, state.level, timestamp);
        if let Some(rank) = rank {
            log::info!("New high score #{rank}: {} (level {})", state.score, state.level);
        }
        rank
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load the leaderboard, importing a legacy single high score if that
    /// is all the store holds
    pub fn load(store: &impl Store) -> Self {
        match store.load(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<HighScores>(&json) {
                Ok(scores) => {
                    log::info!("Loaded {} high scores", scores.entries.len());
                    return scores;
                }
                Err(e) => log::warn!("Could not parse saved high scores: {e}"),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Could not load high scores: {e}"),
        }

        let mut scores = Self::new();
        let legacy = store
            .load(Self::LEGACY_KEY)
            .ok()
            .flatten()
            .and_then(|raw| raw.trim().parse::<u64>().ok());
        match legacy {
            Some(score) => {
                log::info!("Imported legacy high score {score}");
                scores.add_score(score, 1, 0.0);
            }
            None => log::info!("No high scores found, starting fresh"),
        }
        scores
    }

    pub fn save(&self, store: &mut impl Store) -> Result<(), StoreError> {
        store.save(Self::STORAGE_KEY, &serde_json::to_string(self)?)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_sorted_insert_and_rank() {
        let mut hs = HighScores::new();
        assert_eq!(hs.add_score(100, 1, 0.0), Some(1));
        assert_eq!(hs.add_score(300, 2, 0.0), Some(1));
        assert_eq!(hs.add_score(200, 2, 0.0), Some(2));
        let scores: Vec<u64> = hs.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![300, 200, 100]);
        assert_eq!(hs.top_score(), Some(300));
    }

    #[test]
    fn test_zero_never_qualifies() {
        let mut hs = HighScores::new();
        assert_eq!(hs.add_score(0, 1, 0.0), None);
        assert!(hs.is_empty());
    }

    #[test]
    fn test_full_board_keeps_top_ten() {
        let mut hs = HighScores::new();
        for s in 1..=10 {
            hs.add_score(s * 10, 1, 0.0);
        }
        assert!(!hs.qualifies(10));
        assert_eq!(hs.potential_rank(55), Some(6));
        assert_eq!(hs.add_score(55, 3, 0.0), Some(6));
        assert_eq!(hs.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(hs.entries.last().map(|e| e.score), Some(20));
    }

    #[test]
    fn test_equal_score_ranks_below_existing() {
        let mut hs = HighScores::new();
        hs.add_score(100, 1, 1.0);
        assert_eq!(hs.add_score(100, 2, 2.0), Some(2));
        assert_eq!(hs.entries[0].timestamp, 1.0);
    }

    #[test]
    fn test_round_trip_through_store() {
        let mut store = MemoryStore::default();
        let mut hs = HighScores::new();
        hs.add_score(420, 3, 1234.0);
        hs.save(&mut store).unwrap();
        assert_eq!(HighScores::load(&store), hs);
    }

    #[test]
    fn test_legacy_score_imported() {
        let mut store = MemoryStore::default();
        store.save(HighScores::LEGACY_KEY, "1850").unwrap();
        let hs = HighScores::load(&store);
        assert_eq!(hs.top_score(), Some(1850));
    }
}
