//! Local leaderboard of finished sessions
//!
//! Persisted to LocalStorage, keeps the top 10 by correct answers with the
//! level reached breaking ties.

use serde::{Deserialize, Serialize};

use crate::battle::FinalScore;
use crate::problems::{Difficulty, GeneratorConfig, OperationType};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// One finished session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Correct answers
    pub score: u32,
    /// Level reached
    pub level: u32,
    pub operation: OperationType,
    pub difficulty: Difficulty,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

impl HighScoreEntry {
    /// True if this entry ranks above a (score, level) pair
    fn beats(&self, score: u32, level: u32) -> bool {
        (self.score, self.level) >= (score, level)
    }
}

/// High score leaderboard, best first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "math_battle_highscores";

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Index a result would be inserted at
    fn insertion_index(&self, score: u32, level: u32) -> usize {
        self.entries
            .iter()
            .position(|e| !e.beats(score, level))
            .unwrap_or(self.entries.len())
    }

    /// Check if a result makes the leaderboard. Sessions without a single
    /// correct answer never do.
    pub fn qualifies(&self, score: u32, level: u32) -> bool {
        score > 0 && self.insertion_index(score, level) < MAX_HIGH_SCORES
    }

    /// Rank a result would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u32, level: u32) -> Option<usize> {
        self.qualifies(score, level)
            .then(|| self.insertion_index(score, level) + 1)
    }

    /// Record a finished session. Returns the rank achieved (1-indexed) or
    /// None if it didn't qualify.
    pub fn add_score(
        &mut self,
        final_score: &FinalScore,
        config: &GeneratorConfig,
        timestamp: f64,
    ) -> Option<usize> {
        let rank = self.potential_rank(final_score.score, final_score.level)?;

        self.entries.insert(
            rank - 1,
            HighScoreEntry {
                score: final_score.score,
                level: final_score.level,
                operation: config.operation,
                difficulty: config.difficulty,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);

        log::info!("New high score #{}: {} correct", rank, final_score.score);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best number of correct answers (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Best result for one operation
    pub fn best_for(&self, operation: OperationType) -> Option<&HighScoreEntry> {
        self.entries.iter().find(|e| e.operation == operation)
    }

    /// Load high scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(scores) = serde_json::from_str::<HighScores>(&json) {
                    log::info!("Loaded {} high scores", scores.entries.len());
                    return scores;
                }
            }
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save high scores to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("High scores saved ({} entries)", self.entries.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        log::debug!(
            "High scores not persisted on native ({}, {} entries)",
            Self::STORAGE_KEY,
            self.entries.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::GameOverReason;

    fn result(score: u32, level: u32) -> FinalScore {
        FinalScore {
            level,
            score,
            reason: GameOverReason::TimeUp,
        }
    }

    #[test]
    fn test_zero_never_qualifies() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(0, 3));
        assert_eq!(scores.potential_rank(0, 3), None);
    }

    #[test]
    fn test_sorted_descending_with_level_tiebreak() {
        let mut scores = HighScores::new();
        let config = GeneratorConfig::default();
        assert_eq!(scores.add_score(&result(5, 2), &config, 1.0), Some(1));
        assert_eq!(scores.add_score(&result(9, 3), &config, 2.0), Some(1));
        assert_eq!(scores.add_score(&result(5, 4), &config, 3.0), Some(2));
        assert_eq!(scores.add_score(&result(5, 2), &config, 4.0), Some(4));

        let ranked: Vec<(u32, u32)> = scores.entries.iter().map(|e| (e.score, e.level)).collect();
        assert_eq!(ranked, vec![(9, 3), (5, 4), (5, 2), (5, 2)]);
        assert_eq!(scores.top_score(), Some(9));
    }

    #[test]
    fn test_full_board_keeps_ten() {
        let mut scores = HighScores::new();
        let config = GeneratorConfig::default();
        for score in 1..=10 {
            scores.add_score(&result(score * 2, 1), &config, 0.0);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert!(!scores.qualifies(2, 1));
        assert!(!scores.qualifies(1, 5));
        assert_eq!(scores.potential_rank(3, 1), Some(10));

        assert_eq!(scores.add_score(&result(21, 2), &config, 0.0), Some(1));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(4));
    }

    #[test]
    fn test_best_for_operation() {
        let mut scores = HighScores::new();
        let add = GeneratorConfig::default();
        let mul = GeneratorConfig::new(OperationType::Multiplication, 6, Difficulty::Hard);
        scores.add_score(&result(4, 1), &add, 0.0);
        scores.add_score(&result(7, 2), &mul, 0.0);
        scores.add_score(&result(3, 1), &mul, 0.0);

        assert_eq!(scores.best_for(OperationType::Multiplication).map(|e| e.score), Some(7));
        assert_eq!(scores.best_for(OperationType::Addition).map(|e| e.score), Some(4));
        assert!(scores.best_for(OperationType::Division).is_none());
    }
}
