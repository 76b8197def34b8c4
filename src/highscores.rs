//! Best score persistence
//!
//! A single integer: the farthest distance score ever reached.
//! Missing or corrupt data reads as zero.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, PersistenceError};
use crate::platform::Storage;

/// Best distance score across runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BestScore {
    pub score: u64,
}

impl BestScore {
    /// Storage key
    const STORAGE_KEY: &'static str = "lane_hopper_best_score";

    /// Envelope version
    const VERSION: u32 = 1;

    pub fn new(score: u64) -> Self {
        Self { score }
    }

    /// Check if a score beats the stored best
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.score
    }

    /// Record a finished run's score. Returns true if it is a new best.
    pub fn record(&mut self, score: u64) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.score = score;
        true
    }

    /// Load the best score, treating absence or corruption as zero
    pub fn load(storage: &Storage) -> Self {
        match Self::try_load(storage) {
            Ok(Some(best)) => {
                log::info!("Loaded best score {}", best.score);
                best
            }
            Ok(None) => {
                log::info!("No best score found, starting fresh");
                Self::default()
            }
            Err(err) => {
                log::warn!("Best score unreadable ({}), treating as 0", err);
                Self::default()
            }
        }
    }

    fn try_load(storage: &Storage) -> Result<Option<Self>, PersistenceError> {
        let Some(json) = storage.get_item(Self::STORAGE_KEY)? else {
            return Ok(None);
        };
        // Older builds stored the bare integer
        if let Ok(score) = json.trim().parse::<u64>() {
            return Ok(Some(Self::new(score)));
        }
        Ok(Some(persistence::decode(&json, Self::VERSION)?))
    }

    /// Save the best score
    pub fn save(&self, storage: &Storage) -> Result<(), PersistenceError> {
        let json = persistence::encode(self, Self::VERSION)?;
        storage.set_item(Self::STORAGE_KEY, &json)?;
        log::info!("Best score saved ({})", self.score);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_only_improves() {
        let mut best = BestScore::new(10);
        assert!(!best.record(10));
        assert!(!best.record(3));
        assert_eq!(best.score, 10);
        assert!(best.record(11));
        assert_eq!(best.score, 11);
    }

    #[test]
    fn test_zero_never_qualifies_over_zero() {
        let best = BestScore::default();
        assert!(!best.qualifies(0));
        assert!(best.qualifies(1));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_load_tolerates_missing_and_corrupt() {
        let dir = std::env::temp_dir().join(format!("lane_hopper_best_{}", std::process::id()));
        let storage = Storage::in_dir(&dir);
        assert_eq!(BestScore::load(&storage).score, 0);

        storage.set_item(BestScore::STORAGE_KEY, "garbage{").unwrap();
        assert_eq!(BestScore::load(&storage).score, 0);

        storage.set_item(BestScore::STORAGE_KEY, "17").unwrap();
        assert_eq!(BestScore::load(&storage).score, 17);

        BestScore::new(42).save(&storage).unwrap();
        assert_eq!(BestScore::load(&storage).score, 42);
        let _ = std::fs::remove_dir_all(dir);
    }
}
