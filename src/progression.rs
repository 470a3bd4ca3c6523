//! Persisted meta-progression: best score and furthest level unlocked
//!
//! Both values only ever grow. Missing or corrupt entries fall back to the
//! defaults (0 and 1) instead of failing the load.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StoreError};

pub const HIGH_SCORE_KEY: &str = "highScore";
pub const LEVEL_REACHED_KEY: &str = "levelReached";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    pub high_score: u64,
    /// Highest unlocked level, 1-based; may exceed the level count
    pub level_reached: u32,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            high_score: 0,
            level_reached: 1,
        }
    }
}

/// Progression backed by a key-value store
#[derive(Debug)]
pub struct ProgressionStore<S: KeyValueStore> {
    store: S,
    current: Progression,
}

fn read_value<S: KeyValueStore, T: std::str::FromStr>(store: &S, key: &str) -> Option<T> {
    match store.get(key) {
        Ok(Some(raw)) => match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("Ignoring corrupt {} value {:?}", key, raw);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            log::warn!("Failed to read {}: {}", key, e);
            None
        }
    }
}

impl<S: KeyValueStore> ProgressionStore<S> {
    pub fn load(store: S) -> Self {
        let defaults = Progression::default();
        let current = Progression {
            high_score: read_value(&store, HIGH_SCORE_KEY).unwrap_or(defaults.high_score),
            level_reached: read_value(&store, LEVEL_REACHED_KEY)
                .filter(|&level: &u32| level >= 1)
                .unwrap_or(defaults.level_reached),
        };
        log::info!(
            "Progression loaded: high score {}, level reached {}",
            current.high_score,
            current.level_reached
        );
        Self { store, current }
    }

    pub fn progression(&self) -> Progression {
        self.current
    }

    pub fn high_score(&self) -> u64 {
        self.current.high_score
    }

    pub fn level_reached(&self) -> u32 {
        self.current.level_reached
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Store `score` if it beats the best. Returns whether it did.
    pub fn record_score(&mut self, score: u64) -> Result<bool, StoreError> {
        if score <= self.current.high_score {
            return Ok(false);
        }
        self.current.high_score = score;
        self.store.set(HIGH_SCORE_KEY, &score.to_string())?;
        log::info!("New high score {}", score);
        Ok(true)
    }

    /// Raise the unlocked level to `level` if higher
    pub fn record_level_reached(&mut self, level: u32) -> Result<bool, StoreError> {
        if level <= self.current.level_reached {
            return Ok(false);
        }
        self.current.level_reached = level;
        self.store.set(LEVEL_REACHED_KEY, &level.to_string())?;
        log::info!("Level {} unlocked", level);
        Ok(true)
    }

    /// Clearing level `n` unlocks `n + 1`
    pub fn record_level_cleared(&mut self, cleared: u32) -> Result<bool, StoreError> {
        self.record_level_reached(cleared.saturating_add(1))
    }
}
