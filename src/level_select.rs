//! Level select screen model

use serde::{Deserialize, Serialize};

/// One entry on the level select screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelEntry {
    pub level: u32,
    pub unlocked: bool,
}

/// Which levels may be started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelSelect {
    level_reached: u32,
    level_count: u32,
}

impl LevelSelect {
    pub fn new(level_reached: u32, level_count: u32) -> Self {
        Self {
            level_reached: level_reached.max(1),
            level_count,
        }
    }

    pub fn is_unlocked(&self, level: u32) -> bool {
        level >= 1 && level <= self.level_count && level <= self.level_reached
    }

    pub fn entries(&self) -> Vec<LevelEntry> {
        (1..=self.level_count)
            .map(|level| LevelEntry {
                level,
                unlocked: self.is_unlocked(level),
            })
            .collect()
    }
}
