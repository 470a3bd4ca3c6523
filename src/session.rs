//! Level/progression controller
//!
//! Owns the level pack, tuning, the progression store and the current
//! screen. Each level attempt is a fresh `GameState`; when one ends the
//! session records progression and swaps in the next screen.

use crate::level_select::LevelSelect;
use crate::persistence::KeyValueStore;
use crate::progression::{Progression, ProgressionStore};
use crate::sim::{
    GameEvent, GameState, LevelConfig, Outcome, Physics, TickInput, Transition, builtin_levels, tick,
};
use crate::tuning::Tuning;

/// What is on screen
#[derive(Debug)]
pub enum Screen {
    /// Title / level select
    Title,
    Playing(Box<GameState>),
}

pub struct Session<S: KeyValueStore> {
    levels: Vec<LevelConfig>,
    tuning: Tuning,
    progression: ProgressionStore<S>,
    seed: u64,
    /// Level loads so far; varies the seed between attempts
    attempts: u64,
    screen: Screen,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(levels: Vec<LevelConfig>, tuning: Tuning, store: S, seed: u64) -> Self {
        Self {
            levels,
            tuning,
            progression: ProgressionStore::load(store),
            seed,
            attempts: 0,
            screen: Screen::Title,
        }
    }

    /// Stock levels and tuning
    pub fn with_defaults(store: S, seed: u64) -> Self {
        Self::new(builtin_levels(), Tuning::default(), store, seed)
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn state(&self) -> Option<&GameState> {
        match &self.screen {
            Screen::Playing(state) => Some(&**state),
            Screen::Title => None,
        }
    }

    pub fn state_mut(&mut self) -> Option<&mut GameState> {
        match &mut self.screen {
            Screen::Playing(state) => Some(&mut **state),
            Screen::Title => None,
        }
    }

    pub fn is_title(&self) -> bool {
        matches!(self.screen, Screen::Title)
    }

    pub fn progression(&self) -> Progression {
        self.progression.progression()
    }

    pub fn progression_store(&self) -> &ProgressionStore<S> {
        &self.progression
    }

    /// Best score, for the title screen
    pub fn high_score(&self) -> u64 {
        self.progression.high_score()
    }

    pub fn level_count(&self) -> u32 {
        self.levels.len() as u32
    }

    pub fn level_select(&self) -> LevelSelect {
        LevelSelect::new(self.progression.level_reached(), self.level_count())
    }

    /// Title screen "start": always level 1
    pub fn start(&mut self) -> bool {
        self.start_level(1)
    }

    /// Start a level from level select; locked levels are a no-op
    pub fn start_level(&mut self, level: u32) -> bool {
        if !self.level_select().is_unlocked(level) {
            log::info!("Level {} is locked", level);
            return false;
        }
        self.load_level(level)
    }

    fn load_level(&mut self, level: u32) -> bool {
        let Some(config) = level
            .checked_sub(1)
            .and_then(|i| self.levels.get(i as usize))
        else {
            log::warn!("No level {} in a pack of {}", level, self.levels.len());
            self.screen = Screen::Title;
            return false;
        };
        let seed = self
            .seed
            .wrapping_add(self.attempts.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        self.attempts += 1;
        let state = GameState::new(level, self.level_count(), config, self.tuning.clone(), seed);
        log::info!("Loaded level {} (seed {})", level, seed);
        self.screen = Screen::Playing(Box::new(state));
        true
    }

    /// Advance one tick and return what happened
    pub fn update(&mut self, input: &TickInput, physics: &impl Physics) -> Vec<GameEvent> {
        let (events, outcome, transition) = match &mut self.screen {
            Screen::Playing(state) => {
                tick(state, input, physics);
                (state.take_events(), state.take_outcome(), state.take_transition())
            }
            Screen::Title => return Vec::new(),
        };

        if let Some(outcome) = outcome {
            self.persist(outcome);
        }
        match transition {
            Some(Transition::NextLevel(level)) => {
                self.load_level(level);
            }
            Some(Transition::Title) => {
                log::info!("Back to title");
                self.screen = Screen::Title;
            }
            None => {}
        }
        events
    }

    /// Store failures are logged; play goes on
    fn persist(&mut self, outcome: Outcome) {
        let score = match outcome {
            Outcome::Cleared { level, score } => {
                if let Err(e) = self.progression.record_level_cleared(level) {
                    log::warn!("Failed to save level progress: {}", e);
                }
                score
            }
            Outcome::Died { score } => score,
        };
        if let Err(e) = self.progression.record_score(score) {
            log::warn!("Failed to save high score: {}", e);
        }
    }
}
