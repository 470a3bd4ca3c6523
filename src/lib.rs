//! Star Collector - gameplay simulation for a 2D star-collecting platformer
//!
//! Core modules:
//! - `sim`: Deterministic per-tick simulation (motion, combat, collectibles, level flow)
//! - `session`: Level/progression controller driving `sim` across levels
//! - `progression`: Persisted meta-progression (high score, levels reached)
//! - `persistence`: Key-value storage backends (memory, file, LocalStorage)
//! - `level_select`: Which levels may be started
//! - `tuning`: Data-driven game balance

pub mod level_select;
pub mod persistence;
pub mod progression;
pub mod session;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use level_select::LevelSelect;
pub use progression::{Progression, ProgressionStore};
pub use session::{Screen, Session};
pub use tuning::Tuning;

/// Game configuration constants (defaults for `Tuning`)
pub mod consts {
    /// Fixed simulation timestep in milliseconds (~60 Hz)
    pub const TICK_MS: u64 = 16;

    /// World dimensions
    pub const WORLD_WIDTH: f32 = 1600.0;
    pub const WORLD_HEIGHT: f32 = 600.0;
    /// Anything below this y has fallen out of the world
    pub const FALL_LIMIT_Y: f32 = 650.0;
    /// World gravity (pixels/s², positive is down)
    pub const GRAVITY: f32 = 800.0;

    /// Player locomotion
    pub const RUN_SPEED: f32 = 200.0;
    pub const DASH_SPEED: f32 = 350.0;
    pub const JUMP_VELOCITY: f32 = -500.0;
    pub const MAX_JUMP_CHARGES: u8 = 2;
    pub const FAST_FALL_GRAVITY_SCALE: f32 = 10.0;
    pub const PLAYER_MAX_HP: u32 = 3;

    /// Stamina meter
    pub const STAMINA_MAX: f32 = 100.0;
    pub const STAMINA_DRAIN: f32 = 1.0;
    pub const STAMINA_REGEN: f32 = 0.5;
    pub const EXHAUSTION_COOLDOWN_MS: u64 = 1000;
    pub const STAMINA_BAR_WIDTH: f32 = 150.0;

    /// Dash after-images
    pub const GHOST_INTERVAL_MS: u64 = 50;
    pub const GHOST_FADE_MS: u64 = 300;
    pub const GHOST_START_ALPHA: f32 = 0.5;

    /// Post-damage invincibility: 6 pulses of 200ms
    pub const INVINCIBILITY_PULSE_MS: u64 = 200;
    pub const INVINCIBILITY_PULSES: u32 = 6;

    /// Hit reactions
    pub const KNOCKBACK_X: f32 = 200.0;
    pub const KNOCKBACK_Y: f32 = -200.0;
    pub const ENEMY_STOMP_THRESHOLD: f32 = 0.8;
    pub const BOSS_STOMP_THRESHOLD: f32 = 0.5;
    pub const ENEMY_STOMP_BOUNCE: f32 = -300.0;
    pub const BOSS_STOMP_BOUNCE: f32 = -400.0;
    /// Camera shake on every player hit
    pub const HIT_SHAKE_MS: u64 = 200;
    pub const HIT_SHAKE_INTENSITY: f32 = 0.02;

    /// Scoring
    pub const ENEMY_SCORE: u64 = 50;
    pub const COLLECTIBLE_SCORE: u64 = 10;

    /// Boss behaviour
    pub const BOSS_CHASE_RANGE: f32 = 800.0;
    /// Boss moves at half of this
    pub const BOSS_CHASE_SPEED: f32 = 150.0;
    pub const BOSS_FLASH_MS: u64 = 100;
    pub const BOSS_EXPLOSIONS: u32 = 10;
    pub const BOSS_EXPLOSION_INTERVAL_MS: u64 = 150;
    pub const BOSS_EXPLOSION_JITTER: f32 = 50.0;
    pub const BOSS_CLEAR_DELAY_MS: u64 = 2000;

    /// Projectiles
    pub const PROJECTILE_SPEED: f32 = 600.0;
    pub const PROJECTILE_TTL_MS: u64 = 1000;
    pub const FIRE_COOLDOWN_MS: u64 = 200;

    /// Roaming bombs
    pub const BOMB_SPAWN_Y: f32 = 16.0;
    pub const BOMB_MAX_SPEED_X: f32 = 200.0;
    pub const BOMB_SPEED_Y: f32 = 20.0;

    /// Level flow delays
    pub const LEVEL_CLEAR_DELAY_MS: u64 = 2000;
    pub const ALL_CLEAR_DELAY_MS: u64 = 3000;
    pub const GAME_OVER_DELAY_MS: u64 = 1000;

    /// Body sizes (width, height)
    pub const PLAYER_SIZE: (f32, f32) = (32.0, 48.0);
    pub const ENEMY_SIZE: (f32, f32) = (32.0, 48.0);
    pub const BOSS_SIZE: (f32, f32) = (64.0, 96.0);
    pub const BOMB_SIZE: (f32, f32) = (14.0, 14.0);
    pub const COLLECTIBLE_SIZE: (f32, f32) = (16.0, 16.0);
    pub const PROJECTILE_SIZE: (f32, f32) = (10.0, 10.0);
    pub const GOAL_SIZE: (f32, f32) = (40.0, 60.0);
    /// Unscaled platform tile; level records scale it
    pub const PLATFORM_SIZE: (f32, f32) = (400.0, 32.0);
}
