//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads lives here so a level pack or
//! a playtest build can override it from JSON. Missing fields fall back to the
//! values in `crate::consts`.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Clock ===
    /// Milliseconds of simulated time per tick
    pub tick_ms: u64,

    // === World ===
    pub world_width: f32,
    pub world_height: f32,
    pub fall_limit_y: f32,
    pub gravity: f32,

    // === Player ===
    pub run_speed: f32,
    pub dash_speed: f32,
    pub jump_velocity: f32,
    pub max_jump_charges: u8,
    pub fast_fall_gravity_scale: f32,
    pub player_max_hp: u32,

    // === Stamina ===
    pub stamina_max: f32,
    pub stamina_drain: f32,
    pub stamina_regen: f32,
    pub exhaustion_cooldown_ms: u64,

    // === Dash ghosts ===
    pub ghost_interval_ms: u64,
    pub ghost_fade_ms: u64,

    // === Invincibility ===
    pub invincibility_pulse_ms: u64,
    pub invincibility_pulses: u32,

    // === Combat ===
    pub knockback_x: f32,
    pub knockback_y: f32,
    pub enemy_stomp_threshold: f32,
    pub boss_stomp_threshold: f32,
    pub enemy_stomp_bounce: f32,
    pub boss_stomp_bounce: f32,
    pub hit_shake_ms: u64,
    pub hit_shake_intensity: f32,
    pub enemy_score: u64,
    pub collectible_score: u64,

    // === Boss ===
    pub boss_chase_range: f32,
    pub boss_chase_speed: f32,
    pub boss_flash_ms: u64,
    pub boss_explosions: u32,
    pub boss_explosion_interval_ms: u64,
    pub boss_explosion_jitter: f32,
    pub boss_clear_delay_ms: u64,

    // === Projectiles ===
    pub projectile_speed: f32,
    pub projectile_ttl_ms: u64,
    pub fire_cooldown_ms: u64,

    // === Bombs ===
    pub bomb_spawn_y: f32,
    pub bomb_max_speed_x: f32,
    pub bomb_speed_y: f32,

    // === Level flow ===
    pub level_clear_delay_ms: u64,
    pub all_clear_delay_ms: u64,
    pub game_over_delay_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tick_ms: TICK_MS,

            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            fall_limit_y: FALL_LIMIT_Y,
            gravity: GRAVITY,

            run_speed: RUN_SPEED,
            dash_speed: DASH_SPEED,
            jump_velocity: JUMP_VELOCITY,
            max_jump_charges: MAX_JUMP_CHARGES,
            fast_fall_gravity_scale: FAST_FALL_GRAVITY_SCALE,
            player_max_hp: PLAYER_MAX_HP,

            stamina_max: STAMINA_MAX,
            stamina_drain: STAMINA_DRAIN,
            stamina_regen: STAMINA_REGEN,
            exhaustion_cooldown_ms: EXHAUSTION_COOLDOWN_MS,

            ghost_interval_ms: GHOST_INTERVAL_MS,
            ghost_fade_ms: GHOST_FADE_MS,

            invincibility_pulse_ms: INVINCIBILITY_PULSE_MS,
            invincibility_pulses: INVINCIBILITY_PULSES,

            knockback_x: KNOCKBACK_X,
            knockback_y: KNOCKBACK_Y,
            enemy_stomp_threshold: ENEMY_STOMP_THRESHOLD,
            boss_stomp_threshold: BOSS_STOMP_THRESHOLD,
            enemy_stomp_bounce: ENEMY_STOMP_BOUNCE,
            boss_stomp_bounce: BOSS_STOMP_BOUNCE,
            hit_shake_ms: HIT_SHAKE_MS,
            hit_shake_intensity: HIT_SHAKE_INTENSITY,
            enemy_score: ENEMY_SCORE,
            collectible_score: COLLECTIBLE_SCORE,

            boss_chase_range: BOSS_CHASE_RANGE,
            boss_chase_speed: BOSS_CHASE_SPEED,
            boss_flash_ms: BOSS_FLASH_MS,
            boss_explosions: BOSS_EXPLOSIONS,
            boss_explosion_interval_ms: BOSS_EXPLOSION_INTERVAL_MS,
            boss_explosion_jitter: BOSS_EXPLOSION_JITTER,
            boss_clear_delay_ms: BOSS_CLEAR_DELAY_MS,

            projectile_speed: PROJECTILE_SPEED,
            projectile_ttl_ms: PROJECTILE_TTL_MS,
            fire_cooldown_ms: FIRE_COOLDOWN_MS,

            bomb_spawn_y: BOMB_SPAWN_Y,
            bomb_max_speed_x: BOMB_MAX_SPEED_X,
            bomb_speed_y: BOMB_SPEED_Y,

            level_clear_delay_ms: LEVEL_CLEAR_DELAY_MS,
            all_clear_delay_ms: ALL_CLEAR_DELAY_MS,
            game_over_delay_ms: GAME_OVER_DELAY_MS,
        }
    }
}

/// Error loading a tuning file
#[derive(Debug)]
pub enum TuningError {
    IoError(std::io::Error),
    ParseError(serde_json::Error),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::IoError(e) => write!(f, "IO error: {}", e),
            TuningError::ParseError(e) => write!(f, "Tuning parse error: {}", e),
        }
    }
}

impl std::error::Error for TuningError {}

impl From<std::io::Error> for TuningError {
    fn from(err: std::io::Error) -> Self {
        TuningError::IoError(err)
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        TuningError::ParseError(err)
    }
}

impl Tuning {
    /// Parse tuning from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Load tuning from a JSON file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Clamp values that would break the simulation's invariants
    pub fn sanitized(mut self) -> Self {
        self.tick_ms = self.tick_ms.max(1);
        self.stamina_max = self.stamina_max.max(1.0);
        self.stamina_drain = self.stamina_drain.max(0.0);
        self.stamina_regen = self.stamina_regen.max(0.0);
        self.player_max_hp = self.player_max_hp.max(1);
        self.world_width = self.world_width.max(1.0);
        self.enemy_stomp_threshold = self.enemy_stomp_threshold.clamp(0.0, 1.0);
        self.boss_stomp_threshold = self.boss_stomp_threshold.clamp(0.0, 1.0);
        // Used as symmetric sampling ranges
        self.bomb_max_speed_x = self.bomb_max_speed_x.abs();
        self.boss_explosion_jitter = self.boss_explosion_jitter.abs();
        self
    }

    /// Seconds per tick, for velocity integration
    pub fn dt(&self) -> f32 {
        self.tick_ms as f32 / 1000.0
    }

    /// Total invincibility window after a hit
    pub fn invincibility_ms(&self) -> u64 {
        self.invincibility_pulse_ms
            .saturating_mul(self.invincibility_pulses as u64)
    }
}
