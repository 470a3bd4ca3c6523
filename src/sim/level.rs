//! Level configuration records
//!
//! Levels are plain data: platforms, one patrolling platform, the goal, the
//! player spawn, enemies, star positions and an optional boss. The three
//! stock levels ship built in; a JSON level pack can replace them.

use std::fmt;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::physics::Aabb;
use crate::consts::*;

/// A static platform: center plus scale of the stock platform tile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatformSpec {
    pub x: f32,
    pub y: f32,
    #[serde(default = "one")]
    pub scale_x: f32,
    #[serde(default = "one")]
    pub scale_y: f32,
}

fn one() -> f32 {
    1.0
}

impl PlatformSpec {
    pub fn new(x: f32, y: f32, scale_x: f32, scale_y: f32) -> Self {
        Self {
            x,
            y,
            scale_x,
            scale_y,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(
            Vec2::new(self.x, self.y),
            Vec2::new(PLATFORM_SIZE.0 * self.scale_x, PLATFORM_SIZE.1 * self.scale_y),
        )
    }
}

/// The level's patrolling platform (speed 0 = stationary)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovingPlatformSpec {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub min_x: f32,
    pub max_x: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemySpec {
    pub x: f32,
    pub y: f32,
    /// Signed patrol velocity
    pub velocity_x: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BossSpec {
    pub x: f32,
    pub y: f32,
    pub hp: u32,
}

/// Immutable per-level record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub platforms: Vec<PlatformSpec>,
    pub moving_platform: MovingPlatformSpec,
    /// Ignored (goal disabled) when the level has a boss
    pub goal: Vec2,
    pub player_start: Vec2,
    #[serde(default)]
    pub enemies: Vec<EnemySpec>,
    #[serde(default)]
    pub collectibles: Vec<Vec2>,
    #[serde(default)]
    pub boss: Option<BossSpec>,
}

impl LevelConfig {
    pub fn has_boss(&self) -> bool {
        self.boss.is_some()
    }

    pub fn goal_enabled(&self) -> bool {
        !self.has_boss()
    }

    pub fn goal_aabb(&self) -> Aabb {
        Aabb::from_center(self.goal, Vec2::from(GOAL_SIZE))
    }

    /// Static platform boxes
    pub fn platform_aabbs(&self) -> Vec<Aabb> {
        self.platforms.iter().map(PlatformSpec::aabb).collect()
    }

    fn validate(&self, index: usize) -> Result<(), LevelError> {
        let level = index + 1;
        if self.platforms.is_empty() {
            return Err(LevelError::Invalid(format!("level {} has no platforms", level)));
        }
        let mp = &self.moving_platform;
        if mp.speed != 0.0 && mp.min_x > mp.max_x {
            return Err(LevelError::Invalid(format!(
                "level {} moving platform bounds {}..{} are reversed",
                level, mp.min_x, mp.max_x
            )));
        }
        if let Some(boss) = &self.boss {
            if boss.hp == 0 {
                return Err(LevelError::Invalid(format!("level {} boss has 0 hp", level)));
            }
        }
        Ok(())
    }
}

/// Error loading a level pack
#[derive(Debug)]
pub enum LevelError {
    IoError(std::io::Error),
    ParseError(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::IoError(e) => write!(f, "IO error: {}", e),
            LevelError::ParseError(e) => write!(f, "Level parse error: {}", e),
            LevelError::Invalid(msg) => write!(f, "Invalid level pack: {}", msg),
        }
    }
}

impl std::error::Error for LevelError {}

impl From<std::io::Error> for LevelError {
    fn from(err: std::io::Error) -> Self {
        LevelError::IoError(err)
    }
}

impl From<serde_json::Error> for LevelError {
    fn from(err: serde_json::Error) -> Self {
        LevelError::ParseError(err)
    }
}

/// Parse and validate a JSON array of levels
pub fn parse_levels(json: &str) -> Result<Vec<LevelConfig>, LevelError> {
    let levels: Vec<LevelConfig> = serde_json::from_str(json)?;
    if levels.is_empty() {
        return Err(LevelError::Invalid("no levels".to_string()));
    }
    for (i, level) in levels.iter().enumerate() {
        level.validate(i)?;
    }
    Ok(levels)
}

/// Load a level pack from disk
pub fn load_levels(path: impl AsRef<Path>) -> Result<Vec<LevelConfig>, LevelError> {
    let json = std::fs::read_to_string(path.as_ref())?;
    let levels = parse_levels(&json)?;
    log::info!("Loaded {} levels from {}", levels.len(), path.as_ref().display());
    Ok(levels)
}

fn v(x: f32, y: f32) -> Vec2 {
    Vec2::new(x, y)
}

fn enemy(x: f32, y: f32, velocity_x: f32) -> EnemySpec {
    EnemySpec { x, y, velocity_x }
}

/// The three stock levels
pub fn builtin_levels() -> Vec<LevelConfig> {
    vec![
        LevelConfig {
            platforms: vec![
                PlatformSpec::new(200.0, 584.0, 1.0, 1.0),
                PlatformSpec::new(800.0, 584.0, 1.0, 1.0),
                PlatformSpec::new(1400.0, 584.0, 1.0, 1.0),
                PlatformSpec::new(500.0, 420.0, 0.5, 1.0),
                PlatformSpec::new(900.0, 350.0, 0.5, 1.0),
                PlatformSpec::new(1200.0, 250.0, 0.5, 1.0),
            ],
            // Parked off-screen
            moving_platform: MovingPlatformSpec {
                x: -100.0,
                y: -100.0,
                speed: 0.0,
                min_x: 0.0,
                max_x: 0.0,
            },
            goal: v(1550.0, 520.0),
            player_start: v(100.0, 450.0),
            enemies: vec![enemy(600.0, 500.0, 100.0)],
            collectibles: vec![
                v(300.0, 450.0),
                v(500.0, 350.0),
                v(700.0, 450.0),
                v(900.0, 280.0),
                v(1100.0, 450.0),
                v(1200.0, 180.0),
                v(1400.0, 450.0),
                v(1500.0, 300.0),
            ],
            boss: None,
        },
        LevelConfig {
            platforms: vec![
                PlatformSpec::new(200.0, 584.0, 1.0, 1.0),
                PlatformSpec::new(1400.0, 400.0, 1.0, 1.0),
                PlatformSpec::new(600.0, 450.0, 0.3, 1.0),
                PlatformSpec::new(1000.0, 300.0, 0.3, 1.0),
            ],
            moving_platform: MovingPlatformSpec {
                x: 800.0,
                y: 500.0,
                speed: 150.0,
                min_x: 500.0,
                max_x: 1100.0,
            },
            goal: v(1500.0, 330.0),
            player_start: v(100.0, 450.0),
            enemies: vec![enemy(1300.0, 350.0, 100.0)],
            collectibles: vec![
                v(250.0, 450.0),
                v(400.0, 350.0),
                v(600.0, 380.0),
                v(800.0, 430.0),
                v(1000.0, 230.0),
                v(1200.0, 300.0),
                v(1350.0, 250.0),
                v(1500.0, 200.0),
            ],
            boss: None,
        },
        LevelConfig {
            platforms: vec![
                PlatformSpec::new(200.0, 584.0, 1.0, 1.0),
                PlatformSpec::new(1400.0, 584.0, 2.0, 1.0),
                PlatformSpec::new(500.0, 450.0, 0.4, 1.0),
                PlatformSpec::new(200.0, 300.0, 0.4, 1.0),
                PlatformSpec::new(500.0, 150.0, 0.4, 1.0),
                PlatformSpec::new(900.0, 300.0, 0.4, 1.0),
            ],
            moving_platform: MovingPlatformSpec {
                x: 1100.0,
                y: 450.0,
                speed: 250.0,
                min_x: 800.0,
                max_x: 1400.0,
            },
            goal: v(1500.0, 520.0),
            player_start: v(100.0, 500.0),
            enemies: vec![enemy(200.0, 250.0, 100.0)],
            collectibles: vec![
                v(300.0, 500.0),
                v(500.0, 380.0),
                v(200.0, 230.0),
                v(500.0, 80.0),
                v(900.0, 230.0),
                v(1100.0, 380.0),
                v(1300.0, 150.0),
                v(1500.0, 80.0),
            ],
            boss: Some(BossSpec {
                x: 1200.0,
                y: 400.0,
                hp: 10,
            }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_levels_are_valid() {
        let levels = builtin_levels();
        assert_eq!(levels.len(), 3);
        for (i, level) in levels.iter().enumerate() {
            level.validate(i).unwrap();
            assert_eq!(level.collectibles.len(), 8);
        }
        assert!(levels[0].goal_enabled());
        assert!(!levels[2].goal_enabled());
    }

    #[test]
    fn test_platform_scale() {
        let p = PlatformSpec::new(1400.0, 584.0, 2.0, 1.0);
        let aabb = p.aabb();
        assert_eq!(aabb.width(), 800.0);
        assert_eq!(aabb.min.y, 568.0);
    }

    #[test]
    fn test_json_level_pack() {
        let json = r#"[{
            "platforms": [{ "x": 400.0, "y": 584.0, "scale_x": 2.0 }],
            "moving_platform": { "x": 0.0, "y": 0.0, "speed": 0.0, "min_x": 0.0, "max_x": 0.0 },
            "goal": [1550.0, 520.0],
            "player_start": [100.0, 450.0],
            "collectibles": [[300.0, 450.0]]
        }]"#;
        let levels = parse_levels(json).unwrap();
        assert_eq!(levels[0].platforms[0].scale_y, 1.0);
        assert!(levels[0].enemies.is_empty());
        assert!(levels[0].boss.is_none());
    }

    #[test]
    fn test_invalid_pack_rejected() {
        assert!(matches!(parse_levels("[]"), Err(LevelError::Invalid(_))));
        let json = r#"[{
            "platforms": [],
            "moving_platform": { "x": 0.0, "y": 0.0, "speed": 0.0, "min_x": 0.0, "max_x": 0.0 },
            "goal": [0.0, 0.0],
            "player_start": [0.0, 0.0]
        }]"#;
        assert!(matches!(parse_levels(json), Err(LevelError::Invalid(_))));
    }
}
