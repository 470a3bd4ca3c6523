//! Game state and core simulation types
//!
//! One `GameState` is one attempt at one level. Clearing a level or dying
//! never mutates it into the next attempt; the session builds a fresh one.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorId, Facing};
use super::boss::BossSequencer;
use super::clock::{Millis, Scheduler};
use super::collectibles::CollectibleSet;
use super::combat;
use super::level::LevelConfig;
use super::physics::{Aabb, Body};
use super::stamina::BarState;
use super::tick::InputLatch;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of a level attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Built but not yet ticked
    Loading,
    /// Active gameplay
    Playing,
    /// Goal reached (or boss beaten); simulation frozen
    LevelClear,
    /// Player out of hit points; simulation frozen
    GameOver,
}

/// Sound effects the audio layer should play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sound {
    Jump,
    Shot,
    Pickup,
    Death,
}

/// Full-screen banners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Banner {
    StageClear,
    AllClear,
    GameOver,
}

/// Presentation-only cues; nothing in the simulation reads these back
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Cue {
    Sound { sound: Sound },
    Particles { x: f32, y: f32, count: u32 },
    CameraShake { duration_ms: u64, intensity: f32 },
    /// Fast-fall tint is on for the player this tick
    FastFall { x: f32, y: f32 },
    GhostSpawned { id: u32, x: f32, y: f32 },
    GhostFaded { id: u32 },
    BossFlash { on: bool },
    Explosion { x: f32, y: f32 },
    WinBurst { x: f32, y: f32 },
    Banner { banner: Banner },
    /// Waiting for a single confirmation input
    ConfirmPrompt,
    InvincibilityEnded,
    /// Player sprite turns red on death
    DeathTint,
}

/// Events the simulation emits for presentation and persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    PlayerDamaged { hp: u32 },
    PlayerDied,
    EnemyDefeated { score_delta: u64 },
    BossDamaged { hp_remaining: u32 },
    BossDefeated,
    CollectibleCollected { score_delta: u64 },
    CollectiblesFullyCycled,
    /// `next_level` is None when the final level was cleared
    LevelCleared { next_level: Option<u32> },
    AllLevelsCleared,
    ScoreChanged { score: u64 },
    Cue { cue: Cue },
}

/// How an attempt ended; consumed once by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Cleared { level: u32, score: u64 },
    Died { score: u64 },
}

/// Where the session should go next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    NextLevel(u32),
    Title,
}

/// A roaming bomb
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub id: u32,
    pub body: Body,
    pub active: bool,
}

/// A player shot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub body: Body,
    pub spawned_at: Millis,
    pub active: bool,
}

/// Dash after-image (visual only)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ghost {
    pub id: u32,
    pub pos: Vec2,
    pub facing: Facing,
    pub spawned_at: Millis,
    pub fade_ms: Millis,
}

impl Ghost {
    /// Linear fade from half opacity to zero
    pub fn alpha(&self, now: Millis) -> f32 {
        if self.fade_ms == 0 {
            return 0.0;
        }
        let t = now.saturating_sub(self.spawned_at) as f32 / self.fade_ms as f32;
        GHOST_START_ALPHA * (1.0 - t.min(1.0))
    }
}

/// The level's patrolling platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingPlatform {
    pub body: Body,
    pub speed: f32,
    pub min_x: f32,
    pub max_x: f32,
}

impl MovingPlatform {
    /// Reverse at the patrol bounds; stationary platforms never move
    pub fn patrol(&mut self) {
        if self.speed == 0.0 {
            self.body.vel.x = 0.0;
            return;
        }
        let speed = self.speed.abs();
        if self.body.pos.x >= self.max_x {
            self.body.vel.x = -speed;
        } else if self.body.pos.x <= self.min_x {
            self.body.vel.x = speed;
        }
    }
}

/// Level goal collider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub aabb: Aabb,
    /// Disabled goals are neither visible nor collidable
    pub enabled: bool,
}

/// Snapshot the HUD draws from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub level: u32,
    pub score: u64,
    pub hearts: u32,
    pub max_hearts: u32,
    pub stamina: f32,
    pub stamina_bar_width: f32,
    pub stamina_state: BarState,
    pub boss_hp: Option<u32>,
    pub banner: Option<Banner>,
    pub awaiting_confirm: bool,
}

/// Complete state of one level attempt
#[derive(Debug, Clone)]
pub struct GameState {
    /// 1-based level number
    pub level: u32,
    /// Number of levels in the pack
    pub level_count: u32,
    pub config: LevelConfig,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Score for this attempt (never decreases)
    pub score: u64,
    /// Simulation tick counter
    pub ticks: u64,
    pub player: Actor,
    pub enemies: Vec<Actor>,
    pub boss: Option<Actor>,
    pub hazards: Vec<Hazard>,
    pub projectiles: Vec<Projectile>,
    pub collectibles: CollectibleSet,
    pub ghosts: Vec<Ghost>,
    pub platforms: Vec<Aabb>,
    pub moving_platform: MovingPlatform,
    pub goal: Goal,
    pub scheduler: Scheduler,
    pub boss_sequence: BossSequencer,
    pub banner: Option<Banner>,
    pub awaiting_confirm: bool,
    pub(crate) latch: InputLatch,
    pub(crate) events: Vec<GameEvent>,
    pub(crate) outcome: Option<Outcome>,
    pub(crate) transition: Option<Transition>,
    rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Build a fresh attempt at `level` (1-based)
    pub fn new(
        level: u32,
        level_count: u32,
        config: &LevelConfig,
        tuning: Tuning,
        seed: u64,
    ) -> Self {
        let mp = &config.moving_platform;
        let mut mp_body = Body::kinematic(Vec2::new(mp.x, mp.y), Vec2::from(PLATFORM_SIZE));
        mp_body.vel.x = mp.speed;

        let mut state = Self {
            level,
            level_count,
            config: config.clone(),
            phase: GamePhase::Loading,
            score: 0,
            ticks: 0,
            player: Actor::player(ActorId(0), config.player_start, &tuning),
            enemies: Vec::new(),
            boss: None,
            hazards: Vec::new(),
            projectiles: Vec::new(),
            collectibles: CollectibleSet::new(&config.collectibles),
            ghosts: Vec::new(),
            platforms: config.platform_aabbs(),
            moving_platform: MovingPlatform {
                body: mp_body,
                speed: mp.speed,
                min_x: mp.min_x,
                max_x: mp.max_x,
            },
            goal: Goal {
                aabb: config.goal_aabb(),
                enabled: config.goal_enabled(),
            },
            scheduler: Scheduler::new(),
            boss_sequence: BossSequencer::default(),
            banner: None,
            awaiting_confirm: false,
            latch: InputLatch::default(),
            events: Vec::new(),
            outcome: None,
            transition: None,
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };

        state.player.id = ActorId(state.next_entity_id());
        for spec in &config.enemies {
            let id = ActorId(state.next_entity_id());
            state
                .enemies
                .push(Actor::enemy(id, Vec2::new(spec.x, spec.y), spec.velocity_x));
        }
        if let Some(spec) = &config.boss {
            let id = ActorId(state.next_entity_id());
            state.boss = Some(Actor::boss(id, Vec2::new(spec.x, spec.y), spec.hp));
        }

        // One bomb is already roaming when the level starts
        let x = combat::opposite_half_x(&mut state);
        combat::spawn_bomb(&mut state, x);

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn now(&self) -> Millis {
        self.scheduler.now()
    }

    pub fn is_final_level(&self) -> bool {
        self.level >= self.level_count
    }

    /// True while motion and collisions run
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn cue(&mut self, cue: Cue) {
        self.events.push(GameEvent::Cue { cue });
    }

    /// Award points; score only ever grows
    pub fn add_score(&mut self, delta: u64) {
        if delta == 0 {
            return;
        }
        self.score = self.score.saturating_add(delta);
        self.emit(GameEvent::ScoreChanged { score: self.score });
    }

    /// Drain events emitted since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn take_outcome(&mut self) -> Option<Outcome> {
        self.outcome.take()
    }

    pub fn take_transition(&mut self) -> Option<Transition> {
        self.transition.take()
    }

    /// Static platforms plus the moving platform
    pub fn solids(&self) -> Vec<Aabb> {
        let mut solids = self.platforms.clone();
        solids.push(self.moving_platform.body.aabb());
        solids
    }

    pub fn boss_alive(&self) -> bool {
        self.boss.as_ref().is_some_and(|b| b.active)
    }

    pub fn hud(&self) -> Hud {
        let now = self.now();
        let (stamina, stamina_bar_width, stamina_state) = match self.player.pilot() {
            Some(pilot) => (
                pilot.stamina.value(),
                pilot.stamina.bar_width(STAMINA_BAR_WIDTH),
                pilot.stamina.bar_state(now),
            ),
            None => (0.0, 0.0, BarState::Ok),
        };
        Hud {
            level: self.level,
            score: self.score,
            hearts: self.player.hp,
            max_hearts: self.tuning.player_max_hp,
            stamina,
            stamina_bar_width,
            stamina_state,
            boss_hp: self.boss.as_ref().filter(|b| b.active).map(|b| b.hp),
            banner: self.banner,
            awaiting_confirm: self.awaiting_confirm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::builtin_levels;

    #[test]
    fn test_new_state_from_level_one() {
        let levels = builtin_levels();
        let state = GameState::new(1, 3, &levels[0], Tuning::default(), 7);
        assert_eq!(state.phase, GamePhase::Loading);
        assert_eq!(state.player.hp, 3);
        assert_eq!(state.player.body.pos, Vec2::new(100.0, 450.0));
        assert_eq!(state.enemies.len(), 1);
        assert!(state.boss.is_none());
        assert!(state.goal.enabled);
        assert_eq!(state.collectibles.active_count(), 8);

        // Initial bomb lands on the far half from the spawn
        assert_eq!(state.hazards.len(), 1);
        assert!(state.hazards[0].body.pos.x >= 800.0);
    }

    #[test]
    fn test_boss_level_disables_goal() {
        let levels = builtin_levels();
        let state = GameState::new(3, 3, &levels[2], Tuning::default(), 7);
        assert!(!state.goal.enabled);
        assert!(state.boss_alive());
        assert_eq!(state.boss.as_ref().unwrap().hp, 10);
        assert!(state.is_final_level());
    }

    #[test]
    fn test_ids_are_unique() {
        let levels = builtin_levels();
        let state = GameState::new(3, 3, &levels[2], Tuning::default(), 7);
        let mut ids = vec![state.player.id.0, state.hazards[0].id];
        ids.extend(state.enemies.iter().map(|e| e.id.0));
        ids.push(state.boss.as_ref().unwrap().id.0);
        let before = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), before);
    }

    #[test]
    fn test_moving_platform_patrol() {
        let mut mp = MovingPlatform {
            body: Body::kinematic(Vec2::new(1100.0, 500.0), Vec2::new(400.0, 32.0)),
            speed: 150.0,
            min_x: 500.0,
            max_x: 1100.0,
        };
        mp.patrol();
        assert_eq!(mp.body.vel.x, -150.0);
        mp.body.pos.x = 499.0;
        mp.patrol();
        assert_eq!(mp.body.vel.x, 150.0);
        mp.body.pos.x = 800.0;
        mp.patrol();
        assert_eq!(mp.body.vel.x, 150.0);
    }

    #[test]
    fn test_ghost_fades_out() {
        let g = Ghost {
            id: 1,
            pos: Vec2::ZERO,
            facing: Facing::Right,
            spawned_at: 100,
            fade_ms: 300,
        };
        assert_eq!(g.alpha(100), 0.5);
        assert_eq!(g.alpha(250), 0.25);
        assert_eq!(g.alpha(400), 0.0);
        assert_eq!(g.alpha(900), 0.0);
    }
}
