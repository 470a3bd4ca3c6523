//! Fixed timestep simulation tick
//!
//! One call advances the virtual clock by one tick and runs, in order:
//! intents, physics integration, collisions, terminal checks, then every
//! deferred action that has come due.

use serde::{Deserialize, Serialize};

use super::collectibles;
use super::combat;
use super::flow;
use super::motion;
use super::physics::Physics;
use super::state::{GamePhase, GameState};

/// Intents for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Jump (edge-triggered)
    pub up: bool,
    /// Fast-fall while airborne
    pub down: bool,
    pub dash: bool,
    /// Fire (edge-triggered)
    pub shoot: bool,
    /// Leave a terminal banner (edge-triggered)
    pub confirm: bool,
}

impl TickInput {
    pub const LEFT: u32 = 1;
    pub const RIGHT: u32 = 1 << 1;
    pub const UP: u32 = 1 << 2;
    pub const DOWN: u32 = 1 << 3;
    pub const DASH: u32 = 1 << 4;
    pub const SHOOT: u32 = 1 << 5;
    pub const CONFIRM: u32 = 1 << 6;

    /// Either source holding a key counts (keyboard plus touch buttons)
    pub fn merge(self, other: TickInput) -> TickInput {
        TickInput {
            left: self.left || other.left,
            right: self.right || other.right,
            up: self.up || other.up,
            down: self.down || other.down,
            dash: self.dash || other.dash,
            shoot: self.shoot || other.shoot,
            confirm: self.confirm || other.confirm,
        }
    }

    pub fn from_bits(bits: u32) -> TickInput {
        TickInput {
            left: bits & Self::LEFT != 0,
            right: bits & Self::RIGHT != 0,
            up: bits & Self::UP != 0,
            down: bits & Self::DOWN != 0,
            dash: bits & Self::DASH != 0,
            shoot: bits & Self::SHOOT != 0,
            confirm: bits & Self::CONFIRM != 0,
        }
    }
}

/// Rising edges detected this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputEdges {
    pub up: bool,
    pub shoot: bool,
    pub confirm: bool,
}

/// Remembers last tick's input to find rising edges
#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    prev: TickInput,
}

impl InputLatch {
    pub fn update(&mut self, input: &TickInput) -> InputEdges {
        let edges = InputEdges {
            up: input.up && !self.prev.up,
            shoot: input.shoot && !self.prev.shoot,
            confirm: input.confirm && !self.prev.confirm,
        };
        self.prev = *input;
        edges
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, physics: &impl Physics) {
    state.scheduler.advance(state.tuning.tick_ms);
    state.ticks += 1;
    let edges = state.latch.update(input);

    if state.phase == GamePhase::Loading {
        state.phase = GamePhase::Playing;
        log::info!("Level {} started", state.level);
    }

    match state.phase {
        GamePhase::Playing => step(state, input, &edges, physics),
        GamePhase::LevelClear | GamePhase::GameOver => {
            if edges.confirm {
                flow::confirm(state);
            }
        }
        GamePhase::Loading => {}
    }

    flow::drain_deferred(state);
}

fn step(state: &mut GameState, input: &TickInput, edges: &InputEdges, physics: &impl Physics) {
    let dt = state.tuning.dt();

    // Intents
    state.moving_platform.patrol();
    motion::drive_player(state, input, edges, physics);
    motion::drive_enemies(state);
    motion::drive_boss(state);
    if edges.shoot {
        combat::fire_projectile(state);
    }

    // Integration
    physics.integrate(&mut state.moving_platform.body, &[], dt);
    let solids = state.solids();
    physics.integrate(&mut state.player.body, &solids, dt);
    for enemy in state.enemies.iter_mut().filter(|e| e.active) {
        physics.integrate(&mut enemy.body, &solids, dt);
    }
    if let Some(boss) = state.boss.as_mut().filter(|b| b.active) {
        physics.integrate(&mut boss.body, &solids, dt);
    }
    let fall_limit = state.tuning.fall_limit_y;
    for hazard in state.hazards.iter_mut().filter(|h| h.active) {
        physics.integrate(&mut hazard.body, &solids, dt);
        if hazard.body.pos.y > fall_limit {
            hazard.active = false;
        }
    }
    state.hazards.retain(|h| h.active);
    for projectile in &mut state.projectiles {
        physics.integrate(&mut projectile.body, &[], dt);
    }
    motion::settle_player(state, physics);

    // Collisions
    combat::resolve(state, physics, &solids);
    collectibles::collect_overlapping(state, physics);

    // Terminal
    flow::check_goal(state, physics);
}
