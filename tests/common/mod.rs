#![allow(dead_code)]

use glam::Vec2;
use star_collector::Session;
use star_collector::persistence::MemoryStore;
use star_collector::sim::{Aabb, Body, GameEvent, GameState, Physics, TickInput};

/// Moves bodies by their velocity but applies no gravity and no solids, so
/// tests can place actors exactly where they want them.
pub struct FrozenPhysics {
    pub grounded: bool,
}

impl Physics for FrozenPhysics {
    fn integrate(&self, body: &mut Body, _solids: &[Aabb], dt: f32) {
        body.pos += body.vel * dt;
        body.touching_down = self.grounded;
        body.blocked_x = false;
    }
}

pub const FROZEN: FrozenPhysics = FrozenPhysics { grounded: false };

pub fn session(store: MemoryStore) -> Session<MemoryStore> {
    Session::with_defaults(store, 2024)
}

/// Start `level` and run one idle tick so it is Playing, with no roaming bombs
pub fn playing(session: &mut Session<MemoryStore>, level: u32) -> Vec<GameEvent> {
    assert!(session.start_level(level));
    let state = session.state_mut().unwrap();
    state.hazards.clear();
    session.update(&TickInput::default(), &FROZEN)
}

pub fn state(session: &mut Session<MemoryStore>) -> &mut GameState {
    session.state_mut().unwrap()
}

/// Run idle ticks, collecting every event
pub fn idle(session: &mut Session<MemoryStore>, ticks: u32, physics: &impl Physics) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        events.extend(session.update(&TickInput::default(), physics));
    }
    events
}

pub fn count(events: &[GameEvent], wanted: &GameEvent) -> usize {
    events.iter().filter(|e| *e == wanted).count()
}

/// Put the player's feet `depth` pixels inside the top of `target`
pub fn stand_on(state: &mut GameState, target: Aabb, depth: f32) {
    let half = state.player.body.half();
    state.player.body.pos = Vec2::new(target.center().x, target.min.y - half.y + depth);
    state.player.body.vel = Vec2::ZERO;
}

pub fn confirm() -> TickInput {
    TickInput {
        confirm: true,
        ..Default::default()
    }
}
