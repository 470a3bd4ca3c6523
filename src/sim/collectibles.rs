//! Star collection and the respawn cycle
//!
//! Collecting the last active star reactivates the whole set at its original
//! positions in the same call and drops one new bomb on the far side of the
//! world, so no tick ever observes a partially reset set.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::combat;
use super::physics::{Aabb, Physics};
use super::state::{Cue, GameEvent, GameState, Sound};
use crate::consts::COLLECTIBLE_SIZE;

/// A star
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    /// Spawn position, restored on every cycle
    pub origin: Vec2,
    pub pos: Vec2,
    pub active: bool,
}

impl Collectible {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::from(COLLECTIBLE_SIZE))
    }
}

/// Ordered set of stars for one level
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectibleSet {
    items: Vec<Collectible>,
}

impl CollectibleSet {
    pub fn new(positions: &[Vec2]) -> Self {
        Self {
            items: positions
                .iter()
                .map(|&pos| Collectible {
                    origin: pos,
                    pos,
                    active: true,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Collectible> {
        self.items.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Collectible> {
        self.items.get(index)
    }

    pub fn active_count(&self) -> usize {
        self.items.iter().filter(|c| c.active).count()
    }

    /// Mark one star collected; false if it was already gone
    pub fn collect(&mut self, index: usize) -> bool {
        match self.items.get_mut(index) {
            Some(c) if c.active => {
                c.active = false;
                true
            }
            _ => false,
        }
    }

    /// Put every star back at its spawn position
    pub fn reactivate_all(&mut self) {
        for c in &mut self.items {
            c.pos = c.origin;
            c.active = true;
        }
    }
}

/// Collect every active star the player overlaps
pub fn collect_overlapping(state: &mut GameState, physics: &impl Physics) {
    if !state.is_running() {
        return;
    }
    let player = state.player.aabb();
    let touched: Vec<usize> = state
        .collectibles
        .iter()
        .enumerate()
        .filter(|(_, c)| c.active && physics.overlaps(&player, &c.aabb()))
        .map(|(i, _)| i)
        .collect();

    for index in touched {
        on_collect(state, index);
    }
}

/// Collect one star and run the respawn cycle if it was the last
pub fn on_collect(state: &mut GameState, index: usize) {
    let Some(star) = state.collectibles.get(index).copied() else {
        return;
    };
    if !state.collectibles.collect(index) {
        return;
    }

    let delta = state.tuning.collectible_score;
    state.cue(Cue::Particles {
        x: star.pos.x,
        y: star.pos.y,
        count: 10,
    });
    state.cue(Cue::Sound {
        sound: Sound::Pickup,
    });
    state.add_score(delta);
    state.emit(GameEvent::CollectibleCollected { score_delta: delta });

    if state.collectibles.active_count() == 0 {
        state.collectibles.reactivate_all();
        state.emit(GameEvent::CollectiblesFullyCycled);
        let x = combat::opposite_half_x(state);
        combat::spawn_bomb(state, x);
        log::info!(
            "Level {}: stars cycled, {} bombs roaming",
            state.level,
            state.hazards.iter().filter(|h| h.active).count()
        );
    }
}
