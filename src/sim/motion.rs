//! Motion controllers
//!
//! Turns intents into velocities before the physics step: player run, dash,
//! jump and fast-fall, enemy patrol, and the boss chase.

use glam::Vec2;
use rand::Rng;

use super::actor::{Actor, ActorId, ActorKind, Anim, Facing, Invincibility};
use super::clock::{Deferred, Scheduler};
use super::physics::Physics;
use super::state::{Cue, GameState, Ghost, Sound};
use super::tick::{InputEdges, TickInput};
use crate::tuning::Tuning;

/// Apply this tick's intents to the player
pub fn drive_player(
    state: &mut GameState,
    input: &TickInput,
    edges: &InputEdges,
    physics: &impl Physics,
) {
    let now = state.now();
    let run_speed = state.tuning.run_speed;
    let dash_speed = state.tuning.dash_speed;
    let moving = state.player.body.vel != Vec2::ZERO;

    let Some(pilot) = state.player.pilot_mut() else {
        return;
    };
    let stamina = pilot.stamina.tick(input.dash, now);
    pilot.dashing = stamina.boosted;
    if stamina.exhausted {
        log::debug!("Stamina exhausted at {}ms", now);
    }
    let speed = if stamina.boosted { dash_speed } else { run_speed };

    if stamina.boosted && moving {
        spawn_ghost(state);
    }

    let player = &mut state.player;
    if input.left {
        player.body.vel.x = -speed;
        player.facing = Facing::Left;
        player.anim = Anim::Left;
    } else if input.right {
        player.body.vel.x = speed;
        player.facing = Facing::Right;
        player.anim = Anim::Right;
    } else {
        player.body.vel.x = 0.0;
        player.anim = Anim::Turn;
    }

    let resting = physics.is_resting(&state.player.body);
    let jumped = try_jump(
        &mut state.player,
        resting,
        edges.up,
        state.tuning.jump_velocity,
        state.tuning.max_jump_charges,
    );
    if jumped {
        state.cue(Cue::Sound { sound: Sound::Jump });
    }

    fast_fall(state, input.down, resting);
}

/// Refill charges while grounded, then spend one on a fresh press
pub fn try_jump(
    player: &mut Actor,
    resting: bool,
    pressed: bool,
    velocity: f32,
    max_charges: u8,
) -> bool {
    let ActorKind::Player(pilot) = &mut player.kind else {
        return false;
    };
    if resting {
        pilot.jump_charges = max_charges;
    }
    if !pressed || pilot.jump_charges == 0 {
        return false;
    }
    pilot.jump_charges -= 1;
    player.body.vel.y = velocity;
    true
}

/// Down while descending multiplies gravity until release or landing
fn fast_fall(state: &mut GameState, down: bool, resting: bool) {
    let scale = state.tuning.fast_fall_gravity_scale;
    let player = &mut state.player;
    let ActorKind::Player(pilot) = &mut player.kind else {
        return;
    };

    if down && !resting {
        if player.body.vel.y > 0.0 {
            player.body.gravity_scale = scale;
            pilot.fast_falling = true;
        }
    } else {
        player.body.gravity_scale = 1.0;
        pilot.fast_falling = false;
    }

    if !pilot.fast_falling {
        return;
    }
    let pos = player.body.pos;
    state.cue(Cue::FastFall { x: pos.x, y: pos.y });
    if state.rng().random_range(0..5) == 0 {
        state.cue(Cue::Particles {
            x: pos.x,
            y: pos.y,
            count: 1,
        });
    }
}

/// Post-integration bookkeeping for the player
pub fn settle_player(state: &mut GameState, physics: &impl Physics) {
    if !physics.is_resting(&state.player.body) {
        return;
    }
    let max_charges = state.tuning.max_jump_charges;
    let player = &mut state.player;
    if let ActorKind::Player(pilot) = &mut player.kind {
        pilot.jump_charges = max_charges;
        if pilot.fast_falling {
            pilot.fast_falling = false;
            player.body.gravity_scale = 1.0;
        }
    }
}

/// Drop an after-image, at most one per ghost interval
fn spawn_ghost(state: &mut GameState) {
    let now = state.now();
    let interval = state.tuning.ghost_interval_ms;
    let fade_ms = state.tuning.ghost_fade_ms;
    let Some(pilot) = state.player.pilot_mut() else {
        return;
    };
    if now < pilot.next_ghost_at {
        return;
    }
    pilot.next_ghost_at = now + interval;

    let id = state.next_entity_id();
    let pos = state.player.body.pos;
    state.ghosts.push(Ghost {
        id,
        pos,
        facing: state.player.facing,
        spawned_at: now,
        fade_ms,
    });
    state.scheduler.schedule_in(fade_ms, Deferred::FadeGhost { id });
    state.cue(Cue::GhostSpawned {
        id,
        x: pos.x,
        y: pos.y,
    });
}

/// Start (or restart) the blink window that blocks damage
pub fn trigger_invincibility(actor: &mut Actor, scheduler: &mut Scheduler, tuning: &Tuning) {
    let now = scheduler.now();
    let duration = tuning.invincibility_ms();
    actor.invincible = Some(Invincibility {
        since: now,
        until: now.saturating_add(duration),
        pulse_ms: tuning.invincibility_pulse_ms,
    });
    scheduler.schedule_in(duration, Deferred::EndInvincibility { actor: actor.id });
}

fn actor_mut(state: &mut GameState, id: ActorId) -> Option<&mut Actor> {
    if state.player.id == id {
        return Some(&mut state.player);
    }
    state
        .enemies
        .iter_mut()
        .chain(state.boss.iter_mut())
        .find(|a| a.id == id)
}

/// Clear an elapsed invincibility window; stale or orphaned entries do nothing
pub fn end_invincibility(state: &mut GameState, id: ActorId) {
    let now = state.now();
    let Some(actor) = actor_mut(state, id).filter(|a| a.active) else {
        return;
    };
    if !actor.invincible.is_some_and(|window| window.until <= now) {
        return;
    }
    actor.invincible = None;
    state.cue(Cue::InvincibilityEnded);
}

/// Patrol: reverse whenever the engine reports a horizontal block
pub fn drive_enemies(state: &mut GameState) {
    for enemy in state.enemies.iter_mut().filter(|e| e.active) {
        if let ActorKind::Enemy { patrol_speed } = &mut enemy.kind {
            if enemy.body.blocked_x {
                *patrol_speed = -*patrol_speed;
            }
            enemy.body.vel.x = *patrol_speed;
        }
        let vx = enemy.body.vel.x;
        enemy.face_velocity(vx);
    }
}

/// Horizontal chase velocity, or None when the player is out of range
pub fn boss_chase_velocity(boss: Vec2, player: Vec2, tuning: &Tuning) -> Option<f32> {
    if boss.distance(player) >= tuning.boss_chase_range {
        return None;
    }
    let speed = tuning.boss_chase_speed / 2.0;
    Some(if player.x < boss.x { -speed } else { speed })
}

/// Chase the player and recover from falls
pub fn drive_boss(state: &mut GameState) {
    let player_pos = state.player.body.pos;
    let fall_limit = state.tuning.fall_limit_y;
    let Some(boss) = state.boss.as_mut().filter(|b| b.active) else {
        return;
    };
    let ActorKind::Boss(brain) = &boss.kind else {
        return;
    };
    let spawn = brain.spawn;

    if boss.body.pos.y > fall_limit {
        boss.body.reset(spawn);
        log::debug!("Boss fell, reset to ({:.0}, {:.0})", spawn.x, spawn.y);
    }

    match boss_chase_velocity(boss.body.pos, player_pos, &state.tuning) {
        Some(vx) => {
            boss.body.vel.x = vx;
            boss.face_velocity(vx);
        }
        None => {
            boss.body.vel.x = 0.0;
            boss.anim = Anim::Turn;
        }
    }
}
