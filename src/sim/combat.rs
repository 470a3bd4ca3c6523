//! Hazard and combat resolution
//!
//! Pairwise rules between the player, bombs, enemies, the boss, projectiles
//! and platforms. Every rule re-checks that the level is still running, so an
//! interaction resolved after the player died in the same tick is a no-op.

use glam::Vec2;
use rand::Rng;

use super::actor::{ActorKind, Anim};
use super::boss;
use super::clock::Deferred;
use super::motion;
use super::physics::{Aabb, Body, Physics};
use super::state::{Banner, Cue, GameEvent, GamePhase, GameState, Hazard, Outcome, Projectile, Sound};
use crate::consts::{BOMB_SIZE, PROJECTILE_SIZE};

/// What hurt the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitSource {
    /// Touched a bomb, enemy or boss centred at `origin_x`
    Contact { origin_x: f32 },
    /// Fell below the world
    Fall,
}

/// Attacker's lower edge is above `threshold` of the target's height
pub fn landed_on(attacker: &Aabb, target: &Aabb, threshold: f32) -> bool {
    attacker.max.y < target.min.y + target.height() * threshold
}

/// Random x on the half of the world the player is not standing in
pub fn opposite_half_x(state: &mut GameState) -> f32 {
    let width = state.tuning.world_width;
    let half = width / 2.0;
    let player_x = state.player.body.pos.x;
    if player_x < half {
        state.rng().random_range(half..=width)
    } else {
        state.rng().random_range(0.0..=half)
    }
}

/// Drop a bouncing bomb at the top of the world
pub fn spawn_bomb(state: &mut GameState, x: f32) {
    let id = state.next_entity_id();
    let max_vx = state.tuning.bomb_max_speed_x;
    let vx = state.rng().random_range(-max_vx..=max_vx);
    let mut body = Body::new(Vec2::new(x, state.tuning.bomb_spawn_y), Vec2::from(BOMB_SIZE));
    body.bounce = Vec2::ONE;
    body.vel = Vec2::new(vx, state.tuning.bomb_speed_y);
    state.hazards.push(Hazard {
        id,
        body,
        active: true,
    });
    log::debug!("Bomb {} spawned at x={:.0}", id, x);
}

/// Apply one hit to the player. Returns false when the hit was ignored.
pub fn hit_player(state: &mut GameState, source: HitSource) -> bool {
    if !state.is_running() || state.player.is_invincible() || state.player.hp == 0 {
        return false;
    }

    state.player.hp -= 1;
    let hp = state.player.hp;
    state.emit(GameEvent::PlayerDamaged { hp });
    state.cue(Cue::CameraShake {
        duration_ms: state.tuning.hit_shake_ms,
        intensity: state.tuning.hit_shake_intensity,
    });
    log::debug!("Player hit by {:?}, {} hp left", source, hp);

    if hp == 0 {
        death_sequence(state);
        return true;
    }

    match source {
        HitSource::Fall => {
            let spawn = state.config.player_start;
            state.player.body.reset(spawn);
        }
        HitSource::Contact { origin_x } => {
            let kx = state.tuning.knockback_x;
            let body = &mut state.player.body;
            body.vel.x = if body.pos.x < origin_x { -kx } else { kx };
            body.vel.y = state.tuning.knockback_y;
        }
    }
    motion::trigger_invincibility(&mut state.player, &mut state.scheduler, &state.tuning);
    true
}

/// Freeze the level and wait for confirmation to leave
fn death_sequence(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    state.player.body.vel = Vec2::ZERO;
    state.player.anim = Anim::Turn;
    state.banner = Some(Banner::GameOver);
    state.cue(Cue::DeathTint);
    state.cue(Cue::Sound { sound: Sound::Death });
    state.cue(Cue::Banner {
        banner: Banner::GameOver,
    });
    state.emit(GameEvent::PlayerDied);
    state.outcome = Some(Outcome::Died { score: state.score });
    let delay = state.tuning.game_over_delay_ms;
    state.scheduler.schedule_in(delay, Deferred::AwaitConfirm);
    log::info!("Game over on level {} with score {}", state.level, state.score);
}

/// Fire if the cooldown has elapsed
pub fn fire_projectile(state: &mut GameState) -> bool {
    let now = state.now();
    let cooldown = state.tuning.fire_cooldown_ms;
    let Some(pilot) = state.player.pilot_mut() else {
        return false;
    };
    if pilot.last_fired.is_some_and(|last| now < last + cooldown) {
        return false;
    }
    pilot.last_fired = Some(now);

    let id = state.next_entity_id();
    let mut body = Body::kinematic(state.player.body.pos, Vec2::from(PROJECTILE_SIZE));
    body.vel.x = state.player.facing.sign() * state.tuning.projectile_speed;
    state.projectiles.push(Projectile {
        id,
        body,
        spawned_at: now,
        active: true,
    });
    let ttl = state.tuning.projectile_ttl_ms;
    state.scheduler.schedule_in(ttl, Deferred::ExpireProjectile { id });
    state.cue(Cue::Sound { sound: Sound::Shot });
    true
}

/// Remove an enemy and award its points
fn defeat_enemy(state: &mut GameState, index: usize) {
    let Some(enemy) = state.enemies.get_mut(index).filter(|e| e.active) else {
        return;
    };
    enemy.active = false;
    enemy.body.vel = Vec2::ZERO;
    let pos = enemy.body.pos;

    let delta = state.tuning.enemy_score;
    state.cue(Cue::Particles {
        x: pos.x,
        y: pos.y,
        count: 10,
    });
    state.cue(Cue::Sound {
        sound: Sound::Pickup,
    });
    state.add_score(delta);
    state.emit(GameEvent::EnemyDefeated { score_delta: delta });
}

/// One point of damage to the boss; zero hp starts the clear sequence
pub fn damage_boss(state: &mut GameState) {
    let flash_ms = state.tuning.boss_flash_ms;
    let Some(boss) = state.boss.as_mut().filter(|b| b.active) else {
        return;
    };
    boss.hp = boss.hp.saturating_sub(1);
    let hp = boss.hp;
    let id = boss.id;
    if let ActorKind::Boss(brain) = &mut boss.kind {
        brain.flashing = true;
    }

    state.cue(Cue::BossFlash { on: true });
    state
        .scheduler
        .schedule_in(flash_ms, Deferred::EndBossFlash { actor: id });
    state.emit(GameEvent::BossDamaged { hp_remaining: hp });

    if hp == 0 {
        boss::trigger(state);
    }
}

/// Player against roaming bombs
pub fn resolve_player_hazards(state: &mut GameState, physics: &impl Physics) {
    for i in 0..state.hazards.len() {
        if !state.is_running() {
            return;
        }
        let hazard = &state.hazards[i];
        if !hazard.active || !physics.overlaps(&state.player.aabb(), &hazard.body.aabb()) {
            continue;
        }
        let origin_x = hazard.body.pos.x;
        hit_player(state, HitSource::Contact { origin_x });
    }
}

/// Player against patrolling enemies: stomp from above or take a hit
pub fn resolve_player_enemies(state: &mut GameState, physics: &impl Physics) {
    for i in 0..state.enemies.len() {
        if !state.is_running() {
            return;
        }
        let enemy = &state.enemies[i];
        if !enemy.active {
            continue;
        }
        let player_box = state.player.aabb();
        let enemy_box = enemy.aabb();
        if !physics.overlaps(&player_box, &enemy_box) {
            continue;
        }

        if landed_on(&player_box, &enemy_box, state.tuning.enemy_stomp_threshold) {
            defeat_enemy(state, i);
            state.player.body.vel.y = state.tuning.enemy_stomp_bounce;
        } else {
            let origin_x = enemy_box.center().x;
            hit_player(state, HitSource::Contact { origin_x });
        }
    }
}

/// Player against the boss: stricter stomp threshold
pub fn resolve_player_boss(state: &mut GameState, physics: &impl Physics) {
    if !state.is_running() {
        return;
    }
    let Some(boss_box) = state.boss.as_ref().filter(|b| b.active).map(|b| b.aabb()) else {
        return;
    };
    let player_box = state.player.aabb();
    if !physics.overlaps(&player_box, &boss_box) {
        return;
    }

    if landed_on(&player_box, &boss_box, state.tuning.boss_stomp_threshold) {
        // Separate the way a solid collider would, so one stomp counts once
        let half = state.player.body.half();
        state.player.body.pos.y = boss_box.min.y - half.y;
        state.player.body.vel.y = state.tuning.boss_stomp_bounce;
        state.cue(Cue::Sound {
            sound: Sound::Pickup,
        });
        damage_boss(state);
    } else {
        let origin_x = boss_box.center().x;
        hit_player(state, HitSource::Contact { origin_x });
    }
}

/// Projectiles against enemies, the boss and platforms
pub fn resolve_projectiles(state: &mut GameState, physics: &impl Physics, solids: &[Aabb]) {
    for i in 0..state.projectiles.len() {
        if !state.is_running() {
            break;
        }
        if !state.projectiles[i].active {
            continue;
        }
        let shot = state.projectiles[i].body.aabb();

        let enemy_hit = state
            .enemies
            .iter()
            .position(|e| e.active && physics.overlaps(&shot, &e.aabb()));
        if let Some(e) = enemy_hit {
            state.projectiles[i].active = false;
            defeat_enemy(state, e);
            continue;
        }

        let boss_pos = state
            .boss
            .as_ref()
            .filter(|b| b.active && physics.overlaps(&shot, &b.aabb()))
            .map(|b| b.body.pos);
        if let Some(pos) = boss_pos {
            state.projectiles[i].active = false;
            state.cue(Cue::Particles {
                x: pos.x,
                y: pos.y,
                count: 20,
            });
            state.cue(Cue::Sound {
                sound: Sound::Pickup,
            });
            damage_boss(state);
            continue;
        }

        if solids.iter().any(|s| physics.overlaps(&shot, s)) {
            state.projectiles[i].active = false;
        }
    }
    state.projectiles.retain(|p| p.active);
}

/// Falling out of the world is a lethal-style hit
pub fn check_fall(state: &mut GameState) {
    if state.is_running() && state.player.body.pos.y > state.tuning.fall_limit_y {
        hit_player(state, HitSource::Fall);
    }
}

/// Resolve every combat interaction for this tick
pub fn resolve(state: &mut GameState, physics: &impl Physics, solids: &[Aabb]) {
    resolve_player_hazards(state, physics);
    resolve_player_enemies(state, physics);
    resolve_player_boss(state, physics);
    resolve_projectiles(state, physics, solids);
    check_fall(state);
}
