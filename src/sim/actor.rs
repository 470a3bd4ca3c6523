//! Actors: the player, patrolling enemies and the boss
//!
//! All three share one shape; variant-specific data rides on `ActorKind`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::clock::Millis;
use super::physics::{Aabb, Body};
use super::stamina::Stamina;
use crate::consts::*;
use crate::tuning::Tuning;

/// Stable actor handle (never reused within a level)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// -1 for left, +1 for right
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Animation the renderer should play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Anim {
    Left,
    Right,
    /// Idle / facing camera
    #[default]
    Turn,
}

/// Player-only abilities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pilot {
    pub stamina: Stamina,
    pub jump_charges: u8,
    /// Time of the last accepted shot
    pub last_fired: Option<Millis>,
    /// Earliest time the next dash ghost may spawn
    pub next_ghost_at: Millis,
    /// Down held while falling; gravity boosted
    pub fast_falling: bool,
    /// Dash paid for this tick
    pub dashing: bool,
}

impl Pilot {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            stamina: Stamina::new(tuning),
            jump_charges: 0,
            last_fired: None,
            next_ghost_at: 0,
            fast_falling: false,
            dashing: false,
        }
    }
}

/// Boss-only state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossBrain {
    pub max_hp: u32,
    /// Fall-recovery teleport target
    pub spawn: Vec2,
    /// Red damage flash showing
    pub flashing: bool,
}

/// Actor variant tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActorKind {
    Player(Pilot),
    Enemy {
        /// Signed patrol velocity; flips when blocked
        patrol_speed: f32,
    },
    Boss(BossBrain),
}

/// Post-damage invincibility window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invincibility {
    pub since: Millis,
    pub until: Millis,
    pub pulse_ms: Millis,
}

impl Invincibility {
    pub fn elapsed(&self, now: Millis) -> Millis {
        now.saturating_sub(self.since)
    }

    /// Blink opacity: yoyo between 0.5 and 1.0 each pulse
    pub fn opacity(&self, now: Millis) -> f32 {
        if self.pulse_ms == 0 {
            return 1.0;
        }
        let pulse = self.pulse_ms as f32;
        let t = (self.elapsed(now) % (2 * self.pulse_ms)) as f32 / pulse;
        if t < 1.0 { 0.5 + 0.5 * t } else { 1.0 - 0.5 * (t - 1.0) }
    }
}

/// A combat-relevant moving entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub kind: ActorKind,
    pub body: Body,
    pub facing: Facing,
    pub anim: Anim,
    pub hp: u32,
    pub invincible: Option<Invincibility>,
    /// False once destroyed; deferred actions check this
    pub active: bool,
}

impl Actor {
    pub fn player(id: ActorId, spawn: Vec2, tuning: &Tuning) -> Self {
        let mut body = Body::new(spawn, Vec2::from(PLAYER_SIZE));
        body.bounce = Vec2::new(0.0, 0.1);
        Self {
            id,
            kind: ActorKind::Player(Pilot::new(tuning)),
            body,
            facing: Facing::Right,
            anim: Anim::Turn,
            hp: tuning.player_max_hp,
            invincible: None,
            active: true,
        }
    }

    pub fn enemy(id: ActorId, pos: Vec2, patrol_speed: f32) -> Self {
        let mut body = Body::new(pos, Vec2::from(ENEMY_SIZE));
        body.vel.x = patrol_speed;
        Self {
            id,
            kind: ActorKind::Enemy { patrol_speed },
            body,
            facing: if patrol_speed < 0.0 { Facing::Left } else { Facing::Right },
            anim: Anim::Turn,
            hp: 1,
            invincible: None,
            active: true,
        }
    }

    pub fn boss(id: ActorId, pos: Vec2, hp: u32) -> Self {
        let mut body = Body::new(pos, Vec2::from(BOSS_SIZE));
        body.bounce = Vec2::new(0.0, 0.2);
        Self {
            id,
            kind: ActorKind::Boss(BossBrain {
                max_hp: hp,
                spawn: pos,
                flashing: false,
            }),
            body,
            facing: Facing::Left,
            anim: Anim::Turn,
            hp,
            invincible: None,
            active: true,
        }
    }

    pub fn aabb(&self) -> Aabb {
        self.body.aabb()
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible.is_some()
    }

    pub fn pilot(&self) -> Option<&Pilot> {
        match &self.kind {
            ActorKind::Player(pilot) => Some(pilot),
            _ => None,
        }
    }

    pub fn pilot_mut(&mut self) -> Option<&mut Pilot> {
        match &mut self.kind {
            ActorKind::Player(pilot) => Some(pilot),
            _ => None,
        }
    }

    /// Remaining jumps (0 for non-players)
    pub fn jump_charges(&self) -> u8 {
        self.pilot().map(|p| p.jump_charges).unwrap_or(0)
    }

    /// Face and animate according to a signed horizontal velocity
    pub fn face_velocity(&mut self, vx: f32) {
        if vx < 0.0 {
            self.facing = Facing::Left;
            self.anim = Anim::Left;
        } else if vx > 0.0 {
            self.facing = Facing::Right;
            self.anim = Anim::Right;
        } else {
            self.anim = Anim::Turn;
        }
    }

    /// Opacity the renderer should use this frame
    pub fn opacity(&self, now: Millis) -> f32 {
        self.invincible.map(|inv| inv.opacity(now)).unwrap_or(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invincibility_opacity_pulses() {
        let inv = Invincibility {
            since: 1000,
            until: 2200,
            pulse_ms: 200,
        };
        assert_eq!(inv.opacity(1000), 0.5);
        assert_eq!(inv.opacity(1200), 1.0);
        assert_eq!(inv.opacity(1300), 0.75);
        assert_eq!(inv.opacity(1400), 0.5);
    }

    #[test]
    fn test_enemy_faces_patrol_direction() {
        let e = Actor::enemy(ActorId(2), Vec2::new(600.0, 500.0), -100.0);
        assert_eq!(e.facing, Facing::Left);
        assert_eq!(e.body.vel.x, -100.0);
        assert!(e.pilot().is_none());
        assert_eq!(e.jump_charges(), 0);
    }

    #[test]
    fn test_face_velocity_keeps_facing_when_idle() {
        let mut p = Actor::player(ActorId(1), Vec2::ZERO, &Tuning::default());
        p.face_velocity(-200.0);
        p.face_velocity(0.0);
        assert_eq!(p.facing, Facing::Left);
        assert_eq!(p.anim, Anim::Turn);
    }
}
