//! Physics capability interface
//!
//! The simulation never integrates motion itself. It hands bodies to a
//! `Physics` implementation and only asks two questions back: "is this body
//! resting on a surface" and "do these two boxes overlap". `ArcadePhysics`
//! is a small axis-separated AABB integrator good enough for headless runs
//! and tests; a real engine can implement the same trait.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Axis-aligned bounding box (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Strict overlap; touching edges do not count
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// A simulated body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Center position
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// Multiplier on world gravity (fast-fall raises it)
    pub gravity_scale: f32,
    pub allow_gravity: bool,
    /// Restitution per axis when blocked
    pub bounce: Vec2,
    /// Collide with the world's left, right and top edges
    pub collide_world: bool,
    /// Set by the integrator: landed on a surface this step
    pub touching_down: bool,
    /// Set by the integrator: blocked horizontally this step
    pub blocked_x: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            gravity_scale: 1.0,
            allow_gravity: true,
            bounce: Vec2::ZERO,
            collide_world: true,
            touching_down: false,
            blocked_x: false,
        }
    }

    /// A body that ignores gravity and world edges
    pub fn kinematic(pos: Vec2, size: Vec2) -> Self {
        Self {
            allow_gravity: false,
            collide_world: false,
            ..Self::new(pos, size)
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }

    pub fn half(&self) -> Vec2 {
        self.size * 0.5
    }

    pub fn top(&self) -> f32 {
        self.pos.y - self.size.y * 0.5
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y * 0.5
    }

    /// Teleport and stop
    pub fn reset(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.touching_down = false;
        self.blocked_x = false;
    }
}

/// Collision and integration services the simulation consumes
pub trait Physics {
    /// Apply gravity and velocity for one step, resolving against solids
    fn integrate(&self, body: &mut Body, solids: &[Aabb], dt: f32);

    /// Body rests on a solid surface
    fn is_resting(&self, body: &Body) -> bool {
        body.touching_down
    }

    /// Two boxes overlap
    fn overlaps(&self, a: &Aabb, b: &Aabb) -> bool {
        a.intersects(b)
    }
}

/// Minimal arcade-style integrator
#[derive(Debug, Clone)]
pub struct ArcadePhysics {
    pub gravity: f32,
    pub world_width: f32,
    pub world_height: f32,
    /// Bottom edge is open by default so bodies can fall out of the level
    pub collide_floor: bool,
}

impl ArcadePhysics {
    pub fn new(world_width: f32, world_height: f32, gravity: f32) -> Self {
        Self {
            gravity,
            world_width,
            world_height,
            collide_floor: false,
        }
    }

    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(tuning.world_width, tuning.world_height, tuning.gravity)
    }
}

/// Small tolerance so a body sitting exactly on a surface counts as above it
const CONTACT_EPSILON: f32 = 0.5;

impl Physics for ArcadePhysics {
    fn integrate(&self, body: &mut Body, solids: &[Aabb], dt: f32) {
        body.touching_down = false;
        body.blocked_x = false;

        if body.allow_gravity {
            body.vel.y += self.gravity * body.gravity_scale * dt;
        }

        let half = body.half();
        let prev = body.aabb();

        // Horizontal pass: only solids we were already level with block us
        body.pos.x += body.vel.x * dt;
        for solid in solids {
            let vertically_aligned =
                prev.max.y > solid.min.y + CONTACT_EPSILON && prev.min.y < solid.max.y;
            if !vertically_aligned || !body.aabb().intersects(solid) {
                continue;
            }
            if prev.max.x <= solid.min.x + CONTACT_EPSILON {
                body.pos.x = solid.min.x - half.x;
            } else if prev.min.x >= solid.max.x - CONTACT_EPSILON {
                body.pos.x = solid.max.x + half.x;
            } else {
                continue;
            }
            body.blocked_x = true;
            body.vel.x = -body.vel.x * body.bounce.x;
        }

        if body.collide_world {
            if body.pos.x - half.x < 0.0 {
                body.pos.x = half.x;
                body.blocked_x = true;
                body.vel.x = body.vel.x.abs() * body.bounce.x;
            } else if body.pos.x + half.x > self.world_width {
                body.pos.x = self.world_width - half.x;
                body.blocked_x = true;
                body.vel.x = -body.vel.x.abs() * body.bounce.x;
            }
        }

        // Vertical pass
        let prev = Aabb::from_center(Vec2::new(body.pos.x, prev.center().y), body.size);
        body.pos.y += body.vel.y * dt;
        for solid in solids {
            if !body.aabb().intersects(solid) {
                continue;
            }
            if prev.max.y <= solid.min.y + CONTACT_EPSILON {
                body.pos.y = solid.min.y - half.y;
                body.touching_down = true;
                body.vel.y = -body.vel.y.max(0.0) * body.bounce.y;
            } else if prev.min.y >= solid.max.y - CONTACT_EPSILON {
                body.pos.y = solid.max.y + half.y;
                body.vel.y = body.vel.y.abs() * body.bounce.y;
            }
        }

        if body.collide_world {
            if body.pos.y - half.y < 0.0 {
                body.pos.y = half.y;
                body.vel.y = body.vel.y.abs() * body.bounce.y;
            } else if self.collide_floor && body.pos.y + half.y > self.world_height {
                body.pos.y = self.world_height - half.y;
                body.touching_down = true;
                body.vel.y = -body.vel.y.abs() * body.bounce.y;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.016;

    fn ground() -> Aabb {
        Aabb::from_center(Vec2::new(400.0, 584.0), Vec2::new(800.0, 32.0))
    }

    fn physics() -> ArcadePhysics {
        ArcadePhysics::new(1600.0, 600.0, 800.0)
    }

    #[test]
    fn test_body_lands_on_platform() {
        let p = physics();
        let mut body = Body::new(Vec2::new(100.0, 500.0), Vec2::new(32.0, 48.0));
        for _ in 0..120 {
            p.integrate(&mut body, &[ground()], DT);
        }
        assert!(p.is_resting(&body));
        assert!((body.bottom() - 568.0).abs() < 0.01);
    }

    #[test]
    fn test_falls_through_open_floor() {
        let p = physics();
        let mut body = Body::new(Vec2::new(1000.0, 500.0), Vec2::new(32.0, 48.0));
        for _ in 0..120 {
            p.integrate(&mut body, &[ground()], DT);
        }
        assert!(!p.is_resting(&body));
        assert!(body.pos.y > 650.0);
    }

    #[test]
    fn test_world_edge_blocks_and_bounces() {
        let p = physics();
        let mut body = Body::kinematic(Vec2::new(8.0, 100.0), Vec2::new(14.0, 14.0));
        body.collide_world = true;
        body.bounce = Vec2::ONE;
        body.vel.x = -200.0;
        p.integrate(&mut body, &[], DT);
        assert!(body.blocked_x);
        assert_eq!(body.vel.x, 200.0);
        assert_eq!(body.pos.x, 7.0);
    }

    #[test]
    fn test_wall_blocks_horizontal() {
        let p = physics();
        let wall = Aabb::from_center(Vec2::new(200.0, 500.0), Vec2::new(40.0, 200.0));
        let mut body = Body::kinematic(Vec2::new(160.0, 500.0), Vec2::new(32.0, 48.0));
        body.vel.x = 400.0;
        p.integrate(&mut body, &[wall], DT);
        assert!(body.blocked_x);
        assert_eq!(body.pos.x, 164.0);
        assert_eq!(body.vel.x, 0.0);
    }

    #[test]
    fn test_overlap_is_strict() {
        let a = Aabb::from_center(Vec2::ZERO, Vec2::splat(10.0));
        let touching = Aabb::from_center(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        let inside = Aabb::from_center(Vec2::new(9.0, 0.0), Vec2::splat(10.0));
        assert!(!a.intersects(&touching));
        assert!(a.intersects(&inside));
    }
}
