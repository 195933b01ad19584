//! Per-entity movement integration: gravity, explicit Euler displacement,
//! ground clamping, and friction. Runs once per tick for every mobile entity
//! before collision resolution.

use glam::Vec2;

use crate::components::entity::Entity;

/// Buffer above the ground surface inside which an entity is considered
/// resting on it.
pub const GROUND_EPS: f32 = 0.05;

/// Tuning for the integrator, fixed per concrete entity class. Gravity is
/// deliberately per-class rather than global: the character, the frog's hop
/// arc, and the ambient monsters all fall at different rates.
#[derive(Debug, Clone, Copy)]
pub struct MotionParams {
    /// Downward acceleration in units/s² while airborne.
    pub gravity: f32,
    /// Most negative vertical velocity allowed (units/s).
    pub terminal_velocity: f32,
    /// Horizontal damping factor per tick while grounded.
    pub ground_friction: f32,
    /// Horizontal damping factor per tick while airborne (weaker).
    pub air_friction: f32,
    /// Horizontal speed below which velocity snaps to exactly zero.
    pub stop_threshold: f32,
    /// Vertical distance from the entity origin down to its feet.
    pub height_offset: f32,
}

impl MotionParams {
    /// Snappy, heavy fall used by the player character.
    pub fn character() -> Self {
        Self {
            gravity: 30.0,
            terminal_velocity: -20.0,
            ground_friction: 0.85,
            air_friction: 0.98,
            stop_threshold: 0.05,
            height_offset: 1.0,
        }
    }

    /// Medium fall for monsters with airborne phases (frog hops).
    pub fn hopper() -> Self {
        Self {
            gravity: 20.0,
            terminal_velocity: -20.0,
            ground_friction: 0.85,
            air_friction: 0.99,
            stop_threshold: 0.05,
            height_offset: 0.4,
        }
    }

    /// Gentle fall for ground-bound monsters that rarely leave the surface.
    pub fn walker() -> Self {
        Self {
            gravity: 9.8,
            terminal_velocity: -20.0,
            ground_friction: 0.9,
            air_friction: 0.98,
            stop_threshold: 0.05,
            height_offset: 0.5,
        }
    }
}

impl Default for MotionParams {
    fn default() -> Self {
        Self::walker()
    }
}

/// Advance one entity by one tick against the ground height sampled at its
/// horizontal position. Pure numeric update: gravity while airborne (clamped
/// to terminal velocity), Euler displacement, feet-to-ground snap that zeroes
/// only the downward vertical component, then friction with a near-zero snap
/// so resting entities do not drift.
pub fn integrate(e: &mut Entity, dt: f32, ground: f32) {
    if !e.grounded {
        e.vel.y -= e.motion.gravity * dt;
        if e.vel.y < e.motion.terminal_velocity {
            e.vel.y = e.motion.terminal_velocity;
        }
    }

    e.pos += e.vel * dt;

    let feet = e.pos.y - e.motion.height_offset;
    if feet <= ground + GROUND_EPS {
        e.pos.y = ground + e.motion.height_offset;
        if e.vel.y < 0.0 {
            e.vel.y = 0.0;
        }
        e.grounded = true;
    } else {
        e.grounded = false;
    }

    let friction = if e.grounded {
        e.motion.ground_friction
    } else {
        e.motion.air_friction
    };
    e.vel.x *= friction;
    e.vel.z *= friction;

    let planar = Vec2::new(e.vel.x, e.vel.z);
    if planar.length_squared() < e.motion.stop_threshold * e.motion.stop_threshold {
        e.vel.x = 0.0;
        e.vel.z = 0.0;
    }
}
