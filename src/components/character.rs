//! The player-controlled wizard: input-derived steering, health, the
//! invulnerability window, and the damage-knockback reaction.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::api::types::{EntityId, EntityKind};
use crate::components::entity::Entity;
use crate::core::motion::{self, MotionParams};

/// Character tuning, loaded as part of the world config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    /// Ground movement speed in units/s.
    pub move_speed: f32,
    pub max_health: f32,
    /// Collision circle radius.
    pub radius: f32,
    /// Horizontal knockback magnitude applied on a monster hit.
    pub knockback_force: f32,
    /// Upward component of the knockback impulse.
    pub knockback_lift: f32,
    /// Seconds of damage immunity after a hit.
    pub invuln_duration: f32,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            move_speed: 6.0,
            max_health: 100.0,
            radius: 0.6,
            knockback_force: 8.0,
            knockback_lift: 6.0,
            invuln_duration: 1.0,
        }
    }
}

/// The player character. Input arrives as an already-decoded horizontal
/// direction; the controller converts it to velocity while grounded and the
/// shared integrator does the rest.
#[derive(Debug, Clone)]
pub struct Character {
    pub entity: Entity,
    pub health: f32,
    pub max_health: f32,
    pub move_speed: f32,
    knockback_force: f32,
    knockback_lift: f32,
    invuln_duration: f32,
    invuln_timer: f32,
    move_dir: Vec2,
}

impl Character {
    pub fn new(id: EntityId, config: &CharacterConfig) -> Self {
        Self {
            entity: Entity::new(id, EntityKind::Character)
                .with_radius(config.radius)
                .with_motion(MotionParams::character()),
            health: config.max_health,
            max_health: config.max_health,
            move_speed: config.move_speed,
            knockback_force: config.knockback_force,
            knockback_lift: config.knockback_lift,
            invuln_duration: config.invuln_duration,
            invuln_timer: 0.0,
            move_dir: Vec2::ZERO,
        }
    }

    /// Set the input-derived movement direction. Longer-than-unit vectors
    /// are normalized; zero clears the input.
    pub fn set_move_direction(&mut self, dir: Vec2) {
        self.move_dir = if dir.length_squared() > 1.0 {
            dir.normalize()
        } else {
            dir
        };
    }

    pub fn stop(&mut self) {
        self.move_dir = Vec2::ZERO;
    }

    pub fn move_direction(&self) -> Vec2 {
        self.move_dir
    }

    /// One tick: steer while grounded, run down the immunity window, then
    /// integrate against the sampled ground height.
    pub fn update(&mut self, dt: f32, ground: f32) {
        if self.entity.grounded && self.move_dir != Vec2::ZERO {
            self.entity.vel.x = self.move_dir.x * self.move_speed;
            self.entity.vel.z = self.move_dir.y * self.move_speed;
            self.entity.face_movement();
        }

        self.invuln_timer = (self.invuln_timer - dt).max(0.0);

        motion::integrate(&mut self.entity, dt, ground);
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invuln_timer > 0.0
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Monster-hit reaction. Ignored entirely during the immunity window.
    /// On a real hit: reduce health, open the window, and OVERWRITE velocity
    /// with a knockback impulse away from the attacker plus a fixed upward
    /// component. Returns whether damage was applied.
    pub fn take_damage(&mut self, amount: f32, attacker_pos: Vec3) -> bool {
        if self.is_invulnerable() || !self.is_alive() {
            return false;
        }

        self.health = (self.health - amount).max(0.0);
        self.invuln_timer = self.invuln_duration;

        let away = Vec2::new(
            self.entity.pos.x - attacker_pos.x,
            self.entity.pos.z - attacker_pos.z,
        );
        let dir = if away.length_squared() > 1e-6 {
            away.normalize()
        } else {
            // Attacker exactly on top of us: fall back to pushing backward.
            -self.entity.facing()
        };
        self.entity.vel = Vec3::new(
            dir.x * self.knockback_force,
            self.knockback_lift,
            dir.y * self.knockback_force,
        );
        self.entity.grounded = false;

        log::debug!(
            "character hit for {} (health {}), knocked toward ({:.1}, {:.1})",
            amount,
            self.health,
            dir.x,
            dir.y
        );
        true
    }

    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }
}
