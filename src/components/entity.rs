use glam::{Vec2, Vec3};

use crate::api::types::{EntityId, EntityKind};
use crate::core::motion::MotionParams;

/// Fat entity — one struct carrying the full physical state every variant
/// shares. Designed for simplicity over ECS purity: the world owns a handful
/// of these, not millions.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// Capability tag used for collision-policy and behavior dispatch.
    pub kind: EntityKind,
    /// Whether this entity is simulated (inactive entities are skipped).
    pub active: bool,
    /// Position in world space (Y up).
    pub pos: Vec3,
    /// Velocity in units per second.
    pub vel: Vec3,
    /// Heading around the Y axis, radians.
    pub yaw: f32,
    /// Whether the entity is resting on a surface this tick.
    pub grounded: bool,
    /// Collision circle radius in the horizontal plane. Fixed per concrete
    /// type, never negative.
    pub radius: f32,
    /// Integrator tuning for this entity class.
    pub motion: MotionParams,
}

impl Entity {
    /// Create a new entity of the given kind at the origin.
    pub fn new(id: EntityId, kind: EntityKind) -> Self {
        Self {
            id,
            kind,
            active: true,
            pos: Vec3::ZERO,
            vel: Vec3::ZERO,
            yaw: 0.0,
            grounded: false,
            radius: 0.5,
            motion: MotionParams::default(),
        }
    }

    // -- Builder pattern --

    pub fn with_pos(mut self, pos: Vec3) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius.max(0.0);
        self
    }

    pub fn with_motion(mut self, motion: MotionParams) -> Self {
        self.motion = motion;
        self
    }

    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }

    // -- Horizontal-plane helpers --

    /// Position projected onto the horizontal plane (x, z).
    pub fn planar(&self) -> Vec2 {
        Vec2::new(self.pos.x, self.pos.z)
    }

    /// Horizontal distance to a world point.
    pub fn planar_distance(&self, point: Vec3) -> f32 {
        self.planar().distance(Vec2::new(point.x, point.z))
    }

    /// Horizontal speed in units per second.
    pub fn planar_speed(&self) -> f32 {
        Vec2::new(self.vel.x, self.vel.z).length()
    }

    /// Snap the heading to the current horizontal movement direction.
    /// No-op while effectively stationary.
    pub fn face_movement(&mut self) {
        let planar = Vec2::new(self.vel.x, self.vel.z);
        if planar.length_squared() > 1e-4 {
            self.yaw = planar.x.atan2(planar.y);
        }
    }

    /// Snap the heading to face a world point.
    pub fn face_toward(&mut self, point: Vec3) {
        let d = Vec2::new(point.x - self.pos.x, point.z - self.pos.z);
        if d.length_squared() > 1e-6 {
            self.yaw = d.x.atan2(d.y);
        }
    }

    /// Unit vector of the current heading in the horizontal plane.
    pub fn facing(&self) -> Vec2 {
        Vec2::new(self.yaw.sin(), self.yaw.cos())
    }
}
