//! Collision resolution: broad-phase circle pruning, narrow-phase push-out,
//! boundary containment sampling, and the lily-pad surface snap.
//!
//! Push policy: `resolve_circular_overlap` displaces only its first argument,
//! so static obstacles stay immovable when passed second. Two mobile monsters
//! use `resolve_mutual_overlap`, which splits the correction between them.

use glam::{Vec2, Vec3};

use crate::api::types::LilyPad;
use crate::components::entity::Entity;

/// Vertical offset from a pad's bobbing surface to an attached entity origin.
pub const PAD_SURFACE_OFFSET: f32 = 0.5;
/// Attachment requires vertical velocity at or below this (approaching or
/// resting, not launching upward).
const PAD_ATTACH_VEL: f32 = 0.5;

/// Stateless resolver for all entity/entity, entity/static, and
/// entity/boundary collision in the world. All tests are circles in the
/// horizontal plane; vertical position never participates.
#[derive(Debug, Default)]
pub struct CollisionManager;

impl CollisionManager {
    pub fn new() -> Self {
        Self
    }

    /// Broad-phase prefilter: squared-distance comparison, no square root.
    /// Never returns false for a pair the narrow phase would resolve.
    pub fn check_circle_overlap(
        &self,
        a_pos: Vec2,
        a_radius: f32,
        b_pos: Vec2,
        b_radius: f32,
    ) -> bool {
        let r = a_radius + b_radius;
        a_pos.distance_squared(b_pos) < r * r
    }

    /// Narrow phase: if the circles overlap, push entity `a` out along the
    /// planar separation direction by the full overlap depth. Returns the
    /// push normal (unit vector from `b` toward `a`) when a push happened.
    ///
    /// A zero-distance pair (exactly coincident centers) is left unresolved
    /// this frame; other forces separate the pair and the next frame's pass
    /// resolves it.
    pub fn resolve_circular_overlap(
        &self,
        a: &mut Entity,
        b_pos: Vec3,
        b_radius: f32,
    ) -> Option<Vec2> {
        let bp = Vec2::new(b_pos.x, b_pos.z);
        let ap = a.planar();
        let r = a.radius + b_radius;
        let dist_sq = ap.distance_squared(bp);
        if dist_sq >= r * r {
            return None;
        }
        let dist = dist_sq.sqrt();
        if dist <= f32::EPSILON {
            return None;
        }
        let normal = (ap - bp) / dist;
        let overlap = r - dist;
        a.pos.x += normal.x * overlap;
        a.pos.z += normal.y * overlap;
        Some(normal)
    }

    /// Narrow phase between two mobile entities: each is displaced half the
    /// overlap. Used for monster-vs-monster contact where neither side is a
    /// fixed structure.
    pub fn resolve_mutual_overlap(&self, a: &mut Entity, b: &mut Entity) -> bool {
        let ap = a.planar();
        let bp = b.planar();
        let r = a.radius + b.radius;
        let dist_sq = ap.distance_squared(bp);
        if dist_sq >= r * r {
            return false;
        }
        let dist = dist_sq.sqrt();
        if dist <= f32::EPSILON {
            return false;
        }
        let normal = (ap - bp) / dist;
        let half = (r - dist) * 0.5;
        a.pos.x += normal.x * half;
        a.pos.z += normal.y * half;
        b.pos.x -= normal.x * half;
        b.pos.z -= normal.y * half;
        true
    }

    /// Conservative boundary containment test: sample the four cardinal
    /// points at ±radius around `next` and report a collision if any sample
    /// fails the validity predicate. Overreports near concave corners, which
    /// is accepted in exchange for four cheap samples.
    pub fn test_boundary_collision<F>(&self, next: Vec3, radius: f32, is_valid: F) -> bool
    where
        F: Fn(f32, f32) -> bool,
    {
        let samples = [
            (next.x - radius, next.z),
            (next.x + radius, next.z),
            (next.x, next.z - radius),
            (next.x, next.z + radius),
        ];
        samples.iter().any(|&(x, z)| !is_valid(x, z))
    }

    /// Remove only the velocity component pointing into the collision normal,
    /// preserving tangential motion. This is the gentle reaction used for
    /// simple pushes (bumping a building); monster hits use the overwrite
    /// knockback on the character instead.
    pub fn cancel_into_normal(&self, vel: &mut Vec3, normal: Vec2) {
        let planar = Vec2::new(vel.x, vel.z);
        let into = planar.dot(normal);
        if into < 0.0 {
            vel.x -= normal.x * into;
            vel.z -= normal.y * into;
        }
    }

    /// Lily-pad attachment: a surface snap, not a penetration push. Within
    /// the pad's radius and with vertical velocity at or below a small
    /// positive threshold, the entity is carried on the pad's bobbing
    /// surface and grounded. Re-run every frame so the entity tracks the
    /// pad's float offset.
    pub fn snap_to_lily_pad(&self, e: &mut Entity, pad: &LilyPad) -> bool {
        if e.planar_distance(pad.position) > pad.radius {
            return false;
        }
        if e.vel.y > PAD_ATTACH_VEL {
            return false;
        }
        e.pos.y = pad.position.y + pad.float_offset + PAD_SURFACE_OFFSET;
        if e.vel.y < 0.0 {
            e.vel.y = 0.0;
        }
        e.grounded = true;
        true
    }
}
