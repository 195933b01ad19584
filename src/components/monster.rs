//! Monster base: shared stats, target handling, the generic chase behavior,
//! and the `Brain` dispatch into each archetype's state machine.

use glam::{Vec2, Vec3};

use crate::api::types::{
    Bounds, EntityId, EntityKind, GameEvent, LilyPad, MonsterVariant, Target,
};
use crate::api::world::Terrain;
use crate::components::alligator::AlligatorBrain;
use crate::components::entity::Entity;
use crate::components::frog::FrogBrain;
use crate::components::lurker::LurkerBrain;
use crate::components::troll::TrollBrain;
use crate::core::motion::{self, MotionParams};
use crate::core::rng::Rng;

/// Snapshot of the player as the AI sees it this tick.
#[derive(Debug, Clone, Copy)]
pub struct PlayerView {
    pub pos: Vec3,
    pub radius: f32,
}

/// Per-tick context threaded into every brain update. Obstacle and pad lists
/// are the terrain layer's fresh per-frame views, never cached by monsters.
pub struct MonsterCtx<'a> {
    pub dt: f32,
    pub terrain: &'a dyn Terrain,
    pub player: Option<PlayerView>,
    pub pads: &'a [LilyPad],
    /// Planar positions of same-variant monsters, excluding the one updating.
    pub siblings: &'a [Vec2],
    pub rng: &'a mut Rng,
    pub events: &'a mut Vec<GameEvent>,
}

/// Shared per-monster tuning, fixed at spawn.
#[derive(Debug, Clone, Copy)]
pub struct MonsterStats {
    /// Steering speed in units/s.
    pub move_speed: f32,
    /// Damage dealt per landed hit.
    pub damage: f32,
    /// Distance inside which a player target is acquired or retained.
    pub aggro_range: f32,
    /// The biome region this monster never leaves.
    pub home: Bounds,
}

/// The behavioral state machine driving one monster.
#[derive(Debug, Clone)]
pub enum Brain {
    /// Straight pursuit of the current target. No cooldowns, no states
    /// beyond having-a-target or not.
    Chaser,
    Frog(FrogBrain),
    Alligator(AlligatorBrain),
    Lurker(LurkerBrain),
    Troll(TrollBrain),
}

/// One monster: entity physics plus stats, target, and brain.
#[derive(Debug, Clone)]
pub struct Monster {
    pub entity: Entity,
    pub stats: MonsterStats,
    pub target: Target,
    pub brain: Brain,
}

impl Monster {
    fn with_brain(
        id: EntityId,
        variant: MonsterVariant,
        motion: MotionParams,
        radius: f32,
        stats: MonsterStats,
        brain: Brain,
    ) -> Self {
        Self {
            entity: Entity::new(id, EntityKind::Monster(variant))
                .with_radius(radius)
                .with_motion(motion),
            stats,
            target: Target::None,
            brain,
        }
    }

    pub fn chaser(id: EntityId, home: Bounds) -> Self {
        Self::with_brain(
            id,
            MonsterVariant::Chaser,
            MotionParams::walker(),
            0.6,
            MonsterStats {
                move_speed: 2.5,
                damage: 5.0,
                aggro_range: 12.0,
                home,
            },
            Brain::Chaser,
        )
    }

    pub fn frog(id: EntityId, home: Bounds) -> Self {
        Self::with_brain(
            id,
            MonsterVariant::Frog,
            MotionParams::hopper(),
            0.7,
            MonsterStats {
                move_speed: 1.2,
                damage: 8.0,
                aggro_range: 10.0,
                home,
            },
            Brain::Frog(FrogBrain::new()),
        )
    }

    pub fn alligator(id: EntityId, home: Bounds, water_level: f32) -> Self {
        Self::with_brain(
            id,
            MonsterVariant::Alligator,
            MotionParams::walker(),
            0.9,
            MonsterStats {
                move_speed: 2.0,
                damage: 14.0,
                aggro_range: 14.0,
                home,
            },
            Brain::Alligator(AlligatorBrain::new(water_level)),
        )
    }

    pub fn lurker(id: EntityId, home: Bounds) -> Self {
        Self::with_brain(
            id,
            MonsterVariant::Lurker,
            MotionParams::walker(),
            0.6,
            MonsterStats {
                move_speed: 1.5,
                damage: 6.0,
                aggro_range: 16.0,
                home,
            },
            Brain::Lurker(LurkerBrain::new()),
        )
    }

    pub fn troll(id: EntityId, home: Bounds) -> Self {
        Self::with_brain(
            id,
            MonsterVariant::Troll,
            MotionParams::walker(),
            1.2,
            MonsterStats {
                move_speed: 0.0,
                damage: 20.0,
                aggro_range: 12.0,
                home,
            },
            Brain::Troll(TrollBrain::new()),
        )
    }

    pub fn variant(&self) -> MonsterVariant {
        match self.entity.kind {
            EntityKind::Monster(v) => v,
            // Monsters are only ever constructed with a monster kind.
            _ => MonsterVariant::Chaser,
        }
    }

    /// Aggro or a scripted destination, set by the game loop.
    pub fn set_target(&mut self, target: Target) {
        self.target = target;
    }

    pub fn clear_target(&mut self) {
        self.target = Target::None;
    }

    pub fn damage(&self) -> f32 {
        self.stats.damage
    }

    /// Resolve the abstract target to a world position for this tick.
    /// `None` silently disables every target-dependent branch this frame.
    pub fn resolved_target(&self, player: &Option<PlayerView>) -> Option<Vec3> {
        match self.target {
            Target::None => None,
            Target::Point(p) => Some(p),
            Target::Player => player.as_ref().map(|p| p.pos),
        }
    }

    /// One AI+physics tick.
    pub fn update(&mut self, ctx: &mut MonsterCtx) {
        if !self.entity.active {
            return;
        }

        // Loss of aggro: a player target beyond aggro range is dropped.
        if self.target == Target::Player {
            if let Some(p) = ctx.player {
                if self.entity.planar_distance(p.pos) > self.stats.aggro_range {
                    log::trace!("monster {:?} lost aggro", self.entity.id);
                    self.target = Target::None;
                }
            }
        }

        let resolved = self.resolved_target(&ctx.player);
        match &mut self.brain {
            Brain::Chaser => {
                chase(&mut self.entity, &self.stats, resolved, ctx);
            }
            Brain::Frog(b) => b.update(&mut self.entity, &mut self.target, &self.stats, ctx),
            Brain::Alligator(b) => b.update(&mut self.entity, &mut self.target, &self.stats, ctx),
            Brain::Lurker(b) => b.update(&mut self.entity, &mut self.target, &self.stats, ctx),
            Brain::Troll(b) => b.update(&mut self.entity, &mut self.target, &self.stats, ctx),
        }
    }
}

/// The generic chase step shared by the base archetype: integrate, then
/// while grounded steer straight at the target's horizontal projection and
/// snap the heading to the movement direction.
pub fn chase(e: &mut Entity, stats: &MonsterStats, target: Option<Vec3>, ctx: &mut MonsterCtx) {
    let ground = ctx.terrain.ground_height(e.pos.x, e.pos.z);
    motion::integrate(e, ctx.dt, ground);

    let Some(t) = target else {
        return;
    };
    if !e.grounded {
        return;
    }
    let to = Vec2::new(t.x - e.pos.x, t.z - e.pos.z);
    if to.length_squared() > 1e-4 {
        let dir = to.normalize();
        e.vel.x = dir.x * stats.move_speed;
        e.vel.z = dir.y * stats.move_speed;
        e.face_movement();
    }
}

/// Steer a grounded entity toward a planar point at the given speed.
/// Returns the remaining planar distance.
pub fn steer_planar(e: &mut Entity, dest: Vec2, speed: f32) -> f32 {
    let to = dest - e.planar();
    let dist = to.length();
    if dist > 1e-4 {
        let dir = to / dist;
        e.vel.x = dir.x * speed;
        e.vel.z = dir.y * speed;
        e.face_movement();
    }
    dist
}
