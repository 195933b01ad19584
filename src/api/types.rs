use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// Unique identifier for an entity in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u32);

/// Monster archetype tag. Selects which behavioral state machine drives the
/// entity; also used by the collision pass to decide push policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonsterVariant {
    /// Straight-line pursuit of the current target, no cooldowns.
    Chaser,
    /// Rest/walk/hop ambient cycle with a tongue attack override.
    Frog,
    /// Swims at water level, lunges when the player comes close.
    Alligator,
    /// Grid patroller that switches to pursuit inside a distance threshold.
    Lurker,
    /// Stationary heavy with a phased club-swing attack.
    Troll,
}

/// Kind of static world obstacle supplied by the terrain layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    Building,
    Tree,
    Cactus,
    Rock,
    LilyPad,
}

/// Capability tag on every entity. The collision pass and the state machines
/// dispatch on this instead of downcasting concrete types, so a `match` can
/// be checked for exhaustiveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Character,
    Monster(MonsterVariant),
    StaticObstacle(ObstacleKind),
}

impl EntityKind {
    /// Whether this entity never moves (second argument in asymmetric push-out).
    pub fn is_static(self) -> bool {
        matches!(self, EntityKind::StaticObstacle(_))
    }
}

/// What a monster is currently steering toward.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Target {
    /// No target; state-dependent branches are skipped this frame.
    #[default]
    None,
    /// A fixed point in the world (patrol/wander destinations).
    Point(Vec3),
    /// The player character, resolved to a fresh position every tick.
    Player,
}

/// Axis-aligned horizontal rectangle bounding one biome region.
/// Positions outside the union of all regions are invalid ground.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Square region centered on `center` with the given half extent.
    pub fn centered(center: Vec2, half_extent: f32) -> Self {
        let h = Vec2::splat(half_extent);
        Self {
            min: center - h,
            max: center + h,
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Clamp a point into the rectangle.
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }

    /// The rectangle shrunk by `margin` on every side. Collapses to the
    /// center point if the margin exceeds the half extents.
    pub fn interior(&self, margin: f32) -> Self {
        let m = Vec2::splat(margin);
        let min = self.min + m;
        let max = self.max - m;
        if min.x > max.x || min.y > max.y {
            let c = self.center();
            Self { min: c, max: c }
        } else {
            Self { min, max }
        }
    }
}

/// One static collidable supplied by the terrain layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub position: Vec3,
    pub radius: f32,
}

/// A uniform batch of static collidables of one kind. Each biome reports its
/// own groups; the collision pass iterates them without knowing which biome
/// produced them.
#[derive(Debug, Clone)]
pub struct CollidableGroup {
    pub kind: ObstacleKind,
    pub items: Vec<Obstacle>,
}

/// A floating lily pad, re-queried every frame so `float_offset` tracks the
/// pad's current bob.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LilyPad {
    /// Pad center at its rest height.
    pub position: Vec3,
    /// Attachment radius in the horizontal plane.
    pub radius: f32,
    /// Current vertical bob offset from the rest height.
    pub float_offset: f32,
}

/// A game event communicated from the simulation to the host via a flat
/// float quad: `kind` identifies the event, `a/b/c` carry payload. Hosts key
/// sounds and UI feedback off these.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct GameEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

/// The character took damage. `a` = amount, `b/c` = attacker x/z.
pub const EVENT_CHARACTER_HIT: f32 = 1.0;
/// The character's health reached zero.
pub const EVENT_CHARACTER_DOWN: f32 = 2.0;
/// A frog launched its tongue. `a` = frog entity id.
pub const EVENT_FROG_TONGUE: f32 = 3.0;
/// A frog left the ground for a hop. `a` = frog entity id.
pub const EVENT_FROG_HOP: f32 = 4.0;
/// An alligator entered its attack lunge. `a` = entity id.
pub const EVENT_ALLIGATOR_ATTACK: f32 = 5.0;
/// A troll began its club swing. `a` = entity id.
pub const EVENT_TROLL_SWING: f32 = 6.0;

impl GameEvent {
    pub const FLOATS: usize = 4;

    pub fn new(kind: f32, a: f32, b: f32, c: f32) -> Self {
        Self { kind, a, b, c }
    }

    pub fn character_hit(amount: f32, attacker: Vec3) -> Self {
        Self::new(EVENT_CHARACTER_HIT, amount, attacker.x, attacker.z)
    }

    pub fn monster_action(kind: f32, id: EntityId) -> Self {
        Self::new(kind, id.0 as f32, 0.0, 0.0)
    }
}
