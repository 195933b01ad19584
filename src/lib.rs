pub mod api;
pub mod components;
pub mod core;
pub mod extensions;
pub mod input;

// Re-export key types at crate root for convenience
pub use api::types::{
    Bounds, CollidableGroup, EntityId, EntityKind, GameEvent, LilyPad, MonsterVariant, Obstacle,
    ObstacleKind, Target, EVENT_ALLIGATOR_ATTACK, EVENT_CHARACTER_DOWN, EVENT_CHARACTER_HIT,
    EVENT_FROG_HOP, EVENT_FROG_TONGUE, EVENT_TROLL_SWING,
};
pub use api::world::{Terrain, World, WorldConfig, OUT_OF_WORLD_HEIGHT};
pub use components::alligator::{AlligatorBrain, AlligatorState};
pub use components::character::{Character, CharacterConfig};
pub use components::entity::Entity;
pub use components::frog::{FrogBrain, FrogState};
pub use components::lurker::{LurkerBrain, LurkerState};
pub use components::monster::{Brain, Monster, MonsterCtx, MonsterStats, PlayerView};
pub use components::troll::{TrollBrain, TrollPose};
pub use core::collision::CollisionManager;
pub use core::motion::{integrate, MotionParams};
pub use core::rng::Rng;
pub use core::time::{Cooldown, FixedTimestep};
pub use input::queue::{ControlEvent, ControlQueue};

// Extensions — decoupled optional helpers
pub use extensions::{ease, ease_vec2, lerp, lerp_vec2, Easing};
