//! External surface of the simulation: the `Terrain` trait the host
//! implements, the serde tuning config, and the `World` orchestrator that
//! runs one fixed-order tick over character, monsters and collisions.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::api::types::{
    CollidableGroup, EntityId, GameEvent, LilyPad, MonsterVariant, ObstacleKind,
    EVENT_CHARACTER_DOWN, EVENT_CHARACTER_HIT,
};
use crate::components::character::{Character, CharacterConfig};
use crate::components::monster::{Monster, MonsterCtx, PlayerView};
use crate::core::collision::CollisionManager;
use crate::core::rng::Rng;
use crate::input::queue::{ControlEvent, ControlQueue};

/// Ground height reported for queries outside every biome. Anything this far
/// down is unreachable; the boundary test keeps entities off such terrain.
pub const OUT_OF_WORLD_HEIGHT: f32 = -1000.0;

/// Everything the simulation needs to know about the world around it. The
/// host owns terrain generation and scenery; the simulation only queries.
///
/// `collidable_groups` and `lily_pads` are re-queried every tick, so the host
/// is free to stream scenery in and out and to animate pad bobbing.
pub trait Terrain {
    fn ground_height(&self, x: f32, z: f32) -> f32;
    fn is_position_valid(&self, x: f32, z: f32) -> bool;
    fn collidable_groups(&self, near: Vec2) -> Vec<CollidableGroup>;
    fn lily_pads(&self, near: Vec2) -> Vec<LilyPad>;
}

/// World tuning, deserializable from host-supplied JSON. Every field falls
/// back to its default when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Simulation step in seconds.
    pub fixed_dt: f32,
    /// Seed for all in-simulation randomness.
    pub seed: u64,
    pub character: CharacterConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            seed: 1,
            character: CharacterConfig::default(),
        }
    }
}

impl WorldConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// The simulation root: one character, the monster population, the control
/// queue and the per-tick event buffer the host reads back.
pub struct World {
    config: WorldConfig,
    character: Character,
    monsters: Vec<Monster>,
    controls: ControlQueue,
    rng: Rng,
    collision: CollisionManager,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl World {
    pub fn new(config: WorldConfig) -> Self {
        let character = Character::new(EntityId(0), &config.character);
        let rng = Rng::new(config.seed);
        Self {
            config,
            character,
            monsters: Vec::new(),
            controls: ControlQueue::new(),
            rng,
            collision: CollisionManager::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Reserve an entity id for a monster about to be spawned.
    pub fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a monster to the population. Call between ticks only; the
    /// population is fixed while a tick runs.
    pub fn spawn_monster(&mut self, monster: Monster) {
        log::debug!(
            "spawn {:?} {:?} at {}",
            monster.variant(),
            monster.entity.id,
            monster.entity.pos
        );
        self.monsters.push(monster);
    }

    /// Remove a monster between ticks. Returns true if it existed.
    pub fn remove_monster(&mut self, id: EntityId) -> bool {
        let before = self.monsters.len();
        self.monsters.retain(|m| m.entity.id != id);
        self.monsters.len() != before
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn character_mut(&mut self) -> &mut Character {
        &mut self.character
    }

    pub fn monsters(&self) -> &[Monster] {
        &self.monsters
    }

    pub fn monster(&self, id: EntityId) -> Option<&Monster> {
        self.monsters.iter().find(|m| m.entity.id == id)
    }

    pub fn monster_mut(&mut self, id: EntityId) -> Option<&mut Monster> {
        self.monsters.iter_mut().find(|m| m.entity.id == id)
    }

    pub fn push_control(&mut self, event: ControlEvent) {
        self.controls.push(event);
    }

    /// Events produced by the most recent tick, in emission order.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Advance the simulation by one fixed step.
    ///
    /// Order is fixed: drain control intents, character boundary test and
    /// integration, monster AI and integration, then collision resolution
    /// (damage, static push, mutual push). Events accumulate over the tick
    /// and stay readable until the next one.
    pub fn tick(&mut self, terrain: &dyn Terrain) {
        let dt = self.config.fixed_dt;
        self.events.clear();
        let was_alive = self.character.is_alive();

        for event in self.controls.drain() {
            match event {
                ControlEvent::Move { x, z } => {
                    self.character.set_move_direction(Vec2::new(x, z))
                }
                ControlEvent::Stop => self.character.stop(),
            }
        }

        self.step_character(terrain, dt);
        self.step_monsters(terrain, dt);
        self.apply_staged_hits();
        self.resolve_collisions(terrain);

        if was_alive && !self.character.is_alive() {
            self.events
                .push(GameEvent::new(EVENT_CHARACTER_DOWN, 0.0, 0.0, 0.0));
            log::info!("character down");
        }
    }

    fn step_character(&mut self, terrain: &dyn Terrain, dt: f32) {
        // Boundary pre-test on where this tick's steering would put the
        // character. Grounded steering overwrites planar velocity, so
        // predict with the intent; airborne motion keeps its velocity.
        let e = &self.character.entity;
        let planar_vel = if e.grounded {
            self.character.move_direction() * self.character.move_speed
        } else {
            Vec2::new(e.vel.x, e.vel.z)
        };
        let next = e.pos + Vec3::new(planar_vel.x, 0.0, planar_vel.y) * dt;
        let blocked = self
            .collision
            .test_boundary_collision(next, e.radius, |x, z| terrain.is_position_valid(x, z));
        if blocked {
            self.character.stop();
            self.character.entity.vel.x = 0.0;
            self.character.entity.vel.z = 0.0;
        }

        let ground = terrain.ground_height(self.character.entity.pos.x, self.character.entity.pos.z);
        self.character.update(dt, ground);
    }

    fn step_monsters(&mut self, terrain: &dyn Terrain, dt: f32) {
        let player = if self.character.is_alive() {
            Some(PlayerView {
                pos: self.character.entity.pos,
                radius: self.character.entity.radius,
            })
        } else {
            None
        };

        // Planar positions of every lurker, captured before the pass so each
        // lurker sees its siblings' start-of-tick positions.
        let lurkers: Vec<(usize, Vec2)> = self
            .monsters
            .iter()
            .enumerate()
            .filter(|(_, m)| m.variant() == MonsterVariant::Lurker)
            .map(|(i, m)| (i, m.entity.planar()))
            .collect();

        for i in 0..self.monsters.len() {
            let variant = self.monsters[i].variant();
            let siblings: Vec<Vec2> = if variant == MonsterVariant::Lurker {
                lurkers
                    .iter()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, p)| *p)
                    .collect()
            } else {
                Vec::new()
            };
            let pads = if variant == MonsterVariant::Frog {
                terrain.lily_pads(self.monsters[i].entity.planar())
            } else {
                Vec::new()
            };
            let mut ctx = MonsterCtx {
                dt,
                terrain,
                player,
                pads: &pads,
                siblings: &siblings,
                rng: &mut self.rng,
                events: &mut self.events,
            };
            self.monsters[i].update(&mut ctx);
        }
    }

    /// Route hit events staged by monster attacks into the character. Hits
    /// absorbed by invulnerability are dropped from the outgoing stream.
    fn apply_staged_hits(&mut self) {
        let staged = std::mem::take(&mut self.events);
        for event in staged {
            if event.kind == EVENT_CHARACTER_HIT {
                let attacker =
                    Vec3::new(event.b, self.character.entity.pos.y, event.c);
                if self.character.take_damage(event.a, attacker) {
                    self.events.push(event);
                }
            } else {
                self.events.push(event);
            }
        }
    }

    fn resolve_collisions(&mut self, terrain: &dyn Terrain) {
        // Character against monsters: body contact deals the monster's
        // contact damage and shoves the character out of the overlap. The
        // monster never yields ground to the character.
        for m in &self.monsters {
            if !m.entity.active {
                continue;
            }
            let overlap = self.collision.check_circle_overlap(
                self.character.entity.planar(),
                self.character.entity.radius,
                m.entity.planar(),
                m.entity.radius,
            );
            if !overlap {
                continue;
            }
            if self.character.take_damage(m.damage(), m.entity.pos) {
                self.events
                    .push(GameEvent::character_hit(m.damage(), m.entity.pos));
            }
            self.collision.resolve_circular_overlap(
                &mut self.character.entity,
                m.entity.pos,
                m.entity.radius,
            );
        }

        // Character against static scenery: asymmetric push plus the gentle
        // velocity reaction. Lily pads are walkable surfaces, not walls.
        let groups = terrain.collidable_groups(self.character.entity.planar());
        for group in &groups {
            if group.kind == ObstacleKind::LilyPad {
                continue;
            }
            for obstacle in &group.items {
                let pushed = self.collision.resolve_circular_overlap(
                    &mut self.character.entity,
                    obstacle.position,
                    obstacle.radius,
                );
                if let Some(normal) = pushed {
                    self.collision
                        .cancel_into_normal(&mut self.character.entity.vel, normal);
                }
            }
        }

        // Lily pads are surfaces, not walls: the snap replaces the push and
        // runs every frame so the character rides the pad's bob.
        let pads = terrain.lily_pads(self.character.entity.planar());
        for pad in &pads {
            if self
                .collision
                .snap_to_lily_pad(&mut self.character.entity, pad)
            {
                break;
            }
        }

        // Monster against monster: mutual half-push, except trolls, which
        // are heavy enough to count as scenery.
        for i in 0..self.monsters.len() {
            let (left, right) = self.monsters.split_at_mut(i + 1);
            let a = &mut left[i];
            if !a.entity.active {
                continue;
            }
            for b in right.iter_mut() {
                if !b.entity.active {
                    continue;
                }
                let overlap = self.collision.check_circle_overlap(
                    a.entity.planar(),
                    a.entity.radius,
                    b.entity.planar(),
                    b.entity.radius,
                );
                if !overlap {
                    continue;
                }
                let a_troll = a.variant() == MonsterVariant::Troll;
                let b_troll = b.variant() == MonsterVariant::Troll;
                match (a_troll, b_troll) {
                    (true, true) => {}
                    (true, false) => {
                        self.collision.resolve_circular_overlap(
                            &mut b.entity,
                            a.entity.pos,
                            a.entity.radius,
                        );
                    }
                    (false, true) => {
                        self.collision.resolve_circular_overlap(
                            &mut a.entity,
                            b.entity.pos,
                            b.entity.radius,
                        );
                    }
                    (false, false) => {
                        self.collision.resolve_mutual_overlap(&mut a.entity, &mut b.entity);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// Infinite flat ground at height zero with no scenery. The default
    /// terrain for unit tests.
    pub struct FlatTerrain;

    impl Terrain for FlatTerrain {
        fn ground_height(&self, _x: f32, _z: f32) -> f32 {
            0.0
        }

        fn is_position_valid(&self, _x: f32, _z: f32) -> bool {
            true
        }

        fn collidable_groups(&self, _near: Vec2) -> Vec<CollidableGroup> {
            Vec::new()
        }

        fn lily_pads(&self, _near: Vec2) -> Vec<LilyPad> {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FlatTerrain;
    use super::*;
    use crate::api::types::{Bounds, Obstacle, Target};

    /// Flat ground that ends at x = 5.
    struct WalledTerrain;

    impl Terrain for WalledTerrain {
        fn ground_height(&self, x: f32, _z: f32) -> f32 {
            if x < 5.0 {
                0.0
            } else {
                OUT_OF_WORLD_HEIGHT
            }
        }

        fn is_position_valid(&self, x: f32, _z: f32) -> bool {
            x < 5.0
        }

        fn collidable_groups(&self, _near: Vec2) -> Vec<CollidableGroup> {
            Vec::new()
        }

        fn lily_pads(&self, _near: Vec2) -> Vec<LilyPad> {
            Vec::new()
        }
    }

    /// Flat ground with a single building at (1, 0).
    struct BuildingTerrain;

    impl Terrain for BuildingTerrain {
        fn ground_height(&self, _x: f32, _z: f32) -> f32 {
            0.0
        }

        fn is_position_valid(&self, _x: f32, _z: f32) -> bool {
            true
        }

        fn collidable_groups(&self, _near: Vec2) -> Vec<CollidableGroup> {
            vec![CollidableGroup {
                kind: ObstacleKind::Building,
                items: vec![Obstacle {
                    position: Vec3::new(1.0, 0.0, 0.0),
                    radius: 1.0,
                }],
            }]
        }

        fn lily_pads(&self, _near: Vec2) -> Vec<LilyPad> {
            Vec::new()
        }
    }

    /// Flat ground with one lily pad floating at the origin.
    struct PadTerrain {
        float_offset: f32,
    }

    impl Terrain for PadTerrain {
        fn ground_height(&self, _x: f32, _z: f32) -> f32 {
            0.0
        }

        fn is_position_valid(&self, _x: f32, _z: f32) -> bool {
            true
        }

        fn collidable_groups(&self, _near: Vec2) -> Vec<CollidableGroup> {
            Vec::new()
        }

        fn lily_pads(&self, _near: Vec2) -> Vec<LilyPad> {
            vec![LilyPad {
                position: Vec3::new(0.0, 0.3, 0.0),
                radius: 2.0,
                float_offset: self.float_offset,
            }]
        }
    }

    fn settled_world() -> World {
        let mut world = World::new(WorldConfig::default());
        // Let the character land on the ground before the scenario starts.
        for _ in 0..30 {
            world.tick(&FlatTerrain);
        }
        world
    }

    #[test]
    fn config_json_fills_missing_fields_with_defaults() {
        let config = WorldConfig::from_json(r#"{ "seed": 99 }"#).unwrap();
        assert_eq!(config.seed, 99);
        assert_eq!(config.fixed_dt, 1.0 / 60.0);
        assert_eq!(config.character.max_health, 100.0);
    }

    #[test]
    fn control_events_drive_the_character() {
        let mut world = settled_world();
        let start = world.character().entity.pos;
        world.push_control(ControlEvent::Move { x: 1.0, z: 0.0 });
        for _ in 0..60 {
            world.tick(&FlatTerrain);
        }
        let moved = world.character().entity.pos.x - start.x;
        assert!(moved > 3.0, "expected motion east, moved {}", moved);

        world.push_control(ControlEvent::Stop);
        let before = world.character().entity.pos.x;
        for _ in 0..30 {
            world.tick(&FlatTerrain);
        }
        // Friction bleeds the remaining speed off in well under a second.
        let drift = world.character().entity.pos.x - before;
        assert!(drift < 1.0, "character kept sliding: {}", drift);
        assert_eq!(world.character().entity.vel.x, 0.0);
    }

    #[test]
    fn boundary_stops_the_character_at_the_wall() {
        let mut world = settled_world();
        for _ in 0..300 {
            world.push_control(ControlEvent::Move { x: 1.0, z: 0.0 });
            world.tick(&WalledTerrain);
        }
        let x = world.character().entity.pos.x;
        let radius = world.character().entity.radius;
        assert!(x + radius <= 5.0 + 1e-3, "crossed the wall: x = {}", x);
    }

    #[test]
    fn contact_damage_lands_once_per_invulnerability_window() {
        let mut world = settled_world();
        let id = world.allocate_id();
        let mut chaser = Monster::chaser(id, Bounds::centered(Vec2::ZERO, 50.0));
        chaser.entity.pos = world.character().entity.pos + Vec3::new(0.5, 0.0, 0.0);
        chaser.entity.grounded = true;
        chaser.set_target(Target::Player);
        world.spawn_monster(chaser);

        // Half the invulnerability window: exactly one contact hit applies,
        // regardless of how many frames overlapped.
        for _ in 0..30 {
            world.tick(&FlatTerrain);
        }
        assert_eq!(world.character().health, 100.0 - 5.0);
    }

    #[test]
    fn contact_hit_is_reported_and_knocks_back() {
        let mut world = settled_world();
        let id = world.allocate_id();
        let mut chaser = Monster::chaser(id, Bounds::centered(Vec2::ZERO, 50.0));
        chaser.entity.pos = world.character().entity.pos + Vec3::new(0.5, 0.0, 0.0);
        chaser.entity.grounded = true;
        world.spawn_monster(chaser);

        world.tick(&FlatTerrain);
        assert!(world
            .events()
            .iter()
            .any(|e| e.kind == EVENT_CHARACTER_HIT));
        // Knockback points away from the attacker on +x.
        assert!(world.character().entity.vel.x < 0.0);
    }

    #[test]
    fn building_pushes_the_character_out() {
        let mut world = settled_world();
        // Walk straight into the building.
        for _ in 0..120 {
            world.push_control(ControlEvent::Move { x: 1.0, z: 0.0 });
            world.tick(&BuildingTerrain);
        }
        let dist = world
            .character()
            .entity
            .planar_distance(Vec3::new(1.0, 0.0, 0.0));
        let min = 1.0 + world.character().entity.radius;
        assert!(dist >= min - 1e-3, "embedded in building: {}", dist);
    }

    #[test]
    fn character_rides_a_lily_pad_surface() {
        let mut world = settled_world();
        let mut terrain = PadTerrain { float_offset: 0.1 };
        for _ in 0..60 {
            world.tick(&terrain);
        }
        let character = world.character();
        let y = character.entity.pos.y;
        assert!((y - 0.9).abs() < 1e-4, "not attached to the pad: y = {}", y);
        assert!(character.entity.grounded);

        // The attachment is re-run every frame, so the character tracks
        // the pad's bob.
        terrain.float_offset = -0.05;
        world.tick(&terrain);
        let y = world.character().entity.pos.y;
        assert!((y - 0.75).abs() < 1e-4, "not tracking the bob: y = {}", y);
    }

    #[test]
    fn overlapping_monsters_separate() {
        let mut world = settled_world();
        let home = Bounds::centered(Vec2::ZERO, 50.0);
        for offset in [10.0, 10.4] {
            let id = world.allocate_id();
            let mut m = Monster::chaser(id, home);
            m.entity.pos = Vec3::new(offset, m.entity.motion.height_offset, 0.0);
            m.entity.grounded = true;
            world.spawn_monster(m);
        }
        for _ in 0..20 {
            world.tick(&FlatTerrain);
        }
        let a = world.monsters()[0].entity.planar();
        let b = world.monsters()[1].entity.planar();
        let min = world.monsters()[0].entity.radius + world.monsters()[1].entity.radius;
        assert!(a.distance(b) >= min - 1e-3, "still overlapping: {}", a.distance(b));
    }

    #[test]
    fn character_down_event_fires_once() {
        let mut world = settled_world();
        world.character_mut().health = 4.0;
        let id = world.allocate_id();
        let mut chaser = Monster::chaser(id, Bounds::centered(Vec2::ZERO, 50.0));
        chaser.entity.pos = world.character().entity.pos + Vec3::new(0.5, 0.0, 0.0);
        chaser.entity.grounded = true;
        world.spawn_monster(chaser);

        world.tick(&FlatTerrain);
        let downs = world
            .events()
            .iter()
            .filter(|e| e.kind == EVENT_CHARACTER_DOWN)
            .count();
        assert_eq!(downs, 1);
        assert!(!world.character().is_alive());

        // Later ticks do not repeat the announcement.
        world.tick(&FlatTerrain);
        assert!(world
            .events()
            .iter()
            .all(|e| e.kind != EVENT_CHARACTER_DOWN));
    }

    #[test]
    fn remove_monster_shrinks_the_population() {
        let mut world = World::new(WorldConfig::default());
        let id = world.allocate_id();
        world.spawn_monster(Monster::chaser(id, Bounds::centered(Vec2::ZERO, 10.0)));
        assert_eq!(world.monsters().len(), 1);
        assert!(world.remove_monster(id));
        assert!(world.monsters().is_empty());
        assert!(!world.remove_monster(id));
    }
}
