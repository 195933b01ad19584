//! Lurker state machine: grid-snapped patrolling that flips into direct
//! pursuit purely on a distance threshold. Deliberately no hysteresis band —
//! a lurker parked exactly at the threshold can flip state tick to tick,
//! which matches the original overworld behavior.

use glam::Vec2;

use crate::api::types::Target;
use crate::components::entity::Entity;
use crate::components::monster::{steer_planar, MonsterCtx, MonsterStats};
use crate::core::motion;

/// Player distance below which the lurker chases.
const CHASE_THRESHOLD: f32 = 8.0;
/// Pursuit speed; patrol uses the monster's base move speed.
const CHASE_SPEED: f32 = 3.5;
/// Patrol movement grid cell size.
const GRID: f32 = 2.0;
/// Minimum distance a patrol destination keeps from sibling lurkers.
const SIBLING_SEPARATION: f32 = 3.0;
/// Proximity at which a patrol destination counts as reached.
const TARGET_REACHED: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LurkerState {
    Patrolling,
    Chasing,
}

#[derive(Debug, Clone)]
pub struct LurkerBrain {
    state: LurkerState,
    patrol_target: Option<Vec2>,
}

impl LurkerBrain {
    pub fn new() -> Self {
        Self {
            state: LurkerState::Patrolling,
            patrol_target: None,
        }
    }

    pub fn state(&self) -> LurkerState {
        self.state
    }

    pub fn patrol_target(&self) -> Option<Vec2> {
        self.patrol_target
    }

    pub fn update(
        &mut self,
        e: &mut Entity,
        target: &mut Target,
        stats: &MonsterStats,
        ctx: &mut MonsterCtx,
    ) {
        let ground = ctx.terrain.ground_height(e.pos.x, e.pos.z);
        motion::integrate(e, ctx.dt, ground);

        // Pure threshold switch against the tracked player.
        let chasing_player = match (*target, ctx.player) {
            (Target::Player, Some(p)) => e.planar_distance(p.pos) < CHASE_THRESHOLD,
            _ => false,
        };
        self.state = if chasing_player {
            LurkerState::Chasing
        } else {
            LurkerState::Patrolling
        };

        if !e.grounded {
            return;
        }

        match self.state {
            LurkerState::Chasing => {
                // ctx.player is present whenever chasing_player was computed true.
                if let Some(p) = ctx.player {
                    steer_planar(e, Vec2::new(p.pos.x, p.pos.z), CHASE_SPEED);
                }
            }
            LurkerState::Patrolling => {
                let needs_pick = match self.patrol_target {
                    None => true,
                    Some(t) => t.distance(e.planar()) < TARGET_REACHED,
                };
                if needs_pick {
                    self.patrol_target = Some(pick_patrol_target(e, stats, ctx));
                }
                if let Some(dest) = self.patrol_target {
                    steer_planar(e, dest, stats.move_speed);
                }
            }
        }
    }
}

impl Default for LurkerBrain {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the next patrol cell: snap the current position to the movement
/// grid, then try the four cardinal neighbors in random order, keeping only
/// cells that stay in bounds and away from sibling lurkers. Falls back to an
/// away-from-siblings step, then to the biome center.
fn pick_patrol_target(e: &Entity, stats: &MonsterStats, ctx: &mut MonsterCtx) -> Vec2 {
    let cell = (e.planar() / GRID).round() * GRID;
    let neighbors = [
        cell + Vec2::new(GRID, 0.0),
        cell + Vec2::new(-GRID, 0.0),
        cell + Vec2::new(0.0, GRID),
        cell + Vec2::new(0.0, -GRID),
    ];
    let start = ctx.rng.next_int(4) as usize;
    for i in 0..4 {
        let candidate = neighbors[(start + i) % 4];
        if !stats.home.contains(candidate) {
            continue;
        }
        let clear = ctx
            .siblings
            .iter()
            .all(|s| s.distance(candidate) >= SIBLING_SEPARATION);
        if clear {
            return candidate;
        }
    }

    // Every neighbor is blocked: step directly away from the nearest sibling.
    if let Some(nearest) = ctx
        .siblings
        .iter()
        .min_by(|a, b| {
            let da = a.distance_squared(e.planar());
            let db = b.distance_squared(e.planar());
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
        .copied()
    {
        let away = e.planar() - nearest;
        if away.length_squared() > 1e-6 {
            let candidate = stats.home.clamp(e.planar() + away.normalize() * GRID);
            return candidate;
        }
    }
    stats.home.center()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{Bounds, EntityId};
    use crate::api::world::testing::FlatTerrain;
    use crate::components::monster::{Monster, PlayerView};
    use crate::core::rng::Rng;
    use glam::Vec3;

    const DT: f32 = 1.0 / 60.0;

    fn lurker() -> Monster {
        let mut m = Monster::lurker(EntityId(5), Bounds::centered(Vec2::ZERO, 20.0));
        m.entity.pos = Vec3::new(0.0, m.entity.motion.height_offset, 0.0);
        m.entity.grounded = true;
        m
    }

    fn brain(m: &Monster) -> &LurkerBrain {
        match &m.brain {
            crate::components::monster::Brain::Lurker(b) => b,
            _ => panic!("not a lurker"),
        }
    }

    fn step(m: &mut Monster, player: Option<PlayerView>, siblings: &[Vec2], rng: &mut Rng) {
        let terrain = FlatTerrain;
        let mut events = Vec::new();
        let mut ctx = MonsterCtx {
            dt: DT,
            terrain: &terrain,
            player,
            pads: &[],
            siblings,
            rng,
            events: &mut events,
        };
        m.update(&mut ctx);
    }

    #[test]
    fn threshold_switches_both_ways_without_hysteresis() {
        let mut m = lurker();
        m.set_target(Target::Player);
        let mut rng = Rng::new(1);

        let near = PlayerView {
            pos: Vec3::new(5.0, 1.0, 0.0),
            radius: 0.6,
        };
        step(&mut m, Some(near), &[], &mut rng);
        assert_eq!(brain(&m).state(), LurkerState::Chasing);

        // One tick later and out of range again: flips straight back.
        m.set_target(Target::Player);
        let far = PlayerView {
            pos: Vec3::new(12.0, 1.0, 0.0),
            radius: 0.6,
        };
        step(&mut m, Some(far), &[], &mut rng);
        assert_eq!(brain(&m).state(), LurkerState::Patrolling);
    }

    #[test]
    fn chase_closes_on_the_player() {
        let mut m = lurker();
        let mut rng = Rng::new(2);
        let player = PlayerView {
            pos: Vec3::new(6.0, 1.0, 0.0),
            radius: 0.6,
        };
        for _ in 0..60 {
            m.set_target(Target::Player);
            step(&mut m, Some(player), &[], &mut rng);
        }
        assert!(m.entity.pos.x > 1.0, "lurker never closed: {}", m.entity.pos.x);
    }

    #[test]
    fn patrol_targets_snap_to_the_grid() {
        let mut m = lurker();
        m.entity.pos = Vec3::new(0.3, m.entity.motion.height_offset, -0.4);
        let mut rng = Rng::new(3);
        step(&mut m, None, &[], &mut rng);
        let t = brain(&m).patrol_target().unwrap();
        assert_eq!(t.x % GRID, 0.0, "x not grid aligned: {}", t.x);
        assert_eq!(t.y % GRID, 0.0, "z not grid aligned: {}", t.y);
        assert!((t - m.entity.planar()).length() <= GRID + 1.0);
    }

    #[test]
    fn patrol_respects_sibling_separation() {
        let mut m = lurker();
        let mut rng = Rng::new(4);
        // Siblings sit on three of the four neighbor cells. (0, -2) is the
        // only candidate at least SIBLING_SEPARATION from all of them.
        let siblings = [
            Vec2::new(2.5, 0.0),
            Vec2::new(-2.5, 0.0),
            Vec2::new(0.0, 2.5),
        ];
        step(&mut m, None, &siblings, &mut rng);
        let t = brain(&m).patrol_target().unwrap();
        assert_eq!(t, Vec2::new(0.0, -2.0));
    }

    #[test]
    fn surrounded_lurker_steps_away_from_nearest_sibling() {
        let mut m = lurker();
        let mut rng = Rng::new(9);
        // All four neighbors blocked by a sibling sitting right next door.
        let siblings = [
            Vec2::new(1.0, 0.0),
            Vec2::new(-1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(0.0, -1.0),
        ];
        step(&mut m, None, &siblings, &mut rng);
        let t = brain(&m).patrol_target().unwrap();
        // The fallback still lands inside the home region.
        assert!(m.stats.home.contains(t));
    }

    #[test]
    fn out_of_bounds_neighbors_are_rejected() {
        let mut m = lurker();
        // Corner of the home region: two neighbors would leave it.
        m.entity.pos = Vec3::new(20.0, m.entity.motion.height_offset, 20.0);
        let mut rng = Rng::new(6);
        for _ in 0..20 {
            step(&mut m, None, &[], &mut rng);
            let t = brain(&m).patrol_target().unwrap();
            assert!(m.stats.home.contains(t), "target {:?} out of bounds", t);
        }
    }
}
