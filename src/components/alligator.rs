//! Alligator state machine: swims at a fixed water level between random
//! interior points, lunges at the player when close, and is continuously
//! steered back toward the biome center near the edge.

use glam::Vec2;

use crate::api::types::{GameEvent, Target, EVENT_ALLIGATOR_ATTACK};
use crate::components::entity::Entity;
use crate::components::monster::{steer_planar, MonsterCtx, MonsterStats};
use crate::core::time::Cooldown;

const ATTACK_RANGE: f32 = 6.0;
const ATTACK_DURATION: f32 = 1.2;
const ATTACK_COOLDOWN: f32 = 2.5;
/// Inside this distance the attack closes at full lunge speed.
const LUNGE_DISTANCE: f32 = 2.5;
const LUNGE_SPEED: f32 = 7.0;
const APPROACH_SPEED: f32 = 3.5;
/// Attack-progress window in which the single bite test runs.
const BITE_WINDOW: (f32, f32) = (0.3, 0.55);
/// Planar offsets from the body origin to the two bite test points.
const SNOUT_LEN: f32 = 1.8;
const JAW_LEN: f32 = 1.1;
/// Swim targets must keep this distance from the biome edge.
const EDGE_MARGIN: f32 = 3.0;
/// Proximity at which a swim target counts as reached.
const TARGET_REACHED: f32 = 1.0;
const PICK_ATTEMPTS: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlligatorState {
    Swimming,
    Attacking,
}

#[derive(Debug, Clone)]
pub struct AlligatorBrain {
    state: AlligatorState,
    attack_timer: f32,
    attack_cooldown: Cooldown,
    bite_done: bool,
    swim_target: Option<Vec2>,
    water_level: f32,
}

impl AlligatorBrain {
    pub fn new(water_level: f32) -> Self {
        Self {
            state: AlligatorState::Swimming,
            attack_timer: 0.0,
            attack_cooldown: Cooldown::new(),
            bite_done: false,
            swim_target: None,
            water_level,
        }
    }

    pub fn state(&self) -> AlligatorState {
        self.state
    }

    pub fn swim_target(&self) -> Option<Vec2> {
        self.swim_target
    }

    /// Attack animation progress in [0, 1] while attacking.
    fn attack_progress(&self) -> f32 {
        1.0 - self.attack_timer / ATTACK_DURATION
    }

    pub fn update(
        &mut self,
        e: &mut Entity,
        target: &mut Target,
        stats: &MonsterStats,
        ctx: &mut MonsterCtx,
    ) {
        // Vertical motion is overridden: no gravity, the body rides the
        // water surface. Only the horizontal components integrate.
        e.pos.x += e.vel.x * ctx.dt;
        e.pos.z += e.vel.z * ctx.dt;
        e.pos.y = self.water_level;
        e.vel.y = 0.0;
        e.grounded = true;

        self.attack_cooldown.tick(ctx.dt);

        match self.state {
            AlligatorState::Swimming => {
                // A close player trumps wandering.
                if let (Target::Player, Some(p)) = (*target, ctx.player) {
                    if e.planar_distance(p.pos) <= ATTACK_RANGE && self.attack_cooldown.ready() {
                        self.state = AlligatorState::Attacking;
                        self.attack_timer = ATTACK_DURATION;
                        self.bite_done = false;
                        e.face_toward(p.pos);
                        ctx.events
                            .push(GameEvent::monster_action(EVENT_ALLIGATOR_ATTACK, e.id));
                        log::debug!("alligator {:?} attacks", e.id);
                    }
                }
                if self.state == AlligatorState::Swimming {
                    let needs_pick = match self.swim_target {
                        None => true,
                        Some(t) => t.distance(e.planar()) < TARGET_REACHED,
                    };
                    if needs_pick {
                        self.swim_target = Some(pick_swim_target(stats, ctx));
                    }
                    if let Some(dest) = self.swim_target {
                        steer_planar(e, dest, stats.move_speed);
                    }
                }
            }
            AlligatorState::Attacking => {
                self.attack_timer -= ctx.dt;

                if let Some(p) = ctx.player {
                    let dist = e.planar_distance(p.pos);
                    if dist > JAW_LEN {
                        let speed = if dist < LUNGE_DISTANCE {
                            LUNGE_SPEED
                        } else {
                            APPROACH_SPEED
                        };
                        steer_planar(e, Vec2::new(p.pos.x, p.pos.z), speed);
                    } else {
                        // In jaw reach: plant and chomp.
                        e.vel.x = 0.0;
                        e.vel.z = 0.0;
                        e.face_toward(p.pos);
                    }

                    // The bite stays armed for the whole window, checking the
                    // snout tip and the jaw against the target each frame, and
                    // latches on the first frame that connects.
                    let progress = self.attack_progress();
                    if !self.bite_done
                        && progress >= BITE_WINDOW.0
                        && progress <= BITE_WINDOW.1
                    {
                        let facing = e.facing();
                        let snout = e.planar() + facing * SNOUT_LEN;
                        let jaw = e.planar() + facing * JAW_LEN;
                        let pp = Vec2::new(p.pos.x, p.pos.z);
                        if snout.distance(pp) <= p.radius || jaw.distance(pp) <= p.radius {
                            self.bite_done = true;
                            ctx.events.push(GameEvent::character_hit(stats.damage, e.pos));
                        }
                    }
                }

                if self.attack_timer <= 0.0 {
                    self.state = AlligatorState::Swimming;
                    self.swim_target = None;
                    self.attack_cooldown.start(ATTACK_COOLDOWN);
                }
            }
        }

        // Edge enforcement runs last and unconditionally: anywhere within the
        // safety margin of the home boundary, head back toward center no
        // matter what the state machine decided.
        let safe = stats.home.interior(EDGE_MARGIN);
        if !safe.contains(e.planar()) {
            self.swim_target = Some(stats.home.center());
            steer_planar(e, stats.home.center(), stats.move_speed);
        }
    }
}

/// Random point in the usable interior: rejection-sampled away from the
/// edges with a bounded attempt count, falling back to the center.
fn pick_swim_target(stats: &MonsterStats, ctx: &mut MonsterCtx) -> Vec2 {
    let safe = stats.home.interior(EDGE_MARGIN);
    for _ in 0..PICK_ATTEMPTS {
        let candidate = Vec2::new(
            ctx.rng.range(stats.home.min.x, stats.home.max.x),
            ctx.rng.range(stats.home.min.y, stats.home.max.y),
        );
        if safe.contains(candidate) {
            return candidate;
        }
    }
    stats.home.center()
}
