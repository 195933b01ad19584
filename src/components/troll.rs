//! Troll state machine: a stationary guard that winds up, lunges a short
//! step forward and swings its club through a fixed-length animation.
//!
//! The swing commits to the target's position captured at trigger time. The
//! hit test later in the animation measures the live player against that
//! stale point, so a player who keeps moving walks out from under the club.

use glam::{Vec2, Vec3};

use crate::api::types::{GameEvent, Target, EVENT_TROLL_SWING};
use crate::components::entity::Entity;
use crate::components::monster::{MonsterCtx, MonsterStats};
use crate::core::motion;
use crate::core::time::Cooldown;
use crate::extensions::easing::{ease, Easing};

/// Player distance at which the swing triggers.
const ATTACK_RANGE: f32 = 3.5;
const ATTACK_COOLDOWN: f32 = 4.0;
/// Animation phase advance per second.
const PHASE_RATE: f32 = 1.0;
/// Phase boundaries: windup, lunge, swing, recovery.
const WINDUP_END: f32 = 0.3;
const LUNGE_END: f32 = 0.6;
const SWING_END: f32 = 1.2;
const RECOVERY_END: f32 = 1.5;
/// Phase window during the swing where the club connects.
const HIT_WINDOW: (f32, f32) = (0.8, 0.95);
/// Forward speed of the step taken during the lunge segment.
const LUNGE_SPEED: f32 = 4.0;
/// Club impact radius around the captured target point.
const HIT_RADIUS: f32 = 1.6;

/// Club raised behind the shoulder at the top of the windup.
const ARM_RAISED: f32 = -1.2;
/// Follow-through pitch at the end of the swing.
const ARM_FOLLOW: f32 = 0.9;
/// Lateral club sweep over the swing segment.
const CLUB_SWEPT: f32 = 2.0;

/// Joint angles driven by the attack animation, radians. Consumed by the
/// presentation layer; the simulation only reads them in tests.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrollPose {
    pub arm_pitch: f32,
    pub club_angle: f32,
}

#[derive(Debug, Clone)]
pub struct TrollBrain {
    attacking: bool,
    phase: f32,
    attack_cooldown: Cooldown,
    /// Target position captured when the swing started. Not refreshed while
    /// the animation runs.
    target_point: Option<Vec3>,
    hit_done: bool,
    pose: TrollPose,
}

impl TrollBrain {
    pub fn new() -> Self {
        Self {
            attacking: false,
            phase: 0.0,
            attack_cooldown: Cooldown::default(),
            target_point: None,
            hit_done: false,
            pose: TrollPose::default(),
        }
    }

    pub fn is_attacking(&self) -> bool {
        self.attacking
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn pose(&self) -> TrollPose {
        self.pose
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
        self.attack_cooldown.tick(ctx.dt);

        if self.attacking {
            self.advance_attack(e, stats, ctx);
            return;
        }

        // Idle guard: hold position, track the player with the heading.
        e.vel.x = 0.0;
        e.vel.z = 0.0;
        let (Target::Player, Some(p)) = (*target, ctx.player) else {
            return;
        };
        e.face_toward(p.pos);

        let dist = e.planar_distance(p.pos);
        if dist <= ATTACK_RANGE && self.attack_cooldown.ready() && e.grounded {
            self.attacking = true;
            self.phase = 0.0;
            self.hit_done = false;
            self.target_point = Some(p.pos);
            ctx.events
                .push(GameEvent::monster_action(EVENT_TROLL_SWING, e.id));
            log::debug!("troll {:?} starts swing", e.id);
        }
    }

    fn advance_attack(&mut self, e: &mut Entity, stats: &MonsterStats, ctx: &mut MonsterCtx) {
        e.vel.x = 0.0;
        e.vel.z = 0.0;
        self.phase += ctx.dt * PHASE_RATE;
        let phase = self.phase;

        if phase < WINDUP_END {
            let t = phase / WINDUP_END;
            self.pose.arm_pitch = ease(0.0, ARM_RAISED, t, Easing::QuadOut);
            self.pose.club_angle = 0.0;
        } else if phase < LUNGE_END {
            // One short step toward where the target stood.
            let f = e.facing();
            e.pos.x += f.x * LUNGE_SPEED * ctx.dt;
            e.pos.z += f.y * LUNGE_SPEED * ctx.dt;
            self.pose.arm_pitch = ARM_RAISED;
        } else if phase < SWING_END {
            let t = (phase - LUNGE_END) / (SWING_END - LUNGE_END);
            self.pose.arm_pitch = ease(ARM_RAISED, ARM_FOLLOW, t, Easing::CubicIn);
            self.pose.club_angle = ease(0.0, CLUB_SWEPT, t, Easing::QuadIn);

            if phase >= HIT_WINDOW.0 && phase <= HIT_WINDOW.1 && !self.hit_done {
                self.hit_done = true;
                self.try_hit(e, stats, ctx);
            }
        } else if phase < RECOVERY_END {
            let t = (phase - SWING_END) / (RECOVERY_END - SWING_END);
            self.pose.arm_pitch = ease(ARM_FOLLOW, 0.0, t, Easing::SineInOut);
            self.pose.club_angle = ease(CLUB_SWEPT, 0.0, t, Easing::SineInOut);
        } else {
            self.attacking = false;
            self.phase = 0.0;
            self.target_point = None;
            self.pose = TrollPose::default();
            self.attack_cooldown.start(ATTACK_COOLDOWN);
        }
    }

    /// The club lands on the captured point. The live player only takes the
    /// hit while still standing within the impact radius of that point.
    fn try_hit(&self, e: &Entity, stats: &MonsterStats, ctx: &mut MonsterCtx) {
        let (Some(tp), Some(p)) = (self.target_point, ctx.player) else {
            return;
        };
        let impact = Vec2::new(tp.x, tp.z);
        let player = Vec2::new(p.pos.x, p.pos.z);
        if impact.distance(player) <= HIT_RADIUS + p.radius {
            ctx.events
                .push(GameEvent::character_hit(stats.damage, e.pos));
        }
    }
}

impl Default for TrollBrain {
    fn default() -> Self {
        Self::new()
    }
}
