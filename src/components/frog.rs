//! Frog state machine: an ambient rest/walk/hop cycle, a tongue attack that
//! overrides whatever the frog was doing, and a lily-pad rest mode that
//! suspends everything except tracking the pad's bob.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::api::types::{GameEvent, Target, EVENT_FROG_HOP, EVENT_FROG_TONGUE};
use crate::components::entity::Entity;
use crate::components::monster::{steer_planar, MonsterCtx, MonsterStats};
use crate::core::collision::CollisionManager;
use crate::core::motion;
use crate::core::time::Cooldown;
use crate::extensions::easing::{lerp_vec2, Easing};

const REST_MIN: f32 = 2.0;
const REST_MAX: f32 = 4.0;
const WALK_MIN: f32 = 1.5;
const WALK_MAX: f32 = 3.0;
/// Exit weights out of Resting: 70% walk, 30% hop.
const WALK_CHANCE: f32 = 0.7;

const HOP_DURATION: f32 = 0.8;
const HOP_HEIGHT: f32 = 1.4;
const HOP_RANGE_MIN: f32 = 1.5;
const HOP_RANGE_MAX: f32 = 3.5;
/// Candidates closer than this to the current position are re-picked.
const HOP_MIN_TRAVEL: f32 = 0.75;
const HOP_PICK_ATTEMPTS: u32 = 8;
/// Phase-warp strength: slows arc progress near the apex for extra hang time.
const HOP_HANG: f32 = 0.12;

const ATTACK_RANGE: f32 = 4.0;
const ATTACK_COOLDOWN: f32 = 3.0;
const TONGUE_MAX_LEN: f32 = 4.5;
const TONGUE_SPEED: f32 = 14.0;

const PAD_REST_MIN: f32 = 4.0;
const PAD_REST_MAX: f32 = 7.0;

/// Ambient behavioral state. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrogState {
    Resting,
    Walking,
    Hopping,
    Attacking,
}

/// One parameterized hop: horizontal travel eased between two planar points,
/// vertical arc from a phase-warped sine.
#[derive(Debug, Clone, Copy)]
struct Hop {
    start: Vec2,
    target: Vec2,
    progress: f32,
}

/// Tongue extend/retract sub-machine for the attack state.
#[derive(Debug, Clone, Copy)]
struct Tongue {
    length: f32,
    extending: bool,
    hit_done: bool,
}

#[derive(Debug, Clone)]
pub struct FrogBrain {
    state: FrogState,
    state_timer: f32,
    attack_cooldown: Cooldown,
    hop: Option<Hop>,
    tongue: Tongue,
    walk_dest: Vec2,
    on_pad: bool,
    pad_rest_timer: f32,
}

impl FrogBrain {
    pub fn new() -> Self {
        Self {
            state: FrogState::Resting,
            state_timer: REST_MIN,
            attack_cooldown: Cooldown::new(),
            hop: None,
            tongue: Tongue {
                length: 0.0,
                extending: false,
                hit_done: false,
            },
            walk_dest: Vec2::ZERO,
            on_pad: false,
            pad_rest_timer: 0.0,
        }
    }

    pub fn state(&self) -> FrogState {
        self.state
    }

    pub fn is_on_pad(&self) -> bool {
        self.on_pad
    }

    /// Current tongue length, for the renderer.
    pub fn tongue_length(&self) -> f32 {
        self.tongue.length
    }

    pub fn update(
        &mut self,
        e: &mut Entity,
        target: &mut Target,
        stats: &MonsterStats,
        ctx: &mut MonsterCtx,
    ) {
        // Cooldowns run every frame no matter what the frog is doing.
        self.attack_cooldown.tick(ctx.dt);

        // Pad rest overrides everything: track the bob, run the rest timer,
        // and on expiry launch straight into a hop off the pad.
        if self.on_pad {
            let cm = CollisionManager::new();
            let tracking = ctx
                .pads
                .iter()
                .any(|pad| cm.snap_to_lily_pad(e, pad));
            if !tracking {
                self.on_pad = false;
            } else {
                self.pad_rest_timer -= ctx.dt;
                if self.pad_rest_timer <= 0.0 {
                    self.on_pad = false;
                    self.start_hop(e, stats, ctx);
                }
                return;
            }
        }

        // Base integration, except while a hop owns the position outright.
        if self.state != FrogState::Hopping {
            let ground = ctx.terrain.ground_height(e.pos.x, e.pos.z);
            motion::integrate(e, ctx.dt, ground);

            // Landing on (or resting near) a pad attaches the frog.
            let cm = CollisionManager::new();
            for pad in ctx.pads {
                if cm.snap_to_lily_pad(e, pad) {
                    self.on_pad = true;
                    self.pad_rest_timer = ctx.rng.range(PAD_REST_MIN, PAD_REST_MAX);
                    self.state = FrogState::Resting;
                    self.hop = None;
                    log::trace!("frog {:?} attached to pad", e.id);
                    return;
                }
            }
        }

        // Attack override: independent of the ambient state, a tracked player
        // in both aggro and attack range forces the tongue attack whenever
        // the cooldown is ready.
        if self.state != FrogState::Attacking {
            if let (Target::Player, Some(p)) = (*target, ctx.player) {
                let dist = e.planar_distance(p.pos);
                if dist <= stats.aggro_range
                    && dist <= ATTACK_RANGE
                    && self.attack_cooldown.ready()
                    && e.grounded
                {
                    self.state = FrogState::Attacking;
                    self.tongue = Tongue {
                        length: 0.0,
                        extending: true,
                        hit_done: false,
                    };
                    self.hop = None;
                    e.face_toward(p.pos);
                    ctx.events.push(GameEvent::monster_action(EVENT_FROG_TONGUE, e.id));
                    log::debug!("frog {:?} tongue attack", e.id);
                }
            }
        }

        match self.state {
            FrogState::Resting => {
                self.state_timer -= ctx.dt;
                if self.state_timer <= 0.0 {
                    if ctx.rng.chance(WALK_CHANCE) {
                        self.state = FrogState::Walking;
                        self.state_timer = ctx.rng.range(WALK_MIN, WALK_MAX);
                        let dir = ctx.rng.angle();
                        let dist = ctx.rng.range(HOP_RANGE_MIN, HOP_RANGE_MAX);
                        self.walk_dest = stats
                            .home
                            .clamp(e.planar() + Vec2::new(dir.cos(), dir.sin()) * dist);
                    } else {
                        self.start_hop(e, stats, ctx);
                    }
                }
            }
            FrogState::Walking => {
                if e.grounded {
                    steer_planar(e, self.walk_dest, stats.move_speed);
                }
                self.state_timer -= ctx.dt;
                if self.state_timer <= 0.0 {
                    self.state = FrogState::Resting;
                    self.state_timer = ctx.rng.range(REST_MIN, REST_MAX);
                }
            }
            FrogState::Hopping => {
                let Some(hop) = self.hop.as_mut() else {
                    // Hop data missing: nothing to animate, settle back down.
                    self.state = FrogState::Resting;
                    self.state_timer = REST_MIN;
                    return;
                };
                hop.progress = (hop.progress + ctx.dt / HOP_DURATION).min(1.0);
                let p = hop.progress;

                let planar = lerp_vec2(hop.start, hop.target, Easing::QuadInOut.apply(p));
                e.pos.x = planar.x;
                e.pos.z = planar.y;

                let ground = ctx.terrain.ground_height(e.pos.x, e.pos.z);
                e.pos.y = ground + e.motion.height_offset + HOP_HEIGHT * (PI * hop_phase(p)).sin();
                e.grounded = false;
                e.face_toward(Vec3::new(hop.target.x, e.pos.y, hop.target.y));

                if p >= 1.0 {
                    e.pos.y = ground + e.motion.height_offset;
                    e.grounded = true;
                    e.vel = Vec3::ZERO;
                    self.hop = None;
                    self.state = FrogState::Resting;
                    self.state_timer = ctx.rng.range(REST_MIN, REST_MAX);
                }
            }
            FrogState::Attacking => {
                // The frog plants itself for the whole attack.
                e.vel.x = 0.0;
                e.vel.z = 0.0;

                if self.tongue.extending {
                    self.tongue.length =
                        (self.tongue.length + TONGUE_SPEED * ctx.dt).min(TONGUE_MAX_LEN);

                    // Single hit test, only while extending.
                    if !self.tongue.hit_done {
                        if let Some(p) = ctx.player {
                            e.face_toward(p.pos);
                            let dist = e.planar_distance(p.pos);
                            if self.tongue.length + p.radius >= dist {
                                self.tongue.hit_done = true;
                                ctx.events.push(GameEvent::character_hit(stats.damage, e.pos));
                            }
                        }
                    }
                    if self.tongue.length >= TONGUE_MAX_LEN {
                        self.tongue.extending = false;
                    }
                } else {
                    self.tongue.length -= TONGUE_SPEED * ctx.dt;
                    if self.tongue.length <= 0.0 {
                        self.tongue.length = 0.0;
                        self.attack_cooldown.start(ATTACK_COOLDOWN);
                        self.state = FrogState::Resting;
                        self.state_timer = ctx.rng.range(REST_MIN, REST_MAX);
                    }
                }
            }
        }
    }

    /// Pick a hop destination (bounded retries away from the current spot,
    /// clamped to the home region) and enter the Hopping state.
    fn start_hop(&mut self, e: &mut Entity, stats: &MonsterStats, ctx: &mut MonsterCtx) {
        let from = e.planar();
        let mut candidate = from;
        for _ in 0..HOP_PICK_ATTEMPTS {
            let dir = ctx.rng.angle();
            let dist = ctx.rng.range(HOP_RANGE_MIN, HOP_RANGE_MAX);
            candidate = stats
                .home
                .clamp(from + Vec2::new(dir.cos(), dir.sin()) * dist);
            if candidate.distance(from) >= HOP_MIN_TRAVEL {
                break;
            }
        }
        self.hop = Some(Hop {
            start: from,
            target: candidate,
            progress: 0.0,
        });
        self.state = FrogState::Hopping;
        e.grounded = false;
        e.vel = Vec3::ZERO;
        ctx.events.push(GameEvent::monster_action(EVENT_FROG_HOP, e.id));
    }
}

impl Default for FrogBrain {
    fn default() -> Self {
        Self::new()
    }
}

/// Warp hop progress so the arc lingers near its apex: monotonic in [0, 1],
/// fastest at takeoff and landing, slowest mid-flight.
fn hop_phase(p: f32) -> f32 {
    p + HOP_HANG * (TAU * p).sin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{Bounds, EntityId, EVENT_CHARACTER_HIT};
    use crate::api::world::testing::FlatTerrain;
    use crate::api::types::LilyPad;
    use crate::components::monster::{Monster, PlayerView};
    use crate::core::rng::Rng;

    const DT: f32 = 1.0 / 60.0;

    fn frog() -> Monster {
        let mut m = Monster::frog(EntityId(3), Bounds::centered(Vec2::ZERO, 20.0));
        m.entity.pos = Vec3::new(0.0, m.entity.motion.height_offset, 0.0);
        m.entity.grounded = true;
        m
    }

    fn brain(m: &Monster) -> &FrogBrain {
        match &m.brain {
            crate::components::monster::Brain::Frog(b) => b,
            _ => panic!("not a frog"),
        }
    }

    fn run(
        m: &mut Monster,
        ticks: u32,
        player: Option<PlayerView>,
        pads: &[LilyPad],
        rng: &mut Rng,
    ) -> Vec<GameEvent> {
        let terrain = FlatTerrain;
        let mut events = Vec::new();
        for _ in 0..ticks {
            let mut ctx = MonsterCtx {
                dt: DT,
                terrain: &terrain,
                player,
                pads,
                siblings: &[],
                rng,
                events: &mut events,
            };
            m.update(&mut ctx);
        }
        events
    }

    #[test]
    fn hop_phase_is_monotonic_and_clamped() {
        let mut prev = hop_phase(0.0);
        assert_eq!(prev, 0.0);
        for i in 1..=100 {
            let p = hop_phase(i as f32 / 100.0);
            assert!(p > prev, "phase warp must stay monotonic");
            prev = p;
        }
        assert!((prev - 1.0).abs() < 1e-5);
    }

    #[test]
    fn every_state_returns_to_resting() {
        // Totality: with no player around, the frog always comes back to
        // Resting within bounded time from any state it wanders into.
        let mut m = frog();
        let mut rng = Rng::new(77);
        let mut seen_hopping = false;
        let mut seen_walking = false;
        for _ in 0..(60 * 60) {
            run(&mut m, 1, None, &[], &mut rng);
            match brain(&m).state() {
                FrogState::Hopping => seen_hopping = true,
                FrogState::Walking => seen_walking = true,
                _ => {}
            }
        }
        assert!(seen_hopping || seen_walking, "frog never left Resting");

        // Wherever it ended up, a hop's worth of ticks plus the longest rest
        // must land it back in Resting at least once.
        let mut back = false;
        for _ in 0..(60 * 8) {
            run(&mut m, 1, None, &[], &mut rng);
            if brain(&m).state() == FrogState::Resting {
                back = true;
                break;
            }
        }
        assert!(back, "frog stuck in {:?}", brain(&m).state());
    }

    #[test]
    fn hop_completes_back_to_resting() {
        let mut m = frog();
        // Force a hop via the brain directly.
        let terrain = FlatTerrain;
        let mut rng = Rng::new(9);
        let mut events = Vec::new();
        {
            let mut ctx = MonsterCtx {
                dt: DT,
                terrain: &terrain,
                player: None,
                pads: &[],
                siblings: &[],
                rng: &mut rng,
                events: &mut events,
            };
            let stats = m.stats;
            if let crate::components::monster::Brain::Frog(b) = &mut m.brain {
                b.start_hop(&mut m.entity, &stats, &mut ctx);
            }
        }
        assert_eq!(brain(&m).state(), FrogState::Hopping);

        // HOP_DURATION is 0.8 s; 120 ticks (2 s) is a comfortable bound.
        let mut landed_at = None;
        for tick in 0..120 {
            run(&mut m, 1, None, &[], &mut rng);
            if brain(&m).state() == FrogState::Resting {
                landed_at = Some(tick);
                break;
            }
        }
        assert!(landed_at.is_some(), "hop never completed");
        assert!(m.entity.grounded);
    }

    #[test]
    fn hop_travels_at_least_minimum_distance() {
        let mut m = frog();
        let start = m.entity.planar();
        let terrain = FlatTerrain;
        let mut rng = Rng::new(4);
        let mut events = Vec::new();
        let mut ctx = MonsterCtx {
            dt: DT,
            terrain: &terrain,
            player: None,
            pads: &[],
            siblings: &[],
            rng: &mut rng,
            events: &mut events,
        };
        let stats = m.stats;
        if let crate::components::monster::Brain::Frog(b) = &mut m.brain {
            b.start_hop(&mut m.entity, &stats, &mut ctx);
            let hop = b.hop.unwrap();
            assert!(hop.target.distance(start) >= HOP_MIN_TRAVEL);
            assert!(stats.home.contains(hop.target));
        }
    }

    #[test]
    fn tongue_attack_hits_once_and_respects_cooldown() {
        let mut m = frog();
        m.set_target(Target::Player);
        let player = PlayerView {
            pos: Vec3::new(2.0, 1.0, 0.0),
            radius: 0.6,
        };

        let mut rng = Rng::new(21);
        // Run through one full attack (extend + retract is well under 2 s).
        let events = run(&mut m, 120, Some(player), &[], &mut rng);
        let hits: Vec<_> = events
            .iter()
            .filter(|ev| ev.kind == EVENT_CHARACTER_HIT)
            .collect();
        assert_eq!(hits.len(), 1, "tongue must hit exactly once per attack");
        assert_eq!(hits[0].a, m.stats.damage);

        // Attack finished and the cooldown blocks an immediate re-trigger.
        assert_ne!(brain(&m).state(), FrogState::Attacking);
        let events = run(&mut m, 30, Some(player), &[], &mut rng);
        assert!(
            events.iter().all(|ev| ev.kind != EVENT_FROG_TONGUE),
            "re-attacked while cooldown active"
        );
    }

    #[test]
    fn out_of_range_player_does_not_trigger_attack() {
        let mut m = frog();
        m.set_target(Target::Player);
        let player = PlayerView {
            pos: Vec3::new(8.0, 1.0, 0.0),
            radius: 0.6,
        };
        let mut rng = Rng::new(5);
        let events = run(&mut m, 60, Some(player), &[], &mut rng);
        assert!(events.iter().all(|ev| ev.kind != EVENT_FROG_TONGUE));
    }

    #[test]
    fn pad_attachment_tracks_bobbing_height() {
        let mut m = frog();
        m.entity.pos = Vec3::new(0.2, 0.9, 0.0);
        m.entity.grounded = false;
        m.entity.vel.y = -0.2;

        let terrain = FlatTerrain;
        let mut rng = Rng::new(11);
        let mut events = Vec::new();

        // Pad rest height 0.3; bob sweeps -0.1..0.1 over a second.
        for tick in 0..60 {
            let t = tick as f32 / 60.0;
            let offset = 0.1 * (TAU * t).sin();
            let pads = [LilyPad {
                position: Vec3::new(0.0, 0.3, 0.0),
                radius: 1.2,
                float_offset: offset,
            }];
            let mut ctx = MonsterCtx {
                dt: DT,
                terrain: &terrain,
                player: None,
                pads: &pads,
                siblings: &[],
                rng: &mut rng,
                events: &mut events,
            };
            m.update(&mut ctx);
            if tick > 0 {
                assert!(brain(&m).is_on_pad());
                let expected = 0.3 + offset + 0.5;
                assert!(
                    (m.entity.pos.y - expected).abs() < 1e-4,
                    "tick {}: frog y {} != pad surface {}",
                    tick,
                    m.entity.pos.y,
                    expected
                );
            }
        }
    }

    #[test]
    fn pad_rest_expires_into_a_hop() {
        let mut m = frog();
        m.entity.pos = Vec3::new(0.0, 0.9, 0.0);
        m.entity.grounded = false;
        let pads = [LilyPad {
            position: Vec3::new(0.0, 0.3, 0.0),
            radius: 1.2,
            float_offset: 0.0,
        }];

        let mut rng = Rng::new(13);
        run(&mut m, 2, None, &pads, &mut rng);
        assert!(brain(&m).is_on_pad());

        // PAD_REST_MAX is 7 s; after 8 s the frog must have hopped off.
        let mut left_pad = false;
        for _ in 0..(60 * 8) {
            run(&mut m, 1, None, &pads, &mut rng);
            if !brain(&m).is_on_pad() {
                left_pad = true;
                break;
            }
        }
        assert!(left_pad, "frog never left the pad");
        assert_eq!(brain(&m).state(), FrogState::Hopping);
    }
}
