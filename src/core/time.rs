//! Tick timing primitives: the fixed-step accumulator fed by the host, and
//! the clamp-at-zero cooldown timer the monster state machines run on.

/// Fixed timestep accumulator.
/// The simulation always advances in fixed ticks; hosts with variable frame
/// times feed their deltas here and run the returned number of ticks.
pub struct FixedTimestep {
    /// The fixed delta time per tick.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt;
        // Cap to prevent spiral of death (max 10 steps per frame)
        self.accumulator = self.accumulator.min(self.dt * 10.0);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// Interpolation alpha for rendering between ticks (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }
}

/// A countdown gating re-use of an action (attacks, re-aggro).
/// Ticked every frame regardless of the owner's state, clamped at zero,
/// and only `ready` while it reads exactly zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cooldown {
    remaining: f32,
}

impl Cooldown {
    pub fn new() -> Self {
        Self { remaining: 0.0 }
    }

    /// Start (or restart) the countdown at `duration` seconds.
    pub fn start(&mut self, duration: f32) {
        self.remaining = duration.max(0.0);
    }

    /// Advance the countdown by one tick. Never goes negative.
    pub fn tick(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt).max(0.0);
    }

    /// Whether the gated action may fire.
    pub fn ready(&self) -> bool {
        self.remaining == 0.0
    }

    /// Seconds left on the countdown.
    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn one_step_exact() {
        let mut ts = FixedTimestep::new(DT);
        let steps = ts.accumulate(DT);
        assert_eq!(steps, 1);
    }

    #[test]
    fn accumulates_partial() {
        let mut ts = FixedTimestep::new(DT);
        let steps = ts.accumulate(0.008); // half a frame
        assert_eq!(steps, 0);
        let steps = ts.accumulate(0.010); // over one frame total
        assert_eq!(steps, 1);
    }

    #[test]
    fn caps_at_ten_steps() {
        let mut ts = FixedTimestep::new(DT);
        let steps = ts.accumulate(1.0); // 60 frames worth, but capped at 10
        assert_eq!(steps, 10);
    }

    #[test]
    fn alpha_is_between_zero_and_one() {
        let mut ts = FixedTimestep::new(DT);
        ts.accumulate(0.008);
        let a = ts.alpha();
        assert!(a >= 0.0 && a <= 1.0, "alpha was {}", a);
    }

    #[test]
    fn cooldown_starts_ready() {
        assert!(Cooldown::new().ready());
    }

    #[test]
    fn cooldown_never_negative() {
        let mut cd = Cooldown::new();
        cd.start(0.05);
        for _ in 0..100 {
            cd.tick(DT);
            assert!(cd.remaining() >= 0.0);
        }
        assert!(cd.ready());
    }

    #[test]
    fn cooldown_not_ready_midway() {
        let mut cd = Cooldown::new();
        cd.start(3.0);
        for _ in 0..100 {
            cd.tick(DT);
        }
        // 100 ticks ≈ 1.67 s elapsed of a 3 s countdown
        assert!(!cd.ready());
    }

    #[test]
    fn cooldown_ready_after_full_duration() {
        let mut cd = Cooldown::new();
        cd.start(3.0);
        for _ in 0..181 {
            cd.tick(DT);
        }
        assert_eq!(cd.remaining(), 0.0);
        assert!(cd.ready());
    }
}
