// extensions/mod.rs
//
// Optional helpers decoupled from the simulation core. Systems opt in by
// importing what they need.

pub mod easing;

pub use easing::{ease, ease_vec2, lerp, lerp_vec2, Easing};
