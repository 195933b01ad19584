pub mod collision;
pub mod motion;
pub mod rng;
pub mod time;
