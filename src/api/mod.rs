pub mod types;
pub mod world;
