pub mod alligator;
pub mod character;
pub mod entity;
pub mod frog;
pub mod lurker;
pub mod monster;
pub mod troll;
