pub mod biome;
pub mod controller;
pub mod enemies;
pub mod grid;
pub mod location;
pub mod terrain;
