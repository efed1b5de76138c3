pub mod components;
pub mod items;
pub mod systems;
pub mod world;
