pub mod combat;
pub mod inventory;
pub mod movement;
pub mod spawn;
pub mod status;
