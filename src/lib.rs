pub mod ai;
pub mod commands;
pub mod config;
pub mod ecs;
pub mod game;
pub mod network;
pub mod protocol;
pub mod runtime;
