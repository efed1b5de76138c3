pub mod queue;
pub mod server;
