pub mod config;
pub mod game;
pub mod problem;
pub mod server;
pub mod session;
pub mod telemetry;
