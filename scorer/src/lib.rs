pub mod api;
pub mod config;
pub mod refresh;
pub mod score;
pub mod state;
pub mod telemetry;
