pub mod config;
pub mod error;
pub mod renters;
pub mod telemetry;
