//! System orchestration, configuration, startup, and shutdown logic.

mod booking_system;
mod config;
mod telemetry;

pub use booking_system::*;
pub use config::*;
pub use telemetry::*;
