//! Runtime and hardware configuration
//!
//! This module contains the configuration surface of the node:
//! - Application parameters (transmission period, jitter, ports, MAC tuning)
//! - Radio hardware wiring handed opaquely to the MAC layer

/// Application runtime parameters
pub mod app;

/// Radio chip and pin wiring
pub mod hardware;

pub use app::AppConfig;
pub use hardware::HardwareConfig;
