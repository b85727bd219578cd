//! Device abstractions for Treasure Hunt
//!
//! This crate provides platform-agnostic abstractions for the devices the
//! experience reads from and writes to.
//!
//! # Modules
//!
//! - [`sensors`]: Sensor readings, the listener trait and the latest-value store
//! - [`motion`]: Dead-reckoning of viewer position from linear acceleration
//! - [`haptics`]: Haptic feedback trait and backends

pub mod haptics;
pub mod motion;
pub mod sensors;

// Re-export commonly used types at crate root
pub use haptics::{Haptics, LogHaptics, NullHaptics};
pub use motion::{MotionIntegrator, DEADBAND, NS_TO_S};
pub use sensors::{SensorKind, SensorListener, SensorReading, SensorState};
