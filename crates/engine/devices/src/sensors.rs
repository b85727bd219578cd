//! Sensor abstractions
//!
//! Platforms deliver raw readings asynchronously through [`SensorListener`].
//! [`SensorState`] keeps the latest value of each kind for readouts.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Kind of motion/orientation sensor a reading came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorKind {
    /// Acceleration with gravity removed (m/s^2)
    LinearAcceleration,
    /// Raw acceleration including gravity (m/s^2)
    Accelerometer,
    /// Azimuth, pitch and roll in degrees
    Orientation,
    /// Ambient magnetic field in microtesla
    MagneticField,
}

/// One sample from a sensor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    pub kind: SensorKind,
    /// Per-axis values in device coordinates
    pub values: Vec3,
    /// Monotonic timestamp in nanoseconds
    pub timestamp_ns: i64,
}

impl SensorReading {
    pub fn new(kind: SensorKind, values: Vec3, timestamp_ns: i64) -> Self {
        Self {
            kind,
            values,
            timestamp_ns,
        }
    }
}

/// Receiver for sensor readings
///
/// Implementations are called from whatever thread the platform delivers
/// readings on; the listener serializes access itself if it needs to.
pub trait SensorListener {
    fn on_reading(&mut self, reading: &SensorReading);

    /// Sensor accuracy changed; most listeners ignore this
    fn on_accuracy_changed(&mut self, _kind: SensorKind, _accuracy: i32) {}
}

/// Latest measurement of each sensor kind
#[derive(Debug, Clone, Default)]
pub struct SensorState {
    /// Linear acceleration (gravity removed)
    pub linear_acceleration: Option<Vec3>,
    /// Raw accelerometer, dominated by gravity at rest
    pub gravity: Option<Vec3>,
    pub orientation: Option<Vec3>,
    pub magnetic_field: Option<Vec3>,
}

impl SensorState {
    /// Create a new sensor state with no readings
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a reading in the slot for its kind
    pub fn record(&mut self, reading: &SensorReading) {
        let slot = match reading.kind {
            SensorKind::LinearAcceleration => &mut self.linear_acceleration,
            SensorKind::Accelerometer => &mut self.gravity,
            SensorKind::Orientation => &mut self.orientation,
            SensorKind::MagneticField => &mut self.magnetic_field,
        };
        *slot = Some(reading.values);
    }

    pub fn latest(&self, kind: SensorKind) -> Option<Vec3> {
        match kind {
            SensorKind::LinearAcceleration => self.linear_acceleration,
            SensorKind::Accelerometer => self.gravity,
            SensorKind::Orientation => self.orientation,
            SensorKind::MagneticField => self.magnetic_field,
        }
    }

    /// Check if any sensor has reported
    pub fn any_available(&self) -> bool {
        self.linear_acceleration.is_some()
            || self.gravity.is_some()
            || self.orientation.is_some()
            || self.magnetic_field.is_some()
    }
}

impl SensorListener for SensorState {
    fn on_reading(&mut self, reading: &SensorReading) {
        self.record(reading);
    }
}
