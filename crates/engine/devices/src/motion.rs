//! Viewer position from linear acceleration
//!
//! A plain double integrator (acceleration to velocity to position) on the
//! device Z axis only. Samples whose Z magnitude is inside the deadband are
//! treated as noise and leave the state untouched apart from the timestamp.
//! There is no drift correction.

use glam::Vec3;
use tracing::trace;

use crate::sensors::{SensorKind, SensorListener, SensorReading};

/// Nanoseconds to seconds
pub const NS_TO_S: f32 = 1.0 / 1_000_000_000.0;

/// Readings at or below this magnitude are ignored
pub const DEADBAND: f32 = 0.5;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Integration {
    last_timestamp_ns: i64,
    acceleration: Vec3,
    velocity: Vec3,
    position: Vec3,
}

/// Dead-reckoned viewer position
#[derive(Debug, Clone)]
pub struct MotionIntegrator {
    deadband: f32,
    state: Option<Integration>,
}

impl MotionIntegrator {
    pub fn new(deadband: f32) -> Self {
        Self {
            deadband,
            state: None,
        }
    }

    pub fn deadband(&self) -> f32 {
        self.deadband
    }

    /// Integrated position, absent until the first linear-acceleration sample
    pub fn position(&self) -> Option<Vec3> {
        self.state.map(|s| s.position)
    }

    pub fn velocity(&self) -> Option<Vec3> {
        self.state.map(|s| s.velocity)
    }

    /// Forget all integrated state
    pub fn reset(&mut self) {
        self.state = None;
    }

    /// Feed one sample; readings of other kinds are ignored
    pub fn integrate(&mut self, reading: &SensorReading) {
        if reading.kind != SensorKind::LinearAcceleration {
            return;
        }

        let Some(state) = self.state.as_mut() else {
            // First sample only establishes the time base.
            self.state = Some(Integration {
                last_timestamp_ns: reading.timestamp_ns,
                ..Integration::default()
            });
            return;
        };

        let elapsed_ns = (reading.timestamp_ns - state.last_timestamp_ns).max(0);
        let dt = elapsed_ns as f32 * NS_TO_S;
        let z = reading.values.z;

        if z.abs() > self.deadband {
            state.acceleration.z += z;
            state.velocity.z += state.acceleration.z * dt;
            state.position.z +=
                state.velocity.z * dt + state.acceleration.z / 2.0 * dt * dt;
            trace!(
                "Integrated z: acc={:.3} vel={:.3} pos={:.3}",
                state.acceleration.z,
                state.velocity.z,
                state.position.z
            );
        }

        state.last_timestamp_ns = reading.timestamp_ns;
    }
}

impl Default for MotionIntegrator {
    fn default() -> Self {
        Self::new(DEADBAND)
    }
}

impl SensorListener for MotionIntegrator {
    fn on_reading(&mut self, reading: &SensorReading) {
        self.integrate(reading);
    }
}
