//! Haptic feedback
//!
//! Platforms expose a single "vibrate for a duration" operation. Backends that
//! have no vibration motor use [`NullHaptics`] or [`LogHaptics`].

use std::time::Duration;

use tracing::info;

/// Trait for haptic feedback backends (phone vibrator, controller rumble)
pub trait Haptics {
    /// Vibrate for `duration`; returns immediately
    fn vibrate(&mut self, duration: Duration);
}

/// A no-op haptics backend
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHaptics;

impl NullHaptics {
    /// Create a new null backend
    pub fn new() -> Self {
        Self
    }
}

impl Haptics for NullHaptics {
    fn vibrate(&mut self, _duration: Duration) {
        // No-op
    }
}

/// Haptics backend that logs each pulse and keeps a tally
#[derive(Debug, Default, Clone)]
pub struct LogHaptics {
    pulses: Vec<Duration>,
}

impl LogHaptics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every pulse requested so far, oldest first
    pub fn pulses(&self) -> &[Duration] {
        &self.pulses
    }
}

impl Haptics for LogHaptics {
    fn vibrate(&mut self, duration: Duration) {
        info!("Haptic pulse: {} ms", duration.as_millis());
        self.pulses.push(duration);
    }
}

impl<H: Haptics + ?Sized> Haptics for Box<H> {
    fn vibrate(&mut self, duration: Duration) {
        (**self).vibrate(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_haptics() {
        let mut haptics = NullHaptics::new();
        haptics.vibrate(Duration::from_millis(50)); // Should not panic
    }

    #[test]
    fn test_log_haptics_records_pulses() {
        let mut haptics = LogHaptics::new();
        haptics.vibrate(Duration::from_millis(50));
        haptics.vibrate(Duration::from_millis(20));
        assert_eq!(
            haptics.pulses(),
            &[Duration::from_millis(50), Duration::from_millis(20)]
        );
    }

    #[test]
    fn test_boxed_haptics_forwards() {
        let mut boxed: Box<dyn Haptics> = Box::new(NullHaptics::new());
        boxed.vibrate(Duration::from_millis(10));
    }
}
