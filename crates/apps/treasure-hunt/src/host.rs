//! Headless rendering host
//!
//! Drives a renderer through the same hook order a headset runtime uses,
//! without a window or graphics context. The head sweeps left and right
//! around the starting direction, the stereo pair follows it, a synthetic
//! linear-acceleration stream feeds the sensors and the trigger fires at a
//! fixed frame interval. Draw calls land in a [`CountingSink`].

use glam::{Quat, Vec3};
use tracing::{debug, info, trace};
use treasure_core::eye::DEFAULT_IPD;
use treasure_core::{
    DrawCall, DrawSink, Eye, FieldOfView, FrameRenderer, HeadPose, Palette, Result,
    TriggerListener,
};
use treasure_devices::{SensorKind, SensorListener, SensorReading};

/// Frame period of a 60 Hz display in nanoseconds
const FRAME_NS: i64 = 16_666_667;

/// Settings for a headless run
#[derive(Debug, Clone)]
pub struct HostConfig {
    pub frames: u64,
    /// Fire the trigger every this many frames; 0 disables it
    pub trigger_every: u64,
    pub width: u32,
    pub height: u32,
    pub ipd: f32,
    pub fov: FieldOfView,
    /// Peak head yaw of the sweep in degrees
    pub sweep_degrees: f32,
    /// Frames for one full left-right-left sweep
    pub sweep_period: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            trigger_every: 90,
            width: 1920,
            height: 1080,
            ipd: DEFAULT_IPD,
            fov: FieldOfView::default(),
            sweep_degrees: 30.0,
            sweep_period: 240,
        }
    }
}

/// Draw backend that counts calls instead of issuing them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountingSink {
    pub eyes: u64,
    pub cubes: u64,
    pub found_cubes: u64,
    pub floors: u64,
}

impl DrawSink for CountingSink {
    fn begin_eye(&mut self, eye: &Eye) -> Result<()> {
        trace!("Begin {:?} eye", eye.eye_type);
        self.eyes += 1;
        Ok(())
    }

    fn draw_cube(&mut self, call: &DrawCall<'_>) -> Result<()> {
        trace!("Cube {:?} light at {:?}", call.palette, call.light_pos);
        self.cubes += 1;
        if call.palette == Palette::CubeFound {
            self.found_cubes += 1;
        }
        Ok(())
    }

    fn draw_floor(&mut self, _call: &DrawCall<'_>) -> Result<()> {
        self.floors += 1;
        Ok(())
    }
}

/// Totals for one headless run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub triggers: u64,
    pub draws: CountingSink,
}

pub struct HeadlessHost {
    config: HostConfig,
}

impl HeadlessHost {
    pub fn new(config: HostConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Head pose for `frame` of the sweep
    pub fn head_pose(&self, frame: u64) -> HeadPose {
        let period = self.config.sweep_period.max(1);
        let phase = (frame % period) as f32 / period as f32 * std::f32::consts::TAU;
        let yaw = self.config.sweep_degrees.to_radians() * phase.sin();
        HeadPose::from_rotation(Quat::from_rotation_y(yaw))
    }

    /// Synthetic linear acceleration: a short forward push every few seconds
    pub fn sensor_reading(&self, frame: u64) -> SensorReading {
        let z = if frame % 180 < 3 { -0.6 } else { 0.1 };
        SensorReading::new(
            SensorKind::LinearAcceleration,
            Vec3::new(0.0, 0.0, z),
            frame as i64 * FRAME_NS,
        )
    }

    /// Run the full lifecycle: setup, frames, shutdown
    pub fn run<R>(&self, renderer: &mut R) -> Result<RunSummary>
    where
        R: FrameRenderer + TriggerListener + SensorListener,
    {
        info!(
            "Headless host: {} frames, trigger every {}",
            self.config.frames, self.config.trigger_every
        );

        renderer.on_surface_created()?;
        renderer.on_surface_changed(self.config.width, self.config.height);

        let mut summary = RunSummary::default();
        for frame in 0..self.config.frames {
            renderer.on_reading(&self.sensor_reading(frame));

            let head = self.head_pose(frame);
            renderer.on_new_frame(&head)?;
            for eye in Eye::stereo_pair(&head, self.config.ipd, self.config.fov) {
                renderer.on_draw_eye(&eye, &mut summary.draws)?;
            }
            renderer.on_finish_frame();
            summary.frames += 1;

            if self.config.trigger_every > 0 && (frame + 1) % self.config.trigger_every == 0 {
                debug!("Trigger at frame {}", frame);
                renderer.on_trigger();
                summary.triggers += 1;
            }
        }

        renderer.on_renderer_shutdown();
        Ok(summary)
    }
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new(HostConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_starts_facing_forward() {
        let host = HeadlessHost::default();
        let forward = host.head_pose(0).forward();
        assert!(forward.abs_diff_eq(Vec3::NEG_Z, 1e-6));
    }

    #[test]
    fn sweep_reaches_peak_yaw() {
        let host = HeadlessHost::default();
        let quarter = host.config().sweep_period / 4;
        let forward = host.head_pose(quarter).forward();
        let yaw = forward.x.atan2(-forward.z).abs().to_degrees();
        assert!((yaw - 30.0).abs() < 1e-3);
    }

    #[test]
    fn sensor_timestamps_advance() {
        let host = HeadlessHost::default();
        let a = host.sensor_reading(1);
        let b = host.sensor_reading(2);
        assert!(b.timestamp_ns > a.timestamp_ns);
        assert_eq!(a.kind, SensorKind::LinearAcceleration);
    }
}
