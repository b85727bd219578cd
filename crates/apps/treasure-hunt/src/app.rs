//! The Treasure Hunt frame renderer
//!
//! [`TreasureHunt`] owns all per-experience state and implements the host
//! capability traits. Every hook runs on the render thread except the
//! background audio setup started from `on_surface_created`.

use std::time::Duration;

use glam::{Mat4, Vec3};
use tracing::{debug, info, trace};
use treasure_audio::{lock_engine, try_lock_engine, AmbientSound, SharedAudioEngine};
use treasure_core::frame::camera_at;
use treasure_core::{
    DrawSink, Eye, Floor, FramePass, FrameRenderer, GazeEvaluator, HeadPose, RenderError,
    Repositioner, Result, SceneState, Target, TriggerListener,
};
use treasure_devices::{Haptics, MotionIntegrator, SensorListener, SensorReading, SensorState};

use crate::config::HuntConfig;
use crate::resources::ShaderSources;

/// Result of one trigger press
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerOutcome {
    /// The target was in the gaze cone and moved here
    Found(Vec3),
    /// Gaze was off target; nothing moved
    Missed,
}

/// Stereo treasure hunt: spot the cube, pull the trigger, find it again
pub struct TreasureHunt<H: Haptics = Box<dyn Haptics>> {
    config: HuntConfig,
    scene: SceneState,
    gaze: GazeEvaluator,
    repositioner: Repositioner,
    pass: FramePass,
    camera: Mat4,
    head_view: Mat4,
    audio: SharedAudioEngine,
    ambient: Option<AmbientSound>,
    haptics: H,
    motion: MotionIntegrator,
    sensors: SensorState,
    shaders: ShaderSources,
    surface_created: bool,
    sensors_active: bool,
    last_trigger: Option<TriggerOutcome>,
}

impl<H: Haptics> TreasureHunt<H> {
    pub fn new(config: HuntConfig, audio: SharedAudioEngine, haptics: H) -> Self {
        // Straight ahead, halfway to the far edge but never inside the minimum distance.
        let start = (config.scene.max_distance / 2.0).max(config.scene.min_distance);
        let scene = SceneState::new(Target::ahead(start), Floor::new(config.scene.floor_depth))
            .with_rotation(config.scene.rotation_step_degrees, config.scene.rotation_axis());

        let repositioner = match config.seed {
            Some(seed) => Repositioner::seeded(seed),
            None => Repositioner::from_os_rng(),
        }
        .with_distance_range(config.scene.min_distance, config.scene.max_distance);

        let camera = camera_at(Vec3::ZERO, config.scene.camera_z);

        Self {
            gaze: GazeEvaluator::new(config.gaze.pitch_limit, config.gaze.yaw_limit),
            pass: FramePass::new(
                config.scene.light_position(),
                config.scene.z_near,
                config.scene.z_far,
            ),
            motion: MotionIntegrator::new(config.sensors.deadband),
            scene,
            repositioner,
            camera,
            head_view: Mat4::IDENTITY,
            audio,
            ambient: None,
            haptics,
            sensors: SensorState::new(),
            shaders: ShaderSources::default(),
            surface_created: false,
            sensors_active: true,
            last_trigger: None,
            config,
        }
    }

    pub fn config(&self) -> &HuntConfig {
        &self.config
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    /// Camera matrix of the current frame
    pub fn camera(&self) -> &Mat4 {
        &self.camera
    }

    pub fn haptics(&self) -> &H {
        &self.haptics
    }

    pub fn sensors(&self) -> &SensorState {
        &self.sensors
    }

    pub fn motion(&self) -> &MotionIntegrator {
        &self.motion
    }

    pub fn shaders(&self) -> &ShaderSources {
        &self.shaders
    }

    /// Background sound task, once the surface exists
    pub fn ambient(&self) -> Option<&AmbientSound> {
        self.ambient.as_ref()
    }

    /// Block until the background sound task has finished
    pub fn wait_for_audio(&mut self) {
        if let Some(ambient) = self.ambient.as_mut() {
            ambient.join();
        }
    }

    pub fn last_trigger(&self) -> Option<TriggerOutcome> {
        self.last_trigger
    }

    pub fn sensors_active(&self) -> bool {
        self.sensors_active
    }

    /// Whether the target lies in the gaze cone of the last head pose
    pub fn is_looking_at_target(&self) -> bool {
        self.gaze.is_looking_at(&self.head_view, self.scene.target().model())
    }

    /// Handle a trigger press and report what happened
    pub fn trigger(&mut self) -> TriggerOutcome {
        info!("Trigger");

        let outcome = if self.is_looking_at_target() {
            let position = self.repositioner.reposition(&mut self.scene);
            info!(
                "Target found, moved to ({:.2}, {:.2}, {:.2}) at distance {:.2}",
                position.x,
                position.y,
                position.z,
                self.scene.target().distance()
            );
            self.move_sound(position);
            TriggerOutcome::Found(position)
        } else {
            debug!("Trigger with target out of view");
            TriggerOutcome::Missed
        };

        // Feedback on every press, hit or miss.
        self.haptics.vibrate(Duration::from_millis(self.config.haptics.trigger_pulse_ms));

        self.last_trigger = Some(outcome);
        outcome
    }

    fn move_sound(&self, position: Vec3) {
        let Some(ambient) = &self.ambient else {
            return;
        };
        if !ambient.set_position(&self.audio, position) {
            debug!("Ambient sound not ready, position update skipped");
        }
    }
}

impl<H: Haptics> FrameRenderer for TreasureHunt<H> {
    fn on_surface_created(&mut self) -> Result<()> {
        info!("Surface created");

        self.shaders = ShaderSources::load(&self.config.shaders);
        if self.config.shaders.root.is_some() && !self.shaders.is_complete() {
            return Err(RenderError::Setup("shader sources missing or empty".to_string()));
        }

        // A recreated surface keeps the sound that is already loading or playing.
        if self.ambient.is_none() {
            self.ambient = Some(AmbientSound::spawn(
                self.audio.clone(),
                self.config.audio.sound_file.clone(),
                self.scene.target().position(),
            ));
        }

        self.surface_created = true;
        Ok(())
    }

    fn on_surface_changed(&mut self, width: u32, height: u32) {
        info!("Surface changed: {}x{}", width, height);
    }

    fn on_new_frame(&mut self, head: &HeadPose) -> Result<()> {
        self.scene.advance_rotation();

        let viewer = self.motion.position().unwrap_or(Vec3::ZERO);
        self.camera = camera_at(viewer, self.config.scene.camera_z);
        self.head_view = head.head_view;

        // The ambient loader holds the engine while it decodes; skip this tick then.
        match try_lock_engine(&self.audio) {
            Some(mut audio) => {
                audio.set_head_rotation(head.rotation);
                audio.update();
            }
            None => trace!("Audio engine busy, skipping audio tick"),
        }
        Ok(())
    }

    fn on_draw_eye(&mut self, eye: &Eye, sink: &mut dyn DrawSink) -> Result<()> {
        if !self.surface_created {
            return Err(RenderError::SurfaceNotCreated);
        }
        let found = self.is_looking_at_target();
        self.pass.draw_eye(eye, &self.camera, &self.scene, found, sink)
    }

    fn on_renderer_shutdown(&mut self) {
        info!("Renderer shutdown");
        if let Some(ambient) = self.ambient.take() {
            ambient.stop(&self.audio);
        }
        self.surface_created = false;
    }

    fn on_pause(&mut self) {
        info!("Paused");
        self.sensors_active = false;
        lock_engine(&self.audio).pause();
    }

    fn on_resume(&mut self) {
        info!("Resumed");
        lock_engine(&self.audio).resume();
        self.sensors_active = true;
    }
}

impl<H: Haptics> TriggerListener for TreasureHunt<H> {
    fn on_trigger(&mut self) {
        self.trigger();
    }
}

impl<H: Haptics> SensorListener for TreasureHunt<H> {
    fn on_reading(&mut self, reading: &SensorReading) {
        if !self.sensors_active {
            return;
        }

        self.sensors.record(reading);
        self.motion.integrate(reading);

        debug!(
            "Sensors: linear={:?} gravity={:?} orientation={:?} magnetic={:?} position={:?}",
            self.sensors.linear_acceleration,
            self.sensors.gravity,
            self.sensors.orientation,
            self.sensors.magnetic_field,
            self.motion.position()
        );
    }
}
