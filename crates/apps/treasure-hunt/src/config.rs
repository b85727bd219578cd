use std::path::{Path, PathBuf};

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};
use treasure_audio::{AudioEngineConfig, RenderingMode};
use treasure_core::{gaze, scene, MAX_DISTANCE, MIN_DISTANCE, Z_FAR, Z_NEAR};

/// Errors raised while loading the configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Configuration loaded from a TOML file
///
/// Every section has defaults, so an empty file (or no file) gives the
/// stock experience.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HuntConfig {
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub gaze: GazeConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub haptics: HapticsConfig,
    #[serde(default)]
    pub sensors: SensorsConfig,
    #[serde(default)]
    pub shaders: ShadersConfig,
    /// Seed for target repositioning; random when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default = "default_min_distance")]
    pub min_distance: f32,
    #[serde(default = "default_max_distance")]
    pub max_distance: f32,
    #[serde(default = "default_floor_depth")]
    pub floor_depth: f32,
    #[serde(default = "default_rotation_step")]
    pub rotation_step_degrees: f32,
    #[serde(default = "default_rotation_axis")]
    pub rotation_axis: [f32; 3],
    /// Distance the camera sits behind the viewer along +Z
    #[serde(default = "default_camera_z")]
    pub camera_z: f32,
    #[serde(default = "default_light_position")]
    pub light_position: [f32; 3],
    #[serde(default = "default_z_near")]
    pub z_near: f32,
    #[serde(default = "default_z_far")]
    pub z_far: f32,
}

fn default_min_distance() -> f32 {
    MIN_DISTANCE
}

fn default_max_distance() -> f32 {
    MAX_DISTANCE
}

fn default_floor_depth() -> f32 {
    scene::FLOOR_DEPTH
}

fn default_rotation_step() -> f32 {
    scene::ROTATION_STEP_DEGREES
}

fn default_rotation_axis() -> [f32; 3] {
    scene::ROTATION_AXIS.to_array()
}

fn default_camera_z() -> f32 {
    treasure_core::frame::CAMERA_Z
}

fn default_light_position() -> [f32; 3] {
    treasure_core::frame::LIGHT_POS_WORLD.truncate().to_array()
}

fn default_z_near() -> f32 {
    Z_NEAR
}

fn default_z_far() -> f32 {
    Z_FAR
}

impl SceneConfig {
    pub fn rotation_axis(&self) -> Vec3 {
        Vec3::from_array(self.rotation_axis)
    }

    /// Light position in world space as a homogeneous point
    pub fn light_position(&self) -> Vec4 {
        Vec3::from_array(self.light_position).extend(1.0)
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            min_distance: default_min_distance(),
            max_distance: default_max_distance(),
            floor_depth: default_floor_depth(),
            rotation_step_degrees: default_rotation_step(),
            rotation_axis: default_rotation_axis(),
            camera_z: default_camera_z(),
            light_position: default_light_position(),
            z_near: default_z_near(),
            z_far: default_z_far(),
        }
    }
}

/// Half-angles of the gaze cone in radians
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GazeConfig {
    #[serde(default = "default_pitch_limit")]
    pub pitch_limit: f32,
    #[serde(default = "default_yaw_limit")]
    pub yaw_limit: f32,
}

fn default_pitch_limit() -> f32 {
    gaze::PITCH_LIMIT
}

fn default_yaw_limit() -> f32 {
    gaze::YAW_LIMIT
}

impl Default for GazeConfig {
    fn default() -> Self {
        Self {
            pitch_limit: default_pitch_limit(),
            yaw_limit: default_yaw_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Looping sound attached to the target
    #[serde(default = "default_sound_file")]
    pub sound_file: String,
    #[serde(default)]
    pub rendering_mode: RenderingMode,
    /// Directory sound files are resolved against
    #[serde(default)]
    pub asset_root: Option<PathBuf>,
}

fn default_sound_file() -> String {
    "cube_sound.wav".to_string()
}

impl AudioConfig {
    pub fn engine_config(&self) -> AudioEngineConfig {
        AudioEngineConfig {
            rendering_mode: self.rendering_mode,
            asset_root: self.asset_root.clone(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sound_file: default_sound_file(),
            rendering_mode: RenderingMode::default(),
            asset_root: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HapticsConfig {
    #[serde(default = "default_trigger_pulse_ms")]
    pub trigger_pulse_ms: u64,
}

fn default_trigger_pulse_ms() -> u64 {
    50
}

impl Default for HapticsConfig {
    fn default() -> Self {
        Self {
            trigger_pulse_ms: default_trigger_pulse_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorsConfig {
    /// Linear acceleration at or below this magnitude is ignored
    #[serde(default = "default_deadband")]
    pub deadband: f32,
}

fn default_deadband() -> f32 {
    treasure_devices::DEADBAND
}

impl Default for SensorsConfig {
    fn default() -> Self {
        Self {
            deadband: default_deadband(),
        }
    }
}

/// Shader sources handed to the draw backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShadersConfig {
    /// Directory holding the shader files; nothing is loaded when unset
    #[serde(default)]
    pub root: Option<PathBuf>,
    #[serde(default = "default_vertex_shader")]
    pub vertex: String,
    #[serde(default = "default_grid_fragment")]
    pub grid_fragment: String,
    #[serde(default = "default_passthrough_fragment")]
    pub passthrough_fragment: String,
}

fn default_vertex_shader() -> String {
    "light_vertex.glsl".to_string()
}

fn default_grid_fragment() -> String {
    "grid_fragment.glsl".to_string()
}

fn default_passthrough_fragment() -> String {
    "passthrough_fragment.glsl".to_string()
}

impl Default for ShadersConfig {
    fn default() -> Self {
        Self {
            root: None,
            vertex: default_vertex_shader(),
            grid_fragment: default_grid_fragment(),
            passthrough_fragment: default_passthrough_fragment(),
        }
    }
}

impl HuntConfig {
    /// Parse a configuration from TOML text and validate it
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: HuntConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the renderer cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scene = &self.scene;
        if !(scene.min_distance > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "scene.min_distance must be positive, got {}",
                scene.min_distance
            )));
        }
        if !(scene.min_distance < scene.max_distance) {
            return Err(ConfigError::Invalid(format!(
                "scene.min_distance ({}) must be below scene.max_distance ({})",
                scene.min_distance, scene.max_distance
            )));
        }
        if !(scene.z_near > 0.0 && scene.z_near < scene.z_far) {
            return Err(ConfigError::Invalid(format!(
                "clip planes must satisfy 0 < z_near < z_far, got {} and {}",
                scene.z_near, scene.z_far
            )));
        }
        if scene.rotation_axis().length_squared() == 0.0 {
            return Err(ConfigError::Invalid(
                "scene.rotation_axis must not be zero".to_string(),
            ));
        }
        if !(self.gaze.pitch_limit > 0.0 && self.gaze.yaw_limit > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "gaze limits must be positive, got pitch {} and yaw {}",
                self.gaze.pitch_limit, self.gaze.yaw_limit
            )));
        }
        if self.sensors.deadband < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "sensors.deadband must not be negative, got {}",
                self.sensors.deadband
            )));
        }
        Ok(())
    }
}

/// Load and validate configuration from a TOML file
pub fn load_config(path: impl AsRef<Path>) -> Result<HuntConfig, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    HuntConfig::from_toml(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = HuntConfig::from_toml("").unwrap();
        assert_eq!(config.scene.min_distance, 3.0);
        assert_eq!(config.scene.max_distance, 7.0);
        assert_eq!(config.scene.floor_depth, 20.0);
        assert_eq!(config.scene.rotation_axis, [0.5, 0.5, 1.0]);
        assert_eq!(config.scene.light_position(), Vec4::new(0.0, 2.0, 0.0, 1.0));
        assert_eq!(config.gaze.pitch_limit, 0.12);
        assert_eq!(config.audio.sound_file, "cube_sound.wav");
        assert_eq!(config.haptics.trigger_pulse_ms, 50);
        assert_eq!(config.sensors.deadband, 0.5);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = HuntConfig::from_toml(
            r#"
            seed = 7

            [scene]
            max_distance = 9.0

            [audio]
            rendering_mode = "stereo_panning"
            "#,
        )
        .unwrap();

        assert_eq!(config.seed, Some(7));
        assert_eq!(config.scene.min_distance, 3.0);
        assert_eq!(config.scene.max_distance, 9.0);
        assert_eq!(config.audio.rendering_mode, RenderingMode::StereoPanning);
        assert_eq!(config.audio.sound_file, "cube_sound.wav");
    }

    #[test]
    fn inverted_distance_range_is_rejected() {
        let result = HuntConfig::from_toml("[scene]\nmin_distance = 8.0\nmax_distance = 7.0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn bad_clip_planes_are_rejected() {
        let result = HuntConfig::from_toml("[scene]\nz_near = 100.0\nz_far = 0.1\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn unknown_rendering_mode_is_a_parse_error() {
        let result = HuntConfig::from_toml("[audio]\nrendering_mode = \"surround\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hunt.toml");
        std::fs::write(&path, "[haptics]\ntrigger_pulse_ms = 30\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.haptics.trigger_pulse_ms, 30);

        assert!(matches!(
            load_config(dir.path().join("missing.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
