//! Spatial audio engine
//!
//! [`SpatialAudioEngine`] is the surface the rest of the app talks to: sound
//! files are preloaded, turned into positional sound objects, positioned and
//! played, while the listener orientation follows the head every frame.
//!
//! [`SoftwareAudioEngine`] implements it without an output device. It keeps
//! the full object and listener state so hosts without audio hardware (and
//! tests) behave exactly like a device-backed engine from the caller's side.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};

use glam::{Quat, Vec3};
use tracing::{debug, info, trace, warn};

use crate::{Error, RenderingMode, Result, SoundObjectId};

/// Audio engine shared between the render thread and background loaders
pub type SharedAudioEngine = Arc<Mutex<dyn SpatialAudioEngine>>;

/// Lock a shared engine, recovering the guard if a holder panicked
pub fn lock_engine(engine: &SharedAudioEngine) -> MutexGuard<'_, dyn SpatialAudioEngine + 'static> {
    engine.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Lock a shared engine without waiting
///
/// Returns `None` while another thread (typically a loader decoding a file)
/// holds the engine.
pub fn try_lock_engine(
    engine: &SharedAudioEngine,
) -> Option<MutexGuard<'_, dyn SpatialAudioEngine + 'static>> {
    match engine.try_lock() {
        Ok(guard) => Some(guard),
        Err(TryLockError::Poisoned(poisoned)) => Some(poisoned.into_inner()),
        Err(TryLockError::WouldBlock) => None,
    }
}

/// Positional audio operations keyed by sound object handle
pub trait SpatialAudioEngine: Send {
    /// Decode and cache a sound file so objects can be created from it
    fn preload_sound_file(&mut self, file: &str) -> Result<()>;

    /// Create a positional sound object from a preloaded file
    fn create_sound_object(&mut self, file: &str) -> Result<SoundObjectId>;

    fn set_sound_object_position(&mut self, id: SoundObjectId, position: Vec3) -> Result<()>;

    fn play_sound(&mut self, id: SoundObjectId, looped: bool) -> Result<()>;

    fn stop_sound(&mut self, id: SoundObjectId) -> Result<()>;

    /// Listener orientation, normally the head rotation of the current frame
    fn set_head_rotation(&mut self, rotation: Quat);

    /// Per-frame engine tick
    fn update(&mut self);

    fn pause(&mut self);

    fn resume(&mut self);
}

/// Configuration for the audio engine
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct AudioEngineConfig {
    pub rendering_mode: RenderingMode,
    /// Directory sound files are resolved against; when unset files are
    /// accepted without touching the filesystem
    pub asset_root: Option<PathBuf>,
}

/// State of one positional sound object
#[derive(Debug, Clone, PartialEq)]
pub struct SoundObject {
    pub file: String,
    pub position: Vec3,
    pub playing: bool,
    pub looped: bool,
}

/// Device-less spatial audio engine
#[derive(Debug)]
pub struct SoftwareAudioEngine {
    config: AudioEngineConfig,
    preloaded: HashSet<String>,
    objects: HashMap<SoundObjectId, SoundObject>,
    next_object_id: u32,
    head_rotation: Quat,
    paused: bool,
    frames: u64,
}

impl SoftwareAudioEngine {
    pub fn new(config: AudioEngineConfig) -> Self {
        info!("Initializing audio engine ({:?})", config.rendering_mode);
        Self {
            config,
            preloaded: HashSet::new(),
            objects: HashMap::new(),
            next_object_id: 0,
            head_rotation: Quat::IDENTITY,
            paused: false,
            frames: 0,
        }
    }

    /// Engine wrapped for sharing with background loaders
    pub fn shared(config: AudioEngineConfig) -> SharedAudioEngine {
        Arc::new(Mutex::new(Self::new(config)))
    }

    pub fn config(&self) -> &AudioEngineConfig {
        &self.config
    }

    pub fn sound_object(&self, id: SoundObjectId) -> Option<&SoundObject> {
        self.objects.get(&id)
    }

    /// Every sound object created so far, in no particular order
    pub fn sound_objects(&self) -> impl Iterator<Item = (SoundObjectId, &SoundObject)> {
        self.objects.iter().map(|(id, object)| (*id, object))
    }

    pub fn sound_object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn is_preloaded(&self, file: &str) -> bool {
        self.preloaded.contains(file)
    }

    pub fn head_rotation(&self) -> Quat {
        self.head_rotation
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Number of `update` calls made while not paused
    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn object_mut(&mut self, id: SoundObjectId) -> Result<&mut SoundObject> {
        self.objects
            .get_mut(&id).ok_or(Error::UnknownSoundObject(id))
    }
}

impl Default for SoftwareAudioEngine {
    fn default() -> Self {
        Self::new(AudioEngineConfig::default())
    }
}

impl SpatialAudioEngine for SoftwareAudioEngine {
    fn preload_sound_file(&mut self, file: &str) -> Result<()> {
        if let Some(root) = &self.config.asset_root {
            let path = root.join(file);
            let metadata = std::fs::metadata(&path)
                .map_err(|e| Error::LoadFailed(format!("{}: {}", path.display(), e)))?;
            if !metadata.is_file() {
                return Err(Error::LoadFailed(format!("{} is not a file", path.display())));
            }
        }

        if self.preloaded.insert(file.to_string()) {
            debug!("Preloaded sound file {}", file);
        }
        Ok(())
    }

    fn create_sound_object(&mut self, file: &str) -> Result<SoundObjectId> {
        if !self.preloaded.contains(file) {
            return Err(Error::NotPreloaded(file.to_string()));
        }

        let id = SoundObjectId::new(self.next_object_id);
        self.next_object_id += 1;
        self.objects.insert(
            id,
            SoundObject {
                file: file.to_string(),
                position: Vec3::ZERO,
                playing: false,
                looped: false,
            },
        );

        debug!("Created sound object {} from {}", id, file);
        Ok(id)
    }

    fn set_sound_object_position(&mut self, id: SoundObjectId, position: Vec3) -> Result<()> {
        let object = self.object_mut(id)?;
        object.position = position;
        trace!("Sound object {} moved to {:?}", id, position);
        Ok(())
    }

    fn play_sound(&mut self, id: SoundObjectId, looped: bool) -> Result<()> {
        let object = self.object_mut(id)?;
        object.playing = true;
        object.looped = looped;
        debug!("Playing sound object {} (looped: {})", id, looped);
        Ok(())
    }

    fn stop_sound(&mut self, id: SoundObjectId) -> Result<()> {
        let object = self.object_mut(id)?;
        object.playing = false;
        debug!("Stopped sound object {}", id);
        Ok(())
    }

    fn set_head_rotation(&mut self, rotation: Quat) {
        self.head_rotation = rotation.normalize();
    }

    fn update(&mut self) {
        if self.paused {
            return;
        }
        self.frames += 1;
        // One-shot sounds finish after a single tick in the software engine.
        for object in self.objects.values_mut() {
            if object.playing && !object.looped {
                object.playing = false;
            }
        }
    }

    fn pause(&mut self) {
        if !self.paused {
            info!("Pausing audio engine");
        }
        self.paused = true;
    }

    fn resume(&mut self) {
        if self.paused {
            info!("Resuming audio engine");
        } else {
            warn!("Resume requested while audio engine was running");
        }
        self.paused = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_creation() {
        let engine = SoftwareAudioEngine::default();
        assert!(!engine.is_paused());
        assert_eq!(engine.sound_object_count(), 0);
        assert_eq!(engine.config().rendering_mode, RenderingMode::BinauralHighQuality);
    }

    #[test]
    fn create_requires_preload() {
        let mut engine = SoftwareAudioEngine::default();
        assert!(matches!(
            engine.create_sound_object("cube_sound.wav"),
            Err(Error::NotPreloaded(_))
        ));

        engine.preload_sound_file("cube_sound.wav").unwrap();
        let a = engine.create_sound_object("cube_sound.wav").unwrap();
        let b = engine.create_sound_object("cube_sound.wav").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn sound_object_lifecycle() {
        let mut engine = SoftwareAudioEngine::default();
        engine.preload_sound_file("cube_sound.wav").unwrap();
        let id = engine.create_sound_object("cube_sound.wav").unwrap();

        engine
            .set_sound_object_position(id, Vec3::new(0.0, 0.0, -3.5)).unwrap();
        engine.play_sound(id, true).unwrap();
        engine.update();

        let object = engine.sound_object(id).unwrap();
        assert_eq!(object.position, Vec3::new(0.0, 0.0, -3.5));
        assert!(object.playing);
        assert!(object.looped);
    }

    #[test]
    fn one_shot_stops_after_update() {
        let mut engine = SoftwareAudioEngine::default();
        engine.preload_sound_file("ping.wav").unwrap();
        let id = engine.create_sound_object("ping.wav").unwrap();
        engine.play_sound(id, false).unwrap();
        engine.update();
        assert!(!engine.sound_object(id).unwrap().playing);
    }

    #[test]
    fn unknown_object_is_an_error() {
        let mut engine = SoftwareAudioEngine::default();
        let id = SoundObjectId::new(12);
        assert!(matches!(
            engine.set_sound_object_position(id, Vec3::ZERO),
            Err(Error::UnknownSoundObject(_))
        ));
        assert!(engine.play_sound(id, true).is_err());
    }

    #[test]
    fn stop_silences_looped_sound() {
        let mut engine = SoftwareAudioEngine::default();
        engine.preload_sound_file("cube_sound.wav").unwrap();
        let id = engine.create_sound_object("cube_sound.wav").unwrap();
        engine.play_sound(id, true).unwrap();
        engine.stop_sound(id).unwrap();
        assert!(!engine.sound_object(id).unwrap().playing);
        assert!(engine.stop_sound(SoundObjectId::new(9)).is_err());
    }

    #[test]
    fn try_lock_skips_busy_engine() {
        let shared = SoftwareAudioEngine::shared(AudioEngineConfig::default());
        let guard = lock_engine(&shared);
        assert!(try_lock_engine(&shared).is_none());
        drop(guard);
        assert!(try_lock_engine(&shared).is_some());
    }

    #[test]
    fn pause_stops_updates() {
        let mut engine = SoftwareAudioEngine::default();
        engine.update();
        engine.pause();
        engine.update();
        assert_eq!(engine.frames(), 1);
        engine.resume();
        engine.update();
        assert_eq!(engine.frames(), 2);
    }

    #[test]
    fn head_rotation_is_normalized() {
        let mut engine = SoftwareAudioEngine::default();
        engine.set_head_rotation(Quat::from_xyzw(0.0, 2.0, 0.0, 0.0));
        assert!((engine.head_rotation().length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn asset_root_checks_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cube_sound.wav"), b"RIFF").unwrap();

        let mut engine = SoftwareAudioEngine::new(AudioEngineConfig {
            asset_root: Some(dir.path().to_path_buf()),
            ..AudioEngineConfig::default()
        });

        assert!(engine.preload_sound_file("cube_sound.wav").is_ok());
        assert!(matches!(
            engine.preload_sound_file("missing.wav"),
            Err(Error::LoadFailed(_))
        ));
        assert!(engine.is_preloaded("cube_sound.wav"));
        assert!(!engine.is_preloaded("missing.wav"));
    }
}
