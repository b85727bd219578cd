//! Spatial audio for Treasure Hunt
//!
//! This crate provides the audio side of the experience:
//! - A [`SpatialAudioEngine`] trait over positional sound objects and head tracking
//! - [`SoftwareAudioEngine`], an in-process engine that tracks sound object state
//! - [`AmbientSound`], a cancellable background task that loads, positions and
//!   starts the looping sound attached to the target
//!
//! # Example
//!
//! ```rust,ignore
//! use treasure_audio::{AmbientSound, AudioEngineConfig, SoftwareAudioEngine};
//!
//! let engine = SoftwareAudioEngine::shared(AudioEngineConfig::default());
//! let ambient = AmbientSound::spawn(engine.clone(), "cube_sound.wav", position);
//!
//! // Later, each time the target moves:
//! ambient.set_position(&engine, new_position);
//! ```

pub mod engine;
pub mod loader;

pub use engine::{
    lock_engine, try_lock_engine, AudioEngineConfig, SharedAudioEngine, SoftwareAudioEngine,
    SoundObject, SpatialAudioEngine,
};
pub use loader::{AmbientSound, LoadStatus};

use serde::{Deserialize, Serialize};

/// Error types for the audio crate
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to load audio file: {0}")]
    LoadFailed(String),

    #[error("Sound file was not preloaded: {0}")]
    NotPreloaded(String),

    #[error("Unknown sound object {0}")]
    UnknownSoundObject(SoundObjectId),

    #[error("Audio task cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for audio operations
pub type Result<T> = std::result::Result<T, Error>;

/// Handle to a positional sound object owned by an engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SoundObjectId(u32);

impl SoundObjectId {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for SoundObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sound-{}", self.0)
    }
}

/// How sound objects are rendered to the output device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderingMode {
    /// Plain stereo panning
    StereoPanning,
    /// Binaural rendering with a reduced HRTF set
    BinauralLowQuality,
    /// Full binaural rendering
    #[default]
    BinauralHighQuality,
}
