//! Core library for Treasure Hunt - scene math shared by every host
//!
//! This crate contains the per-frame logic of the experience and nothing that
//! talks to a graphics API, an audio device or a sensor directly. Hosts drive
//! it through the capability traits in [`host`].
//!
//! # Modules
//!
//! - [`scene`]: Target and floor transforms, continuous target rotation
//! - [`gaze`]: Angular gaze cone test against the target
//! - [`reposition`]: Randomized relocation of the target on trigger
//! - [`eye`]: Head pose, per-eye view and field-of-view projection
//! - [`frame`]: Per-eye render pass composing view, model-view and MVP matrices
//! - [`host`]: Capability traits a rendering host calls into

pub mod error;
pub mod eye;
pub mod frame;
pub mod gaze;
pub mod host;
pub mod reposition;
pub mod scene;

pub use error::{RenderError, Result};
pub use eye::{Eye, EyeType, FieldOfView, HeadPose};
pub use frame::{DrawCall, DrawSink, EyeScratch, FramePass, Palette};
pub use gaze::{GazeAngles, GazeEvaluator};
pub use host::{FrameRenderer, TriggerListener};
pub use reposition::{RepositionDraw, Repositioner};
pub use scene::{Floor, SceneState, Target};

/// Near clipping plane used for every eye projection
pub const Z_NEAR: f32 = 0.1;

/// Far clipping plane used for every eye projection
pub const Z_FAR: f32 = 100.0;

/// Closest distance the target may be placed from the viewer
pub const MIN_DISTANCE: f32 = 3.0;

/// Farthest distance the target may be placed from the viewer
pub const MAX_DISTANCE: f32 = 7.0;
