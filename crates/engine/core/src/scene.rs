//! Scene state: the movable target cube and the static floor
//!
//! The target carries a full model transform. Its translation column is the
//! target position and its upper 3x3 accumulates the continuous spin applied
//! once per frame.

use glam::{Mat4, Vec3};

use crate::MAX_DISTANCE;

/// Spin applied to the target every frame, in degrees
pub const ROTATION_STEP_DEGREES: f32 = 0.3;

/// Axis the target spins around (normalized on use)
pub const ROTATION_AXIS: Vec3 = Vec3::new(0.5, 0.5, 1.0);

/// How far below the viewer the floor sits
pub const FLOOR_DEPTH: f32 = 20.0;

/// The treasure cube
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    model: Mat4,
    distance: f32,
}

impl Target {
    /// Create a target at `position`, `distance` units from the viewer
    pub fn new(position: Vec3, distance: f32) -> Self {
        Self {
            model: Mat4::from_translation(position),
            distance,
        }
    }

    /// Target straight down -Z at `distance`
    pub fn ahead(distance: f32) -> Self {
        Self::new(Vec3::new(0.0, 0.0, -distance), distance)
    }

    /// Model transform (translation plus accumulated spin)
    pub fn model(&self) -> &Mat4 {
        &self.model
    }

    /// World-space position
    pub fn position(&self) -> Vec3 {
        self.model.w_axis.truncate()
    }

    /// Distance from the viewer recorded at the last placement
    pub fn distance(&self) -> f32 {
        self.distance
    }
}

impl Default for Target {
    /// Directly in front of the viewer, halfway to the maximum distance
    fn default() -> Self {
        Self::ahead(MAX_DISTANCE / 2.0)
    }
}

/// The floor grid. Its transform is fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Floor {
    model: Mat4,
}

impl Floor {
    /// Floor translated `depth` units below the viewer
    pub fn new(depth: f32) -> Self {
        Self {
            model: Mat4::from_translation(Vec3::new(0.0, -depth, 0.0)),
        }
    }

    pub fn model(&self) -> &Mat4 {
        &self.model
    }
}

impl Default for Floor {
    fn default() -> Self {
        Self::new(FLOOR_DEPTH)
    }
}

/// Owns the target and floor transforms for the lifetime of the app
#[derive(Debug, Clone)]
pub struct SceneState {
    target: Target,
    floor: Floor,
    rotation_axis: Vec3,
    rotation_step: f32,
}

impl SceneState {
    pub fn new(target: Target, floor: Floor) -> Self {
        Self {
            target,
            floor,
            rotation_axis: ROTATION_AXIS.normalize(),
            rotation_step: ROTATION_STEP_DEGREES.to_radians(),
        }
    }

    /// Override the per-frame spin (`step_degrees` around `axis`)
    pub fn with_rotation(mut self, step_degrees: f32, axis: Vec3) -> Self {
        self.rotation_axis = axis.normalize_or(ROTATION_AXIS.normalize());
        self.rotation_step = step_degrees.to_radians();
        self
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn floor(&self) -> &Floor {
        &self.floor
    }

    /// Spin the target by one step in its local frame
    ///
    /// Call once per frame, not once per eye.
    pub fn advance_rotation(&mut self) {
        let spin = Mat4::from_axis_angle(self.rotation_axis, self.rotation_step);
        self.target.model *= spin;
    }

    /// Move the target without touching its orientation
    pub fn set_position(&mut self, position: Vec3) {
        self.target.model.w_axis = position.extend(1.0);
    }

    /// Move the target and record its new distance from the viewer
    pub fn relocate(&mut self, position: Vec3, distance: f32) {
        self.set_position(position);
        self.target.distance = distance;
    }
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new(Target::default(), Floor::default())
    }
}
