//! Head pose and per-eye parameters supplied by the host each frame
//!
//! Uses OpenGL conventions: +X right, +Y up, -Z forward, column-major
//! matrices and a [-1, 1] clip-space depth range.

use glam::{Mat4, Quat, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Average interpupillary distance in meters
pub const DEFAULT_IPD: f32 = 0.064;

/// Head orientation for the current frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadPose {
    /// World-to-head transform
    pub head_view: Mat4,
    /// Head orientation in world space
    pub rotation: Quat,
}

impl HeadPose {
    /// Pose for a head rotated by `rotation` around its own position
    pub fn from_rotation(rotation: Quat) -> Self {
        let rotation = rotation.normalize();
        Self {
            head_view: Mat4::from_quat(rotation.conjugate()),
            rotation,
        }
    }

    /// Direction the head is facing in world space
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }
}

impl Default for HeadPose {
    fn default() -> Self {
        Self::from_rotation(Quat::IDENTITY)
    }
}

/// Which viewpoint an [`Eye`] describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EyeType {
    Monocular,
    Left,
    Right,
}

/// Half-angles of an eye's view frustum, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldOfView {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl FieldOfView {
    pub fn symmetric(half_angle_degrees: f32) -> Self {
        Self {
            left: half_angle_degrees,
            right: half_angle_degrees,
            bottom: half_angle_degrees,
            top: half_angle_degrees,
        }
    }

    /// Off-axis OpenGL frustum for this field of view
    pub fn perspective(&self, z_near: f32, z_far: f32) -> Mat4 {
        let l = -self.left.to_radians().tan() * z_near;
        let r = self.right.to_radians().tan() * z_near;
        let b = -self.bottom.to_radians().tan() * z_near;
        let t = self.top.to_radians().tan() * z_near;
        frustum(l, r, b, t, z_near, z_far)
    }
}

impl Default for FieldOfView {
    fn default() -> Self {
        Self::symmetric(40.0)
    }
}

/// `glFrustum`-style projection matrix
fn frustum(l: f32, r: f32, b: f32, t: f32, n: f32, f: f32) -> Mat4 {
    let width = r - l;
    let height = t - b;
    let depth = f - n;
    Mat4::from_cols(
        Vec4::new(2.0 * n / width, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 2.0 * n / height, 0.0, 0.0),
        Vec4::new((r + l) / width, (t + b) / height, -(f + n) / depth, -1.0),
        Vec4::new(0.0, 0.0, -2.0 * f * n / depth, 0.0),
    )
}

/// One stereoscopic viewpoint for the current frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Eye {
    pub eye_type: EyeType,
    /// Head-to-eye view transform already combined with the head pose
    pub view: Mat4,
    pub fov: FieldOfView,
}

impl Eye {
    pub fn new(eye_type: EyeType, view: Mat4, fov: FieldOfView) -> Self {
        Self {
            eye_type,
            view,
            fov,
        }
    }

    pub fn perspective(&self, z_near: f32, z_far: f32) -> Mat4 {
        self.fov.perspective(z_near, z_far)
    }

    /// Left and right eyes offset by half the interpupillary distance
    pub fn stereo_pair(head: &HeadPose, ipd: f32, fov: FieldOfView) -> [Eye; 2] {
        let half = ipd * 0.5;
        let left = Mat4::from_translation(Vec3::new(half, 0.0, 0.0)) * head.head_view;
        let right = Mat4::from_translation(Vec3::new(-half, 0.0, 0.0)) * head.head_view;
        [
            Eye::new(EyeType::Left, left, fov),
            Eye::new(EyeType::Right, right, fov),
        ]
    }
}
