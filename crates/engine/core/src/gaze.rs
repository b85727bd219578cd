//! Gaze cone test
//!
//! The viewer is "looking at" the target when the target's head-relative
//! position lies inside a symmetric angular cone around the forward (-Z) axis.
//! Projection and viewport play no part in the test.

use glam::{Mat4, Vec3};

/// Default pitch limit in radians (about 6.88 degrees)
pub const PITCH_LIMIT: f32 = 0.12;

/// Default yaw limit in radians (about 6.88 degrees)
pub const YAW_LIMIT: f32 = 0.12;

/// Angular offset of a head-relative point from the forward axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GazeAngles {
    /// Vertical offset, `atan2(y, -z)`
    pub pitch: f32,
    /// Horizontal offset, `atan2(x, -z)`
    pub yaw: f32,
}

impl GazeAngles {
    pub fn from_head_relative(position: Vec3) -> Self {
        Self {
            pitch: position.y.atan2(-position.z),
            yaw: position.x.atan2(-position.z),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GazeEvaluator {
    pitch_limit: f32,
    yaw_limit: f32,
}

impl GazeEvaluator {
    pub fn new(pitch_limit: f32, yaw_limit: f32) -> Self {
        Self {
            pitch_limit,
            yaw_limit,
        }
    }

    pub fn pitch_limit(&self) -> f32 {
        self.pitch_limit
    }

    pub fn yaw_limit(&self) -> f32 {
        self.yaw_limit
    }

    /// Target origin expressed in head space
    pub fn head_relative(head_view: &Mat4, model: &Mat4) -> Vec3 {
        (*head_view * *model).transform_point3(Vec3::ZERO)
    }

    /// Angles of the target relative to the current gaze direction
    pub fn angles(&self, head_view: &Mat4, model: &Mat4) -> GazeAngles {
        GazeAngles::from_head_relative(Self::head_relative(head_view, model))
    }

    /// Whether the angles fall strictly inside the cone
    pub fn contains(&self, angles: GazeAngles) -> bool {
        angles.pitch.abs() < self.pitch_limit && angles.yaw.abs() < self.yaw_limit
    }

    /// Is the viewer looking at the object placed by `model`?
    pub fn is_looking_at(&self, head_view: &Mat4, model: &Mat4) -> bool {
        self.contains(self.angles(head_view, model))
    }
}

impl Default for GazeEvaluator {
    fn default() -> Self {
        Self::new(PITCH_LIMIT, YAW_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    fn at(position: Vec3) -> Mat4 {
        Mat4::from_translation(position)
    }

    #[test]
    fn straight_ahead_is_on_target() {
        let gaze = GazeEvaluator::default();
        assert!(gaze.is_looking_at(&Mat4::IDENTITY, &at(Vec3::new(0.0, 0.0, -3.5))));
    }

    #[test]
    fn behind_viewer_is_off_target() {
        let gaze = GazeEvaluator::default();
        assert!(!gaze.is_looking_at(&Mat4::IDENTITY, &at(Vec3::new(0.0, 0.0, 3.5))));
    }

    #[test]
    fn cone_is_symmetric() {
        let gaze = GazeEvaluator::default();
        let z = -5.0_f32;
        // tan(0.11) and tan(0.13) bracket the 0.12 limit
        let inside = 0.11_f32.tan() * -z;
        let outside = 0.13_f32.tan() * -z;

        for sign in [1.0_f32, -1.0] {
            assert!(gaze.is_looking_at(&Mat4::IDENTITY, &at(Vec3::new(sign * inside, 0.0, z))));
            assert!(gaze.is_looking_at(&Mat4::IDENTITY, &at(Vec3::new(0.0, sign * inside, z))));
            assert!(!gaze.is_looking_at(&Mat4::IDENTITY, &at(Vec3::new(sign * outside, 0.0, z))));
            assert!(!gaze.is_looking_at(&Mat4::IDENTITY, &at(Vec3::new(0.0, sign * outside, z))));
        }
    }

    #[test]
    fn both_axes_must_be_inside() {
        let gaze = GazeEvaluator::default();
        let z = -4.0_f32;
        let inside = 0.1_f32.tan() * -z;
        let outside = 0.2_f32.tan() * -z;
        assert!(gaze.is_looking_at(&Mat4::IDENTITY, &at(Vec3::new(inside, inside, z))));
        assert!(!gaze.is_looking_at(&Mat4::IDENTITY, &at(Vec3::new(inside, outside, z))));
        assert!(!gaze.is_looking_at(&Mat4::IDENTITY, &at(Vec3::new(outside, inside, z))));
    }

    #[test]
    fn head_turn_moves_target_out_of_cone() {
        let gaze = GazeEvaluator::default();
        let target = at(Vec3::new(0.0, 0.0, -3.5));

        // Head yawed 30 degrees to the left; head view is the inverse orientation.
        let head = Quat::from_rotation_y(30f32.to_radians());
        let head_view = Mat4::from_quat(head.inverse());
        assert!(!gaze.is_looking_at(&head_view, &target));

        let angles = gaze.angles(&head_view, &target);
        assert!((angles.yaw - 30f32.to_radians()).abs() < 1e-4);
    }

    #[test]
    fn spin_does_not_affect_result() {
        let gaze = GazeEvaluator::default();
        let model = at(Vec3::new(0.0, 0.0, -3.5)) * Mat4::from_axis_angle(Vec3::ONE.normalize(), 1.3);
        assert!(gaze.is_looking_at(&Mat4::IDENTITY, &model));
    }
}
