//! Randomized relocation of the target
//!
//! The target is swung around the viewer's vertical axis by 90 to 270 degrees
//! (so it ends up out of sight), pushed to a new distance, and lifted or
//! lowered by up to 40 degrees of elevation.

use glam::{Mat4, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::scene::{SceneState, Target};
use crate::{MAX_DISTANCE, MIN_DISTANCE};

/// Azimuth range in degrees, measured around +Y
pub const AZIMUTH_RANGE: (f32, f32) = (90.0, 270.0);

/// Elevation range in degrees
pub const ELEVATION_RANGE: (f32, f32) = (-40.0, 40.0);

/// The three random quantities behind one relocation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepositionDraw {
    /// Rotation around the vertical axis, in [90, 270) degrees
    pub angle_xz_degrees: f32,
    /// New distance from the viewer, in [min, max)
    pub distance: f32,
    /// Elevation angle, in [-40, 40) degrees
    pub angle_y_degrees: f32,
}

impl RepositionDraw {
    pub fn sample<R: Rng + ?Sized>(rng: &mut R, min_distance: f32, max_distance: f32) -> Self {
        let distance = if max_distance > min_distance {
            rng.random_range(min_distance..max_distance)
        } else {
            min_distance
        };
        Self {
            angle_xz_degrees: rng.random_range(AZIMUTH_RANGE.0..AZIMUTH_RANGE.1),
            distance,
            angle_y_degrees: rng.random_range(ELEVATION_RANGE.0..ELEVATION_RANGE.1),
        }
    }

    /// New target position produced by this draw
    ///
    /// The current translation is rotated around +Y and rescaled by
    /// `distance / target.distance()`; the height is then replaced by
    /// `tan(angle_y) * distance`.
    pub fn apply(&self, target: &Target) -> Vec3 {
        let scale = self.distance / target.distance();
        let transform = Mat4::from_axis_angle(Vec3::Y, self.angle_xz_degrees.to_radians())
            * Mat4::from_scale(Vec3::splat(scale));
        let swung = transform.transform_point3(target.position());
        let y = self.angle_y_degrees.to_radians().tan() * self.distance;
        Vec3::new(swung.x, y, swung.z)
    }

    /// Move the scene's target to the position this draw produces
    pub fn relocate(&self, scene: &mut SceneState) -> Vec3 {
        let position = self.apply(scene.target());
        trace!(
            "Reposition: azimuth {:.1} deg, elevation {:.1} deg, distance {:.2}",
            self.angle_xz_degrees,
            self.angle_y_degrees,
            self.distance
        );
        scene.relocate(position, self.distance);
        position
    }
}

/// Picks new target placements from a random source
#[derive(Debug, Clone)]
pub struct Repositioner<R = StdRng> {
    rng: R,
    min_distance: f32,
    max_distance: f32,
}

impl Repositioner<StdRng> {
    /// Deterministic repositioner for replays and tests
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Repositioner seeded from the operating system
    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> Repositioner<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            min_distance: MIN_DISTANCE,
            max_distance: MAX_DISTANCE,
        }
    }

    /// Override the distance band targets are placed in
    pub fn with_distance_range(mut self, min_distance: f32, max_distance: f32) -> Self {
        self.min_distance = min_distance;
        self.max_distance = max_distance;
        self
    }

    pub fn distance_range(&self) -> (f32, f32) {
        (self.min_distance, self.max_distance)
    }

    pub fn draw(&mut self) -> RepositionDraw {
        RepositionDraw::sample(&mut self.rng, self.min_distance, self.max_distance)
    }

    /// Relocate the scene's target with a fresh draw and return its new position
    pub fn reposition(&mut self, scene: &mut SceneState) -> Vec3 {
        let draw = self.draw();
        draw.relocate(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_turn_pushes_target_behind_viewer() {
        let mut scene = SceneState::default();
        let draw = RepositionDraw {
            angle_xz_degrees: 180.0,
            distance: 5.0,
            angle_y_degrees: 0.0,
        };

        let position = draw.relocate(&mut scene);

        assert!(position.x.abs() < 1e-4);
        assert!(position.y.abs() < 1e-6);
        assert!((position.z - 5.0).abs() < 1e-4);
        assert_eq!(scene.target().distance(), 5.0);
        assert_eq!(scene.target().position(), position);
    }

    #[test]
    fn elevation_sets_height() {
        let scene = SceneState::default();
        let draw = RepositionDraw {
            angle_xz_degrees: 90.0,
            distance: 4.0,
            angle_y_degrees: 30.0,
        };
        let position = draw.apply(scene.target());
        assert!((position.y - 30f32.to_radians().tan() * 4.0).abs() < 1e-5);
    }

    #[test]
    fn sampled_draws_stay_in_range() {
        let mut repositioner = Repositioner::seeded(7);
        for _ in 0..1000 {
            let draw = repositioner.draw();
            assert!((90.0..270.0).contains(&draw.angle_xz_degrees));
            assert!((MIN_DISTANCE..MAX_DISTANCE).contains(&draw.distance));
            assert!((-40.0..40.0).contains(&draw.angle_y_degrees));
        }
    }

    #[test]
    fn repeated_repositions_keep_distance_invariant() {
        let mut scene = SceneState::default();
        let mut repositioner = Repositioner::seeded(42);
        for _ in 0..500 {
            let position = repositioner.reposition(&mut scene);
            let distance = scene.target().distance();
            assert!((MIN_DISTANCE..MAX_DISTANCE).contains(&distance));
            assert!(position.y.abs() <= distance);
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Repositioner::seeded(99);
        let mut b = Repositioner::seeded(99);
        for _ in 0..10 {
            assert_eq!(a.draw(), b.draw());
        }
    }

    #[test]
    fn degenerate_range_uses_minimum() {
        let mut repositioner = Repositioner::seeded(1).with_distance_range(4.0, 4.0);
        assert_eq!(repositioner.draw().distance, 4.0);
    }
}
