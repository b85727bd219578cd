//! Per-eye render pass
//!
//! Builds the matrices for one eye and hands them to a [`DrawSink`], which is
//! whatever actually talks to the graphics API.
//!
//! The scratch matrices live in [`EyeScratch`] and are shared by both eye
//! passes of a frame. Every pass overwrites them before reading, so there is
//! no data flowing from one eye to the next, but the pass must never be
//! entered reentrantly or from two threads at once.

use glam::{Mat4, Vec3, Vec4};

use crate::eye::Eye;
use crate::scene::SceneState;
use crate::{Result, Z_FAR, Z_NEAR};

/// Distance the camera sits behind the viewer position
pub const CAMERA_Z: f32 = 0.01;

/// The light stays just above the viewer
pub const LIGHT_POS_WORLD: Vec4 = Vec4::new(0.0, 2.0, 0.0, 1.0);

/// Vertex colour set used for a draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Palette {
    /// Per-face cube colours
    Cube,
    /// Gold cube shown while the viewer looks at it
    CubeFound,
    /// Floor grid
    Floor,
}

impl Palette {
    /// Representative RGBA colour (the found/floor palettes are uniform)
    pub fn tint(&self) -> Vec4 {
        match self {
            Palette::Cube => Vec4::new(0.0, 0.5273, 0.2656, 1.0),
            Palette::CubeFound => Vec4::new(1.0, 0.6523, 0.0, 1.0),
            Palette::Floor => Vec4::new(0.0, 0.3398, 0.9023, 1.0),
        }
    }
}

/// Everything a backend needs to issue one draw
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    pub palette: Palette,
    pub model: &'a Mat4,
    pub model_view: &'a Mat4,
    pub model_view_projection: &'a Mat4,
    /// Light position in eye space
    pub light_pos: Vec3,
}

/// Backend receiving draw calls for one eye
pub trait DrawSink {
    /// Called before any draw for `eye` (clear, depth test setup, ...)
    fn begin_eye(&mut self, _eye: &Eye) -> Result<()> {
        Ok(())
    }

    fn draw_cube(&mut self, call: &DrawCall<'_>) -> Result<()>;

    fn draw_floor(&mut self, call: &DrawCall<'_>) -> Result<()>;
}

/// Matrices reused across eye passes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeScratch {
    pub view: Mat4,
    pub model_view: Mat4,
    pub model_view_projection: Mat4,
    pub light_pos: Vec4,
}

impl Default for EyeScratch {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY,
            model_view: Mat4::IDENTITY,
            model_view_projection: Mat4::IDENTITY,
            light_pos: Vec4::ZERO,
        }
    }
}

/// Camera looking down -Z from just behind `viewer`
pub fn camera_at(viewer: Vec3, camera_z: f32) -> Mat4 {
    Mat4::look_at_rh(viewer + Vec3::new(0.0, 0.0, camera_z), viewer, Vec3::Y)
}

#[derive(Debug, Clone)]
pub struct FramePass {
    scratch: EyeScratch,
    light_pos_world: Vec4,
    z_near: f32,
    z_far: f32,
}

impl FramePass {
    pub fn new(light_pos_world: Vec4, z_near: f32, z_far: f32) -> Self {
        Self {
            scratch: EyeScratch::default(),
            light_pos_world,
            z_near,
            z_far,
        }
    }

    /// Scratch contents left by the most recent pass
    pub fn scratch(&self) -> &EyeScratch {
        &self.scratch
    }

    /// Render one eye: cube first, then floor
    ///
    /// `found` selects the highlighted cube palette.
    pub fn draw_eye(
        &mut self,
        eye: &Eye,
        camera: &Mat4,
        scene: &SceneState,
        found: bool,
        sink: &mut dyn DrawSink,
    ) -> Result<()> {
        sink.begin_eye(eye)?;

        let s = &mut self.scratch;
        s.view = eye.view * *camera;
        s.light_pos = s.view * self.light_pos_world;

        let perspective = eye.perspective(self.z_near, self.z_far);
        let light_pos = s.light_pos.truncate();

        let target = scene.target().model();
        s.model_view = s.view * *target;
        s.model_view_projection = perspective * s.model_view;
        sink.draw_cube(&DrawCall {
            palette: if found { Palette::CubeFound } else { Palette::Cube },
            model: target,
            model_view: &s.model_view,
            model_view_projection: &s.model_view_projection,
            light_pos,
        })?;

        let floor = scene.floor().model();
        s.model_view = s.view * *floor;
        s.model_view_projection = perspective * s.model_view;
        sink.draw_floor(&DrawCall {
            palette: Palette::Floor,
            model: floor,
            model_view: &s.model_view,
            model_view_projection: &s.model_view_projection,
            light_pos,
        })
    }
}

impl Default for FramePass {
    fn default() -> Self {
        Self::new(LIGHT_POS_WORLD, Z_NEAR, Z_FAR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eye::{EyeType, FieldOfView};

    #[derive(Default)]
    struct Capture {
        cubes: Vec<(Palette, Mat4)>,
        floors: Vec<(Palette, Mat4)>,
    }

    impl DrawSink for Capture {
        fn draw_cube(&mut self, call: &DrawCall<'_>) -> Result<()> {
            self.cubes.push((call.palette, *call.model_view_projection));
            Ok(())
        }

        fn draw_floor(&mut self, call: &DrawCall<'_>) -> Result<()> {
            self.floors.push((call.palette, *call.model_view_projection));
            Ok(())
        }
    }

    fn eye(view: Mat4) -> Eye {
        Eye::new(EyeType::Monocular, view, FieldOfView::default())
    }

    #[test]
    fn cube_then_floor_with_palettes() {
        let scene = SceneState::default();
        let mut pass = FramePass::default();
        let mut sink = Capture::default();
        let camera = camera_at(Vec3::ZERO, CAMERA_Z);

        pass.draw_eye(&eye(Mat4::IDENTITY), &camera, &scene, true, &mut sink).unwrap();
        pass.draw_eye(&eye(Mat4::IDENTITY), &camera, &scene, false, &mut sink).unwrap();

        assert_eq!(sink.cubes[0].0, Palette::CubeFound);
        assert_eq!(sink.cubes[1].0, Palette::Cube);
        assert!(sink.floors.iter().all(|(p, _)| *p == Palette::Floor));
    }

    #[test]
    fn mvp_composition() {
        let scene = SceneState::default();
        let mut pass = FramePass::default();
        let mut sink = Capture::default();
        let camera = camera_at(Vec3::ZERO, CAMERA_Z);
        let e = eye(Mat4::from_translation(Vec3::new(0.03, 0.0, 0.0)));

        pass.draw_eye(&e, &camera, &scene, false, &mut sink).unwrap();

        let view = e.view * camera;
        let projection = e.perspective(Z_NEAR, Z_FAR);
        let expected_cube = projection * view * *scene.target().model();
        let expected_floor = projection * view * *scene.floor().model();
        assert!(sink.cubes[0].1.abs_diff_eq(expected_cube, 1e-5));
        assert!(sink.floors[0].1.abs_diff_eq(expected_floor, 1e-5));
        // Scratch holds the floor pass last
        assert!(pass.scratch().model_view_projection.abs_diff_eq(expected_floor, 1e-5));
    }

    #[test]
    fn light_is_transformed_into_eye_space() {
        let scene = SceneState::default();
        let mut pass = FramePass::default();
        let mut sink = Capture::default();
        let camera = camera_at(Vec3::ZERO, CAMERA_Z);

        pass.draw_eye(&eye(Mat4::IDENTITY), &camera, &scene, false, &mut sink).unwrap();

        let light = pass.scratch().light_pos;
        assert!(light.abs_diff_eq(Vec4::new(0.0, 2.0, -CAMERA_Z, 1.0), 1e-5));
    }

    #[test]
    fn camera_follows_viewer() {
        let camera = camera_at(Vec3::new(0.0, 0.0, 1.5), CAMERA_Z);
        let p = camera.transform_point3(Vec3::new(0.0, 0.0, 1.5));
        assert!(p.abs_diff_eq(Vec3::new(0.0, 0.0, -CAMERA_Z), 1e-5));
    }
}
