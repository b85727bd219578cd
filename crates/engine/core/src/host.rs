//! Capability traits a rendering host calls into
//!
//! A host owns the window, the graphics context and the frame clock. It drives
//! a renderer through these hooks in a fixed order:
//!
//! 1. [`FrameRenderer::on_surface_created`] once, before the first frame
//! 2. per frame: [`FrameRenderer::on_new_frame`], then
//!    [`FrameRenderer::on_draw_eye`] once per eye, then
//!    [`FrameRenderer::on_finish_frame`]
//! 3. [`FrameRenderer::on_renderer_shutdown`] once at the end
//!
//! All hooks run on the render thread.

use crate::eye::{Eye, HeadPose};
use crate::frame::DrawSink;
use crate::Result;

/// Stereo rendering lifecycle
pub trait FrameRenderer {
    /// Create per-surface resources and start background setup work
    fn on_surface_created(&mut self) -> Result<()>;

    fn on_surface_changed(&mut self, _width: u32, _height: u32) {}

    /// Advance per-frame state with the head pose for this frame
    fn on_new_frame(&mut self, head: &HeadPose) -> Result<()>;

    /// Draw the scene for one eye
    fn on_draw_eye(&mut self, eye: &Eye, sink: &mut dyn DrawSink) -> Result<()>;

    fn on_finish_frame(&mut self) {}

    fn on_renderer_shutdown(&mut self) {}

    fn on_pause(&mut self) {}

    fn on_resume(&mut self) {}
}

/// Discrete hardware trigger (headset button, controller click)
pub trait TriggerListener {
    fn on_trigger(&mut self);
}
