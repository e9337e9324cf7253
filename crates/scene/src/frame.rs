use glam::{Mat4, Vec3};

use crate::uniforms::{PlaneUniforms, SharedUniforms};

/// Camera state a renderer needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub view_proj: Mat4,
    pub position: Vec3,
    pub fov_degrees: f32,
    pub aspect: f32,
}

/// One plane to draw with the shared geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneDraw {
    /// Mirrored element (and texture slot). `None` for decorative content.
    pub element: Option<usize>,
    pub model: Mat4,
    pub uniforms: PlaneUniforms,
}

/// Read-only snapshot of everything submitted to the renderer for a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameView {
    pub frame: u64,
    pub camera: CameraView,
    pub shared: SharedUniforms,
    pub planes: Vec<PlaneDraw>,
}

impl FrameView {
    pub fn bound_planes(&self) -> impl Iterator<Item = &PlaneDraw> {
        self.planes.iter().filter(|p| p.element.is_some())
    }
}
