use glam::{Mat4, Vec3};
use reveal_common::Viewport;

use crate::config::CameraConfig;

/// Vertical field of view, in degrees, at which a plane `distance` away spans
/// exactly `height` pixels.
pub fn fov_for_height(height: f32, distance: f32) -> f32 {
    2.0 * ((height / 2.0) / distance).atan().to_degrees()
}

/// Perspective camera fitted so that one scene unit at z = 0 is one pixel.
///
/// The camera sits on +Z at `distance` and looks at the origin. Keeping the
/// field of view tied to the viewport height lets DOM-sized planes keep their
/// pixel size while still being projected in perspective.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelCamera {
    pub distance: f32,
    pub near: f32,
    pub far: f32,
    fov_degrees: f32,
    aspect: f32,
}

impl PixelCamera {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            distance: config.distance,
            near: config.near,
            far: config.far,
            fov_degrees: 30.0,
            aspect: 1.0,
        }
    }

    /// Match aspect and field of view to the viewport.
    pub fn fit(&mut self, viewport: Viewport) {
        self.aspect = viewport.aspect();
        self.fov_degrees = fov_for_height(viewport.height, self.distance);
    }

    pub fn fov_degrees(&self) -> f32 {
        self.fov_degrees
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.distance)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), Vec3::ZERO, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}
