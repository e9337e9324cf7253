use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned box in pixels, measured from the top-left of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(top: f32, left: f32, width: f32, height: f32) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    /// Same box shifted horizontally by `dx` pixels.
    pub fn offset_x(self, dx: f32) -> Self {
        Self {
            left: self.left + dx,
            ..self
        }
    }
}

/// Errors from viewport validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ViewportError {
    #[error("viewport has zero or invalid size: {width}x{height}")]
    Degenerate { width: f32, height: f32 },
}

/// Drawable area in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Build a viewport, rejecting zero, negative and non-finite sizes.
    pub fn new(width: f32, height: f32) -> Result<Self, ViewportError> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(ViewportError::Degenerate { width, height });
        }
        Ok(Self { width, height })
    }

    /// Convenience for window sizes reported in whole pixels.
    pub fn from_pixels(width: u32, height: u32) -> Result<Self, ViewportError> {
        Self::new(width as f32, height as f32)
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Position, rotation, scale of a plane in scene units (one unit = one pixel).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for PlaneTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl PlaneTransform {
    pub fn matrix(&self) -> glam::Mat4 {
        glam::Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_default_is_identity() {
        let t = PlaneTransform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.matrix(), glam::Mat4::IDENTITY);
    }

    #[test]
    fn viewport_rejects_zero_height() {
        assert!(Viewport::new(800.0, 0.0).is_err());
        assert!(Viewport::new(0.0, 600.0).is_err());
        assert!(Viewport::new(f32::NAN, 600.0).is_err());
    }

    #[test]
    fn viewport_aspect() {
        let v = Viewport::from_pixels(800, 600).unwrap();
        assert!((v.aspect() - 4.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn rect_offset_keeps_size() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0).offset_x(5.0);
        assert_eq!(r.left, 25.0);
        assert_eq!(r.size(), Vec2::new(30.0, 40.0));
        assert_eq!(r.right(), 55.0);
    }
}
