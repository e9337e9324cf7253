use glam::{Vec2, Vec4};

/// Values written once per frame and read by every plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SharedUniforms {
    /// Accumulated time; drives the base animation.
    pub time: f32,
    /// Debug-panel progress, in `[0, 1]`.
    pub progress: f32,
    /// Corner reveal amounts: x = top-left, y = top-right, z = bottom-left, w = bottom-right.
    pub corners: Vec4,
    /// Viewport size in pixels.
    pub resolution: Vec2,
}

impl Default for SharedUniforms {
    fn default() -> Self {
        Self {
            time: 1.0,
            progress: 0.0,
            corners: Vec4::ZERO,
            resolution: Vec2::ONE,
        }
    }
}

/// Per-binding values. Each binding owns one of these; the shader program is shared.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneUniforms {
    /// On-screen size of the plane at rest, in pixels.
    pub quad_size: Vec2,
    /// Size the texture is fitted against when sampling.
    pub texture_size: Vec2,
}

impl Default for PlaneUniforms {
    fn default() -> Self {
        Self {
            quad_size: Vec2::new(300.0, 300.0),
            texture_size: Vec2::new(100.0, 100.0),
        }
    }
}

impl PlaneUniforms {
    /// Both sizes set to the measured element size.
    pub fn sized(size: Vec2) -> Self {
        Self {
            quad_size: size,
            texture_size: size,
        }
    }
}
