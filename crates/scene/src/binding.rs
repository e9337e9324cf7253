use glam::{EulerRot, Quat, Vec3};
use reveal_common::{PlaneTransform, Rect, Viewport};

use crate::config::DecorationConfig;
use crate::uniforms::PlaneUniforms;

/// A tracked element paired with the plane that overlays it.
///
/// `bounds.left` is kept in document space (client left plus the scroll
/// offset at measure time), so positioning only has to subtract the current
/// scroll offset.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBinding {
    element: usize,
    bounds: Rect,
    transform: PlaneTransform,
    uniforms: PlaneUniforms,
}

impl ImageBinding {
    /// Bind element `element` whose client box is `client` while scrolled to `scroll`.
    pub fn new(element: usize, client: Rect, scroll: f32) -> Self {
        let mut binding = Self {
            element,
            bounds: Rect::default(),
            transform: PlaneTransform::default(),
            uniforms: PlaneUniforms::default(),
        };
        binding.remeasure(client, scroll);
        binding
    }

    /// Index of the mirrored element; also its texture slot.
    pub fn element(&self) -> usize {
        self.element
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn transform(&self) -> &PlaneTransform {
        &self.transform
    }

    pub fn uniforms(&self) -> &PlaneUniforms {
        &self.uniforms
    }

    /// Take a fresh client box: updates bounds, scale and size uniforms.
    pub fn remeasure(&mut self, client: Rect, scroll: f32) {
        self.bounds = client.offset_x(scroll);
        self.transform.scale = Vec3::new(client.width, client.height, 1.0);
        self.uniforms = PlaneUniforms::sized(client.size());
    }

    /// Put the plane centre over the element's current on-screen centre.
    pub fn place(&mut self, scroll: f32, viewport: Viewport) {
        let b = &self.bounds;
        self.transform.position.x = -scroll + b.left - viewport.width / 2.0 + b.width / 2.0;
        self.transform.position.y = -b.top + viewport.height / 2.0 - b.height / 2.0;
    }
}

/// Sample plane that spins with the time accumulator. Not bound to an element.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoration {
    transform: PlaneTransform,
    uniforms: PlaneUniforms,
    rate_x: f32,
    rate_y: f32,
}

impl Decoration {
    pub fn new(config: &DecorationConfig) -> Self {
        Self {
            transform: PlaneTransform {
                position: Vec3::new(config.offset_x, 0.0, 0.0),
                rotation: Quat::IDENTITY,
                scale: Vec3::new(config.size, config.size, 1.0),
            },
            uniforms: PlaneUniforms::default(),
            rate_x: config.rate_x,
            rate_y: config.rate_y,
        }
    }

    pub fn transform(&self) -> &PlaneTransform {
        &self.transform
    }

    pub fn uniforms(&self) -> &PlaneUniforms {
        &self.uniforms
    }

    /// Set the rotation from accumulated time.
    pub fn spin(&mut self, time: f32) {
        self.transform.rotation =
            Quat::from_euler(EulerRot::XYZ, time * self.rate_x, time * self.rate_y, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0).unwrap()
    }

    #[test]
    fn place_centres_plane_on_element() {
        let mut b = ImageBinding::new(0, Rect::new(100.0, 50.0, 200.0, 80.0), 0.0);
        b.place(0.0, viewport());
        assert_eq!(b.transform().position.x, -250.0);
        assert_eq!(b.transform().position.y, 160.0);
    }

    #[test]
    fn remeasure_stores_document_left() {
        let b = ImageBinding::new(3, Rect::new(0.0, 10.0, 120.0, 90.0), 40.0);
        assert_eq!(b.element(), 3);
        assert_eq!(b.bounds().left, 50.0);
        assert_eq!(b.transform().scale, Vec3::new(120.0, 90.0, 1.0));
        assert_eq!(b.uniforms().quad_size, Vec2::new(120.0, 90.0));
        assert_eq!(b.uniforms().texture_size, Vec2::new(120.0, 90.0));
    }

    #[test]
    fn decoration_spins_on_both_axes() {
        let mut d = Decoration::new(&DecorationConfig::default());
        d.spin(0.0);
        assert_eq!(d.transform().rotation, Quat::IDENTITY);
        d.spin(100.0);
        let (x, y, z) = d.transform().rotation.to_euler(EulerRot::XYZ);
        assert!((x - 0.05).abs() < 1e-5);
        assert!((y - 0.1).abs() < 1e-5);
        assert!(z.abs() < 1e-5);
    }
}
