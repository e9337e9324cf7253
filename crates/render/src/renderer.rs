use reveal_scene::FrameView;
use std::fmt::Write;

/// Renderer-agnostic interface. All frame consumers implement this trait.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from its view.
    fn render(&self, frame: &FrameView) -> Self::Output;
}

/// Text renderer for the CLI, logs and tests.
///
/// Produces one header block and one line per plane.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// Include the shared uniforms block.
    pub show_uniforms: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self {
            show_uniforms: true,
        }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, frame: &FrameView) -> String {
        let mut out = String::new();
        let cam = &frame.camera;
        let shared = &frame.shared;

        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "=== Frame {} ({} planes) ===",
            frame.frame,
            frame.planes.len()
        );
        let _ = writeln!(
            out,
            "Camera: z={:.1} fov={:.2} aspect={:.3}",
            cam.position.z, cam.fov_degrees, cam.aspect
        );
        if self.show_uniforms {
            let _ = writeln!(
                out,
                "Uniforms: time={:.2} progress={:.3} corners=({:.3}, {:.3}, {:.3}, {:.3}) resolution={}x{}",
                shared.time,
                shared.progress,
                shared.corners.x,
                shared.corners.y,
                shared.corners.z,
                shared.corners.w,
                shared.resolution.x,
                shared.resolution.y,
            );
        }

        for plane in &frame.planes {
            let (scale, _, pos) = plane.model.to_scale_rotation_translation();
            let label = match plane.element {
                Some(i) => format!("image {i:>2}"),
                None => "decoration".to_string(),
            };
            let _ = writeln!(
                out,
                "  [{label}] pos=({:.1}, {:.1}) size={:.0}x{:.0} quad={:.0}x{:.0}",
                pos.x,
                pos.y,
                scale.x,
                scale.y,
                plane.uniforms.quad_size.x,
                plane.uniforms.quad_size.y,
            );
        }

        tracing::trace!(bytes = out.len(), "debug frame rendered");
        out
    }
}
