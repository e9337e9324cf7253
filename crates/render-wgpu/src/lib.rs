//! wgpu render backend for the reveal scene.
//!
//! Draws every plane from one shared subdivided quad with one pipeline. The
//! per-image record (model matrix, quad size, texture size) travels as
//! instance data; the texture is the only per-plane bind group.
//!
//! # Invariants
//! - Renderer never mutates scene state; it only consumes frame views.
//! - Plane geometry is uploaded once and shared by every draw.
//! - Scene ticks are driven by the host, not by the renderer.

mod gpu;
mod mesh;
mod shaders;

pub use gpu::PlaneRenderer;
pub use mesh::{PLANE_SEGMENTS, PlaneVertex, plane_mesh};
