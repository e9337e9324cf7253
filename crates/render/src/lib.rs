//! Rendering adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers read a [`reveal_scene::FrameView`]; they never reach back into
//!   the synchroniser.
//! - Everything a frame needs (camera, shared uniforms, per-plane records) is
//!   in the view, so any backend can be swapped in without touching the scene.

mod renderer;

pub use renderer::{DebugTextRenderer, Renderer};

pub fn crate_info() -> &'static str {
    "reveal-render v0.1.0"
}
