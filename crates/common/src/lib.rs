//! Shared types for the reveal workspace.
//!
//! Everything here is plain data measured in pixels; no crate in this layer
//! touches the GPU or the window.

pub mod types;

pub use types::{PlaneTransform, Rect, Viewport, ViewportError};
