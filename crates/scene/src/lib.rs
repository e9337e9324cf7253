//! Scene synchroniser: the per-frame loop that keeps textured planes aligned
//! with the boxes of the elements they mirror.
//!
//! # Invariants
//! - The number of image bindings is fixed once the synchroniser is built.
//! - Plane geometry is shared; every binding owns its own uniform record.
//! - Only `tick` and `resize` mutate bindings, both on the caller's thread.
//! - One scene unit is one viewport pixel at the camera's focal plane.

pub mod binding;
pub mod camera;
pub mod config;
pub mod frame;
pub mod layout;
pub mod scheduler;
pub mod sync;
pub mod uniforms;

pub use binding::{Decoration, ImageBinding};
pub use camera::{PixelCamera, fov_for_height};
pub use config::{
    CameraConfig, ConfigError, DecorationConfig, GalleryConfig, RevealConfig, SceneConfig,
};
pub use frame::{CameraView, FrameView, PlaneDraw};
pub use layout::{ElementSource, FixedElements, GalleryLayout};
pub use scheduler::{FrameLoop, FrameSource, FrameTick, FrameTimer, ManualClock, SystemClock};
pub use sync::{SceneError, SceneSync, reveal_timeline};
pub use uniforms::{PlaneUniforms, SharedUniforms};
