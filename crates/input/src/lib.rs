//! Input: wheel and key events mapped to scene actions.
//!
//! # Invariants
//! - The windowing layer produces [`Action`]s; the scene never sees raw events.
//! - Both wheel axes feed horizontal scroll.

pub mod action;
pub mod mapper;

pub use action::Action;
pub use mapper::{InputMapper, Key, WheelDelta};
