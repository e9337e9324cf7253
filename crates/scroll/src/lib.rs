//! Smooth scroll: an eased scroll position that is stepped by its owner.
//!
//! # Invariants
//! - The scroller never schedules its own frames; `update` is called once per
//!   frame by whoever drives the scene.
//! - The target offset always lies in `[0, limit]`.
//! - Reading the offset never mutates state.

mod smooth;

pub use smooth::{ScrollConfig, ScrollStats, SmoothScroll};

pub fn crate_info() -> &'static str {
    "reveal-scroll v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("scroll"));
    }
}
