//! Tween timeline: tweens placed on a shared time axis, sampled by seeking.
//!
//! A timeline is never played by a clock here. Callers seek it to a time or a
//! normalised progress and read the resulting channel values, which makes every
//! sample a pure function of the seek position.

mod ease;
mod timeline;

pub use ease::{Ease, ParseEaseError};
pub use timeline::{Channel, Timeline, Tween};
