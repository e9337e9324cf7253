use glam::Vec4;
use serde::{Deserialize, Serialize};

use crate::ease::Ease;

/// One component of the animated `Vec4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    X,
    Y,
    Z,
    W,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::X, Channel::Y, Channel::Z, Channel::W];

    pub fn index(self) -> usize {
        match self {
            Channel::X => 0,
            Channel::Y => 1,
            Channel::Z => 2,
            Channel::W => 3,
        }
    }
}

/// A single interpolation of one channel between `start` and `start + duration`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    pub channel: Channel,
    pub from: f32,
    pub to: f32,
    pub start: f32,
    pub duration: f32,
    pub ease: Ease,
}

impl Tween {
    pub fn end(&self) -> f32 {
        self.start + self.duration
    }

    /// Local progress in `[0, 1]` at timeline time `t`.
    pub fn local_progress(&self, t: f32) -> f32 {
        if self.duration <= 0.0 {
            return if t >= self.start { 1.0 } else { 0.0 };
        }
        ((t - self.start) / self.duration).clamp(0.0, 1.0)
    }

    /// Channel value at timeline time `t`, clamped outside the tween's window.
    pub fn value_at(&self, t: f32) -> f32 {
        let k = self.ease.apply(self.local_progress(t));
        self.from + (self.to - self.from) * k
    }
}

/// Tweens over the four channels of a `Vec4`, sampled by seeking.
///
/// Placement follows the usual timeline convention: a tween without an
/// explicit position is appended at the current end, a tween with a position
/// starts exactly there and may overlap earlier ones.
#[derive(Debug, Clone)]
pub struct Timeline {
    initial: Vec4,
    tweens: Vec<Tween>,
    end: f32,
    ease: Ease,
    playhead: f32,
    values: Vec4,
}

impl Timeline {
    /// Empty timeline whose channels start at `initial`.
    pub fn new(initial: Vec4) -> Self {
        Self {
            initial,
            tweens: Vec::new(),
            end: 0.0,
            ease: Ease::Linear,
            playhead: 0.0,
            values: initial,
        }
    }

    /// Ease used by tweens added after this call.
    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Tween `channel` to `value` over `duration`.
    ///
    /// `position` of `None` appends at the current end of the timeline.
    /// The tween starts from wherever the previous tween on the same channel
    /// ends, or from the initial value.
    pub fn to(mut self, channel: Channel, value: f32, duration: f32, position: Option<f32>) -> Self {
        let start = position.unwrap_or(self.end).max(0.0);
        let from = self
            .tweens
            .iter()
            .rev()
            .find(|tw| tw.channel == channel)
            .map_or(self.initial[channel.index()], |tw| tw.to);

        let tween = Tween {
            channel,
            from,
            to: value,
            start,
            duration: duration.max(0.0),
            ease: self.ease,
        };
        self.end = self.end.max(tween.end());
        self.tweens.push(tween);
        self
    }

    /// Total length: the end of the latest-ending tween.
    pub fn duration(&self) -> f32 {
        self.end
    }

    pub fn tweens(&self) -> &[Tween] {
        &self.tweens
    }

    /// Values produced by the last seek.
    pub fn values(&self) -> Vec4 {
        self.values
    }

    /// Playhead position in timeline time.
    pub fn time(&self) -> f32 {
        self.playhead
    }

    /// Playhead position normalised by `duration`.
    pub fn progress(&self) -> f32 {
        if self.end <= 0.0 {
            return 0.0;
        }
        self.playhead / self.end
    }

    /// Pure sample at timeline time `t`; does not move the playhead.
    pub fn sample(&self, t: f32) -> Vec4 {
        let mut out = self.initial;
        for tween in &self.tweens {
            if t >= tween.start {
                out[tween.channel.index()] = tween.value_at(t);
            }
        }
        out
    }

    /// Move the playhead to `t` (clamped to the timeline) and return the values.
    pub fn seek(&mut self, t: f32) -> Vec4 {
        self.playhead = t.clamp(0.0, self.end);
        self.values = self.sample(self.playhead);
        self.values
    }

    /// Move the playhead to `progress * duration`. Progress is clamped to `[0, 1]`.
    pub fn seek_progress(&mut self, progress: f32) -> Vec4 {
        let p = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
        self.seek(p * self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corners() -> Timeline {
        Timeline::new(Vec4::ZERO)
            .to(Channel::X, 1.0, 1.0, None)
            .to(Channel::Y, 1.0, 1.0, Some(0.1))
            .to(Channel::Z, 1.0, 1.0, Some(0.2))
            .to(Channel::W, 1.0, 1.0, Some(0.3))
    }

    fn close(a: Vec4, b: Vec4) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn overlapping_placement() {
        let tl = corners();
        let starts: Vec<f32> = tl.tweens().iter().map(|t| t.start).collect();
        assert_eq!(starts, vec![0.0, 0.1, 0.2, 0.3]);
        assert!((tl.duration() - 1.3).abs() < 1e-6);
    }

    #[test]
    fn appended_tweens_are_sequential() {
        let tl = Timeline::new(Vec4::ZERO)
            .to(Channel::X, 1.0, 0.5, None)
            .to(Channel::Y, 1.0, 0.5, None);
        assert_eq!(tl.tweens()[1].start, 0.5);
        assert_eq!(tl.duration(), 1.0);
    }

    #[test]
    fn progress_endpoints() {
        let mut tl = corners();
        assert_eq!(tl.seek_progress(0.0), Vec4::ZERO);
        assert!(close(tl.seek_progress(1.0), Vec4::ONE));
        assert!((tl.progress() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn intermediate_progress_interpolates_each_window() {
        let mut tl = corners();
        let v = tl.seek_progress(0.5);
        // playhead = 0.65
        assert!(close(v, Vec4::new(0.65, 0.55, 0.45, 0.35)));
    }

    #[test]
    fn channels_clamp_before_their_window() {
        let mut tl = corners();
        let v = tl.seek_progress(0.05);
        // playhead = 0.065: only X has started
        assert!((v.x - 0.065).abs() < 1e-5);
        assert_eq!(v.y, 0.0);
        assert_eq!(v.z, 0.0);
        assert_eq!(v.w, 0.0);
    }

    #[test]
    fn channels_clamp_after_their_window() {
        let tl = corners();
        let v = tl.sample(1.15);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 1.0);
        assert!((v.z - 0.95).abs() < 1e-5);
        assert!((v.w - 0.85).abs() < 1e-5);
    }

    #[test]
    fn seeking_is_monotonic() {
        let mut tl = corners();
        let mut prev = Vec4::ZERO;
        for i in 0..=100 {
            let v = tl.seek_progress(i as f32 / 100.0);
            assert!(v.cmpge(prev - Vec4::splat(1e-6)).all());
            prev = v;
        }
    }

    #[test]
    fn progress_out_of_range_is_clamped() {
        let mut tl = corners();
        assert_eq!(tl.seek_progress(-1.0), Vec4::ZERO);
        assert!(close(tl.seek_progress(4.0), Vec4::ONE));
        assert_eq!(tl.seek_progress(f32::NAN), Vec4::ZERO);
    }

    #[test]
    fn chained_tweens_continue_from_previous_value() {
        let mut tl = Timeline::new(Vec4::ZERO)
            .to(Channel::X, 1.0, 1.0, None)
            .to(Channel::X, 0.0, 1.0, None);
        assert_eq!(tl.tweens()[1].from, 1.0);
        assert!((tl.seek(1.5).x - 0.5).abs() < 1e-6);
        assert_eq!(tl.seek(2.0).x, 0.0);
    }

    #[test]
    fn ease_applies_to_later_tweens() {
        let tl = Timeline::new(Vec4::ZERO)
            .to(Channel::X, 1.0, 1.0, None)
            .with_ease(Ease::Power1Out)
            .to(Channel::Y, 1.0, 1.0, Some(0.0));
        let v = tl.sample(0.5);
        assert_eq!(v.x, 0.5);
        assert_eq!(v.y, 0.75);
    }
}
