use serde::{Deserialize, Serialize};

/// Scroll physics configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Fraction of the remaining distance covered per update, in `(0, 1]`.
    pub ease: f32,
    /// Multiplier applied to wheel deltas before they move the target.
    pub wheel_multiplier: f32,
    /// Distance in pixels under which `current` snaps onto `target`.
    pub snap_threshold: f32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            ease: 0.075,
            wheel_multiplier: 1.0,
            snap_threshold: 0.01,
        }
    }
}

/// Per-update statistics for instrumentation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollStats {
    /// How far `current` moved during the last update.
    pub delta: f32,
    /// Remaining distance to the target after the last update.
    pub remaining: f32,
    /// Number of updates performed so far.
    pub updates: u64,
}

/// Horizontal scroll offset that eases toward a target.
#[derive(Debug, Clone)]
pub struct SmoothScroll {
    pub config: ScrollConfig,
    target: f32,
    current: f32,
    limit: f32,
    enabled: bool,
    stats: ScrollStats,
}

impl SmoothScroll {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            config,
            target: 0.0,
            current: 0.0,
            limit: 0.0,
            enabled: true,
            stats: ScrollStats::default(),
        }
    }

    /// Current (eased) offset in pixels.
    pub fn current(&self) -> f32 {
        self.current
    }

    /// Offset the scroller is easing toward.
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Largest reachable offset.
    pub fn limit(&self) -> f32 {
        self.limit
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn stats(&self) -> &ScrollStats {
        &self.stats
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Stop reacting to input. The offset keeps easing to the last target.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Set the scrollable extent. Clamps the target and current offsets.
    pub fn set_limit(&mut self, limit: f32) {
        self.limit = limit.max(0.0);
        self.target = self.target.clamp(0.0, self.limit);
        self.current = self.current.clamp(0.0, self.limit);
    }

    /// Move the target by a raw input delta (wheel, keys, drag).
    pub fn scroll_by(&mut self, delta: f32) {
        if !self.enabled || !delta.is_finite() {
            return;
        }
        self.scroll_to(self.target + delta * self.config.wheel_multiplier);
    }

    /// Ease toward an absolute offset.
    pub fn scroll_to(&mut self, offset: f32) {
        if !self.enabled || !offset.is_finite() {
            return;
        }
        self.target = offset.clamp(0.0, self.limit);
    }

    /// Set both target and current without easing.
    /// Non-finite offsets are ignored.
    pub fn jump_to(&mut self, offset: f32) {
        if !offset.is_finite() {
            return;
        }
        let offset = offset.clamp(0.0, self.limit);
        self.target = offset;
        self.current = offset;
        tracing::debug!(offset, "scroll jump");
    }

    /// Advance the easing by one frame.
    pub fn update(&mut self) {
        let before = self.current;
        let remaining = self.target - self.current;
        if remaining.abs() < self.config.snap_threshold {
            self.current = self.target;
        } else {
            self.current += remaining * self.config.ease.clamp(0.0, 1.0);
        }

        self.stats = ScrollStats {
            delta: self.current - before,
            remaining: self.target - self.current,
            updates: self.stats.updates + 1,
        };

        tracing::trace!(
            current = self.current,
            target = self.target,
            "scroll update"
        );
    }

    /// True when `current` has reached `target`.
    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }
}

impl Default for SmoothScroll {
    fn default() -> Self {
        Self::new(ScrollConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scroller(limit: f32) -> SmoothScroll {
        let mut s = SmoothScroll::default();
        s.set_limit(limit);
        s
    }

    #[test]
    fn update_eases_toward_target() {
        let mut s = scroller(1000.0);
        s.scroll_by(100.0);
        s.update();
        assert!((s.current() - 7.5).abs() < 1e-4);
        s.update();
        assert!(s.current() > 7.5 && s.current() < 100.0);
        assert_eq!(s.stats().updates, 2);
    }

    #[test]
    fn converges_and_snaps() {
        let mut s = scroller(1000.0);
        s.scroll_to(250.0);
        for _ in 0..500 {
            s.update();
        }
        assert!(s.is_settled());
        assert_eq!(s.current(), 250.0);
        assert_eq!(s.stats().delta, 0.0);
    }

    #[test]
    fn target_is_clamped_to_limit() {
        let mut s = scroller(300.0);
        s.scroll_by(1_000.0);
        assert_eq!(s.target(), 300.0);
        s.scroll_by(-5_000.0);
        assert_eq!(s.target(), 0.0);
    }

    #[test]
    fn shrinking_limit_clamps_current() {
        let mut s = scroller(1000.0);
        s.jump_to(800.0);
        s.set_limit(200.0);
        assert_eq!(s.current(), 200.0);
        assert_eq!(s.target(), 200.0);
    }

    #[test]
    fn disabled_ignores_input() {
        let mut s = scroller(1000.0);
        s.disable();
        s.scroll_by(50.0);
        s.update();
        assert_eq!(s.current(), 0.0);
        s.enable();
        s.scroll_by(50.0);
        assert_eq!(s.target(), 50.0);
    }

    #[test]
    fn non_finite_input_is_ignored() {
        let mut s = scroller(1000.0);
        s.scroll_by(f32::NAN);
        s.scroll_to(f32::INFINITY);
        s.jump_to(f32::NAN);
        s.update();
        assert_eq!(s.target(), 0.0);
        assert_eq!(s.current(), 0.0);

        s.scroll_by(100.0);
        for _ in 0..500 {
            s.update();
        }
        assert_eq!(s.current(), 100.0);
    }

    #[test]
    fn wheel_multiplier_scales_delta() {
        let mut s = SmoothScroll::new(ScrollConfig {
            wheel_multiplier: 2.0,
            ..ScrollConfig::default()
        });
        s.set_limit(1000.0);
        s.scroll_by(40.0);
        assert_eq!(s.target(), 80.0);
    }

    #[test]
    fn jump_skips_easing() {
        let mut s = scroller(1000.0);
        s.jump_to(120.0);
        assert_eq!(s.current(), 120.0);
        s.update();
        assert_eq!(s.current(), 120.0);
    }
}
