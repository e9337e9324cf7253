use reveal_scene::{ElementSource, SceneSync};

/// A high-level action produced by the windowing layer.
///
/// The scene consumes actions, never raw input events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Move the scroll target by a pixel delta.
    Scroll(f32),
    /// Ease toward an absolute scroll offset.
    ScrollTo(f32),
    /// Snap the scroll offset without easing.
    JumpTo(f32),
    /// Set the reveal progress (clamped by the scene).
    SetProgress(f32),
    /// Move the reveal progress by a delta.
    NudgeProgress(f32),
    /// Show or hide the debug panel.
    ToggleInspector,
    /// No-op (input that isn't bound).
    Noop,
}

impl Action {
    /// Apply the action to a scene. Returns `true` if the scene changed.
    ///
    /// `ToggleInspector` is UI state and is left to the caller.
    pub fn apply<S: ElementSource>(self, scene: &mut SceneSync<S>) -> bool {
        match self {
            Action::Scroll(delta) => {
                if delta == 0.0 {
                    return false;
                }
                scene.scroll_by(delta);
            }
            Action::ScrollTo(offset) => scene.scroll_to(offset),
            Action::JumpTo(offset) => scene.jump_to(offset),
            Action::SetProgress(p) => scene.set_progress(p),
            Action::NudgeProgress(delta) => scene.set_progress(scene.progress() + delta),
            Action::ToggleInspector | Action::Noop => return false,
        }
        tracing::trace!(?self, "action applied");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reveal_common::{Rect, Viewport};
    use reveal_scene::{FixedElements, SceneConfig};

    fn scene() -> SceneSync<FixedElements> {
        // Two items spanning 1600px in an 800px viewport.
        let source = FixedElements::new(vec![
            Rect::new(100.0, 0.0, 800.0, 200.0),
            Rect::new(100.0, 800.0, 800.0, 200.0),
        ]);
        SceneSync::new(
            SceneConfig::default(),
            source,
            Viewport::new(800.0, 600.0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn scroll_moves_target() {
        let mut s = scene();
        assert!(Action::Scroll(120.0).apply(&mut s));
        assert_eq!(s.scroll_target(), 120.0);
        assert_eq!(s.scroll_offset(), 0.0);
    }

    #[test]
    fn zero_scroll_is_ignored() {
        let mut s = scene();
        assert!(!Action::Scroll(0.0).apply(&mut s));
    }

    #[test]
    fn jump_is_immediate() {
        let mut s = scene();
        Action::JumpTo(300.0).apply(&mut s);
        assert_eq!(s.scroll_offset(), 300.0);
    }

    #[test]
    fn nudge_progress_clamps() {
        let mut s = scene();
        Action::SetProgress(0.95).apply(&mut s);
        Action::NudgeProgress(0.1).apply(&mut s);
        assert_eq!(s.progress(), 1.0);
        Action::NudgeProgress(-2.0).apply(&mut s);
        assert_eq!(s.progress(), 0.0);
    }

    #[test]
    fn toggle_and_noop_leave_scene_alone() {
        let mut s = scene();
        assert!(!Action::ToggleInspector.apply(&mut s));
        assert!(!Action::Noop.apply(&mut s));
        assert_eq!(s.scroll_target(), 0.0);
    }
}
