use crate::action::Action;
use glam::Vec2;

/// Pixels scrolled per wheel "line" notch.
const LINE_HEIGHT: f32 = 40.0;

/// A wheel event, independent of the windowing crate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelDelta {
    /// Notches, as reported by mouse wheels.
    Lines(Vec2),
    /// Pixels, as reported by touchpads.
    Pixels(Vec2),
}

/// Keys the scene reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    PageUp,
    PageDown,
    Tab,
    Other,
}

/// Maps wheel and key input to [`Action`]s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputMapper {
    /// Scroll distance of one arrow key press, in pixels.
    pub key_step: f32,
    /// Progress change of one up/down key press.
    pub progress_step: f32,
}

impl Default for InputMapper {
    fn default() -> Self {
        Self {
            key_step: 120.0,
            progress_step: 0.05,
        }
    }
}

impl InputMapper {
    /// Both axes scroll horizontally. Wheel-down scrolls right.
    pub fn wheel(&self, delta: WheelDelta) -> Action {
        let d = match delta {
            WheelDelta::Lines(v) => v * LINE_HEIGHT,
            WheelDelta::Pixels(v) => v,
        };
        // winit reports positive y for wheel-up.
        let amount = -(d.x + d.y);
        if amount == 0.0 {
            Action::Noop
        } else {
            Action::Scroll(amount)
        }
    }

    /// `page` is the viewport width, used for page up/down.
    pub fn key(&self, key: Key, page: f32, limit: f32) -> Action {
        match key {
            Key::ArrowRight => Action::Scroll(self.key_step),
            Key::ArrowLeft => Action::Scroll(-self.key_step),
            Key::PageDown => Action::Scroll(page),
            Key::PageUp => Action::Scroll(-page),
            Key::Home => Action::ScrollTo(0.0),
            Key::End => Action::ScrollTo(limit),
            Key::ArrowUp => Action::NudgeProgress(self.progress_step),
            Key::ArrowDown => Action::NudgeProgress(-self.progress_step),
            Key::Tab => Action::ToggleInspector,
            Key::Other => Action::Noop,
        }
    }
}
