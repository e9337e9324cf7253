use std::ops::ControlFlow;
use std::time::{Duration, Instant};

use crate::frame::FrameView;
use crate::layout::ElementSource;
use crate::sync::SceneSync;

/// One scheduled frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTick {
    pub index: u64,
    /// Time since the source started.
    pub elapsed: Duration,
}

/// Produces frames until it runs dry or is torn down.
pub trait FrameSource {
    fn next_frame(&mut self) -> Option<FrameTick>;
}

/// Deterministic source: a fixed number of frames a fixed step apart.
#[derive(Debug, Clone)]
pub struct ManualClock {
    remaining: u64,
    index: u64,
    step: Duration,
}

impl ManualClock {
    pub fn new(frames: u64, step: Duration) -> Self {
        Self {
            remaining: frames,
            index: 0,
            step,
        }
    }

    /// `frames` ticks at a nominal 60 Hz.
    pub fn at_60hz(frames: u64) -> Self {
        Self::new(frames, Duration::from_micros(16_667))
    }

    /// Queue more frames.
    pub fn push(&mut self, frames: u64) {
        self.remaining += frames;
    }
}

impl FrameSource for ManualClock {
    fn next_frame(&mut self) -> Option<FrameTick> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let tick = FrameTick {
            index: self.index,
            elapsed: self
                .step
                .saturating_mul(u32::try_from(self.index).unwrap_or(u32::MAX)),
        };
        self.index += 1;
        Some(tick)
    }
}

/// Wall-clock source for hosts that pace frames themselves (vsync, redraw requests).
#[derive(Debug, Clone)]
pub struct SystemClock {
    start: Instant,
    index: u64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            index: 0,
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for SystemClock {
    fn next_frame(&mut self) -> Option<FrameTick> {
        let tick = FrameTick {
            index: self.index,
            elapsed: self.start.elapsed(),
        };
        self.index += 1;
        Some(tick)
    }
}

/// Ring buffer of frame durations for instrumentation.
#[derive(Debug)]
pub struct FrameTimer {
    history: Vec<Duration>,
    capacity: usize,
    index: usize,
    filled: bool,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: vec![Duration::ZERO; capacity],
            capacity,
            index: 0,
            filled: false,
        }
    }

    pub fn record(&mut self, dt: Duration) {
        self.history[self.index] = dt;
        self.index = (self.index + 1) % self.capacity;
        if self.index == 0 {
            self.filled = true;
        }
    }

    fn recorded(&self) -> &[Duration] {
        let count = if self.filled { self.capacity } else { self.index };
        &self.history[..count]
    }

    pub fn average(&self) -> Duration {
        let recorded = self.recorded();
        if recorded.is_empty() {
            return Duration::ZERO;
        }
        recorded.iter().sum::<Duration>() / recorded.len() as u32
    }

    pub fn max(&self) -> Duration {
        self.recorded().iter().copied().max().unwrap_or(Duration::ZERO)
    }

    /// Frames per second implied by the average frame time.
    pub fn fps(&self) -> f32 {
        let avg = self.average().as_secs_f32();
        if avg > 0.0 { 1.0 / avg } else { 0.0 }
    }
}

/// Drives a scene from a frame source: tick, then hand the frame to `submit`.
///
/// The loop ends when the source runs dry, when `submit` breaks, or after
/// [`FrameLoop::stop`].
#[derive(Debug)]
pub struct FrameLoop<C: FrameSource> {
    clock: C,
    running: bool,
    last: Option<Duration>,
    timer: FrameTimer,
}

impl<C: FrameSource> FrameLoop<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            running: true,
            last: None,
            timer: FrameTimer::new(120),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop scheduling. Further `step`/`run` calls do nothing.
    pub fn stop(&mut self) {
        if self.running {
            tracing::debug!("frame loop stopped");
        }
        self.running = false;
    }

    pub fn timer(&self) -> &FrameTimer {
        &self.timer
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Run a single frame. Returns `false` once the loop has ended.
    pub fn step<S, F>(&mut self, scene: &mut SceneSync<S>, submit: F) -> bool
    where
        S: ElementSource,
        F: FnOnce(&FrameView) -> ControlFlow<()>,
    {
        if !self.running {
            return false;
        }
        let Some(tick) = self.clock.next_frame() else {
            self.stop();
            return false;
        };
        if let Some(last) = self.last {
            self.timer.record(tick.elapsed.saturating_sub(last));
        }
        self.last = Some(tick.elapsed);

        scene.tick();
        if submit(&scene.frame_view()).is_break() {
            self.stop();
            return false;
        }
        true
    }

    /// Run frames until the loop ends. Returns the number of frames submitted.
    pub fn run<S, F>(&mut self, scene: &mut SceneSync<S>, mut submit: F) -> u64
    where
        S: ElementSource,
        F: FnMut(&FrameView) -> ControlFlow<()>,
    {
        let _span = tracing::info_span!("frame_loop").entered();
        let mut frames = 0;
        while self.running {
            let mut broke = false;
            let advanced = self.step(scene, |view| {
                let flow = submit(view);
                broke = flow.is_break();
                flow
            });
            if advanced || broke {
                frames += 1;
            }
            if !advanced {
                break;
            }
        }
        frames
    }
}
