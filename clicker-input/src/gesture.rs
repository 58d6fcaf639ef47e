//! Tap / double-tap / swipe recognition for a single touch surface.
//!
//! | phase        | event                       | next         | emits        |
//! |--------------|-----------------------------|--------------|--------------|
//! | any          | pointer down                | `Armed`      | none         |
//! | `Armed`      | up, horizontal swipe        | `Idle`       | `signal-1/2` |
//! | `Armed`      | up, tap, no recent tap      | `TapPending` | none         |
//! | `Armed`      | up, tap within the window   | `Idle`       | `signal-2`   |
//! | `TapPending` | window elapses              | `Idle`       | `signal-1`   |

use crate::driver::Classifier;
use crate::timer::Deadline;
use clicker_core::Command;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    /// Horizontal travel a swipe must exceed, in pixels.
    pub swipe_min_dx: f32,
    /// `|dx|` must exceed `|dy|` by this factor.
    pub swipe_dominance: f32,
    pub double_tap_window: Duration,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            swipe_min_dx: 60.0,
            swipe_dominance: 2.0,
            double_tap_window: Duration::from_millis(300),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Up { x: f32, y: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    /// Pointer is down.
    Armed,
    /// One tap seen, waiting to learn whether a second follows.
    TapPending,
}

#[derive(Debug, Clone, Copy)]
struct Origin {
    x: f32,
    y: f32,
}

#[derive(Debug, Default)]
pub struct GestureClassifier {
    config: GestureConfig,
    origin: Option<Origin>,
    last_tap: Option<Instant>,
    single_tap: Deadline,
}

impl GestureClassifier {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> GesturePhase {
        if self.origin.is_some() {
            GesturePhase::Armed
        } else if self.single_tap.is_armed() {
            GesturePhase::TapPending
        } else {
            GesturePhase::Idle
        }
    }

    pub fn pointer_down(&mut self, x: f32, y: f32, now: Instant) -> Vec<Command> {
        let out = self.on_deadline(now);
        self.origin = Some(Origin { x, y });
        out
    }

    pub fn pointer_up(&mut self, x: f32, y: f32, now: Instant) -> Vec<Command> {
        let mut out = self.on_deadline(now);
        let Some(origin) = self.origin.take() else {
            return out;
        };

        let dx = x - origin.x;
        let dy = y - origin.y;

        if dx.abs() > self.config.swipe_min_dx && dx.abs() > self.config.swipe_dominance * dy.abs()
        {
            self.single_tap.cancel();
            self.last_tap = None;
            out.push(if dx > 0.0 {
                Command::Next
            } else {
                Command::Previous
            });
            return out;
        }

        match self.last_tap {
            Some(previous) if now.duration_since(previous) < self.config.double_tap_window => {
                self.single_tap.cancel();
                self.last_tap = None;
                out.push(Command::Previous);
            }
            _ => {
                self.last_tap = Some(now);
                self.single_tap.arm(now + self.config.double_tap_window);
            }
        }
        out
    }

    pub fn reset(&mut self) {
        self.origin = None;
        self.last_tap = None;
        self.single_tap.cancel();
    }
}

impl Classifier for GestureClassifier {
    type Input = PointerEvent;

    fn feed(&mut self, input: PointerEvent, now: Instant) -> Vec<Command> {
        match input {
            PointerEvent::Down { x, y } => self.pointer_down(x, y, now),
            PointerEvent::Up { x, y } => self.pointer_up(x, y, now),
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.single_tap.due()
    }

    fn on_deadline(&mut self, now: Instant) -> Vec<Command> {
        if self.single_tap.fire(now) {
            self.last_tap = None;
            return vec![Command::Next];
        }
        Vec::new()
    }
}
