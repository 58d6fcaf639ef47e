//! Single / double knock recognition from microphone energy.
//!
//! A frame whose RMS exceeds the threshold is a knock. Knocks closer than `debounce`
//! to the first one are the decay tail of the same impact. A second knock within
//! `pairing_window` makes a double knock; otherwise the first knock is confirmed as a
//! single once both the debounce and the pairing window have passed.

use crate::driver::Classifier;
use crate::timer::Deadline;
use clicker_core::Command;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnockConfig {
    /// RMS level (samples in `[-1, 1]`) a frame must exceed.
    pub threshold: f32,
    pub debounce: Duration,
    pub pairing_window: Duration,
}

impl Default for KnockConfig {
    fn default() -> Self {
        Self {
            threshold: 0.2,
            debounce: Duration::from_millis(250),
            pairing_window: Duration::from_millis(1000),
        }
    }
}

impl KnockConfig {
    fn confirm_after(&self) -> Duration {
        self.debounce.max(self.pairing_window)
    }
}

/// Root mean square of samples already normalized to `[-1, 1]`.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}

/// Unsigned 8-bit samples centred on 128, as browser analysers produce them.
pub fn normalize_u8(samples: &[u8]) -> Vec<f32> {
    samples.iter().map(|&b| (f32::from(b) - 128.0) / 128.0).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnockPhase {
    Quiet,
    /// One knock seen, waiting for a second one or for confirmation.
    Pending,
}

#[derive(Debug, Default)]
pub struct KnockClassifier {
    config: KnockConfig,
    first_knock: Option<Instant>,
    confirm: Deadline,
}

impl KnockClassifier {
    pub fn new(config: KnockConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> KnockPhase {
        if self.first_knock.is_some() {
            KnockPhase::Pending
        } else {
            KnockPhase::Quiet
        }
    }

    pub fn is_knock(&self, samples: &[f32]) -> bool {
        rms(samples) > self.config.threshold
    }

    pub fn on_frame(&mut self, samples: &[f32], now: Instant) -> Vec<Command> {
        if !self.is_knock(samples) {
            return self.on_deadline(now);
        }

        let Some(first) = self.first_knock else {
            self.begin(now);
            return Vec::new();
        };

        let elapsed = now.saturating_duration_since(first);
        if elapsed < self.config.debounce {
            return Vec::new();
        }
        if elapsed <= self.config.pairing_window {
            self.confirm.cancel();
            self.first_knock = None;
            return vec![Command::Previous];
        }

        // Too late to pair: settle the earlier knock, this one starts a new window.
        let mut out = Vec::new();
        if self.confirm.cancel() {
            out.push(Command::Next);
        }
        self.begin(now);
        out
    }

    fn begin(&mut self, now: Instant) {
        self.first_knock = Some(now);
        self.confirm.arm(now + self.config.confirm_after());
    }

    pub fn reset(&mut self) {
        self.first_knock = None;
        self.confirm.cancel();
    }
}

impl Classifier for KnockClassifier {
    type Input = Vec<f32>;

    fn feed(&mut self, input: Vec<f32>, now: Instant) -> Vec<Command> {
        self.on_frame(&input, now)
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.confirm.due()
    }

    fn on_deadline(&mut self, now: Instant) -> Vec<Command> {
        if self.confirm.fire(now) {
            self.first_knock = None;
            return vec![Command::Next];
        }
        Vec::new()
    }
}
