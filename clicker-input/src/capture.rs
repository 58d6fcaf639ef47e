//! Seams to the device side: microphone frames, camera frames and the QR decoder.
//! All of them are polled on a fixed frame clock by a [`FrameLoop`].

use crate::driver::{ClassifierHandle, spawn_classifier};
use crate::knock::{KnockClassifier, KnockConfig};
use clicker_core::{Command, Token};
use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Default polling period, roughly one display frame.
pub const FRAME_PERIOD: Duration = Duration::from_millis(16);

/// Most recent time-domain samples, or `None` when no new frame is available yet.
pub trait AudioSource: Send + 'static {
    fn next_frame(&mut self) -> Option<Vec<f32>>;
}

#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

pub trait VideoSource: Send + 'static {
    fn next_frame(&mut self) -> Option<VideoFrame>;
}

/// QR decoding black box.
pub trait PayloadDecoder: Send + 'static {
    fn decode(&self, pixels: &[u8], width: u32, height: u32) -> Option<String>;
}

/// Periodic callback on the frame clock. After [`FrameLoop::stop`] returns no further
/// iteration runs.
pub struct FrameLoop {
    task: JoinHandle<()>,
    stopped: Arc<AtomicBool>,
}

impl FrameLoop {
    pub fn spawn<F>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        let stopped = Arc::new(AtomicBool::new(false));
        let task = tokio::spawn({
            let stopped = stopped.clone();
            async move {
                let mut interval = tokio::time::interval(period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                loop {
                    interval.tick().await;
                    if stopped.load(Ordering::Acquire) || tick().is_break() {
                        break;
                    }
                }
            }
        });
        Self { task, stopped }
    }

    /// Returns `true` only for the call that stopped the loop.
    pub fn stop(&self) -> bool {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.task.abort();
        true
    }

    pub fn is_running(&self) -> bool {
        !self.stopped.load(Ordering::Acquire) && !self.task.is_finished()
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stopped.store(true, Ordering::Release);
        self.task.abort();
    }
}

/// Microphone feature: audio frames pumped into a knock classifier.
pub struct KnockSession {
    classifier: ClassifierHandle<Vec<f32>>,
    pump: FrameLoop,
}

impl KnockSession {
    pub fn start<A: AudioSource>(
        mut source: A,
        period: Duration,
        config: KnockConfig,
        output: mpsc::UnboundedSender<Command>,
    ) -> Self {
        let classifier = spawn_classifier(KnockClassifier::new(config), output);
        let input = classifier.input();
        let pump = FrameLoop::spawn(period, move || {
            if let Some(frame) = source.next_frame() {
                if input.send(frame).is_err() {
                    return ControlFlow::Break(());
                }
            }
            ControlFlow::Continue(())
        });
        info!("Microphone session started");
        Self { classifier, pump }
    }

    /// Stops sampling and drops any knock still waiting for confirmation.
    pub fn stop(&self) -> bool {
        let pump = self.pump.stop();
        let classifier = self.classifier.stop();
        if pump || classifier {
            info!("Microphone session stopped");
        }
        pump || classifier
    }

    pub fn is_running(&self) -> bool {
        self.pump.is_running()
    }
}

/// Polls video frames through `decoder` until a usable token shows up.
pub fn spawn_token_scan<V, D>(
    mut source: V,
    decoder: D,
    period: Duration,
) -> (FrameLoop, oneshot::Receiver<Token>)
where
    V: VideoSource,
    D: PayloadDecoder,
{
    let (found_tx, found_rx) = oneshot::channel();
    let mut found_tx = Some(found_tx);

    let scan = FrameLoop::spawn(period, move || {
        let Some(frame) = source.next_frame() else {
            return ControlFlow::Continue(());
        };
        let Some(token) = decoder
            .decode(&frame.pixels, frame.width, frame.height)
            .and_then(Token::new)
        else {
            return ControlFlow::Continue(());
        };

        debug!("Scanned token from {}x{} frame", frame.width, frame.height);
        if let Some(tx) = found_tx.take() {
            let _ = tx.send(token);
        }
        ControlFlow::Break(())
    });

    (scan, found_rx)
}
