use clicker_core::Command;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::debug;

/// Sans-IO state machine turning timestamped input into commands.
pub trait Classifier: Send + 'static {
    type Input: Send + 'static;

    fn feed(&mut self, input: Self::Input, now: Instant) -> Vec<Command>;

    /// When the machine next wants [`Classifier::on_deadline`] to run.
    fn next_deadline(&self) -> Option<Instant>;

    fn on_deadline(&mut self, now: Instant) -> Vec<Command>;
}

/// Running classifier task. Dropping the handle stops it.
pub struct ClassifierHandle<I> {
    input: mpsc::UnboundedSender<I>,
    task: JoinHandle<()>,
    stopped: Arc<AtomicBool>,
}

/// Runs `classifier` on its own task. Input is always evaluated before a timer that is
/// due at the same moment, so a second tap or knock can still cancel it.
pub fn spawn_classifier<C: Classifier>(
    mut classifier: C,
    output: mpsc::UnboundedSender<Command>,
) -> ClassifierHandle<C::Input> {
    let (input, mut rx) = mpsc::unbounded_channel::<C::Input>();
    let stopped = Arc::new(AtomicBool::new(false));

    let task = tokio::spawn({
        let stopped = stopped.clone();
        async move {
            loop {
                let deadline = classifier.next_deadline();
                let commands = tokio::select! {
                    biased;
                    next = rx.recv() => match next {
                        Some(event) => classifier.feed(event, Instant::now()),
                        None => break,
                    },
                    _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                        classifier.on_deadline(Instant::now())
                    }
                };

                if stopped.load(Ordering::Acquire) {
                    break;
                }
                for command in commands {
                    debug!("Classified {}", command);
                    if output.send(command).is_err() {
                        debug!("Command receiver gone, dropping {}", command);
                    }
                }
            }
        }
    });

    ClassifierHandle {
        input,
        task,
        stopped,
    }
}

impl<I> ClassifierHandle<I> {
    /// Returns `false` once the classifier is stopped.
    pub fn push(&self, event: I) -> bool {
        !self.stopped.load(Ordering::Acquire) && self.input.send(event).is_ok()
    }

    /// Sender for loops that feed this classifier directly.
    pub fn input(&self) -> mpsc::UnboundedSender<I> {
        self.input.clone()
    }

    /// Cancels the task together with any pending timer. Returns `true` only the first time.
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

impl<I> Drop for ClassifierHandle<I> {
    fn drop(&mut self) {
        self.stopped.store(true, Ordering::Release);
        self.task.abort();
    }
}
