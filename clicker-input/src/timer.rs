use tokio::time::Instant;

/// One-shot timer owned by a classifier. Cancelling is idempotent and cancelling
/// after it fired is a no-op.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    due: Option<Instant>,
}

impl Deadline {
    pub fn arm(&mut self, at: Instant) {
        self.due = Some(at);
    }

    /// Returns `true` if a pending deadline was cancelled.
    pub fn cancel(&mut self) -> bool {
        self.due.take().is_some()
    }

    pub fn due(&self) -> Option<Instant> {
        self.due
    }

    pub fn is_armed(&self) -> bool {
        self.due.is_some()
    }

    /// Fires and disarms if `now` reached the deadline.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.due {
            Some(at) if now >= at => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}
