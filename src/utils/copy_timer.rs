use std::time::{Duration, Instant};

/// How long the "Copied!" confirmation stays up
pub const COPIED_RESET_MS: u64 = 1500;

/// A one-shot timer that fires once a fixed delay has passed since it was
/// armed. It is polled from the event loop rather than running on its own
/// thread, so dropping it is all the cancellation it needs.
#[derive(Debug, Clone)]
pub struct ResetTimer {
    /// The delay between arming and firing
    delay: Duration,
    /// When the timer was armed, if it is pending
    armed_at: Option<Instant>,
}

impl ResetTimer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            armed_at: None,
        }
    }

    /// Arm (or re-arm) the timer starting at `now`
    pub fn arm(&mut self, now: Instant) {
        self.armed_at = Some(now);
    }

    /// Returns true exactly once, on the first poll at or after the deadline
    pub fn should_fire(&mut self, now: Instant) -> bool {
        match self.armed_at {
            Some(armed) if now.saturating_duration_since(armed) >= self.delay => {
                self.armed_at = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.armed_at = None;
    }

    pub fn is_pending(&self) -> bool {
        self.armed_at.is_some()
    }
}

impl Default for ResetTimer {
    fn default() -> Self {
        Self::new(COPIED_RESET_MS)
    }
}
