//! Bounded retry counter guarding one unacknowledged request

/// Attempts left and the deadline for the current attempt
///
/// A counter is created when a request is queued, and dropped when the
/// request is acknowledged, cancelled, or runs out of attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetryCounter {
    attempts_remaining: u8,
    /// Unset until the first send
    deadline_ms: Option<u64>,
}

impl RetryCounter {
    /// Create a counter allowing `attempts` sends
    pub fn new(attempts: u8) -> Self {
        Self {
            attempts_remaining: attempts,
            deadline_ms: None,
        }
    }

    /// Sends still allowed
    pub fn attempts_remaining(&self) -> u8 {
        self.attempts_remaining
    }

    pub fn deadline_ms(&self) -> Option<u64> {
        self.deadline_ms
    }

    /// Consume one attempt for a send at `now_ms`
    ///
    /// Returns false without touching the deadline if no attempt is left.
    pub fn record_send(&mut self, now_ms: u64, timeout_ms: u32) -> bool {
        if self.attempts_remaining == 0 {
            return false;
        }
        self.attempts_remaining -= 1;
        self.deadline_ms = Some(now_ms.saturating_add(timeout_ms as u64));
        true
    }

    /// True once the deadline of the last send has passed
    pub fn is_expired(&self, now_ms: u64) -> bool {
        self.deadline_ms.is_some_and(|deadline| now_ms >= deadline)
    }

    /// True when no further send is allowed
    pub fn is_exhausted(&self) -> bool {
        self.attempts_remaining == 0
    }
}
