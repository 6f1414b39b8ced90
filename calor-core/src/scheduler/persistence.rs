//! Debounced settings save
//!
//! Every edit arms a one-shot delay. Edits arriving before it runs out
//! restart the delay, so a burst of turns ends in a single write.

use super::timer::Timer;
use crate::config::DEFAULT_SAVE_DELAY_MS;

/// One-shot debounce timer for settings writes
#[derive(Debug, Clone)]
pub struct PersistenceScheduler {
    timer: Timer,
}

impl Default for PersistenceScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_SAVE_DELAY_MS)
    }
}

impl PersistenceScheduler {
    /// Create a disarmed scheduler with the given delay
    pub const fn new(delay_ms: u32) -> Self {
        Self {
            timer: Timer::one_shot(delay_ms),
        }
    }

    /// (Re)start the delay from its full duration
    pub fn arm(&mut self) {
        self.timer.start();
    }

    /// Advance the delay; no-op while disarmed
    pub fn tick(&mut self, elapsed_ms: u32) {
        self.timer.tick(elapsed_ms);
    }

    /// Returns true exactly once after the delay has run out
    pub fn consume_if_elapsed(&mut self) -> bool {
        self.timer.ready()
    }

    /// Check if a write is pending
    pub fn is_armed(&self) -> bool {
        self.timer.is_running()
    }

    /// Delay in milliseconds
    pub fn delay_ms(&self) -> u32 {
        self.timer.period_ms()
    }
}
