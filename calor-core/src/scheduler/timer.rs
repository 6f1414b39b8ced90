//! Elapsed-time timer
//!
//! The caller owns the clock: it advances the timer with the time that
//! passed and then asks whether the timer is ready.

/// Timer behavior after it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerMode {
    /// Reloads automatically and keeps firing
    Periodic,
    /// Fires once, then stops until started again
    OneShot,
}

/// Countdown timer driven by [`tick`](Timer::tick)
#[derive(Debug, Clone)]
pub struct Timer {
    period_ms: u32,
    remaining_ms: u32,
    mode: TimerMode,
    running: bool,
    fired: bool,
}

impl Timer {
    /// Create a stopped timer
    pub const fn new(period_ms: u32, mode: TimerMode) -> Self {
        Self {
            period_ms,
            remaining_ms: period_ms,
            mode,
            running: false,
            fired: false,
        }
    }

    /// Create a running periodic timer
    pub const fn periodic(period_ms: u32) -> Self {
        Self {
            period_ms,
            remaining_ms: period_ms,
            mode: TimerMode::Periodic,
            running: true,
            fired: false,
        }
    }

    /// Create a stopped one-shot timer
    pub const fn one_shot(period_ms: u32) -> Self {
        Self::new(period_ms, TimerMode::OneShot)
    }

    /// (Re)start the countdown from the full period
    ///
    /// A pending unconsumed expiry is discarded.
    pub fn start(&mut self) {
        self.remaining_ms = self.period_ms;
        self.running = true;
        self.fired = false;
    }

    /// Advance the countdown
    ///
    /// Does nothing while stopped. A periodic timer that falls behind by
    /// more than one period still fires only once.
    pub fn tick(&mut self, delta_ms: u32) {
        if !self.running {
            return;
        }

        if delta_ms < self.remaining_ms {
            self.remaining_ms -= delta_ms;
            return;
        }

        self.fired = true;
        match self.mode {
            TimerMode::Periodic => {
                let overshoot = delta_ms - self.remaining_ms;
                let period = self.period_ms.max(1);
                self.remaining_ms = period - overshoot % period;
            }
            TimerMode::OneShot => {
                self.remaining_ms = 0;
                self.running = false;
            }
        }
    }

    /// Consume a pending expiry
    ///
    /// Returns true once per expiry.
    pub fn ready(&mut self) -> bool {
        core::mem::take(&mut self.fired)
    }

    /// Check if the countdown is active
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Time left until the next expiry (ms)
    pub fn remaining_ms(&self) -> u32 {
        self.remaining_ms
    }

    /// Configured period (ms)
    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }
}
