// SPDX-License-Identifier: GPL-3.0-only

//! Single-shot, cancelable timers driven by an external clock.
//!
//! The timer never schedules anything itself. It records a deadline when
//! started, and the owner asks it whether the deadline has passed whenever the
//! host's event loop wakes up (see [`crate::driver`]). This keeps every timer
//! fire on the same logical thread as pointer events.

use std::time::{Duration, Instant};

/// A single-shot timer.
///
/// Starting an armed timer re-arms it; stopping is idempotent.
#[derive(Debug, Clone)]
pub struct SingleShotTimer {
    interval: Duration,
    deadline: Option<Instant>,
}

impl SingleShotTimer {
    /// Creates a stopped timer with the given interval.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }

    /// Returns the interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Arms the timer to fire `interval` after `now`, cancelling any pending fire.
    pub fn start(&mut self, now: Instant) {
        self.deadline = Some(now + self.interval);
    }

    /// Cancels a pending fire. Does nothing if the timer is stopped.
    pub fn stop(&mut self) {
        self.deadline = None;
    }

    /// Returns `true` while a fire is pending.
    pub fn is_active(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns when the timer will fire, if armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Consumes a due fire.
    ///
    /// Returns `true` exactly once per arming, at the first call with `now` at
    /// or past the deadline. The timer is stopped afterwards.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
