// SPDX-License-Identifier: GPL-3.0-only

//! Hooks invoked after every processed pointer event.

use std::time::Instant;

use crate::event::PointerEvent;

/// Observes pointer events after the router has processed them.
pub trait EventObserver {
    fn on_pointer_event(&mut self, event: &PointerEvent, consumed: bool);
}

/// Measures the rate of processed pointer events.
///
/// Every `sample_size` events the rate since the previous sample is logged at
/// debug level.
#[derive(Debug, Clone)]
pub struct FpsMeter {
    sample_size: u32,
    count: u32,
    sample_start: Option<Instant>,
    last_fps: Option<f64>,
}

impl FpsMeter {
    /// Creates a meter. A `sample_size` of zero is treated as one.
    pub fn new(sample_size: u32) -> Self {
        Self {
            sample_size: sample_size.max(1),
            count: 0,
            sample_start: None,
            last_fps: None,
        }
    }

    /// Counts one event at `now`, returning the rate if a sample completed.
    pub fn record(&mut self, now: Instant) -> Option<f64> {
        let Some(start) = self.sample_start else {
            self.sample_start = Some(now);
            return None;
        };

        self.count += 1;
        if self.count < self.sample_size {
            return None;
        }

        let elapsed = now.saturating_duration_since(start).as_secs_f64();
        self.count = 0;
        self.sample_start = Some(now);

        if elapsed <= 0.0 {
            return None;
        }

        let fps = f64::from(self.sample_size) / elapsed;
        tracing::debug!("FPS: {:.1}", fps);
        self.last_fps = Some(fps);
        Some(fps)
    }

    /// Returns the rate of the last completed sample.
    pub fn last_fps(&self) -> Option<f64> {
        self.last_fps
    }
}

impl EventObserver for FpsMeter {
    fn on_pointer_event(&mut self, event: &PointerEvent, _consumed: bool) {
        self.record(event.timestamp);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_fps_sample() {
        let start = Instant::now();
        let mut meter = FpsMeter::new(10);

        assert_eq!(meter.record(start), None, "First event starts the sample");
        for i in 1..10 {
            assert_eq!(meter.record(start + Duration::from_millis(10 * i)), None);
        }

        let fps = meter.record(start + Duration::from_millis(100)).unwrap();
        assert!((fps - 100.0).abs() < 1e-6, "10 events in 100ms is 100 FPS, got {}", fps);
        assert_eq!(meter.last_fps(), Some(fps));
    }

    #[test]
    fn test_zero_elapsed_reports_nothing() {
        let start = Instant::now();
        let mut meter = FpsMeter::new(1);

        meter.record(start);
        assert_eq!(meter.record(start), None);
        assert_eq!(meter.last_fps(), None);
    }
}
