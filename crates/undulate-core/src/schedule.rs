// ─────────────────────────────────────────────────────────────────────
// Undulate Kernel — Emission Scheduler
// ─────────────────────────────────────────────────────────────────────
//! Interval gate for periodic side-channel output. Owned per generator
//! instance; nothing is process-wide.

use serde::{Deserialize, Serialize};

/// Validation-metric cadence (nondimensional time units).
pub const METRICS_INTERVAL: f64 = 0.05;

/// Parameter-check cadence (nondimensional time units).
pub const PARAMETER_CHECK_INTERVAL: f64 = 2.0;

/// Fires on the first query and then whenever at least `interval` time
/// has elapsed since the last firing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmissionScheduler {
    interval: f64,
    last_emitted: Option<f64>,
}

impl EmissionScheduler {
    pub fn new(interval: f64) -> Self {
        Self {
            interval,
            last_emitted: None,
        }
    }

    /// Whether an emission is due at `time`, without recording it.
    pub fn is_due(&self, time: f64) -> bool {
        match self.last_emitted {
            None => true,
            Some(last) => time - last >= self.interval,
        }
    }

    /// Record an emission at `time` if one is due. Returns whether it fired.
    pub fn fire(&mut self, time: f64) -> bool {
        if self.is_due(time) {
            self.last_emitted = Some(time);
            true
        } else {
            false
        }
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    pub fn last_emitted(&self) -> Option<f64> {
        self.last_emitted
    }

    /// Forget the last emission so the next query fires.
    pub fn reset(&mut self) {
        self.last_emitted = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_call_fires() {
        let mut s = EmissionScheduler::new(METRICS_INTERVAL);
        assert!(s.fire(3.7));
        assert_eq!(s.last_emitted(), Some(3.7));
    }

    #[test]
    fn test_interval_gate() {
        let mut s = EmissionScheduler::new(0.05);
        assert!(s.fire(0.0));
        assert!(!s.fire(0.01));
        assert!(!s.fire(0.04));
        assert!(s.fire(0.06));
        assert!(!s.fire(0.1));
        assert!(s.fire(0.2));
    }

    #[test]
    fn test_is_due_does_not_record() {
        let mut s = EmissionScheduler::new(PARAMETER_CHECK_INTERVAL);
        assert!(s.fire(0.0));
        assert!(s.is_due(2.5));
        assert_eq!(s.last_emitted(), Some(0.0));
    }

    #[test]
    fn test_reset() {
        let mut s = EmissionScheduler::new(2.0);
        s.fire(1.0);
        assert!(!s.is_due(1.5));
        s.reset();
        assert!(s.is_due(1.5));
    }
}
