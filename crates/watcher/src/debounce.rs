//! Global debouncing of change events
//!
//! Coalesces editor save bursts (temp file + final file writes) into a
//! single notification. The window is shared by every watched path and every
//! event kind: a change to one file can suppress a near-simultaneous change
//! to another.

use std::time::{Duration, Instant};

/// Leading-edge rate limiter
///
/// An event is accepted only if more than `threshold` has elapsed since the
/// last accepted one. Dropped events do not move the window.
#[derive(Debug, Clone)]
pub struct Debouncer {
    threshold: Duration,
    last_accepted: Option<Instant>,
}

impl Debouncer {
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            last_accepted: None,
        }
    }

    /// Decide whether an event observed at `now` passes
    pub fn accept(&mut self, now: Instant) -> bool {
        match self.last_accepted {
            Some(last) if now.saturating_duration_since(last) <= self.threshold => false,
            _ => {
                self.last_accepted = Some(now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: Duration = Duration::from_millis(100);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_first_event_always_accepted() {
        let mut debouncer = Debouncer::new(THRESHOLD);
        assert!(debouncer.accept(Instant::now()));
    }

    #[test]
    fn test_burst_yields_first_event_only() {
        let mut debouncer = Debouncer::new(THRESHOLD);
        let t0 = Instant::now();

        let accepted: Vec<bool> = [0, 10, 35, 60, 100]
            .iter()
            .map(|&offset| debouncer.accept(t0 + ms(offset)))
            .collect();

        assert_eq!(accepted, vec![true, false, false, false, false]);
    }

    #[test]
    fn test_spaced_events_all_accepted() {
        let mut debouncer = Debouncer::new(THRESHOLD);
        let t0 = Instant::now();

        for i in 0..5 {
            assert!(debouncer.accept(t0 + ms(i * 150)));
        }
    }

    #[test]
    fn test_exact_threshold_is_dropped() {
        let mut debouncer = Debouncer::new(THRESHOLD);
        let t0 = Instant::now();

        assert!(debouncer.accept(t0));
        assert!(!debouncer.accept(t0 + THRESHOLD));
        assert!(debouncer.accept(t0 + THRESHOLD + ms(1)));
    }

    #[test]
    fn test_window_measured_from_last_accepted() {
        let mut debouncer = Debouncer::new(THRESHOLD);
        let t0 = Instant::now();

        // Dropped events at 60 and 120 do not extend the window
        assert!(debouncer.accept(t0));
        assert!(!debouncer.accept(t0 + ms(60)));
        assert!(debouncer.accept(t0 + ms(120)));
        assert!(!debouncer.accept(t0 + ms(180)));
        assert!(debouncer.accept(t0 + ms(221)));
    }

    #[test]
    fn test_zero_threshold_only_drops_simultaneous() {
        let mut debouncer = Debouncer::new(Duration::ZERO);
        let t0 = Instant::now();

        assert!(debouncer.accept(t0));
        assert!(!debouncer.accept(t0));
        assert!(debouncer.accept(t0 + ms(1)));
    }
}
