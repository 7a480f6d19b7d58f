//! Coalescing of rapid viewport-resize events.

use std::time::{Duration, Instant};

/// Minimum spacing between handled resize events.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(200);

/// A leading-edge debounce gate fed an explicit clock.
///
/// The first event passes; subsequent events are dropped until
/// `min_interval` has elapsed since the last accepted one. The caller
/// supplies `now`.
#[derive(Debug, Clone)]
pub struct Debounce {
    min_interval: Duration,
    last_accepted: Option<Instant>,
}

impl Debounce {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_accepted: None,
        }
    }

    /// Returns true if this event should be handled.
    pub fn accept(&mut self, now: Instant) -> bool {
        match self.last_accepted {
            Some(last) if now.duration_since(last) < self.min_interval => false,
            _ => {
                self.last_accepted = Some(now);
                true
            }
        }
    }

    /// Forget the last accepted event so the next one passes immediately.
    pub fn reset(&mut self) {
        self.last_accepted = None;
    }
}

impl Default for Debounce {
    fn default() -> Self {
        Self::new(RESIZE_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_event_passes() {
        let mut gate = Debounce::default();
        assert!(gate.accept(Instant::now()));
    }

    #[test]
    fn test_rapid_events_coalesce() {
        let mut gate = Debounce::new(Duration::from_millis(200));
        let t0 = Instant::now();

        assert!(gate.accept(t0));
        assert!(!gate.accept(t0 + Duration::from_millis(50)));
        assert!(!gate.accept(t0 + Duration::from_millis(199)));
        assert!(gate.accept(t0 + Duration::from_millis(200)));
    }

    #[test]
    fn test_interval_measured_from_last_accepted() {
        let mut gate = Debounce::new(Duration::from_millis(200));
        let t0 = Instant::now();

        assert!(gate.accept(t0));
        assert!(!gate.accept(t0 + Duration::from_millis(150)));
        // The rejected event does not push the window forward
        assert!(gate.accept(t0 + Duration::from_millis(210)));
        assert!(!gate.accept(t0 + Duration::from_millis(300)));
    }

    #[test]
    fn test_reset_reopens_gate() {
        let mut gate = Debounce::new(Duration::from_millis(200));
        let t0 = Instant::now();

        assert!(gate.accept(t0));
        gate.reset();
        assert!(gate.accept(t0 + Duration::from_millis(1)));
    }
}
