//! Feedback suppression window.
//!
//! Held from just before the host sends an `update` until a short delay has
//! passed. While held, a `selected` echo for the element being edited only
//! refreshes the descriptor; the panel keeps its editing state.

use std::time::{Duration, Instant};

#[derive(Debug, Default)]
pub struct Suppression {
    until: Option<Instant>,
}

impl Suppression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold from `now` for `delay`, extending any current hold.
    pub fn hold(&mut self, now: Instant, delay: Duration) {
        let until = now + delay;
        self.until = Some(self.until.map_or(until, |current| current.max(until)));
    }

    pub fn is_held(&self, now: Instant) -> bool {
        self.until.is_some_and(|until| now < until)
    }

    /// Drop an expired hold. Returns whether it was released.
    pub fn release_due(&mut self, now: Instant) -> bool {
        if self.until.is_some_and(|until| now >= until) {
            self.until = None;
            return true;
        }
        false
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.until
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hold_and_release() {
        let now = Instant::now();
        let mut s = Suppression::new();
        assert!(!s.is_held(now));

        s.hold(now, Duration::from_millis(100));
        assert!(s.is_held(now + Duration::from_millis(99)));
        assert!(!s.release_due(now + Duration::from_millis(50)));
        assert!(s.release_due(now + Duration::from_millis(100)));
        assert!(!s.is_held(now + Duration::from_millis(100)));
    }

    #[test]
    fn test_hold_extends() {
        let now = Instant::now();
        let mut s = Suppression::new();
        s.hold(now, Duration::from_millis(100));
        s.hold(now + Duration::from_millis(80), Duration::from_millis(100));
        assert!(s.is_held(now + Duration::from_millis(150)));
    }
}
