//! Single-slot pending operation.
//!
//! Holds at most one value with a due time. Setting a new value supersedes
//! the previous one; nothing is ever cancelled explicitly.

use std::time::Instant;

#[derive(Debug)]
pub struct Pending<T> {
    slot: Option<(T, Instant)>,
}

impl<T> Default for Pending<T> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<T> Pending<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `value` for `due`, returning the value it superseded.
    pub fn set(&mut self, value: T, due: Instant) -> Option<T> {
        self.slot.replace((value, due)).map(|(old, _)| old)
    }

    /// Take the value if it is due at `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match &self.slot {
            Some((_, due)) if *due <= now => self.slot.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// Take the value regardless of its due time.
    pub fn flush(&mut self) -> Option<T> {
        self.slot.take().map(|(value, _)| value)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.slot.as_ref().map(|(_, due)| *due)
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }
}
