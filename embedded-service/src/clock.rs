//! Millisecond clock sources
//!
//! Every timed piece of the button services reads time through [`Clock`] rather than
//! calling into the time driver directly, so the whole engine can be driven by a
//! [`MockClock`] in tests.

use core::cell::Cell;

use embassy_time::Instant;

/// A monotonic millisecond counter.
///
/// The counter is allowed to wrap around. Consumers must compute elapsed time with
/// `wrapping_sub` so a wrap never yields a huge or negative interval.
pub trait Clock {
    /// Current time in milliseconds.
    fn now_ms(&self) -> u32;
}

/// Clock backed by the embassy time driver.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    /// Creates a new system clock handle.
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u32 {
        // truncation to 32 bits is the wrap point
        Instant::now().as_millis() as u32
    }
}

/// Manually driven clock, for tests and host simulations.
#[derive(Debug, Default)]
pub struct MockClock {
    now: Cell<u32>,
}

impl MockClock {
    /// Creates a mock clock reading `start_ms`.
    pub const fn new(start_ms: u32) -> Self {
        Self { now: Cell::new(start_ms) }
    }

    /// Sets the current time.
    pub fn set(&self, now_ms: u32) {
        self.now.set(now_ms);
    }

    /// Moves time forward, wrapping like a hardware counter.
    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u32 {
        self.now.get()
    }
}
