//! Elapsed-time gate

use core::cell::Cell;

use embedded_services::Clock;

/// Measures time since an anchor against a duration.
///
/// The anchor is taken when the timeout is created and on every restart. All
/// arithmetic wraps, so a rolling-over clock counter never produces a bogus interval.
/// State lives in cells: a timeout is owned by exactly one event or button and is
/// mutated through shared references while events are being observed.
pub struct Timeout<'a> {
    clock: &'a dyn Clock,
    duration_ms: Cell<u32>,
    started_ms: Cell<u32>,
}

impl<'a> Timeout<'a> {
    /// Creates a timeout of `duration_ms`, started now.
    pub fn new(clock: &'a dyn Clock, duration_ms: u32) -> Self {
        Self {
            clock,
            duration_ms: Cell::new(duration_ms),
            started_ms: Cell::new(clock.now_ms()),
        }
    }

    /// Moves the anchor to now.
    pub fn restart(&self) {
        self.started_ms.set(self.clock.now_ms());
    }

    /// Changes the duration, optionally restarting.
    pub fn set_timeout(&self, duration_ms: u32, restart: bool) {
        self.duration_ms.set(duration_ms);
        if restart {
            self.restart();
        }
    }

    /// Milliseconds since the anchor.
    pub fn elapsed_ms(&self) -> u32 {
        self.clock.now_ms().wrapping_sub(self.started_ms.get())
    }

    /// Returns true once at least the configured duration has passed.
    ///
    /// With `auto_restart` an elapsed timeout restarts itself, which turns it into a
    /// periodic tick.
    pub fn is_elapsed(&self, auto_restart: bool) -> bool {
        let elapsed = self.elapsed_ms() >= self.duration_ms.get();
        if elapsed && auto_restart {
            self.restart();
        }
        elapsed
    }

    /// Configured duration in milliseconds.
    pub fn timeout_ms(&self) -> u32 {
        self.duration_ms.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_services::MockClock;

    #[test]
    fn elapses_at_duration_boundary() {
        let clock = MockClock::new(0);
        let timeout = Timeout::new(&clock, 100);

        clock.advance(99);
        assert!(!timeout.is_elapsed(false));
        clock.advance(1);
        assert!(timeout.is_elapsed(false));
        // without auto restart it stays elapsed
        assert!(timeout.is_elapsed(false));
    }

    #[test]
    fn auto_restart_rearms() {
        let clock = MockClock::new(0);
        let timeout = Timeout::new(&clock, 100);

        clock.advance(150);
        assert!(timeout.is_elapsed(true));
        assert!(!timeout.is_elapsed(false));
        assert_eq!(timeout.elapsed_ms(), 0);

        clock.advance(100);
        assert!(timeout.is_elapsed(true));
    }

    #[test]
    fn set_timeout_with_restart() {
        let clock = MockClock::new(0);
        let timeout = Timeout::new(&clock, 100);
        clock.advance(80);

        timeout.set_timeout(500, true);
        assert_eq!(timeout.timeout_ms(), 500);
        clock.advance(499);
        assert!(!timeout.is_elapsed(false));
        clock.advance(1);
        assert!(timeout.is_elapsed(false));
    }

    #[test]
    fn set_timeout_without_restart_keeps_anchor() {
        let clock = MockClock::new(0);
        let timeout = Timeout::new(&clock, 1000);
        clock.advance(300);

        timeout.set_timeout(200, false);
        assert!(timeout.is_elapsed(false));
    }

    #[test]
    fn survives_counter_wraparound() {
        let clock = MockClock::new(u32::MAX - 50);
        let timeout = Timeout::new(&clock, 100);

        clock.advance(60);
        assert_eq!(timeout.elapsed_ms(), 60);
        assert!(!timeout.is_elapsed(false));

        clock.advance(40);
        assert!(timeout.is_elapsed(false));
    }
}
