//! Timed button events
//!
//! State-held and push-duration detectors fire at most once per dwell or press cycle.
//! [`SteadyMoreThan`] is the exception: it is an inactivity alarm and keeps firing every
//! period for as long as the state does not change.

use core::cell::Cell;

use embedded_services::{trace, Clock};

use crate::button::{Button, ButtonState};
use crate::event::{ButtonEvent, EventBase, EventHandler};
use crate::timeout::Timeout;

/// Duration controls shared by all timed events.
pub trait TimedButtonEvent<'a>: ButtonEvent<'a> {
    /// The event's timer.
    fn timeout(&self) -> &Timeout<'a>;

    /// Restarts the event's timer.
    fn restart(&self) {
        self.timeout().restart();
    }

    /// Changes the event duration, optionally restarting the timer.
    fn set_duration(&self, duration_ms: u32, restart: bool) {
        self.timeout().set_timeout(duration_ms, restart);
    }

    /// Configured duration.
    fn duration_ms(&self) -> u32 {
        self.timeout().timeout_ms()
    }

    /// Enables or disables the event, optionally restarting its timer.
    fn set_enabled_with_restart(&self, enabled: bool, restart: bool) {
        self.set_enabled(enabled);
        if restart {
            self.restart();
        }
    }
}

/// How a measured press compares to the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeComparison {
    /// Strictly shorter than the threshold.
    LessThan,
    /// At least the threshold.
    MoreThan,
}

/// Fires once the button has been held in a target state for a duration.
///
/// The timer arms on the edge into the target state, so a button that starts out in
/// that state is not timed until it re-enters it. Leaving the state re-arms for the next
/// dwell. Handler gets the target state and the dwell so far.
pub struct StateTimedEvent<'a> {
    base: EventBase<'a>,
    timeout: Timeout<'a>,
    target: ButtonState,
    in_target: Cell<bool>,
    raised: Cell<bool>,
}

impl<'a> StateTimedEvent<'a> {
    /// Creates a detector for `target` held at least `duration_ms`.
    pub fn new(
        clock: &'a dyn Clock,
        target: ButtonState,
        duration_ms: u32,
        handler: Option<&'a dyn EventHandler<'a>>,
    ) -> Self {
        Self {
            base: EventBase::new(handler),
            timeout: Timeout::new(clock, duration_ms),
            target,
            in_target: Cell::new(false),
            raised: Cell::new(false),
        }
    }

    /// Button held down at least `duration_ms`.
    pub fn down_more_than(clock: &'a dyn Clock, duration_ms: u32, handler: Option<&'a dyn EventHandler<'a>>) -> Self {
        Self::new(clock, ButtonState::Down, duration_ms, handler)
    }

    /// Button left up at least `duration_ms`.
    pub fn up_more_than(clock: &'a dyn Clock, duration_ms: u32, handler: Option<&'a dyn EventHandler<'a>>) -> Self {
        Self::new(clock, ButtonState::Up, duration_ms, handler)
    }

    /// State this detector times.
    pub fn target(&self) -> ButtonState {
        self.target
    }
}

impl<'a> ButtonEvent<'a> for StateTimedEvent<'a> {
    fn base(&self) -> &EventBase<'a> {
        &self.base
    }

    fn observe(&'a self, button: &Button<'a>, state_ms: u32, old: ButtonState, new: ButtonState) {
        if new != self.target {
            self.in_target.set(false);
            self.raised.set(false);
        } else if !self.in_target.get() && old != new {
            self.in_target.set(true);
            self.timeout.restart();
        } else if !self.raised.get() && self.in_target.get() && old == new && self.timeout.is_elapsed(false) {
            self.raised.set(true);
            trace!("State held for {} ms", state_ms);
            self.base.fire(button, self, old, state_ms);
        }
    }
}

impl<'a> TimedButtonEvent<'a> for StateTimedEvent<'a> {
    fn timeout(&self) -> &Timeout<'a> {
        &self.timeout
    }
}

/// Fires on release when the press duration satisfies a threshold.
///
/// The timer starts on the down edge and is read on the following up edge; `MoreThan`
/// matches at or above the threshold and `LessThan` strictly below, so the two never
/// both match the same press. Handler gets [`ButtonState::Down`] and the press duration.
pub struct PushedTimedEvent<'a> {
    base: EventBase<'a>,
    timeout: Timeout<'a>,
    comparison: TimeComparison,
    was_down: Cell<bool>,
}

impl<'a> PushedTimedEvent<'a> {
    /// Creates a push detector comparing against `duration_ms`.
    pub fn new(
        clock: &'a dyn Clock,
        comparison: TimeComparison,
        duration_ms: u32,
        handler: Option<&'a dyn EventHandler<'a>>,
    ) -> Self {
        Self {
            base: EventBase::new(handler),
            timeout: Timeout::new(clock, duration_ms),
            comparison,
            was_down: Cell::new(false),
        }
    }

    /// Press held at least `duration_ms`, then released.
    pub fn more_than(clock: &'a dyn Clock, duration_ms: u32, handler: Option<&'a dyn EventHandler<'a>>) -> Self {
        Self::new(clock, TimeComparison::MoreThan, duration_ms, handler)
    }

    /// Press released before `duration_ms`.
    pub fn less_than(clock: &'a dyn Clock, duration_ms: u32, handler: Option<&'a dyn EventHandler<'a>>) -> Self {
        Self::new(clock, TimeComparison::LessThan, duration_ms, handler)
    }

    /// Threshold direction.
    pub fn comparison(&self) -> TimeComparison {
        self.comparison
    }
}

impl<'a> ButtonEvent<'a> for PushedTimedEvent<'a> {
    fn base(&self) -> &EventBase<'a> {
        &self.base
    }

    fn observe(&'a self, button: &Button<'a>, state_ms: u32, old: ButtonState, new: ButtonState) {
        if old == new {
            return;
        }

        if !self.was_down.get() && new.is_down() {
            self.was_down.set(true);
            self.timeout.restart();
        } else if self.was_down.get() && new.is_up() {
            self.was_down.set(false);
            let long = self.timeout.is_elapsed(false);
            let matched = match self.comparison {
                TimeComparison::MoreThan => long,
                TimeComparison::LessThan => !long,
            };
            if matched {
                trace!("Timed push fired after {} ms", state_ms);
                self.base.fire(button, self, old, state_ms);
            }
        }
    }
}

impl<'a> TimedButtonEvent<'a> for PushedTimedEvent<'a> {
    fn timeout(&self) -> &Timeout<'a> {
        &self.timeout
    }
}

/// Inactivity alarm.
///
/// While the state stays the same it fires every `duration_ms`; any state change
/// restarts the period. Handler gets the unchanged state and the dwell so far.
pub struct SteadyMoreThan<'a> {
    base: EventBase<'a>,
    timeout: Timeout<'a>,
    raised: Cell<bool>,
}

impl<'a> SteadyMoreThan<'a> {
    /// Creates an alarm with period `duration_ms`, starting now.
    pub fn new(clock: &'a dyn Clock, duration_ms: u32, handler: Option<&'a dyn EventHandler<'a>>) -> Self {
        Self {
            base: EventBase::new(handler),
            timeout: Timeout::new(clock, duration_ms),
            raised: Cell::new(false),
        }
    }

    /// Whether the alarm fired since the last state change.
    pub fn is_raised(&self) -> bool {
        self.raised.get()
    }
}

impl<'a> ButtonEvent<'a> for SteadyMoreThan<'a> {
    fn base(&self) -> &EventBase<'a> {
        &self.base
    }

    fn observe(&'a self, button: &Button<'a>, state_ms: u32, old: ButtonState, new: ButtonState) {
        if old != new {
            self.raised.set(false);
            self.timeout.restart();
        } else if self.timeout.is_elapsed(true) {
            self.raised.set(true);
            trace!("Steady for {} ms", state_ms);
            self.base.fire(button, self, old, state_ms);
        }
    }
}

impl<'a> TimedButtonEvent<'a> for SteadyMoreThan<'a> {
    fn timeout(&self) -> &Timeout<'a> {
        &self.timeout
    }
}
