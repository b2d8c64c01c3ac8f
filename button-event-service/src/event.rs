//! Button events: the handler contract and the untimed edge detectors
//!
//! Every detector shares an [`EventBase`] holding its enabled flag and its handler. Both
//! live in cells because events are borrowed, not owned: one instance may be attached to
//! a [`Button`] and to one or more sequence steps at the same time, and a sequence swaps
//! the handler of the step it is waiting on.

use core::cell::Cell;

use embedded_services::trace;

use crate::button::{Button, ButtonState};

/// Application reaction to a detected event.
///
/// Anything the application would pass as user data lives in the implementing type.
/// Handlers run inline on the polling thread and must return quickly; they must not feed
/// states back into the button that is calling them.
pub trait EventHandler<'a> {
    /// Called when `event` fires on `button`.
    ///
    /// `state` and `duration_ms` describe the state the firing condition refers to and
    /// how long the button has been in it; see each event type for the exact meaning.
    fn on_event(&'a self, button: &Button<'a>, event: &dyn ButtonEvent<'a>, state: ButtonState, duration_ms: u32);
}

/// Enabled flag and handler slot common to all events.
pub struct EventBase<'a> {
    handler: Cell<Option<&'a dyn EventHandler<'a>>>,
    enabled: Cell<bool>,
}

impl<'a> EventBase<'a> {
    /// Creates an enabled base. `None` makes the event silent.
    pub fn new(handler: Option<&'a dyn EventHandler<'a>>) -> Self {
        Self {
            handler: Cell::new(handler),
            enabled: Cell::new(true),
        }
    }

    /// Whether the owning event takes part in button updates.
    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    /// Enables or disables the owning event.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    /// Current handler.
    pub fn handler(&self) -> Option<&'a dyn EventHandler<'a>> {
        self.handler.get()
    }

    /// Replaces the handler.
    pub fn set_handler(&self, handler: Option<&'a dyn EventHandler<'a>>) {
        self.handler.set(handler);
    }

    /// Invokes the current handler, if any.
    pub fn fire(&self, button: &Button<'a>, event: &dyn ButtonEvent<'a>, state: ButtonState, duration_ms: u32) {
        if let Some(handler) = self.handler.get() {
            handler.on_event(button, event, state, duration_ms);
        }
    }
}

/// A gesture detector fed by a [`Button`] on every update.
pub trait ButtonEvent<'a> {
    /// Shared enabled flag and handler.
    fn base(&self) -> &EventBase<'a>;

    /// Reacts to one button update.
    ///
    /// Called with the state before the update (`old`), the proposed state (`new`) and
    /// the time spent in `old`. `old == new` on plain polls, which is what lets timed
    /// detectors fire without an input change. Only called while the event is enabled.
    fn observe(&'a self, button: &Button<'a>, state_ms: u32, old: ButtonState, new: ButtonState);

    /// Prepares the event once it is borrowed for good, before the first update.
    ///
    /// [`Button::new`] calls this on each of its events. Nothing to do by default;
    /// composite events use it to hook themselves into their children.
    fn attach(&'a self) {}

    /// See [`EventBase::is_enabled`].
    fn is_enabled(&self) -> bool {
        self.base().is_enabled()
    }

    /// See [`EventBase::set_enabled`].
    fn set_enabled(&self, enabled: bool) {
        self.base().set_enabled(enabled);
    }

    /// See [`EventBase::handler`].
    fn handler(&self) -> Option<&'a dyn EventHandler<'a>> {
        self.base().handler()
    }

    /// See [`EventBase::set_handler`].
    fn set_handler(&self, handler: Option<&'a dyn EventHandler<'a>>) {
        self.base().set_handler(handler);
    }
}

/// Returns true if both references point at the same event instance.
pub fn same_event(a: &dyn ButtonEvent<'_>, b: &dyn ButtonEvent<'_>) -> bool {
    core::ptr::addr_eq(a, b)
}

/// Fires on the up to down edge.
///
/// Handler gets [`ButtonState::Down`] and the time previously spent up.
pub struct Down<'a> {
    base: EventBase<'a>,
}

impl<'a> Down<'a> {
    /// Creates an enabled down detector.
    pub fn new(handler: Option<&'a dyn EventHandler<'a>>) -> Self {
        Self {
            base: EventBase::new(handler),
        }
    }
}

impl<'a> ButtonEvent<'a> for Down<'a> {
    fn base(&self) -> &EventBase<'a> {
        &self.base
    }

    fn observe(&'a self, button: &Button<'a>, state_ms: u32, old: ButtonState, new: ButtonState) {
        if old != new && new.is_down() {
            trace!("Down fired");
            self.base.fire(button, self, new, state_ms);
        }
    }
}

/// Fires on the down to up edge.
///
/// Handler gets [`ButtonState::Up`] and the time previously spent down.
pub struct Up<'a> {
    base: EventBase<'a>,
}

impl<'a> Up<'a> {
    /// Creates an enabled up detector.
    pub fn new(handler: Option<&'a dyn EventHandler<'a>>) -> Self {
        Self {
            base: EventBase::new(handler),
        }
    }
}

impl<'a> ButtonEvent<'a> for Up<'a> {
    fn base(&self) -> &EventBase<'a> {
        &self.base
    }

    fn observe(&'a self, button: &Button<'a>, state_ms: u32, old: ButtonState, new: ButtonState) {
        if old != new && new.is_up() {
            trace!("Up fired");
            self.base.fire(button, self, new, state_ms);
        }
    }
}

/// Fires on the up edge that closes a press it has seen start.
///
/// Handler gets [`ButtonState::Up`] and the time spent down.
pub struct Pushed<'a> {
    base: EventBase<'a>,
    was_down: Cell<bool>,
}

impl<'a> Pushed<'a> {
    /// Creates an enabled push detector.
    pub fn new(handler: Option<&'a dyn EventHandler<'a>>) -> Self {
        Self {
            base: EventBase::new(handler),
            was_down: Cell::new(false),
        }
    }
}

impl<'a> ButtonEvent<'a> for Pushed<'a> {
    fn base(&self) -> &EventBase<'a> {
        &self.base
    }

    fn observe(&'a self, button: &Button<'a>, state_ms: u32, old: ButtonState, new: ButtonState) {
        if old == new {
            return;
        }

        if new.is_down() {
            self.was_down.set(true);
        } else if self.was_down.replace(false) {
            trace!("Pushed fired after {} ms", state_ms);
            self.base.fire(button, self, new, state_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Recorder;
    use embedded_services::MockClock;

    #[test]
    fn down_and_up_fire_once_per_edge() {
        let clock = MockClock::new(0);
        let down_rec = Recorder::new();
        let up_rec = Recorder::new();
        let down = Down::new(Some(&down_rec));
        let up = Up::new(Some(&up_rec));
        let events: [&dyn ButtonEvent; 2] = [&down, &up];
        let mut button = Button::new(&clock, &events, ButtonState::Up);

        button.set_state(ButtonState::Down);
        for _ in 0..5 {
            clock.advance(10);
            button.update();
        }
        assert_eq!(down_rec.calls(), 1);
        assert_eq!(up_rec.calls(), 0);

        button.set_state(ButtonState::Up);
        button.update();
        button.set_state(ButtonState::Up);
        assert_eq!(down_rec.calls(), 1);
        assert_eq!(up_rec.calls(), 1);
        assert_eq!(up_rec.last(), Some((ButtonState::Up, 50)));
        assert!(up_rec.fired_by(&up));
    }

    #[test]
    fn pushed_needs_down_then_up() {
        let clock = MockClock::new(0);
        let rec = Recorder::new();
        let pushed = Pushed::new(Some(&rec));
        let events: [&dyn ButtonEvent; 1] = [&pushed];
        // a button that starts pressed has not been seen going down
        let mut button = Button::new(&clock, &events, ButtonState::Down);

        button.set_state(ButtonState::Up);
        assert_eq!(rec.calls(), 0);

        button.set_state(ButtonState::Down);
        clock.advance(120);
        button.update();
        assert_eq!(rec.calls(), 0);

        button.set_state(ButtonState::Up);
        assert_eq!(rec.calls(), 1);
        assert_eq!(rec.last(), Some((ButtonState::Up, 120)));
    }

    #[test]
    fn pushed_does_not_double_fire() {
        let clock = MockClock::new(0);
        let rec = Recorder::new();
        let pushed = Pushed::new(Some(&rec));
        let events: [&dyn ButtonEvent; 1] = [&pushed];
        let mut button = Button::new(&clock, &events, ButtonState::Up);

        // two down observations without a release in between
        pushed.observe(&button, 0, ButtonState::Up, ButtonState::Down);
        pushed.observe(&button, 0, ButtonState::Up, ButtonState::Down);
        pushed.observe(&button, 10, ButtonState::Down, ButtonState::Up);
        pushed.observe(&button, 10, ButtonState::Down, ButtonState::Up);
        assert_eq!(rec.calls(), 1);

        button.set_state(ButtonState::Down);
        button.set_state(ButtonState::Up);
        assert_eq!(rec.calls(), 2);
    }

    #[test]
    fn silent_event_and_handler_swap() {
        let clock = MockClock::new(0);
        let rec = Recorder::new();
        let down = Down::new(None);
        let events: [&dyn ButtonEvent; 1] = [&down];
        let mut button = Button::new(&clock, &events, ButtonState::Up);

        button.set_state(ButtonState::Down);
        button.set_state(ButtonState::Up);
        assert!(down.handler().is_none());

        down.set_handler(Some(&rec));
        button.set_state(ButtonState::Down);
        assert_eq!(rec.calls(), 1);
    }

    #[test]
    fn identity_comparison() {
        let a = Down::new(None);
        let b = Down::new(None);
        assert!(same_event(&a, &a));
        assert!(!same_event(&a, &b));
    }
}
