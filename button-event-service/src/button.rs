//! Button state propagation

use embedded_services::{trace, Clock, Updatable};

use crate::event::ButtonEvent;

/// Discrete, already debounced button level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonState {
    /// Released.
    #[default]
    Up,
    /// Pressed.
    Down,
}

impl ButtonState {
    /// Maps an "asserted" reading to a state.
    pub const fn from_pressed(pressed: bool) -> Self {
        if pressed {
            Self::Down
        } else {
            Self::Up
        }
    }

    /// Returns true for [`ButtonState::Down`].
    pub const fn is_down(self) -> bool {
        matches!(self, Self::Down)
    }

    /// Returns true for [`ButtonState::Up`].
    pub const fn is_up(self) -> bool {
        matches!(self, Self::Up)
    }
}

/// A button driven by explicit state updates.
///
/// The button borrows its events: they are allocated by the application, may be
/// shared with an [`EventsSequence`](crate::sequence::EventsSequence), and must
/// outlive the button.
pub struct Button<'a> {
    clock: &'a dyn Clock,
    events: &'a [&'a dyn ButtonEvent<'a>],
    state: ButtonState,
    state_since_ms: u32,
}

impl<'a> Button<'a> {
    /// Creates a button in `initial_state`, dispatching to `events` in order.
    ///
    /// Every event is [attached](ButtonEvent::attach) here, so sequences are armed before
    /// the first update.
    pub fn new(clock: &'a dyn Clock, events: &'a [&'a dyn ButtonEvent<'a>], initial_state: ButtonState) -> Self {
        for &event in events {
            event.attach();
        }

        Self {
            clock,
            events,
            state: initial_state,
            state_since_ms: clock.now_ms(),
        }
    }

    /// Feeds `state` to every enabled event, then commits it.
    ///
    /// Events observe before the commit, so each sees the previous state next to the
    /// proposed one together with the time spent in the previous state. Re-asserting the
    /// current state gives timed events a chance to fire and does not reset the dwell.
    pub fn set_state(&mut self, state: ButtonState) {
        let now = self.clock.now_ms();
        let elapsed_ms = now.wrapping_sub(self.state_since_ms);
        let old = self.state;

        let events = self.events;
        for &event in events.iter() {
            if event.is_enabled() {
                event.observe(self, elapsed_ms, old, state);
            }
        }

        if old != state {
            trace!("Button {} after {} ms", if state.is_down() { "down" } else { "up" }, elapsed_ms);
            self.state = state;
            self.state_since_ms = now;
        }
    }

    /// Re-asserts the current state.
    pub fn update(&mut self) {
        self.set_state(self.state);
    }

    /// Current state.
    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// Timestamp at which the current state was entered.
    pub fn state_since_ms(&self) -> u32 {
        self.state_since_ms
    }

    /// Time spent in the current state so far.
    pub fn state_duration_ms(&self) -> u32 {
        self.clock.now_ms().wrapping_sub(self.state_since_ms)
    }

    /// Number of attached events.
    pub fn events_count(&self) -> usize {
        self.events.len()
    }

    /// Attached event at `index`, if any.
    pub fn event(&self, index: usize) -> Option<&'a dyn ButtonEvent<'a>> {
        self.events.get(index).copied()
    }
}

impl Updatable for Button<'_> {
    fn update(&mut self) {
        Button::update(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Down, Up};
    use crate::testing::Recorder;
    use embedded_services::MockClock;

    #[test]
    fn dwell_clock_only_resets_on_change() {
        let clock = MockClock::new(0);
        let events: [&dyn ButtonEvent; 0] = [];
        let mut button = Button::new(&clock, &events, ButtonState::Up);

        clock.advance(100);
        button.set_state(ButtonState::Up);
        assert_eq!(button.state_since_ms(), 0);
        assert_eq!(button.state_duration_ms(), 100);

        button.set_state(ButtonState::Down);
        assert_eq!(button.state(), ButtonState::Down);
        assert_eq!(button.state_since_ms(), 100);

        clock.advance(50);
        button.update();
        assert_eq!(button.state_since_ms(), 100);
        assert_eq!(button.state_duration_ms(), 50);
    }

    #[test]
    fn events_see_previous_state_and_dwell() {
        let clock = MockClock::new(0);
        let down_rec = Recorder::new();
        let up_rec = Recorder::new();
        let down = Down::new(Some(&down_rec));
        let up = Up::new(Some(&up_rec));
        let events: [&dyn ButtonEvent; 2] = [&down, &up];
        let mut button = Button::new(&clock, &events, ButtonState::Up);

        clock.advance(250);
        button.set_state(ButtonState::Down);
        assert_eq!(down_rec.calls(), 1);
        assert_eq!(down_rec.last(), Some((ButtonState::Down, 250)));
        assert_eq!(up_rec.calls(), 0);

        clock.advance(40);
        button.set_state(ButtonState::Up);
        assert_eq!(up_rec.last(), Some((ButtonState::Up, 40)));
    }

    #[test]
    fn disabled_events_are_skipped() {
        let clock = MockClock::new(0);
        let rec = Recorder::new();
        let down = Down::new(Some(&rec));
        down.set_enabled(false);
        let events: [&dyn ButtonEvent; 1] = [&down];
        let mut button = Button::new(&clock, &events, ButtonState::Up);

        button.set_state(ButtonState::Down);
        button.set_state(ButtonState::Up);
        button.set_state(ButtonState::Down);
        assert_eq!(rec.calls(), 0);

        button.set_state(ButtonState::Up);
        down.set_enabled(true);
        button.set_state(ButtonState::Down);
        assert_eq!(rec.calls(), 1);
    }

    #[test]
    fn event_lookup_out_of_range() {
        let clock = MockClock::new(0);
        let down = Down::new(None);
        let events: [&dyn ButtonEvent; 1] = [&down];
        let button = Button::new(&clock, &events, ButtonState::Up);

        assert_eq!(button.events_count(), 1);
        assert!(button.event(0).is_some());
        assert!(button.event(1).is_none());
    }

    #[test]
    fn dwell_is_wrap_safe() {
        let clock = MockClock::new(u32::MAX - 10);
        let rec = Recorder::new();
        let up = Up::new(Some(&rec));
        let events: [&dyn ButtonEvent; 1] = [&up];
        let mut button = Button::new(&clock, &events, ButtonState::Down);

        clock.advance(30);
        button.set_state(ButtonState::Up);
        assert_eq!(rec.last(), Some((ButtonState::Up, 30)));
    }
}
