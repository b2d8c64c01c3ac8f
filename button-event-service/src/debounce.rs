//! Debounce Module

use embedded_hal_1::digital::InputPin;
use embedded_services::{debug, Clock, Updatable};

use crate::button::{Button, ButtonState};
use crate::event::ButtonEvent;
use crate::gpio::{sample, ActiveState};
use crate::timeout::Timeout;

#[derive(Debug, Clone, Copy)]
/// Struct representing the configuration of a debounced button.
pub struct DebounceConfig {
    settle_ms: u32,
    active_state: ActiveState,
}

impl DebounceConfig {
    /// Creates a new config: a raw level must hold for `settle_ms` to be reported.
    pub fn new(settle_ms: u32, active_state: ActiveState) -> Self {
        Self {
            settle_ms,
            active_state,
        }
    }

    /// Gets the settle duration.
    pub fn settle_ms(&self) -> u32 {
        self.settle_ms
    }

    /// Gets the active level.
    pub fn active_state(&self) -> ActiveState {
        self.active_state
    }
}

/// Default config with a settle time of 50ms and active low.
impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            settle_ms: 50,
            active_state: ActiveState::ActiveLow,
        }
    }
}

/// A GPIO button filtered by a settle timer.
///
/// Every change of the raw level restarts the timer. The reported state only follows
/// the raw level once it has held for the whole settle time, so bursts shorter than
/// that never reach the events.
pub struct DebouncedButton<'a, I> {
    button: Button<'a>,
    pin: I,
    config: DebounceConfig,
    settle: Timeout<'a>,
    candidate: ButtonState,
}

impl<'a, I: InputPin> DebouncedButton<'a, I> {
    /// Creates a released button on `pin`. The pin must already be configured as an
    /// input matching `config`'s active level.
    pub fn new(clock: &'a dyn Clock, pin: I, events: &'a [&'a dyn ButtonEvent<'a>], config: DebounceConfig) -> Self {
        Self {
            button: Button::new(clock, events, ButtonState::Up),
            pin,
            config,
            settle: Timeout::new(clock, config.settle_ms),
            candidate: ButtonState::Up,
        }
    }

    /// Samples the pin, debounces, and propagates the reported state to the events.
    pub fn update(&mut self) {
        let raw = sample(&mut self.pin, self.config.active_state);
        if raw != self.candidate {
            self.candidate = raw;
            self.settle.restart();
        }

        let reported = if self.settle.is_elapsed(false) {
            self.candidate
        } else {
            self.button.state()
        };

        if reported != self.button.state() {
            debug!("Debounced level settled, pressed={}", reported.is_down());
        }
        self.button.set_state(reported);
    }

    /// The underlying button.
    pub fn button(&self) -> &Button<'a> {
        &self.button
    }

    /// Returns the debounce configuration.
    pub fn config(&self) -> &DebounceConfig {
        &self.config
    }

    /// Mutable access to the pin.
    pub fn pin_mut(&mut self) -> &mut I {
        &mut self.pin
    }
}

impl<I: InputPin> Updatable for DebouncedButton<'_, I> {
    fn update(&mut self) {
        DebouncedButton::update(self);
    }
}
