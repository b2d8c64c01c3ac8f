//! Hardware buttons without software debouncing

use embedded_hal_1::digital::InputPin;
use embedded_services::{warn, Clock, Updatable};

use crate::button::{Button, ButtonState};
use crate::event::ButtonEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Enum representing if the button is active low or active high.
pub enum ActiveState {
    /// Button is active low, the usual wiring with a pull-up.
    #[default]
    ActiveLow,
    /// Button is active high.
    ActiveHigh,
}

/// Samples `pin` and maps its level to a button state.
///
/// A failed read counts as released.
pub(crate) fn sample<I: InputPin>(pin: &mut I, active_state: ActiveState) -> ButtonState {
    let pressed = match active_state {
        ActiveState::ActiveLow => pin.is_low(),
        ActiveState::ActiveHigh => pin.is_high(),
    };

    match pressed {
        Ok(pressed) => ButtonState::from_pressed(pressed),
        Err(_) => {
            warn!("Button pin read failed");
            ButtonState::Up
        }
    }
}

/// A button read straight from a GPIO on every update.
///
/// Only suitable for inputs that are debounced in hardware; otherwise use
/// [`DebouncedButton`](crate::debounce::DebouncedButton). The pin must already be
/// configured as an input, with whatever pull resistor the wiring needs.
pub struct GpioButton<'a, I> {
    button: Button<'a>,
    pin: I,
    active_state: ActiveState,
}

impl<'a, I: InputPin> GpioButton<'a, I> {
    /// Creates a released button on `pin`.
    pub fn new(clock: &'a dyn Clock, pin: I, events: &'a [&'a dyn ButtonEvent<'a>], active_state: ActiveState) -> Self {
        Self {
            button: Button::new(clock, events, ButtonState::Up),
            pin,
            active_state,
        }
    }

    /// Samples the pin and propagates its state to the events.
    pub fn update(&mut self) {
        let state = sample(&mut self.pin, self.active_state);
        self.button.set_state(state);
    }

    /// The underlying button.
    pub fn button(&self) -> &Button<'a> {
        &self.button
    }

    /// Mutable access to the pin.
    pub fn pin_mut(&mut self) -> &mut I {
        &mut self.pin
    }
}

impl<I: InputPin> Updatable for GpioButton<'_, I> {
    fn update(&mut self) {
        GpioButton::update(self);
    }
}
