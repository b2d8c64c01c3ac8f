//! Button Event Service
//!
//! Turns a polled, possibly bouncing button level into application events: edges,
//! pushes, presses timed against thresholds, inactivity alarms and ordered multi-step
//! gestures.
//!
//! The application owns every event and hands out references: a [`Button`] dispatches
//! to a fixed slice of events on each update, and an [`EventsSequence`] drives a fixed
//! slice of step events. Nothing allocates and nothing blocks; all time is read through
//! an [`embedded_services::Clock`].

#![no_std]
#![warn(missing_docs)]

pub mod button;
pub mod debounce;
pub mod event;
pub mod gpio;
pub mod sequence;
pub mod timed;
pub mod timeout;

#[cfg(test)]
mod testing;

pub use button::{Button, ButtonState};
pub use debounce::{DebounceConfig, DebouncedButton};
pub use event::{same_event, ButtonEvent, Down, EventBase, EventHandler, Pushed, Up};
pub use gpio::{ActiveState, GpioButton};
pub use sequence::EventsSequence;
pub use timed::{PushedTimedEvent, StateTimedEvent, SteadyMoreThan, TimeComparison, TimedButtonEvent};
pub use timeout::Timeout;
