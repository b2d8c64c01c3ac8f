//! Ordered event sequences
//!
//! An [`EventsSequence`] chains other events into a multi-step gesture. Only the step it
//! is waiting on is enabled; every other step is disabled, whether or not it is also
//! attached elsewhere. While a step is armed its handler is swapped for the sequence
//! itself, which then runs the step's own handler, fires the sequence handler after the
//! final step, and arms the next step.

use core::cell::Cell;

use embedded_services::{debug, Clock};

use crate::button::{Button, ButtonState};
use crate::event::{ButtonEvent, EventBase, EventHandler};
use crate::timeout::Timeout;

/// A gesture made of ordered steps, each one an existing event.
///
/// The first step may wait forever. Every later step must fire within the step timeout
/// of the previous one, otherwise the sequence silently restarts from the first step.
/// The same event instance may appear at several steps.
///
/// The relay handler is installed when the sequence is attached to a [`Button`], or by
/// calling [`EventsSequence::reset`] when it is driven some other way. A sequence built
/// over an empty step list never fires.
pub struct EventsSequence<'a> {
    base: EventBase<'a>,
    steps: &'a [&'a dyn ButtonEvent<'a>],
    current: Cell<usize>,
    step_handler: Cell<Option<&'a dyn EventHandler<'a>>>,
    step_timeout: Timeout<'a>,
}

impl<'a> EventsSequence<'a> {
    /// Creates a sequence over `steps` waiting on the first one.
    ///
    /// `handler` fires when the last step completes in time. The constructor already
    /// disables every step but the first.
    pub fn new(
        clock: &'a dyn Clock,
        steps: &'a [&'a dyn ButtonEvent<'a>],
        step_timeout_ms: u32,
        handler: Option<&'a dyn EventHandler<'a>>,
    ) -> Self {
        for step in steps {
            step.set_enabled(false);
        }
        if let Some(first) = steps.first() {
            first.set_enabled(true);
        }

        Self {
            base: EventBase::new(handler),
            steps,
            current: Cell::new(0),
            step_handler: Cell::new(steps.first().and_then(|step| step.handler())),
            step_timeout: Timeout::new(clock, step_timeout_ms),
        }
    }

    /// Goes back to waiting on the first step.
    pub fn reset(&'a self) {
        self.move_to(0);
    }

    /// Index of the step being waited on.
    pub fn current_step(&self) -> usize {
        self.current.get()
    }

    /// Number of steps.
    pub fn events_count(&self) -> usize {
        self.steps.len()
    }

    /// Step event at `index`, if any.
    pub fn event(&self, index: usize) -> Option<&'a dyn ButtonEvent<'a>> {
        self.steps.get(index).copied()
    }

    /// Time allowed between two steps.
    pub fn step_timeout_ms(&self) -> u32 {
        self.step_timeout.timeout_ms()
    }

    /// Changes the time allowed between two steps.
    pub fn set_step_timeout(&self, step_timeout_ms: u32, restart: bool) {
        self.step_timeout.set_timeout(step_timeout_ms, restart);
    }

    fn is_first(&self) -> bool {
        self.current.get() == 0
    }

    fn is_last(&self) -> bool {
        self.current.get() + 1 >= self.steps.len()
    }

    fn move_next(&'a self) {
        let next = if self.is_last() { 0 } else { self.current.get() + 1 };
        self.move_to(next);
    }

    fn move_to(&'a self, step: usize) {
        if let Some(current) = self.event(self.current.get()) {
            current.set_handler(self.step_handler.get());
        }

        // disable everything before enabling the target, a step may repeat an instance
        for event in self.steps {
            event.set_enabled(false);
        }

        let step = step.min(self.steps.len().saturating_sub(1));
        self.current.set(step);
        if let Some(next) = self.event(step) {
            next.set_enabled(true);
            self.step_handler.set(next.handler());
            next.set_handler(Some(self));
        }

        self.step_timeout.restart();
    }
}

impl<'a> ButtonEvent<'a> for EventsSequence<'a> {
    fn base(&self) -> &EventBase<'a> {
        &self.base
    }

    fn attach(&'a self) {
        for step in self.steps {
            step.attach();
        }
        self.reset();
    }

    fn observe(&'a self, button: &Button<'a>, state_ms: u32, old: ButtonState, new: ButtonState) {
        if !self.is_first() && self.step_timeout.is_elapsed(false) {
            debug!("Sequence timed out waiting on step {}", self.current.get());
            self.reset();
        }

        if let Some(step) = self.event(self.current.get()) {
            if step.is_enabled() {
                step.observe(button, state_ms, old, new);
            }
        }
    }
}

/// Relay installed on the armed step.
impl<'a> EventHandler<'a> for EventsSequence<'a> {
    fn on_event(&'a self, button: &Button<'a>, event: &dyn ButtonEvent<'a>, state: ButtonState, duration_ms: u32) {
        if let Some(handler) = self.step_handler.get() {
            handler.on_event(button, event, state, duration_ms);
        }

        if self.is_last() {
            debug!("Sequence completed");
            self.base.fire(button, event, state, duration_ms);
        } else {
            debug!("Sequence step {} done", self.current.get());
        }

        self.move_next();
    }
}
