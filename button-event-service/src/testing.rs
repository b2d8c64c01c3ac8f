//! Handler recorder shared by the unit tests

use core::cell::{Cell, RefCell};

use heapless::Vec;

use crate::button::{Button, ButtonState};
use crate::event::{ButtonEvent, EventHandler};

pub(crate) struct Recorder {
    hits: RefCell<Vec<(ButtonState, u32), 32>>,
    last_event: Cell<*const ()>,
}

impl Recorder {
    pub(crate) fn new() -> Self {
        Self {
            hits: RefCell::new(Vec::new()),
            last_event: Cell::new(core::ptr::null()),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.hits.borrow().len()
    }

    pub(crate) fn hit(&self, index: usize) -> Option<(ButtonState, u32)> {
        self.hits.borrow().get(index).copied()
    }

    pub(crate) fn last(&self) -> Option<(ButtonState, u32)> {
        self.hits.borrow().last().copied()
    }

    pub(crate) fn fired_by(&self, event: &dyn ButtonEvent<'_>) -> bool {
        self.last_event.get() == core::ptr::from_ref(event).cast::<()>()
    }
}

impl<'a> EventHandler<'a> for Recorder {
    fn on_event(&'a self, _button: &Button<'a>, event: &dyn ButtonEvent<'a>, state: ButtonState, duration_ms: u32) {
        self.hits
            .borrow_mut()
            .push((state, duration_ms))
            .expect("recorder full");
        self.last_event.set(core::ptr::from_ref(event).cast::<()>());
    }
}
