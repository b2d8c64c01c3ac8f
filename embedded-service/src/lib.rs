//! Embedded Services Interface Exports
//!
//! Shared plumbing for the button services: logging macros, the millisecond
//! clock source and the polling entry point.

#![no_std]
#![warn(missing_docs)]

pub mod clock;
pub mod fmt;
pub mod updater;

pub use clock::{Clock, MockClock, SystemClock};
pub use updater::{Updatable, Updater};
