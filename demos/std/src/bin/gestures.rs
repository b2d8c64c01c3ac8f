//! Three debounced buttons polled from a simulated main loop.
//!
//! Pin levels come from a press script with contact chatter after every edge, and time
//! comes from a mock clock advanced by one tick per loop iteration.

use std::convert::Infallible;

use button_event_service::{
    ActiveState, Button, ButtonEvent, ButtonState, DebounceConfig, DebouncedButton, Down, EventHandler, EventsSequence,
    Pushed, PushedTimedEvent, Up,
};
use embassy_time as _;
use embedded_hal::digital::{ErrorType, InputPin};
use embedded_services::{Clock, MockClock, Updatable, Updater};
use log::*;

const TICK_MS: u32 = 5;
const CHATTER_MS: u32 = 15;

/// Active high pin following a list of `(press, release)` times.
struct ScriptedPin<'a> {
    clock: &'a MockClock,
    presses: &'static [(u32, u32)],
}

impl ScriptedPin<'_> {
    fn level(&self) -> bool {
        let now = self.clock.now_ms();
        let pressed = self.presses.iter().any(|&(down, up)| now >= down && now < up);
        let chattering = self
            .presses
            .iter()
            .flat_map(|&(down, up)| [down, up])
            .any(|edge| now >= edge && now < edge + CHATTER_MS && (now - edge) / TICK_MS % 2 == 1);
        pressed != chattering
    }
}

impl ErrorType for ScriptedPin<'_> {
    type Error = Infallible;
}

impl InputPin for ScriptedPin<'_> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level())
    }
}

/// Logs a fixed message, the way firmware would toggle an output.
struct Announce(&'static str);

impl<'a> EventHandler<'a> for Announce {
    fn on_event(&'a self, _button: &Button<'a>, _event: &dyn ButtonEvent<'a>, state: ButtonState, duration_ms: u32) {
        info!("{} ({:?}, {} ms)", self.0, state, duration_ms);
    }
}

fn main() {
    env_logger::builder().filter_level(log::LevelFilter::Info).init();

    let clock = MockClock::new(0);
    let config = DebounceConfig::new(30, ActiveState::ActiveHigh);

    let pushed_msg = Announce("Button pushed");
    let pushed = Pushed::new(Some(&pushed_msg));
    let push_events: [&dyn ButtonEvent; 1] = [&pushed];
    let push_pin = ScriptedPin {
        clock: &clock,
        presses: &[(100, 400)],
    };
    let mut push_button = DebouncedButton::new(&clock, push_pin, &push_events, config);

    let up_msg = Announce("Button up");
    let down_msg = Announce("Button down");
    let up = Up::new(Some(&up_msg));
    let down = Down::new(Some(&down_msg));
    let up_down_events: [&dyn ButtonEvent; 2] = [&up, &down];
    let up_down_pin = ScriptedPin {
        clock: &clock,
        presses: &[(600, 900)],
    };
    let mut up_down_button = DebouncedButton::new(&clock, up_down_pin, &up_down_events, config);

    let long_msg = Announce("Long button push");
    let short_msg = Announce("Short button push");
    let sequence_msg = Announce("Sequence completed");
    let long = PushedTimedEvent::more_than(&clock, 2000, Some(&long_msg));
    let short = PushedTimedEvent::less_than(&clock, 500, Some(&short_msg));
    let steps: [&dyn ButtonEvent; 3] = [&long, &short, &short];
    let sequence = EventsSequence::new(&clock, &steps, 2000, Some(&sequence_msg));
    let sequence_events: [&dyn ButtonEvent; 1] = [&sequence];
    let sequence_pin = ScriptedPin {
        clock: &clock,
        presses: &[(1000, 3200), (3400, 3600), (3800, 4000)],
    };
    let mut sequence_button = DebouncedButton::new(&clock, sequence_pin, &sequence_events, config);

    let mut updater = Updater::new([
        &mut push_button as &mut dyn Updatable,
        &mut up_down_button,
        &mut sequence_button,
    ]);

    info!("Polling {} buttons", updater.len());
    while clock.now_ms() < 5000 {
        clock.advance(TICK_MS);
        updater.update();
    }
    info!("Done");
}
