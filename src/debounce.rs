/*
 * Debouncing for the pedestrian buttons.
 *
 * The buttons are active-low with a pull-up and raise an interrupt on every
 * falling edge. A mechanical contact produces a burst of those edges for a
 * single press. An edge is accepted when the logical level differs from the
 * last accepted one, or when more than the debounce window has passed since
 * the last acceptance. Everything else is a bounce.
 *
 * The debouncer is owned by the task that waits on the button lines, so its
 * state is only ever touched from that one context.
 */

use embassy_time::{Duration, Instant};
use enum_ordinalize::Ordinalize;

#[derive(Ordinalize, Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(usize)]
pub enum ButtonId {
    A,
    B,
}

/// An accepted edge.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Pressed,
    Released,
}

#[derive(Copy, Clone)]
struct ButtonState {
    last_level: bool,
    last_time: Option<Instant>,
}

impl ButtonState {
    const fn new() -> Self {
        ButtonState {
            last_level: false,
            last_time: None,
        }
    }
}

pub struct Debouncer {
    window: Duration,
    buttons: [ButtonState; ButtonId::VARIANT_COUNT],
}

impl Debouncer {
    pub const fn new(window: Duration) -> Self {
        Debouncer {
            window,
            buttons: [ButtonState::new(); ButtonId::VARIANT_COUNT],
        }
    }

    /// Feed one interrupt edge. `raw_level` is the pin level read in the
    /// handler, `now` a monotonic timestamp.
    pub fn on_edge(&mut self, button: ButtonId, raw_level: bool, now: Instant) -> Option<Edge> {
        let window = self.window;
        let state = &mut self.buttons[button.ordinal()];
        let pressed = !raw_level;

        let settled = match state.last_time {
            None => true,
            Some(last) => now.saturating_duration_since(last) > window,
        };
        if pressed == state.last_level && !settled {
            return None;
        }

        state.last_level = pressed;
        state.last_time = Some(now);

        Some(if pressed { Edge::Pressed } else { Edge::Released })
    }
}
