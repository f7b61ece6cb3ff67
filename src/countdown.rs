/*
 * The seconds left in the current phase, as shown on the display.
 *
 * Two writers: the 1 Hz tick task decrements it, the controller resets it on
 * every phase change. The decrement is a compare-and-swap loop so a reset that
 * lands in between is never overwritten with a stale value.
 */

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_time::Duration;

/// Period of the countdown ticker.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

pub struct Countdown(AtomicU32);

impl Countdown {
    pub const fn new() -> Self {
        Countdown(AtomicU32::new(0))
    }

    pub fn reset(&self, seconds: u32) {
        self.0.store(seconds, Ordering::Release);
    }

    pub fn get(&self) -> u32 {
        self.0.load(Ordering::Acquire)
    }

    /// Called once per tick. Returns the new value if there was anything left
    /// to count down, in which case the display needs a refresh.
    pub fn tick(&self) -> Option<u32> {
        self.0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |seconds| {
                seconds.checked_sub(1)
            })
            .ok()
            .map(|previous| previous - 1)
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}
