/*
 * Timing and sound settings for the crossing.
 *
 * All values are compile-time constants on the board, but they are gathered
 * in one value type so the controller and the tests can run with the same
 * numbers, or with shortened ones.
 */

use embassy_time::Duration;

/// Nominal duration of each phase, in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    pub red_secs: u32,
    pub green_secs: u32,
    pub yellow_secs: u32,
    /// Red shown to traffic while pedestrians cross.
    pub crossing_secs: u32,
}

impl Timing {
    pub const fn new() -> Self {
        Timing {
            red_secs: 10,
            green_secs: 10,
            yellow_secs: 3,
            crossing_secs: 10,
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::new()
    }
}

/// Buzzer feedback for an accepted pedestrian request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ToneProfile {
    pub frequency_hz: u32,
    /// Length of the tone sounded right after the press.
    pub alert: Duration,
    /// Interval between bips while the request waits to be serviced.
    pub bip_period: Duration,
    /// Length of a single bip.
    pub bip_burst: Duration,
}

impl ToneProfile {
    pub const fn new() -> Self {
        ToneProfile {
            frequency_hz: 4_000,
            alert: Duration::from_millis(300),
            bip_period: Duration::from_millis(500),
            bip_burst: Duration::from_millis(100),
        }
    }
}

impl Default for ToneProfile {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub timing: Timing,
    pub tone: ToneProfile,
    /// Edges at the same level closer together than this are bounces.
    pub debounce_window: Duration,
}

impl Config {
    pub const fn new() -> Self {
        Config {
            timing: Timing::new(),
            tone: ToneProfile::new(),
            debounce_window: Duration::from_millis(50),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
