/*
 * The phase sequence of the crossing.
 *
 * The normal cycle is red, green, yellow, red, ... A pending pedestrian
 * request cuts the current phase short and sends the light through the
 * crossing branch: yellow, then a longer red while pedestrians cross, then
 * back into green of the normal cycle. Once entered, the crossing branch runs
 * to the end and does not look at new requests.
 *
 * The crossing reuses the yellow and red phases, tagged with a different
 * cause, so its red is never mistaken for the red of the normal cycle.
 */

use crate::config::Timing;

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    Red,
    Green,
    Yellow,
}

impl Phase {
    /// Name shown on the display and in the log.
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Red => "Vermelho",
            Phase::Green => "Verde",
            Phase::Yellow => "Amarelo",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Cause {
    Cycle,
    Crossing,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Stage {
    pub phase: Phase,
    pub cause: Cause,
}

impl Stage {
    pub const fn cycle(phase: Phase) -> Self {
        Stage {
            phase,
            cause: Cause::Cycle,
        }
    }

    pub const fn crossing(phase: Phase) -> Self {
        Stage {
            phase,
            cause: Cause::Crossing,
        }
    }

    pub fn is_crossing(&self) -> bool {
        self.cause == Cause::Crossing
    }
}

/// Lamp states for one light head.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rag {
    pub red: bool,
    pub amber: bool,
    pub green: bool,
}

impl Rag {
    pub fn new(red: bool, amber: bool, green: bool) -> Self {
        Self { red, amber, green }
    }
}

#[derive(Debug)]
pub struct TrafficLight {
    stage: Stage,
    seconds_left: u32,
    timing: Timing,
}

impl TrafficLight {
    pub fn new(timing: Timing) -> Self {
        let stage = Stage::cycle(Phase::Red);
        TrafficLight {
            stage,
            seconds_left: phase_time_seconds(&timing, stage),
            timing,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn in_crossing(&self) -> bool {
        self.stage.is_crossing()
    }

    /*
     * Determine the stage that follows the current one once it has run its
     * full time, without changing the stage that we are in.
     */
    fn next_stage(&self) -> Stage {
        match (self.stage.phase, self.stage.cause) {
            (Phase::Red, Cause::Cycle) => Stage::cycle(Phase::Green),
            (Phase::Green, Cause::Cycle) => Stage::cycle(Phase::Yellow),
            (Phase::Yellow, Cause::Cycle) => Stage::cycle(Phase::Red),
            (Phase::Yellow, Cause::Crossing) => Stage::crossing(Phase::Red),
            (Phase::Red, Cause::Crossing) => Stage::cycle(Phase::Green),
            // The crossing branch never shows green; recover into the cycle.
            (Phase::Green, Cause::Crossing) => Stage::cycle(Phase::Green),
        }
    }

    fn enter(&mut self, stage: Stage) -> Stage {
        self.stage = stage;
        self.seconds_left = phase_time_seconds(&self.timing, stage);
        stage
    }

    /*
     * Called once per second. Returns the stage entered, if any.
     *
     * A pending request pre-empts any stage of the normal cycle, no matter how
     * much of it is left. The request flag is not consulted inside the
     * crossing branch.
     */
    pub fn advance(&mut self, crossing_requested: bool) -> Option<Stage> {
        if !self.in_crossing() && crossing_requested {
            return Some(self.enter(Stage::crossing(Phase::Yellow)));
        }

        self.seconds_left = self.seconds_left.saturating_sub(1);
        if self.seconds_left > 0 {
            return None;
        }

        Some(self.enter(self.next_stage()))
    }

    pub fn seconds_left(&self) -> u32 {
        self.seconds_left
    }

    pub fn phase_time_seconds(&self) -> u32 {
        phase_time_seconds(&self.timing, self.stage)
    }

    pub fn red(&self) -> bool {
        match self.stage.phase {
            Phase::Red => true,
            Phase::Yellow | Phase::Green => false,
        }
    }

    pub fn amber(&self) -> bool {
        match self.stage.phase {
            Phase::Yellow => true,
            Phase::Red | Phase::Green => false,
        }
    }

    pub fn green(&self) -> bool {
        match self.stage.phase {
            Phase::Green => true,
            Phase::Red | Phase::Yellow => false,
        }
    }

    pub fn rag(&self) -> Rag {
        Rag::new(self.red(), self.amber(), self.green())
    }
}

fn phase_time_seconds(timing: &Timing, stage: Stage) -> u32 {
    match (stage.phase, stage.cause) {
        (Phase::Red, Cause::Cycle) => timing.red_secs,
        (Phase::Red, Cause::Crossing) => timing.crossing_secs,
        (Phase::Green, _) => timing.green_secs,
        (Phase::Yellow, _) => timing.yellow_secs,
    }
}
