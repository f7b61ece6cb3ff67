/*
 * The foreground controller.
 *
 * It reacts to two things only: the once-per-second tick and an accepted
 * button press. Both calls return the effects to carry out (draw something,
 * drive the buzzer, switch the lamps) instead of touching any hardware, so
 * the firmware can hand them to the tasks that own the peripherals and the
 * tests can look at them directly.
 */

use heapless::Vec;

use crate::config::Config;
use crate::debounce::ButtonId;
use crate::display::{DisplayCommand, REQUEST_RECEIVED};
use crate::shared::Shared;
use crate::tone::ToneCommand;
use crate::trafficlight::{Phase, Rag, Stage, TrafficLight};

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Effect {
    Display(DisplayCommand),
    Tone(ToneCommand),
    Lamps(Rag),
}

pub const MAX_EFFECTS: usize = 4;

pub type Effects = Vec<Effect, MAX_EFFECTS>;

pub struct Controller<'a> {
    light: TrafficLight,
    shared: &'a Shared,
}

impl<'a> Controller<'a> {
    pub fn new(config: &Config, shared: &'a Shared) -> Self {
        Controller {
            light: TrafficLight::new(config.timing),
            shared,
        }
    }

    pub fn stage(&self) -> Stage {
        self.light.stage()
    }

    /// Show the initial stage. Call once before the first tick.
    pub fn start(&mut self) -> Effects {
        let stage = self.light.stage();
        self.entered(stage)
    }

    /// An accepted press. The crossing request flag has already been raised
    /// by the button task; this only gives the pedestrian feedback.
    ///
    /// The press may be picked up after a tick that already serviced (and
    /// cleared) its request. Feedback is only given for a request that is
    /// still pending, otherwise the bips would outlive their crossing.
    pub fn on_press(&mut self, button: ButtonId) -> Effects {
        let mut effects = Effects::new();

        if self.light.in_crossing() {
            info!("request from button {} absorbed, crossing in progress", button);
            return effects;
        }
        if !self.shared.crossing.is_raised() {
            info!("request from button {} absorbed, crossing just ended", button);
            return effects;
        }

        info!("Botão de Pedestres acionado ({})", button);
        push(&mut effects, Effect::Display(DisplayCommand::Message(REQUEST_RECEIVED)));
        push(&mut effects, Effect::Tone(ToneCommand::Alert));
        push(&mut effects, Effect::Tone(ToneCommand::StartBips));
        effects
    }

    /// The one-second tick.
    pub fn on_tick(&mut self) -> Effects {
        let was_crossing = self.light.in_crossing();
        let requested = self.shared.crossing.is_raised();

        match self.light.advance(requested) {
            Some(stage) => {
                if was_crossing && !stage.is_crossing() {
                    // The crossing has been serviced. Requests raised while it
                    // ran are dropped with it.
                    self.shared.crossing.clear();
                }
                self.entered(stage)
            }
            None => Effects::new(),
        }
    }

    fn entered(&mut self, stage: Stage) -> Effects {
        let mut effects = Effects::new();

        if stage == Stage::crossing(Phase::Yellow) {
            // Close the gate before the buzzer task sees the command, so a bip
            // that is already due does not sound.
            self.shared.bip_gate.close();
            push(&mut effects, Effect::Tone(ToneCommand::Silence));
        }

        self.shared.remaining.reset(self.light.phase_time_seconds());
        info!("Sinal: {} ({})", stage.phase.name(), stage.cause);

        push(&mut effects, Effect::Lamps(self.light.rag()));
        push(&mut effects, Effect::Display(DisplayCommand::Phase(stage.phase)));
        effects
    }
}

fn push(effects: &mut Effects, effect: Effect) {
    if effects.push(effect).is_err() {
        warn!("effect dropped");
    }
}
