//! Shared test infrastructure for the crossing integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use crossing::{
    ButtonId, Config, Controller, Debouncer, DisplayCommand, Edge, Effect, Effects, Rag, Shared,
    Stage, ToneGenerator, ToneScheduler,
};
use embassy_time::Instant;

// ============================================================================
// Mock tone generator
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneCall {
    On(u32),
    Off,
}

/// Records every call with the virtual time it happened at.
#[derive(Default)]
pub struct MockBuzzer {
    pub now_ms: u64,
    pub calls: Vec<(u64, ToneCall)>,
}

impl ToneGenerator for MockBuzzer {
    type Error = core::convert::Infallible;

    fn tone_on(&mut self, frequency_hz: u32) -> Result<(), Self::Error> {
        self.calls.push((self.now_ms, ToneCall::On(frequency_hz)));
        Ok(())
    }

    fn tone_off(&mut self) -> Result<(), Self::Error> {
        self.calls.push((self.now_ms, ToneCall::Off));
        Ok(())
    }
}

// ============================================================================
// Virtual-clock harness
// ============================================================================

/// A raw falling edge on one of the button lines.
#[derive(Debug, Clone, Copy)]
pub struct RawEdge {
    pub at_ms: u64,
    pub button: ButtonId,
    pub raw_level: bool,
}

impl RawEdge {
    /// Button held down (line pulled low).
    pub fn press(at_ms: u64, button: ButtonId) -> Self {
        Self {
            at_ms,
            button,
            raw_level: false,
        }
    }

    /// Edge seen while the contact springs back (line reads high).
    pub fn release(at_ms: u64, button: ButtonId) -> Self {
        Self {
            at_ms,
            button,
            raw_level: true,
        }
    }
}

/// Runs the whole controller against a virtual clock with 10 ms steps.
///
/// Within one step the order is: countdown tick and controller tick, then
/// button edges, then the press mailbox, then the buzzer alarms. This matches
/// the firmware, where the controller loop polls the tick before presses.
///
/// With `press_before_tick` the button edges run first, so a press raises the
/// request before the tick is handled but its mailbox is still read after it.
pub struct Harness<'a> {
    pub shared: &'a Shared,
    pub press_before_tick: bool,
    pub controller: Controller<'a>,
    pub debouncer: Debouncer,
    pub tone: ToneScheduler<'a, MockBuzzer>,
    pub now_ms: u64,
    pub stages: Vec<(u64, Stage)>,
    pub display: Vec<(u64, DisplayCommand)>,
    pub lamps: Vec<(u64, Rag)>,
    pub accepted_presses: Vec<(u64, ButtonId)>,
}

pub const STEP_MS: u64 = 10;

impl<'a> Harness<'a> {
    pub fn new(shared: &'a Shared) -> Self {
        let config = Config::new();
        let mut harness = Harness {
            shared,
            press_before_tick: false,
            controller: Controller::new(&config, shared),
            debouncer: Debouncer::new(config.debounce_window),
            tone: ToneScheduler::new(MockBuzzer::default(), &shared.bip_gate, config.tone),
            now_ms: 0,
            stages: Vec::new(),
            display: Vec::new(),
            lamps: Vec::new(),
            accepted_presses: Vec::new(),
        };
        let effects = harness.controller.start();
        harness.dispatch(effects);
        harness
    }

    fn instant(&self) -> Instant {
        Instant::from_millis(self.now_ms)
    }

    fn dispatch(&mut self, effects: Effects) {
        for effect in effects {
            match effect {
                Effect::Display(command) => {
                    if let DisplayCommand::Phase(_) = command {
                        self.stages.push((self.now_ms, self.controller.stage()));
                    }
                    self.display.push((self.now_ms, command));
                }
                Effect::Tone(command) => {
                    let now = self.instant();
                    self.tone.apply(command, now);
                }
                Effect::Lamps(rag) => self.lamps.push((self.now_ms, rag)),
            }
        }
    }

    fn step(&mut self, edges: &[RawEdge]) {
        let now = self.instant();
        let now_ms = self.now_ms;
        self.tone_clock();

        let mut mailbox = None;
        if self.press_before_tick {
            mailbox = self.button_edges(edges, now);
        }

        if now_ms > 0 && now_ms % 1_000 == 0 {
            if let Some(seconds) = self.shared.remaining.tick() {
                self.display.push((now_ms, DisplayCommand::Countdown(seconds)));
            }
            let effects = self.controller.on_tick();
            self.dispatch(effects);
        }

        if !self.press_before_tick {
            mailbox = self.button_edges(edges, now);
        }
        if let Some(button) = mailbox {
            let effects = self.controller.on_press(button);
            self.dispatch(effects);
        }

        self.tone.poll(now);
    }

    // What the button task does: debounce, raise the request, post the id.
    fn button_edges(&mut self, edges: &[RawEdge], now: Instant) -> Option<ButtonId> {
        let now_ms = self.now_ms;
        let mut mailbox = None;
        for edge in edges.iter().filter(|edge| edge.at_ms == now_ms) {
            if let Some(Edge::Pressed) = self.debouncer.on_edge(edge.button, edge.raw_level, now) {
                self.shared.crossing.raise();
                self.accepted_presses.push((now_ms, edge.button));
                mailbox = Some(edge.button);
            }
        }
        mailbox
    }

    // The mock buzzer stamps calls with the scheduler's current time.
    fn tone_clock(&mut self) {
        self.tone.generator_mut().now_ms = self.now_ms;
    }

    /// Advance the clock up to and including `until_ms`.
    pub fn run_until(&mut self, until_ms: u64, edges: &[RawEdge]) {
        while self.now_ms <= until_ms {
            self.step(edges);
            self.now_ms += STEP_MS;
        }
    }

    pub fn tone_on_times(&self) -> Vec<u64> {
        self.tone
            .generator()
            .calls
            .iter()
            .filter(|(_, call)| matches!(call, ToneCall::On(_)))
            .map(|(at, _)| *at)
            .collect()
    }

    pub fn stages_between(&self, from_ms: u64, to_ms: u64) -> Vec<(u64, Stage)> {
        self.stages
            .iter()
            .copied()
            .filter(|(at, _)| *at >= from_ms && *at <= to_ms)
            .collect()
    }
}
