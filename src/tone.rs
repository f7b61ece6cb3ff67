/*
 * Buzzer scheduling.
 *
 * The buzzer gives audible feedback when a pedestrian request is accepted: an
 * immediate alert tone, then short bips at a fixed interval until the crossing
 * starts. That needs at most one single-shot "stop" alarm and at most one
 * periodic "bip" alarm at any time.
 *
 * As with the rest of the library, no time or delay functions live here. The
 * owning task asks for `next_deadline()`, sleeps until then (or until a
 * command arrives) and calls `poll()` with the current time. Alarms are plain
 * values with an id, so cancelling one is simply dropping it, and a stale id
 * no longer matches anything.
 */

use embassy_time::{Duration, Instant};

use crate::config::ToneProfile;
use crate::fmt::log_failure;
use crate::shared::BipGate;

/// The PWM tone output. Both calls must be safe to repeat.
pub trait ToneGenerator {
    type Error: core::fmt::Debug;

    fn tone_on(&mut self, frequency_hz: u32) -> Result<(), Self::Error>;

    /// Silence the output and leave it ready to be reconfigured.
    fn tone_off(&mut self) -> Result<(), Self::Error>;
}

/// Identifies a single-shot stop alarm.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmId(u32);

/// Identifies a periodic bip schedule.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BipHandle(u32);

/// Requests from the controller to the task owning the buzzer.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ToneCommand {
    /// Sound the alert tone once.
    Alert,
    /// Start bipping until silenced.
    StartBips,
    /// Cancel the bips and silence the speaker right away.
    Silence,
}

#[derive(Copy, Clone)]
struct StopAlarm {
    id: AlarmId,
    at: Instant,
}

#[derive(Copy, Clone)]
struct PeriodicBip {
    handle: BipHandle,
    next: Instant,
    period: Duration,
    burst: Duration,
}

pub struct ToneScheduler<'a, G: ToneGenerator> {
    generator: G,
    gate: &'a BipGate,
    profile: ToneProfile,
    next_id: u32,
    sounding: bool,
    stop: Option<StopAlarm>,
    bip: Option<PeriodicBip>,
}

impl<'a, G: ToneGenerator> ToneScheduler<'a, G> {
    pub fn new(generator: G, gate: &'a BipGate, profile: ToneProfile) -> Self {
        ToneScheduler {
            generator,
            gate,
            profile,
            next_id: 0,
            sounding: false,
            stop: None,
            bip: None,
        }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn generator_mut(&mut self) -> &mut G {
        &mut self.generator
    }

    pub fn is_sounding(&self) -> bool {
        self.sounding
    }

    pub fn bip_scheduled(&self) -> bool {
        self.bip.is_some()
    }

    fn allocate_id(&mut self) -> u32 {
        self.next_id = self.next_id.wrapping_add(1);
        self.next_id
    }

    /// Sound continuously until stopped. Any armed stop alarm is dropped.
    pub fn start_tone(&mut self, frequency_hz: u32) {
        self.stop = None;
        self.sounding = true;
        if let Err(e) = self.generator.tone_on(frequency_hz) {
            log_failure("tone on", &e);
        }
    }

    pub fn stop_tone(&mut self) {
        self.stop = None;
        self.sounding = false;
        if let Err(e) = self.generator.tone_off() {
            log_failure("tone off", &e);
        }
    }

    /// Arm the single-shot stop alarm, replacing any armed one.
    pub fn schedule_stop_after(&mut self, now: Instant, duration: Duration) -> AlarmId {
        let id = AlarmId(self.allocate_id());
        self.stop = Some(StopAlarm {
            id,
            at: now + duration,
        });
        id
    }

    /// Start bipping every `period`, each bip lasting `burst`. The first bip
    /// sounds one period from now. Replaces any running schedule. A zero
    /// period gives a single bip.
    pub fn start_periodic_bip(
        &mut self,
        now: Instant,
        period: Duration,
        burst: Duration,
    ) -> BipHandle {
        let handle = BipHandle(self.allocate_id());
        self.gate.open();
        self.bip = Some(PeriodicBip {
            handle,
            next: now + period,
            period,
            burst,
        });
        handle
    }

    /// Stop the bip schedule. A bip that is already sounding finishes on its
    /// own stop alarm. Calling this with nothing scheduled is a no-op; a
    /// handle from an older, replaced schedule is ignored.
    pub fn cancel_periodic_bip(&mut self, handle: BipHandle) {
        match self.bip {
            Some(bip) if bip.handle == handle => {
                self.gate.close();
                self.bip = None;
            }
            Some(_) => debug!("stale bip handle ignored"),
            None => self.gate.close(),
        }
    }

    /// The stop alarm fired. It only silences the speaker if it is still the
    /// armed alarm.
    fn fire_stop(&mut self, id: AlarmId) {
        match self.stop {
            Some(stop) if stop.id == id => self.stop_tone(),
            _ => debug!("stale stop alarm ignored"),
        }
    }

    /// The bip alarm due at `at` fired, seen at `now`. Bips missed while the
    /// scheduler was late are skipped, not replayed.
    fn fire_bip(&mut self, at: Instant, now: Instant) {
        let Some(mut bip) = self.bip else {
            return;
        };

        // The gate is checked at firing time, so a cancellation from another
        // task is honoured even though this alarm was already due.
        if !self.gate.is_open() {
            self.bip = None;
            return;
        }

        self.start_tone(self.profile.frequency_hz);
        self.schedule_stop_after(now, bip.burst);

        let period = bip.period.as_ticks();
        if period == 0 {
            // A zero period cannot repeat: bip once.
            self.bip = None;
            return;
        }
        let missed = now.saturating_duration_since(at).as_ticks() / period;
        bip.next = at + Duration::from_ticks((missed + 1) * period);
        self.bip = Some(bip);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.stop, self.bip) {
            (Some(stop), Some(bip)) => Some(stop.at.min(bip.next)),
            (Some(stop), None) => Some(stop.at),
            (None, Some(bip)) => Some(bip.next),
            (None, None) => None,
        }
    }

    /// Fire every alarm that is due at `now`, oldest first. A stop due at the
    /// same instant as a bip fires before it.
    pub fn poll(&mut self, now: Instant) {
        loop {
            let stop_due = self.stop.filter(|stop| stop.at <= now);
            let bip_due = self.bip.filter(|bip| bip.next <= now);

            match (stop_due, bip_due) {
                (Some(stop), Some(bip)) if stop.at <= bip.next => self.fire_stop(stop.id),
                (_, Some(bip)) => self.fire_bip(bip.next, now),
                (Some(stop), None) => self.fire_stop(stop.id),
                (None, None) => break,
            }
        }
    }

    /// Carry out a command from the controller.
    pub fn apply(&mut self, command: ToneCommand, now: Instant) {
        match command {
            ToneCommand::Alert => {
                self.start_tone(self.profile.frequency_hz);
                self.schedule_stop_after(now, self.profile.alert);
            }
            ToneCommand::StartBips => {
                self.start_periodic_bip(now, self.profile.bip_period, self.profile.bip_burst);
            }
            ToneCommand::Silence => {
                if let Some(bip) = self.bip {
                    self.cancel_periodic_bip(bip.handle);
                } else {
                    self.gate.close();
                }
                self.stop_tone();
            }
        }
    }
}
