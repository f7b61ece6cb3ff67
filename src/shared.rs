/*
 * A module that holds all state touched by more than one task.
 *
 * The button task, the timer tasks and the foreground controller loop all run
 * concurrently. The only values they share are single-word flags and
 * counters, so atomics are enough: no invariant spans two of these fields.
 * Writers publish with `Release`, readers observe with `Acquire`, and every
 * check is a fresh load.
 */

use core::sync::atomic::{AtomicBool, Ordering};

use crate::countdown::Countdown;

/// Pending pedestrian request.
///
/// Only the button task raises it and only the controller clears it, once the
/// crossing has been fully serviced. Raising it again while it is set is
/// absorbed.
pub struct CrossingRequest(AtomicBool);

impl CrossingRequest {
    pub const fn new() -> Self {
        CrossingRequest(AtomicBool::new(false))
    }

    /// Returns `true` if this call raised the flag, `false` if a request was
    /// already pending.
    pub fn raise(&self) -> bool {
        !self.0.swap(true, Ordering::AcqRel)
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for CrossingRequest {
    fn default() -> Self {
        Self::new()
    }
}

/// The "active" flag of the periodic bip schedule.
///
/// Each bip checks it right before sounding, so closing the gate from any
/// task stops further bips even if the timer already fired.
pub struct BipGate(AtomicBool);

impl BipGate {
    pub const fn new() -> Self {
        BipGate(AtomicBool::new(false))
    }

    pub fn open(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn close(&self) {
        self.0.store(false, Ordering::Release);
    }

    pub fn is_open(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Default for BipGate {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Shared {
    pub crossing: CrossingRequest,
    pub bip_gate: BipGate,
    pub remaining: Countdown,
}

impl Shared {
    pub const fn new() -> Self {
        Shared {
            crossing: CrossingRequest::new(),
            bip_gate: BipGate::new(),
            remaining: Countdown::new(),
        }
    }
}

impl Default for Shared {
    fn default() -> Self {
        Self::new()
    }
}
