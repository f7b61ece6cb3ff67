/*
 * Pedestrian crossing controller for the DESPI-M02 board.
 *
 * Everything that does not touch the hardware lives in this library so it
 * can be tested on the host: the debouncer for the pedestrian buttons, the
 * buzzer scheduler, the phase state machine with its crossing branch, the
 * one-second countdown and the translation of phases into display frames.
 * The firmware binary (`src/main.rs`, feature `firmware`) wires these to
 * the STM32 peripherals and the embassy executor.
 */

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod config;
pub mod controller;
pub mod countdown;
pub mod debounce;
pub mod display;
pub mod shared;
pub mod tone;
pub mod trafficlight;

pub use config::{Config, Timing, ToneProfile};
pub use controller::{Controller, Effect, Effects};
pub use countdown::Countdown;
pub use debounce::{ButtonId, Debouncer, Edge};
pub use display::{DisplayAdapter, DisplayCommand, DisplaySink, Frame};
pub use shared::{BipGate, CrossingRequest, Shared};
pub use tone::{AlarmId, BipHandle, ToneCommand, ToneGenerator, ToneScheduler};
pub use trafficlight::{Cause, Phase, Rag, Stage, TrafficLight};
