//! Interrupt-driven six-digit stopwatch
//!
//! Hardware-independent core of the stopwatch firmware: time arithmetic, the peripheral
//! capabilities the interrupt handlers need, the multiplexed display driver, and a simulated
//! platform for running all of it off-target
#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod control;
pub mod display;
pub mod sim;
pub mod stopwatch;
pub mod time;
pub mod timer;

#[cfg(test)]
mod testing;

pub use crate::{
    control::{Control, Edge, ExternalInterrupts},
    display::{Display, Position},
    stopwatch::{Event, Journal, Report, Stopwatch},
    time::ElapsedTime,
    timer::{Prescale, TickTimer, TimerConfig},
};
