//! Build-time configuration

use crate::timer::{Prescale, TimerConfig};

/// CPU clock of the target board
pub const CPU_HZ: u32 = 16_000_000;

/// Tick source events per second
pub const TICK_HZ: u32 = 1;

/// Tick source prescaler
pub const TICK_PRESCALE: Prescale = Prescale::Div1024;

/// Tick source configuration derived from [`CPU_HZ`], [`TICK_PRESCALE`] and [`TICK_HZ`]
pub const TICK: TimerConfig = match TimerConfig::for_rate(CPU_HZ, TICK_PRESCALE, TICK_HZ) {
    Some(config) => config,
    None => panic!("tick rate is not reachable with a 16-bit compare register"),
};

/// Time each display position stays lit before the scan moves on
///
/// Six positions at 5 ms refresh the whole display at roughly 33 Hz
pub const DIGIT_SETTLE_MS: u32 = 5;

/// Serial log baud rate
pub const LOG_BAUD: u32 = 57_600;
