//! Serial event log on USART1

use arduino_hal::{
    hal::port::{PD2, PD3},
    pac::USART1,
    port::{
        mode::{Floating, Input, Output},
        Pin,
    },
    prelude::*,
    Usart,
};
use stopwatch::{config::LOG_BAUD, Report, TimerConfig};

type Serial = Usart<USART1, Pin<Input, PD2>, Pin<Output, PD3>>;

/// Human-readable log of stopwatch events, written between display passes
#[must_use]
pub struct Log {
    serial: Serial,
}

impl Log {
    /// Open USART1 at [`LOG_BAUD`]
    pub fn new(usart: USART1, rx: Pin<Input<Floating>, PD2>, tx: Pin<Input<Floating>, PD3>) -> Self {
        Self {
            serial: Usart::new(usart, rx, tx.into_output(), LOG_BAUD.into_baudrate()),
        }
    }

    /// Announce startup and the tick configuration
    pub fn boot(&mut self, tick: TimerConfig) {
        ufmt::uwrite!(&mut self.serial, "stopwatch up, tick {}\r\n", tick).unwrap_infallible();
    }

    /// One line per control handled since the previous report
    pub fn controls(&mut self, report: &Report) {
        let state = if report.running { "running" } else { "paused" };
        for control in report.controls.iter() {
            ufmt::uwrite!(
                &mut self.serial,
                "{} at {} ({})\r\n",
                control,
                report.time,
                state
            )
            .unwrap_infallible();
        }
    }
}
