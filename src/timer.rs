//! Periodic tick source built on a 16-bit compare timer

use ufmt::{uDisplay, uWrite, Formatter};

/// Clock prescaler of a 16-bit AVR timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prescale {
    /// CPU clock, undivided
    Div1,
    /// CPU clock / 8
    Div8,
    /// CPU clock / 64
    Div64,
    /// CPU clock / 256
    Div256,
    /// CPU clock / 1024
    Div1024,
}

impl Prescale {
    /// Number of CPU cycles per timer count
    #[must_use]
    pub const fn divisor(self) -> u32 {
        match self {
            Self::Div1 => 1,
            Self::Div8 => 8,
            Self::Div64 => 64,
            Self::Div256 => 256,
            Self::Div1024 => 1024,
        }
    }
}

/// Mode and rate of a compare-and-restart (CTC) timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    /// Timer clock prescaler
    pub prescale: Prescale,
    /// Count at which the compare event fires; the counter restarts at zero on the next count
    pub compare: u16,
}

impl TimerConfig {
    /// Derive the configuration that fires `rate_hz` times per second from a `cpu_hz` clock
    ///
    /// Returns `None` if the period doesn't fit the 16-bit compare register or isn't reachable
    #[must_use]
    pub const fn for_rate(cpu_hz: u32, prescale: Prescale, rate_hz: u32) -> Option<Self> {
        if rate_hz == 0 {
            return None;
        }

        let period = cpu_hz / prescale.divisor() / rate_hz;
        if period == 0 || period > 1 << 16 {
            return None;
        }

        Some(Self {
            prescale,
            compare: (period - 1) as u16,
        })
    }

    /// Timer counts between two compare events
    #[must_use]
    pub const fn period(&self) -> u32 {
        self.compare as u32 + 1
    }

    /// CPU cycles between two compare events
    #[must_use]
    pub const fn cycles_per_event(&self) -> u32 {
        self.period() * self.prescale.divisor()
    }
}

impl uDisplay for TimerConfig {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        ufmt::uwrite!(f, "clk/{} compare {}", self.prescale.divisor(), self.compare)
    }
}

/// Capabilities of the timer peripheral behind the tick source
pub trait TickTimer {
    /// Set CTC mode, prescale and compare threshold, zero the count, start the clock and enable
    /// the compare interrupt
    ///
    /// The configuration is remembered so that [`TickTimer::set_clock_enabled`] can restore it
    fn configure(&mut self, config: TimerConfig);

    /// Zero the count register
    fn reset_count(&mut self);

    /// Connect (`true`) or disconnect (`false`) the timer's clock feed
    fn set_clock_enabled(&mut self, enabled: bool);

    /// Whether the timer currently receives a clock
    fn is_clock_enabled(&self) -> bool;

    /// Clear the pending compare-interrupt flag
    fn acknowledge(&mut self);
}
