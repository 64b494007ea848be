//! Multiplexed six-digit 7-segment display
//!
//! The digits share a 4-bit BCD bus feeding a BCD-to-7-segment decoder; a one-hot enable bus
//! selects which digit is lit. Scanning the positions fast enough makes all six appear lit at once

use core::convert::Infallible;

use embedded_hal::{delay::DelayNs, digital::OutputPin};

use crate::{
    config::DIGIT_SETTLE_MS,
    time::{ones, tens, ElapsedTime},
};

/// A digit position on the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Ones of seconds
    SecondsOnes,
    /// Tens of seconds
    SecondsTens,
    /// Ones of minutes
    MinutesOnes,
    /// Tens of minutes
    MinutesTens,
    /// Ones of hours
    HoursOnes,
    /// Tens of hours
    HoursTens,
}

impl Position {
    /// Every position, in scan order
    pub const SCAN: [Self; 6] = [
        Self::SecondsOnes,
        Self::SecondsTens,
        Self::MinutesOnes,
        Self::MinutesTens,
        Self::HoursOnes,
        Self::HoursTens,
    ];

    /// Index of this position's enable line
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The decimal digit of `time` shown at this position
    #[must_use]
    pub const fn digit(self, time: &ElapsedTime) -> u8 {
        match self {
            Self::SecondsOnes => ones(time.seconds()),
            Self::SecondsTens => tens(time.seconds()),
            Self::MinutesOnes => ones(time.minutes()),
            Self::MinutesTens => tens(time.minutes()),
            Self::HoursOnes => ones(time.hours()),
            Self::HoursTens => tens(time.hours()),
        }
    }
}

/// Display driver over a BCD bus and a digit enable bus
///
/// `bcd[0]` carries the least significant bit; `select[i]` enables [`Position::SCAN`]`[i]`
#[must_use]
pub struct Display<PIN> {
    bcd: [PIN; 4],
    select: [PIN; 6],
}

impl<PIN> Display<PIN>
where
    PIN: OutputPin,
{
    /// Take the output pins and drive them all low
    ///
    /// # Errors
    /// Returns an error if a pin can't be driven
    pub fn new(bcd: [PIN; 4], select: [PIN; 6]) -> Result<Self, PIN::Error> {
        let mut display = Self { bcd, select };
        display.blank()?;
        Ok(display)
    }

    /// Disable every position and zero the BCD bus
    ///
    /// # Errors
    /// Returns an error if a pin can't be driven
    pub fn blank(&mut self) -> Result<(), PIN::Error> {
        for pin in self.select.iter_mut().chain(self.bcd.iter_mut()) {
            pin.set_low()?;
        }
        Ok(())
    }

    /// Light `position` alone and put `digit` on the BCD bus
    ///
    /// # Errors
    /// Returns an error if a pin can't be driven
    pub fn show(&mut self, position: Position, digit: u8) -> Result<(), PIN::Error> {
        for (i, pin) in self.select.iter_mut().enumerate() {
            pin.set_state((i == position.index()).into())?;
        }

        for (bit, pin) in self.bcd.iter_mut().enumerate() {
            pin.set_state((digit & (1 << bit) != 0).into())?;
        }

        Ok(())
    }

    /// Show every position of `time` once, holding each for [`DIGIT_SETTLE_MS`]
    ///
    /// # Errors
    /// Returns an error if a pin can't be driven
    pub fn scan(&mut self, time: &ElapsedTime, delay: &mut impl DelayNs) -> Result<(), PIN::Error> {
        for position in Position::SCAN {
            self.show(position, position.digit(time))?;
            delay.delay_ms(DIGIT_SETTLE_MS);
        }
        Ok(())
    }

    /// Scan forever, fetching the time to show before every pass
    ///
    /// # Errors
    /// Only returns, with the error, if a pin can't be driven
    pub fn run<D, F>(&mut self, delay: &mut D, mut source: F) -> Result<Infallible, PIN::Error>
    where
        D: DelayNs,
        F: FnMut() -> ElapsedTime,
    {
        loop {
            let time = source();
            self.scan(&time, delay)?;
        }
    }
}
