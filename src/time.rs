//! Elapsed time kept by the stopwatch

use ufmt::{uDisplay, uWrite, Formatter};

/// Seconds per minute
pub const SECONDS_PER_MINUTE: u8 = 60;
/// Minutes per hour
pub const MINUTES_PER_HOUR: u8 = 60;
/// Hours counted before the stopwatch wraps back to zero
pub const HOURS_PER_DAY: u8 = 24;

/// Elapsed seconds, minutes and hours
///
/// Each field stays below its bound ([`SECONDS_PER_MINUTE`], [`MINUTES_PER_HOUR`],
/// [`HOURS_PER_DAY`]) whenever it can be observed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElapsedTime {
    seconds: u8,
    minutes: u8,
    hours: u8,
}

impl ElapsedTime {
    /// Zero elapsed time
    pub const ZERO: Self = Self::new();

    /// Construct zero elapsed time
    #[must_use]
    pub const fn new() -> Self {
        Self {
            seconds: 0,
            minutes: 0,
            hours: 0,
        }
    }

    /// Construct from individual fields, or `None` if any field is out of range
    #[must_use]
    pub const fn from_hms(hours: u8, minutes: u8, seconds: u8) -> Option<Self> {
        if seconds >= SECONDS_PER_MINUTE || minutes >= MINUTES_PER_HOUR || hours >= HOURS_PER_DAY {
            return None;
        }

        Some(Self {
            seconds,
            minutes,
            hours,
        })
    }

    /// Elapsed seconds within the current minute
    #[must_use]
    pub const fn seconds(&self) -> u8 {
        self.seconds
    }

    /// Elapsed minutes within the current hour
    #[must_use]
    pub const fn minutes(&self) -> u8 {
        self.minutes
    }

    /// Elapsed hours
    #[must_use]
    pub const fn hours(&self) -> u8 {
        self.hours
    }

    /// Total elapsed seconds
    #[must_use]
    pub const fn total_seconds(&self) -> u32 {
        self.hours as u32 * 3600 + self.minutes as u32 * 60 + self.seconds as u32
    }

    /// Advance by one second, carrying into minutes and hours
    ///
    /// The minute carry is checked separately from the second carry so that a simultaneous
    /// rollover of both is completed within one call. Reaching 24 hours wraps everything to zero
    pub fn tick(&mut self) {
        self.seconds += 1;
        if self.seconds == SECONDS_PER_MINUTE {
            self.seconds = 0;
            self.minutes += 1;
        }
        if self.minutes == MINUTES_PER_HOUR {
            self.minutes = 0;
            self.hours += 1;
        }
        if self.hours == HOURS_PER_DAY {
            *self = Self::ZERO;
        }
    }

    /// Return to zero
    pub fn clear(&mut self) {
        *self = Self::ZERO;
    }
}

/// Ones digit of a two-digit field
#[must_use]
pub const fn ones(value: u8) -> u8 {
    value % 10
}

/// Tens digit of a two-digit field
#[must_use]
pub const fn tens(value: u8) -> u8 {
    value / 10
}

/// Renders as `HH:MM:SS`
impl uDisplay for ElapsedTime {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        write_two_digits(f, self.hours)?;
        f.write_char(':')?;
        write_two_digits(f, self.minutes)?;
        f.write_char(':')?;
        write_two_digits(f, self.seconds)
    }
}

fn write_two_digits<W>(f: &mut Formatter<'_, W>, value: u8) -> Result<(), W::Error>
where
    W: uWrite + ?Sized,
{
    f.write_char(char::from(b'0' + tens(value)))?;
    f.write_char(char::from(b'0' + ones(value)))
}
