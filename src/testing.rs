//! Test doubles for pins, delays and `ufmt` output

use core::{cell::RefCell, convert::Infallible};
use std::{rc::Rc, string::String, vec::Vec};

use embedded_hal::{
    delay::DelayNs,
    digital::{self, ErrorKind, ErrorType, OutputPin},
};
use ufmt::{uDisplay, uWrite};

struct Text(String);

impl uWrite for Text {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.0.push_str(s);
        Ok(())
    }
}

/// Render a value through its `uDisplay` implementation
pub fn render(value: &impl uDisplay) -> String {
    let mut text = Text(String::new());
    ufmt::uwrite!(&mut text, "{}", value).unwrap();
    text.0
}

/// Ten shared output lines: four BCD bits followed by six position enables
#[derive(Clone)]
pub struct Bus(Rc<RefCell<[bool; 10]>>);

impl Bus {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new([true; 10])))
    }

    fn line(&self, index: usize) -> Line {
        Line {
            bus: self.clone(),
            index,
        }
    }

    pub fn bcd(&self) -> [Line; 4] {
        core::array::from_fn(|i| self.line(i))
    }

    pub fn select(&self) -> [Line; 6] {
        core::array::from_fn(|i| self.line(4 + i))
    }

    pub fn bcd_value(&self) -> u8 {
        let levels = self.0.borrow();
        (0..4).fold(0, |acc, bit| acc | (u8::from(levels[bit]) << bit))
    }

    pub fn enabled(&self) -> [bool; 6] {
        let levels = self.0.borrow();
        core::array::from_fn(|i| levels[4 + i])
    }

    /// The lit position (or `usize::MAX` if none) and the BCD value
    fn frame(&self) -> (usize, u8) {
        let lit = self
            .enabled()
            .iter()
            .position(|&on| on)
            .unwrap_or(usize::MAX);
        (lit, self.bcd_value())
    }
}

/// One line of a [`Bus`]
pub struct Line {
    bus: Bus,
    index: usize,
}

impl ErrorType for Line {
    type Error = Infallible;
}

impl OutputPin for Line {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.bus.0.borrow_mut()[self.index] = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.bus.0.borrow_mut()[self.index] = true;
        Ok(())
    }
}

#[derive(Debug)]
pub struct PinFault;

impl digital::Error for PinFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Output pin that can be told to fail its next write
pub struct FailingPin {
    fail: bool,
}

impl FailingPin {
    pub const fn ok() -> Self {
        Self { fail: false }
    }

    pub fn fail_next(&mut self) {
        self.fail = true;
    }

    fn write(&mut self) -> Result<(), PinFault> {
        if core::mem::take(&mut self.fail) {
            Err(PinFault)
        } else {
            Ok(())
        }
    }
}

impl ErrorType for FailingPin {
    type Error = PinFault;
}

impl OutputPin for FailingPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write()
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write()
    }
}

/// Delay that records what a [`Bus`] shows whenever a millisecond delay starts
pub struct RecordingDelay {
    bus: Bus,
    pub frames: Vec<(usize, u8)>,
    pub total_ms: u32,
}

impl RecordingDelay {
    pub fn new(bus: &Bus) -> Self {
        Self {
            bus: bus.clone(),
            frames: Vec::new(),
            total_ms: 0,
        }
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.frames.push(self.bus.frame());
        self.total_ms += ms;
    }
}
