//! Tick source on Timer/Counter 1

use arduino_hal::pac::TC1;
use stopwatch::{Prescale, TickTimer, TimerConfig};

/// [TC1] in CTC mode, restarting from zero once the count reaches `OCR1A`
///
/// Pausing selects "no clock" in `TCCR1B`; the count register and compare threshold survive
#[must_use]
pub struct Tc1Tick {
    tc1: TC1,
    config: Option<TimerConfig>,
}

impl Tc1Tick {
    /// Take ownership of the timer; it stays stopped until configured
    pub const fn new(tc1: TC1) -> Self {
        Self { tc1, config: None }
    }

    /// Select CTC mode with `OCR1A` as top and connect the prescaled clock
    fn connect_clock(&self, config: TimerConfig) {
        self.tc1.tccr1b().write(|w| {
            w.wgm1().set(0b01);
            match config.prescale {
                Prescale::Div1 => w.cs1().direct(),
                Prescale::Div8 => w.cs1().prescale_8(),
                Prescale::Div64 => w.cs1().prescale_64(),
                Prescale::Div256 => w.cs1().prescale_256(),
                Prescale::Div1024 => w.cs1().prescale_1024(),
            }
        });
    }
}

impl TickTimer for Tc1Tick {
    fn configure(&mut self, config: TimerConfig) {
        self.config = Some(config);

        // Normal port operation, WGM11:10 = 0
        self.tc1.tccr1a().reset();
        self.tc1.tcnt1().reset();
        self.tc1.ocr1a().write(|w| w.set(config.compare));

        self.tc1.tifr1().write(|w| w.ocf1a().set_bit());
        self.tc1.timsk1().write(|w| w.ocie1a().set_bit());

        self.connect_clock(config);
    }

    fn reset_count(&mut self) {
        self.tc1.tcnt1().reset();
    }

    fn set_clock_enabled(&mut self, enabled: bool) {
        match (enabled, self.config) {
            (true, Some(config)) => self.connect_clock(config),
            _ => self.tc1.tccr1b().modify(|_, w| w.cs1().no_clock()),
        }
    }

    fn is_clock_enabled(&self) -> bool {
        !self.tc1.tccr1b().read().cs1().is_no_clock()
    }

    fn acknowledge(&mut self) {
        self.tc1.tifr1().write(|w| w.ocf1a().set_bit());
    }
}
