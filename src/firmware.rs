//! Board wiring, interrupt handlers and the display loop

use core::cell::RefCell;

use arduino_hal::{
    clock::Clock,
    hal::port::{Dynamic, PD0, PD1, PE6},
    port::{
        mode::{Floating, Input, Output, PullUp},
        Pin,
    },
    Delay, DefaultClock, Peripherals,
};
use avr_device::interrupt::Mutex;
use stopwatch::{
    config::{CPU_HZ, TICK},
    Display, ElapsedTime, Event, Stopwatch,
};

#[cfg(feature = "log")]
use crate::log::Log;
use crate::{exint::ExInt, tc1::Tc1Tick};

const _: () = assert!(
    DefaultClock::FREQ == CPU_HZ,
    "config::CPU_HZ must match the board clock"
);

type Platform = Stopwatch<Tc1Tick, ExInt>;

static STOPWATCH: Mutex<RefCell<Option<Platform>>> = Mutex::new(RefCell::new(None));

#[expect(clippy::allow_attributes, reason = "expect somehow doesn't work")]
#[allow(missing_docs, reason = "macro expansion breaks doc comments")]
mod internal {
    use stopwatch::{Control, Event};

    use super::dispatch;

    #[avr_device::interrupt(atmega32u4)]
    fn INT0() {
        dispatch(Event::Control(Control::Reset));
    }

    #[avr_device::interrupt(atmega32u4)]
    fn INT1() {
        dispatch(Event::Control(Control::Pause));
    }

    #[avr_device::interrupt(atmega32u4)]
    fn INT6() {
        dispatch(Event::Control(Control::Resume));
    }

    #[avr_device::interrupt(atmega32u4)]
    fn TIMER1_COMPA() {
        dispatch(Event::Tick);
    }
}

/// Run the stopwatch's handler for `event`
fn dispatch(event: Event) {
    avr_device::interrupt::free(|cs| {
        if let Some(stopwatch) = STOPWATCH.borrow(cs).borrow_mut().as_mut() {
            stopwatch.handle(event);
        }
    });
}

/// Stopwatch firmware for an Arduino Micro
///
/// # Pin Configuration
///
/// `PORTB`:
/// - `PB0`: BCD bit 0
/// - `PB1`: BCD bit 1
/// - `PB2`: BCD bit 2
/// - `PB3`: BCD bit 3
///
/// `PORTD`:
/// - `PD0`: reset button (INT0, falling edge, pull-up)
/// - `PD1`: pause button (INT1, rising edge, no pull-up)
/// - `PD2`: log RX
/// - `PD3`: log TX
///
/// `PORTE`:
/// - `PE6`: resume button (INT6, falling edge, pull-up)
///
/// `PORTF`:
/// - `PF0`: enable seconds ones
/// - `PF1`: enable seconds tens
/// - `PF4`: enable minutes ones
/// - `PF5`: enable minutes tens
/// - `PF6`: enable hours ones
/// - `PF7`: enable hours tens
#[must_use]
pub struct Firmware {
    display: Display<Pin<Output, Dynamic>>,
    delay: Delay,

    _reset: Pin<Input<PullUp>, PD0>,
    _pause: Pin<Input<Floating>, PD1>,
    _resume: Pin<Input<PullUp>, PE6>,

    #[cfg(feature = "log")]
    log: Log,
}

impl Firmware {
    /// Configure the control inputs, the tick source and the display outputs
    ///
    /// Global interrupts must be enabled afterwards
    pub fn new(periphs: Peripherals) -> Self {
        let pins = arduino_hal::hal::Pins::new(
            periphs.PORTB,
            periphs.PORTC,
            periphs.PORTD,
            periphs.PORTE,
            periphs.PORTF,
        );

        // Disable USB controller to prevent the production of spurious interrupts
        periphs.USB_DEVICE.usbcon().reset();

        let reset = pins.pd0.into_pull_up_input();
        let pause = pins.pd1;
        let resume = pins.pe6.into_pull_up_input();

        let mut stopwatch = Stopwatch::new(Tc1Tick::new(periphs.TC1), ExInt::new(periphs.EXINT));
        stopwatch.start(TICK);
        avr_device::interrupt::free(|cs| {
            STOPWATCH.borrow(cs).replace(Some(stopwatch));
        });

        let display = match Display::new(
            [
                pins.pb0.into_output().downgrade(),
                pins.pb1.into_output().downgrade(),
                pins.pb2.into_output().downgrade(),
                pins.pb3.into_output().downgrade(),
            ],
            [
                pins.pf0.into_output().downgrade(),
                pins.pf1.into_output().downgrade(),
                pins.pf4.into_output().downgrade(),
                pins.pf5.into_output().downgrade(),
                pins.pf6.into_output().downgrade(),
                pins.pf7.into_output().downgrade(),
            ],
        ) {
            Ok(display) => display,
            Err(never) => match never {},
        };

        Self {
            display,
            delay: Delay::new(),

            _reset: reset,
            _pause: pause,
            _resume: resume,

            #[cfg(feature = "log")]
            log: Log::new(periphs.USART1, pins.pd2, pins.pd3),
        }
    }

    /// Scan the display forever, snapshotting the stopwatch before each pass
    pub fn run(&mut self) -> ! {
        #[cfg(feature = "log")]
        self.log.boot(TICK);

        let result = self.display.run(&mut self.delay, || {
            let report = avr_device::interrupt::free(|cs| {
                STOPWATCH
                    .borrow(cs)
                    .borrow_mut()
                    .as_mut()
                    .map(Stopwatch::report)
            });
            let Some(report) = report else {
                return ElapsedTime::ZERO;
            };

            #[cfg(feature = "log")]
            self.log.controls(&report);

            report.time
        });

        match result {
            Ok(never) | Err(never) => match never {},
        }
    }
}
