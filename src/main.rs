//! Six-digit multiplexed stopwatch
//!
//! Timer1 counts seconds into a shared time record; three push-buttons on external interrupt
//! lines reset, pause and resume it; the main loop multiplexes the time onto six 7-segment
//! digits behind a BCD decoder
#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]

#[cfg(target_arch = "avr")]
use panic_halt as _;

#[cfg(target_arch = "avr")]
pub mod exint;
#[cfg(target_arch = "avr")]
pub mod firmware;
#[cfg(all(target_arch = "avr", feature = "log"))]
pub mod log;
#[cfg(target_arch = "avr")]
pub mod tc1;

#[cfg(target_arch = "avr")]
#[arduino_hal::entry]
fn main() -> ! {
    let periphs = arduino_hal::Peripherals::take().unwrap();
    let mut firmware = firmware::Firmware::new(periphs);

    // Safety: every interrupt source is configured and we are not inside interrupt::free
    unsafe { avr_device::interrupt::enable() };

    firmware.run()
}

/// The firmware only runs on AVR; host builds exist to test the `stopwatch` library
#[cfg(not(target_arch = "avr"))]
fn main() {
    eprintln!("stopwatch firmware targets the ATmega32U4; run `cargo test` for the host-side core");
}
