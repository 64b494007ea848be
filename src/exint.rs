//! External interrupt lines serving the control buttons

use arduino_hal::pac::EXINT;
use stopwatch::{Control, Edge, ExternalInterrupts};

/// External interrupt controller; Reset is on INT0 (`PD0`), Pause on INT1 (`PD1`) and Resume on
/// INT6 (`PE6`)
#[must_use]
pub struct ExInt {
    exint: EXINT,
}

impl ExInt {
    /// Take ownership of the controller; all lines stay masked until enabled
    pub const fn new(exint: EXINT) -> Self {
        Self { exint }
    }
}

/// INTn number of a control's line
const fn line(control: Control) -> u8 {
    match control {
        Control::Reset => 0,
        Control::Pause => 1,
        Control::Resume => 6,
    }
}

/// `ISCn1:ISCn0` sense control bits
const fn sense(edge: Edge) -> u8 {
    match edge {
        Edge::Falling => 0b10,
        Edge::Rising => 0b11,
    }
}

impl ExternalInterrupts for ExInt {
    fn set_edge(&mut self, control: Control, edge: Edge) {
        let line = line(control);
        let mask = 1 << line;
        let shift = (line % 4) * 2;
        let update = |bits: u8| (bits & !(0b11 << shift)) | (sense(edge) << shift);

        // Changing the sense can latch a spurious flag, so the line stays masked meanwhile
        let was_enabled = self.exint.eimsk().read().bits() & mask != 0;
        // SAFETY: every bit pattern of EIMSK is valid
        self.exint
            .eimsk()
            .modify(|r, w| unsafe { w.bits(r.bits() & !mask) });

        if line < 4 {
            // SAFETY: only this line's two sense bits change
            self.exint
                .eicra()
                .modify(|r, w| unsafe { w.bits(update(r.bits())) });
        } else {
            // SAFETY: only this line's two sense bits change
            self.exint
                .eicrb()
                .modify(|r, w| unsafe { w.bits(update(r.bits())) });
        }

        // SAFETY: writing one clears only this line's flag
        self.exint.eifr().write(|w| unsafe { w.bits(mask) });

        if was_enabled {
            self.enable(control);
        }
    }

    fn enable(&mut self, control: Control) {
        let mask = 1 << line(control);
        // SAFETY: every bit pattern of EIMSK is valid
        self.exint
            .eimsk()
            .modify(|r, w| unsafe { w.bits(r.bits() | mask) });
    }

    fn acknowledge(&mut self, control: Control) {
        // SAFETY: writing one clears only this line's flag
        self.exint
            .eifr()
            .write(|w| unsafe { w.bits(1 << line(control)) });
    }
}
