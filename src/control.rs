//! Push-button control inputs wired to external interrupt lines

use ufmt::{uDisplay, uWrite, Formatter};

/// Signal edge an external interrupt line reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// High to low transition
    Falling,
    /// Low to high transition
    Rising,
}

/// A stopwatch control button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Zero the elapsed time without changing whether it runs
    Reset,
    /// Stop the tick source's clock
    Pause,
    /// Restart the tick source's clock
    Resume,
}

impl Control {
    /// Every control, in interrupt priority order
    pub const ALL: [Self; 3] = [Self::Reset, Self::Pause, Self::Resume];

    /// The edge this control's line is sensitive to
    ///
    /// Reset and Resume buttons pull their lines low; Pause drives its line high
    #[must_use]
    pub const fn edge(self) -> Edge {
        match self {
            Self::Reset | Self::Resume => Edge::Falling,
            Self::Pause => Edge::Rising,
        }
    }

    /// Position in [`Control::ALL`]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lowercase name used in log lines
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Reset => "reset",
            Self::Pause => "pause",
            Self::Resume => "resume",
        }
    }
}

impl uDisplay for Control {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        f.write_str(self.name())
    }
}

/// Capabilities of the external interrupt controller serving the control buttons
pub trait ExternalInterrupts {
    /// Select the edge that raises `control`'s interrupt
    fn set_edge(&mut self, control: Control, edge: Edge);

    /// Unmask `control`'s interrupt
    fn enable(&mut self, control: Control);

    /// Clear `control`'s pending-interrupt flag
    fn acknowledge(&mut self, control: Control);
}
