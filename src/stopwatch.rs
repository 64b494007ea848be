//! The stopwatch state record and its interrupt handlers

use crate::{
    control::{Control, ExternalInterrupts},
    time::ElapsedTime,
    timer::{TickTimer, TimerConfig},
};

/// Work delivered to the stopwatch by the platform's interrupt layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The tick source's compare event
    Tick,
    /// A control button's edge
    Control(Control),
}

/// Set of control events handled since it was last drained
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Journal(u8);

impl Journal {
    /// Empty journal
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    fn record(&mut self, control: Control) {
        self.0 |= 1 << control.index();
    }

    /// Whether `control` was handled
    #[must_use]
    pub const fn contains(self, control: Control) -> bool {
        self.0 & (1 << control.index()) != 0
    }

    /// Whether no control was handled
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Handled controls in priority order
    pub fn iter(self) -> impl Iterator<Item = Control> {
        Control::ALL
            .into_iter()
            .filter(move |&control| self.contains(control))
    }
}

/// Consistent view of the stopwatch taken in one critical section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    /// Elapsed time
    pub time: ElapsedTime,
    /// Whether the tick source has its clock
    pub running: bool,
    /// Controls handled since the previous report
    pub controls: Journal,
}

/// Stopwatch owning its tick timer, its control lines and the elapsed time
///
/// Handlers run to completion and are never re-entered; the platform guarantees this by
/// calling them inside a critical section
pub struct Stopwatch<T, X> {
    timer: T,
    lines: X,
    time: ElapsedTime,
    journal: Journal,
}

impl<T, X> Stopwatch<T, X>
where
    T: TickTimer,
    X: ExternalInterrupts,
{
    /// Take ownership of the peripherals; nothing is configured until [`Stopwatch::start`]
    pub const fn new(timer: T, lines: X) -> Self {
        Self {
            timer,
            lines,
            time: ElapsedTime::new(),
            journal: Journal::new(),
        }
    }

    /// Configure every control line and the tick source
    ///
    /// Global interrupts must still be disabled when this is called
    pub fn start(&mut self, tick: TimerConfig) {
        for control in Control::ALL {
            self.lines.set_edge(control, control.edge());
            self.lines.enable(control);
        }
        self.timer.configure(tick);
    }

    /// Run the handler for `event`
    pub fn handle(&mut self, event: Event) {
        match event {
            Event::Tick => self.tick(),
            Event::Control(Control::Reset) => self.reset(),
            Event::Control(Control::Pause) => self.pause(),
            Event::Control(Control::Resume) => self.resume(),
        }
    }

    /// Tick source handler: advance by one second
    pub fn tick(&mut self) {
        self.time.tick();
        self.timer.acknowledge();
    }

    /// Reset handler: zero the timer count and elapsed time, keeping the run state
    pub fn reset(&mut self) {
        self.timer.reset_count();
        self.time.clear();
        self.finish(Control::Reset);
    }

    /// Pause handler: cut the tick source's clock
    pub fn pause(&mut self) {
        self.timer.set_clock_enabled(false);
        self.finish(Control::Pause);
    }

    /// Resume handler: restore the tick source's clock
    pub fn resume(&mut self) {
        self.timer.set_clock_enabled(true);
        self.finish(Control::Resume);
    }

    fn finish(&mut self, control: Control) {
        self.journal.record(control);
        self.lines.acknowledge(control);
    }

    /// Elapsed time
    pub const fn time(&self) -> ElapsedTime {
        self.time
    }

    /// Whether the tick source has its clock
    pub fn is_running(&self) -> bool {
        self.timer.is_clock_enabled()
    }

    /// Snapshot the state and drain the journal
    pub fn report(&mut self) -> Report {
        Report {
            time: self.time,
            running: self.is_running(),
            controls: core::mem::take(&mut self.journal),
        }
    }

    /// Access the tick timer (read-only)
    pub const fn timer(&self) -> &T {
        &self.timer
    }

    /// Access the control lines (read-only)
    pub const fn lines(&self) -> &X {
        &self.lines
    }

    pub(crate) fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    pub(crate) fn lines_mut(&mut self) -> &mut X {
        &mut self.lines
    }
}
