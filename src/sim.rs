//! Simulated peripherals and interrupt delivery
//!
//! Runs the stopwatch off-target: [`SimTimer`] counts CPU cycles the way a 16-bit CTC timer does,
//! [`SimInterrupts`] latches edges on the three control lines, and [`Simulation`] dispatches
//! pending sources in the ATmega32U4's vector order (INT0, INT1, INT6, `TIMER1_COMPA`)

use crate::{
    control::{Control, Edge, ExternalInterrupts},
    stopwatch::{Event, Report, Stopwatch},
    timer::{TickTimer, TimerConfig},
};

/// Simulated 16-bit timer in CTC mode
#[derive(Debug, Default)]
pub struct SimTimer {
    config: Option<TimerConfig>,
    clock: bool,
    count: u16,
    residue: u32,
    flag: bool,
    interrupt_enabled: bool,
}

impl SimTimer {
    /// Unconfigured timer with no clock
    #[must_use]
    pub const fn new() -> Self {
        Self {
            config: None,
            clock: false,
            count: 0,
            residue: 0,
            flag: false,
            interrupt_enabled: false,
        }
    }

    /// Configuration last passed to [`TickTimer::configure`]
    #[must_use]
    pub const fn config(&self) -> Option<TimerConfig> {
        self.config
    }

    /// Count register
    #[must_use]
    pub const fn count(&self) -> u16 {
        self.count
    }

    /// Whether the compare interrupt is waiting to be serviced
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.flag && self.interrupt_enabled
    }

    /// Feed `cycles` CPU cycles through the prescaler and return the number of compare events
    ///
    /// Events beyond the first collapse into the single compare flag, as on hardware
    pub fn advance(&mut self, cycles: u32) -> u32 {
        let Some(config) = self.config else {
            return 0;
        };
        if !self.clock {
            return 0;
        }

        let divisor = config.prescale.divisor();
        let total = self.residue as u64 + cycles as u64;
        let steps = total / divisor as u64;
        self.residue = (total % divisor as u64) as u32;

        // The flag latches on the count that wraps from the compare value back to zero
        let period = config.period() as u64;
        let position = self.count as u64;
        let first = period - position.min(period - 1);

        let events = if steps >= first {
            1 + (steps - first) / period
        } else {
            0
        };

        self.count = ((position + steps) % period) as u16;
        if events > 0 {
            self.flag = true;
        }

        events as u32
    }
}

impl TickTimer for SimTimer {
    fn configure(&mut self, config: TimerConfig) {
        self.config = Some(config);
        self.count = 0;
        self.clock = true;
        self.flag = false;
        self.interrupt_enabled = true;
    }

    fn reset_count(&mut self) {
        self.count = 0;
    }

    fn set_clock_enabled(&mut self, enabled: bool) {
        self.clock = enabled && self.config.is_some();
    }

    fn is_clock_enabled(&self) -> bool {
        self.clock
    }

    fn acknowledge(&mut self) {
        self.flag = false;
    }
}

/// Simulated external interrupt controller for the three control lines
#[derive(Debug, Default)]
pub struct SimInterrupts {
    edges: [Option<Edge>; 3],
    enabled: [bool; 3],
    flags: [bool; 3],
    jammed: [bool; 3],
}

impl SimInterrupts {
    /// Controller with every line unconfigured and masked
    #[must_use]
    pub const fn new() -> Self {
        Self {
            edges: [None; 3],
            enabled: [false; 3],
            flags: [false; 3],
            jammed: [false; 3],
        }
    }

    /// Edge selected for `control`'s line
    #[must_use]
    pub const fn edge(&self, control: Control) -> Option<Edge> {
        self.edges[control.index()]
    }

    /// Whether `control`'s interrupt is unmasked
    #[must_use]
    pub const fn is_enabled(&self, control: Control) -> bool {
        self.enabled[control.index()]
    }

    /// Whether `control`'s interrupt is waiting to be serviced
    #[must_use]
    pub const fn is_pending(&self, control: Control) -> bool {
        self.flags[control.index()] && self.enabled[control.index()]
    }

    /// Apply a signal edge to `control`'s line; returns whether it latched the flag
    pub fn signal(&mut self, control: Control, edge: Edge) -> bool {
        let i = control.index();
        if self.edges[i] == Some(edge) {
            self.flags[i] = true;
        }
        self.flags[i]
    }

    /// Make acknowledging `control` ineffective, modelling a handler that never clears its flag
    pub fn jam(&mut self, control: Control) {
        self.jammed[control.index()] = true;
    }
}

impl ExternalInterrupts for SimInterrupts {
    fn set_edge(&mut self, control: Control, edge: Edge) {
        self.edges[control.index()] = Some(edge);
    }

    fn enable(&mut self, control: Control) {
        self.enabled[control.index()] = true;
    }

    fn acknowledge(&mut self, control: Control) {
        let i = control.index();
        if !self.jammed[i] {
            self.flags[i] = false;
        }
    }
}

/// Failure detected while delivering simulated interrupts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    /// The handler for this event returned with its interrupt flag still set
    Retriggered(Event),
}

/// Stopwatch running on simulated peripherals
pub struct Simulation {
    stopwatch: Stopwatch<SimTimer, SimInterrupts>,
    tick: TimerConfig,
}

impl Simulation {
    /// Build and start a stopwatch ticking with `tick`
    #[must_use]
    pub fn new(tick: TimerConfig) -> Self {
        Self::with_peripherals(SimTimer::new(), SimInterrupts::new(), tick)
    }

    /// Build and start a stopwatch over the given simulated peripherals
    #[must_use]
    pub fn with_peripherals(timer: SimTimer, lines: SimInterrupts, tick: TimerConfig) -> Self {
        let mut stopwatch = Stopwatch::new(timer, lines);
        stopwatch.start(tick);
        Self { stopwatch, tick }
    }

    /// The simulated stopwatch (read-only)
    #[must_use]
    pub const fn stopwatch(&self) -> &Stopwatch<SimTimer, SimInterrupts> {
        &self.stopwatch
    }

    /// Snapshot the stopwatch, as the display loop does
    pub fn report(&mut self) -> Report {
        self.stopwatch.report()
    }

    /// Let `cycles` CPU cycles pass, servicing every compare event as it occurs
    ///
    /// # Errors
    /// Returns an error if a handler leaves its interrupt flag set
    pub fn run_cycles(&mut self, cycles: u32) -> Result<u32, SimError> {
        let chunk = self.tick.cycles_per_event();
        let mut remaining = cycles;
        let mut ticks = 0;

        while remaining > 0 {
            let step = remaining.min(chunk);
            self.stopwatch.timer_mut().advance(step);
            ticks += self.service()?;
            remaining -= step;
        }

        Ok(ticks)
    }

    /// Let `periods` tick periods pass; returns the number of ticks delivered
    ///
    /// # Errors
    /// Returns an error if a handler leaves its interrupt flag set
    pub fn run_periods(&mut self, periods: u32) -> Result<u32, SimError> {
        let mut ticks = 0;
        for _ in 0..periods {
            ticks += self.run_cycles(self.tick.cycles_per_event())?;
        }
        Ok(ticks)
    }

    /// Apply an edge to a control line and service the result
    ///
    /// # Errors
    /// Returns an error if a handler leaves its interrupt flag set
    pub fn signal(&mut self, control: Control, edge: Edge) -> Result<(), SimError> {
        self.stopwatch.lines_mut().signal(control, edge);
        self.service().map(|_| ())
    }

    /// Press a control button, producing the edge its line listens for
    ///
    /// # Errors
    /// Returns an error if a handler leaves its interrupt flag set
    pub fn press(&mut self, control: Control) -> Result<(), SimError> {
        self.signal(control, control.edge())
    }

    fn pending(&self) -> Option<Event> {
        let lines = self.stopwatch.lines();
        Control::ALL
            .into_iter()
            .find(|&control| lines.is_pending(control))
            .map(Event::Control)
            .or_else(|| self.stopwatch.timer().is_pending().then_some(Event::Tick))
    }

    fn is_raised(&self, event: Event) -> bool {
        match event {
            Event::Tick => self.stopwatch.timer().is_pending(),
            Event::Control(control) => self.stopwatch.lines().is_pending(control),
        }
    }

    /// Run handlers until nothing is pending; returns the number of ticks handled
    fn service(&mut self) -> Result<u32, SimError> {
        let mut ticks = 0;
        while let Some(event) = self.pending() {
            self.stopwatch.handle(event);
            if self.is_raised(event) {
                return Err(SimError::Retriggered(event));
            }
            if event == Event::Tick {
                ticks += 1;
            }
        }
        Ok(ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::TICK, time::ElapsedTime};

    fn hms(hours: u8, minutes: u8, seconds: u8) -> ElapsedTime {
        ElapsedTime::from_hms(hours, minutes, seconds).unwrap()
    }

    #[test]
    fn timer_fires_once_per_period() {
        let mut timer = SimTimer::new();
        timer.configure(TICK);
        assert_eq!(timer.advance(TICK.cycles_per_event() - 1), 0, "just short");
        assert_eq!(timer.advance(1), 1, "compare reached");
        assert!(timer.is_pending(), "flag set");
        assert_eq!(timer.count(), 0, "count wrapped");
        assert_eq!(timer.advance(TICK.prescale.divisor()), 0, "restarted");
        assert_eq!(timer.count(), 1, "counting again");
    }

    #[test]
    fn timer_without_clock_stands_still() {
        let mut timer = SimTimer::new();
        assert_eq!(timer.advance(u32::MAX), 0, "unconfigured");
        timer.configure(TICK);
        timer.set_clock_enabled(false);
        assert_eq!(timer.advance(u32::MAX), 0, "no clock");
        assert_eq!(timer.count(), 0, "count unchanged");
    }

    #[test]
    fn unconfigured_or_wrong_edge_does_not_latch() {
        let mut lines = SimInterrupts::new();
        assert!(!lines.signal(Control::Reset, Edge::Falling), "unconfigured");
        lines.set_edge(Control::Reset, Edge::Falling);
        assert!(!lines.signal(Control::Reset, Edge::Rising), "wrong edge");
        assert!(lines.signal(Control::Reset, Edge::Falling), "right edge");
        assert!(!lines.is_pending(Control::Reset), "masked");
        lines.enable(Control::Reset);
        assert!(lines.is_pending(Control::Reset), "unmasked");
    }

    #[test]
    fn one_hour_one_minute_one_second() {
        let mut sim = Simulation::new(TICK);
        assert_eq!(sim.run_periods(3661), Ok(3661), "ticks delivered");
        assert_eq!(sim.stopwatch().time(), hms(1, 1, 1), "elapsed");
    }

    #[test]
    fn long_run_delivers_every_tick() {
        let mut sim = Simulation::new(TICK);
        assert_eq!(
            sim.run_cycles(TICK.cycles_per_event() * 200 + 5),
            Ok(200),
            "ticks delivered"
        );
        assert_eq!(sim.stopwatch().time(), hms(0, 3, 20), "elapsed");
    }

    #[test]
    fn paused_time_holds_until_resume() {
        let mut sim = Simulation::new(TICK);
        sim.run_periods(10).unwrap();
        sim.press(Control::Pause).unwrap();

        assert_eq!(sim.run_periods(100), Ok(0), "no ticks while paused");
        sim.press(Control::Resume).unwrap();
        assert_eq!(sim.stopwatch().time(), hms(0, 0, 10), "held value");
        assert!(sim.stopwatch().is_running(), "running again");

        sim.run_periods(5).unwrap();
        assert_eq!(sim.stopwatch().time(), hms(0, 0, 15), "continues from held value");
    }

    #[test]
    fn reset_while_paused_stays_paused() {
        let mut sim = Simulation::new(TICK);
        sim.run_periods(5 * 3600 + 30 * 60 + 45).unwrap();
        sim.press(Control::Pause).unwrap();
        assert_eq!(sim.stopwatch().time(), hms(5, 30, 45), "before reset");

        sim.press(Control::Reset).unwrap();
        assert_eq!(sim.stopwatch().time(), ElapsedTime::ZERO, "after reset");
        assert!(!sim.stopwatch().is_running(), "still paused");

        sim.run_periods(3).unwrap();
        assert_eq!(sim.stopwatch().time(), ElapsedTime::ZERO, "no ticks while paused");
    }

    #[test]
    fn reset_while_running_restarts_the_period() {
        let mut sim = Simulation::new(TICK);
        sim.run_periods(42).unwrap();
        sim.run_cycles(TICK.cycles_per_event() / 2).unwrap();
        sim.press(Control::Reset).unwrap();
        assert_eq!(sim.stopwatch().timer().count(), 0, "count zeroed");
        assert!(sim.stopwatch().is_running(), "still running");

        assert_eq!(
            sim.run_cycles(TICK.cycles_per_event() - TICK.prescale.divisor()),
            Ok(0),
            "full period needed after reset"
        );
        assert_eq!(sim.run_cycles(TICK.prescale.divisor()), Ok(1), "first tick");
        assert_eq!(sim.stopwatch().time(), hms(0, 0, 1), "counting from zero");
    }

    #[test]
    fn pausing_keeps_count_register() {
        let mut sim = Simulation::new(TICK);
        sim.run_cycles(TICK.cycles_per_event() / 4).unwrap();
        let count = sim.stopwatch().timer().count();
        sim.press(Control::Pause).unwrap();
        sim.run_periods(2).unwrap();
        assert_eq!(sim.stopwatch().timer().count(), count, "count held");
    }

    #[test]
    fn wrong_edge_is_ignored() {
        let mut sim = Simulation::new(TICK);
        sim.signal(Control::Pause, Edge::Falling).unwrap();
        assert!(sim.stopwatch().is_running(), "falling edge on pause line");
        sim.signal(Control::Pause, Edge::Rising).unwrap();
        assert!(!sim.stopwatch().is_running(), "rising edge on pause line");
    }

    #[test]
    fn handlers_clear_their_flags() {
        let mut sim = Simulation::new(TICK);
        for control in Control::ALL {
            sim.press(control).unwrap();
            assert!(
                !sim.stopwatch().lines().is_pending(control),
                "{control:?} flag cleared"
            );
        }
        sim.run_periods(1).unwrap();
        assert!(!sim.stopwatch().timer().is_pending(), "tick flag cleared");
    }

    #[test]
    fn uncleared_flag_is_detected() {
        let mut lines = SimInterrupts::new();
        lines.jam(Control::Resume);
        let mut sim = Simulation::with_peripherals(SimTimer::new(), lines, TICK);
        assert_eq!(
            sim.press(Control::Resume),
            Err(SimError::Retriggered(Event::Control(Control::Resume))),
            "re-triggering handler"
        );
    }

    #[test]
    fn report_lists_handled_controls() {
        let mut sim = Simulation::new(TICK);
        sim.press(Control::Pause).unwrap();
        sim.press(Control::Resume).unwrap();
        let report = sim.report();
        assert!(report.controls.contains(Control::Pause), "pause reported");
        assert!(report.controls.contains(Control::Resume), "resume reported");
        assert!(!report.controls.contains(Control::Reset), "reset not reported");
        assert!(report.running, "running");
    }
}
