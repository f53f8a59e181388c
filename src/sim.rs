//! Simulated DHT11 data line for host tests.
//!
//! A [`Line`] owns a shared microsecond clock.  The timer advances the clock by one tick per
//! read, the delay advances it by the requested amount, and the pin reports the level of a
//! scripted waveform that starts replaying every time the host switches the pin to input.

use crate::bus::{FlexPin, MicrosTimer, PinMode};
use crate::hw_def::DATA_BITS;

use core::cell::{Cell, RefCell};
use core::convert::Infallible;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use std::rc::Rc;
use std::vec::Vec;

/// Line held low by the sensor before the response
pub const ACK_LOW_US: u32 = 80;
/// Line held high by the sensor before the first bit
pub const ACK_HIGH_US: u32 = 80;
/// Low gap preceding every bit
pub const BIT_GAP_US: u32 = 50;
/// High pulse of a `0` bit
pub const ZERO_US: u32 = 26;
/// High pulse of a `1` bit
pub const ONE_US: u32 = 70;

/// Index of the first bit's low gap in a [`Line::respond`] waveform
pub const FIRST_BIT_SEGMENT: usize = 3;

/// Host-side operation on the simulated pin
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PinCall {
    /// direction switch
    Mode(PinMode),
    /// driven low
    Low,
    /// driven high
    High,
}

#[derive(Default)]
struct State {
    now: Cell<u32>,
    base: Cell<u32>,
    started: Cell<bool>,
    mode: Cell<Option<PinMode>>,
    driven_high: Cell<bool>,
    low_since: Cell<u32>,
    start_pulse_us: Cell<u32>,
    released_at: Cell<Option<u32>>,
    releases: Cell<u32>,
    stall_next: Cell<Option<usize>>,
    stall: Cell<Option<usize>>,
    segments: RefCell<Vec<(bool, u32)>>,
    calls: RefCell<Vec<PinCall>>,
}

/// Shared simulated bus
#[derive(Clone, Default)]
pub struct Line(Rc<State>);

impl Line {
    /// A line nobody answers on; the pull-up keeps it high
    pub fn silent() -> Self {
        Self::default()
    }

    /// A sensor answering with the given five bytes
    pub fn respond(bytes: [u8; 5]) -> Self {
        let mut widths = [0u32; DATA_BITS];
        for (ii, width) in widths.iter_mut().enumerate() {
            let bit = (bytes[ii / 8] >> (7 - ii % 8)) & 1 == 1;
            *width = if bit { ONE_US } else { ZERO_US };
        }
        Self::with_pulses(&widths)
    }

    /// A sensor answering with explicit high-pulse widths, one per bit slot
    pub fn with_pulses(widths: &[u32; DATA_BITS]) -> Self {
        let line = Self::default();
        {
            let mut segments = line.0.segments.borrow_mut();
            segments.push((true, 30));
            segments.push((false, ACK_LOW_US));
            segments.push((true, ACK_HIGH_US));
            for &width in widths {
                segments.push((false, BIT_GAP_US));
                segments.push((true, width));
            }
            segments.push((false, BIT_GAP_US));
        }
        line
    }

    /// Number of segments in the scripted waveform
    pub fn segments(&self) -> usize {
        self.0.segments.borrow().len()
    }

    /// Freeze the line at `segment` during the next response only
    pub fn stall_next_at(&self, segment: usize) {
        self.0.stall_next.set(Some(segment));
    }

    /// Pin handle
    pub fn pin(&self) -> SimPin {
        SimPin(self.clone())
    }

    /// Timer handle
    pub fn timer(&self) -> SimTimer {
        SimTimer(self.clone())
    }

    /// Delay handle
    pub fn delay(&self) -> SimDelay {
        SimDelay(self.clone())
    }

    /// Whether the timer was started
    pub fn timer_started(&self) -> bool {
        self.0.started.get()
    }

    /// Length of the last host start pulse
    pub fn start_pulse_us(&self) -> u32 {
        self.0.start_pulse_us.get()
    }

    /// How many times the host released the line to the sensor
    pub fn releases(&self) -> u32 {
        self.0.releases.get()
    }

    /// Direction switches and writes issued by the host, oldest first
    pub fn calls(&self) -> Vec<PinCall> {
        self.0.calls.borrow().clone()
    }

    fn level(&self) -> bool {
        let state = &self.0;
        if state.mode.get() == Some(PinMode::Output) {
            return state.driven_high.get();
        }
        let Some(released_at) = state.released_at.get() else {
            return true;
        };
        let mut t = state.now.get() - released_at;
        for (index, &(level, width)) in state.segments.borrow().iter().enumerate() {
            if state.stall.get() == Some(index) || t < width {
                return level;
            }
            t -= width;
        }
        true
    }
}

/// Simulated open-drain IO pin
pub struct SimPin(Line);

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0.level())
    }
    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.0.level())
    }
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        let state = &(self.0).0;
        state.calls.borrow_mut().push(PinCall::Low);
        state.driven_high.set(false);
        state.low_since.set(state.now.get());
        Ok(())
    }
    fn set_high(&mut self) -> Result<(), Self::Error> {
        let state = &(self.0).0;
        state.calls.borrow_mut().push(PinCall::High);
        if !state.driven_high.get() {
            state.start_pulse_us.set(state.now.get() - state.low_since.get());
        }
        state.driven_high.set(true);
        Ok(())
    }
}

impl FlexPin for SimPin {
    fn set_mode(&mut self, mode: PinMode) -> Result<(), Self::Error> {
        let state = &(self.0).0;
        state.calls.borrow_mut().push(PinCall::Mode(mode));
        state.mode.set(Some(mode));
        match mode {
            PinMode::Input => {
                state.released_at.set(Some(state.now.get()));
                state.releases.set(state.releases.get() + 1);
                state.stall.set(state.stall_next.take());
            }
            PinMode::Output => state.released_at.set(None),
        }
        Ok(())
    }
}

/// Simulated free-running microsecond counter
pub struct SimTimer(Line);

impl MicrosTimer for SimTimer {
    fn start(&mut self) {
        (self.0).0.started.set(true);
    }
    fn reset(&mut self) {
        let state = &(self.0).0;
        state.base.set(state.now.get());
    }
    fn ticks(&mut self) -> u32 {
        let state = &(self.0).0;
        state.now.set(state.now.get() + 1);
        state.now.get() - state.base.get()
    }
}

/// Simulated blocking delay
pub struct SimDelay(Line);

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        let state = &(self.0).0;
        state.now.set(state.now.get() + ns.div_ceil(1_000));
    }
}
