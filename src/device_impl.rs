use crate::bus::*;
use crate::hw_def::*;
use crate::types::*;
use crate::{Dht11, Error};

use embedded_hal::{delay::DelayNs, digital::PinState};

cfg_if::cfg_if! {
    if #[cfg(feature = "defmt")] {
        use defmt::{debug, trace, warn};
    } else if #[cfg(feature = "log")] {
        use log::{debug, trace, warn};
    }
}
#[cfg(not(any(feature = "defmt", feature = "log")))]
macro_rules! trace {
    ($($arg:tt)*) => {};
}
#[cfg(not(any(feature = "defmt", feature = "log")))]
macro_rules! debug {
    ($($arg:tt)*) => {};
}
#[cfg(not(any(feature = "defmt", feature = "log")))]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

// Levels the sensor settles at during its acknowledge preamble
const HANDSHAKE: [PinState; HANDSHAKE_EDGES as usize] = [PinState::Low, PinState::High, PinState::Low];

impl<Pin, Timer, Delay, E> Dht11<Pin, Timer, Delay>
where
    Pin: FlexPin<Error = E>,
    Timer: MicrosTimer,
    Delay: DelayNs,
{
    /// Create a new DHT11 driver instance and start the free-running timer
    pub fn new(pin: Pin, mut timer: Timer, delay: Delay) -> Self {
        timer.start();
        Self { pin, timer, delay, timing: Timing::default() }
    }

    /// Replace the default protocol timing
    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Protocol timing in use
    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Destroy the driver and hand back the pin, timer and delay
    pub fn release(self) -> (Pin, Timer, Delay) {
        (self.pin, self.timer, self.delay)
    }

    /// Read the sensor, reporting any failure through [`SensorReading::failed`]
    pub fn read(&mut self) -> SensorReading {
        match self.try_read() {
            Ok(reading) => reading.into(),
            Err(Error::Pin(_)) => {
                warn!("dht11::read(): GPIO error, reading flagged as failed");
                SensorReading::FAILED
            }
            Err(Error::Timeout) => SensorReading::FAILED,
        }
    }

    /// Read the sensor and convert the result
    pub fn try_read(&mut self) -> Result<Reading, Error<E>> {
        Ok(self.read_raw()?.into())
    }

    /// Run one complete transaction and return the undecoded fields
    pub fn read_raw(&mut self) -> Result<RawReading, Error<E>> {
        self.start_signal()?;

        for (edge, level) in HANDSHAKE.into_iter().enumerate() {
            self.await_level(level, Phase::Ack(edge as u8))?;
        }

        let mut bits = [false; DATA_BITS];
        for (slot, bit) in bits.iter_mut().enumerate() {
            *bit = self.read_bit(slot as u8)?;
        }

        let raw = RawReading::from_bits(&bits);
        debug!("dht11::read_raw(): {:?}", raw);
        Ok(raw)
    }

    fn start_signal(&mut self) -> Result<(), Error<E>> {
        trace!("dht11::start_signal(): {} ms low", self.timing.start_pulse_ms);
        self.pin.set_mode(PinMode::Output).map_err(Error::Pin)?;
        self.pin.set_low().map_err(Error::Pin)?;
        self.delay.delay_ms(self.timing.start_pulse_ms);
        self.pin.set_high().map_err(Error::Pin)?;
        self.pin.set_mode(PinMode::Input).map_err(Error::Pin)?;
        Ok(())
    }

    fn read_bit(&mut self, slot: u8) -> Result<bool, Error<E>> {
        self.await_level(PinState::High, Phase::BitStart(slot))?;
        hold(&mut self.timer, self.timing.sample_delay_us);
        // a short `0` pulse has already ended by now
        let bit = self.pin.is_high().map_err(Error::Pin)?;
        self.await_level(PinState::Low, Phase::BitEnd(slot))?;
        Ok(bit)
    }

    #[cfg_attr(not(any(feature = "defmt", feature = "log")), allow(unused_variables))]
    fn await_level(&mut self, level: PinState, phase: Phase) -> Result<u32, Error<E>> {
        let pin = &mut self.pin;
        let result = wait_for(&mut self.timer, self.timing.timeout_ticks, || match level {
            PinState::High => pin.is_high(),
            PinState::Low => pin.is_low(),
        });
        match result {
            Ok(elapsed) => Ok(elapsed),
            Err(WaitError::Timeout) => {
                warn!("dht11::await_level(): timed out at {:?}", phase);
                Err(Error::Timeout)
            }
            Err(WaitError::Condition(err)) => Err(Error::Pin(err)),
        }
    }
}
