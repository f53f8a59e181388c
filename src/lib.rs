//! This is a platform-agnostic Rust driver for the DHT11 humidity and temperature sensor,
//! bit-banged over a single GPIO line using the [`embedded-hal`] traits.
//!
//! [`embedded-hal`]: https://github.com/rust-embedded/embedded-hal/tree/master/embedded-hal
//!
//! This driver allows you to:
//! - Trigger a measurement and read the decoded humidity and temperature.
//! - Read the raw integral/decimal bytes of a measurement.
//! - Tune the start pulse, sample delay and timeout budget.
//!
//! This driver does not support the following:
//! - Checksum validation of the fifth response byte.
//! - Retrying failed reads.  Wait at least one second and call [`Dht11::read`] again.
//! - Several sensors per driver instance.
//!
//! ## Features
//!
//! - `defmt`: Enables logging using the `defmt` framework.
//! - `log`: Enables logging using the `log` framework.
//!
//! ## Protocol
//!
//! The host drives the line low for at least 18 ms and releases it.  The sensor answers with
//! about 80 us low and 80 us high, then sends 40 bits.  Each bit starts with a 50 us low gap
//! followed by a high pulse of 26-28 us for `0` or 70 us for `1`.  The driver samples the line
//! 40 us after each rising edge: still high means `1`.  The bytes are, in order, humidity
//! integral part, humidity decimal part, temperature integral part, temperature decimal part
//! and a checksum, which this driver ignores.
//!
//! All waits are busy polls of a free-running microsecond timer, bounded by a tick budget.
//!
//! ## Example:
//!
//! ```ignore
//! use dht11_bitbang::Dht11;
//!
//! // Platform-specific
//! let pin = /* dht11_bitbang::FlexPin instance */;
//! let timer = /* dht11_bitbang::MicrosTimer instance */;
//! let delay = /* embedded_hal::delay::DelayNs instance */;
//!
//! let mut dht11 = Dht11::new(pin, timer, delay);
//!
//! loop {
//!     let reading = dht11.read();
//!     if !reading.failed {
//!         println!("{:0.1} %RH, {:0.1} °C", reading.humidity, reading.temperature);
//!     }
//!
//!     // Platform-specific: the sensor needs a second between reads
//!     sleep_secs(1);
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("Features \"defmt\" and \"log\" are mutually exclusive and cannot be enabled together");

mod bus;
mod device_impl;
mod hw_def;
mod types;
#[cfg(test)]
mod sim;

pub use crate::{bus::*, hw_def::*, types::*};

#[cfg(feature="defmt")]
use defmt::Format;

/// DHT11 device driver
#[derive(Debug)]
pub struct Dht11<Pin, Timer, Delay> {
    pub(crate) pin: Pin,
    pub(crate) timer: Timer,
    pub(crate) delay: Delay,
    pub(crate) timing: Timing,
}

/// All possible errors in this crate
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, PartialEq)]
pub enum Error<E> {
    /// GPIO error while driving or sampling the data line
    Pin(E),
    /// The line did not change level within the timeout budget
    Timeout,
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Pin(err) => write!(f, "GPIO error: {err:?}"),
            Error::Timeout => f.write_str("timed out waiting for the sensor"),
        }
    }
}
