use crate::hw_def::*;

use core::fmt;

#[cfg(feature="defmt")]
use defmt::Format;

/// Raw (still in byte format) humidity and temperature fields from the device
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RawReading {
    /// integral part of the relative humidity
    pub humidity_int: u8,
    /// decimal part of the relative humidity, in tenths
    pub humidity_dec: u8,
    /// integral part of the temperature
    pub temperature_int: u8,
    /// decimal part of the temperature, in tenths
    pub temperature_dec: u8,
}
impl RawReading {
    /// Decode a captured bit train.
    ///
    /// Bits are most-significant first.  The trailing checksum byte is not interpreted.
    pub fn from_bits(bits: &[bool; DATA_BITS]) -> Self {
        let mut fields = [0u8; FIELD_BITS / 8];
        for (field, chunk) in fields.iter_mut().zip(bits[..FIELD_BITS].chunks_exact(8)) {
            *field = chunk.iter().fold(0, |acc, &bit| (acc << 1) | bit as u8);
        }
        Self {
            humidity_int: fields[0],
            humidity_dec: fields[1],
            temperature_int: fields[2],
            temperature_dec: fields[3],
        }
    }
    /// Get relative humidity in percent
    pub fn humidity_percent(&self) -> f32 {
        fixed_point(self.humidity_int, self.humidity_dec)
    }
    /// Get temperature in Centigrade
    pub fn centigrade(&self) -> f32 {
        fixed_point(self.temperature_int, self.temperature_dec)
    }
}
impl fmt::Display for RawReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RawReading {{ rh {}.{}; t {}.{} }}",
            self.humidity_int, self.humidity_dec, self.temperature_int, self.temperature_dec
        )
    }
}

// `int + dec / 10`, computed in tenths so the result is the nearest f32 to the decimal value
fn fixed_point(int: u8, dec: u8) -> f32 {
    (u16::from(int) * 10 + u16::from(dec)) as f32 / 10.0
}

/// Humidity and temperature after conversion
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    /// relative humidity in percent
    pub humidity: f32,
    /// degrees centigrade
    pub temperature: f32,
}
impl Reading {
    /// Get temperature in Fahrenheit
    pub fn fahrenheit(&self) -> f32 {
        self.temperature * 9.0 / 5.0 + 32.0
    }
}
impl From<RawReading> for Reading {
    fn from(raw: RawReading) -> Self {
        Self {
            humidity: raw.humidity_percent(),
            temperature: raw.centigrade(),
        }
    }
}
impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} %RH, {:.1} °C", self.humidity, self.temperature)
    }
}

/// Outcome of [`Dht11::read`](crate::Dht11::read).
///
/// When `failed` is set the numeric fields are zero and carry no meaning.
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensorReading {
    /// relative humidity in percent
    pub humidity: f32,
    /// degrees centigrade
    pub temperature: f32,
    /// the sensor did not answer within the timing budget
    pub failed: bool,
}
impl SensorReading {
    /// Result of a read that did not complete
    pub const FAILED: Self = Self {
        humidity: 0.0,
        temperature: 0.0,
        failed: true,
    };
}
impl From<Reading> for SensorReading {
    fn from(reading: Reading) -> Self {
        Self {
            humidity: reading.humidity,
            temperature: reading.temperature,
            failed: false,
        }
    }
}

/// Position in the response where the driver waits for a line transition
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    /// n-th edge of the sensor's acknowledge preamble
    Ack(u8),
    /// rising edge opening bit slot i
    BitStart(u8),
    /// falling edge closing bit slot i
    BitEnd(u8),
}
impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Ack(edge) => write!(f, "ack edge {edge}"),
            Phase::BitStart(slot) => write!(f, "start of bit {slot}"),
            Phase::BitEnd(slot) => write!(f, "end of bit {slot}"),
        }
    }
}

#[cfg(test)]
pub(crate) fn bits_of(bytes: [u8; 5]) -> [bool; DATA_BITS] {
    let mut bits = [false; DATA_BITS];
    for (ii, bit) in bits.iter_mut().enumerate() {
        *bit = (bytes[ii / 8] >> (7 - ii % 8)) & 1 == 1;
    }
    bits
}
