//! DHT11 single-wire protocol constants and timing configuration.
//!
//! All durations are in microseconds (timer ticks) unless the name says otherwise.

#[cfg(feature = "defmt")]
use defmt::Format;

/// Number of bits the sensor clocks out after the handshake
pub const DATA_BITS: usize = 40;

/// Number of leading bits that carry the humidity and temperature fields
pub const FIELD_BITS: usize = 32;

/// Host start pulse, the sensor needs at least 18 ms of low
pub const START_PULSE_MS: u32 = 20;

/// Delay after a rising edge before the line is sampled.  A `0` bit holds the line high for
/// 26-28 us and a `1` bit for about 70 us.
pub const SAMPLE_DELAY_US: u32 = 40;

/// Budget for every line transition wait
pub const TIMEOUT_TICKS: u32 = 200;

/// Number of line transitions in the sensor's response preamble
pub const HANDSHAKE_EDGES: u8 = 3;

/// Timing parameters of one read
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Timing {
    /// length of the host start pulse in milliseconds
    pub start_pulse_ms: u32,
    /// ticks between a bit's rising edge and the sample
    pub sample_delay_us: u32,
    /// ticks a single wait may take before the read is abandoned
    pub timeout_ticks: u32,
}
impl Default for Timing {
    fn default() -> Self {
        Self {
            start_pulse_ms: START_PULSE_MS,
            sample_delay_us: SAMPLE_DELAY_US,
            timeout_ticks: TIMEOUT_TICKS,
        }
    }
}
