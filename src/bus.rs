use embedded_hal::digital::{InputPin, OutputPin};

#[cfg(feature = "defmt")]
use defmt::Format;

/// Direction of the data line
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PinMode {
    /// push-pull output, the host drives the line
    Output,
    /// floating input, the sensor drives the line
    Input,
}

/// A GPIO pin whose direction can be switched at runtime.
///
/// `embedded-hal` has no trait for this, so HAL users implement it on their flex/IO pin type,
/// usually by forwarding to the HAL's own `set_as_output`/`set_as_input`.
pub trait FlexPin: InputPin + OutputPin {
    /// Reconfigure the pin direction
    fn set_mode(&mut self, mode: PinMode) -> Result<(), Self::Error>;
}

/// A free-running up-counter ticking once per microsecond
pub trait MicrosTimer {
    /// Start counting.  Called once when the driver is created.
    fn start(&mut self);
    /// Set the counter back to zero
    fn reset(&mut self);
    /// Current counter value
    fn ticks(&mut self) -> u32;
}

impl<T: MicrosTimer + ?Sized> MicrosTimer for &mut T {
    fn start(&mut self) {
        T::start(self)
    }
    fn reset(&mut self) {
        T::reset(self)
    }
    fn ticks(&mut self) -> u32 {
        T::ticks(self)
    }
}

/// Outcome of a failed [`wait_for`]
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, Eq, PartialEq)]
pub enum WaitError<E> {
    /// the condition did not hold within the budget
    Timeout,
    /// the condition itself could not be evaluated
    Condition(E),
}

/// Busy-wait until `done` returns `true` or more than `budget` ticks have passed.
///
/// The timer is reset on entry.  On success the ticks elapsed at the last poll are returned.
pub fn wait_for<T, E, F>(timer: &mut T, budget: u32, mut done: F) -> Result<u32, WaitError<E>>
where
    T: MicrosTimer + ?Sized,
    F: FnMut() -> Result<bool, E>,
{
    timer.reset();
    let mut elapsed = 0;
    loop {
        if done().map_err(WaitError::Condition)? {
            return Ok(elapsed);
        }
        elapsed = timer.ticks();
        if elapsed > budget {
            return Err(WaitError::Timeout);
        }
    }
}

/// Busy-wait for `us` ticks
pub fn hold<T: MicrosTimer + ?Sized>(timer: &mut T, us: u32) {
    timer.reset();
    while timer.ticks() < us {
        core::hint::spin_loop();
    }
}
