// src/common/hal_traits.rs

use super::address::SensorAddr;
use core::fmt::Debug;
use core::ops::Sub;
use core::time::Duration;

/// A point in time from a monotonic clock.
///
/// Subtracting an earlier instant yields the elapsed time. `std::time::Instant`
/// qualifies as-is.
pub trait Co2Instant: Copy + Sub<Self, Output = Duration> {}

impl<T> Co2Instant for T where T: Copy + Sub<T, Output = Duration> {}

/// Abstraction for the monotonic clock used for request timeouts.
pub trait Co2Timer {
    type Instant: Co2Instant;

    /// Current time. Must never go backwards.
    fn now(&self) -> Self::Instant;
}

/// Abstraction for the non-blocking serial link to the sensor (19200 8N1).
pub trait Co2Serial {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Number of received bytes that can be read without blocking.
    fn available(&mut self) -> Result<usize, Self::Error>;

    /// Attempts to read a single byte from the serial interface.
    ///
    /// Returns `Ok(byte)` if a byte was read, or `Err(nb::Error::WouldBlock)`
    /// if no byte is available yet. Other errors are returned as `Err(nb::Error::Other(Self::Error))`.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Attempts to write a single byte to the serial interface.
    ///
    /// Returns `Ok(())` if the byte was accepted for transmission, or `Err(nb::Error::WouldBlock)`
    /// if the write buffer is full.
    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error>;

    /// Attempts to flush the transmit buffer.
    fn flush(&mut self) -> nb::Result<(), Self::Error>;
}

/// Receiver of decoded measurements and discovery outcomes.
pub trait Co2Sink {
    /// Called once per successful concentration read.
    fn publish_ppm(&mut self, ppm: f32);

    /// Called once when discovery gives up on finding a sensor.
    fn sensor_not_found(&mut self, _last_tried: SensorAddr) {}
}
