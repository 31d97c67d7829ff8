//! Sensor driver traits

use chameleon_hal::{AnalogPin, InputPin};

/// Errors that can occur while sampling a sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Device did not answer within the protocol window
    Timeout,
    /// Frame received but checksum did not match
    Checksum,
    /// Bus-level failure
    Bus,
}

impl core::fmt::Display for SensorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SensorError::Timeout => f.write_str("sensor timeout"),
            SensorError::Checksum => f.write_str("sensor checksum mismatch"),
            SensorError::Bus => f.write_str("sensor bus error"),
        }
    }
}

/// Trait for temperature probes (DHT-family one-wire sensors)
///
/// Implementations may report a failed conversion either as an error or
/// as `f32::NAN`; callers must treat both as "no reading".
pub trait TemperatureProbe {
    /// Read the current temperature in degrees Celsius
    fn read_celsius(&mut self) -> Result<f32, SensorError>;
}

/// Board-side factory for sensor handles
///
/// The sensor manager calls this during `init` to claim the hardware each
/// configured sensor needs. Handles are owned by the manager and dropped
/// on the next reconfiguration.
pub trait SensorBoard {
    /// Temperature probe driver type
    type Probe: TemperatureProbe;
    /// Plain input pin type (digital and analog capable)
    type Pin: InputPin + AnalogPin;

    /// Construct and start a temperature probe on the given GPIO
    fn temperature_probe(&mut self, pin: u8) -> Self::Probe;

    /// Configure the given GPIO as a plain input
    fn input_pin(&mut self, pin: u8) -> Self::Pin;
}
