//! Per-driver sensor handles

use alloc::string::String;

use chameleon_hal::{AnalogPin, InputPin};
use log::{debug, warn};

use crate::config::SensorDriver;
use crate::traits::{SensorBoard, TemperatureProbe};

/// A constructed sensor, owning the hardware it reads from
///
/// Dropping the value releases the probe or pin back to the board.
pub enum SensorKind<B: SensorBoard> {
    /// One-wire temperature probe
    TemperatureProbe(B::Probe),
    /// Light-dependent resistor, raw ADC count
    AnalogLight(B::Pin),
    /// Potentiometer, raw ADC count
    AnalogPotentiometer(B::Pin),
    /// Digital input, 0.0 or 1.0
    DigitalInput(B::Pin),
    /// Unrecognized driver tag; never produces a reading
    Unsupported(String),
}

impl<B: SensorBoard> SensorKind<B> {
    /// Claim the hardware for `driver` on `pin`
    ///
    /// Unsupported drivers still get their pin configured as an input so
    /// the line is not left floating as an output.
    pub fn build(driver: &SensorDriver, pin: u8, board: &mut B) -> Self {
        match driver {
            SensorDriver::TemperatureProbe => {
                SensorKind::TemperatureProbe(board.temperature_probe(pin))
            }
            SensorDriver::AnalogLight => SensorKind::AnalogLight(board.input_pin(pin)),
            SensorDriver::AnalogPotentiometer => {
                SensorKind::AnalogPotentiometer(board.input_pin(pin))
            }
            SensorDriver::DigitalInput => SensorKind::DigitalInput(board.input_pin(pin)),
            SensorDriver::Unsupported(tag) => {
                drop(board.input_pin(pin));
                warn!("Unsupported sensor driver '{}' on pin {}", tag.as_str(), pin);
                SensorKind::Unsupported(tag.clone())
            }
        }
    }

    /// Take one reading
    ///
    /// Returns `None` when there is no usable value: probe errors, NaN
    /// conversions and unsupported drivers.
    pub fn read(&mut self) -> Option<f32> {
        match self {
            SensorKind::TemperatureProbe(probe) => match probe.read_celsius() {
                Ok(value) if !value.is_nan() => Some(value),
                Ok(_) => {
                    debug!("Temperature probe returned NaN");
                    None
                }
                Err(e) => {
                    debug!("Temperature probe read failed: {}", e);
                    None
                }
            },
            SensorKind::AnalogLight(pin) | SensorKind::AnalogPotentiometer(pin) => {
                Some(f32::from(pin.read_raw()))
            }
            SensorKind::DigitalInput(pin) => Some(if pin.is_high() { 1.0 } else { 0.0 }),
            SensorKind::Unsupported(_) => None,
        }
    }

    /// Driver this sensor was built for
    pub fn driver(&self) -> SensorDriver {
        match self {
            SensorKind::TemperatureProbe(_) => SensorDriver::TemperatureProbe,
            SensorKind::AnalogLight(_) => SensorDriver::AnalogLight,
            SensorKind::AnalogPotentiometer(_) => SensorDriver::AnalogPotentiometer,
            SensorKind::DigitalInput(_) => SensorDriver::DigitalInput,
            SensorKind::Unsupported(tag) => SensorDriver::Unsupported(tag.clone()),
        }
    }

    /// Check if this sensor can ever produce a reading
    pub fn is_supported(&self) -> bool {
        !matches!(self, SensorKind::Unsupported(_))
    }
}
