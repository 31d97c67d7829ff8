//! GPIO pin abstractions
//!
//! Provides traits for digital and analog pins that can be implemented
//! by chip-specific HALs.

/// Digital output pin
///
/// For open-drain lines (one-wire sensors), `set_high` releases the line
/// and lets the pull-up take it high.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently driven high
    fn is_set_high(&self) -> bool;
}

/// Digital input pin
///
/// Implementations should handle the actual hardware register reading
/// for the specific chip.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Analog input pin
///
/// Returns the raw ADC count. Resolution is board-specific (12-bit on
/// ESP32, so 0-4095); callers publish the count unscaled.
pub trait AnalogPin {
    /// Sample the ADC channel attached to this pin
    ///
    /// Takes `&mut self` because ADC conversions typically require
    /// mutable access to the converter.
    fn read_raw(&mut self) -> u16;
}

/// Pin that can be used for both input and output
///
/// Single-wire protocols drive the line low, then release it and sample
/// the device's response on the same pin.
pub trait IoPin: OutputPin + InputPin {}

// Blanket implementation for types that implement both traits
impl<T: OutputPin + InputPin> IoPin for T {}
