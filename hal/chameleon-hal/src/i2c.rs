//! I2C bus abstractions
//!
//! Provides traits for I2C master operations that can be implemented
//! by chip-specific HALs.

/// Default SDA pin when a display spec omits its bus pins
pub const DEFAULT_SDA_PIN: u8 = 21;

/// Default SCL pin when a display spec omits its bus pins
pub const DEFAULT_SCL_PIN: u8 = 22;

/// I2C bus master
///
/// Provides basic I2C read/write operations for communicating with
/// peripheral devices. Transactions are expected to be bounded by the
/// implementation's own bus timeout.
pub trait I2cBus {
    /// Error type for I2C operations
    type Error;

    /// Write data to a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `data` - Bytes to write
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Read data from a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `buf` - Buffer to read into
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;
}

/// SDA/SCL pin pair used to bring up an I2C bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cPins {
    /// Data line GPIO
    pub sda: u8,
    /// Clock line GPIO
    pub scl: u8,
}

impl Default for I2cPins {
    fn default() -> Self {
        Self {
            sda: DEFAULT_SDA_PIN,
            scl: DEFAULT_SCL_PIN,
        }
    }
}

impl I2cPins {
    /// Create a pin pair
    pub const fn new(sda: u8, scl: u8) -> Self {
        Self { sda, scl }
    }
}
