//! Configuration type definitions
//!
//! These types represent the node configuration after defaults have been
//! applied. They are produced by [`ConfigModel::from_json`] and consumed by
//! the sensor and display managers.

use alloc::string::String;
use alloc::vec::Vec;

use chameleon_hal::I2cPins;

/// Hostname used when no valid configuration exists
pub const RESCUE_HOSTNAME: &str = "esp32-rescue";

/// Blob the configuration document is persisted under
pub const CONFIG_PATH: &str = "/config.json";

/// Sampling interval when a sensor omits `interval_ms`
pub const DEFAULT_INTERVAL_MS: u32 = 2000;

/// Maximum SSID length (802.11 limit)
pub const MAX_SSID_LEN: usize = 32;

/// Maximum WPA2 passphrase length
pub const MAX_PASS_LEN: usize = 64;

/// Maximum mDNS/DHCP hostname length
pub const MAX_HOSTNAME_LEN: usize = 32;

/// Sensor driver selected by the `driver` tag
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorDriver {
    /// `"DHT"` - one-wire temperature probe
    TemperatureProbe,
    /// `"LDR"` - light-dependent resistor on an ADC pin
    AnalogLight,
    /// `"POT"` - potentiometer on an ADC pin
    AnalogPotentiometer,
    /// `"DIGITAL"` - plain digital input
    DigitalInput,
    /// Any other tag, kept verbatim
    Unsupported(String),
}

impl SensorDriver {
    /// Resolve a driver tag
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "DHT" => SensorDriver::TemperatureProbe,
            "LDR" => SensorDriver::AnalogLight,
            "POT" => SensorDriver::AnalogPotentiometer,
            "DIGITAL" => SensorDriver::DigitalInput,
            other => SensorDriver::Unsupported(String::from(other)),
        }
    }

    /// The tag this driver is written as in the config document
    pub fn tag(&self) -> &str {
        match self {
            SensorDriver::TemperatureProbe => "DHT",
            SensorDriver::AnalogLight => "LDR",
            SensorDriver::AnalogPotentiometer => "POT",
            SensorDriver::DigitalInput => "DIGITAL",
            SensorDriver::Unsupported(tag) => tag.as_str(),
        }
    }

    /// Check if the driver tag was recognized
    pub fn is_supported(&self) -> bool {
        !matches!(self, SensorDriver::Unsupported(_))
    }
}

/// Display driver selected by the `driver` tag
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayDriver {
    /// `"SSD1306"` - 128x64 monochrome OLED on I2C
    Ssd1306,
    /// Any other tag, kept verbatim
    Unsupported(String),
}

impl DisplayDriver {
    /// Resolve a driver tag
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "SSD1306" => DisplayDriver::Ssd1306,
            other => DisplayDriver::Unsupported(String::from(other)),
        }
    }

    /// The tag this driver is written as in the config document
    pub fn tag(&self) -> &str {
        match self {
            DisplayDriver::Ssd1306 => "SSD1306",
            DisplayDriver::Unsupported(tag) => tag.as_str(),
        }
    }
}

/// One configured sensor
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorSpec {
    /// Display label; synthesized from the id when absent
    pub name: Option<String>,
    /// Driver kind
    pub driver: SensorDriver,
    /// GPIO number (meaning depends on the driver)
    pub pin: u8,
    /// Sampling interval in milliseconds
    pub interval_ms: u32,
}

impl SensorSpec {
    /// Create a spec with the default interval and no explicit name
    pub fn new(driver: SensorDriver, pin: u8) -> Self {
        Self {
            name: None,
            driver,
            pin,
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }

    /// Set the sampling interval
    pub fn with_interval(mut self, interval_ms: u32) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    /// Set an explicit label
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(String::from(name));
        self
    }
}

/// One configured display
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplaySpec {
    /// Driver kind
    pub driver: DisplayDriver,
    /// I2C bus pins
    pub pins: I2cPins,
}

impl DisplaySpec {
    /// SSD1306 on the given bus pins
    pub fn ssd1306(pins: I2cPins) -> Self {
        Self {
            driver: DisplayDriver::Ssd1306,
            pins,
        }
    }
}

/// Network identity settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SystemConfig {
    /// WiFi network name; empty means "do not associate"
    pub ssid: heapless::String<MAX_SSID_LEN>,
    /// WiFi passphrase
    pub pass: heapless::String<MAX_PASS_LEN>,
    /// DHCP/mDNS hostname
    pub hostname: heapless::String<MAX_HOSTNAME_LEN>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self::rescue()
    }
}

impl SystemConfig {
    /// Settings used when no valid configuration exists
    pub fn rescue() -> Self {
        let mut hostname = heapless::String::new();
        // Fits: the rescue name is shorter than MAX_HOSTNAME_LEN
        let _ = hostname.push_str(RESCUE_HOSTNAME);
        Self {
            ssid: heapless::String::new(),
            pass: heapless::String::new(),
            hostname,
        }
    }

    /// Check if WiFi credentials are present
    pub fn has_credentials(&self) -> bool {
        !self.ssid.is_empty()
    }
}

/// Complete node configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigModel {
    /// Network identity
    pub system: SystemConfig,
    /// Displays in declaration order
    pub displays: Vec<DisplaySpec>,
    /// Sensors in declaration order
    pub sensors: Vec<SensorSpec>,
}

impl ConfigModel {
    /// Configuration used when the stored document is missing or unusable
    ///
    /// Rescue hostname, no credentials, no devices.
    pub fn rescue() -> Self {
        Self::default()
    }
}
