//! JSON configuration document
//!
//! The persisted shape is:
//!
//! ```json
//! {
//!   "system":   { "wifi_ssid": "...", "wifi_pass": "...", "hostname": "..." },
//!   "displays": [ { "driver": "SSD1306", "pins": { "sda": 21, "scl": 22 } } ],
//!   "sensors":  [ { "name": "Room", "driver": "DHT", "pin": 4, "interval_ms": 2000 } ]
//! }
//! ```
//!
//! Every section and field is optional. The document structs below mirror
//! the JSON one-to-one; [`ConfigModel::from_json`] resolves them into the
//! typed model with defaults applied.

use alloc::string::String;
use alloc::vec::Vec;

use chameleon_hal::i2c::{I2cPins, DEFAULT_SCL_PIN, DEFAULT_SDA_PIN};
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::types::{
    ConfigModel, DisplayDriver, DisplaySpec, SensorDriver, SensorSpec, SystemConfig,
    DEFAULT_INTERVAL_MS, RESCUE_HOSTNAME,
};

/// Configuration parsing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Bytes are not a JSON document of the expected shape
    InvalidJson,
    /// Persisting the document failed
    Storage(chameleon_hal::StorageError),
}

impl From<chameleon_hal::StorageError> for ConfigError {
    fn from(e: chameleon_hal::StorageError) -> Self {
        ConfigError::Storage(e)
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::InvalidJson => f.write_str("config is not valid JSON"),
            ConfigError::Storage(e) => write!(f, "config storage error: {}", e),
        }
    }
}

/// Deserialize a leaf value, treating one of the wrong type as absent
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    match T::deserialize(&value) {
        Ok(v) => Ok(Some(v)),
        Err(_) => {
            if !value.is_null() {
                warn!("Ignoring mistyped config value {}", value);
            }
            Ok(None)
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    system: Option<SystemSection>,
    #[serde(default)]
    displays: Option<Vec<DisplayEntry>>,
    #[serde(default)]
    sensors: Option<Vec<SensorEntry>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SystemSection {
    #[serde(default, deserialize_with = "lenient")]
    wifi_ssid: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    wifi_pass: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    hostname: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct DisplayEntry {
    #[serde(default, deserialize_with = "lenient")]
    driver: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pins: Option<PinsEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PinsEntry {
    #[serde(default, deserialize_with = "lenient")]
    sda: Option<u8>,
    #[serde(default, deserialize_with = "lenient")]
    scl: Option<u8>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SensorEntry {
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    driver: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pin: Option<u8>,
    #[serde(default, deserialize_with = "lenient")]
    interval_ms: Option<u32>,
}

impl ConfigModel {
    /// Parse a configuration document
    ///
    /// Applies all defaults: rescue hostname when `hostname` is missing,
    /// empty, too long or not a string; 2000 ms sensor interval; SDA 21 /
    /// SCL 22; pin 0. A leaf of the wrong type counts as missing. Only
    /// broken syntax or a section of the wrong shape fails the parse.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        let doc: Document =
            serde_json::from_slice(bytes).map_err(|_| ConfigError::InvalidJson)?;

        let system = resolve_system(doc.system.unwrap_or_default());

        let displays = doc
            .displays
            .unwrap_or_default()
            .into_iter()
            .map(|d| {
                let pins = d.pins.map_or(I2cPins::default(), |p| {
                    I2cPins::new(
                        p.sda.unwrap_or(DEFAULT_SDA_PIN),
                        p.scl.unwrap_or(DEFAULT_SCL_PIN),
                    )
                });
                DisplaySpec {
                    driver: DisplayDriver::from_tag(d.driver.as_deref().unwrap_or_default()),
                    pins,
                }
            })
            .collect();

        let sensors = doc
            .sensors
            .unwrap_or_default()
            .into_iter()
            .map(|s| SensorSpec {
                name: s.name,
                driver: SensorDriver::from_tag(s.driver.as_deref().unwrap_or_default()),
                pin: s.pin.unwrap_or(0),
                interval_ms: s.interval_ms.unwrap_or(DEFAULT_INTERVAL_MS),
            })
            .collect();

        Ok(Self {
            system,
            displays,
            sensors,
        })
    }

    /// Serialize into the persisted document shape
    pub fn to_json(&self) -> Result<Vec<u8>, ConfigError> {
        let doc = Document {
            system: Some(SystemSection {
                wifi_ssid: Some(String::from(self.system.ssid.as_str())),
                wifi_pass: Some(String::from(self.system.pass.as_str())),
                hostname: Some(String::from(self.system.hostname.as_str())),
            }),
            displays: Some(
                self.displays
                    .iter()
                    .map(|d| DisplayEntry {
                        driver: Some(String::from(d.driver.tag())),
                        pins: Some(PinsEntry {
                            sda: Some(d.pins.sda),
                            scl: Some(d.pins.scl),
                        }),
                    })
                    .collect(),
            ),
            sensors: Some(
                self.sensors
                    .iter()
                    .map(|s| SensorEntry {
                        name: s.name.clone(),
                        driver: Some(String::from(s.driver.tag())),
                        pin: Some(s.pin),
                        interval_ms: Some(s.interval_ms),
                    })
                    .collect(),
            ),
        };

        serde_json::to_vec(&doc).map_err(|_| ConfigError::InvalidJson)
    }
}

fn resolve_system(section: SystemSection) -> SystemConfig {
    let mut system = SystemConfig::rescue();

    let ssid = heapless::String::try_from(section.wifi_ssid.as_deref().unwrap_or_default());
    let pass = heapless::String::try_from(section.wifi_pass.as_deref().unwrap_or_default());
    match (ssid, pass) {
        (Ok(ssid), Ok(pass)) => {
            system.ssid = ssid;
            system.pass = pass;
        }
        _ => warn!("WiFi credentials too long, starting without them"),
    }

    match section.hostname.as_deref() {
        None | Some("") => {}
        Some(name) => match heapless::String::try_from(name) {
            Ok(hostname) => system.hostname = hostname,
            Err(_) => warn!("Hostname too long, using {}", RESCUE_HOSTNAME),
        },
    }

    system
}

/// Re-serialize an arbitrary JSON document compactly
///
/// Used when persisting a document received from the web UI: the bytes
/// only need to be well-formed JSON, shape problems surface on next load.
pub fn normalize_json(bytes: &[u8]) -> Result<Vec<u8>, ConfigError> {
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|_| ConfigError::InvalidJson)?;
    serde_json::to_vec(&value).map_err(|_| ConfigError::InvalidJson)
}
