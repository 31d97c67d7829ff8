//! Sensor manager
//!
//! Owns every active sensor. Rebuilt wholesale by [`SensorManager::init`];
//! sampled by [`SensorManager::poll`] on every scheduler tick.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use log::info;

use super::kind::SensorKind;
use crate::config::{SensorDriver, SensorSpec};
use crate::snapshot::{Reading, Snapshot};
use crate::traits::SensorBoard;

/// One live sensor
pub struct SensorInstance<B: SensorBoard> {
    id: u32,
    name: String,
    kind: SensorKind<B>,
    pin: u8,
    interval_ms: u32,
    last_read_ms: u32,
    last_value: f32,
}

impl<B: SensorBoard> SensorInstance<B> {
    /// Sequential id, position in the config
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Label (explicit or `Sensor {id}`)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Driver kind
    pub fn driver(&self) -> SensorDriver {
        self.kind.driver()
    }

    /// GPIO number
    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// Sampling interval in milliseconds
    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Time of the last read attempt, 0 before the first one
    pub fn last_read_ms(&self) -> u32 {
        self.last_read_ms
    }

    /// Last valid value, 0.0 before the first one
    pub fn last_value(&self) -> f32 {
        self.last_value
    }

    fn is_due(&self, now_ms: u32) -> bool {
        now_ms.wrapping_sub(self.last_read_ms) >= self.interval_ms
    }

    fn sample(&mut self, now_ms: u32) {
        self.last_read_ms = now_ms;
        if let Some(value) = self.kind.read() {
            self.last_value = value;
        }
    }
}

/// Sensor manager
pub struct SensorManager<B: SensorBoard> {
    sensors: Vec<SensorInstance<B>>,
}

impl<B: SensorBoard> Default for SensorManager<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: SensorBoard> SensorManager<B> {
    /// Create an empty manager
    pub fn new() -> Self {
        Self {
            sensors: Vec::new(),
        }
    }

    /// Replace the active set with sensors built from `specs`
    ///
    /// Every handle from the previous generation is dropped before the
    /// first new one is claimed, so a pin reused across generations is
    /// released before it is reconfigured.
    pub fn init(&mut self, specs: &[SensorSpec], board: &mut B) {
        self.sensors.clear();

        let mut sensors = Vec::with_capacity(specs.len());
        for (index, spec) in specs.iter().enumerate() {
            let id = index as u32;
            let name = match &spec.name {
                Some(name) => name.clone(),
                None => format!("Sensor {}", id),
            };
            let kind = SensorKind::build(&spec.driver, spec.pin, board);

            info!(
                "Sensor added: {} ({}) on pin {}, every {} ms",
                name.as_str(),
                spec.driver.tag(),
                spec.pin,
                spec.interval_ms
            );

            sensors.push(SensorInstance {
                id,
                name,
                kind,
                pin: spec.pin,
                interval_ms: spec.interval_ms,
                last_read_ms: 0,
                last_value: 0.0,
            });
        }

        self.sensors = sensors;
    }

    /// Sample every sensor whose interval has elapsed
    ///
    /// Uses wrapping arithmetic so the cadence survives the 49-day
    /// millisecond counter rollover.
    pub fn poll(&mut self, now_ms: u32) {
        for sensor in self.sensors.iter_mut().filter(|s| s.is_due(now_ms)) {
            sensor.sample(now_ms);
        }
    }

    /// Cached value of every sensor, ascending id
    ///
    /// Never touches hardware.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(
            self.sensors
                .iter()
                .map(|s| Reading {
                    id: s.id,
                    val: s.last_value,
                })
                .collect(),
        )
    }

    /// Number of sensors whose driver tag was not recognized
    pub fn unsupported_count(&self) -> usize {
        self.sensors.iter().filter(|s| !s.kind.is_supported()).count()
    }

    /// Number of active sensors
    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    /// Check if no sensors are active
    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    /// Iterate over active sensors in id order
    pub fn iter(&self) -> impl Iterator<Item = &SensorInstance<B>> {
        self.sensors.iter()
    }

    /// Sensor by id
    pub fn get(&self, id: u32) -> Option<&SensorInstance<B>> {
        self.sensors.get(id as usize)
    }
}
