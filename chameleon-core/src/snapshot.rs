//! Snapshot of the latest sensor readings
//!
//! Published to push-channel clients as `[{"id":0,"val":23.0},...]`.

use alloc::string::String;
use alloc::vec::Vec;

use serde::Serialize;

/// Latest value of one sensor
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    /// Sensor id (position in the config)
    pub id: u32,
    /// Last valid value, 0.0 before the first one
    pub val: f32,
}

/// Cached readings of every active sensor, ascending id
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    readings: Vec<Reading>,
}

impl Snapshot {
    /// Create a snapshot from readings already in id order
    pub fn new(readings: Vec<Reading>) -> Self {
        Self { readings }
    }

    /// Number of readings
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Check if there are no readings
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Iterate over readings
    pub fn iter(&self) -> impl Iterator<Item = &Reading> {
        self.readings.iter()
    }

    /// Reading for a given sensor id
    pub fn get(&self, id: u32) -> Option<&Reading> {
        self.readings.iter().find(|r| r.id == id)
    }

    /// Encode as the published JSON array
    pub fn to_json(&self) -> String {
        // Only fails on non-string map keys, which this shape cannot produce
        serde_json::to_string(self).unwrap_or_else(|_| String::from("[]"))
    }
}
