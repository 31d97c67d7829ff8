//! Board-agnostic device management for the Chameleon sensor node
//!
//! This crate contains the logic that turns a JSON description into a
//! running set of sensors and displays, without depending on specific
//! hardware:
//!
//! - Configuration model and JSON document parsing
//! - Sensor manager (driver instantiation, per-device polling cadence)
//! - Display manager (surface bring-up, message rendering)
//! - Scheduler loop (polling tick, periodic snapshot publication)
//! - Application context tying the managers to persisted storage
//! - Hardware abstraction traits the board layer implements

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod app;
pub mod config;
pub mod display;
pub mod files;
pub mod scheduler;
pub mod sensor;
pub mod snapshot;
pub mod storage;
pub mod traits;

#[cfg(test)]
mod testing;

pub use app::{App, LoadOutcome};
pub use config::{ConfigError, ConfigModel};
pub use display::DisplayManager;
pub use scheduler::Scheduler;
pub use sensor::SensorManager;
pub use snapshot::{Reading, Snapshot};
