//! Sensor management
//!
//! Turns [`SensorSpec`](crate::config::SensorSpec) entries into live
//! sensor instances and samples each one at its own cadence.

pub mod kind;
pub mod manager;

pub use kind::SensorKind;
pub use manager::{SensorInstance, SensorManager};
