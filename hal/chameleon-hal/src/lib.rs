//! Chameleon Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the node core is
//! written against. A board support layer (ESP32, host simulator, test
//! harness) implements them; the core never touches registers directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Hosting application (firmware, sim)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  chameleon-core / chameleon-drivers     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  chameleon-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`], [`gpio::AnalogPin`] - Pin I/O
//! - [`i2c::I2cBus`] - I2C bus operations
//! - [`storage::BlobStore`] - Named-blob persistent storage

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;
pub mod storage;

// Re-export key traits at crate root for convenience
pub use gpio::{AnalogPin, InputPin, IoPin, OutputPin};
pub use i2c::{I2cBus, I2cPins};
pub use storage::{BlobStore, OpenMode, StorageError};
