//! Display management

pub mod manager;

pub use manager::{DisplayManager, BOOT_BANNER};
