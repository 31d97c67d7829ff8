//! Configuration
//!
//! Typed configuration model plus the JSON document it is persisted as.
//! Defaults are applied once, while parsing; the managers only ever see
//! fully resolved values.

pub mod document;
pub mod types;

pub use document::ConfigError;
pub use types::*;
