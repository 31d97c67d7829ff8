//! Hardware abstraction traits
//!
//! These traits define the interface between the device managers and the
//! board-specific layer that owns the actual peripherals.

pub mod channel;
pub mod display;
pub mod sensor;

pub use channel::PushChannel;
pub use display::{DisplayError, DisplayExt, DisplayFactory, DisplaySurface};
pub use sensor::{SensorBoard, SensorError, TemperatureProbe};

/// Everything a board must provide to host the node core
pub trait Board: SensorBoard + DisplayFactory {}

// Blanket implementation for all boards providing both halves
impl<T: SensorBoard + DisplayFactory> Board for T {}
