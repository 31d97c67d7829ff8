//! Display surface traits

use chameleon_hal::I2cPins;

/// Errors that can occur with a display surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Display did not acknowledge on the bus
    Communication,
    /// Surface used before its init sequence succeeded
    NotInitialized,
}

impl core::fmt::Display for DisplayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DisplayError::Communication => f.write_str("display did not respond"),
            DisplayError::NotInitialized => f.write_str("display not initialized"),
        }
    }
}

/// Trait for a text-capable rendering surface
///
/// Drawing happens into a local buffer; nothing reaches the panel until
/// [`DisplaySurface::flush`].
pub trait DisplaySurface {
    /// Clear the frame buffer
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Draw text starting at the top-left corner
    ///
    /// Lines wrap at the surface width; `\n` starts a new line.
    fn draw_text(&mut self, text: &str) -> Result<(), DisplayError>;

    /// Push the frame buffer to the panel
    fn flush(&mut self) -> Result<(), DisplayError>;
}

/// Helper trait for whole-screen messages
pub trait DisplayExt: DisplaySurface {
    /// Clear, draw `text` at the origin and flush
    fn show(&mut self, text: &str) -> Result<(), DisplayError> {
        self.clear()?;
        self.draw_text(text)?;
        self.flush()
    }
}

// Blanket implementation for all DisplaySurface types
impl<T: DisplaySurface> DisplayExt for T {}

/// Board-side factory for display surfaces
pub trait DisplayFactory {
    /// Surface type produced by this board
    type Surface: DisplaySurface;

    /// Bring up an I2C bus on `pins` and initialize an SSD1306 on it
    ///
    /// Returns an error when the panel does not respond; the caller skips
    /// the display in that case.
    fn ssd1306(&mut self, pins: I2cPins) -> Result<Self::Surface, DisplayError>;
}
