//! Display manager
//!
//! Owns every display that came up successfully. A display whose bus or
//! panel does not respond is left out of the active set; the rest of the
//! node keeps running without it.

use alloc::vec::Vec;

use log::{info, warn};

use crate::config::{DisplayDriver, DisplaySpec};
use crate::traits::{DisplayExt, DisplayFactory};

/// Text rendered on each display right after it initializes
pub const BOOT_BANNER: &str = "System Loaded...";

/// Display manager
pub struct DisplayManager<F: DisplayFactory> {
    surfaces: Vec<F::Surface>,
}

impl<F: DisplayFactory> Default for DisplayManager<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: DisplayFactory> DisplayManager<F> {
    /// Create an empty manager
    pub fn new() -> Self {
        Self {
            surfaces: Vec::new(),
        }
    }

    /// Replace the active set with displays built from `specs`
    pub fn init(&mut self, specs: &[DisplaySpec], factory: &mut F) {
        self.surfaces.clear();

        let mut surfaces = Vec::with_capacity(specs.len());
        for spec in specs {
            match &spec.driver {
                DisplayDriver::Ssd1306 => match factory.ssd1306(spec.pins) {
                    Ok(mut surface) => {
                        if let Err(e) = surface.show(BOOT_BANNER) {
                            warn!("Boot banner failed on SSD1306: {}", e);
                        }
                        info!(
                            "Display added: SSD1306 (sda={}, scl={})",
                            spec.pins.sda, spec.pins.scl
                        );
                        surfaces.push(surface);
                    }
                    Err(e) => warn!(
                        "SSD1306 (sda={}, scl={}) skipped: {}",
                        spec.pins.sda, spec.pins.scl, e
                    ),
                },
                DisplayDriver::Unsupported(tag) => {
                    warn!("Unsupported display driver '{}' skipped", tag.as_str());
                }
            }
        }

        self.surfaces = surfaces;
    }

    /// Show `text` on every active display, in list order
    ///
    /// A display that fails to render is logged and skipped; the others
    /// still get the message.
    pub fn print_message(&mut self, text: &str) {
        for (index, surface) in self.surfaces.iter_mut().enumerate() {
            if let Err(e) = surface.show(text) {
                warn!("Display {} render failed: {}", index, e);
            }
        }
    }

    /// Number of displays that initialized successfully
    pub fn active_count(&self) -> usize {
        self.surfaces.len()
    }
}
