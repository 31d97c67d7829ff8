//! SSD1306 OLED display driver
//!
//! Driver for 128x64 SSD1306-based OLED displays via I2C.
//! Text is rendered with a 6x10 font (21 chars x 6 rows).

use chameleon_core::traits::{DisplayError, DisplaySurface};
use chameleon_hal::I2cBus;
use log::debug;

use super::framebuffer::{PageBuffer, PAGES, WIDTH};

/// SSD1306 I2C address (0x3D with SA0 pulled high)
pub const DEFAULT_ADDRESS: u8 = 0x3C;

/// Control byte prefixes
const CONTROL_COMMAND: u8 = 0x00;
const CONTROL_DATA: u8 = 0x40;

/// SSD1306 commands
mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const RESUME_FROM_RAM: u8 = 0xA4;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_MEMORY_MODE: u8 = 0x20;
    pub const PAGE_ADDRESSING: u8 = 0x02;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    pub const SET_PAGE_ADDR: u8 = 0xB0;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
}

const INIT_SEQUENCE: &[u8] = &[
    cmd::DISPLAY_OFF,
    cmd::SET_CLOCK_DIV,
    0x80,
    cmd::SET_MUX_RATIO,
    0x3F, // 64 lines
    cmd::SET_DISPLAY_OFFSET,
    0x00,
    cmd::SET_START_LINE,
    cmd::SET_CHARGE_PUMP,
    0x14, // Internal charge pump on
    cmd::SET_MEMORY_MODE,
    cmd::PAGE_ADDRESSING,
    cmd::SET_SEG_REMAP,
    cmd::SET_COM_SCAN_DEC,
    cmd::SET_COM_PINS,
    0x12,
    cmd::SET_CONTRAST,
    0xCF,
    cmd::SET_PRECHARGE,
    0xF1,
    cmd::SET_VCOM_DETECT,
    0x40,
    cmd::RESUME_FROM_RAM,
    cmd::SET_NORMAL,
    cmd::DISPLAY_ON,
];

/// SSD1306 OLED driver
pub struct Ssd1306<I2C> {
    i2c: I2C,
    address: u8,
    frame: PageBuffer,
    initialized: bool,
}

impl<I2C: I2cBus> Ssd1306<I2C> {
    /// Create a driver at the default address
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, DEFAULT_ADDRESS)
    }

    /// Create a driver at a specific address
    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            frame: PageBuffer::new(),
            initialized: false,
        }
    }

    /// Send the power-up sequence and blank the panel
    ///
    /// Fails with [`DisplayError::Communication`] if the panel does not
    /// acknowledge, which is how a missing display is detected.
    pub fn init(&mut self) -> Result<(), DisplayError> {
        for &c in INIT_SEQUENCE {
            self.command(c)?;
        }
        self.initialized = true;
        self.frame.mark_all_dirty();
        self.flush()?;
        debug!("SSD1306 at 0x{:02x} initialized", self.address);
        Ok(())
    }

    /// Give back the bus
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn command(&mut self, c: u8) -> Result<(), DisplayError> {
        self.i2c
            .write(self.address, &[CONTROL_COMMAND, c])
            .map_err(|_| DisplayError::Communication)
    }

    fn send_page(&mut self, page: usize) -> Result<(), DisplayError> {
        self.command(cmd::SET_PAGE_ADDR | page as u8)?;
        self.command(cmd::SET_LOW_COLUMN)?;
        self.command(cmd::SET_HIGH_COLUMN)?;

        let mut data = [0u8; WIDTH + 1];
        data[0] = CONTROL_DATA;
        data[1..].copy_from_slice(self.frame.page(page));
        self.i2c
            .write(self.address, &data)
            .map_err(|_| DisplayError::Communication)
    }

    fn ensure_initialized(&self) -> Result<(), DisplayError> {
        if self.initialized {
            Ok(())
        } else {
            Err(DisplayError::NotInitialized)
        }
    }
}

impl<I2C: I2cBus> DisplaySurface for Ssd1306<I2C> {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.ensure_initialized()?;
        self.frame.clear();
        Ok(())
    }

    fn draw_text(&mut self, text: &str) -> Result<(), DisplayError> {
        self.ensure_initialized()?;
        self.frame.write_text(text);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.ensure_initialized()?;
        let dirty = self.frame.take_dirty();

        for page in 0..PAGES {
            if dirty & (1 << page) == 0 {
                continue;
            }
            if let Err(e) = self.send_page(page) {
                // Retry the unsent pages on the next flush
                self.frame.mark_all_dirty();
                return Err(e);
            }
        }

        Ok(())
    }
}
