//! Page-organized monochrome framebuffer
//!
//! Matches the SSD1306/SH1106 memory layout: 8 pages of 128 columns, each
//! byte holding 8 vertical pixels (LSB on top). Pages touched since the
//! last flush are tracked so only those are sent over the bus.

use core::convert::Infallible;

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

/// Panel width in pixels
pub const WIDTH: usize = 128;

/// Panel height in pixels
pub const HEIGHT: usize = 64;

/// Number of 8-pixel pages
pub const PAGES: usize = HEIGHT / 8;

/// Characters per text row with the 6x10 font
pub const COLUMNS: usize = WIDTH / 6;

/// Text rows with the 6x10 font
pub const ROWS: usize = HEIGHT / 10;

const LINE_HEIGHT: i32 = 10;

/// 128x64 1bpp framebuffer
pub struct PageBuffer {
    pages: [[u8; WIDTH]; PAGES],
    dirty: u8,
}

impl Default for PageBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl PageBuffer {
    /// Create a blank buffer with every page marked dirty
    ///
    /// The first flush therefore overwrites whatever the panel RAM held
    /// at power-up.
    pub const fn new() -> Self {
        Self {
            pages: [[0; WIDTH]; PAGES],
            dirty: 0xFF,
        }
    }

    /// Set every pixel off
    pub fn clear(&mut self) {
        for (index, page) in self.pages.iter_mut().enumerate() {
            if page.iter().any(|b| *b != 0) {
                page.fill(0);
                self.dirty |= 1 << index;
            }
        }
    }

    /// Render text from the top-left corner
    ///
    /// Wraps at [`COLUMNS`] characters and on `\n`; rows past the bottom
    /// edge are dropped. Non-ASCII characters render as `?`.
    pub fn write_text(&mut self, text: &str) {
        let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        let mut row = 0;

        for line in text.split('\n') {
            let mut chunk: heapless::String<COLUMNS> = heapless::String::new();
            for ch in line.chars() {
                let ch = if ch.is_ascii() { ch } else { '?' };
                if chunk.push(ch).is_err() {
                    self.draw_row(row, &chunk, style);
                    row += 1;
                    chunk.clear();
                    // Cannot fail: the chunk was just emptied
                    let _ = chunk.push(ch);
                }
            }
            self.draw_row(row, &chunk, style);
            row += 1;

            if row >= ROWS {
                break;
            }
        }
    }

    fn draw_row(&mut self, row: usize, text: &str, style: MonoTextStyle<'_, BinaryColor>) {
        if row >= ROWS || text.is_empty() {
            return;
        }
        let origin = Point::new(0, row as i32 * LINE_HEIGHT);
        // Drawing into RAM is infallible
        let _ = Text::with_baseline(text, origin, style, Baseline::Top).draw(self);
    }

    /// Check a single pixel
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < WIDTH && y < HEIGHT && self.pages[y / 8][x] & (1 << (y % 8)) != 0
    }

    /// Raw bytes of one page
    pub fn page(&self, index: usize) -> &[u8; WIDTH] {
        &self.pages[index]
    }

    /// Take the set of pages changed since the last call, as a bitmask
    pub fn take_dirty(&mut self) -> u8 {
        core::mem::take(&mut self.dirty)
    }

    /// Mark every page for the next flush
    pub fn mark_all_dirty(&mut self) {
        self.dirty = 0xFF;
    }

    fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        let page = y / 8;
        let mask = 1 << (y % 8);
        let byte = &mut self.pages[page][x];
        let updated = if on { *byte | mask } else { *byte & !mask };
        if updated != *byte {
            *byte = updated;
            self.dirty |= 1 << page;
        }
    }
}

impl OriginDimensions for PageBuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for PageBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            let (Ok(x), Ok(y)) = (usize::try_from(coord.x), usize::try_from(coord.y)) else {
                continue;
            };
            if x < WIDTH && y < HEIGHT {
                self.set_pixel(x, y, color.is_on());
            }
        }
        Ok(())
    }
}
