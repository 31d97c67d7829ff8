//! Simulated board
//!
//! Every device runs its real driver against emulated hardware. The DHT11
//! driver bit-bangs a simulated data line that answers with a synthetic
//! temperature, and displays are [`Ssd1306`] drivers talking to an emulated
//! panel. The shared virtual clock drives the synthetic waveforms.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use chameleon_core::traits::{DisplayError, DisplayFactory, SensorBoard};
use chameleon_drivers::display::framebuffer::{HEIGHT, PAGES, WIDTH};
use chameleon_drivers::display::Ssd1306;
use chameleon_drivers::sensor::Dht11;
use chameleon_hal::{AnalogPin, I2cBus, I2cPins, InputPin, OutputPin};
use embedded_hal::delay::DelayNs;
use log::debug;

/// Virtual millisecond clock shared by every simulated device
pub type Clock = Rc<Cell<u32>>;

/// Microsecond clock advanced by the DHT11 driver's busy waits
type Micros = Rc<Cell<u64>>;

/// Every n-th DHT11 transaction goes unanswered, as a real sensor
/// occasionally does
const PROBE_FAILURE_EVERY: u32 = 7;

/// Relative humidity reported by every simulated DHT11
const HUMIDITY: u8 = 45;

/// Emulated SSD1306 display RAM
pub struct Panel {
    pub pins: I2cPins,
    ram: [[u8; WIDTH]; PAGES],
    page: usize,
}

impl Panel {
    fn new(pins: I2cPins) -> Self {
        Self {
            pins,
            ram: [[0; WIDTH]; PAGES],
            page: 0,
        }
    }

    fn command(&mut self, c: u8) {
        if c & 0xF8 == 0xB0 {
            self.page = usize::from(c & 0x07);
        }
    }

    fn data(&mut self, bytes: &[u8]) {
        let n = bytes.len().min(WIDTH);
        self.ram[self.page][..n].copy_from_slice(&bytes[..n]);
    }

    fn pixel(&self, x: usize, y: usize) -> bool {
        self.ram[y / 8][x] & (1 << (y % 8)) != 0
    }

    /// Render the panel as text, one character per 2x2 pixel block
    pub fn to_ascii(&self) -> String {
        let mut out = String::new();
        for y in (0..HEIGHT).step_by(2) {
            for x in (0..WIDTH).step_by(2) {
                let lit = self.pixel(x, y)
                    || self.pixel(x + 1, y)
                    || self.pixel(x, y + 1)
                    || self.pixel(x + 1, y + 1);
                out.push(if lit { '#' } else { ' ' });
            }
            out.push('\n');
        }
        out
    }
}

/// I2C bus to an emulated panel, or to nothing
pub struct SimBus {
    panel: Option<Rc<RefCell<Panel>>>,
}

impl I2cBus for SimBus {
    type Error = ();

    fn write(&mut self, _address: u8, data: &[u8]) -> Result<(), ()> {
        let panel = self.panel.as_ref().ok_or(())?;
        let mut panel = panel.borrow_mut();
        match data.split_first() {
            Some((&0x00, rest)) => rest.iter().for_each(|c| panel.command(*c)),
            Some((&0x40, rest)) => panel.data(rest),
            _ => return Err(()),
        }
        Ok(())
    }

    fn read(&mut self, _address: u8, _buf: &mut [u8]) -> Result<(), ()> {
        Err(())
    }
}

/// Busy-wait delay that advances the microsecond clock
pub struct SimDelay(Micros);

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.set(self.0.get() + u64::from(ns.div_ceil(1000)));
    }
}

/// DHT11 data line
///
/// When the host releases the line after its start pulse, the sensor
/// answers with a frame encoding the current synthetic temperature.
pub struct SimLine {
    clock: Clock,
    micros: Micros,
    pin: u8,
    driven_low: bool,
    /// Release time and frame of the transaction in flight
    answer: Option<(u64, [u8; 5])>,
    transactions: u32,
}

impl SimLine {
    fn celsius(&self) -> f64 {
        let t = f64::from(self.clock.get()) / 1000.0;
        22.0 + 3.0 * (t / 20.0 + f64::from(self.pin)).sin()
    }

    fn frame(&self) -> [u8; 5] {
        let tenths = (self.celsius() * 10.0).round() as u16;
        let whole = (tenths / 10) as u8;
        let decimal = (tenths % 10) as u8;
        let sum = HUMIDITY.wrapping_add(whole).wrapping_add(decimal);
        [HUMIDITY, 0, whole, decimal, sum]
    }

    fn level_after(frame: &[u8; 5], mut elapsed: u64) -> bool {
        let bits = (0..40).flat_map(|bit| {
            let one = frame[bit / 8] & (0x80 >> (bit % 8)) != 0;
            [(false, 50), (true, if one { 70 } else { 27 })]
        });
        let segments = [(true, 30), (false, 80), (true, 80)]
            .into_iter()
            .chain(bits)
            .chain([(false, 50)]);
        for (level, duration) in segments {
            if elapsed < duration {
                return level;
            }
            elapsed -= duration;
        }
        true
    }
}

impl OutputPin for SimLine {
    fn set_high(&mut self) {
        if !self.driven_low {
            return;
        }
        self.driven_low = false;
        self.transactions += 1;
        self.answer = if self.transactions % PROBE_FAILURE_EVERY == 0 {
            None
        } else {
            Some((self.micros.get(), self.frame()))
        };
    }

    fn set_low(&mut self) {
        self.driven_low = true;
        self.answer = None;
    }

    fn is_set_high(&self) -> bool {
        !self.driven_low
    }
}

impl InputPin for SimLine {
    fn is_high(&self) -> bool {
        if self.driven_low {
            return false;
        }
        match &self.answer {
            Some((start, frame)) => {
                Self::level_after(frame, self.micros.get().saturating_sub(*start))
            }
            None => true,
        }
    }
}

/// Synthetic input pin
pub struct SimPin {
    clock: Clock,
    pin: u8,
}

impl InputPin for SimPin {
    fn is_high(&self) -> bool {
        (self.clock.get() / 3000 + u32::from(self.pin)) % 2 == 1
    }
}

impl AnalogPin for SimPin {
    fn read_raw(&mut self) -> u16 {
        let t = f64::from(self.clock.get()) / 1000.0;
        let level = 0.5 + 0.45 * (t / 10.0 + f64::from(self.pin)).sin();
        (level * 4095.0) as u16
    }
}

/// Simulated board
pub struct SimBoard {
    clock: Clock,
    /// SDA pins with a panel attached
    wired_displays: Vec<u8>,
    /// Panels of the surfaces brought up; a panel goes away with its driver
    panels: Vec<Weak<RefCell<Panel>>>,
}

impl SimBoard {
    pub fn new(clock: Clock, wired_displays: &[u8]) -> Self {
        Self {
            clock,
            wired_displays: wired_displays.to_vec(),
            panels: Vec::new(),
        }
    }

    /// Panels whose driver is still alive, oldest first
    pub fn panels(&mut self) -> Vec<Rc<RefCell<Panel>>> {
        self.panels.retain(|p| p.strong_count() > 0);
        self.panels.iter().filter_map(Weak::upgrade).collect()
    }
}

impl SensorBoard for SimBoard {
    type Probe = Dht11<SimLine, SimDelay>;
    type Pin = SimPin;

    fn temperature_probe(&mut self, pin: u8) -> Self::Probe {
        debug!("DHT11 on GPIO{}", pin);
        let micros = Micros::default();
        let line = SimLine {
            clock: self.clock.clone(),
            micros: micros.clone(),
            pin,
            driven_low: false,
            answer: None,
            transactions: 0,
        };
        Dht11::new(line, SimDelay(micros))
    }

    fn input_pin(&mut self, pin: u8) -> SimPin {
        debug!("GPIO{} configured as input", pin);
        SimPin {
            clock: self.clock.clone(),
            pin,
        }
    }
}

impl DisplayFactory for SimBoard {
    type Surface = Ssd1306<SimBus>;

    fn ssd1306(&mut self, pins: I2cPins) -> Result<Ssd1306<SimBus>, DisplayError> {
        let panel = self
            .wired_displays
            .contains(&pins.sda)
            .then(|| Rc::new(RefCell::new(Panel::new(pins))));

        let mut display = Ssd1306::new(SimBus {
            panel: panel.clone(),
        });
        display.init()?;

        if let Some(panel) = panel {
            self.panels.push(Rc::downgrade(&panel));
        }
        Ok(display)
    }
}
