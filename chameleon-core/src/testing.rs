//! Mock hardware for unit tests

use alloc::collections::{BTreeMap, BTreeSet, VecDeque};
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use chameleon_hal::{AnalogPin, I2cPins, InputPin};

use crate::traits::{
    DisplayError, DisplayFactory, DisplaySurface, PushChannel, SensorBoard, SensorError,
    TemperatureProbe,
};

#[derive(Default)]
struct State {
    probe_values: VecDeque<Result<f32, SensorError>>,
    probe_reads: usize,
    probes_created: u32,
    adc: BTreeMap<u8, u16>,
    levels: BTreeMap<u8, bool>,
    claimed: Vec<u8>,
    live: i32,
    dead_buses: BTreeSet<u8>,
    broken_surfaces: BTreeSet<usize>,
    surfaces_created: usize,
    frames: BTreeMap<usize, Vec<String>>,
}

/// Board with scripted probes, pins and displays
#[derive(Clone, Default)]
pub struct MockBoard {
    state: Rc<RefCell<State>>,
}

impl MockBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue probe results; once drained, probes read 20.0
    pub fn push_probe_values(&self, values: &[Result<f32, SensorError>]) {
        self.state.borrow_mut().probe_values.extend(values.iter().copied());
    }

    pub fn set_adc(&self, pin: u8, value: u16) {
        self.state.borrow_mut().adc.insert(pin, value);
    }

    pub fn set_level(&self, pin: u8, high: bool) {
        self.state.borrow_mut().levels.insert(pin, high);
    }

    /// Make display bring-up fail on the bus with this SDA pin
    pub fn kill_bus(&self, sda: u8) {
        self.state.borrow_mut().dead_buses.insert(sda);
    }

    /// Make the n-th created surface fail every render
    pub fn break_surface(&self, index: usize) {
        self.state.borrow_mut().broken_surfaces.insert(index);
    }

    pub fn probe_reads(&self) -> usize {
        self.state.borrow().probe_reads
    }

    pub fn probes_created(&self) -> u32 {
        self.state.borrow().probes_created
    }

    pub fn claimed_pins(&self) -> Vec<u8> {
        self.state.borrow().claimed.clone()
    }

    /// Probe, pin and surface handles currently alive
    pub fn live_handles(&self) -> i32 {
        self.state.borrow().live
    }

    /// Frames flushed by the n-th created surface
    pub fn frames(&self, index: usize) -> Vec<String> {
        self.state
            .borrow()
            .frames
            .get(&index)
            .cloned()
            .unwrap_or_default()
    }
}

pub struct MockProbe {
    state: Rc<RefCell<State>>,
}

impl TemperatureProbe for MockProbe {
    fn read_celsius(&mut self) -> Result<f32, SensorError> {
        let mut state = self.state.borrow_mut();
        state.probe_reads += 1;
        state.probe_values.pop_front().unwrap_or(Ok(20.0))
    }
}

impl Drop for MockProbe {
    fn drop(&mut self) {
        self.state.borrow_mut().live -= 1;
    }
}

pub struct MockPin {
    state: Rc<RefCell<State>>,
    pin: u8,
}

impl InputPin for MockPin {
    fn is_high(&self) -> bool {
        self.state.borrow().levels.get(&self.pin).copied().unwrap_or(false)
    }
}

impl AnalogPin for MockPin {
    fn read_raw(&mut self) -> u16 {
        self.state.borrow().adc.get(&self.pin).copied().unwrap_or(0)
    }
}

impl Drop for MockPin {
    fn drop(&mut self) {
        self.state.borrow_mut().live -= 1;
    }
}

impl SensorBoard for MockBoard {
    type Probe = MockProbe;
    type Pin = MockPin;

    fn temperature_probe(&mut self, _pin: u8) -> MockProbe {
        let mut state = self.state.borrow_mut();
        state.probes_created += 1;
        state.live += 1;
        MockProbe {
            state: self.state.clone(),
        }
    }

    fn input_pin(&mut self, pin: u8) -> MockPin {
        let mut state = self.state.borrow_mut();
        state.claimed.push(pin);
        state.live += 1;
        MockPin {
            state: self.state.clone(),
            pin,
        }
    }
}

pub struct MockSurface {
    state: Rc<RefCell<State>>,
    index: usize,
    buffer: String,
}

impl MockSurface {
    fn check(&self) -> Result<(), DisplayError> {
        if self.state.borrow().broken_surfaces.contains(&self.index) {
            Err(DisplayError::Communication)
        } else {
            Ok(())
        }
    }
}

impl DisplaySurface for MockSurface {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.check()?;
        self.buffer.clear();
        Ok(())
    }

    fn draw_text(&mut self, text: &str) -> Result<(), DisplayError> {
        self.check()?;
        self.buffer.push_str(text);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.check()?;
        self.state
            .borrow_mut()
            .frames
            .entry(self.index)
            .or_default()
            .push(self.buffer.clone());
        Ok(())
    }
}

impl Drop for MockSurface {
    fn drop(&mut self) {
        self.state.borrow_mut().live -= 1;
    }
}

impl DisplayFactory for MockBoard {
    type Surface = MockSurface;

    fn ssd1306(&mut self, pins: I2cPins) -> Result<MockSurface, DisplayError> {
        let mut state = self.state.borrow_mut();
        if state.dead_buses.contains(&pins.sda) {
            return Err(DisplayError::Communication);
        }
        let index = state.surfaces_created;
        state.surfaces_created += 1;
        state.live += 1;
        Ok(MockSurface {
            state: self.state.clone(),
            index,
            buffer: String::new(),
        })
    }
}

/// Push channel recording every broadcast
#[derive(Default)]
pub struct MockChannel {
    pub clients: usize,
    pub sent: Vec<String>,
}

impl MockChannel {
    pub fn with_clients(clients: usize) -> Self {
        Self {
            clients,
            sent: Vec::new(),
        }
    }
}

impl PushChannel for MockChannel {
    fn broadcast(&mut self, text: &str) {
        self.sent.push(String::from(text));
    }

    fn client_count(&self) -> usize {
        self.clients
    }
}
