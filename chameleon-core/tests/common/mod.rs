//! Shared mock hardware for integration scenarios

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use chameleon_core::traits::{
    DisplayError, DisplayFactory, DisplaySurface, PushChannel, SensorBoard, SensorError,
    TemperatureProbe,
};
use chameleon_hal::{AnalogPin, I2cPins, InputPin};

#[derive(Default)]
pub struct Bench {
    /// Temperature each probe pin reports; absent pins report NaN
    pub temperatures: HashMap<u8, f32>,
    pub levels: HashMap<u8, bool>,
    pub adc: HashMap<u8, u16>,
    /// Handles currently owned by the core
    pub live: i64,
    /// Text last flushed per surface, in creation order
    pub screens: Vec<String>,
}

/// Board whose hardware state is shared with the test body
#[derive(Clone, Default)]
pub struct Rig {
    pub bench: Rc<RefCell<Bench>>,
}

impl Rig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_temperature(&self, pin: u8, celsius: f32) {
        self.bench.borrow_mut().temperatures.insert(pin, celsius);
    }

    pub fn set_level(&self, pin: u8, high: bool) {
        self.bench.borrow_mut().levels.insert(pin, high);
    }

    pub fn live(&self) -> i64 {
        self.bench.borrow().live
    }

    pub fn screen(&self, index: usize) -> Option<String> {
        self.bench.borrow().screens.get(index).cloned()
    }
}

pub struct Handle {
    bench: Rc<RefCell<Bench>>,
    pin: u8,
}

impl Handle {
    fn claim(bench: &Rc<RefCell<Bench>>, pin: u8) -> Self {
        bench.borrow_mut().live += 1;
        Self {
            bench: Rc::clone(bench),
            pin,
        }
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        self.bench.borrow_mut().live -= 1;
    }
}

impl TemperatureProbe for Handle {
    fn read_celsius(&mut self) -> Result<f32, SensorError> {
        Ok(self
            .bench
            .borrow()
            .temperatures
            .get(&self.pin)
            .copied()
            .unwrap_or(f32::NAN))
    }
}

impl InputPin for Handle {
    fn is_high(&self) -> bool {
        self.bench.borrow().levels.get(&self.pin).copied().unwrap_or(false)
    }
}

impl AnalogPin for Handle {
    fn read_raw(&mut self) -> u16 {
        self.bench.borrow().adc.get(&self.pin).copied().unwrap_or(0)
    }
}

impl SensorBoard for Rig {
    type Probe = Handle;
    type Pin = Handle;

    fn temperature_probe(&mut self, pin: u8) -> Handle {
        Handle::claim(&self.bench, pin)
    }

    fn input_pin(&mut self, pin: u8) -> Handle {
        Handle::claim(&self.bench, pin)
    }
}

pub struct Screen {
    handle: Handle,
    index: usize,
    text: String,
}

impl DisplaySurface for Screen {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.text.clear();
        Ok(())
    }

    fn draw_text(&mut self, text: &str) -> Result<(), DisplayError> {
        self.text.push_str(text);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.handle.bench.borrow_mut().screens[self.index] = self.text.clone();
        Ok(())
    }
}

impl DisplayFactory for Rig {
    type Surface = Screen;

    fn ssd1306(&mut self, pins: I2cPins) -> Result<Screen, DisplayError> {
        let index = {
            let mut bench = self.bench.borrow_mut();
            bench.screens.push(String::new());
            bench.screens.len() - 1
        };
        Ok(Screen {
            handle: Handle::claim(&self.bench, pins.sda),
            index,
            text: String::new(),
        })
    }
}

/// Push channel collecting frames
#[derive(Default)]
pub struct Clients {
    pub connected: usize,
    pub frames: Vec<String>,
}

impl PushChannel for Clients {
    fn broadcast(&mut self, text: &str) {
        self.frames.push(text.to_owned());
    }

    fn client_count(&self) -> usize {
        self.connected
    }
}
