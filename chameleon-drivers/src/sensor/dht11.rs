//! DHT11 temperature/humidity sensor
//!
//! Single-wire protocol on an open-drain line with a pull-up:
//!
//! ```text
//! host:   ‾‾‾\______ 18ms ______/‾‾ 40us ‾‾
//! sensor:                              \__ 80us __/‾‾ 80us ‾‾\  then 40 bits
//! bit:    \__ 50us __/‾‾ 26-28us ‾‾\   = 0
//!         \__ 50us __/‾‾‾‾‾‾ 70us ‾‾‾‾‾‾\   = 1
//! ```
//!
//! The frame is humidity (int, dec), temperature (int, dec), checksum.
//! Bit timing is measured by polling in 1 us steps, so reads must not be
//! interrupted for the ~5 ms a frame takes. The sensor needs at least one
//! second between reads.

use chameleon_core::traits::{SensorError, TemperatureProbe};
use chameleon_hal::IoPin;
use embedded_hal::delay::DelayNs;
use log::debug;

/// Host start pulse length
const START_LOW_MS: u32 = 18;

/// Time the host releases the line before listening
const RELEASE_US: u32 = 40;

/// Longest any single level may last before the read is abandoned
const LEVEL_TIMEOUT_US: u32 = 100;

/// High pulses longer than this are a 1 bit
const BIT_THRESHOLD_US: u32 = 40;

/// One decoded frame
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Dht11Reading {
    /// Relative humidity in percent
    pub humidity: f32,
    /// Temperature in degrees Celsius
    pub temperature_c: f32,
}

/// DHT11 driver
pub struct Dht11<P, D> {
    pin: P,
    delay: D,
}

impl<P: IoPin, D: DelayNs> Dht11<P, D> {
    /// Create a driver, releasing the line to its idle (high) state
    pub fn new(mut pin: P, delay: D) -> Self {
        pin.set_high();
        Self { pin, delay }
    }

    /// Give back the pin and delay
    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }

    /// Perform one transaction and decode it
    pub fn read(&mut self) -> Result<Dht11Reading, SensorError> {
        let frame = self.read_frame()?;
        Ok(decode(&frame))
    }

    /// Perform one transaction, returning the raw verified frame
    pub fn read_frame(&mut self) -> Result<[u8; 4], SensorError> {
        let result = self.transfer();
        // Leave the line idle whatever happened
        self.pin.set_high();

        let raw = result?;
        let sum = raw[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
        if sum != raw[4] {
            debug!("DHT11 checksum mismatch: {} != {}", sum, raw[4]);
            return Err(SensorError::Checksum);
        }
        Ok([raw[0], raw[1], raw[2], raw[3]])
    }

    fn transfer(&mut self) -> Result<[u8; 5], SensorError> {
        self.pin.set_low();
        self.delay.delay_ms(START_LOW_MS);
        self.pin.set_high();
        self.delay.delay_us(RELEASE_US);

        // Response: sensor pulls low 80us, then high 80us
        self.wait_while(true)?;
        self.wait_while(false)?;
        self.wait_while(true)?;

        let mut raw = [0u8; 5];
        for bit in 0..40 {
            self.wait_while(false)?;
            let high_us = self.wait_while(true)?;
            if high_us > BIT_THRESHOLD_US {
                raw[bit / 8] |= 0x80 >> (bit % 8);
            }
        }
        Ok(raw)
    }

    /// Wait for the line to leave `high`, returning how long that took
    fn wait_while(&mut self, high: bool) -> Result<u32, SensorError> {
        let mut elapsed = 0;
        while self.pin.is_high() == high {
            if elapsed >= LEVEL_TIMEOUT_US {
                return Err(SensorError::Timeout);
            }
            self.delay.delay_us(1);
            elapsed += 1;
        }
        Ok(elapsed)
    }
}

impl<P: IoPin, D: DelayNs> TemperatureProbe for Dht11<P, D> {
    fn read_celsius(&mut self) -> Result<f32, SensorError> {
        self.read().map(|r| r.temperature_c)
    }
}

/// Decode a verified frame
///
/// Bit 7 of the temperature decimal byte marks a negative reading.
fn decode(frame: &[u8; 4]) -> Dht11Reading {
    let humidity = f32::from(frame[0]) + f32::from(frame[1]) * 0.1;
    let magnitude = f32::from(frame[2]) + f32::from(frame[3] & 0x0F) * 0.1;
    let temperature_c = if frame[3] & 0x80 != 0 {
        -magnitude
    } else {
        magnitude
    };
    Dht11Reading {
        humidity,
        temperature_c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chameleon_hal::{InputPin, OutputPin};
    use std::cell::Cell;
    use std::rc::Rc;
    use std::vec;
    use std::vec::Vec;

    /// Simulated sensor answering once the host releases the line
    struct Line {
        clock: Rc<Cell<u64>>,
        driven_low: bool,
        released_at: Option<u64>,
        /// (level, duration_us) after release; idle high afterwards
        waveform: Vec<(bool, u64)>,
    }

    impl Line {
        fn level_at(&self, now: u64) -> bool {
            let Some(start) = self.released_at else {
                return true;
            };
            let mut t = start;
            for &(level, duration) in &self.waveform {
                if now < t + duration {
                    return level;
                }
                t += duration;
            }
            true
        }
    }

    impl OutputPin for Line {
        fn set_high(&mut self) {
            if self.driven_low {
                self.driven_low = false;
                self.released_at = Some(self.clock.get());
            }
        }

        fn set_low(&mut self) {
            self.driven_low = true;
            self.released_at = None;
        }

        fn is_set_high(&self) -> bool {
            !self.driven_low
        }
    }

    impl InputPin for Line {
        fn is_high(&self) -> bool {
            !self.driven_low && self.level_at(self.clock.get())
        }
    }

    struct Clock(Rc<Cell<u64>>);

    impl DelayNs for Clock {
        fn delay_ns(&mut self, ns: u32) {
            self.0.set(self.0.get() + u64::from(ns.div_ceil(1000)));
        }
    }

    fn waveform_for(bytes: [u8; 5]) -> Vec<(bool, u64)> {
        let mut wave = vec![(true, 30), (false, 80), (true, 80)];
        for byte in bytes {
            for bit in (0..8).rev() {
                let one = byte & (1 << bit) != 0;
                wave.push((false, 50));
                wave.push((true, if one { 70 } else { 27 }));
            }
        }
        wave.push((false, 50));
        wave
    }

    fn sensor(waveform: Vec<(bool, u64)>) -> Dht11<Line, Clock> {
        let clock = Rc::new(Cell::new(0));
        let line = Line {
            clock: clock.clone(),
            driven_low: false,
            released_at: None,
            waveform,
        };
        Dht11::new(line, Clock(clock))
    }

    fn frame(hum: u8, hum_dec: u8, temp: u8, temp_dec: u8) -> [u8; 5] {
        let sum = hum
            .wrapping_add(hum_dec)
            .wrapping_add(temp)
            .wrapping_add(temp_dec);
        [hum, hum_dec, temp, temp_dec, sum]
    }

    #[test]
    fn test_decodes_frame() {
        let mut dht = sensor(waveform_for(frame(45, 0, 23, 4)));
        let reading = dht.read().unwrap();
        assert!((reading.temperature_c - 23.4).abs() < 0.01);
        assert!((reading.humidity - 45.0).abs() < 0.01);
    }

    #[test]
    fn test_negative_temperature() {
        let mut dht = sensor(waveform_for(frame(80, 0, 5, 0x82)));
        let celsius = dht.read_celsius().unwrap();
        assert!((celsius + 5.2).abs() < 0.01);
    }

    #[test]
    fn test_checksum_mismatch() {
        let mut bytes = frame(45, 0, 23, 0);
        bytes[4] ^= 0x01;
        let mut dht = sensor(waveform_for(bytes));
        assert_eq!(dht.read(), Err(SensorError::Checksum));
    }

    #[test]
    fn test_no_response_times_out() {
        let mut dht = sensor(Vec::new());
        assert_eq!(dht.read_celsius(), Err(SensorError::Timeout));
        // Line is released after a failed transaction
        let (line, _) = dht.release();
        assert!(line.is_set_high());
    }

    #[test]
    fn test_truncated_frame_times_out() {
        let mut wave = waveform_for(frame(45, 0, 23, 0));
        wave.truncate(40);
        // Stuck low after the partial frame
        wave.push((false, 10_000));
        let mut dht = sensor(wave);
        assert_eq!(dht.read(), Err(SensorError::Timeout));
    }
}
