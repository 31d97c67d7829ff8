//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in chameleon-core for the devices a node can be configured with:
//!
//! - DHT11 temperature probe (bit-banged single-wire protocol)
//! - SSD1306 128x64 monochrome OLED over I2C

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod display;
pub mod sensor;
