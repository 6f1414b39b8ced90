//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in calor-core for the controller's hardware, written against the
//! `embedded-hal` 1.0 traits so any HAL can supply the pins and buses:
//!
//! - Heater output (GPIO, SSR or MOSFET)
//! - Temperature sensors (BME280 ambient, NTC overheat)
//! - Four-digit seven-segment display (TM1637)
//! - Rotary encoder with push button

#![no_std]
#![deny(unsafe_code)]

pub mod display;
pub mod heater;
pub mod input;
pub mod sensor;
