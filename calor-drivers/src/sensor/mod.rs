//! Temperature sensor drivers

pub mod bme280;
pub mod ntc;

pub use bme280::Bme280;
pub use ntc::{AdcReader, NtcConfig, NtcSensor};
