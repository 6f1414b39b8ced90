//! Safety monitoring
//!
//! Detects heater-side overheating and cuts the heater output.

pub mod monitor;

pub use monitor::{OverheatMonitor, SafetyStatus};
