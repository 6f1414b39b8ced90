//! Compiled-in controller configuration
//!
//! `build.rs` validates `thermostat.toml` and turns it into [`CONFIG`].

use calor_core::config::{Bounds, ControllerConfig, Limits, OverheatConfig};
use calor_core::state::{DeviceState, Screen};

include!(concat!(env!("OUT_DIR"), "/thermostat_config.rs"));
