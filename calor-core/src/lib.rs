//! Board-agnostic core logic for the heater controller
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (sensors, heater, encoder, display)
//! - Persisted device settings and their storage record
//! - Screen cycle and encoder value editing
//! - Hysteresis decision
//! - Elapsed-time timers and the debounced save scheduler
//! - Overheat monitoring
//! - The per-tick control loop tying it all together

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod control;
pub mod safety;
pub mod scheduler;
pub mod state;
pub mod traits;
pub mod ui;

pub use control::{Board, BootError, BootOutcome, ControlLoop, ControlSession};
pub use state::{DeviceState, Event, Screen, Setting};
