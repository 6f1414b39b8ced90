//! Heater control
//!
//! The hysteresis decision and the per-tick loop that owns the device
//! state and drives every collaborator.

pub mod control_loop;
pub mod hysteresis;

pub use control_loop::{Board, BootError, BootOutcome, ControlLoop, ControlSession, MAX_EVENTS};
pub use hysteresis::decide;
