//! Elapsed-time scheduling
//!
//! Timers advanced explicitly by the control loop, and the debounced save
//! scheduler built on top of a one-shot timer.

pub mod persistence;
pub mod timer;

pub use persistence::PersistenceScheduler;
pub use timer::{Timer, TimerMode};
