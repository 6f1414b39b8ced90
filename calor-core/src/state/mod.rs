//! Device state and the screen cycle
//!
//! The screen cycle is explicit, finite, and deterministic. All edits
//! go through [`DeviceState`], which keeps every setting within its limits.

pub mod device;
pub mod events;
pub mod screen;

pub use device::DeviceState;
pub use events::Event;
pub use screen::{Screen, Setting};
