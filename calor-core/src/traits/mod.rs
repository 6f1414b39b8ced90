//! Hardware abstraction traits
//!
//! These traits define the interface between the control logic
//! and hardware-specific implementations.

pub mod display;
pub mod heater;
pub mod input;
pub mod sensor;

pub use display::{DisplayError, DisplaySink};
pub use heater::HeaterOutput;
pub use input::EncoderInput;
pub use sensor::{NoOverheatSensor, OverheatSensor, SensorError, TemperatureSensor};
