//! Heater output trait

/// Trait for heater output control
///
/// Implementations control the heater element via GPIO, relay, or SSR.
pub trait HeaterOutput {
    /// Turn the heater on or off
    fn set_on(&mut self, on: bool);

    /// Check if the heater is currently on
    fn is_on(&self) -> bool;
}
