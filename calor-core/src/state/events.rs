//! Controller events
//!
//! The control loop does not log. Each tick reports what happened as a
//! list of events and the firmware decides what to do with them.

use super::screen::{Screen, Setting};
use crate::config::SettingsError;
use crate::traits::{DisplayError, SensorError};

/// Something worth reporting that happened during boot or a tick
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// New ambient temperature sample (°C)
    TemperatureSampled(f32),
    /// Ambient sensor read failed, previous sample kept
    TemperatureReadFailed(SensorError),
    /// Encoder edit changed a setting
    SettingChanged(Setting),
    /// Click moved to another screen
    ScreenChanged(Screen),
    /// Settings written to storage
    SettingsSaved,
    /// Settings write failed; will retry after another delay
    SaveFailed(SettingsError),
    /// Heater-side temperature reached the threshold
    OverheatDetected,
    /// Overheat sensor read failed, treated as overheating
    OverheatReadFailed(SensorError),
    /// Heater-side temperature back under the threshold
    OverheatCleared,
    /// Physical heater output changed
    HeaterSwitched(bool),
    /// Display refresh failed
    DisplayFailed(DisplayError),
}

impl Event {
    /// Check if this event indicates a fault
    pub fn is_fault(&self) -> bool {
        matches!(
            self,
            Event::TemperatureReadFailed(_)
                | Event::SaveFailed(_)
                | Event::OverheatDetected
                | Event::OverheatReadFailed(_)
                | Event::DisplayFailed(_)
        )
    }
}
