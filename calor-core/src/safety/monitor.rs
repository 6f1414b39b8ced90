//! Overheat monitor implementation
//!
//! Compares the averaged heater-side temperature against a threshold.
//! The condition is re-evaluated on every sample rather than latched, so
//! the heater comes back on its own once things cool down.

use crate::traits::SensorError;

/// Safety condition status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SafetyStatus {
    /// Below the threshold
    Ok,
    /// At or above the threshold
    Overheat,
    /// Sensor could not be read; treated as overheating
    SensorFault(SensorError),
}

impl SafetyStatus {
    /// Check if the heater must be held off
    pub const fn blocks_heater(&self) -> bool {
        !matches!(self, SafetyStatus::Ok)
    }
}

/// Overheat monitor
///
/// Starts out in [`SafetyStatus::Ok`]; the first sample decides.
#[derive(Debug, Clone)]
pub struct OverheatMonitor {
    /// Threshold in °C
    threshold_c: f32,
    /// Current status
    status: SafetyStatus,
}

impl OverheatMonitor {
    /// Create a new monitor with the given threshold
    pub const fn new(threshold_c: f32) -> Self {
        Self {
            threshold_c,
            status: SafetyStatus::Ok,
        }
    }

    /// Feed one averaged reading
    ///
    /// Returns the new status if it differs from the previous one.
    pub fn update(&mut self, reading: Result<f32, SensorError>) -> Option<SafetyStatus> {
        let status = match reading {
            Ok(temp) if temp.is_nan() => SafetyStatus::SensorFault(SensorError::OutOfRange),
            Ok(temp) if temp >= self.threshold_c => SafetyStatus::Overheat,
            Ok(_) => SafetyStatus::Ok,
            Err(e) => SafetyStatus::SensorFault(e),
        };

        let changed = status != self.status;
        self.status = status;
        changed.then_some(status)
    }

    /// Current status
    pub fn check(&self) -> SafetyStatus {
        self.status
    }

    /// Check if the heater must be held off
    pub fn is_overheating(&self) -> bool {
        self.status.blocks_heater()
    }
}
