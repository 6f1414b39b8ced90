//! Configuration type definitions
//!
//! [`ControllerConfig`] is fixed at startup. The firmware builds it from
//! `thermostat.toml` at compile time; tests use [`ControllerConfig::default`].

use crate::state::DeviceState;

/// Ambient temperature sample period (ms)
pub const DEFAULT_TEMP_SAMPLE_PERIOD_MS: u32 = 100;

/// Overheat sensor sample period (ms)
pub const DEFAULT_OVERHEAT_SAMPLE_PERIOD_MS: u32 = 100;

/// Quiet time after the last edit before settings are written (ms)
pub const DEFAULT_SAVE_DELAY_MS: u32 = 5000;

/// Heater-side temperature that counts as overheating (°C)
pub const DEFAULT_OVERHEAT_THRESHOLD_C: f32 = 65.0;

pub const MIN_SET_TEMP: f32 = 12.0;
pub const DEFAULT_SET_TEMP: f32 = 25.0;
pub const MAX_SET_TEMP: f32 = 55.0;

pub const MIN_HYSTER_DIA: f32 = 0.0;
pub const DEFAULT_HYSTER_DIA: f32 = 0.2;
pub const MAX_HYSTER_DIA: f32 = 5.0;

pub const MIN_DISP_BRIGHTNESS: u8 = 0;
pub const DEFAULT_DISP_BRIGHTNESS: u8 = 5;
pub const MAX_DISP_BRIGHTNESS: u8 = 7;

/// Inclusive value range
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> Bounds<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// Check whether `value` lies inside the range
    pub fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Limits for every editable setting
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Limits {
    pub set_temp: Bounds<f32>,
    pub hyster_dia: Bounds<f32>,
    pub brightness: Bounds<u8>,
}

impl Limits {
    pub const DEFAULT: Limits = Limits {
        set_temp: Bounds::new(MIN_SET_TEMP, MAX_SET_TEMP),
        hyster_dia: Bounds::new(MIN_HYSTER_DIA, MAX_HYSTER_DIA),
        brightness: Bounds::new(MIN_DISP_BRIGHTNESS, MAX_DISP_BRIGHTNESS),
    };
}

impl Default for Limits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Overheat sensing configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OverheatConfig {
    /// Whether the board has an overheat sensor fitted
    pub enabled: bool,
    /// Averaged heater-side temperature at or above which the heater is cut (°C)
    pub threshold_c: f32,
}

impl Default for OverheatConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            threshold_c: DEFAULT_OVERHEAT_THRESHOLD_C,
        }
    }
}

/// Controller configuration
///
/// Checked once at startup; nothing here changes while running.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerConfig {
    /// Ambient temperature sample period (ms)
    pub temp_sample_period_ms: u32,
    /// Overheat sensor sample period (ms)
    pub overheat_sample_period_ms: u32,
    /// Settings save debounce delay (ms)
    pub save_delay_ms: u32,
    /// Overheat sensing
    pub overheat: OverheatConfig,
    /// Setting limits
    pub limits: Limits,
    /// Settings used when storage holds nothing valid
    pub defaults: DeviceState,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            temp_sample_period_ms: DEFAULT_TEMP_SAMPLE_PERIOD_MS,
            overheat_sample_period_ms: DEFAULT_OVERHEAT_SAMPLE_PERIOD_MS,
            save_delay_ms: DEFAULT_SAVE_DELAY_MS,
            overheat: OverheatConfig::default(),
            limits: Limits::DEFAULT,
            defaults: DeviceState::DEFAULT,
        }
    }
}

impl ControllerConfig {
    /// Check internal consistency
    ///
    /// Returns a short description of the first problem found.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.temp_sample_period_ms == 0 {
            return Err("temperature sample period must be non-zero");
        }
        if self.overheat.enabled && self.overheat_sample_period_ms == 0 {
            return Err("overheat sample period must be non-zero");
        }
        let limits = &self.limits;
        if !(limits.set_temp.min <= limits.set_temp.max) {
            return Err("set_temp limits are inverted");
        }
        if !(limits.hyster_dia.min <= limits.hyster_dia.max) || limits.hyster_dia.min < 0.0 {
            return Err("hyster_dia limits are invalid");
        }
        if limits.brightness.min > limits.brightness.max || limits.brightness.max > 7 {
            return Err("brightness limits must lie within 0..=7");
        }
        if !self.defaults.is_within(limits) {
            return Err("defaults lie outside the limits");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(ControllerConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = Bounds::new(12.0, 55.0);
        assert!(bounds.contains(12.0));
        assert!(bounds.contains(55.0));
        assert!(!bounds.contains(55.1));
        assert!(!bounds.contains(f32::NAN));
    }

    #[test]
    fn test_rejects_defaults_outside_limits() {
        let mut config = ControllerConfig::default();
        config.defaults.set_temp = 60.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_sample_period() {
        let mut config = ControllerConfig::default();
        config.temp_sample_period_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_disabled_overheat_ignores_its_period() {
        let mut config = ControllerConfig::default();
        config.overheat.enabled = false;
        config.overheat_sample_period_ms = 0;
        assert_eq!(config.validate(), Ok(()));
    }
}
