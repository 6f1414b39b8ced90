//! Persisted device settings

use serde::{Deserialize, Serialize};

use super::screen::{Screen, Setting};
use crate::config::{Limits, DEFAULT_DISP_BRIGHTNESS, DEFAULT_HYSTER_DIA, DEFAULT_SET_TEMP};
use crate::ui::editor::{adjust, adjust_default};

/// User settings, written to storage after edits settle
///
/// The active screen is part of the record so the device comes back on
/// the screen it was left on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceState {
    /// Active screen
    pub screen: Screen,
    /// Display brightness level (0-7)
    pub display_brightness: u8,
    /// Hysteresis half-width (°C)
    pub hyster_dia: f32,
    /// Target room temperature (°C)
    pub set_temp: f32,
}

impl DeviceState {
    /// Compiled-in defaults
    pub const DEFAULT: DeviceState = DeviceState {
        screen: Screen::RoomTemp,
        display_brightness: DEFAULT_DISP_BRIGHTNESS,
        hyster_dia: DEFAULT_HYSTER_DIA,
        set_temp: DEFAULT_SET_TEMP,
    };

    /// Check that every bounded field lies inside `limits`
    pub fn is_within(&self, limits: &Limits) -> bool {
        limits.set_temp.contains(self.set_temp)
            && limits.hyster_dia.contains(self.hyster_dia)
            && limits.brightness.contains(self.display_brightness)
    }

    /// Force every bounded field into `limits`
    ///
    /// Used on values restored from storage. Returns true if anything had
    /// to be changed.
    pub fn sanitize(&mut self, limits: &Limits) -> bool {
        let before = *self;
        self.set_temp = adjust(self.set_temp, 0, false, limits.set_temp);
        self.hyster_dia = adjust(self.hyster_dia, 0, false, limits.hyster_dia);
        self.display_brightness = adjust(self.display_brightness, 0, false, limits.brightness);
        // NaN never compares equal, so compare bit patterns
        before.set_temp.to_bits() != self.set_temp.to_bits()
            || before.hyster_dia.to_bits() != self.hyster_dia.to_bits()
            || before.display_brightness != self.display_brightness
    }

    /// Move to the next screen in the cycle
    pub fn advance_screen(&mut self) -> Screen {
        self.screen = self.screen.next();
        self.screen
    }

    /// Apply one encoder step to `setting`
    ///
    /// `fast` selects the coarse step for the temperature settings.
    /// Brightness always moves at its default rate. Returns true if the
    /// stored value changed.
    pub fn apply_edit(&mut self, setting: Setting, direction: i8, fast: bool, limits: &Limits) -> bool {
        match setting {
            Setting::SetTemp => {
                let old = self.set_temp;
                self.set_temp = adjust(old, direction, fast, limits.set_temp);
                old != self.set_temp
            }
            Setting::HysterDia => {
                let old = self.hyster_dia;
                self.hyster_dia = adjust(old, direction, fast, limits.hyster_dia);
                old != self.hyster_dia
            }
            Setting::Brightness => {
                let old = self.display_brightness;
                self.display_brightness = adjust_default(old, direction, limits.brightness);
                old != self.display_brightness
            }
        }
    }
}

impl Default for DeviceState {
    fn default() -> Self {
        Self::DEFAULT
    }
}
