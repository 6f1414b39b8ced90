//! Screen cycle definition
//!
//! A click always moves to the next screen; there is no branching and no
//! way back other than going round.

use serde::{Deserialize, Serialize};

/// Display screens, in cycle order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Screen {
    /// Measured room temperature
    #[default]
    RoomTemp,
    /// Room temperature minus setpoint
    Delta,
    /// Setpoint (editable)
    TargetTemp,
    /// Hysteresis half-width (editable)
    Hyster,
    /// Display brightness (editable)
    Bright,
}

/// Settings that the encoder can edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Setting {
    /// Target temperature
    SetTemp,
    /// Hysteresis half-width
    HysterDia,
    /// Display brightness
    Brightness,
}

impl Screen {
    /// All screens in cycle order
    pub const ALL: [Screen; 5] = [
        Screen::RoomTemp,
        Screen::Delta,
        Screen::TargetTemp,
        Screen::Hyster,
        Screen::Bright,
    ];

    /// The screen a click leads to
    pub const fn next(self) -> Self {
        match self {
            Screen::RoomTemp => Screen::Delta,
            Screen::Delta => Screen::TargetTemp,
            Screen::TargetTemp => Screen::Hyster,
            Screen::Hyster => Screen::Bright,
            Screen::Bright => Screen::RoomTemp,
        }
    }

    /// Single-character marker shown in front of the value
    pub const fn marker(self) -> char {
        match self {
            Screen::RoomTemp => 'c',
            Screen::Delta => 'd',
            Screen::TargetTemp => 't',
            Screen::Hyster => 'h',
            Screen::Bright => 'b',
        }
    }

    /// The setting edited on this screen, if any
    pub const fn setting(self) -> Option<Setting> {
        match self {
            Screen::RoomTemp | Screen::Delta => None,
            Screen::TargetTemp => Some(Setting::SetTemp),
            Screen::Hyster => Some(Setting::HysterDia),
            Screen::Bright => Some(Setting::Brightness),
        }
    }

    /// Check if turning the encoder on this screen edits something
    pub const fn is_editable(self) -> bool {
        self.setting().is_some()
    }
}
