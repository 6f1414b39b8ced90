//! Two-sided hysteresis decision
//!
//! The heater switches off at `set_temp + hyster_dia` and back on at
//! `set_temp - hyster_dia`. Inside that band it keeps doing whatever it
//! was doing, which is what stops it from chattering around the setpoint.

/// Decide whether the heater should be enabled
///
/// Pure; the caller keeps `previously_enabled` between calls. Overheat
/// protection is applied afterwards to the physical output only.
pub fn decide(current_temp: f32, set_temp: f32, hyster_dia: f32, previously_enabled: bool) -> bool {
    if current_temp >= set_temp + hyster_dia {
        false
    } else if current_temp <= set_temp - hyster_dia {
        true
    } else {
        previously_enabled
    }
}
