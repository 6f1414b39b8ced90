//! GPIO heater output
//!
//! Simple heater control using a GPIO pin (directly or via SSR/MOSFET).

use calor_core::traits::HeaterOutput;
use embedded_hal::digital::OutputPin;

/// GPIO heater output
///
/// Controls a heater via a GPIO pin. The pin can be configured as
/// active-high (default) or active-low.
pub struct GpioHeater<P> {
    pin: P,
    /// If true, heater ON = pin LOW
    inverted: bool,
    /// Current logical state (true = heater on)
    on: bool,
}

impl<P: OutputPin> GpioHeater<P> {
    /// Create a new GPIO heater output
    ///
    /// # Arguments
    /// - `pin`: The GPIO pin to control
    /// - `inverted`: If true, heater is ON when pin is LOW (for active-low SSRs)
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut heater = Self {
            pin,
            inverted,
            on: false,
        };
        // Ensure heater starts off
        heater.set_on(false);
        heater
    }

    /// Create a new GPIO heater with active-high output
    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    /// Create a new GPIO heater with active-low output
    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }
}

impl<P: OutputPin> HeaterOutput for GpioHeater<P> {
    fn set_on(&mut self, on: bool) {
        // A failed write leaves the pin where it was, so the logical state
        // keeps tracking the pin and the caller retries on the next tick
        let result = if on != self.inverted {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        if result.is_ok() {
            self.on = on;
        }
    }

    fn is_on(&self) -> bool {
        self.on
    }
}
