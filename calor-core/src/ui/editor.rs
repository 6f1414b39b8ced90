//! Encoder value editing
//!
//! One detent moves a value by a fixed step; holding the button while
//! turning selects the coarse step. Results saturate at the bounds.

use crate::config::Bounds;

/// Fine step for continuous values
pub const FLOAT_SLOW_STEP: f32 = 0.1;
/// Coarse step for continuous values
pub const FLOAT_FAST_STEP: f32 = 1.0;

/// Fine step for discrete values
pub const INT_SLOW_STEP: u8 = 1;
/// Coarse step for discrete values
pub const INT_FAST_STEP: u8 = 5;

/// A quantity the encoder can edit
pub trait Adjustable: Copy + PartialOrd {
    /// Rate used when the caller does not pass a fast flag
    ///
    /// Continuous values default to the coarse step. Discrete values have
    /// a narrow range and default to the fine step.
    const DEFAULT_FAST: bool;

    /// Move `self` by `direction` steps (already normalized to -1, 0, 1)
    /// and clamp into `bounds`
    fn offset_clamped(self, direction: i8, fast: bool, bounds: Bounds<Self>) -> Self;
}

impl Adjustable for f32 {
    const DEFAULT_FAST: bool = true;

    fn offset_clamped(self, direction: i8, fast: bool, bounds: Bounds<Self>) -> Self {
        let step = if fast { FLOAT_FAST_STEP } else { FLOAT_SLOW_STEP };
        let value = self + f32::from(direction) * step;
        if value.is_nan() {
            return bounds.min;
        }
        value.max(bounds.min).min(bounds.max)
    }
}

impl Adjustable for u8 {
    const DEFAULT_FAST: bool = false;

    fn offset_clamped(self, direction: i8, fast: bool, bounds: Bounds<Self>) -> Self {
        let step = if fast { INT_FAST_STEP } else { INT_SLOW_STEP };
        let value = i16::from(self) + i16::from(direction) * i16::from(step);
        value.clamp(i16::from(bounds.min), i16::from(bounds.max)) as u8
    }
}

/// Apply one encoder step to `value`
///
/// `direction` is the encoder direction; only its sign is used, and zero
/// leaves the value unchanged (but still clamped).
pub fn adjust<T: Adjustable>(value: T, direction: i8, fast: bool, bounds: Bounds<T>) -> T {
    value.offset_clamped(direction.signum(), fast, bounds)
}

/// Apply one encoder step at the type's default rate
pub fn adjust_default<T: Adjustable>(value: T, direction: i8, bounds: Bounds<T>) -> T {
    adjust(value, direction, T::DEFAULT_FAST, bounds)
}
