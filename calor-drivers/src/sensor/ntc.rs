//! NTC 10K thermistor overheat sensor
//!
//! Thermistor on the heater body, read through a voltage divider. Uses a
//! lookup table for integer-only temperature calculation and averages the
//! last few samples so a single noisy reading cannot trip the cutoff.

use calor_core::traits::{OverheatSensor, SensorError};
use heapless::HistoryBuffer;

/// Number of samples averaged
pub const AVERAGE_SAMPLES: usize = 8;

/// NTC 10K thermistor temperature lookup table
///
/// Table format: (resistance_ohms, temperature_x10)
/// Generated using beta equation with:
/// - R0 = 10,000 ohms at T0 = 25°C
/// - Beta = 3950K
///
/// Temperature range: -20°C to 120°C
const TEMP_TABLE: &[(u32, i16)] = &[
    (105_385, -200), // -20°C
    (58_246, -100),  // -10°C
    (33_621, 0),     // 0°C
    (20_175, 100),   // 10°C
    (12_535, 200),   // 20°C
    (10_000, 250),   // 25°C (R0)
    (8_037, 300),    // 30°C
    (5_301, 400),    // 40°C
    (3_588, 500),    // 50°C
    (2_486, 600),    // 60°C
    (2_086, 650),    // 65°C (default cutoff)
    (1_760, 700),    // 70°C
    (1_270, 800),    // 80°C
    (934, 900),      // 90°C
    (698, 1000),     // 100°C
    (529, 1100),     // 110°C
    (407, 1200),     // 120°C
];

/// ADC reading trait for platform abstraction
pub trait AdcReader {
    /// Read a raw ADC value
    #[allow(clippy::result_unit_err)]
    fn read(&mut self) -> Result<u16, ()>;
}

/// Divider and converter parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NtcConfig {
    /// Series resistor between VCC and the ADC pin (ohms)
    pub series_ohms: u32,
    /// Full-scale ADC count (4096 for 12-bit)
    pub adc_max: u16,
}

impl Default for NtcConfig {
    fn default() -> Self {
        Self {
            series_ohms: 10_000,
            adc_max: 4096,
        }
    }
}

/// NTC 10K thermistor with B=3950
///
/// Every call to [`average_temperature`](OverheatSensor::average_temperature)
/// takes one new sample and returns the mean of the last
/// [`AVERAGE_SAMPLES`] good ones.
pub struct NtcSensor<ADC> {
    adc: ADC,
    config: NtcConfig,
    history: HistoryBuffer<i16, AVERAGE_SAMPLES>,
}

impl<ADC> NtcSensor<ADC> {
    /// Create a new NTC sensor
    pub fn new(adc: ADC, config: NtcConfig) -> Self {
        Self {
            adc,
            config,
            history: HistoryBuffer::new(),
        }
    }

    /// Convert ADC reading to resistance
    ///
    /// Circuit: VCC -- series -- ADC_PIN -- NTC -- GND
    /// R_ntc = R_series * adc_value / (adc_max - adc_value)
    pub fn adc_to_resistance(&self, adc_value: u16) -> Result<u32, SensorError> {
        let adc_max = self.config.adc_max;

        // Check for open circuit (ADC at max)
        if adc_value >= adc_max.saturating_sub(10) {
            return Err(SensorError::OpenCircuit);
        }

        // Check for short circuit (ADC at zero)
        if adc_value < 10 {
            return Err(SensorError::ShortCircuit);
        }

        let numerator = self.config.series_ohms as u64 * adc_value as u64;
        let denominator = (adc_max - adc_value) as u64;

        Ok((numerator / denominator) as u32)
    }

    /// Calculate temperature from resistance using lookup table
    ///
    /// Returns temperature in 0.1°C units (e.g., 250 = 25.0°C).
    /// Uses linear interpolation between table entries.
    pub fn resistance_to_temp_x10(resistance: u32) -> Result<i16, SensorError> {
        let (first, last) = match (TEMP_TABLE.first(), TEMP_TABLE.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Err(SensorError::OutOfRange),
        };

        if resistance > first.0 || resistance < last.0 {
            return Err(SensorError::OutOfRange);
        }

        // Table is sorted by decreasing resistance (increasing temperature)
        for pair in TEMP_TABLE.windows(2) {
            let (r_high, t_low) = pair[0];
            let (r_low, t_high) = pair[1];

            if resistance <= r_high && resistance >= r_low {
                let r_range = (r_high - r_low) as i32;
                let t_range = (t_high - t_low) as i32;
                let r_offset = (r_high - resistance) as i32;

                return Ok(t_low + (t_range * r_offset / r_range) as i16);
            }
        }

        Err(SensorError::OutOfRange)
    }

    /// Take one sample in 0.1°C units
    pub fn sample_x10(&mut self) -> Result<i16, SensorError>
    where
        ADC: AdcReader,
    {
        let adc_value = self.adc.read().map_err(|_| SensorError::ConversionError)?;
        let resistance = self.adc_to_resistance(adc_value)?;
        Self::resistance_to_temp_x10(resistance)
    }

    /// Number of samples currently in the average
    pub fn sample_count(&self) -> usize {
        self.history.len()
    }
}

impl<ADC: AdcReader> OverheatSensor for NtcSensor<ADC> {
    fn average_temperature(&mut self) -> Result<f32, SensorError> {
        let sample = self.sample_x10()?;
        self.history.write(sample);

        let samples = self.history.as_slice();
        let sum: i32 = samples.iter().map(|&t| i32::from(t)).sum();
        Ok(sum as f32 / samples.len() as f32 / 10.0)
    }
}
