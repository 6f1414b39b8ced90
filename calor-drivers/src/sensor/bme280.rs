//! BME280 ambient temperature sensor
//!
//! Only the temperature channel is used. The sensor runs in normal mode
//! with 1x oversampling and is read with the integer compensation formula
//! from the Bosch datasheet (section 4.2.3).

use calor_core::traits::{SensorError, TemperatureSensor};
use embedded_hal::i2c::{ErrorKind, I2c};

/// Default I2C address (SDO to GND)
pub const ADDRESS_PRIMARY: u8 = 0x76;
/// Alternate I2C address (SDO to VDDIO)
pub const ADDRESS_SECONDARY: u8 = 0x77;

/// Value of the chip ID register
pub const CHIP_ID: u8 = 0x60;

/// BME280 registers
mod reg {
    pub const CALIB_T: u8 = 0x88;
    pub const CHIP_ID: u8 = 0xD0;
    pub const RESET: u8 = 0xE0;
    pub const CTRL_MEAS: u8 = 0xF4;
    pub const CONFIG: u8 = 0xF5;
    pub const TEMP_MSB: u8 = 0xFA;
}

/// Soft reset command
const RESET_CMD: u8 = 0xB6;

/// osrs_t = x1, osrs_p = skipped, mode = normal
const CTRL_MEAS_VALUE: u8 = (0b001 << 5) | 0b11;

/// t_sb = 62.5 ms, filter off
const CONFIG_VALUE: u8 = 0b001 << 5;

/// Raw reading that the chip reports when the measurement was skipped
const ADC_SKIPPED: i32 = 0x80000;

/// Temperature trimming parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    pub dig_t1: u16,
    pub dig_t2: i16,
    pub dig_t3: i16,
}

impl Calibration {
    /// Parse the six little-endian bytes at 0x88
    pub fn from_bytes(raw: &[u8; 6]) -> Self {
        Self {
            dig_t1: u16::from_le_bytes([raw[0], raw[1]]),
            dig_t2: i16::from_le_bytes([raw[2], raw[3]]),
            dig_t3: i16::from_le_bytes([raw[4], raw[5]]),
        }
    }

    /// Compensate a raw 20-bit reading
    ///
    /// Returns temperature in 0.01°C units (e.g., 2508 = 25.08°C).
    pub fn compensate_x100(&self, adc_t: i32) -> i32 {
        let t1 = i32::from(self.dig_t1);
        let t2 = i32::from(self.dig_t2);
        let t3 = i32::from(self.dig_t3);

        let var1 = (((adc_t >> 3) - (t1 << 1)) * t2) >> 11;
        let var2 = (((((adc_t >> 4) - t1) * ((adc_t >> 4) - t1)) >> 12) * t3) >> 14;
        let t_fine = var1 + var2;
        (t_fine * 5 + 128) >> 8
    }
}

/// BME280 on an I2C bus
pub struct Bme280<I2C> {
    i2c: I2C,
    address: u8,
    calibration: Option<Calibration>,
}

impl<I2C: I2c> Bme280<I2C> {
    /// Create a driver; nothing is sent until [`init`](TemperatureSensor::init)
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            calibration: None,
        }
    }

    /// Create a driver at the primary address
    pub fn new_primary(i2c: I2C) -> Self {
        Self::new(i2c, ADDRESS_PRIMARY)
    }

    /// Trimming parameters read at init
    pub fn calibration(&self) -> Option<Calibration> {
        self.calibration
    }

    fn read_registers(&mut self, start: u8, buffer: &mut [u8]) -> Result<(), SensorError> {
        self.i2c
            .write_read(self.address, &[start], buffer)
            .map_err(bus_error)
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), SensorError> {
        self.i2c
            .write(self.address, &[register, value])
            .map_err(bus_error)
    }
}

fn bus_error<E: embedded_hal::i2c::Error>(e: E) -> SensorError {
    match e.kind() {
        ErrorKind::NoAcknowledge(_) => SensorError::NotFound,
        _ => SensorError::Bus,
    }
}

impl<I2C: I2c> TemperatureSensor for Bme280<I2C> {
    fn init(&mut self) -> Result<(), SensorError> {
        let mut id = [0u8; 1];
        self.read_registers(reg::CHIP_ID, &mut id)?;
        if id[0] != CHIP_ID {
            return Err(SensorError::WrongChip);
        }

        self.write_register(reg::RESET, RESET_CMD)?;

        let mut raw = [0u8; 6];
        self.read_registers(reg::CALIB_T, &mut raw)?;
        self.calibration = Some(Calibration::from_bytes(&raw));

        // CONFIG is only honoured outside normal mode, so write it first
        self.write_register(reg::CONFIG, CONFIG_VALUE)?;
        self.write_register(reg::CTRL_MEAS, CTRL_MEAS_VALUE)?;
        Ok(())
    }

    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        let calibration = self.calibration.ok_or(SensorError::NotReady)?;

        let mut raw = [0u8; 3];
        self.read_registers(reg::TEMP_MSB, &mut raw)?;
        let adc_t =
            (i32::from(raw[0]) << 12) | (i32::from(raw[1]) << 4) | (i32::from(raw[2]) >> 4);
        if adc_t == ADC_SKIPPED {
            return Err(SensorError::NotReady);
        }

        Ok(calibration.compensate_x100(adc_t) as f32 / 100.0)
    }
}
