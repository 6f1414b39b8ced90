//! Temperature sensor traits

/// Errors that can occur with temperature sensing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Sensor did not answer on its bus
    NotFound,
    /// Sensor answered with an unexpected chip identifier
    WrongChip,
    /// Bus transfer failed
    Bus,
    /// Sensor disconnected (open circuit)
    OpenCircuit,
    /// Sensor shorted to ground
    ShortCircuit,
    /// Reading out of expected range
    OutOfRange,
    /// ADC conversion error
    ConversionError,
    /// Sensor has not been initialized yet
    NotReady,
}

/// Ambient temperature sensor
///
/// The controller refuses to run without one: a failing [`init`](Self::init)
/// halts the device.
pub trait TemperatureSensor {
    /// Probe and configure the sensor
    fn init(&mut self) -> Result<(), SensorError>;

    /// Read the current temperature in degrees Celsius
    ///
    /// Takes `&mut self` because bus and ADC reads require mutable access.
    fn read_temperature(&mut self) -> Result<f32, SensorError>;
}

/// Heater-side overheat sensor
///
/// Implementations average several raw samples; the controller only
/// compares the average against its threshold.
pub trait OverheatSensor {
    /// Averaged temperature in degrees Celsius
    fn average_temperature(&mut self) -> Result<f32, SensorError>;
}

/// Placeholder for boards without an overheat sensor
///
/// Overheat sensing must also be disabled in the configuration; if it is
/// not, every read fails and the heater is held off.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOverheatSensor;

impl OverheatSensor for NoOverheatSensor {
    fn average_temperature(&mut self) -> Result<f32, SensorError> {
        Err(SensorError::NotFound)
    }
}
