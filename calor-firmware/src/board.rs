//! Board wiring
//!
//! Raspberry Pi Pico with:
//!
//! | Function            | Pin    |
//! |---------------------|--------|
//! | BME280 SDA (I2C0)   | GPIO0  |
//! | BME280 SCL (I2C0)   | GPIO1  |
//! | TM1637 CLK          | GPIO3  |
//! | TM1637 DIO          | GPIO4  |
//! | Encoder button      | GPIO5  |
//! | Encoder S2 (B)      | GPIO6  |
//! | Encoder S1 (A)      | GPIO7  |
//! | Heater SSR          | GPIO12 |
//! | Overheat NTC (ADC0) | GPIO26 |

use embassy_rp::adc::{self, Adc};
use embassy_rp::gpio::{Input, Level, Output, OutputOpenDrain, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{
    ADC, I2C0, PIN_0, PIN_1, PIN_12, PIN_26, PIN_3, PIN_4, PIN_5, PIN_6, PIN_7,
};
use embassy_rp::Peri;
use embassy_time::{block_for, Delay, Duration};

use calor_core::control::{Board, ControlLoop};
use calor_drivers::display::{SegmentDisplay, Tm1637};
use calor_drivers::heater::GpioHeater;
use calor_drivers::input::Encoder;
use calor_drivers::sensor::{AdcReader, Bme280, NtcConfig, NtcSensor};

use crate::eeprom::EepromImage;

pub type AmbientSensor = Bme280<I2c<'static, I2C0, i2c::Blocking>>;
pub type HeaterSensor = NtcSensor<BoardAdc>;
pub type Knob = Encoder<Input<'static>, Input<'static>, Input<'static>>;
pub type Display = SegmentDisplay<Tm1637<Output<'static>, OutputOpenDrain<'static>, Delay>>;
pub type Heater = GpioHeater<Output<'static>>;

pub type ThermostatBoard = Board<AmbientSensor, HeaterSensor, Knob, Display, EepromImage, Heater>;
pub type Thermostat =
    ControlLoop<AmbientSensor, HeaterSensor, Knob, Display, EepromImage, Heater>;

/// Peripherals the board uses
pub struct BoardPins {
    pub i2c: Peri<'static, I2C0>,
    pub sda: Peri<'static, PIN_0>,
    pub scl: Peri<'static, PIN_1>,
    pub display_clk: Peri<'static, PIN_3>,
    pub display_dio: Peri<'static, PIN_4>,
    pub encoder_button: Peri<'static, PIN_5>,
    pub encoder_b: Peri<'static, PIN_6>,
    pub encoder_a: Peri<'static, PIN_7>,
    pub heater: Peri<'static, PIN_12>,
    pub adc: Peri<'static, ADC>,
    pub ntc: Peri<'static, PIN_26>,
}

/// Blocking ADC channel for the overheat NTC
pub struct BoardAdc {
    adc: Adc<'static, adc::Blocking>,
    channel: adc::Channel<'static>,
}

impl AdcReader for BoardAdc {
    fn read(&mut self) -> Result<u16, ()> {
        self.adc.blocking_read(&mut self.channel).map_err(|_| ())
    }
}

/// Configure every pin and build the collaborators
///
/// The heater pin starts low so the heater is off from the first
/// instruction.
pub fn assemble(pins: BoardPins, store: EepromImage) -> ThermostatBoard {
    let heater = GpioHeater::new_active_high(Output::new(pins.heater, Level::Low));

    let i2c = I2c::new_blocking(pins.i2c, pins.scl, pins.sda, i2c::Config::default());
    let sensor = Bme280::new_primary(i2c);

    let adc = BoardAdc {
        adc: Adc::new_blocking(pins.adc, adc::Config::default()),
        channel: adc::Channel::new_pin(pins.ntc, Pull::None),
    };
    let overheat = NtcSensor::new(adc, NtcConfig::default());

    let a = Input::new(pins.encoder_a, Pull::Up);
    let b = Input::new(pins.encoder_b, Pull::Up);
    let button = Input::new(pins.encoder_button, Pull::Up);
    // Let the pull-ups settle before the encoder latches the boot levels
    block_for(Duration::from_micros(50));
    let encoder = Encoder::new(a, b, button);

    let clk = Output::new(pins.display_clk, Level::High);
    let dio = OutputOpenDrain::new(pins.display_dio, Level::High);
    let display = SegmentDisplay::new(Tm1637::new(clk, dio, Delay));

    Board {
        sensor,
        overheat,
        encoder,
        display,
        store,
        heater,
    }
}
