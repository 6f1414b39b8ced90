//! TM1637 LED driver
//!
//! Two-wire bit-banged interface. It looks like I2C but has no address,
//! sends LSB first, and is not compatible with an I2C peripheral. DIO
//! must be open-drain (with a pull-up) so the chip can pull it low to
//! acknowledge each byte.

use calor_core::traits::DisplayError;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use super::segment::{SegmentBus, DIGITS};

/// Data command: write, auto-increment address
const CMD_DATA_AUTO: u8 = 0x40;
/// Address command: start at digit 0
const CMD_ADDRESS: u8 = 0xC0;
/// Display control: on, brightness in the low three bits
const CMD_DISPLAY_ON: u8 = 0x88;

/// Half clock period (µs)
const BIT_DELAY_US: u32 = 5;

/// TM1637 on two GPIOs
pub struct Tm1637<CLK, DIO, D> {
    clk: CLK,
    dio: DIO,
    delay: D,
}

impl<CLK, DIO, D> Tm1637<CLK, DIO, D>
where
    CLK: OutputPin,
    DIO: OutputPin + InputPin,
    D: DelayNs,
{
    /// Create the driver; both lines are released high
    pub fn new(clk: CLK, dio: DIO, delay: D) -> Self {
        let mut tm = Self { clk, dio, delay };
        let _ = tm.clk.set_high();
        let _ = tm.dio.set_high();
        tm
    }

    fn pause(&mut self) {
        self.delay.delay_us(BIT_DELAY_US);
    }

    fn clk(&mut self, high: bool) -> Result<(), DisplayError> {
        let result = if high {
            self.clk.set_high()
        } else {
            self.clk.set_low()
        };
        result.map_err(|_| DisplayError::Bus)
    }

    fn dio(&mut self, high: bool) -> Result<(), DisplayError> {
        let result = if high {
            self.dio.set_high()
        } else {
            self.dio.set_low()
        };
        result.map_err(|_| DisplayError::Bus)
    }

    /// DIO falls while CLK is high
    fn start(&mut self) -> Result<(), DisplayError> {
        self.dio(true)?;
        self.clk(true)?;
        self.pause();
        self.dio(false)?;
        self.pause();
        Ok(())
    }

    /// DIO rises while CLK is high
    fn stop(&mut self) -> Result<(), DisplayError> {
        self.clk(false)?;
        self.pause();
        self.dio(false)?;
        self.pause();
        self.clk(true)?;
        self.pause();
        self.dio(true)?;
        self.pause();
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), DisplayError> {
        for bit in 0..8 {
            self.clk(false)?;
            self.pause();
            self.dio(byte & (1 << bit) != 0)?;
            self.pause();
            self.clk(true)?;
            self.pause();
        }

        // Ninth clock: release DIO and let the chip pull it low
        self.clk(false)?;
        self.dio(true)?;
        self.pause();
        self.clk(true)?;
        self.pause();
        let acked = self.dio.is_low().map_err(|_| DisplayError::Bus)?;
        self.clk(false)?;
        self.pause();

        if acked {
            Ok(())
        } else {
            Err(DisplayError::NoAck)
        }
    }

    /// Send one start/stop framed command
    fn command(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        self.start()?;
        let result = bytes.iter().try_for_each(|&b| self.write_byte(b));
        // Always release the bus, even after a missing ack
        self.stop()?;
        result
    }
}

impl<CLK, DIO, D> SegmentBus for Tm1637<CLK, DIO, D>
where
    CLK: OutputPin,
    DIO: OutputPin + InputPin,
    D: DelayNs,
{
    fn write_segments(
        &mut self,
        segments: &[u8; DIGITS],
        brightness: u8,
    ) -> Result<(), DisplayError> {
        self.command(&[CMD_DATA_AUTO])?;

        let mut frame = [0u8; DIGITS + 1];
        frame[0] = CMD_ADDRESS;
        frame[1..].copy_from_slice(segments);
        self.command(&frame)?;

        self.command(&[CMD_DISPLAY_ON | (brightness & 0x07)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;
    use heapless::Vec;

    /// Shared state of the two lines, decoded like a logic analyzer would
    #[derive(Default)]
    struct Wire {
        clk: bool,
        dio: bool,
        in_frame: bool,
        bits: Vec<bool, 64>,
        frames: Vec<Vec<u8, 8>, 8>,
        acks: bool,
    }

    impl Wire {
        fn new() -> Self {
            Self {
                clk: true,
                dio: true,
                acks: true,
                ..Default::default()
            }
        }

        fn set_clk(&mut self, level: bool) {
            if level && !self.clk && self.in_frame {
                let _ = self.bits.push(self.dio);
            }
            self.clk = level;
        }

        fn set_dio(&mut self, level: bool) {
            if self.clk && self.dio && !level {
                self.in_frame = true;
                self.bits.clear();
            } else if self.clk && !self.dio && level && self.in_frame {
                self.in_frame = false;
                self.finish_frame();
            }
            self.dio = level;
        }

        /// Each byte is eight data bits plus the ack clock
        fn finish_frame(&mut self) {
            let mut frame = Vec::new();
            for chunk in self.bits.chunks_exact(9) {
                let byte = chunk[..8]
                    .iter()
                    .enumerate()
                    .fold(0u8, |acc, (i, &bit)| acc | ((bit as u8) << i));
                let _ = frame.push(byte);
            }
            let _ = self.frames.push(frame);
        }
    }

    struct Clk<'a>(&'a RefCell<Wire>);
    struct Dio<'a>(&'a RefCell<Wire>);

    impl ErrorType for Clk<'_> {
        type Error = Infallible;
    }

    impl OutputPin for Clk<'_> {
        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().set_clk(true);
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().set_clk(false);
            Ok(())
        }
    }

    impl ErrorType for Dio<'_> {
        type Error = Infallible;
    }

    impl OutputPin for Dio<'_> {
        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().set_dio(true);
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().set_dio(false);
            Ok(())
        }
    }

    impl InputPin for Dio<'_> {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(!self.0.borrow().acks)
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(self.0.borrow().acks)
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    #[test]
    fn test_frame_sequence() {
        let wire = RefCell::new(Wire::new());
        let mut tm = Tm1637::new(Clk(&wire), Dio(&wire), NoDelay);

        tm.write_segments(&[0x58, 0x5B, 0xED, 0x3F], 5).unwrap();

        let wire = wire.borrow();
        assert_eq!(wire.frames.len(), 3);
        assert_eq!(wire.frames[0].as_slice(), &[CMD_DATA_AUTO]);
        assert_eq!(
            wire.frames[1].as_slice(),
            &[CMD_ADDRESS, 0x58, 0x5B, 0xED, 0x3F]
        );
        assert_eq!(wire.frames[2].as_slice(), &[CMD_DISPLAY_ON | 5]);
    }

    #[test]
    fn test_missing_ack() {
        let wire = RefCell::new(Wire::new());
        wire.borrow_mut().acks = false;
        let mut tm = Tm1637::new(Clk(&wire), Dio(&wire), NoDelay);

        assert_eq!(
            tm.write_segments(&[0; DIGITS], 7),
            Err(DisplayError::NoAck)
        );
        // The bus was still released with a stop condition
        assert!(!wire.borrow().in_frame);
    }
}
