//! Display sink trait for the segment display

use core::fmt::Write;

use heapless::String;

/// Errors that can occur with display communication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Display did not acknowledge a transfer
    NoAck,
    /// Pin or bus error
    Bus,
}

/// Character display with a print cursor
///
/// This is a small text surface (four cells on the stock hardware). The
/// controller writes into it during a tick and calls
/// [`refresh`](Self::refresh) once to push the result to the hardware.
pub trait DisplaySink {
    /// Number of character cells
    fn width(&self) -> u8;

    /// Blank all cells and move the cursor home
    fn clear(&mut self);

    /// Move the print cursor
    fn set_cursor(&mut self, pos: u8);

    /// Print text at the cursor
    ///
    /// With right alignment on, the text is placed so that it ends on the
    /// last cell and the cells between the cursor and the text are blanked.
    fn print_str(&mut self, text: &str);

    /// Switch right alignment for subsequent prints
    fn set_right_align(&mut self, on: bool);

    /// Set the hardware brightness level (0-7)
    fn set_brightness(&mut self, level: u8);

    /// Push the buffered content to the hardware
    fn refresh(&mut self) -> Result<(), DisplayError>;

    /// Print a single character at the cursor
    fn print_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.print_str(c.encode_utf8(&mut buf));
    }

    /// Print an integer at the cursor
    fn print_int(&mut self, value: i32) {
        let mut text: String<12> = String::new();
        // 12 bytes hold any i32
        let _ = write!(text, "{}", value);
        self.print_str(&text);
    }

    /// Print a float with a fixed number of decimals at the cursor
    fn print_float(&mut self, value: f32, decimals: u8) {
        let mut text: String<24> = String::new();
        if write!(text, "{:.*}", decimals as usize, value).is_err() {
            text.clear();
            let _ = text.push_str("----");
        }
        self.print_str(&text);
    }
}
