//! Four-digit seven-segment text buffer
//!
//! Characters are mapped to segment patterns as they are printed. A '.'
//! does not take a cell of its own: it lights the decimal point of the
//! cell before it, so "25.0" fits in three cells.
//!
//! Segment bit layout (bit 7 is the decimal point):
//!
//! ```text
//!    -a-
//!   f   b
//!    -g-
//!   e   c
//!    -d-  .dp
//! ```

use calor_core::traits::{DisplayError, DisplaySink};

/// Number of digits on the module
pub const DIGITS: usize = 4;

/// Highest brightness level
pub const MAX_BRIGHTNESS: u8 = 7;

const DP: u8 = 0x80;

/// Low-level link to a segment driver chip
pub trait SegmentBus {
    /// Show `segments` (leftmost first) at `brightness` (0-7)
    fn write_segments(&mut self, segments: &[u8; DIGITS], brightness: u8)
        -> Result<(), DisplayError>;
}

/// Segment pattern for a character
///
/// Letters are drawn in whichever case reads better on seven segments.
/// Anything without a sensible shape is blank.
pub fn glyph(c: char) -> u8 {
    match c {
        '0' | 'O' => 0x3F,
        '1' => 0x06,
        '2' => 0x5B,
        '3' => 0x4F,
        '4' => 0x66,
        '5' | 's' | 'S' => 0x6D,
        '6' => 0x7D,
        '7' => 0x07,
        '8' => 0x7F,
        '9' => 0x6F,
        'a' | 'A' => 0x77,
        'b' | 'B' => 0x7C,
        'c' => 0x58,
        'C' => 0x39,
        'd' | 'D' => 0x5E,
        'e' | 'E' => 0x79,
        'f' | 'F' => 0x71,
        'h' => 0x74,
        'H' => 0x76,
        'l' | 'L' => 0x38,
        'n' | 'N' => 0x54,
        'o' => 0x5C,
        'p' | 'P' => 0x73,
        'r' | 'R' => 0x50,
        't' | 'T' => 0x78,
        'u' | 'v' => 0x1C,
        'U' | 'V' => 0x3E,
        '-' => 0x40,
        '_' => 0x08,
        _ => 0x00,
    }
}

/// Number of cells `text` occupies once dots are folded in
fn cell_count(text: &str) -> usize {
    let mut cells = 0;
    let mut prev_dot_slot = false;
    for c in text.chars() {
        if c == '.' && prev_dot_slot {
            prev_dot_slot = false;
        } else {
            cells += 1;
            prev_dot_slot = c != '.';
        }
    }
    cells
}

/// Text buffer for a four-digit display
///
/// Printing only touches the buffer; [`refresh`](DisplaySink::refresh)
/// sends it, and skips the transfer when nothing changed.
pub struct SegmentDisplay<B> {
    bus: B,
    cells: [u8; DIGITS],
    cursor: usize,
    right_align: bool,
    brightness: u8,
    /// Last frame sent, if the chip is known to show it
    sent: Option<([u8; DIGITS], u8)>,
}

impl<B: SegmentBus> SegmentDisplay<B> {
    /// Create a blank display at full brightness
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            cells: [0; DIGITS],
            cursor: 0,
            right_align: false,
            brightness: MAX_BRIGHTNESS,
            sent: None,
        }
    }

    /// Current segment patterns
    pub fn segments(&self) -> &[u8; DIGITS] {
        &self.cells
    }

    /// Current brightness level
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Borrow the bus
    pub fn bus(&self) -> &B {
        &self.bus
    }

    fn put(&mut self, text: &str) {
        let mut dot_ok = self.cursor > 0;
        for c in text.chars() {
            if c == '.' && dot_ok {
                if let Some(cell) = self.cells.get_mut(self.cursor - 1) {
                    *cell |= DP;
                }
                dot_ok = false;
                continue;
            }
            let pattern = if c == '.' { DP } else { glyph(c) };
            if let Some(cell) = self.cells.get_mut(self.cursor) {
                *cell = pattern;
            }
            self.cursor += 1;
            dot_ok = c != '.';
        }
    }
}

impl<B: SegmentBus> DisplaySink for SegmentDisplay<B> {
    fn width(&self) -> u8 {
        DIGITS as u8
    }

    fn clear(&mut self) {
        self.cells = [0; DIGITS];
        self.cursor = 0;
    }

    fn set_cursor(&mut self, pos: u8) {
        self.cursor = (pos as usize).min(DIGITS);
    }

    fn print_str(&mut self, text: &str) {
        if self.right_align {
            let start = DIGITS.saturating_sub(cell_count(text)).max(self.cursor);
            for cell in self.cells.iter_mut().take(start).skip(self.cursor) {
                *cell = 0;
            }
            self.cursor = start;
        }
        self.put(text);
    }

    fn set_right_align(&mut self, on: bool) {
        self.right_align = on;
    }

    fn set_brightness(&mut self, level: u8) {
        self.brightness = level.min(MAX_BRIGHTNESS);
    }

    fn refresh(&mut self) -> Result<(), DisplayError> {
        let frame = (self.cells, self.brightness);
        if self.sent == Some(frame) {
            return Ok(());
        }
        // Forget the last frame first so a failed write is retried
        self.sent = None;
        self.bus.write_segments(&self.cells, self.brightness)?;
        self.sent = Some(frame);
        Ok(())
    }
}
