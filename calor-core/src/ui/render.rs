//! Screen rendering
//!
//! A screen is a one-character marker followed by the value. On a narrow
//! display the marker is dropped when the value needs every cell, and
//! floats give up decimals before the integer part is cut.

use crate::state::{DeviceState, Screen};
use crate::traits::DisplaySink;

/// Short status codes shown instead of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// Heater-side overheat
    Overheat,
    /// Ambient sensor missing
    SensorError,
    /// Stored settings erased at boot
    Reset,
    /// No temperature sample yet
    NoReading,
}

impl Status {
    /// Text shown for this status
    pub const fn text(self) -> &'static str {
        match self {
            Status::Overheat => "ovh",
            Status::SensorError => "-sen",
            Status::Reset => "rst",
            Status::NoReading => "----",
        }
    }
}

/// A value that can be shown on a screen
pub trait Renderable: Copy {
    /// Number of cells the integer part takes, sign included
    fn digit_count(self) -> u8;

    /// Print `marker` (if it fits) and the value from cell 0
    fn render<D: DisplaySink + ?Sized>(self, disp: &mut D, marker: char);
}

fn count_digits(value: i32) -> u8 {
    let mut magnitude = value.unsigned_abs();
    let mut digits = 1;
    while magnitude >= 10 {
        magnitude /= 10;
        digits += 1;
    }
    if value < 0 {
        digits += 1;
    }
    digits
}

/// `f32::floor` is not in `core`
fn floor_i32(value: f32) -> i32 {
    let truncated = value as i32;
    if (truncated as f32) > value {
        truncated - 1
    } else {
        truncated
    }
}

impl Renderable for u8 {
    fn digit_count(self) -> u8 {
        count_digits(i32::from(self))
    }

    fn render<D: DisplaySink + ?Sized>(self, disp: &mut D, marker: char) {
        disp.set_cursor(0);
        if self.digit_count() < disp.width() {
            disp.print_char(marker);
        }
        disp.set_right_align(true);
        disp.print_int(i32::from(self));
        disp.set_right_align(false);
    }
}

impl Renderable for f32 {
    fn digit_count(self) -> u8 {
        count_digits(floor_i32(self))
    }

    fn render<D: DisplaySink + ?Sized>(self, disp: &mut D, marker: char) {
        let width = disp.width();
        let digits = self.digit_count();

        disp.set_cursor(0);
        if digits < width {
            disp.print_char(marker);
        }

        let decimals = if digits.saturating_add(1) >= width {
            0
        } else {
            width - 1 - digits
        };
        disp.print_float(self, decimals);
    }
}

/// Replace the display content with a status code
pub fn render_status<D: DisplaySink + ?Sized>(disp: &mut D, status: Status) {
    disp.clear();
    disp.set_cursor(0);
    disp.print_str(status.text());
}

/// Render the active screen of `state`
///
/// `current_temp` is `None` until the first ambient sample; the
/// temperature screens show [`Status::NoReading`] until then.
pub fn render_screen<D: DisplaySink + ?Sized>(
    disp: &mut D,
    state: &DeviceState,
    current_temp: Option<f32>,
) {
    disp.clear();
    let marker = state.screen.marker();
    match state.screen {
        Screen::RoomTemp => match current_temp {
            Some(temp) => temp.render(disp, marker),
            None => render_status(disp, Status::NoReading),
        },
        Screen::Delta => match current_temp {
            Some(temp) => (temp - state.set_temp).render(disp, marker),
            None => render_status(disp, Status::NoReading),
        },
        Screen::TargetTemp => state.set_temp.render(disp, marker),
        Screen::Hyster => state.hyster_dia.render(disp, marker),
        Screen::Bright => state.display_brightness.render(disp, marker),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::traits::DisplayError;
    use heapless::String;

    /// Display that records everything printed since the last clear
    #[derive(Debug, Default)]
    pub(crate) struct TextDisplay {
        pub text: String<32>,
        pub right_aligned: String<32>,
        pub brightness: Option<u8>,
        pub align: bool,
        pub refreshes: u32,
    }

    impl DisplaySink for TextDisplay {
        fn width(&self) -> u8 {
            4
        }

        fn clear(&mut self) {
            self.text.clear();
            self.right_aligned.clear();
        }

        fn set_cursor(&mut self, _pos: u8) {}

        fn print_str(&mut self, text: &str) {
            self.text.push_str(text).unwrap();
            if self.align {
                self.right_aligned.push_str(text).unwrap();
            }
        }

        fn set_right_align(&mut self, on: bool) {
            self.align = on;
        }

        fn set_brightness(&mut self, level: u8) {
            self.brightness = Some(level);
        }

        fn refresh(&mut self) -> Result<(), DisplayError> {
            self.refreshes += 1;
            Ok(())
        }
    }

    fn shown(state: &DeviceState, temp: Option<f32>) -> String<32> {
        let mut disp = TextDisplay::default();
        render_screen(&mut disp, state, temp);
        disp.text
    }

    fn on(screen: Screen) -> DeviceState {
        DeviceState {
            screen,
            ..DeviceState::DEFAULT
        }
    }

    #[test]
    fn test_digit_counts() {
        assert_eq!(7u8.digit_count(), 1);
        assert_eq!(255u8.digit_count(), 3);
        assert_eq!(25.0f32.digit_count(), 2);
        assert_eq!(9.99f32.digit_count(), 1);
        assert_eq!((-0.3f32).digit_count(), 2);
        assert_eq!((-12.5f32).digit_count(), 3);
    }

    #[test]
    fn test_room_temp() {
        assert_eq!(shown(&on(Screen::RoomTemp), Some(25.0)), "c25.0");
        assert_eq!(shown(&on(Screen::RoomTemp), Some(8.25)), "c8.25");
    }

    #[test]
    fn test_no_sample_yet() {
        assert_eq!(shown(&on(Screen::RoomTemp), None), "----");
        assert_eq!(shown(&on(Screen::Delta), None), "----");
    }

    #[test]
    fn test_delta_negative() {
        let state = on(Screen::Delta);
        assert_eq!(shown(&state, Some(24.7)), "d-0.3");
        assert_eq!(shown(&state, Some(26.0)), "d1.00");
    }

    #[test]
    fn test_editable_screens_render_once() {
        assert_eq!(shown(&on(Screen::TargetTemp), Some(20.0)), "t25.0");
        assert_eq!(shown(&on(Screen::Hyster), Some(20.0)), "h0.20");
        assert_eq!(shown(&on(Screen::Bright), Some(20.0)), "b5");
    }

    #[test]
    fn test_brightness_right_aligned() {
        let mut disp = TextDisplay::default();
        render_screen(&mut disp, &on(Screen::Bright), None);
        assert_eq!(disp.right_aligned, "5");
        assert!(!disp.align);
    }

    #[test]
    fn test_wide_values_drop_decimals_then_marker() {
        let mut disp = TextDisplay::default();
        123.4f32.render(&mut disp, 'c');
        assert_eq!(disp.text, "c123");

        let mut disp = TextDisplay::default();
        (-123.0f32).render(&mut disp, 'd');
        assert_eq!(disp.text, "-123");
    }

    #[test]
    fn test_status_text() {
        let mut disp = TextDisplay::default();
        disp.print_str("junk");
        render_status(&mut disp, Status::Overheat);
        assert_eq!(disp.text, "ovh");
        assert_eq!(Status::SensorError.text(), "-sen");
        assert_eq!(Status::Reset.text(), "rst");
    }
}
