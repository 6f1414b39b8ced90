//! Rotary encoder with push button
//!
//! Polled quadrature decoder with noise rejection, plus a debounced
//! active-low button. Must be ticked often (every 1-5ms) or detents are
//! missed.

use calor_core::traits::EncoderInput;
use embedded_hal::digital::InputPin;

/// Time the button level must be stable before it is accepted
pub const DEBOUNCE_MS: u32 = 20;

/// Presses held at least this long are holds, not clicks
pub const HOLD_MS: u32 = 500;

/// Quadrature decoder states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    CwStep1,
    CwStep2,
    CcwStep1,
    CcwStep2,
}

/// Rotary encoder on three GPIO inputs
///
/// Channels and button are expected to idle high (pull-ups). Clockwise
/// turns report +1.
pub struct Encoder<A, B, BTN> {
    a: A,
    b: B,
    button: BTN,
    state: State,
    last_a: bool,
    last_b: bool,
    /// Raw button level seen on the last tick
    raw_pressed: bool,
    /// How long the raw level has been unchanged
    stable_ms: u32,
    pressed: bool,
    held_ms: u32,
    /// Current press will not produce a click
    suppress_click: bool,
    steps: i8,
    clicked: bool,
}

impl<A, B, BTN> Encoder<A, B, BTN>
where
    A: InputPin,
    B: InputPin,
    BTN: InputPin,
{
    /// Create the decoder from the current pin levels
    ///
    /// A button already held at construction counts as pressed right away
    /// and its release does not click.
    pub fn new(mut a: A, mut b: B, mut button: BTN) -> Self {
        let last_a = a.is_high().unwrap_or(true);
        let last_b = b.is_high().unwrap_or(true);
        let held = button.is_low().unwrap_or(false);

        Self {
            a,
            b,
            button,
            state: State::Idle,
            last_a,
            last_b,
            raw_pressed: held,
            stable_ms: 0,
            pressed: held,
            held_ms: 0,
            suppress_click: held,
            steps: 0,
            clicked: false,
        }
    }

    /// Decode one change of the channel levels
    ///
    /// Quadrature encoding:
    /// CW:  A leads B (A changes first when rotating clockwise)
    /// CCW: B leads A (B changes first when rotating counter-clockwise)
    ///
    /// CW:  Idle (1,1) -> CwStep1 (0,1) -> CwStep2 (0,0) -> +1 on either rising
    /// CCW: Idle (1,1) -> CcwStep1 (1,0) -> CcwStep2 (0,0) -> -1 on either rising
    fn decode(&mut self, a: bool, b: bool) -> i8 {
        match self.state {
            State::Idle => {
                if !a && b {
                    self.state = State::CwStep1;
                } else if a && !b {
                    self.state = State::CcwStep1;
                }
                0
            }
            State::CwStep1 | State::CcwStep1 => {
                if !a && !b {
                    self.state = if self.state == State::CwStep1 {
                        State::CwStep2
                    } else {
                        State::CcwStep2
                    };
                } else if a && b {
                    // Bounce
                    self.state = State::Idle;
                }
                0
            }
            State::CwStep2 if a || b => {
                self.state = State::Idle;
                1
            }
            State::CcwStep2 if a || b => {
                self.state = State::Idle;
                -1
            }
            State::CwStep2 | State::CcwStep2 => 0,
        }
    }

    fn poll_rotation(&mut self) {
        let a = self.a.is_high().unwrap_or(self.last_a);
        let b = self.b.is_high().unwrap_or(self.last_b);

        if a == self.last_a && b == self.last_b {
            return;
        }

        let step = self.decode(a, b);
        self.steps = self.steps.saturating_add(step);
        self.last_a = a;
        self.last_b = b;
    }

    fn poll_button(&mut self, elapsed_ms: u32) {
        let raw = self.button.is_low().unwrap_or(self.raw_pressed);
        if raw != self.raw_pressed {
            self.raw_pressed = raw;
            self.stable_ms = 0;
        } else {
            self.stable_ms = self.stable_ms.saturating_add(elapsed_ms);
        }

        if self.stable_ms >= DEBOUNCE_MS && raw != self.pressed {
            self.pressed = raw;
            if raw {
                self.held_ms = 0;
                self.suppress_click = false;
            } else {
                self.clicked = !self.suppress_click;
                self.suppress_click = false;
            }
            return;
        }

        if self.pressed {
            self.held_ms = self.held_ms.saturating_add(elapsed_ms);
            if self.held_ms >= HOLD_MS {
                self.suppress_click = true;
            }
        }
    }
}

impl<A, B, BTN> EncoderInput for Encoder<A, B, BTN>
where
    A: InputPin,
    B: InputPin,
    BTN: InputPin,
{
    fn tick(&mut self, elapsed_ms: u32) {
        self.steps = 0;
        self.clicked = false;

        self.poll_rotation();
        self.poll_button(elapsed_ms);

        if self.pressed && self.steps != 0 {
            self.suppress_click = true;
        }
    }

    fn turned(&self) -> bool {
        self.steps != 0
    }

    fn direction(&self) -> i8 {
        self.steps.signum()
    }

    fn is_pressed(&self) -> bool {
        self.pressed
    }

    fn clicked(&self) -> bool {
        self.clicked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    struct Pin<'a>(&'a Cell<bool>);

    impl ErrorType for Pin<'_> {
        type Error = Infallible;
    }

    impl InputPin for Pin<'_> {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.0.get())
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.0.get())
        }
    }

    struct Lines {
        a: Cell<bool>,
        b: Cell<bool>,
        btn: Cell<bool>,
    }

    impl Lines {
        fn idle() -> Self {
            Self {
                a: Cell::new(true),
                b: Cell::new(true),
                btn: Cell::new(true),
            }
        }

        fn encoder(&self) -> TestEncoder<'_> {
            Encoder::new(Pin(&self.a), Pin(&self.b), Pin(&self.btn))
        }
    }

    type TestEncoder<'a> = Encoder<Pin<'a>, Pin<'a>, Pin<'a>>;

    /// Walk the channels through `levels`, ticking after each
    fn turn(lines: &Lines, enc: &mut TestEncoder<'_>, levels: &[(bool, bool)]) -> i32 {
        let mut total = 0;
        for &(a, b) in levels {
            lines.a.set(a);
            lines.b.set(b);
            enc.tick(2);
            if enc.turned() {
                total += i32::from(enc.direction());
            }
        }
        total
    }

    const CW: [(bool, bool); 4] = [(false, true), (false, false), (true, false), (true, true)];
    const CCW: [(bool, bool); 4] = [(true, false), (false, false), (false, true), (true, true)];

    fn press(lines: &Lines, enc: &mut TestEncoder<'_>, pressed: bool) {
        lines.btn.set(!pressed);
        enc.tick(2);
        enc.tick(DEBOUNCE_MS);
    }

    #[test]
    fn test_clockwise_detent() {
        let lines = Lines::idle();
        let mut enc = lines.encoder();
        assert_eq!(turn(&lines, &mut enc, &CW), 1);
    }

    #[test]
    fn test_counter_clockwise_detent() {
        let lines = Lines::idle();
        let mut enc = lines.encoder();
        assert_eq!(turn(&lines, &mut enc, &CCW), -1);
        assert_eq!(turn(&lines, &mut enc, &CCW), -1);
    }

    #[test]
    fn test_bounce_is_rejected() {
        let lines = Lines::idle();
        let mut enc = lines.encoder();
        let bounce = [(false, true), (true, true), (false, true), (true, true)];
        assert_eq!(turn(&lines, &mut enc, &bounce), 0);
    }

    #[test]
    fn test_turn_is_latched_for_one_tick() {
        let lines = Lines::idle();
        let mut enc = lines.encoder();
        turn(&lines, &mut enc, &CW[..3]);
        assert!(enc.turned());
        enc.tick(2);
        assert!(!enc.turned());
        assert_eq!(enc.direction(), 0);
    }

    #[test]
    fn test_short_press_clicks() {
        let lines = Lines::idle();
        let mut enc = lines.encoder();

        press(&lines, &mut enc, true);
        assert!(enc.is_pressed());
        assert!(!enc.clicked());

        press(&lines, &mut enc, false);
        assert!(!enc.is_pressed());
        assert!(enc.clicked());

        enc.tick(2);
        assert!(!enc.clicked());
    }

    #[test]
    fn test_glitch_is_debounced() {
        let lines = Lines::idle();
        let mut enc = lines.encoder();

        lines.btn.set(false);
        enc.tick(2);
        enc.tick(5);
        lines.btn.set(true);
        enc.tick(2);
        enc.tick(DEBOUNCE_MS);
        assert!(!enc.is_pressed());
        assert!(!enc.clicked());
    }

    #[test]
    fn test_hold_does_not_click() {
        let lines = Lines::idle();
        let mut enc = lines.encoder();

        press(&lines, &mut enc, true);
        enc.tick(HOLD_MS);
        press(&lines, &mut enc, false);
        assert!(!enc.clicked());
    }

    #[test]
    fn test_turn_while_pressed_does_not_click() {
        let lines = Lines::idle();
        let mut enc = lines.encoder();

        press(&lines, &mut enc, true);
        assert_eq!(turn(&lines, &mut enc, &CW), 1);
        assert!(enc.is_pressed());

        press(&lines, &mut enc, false);
        assert!(!enc.clicked());
    }

    #[test]
    fn test_press_held_at_boot() {
        let lines = Lines::idle();
        lines.btn.set(false);
        let mut enc = lines.encoder();

        enc.tick(0);
        assert!(enc.is_pressed());

        press(&lines, &mut enc, false);
        assert!(!enc.is_pressed());
        assert!(!enc.clicked());
    }
}
