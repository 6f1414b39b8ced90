//! Rotary encoder input trait

/// Rotary encoder with a push button
///
/// The driver owns debouncing and edge detection. After each
/// [`tick`](Self::tick) the query methods describe what happened during
/// that tick; the results are valid until the next `tick`.
pub trait EncoderInput {
    /// Sample the hardware and latch this tick's events
    ///
    /// `elapsed_ms` is the time since the previous call; drivers use it for
    /// button debounce and click/hold timing.
    fn tick(&mut self, elapsed_ms: u32);

    /// A detent was passed during the last tick
    fn turned(&self) -> bool;

    /// Direction of the last turn: -1, 0 or +1
    fn direction(&self) -> i8;

    /// Button is currently held down (debounced)
    fn is_pressed(&self) -> bool;

    /// A short press was released during the last tick
    ///
    /// A click is distinct from press-and-hold: holds and presses that
    /// were used to turn in fast mode do not produce a click.
    fn clicked(&self) -> bool;
}
