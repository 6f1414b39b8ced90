//! Seven-segment display drivers
//!
//! [`SegmentDisplay`] turns text into segment patterns and implements the
//! core display trait; a [`SegmentBus`] pushes the patterns to a chip.

pub mod segment;
pub mod tm1637;

pub use segment::{SegmentBus, SegmentDisplay, DIGITS};
pub use tm1637::Tm1637;
