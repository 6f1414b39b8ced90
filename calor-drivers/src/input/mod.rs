//! Input device drivers

pub mod encoder;

pub use encoder::Encoder;
