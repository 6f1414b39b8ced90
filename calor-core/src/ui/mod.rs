//! User interface logic
//!
//! Encoder-driven value editing and screen rendering. Both are pure with
//! respect to the device state: editing returns a new value and rendering
//! only writes into a [`DisplaySink`](crate::traits::DisplaySink).

pub mod editor;
pub mod render;

pub use editor::{adjust, adjust_default, Adjustable};
pub use render::{render_screen, render_status, Renderable, Status};
