//! Configuration types
//!
//! Compile-time limits and defaults, the runtime controller configuration,
//! and the postcard record the settings are persisted as.

pub mod settings;
pub mod types;

pub use settings::*;
pub use types::*;
