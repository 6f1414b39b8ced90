//! Calor Hardware Abstraction Layer
//!
//! This crate defines the storage abstraction that chip-specific code
//! implements. The control logic in `calor-core` only ever sees these
//! traits, so the same settings code runs against real EEPROM, flash
//! emulation on the RP2040, or a RAM buffer in host tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (calor-firmware)           │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  calor-core (control loop, settings)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  calor-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`storage::NonVolatileStore`] - Byte-addressed persistent storage

#![no_std]
#![deny(unsafe_code)]

pub mod storage;

// Re-export key types at crate root for convenience
pub use storage::{MemoryStore, NonVolatileStore, StorageError, StorageKey};
