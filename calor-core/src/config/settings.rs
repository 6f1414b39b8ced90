//! Persisted settings record
//!
//! Storage layout (byte addresses in a [`NonVolatileStore`]):
//!
//! ```text
//! 0        sentinel: 255 = nothing stored, 1 = record present
//! 1..      postcard-encoded SettingsRecord
//! ```
//!
//! The record carries a magic number, a format version and a CRC32 so that
//! a half-written or foreign image is rejected instead of restored.

use calor_hal::{NonVolatileStore, StorageError};
use serde::{Deserialize, Serialize};

use crate::state::{DeviceState, Screen};

/// Magic number identifying a settings record ("CL")
pub const SETTINGS_MAGIC: u16 = 0x434C;

/// Current settings record version
pub const SETTINGS_VERSION: u8 = 1;

/// Address of the validity sentinel
pub const SENTINEL_ADDR: u16 = 0;

/// Address the record starts at
pub const RECORD_ADDR: u16 = 1;

/// Sentinel value meaning "no settings stored"
pub const SENTINEL_EMPTY: u8 = 255;

/// Sentinel value written alongside a record
pub const SENTINEL_VALID: u8 = 1;

/// Bytes reserved for the encoded record
pub const RECORD_CAPACITY: usize = 32;

/// Bytes of store the settings occupy
pub const SETTINGS_FOOTPRINT: u16 = RECORD_ADDR + RECORD_CAPACITY as u16;

/// Errors from loading or saving settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    /// Byte store failed
    Storage(StorageError),
    /// Sentinel says nothing is stored
    NoData,
    /// Record did not fit the reserved area
    Serialize,
    /// Stored bytes are not a record
    Deserialize,
    /// Record belongs to something else
    BadMagic,
    /// Record was written by an incompatible format version
    BadVersion(u8),
    /// Record contents do not match their checksum
    CrcMismatch,
}

impl From<StorageError> for SettingsError {
    fn from(e: StorageError) -> Self {
        SettingsError::Storage(e)
    }
}

/// On-storage form of [`DeviceState`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SettingsRecord {
    /// Magic number for validation
    pub magic: u16,
    /// Record format version
    pub version: u8,
    /// The settings themselves
    pub state: DeviceState,
    /// CRC32 over magic, version and state
    pub crc: u32,
}

impl SettingsRecord {
    /// Wrap `state` in a record with a valid header and checksum
    pub fn new(state: DeviceState) -> Self {
        let mut record = Self {
            magic: SETTINGS_MAGIC,
            version: SETTINGS_VERSION,
            state,
            crc: 0,
        };
        record.crc = record.calculate_crc();
        record
    }

    /// Calculate CRC32 over everything except the crc field
    ///
    /// Floats are hashed by bit pattern so the check is exact.
    pub fn calculate_crc(&self) -> u32 {
        let mut crc: u32 = 0xFFFFFFFF;
        crc = crc32_update(crc, &self.magic.to_le_bytes());
        crc = crc32_update(crc, &[self.version]);
        crc = crc32_update(crc, &[screen_index(self.state.screen)]);
        crc = crc32_update(crc, &[self.state.display_brightness]);
        crc = crc32_update(crc, &self.state.hyster_dia.to_bits().to_le_bytes());
        crc = crc32_update(crc, &self.state.set_temp.to_bits().to_le_bytes());
        !crc
    }

    /// Check magic, version and checksum
    pub fn verify(&self) -> Result<(), SettingsError> {
        if self.magic != SETTINGS_MAGIC {
            return Err(SettingsError::BadMagic);
        }
        if self.version != SETTINGS_VERSION {
            return Err(SettingsError::BadVersion(self.version));
        }
        if self.crc != self.calculate_crc() {
            return Err(SettingsError::CrcMismatch);
        }
        Ok(())
    }
}

fn screen_index(screen: Screen) -> u8 {
    match screen {
        Screen::RoomTemp => 0,
        Screen::Delta => 1,
        Screen::TargetTemp => 2,
        Screen::Hyster => 3,
        Screen::Bright => 4,
    }
}

/// Simple CRC32 update function (IEEE 802.3 polynomial)
fn crc32_update(crc: u32, data: &[u8]) -> u32 {
    const POLY: u32 = 0xEDB88320;
    let mut crc = crc;

    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ POLY;
            } else {
                crc >>= 1;
            }
        }
    }

    crc
}

/// Fail if the store cannot hold the sentinel plus a full record
fn check_capacity<S: NonVolatileStore>(store: &S) -> Result<(), SettingsError> {
    if store.capacity() < SETTINGS_FOOTPRINT {
        return Err(SettingsError::Storage(StorageError::OutOfBounds));
    }
    Ok(())
}

/// Check whether the sentinel claims stored settings
pub fn has_settings<S: NonVolatileStore>(store: &mut S) -> Result<bool, SettingsError> {
    Ok(store.read_byte(SENTINEL_ADDR)? != SENTINEL_EMPTY)
}

/// Read and verify the stored settings
///
/// Values are returned exactly as stored; clamping them into the current
/// limits is up to the caller.
pub fn load_settings<S: NonVolatileStore>(store: &mut S) -> Result<DeviceState, SettingsError> {
    check_capacity(store)?;
    if !has_settings(store)? {
        return Err(SettingsError::NoData);
    }

    let mut buf = [0u8; RECORD_CAPACITY];
    store.read(RECORD_ADDR, &mut buf)?;

    let record: SettingsRecord =
        postcard::from_bytes(&buf).map_err(|_| SettingsError::Deserialize)?;
    record.verify()?;
    Ok(record.state)
}

/// Store `state` and mark the record valid
///
/// The record is written before the sentinel. Unchanged bytes are left
/// alone by stores that skip redundant writes. A store smaller than
/// [`SETTINGS_FOOTPRINT`] is rejected before anything is written, so a
/// save never succeeds where the matching load would fail.
pub fn save_settings<S: NonVolatileStore>(
    store: &mut S,
    state: &DeviceState,
) -> Result<(), SettingsError> {
    check_capacity(store)?;
    let record = SettingsRecord::new(*state);
    let mut buf = [0u8; RECORD_CAPACITY];
    let used = postcard::to_slice(&record, &mut buf).map_err(|_| SettingsError::Serialize)?;
    store.write(RECORD_ADDR, used)?;
    store.write_byte(SENTINEL_ADDR, SENTINEL_VALID)?;
    Ok(())
}

/// Invalidate stored settings so the next boot uses defaults
pub fn erase_settings<S: NonVolatileStore>(store: &mut S) -> Result<(), SettingsError> {
    store.write_byte(SENTINEL_ADDR, SENTINEL_EMPTY)?;
    Ok(())
}
