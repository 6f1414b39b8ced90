//! Persistent storage abstractions
//!
//! The settings layout is byte-addressed, EEPROM style: address 0 holds a
//! validity sentinel and the serialized settings record starts at address 1.
//! Targets without a real EEPROM emulate one (see [`StorageKey`]).

/// Errors from storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Address (or address + length) lies outside the store
    OutOfBounds,
    /// Underlying medium reported a failure
    Device,
}

/// Byte-addressed non-volatile store
///
/// Implementations decide how writes reach the medium. An EEPROM writes
/// through; a flash emulation may buffer and commit later.
pub trait NonVolatileStore {
    /// Total number of addressable bytes
    fn capacity(&self) -> u16;

    /// Read a single byte
    fn read_byte(&mut self, addr: u16) -> Result<u8, StorageError>;

    /// Write a single byte
    fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), StorageError>;

    /// Fill `buffer` with the bytes starting at `addr`
    fn read(&mut self, addr: u16, buffer: &mut [u8]) -> Result<(), StorageError> {
        check_range(addr, buffer.len(), self.capacity())?;
        for (offset, byte) in buffer.iter_mut().enumerate() {
            *byte = self.read_byte(addr + offset as u16)?;
        }
        Ok(())
    }

    /// Write `data` starting at `addr`
    fn write(&mut self, addr: u16, data: &[u8]) -> Result<(), StorageError> {
        check_range(addr, data.len(), self.capacity())?;
        for (offset, byte) in data.iter().enumerate() {
            self.write_byte(addr + offset as u16, *byte)?;
        }
        Ok(())
    }
}

fn check_range(addr: u16, len: usize, capacity: u16) -> Result<(), StorageError> {
    if addr as usize + len > capacity as usize {
        return Err(StorageError::OutOfBounds);
    }
    Ok(())
}

/// In-RAM byte store
///
/// Starts out erased (every byte 0xFF), like a fresh EEPROM. Used as the
/// working image of flash-emulated EEPROM and as the store in host tests.
#[derive(Debug, Clone)]
pub struct MemoryStore<const N: usize> {
    bytes: [u8; N],
    dirty: bool,
    writes: u32,
}

impl<const N: usize> Default for MemoryStore<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> MemoryStore<N> {
    /// Create an erased store
    pub const fn new() -> Self {
        Self {
            bytes: [0xFF; N],
            dirty: false,
            writes: 0,
        }
    }

    /// Raw contents
    pub fn image(&self) -> &[u8; N] {
        &self.bytes
    }

    /// Replace the contents without marking the store dirty
    pub fn load_image(&mut self, image: &[u8]) {
        let len = image.len().min(N);
        self.bytes[..len].copy_from_slice(&image[..len]);
    }

    /// Whether any byte changed since the last [`mark_clean`](Self::mark_clean)
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Forget pending changes (after they were committed elsewhere)
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Number of byte writes that actually changed a value
    ///
    /// Unchanged bytes are skipped, as EEPROM `update` does, so this is the
    /// wear the store would have taken.
    pub fn write_count(&self) -> u32 {
        self.writes
    }
}

impl<const N: usize> NonVolatileStore for MemoryStore<N> {
    fn capacity(&self) -> u16 {
        N.min(u16::MAX as usize) as u16
    }

    fn read_byte(&mut self, addr: u16) -> Result<u8, StorageError> {
        self.bytes
            .get(addr as usize)
            .copied()
            .ok_or(StorageError::OutOfBounds)
    }

    fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), StorageError> {
        let slot = self
            .bytes
            .get_mut(addr as usize)
            .ok_or(StorageError::OutOfBounds)?;
        if *slot != value {
            *slot = value;
            self.dirty = true;
            self.writes = self.writes.saturating_add(1);
        }
        Ok(())
    }
}

/// Keys for flash-backed storage
///
/// On targets that emulate EEPROM in flash, the whole byte image is kept
/// as one item of a wear-levelled key-value map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StorageKey {
    /// Emulated EEPROM image
    EepromImage = 0,
}

impl StorageKey {
    /// Get the key as a byte value
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create a key from a byte value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(StorageKey::EepromImage),
            _ => None,
        }
    }
}

// Implement the sequential-storage Key trait when the feature is enabled
#[cfg(feature = "sequential-storage")]
impl sequential_storage::map::Key for StorageKey {
    fn serialize_into(
        &self,
        buffer: &mut [u8],
    ) -> Result<usize, sequential_storage::map::SerializationError> {
        if buffer.is_empty() {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        }
        buffer[0] = self.as_u8();
        Ok(1)
    }

    fn deserialize_from(
        buffer: &[u8],
    ) -> Result<(Self, usize), sequential_storage::map::SerializationError> {
        if buffer.is_empty() {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        }
        match StorageKey::from_u8(buffer[0]) {
            Some(key) => Ok((key, 1)),
            None => Err(sequential_storage::map::SerializationError::InvalidFormat),
        }
    }
}
