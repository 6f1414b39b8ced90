//! Flash-backed EEPROM emulation for RP2040
//!
//! The RP2040 has no EEPROM. The settings code works on a RAM
//! [`MemoryStore`] image; this module loads that image from flash at
//! startup and commits it back whenever it has changed. The image is
//! stored as a single item of a sequential-storage map, which spreads the
//! wear over the last two flash sectors.

use core::ops::Range;

use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use sequential_storage::cache::NoCache;
use sequential_storage::map;

use calor_hal::{MemoryStore, StorageError, StorageKey};

/// Size of the emulated EEPROM (bytes)
pub const EEPROM_SIZE: usize = 64;

/// RAM image the control loop reads and writes
pub type EepromImage = MemoryStore<EEPROM_SIZE>;

/// 2MB flash on the Pico
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Two sectors at the end of flash; memory.x keeps the program out of them
pub const STORAGE_SIZE: usize = 2 * ERASE_SIZE;

const STORAGE_RANGE: Range<u32> = ((FLASH_SIZE - STORAGE_SIZE) as u32)..(FLASH_SIZE as u32);

/// Item plus map bookkeeping
const ITEM_BUFFER_SIZE: usize = EEPROM_SIZE + 32;

/// Emulated EEPROM in on-board flash
pub struct FlashEeprom<'d> {
    flash: Flash<'d, FLASH, Async, FLASH_SIZE>,
}

impl<'d> FlashEeprom<'d> {
    /// Create the flash driver
    pub fn new(flash: Peri<'d, FLASH>, dma: Peri<'d, impl Channel>) -> Self {
        Self {
            flash: Flash::new(flash, dma),
        }
    }

    /// Read the stored image
    ///
    /// An empty map yields an erased image, exactly what a fresh EEPROM
    /// would hold.
    pub async fn load(&mut self) -> Result<EepromImage, StorageError> {
        let mut buffer = [0u8; ITEM_BUFFER_SIZE];
        let mut image = EepromImage::new();

        let result = map::fetch_item::<StorageKey, &[u8], _>(
            &mut self.flash,
            STORAGE_RANGE,
            &mut NoCache::new(),
            &mut buffer,
            &StorageKey::EepromImage,
        )
        .await;

        match result {
            Ok(Some(data)) => {
                image.load_image(data);
                Ok(image)
            }
            Ok(None) => Ok(image),
            Err(_) => Err(StorageError::Device),
        }
    }

    /// Write the image to flash and mark it clean
    pub async fn commit(&mut self, image: &mut EepromImage) -> Result<(), StorageError> {
        let mut buffer = [0u8; ITEM_BUFFER_SIZE];
        let data: &[u8] = image.image();

        map::store_item(
            &mut self.flash,
            STORAGE_RANGE,
            &mut NoCache::new(),
            &mut buffer,
            &StorageKey::EepromImage,
            &data,
        )
        .await
        .map_err(|_| StorageError::Device)?;

        image.mark_clean();
        Ok(())
    }
}
