//! Persistent storage for the sequence counter.
//!
//! Uses the nRF52840's internal flash via the `sequential-storage` crate
//! so the counter survives power cycles.
//!
//! Storage layout:
//!   - One map item under `SEQUENCE_KEY`: the counter as 4 bytes, LSB first.
//!   - Every commit appends a new copy; `sequential-storage` handles wear
//!     levelling and garbage collection across the reserved pages.

use defmt::{debug, error};
use embedded_storage_async::nor_flash::NorFlash;
use wizmote::config::{SEQUENCE_KEY, STORAGE_FLASH_PAGE_COUNT, STORAGE_FLASH_PAGE_START};
use wizmote::sequence::CounterStore;
use wizmote::Error;

/// Flash page size for nRF52840 (4 KB).
const FLASH_PAGE_SIZE: u32 = 4096;

/// Start address of our storage region.
const STORAGE_START: u32 = STORAGE_FLASH_PAGE_START * FLASH_PAGE_SIZE;

/// End address (exclusive) of our storage region.
const STORAGE_END: u32 = (STORAGE_FLASH_PAGE_START + STORAGE_FLASH_PAGE_COUNT) * FLASH_PAGE_SIZE;

/// Scratch buffer for `sequential-storage` (item header + key + value, word aligned).
const SCRATCH_SIZE: usize = 32;

/// Counter record in flash; `write` stages, `commit` stores.
pub struct FlashCounterStore<F> {
    flash: F,
    staged: Option<u32>,
}

impl<F: NorFlash> FlashCounterStore<F> {
    pub const fn new(flash: F) -> Self {
        Self { flash, staged: None }
    }
}

impl<F: NorFlash> CounterStore for FlashCounterStore<F> {
    async fn read(&mut self) -> Result<Option<u32>, Error> {
        let mut buf = [0u8; SCRATCH_SIZE];

        match sequential_storage::map::fetch_item::<u8, &[u8], _>(
            &mut self.flash,
            STORAGE_START..STORAGE_END,
            &mut sequential_storage::cache::NoCache::new(),
            &mut buf,
            &SEQUENCE_KEY,
        )
        .await
        {
            Ok(Some(data)) if data.len() == 4 => {
                Ok(Some(u32::from_le_bytes([data[0], data[1], data[2], data[3]])))
            }
            Ok(Some(data)) => {
                error!("Counter record has {} bytes, ignoring", data.len());
                Ok(None)
            }
            Ok(None) => {
                debug!("No counter in flash yet");
                Ok(None)
            }
            Err(e) => {
                error!("Flash read error: {:?}", defmt::Debug2Format(&e));
                Err(Error::Storage)
            }
        }
    }

    async fn write(&mut self, value: u32) -> Result<(), Error> {
        self.staged = Some(value);
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), Error> {
        let Some(value) = self.staged.take() else {
            return Ok(());
        };

        let mut buf = [0u8; SCRATCH_SIZE];
        let bytes = value.to_le_bytes();
        let item: &[u8] = &bytes;

        match sequential_storage::map::store_item::<u8, &[u8], _>(
            &mut self.flash,
            STORAGE_START..STORAGE_END,
            &mut sequential_storage::cache::NoCache::new(),
            &mut buf,
            &SEQUENCE_KEY,
            &item,
        )
        .await
        {
            Ok(()) => {
                debug!("Saved counter {} to flash", value);
                Ok(())
            }
            Err(e) => {
                error!("Flash write error: {:?}", defmt::Debug2Format(&e));
                Err(Error::Storage)
            }
        }
    }
}
