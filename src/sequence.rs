//! Persisted sequence counter.
//!
//! Every gesture gets the next number, so receivers can drop the copies
//! they already saw during a replay.  The value survives power cycles
//! through a [`CounterStore`]; on the device that is a flash record
//! managed by `sequential-storage` (see `storage.rs` in the binary).
//!
//! The counter wraps on overflow.  Receivers use it as an ordering hint,
//! not as a security token.

use crate::error::Error;

/// Durable home of the counter.
///
/// `write` may stage the value; only `commit` has to make it durable.
#[allow(async_fn_in_trait)]
pub trait CounterStore {
    /// Last committed value, `None` if nothing was ever stored.
    async fn read(&mut self) -> Result<Option<u32>, Error>;

    async fn write(&mut self, value: u32) -> Result<(), Error>;

    async fn commit(&mut self) -> Result<(), Error>;
}

/// Monotonic (modulo 2^32) counter over a [`CounterStore`].
pub struct SequenceCounter<S> {
    store: S,
    /// Last value handed out during this boot.
    cached: Option<u32>,
    /// Values handed out while the stored value was unknown.
    unanchored: u32,
}

impl<S: CounterStore> SequenceCounter<S> {
    pub const fn new(store: S) -> Self {
        Self {
            store,
            cached: None,
            unanchored: 0,
        }
    }

    /// Load, increment and persist the counter, returning the new value.
    ///
    /// Storage trouble never swallows a gesture: a failed read falls back
    /// to the value cached this boot and a failed write is only logged.
    /// Without a cached value a failed read hands out a provisional number
    /// that is never persisted, so the stored counter cannot go backwards.
    pub async fn next_sequence(&mut self) -> u32 {
        let current = match self.store.read().await {
            Ok(stored) => stored.unwrap_or(0),
            Err(_) => match self.cached {
                Some(cached) => {
                    warn!("Sequence: read failed, continuing from cached value");
                    cached
                }
                None => {
                    self.unanchored = self.unanchored.wrapping_add(1);
                    warn!("Sequence: read failed before first load, {} not persisted", self.unanchored);
                    return self.unanchored;
                }
            },
        };

        let next = current.wrapping_add(1);
        if let Err(e) = self.persist(next).await {
            error!("Sequence: could not persist {}: {}", next, e);
        }

        self.cached = Some(next);
        debug!("Sequence: {}", next);
        next
    }

    async fn persist(&mut self, value: u32) -> Result<(), Error> {
        self.store.write(value).await?;
        self.store.commit().await
    }

    /// Last value handed out since boot.
    pub fn cached(&self) -> Option<u32> {
        self.cached
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
