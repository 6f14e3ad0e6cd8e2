//! Per-channel message cache.
//!
//! [`MessageCache`] groups records by channel id and keeps the most recent
//! `capacity` records of each channel in a [`RingBuffer`](crate::ds::RingBuffer).
//!
//! ## Architecture
//!
//! ```text
//!   insert("general", msg)
//!        │
//!        ▼
//!   ┌───────────────────────────────┐   read lock: lookup
//!   │ KeyDirectory                  │   write lock: create (double-checked)
//!   │  "general" → Arc<RwLock<..>>  │   released before the buffer is locked
//!   │  "random"  → Arc<RwLock<..>>  │
//!   └──────────────┬────────────────┘
//!                  │ Arc clone
//!                  ▼
//!   ┌───────────────────────────────┐   write lock: insert / batch / clear / resize
//!   │ RingBuffer ("general")        │   read lock:  fetch_all / fetch_limit / view
//!   └───────────────────────────────┘
//! ```
//!
//! The directory lock and a buffer lock are never held together, so
//! operations on different channels only contend on the brief directory
//! lookup. The default capacity for new channels lives in an atomic and is
//! read without locking.
//!
//! ## Example Usage
//!
//! ```
//! use std::sync::Arc;
//!
//! use chancache::cache::MessageCache;
//! use chancache::error::CacheError;
//! use chancache::record::{Message, Record};
//!
//! let cache = MessageCache::new(3);
//! for id in ["0", "1", "2", "3", "4"] {
//!     cache.insert_record("general", Message::new(id, "hi")).unwrap();
//! }
//!
//! let ids: Vec<_> = cache
//!     .fetch_all("general")
//!     .unwrap()
//!     .iter()
//!     .map(|m| m.id().to_owned())
//!     .collect();
//! assert_eq!(ids, ["2", "3", "4"]);
//!
//! assert_eq!(cache.insert("general", None), Err(CacheError::NilMessage));
//! assert_eq!(cache.fetch_all("random").unwrap_err(), CacheError::CacheMiss);
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::builder::CacheBuilder;
use crate::directory::{KeyDirectory, SharedBuffer};
use crate::ds::Insertion;
use crate::error::{CacheError, Result};
#[cfg(feature = "metrics")]
use crate::metrics::{CacheCounters, CacheMetricsSnapshot};
use crate::record::{Message, Record};
use crate::view::SnapshotView;

/// Capacity used when none (or zero) is given.
pub const DEFAULT_CAPACITY: usize = 100;

/// Concurrent cache of the most recent records per channel.
pub struct MessageCache<R = Message> {
    directory: KeyDirectory<R>,
    default_capacity: AtomicUsize,
    // serializes capacity changes so buffers and default agree
    resize_lock: Mutex<()>,
    #[cfg(feature = "metrics")]
    metrics: CacheCounters,
}

#[inline]
fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidChannel);
    }
    Ok(())
}

impl<R: Record> MessageCache<R> {
    /// Creates a cache keeping `capacity` records per channel.
    ///
    /// A zero capacity is not an error: [`DEFAULT_CAPACITY`] is used instead.
    pub fn new(capacity: usize) -> Self {
        CacheBuilder::new(capacity).build()
    }

    pub(crate) fn from_parts(capacity: usize, key_capacity_hint: usize) -> Self {
        debug_assert!(capacity > 0);
        Self {
            directory: KeyDirectory::with_capacity(key_capacity_hint),
            default_capacity: AtomicUsize::new(capacity),
            resize_lock: Mutex::new(()),
            #[cfg(feature = "metrics")]
            metrics: CacheCounters::default(),
        }
    }

    /// Returns the capacity applied to channels, including ones created later.
    pub fn capacity(&self) -> usize {
        self.default_capacity.load(Ordering::Acquire)
    }

    /// Returns the buffer for `key`, creating it with the current default
    /// capacity on first use.
    fn buffer(&self, key: &str) -> SharedBuffer<R> {
        let (buffer, _created) = self
            .directory
            .get_or_create(key, || self.default_capacity.load(Ordering::Acquire));
        #[cfg(feature = "metrics")]
        self.metrics.record_lookup_or_create(_created);
        buffer
    }

    /// Looks up an existing buffer, reporting a miss as [`CacheError::CacheMiss`].
    fn existing(&self, key: &str) -> Result<SharedBuffer<R>> {
        let found = self.directory.get(key);
        #[cfg(feature = "metrics")]
        self.metrics.record_fetch(found.is_some());
        found.ok_or(CacheError::CacheMiss)
    }

    /// Inserts one record into `key`'s channel.
    ///
    /// A record whose id is already in the channel is ignored without error.
    ///
    /// # Errors
    ///
    /// - [`CacheError::InvalidChannel`] if `key` is empty.
    /// - [`CacheError::NilMessage`] if `record` is `None`.
    pub fn insert(&self, key: &str, record: Option<Arc<R>>) -> Result<()> {
        validate_key(key)?;
        let record = record.ok_or(CacheError::NilMessage)?;

        let buffer = self.buffer(key);
        let insertion = buffer.write().insert(record);

        #[cfg(feature = "metrics")]
        self.metrics.record_insertion(&insertion);
        if let Insertion::Duplicate = insertion {
            trace!(key, "duplicate record ignored");
        }
        Ok(())
    }

    /// Wraps `record` in an [`Arc`] and inserts it.
    pub fn insert_record(&self, key: &str, record: R) -> Result<()> {
        self.insert(key, Some(Arc::new(record)))
    }

    /// Inserts records in order, skipping `None` items.
    ///
    /// The channel stays write-locked for the whole batch, so readers see the
    /// channel either before or after it. An empty batch is a no-op and does
    /// not create the channel.
    ///
    /// # Errors
    ///
    /// [`CacheError::InvalidChannel`] if `key` is empty; nothing is inserted.
    pub fn insert_batch<I>(&self, key: &str, records: I) -> Result<()>
    where
        I: IntoIterator<Item = Option<Arc<R>>>,
    {
        validate_key(key)?;
        let mut records = records.into_iter().peekable();
        if records.peek().is_none() {
            return Ok(());
        }

        let buffer = self.buffer(key);
        let outcome = buffer.write().insert_batch(records);

        #[cfg(feature = "metrics")]
        self.metrics.record_batch(&outcome);
        debug!(
            key,
            inserted = outcome.inserted,
            duplicates = outcome.duplicates,
            evicted = outcome.evicted,
            skipped = outcome.skipped,
            "inserted batch"
        );
        Ok(())
    }

    /// Returns every record of `key`'s channel, oldest first.
    ///
    /// A channel that exists but was cleared yields an empty vector.
    ///
    /// # Errors
    ///
    /// - [`CacheError::InvalidChannel`] if `key` is empty.
    /// - [`CacheError::CacheMiss`] if the channel was never created.
    pub fn fetch_all(&self, key: &str) -> Result<Vec<Arc<R>>> {
        validate_key(key)?;
        let buffer = self.existing(key)?;
        let records = buffer.read_recursive().snapshot(None);
        Ok(records)
    }

    /// Like [`fetch_all`](Self::fetch_all), but borrows the channel's storage
    /// when its window is contiguous instead of copying.
    ///
    /// A borrowed view holds the channel's read lock until dropped; writers
    /// on that channel wait for it, readers do not. See [`view`](crate::view)
    /// for the full contract.
    pub fn fetch_all_view(&self, key: &str) -> Result<SnapshotView<R>> {
        validate_key(key)?;
        let buffer = self.existing(key)?;
        Ok(SnapshotView::new(buffer.read_arc_recursive()))
    }

    /// Returns the most recent `min(limit, len)` records, oldest first.
    ///
    /// # Errors
    ///
    /// - [`CacheError::InvalidChannel`] if `key` is empty.
    /// - [`CacheError::InvalidLimit`] if `limit` is zero.
    /// - [`CacheError::CacheMiss`] if the channel was never created.
    pub fn fetch_limit(&self, key: &str, limit: usize) -> Result<Vec<Arc<R>>> {
        validate_key(key)?;
        if limit == 0 {
            return Err(CacheError::InvalidLimit);
        }
        let buffer = self.existing(key)?;
        let records = buffer.read_recursive().snapshot(Some(limit));
        Ok(records)
    }

    /// Empties `key`'s channel. The channel itself is kept.
    ///
    /// Clearing a channel that was never created succeeds.
    ///
    /// # Errors
    ///
    /// [`CacheError::InvalidChannel`] if `key` is empty.
    pub fn clear(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        if let Some(buffer) = self.directory.get(key) {
            buffer.write().clear();
            #[cfg(feature = "metrics")]
            self.metrics.record_clear();
            debug!(key, "cleared channel");
        }
        Ok(())
    }

    /// Sets the per-channel capacity for existing and future channels.
    ///
    /// Shrinking keeps the most recent records of each channel.
    ///
    /// # Errors
    ///
    /// [`CacheError::InvalidLimit`] if `new_capacity` is zero.
    pub fn set_capacity(&self, new_capacity: usize) -> Result<()> {
        if new_capacity == 0 {
            return Err(CacheError::InvalidLimit);
        }

        let _serial = self.resize_lock.lock();
        let (old, buffers) = self.directory.publish_and_collect(|| {
            self.default_capacity.swap(new_capacity, Ordering::AcqRel)
        });

        let mut dropped = 0;
        for buffer in &buffers {
            dropped += buffer.write().resize(new_capacity)?;
        }

        #[cfg(feature = "metrics")]
        {
            self.metrics.record_capacity_change();
            self.metrics.record_evictions(dropped);
        }
        debug!(
            old,
            new = new_capacity,
            keys = buffers.len(),
            dropped,
            "changed channel capacity"
        );
        Ok(())
    }

    /// Returns `true` if `key`'s channel exists (even if empty).
    pub fn contains_key(&self, key: &str) -> bool {
        self.directory.contains(key)
    }

    /// Returns the number of records in `key`'s channel, or `None` if the
    /// channel was never created.
    pub fn len(&self, key: &str) -> Option<usize> {
        self.directory.get(key).map(|buffer| buffer.read_recursive().len())
    }

    /// Returns the number of channels.
    pub fn key_count(&self) -> usize {
        self.directory.len()
    }

    /// Returns all channel ids, in no particular order.
    pub fn keys(&self) -> Vec<String> {
        self.directory.keys()
    }

    /// Returns a snapshot of the operation counters.
    #[cfg(feature = "metrics")]
    pub fn metrics(&self) -> CacheMetricsSnapshot {
        self.metrics.snapshot(self.directory.len(), self.capacity())
    }
}

impl<R: Record> Default for MessageCache<R> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<R: Record> fmt::Debug for MessageCache<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageCache")
            .field("capacity", &self.capacity())
            .field("keys", &self.directory.len())
            .finish()
    }
}
