//! Key directory: channel id → ring buffer.
//!
//! ## Architecture
//! - One `RwLock<FxHashMap<String, Arc<RwLock<RingBuffer<R>>>>>` guards the
//!   mapping only. Each ring buffer has its own lock.
//! - Lookups take the map's read lock and clone the buffer's `Arc`; the map
//!   lock is released before the caller touches the buffer, so directory and
//!   buffer locks are never nested.
//! - Creation is double-checked: a read-locked lookup first, then the write
//!   lock and a second lookup before installing a new buffer.
//!
//! ## Core Operations
//! - `get`: read-locked lookup.
//! - `get_or_create`: lookup, creating the buffer on first use.
//! - `publish_and_collect`: run a closure under the write lock and capture
//!   every buffer, used by capacity changes.
//!
//! ## Thread Safety
//! - `KeyDirectory` is `Send + Sync` when `R: Send + Sync`.
//! - Entries are never removed implicitly; clearing a channel empties its
//!   buffer but keeps the entry.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::ds::RingBuffer;
use crate::record::Record;

/// A channel's ring buffer behind its own lock.
pub type SharedBuffer<R> = Arc<RwLock<RingBuffer<R>>>;

/// Concurrent map from channel id to that channel's ring buffer.
#[derive(Debug)]
pub struct KeyDirectory<R> {
    map: RwLock<FxHashMap<String, SharedBuffer<R>>>,
}

impl<R: Record> KeyDirectory<R> {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty directory with room for `keys` channels.
    pub fn with_capacity(keys: usize) -> Self {
        Self {
            map: RwLock::new(FxHashMap::with_capacity_and_hasher(
                keys,
                Default::default(),
            )),
        }
    }

    /// Returns the buffer for `key`, if it was ever created.
    pub fn get(&self, key: &str) -> Option<SharedBuffer<R>> {
        self.map.read().get(key).cloned()
    }

    /// Returns the buffer for `key`, creating it on first use.
    ///
    /// `capacity` is evaluated under the write lock, only when a buffer is
    /// actually created. The flag is `true` if this call created it.
    pub fn get_or_create(
        &self,
        key: &str,
        capacity: impl FnOnce() -> usize,
    ) -> (SharedBuffer<R>, bool) {
        if let Some(buffer) = self.get(key) {
            return (buffer, false);
        }

        let mut map = self.map.write();
        // Another thread may have won the race between the two locks.
        if let Some(buffer) = map.get(key) {
            return (Arc::clone(buffer), false);
        }

        let capacity = capacity();
        let buffer = Arc::new(RwLock::new(RingBuffer::new(capacity)));
        map.insert(key.to_owned(), Arc::clone(&buffer));
        debug!(key, capacity, "created channel buffer");
        (buffer, true)
    }

    /// Runs `publish` under the write lock and returns its result together
    /// with every buffer present at that moment.
    ///
    /// Buffers created after this returns observe whatever `publish` wrote.
    pub fn publish_and_collect<T>(
        &self,
        publish: impl FnOnce() -> T,
    ) -> (T, Vec<SharedBuffer<R>>) {
        let map = self.map.write();
        let published = publish();
        let buffers = map.values().cloned().collect();
        (published, buffers)
    }

    /// Returns `true` if `key` was ever created.
    pub fn contains(&self, key: &str) -> bool {
        self.map.read().contains_key(key)
    }

    /// Returns the number of channels.
    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    /// Returns `true` if no channel was created yet.
    pub fn is_empty(&self) -> bool {
        self.map.read().is_empty()
    }

    /// Returns the ids of all channels, in no particular order.
    pub fn keys(&self) -> Vec<String> {
        self.map.read().keys().cloned().collect()
    }
}

impl<R: Record> Default for KeyDirectory<R> {
    fn default() -> Self {
        Self::new()
    }
}
