//! Trait form of the cache's operation set.
//!
//! [`ChannelStore`] lets call sites depend on "something that caches
//! records per channel" without naming a concrete cache. It is implemented
//! by [`MessageCache`] and by [`GlobalCache`](crate::global::GlobalCache),
//! which forwards to the process-wide instance.
//!
//! New code should hold a `MessageCache` (or an `Arc` of one) directly; the
//! trait exists for code that cannot be handed an instance. The trait is
//! object safe, so `&dyn ChannelStore<Message>` works.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use chancache::cache::MessageCache;
//! use chancache::record::Message;
//! use chancache::traits::ChannelStore;
//!
//! fn remember(store: &dyn ChannelStore<Message>, msg: Message) {
//!     store.insert("audit", Some(Arc::new(msg))).unwrap();
//! }
//!
//! let cache: MessageCache<Message> = MessageCache::new(10);
//! remember(&cache, Message::new("1", "logged in"));
//! assert_eq!(ChannelStore::fetch_all(&cache, "audit").unwrap().len(), 1);
//! ```

use std::sync::Arc;

use crate::cache::MessageCache;
use crate::error::Result;
use crate::record::Record;

/// Per-channel record cache operations.
///
/// Contracts match the inherent methods of [`MessageCache`].
pub trait ChannelStore<R: Record> {
    /// Inserts one record; see [`MessageCache::insert`].
    fn insert(&self, key: &str, record: Option<Arc<R>>) -> Result<()>;

    /// Inserts records in order; see [`MessageCache::insert_batch`].
    fn insert_batch(&self, key: &str, records: Vec<Option<Arc<R>>>) -> Result<()>;

    /// Returns every record, oldest first; see [`MessageCache::fetch_all`].
    fn fetch_all(&self, key: &str) -> Result<Vec<Arc<R>>>;

    /// Returns the most recent records; see [`MessageCache::fetch_limit`].
    fn fetch_limit(&self, key: &str, limit: usize) -> Result<Vec<Arc<R>>>;

    /// Empties a channel; see [`MessageCache::clear`].
    fn clear(&self, key: &str) -> Result<()>;

    /// Changes the per-channel capacity; see [`MessageCache::set_capacity`].
    fn set_capacity(&self, new_capacity: usize) -> Result<()>;
}

impl<R: Record> ChannelStore<R> for MessageCache<R> {
    fn insert(&self, key: &str, record: Option<Arc<R>>) -> Result<()> {
        MessageCache::insert(self, key, record)
    }

    fn insert_batch(&self, key: &str, records: Vec<Option<Arc<R>>>) -> Result<()> {
        MessageCache::insert_batch(self, key, records)
    }

    fn fetch_all(&self, key: &str) -> Result<Vec<Arc<R>>> {
        MessageCache::fetch_all(self, key)
    }

    fn fetch_limit(&self, key: &str, limit: usize) -> Result<Vec<Arc<R>>> {
        MessageCache::fetch_limit(self, key, limit)
    }

    fn clear(&self, key: &str) -> Result<()> {
        MessageCache::clear(self, key)
    }

    fn set_capacity(&self, new_capacity: usize) -> Result<()> {
        MessageCache::set_capacity(self, new_capacity)
    }
}

impl<R: Record, T: ChannelStore<R> + ?Sized> ChannelStore<R> for Arc<T> {
    fn insert(&self, key: &str, record: Option<Arc<R>>) -> Result<()> {
        (**self).insert(key, record)
    }

    fn insert_batch(&self, key: &str, records: Vec<Option<Arc<R>>>) -> Result<()> {
        (**self).insert_batch(key, records)
    }

    fn fetch_all(&self, key: &str) -> Result<Vec<Arc<R>>> {
        (**self).fetch_all(key)
    }

    fn fetch_limit(&self, key: &str, limit: usize) -> Result<Vec<Arc<R>>> {
        (**self).fetch_limit(key, limit)
    }

    fn clear(&self, key: &str) -> Result<()> {
        (**self).clear(key)
    }

    fn set_capacity(&self, new_capacity: usize) -> Result<()> {
        (**self).set_capacity(new_capacity)
    }
}
