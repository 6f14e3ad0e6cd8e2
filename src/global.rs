//! Process-wide cache instance.
//!
//! [`global`] lazily creates one [`MessageCache<Message>`] with
//! [`DEFAULT_CAPACITY`] the first time it is called; every later call, from
//! any thread, returns the same instance. Initialization is race-free.
//!
//! [`GlobalCache`] is a zero-sized handle implementing [`ChannelStore`] by
//! forwarding to that instance, for code that takes a store generically.
//!
//! Prefer constructing a [`MessageCache`] and passing it explicitly; the
//! global exists for call sites that cannot be handed one.
//!
//! ```
//! use chancache::global::global;
//! use chancache::record::Message;
//!
//! global().insert_record("doc-global", Message::new("1", "hello")).unwrap();
//! assert!(std::ptr::eq(global(), global()));
//! ```

use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::cache::{DEFAULT_CAPACITY, MessageCache};
use crate::error::Result;
use crate::record::Message;
use crate::traits::ChannelStore;

static GLOBAL: OnceLock<MessageCache<Message>> = OnceLock::new();

/// Returns the process-wide cache, creating it on first call.
pub fn global() -> &'static MessageCache<Message> {
    GLOBAL.get_or_init(|| {
        debug!(capacity = DEFAULT_CAPACITY, "initialized global message cache");
        MessageCache::new(DEFAULT_CAPACITY)
    })
}

/// Handle to the process-wide cache.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GlobalCache;

impl GlobalCache {
    /// Returns the instance this handle forwards to.
    pub fn get(&self) -> &'static MessageCache<Message> {
        global()
    }
}

impl ChannelStore<Message> for GlobalCache {
    fn insert(&self, key: &str, record: Option<Arc<Message>>) -> Result<()> {
        global().insert(key, record)
    }

    fn insert_batch(&self, key: &str, records: Vec<Option<Arc<Message>>>) -> Result<()> {
        global().insert_batch(key, records)
    }

    fn fetch_all(&self, key: &str) -> Result<Vec<Arc<Message>>> {
        global().fetch_all(key)
    }

    fn fetch_limit(&self, key: &str, limit: usize) -> Result<Vec<Arc<Message>>> {
        global().fetch_limit(key, limit)
    }

    fn clear(&self, key: &str) -> Result<()> {
        global().clear(key)
    }

    fn set_capacity(&self, new_capacity: usize) -> Result<()> {
        global().set_capacity(new_capacity)
    }
}
