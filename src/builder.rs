//! Cache configuration.
//!
//! [`CacheBuilder`] collects the few knobs a [`MessageCache`] has and builds
//! it, either leniently ([`build`](CacheBuilder::build), zero capacity falls
//! back to [`DEFAULT_CAPACITY`]) or strictly
//! ([`try_build`](CacheBuilder::try_build), zero capacity is an error).
//!
//! ## Example
//!
//! ```rust
//! use chancache::builder::CacheBuilder;
//! use chancache::record::Message;
//!
//! let cache = CacheBuilder::new(50)
//!     .key_capacity_hint(1_000)
//!     .build::<Message>();
//! assert_eq!(cache.capacity(), 50);
//!
//! // Lenient build substitutes the default for zero
//! assert_eq!(CacheBuilder::new(0).build::<Message>().capacity(), 100);
//! ```

use crate::cache::{DEFAULT_CAPACITY, MessageCache};
use crate::error::ConfigError;
use crate::record::Record;

/// Builder for [`MessageCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheBuilder {
    default_capacity: usize,
    key_capacity_hint: usize,
}

impl CacheBuilder {
    /// Starts a builder with the per-channel capacity.
    pub fn new(default_capacity: usize) -> Self {
        Self {
            default_capacity,
            key_capacity_hint: 0,
        }
    }

    /// Sets the per-channel capacity.
    pub fn default_capacity(mut self, capacity: usize) -> Self {
        self.default_capacity = capacity;
        self
    }

    /// Pre-sizes the channel directory for `keys` channels.
    pub fn key_capacity_hint(mut self, keys: usize) -> Self {
        self.key_capacity_hint = keys;
        self
    }

    /// Builds the cache, using [`DEFAULT_CAPACITY`] if the capacity is zero.
    pub fn build<R: Record>(self) -> MessageCache<R> {
        let capacity = if self.default_capacity == 0 {
            DEFAULT_CAPACITY
        } else {
            self.default_capacity
        };
        MessageCache::from_parts(capacity, self.key_capacity_hint)
    }

    /// Builds the cache, rejecting a zero capacity.
    pub fn try_build<R: Record>(self) -> Result<MessageCache<R>, ConfigError> {
        if self.default_capacity == 0 {
            return Err(ConfigError::new("default capacity must be > 0"));
        }
        Ok(self.build())
    }
}

impl Default for CacheBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
