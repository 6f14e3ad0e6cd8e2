//! Error types for the chancache library.
//!
//! ## Key Components
//!
//! - [`CacheError`]: Returned by every keyed cache operation (insert, fetch,
//!   clear, capacity changes).
//! - [`ConfigError`]: Returned by [`CacheBuilder::try_build`](crate::builder::CacheBuilder::try_build)
//!   when configuration parameters are invalid.
//! - [`InvariantError`]: Returned when internal ring buffer invariants are
//!   violated (`check_invariants`).
//!
//! ## Example Usage
//!
//! ```
//! use chancache::cache::MessageCache;
//! use chancache::error::CacheError;
//! use chancache::record::Message;
//!
//! let cache: MessageCache<Message> = MessageCache::new(10);
//!
//! // Unknown keys are a miss, not an empty result
//! assert_eq!(cache.fetch_all("general").unwrap_err(), CacheError::CacheMiss);
//!
//! // Empty keys are rejected before anything else is checked
//! assert_eq!(cache.fetch_limit("", 0).unwrap_err(), CacheError::InvalidChannel);
//! ```

use thiserror::Error;

/// Convenience alias for results of cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

// ---------------------------------------------------------------------------
// CacheError
// ---------------------------------------------------------------------------

/// Error returned by cache operations.
///
/// All variants are local and recoverable; none of them leave the cache in
/// a degraded state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum CacheError {
    /// An insert was called without a record.
    #[error("message is nil")]
    NilMessage,

    /// An empty key was supplied to a keyed operation.
    #[error("invalid channel id")]
    InvalidChannel,

    /// A zero limit was passed to `fetch_limit`, or a zero capacity to a
    /// resize.
    #[error("invalid limit")]
    InvalidLimit,

    /// A fetch targeted a key that was never created.
    ///
    /// A key that exists but was cleared is not a miss.
    #[error("channel not found in cache")]
    CacheMiss,
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration parameters are invalid.
///
/// Produced by [`CacheBuilder::try_build`](crate::builder::CacheBuilder::try_build).
/// Carries a human-readable description of which parameter failed validation.
///
/// # Example
///
/// ```
/// use chancache::builder::CacheBuilder;
/// use chancache::record::Message;
///
/// let err = CacheBuilder::new(0).try_build::<Message>().unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal ring buffer invariants are violated.
///
/// Produced by [`RingBuffer::check_invariants`](crate::ds::RingBuffer::check_invariants).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- CacheError -------------------------------------------------------

    #[test]
    fn cache_error_display_messages() {
        assert_eq!(CacheError::NilMessage.to_string(), "message is nil");
        assert_eq!(CacheError::InvalidChannel.to_string(), "invalid channel id");
        assert_eq!(CacheError::InvalidLimit.to_string(), "invalid limit");
        assert_eq!(
            CacheError::CacheMiss.to_string(),
            "channel not found in cache"
        );
    }

    #[test]
    fn cache_error_is_copy_and_eq() {
        let a = CacheError::CacheMiss;
        let b = a;
        assert_eq!(a, b);
        assert_ne!(a, CacheError::InvalidLimit);
    }

    #[test]
    fn cache_error_implements_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<CacheError>();
    }

    // -- ConfigError ------------------------------------------------------

    #[test]
    fn config_display_shows_message() {
        let err = ConfigError::new("default capacity must be > 0");
        assert_eq!(err.to_string(), "default capacity must be > 0");
    }

    #[test]
    fn config_message_accessor() {
        let err = ConfigError::new("test");
        assert_eq!(err.message(), "test");
    }

    #[test]
    fn config_clone_and_eq() {
        let a = ConfigError::new("x");
        let b = a.clone();
        assert_eq!(a, b);
    }

    // -- InvariantError ---------------------------------------------------

    #[test]
    fn invariant_display_shows_message() {
        let err = InvariantError::new("seen set out of sync");
        assert_eq!(err.to_string(), "seen set out of sync");
    }

    #[test]
    fn invariant_debug_includes_message() {
        let err = InvariantError::new("head out of bounds");
        let dbg = format!("{:?}", err);
        assert!(dbg.contains("head out of bounds"));
    }

    #[test]
    fn invariant_message_accessor() {
        let err = InvariantError::new("test");
        assert_eq!(err.message(), "test");
    }
}
