//! chancache: bounded per-channel message cache.
//!
//! Records are grouped by channel id. Each channel keeps its most recent
//! `capacity` records in a ring buffer, ignores records whose id it already
//! holds, and is locked independently of every other channel.
//!
//! - [`cache::MessageCache`]: the cache facade.
//! - [`ds::RingBuffer`]: the bounded, duplicate-free per-channel buffer.
//! - [`view::SnapshotView`]: zero-copy read of a channel.
//! - [`global`]: lazily created process-wide instance.
//!
//! ```
//! use chancache::prelude::*;
//!
//! let cache = MessageCache::new(2);
//! cache.insert_record("ops", Message::new("a", "deploy started")).unwrap();
//! cache.insert_record("ops", Message::new("b", "deploy done")).unwrap();
//! cache.insert_record("ops", Message::new("c", "rollback")).unwrap();
//!
//! let latest = cache.fetch_limit("ops", 1).unwrap();
//! assert_eq!(latest[0].content, "rollback");
//! assert_eq!(cache.len("ops"), Some(2));
//! ```

pub mod builder;
pub mod cache;
pub mod directory;
pub mod ds;
pub mod error;
pub mod global;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod prelude;
pub mod record;
pub mod traits;
pub mod view;

pub use crate::builder::CacheBuilder;
pub use crate::cache::{DEFAULT_CAPACITY, MessageCache};
pub use crate::ds::RingBuffer;
pub use crate::error::{CacheError, ConfigError, InvariantError};
pub use crate::global::{GlobalCache, global};
#[cfg(feature = "metrics")]
pub use crate::metrics::CacheMetricsSnapshot;
pub use crate::record::{Message, Record};
pub use crate::traits::ChannelStore;
pub use crate::view::SnapshotView;
