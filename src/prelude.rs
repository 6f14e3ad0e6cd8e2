pub use crate::builder::CacheBuilder;
pub use crate::cache::{DEFAULT_CAPACITY, MessageCache};
pub use crate::ds::{Insertion, RingBuffer};
pub use crate::error::{CacheError, ConfigError};
pub use crate::global::{GlobalCache, global};
#[cfg(feature = "metrics")]
pub use crate::metrics::CacheMetricsSnapshot;
pub use crate::record::{Message, Record};
pub use crate::traits::ChannelStore;
pub use crate::view::SnapshotView;
