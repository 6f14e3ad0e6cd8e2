//! Zero-copy snapshot views.
//!
//! [`MessageCache::fetch_all_view`](crate::cache::MessageCache::fetch_all_view)
//! returns a [`SnapshotView`] instead of an owned `Vec`. When the channel's
//! window is one contiguous run of slots, the view borrows the ring buffer's
//! storage directly and keeps the channel's shared lock for as long as it
//! lives. When the window wraps, the two runs are copied into a `Vec` and
//! the lock is released before the view is returned.
//!
//! ## Lifetime contract
//!
//! A borrowed view is valid until it is dropped. While it is alive every
//! writer on that channel (insert, insert batch, clear, resize) waits, so
//! hold views briefly and never across another call that mutates the same
//! channel on the same thread; that call would deadlock.
//!
//! Cache reads take the channel lock recursively, so they proceed while a
//! view is held even if a writer is already queued behind it. Other
//! channels are unaffected.
//!
//! ## Example Usage
//!
//! ```
//! use std::sync::Arc;
//!
//! use chancache::cache::MessageCache;
//! use chancache::record::{Message, Record};
//!
//! let cache = MessageCache::new(4);
//! for id in ["a", "b", "c"] {
//!     cache.insert("general", Some(Arc::new(Message::new(id, "")))).unwrap();
//! }
//!
//! let view = cache.fetch_all_view("general").unwrap();
//! assert!(view.is_borrowed());
//! let ids: Vec<_> = view.iter().map(|m| m.id()).collect();
//! assert_eq!(ids, ["a", "b", "c"]);
//! drop(view); // release before writing to "general" again
//! ```

use std::fmt;
use std::ops::{Deref, Range};
use std::sync::Arc;

use lock_api::ArcRwLockReadGuard;
use parking_lot::RawRwLock;

use crate::ds::{RingBuffer, Window};
use crate::record::Record;

/// Shared guard over one channel's ring buffer.
type BufferGuard<R> = ArcRwLockReadGuard<RawRwLock, RingBuffer<R>>;

enum ViewInner<R> {
    Borrowed {
        guard: BufferGuard<R>,
        range: Range<usize>,
    },
    Copied(Vec<Arc<R>>),
}

/// Oldest-first records of one channel, borrowed when possible.
///
/// Dereferences to `[Arc<R>]`.
pub struct SnapshotView<R> {
    inner: ViewInner<R>,
}

impl<R: Record> SnapshotView<R> {
    /// Builds a view over the whole window of the guarded buffer.
    pub(crate) fn new(guard: BufferGuard<R>) -> Self {
        let inner = match guard.window(None) {
            Window::Contiguous(range) => ViewInner::Borrowed { guard, range },
            Window::Wrapped(..) => {
                let copied = guard.snapshot(None);
                drop(guard);
                ViewInner::Copied(copied)
            },
        };
        Self { inner }
    }

    /// Returns `true` if the view borrows the buffer (and holds its lock).
    pub fn is_borrowed(&self) -> bool {
        matches!(self.inner, ViewInner::Borrowed { .. })
    }

    /// Converts the view into an owned vector, releasing any lock.
    pub fn into_vec(self) -> Vec<Arc<R>> {
        match self.inner {
            ViewInner::Borrowed { guard, range } => guard.slots()[range].to_vec(),
            ViewInner::Copied(records) => records,
        }
    }
}

impl<R: Record> Deref for SnapshotView<R> {
    type Target = [Arc<R>];

    fn deref(&self) -> &Self::Target {
        match &self.inner {
            ViewInner::Borrowed { guard, range } => &guard.slots()[range.clone()],
            ViewInner::Copied(records) => records,
        }
    }
}

impl<R: Record + fmt::Debug> fmt::Debug for SnapshotView<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotView")
            .field("borrowed", &self.is_borrowed())
            .field("records", &&**self)
            .finish()
    }
}
