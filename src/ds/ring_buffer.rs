//! Fixed-capacity ring buffer of records with duplicate suppression.
//!
//! Holds the most recent `capacity` records of one channel in insertion
//! order. Once full, every new record overwrites the oldest one (strict
//! FIFO). A set of resident ids makes duplicate detection O(1).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                    RingBuffer (capacity = 4) Layout                         │
//! │                                                                             │
//! │   slots: Vec<Arc<R>>          head: oldest logical entry                    │
//! │   seen:  FxHashSet<String>    ids of every resident record                  │
//! │                                                                             │
//! │   After inserting a, b, c, d, e, f:                                         │
//! │                                                                             │
//! │   Index:     0     1     2     3                                            │
//! │            ┌─────┬─────┬─────┬─────┐                                        │
//! │   slots:   │  e  │  f  │  c  │  d  │        seen = {c, d, e, f}             │
//! │            └─────┴─────┴─────┴─────┘                                        │
//! │                          ▲                                                  │
//! │                          │                                                  │
//! │                       head = 2                                              │
//! │                                                                             │
//! │   Logical order: slots[(head + i) % capacity] for i in 0..len               │
//! │                  = c, d, e, f                                               │
//! │                                                                             │
//! │   Insert Flow (full)                                                        │
//! │   ──────────────────                                                        │
//! │                                                                             │
//! │   insert(g):                                                                │
//! │     1. g in seen?            → no-op                                        │
//! │     2. seen.remove(slots[2]) → drop "c"                                     │
//! │     3. slots[2] = g, seen.insert("g")                                       │
//! │     4. head = (2 + 1) % 4    → head = 3                                     │
//! │                                                                             │
//! │   After insert(g), snapshot of the last 3:                                  │
//! │     start = (head + len - 3) % 4 = 0  → slots[0..3] = e, f, g  (contiguous) │
//! │   Snapshot of all 4:                                                        │
//! │     start = 3 → slots[3..4] ++ slots[0..3] = d, e, f, g        (wrapped)    │
//! │                                                                             │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Operation          | Description                                   | Complexity |
//! |--------------------|-----------------------------------------------|------------|
//! | [`insert`]         | Append or overwrite oldest, skip duplicates    | O(1) avg   |
//! | [`insert_batch`]   | `insert` each present item in order            | O(n)       |
//! | [`snapshot`]       | Most recent `n` records, oldest first          | O(n)       |
//! | [`window`]         | Physical ranges of that same window            | O(1)       |
//! | [`resize`]         | Change capacity, keep the most recent entries  | O(len)     |
//! | [`clear`]          | Drop all entries, keep the buffer              | O(len)     |
//!
//! [`insert`]: RingBuffer::insert
//! [`insert_batch`]: RingBuffer::insert_batch
//! [`snapshot`]: RingBuffer::snapshot
//! [`window`]: RingBuffer::window
//! [`resize`]: RingBuffer::resize
//! [`clear`]: RingBuffer::clear
//!
//! ## Example Usage
//!
//! ```
//! use std::sync::Arc;
//!
//! use chancache::ds::RingBuffer;
//! use chancache::record::{Message, Record};
//!
//! let mut ring = RingBuffer::new(3);
//! for id in ["0", "1", "2", "3", "4"] {
//!     ring.insert(Arc::new(Message::new(id, "")));
//! }
//!
//! let ids: Vec<_> = ring.snapshot(None).iter().map(|m| m.id().to_owned()).collect();
//! assert_eq!(ids, ["2", "3", "4"]);
//!
//! // Shrinking keeps the most recent entries
//! ring.resize(2).unwrap();
//! let ids: Vec<_> = ring.snapshot(None).iter().map(|m| m.id().to_owned()).collect();
//! assert_eq!(ids, ["3", "4"]);
//! ```
//!
//! ## Thread Safety
//!
//! `RingBuffer` is not thread-safe. The cache keeps one per channel behind
//! its own `RwLock`.
//!
//! ## Implementation Notes
//!
//! - `slots` only ever holds live entries. Until the buffer first fills,
//!   `head` is 0 and inserts append; afterwards `slots.len() == capacity`
//!   and inserts overwrite `slots[head]`. Resize and clear re-establish
//!   `head == 0`, so the two phases never mix.
//! - The evicted slot's id leaves `seen` before the new id enters it, so an
//!   id that was evicted can be inserted again.

use std::ops::Range;
use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::error::{CacheError, InvariantError};
use crate::record::Record;

/// Result of a single [`RingBuffer::insert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion<R> {
    /// The record went into a free slot.
    Appended,
    /// A record with the same id is already resident; nothing changed.
    Duplicate,
    /// The buffer was full; the returned oldest record was overwritten.
    Evicted(Arc<R>),
}

impl<R> Insertion<R> {
    /// Returns `true` if the record was stored.
    pub fn is_stored(&self) -> bool {
        !matches!(self, Insertion::Duplicate)
    }
}

/// Tally of a [`RingBuffer::insert_batch`] call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Records stored (appended or overwriting an older one).
    pub inserted: usize,
    /// Records skipped because their id was already resident.
    pub duplicates: usize,
    /// Older records overwritten to make room.
    pub evicted: usize,
    /// Absent items skipped.
    pub skipped: usize,
}

impl BatchOutcome {
    fn record<R>(&mut self, insertion: &Insertion<R>) {
        match insertion {
            Insertion::Appended => self.inserted += 1,
            Insertion::Duplicate => self.duplicates += 1,
            Insertion::Evicted(_) => {
                self.inserted += 1;
                self.evicted += 1;
            },
        }
    }
}

/// Physical location of a logical window inside the slot array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Window {
    /// The window is one run of slots.
    Contiguous(Range<usize>),
    /// The window runs to the end of the array and continues at index 0.
    Wrapped(Range<usize>, Range<usize>),
}

impl Window {
    /// Number of entries covered.
    pub fn len(&self) -> usize {
        match self {
            Window::Contiguous(range) => range.len(),
            Window::Wrapped(tail, front) => tail.len() + front.len(),
        }
    }

    /// Returns `true` if the window covers no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fixed-capacity FIFO ring of shared records, deduplicated by id.
#[derive(Debug)]
pub struct RingBuffer<R> {
    slots: Vec<Arc<R>>,
    seen: FxHashSet<String>,
    capacity: usize,
    head: usize,
}

impl<R: Record> RingBuffer<R> {
    /// Creates an empty ring with `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. Use [`try_new`](Self::try_new) for
    /// user-supplied values.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring buffer capacity must be > 0");
        Self {
            slots: Vec::with_capacity(capacity),
            seen: FxHashSet::with_capacity_and_hasher(capacity, Default::default()),
            capacity,
            head: 0,
        }
    }

    /// Creates an empty ring, rejecting a zero capacity with
    /// [`CacheError::InvalidLimit`].
    pub fn try_new(capacity: usize) -> Result<Self, CacheError> {
        if capacity == 0 {
            return Err(CacheError::InvalidLimit);
        }
        Ok(Self::new(capacity))
    }

    /// Returns the maximum number of records retained.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of resident records.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no records are resident.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns `true` if a record with `id` is resident.
    pub fn contains_id(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Inserts `record`, overwriting the oldest entry if the ring is full.
    ///
    /// A record whose id is already resident is ignored.
    pub fn insert(&mut self, record: Arc<R>) -> Insertion<R> {
        if self.seen.contains(record.id()) {
            return Insertion::Duplicate;
        }
        let id = record.id().to_owned();

        let len = self.slots.len();
        if len < self.capacity {
            debug_assert_eq!((self.head + len) % self.capacity, len);
            self.slots.push(record);
            self.seen.insert(id);
            return Insertion::Appended;
        }

        let evicted = std::mem::replace(&mut self.slots[self.head], record);
        self.seen.remove(evicted.id());
        self.seen.insert(id);
        self.head = (self.head + 1) % self.capacity;
        Insertion::Evicted(evicted)
    }

    /// Inserts every present record in order; `None` items are skipped.
    pub fn insert_batch<I>(&mut self, records: I) -> BatchOutcome
    where
        I: IntoIterator<Item = Option<Arc<R>>>,
    {
        let mut outcome = BatchOutcome::default();
        for record in records {
            match record {
                Some(record) => {
                    let insertion = self.insert(record);
                    outcome.record(&insertion);
                },
                None => outcome.skipped += 1,
            }
        }
        outcome
    }

    /// Locates the most recent `min(limit, len)` entries (all when `limit`
    /// is `None`) in the slot array.
    pub fn window(&self, limit: Option<usize>) -> Window {
        let len = self.slots.len();
        let n = limit.map_or(len, |limit| limit.min(len));
        if n == 0 {
            return Window::Contiguous(0..0);
        }
        let start = (self.head + len - n) % self.capacity;
        let end = start + n;
        if end <= self.capacity {
            Window::Contiguous(start..end)
        } else {
            Window::Wrapped(start..self.capacity, 0..end - self.capacity)
        }
    }

    /// Returns the most recent `min(limit, len)` records, oldest first.
    ///
    /// Returns all records when `limit` is `None`, and an empty vector when
    /// the ring is empty.
    pub fn snapshot(&self, limit: Option<usize>) -> Vec<Arc<R>> {
        match self.window(limit) {
            Window::Contiguous(range) => self.slots[range].to_vec(),
            Window::Wrapped(tail, front) => {
                let mut out = Vec::with_capacity(tail.len() + front.len());
                out.extend_from_slice(&self.slots[tail]);
                out.extend_from_slice(&self.slots[front]);
                out
            },
        }
    }

    /// Iterates over resident records, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<R>> + '_ {
        let (wrapped, front) = self.slots.split_at(self.head);
        front.iter().chain(wrapped.iter())
    }

    /// Returns the slot array in physical order.
    pub(crate) fn slots(&self) -> &[Arc<R>] {
        &self.slots
    }

    /// Changes the capacity, keeping the most recent
    /// `min(len, new_capacity)` records in order.
    ///
    /// Returns the number of records dropped. Fails with
    /// [`CacheError::InvalidLimit`] if `new_capacity` is zero.
    pub fn resize(&mut self, new_capacity: usize) -> Result<usize, CacheError> {
        if new_capacity == 0 {
            return Err(CacheError::InvalidLimit);
        }

        let mut old = std::mem::take(&mut self.slots);
        old.rotate_left(self.head);

        let dropped = old.len().saturating_sub(new_capacity);
        for record in old.drain(..dropped) {
            self.seen.remove(record.id());
        }

        let mut slots = Vec::with_capacity(new_capacity);
        slots.extend(old);
        self.slots = slots;
        self.capacity = new_capacity;
        self.head = 0;
        Ok(dropped)
    }

    /// Removes every record. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.seen.clear();
        self.head = 0;
    }

    /// Verifies the internal invariants.
    ///
    /// Checks index bounds, the append/overwrite phase split, and that the
    /// id set holds exactly the ids of the resident records.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let len = self.slots.len();
        if self.capacity == 0 {
            return Err(InvariantError::new("capacity is zero"));
        }
        if len > self.capacity {
            return Err(InvariantError::new(format!(
                "len {} exceeds capacity {}",
                len, self.capacity
            )));
        }
        if self.head >= self.capacity {
            return Err(InvariantError::new(format!(
                "head {} out of bounds for capacity {}",
                self.head, self.capacity
            )));
        }
        if self.head != 0 && len != self.capacity {
            return Err(InvariantError::new(format!(
                "head {} advanced before the ring filled ({} of {})",
                self.head, len, self.capacity
            )));
        }
        if self.seen.len() != len {
            return Err(InvariantError::new(format!(
                "seen set has {} ids for {} records",
                self.seen.len(),
                len
            )));
        }
        if let Some(missing) = self.slots.iter().find(|r| !self.seen.contains(r.id())) {
            return Err(InvariantError::new(format!(
                "resident id {:?} missing from seen set",
                missing.id()
            )));
        }
        Ok(())
    }
}


#[cfg(test)]
mod property_tests {
    use std::collections::VecDeque;

    use proptest::prelude::*;

    use super::*;
    use crate::record::Message;

    #[derive(Debug, Clone)]
    enum Op {
        Insert(u8),
        Batch(Vec<Option<u8>>),
        Resize(usize),
        Clear,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            6 => any::<u8>().prop_map(Op::Insert),
            2 => prop::collection::vec(prop::option::of(any::<u8>()), 0..8).prop_map(Op::Batch),
            1 => (1usize..12).prop_map(Op::Resize),
            1 => Just(Op::Clear),
        ]
    }

    /// Reference model: a bounded deque with linear duplicate checks.
    struct Model {
        items: VecDeque<String>,
        capacity: usize,
    }

    impl Model {
        fn insert(&mut self, id: String) {
            if self.items.contains(&id) {
                return;
            }
            if self.items.len() == self.capacity {
                self.items.pop_front();
            }
            self.items.push_back(id);
        }

        fn resize(&mut self, capacity: usize) {
            while self.items.len() > capacity {
                self.items.pop_front();
            }
            self.capacity = capacity;
        }
    }

    fn record(id: u8) -> Arc<Message> {
        Arc::new(Message::new(id.to_string(), ""))
    }

    fn snapshot_ids(ring: &RingBuffer<Message>, limit: Option<usize>) -> Vec<String> {
        ring.snapshot(limit)
            .iter()
            .map(|r| r.id().to_owned())
            .collect()
    }

    proptest! {
        /// Property: the ring behaves like a bounded, deduplicating FIFO
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_matches_bounded_fifo_model(
            capacity in 1usize..10,
            ops in prop::collection::vec(op_strategy(), 0..80)
        ) {
            let mut ring = RingBuffer::new(capacity);
            let mut model = Model { items: VecDeque::new(), capacity };

            for op in ops {
                match op {
                    Op::Insert(id) => {
                        ring.insert(record(id));
                        model.insert(id.to_string());
                    }
                    Op::Batch(items) => {
                        ring.insert_batch(items.iter().map(|id| id.map(record)));
                        for id in items.into_iter().flatten() {
                            model.insert(id.to_string());
                        }
                    }
                    Op::Resize(capacity) => {
                        ring.resize(capacity).unwrap();
                        model.resize(capacity);
                    }
                    Op::Clear => {
                        ring.clear();
                        model.items.clear();
                    }
                }

                prop_assert!(ring.check_invariants().is_ok());
                let expected: Vec<String> = model.items.iter().cloned().collect();
                prop_assert_eq!(snapshot_ids(&ring, None), expected);
            }
        }

        /// Property: a limited snapshot is the tail of the full snapshot
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_limited_snapshot_is_suffix(
            capacity in 1usize..10,
            ids in prop::collection::vec(any::<u8>(), 0..40),
            limit in 1usize..15
        ) {
            let mut ring = RingBuffer::new(capacity);
            for id in ids {
                ring.insert(record(id));
            }

            let full = snapshot_ids(&ring, None);
            let limited = snapshot_ids(&ring, Some(limit));
            prop_assert_eq!(limited.len(), limit.min(full.len()));
            prop_assert_eq!(&full[full.len() - limited.len()..], &limited[..]);
        }

        /// Property: len() never exceeds capacity
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_len_bounded_by_capacity(
            capacity in 1usize..10,
            ids in prop::collection::vec(any::<u8>(), 0..40)
        ) {
            let mut ring = RingBuffer::new(capacity);
            for id in ids {
                ring.insert(record(id));
                prop_assert!(ring.len() <= ring.capacity());
            }
        }
    }
}
