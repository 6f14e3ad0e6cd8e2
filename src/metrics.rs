//! Operation counters, compiled only with the `metrics` feature.
//!
//! Counters are relaxed atomics bumped on the hot path; they are
//! observational and never affect cache behaviour. A
//! [`CacheMetricsSnapshot`] is a point-in-time copy of all counters plus a
//! few gauges captured when the snapshot is taken.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::ds::{BatchOutcome, Insertion};

/// Point-in-time view of cache counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheMetricsSnapshot {
    pub insert_calls: u64,
    pub inserted: u64,
    pub duplicates: u64,
    pub evictions: u64,

    pub batch_calls: u64,
    pub batch_skipped: u64, // absent items inside batches

    pub fetch_hits: u64,
    pub fetch_misses: u64,

    pub clears: u64,
    pub capacity_changes: u64,
    pub keys_created: u64,

    // gauges captured at snapshot time
    pub key_count: usize,
    pub default_capacity: usize,
}

#[derive(Debug, Default)]
pub(crate) struct CacheCounters {
    insert_calls: AtomicU64,
    inserted: AtomicU64,
    duplicates: AtomicU64,
    evictions: AtomicU64,
    batch_calls: AtomicU64,
    batch_skipped: AtomicU64,
    fetch_hits: AtomicU64,
    fetch_misses: AtomicU64,
    clears: AtomicU64,
    capacity_changes: AtomicU64,
    keys_created: AtomicU64,
}

#[inline]
fn bump(counter: &AtomicU64, by: u64) {
    counter.fetch_add(by, Ordering::Relaxed);
}

impl CacheCounters {
    pub(crate) fn record_insertion<R>(&self, insertion: &Insertion<R>) {
        bump(&self.insert_calls, 1);
        match insertion {
            Insertion::Appended => bump(&self.inserted, 1),
            Insertion::Duplicate => bump(&self.duplicates, 1),
            Insertion::Evicted(_) => {
                bump(&self.inserted, 1);
                bump(&self.evictions, 1);
            },
        }
    }

    pub(crate) fn record_batch(&self, outcome: &BatchOutcome) {
        bump(&self.batch_calls, 1);
        bump(&self.inserted, outcome.inserted as u64);
        bump(&self.duplicates, outcome.duplicates as u64);
        bump(&self.evictions, outcome.evicted as u64);
        bump(&self.batch_skipped, outcome.skipped as u64);
    }

    pub(crate) fn record_evictions(&self, count: usize) {
        bump(&self.evictions, count as u64);
    }

    pub(crate) fn record_fetch(&self, hit: bool) {
        if hit {
            bump(&self.fetch_hits, 1);
        } else {
            bump(&self.fetch_misses, 1);
        }
    }

    pub(crate) fn record_clear(&self) {
        bump(&self.clears, 1);
    }

    pub(crate) fn record_capacity_change(&self) {
        bump(&self.capacity_changes, 1);
    }

    pub(crate) fn record_lookup_or_create(&self, created: bool) {
        if created {
            bump(&self.keys_created, 1);
        }
    }

    pub(crate) fn snapshot(
        &self,
        key_count: usize,
        default_capacity: usize,
    ) -> CacheMetricsSnapshot {
        let load = |counter: &AtomicU64| counter.load(Ordering::Relaxed);
        CacheMetricsSnapshot {
            insert_calls: load(&self.insert_calls),
            inserted: load(&self.inserted),
            duplicates: load(&self.duplicates),
            evictions: load(&self.evictions),
            batch_calls: load(&self.batch_calls),
            batch_skipped: load(&self.batch_skipped),
            fetch_hits: load(&self.fetch_hits),
            fetch_misses: load(&self.fetch_misses),
            clears: load(&self.clears),
            capacity_changes: load(&self.capacity_changes),
            keys_created: load(&self.keys_created),
            key_count,
            default_capacity,
        }
    }
}
