// ==============================================
// MESSAGE CACHE BEHAVIOUR TESTS (integration)
// ==============================================
use std::sync::Arc;

use chancache::prelude::*;

fn msg(id: &str) -> Option<Arc<Message>> {
    Some(Arc::new(
        Message::new(id, format!("Test message {id}"))
            .with_author("tester")
            .with_channel("channel1"),
    ))
}

fn ids(records: &[Arc<Message>]) -> Vec<String> {
    records.iter().map(|m| m.id().to_owned()).collect()
}

fn fill(cache: &MessageCache, key: &str, range: std::ops::Range<usize>) {
    for i in range {
        cache.insert(key, msg(&i.to_string())).unwrap();
    }
}

mod construction {
    use super::*;

    #[test]
    fn zero_capacity_uses_default() {
        let cache: MessageCache = MessageCache::new(0);
        assert_eq!(cache.capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn strict_builder_rejects_zero() {
        assert!(CacheBuilder::new(0).try_build::<Message>().is_err());
        let cache = CacheBuilder::new(4).try_build::<Message>().unwrap();
        assert_eq!(cache.capacity(), 4);
    }
}

mod insert_and_fetch {
    use super::*;

    #[test]
    fn basic_insert_and_fetch() {
        let cache = MessageCache::new(10);
        cache.insert("channel1", msg("1")).unwrap();

        let records = cache.fetch_all("channel1").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "1");
        assert_eq!(records[0].author.as_deref(), Some("tester"));
        assert_eq!(records[0].channel_id.as_deref(), Some("channel1"));
    }

    #[test]
    fn wraps_after_capacity() {
        let cache = MessageCache::new(3);
        fill(&cache, "channel1", 0..5);
        assert_eq!(ids(&cache.fetch_all("channel1").unwrap()), ["2", "3", "4"]);
    }

    #[test]
    fn many_wraps_keep_order() {
        let cache = MessageCache::new(7);
        fill(&cache, "channel1", 0..100);
        let expected: Vec<String> = (93..100).map(|i| i.to_string()).collect();
        assert_eq!(ids(&cache.fetch_all("channel1").unwrap()), expected);
    }

    #[test]
    fn duplicates_are_ignored() {
        let cache = MessageCache::new(10);
        cache.insert("channel1", msg("1")).unwrap();
        cache.insert("channel1", msg("1")).unwrap();
        assert_eq!(cache.fetch_all("channel1").unwrap().len(), 1);
    }

    #[test]
    fn evicted_id_can_return() {
        let cache = MessageCache::new(2);
        fill(&cache, "channel1", 0..3); // "0" evicted
        cache.insert("channel1", msg("0")).unwrap();
        assert_eq!(ids(&cache.fetch_all("channel1").unwrap()), ["2", "0"]);
    }

    #[test]
    fn empty_record_id_is_accepted_and_deduplicated() {
        let cache = MessageCache::new(10);
        cache.insert("channel1", msg("")).unwrap();
        cache.insert("channel1", msg("")).unwrap();
        cache.insert("channel1", msg("1")).unwrap();
        assert_eq!(ids(&cache.fetch_all("channel1").unwrap()), ["", "1"]);
    }

    #[test]
    fn nil_and_empty_key_are_rejected() {
        let cache = MessageCache::new(10);
        assert_eq!(cache.insert("channel1", None), Err(CacheError::NilMessage));
        assert_eq!(cache.insert("", msg("1")), Err(CacheError::InvalidChannel));
    }

    #[test]
    fn fetch_limit_cases() {
        let cache = MessageCache::new(10);
        fill(&cache, "channel1", 0..5);

        assert_eq!(
            ids(&cache.fetch_limit("channel1", 3).unwrap()),
            ["2", "3", "4"]
        );
        assert_eq!(cache.fetch_limit("channel1", 10).unwrap().len(), 5);
        assert_eq!(
            cache.fetch_limit("channel1", 0),
            Err(CacheError::InvalidLimit)
        );
        assert_eq!(cache.fetch_limit("nonexistent", 3), Err(CacheError::CacheMiss));
        assert_eq!(cache.fetch_limit("", 3), Err(CacheError::InvalidChannel));
    }

    #[test]
    fn limit_is_checked_before_lookup() {
        let cache: MessageCache = MessageCache::new(10);
        assert_eq!(cache.fetch_limit("missing", 0), Err(CacheError::InvalidLimit));
    }

    #[test]
    fn fetch_unknown_channel_is_a_miss() {
        let cache: MessageCache = MessageCache::new(10);
        assert_eq!(cache.fetch_all("nonexistent"), Err(CacheError::CacheMiss));
    }
}

mod batch {
    use super::*;

    #[test]
    fn batch_preserves_order_and_skips_none() {
        let cache = MessageCache::new(10);
        cache
            .insert_batch("channel1", vec![msg("1"), msg("2"), None, msg("3")])
            .unwrap();
        assert_eq!(ids(&cache.fetch_all("channel1").unwrap()), ["1", "2", "3"]);
    }

    #[test]
    fn batch_larger_than_capacity_keeps_tail() {
        let cache = MessageCache::new(3);
        let batch: Vec<_> = (0..8).map(|i| msg(&i.to_string())).collect();
        cache.insert_batch("channel1", batch).unwrap();
        assert_eq!(ids(&cache.fetch_all("channel1").unwrap()), ["5", "6", "7"]);
    }

    #[test]
    fn batch_deduplicates_within_itself() {
        let cache = MessageCache::new(10);
        cache
            .insert_batch("channel1", vec![msg("1"), msg("1"), msg("2")])
            .unwrap();
        assert_eq!(ids(&cache.fetch_all("channel1").unwrap()), ["1", "2"]);
    }

    #[test]
    fn batch_of_only_none_creates_empty_channel() {
        let cache: MessageCache = MessageCache::new(10);
        cache.insert_batch("channel1", vec![None, None]).unwrap();
        assert!(cache.contains_key("channel1"));
        assert!(cache.fetch_all("channel1").unwrap().is_empty());
    }

    #[test]
    fn batch_with_empty_key_fails() {
        let cache = MessageCache::new(10);
        assert_eq!(
            cache.insert_batch("", vec![msg("1")]),
            Err(CacheError::InvalidChannel)
        );
    }
}

mod clear_and_resize {
    use super::*;

    #[test]
    fn clear_keeps_channel() {
        let cache = MessageCache::new(10);
        fill(&cache, "channel1", 0..4);
        cache.clear("channel1").unwrap();
        assert_eq!(cache.fetch_all("channel1").unwrap().len(), 0);
        assert_eq!(cache.key_count(), 1);
    }

    #[test]
    fn clear_then_reinsert_same_ids() {
        let cache = MessageCache::new(10);
        fill(&cache, "channel1", 0..3);
        cache.clear("channel1").unwrap();
        fill(&cache, "channel1", 0..3);
        assert_eq!(ids(&cache.fetch_all("channel1").unwrap()), ["0", "1", "2"]);
    }

    #[test]
    fn clear_missing_channel_is_ok() {
        let cache: MessageCache = MessageCache::new(10);
        assert_eq!(cache.clear("nonexistent"), Ok(()));
        assert_eq!(cache.clear(""), Err(CacheError::InvalidChannel));
    }

    #[test]
    fn shrink_keeps_most_recent() {
        let cache = MessageCache::new(5);
        fill(&cache, "channel1", 0..5);
        cache.set_capacity(3).unwrap();
        assert_eq!(ids(&cache.fetch_all("channel1").unwrap()), ["2", "3", "4"]);
    }

    #[test]
    fn shrink_after_wrap_keeps_most_recent() {
        let cache = MessageCache::new(4);
        fill(&cache, "channel1", 0..6);
        cache.set_capacity(2).unwrap();
        assert_eq!(ids(&cache.fetch_all("channel1").unwrap()), ["4", "5"]);
    }

    #[test]
    fn grow_keeps_everything_and_accepts_more() {
        let cache = MessageCache::new(3);
        fill(&cache, "channel1", 0..5);
        cache.set_capacity(6).unwrap();
        fill(&cache, "channel1", 5..9);
        assert_eq!(
            ids(&cache.fetch_all("channel1").unwrap()),
            ["3", "4", "5", "6", "7", "8"]
        );
    }

    #[test]
    fn shrink_frees_ids_for_reinsertion() {
        let cache = MessageCache::new(4);
        fill(&cache, "channel1", 0..4);
        cache.set_capacity(2).unwrap();
        cache.insert("channel1", msg("0")).unwrap();
        assert_eq!(ids(&cache.fetch_all("channel1").unwrap()), ["3", "0"]);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let cache: MessageCache = MessageCache::new(5);
        assert_eq!(cache.set_capacity(0), Err(CacheError::InvalidLimit));
        assert_eq!(cache.capacity(), 5);
    }
}

mod views {
    use super::*;

    #[test]
    fn contiguous_window_is_borrowed() {
        let cache = MessageCache::new(5);
        fill(&cache, "channel1", 0..3);
        let view = cache.fetch_all_view("channel1").unwrap();
        assert!(view.is_borrowed());
        assert_eq!(ids(&view), ["0", "1", "2"]);
    }

    #[test]
    fn wrapped_window_is_copied() {
        let cache = MessageCache::new(3);
        fill(&cache, "channel1", 0..4);
        let view = cache.fetch_all_view("channel1").unwrap();
        assert!(!view.is_borrowed());
        assert_eq!(ids(&view), ["1", "2", "3"]);

        // copied views hold no lock
        cache.insert("channel1", msg("9")).unwrap();
        assert_eq!(view.len(), 3);
    }

    #[test]
    fn owned_snapshot_is_unaffected_by_later_writes() {
        let cache = MessageCache::new(3);
        fill(&cache, "channel1", 0..3);
        let before = cache.fetch_all("channel1").unwrap();
        fill(&cache, "channel1", 3..6);
        assert_eq!(ids(&before), ["0", "1", "2"]);
    }
}

mod store_trait {
    use super::*;

    fn drive(store: &dyn ChannelStore<Message>) -> Vec<String> {
        store.insert("t", msg("1")).unwrap();
        store.insert_batch("t", vec![msg("2"), msg("3")]).unwrap();
        ids(&store.fetch_limit("t", 2).unwrap())
    }

    #[test]
    fn cache_and_arc_work_through_trait() {
        let cache: MessageCache = MessageCache::new(10);
        assert_eq!(drive(&cache), ["2", "3"]);

        let shared: Arc<MessageCache> = Arc::new(MessageCache::new(10));
        assert_eq!(drive(&shared), ["2", "3"]);
    }
}

mod custom_records {
    use super::*;

    #[derive(Debug)]
    struct Event {
        key: String,
        seq: u64,
    }

    impl Record for Event {
        fn id(&self) -> &str {
            &self.key
        }
    }

    #[test]
    fn any_record_type_can_be_cached() {
        let cache: MessageCache<Event> = CacheBuilder::new(2).build();
        for seq in 0..3 {
            cache
                .insert_record("events", Event {
                    key: format!("e{seq}"),
                    seq,
                })
                .unwrap();
        }
        let seqs: Vec<u64> = cache
            .fetch_all("events")
            .unwrap()
            .iter()
            .map(|e| e.seq)
            .collect();
        assert_eq!(seqs, [1, 2]);
    }
}
