#![no_main]

use std::sync::Arc;

use chancache::cache::MessageCache;
use chancache::error::CacheError;
use chancache::record::Message;
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences on MessageCache
//
// Checks the error contract and per-channel bounds across a handful of keys,
// including the empty key.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let cache: MessageCache = MessageCache::new((data[0] as usize) % 16);
    let keys = ["", "a", "b", "c"];

    let mut idx = 1;
    while idx + 1 < data.len() {
        let op = data[idx] % 6;
        let arg = data[idx + 1];
        let key = keys[(arg % 4) as usize];
        let record = (arg % 7 != 0).then(|| Arc::new(Message::new((arg / 4).to_string(), "")));

        match op {
            0 => match cache.insert(key, record.clone()) {
                Ok(()) => assert!(!key.is_empty() && record.is_some()),
                Err(CacheError::InvalidChannel) => assert!(key.is_empty()),
                Err(CacheError::NilMessage) => assert!(record.is_none()),
                Err(err) => panic!("unexpected insert error {err}"),
            },
            1 => {
                let batch = vec![record.clone(), None, record];
                let result = cache.insert_batch(key, batch);
                assert_eq!(result.is_err(), key.is_empty());
            },
            2 => {
                let limit = (arg % 5) as usize;
                match cache.fetch_limit(key, limit) {
                    Ok(records) => assert!(records.len() <= limit),
                    Err(CacheError::InvalidLimit) => assert_eq!(limit, 0),
                    Err(CacheError::CacheMiss) => assert!(!cache.contains_key(key)),
                    Err(CacheError::InvalidChannel) => assert!(key.is_empty()),
                    Err(err) => panic!("unexpected fetch error {err}"),
                }
            },
            3 => {
                if let Ok(view) = cache.fetch_all_view(key) {
                    let owned = view.to_vec();
                    drop(view);
                    assert_eq!(cache.fetch_all(key).ok(), Some(owned));
                }
            },
            4 => {
                let _ = cache.clear(key);
            },
            5 => {
                let capacity = (arg % 10) as usize;
                assert_eq!(cache.set_capacity(capacity).is_err(), capacity == 0);
            },
            _ => unreachable!(),
        }

        for key in cache.keys() {
            assert!(cache.len(&key).unwrap_or(0) <= cache.capacity());
        }

        idx += 2;
    }
});
