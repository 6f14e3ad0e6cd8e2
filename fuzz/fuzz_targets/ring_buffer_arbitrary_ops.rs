#![no_main]

use std::collections::VecDeque;
use std::sync::Arc;

use chancache::ds::RingBuffer;
use chancache::record::{Message, Record};
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences on RingBuffer
//
// Mirrors every operation on a VecDeque model and compares contents after
// each step, on top of the structural invariant check.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // First byte picks the capacity (1-32)
    let mut capacity = (data[0] as usize) % 32 + 1;
    let mut ring: RingBuffer<Message> = RingBuffer::new(capacity);
    let mut model: VecDeque<String> = VecDeque::new();

    let mut idx = 1;
    while idx + 1 < data.len() {
        let op = data[idx] % 6;
        let arg = data[idx + 1];
        // small id space so duplicates are common
        let id = (arg % 48).to_string();

        match op {
            0 | 1 => {
                let stored = ring.insert(Arc::new(Message::new(id.clone(), ""))).is_stored();
                assert_eq!(stored, !model.contains(&id));
                if stored {
                    if model.len() == capacity {
                        model.pop_front();
                    }
                    model.push_back(id);
                }
            },
            2 => {
                // Batch of up to four items, every third one absent
                let count = (arg % 5) as usize;
                let batch: Vec<_> = (0..count)
                    .map(|j| {
                        let id = ((arg as usize + j) % 48).to_string();
                        (j % 3 != 2).then(|| Arc::new(Message::new(id, "")))
                    })
                    .collect();
                for record in batch.iter().flatten() {
                    let id = record.id().to_owned();
                    if !model.contains(&id) {
                        if model.len() == capacity {
                            model.pop_front();
                        }
                        model.push_back(id);
                    }
                }
                ring.insert_batch(batch);
            },
            3 => {
                let limit = (arg % 40) as usize + 1;
                let snap = ring.snapshot(Some(limit));
                assert_eq!(snap.len(), limit.min(model.len()));
            },
            4 => {
                capacity = (arg as usize) % 32 + 1;
                ring.resize(capacity).unwrap();
                while model.len() > capacity {
                    model.pop_front();
                }
            },
            5 => {
                ring.clear();
                model.clear();
            },
            _ => unreachable!(),
        }

        // Validate invariants after each operation
        ring.check_invariants().unwrap();
        assert_eq!(ring.capacity(), capacity);
        let got: Vec<&str> = ring.iter().map(|r| r.id()).collect();
        let want: Vec<&str> = model.iter().map(String::as_str).collect();
        assert_eq!(got, want);

        idx += 2;
    }
});
