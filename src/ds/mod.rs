pub mod ring_buffer;

pub use ring_buffer::{BatchOutcome, Insertion, RingBuffer, Window};
