//! Several producer threads feeding the process-wide cache while a reader
//! polls the newest messages.
//!
//! Run with: `RUST_LOG=chancache=debug cargo run --example shared_global`

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chancache::prelude::*;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();
}

fn produce(store: &dyn ChannelStore<Message>, producer: usize) -> Result<(), CacheError> {
    for i in 0..40 {
        let id = format!("p{producer}-{i}");
        let msg = Message::new(id, format!("tick {i}")).with_author(format!("producer-{producer}"));
        store.insert("ticks", Some(Arc::new(msg)))?;
        thread::sleep(Duration::from_millis(1));
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let producers: Vec<_> = (0..4)
        .map(|p| thread::spawn(move || produce(&GlobalCache, p)))
        .collect();

    let reader = thread::spawn(|| {
        for _ in 0..5 {
            thread::sleep(Duration::from_millis(10));
            if let Ok(latest) = global().fetch_limit("ticks", 3) {
                let ids: Vec<&str> = latest.iter().map(|m| m.id()).collect();
                println!("newest: {ids:?}");
            }
        }
    });

    for producer in producers {
        producer.join().map_err(|_| "producer panicked")??;
    }
    reader.join().map_err(|_| "reader panicked")?;

    println!(
        "ticks holds {} of {} sent (capacity {})",
        global().len("ticks").unwrap_or(0),
        4 * 40,
        global().capacity()
    );
    Ok(())
}
