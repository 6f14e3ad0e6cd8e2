//! Walks through the cache operations on a private instance.
//!
//! Run with: `RUST_LOG=chancache=debug cargo run --example basic`

use std::sync::Arc;

use chancache::prelude::*;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();
}

fn print_channel(cache: &MessageCache, key: &str) -> Result<(), CacheError> {
    let records = cache.fetch_all(key)?;
    println!("{key} ({} records):", records.len());
    for record in &records {
        println!(
            "  [{}] {}: {}",
            record.id,
            record.author.as_deref().unwrap_or("?"),
            record.content
        );
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let cache = CacheBuilder::new(3).key_capacity_hint(8).try_build::<Message>()?;

    for (id, author, text) in [
        ("1", "ada", "morning"),
        ("2", "grace", "standup in 5"),
        ("3", "ada", "joining"),
        ("4", "linus", "late, sorry"),
    ] {
        cache.insert_record(
            "general",
            Message::new(id, text).with_author(author).with_channel("general"),
        )?;
    }
    // oldest message was evicted
    print_channel(&cache, "general")?;

    // duplicates are ignored
    cache.insert_record("general", Message::new("4", "late, sorry"))?;
    println!("after duplicate: {:?}", cache.len("general"));

    cache.insert_batch("random", vec![
        Some(Arc::new(Message::new("a", "cats"))),
        None,
        Some(Arc::new(Message::new("b", "dogs"))),
    ])?;
    let latest = cache.fetch_limit("random", 1)?;
    println!("latest in random: {}", latest[0].content);

    {
        let view = cache.fetch_all_view("random")?;
        println!("view borrowed: {}, len: {}", view.is_borrowed(), view.len());
    }

    cache.set_capacity(5)?;
    println!("capacity now {}", cache.capacity());

    cache.clear("general")?;
    print_channel(&cache, "general")?;

    if let Err(err) = cache.fetch_all("unknown") {
        println!("unknown channel: {err}");
    }
    Ok(())
}
