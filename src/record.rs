//! Payload identity.
//!
//! The cache never inspects payloads beyond their id. Anything that can name
//! itself with a stable, unique string implements [`Record`] and can be
//! cached; [`Message`] is the ready-made payload used by the process-wide
//! instance in [`global`](crate::global).
//!
//! ## Example Usage
//!
//! ```
//! use chancache::record::{Message, Record};
//!
//! let msg = Message::new("1042", "hello")
//!     .with_channel("general")
//!     .with_author("ferris");
//!
//! assert_eq!(msg.id(), "1042");
//! assert_eq!(msg.author.as_deref(), Some("ferris"));
//! ```

use std::sync::Arc;

/// A cacheable payload with a unique string identifier.
///
/// The id is the deduplication key inside a channel: two records with the
/// same id are the same record as far as the cache is concerned. Records are
/// stored behind [`Arc`] and handed back to many readers, so they must be
/// treated as immutable once inserted.
pub trait Record {
    /// Returns the record's unique identifier.
    ///
    /// The empty string is a valid id and deduplicates like any other; only
    /// channel keys are validated.
    fn id(&self) -> &str;
}

impl<T: Record + ?Sized> Record for Box<T> {
    fn id(&self) -> &str {
        (**self).id()
    }
}

impl<T: Record + ?Sized> Record for Arc<T> {
    fn id(&self) -> &str {
        (**self).id()
    }
}

/// A chat message, the default payload type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Message {
    /// Unique message id.
    pub id: String,
    /// Channel the message was posted to, if known.
    pub channel_id: Option<String>,
    /// Message body.
    pub content: String,
    /// Author display name, if known.
    pub author: Option<String>,
}

impl Message {
    /// Creates a message with the given id and content.
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    /// Sets the originating channel.
    pub fn with_channel(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = Some(channel_id.into());
        self
    }

    /// Sets the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

impl Record for Message {
    fn id(&self) -> &str {
        &self.id
    }
}
