//! Builder pattern for Event construction

use crate::event::Event;
use crate::tag::{Tag, Tags};
use crate::timestamp::Timestamp;

/// Fluent builder for constructing [`Event`] instances.
///
/// The builder produces an unsigned event; call [`Event::sign`] on the result
/// to fill `id`, `pubkey` and `sig`.
///
/// # Example
///
/// ```
/// use riptide_core::EventBuilder;
///
/// let event = EventBuilder::new()
///     .kind(1)
///     .created_at(1672068534)
///     .content("Hello, Nostr!")
///     .add_tag(["e", "referenced_event"])
///     .add_tag(["p", "mentioned_user"])
///     .build();
///
/// assert_eq!(event.kind, 1);
/// assert_eq!(event.tags.len(), 2);
/// ```
#[derive(Default)]
pub struct EventBuilder {
    pubkey: String,
    created_at: Timestamp,
    kind: u16,
    tags: Tags,
    content: String,
}

impl EventBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the author public key (overwritten by [`Event::sign`])
    pub fn pubkey<S: Into<String>>(mut self, pubkey: S) -> Self {
        self.pubkey = pubkey.into();
        self
    }

    /// Set the creation timestamp (seconds since the Unix epoch)
    pub fn created_at(mut self, timestamp: i64) -> Self {
        self.created_at = Timestamp(timestamp);
        self
    }

    /// Set the event kind
    pub fn kind(mut self, kind: u16) -> Self {
        self.kind = kind;
        self
    }

    /// Set the content
    pub fn content<S: Into<String>>(mut self, content: S) -> Self {
        self.content = content.into();
        self
    }

    /// Add a single tag from any iterator of string-like values
    pub fn add_tag<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.push(Tag::new(values));
        self
    }

    /// Replace all tags at once
    pub fn tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    /// Build the unsigned Event
    pub fn build(self) -> Event {
        Event {
            id: String::new(),
            pubkey: self.pubkey,
            created_at: self.created_at,
            kind: self.kind,
            tags: self.tags,
            content: self.content,
            sig: String::new(),
        }
    }
}
