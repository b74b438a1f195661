//! Message model with headers and storage locations

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a message
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for MessageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A single email message
///
/// A message may be stored at several file-system locations when the same
/// message was delivered more than once; `filenames` keeps those locations
/// in engine order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Message ID
    pub id: MessageId,
    /// Raw header values, lookup is case-insensitive
    headers: Vec<(String, String)>,
    /// File-system locations storing this message, engine order
    pub filenames: Vec<PathBuf>,
    /// Message date
    pub date: DateTime<Utc>,
    /// Tags on this message
    pub tags: Vec<String>,
    /// Whether the message satisfies the active query
    pub matched: bool,
}

impl Message {
    /// Create a new message builder
    pub fn builder(id: MessageId) -> MessageBuilder {
        MessageBuilder::new(id)
    }

    /// Look up a raw header value by name, case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Builder for creating Message instances
pub struct MessageBuilder {
    id: MessageId,
    headers: Vec<(String, String)>,
    filenames: Vec<PathBuf>,
    date: Option<DateTime<Utc>>,
    tags: Vec<String>,
    matched: bool,
}

impl MessageBuilder {
    fn new(id: MessageId) -> Self {
        Self {
            id,
            headers: Vec::new(),
            filenames: Vec::new(),
            date: None,
            tags: Vec::new(),
            matched: false,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn filename(mut self, path: impl Into<PathBuf>) -> Self {
        self.filenames.push(path.into());
        self
    }

    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn matched(mut self, matched: bool) -> Self {
        self.matched = matched;
        self
    }

    pub fn build(self) -> Message {
        Message {
            id: self.id,
            headers: self.headers,
            filenames: self.filenames,
            date: self.date.unwrap_or_else(Utc::now),
            tags: self.tags,
            matched: self.matched,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_case_insensitive() {
        let msg = Message::builder(MessageId::new("m1"))
            .header("From", "alice@example.com")
            .header("Subject", "Hello")
            .build();
        assert_eq!(msg.header("from"), Some("alice@example.com"));
        assert_eq!(msg.header("FROM"), Some("alice@example.com"));
        assert_eq!(msg.header("subject"), Some("Hello"));
        assert_eq!(msg.header("cc"), None);
    }

    #[test]
    fn test_builder_defaults() {
        let msg = Message::builder(MessageId::new("m1")).build();
        assert!(msg.filenames.is_empty());
        assert!(msg.tags.is_empty());
        assert!(!msg.matched);
    }

    #[test]
    fn test_filenames_keep_order() {
        let msg = Message::builder(MessageId::new("m1"))
            .filename("/mail/cur/a")
            .filename("/mail/cur/b")
            .build();
        assert_eq!(msg.filenames[0], PathBuf::from("/mail/cur/a"));
        assert_eq!(msg.filenames[1], PathBuf::from("/mail/cur/b"));
    }
}
