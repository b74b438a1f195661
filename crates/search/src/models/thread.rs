//! Thread model representing a conversation aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MessageId;

/// Unique identifier for a thread
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThreadId(pub String);

impl ThreadId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ThreadId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ThreadId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A message's membership in a thread, with its match status against the
/// active query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadMember {
    /// Message ID
    pub id: MessageId,
    /// Whether the message itself satisfies the active query
    pub matched: bool,
}

/// A thread groups related messages into one conversation; some of them
/// match the active query, some do not
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    /// Thread ID
    pub id: ThreadId,
    /// Author display names, engine order
    pub authors: String,
    /// Subject line of the thread
    pub subject: String,
    /// Timestamp of the oldest matched message
    pub oldest_date: DateTime<Utc>,
    /// Timestamp of the newest matched message
    pub newest_date: DateTime<Utc>,
    /// Number of messages matching the query
    pub matched_count: usize,
    /// Total number of messages in the thread
    pub total_count: usize,
    /// Tags over all messages, engine order, no duplicates
    pub tags: Vec<String>,
    /// Constituent messages with their match flags, oldest first
    pub members: Vec<ThreadMember>,
}

impl Thread {
    /// Create a new thread with the given properties
    pub fn new(
        id: ThreadId,
        authors: String,
        subject: String,
        oldest_date: DateTime<Utc>,
        newest_date: DateTime<Utc>,
        matched_count: usize,
        total_count: usize,
        tags: Vec<String>,
        members: Vec<ThreadMember>,
    ) -> Self {
        Self {
            id,
            authors,
            subject,
            oldest_date,
            newest_date,
            matched_count,
            total_count,
            tags,
            members,
        }
    }
}
