//! Query model and the mail index interface
//!
//! The index itself (compilation, ranking, tag storage) lives outside this
//! crate; [`MailIndex`] is the seam the renderers consume. Cursors are
//! single-use, forward-only iterators: dropping one releases it, and there
//! is no random access or implicit length.

mod memory;

pub use memory::InMemoryIndex;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::models::{Message, Thread};

/// The universal query string, matched by every message
pub const WILDCARD_QUERY: &str = "*";

/// Result order for searches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sort {
    OldestFirst,
    #[default]
    NewestFirst,
}

/// How messages carrying an excluded tag are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Exclude {
    /// Include excluded messages as if the tag were not configured
    False,
    /// Omit excluded messages from matching
    #[default]
    True,
    /// Include excluded messages but mark them; only summary output has a
    /// place to surface the mark
    Flag,
    /// Omit excluded messages from results entirely
    All,
}

/// A search expression with its execution settings
///
/// Immutable for the duration of one invocation; the orchestrator builds it
/// from [`SearchOptions`](crate::search::SearchOptions) and hands it to the
/// engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    query: String,
    sort: Sort,
    exclude: Exclude,
    exclude_tags: Vec<String>,
}

impl Query {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            sort: Sort::default(),
            exclude: Exclude::default(),
            exclude_tags: Vec::new(),
        }
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_exclude(mut self, exclude: Exclude, exclude_tags: Vec<String>) -> Self {
        self.exclude = exclude;
        self.exclude_tags = exclude_tags;
        self
    }

    /// The original query string
    pub fn query_string(&self) -> &str {
        &self.query
    }

    pub fn sort(&self) -> Sort {
        self.sort
    }

    pub fn exclude(&self) -> Exclude {
        self.exclude
    }

    pub fn exclude_tags(&self) -> &[String] {
        &self.exclude_tags
    }
}

/// Lazy thread result cursor
pub type ThreadCursor = Box<dyn Iterator<Item = Thread>>;
/// Lazy message result cursor
pub type MessageCursor = Box<dyn Iterator<Item = Message>>;

/// The mail index/query engine this crate renders results from
///
/// Counting is a dedicated operation, independent of iterating results; it
/// is what negative offsets resolve against.
pub trait MailIndex: Send + Sync {
    /// Count threads matching the query
    fn count_threads(&self, query: &Query) -> Result<usize>;

    /// Count messages matching the query
    fn count_messages(&self, query: &Query) -> Result<usize>;

    /// Stream threads matching the query, in the query's sort order
    fn search_threads(&self, query: &Query) -> Result<ThreadCursor>;

    /// Stream messages matching the query, in the query's sort order
    fn search_messages(&self, query: &Query) -> Result<MessageCursor>;

    /// The global tag vocabulary, deduplicated and sorted
    fn all_tags(&self) -> Result<Vec<String>>;
}

/// Build an exact-match boolean term `field:value`.
///
/// The value is quoted when it is empty or contains characters the query
/// grammar would otherwise interpret; an embedded double quote is doubled.
/// Escaping round-trips: parsing the returned term yields the original
/// value again.
pub fn boolean_term(field: &str, value: &str) -> String {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| !c.is_whitespace() && !matches!(c, '(' | ')' | '"'));
    if plain {
        return format!("{}:{}", field, value);
    }

    let mut out = String::with_capacity(field.len() + value.len() + 3);
    out.push_str(field);
    out.push(':');
    out.push('"');
    for c in value.chars() {
        if c == '"' {
            out.push('"');
        }
        out.push(c);
    }
    out.push('"');
    out
}
