//! Mail search result rendering
//!
//! Renders the results of a boolean mail-search query into one of several
//! output encodings under pagination, deduplication, and field-selection
//! policies. The crate sits downstream of a mail index ([`MailIndex`]):
//! given a query and a result granularity, it walks the engine's lazy
//! result cursors, applies windowing and dedup rules, and serializes each
//! item through a pluggable printer.
//!
//! This crate provides:
//! - Domain models (Thread, Message, Mailbox/Address)
//! - The engine interface, with an in-memory reference implementation
//! - Printers for text, null-delimited text, JSON, and S-expressions
//! - The [`run_search`] orchestrator tying them together
//!
//! The engine itself (query compilation, ranking, tag storage) and process
//! concerns (argument parsing, configuration files) live outside this
//! crate.

pub mod display;
pub mod engine;
pub mod error;
pub mod models;
pub mod printer;
pub mod search;

pub use engine::{
    Exclude, InMemoryIndex, MailIndex, MessageCursor, Query, Sort, ThreadCursor, WILDCARD_QUERY,
    boolean_term,
};
pub use error::{Error, Result};
pub use models::{
    Address, Mailbox, Message, MessageBuilder, MessageId, Thread, ThreadId, ThreadMember,
    parse_address_list,
};
pub use printer::{Format, JsonPrinter, Printer, SexpPrinter, TextPrinter};
pub use search::{
    MAX_FORMAT_VERSION, MIN_FORMAT_VERSION, Output, RenderWindow, SearchOptions, collect_tags,
    run_search, thread_queries,
};
