//! Search result rendering: options, validation, and the orchestrator
//!
//! [`run_search`] is the single entry point: it validates the configured
//! options before touching the engine, builds the query, constructs the
//! printer for the requested encoding, and dispatches to the renderer for
//! the requested result granularity.

mod messages;
mod tags;
mod threads;
mod window;

pub use tags::collect_tags;
pub use threads::thread_queries;
pub use window::RenderWindow;

use std::io::Write;

use crate::engine::{Exclude, MailIndex, Query, Sort};
use crate::error::{Error, Result};
use crate::printer::Format;

use messages::MessageMode;

/// Oldest structured-format version consumers may request
pub const MIN_FORMAT_VERSION: u32 = 1;
/// Newest structured-format version this crate emits
pub const MAX_FORMAT_VERSION: u32 = 2;

/// Requested result granularity
///
/// Sender and recipients extraction may combine; nothing else does, which
/// the variant shape makes unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    /// One summary record per thread
    Summary,
    /// Bare thread ids
    Threads,
    /// Bare message ids
    Messages,
    /// Message file paths
    Files,
    /// The tag set over the match set
    Tags,
    /// Mailboxes extracted from address headers
    Addresses { sender: bool, recipients: bool },
}

/// Settings for one search invocation
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// The search expression
    pub query: String,
    /// Result granularity
    pub output: Output,
    /// Output encoding
    pub format: Format,
    /// Structured-format version; 2 adds the per-thread query field
    pub format_version: u32,
    /// Result order
    pub sort: Sort,
    /// Requested offset; negative counts from the end
    pub offset: i64,
    /// Maximum records to emit; `None` is unlimited
    pub limit: Option<usize>,
    /// Duplicate selector for files/messages output, 1-based
    pub dupe: Option<usize>,
    /// Excluded-tag policy
    pub exclude: Exclude,
    /// Tags the exclude policy applies to
    pub exclude_tags: Vec<String>,
}

impl SearchOptions {
    /// Options for `query` with every parameter at its default
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            output: Output::Summary,
            format: Format::Text,
            format_version: 1,
            sort: Sort::NewestFirst,
            offset: 0,
            limit: None,
            dupe: None,
            exclude: Exclude::True,
            exclude_tags: Vec::new(),
        }
    }

    /// Reject unsupported combinations before any engine interaction
    fn validate(&self) -> Result<()> {
        if self.dupe.is_some() && !matches!(self.output, Output::Files | Output::Messages) {
            return Err(Error::DupeUnsupported);
        }
        if self.format == Format::Text0 && self.output == Output::Summary {
            return Err(Error::Text0WithSummary);
        }
        if self.output
            == (Output::Addresses {
                sender: false,
                recipients: false,
            })
        {
            return Err(Error::EmptyAddressOutput);
        }
        if !(MIN_FORMAT_VERSION..=MAX_FORMAT_VERSION).contains(&self.format_version) {
            return Err(Error::UnsupportedFormatVersion(self.format_version));
        }
        Ok(())
    }
}

/// Run one search against `index` and render the results to `out`.
///
/// A single deterministic pass: configuration errors surface before any
/// engine call and leave the output untouched; empty result sets render as
/// an empty list and are not an error.
pub fn run_search<W: Write>(index: &dyn MailIndex, opts: &SearchOptions, out: W) -> Result<()> {
    opts.validate()?;

    let mut exclude = opts.exclude;
    if exclude == Exclude::Flag && opts.output != Output::Summary {
        // Only summary records have a place to surface the excluded flag.
        log::warn!("this output format cannot flag excluded messages; including them");
        exclude = Exclude::False;
    }

    let query = Query::new(&opts.query)
        .with_sort(opts.sort)
        .with_exclude(exclude, opts.exclude_tags.clone());

    let mut printer = opts.format.printer(out);
    let format = printer.as_mut();

    match opts.output {
        Output::Summary => threads::print_thread_results(index, &query, opts, format, false),
        Output::Threads => threads::print_thread_results(index, &query, opts, format, true),
        Output::Messages => {
            messages::print_message_results(index, &query, opts, format, MessageMode::Ids)
        }
        Output::Files => {
            messages::print_message_results(index, &query, opts, format, MessageMode::Files)
        }
        Output::Addresses { sender, recipients } => messages::print_message_results(
            index,
            &query,
            opts,
            format,
            MessageMode::Addresses { sender, recipients },
        ),
        Output::Tags => tags::print_tag_results(index, &query, format),
    }
}
