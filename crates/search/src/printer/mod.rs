//! Pluggable structured printers
//!
//! Four encodings share one interface: linear text, null-delimited text,
//! JSON, and S-expressions. Renderers depend only on [`Printer`], never on
//! a concrete encoding, so every output mode emits the same logical field
//! set through any of them; only the rendering shape differs.

mod json;
mod sexp;
mod text;

pub use json::JsonPrinter;
pub use sexp::SexpPrinter;
pub use text::TextPrinter;

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

/// Output encoding selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Format {
    /// Human-oriented text, one record per line
    #[default]
    Text,
    /// Machine-oriented text with NUL record delimiters
    Text0,
    /// JSON tree
    Json,
    /// S-expression tree carrying the same field set as JSON
    Sexp,
}

impl Format {
    /// Construct the printer for this encoding over `out`
    pub fn printer<'a, W: Write + 'a>(self, out: W) -> Box<dyn Printer + 'a> {
        match self {
            Format::Text => Box::new(TextPrinter::new(out)),
            Format::Text0 => Box::new(TextPrinter::null_delimited(out)),
            Format::Json => Box::new(JsonPrinter::new(out)),
            Format::Sexp => Box::new(SexpPrinter::new(out)),
        }
    }
}

/// Structured printer interface
///
/// Structured encodings nest strictly: every `begin_*` must be closed by a
/// matching `end`, in call order. The text family ignores the structural
/// calls and renders values linearly.
pub trait Printer {
    fn begin_map(&mut self) -> io::Result<()>;
    fn begin_list(&mut self) -> io::Result<()>;
    fn end(&mut self) -> io::Result<()>;
    fn map_key(&mut self, key: &str) -> io::Result<()>;
    fn string(&mut self, value: &str) -> io::Result<()>;
    fn integer(&mut self, value: i64) -> io::Result<()>;
    fn null(&mut self) -> io::Result<()>;

    /// Terminate the current record (text family) or separate top-level
    /// records (a no-op for structured encodings).
    fn separator(&mut self) -> io::Result<()>;

    /// Text family: subsequent `string` calls render as `prefix:value`.
    /// Structured encodings ignore the prefix.
    fn set_prefix(&mut self, prefix: &str);

    /// Whether this is a linear text printer; renderers use this to compose
    /// compact one-line records instead of emitting map structure.
    fn is_text(&self) -> bool {
        false
    }
}
