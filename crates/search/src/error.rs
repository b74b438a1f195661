//! Error types for search rendering

use thiserror::Error;

/// Result alias using the crate error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while rendering search results
///
/// Configuration errors are raised before any engine interaction, so a
/// failing invocation produces no partial output.
#[derive(Debug, Error)]
pub enum Error {
    /// `dupe` was set for an output mode other than files or messages
    #[error("duplicate filtering is only supported with files and messages output")]
    DupeUnsupported,

    /// Null-delimited text cannot carry the multi-field summary line
    #[error("null-delimited text output is not compatible with summary output")]
    Text0WithSummary,

    /// Address output was requested with neither sender nor recipients
    #[error("address output requires at least one of sender or recipients")]
    EmptyAddressOutput,

    /// The requested structured-format version is outside the supported range
    #[error("unsupported format version {0}")]
    UnsupportedFormatVersion(u32),

    /// The engine could not produce a result sequence
    #[error("search engine error: {0}")]
    Engine(#[from] anyhow::Error),

    /// Writing to the output stream failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
