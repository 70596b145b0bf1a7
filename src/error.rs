//! Error types for rs-readability.
//!
//! This module defines the error types returned by parsing operations.

/// Error type for article extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTML parsing failed.
    #[error("HTML parsing failed: {0}")]
    Parse(String),

    /// Document exceeds the configured element limit.
    #[error("document too large: {count} elements (limit {max})")]
    InputTooLarge {
        /// Number of elements found in the document.
        count: usize,
        /// Configured limit from `Options::max_elems_to_parse`.
        max: usize,
    },

    /// Extraction finished without finding readable content.
    #[error("no readable content found")]
    Unreadable,

    /// The base URL supplied by the caller could not be parsed.
    #[error("invalid base URL: {0}")]
    InvalidUrl(String),
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
