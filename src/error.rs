//! Error types for pattern-table configuration.
//!
//! The engines themselves are infallible: missing content, absent or
//! malformed style hints, unknown anchor kinds and empty inputs are all
//! normal values. The only fallible surface is building a configuration
//! from caller-supplied pattern strings.

use thiserror::Error;

/// Errors raised while building caption or layout pattern tables.
#[derive(Error, Debug)]
pub enum StructureError {
    /// A caller-supplied pattern string failed to compile.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern string as supplied by the caller.
        pattern: String,
        /// The underlying regex compilation error.
        #[source]
        source: regex::Error,
    },
}

/// Result type alias for configuration-building operations.
pub type Result<T> = std::result::Result<T, StructureError>;
