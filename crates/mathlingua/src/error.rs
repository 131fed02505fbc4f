//! Error types for MathLingua operations.
//!
//! Problems inside a document are diagnostics, not errors. A
//! [`MathlinguaError`] means a check could not run at all: a path could not
//! be read, a configuration was rejected, or a caller asked for a strict
//! parse of a document with errors.

use std::io;

use thiserror::Error;

use mathlingua_parser::error::ParseError;

/// The main error type for MathLingua operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the source text next to the diagnostics so
/// that callers can render snippets for every labeled span.
#[derive(Debug, Error)]
pub enum MathlinguaError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MathlinguaError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
