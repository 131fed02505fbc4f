//! Diagnostics for the MathLingua parser.
//!
//! Parsing never fails with a Rust error. Every phase appends
//! [`Diagnostic`]s to a per-document [`DiagnosticTracker`], installs a
//! default value, and keeps going. Each diagnostic carries:
//! - the [`Origin`] phase that produced it
//! - an optional [`ErrorCode`] for documentation and searchability
//! - labeled source spans, the first primary label fixing its position
//! - optional help text
//!
//! Callers that prefer a `Result` can turn the collected diagnostics into a
//! [`ParseError`] with [`DiagnosticTracker::finish`].
//!
//! # Example
//!
//! ```
//! # use mathlingua_parser::error::{Diagnostic, ErrorCode, Origin};
//! # use mathlingua_core::span::Span;
//!
//! let diag = Diagnostic::error(Origin::Phase5Parser, "Unexpected section 'given'")
//!     .with_code(ErrorCode::E401)
//!     .with_label(Span::new(40..46), "unexpected section")
//!     .with_secondary_label(Span::new(9..15), "first used here")
//!     .with_help("sections must follow the order of the group's schema");
//! ```

mod diagnostic;
mod error_code;
mod label;
mod origin;
mod parse_error;
mod severity;
mod tracker;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use origin::Origin;
pub use parse_error::ParseError;
pub use severity::Severity;
pub use tracker::DiagnosticTracker;
