//! Error codes for the MathLingua diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Phase 1 lexer errors
//! - `E1xx` - Indentation errors
//! - `E2xx` - Bracketing errors
//! - `E3xx` - Group tree errors
//! - `E4xx` - Schema errors
//! - `E5xx` - Formulation errors
//! - `E6xx` - Configuration errors

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Phase 1 Lexer Errors (E0xx)
    // =========================================================================
    /// Unterminated text literal.
    ///
    /// A `"` was opened but never closed.
    E001,

    /// Unterminated formulation literal.
    ///
    /// A backtick was opened but never closed.
    E002,

    /// Unterminated text block.
    ///
    /// A `::` block was opened but never closed.
    E003,

    /// Unterminated id.
    ///
    /// A `[` was opened but its brackets never balanced on that line.
    E004,

    /// Unexpected character.
    E005,

    // =========================================================================
    // Indentation Errors (E1xx)
    // =========================================================================
    /// Tab character in indentation.
    E100,

    /// Indentation that is not a multiple of two or does not line up with
    /// an enclosing level.
    E101,

    // =========================================================================
    // Bracketing Errors (E2xx)
    // =========================================================================
    /// Indentation deeper than the construct allows.
    E200,

    /// A token that cannot start a section, argument, or group.
    E201,

    /// A group, section, or argument ended before it was complete.
    E202,

    // =========================================================================
    // Group Tree Errors (E3xx)
    // =========================================================================
    /// Malformed bracket stream.
    E300,

    // =========================================================================
    // Schema Errors (E4xx)
    // =========================================================================
    /// A required section is missing.
    E400,

    /// A section that fits no remaining schema slot.
    E401,

    /// A section that appears twice.
    E402,

    /// Wrong number of arguments for a section.
    E403,

    /// An argument of the wrong kind.
    E404,

    /// A required `[...]` id is missing.
    E405,

    /// No group kind matches the header at this position.
    E406,

    /// A recognized group kind with no matcher yet.
    E407,

    /// A malformed `piecewise:` body.
    E408,

    // =========================================================================
    // Formulation Errors (E5xx)
    // =========================================================================
    /// Unexpected character in a formulation.
    E500,

    /// Unexpected token in a formulation.
    E501,

    /// A formulation ended before it was complete.
    E502,

    // =========================================================================
    // Configuration Errors (E6xx)
    // =========================================================================
    /// The configuration file could not be read or parsed.
    E600,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            // Phase 1 lexer errors
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            ErrorCode::E005 => "E005",
            // Indentation errors
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            // Bracketing errors
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            // Group tree errors
            ErrorCode::E300 => "E300",
            // Schema errors
            ErrorCode::E400 => "E400",
            ErrorCode::E401 => "E401",
            ErrorCode::E402 => "E402",
            ErrorCode::E403 => "E403",
            ErrorCode::E404 => "E404",
            ErrorCode::E405 => "E405",
            ErrorCode::E406 => "E406",
            ErrorCode::E407 => "E407",
            ErrorCode::E408 => "E408",
            // Formulation errors
            ErrorCode::E500 => "E500",
            ErrorCode::E501 => "E501",
            ErrorCode::E502 => "E502",
            // Configuration errors
            ErrorCode::E600 => "E600",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            // Phase 1 lexer errors
            ErrorCode::E001 => "unterminated text literal",
            ErrorCode::E002 => "unterminated formulation",
            ErrorCode::E003 => "unterminated text block",
            ErrorCode::E004 => "unterminated id",
            ErrorCode::E005 => "unexpected character",
            // Indentation errors
            ErrorCode::E100 => "tab in indentation",
            ErrorCode::E101 => "misaligned indentation",
            // Bracketing errors
            ErrorCode::E200 => "unexpected indentation",
            ErrorCode::E201 => "unexpected token",
            ErrorCode::E202 => "premature end",
            // Group tree errors
            ErrorCode::E300 => "malformed structure",
            // Schema errors
            ErrorCode::E400 => "missing section",
            ErrorCode::E401 => "unexpected section",
            ErrorCode::E402 => "duplicate section",
            ErrorCode::E403 => "wrong argument count",
            ErrorCode::E404 => "wrong argument kind",
            ErrorCode::E405 => "missing id",
            ErrorCode::E406 => "unrecognized group",
            ErrorCode::E407 => "not yet supported",
            ErrorCode::E408 => "malformed piecewise",
            // Formulation errors
            ErrorCode::E500 => "unexpected character",
            ErrorCode::E501 => "unexpected token",
            ErrorCode::E502 => "unexpected end of formulation",
            // Configuration errors
            ErrorCode::E600 => "invalid configuration",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
