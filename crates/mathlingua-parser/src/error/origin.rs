//! The phase a diagnostic came from.

use std::fmt;

use serde::Serialize;

/// Which part of the toolchain produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Origin {
    Phase1Lexer,
    Phase2Lexer,
    Phase3Lexer,
    Phase4Parser,
    Phase5Parser,
    FormulationLexer,
    FormulationParser,
    Config,
}

impl Origin {
    /// The tag printed in debug output, such as `Phase1LexerOrigin`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Phase1Lexer => "Phase1LexerOrigin",
            Origin::Phase2Lexer => "Phase2LexerOrigin",
            Origin::Phase3Lexer => "Phase3LexerOrigin",
            Origin::Phase4Parser => "Phase4ParserOrigin",
            Origin::Phase5Parser => "Phase5ParserOrigin",
            Origin::FormulationLexer => "FormulationLexerOrigin",
            Origin::FormulationParser => "FormulationParserOrigin",
            Origin::Config => "ConfigOrigin",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_tags() {
        assert_eq!(Origin::Phase1Lexer.to_string(), "Phase1LexerOrigin");
        assert_eq!(Origin::FormulationParser.to_string(), "FormulationParserOrigin");
        assert_eq!(Origin::Config.as_str(), "ConfigOrigin");
    }
}
