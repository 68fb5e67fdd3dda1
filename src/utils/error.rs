//! Error handling for mathlax parsing
//!
//! Only structural problems are errors: a required terminator that is
//! missing when the input runs out, or nesting deeper than the configured
//! limit. Everything else (unknown commands, mismatched `\end`, missing
//! arguments, stray `#`) is tolerated by the parser.

use thiserror::Error;

/// Structural parse error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input ended while a token was still required
    #[error("Unexpected end of input: expected {expected}")]
    UnexpectedEof { expected: String },

    /// A group, argument or environment was opened but never closed
    #[error("Unterminated {construct}")]
    Unterminated { construct: String },

    /// A specific token was required but something else was found
    #[error("Expected {expected}, found '{found}'")]
    UnexpectedToken { expected: String, found: String },

    /// Nesting exceeded [`ParserOptions::max_depth`](crate::ParserOptions)
    #[error("Nesting depth limit of {limit} exceeded")]
    DepthExceeded { limit: usize },
}

impl ParseError {
    pub fn unterminated(construct: impl Into<String>) -> Self {
        ParseError::Unterminated {
            construct: construct.into(),
        }
    }
}

/// Result type for parse operations
pub type ParseResult<T> = Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ParseError::unterminated("group").to_string(),
            "Unterminated group"
        );
        assert_eq!(
            ParseError::UnexpectedEof {
                expected: "'}'".into()
            }
            .to_string(),
            "Unexpected end of input: expected '}'"
        );
        assert_eq!(
            ParseError::DepthExceeded { limit: 8 }.to_string(),
            "Nesting depth limit of 8 exceeded"
        );
    }
}
