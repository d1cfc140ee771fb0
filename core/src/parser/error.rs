use thiserror::Error;

use crate::api::{Diagnostic, Severity};
use crate::syntax::Location;

/// Lexical or grammatical failure. Parsing stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {location}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub location: Location,
}

/// Specific kinds of parse errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("Unexpected character '{found}'")]
    UnexpectedCharacter { found: String },

    /// `found` is the opening quote.
    #[error("Unterminated string literal")]
    UnterminatedString { found: String },

    #[error("Invalid number literal '{found}'")]
    InvalidNumber { found: String },

    #[error("Unexpected '{found}', expected {expected}")]
    UnexpectedToken { found: String, expected: String },

    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: String },

    #[error("Expression nesting depth exceeds maximum of {max_depth} levels")]
    MaxDepthExceeded { found: String, max_depth: usize },
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, location: Location) -> Self {
        Self { kind, location }
    }

    /// Source text of the offending token (empty at end of input).
    pub fn found(&self) -> &str {
        match &self.kind {
            ParseErrorKind::UnexpectedCharacter { found }
            | ParseErrorKind::UnterminatedString { found }
            | ParseErrorKind::InvalidNumber { found }
            | ParseErrorKind::UnexpectedToken { found, .. }
            | ParseErrorKind::MaxDepthExceeded { found, .. } => found,
            ParseErrorKind::UnexpectedEnd { .. } => "",
        }
    }

    /// Convert to a Diagnostic for API boundary
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (code, help) = match &self.kind {
            ParseErrorKind::UnexpectedToken { .. } => ("P001", None),
            ParseErrorKind::UnexpectedEnd { .. } => {
                ("P002", Some("The expression ends too early"))
            }
            ParseErrorKind::InvalidNumber { .. } => ("P003", Some("Check the number format")),
            ParseErrorKind::MaxDepthExceeded { .. } => {
                ("P004", Some("Reduce nesting or simplify the expression"))
            }
            ParseErrorKind::UnexpectedCharacter { .. } => ("P005", None),
            ParseErrorKind::UnterminatedString { .. } => {
                ("P006", Some("Add the missing closing quote"))
            }
        };

        Diagnostic {
            severity: Severity::Error,
            message: self.kind.to_string(),
            span: self.location.span(),
            help: help.map(str::to_string),
            code: Some(code.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Span;

    fn at(offset: usize, len: usize) -> Location {
        Location {
            offset,
            len,
            line: 1,
            column: offset + 1,
        }
    }

    #[test]
    fn test_parse_error_to_diagnostic() {
        let error = ParseError::new(
            ParseErrorKind::UnexpectedToken {
                found: ",".to_string(),
                expected: "expression".to_string(),
            },
            at(10, 1),
        );

        let diagnostic = error.to_diagnostic();
        assert_eq!(diagnostic.severity, Severity::Error);
        assert_eq!(diagnostic.message, "Unexpected ',', expected expression");
        assert_eq!(diagnostic.code.as_deref(), Some("P001"));
        assert_eq!(diagnostic.span, Span(10..11));
    }

    #[test]
    fn test_display_includes_position() {
        let error = ParseError::new(
            ParseErrorKind::UnexpectedCharacter {
                found: "#".to_string(),
            },
            at(4, 1),
        );
        assert_eq!(
            error.to_string(),
            "Unexpected character '#' at line 1, column 5"
        );
        assert_eq!(error.found(), "#");
    }

    #[test]
    fn test_unexpected_end_has_no_text() {
        let error = ParseError::new(
            ParseErrorKind::UnexpectedEnd {
                expected: "')'".to_string(),
            },
            at(3, 0),
        );
        assert_eq!(error.found(), "");
        assert_eq!(error.to_diagnostic().code.as_deref(), Some("P002"));
    }
}
