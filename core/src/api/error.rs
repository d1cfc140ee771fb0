//! Public error types.
//!
//! Internal errors ([`ParseError`], [`EvalError`]) are converted to these
//! types at the [`Engine`](super::Engine) boundary. Every variant keeps the
//! source text so a renderer can draw a snippet.

use core::fmt;

use thiserror::Error;

use crate::evaluator::EvalError;
use crate::parser::{ParseError, ParseErrorKind};
use crate::syntax::Span;

/// Public error type for compiling and running expressions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The source failed to tokenize or parse.
    #[error("Compilation failed: {error}")]
    Compilation {
        #[source]
        error: ParseError,
        src: String,
    },

    /// Evaluation failed.
    #[error("Runtime error: {error}")]
    Runtime {
        #[source]
        error: EvalError,
        src: String,
    },

    /// A nesting or stack limit was hit.
    #[error("Resource limit exceeded: {message}")]
    ResourceExceeded {
        message: String,
        diagnostic: Diagnostic,
        src: String,
    },
}

impl Error {
    pub(crate) fn compilation(error: ParseError, source: &str) -> Self {
        if matches!(error.kind, ParseErrorKind::MaxDepthExceeded { .. }) {
            return Error::ResourceExceeded {
                message: error.kind.to_string(),
                diagnostic: error.to_diagnostic(),
                src: source.to_string(),
            };
        }
        Error::Compilation {
            error,
            src: source.to_string(),
        }
    }

    pub(crate) fn runtime(error: EvalError, source: &str) -> Self {
        if error.is_resource_exceeded() {
            return Error::ResourceExceeded {
                message: error.to_string(),
                diagnostic: error.to_diagnostic(),
                src: source.to_string(),
            };
        }
        Error::Runtime {
            error,
            src: source.to_string(),
        }
    }

    /// Source text of the expression that failed.
    pub fn source_text(&self) -> &str {
        match self {
            Error::Compilation { src, .. }
            | Error::Runtime { src, .. }
            | Error::ResourceExceeded { src, .. } => src,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Error::Compilation { error, .. } => error.to_diagnostic(),
            Error::Runtime { error, .. } => error.to_diagnostic(),
            Error::ResourceExceeded { diagnostic, .. } => diagnostic.clone(),
        }
    }
}

/// A diagnostic message with a source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,

    /// Primary diagnostic message.
    pub message: String,

    /// Byte range of the primary issue.
    pub span: Span,

    /// Optional help text suggesting how to fix the issue.
    pub help: Option<String>,

    /// Stable error code, `P0xx` for parse errors and `E0xx` for evaluation
    /// errors.
    pub code: Option<String>,
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Location;

    #[test]
    fn test_parse_depth_is_a_resource_limit() {
        let error = ParseError::new(
            ParseErrorKind::MaxDepthExceeded {
                found: "(".to_string(),
                max_depth: 2,
            },
            Location::default(),
        );
        let error = Error::compilation(error, "((1))");
        assert!(matches!(error, Error::ResourceExceeded { .. }));
        assert_eq!(error.source_text(), "((1))");
        assert_eq!(error.to_diagnostic().code.as_deref(), Some("P004"));
    }

    #[test]
    fn test_runtime_keeps_eval_error() {
        let error = Error::runtime(
            EvalError::UndefinedVariable {
                name: "$a".to_string(),
                location: Location::default(),
            },
            "$a",
        );
        assert_eq!(
            error.to_string(),
            "Runtime error: Variable is not defined in the context: $a"
        );
        assert_eq!(error.to_diagnostic().code.as_deref(), Some("E001"));
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Error.to_string(), "error");
        assert_eq!(Severity::Warning.to_string(), "warning");
    }
}
