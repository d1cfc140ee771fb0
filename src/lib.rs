//! Sandex - sandboxed evaluation of PHP-style expressions
//!
//! # Overview
//!
//! Sandex evaluates single expressions written in a PHP-like syntax against
//! a map of variables, for settings where end users write small pieces of
//! logic that the host application must run safely:
//!
//! - Template conditions and computed fields
//! - Routing and filtering rules
//! - Validation rules in configuration files
//!
//! Statements, assignment and by-reference arguments are not part of the
//! language. The only way an expression touches the outside world is
//! through a [`HostAdapter`], and calls to functions on the
//! [`UnsafeFunctions`] deny-list are rejected before the host is asked.
//!
//! # Quick Start
//!
//! ```
//! use bumpalo::Bump;
//! use sandex::{Context, Engine, EngineOptions, Value, stdlib};
//!
//! let arena = Bump::new();
//! let engine = Engine::new(&arena, EngineOptions::default());
//! let host = stdlib::function_table();
//!
//! let expr = engine.compile("strtoupper($name) . '!' ").unwrap();
//! let context = Context::new().with("name", "ada");
//! assert_eq!(expr.run(&context, &host).unwrap(), Value::from("ADA!"));
//! ```
//!
//! # Errors
//!
//! Compilation and evaluation failures are reported as [`Error`], which
//! keeps the source text; [`render_error`] and friends draw it with a
//! source snippet.

mod error_renderer;

pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
};

// Re-export public API from sandex_core
pub use sandex_core::api::{
    CompiledExpression, Context, DEFAULT_UNSAFE_FUNCTIONS, Diagnostic, Engine, EngineOptions,
    Error, ExecutionOptions, ParseOptions, Severity, UnsafeFunctions,
};

// Re-export commonly used types and values
pub use sandex_core::host::{self, FunctionTable, HostAdapter, HostError, NativeFn, NoHost};
pub use sandex_core::stdlib;
pub use sandex_core::values::{self, Array, Key, ObjectRef, Value, ValueKind};

// Re-export the pipeline stages for callers that manage their own trees
pub use sandex_core::evaluator::{self, EvalError};
pub use sandex_core::lexer;
pub use sandex_core::parser::{self, Expr, ParseError, ParseErrorKind, ParsedExpr};
