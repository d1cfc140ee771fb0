//! Public API for the expression engine.
//!
//! An [`Engine`] owns the arena-backed compilation settings and the
//! unsafe-function deny-list; [`Engine::compile`] parses a source string once
//! into a [`CompiledExpression`] that can be run any number of times against
//! different [`Context`]s and host adapters.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use sandex_core::api::{Context, Engine, EngineOptions};
//! use sandex_core::host::NoHost;
//! use sandex_core::values::Value;
//!
//! let arena = Bump::new();
//! let engine = Engine::new(&arena, EngineOptions::default());
//!
//! let expr = engine.compile("$price * $qty").unwrap();
//! let context = Context::new().with("price", 3).with("qty", 4);
//! assert_eq!(expr.run(&context, &NoHost).unwrap(), Value::Int(12));
//! ```

mod context;
mod engine;
mod error;
mod expression;
mod options;
mod policy;

pub use context::Context;
pub use engine::Engine;
pub use error::{Diagnostic, Error, Severity};
pub use expression::CompiledExpression;
pub use options::{EngineOptions, ExecutionOptions, ParseOptions};
pub use policy::{DEFAULT_UNSAFE_FUNCTIONS, UnsafeFunctions};
