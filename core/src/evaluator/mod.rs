//! Tree-walking evaluator.
//!
//! Walks a parsed [`Expr`] against a per-call [`Context`], producing a
//! [`Value`] or an [`EvalError`].
//!
//! ## Design Principles
//!
//! - **Never panic**: all adversarial inputs produce errors
//! - **Stack-safe**: depth tracking turns runaway nesting into
//!   [`EvalError::StackOverflow`]
//! - **Stateless between calls**: the tree, context and deny-list are only
//!   read, so evaluating the same tree twice gives the same result
//!
//! Side effects happen only inside host calls reached through function and
//! method calls.
//!
//! ## Example
//!
//! ```
//! use bumpalo::Bump;
//! use sandex_core::api::{Context, UnsafeFunctions};
//! use sandex_core::host::NoHost;
//! use sandex_core::values::Value;
//! use sandex_core::{evaluator, parser};
//!
//! let arena = Bump::new();
//! let parsed = parser::parse(&arena, "$a * 2 + 1").unwrap();
//! let context = Context::new().with("a", 20);
//! let result = evaluator::eval(parsed.expr, &context, &NoHost, &UnsafeFunctions::default());
//! assert_eq!(result, Ok(Value::Int(41)));
//! ```

mod error;
mod eval;
mod literals;
mod operators;

#[cfg(test)]
pub(crate) mod testing;


pub use error::{EvalError, Side};

use crate::api::{Context, ExecutionOptions, UnsafeFunctions};
use crate::host::HostAdapter;
use crate::parser::Expr;
use crate::values::Value;

/// Evaluate an expression with default limits.
///
/// Uses default stack depth limit of 1000.
pub fn eval(
    expr: &Expr<'_>,
    context: &Context,
    host: &dyn HostAdapter,
    unsafe_functions: &UnsafeFunctions,
) -> Result<Value, EvalError> {
    eval_with_options(
        expr,
        context,
        host,
        unsafe_functions,
        &ExecutionOptions::default(),
    )
}

/// Evaluate an expression with custom limits.
pub fn eval_with_options(
    expr: &Expr<'_>,
    context: &Context,
    host: &dyn HostAdapter,
    unsafe_functions: &UnsafeFunctions,
    options: &ExecutionOptions,
) -> Result<Value, EvalError> {
    eval::Evaluator::new(context, host, unsafe_functions, options.max_depth).eval(expr)
}
