//! Compiled expressions.

use super::{Context, Engine, Error, ExecutionOptions};
use crate::evaluator::{self, EvalError};
use crate::host::HostAdapter;
use crate::parser::Expr;
use crate::values::Value;

/// A parsed expression ready for evaluation.
///
/// Compiled expressions borrow the [`Engine`] that produced them and can be
/// run any number of times with different contexts and hosts. Evaluation
/// never mutates the tree.
///
/// # Example
///
/// ```
/// use bumpalo::Bump;
/// use sandex_core::api::{Context, Engine, EngineOptions};
/// use sandex_core::host::NoHost;
/// use sandex_core::values::Value;
///
/// let arena = Bump::new();
/// let engine = Engine::new(&arena, EngineOptions::default());
/// let expr = engine.compile("$a > 10 ? 'big' : 'small'").unwrap();
///
/// let big = Context::new().with("a", 12);
/// let small = Context::new().with("a", 5);
/// assert_eq!(expr.run(&big, &NoHost).unwrap(), Value::from("big"));
/// assert_eq!(expr.run(&small, &NoHost).unwrap(), Value::from("small"));
/// ```
pub struct CompiledExpression<'e, 'arena> {
    engine: &'e Engine<'arena>,
    expr: &'arena Expr<'arena>,
    source: &'arena str,
}

impl core::fmt::Debug for CompiledExpression<'_, '_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CompiledExpression")
            .field("source", &self.source)
            .field("tree", &format_args!("{}", self.expr))
            .finish_non_exhaustive()
    }
}

impl<'e, 'arena> CompiledExpression<'e, 'arena> {
    pub(crate) fn new(
        engine: &'e Engine<'arena>,
        expr: &'arena Expr<'arena>,
        source: &'arena str,
    ) -> Self {
        Self {
            engine,
            expr,
            source,
        }
    }

    /// Evaluate, converting failures to the public [`Error`] type.
    ///
    /// Stack overflows are reported as [`Error::ResourceExceeded`].
    pub fn run(&self, context: &Context, host: &dyn HostAdapter) -> Result<Value, Error> {
        self.evaluate(context, host)
            .map_err(|e| Error::runtime(e, self.source))
    }

    /// Like [`run`](Self::run), with explicit limits instead of the engine's.
    pub fn run_with_options(
        &self,
        context: &Context,
        host: &dyn HostAdapter,
        options: &ExecutionOptions,
    ) -> Result<Value, Error> {
        evaluator::eval_with_options(
            self.expr,
            context,
            host,
            self.engine.unsafe_functions(),
            options,
        )
        .map_err(|e| Error::runtime(e, self.source))
    }

    /// Evaluate, returning the evaluator's own error type.
    pub fn evaluate(&self, context: &Context, host: &dyn HostAdapter) -> Result<Value, EvalError> {
        evaluator::eval_with_options(
            self.expr,
            context,
            host,
            self.engine.unsafe_functions(),
            &self.engine.options().execution,
        )
    }

    /// The expression tree. It lives in the engine's arena and can be shared
    /// across threads.
    pub fn expr(&self) -> &'arena Expr<'arena> {
        self.expr
    }

    pub fn source(&self) -> &'arena str {
        self.source
    }
}
