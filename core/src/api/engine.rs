//! The compilation engine.

use bumpalo::Bump;
use tracing::debug;

use super::{CompiledExpression, EngineOptions, Error, UnsafeFunctions};
use crate::lexer::{TokenStream, tokenize};
use crate::parser;

/// Compiles expressions into an arena and holds the settings they run with.
///
/// The engine owns the unsafe-function deny-list. Compiled expressions
/// borrow the engine, so every run consults the deny-list in effect on the
/// engine itself; there is no process-wide policy.
///
/// # Lifetimes
///
/// - `'arena`: Lifetime of the arena holding source copies and expression
///   trees. All compiled expressions borrow from this arena.
///
/// # Example
///
/// ```
/// use bumpalo::Bump;
/// use sandex_core::api::{Context, Engine, EngineOptions, Error};
/// use sandex_core::host::FunctionTable;
/// use sandex_core::stdlib;
///
/// let arena = Bump::new();
/// let mut engine = Engine::new(&arena, EngineOptions::default());
/// engine.set_unsafe_functions(["strtoupper"]);
///
/// let host: FunctionTable = stdlib::function_table();
/// let expr = engine.compile("strtoupper('hi')").unwrap();
/// let err = expr.run(&Context::new(), &host).unwrap_err();
/// assert!(matches!(err, Error::Runtime { .. }));
/// ```
pub struct Engine<'arena> {
    arena: &'arena Bump,
    options: EngineOptions,
    unsafe_functions: UnsafeFunctions,
}

impl<'arena> Engine<'arena> {
    /// Create an engine with the default deny-list.
    pub fn new(arena: &'arena Bump, options: EngineOptions) -> Self {
        Self {
            arena,
            options,
            unsafe_functions: UnsafeFunctions::default(),
        }
    }

    /// Access the engine options.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn unsafe_functions(&self) -> &UnsafeFunctions {
        &self.unsafe_functions
    }

    /// Replace the deny-list with exactly `names`.
    pub fn set_unsafe_functions<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.unsafe_functions = UnsafeFunctions::new(names);
    }

    /// Replace the deny-list with a prepared one.
    pub fn with_unsafe_functions(mut self, unsafe_functions: UnsafeFunctions) -> Self {
        self.unsafe_functions = unsafe_functions;
        self
    }

    /// Compile an expression.
    ///
    /// The source is copied into the arena, so the caller's string need not
    /// outlive the compiled expression.
    ///
    /// # Example
    ///
    /// ```
    /// # use bumpalo::Bump;
    /// # use sandex_core::api::{Engine, EngineOptions, Error};
    /// let arena = Bump::new();
    /// let engine = Engine::new(&arena, EngineOptions::default());
    ///
    /// assert!(engine.compile("1 + 2").is_ok());
    /// assert!(matches!(engine.compile("1 +"), Err(Error::Compilation { .. })));
    /// ```
    pub fn compile(&self, source: &str) -> Result<CompiledExpression<'_, 'arena>, Error> {
        let source: &'arena str = self.arena.alloc_str(source);

        let tokens = tokenize(source).map_err(|e| Error::compilation(e, source))?;
        debug!(
            tokens = tokens.len(),
            source_len = source.len(),
            "compiling expression"
        );

        let expr =
            parser::parse_token_stream(self.arena, TokenStream::new(tokens), &self.options.parse)
                .map_err(|e| Error::compilation(e, source))?;

        Ok(CompiledExpression::new(self, expr, source))
    }
}
