//! Configuration options for the engine.

/// Limits applied while parsing.
///
/// # Example
///
/// ```
/// use sandex_core::api::ParseOptions;
///
/// let options = ParseOptions { max_depth: 64 };
/// assert!(options.max_depth < ParseOptions::default().max_depth);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum nesting of parenthesised groups, unary operators, array
    /// literals and call arguments.
    ///
    /// Default: 128
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { max_depth: 128 }
    }
}

/// Limits applied while evaluating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionOptions {
    /// Maximum evaluation stack depth.
    ///
    /// Default: 1000
    pub max_depth: usize,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self { max_depth: 1000 }
    }
}

/// Configuration options for the engine.
///
/// # Example
///
/// ```
/// use sandex_core::api::{EngineOptions, ExecutionOptions, ParseOptions};
///
/// let options = EngineOptions {
///     parse: ParseOptions::default(),
///     execution: ExecutionOptions { max_depth: 500 },
/// };
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineOptions {
    pub parse: ParseOptions,
    pub execution: ExecutionOptions,
}
