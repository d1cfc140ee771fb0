//! Sandboxed evaluation of PHP-style expressions.
//!
//! Source text is tokenized ([`lexer`]), parsed into an arena-allocated tree
//! ([`parser`]) and walked by the [`evaluator`] against a [`api::Context`]
//! of variables. Everything outside the expression (host objects and
//! functions) is reached through a [`host::HostAdapter`], and calls to
//! functions on the deny-list are rejected before the host is consulted.

pub mod api;
pub mod evaluator;
pub mod host;
pub mod lexer;
pub mod parser;
mod stack;
pub mod stdlib;
pub mod syntax;
pub mod values;
