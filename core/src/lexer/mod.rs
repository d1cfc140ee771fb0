//! Lexical analysis: source text to a position-tagged token list.

mod stream;
mod token;
mod tokenizer;


pub use stream::TokenStream;
pub use token::{Token, TokenKind};
pub use tokenizer::tokenize;
