use super::token::{Token, TokenKind};
use crate::parser::{ParseError, ParseErrorKind};

/// Cursor over a token list with one token of lookahead.
///
/// The cursor only moves forward. The list always ends with `Eof`, and
/// advancing past `Eof` leaves the cursor on it.
#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    tokens: Vec<Token<'a>>,
    cursor: usize,
}

impl<'a> TokenStream<'a> {
    pub fn new(tokens: Vec<Token<'a>>) -> Self {
        debug_assert!(
            tokens.last().is_some_and(|t| t.kind == TokenKind::Eof),
            "token list must end with Eof"
        );
        Self { tokens, cursor: 0 }
    }

    pub fn current(&self) -> Token<'a> {
        self.tokens[self.cursor.min(self.tokens.len() - 1)]
    }

    /// The token consumed by the last `advance`, if any.
    pub fn previous(&self) -> Option<Token<'a>> {
        self.cursor.checked_sub(1).map(|i| self.tokens[i])
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn is_at_end(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    /// Consume the current token and return it.
    pub fn advance(&mut self) -> Token<'a> {
        let token = self.current();
        if token.kind != TokenKind::Eof {
            self.cursor += 1;
        }
        token
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    /// Consume the current token if its kind is one of `kinds`.
    pub fn match_any(&mut self, kinds: &[TokenKind]) -> Option<Token<'a>> {
        if kinds.contains(&self.current().kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Consume a token of `kind` or fail describing what was expected.
    pub fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token<'a>, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_expected(expected))
        }
    }

    /// Build an error reporting the current token as unexpected.
    pub fn error_expected(&self, expected: &str) -> ParseError {
        let token = self.current();
        let kind = if token.kind == TokenKind::Eof {
            ParseErrorKind::UnexpectedEnd {
                expected: expected.to_string(),
            }
        } else {
            ParseErrorKind::UnexpectedToken {
                found: token.text.to_string(),
                expected: expected.to_string(),
            }
        };
        ParseError::new(kind, token.location)
    }
}
