//! Single-pass scanner from source text to tokens.
//!
//! Double-quoted strings without interpolation become one `String` token.
//! Strings with interpolation are split into `Quote`, `StringFragment`,
//! embedded-expression tokens and a closing `Quote`, so the parser can
//! rebuild them as a `StringInterpolation` node. Embedded `{$ ... }` code is
//! scanned by re-entering the code scanner, which keeps its own brace depth.

use super::token::{Token, TokenKind};
use crate::parser::{ParseError, ParseErrorKind};
use crate::syntax::LineIndex;

/// Operators and punctuation, longest spelling first so that prefixes lose.
const OPERATORS: &[(&str, TokenKind)] = &[
    ("===", TokenKind::Identical),
    ("!==", TokenKind::NotIdentical),
    ("<=>", TokenKind::Spaceship),
    ("==", TokenKind::Equal),
    ("!=", TokenKind::NotEqual),
    ("<>", TokenKind::NotEqual),
    ("<=", TokenKind::LessEqual),
    (">=", TokenKind::GreaterEqual),
    ("&&", TokenKind::AndAnd),
    ("||", TokenKind::OrOr),
    ("**", TokenKind::StarStar),
    ("->", TokenKind::Arrow),
    ("=>", TokenKind::DoubleArrow),
    ("::", TokenKind::DoubleColon),
    ("??", TokenKind::Coalesce),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
    ("<", TokenKind::Less),
    (">", TokenKind::Greater),
    ("!", TokenKind::Bang),
    (".", TokenKind::Dot),
    ("?", TokenKind::Question),
    (":", TokenKind::Colon),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("[", TokenKind::LBracket),
    ("]", TokenKind::RBracket),
    (",", TokenKind::Comma),
    ("=", TokenKind::Assign),
    ("&", TokenKind::Ampersand),
];

/// Type names accepted inside a `(type)` cast.
const CAST_TYPES: &[&str] = &[
    "int", "integer", "float", "double", "string", "bool", "boolean", "array",
];

/// Scan `source` into tokens, ending with a single `Eof` token.
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, ParseError> {
    Tokenizer::new(source).run()
}

enum DoubleQuoted {
    /// No interpolation; the literal ends at this offset (after the quote).
    Plain(usize),
    Interpolated,
    Unterminated,
}

struct Tokenizer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    index: LineIndex,
    tokens: Vec<Token<'a>>,
}

impl<'a> Tokenizer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            index: LineIndex::new(source),
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token<'a>>, ParseError> {
        self.scan_code(None)?;
        let end = self.source.len();
        self.push(TokenKind::Eof, end, end);
        Ok(self.tokens)
    }

    /// Scan code tokens. With `quote_start` set, this is the body of a
    /// `{$ ... }` interpolation and returns after its closing brace.
    fn scan_code(&mut self, quote_start: Option<usize>) -> Result<(), ParseError> {
        let mut depth = 0usize;
        loop {
            self.skip_whitespace();
            let Some(b) = self.peek(0) else {
                return match quote_start {
                    Some(start) => Err(self.unterminated(start)),
                    None => Ok(()),
                };
            };

            match b {
                b'{' => {
                    depth += 1;
                    self.single(TokenKind::LBrace);
                }
                b'}' => {
                    self.single(TokenKind::RBrace);
                    if depth == 0 && quote_start.is_some() {
                        return Ok(());
                    }
                    depth = depth.saturating_sub(1);
                }
                b'$' if self.peek(1).is_some_and(is_ident_start) => self.scan_variable(),
                b'0'..=b'9' => self.scan_number()?,
                b'.' if self.peek(1).is_some_and(|c| c.is_ascii_digit()) => self.scan_number()?,
                b'\'' => self.scan_single_quoted()?,
                b'"' => self.scan_double_quoted()?,
                b'\\' if self.peek(1).is_some_and(is_ident_start) => self.scan_word(),
                c if is_ident_start(c) => self.scan_word(),
                b'(' if self.try_cast() => {}
                _ => self.scan_operator()?,
            }
        }
    }

    fn scan_operator(&mut self) -> Result<(), ParseError> {
        let rest = &self.source[self.pos..];
        for (spelling, kind) in OPERATORS {
            if rest.starts_with(spelling) {
                let start = self.pos;
                self.pos += spelling.len();
                self.push(*kind, start, self.pos);
                return Ok(());
            }
        }
        let found = rest.chars().next().map(String::from).unwrap_or_default();
        Err(self.error(
            ParseErrorKind::UnexpectedCharacter {
                found: found.clone(),
            },
            self.pos,
            found.len(),
        ))
    }

    fn scan_variable(&mut self) {
        let start = self.pos;
        self.pos += 1;
        self.eat_while(is_ident_char);
        self.push(TokenKind::Variable, start, self.pos);
    }

    fn scan_word(&mut self) {
        let start = self.pos;
        loop {
            match self.peek(0) {
                Some(c) if is_ident_char(c) => self.pos += 1,
                Some(b'\\') if self.peek(1).is_some_and(is_ident_start) => self.pos += 1,
                _ => break,
            }
        }
        let text = &self.source[start..self.pos];
        let kind = keyword(text).unwrap_or(TokenKind::Identifier);
        self.push(kind, start, self.pos);
    }

    fn scan_number(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        let radix_prefix = self.peek(0) == Some(b'0')
            && matches!(
                self.peek(1),
                Some(b'x' | b'X' | b'b' | b'B' | b'o' | b'O')
            );

        if radix_prefix {
            let radix = match self.peek(1) {
                Some(b'x' | b'X') => 16,
                Some(b'b' | b'B') => 2,
                _ => 8,
            };
            self.pos += 2;
            let digits_start = self.pos;
            self.eat_while(is_ident_char);
            let digits = &self.source[digits_start..self.pos];
            let valid = !digits.is_empty()
                && underscores_separate_digits(digits)
                && digits
                    .chars()
                    .all(|c| c == '_' || c.is_digit(radix));
            if !valid {
                return Err(self.invalid_number(start));
            }
            self.push(TokenKind::Integer, start, self.pos);
            return Ok(());
        }

        let mut is_float = false;
        self.eat_while(|c| c.is_ascii_digit() || c == b'_');
        if self.peek(0) == Some(b'.') && self.peek(1).is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.pos += 1;
            self.eat_while(|c| c.is_ascii_digit() || c == b'_');
        }
        if matches!(self.peek(0), Some(b'e' | b'E')) {
            let exponent_digits = match self.peek(1) {
                Some(b'+' | b'-') => 2,
                _ => 1,
            };
            if self.peek(exponent_digits).is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                self.pos += exponent_digits;
                self.eat_while(|c| c.is_ascii_digit());
            }
        }

        // `12abc` is one malformed literal, not a number followed by a name.
        if self.peek(0).is_some_and(is_ident_char) {
            self.eat_while(is_ident_char);
            return Err(self.invalid_number(start));
        }

        let text = &self.source[start..self.pos];
        if !underscores_separate_digits(text) {
            return Err(self.invalid_number(start));
        }
        // Legacy octal: a leading zero followed by more digits.
        if !is_float
            && text.len() > 1
            && text.starts_with('0')
            && !text.chars().all(|c| c == '_' || ('0'..='7').contains(&c))
        {
            return Err(self.invalid_number(start));
        }

        let kind = if is_float {
            TokenKind::Float
        } else {
            TokenKind::Integer
        };
        self.push(kind, start, self.pos);
        Ok(())
    }

    fn scan_single_quoted(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        self.pos += 1;
        loop {
            match self.peek(0) {
                None => return Err(self.unterminated(start)),
                Some(b'\\') => self.pos = (self.pos + 2).min(self.bytes.len()),
                Some(b'\'') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => self.pos += 1,
            }
        }
        self.push(TokenKind::String, start, self.pos);
        Ok(())
    }

    fn scan_double_quoted(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        match self.classify_double_quoted(start + 1) {
            DoubleQuoted::Plain(end) => {
                self.pos = end;
                self.push(TokenKind::String, start, end);
                Ok(())
            }
            DoubleQuoted::Unterminated => Err(self.unterminated(start)),
            DoubleQuoted::Interpolated => self.scan_interpolated(start),
        }
    }

    fn classify_double_quoted(&self, from: usize) -> DoubleQuoted {
        let mut i = from;
        while let Some(&b) = self.bytes.get(i) {
            match b {
                b'\\' => i += 2,
                b'"' => return DoubleQuoted::Plain(i + 1),
                b'$' if self.bytes.get(i + 1).copied().is_some_and(is_ident_start) => {
                    return DoubleQuoted::Interpolated;
                }
                b'{' if self.bytes.get(i + 1) == Some(&b'$') => {
                    return DoubleQuoted::Interpolated;
                }
                _ => i += 1,
            }
        }
        DoubleQuoted::Unterminated
    }

    fn scan_interpolated(&mut self, start: usize) -> Result<(), ParseError> {
        self.push(TokenKind::Quote, start, start + 1);
        self.pos = start + 1;
        let mut fragment_start = self.pos;

        loop {
            let Some(b) = self.peek(0) else {
                return Err(self.unterminated(start));
            };
            match b {
                b'\\' => self.pos = (self.pos + 2).min(self.bytes.len()),
                b'"' => {
                    self.flush_fragment(fragment_start);
                    self.single(TokenKind::Quote);
                    return Ok(());
                }
                b'$' if self.peek(1).is_some_and(is_ident_start) => {
                    self.flush_fragment(fragment_start);
                    self.scan_simple_interpolation()?;
                    fragment_start = self.pos;
                }
                b'{' if self.peek(1) == Some(b'$') => {
                    self.flush_fragment(fragment_start);
                    self.single(TokenKind::LBrace);
                    self.scan_code(Some(start))?;
                    fragment_start = self.pos;
                }
                _ => self.pos += 1,
            }
        }
    }

    /// `$name`, optionally followed by one `[offset]` or `->prop`.
    fn scan_simple_interpolation(&mut self) -> Result<(), ParseError> {
        self.scan_variable();

        if self.peek(0) == Some(b'[') {
            self.single(TokenKind::LBracket);
            match self.peek(0) {
                Some(b'-') if self.peek(1).is_some_and(|c| c.is_ascii_digit()) => {
                    self.single(TokenKind::Minus);
                    self.scan_plain_digits();
                }
                Some(c) if c.is_ascii_digit() => self.scan_plain_digits(),
                Some(b'$') if self.peek(1).is_some_and(is_ident_start) => self.scan_variable(),
                Some(c) if is_ident_start(c) => {
                    // Bare words are string keys.
                    let word_start = self.pos;
                    self.eat_while(is_ident_char);
                    self.push(TokenKind::StringFragment, word_start, self.pos);
                }
                _ => return Err(self.unexpected_here()),
            }
            if self.peek(0) != Some(b']') {
                return Err(self.unexpected_here());
            }
            self.single(TokenKind::RBracket);
        } else if self.peek(0) == Some(b'-')
            && self.peek(1) == Some(b'>')
            && self.peek(2).is_some_and(is_ident_start)
        {
            let arrow_start = self.pos;
            self.pos += 2;
            self.push(TokenKind::Arrow, arrow_start, self.pos);
            let name_start = self.pos;
            self.eat_while(is_ident_char);
            self.push(TokenKind::Identifier, name_start, self.pos);
        }
        Ok(())
    }

    fn scan_plain_digits(&mut self) {
        let start = self.pos;
        self.eat_while(|c| c.is_ascii_digit());
        self.push(TokenKind::Integer, start, self.pos);
    }

    /// Emit a `Cast` token if the source at `(` spells `(type)`.
    fn try_cast(&mut self) -> bool {
        let mut i = self.pos + 1;
        let skip_blanks = |mut i: usize| {
            while matches!(self.bytes.get(i), Some(b' ' | b'\t')) {
                i += 1;
            }
            i
        };
        i = skip_blanks(i);
        let word_start = i;
        while self.bytes.get(i).is_some_and(|c| c.is_ascii_alphabetic()) {
            i += 1;
        }
        let word = &self.source[word_start..i];
        i = skip_blanks(i);

        let is_cast = self.bytes.get(i) == Some(&b')')
            && CAST_TYPES.iter().any(|t| t.eq_ignore_ascii_case(word));
        if is_cast {
            let start = self.pos;
            self.pos = i + 1;
            self.push(TokenKind::Cast, start, self.pos);
        }
        is_cast
    }

    fn flush_fragment(&mut self, from: usize) {
        if from < self.pos {
            self.push(TokenKind::StringFragment, from, self.pos);
        }
    }

    fn skip_whitespace(&mut self) {
        self.eat_while(|c| c.is_ascii_whitespace());
    }

    fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.peek(0).is_some_and(&pred) {
            self.pos += 1;
        }
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn single(&mut self, kind: TokenKind) {
        let start = self.pos;
        self.pos += 1;
        self.push(kind, start, self.pos);
    }

    fn push(&mut self, kind: TokenKind, start: usize, end: usize) {
        let location = self.index.locate(self.source, start, end - start);
        self.tokens
            .push(Token::new(kind, &self.source[start..end], location));
    }

    fn error(&self, kind: ParseErrorKind, start: usize, len: usize) -> ParseError {
        ParseError::new(kind, self.index.locate(self.source, start, len))
    }

    fn unterminated(&self, start: usize) -> ParseError {
        self.error(
            ParseErrorKind::UnterminatedString {
                found: self.source[start..start + 1].to_string(),
            },
            start,
            1,
        )
    }

    fn invalid_number(&self, start: usize) -> ParseError {
        self.error(
            ParseErrorKind::InvalidNumber {
                found: self.source[start..self.pos].to_string(),
            },
            start,
            self.pos - start,
        )
    }

    fn unexpected_here(&self) -> ParseError {
        let found = self.source[self.pos..]
            .chars()
            .next()
            .map(String::from)
            .unwrap_or_default();
        let len = found.len();
        self.error(ParseErrorKind::UnexpectedCharacter { found }, self.pos, len)
    }
}

fn keyword(text: &str) -> Option<TokenKind> {
    const KEYWORDS: &[(&str, TokenKind)] = &[
        ("true", TokenKind::Bool),
        ("false", TokenKind::Bool),
        ("null", TokenKind::Null),
        ("and", TokenKind::And),
        ("or", TokenKind::Or),
        ("xor", TokenKind::Xor),
        ("array", TokenKind::Array),
        ("instanceof", TokenKind::InstanceOf),
    ];
    KEYWORDS
        .iter()
        .find(|(word, _)| word.eq_ignore_ascii_case(text))
        .map(|(_, kind)| *kind)
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c >= 0x80
}

fn is_ident_char(c: u8) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

/// Every `_` must sit between two digits (`1_000`, not `1__0` or `1_`).
fn underscores_separate_digits(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.iter().enumerate().all(|(i, &b)| {
        b != b'_'
            || (i > 0
                && bytes[i - 1].is_ascii_alphanumeric()
                && bytes.get(i + 1).is_some_and(|c| c.is_ascii_alphanumeric()))
    })
}
