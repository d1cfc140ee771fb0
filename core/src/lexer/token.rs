use core::fmt;

use crate::syntax::Location;

/// Lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    Integer,
    Float,
    /// Complete quoted literal, quotes included.
    String,
    Bool,
    Null,

    /// Function, class or constant name, possibly namespace-qualified.
    Identifier,
    /// `$name`, sigil included.
    Variable,

    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    StarStar,

    // Comparison
    Equal,
    NotEqual,
    Identical,
    NotIdentical,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Spaceship,

    // Logical
    AndAnd,
    OrOr,
    Bang,
    And,
    Or,
    Xor,

    // Member access and punctuation
    Arrow,
    DoubleArrow,
    DoubleColon,
    Dot,
    Coalesce,
    Question,
    Colon,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Assign,
    Ampersand,

    // Keywords
    Array,
    InstanceOf,
    /// `(int)`, `(string)`, ... with optional inner whitespace.
    Cast,

    // Interpolated strings
    /// Opening or closing `"` of a string that contains interpolation.
    Quote,
    /// Raw literal text between interpolations (escapes not yet decoded).
    StringFragment,

    Eof,
}

impl TokenKind {
    /// Human-readable description used in parse errors.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Integer => "integer",
            TokenKind::Float => "float",
            TokenKind::String => "string",
            TokenKind::Bool => "boolean",
            TokenKind::Null => "null",
            TokenKind::Identifier => "identifier",
            TokenKind::Variable => "variable",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::StarStar => "'**'",
            TokenKind::Equal => "'=='",
            TokenKind::NotEqual => "'!='",
            TokenKind::Identical => "'==='",
            TokenKind::NotIdentical => "'!=='",
            TokenKind::Less => "'<'",
            TokenKind::LessEqual => "'<='",
            TokenKind::Greater => "'>'",
            TokenKind::GreaterEqual => "'>='",
            TokenKind::Spaceship => "'<=>'",
            TokenKind::AndAnd => "'&&'",
            TokenKind::OrOr => "'||'",
            TokenKind::Bang => "'!'",
            TokenKind::And => "'and'",
            TokenKind::Or => "'or'",
            TokenKind::Xor => "'xor'",
            TokenKind::Arrow => "'->'",
            TokenKind::DoubleArrow => "'=>'",
            TokenKind::DoubleColon => "'::'",
            TokenKind::Dot => "'.'",
            TokenKind::Coalesce => "'??'",
            TokenKind::Question => "'?'",
            TokenKind::Colon => "':'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Comma => "','",
            TokenKind::Assign => "'='",
            TokenKind::Ampersand => "'&'",
            TokenKind::Array => "'array'",
            TokenKind::InstanceOf => "'instanceof'",
            TokenKind::Cast => "cast",
            TokenKind::Quote => "'\"'",
            TokenKind::StringFragment => "string fragment",
            TokenKind::Eof => "end of input",
        }
    }

    /// Spelled as a bare word, so usable as a member name after `->` or `::`.
    pub fn is_word(self) -> bool {
        matches!(
            self,
            TokenKind::Identifier
                | TokenKind::Bool
                | TokenKind::Null
                | TokenKind::And
                | TokenKind::Or
                | TokenKind::Xor
                | TokenKind::Array
                | TokenKind::InstanceOf
        )
    }
}

/// A classified, position-tagged slice of the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub location: Location,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, text: &'a str, location: Location) -> Self {
        Self {
            kind,
            text,
            location,
        }
    }

    /// Variable name without its `$` sigil.
    pub fn variable_name(&self) -> &'a str {
        self.text.strip_prefix('$').unwrap_or(self.text)
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}({}) at ({}, {})",
            self.kind, self.text, self.location.line, self.location.column
        )
    }
}
