/// String literal escaping and unescaping.
///
/// This module converts between:
/// - Source text inside quotes (e.g. `hello\n` with a backslash-n sequence)
/// - Runtime strings (e.g. "hello\n" with an actual newline character)
///
/// Single-quoted literals only recognise `\\` and `\'`. Double-quoted literals
/// and interpolation fragments recognise the full escape set.
use std::borrow::Cow;
use std::fmt;

/// Errors that can occur when unescaping double-quoted string text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnescapeError {
    /// `\u{...}` whose value is not a Unicode scalar value.
    InvalidCodepoint { pos: usize, hex: String },
    /// `\u{` without a closing brace, or with no hex digits.
    MalformedUnicodeEscape { pos: usize, seq: String },
}

impl UnescapeError {
    /// Byte offset of the backslash that starts the bad escape.
    pub fn pos(&self) -> usize {
        match self {
            UnescapeError::InvalidCodepoint { pos, .. }
            | UnescapeError::MalformedUnicodeEscape { pos, .. } => *pos,
        }
    }
}

impl fmt::Display for UnescapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnescapeError::InvalidCodepoint { hex, .. } => {
                write!(f, "invalid UTF-8 codepoint escape sequence: \\u{{{}}}", hex)
            }
            UnescapeError::MalformedUnicodeEscape { seq, .. } => {
                write!(f, "malformed Unicode escape sequence '{}'", seq)
            }
        }
    }
}

/// Quote a runtime string as a single-quoted literal, escaping `\` and `'`.
///
/// # Example
///
/// ```
/// use sandex_core::syntax::string_literal::quote_single;
///
/// assert_eq!(quote_single("it's"), r"'it\'s'");
/// ```
pub fn quote_single(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        if ch == '\\' || ch == '\'' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('\'');
    out
}

/// Unescape the content of a single-quoted literal (without the quotes).
///
/// Only `\\` and `\'` are escapes; any other backslash is kept verbatim.
pub fn unescape_single_quoted(input: &str) -> Cow<'_, str> {
    if !input.contains('\\') {
        return Cow::Borrowed(input);
    }

    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(&next) = chars.peek() {
                if next == '\\' || next == '\'' {
                    output.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        output.push(ch);
    }
    Cow::Owned(output)
}

/// Unescape double-quoted string text (a whole literal body or one
/// interpolation fragment).
///
/// Supported escapes:
/// - `\n \r \t \v \e \f \\ \$ \"`
/// - octal `\NNN` (1-3 digits) and hex `\xHH` (1-2 digits); the value is
///   truncated to a byte and bytes above 0x7F map to the Latin-1 character
/// - `\u{H...}` (any number of hex digits, must be a Unicode scalar value)
///
/// Any other backslash sequence is kept verbatim. If the input contains no
/// backslash it is returned borrowed.
pub fn unescape_double_quoted(input: &str) -> Result<Cow<'_, str>, UnescapeError> {
    if !input.contains('\\') {
        return Ok(Cow::Borrowed(input));
    }

    let mut output = String::with_capacity(input.len());
    let mut chars = input.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        if ch != '\\' {
            output.push(ch);
            continue;
        }

        let Some(&(_, next)) = chars.peek() else {
            // Trailing backslash.
            output.push('\\');
            break;
        };

        match next {
            'n' => push_escape(&mut output, &mut chars, '\n'),
            'r' => push_escape(&mut output, &mut chars, '\r'),
            't' => push_escape(&mut output, &mut chars, '\t'),
            'v' => push_escape(&mut output, &mut chars, '\x0B'),
            'e' => push_escape(&mut output, &mut chars, '\x1B'),
            'f' => push_escape(&mut output, &mut chars, '\x0C'),
            '\\' => push_escape(&mut output, &mut chars, '\\'),
            '$' => push_escape(&mut output, &mut chars, '$'),
            '"' => push_escape(&mut output, &mut chars, '"'),
            '0'..='7' => {
                let mut value = 0u32;
                for _ in 0..3 {
                    match chars.peek().and_then(|(_, c)| c.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                output.push(byte_char(value));
            }
            'x' => {
                // Only an escape when at least one hex digit follows.
                let mut lookahead = chars.clone();
                lookahead.next();
                if lookahead.peek().is_some_and(|(_, c)| c.is_ascii_hexdigit()) {
                    chars.next();
                    let mut value = 0u32;
                    for _ in 0..2 {
                        match chars.peek().and_then(|(_, c)| c.to_digit(16)) {
                            Some(digit) => {
                                value = value * 16 + digit;
                                chars.next();
                            }
                            None => break,
                        }
                    }
                    output.push(byte_char(value));
                } else {
                    output.push('\\');
                }
            }
            'u' => {
                let mut lookahead = chars.clone();
                lookahead.next();
                if lookahead.peek().map(|(_, c)| *c) != Some('{') {
                    // `\u` without a brace is literal text.
                    output.push('\\');
                    continue;
                }
                chars.next(); // 'u'
                chars.next(); // '{'

                let mut hex = String::new();
                let mut closed = false;
                while let Some(&(_, c)) = chars.peek() {
                    if c == '}' {
                        chars.next();
                        closed = true;
                        break;
                    }
                    if !c.is_ascii_hexdigit() {
                        break;
                    }
                    hex.push(c);
                    chars.next();
                }

                if !closed || hex.is_empty() {
                    return Err(UnescapeError::MalformedUnicodeEscape {
                        pos,
                        seq: format!("\\u{{{}", hex),
                    });
                }

                let ch = u32::from_str_radix(&hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| UnescapeError::InvalidCodepoint {
                        pos,
                        hex: hex.clone(),
                    })?;
                output.push(ch);
            }
            _ => output.push('\\'),
        }
    }

    Ok(Cow::Owned(output))
}

fn push_escape(
    output: &mut String,
    chars: &mut core::iter::Peekable<core::str::CharIndices<'_>>,
    ch: char,
) {
    chars.next();
    output.push(ch);
}

/// Map a numeric escape to a character, truncating to one byte.
fn byte_char(value: u32) -> char {
    char::from((value & 0xFF) as u8)
}
