//! Decoding of literal tokens into values.

use core::num::IntErrorKind;

use crate::evaluator::EvalError;
use crate::lexer::{Token, TokenKind};
use crate::syntax::Location;
use crate::syntax::string_literal::{unescape_double_quoted, unescape_single_quoted};
use crate::values::Value;

pub(super) fn decode(token: Token<'_>) -> Result<Value, EvalError> {
    match token.kind {
        TokenKind::Integer => decode_integer(token.text, token.location),
        TokenKind::Float => decode_float(token.text, token.location),
        TokenKind::String => decode_string(token.text, token.location),
        TokenKind::StringFragment => decode_double_quoted(token.text, token.location),
        TokenKind::Bool => Ok(Value::Bool(token.text.eq_ignore_ascii_case("true"))),
        TokenKind::Null => Ok(Value::Null),
        // Bare names in class or callable position evaluate to their text.
        _ => Ok(Value::from(token.text)),
    }
}

fn invalid(text: &str, location: Location) -> EvalError {
    EvalError::InvalidLiteral {
        text: text.to_string(),
        location,
    }
}

/// Decimal, `0x`, `0b`, `0o` and legacy leading-zero octal, with `_`
/// separators. Values beyond `i64` become floats.
fn decode_integer(text: &str, location: Location) -> Result<Value, EvalError> {
    let digits = text.replace('_', "").to_ascii_lowercase();
    let (radix, body) = if let Some(rest) = digits.strip_prefix("0x") {
        (16, rest)
    } else if let Some(rest) = digits.strip_prefix("0b") {
        (2, rest)
    } else if let Some(rest) = digits.strip_prefix("0o") {
        (8, rest)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..])
    } else {
        (10, digits.as_str())
    };

    match i64::from_str_radix(body, radix) {
        Ok(n) => Ok(Value::Int(n)),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => {
            if radix == 10 {
                return decode_float(body, location);
            }
            let mut value = 0f64;
            for c in body.chars() {
                let digit = c.to_digit(radix).ok_or_else(|| invalid(text, location))?;
                value = value * f64::from(radix) + f64::from(digit);
            }
            Ok(Value::Float(value))
        }
        Err(_) => Err(invalid(text, location)),
    }
}

fn decode_float(text: &str, location: Location) -> Result<Value, EvalError> {
    text.replace('_', "")
        .parse()
        .map(Value::Float)
        .map_err(|_| invalid(text, location))
}

/// A complete quoted string token, quotes included.
fn decode_string(text: &str, location: Location) -> Result<Value, EvalError> {
    if let Some(inner) = text.strip_prefix('\'').and_then(|t| t.strip_suffix('\'')) {
        return Ok(Value::Str(unescape_single_quoted(inner).into_owned()));
    }
    if let Some(inner) = text.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
        return decode_double_quoted(inner, location);
    }
    Err(invalid(text, location))
}

fn decode_double_quoted(text: &str, location: Location) -> Result<Value, EvalError> {
    unescape_double_quoted(text)
        .map(|s| Value::Str(s.into_owned()))
        .map_err(|error| EvalError::InvalidEscape { error, location })
}
