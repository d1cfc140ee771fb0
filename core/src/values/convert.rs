//! Coercions between value kinds.
//!
//! These follow the conventions of dynamic scripting languages: numeric
//! strings act as numbers, `null` acts as zero or the empty string, and
//! every value has a truthiness.

use super::{Array, Value};

/// A value coerced for arithmetic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn to_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(x) => x,
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(n) => Value::Int(n),
            Number::Float(x) => Value::Float(x),
        }
    }
}

/// Truthiness: `null`, `false`, `0`, `0.0`, `""`, `"0"` and `[]` are false.
pub fn to_bool(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Int(n) => *n != 0,
        Value::Float(x) => *x != 0.0,
        Value::Str(s) => !(s.is_empty() || s == "0"),
        Value::Array(a) => !a.is_empty(),
        Value::Object(_) => true,
    }
}

/// Arithmetic coercion. `None` for arrays, objects and non-numeric strings.
pub fn to_number(value: &Value) -> Option<Number> {
    match value {
        Value::Null => Some(Number::Int(0)),
        Value::Bool(b) => Some(Number::Int(i64::from(*b))),
        Value::Int(n) => Some(Number::Int(*n)),
        Value::Float(x) => Some(Number::Float(*x)),
        Value::Str(s) => parse_numeric(s),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// String conversion for scalars. `None` for arrays and objects; objects
/// need the host to stringify them.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => Some(String::new()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Int(n) => Some(n.to_string()),
        Value::Float(x) => Some(format_float(*x)),
        Value::Str(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// `(int)` cast of a scalar. Strings use their leading numeric prefix;
/// floats truncate toward zero, saturating at the `i64` range, `NaN` is 0.
pub fn to_int(value: &Value) -> Option<i64> {
    let n = match value {
        Value::Str(s) => numeric_prefix(s),
        other => to_number(other)?,
    };
    Some(match n {
        Number::Int(n) => n,
        Number::Float(x) => x as i64,
    })
}

/// `(float)` cast of a scalar.
pub fn to_float(value: &Value) -> Option<f64> {
    match value {
        Value::Str(s) => Some(numeric_prefix(s).to_f64()),
        other => to_number(other).map(Number::to_f64),
    }
}

/// `(array)` cast: arrays are kept, `null` becomes empty, anything else is
/// wrapped in a one-element list.
pub fn to_array(value: Value) -> Array {
    match value {
        Value::Array(a) => a,
        Value::Null => Array::new(),
        other => std::iter::once(other).collect(),
    }
}

/// Parse a whole string as a number. Surrounding whitespace is allowed.
///
/// Integers that overflow `i64` become floats.
pub fn parse_numeric(s: &str) -> Option<Number> {
    let trimmed = s.trim_matches(is_numeric_whitespace);
    let (number, len) = scan_number(trimmed)?;
    (len == trimmed.len()).then_some(number)
}

/// Whether `s` is a numeric string.
pub fn is_numeric(s: &str) -> bool {
    parse_numeric(s).is_some()
}

/// Longest numeric prefix after leading whitespace, or `0`.
fn numeric_prefix(s: &str) -> Number {
    let trimmed = s.trim_start_matches(is_numeric_whitespace);
    scan_number(trimmed)
        .map(|(number, _)| number)
        .unwrap_or(Number::Int(0))
}

fn is_numeric_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C')
}

/// Scan `[+-]digits[.digits][e[+-]digits]` from the start of `s`.
/// Returns the number and the byte length consumed.
fn scan_number(s: &str) -> Option<(Number, usize)> {
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_start = i;
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    let mut digits = i - int_start;
    let mut is_float = false;

    if bytes.get(i) == Some(&b'.') {
        let frac_start = i + 1;
        let mut j = frac_start;
        while bytes.get(j).is_some_and(u8::is_ascii_digit) {
            j += 1;
        }
        if digits > 0 || j > frac_start {
            digits += j - frac_start;
            is_float = true;
            i = j;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_start = j;
        while bytes.get(j).is_some_and(u8::is_ascii_digit) {
            j += 1;
        }
        if j > exp_start {
            is_float = true;
            i = j;
        }
    }

    let text = &s[..i];
    let number = if is_float {
        Number::Float(text.parse().ok()?)
    } else {
        match text.parse::<i64>() {
            Ok(n) => Number::Int(n),
            Err(_) => Number::Float(text.parse().ok()?),
        }
    };
    Some((number, i))
}

/// Render a float the way string conversion does: up to 14 significant
/// digits, no trailing zeros, scientific notation (`1.0E+25`) for very large
/// or very small magnitudes, and `INF`, `-INF`, `NAN`.
pub fn format_float(x: f64) -> String {
    const PRECISION: i32 = 14;

    if x.is_nan() {
        return "NAN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "INF" } else { "-INF" }.to_string();
    }
    if x == 0.0 {
        return if x.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // `d.ddddddddddddde±x`, rounded to PRECISION significant digits.
    let sci = format!("{:.*e}", (PRECISION - 1) as usize, x.abs());
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((&sci, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let digits = digits.trim_end_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };

    let sign = if x < 0.0 { "-" } else { "" };
    if exponent < -4 || exponent >= PRECISION {
        let (first, rest) = digits.split_at(1);
        let rest = if rest.is_empty() { "0" } else { rest };
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        return format!("{sign}{first}.{rest}E{exp_sign}{}", exponent.abs());
    }

    if exponent < 0 {
        let zeros = "0".repeat((-exponent - 1) as usize);
        return format!("{sign}0.{zeros}{digits}");
    }

    let int_len = exponent as usize + 1;
    if digits.len() <= int_len {
        let zeros = "0".repeat(int_len - digits.len());
        format!("{sign}{digits}{zeros}")
    } else {
        let (int_part, frac_part) = digits.split_at(int_len);
        format!("{sign}{int_part}.{frac_part}")
    }
}
