//! Loose (coercing) comparison and strict identity.
//!
//! Ordering rules, first match wins:
//!
//! 1. null vs null: equal.
//! 2. null vs string: `""` compared with the string.
//! 3. bool or null vs anything: both as booleans, `false < true`.
//! 4. number vs number: numerically.
//! 5. string vs string: numerically if both are numeric, else byte order.
//! 6. number vs string: numerically if the string is numeric, else the
//!    number's string form in byte order.
//! 7. array vs array: smaller count is less; otherwise key by key in the left
//!    array's order, a key missing on the right makes them incomparable.
//! 8. array vs anything else: the array is greater.
//! 9. object vs object: the same handle is equal, otherwise incomparable.
//! 10. object vs string: as strings if the host can stringify the object,
//!     otherwise the object is greater. Object vs number: object is greater.

use core::cmp::Ordering;

use super::convert::{Number, format_float, parse_numeric, to_bool};
use super::{Array, Value};
use crate::host::HostAdapter;

/// Loosely compare two values. `None` means they are not comparable, which
/// makes every ordering operator false and `!=` true.
pub fn compare(a: &Value, b: &Value, host: &dyn HostAdapter) -> Option<Ordering> {
    match (a, b) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Null, Value::Str(s)) => compare_strings("", s),
        (Value::Str(s), Value::Null) => compare_strings(s, ""),
        (Value::Null | Value::Bool(_), _) | (_, Value::Null | Value::Bool(_)) => {
            Some(to_bool(a).cmp(&to_bool(b)))
        }

        (Value::Int(x), Value::Int(y)) => Some(x.cmp(y)),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            compare_numbers(number_of(a)?, number_of(b)?)
        }

        (Value::Str(x), Value::Str(y)) => compare_strings(x, y),
        (Value::Int(_) | Value::Float(_), Value::Str(s)) => {
            compare_number_string(number_of(a)?, s)
        }
        (Value::Str(s), Value::Int(_) | Value::Float(_)) => {
            compare_number_string(number_of(b)?, s).map(Ordering::reverse)
        }

        (Value::Array(x), Value::Array(y)) => compare_arrays(x, y, host),
        (Value::Array(_), _) => Some(Ordering::Greater),
        (_, Value::Array(_)) => Some(Ordering::Less),

        (Value::Object(x), Value::Object(y)) => (x == y).then_some(Ordering::Equal),
        (Value::Object(o), Value::Str(s)) => match host.object_to_string(*o) {
            Some(text) => compare_strings(&text, s),
            None => Some(Ordering::Greater),
        },
        (Value::Str(s), Value::Object(o)) => match host.object_to_string(*o) {
            Some(text) => compare_strings(s, &text),
            None => Some(Ordering::Less),
        },
        (Value::Object(_), _) => Some(Ordering::Greater),
        (_, Value::Object(_)) => Some(Ordering::Less),
    }
}

/// Loose equality (`==`).
pub fn loose_equals(a: &Value, b: &Value, host: &dyn HostAdapter) -> bool {
    compare(a, b, host) == Some(Ordering::Equal)
}

/// Strict identity (`===`): same variant and same value, no coercion.
pub fn identical(a: &Value, b: &Value) -> bool {
    a == b
}

fn number_of(value: &Value) -> Option<Number> {
    match value {
        Value::Int(n) => Some(Number::Int(*n)),
        Value::Float(x) => Some(Number::Float(*x)),
        _ => None,
    }
}

fn compare_numbers(a: Number, b: Number) -> Option<Ordering> {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => Some(x.cmp(&y)),
        _ => a.to_f64().partial_cmp(&b.to_f64()),
    }
}

fn compare_strings(a: &str, b: &str) -> Option<Ordering> {
    match (parse_numeric(a), parse_numeric(b)) {
        (Some(x), Some(y)) => compare_numbers(x, y),
        _ => Some(a.as_bytes().cmp(b.as_bytes())),
    }
}

fn compare_number_string(n: Number, s: &str) -> Option<Ordering> {
    match parse_numeric(s) {
        Some(m) => compare_numbers(n, m),
        None => {
            let text = match n {
                Number::Int(i) => i.to_string(),
                Number::Float(x) => format_float(x),
            };
            Some(text.as_bytes().cmp(s.as_bytes()))
        }
    }
}

fn compare_arrays(a: &Array, b: &Array, host: &dyn HostAdapter) -> Option<Ordering> {
    match a.len().cmp(&b.len()) {
        Ordering::Equal => {}
        unequal => return Some(unequal),
    }
    for (key, left) in a.iter() {
        let right = b.get(key)?;
        match compare(left, right, host)? {
            Ordering::Equal => {}
            unequal => return Some(unequal),
        }
    }
    Some(Ordering::Equal)
}
