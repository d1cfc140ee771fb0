//! String functions.
//!
//! Strings are treated as byte sequences for lengths and offsets, like the
//! modelled language does. Case mapping is ASCII-only.

use super::Args;
use crate::host::{FunctionTable, HostError};
use crate::values::Value;
use crate::values::convert::scalar_to_string;

/// Characters stripped by `trim` and friends when no list is given.
const DEFAULT_TRIM: &str = " \t\n\r\0\x0B";

/// Largest string, in bytes, a function here will build.
pub const MAX_STRING_LEN: usize = 16 * 1024 * 1024;

/// Fail unless a result of `len` bytes (if it fits in `usize` at all) is
/// within [`MAX_STRING_LEN`].
fn check_result_len(args: &Args<'_>, len: Option<usize>) -> Result<(), HostError> {
    match len {
        Some(len) if len <= MAX_STRING_LEN => Ok(()),
        _ => Err(args.failed(format_args!(
            "result would exceed {} bytes",
            MAX_STRING_LEN
        ))),
    }
}

pub fn register_string_functions(table: &mut FunctionTable) {
    table
        .register("strlen", strlen)
        .register("strtoupper", strtoupper)
        .register("strtolower", strtolower)
        .register("trim", trim)
        .register("ltrim", ltrim)
        .register("rtrim", rtrim)
        .register("str_contains", str_contains)
        .register("str_starts_with", str_starts_with)
        .register("str_ends_with", str_ends_with)
        .register("str_repeat", str_repeat)
        .register("str_replace", str_replace)
        .register("substr", substr)
        .register("implode", implode)
        .register("explode", explode);
}

fn strlen(values: &[Value]) -> Result<Value, HostError> {
    let args = Args::new("strlen", values, 1, 1)?;
    Ok(Value::Int(args.string(0)?.len() as i64))
}

fn strtoupper(values: &[Value]) -> Result<Value, HostError> {
    let args = Args::new("strtoupper", values, 1, 1)?;
    Ok(Value::Str(args.string(0)?.to_ascii_uppercase()))
}

fn strtolower(values: &[Value]) -> Result<Value, HostError> {
    let args = Args::new("strtolower", values, 1, 1)?;
    Ok(Value::Str(args.string(0)?.to_ascii_lowercase()))
}

#[derive(Clone, Copy)]
enum TrimSide {
    Start,
    End,
    Both,
}

fn trim_with(name: &'static str, side: TrimSide, values: &[Value]) -> Result<Value, HostError> {
    let args = Args::new(name, values, 1, 2)?;
    let s = args.string(0)?;
    let chars = match args.optional(1) {
        Some(_) => args.string(1)?,
        None => DEFAULT_TRIM.to_string(),
    };
    let strip = |c: char| chars.contains(c);
    let trimmed = match side {
        TrimSide::Start => s.trim_start_matches(strip),
        TrimSide::End => s.trim_end_matches(strip),
        TrimSide::Both => s.trim_matches(strip),
    };
    Ok(Value::from(trimmed))
}

fn trim(values: &[Value]) -> Result<Value, HostError> {
    trim_with("trim", TrimSide::Both, values)
}

fn ltrim(values: &[Value]) -> Result<Value, HostError> {
    trim_with("ltrim", TrimSide::Start, values)
}

fn rtrim(values: &[Value]) -> Result<Value, HostError> {
    trim_with("rtrim", TrimSide::End, values)
}

fn str_contains(values: &[Value]) -> Result<Value, HostError> {
    let args = Args::new("str_contains", values, 2, 2)?;
    Ok(Value::Bool(args.string(0)?.contains(args.string(1)?.as_str())))
}

fn str_starts_with(values: &[Value]) -> Result<Value, HostError> {
    let args = Args::new("str_starts_with", values, 2, 2)?;
    Ok(Value::Bool(args.string(0)?.starts_with(args.string(1)?.as_str())))
}

fn str_ends_with(values: &[Value]) -> Result<Value, HostError> {
    let args = Args::new("str_ends_with", values, 2, 2)?;
    Ok(Value::Bool(args.string(0)?.ends_with(args.string(1)?.as_str())))
}

fn str_repeat(values: &[Value]) -> Result<Value, HostError> {
    let args = Args::new("str_repeat", values, 2, 2)?;
    let s = args.string(0)?;
    let times = args.int(1)?;
    let times = usize::try_from(times)
        .map_err(|_| args.failed("argument #2 ($times) must be greater than or equal to 0"))?;
    check_result_len(&args, s.len().checked_mul(times))?;
    Ok(Value::Str(s.repeat(times)))
}

fn str_replace(values: &[Value]) -> Result<Value, HostError> {
    let args = Args::new("str_replace", values, 3, 3)?;
    let search = args.string(0)?;
    let replace = args.string(1)?;
    let subject = args.string(2)?;
    if search.is_empty() {
        return Ok(Value::Str(subject));
    }
    if replace.len() > search.len() {
        let hits = subject.matches(search.as_str()).count();
        let growth = hits.checked_mul(replace.len() - search.len());
        check_result_len(&args, growth.and_then(|g| g.checked_add(subject.len())))?;
    }
    Ok(Value::Str(subject.replace(&search, &replace)))
}

/// Resolve a possibly negative offset against `len`, clamped to `0..=len`.
fn resolve_offset(offset: i64, len: usize) -> usize {
    if offset < 0 {
        len.saturating_sub(offset.unsigned_abs() as usize)
    } else {
        (offset as usize).min(len)
    }
}

fn substr(values: &[Value]) -> Result<Value, HostError> {
    let args = Args::new("substr", values, 2, 3)?;
    let s = args.string(0)?;
    let bytes = s.as_bytes();
    let start = resolve_offset(args.int(1)?, bytes.len());
    let end = match args.optional(2) {
        None | Some(Value::Null) => bytes.len(),
        Some(_) => {
            let length = args.int(2)?;
            if length < 0 {
                resolve_offset(length, bytes.len()).max(start)
            } else {
                start.saturating_add(length as usize).min(bytes.len())
            }
        }
    };
    Ok(Value::Str(
        String::from_utf8_lossy(&bytes[start..end]).into_owned(),
    ))
}

fn implode(values: &[Value]) -> Result<Value, HostError> {
    let args = Args::new("implode", values, 1, 2)?;
    let (separator, pieces) = if args.len() == 1 {
        (String::new(), args.array(0)?)
    } else {
        (args.string(0)?, args.array(1)?)
    };
    let mut parts = Vec::with_capacity(pieces.len());
    for value in pieces.values() {
        let part = scalar_to_string(value)
            .ok_or_else(|| args.failed(format!("cannot join a value of type {}", value.kind())))?;
        parts.push(part);
    }
    Ok(Value::Str(parts.join(&separator)))
}

fn explode(values: &[Value]) -> Result<Value, HostError> {
    let args = Args::new("explode", values, 2, 3)?;
    let separator = args.string(0)?;
    let s = args.string(1)?;
    if separator.is_empty() {
        return Err(args.failed("argument #1 ($separator) cannot be empty"));
    }
    let limit = match args.optional(2) {
        Some(_) => args.int(2)?,
        None => i64::MAX,
    };

    let parts: Vec<&str> = match limit {
        0 => vec![s.as_str()],
        n if n > 0 => s
            .splitn(usize::try_from(n).unwrap_or(usize::MAX), separator.as_str())
            .collect(),
        n => {
            // A negative limit drops that many pieces from the end.
            let mut all: Vec<&str> = s.split(separator.as_str()).collect();
            all.truncate(all.len().saturating_sub(n.unsigned_abs() as usize));
            all
        }
    };
    Ok(Value::list(parts.into_iter().map(Value::from)))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::call;
    use super::MAX_STRING_LEN;
    use crate::host::HostError;
    use crate::values::Value;

    fn s(text: &str) -> Value {
        Value::from(text)
    }

    #[test]
    fn test_case_and_length() {
        assert_eq!(call("strlen", &[s("héllo")]), Ok(Value::Int(6)));
        assert_eq!(call("strlen", &[Value::Int(1234)]), Ok(Value::Int(4)));
        assert_eq!(call("strtoupper", &[s("abc-é")]), Ok(s("ABC-é")));
        assert_eq!(call("strtolower", &[s("ABC")]), Ok(s("abc")));
    }

    #[test]
    fn test_trim() {
        assert_eq!(call("trim", &[s("  hi \n")]), Ok(s("hi")));
        assert_eq!(call("ltrim", &[s("  hi  ")]), Ok(s("hi  ")));
        assert_eq!(call("rtrim", &[s("  hi  ")]), Ok(s("  hi")));
        assert_eq!(call("trim", &[s("xxhixx"), s("x")]), Ok(s("hi")));
    }

    #[test]
    fn test_search() {
        assert_eq!(call("str_contains", &[s("haystack"), s("st")]), Ok(Value::Bool(true)));
        assert_eq!(call("str_contains", &[s("abc"), s("")]), Ok(Value::Bool(true)));
        assert_eq!(call("str_starts_with", &[s("abc"), s("ab")]), Ok(Value::Bool(true)));
        assert_eq!(call("str_ends_with", &[s("abc"), s("ab")]), Ok(Value::Bool(false)));
    }

    #[test]
    fn test_repeat_and_replace() {
        assert_eq!(call("str_repeat", &[s("ab"), Value::Int(3)]), Ok(s("ababab")));
        assert_eq!(call("str_repeat", &[s("ab"), Value::Int(0)]), Ok(s("")));
        assert!(call("str_repeat", &[s("ab"), Value::Int(-1)]).is_err());
        assert_eq!(
            call("str_repeat", &[s("ab"), Value::Int(i64::MAX)]),
            Err(HostError::Failed(format!(
                "str_repeat(): result would exceed {} bytes",
                MAX_STRING_LEN
            )))
        );
        assert!(call("str_repeat", &[s("x"), Value::Int(MAX_STRING_LEN as i64 + 1)]).is_err());
        let big = "x".repeat(MAX_STRING_LEN / 2);
        assert!(call("str_replace", &[s("x"), s("yyy"), s(&big)]).is_err());
        assert_eq!(
            call("str_replace", &[s("o"), s("0"), s("foo boo")]),
            Ok(s("f00 b00"))
        );
    }

    #[test]
    fn test_substr() {
        let hello = s("Hello, world");
        assert_eq!(call("substr", &[hello.clone(), Value::Int(7)]), Ok(s("world")));
        assert_eq!(call("substr", &[hello.clone(), Value::Int(-5)]), Ok(s("world")));
        assert_eq!(
            call("substr", &[hello.clone(), Value::Int(0), Value::Int(5)]),
            Ok(s("Hello"))
        );
        assert_eq!(
            call("substr", &[hello.clone(), Value::Int(0), Value::Int(-7)]),
            Ok(s("Hello"))
        );
        assert_eq!(call("substr", &[hello.clone(), Value::Int(50)]), Ok(s("")));
        assert_eq!(
            call("substr", &[hello, Value::Int(5), Value::Int(-20)]),
            Ok(s(""))
        );
    }

    #[test]
    fn test_implode_explode() {
        let parts = Value::list([s("a"), Value::Int(1), Value::Bool(true)]);
        assert_eq!(call("implode", &[s(", "), parts.clone()]), Ok(s("a, 1, 1")));
        assert_eq!(call("implode", &[parts]), Ok(s("a11")));

        assert_eq!(
            call("explode", &[s(","), s("a,b,,c")]),
            Ok(Value::list([s("a"), s("b"), s(""), s("c")]))
        );
        assert_eq!(
            call("explode", &[s(","), s("a,b,c"), Value::Int(2)]),
            Ok(Value::list([s("a"), s("b,c")]))
        );
        assert_eq!(
            call("explode", &[s(","), s("a,b,c"), Value::Int(-1)]),
            Ok(Value::list([s("a"), s("b")]))
        );
        assert!(call("explode", &[s(""), s("abc")]).is_err());
    }
}
