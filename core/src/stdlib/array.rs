//! Array functions.

use super::Args;
use crate::host::{FunctionTable, HostError, NoHost};
use crate::values::{Value, identical, loose_equals, to_bool};

pub fn register_array_functions(table: &mut FunctionTable) {
    table
        .register("count", count)
        .register("in_array", in_array)
        .register("array_keys", array_keys)
        .register("array_values", array_values);
}

fn count(values: &[Value]) -> Result<Value, HostError> {
    let args = Args::new("count", values, 1, 1)?;
    Ok(Value::Int(args.array(0)?.len() as i64))
}

/// `in_array(needle, haystack, strict = false)`.
fn in_array(values: &[Value]) -> Result<Value, HostError> {
    let args = Args::new("in_array", values, 2, 3)?;
    let needle = args.value(0);
    let haystack = args.array(1)?;
    let strict = args.optional(2).is_some_and(to_bool);
    let found = haystack.values().any(|value| {
        if strict {
            identical(value, needle)
        } else {
            loose_equals(value, needle, &NoHost)
        }
    });
    Ok(Value::Bool(found))
}

fn array_keys(values: &[Value]) -> Result<Value, HostError> {
    let args = Args::new("array_keys", values, 1, 1)?;
    Ok(Value::list(args.array(0)?.keys().map(|key| key.to_value())))
}

fn array_values(values: &[Value]) -> Result<Value, HostError> {
    let args = Args::new("array_values", values, 1, 1)?;
    Ok(Value::list(args.array(0)?.values().cloned()))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::call;
    use crate::values::Value;

    fn fruits() -> Value {
        Value::map([
            ("a", Value::from("apple")),
            ("7", Value::from("banana")),
            ("c", Value::Int(0)),
        ])
    }

    #[test]
    fn test_count() {
        assert_eq!(call("count", &[fruits()]), Ok(Value::Int(3)));
        assert_eq!(call("count", &[Value::list([])]), Ok(Value::Int(0)));
        assert!(call("count", &[Value::from("abc")]).is_err());
    }

    #[test]
    fn test_in_array() {
        assert_eq!(
            call("in_array", &[Value::from("banana"), fruits()]),
            Ok(Value::Bool(true))
        );
        assert_eq!(
            call("in_array", &[Value::from("0"), fruits()]),
            Ok(Value::Bool(true))
        );
        assert_eq!(
            call("in_array", &[Value::from("0"), fruits(), Value::Bool(true)]),
            Ok(Value::Bool(false))
        );
        assert_eq!(
            call("in_array", &[Value::Int(0), fruits(), Value::Bool(true)]),
            Ok(Value::Bool(true))
        );
    }

    #[test]
    fn test_keys_and_values() {
        assert_eq!(
            call("array_keys", &[fruits()]),
            Ok(Value::list([Value::from("a"), Value::Int(7), Value::from("c")]))
        );
        assert_eq!(
            call("array_values", &[fruits()]),
            Ok(Value::list([
                Value::from("apple"),
                Value::from("banana"),
                Value::Int(0)
            ]))
        );
    }
}
