//! Standard library host functions.
//!
//! A small set of side-effect-free string, math and array functions, exposed
//! through a [`FunctionTable`]. Embedders that want these alongside their
//! own objects can register them into their own table.
//!
//! Arguments are coerced the way the modelled language does for scalar
//! parameters: numeric strings are accepted where numbers are expected and
//! scalars are stringified where strings are expected. Arrays and objects
//! are rejected with [`HostError::ArgumentType`].

use crate::host::{FunctionTable, HostError};
use crate::values::convert::scalar_to_string;
use crate::values::{Array, Number, Value, to_number};

pub mod array;
pub mod math;
pub mod string;

pub use array::register_array_functions;
pub use math::register_math_functions;
pub use string::register_string_functions;

/// Register every standard library function into `table`.
pub fn register_stdlib(table: &mut FunctionTable) {
    register_string_functions(table);
    register_math_functions(table);
    register_array_functions(table);
}

/// A table holding just the standard library.
pub fn function_table() -> FunctionTable {
    let mut table = FunctionTable::new();
    register_stdlib(&mut table);
    table
}

/// Arity-checked view of a native function's arguments.
pub(crate) struct Args<'v> {
    name: &'static str,
    values: &'v [Value],
}

impl<'v> Args<'v> {
    /// Check that between `min` and `max` arguments were passed.
    pub fn new(
        name: &'static str,
        values: &'v [Value],
        min: usize,
        max: usize,
    ) -> Result<Self, HostError> {
        if values.len() < min || values.len() > max {
            let expected = if min == max {
                format!("exactly {}", min)
            } else if max == usize::MAX {
                format!("at least {}", min)
            } else {
                format!("{} to {}", min, max)
            };
            return Err(HostError::Arity {
                name: name.to_string(),
                expected,
                got: values.len(),
            });
        }
        Ok(Args { name, values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn all(&self) -> &'v [Value] {
        self.values
    }

    pub fn value(&self, index: usize) -> &'v Value {
        &self.values[index]
    }

    pub fn optional(&self, index: usize) -> Option<&'v Value> {
        self.values.get(index)
    }

    pub fn string(&self, index: usize) -> Result<String, HostError> {
        scalar_to_string(self.value(index)).ok_or_else(|| self.type_error(index, "string"))
    }

    pub fn number(&self, index: usize) -> Result<Number, HostError> {
        to_number(self.value(index)).ok_or_else(|| self.type_error(index, "int|float"))
    }

    pub fn int(&self, index: usize) -> Result<i64, HostError> {
        match self.number(index)? {
            Number::Int(n) => Ok(n),
            Number::Float(x) if x.fract() == 0.0 && x.is_finite() => Ok(x as i64),
            Number::Float(_) => Err(self.type_error(index, "int")),
        }
    }

    pub fn array(&self, index: usize) -> Result<&'v Array, HostError> {
        self.value(index)
            .as_array()
            .ok_or_else(|| self.type_error(index, "array"))
    }

    pub fn failed(&self, message: impl core::fmt::Display) -> HostError {
        HostError::Failed(format!("{}(): {}", self.name, message))
    }

    fn type_error(&self, index: usize, expected: &'static str) -> HostError {
        HostError::ArgumentType {
            name: self.name.to_string(),
            position: index + 1,
            expected,
            got: self.value(index).kind(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostAdapter;
    use crate::values::ValueKind;

    #[test]
    fn test_stdlib_table_has_every_function() {
        let table = function_table();
        for name in [
            "strlen",
            "strtoupper",
            "strtolower",
            "trim",
            "ltrim",
            "rtrim",
            "str_contains",
            "str_starts_with",
            "str_ends_with",
            "str_repeat",
            "str_replace",
            "substr",
            "implode",
            "explode",
            "count",
            "in_array",
            "array_keys",
            "array_values",
            "abs",
            "max",
            "min",
            "round",
            "floor",
            "ceil",
            "sqrt",
            "intdiv",
        ] {
            assert!(table.function_exists(name), "missing {}", name);
        }
    }

    #[test]
    fn test_arity_error() {
        let err = test_support::call("strlen", &[]).unwrap_err();
        assert_eq!(
            err,
            HostError::Arity {
                name: "strlen".to_string(),
                expected: "exactly 1".to_string(),
                got: 0
            }
        );
        assert_eq!(err.to_string(), "strlen() expects exactly 1 argument(s), 0 given");
    }

    #[test]
    fn test_argument_type_error() {
        let err = test_support::call("strlen", &[Value::list([])]).unwrap_err();
        assert_eq!(
            err,
            HostError::ArgumentType {
                name: "strlen".to_string(),
                position: 1,
                expected: "string",
                got: ValueKind::Array
            }
        );
    }
}
