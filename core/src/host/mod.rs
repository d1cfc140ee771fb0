//! The capability interface through which evaluation reaches the outside
//! world.
//!
//! Host objects are opaque [`ObjectRef`] handles. Every property read,
//! method call, constant lookup and free function call is answered by a
//! [`HostAdapter`]. All methods have "absent" defaults, so an adapter only
//! implements the capabilities it actually offers.

mod function_table;

pub use function_table::{FunctionTable, NativeFn};

use thiserror::Error;

use crate::values::{ObjectRef, Value, ValueKind};

/// Failure reported by a host callable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    #[error("{name}() expects {expected} argument(s), {got} given")]
    Arity {
        name: String,
        expected: String,
        got: usize,
    },

    #[error("{name}(): argument #{position} must be of type {expected}, {got} given")]
    ArgumentType {
        name: String,
        position: usize,
        expected: &'static str,
        got: ValueKind,
    },

    #[error("{0}")]
    Failed(String),

    #[error("{0} is not available on this host")]
    Unavailable(String),
}

impl HostError {
    pub fn failed(message: impl Into<String>) -> Self {
        HostError::Failed(message.into())
    }
}

/// Resolution of properties, methods, constants and functions against
/// host-managed state.
///
/// Implementations are consulted read-only from the evaluator; `has_*`
/// queries are always asked before the matching getter or invocation.
pub trait HostAdapter {
    fn has_property(&self, _obj: ObjectRef, _name: &str) -> bool {
        false
    }

    fn get_property(&self, obj: ObjectRef, name: &str) -> Result<Value, HostError> {
        Err(HostError::Unavailable(format!("property {}->{}", obj, name)))
    }

    fn has_method(&self, _obj: ObjectRef, _name: &str) -> bool {
        false
    }

    fn invoke_method(
        &self,
        obj: ObjectRef,
        name: &str,
        _args: &[Value],
    ) -> Result<Value, HostError> {
        Err(HostError::Unavailable(format!("method {}->{}()", obj, name)))
    }

    /// Class name reported in error messages and used for `::class`.
    fn class_name_of(&self, _obj: ObjectRef) -> String {
        "object".to_string()
    }

    fn is_instance_of(&self, _obj: ObjectRef, _class_name: &str) -> bool {
        false
    }

    /// String form of an object, or `None` if it has none.
    fn object_to_string(&self, _obj: ObjectRef) -> Option<String> {
        None
    }

    fn has_constant(&self, _class: &str, _name: &str) -> bool {
        false
    }

    fn constant_value(&self, class: &str, name: &str) -> Result<Value, HostError> {
        Err(HostError::Unavailable(format!("constant {}::{}", class, name)))
    }

    fn has_static_method(&self, _class: &str, _name: &str) -> bool {
        false
    }

    fn invoke_static_method(
        &self,
        class: &str,
        name: &str,
        _args: &[Value],
    ) -> Result<Value, HostError> {
        Err(HostError::Unavailable(format!("method {}::{}()", class, name)))
    }

    fn function_exists(&self, _name: &str) -> bool {
        false
    }

    fn invoke_function(&self, name: &str, _args: &[Value]) -> Result<Value, HostError> {
        Err(HostError::Unavailable(format!("function {}()", name)))
    }
}

impl<T: HostAdapter + ?Sized> HostAdapter for &T {
    fn has_property(&self, obj: ObjectRef, name: &str) -> bool {
        (**self).has_property(obj, name)
    }

    fn get_property(&self, obj: ObjectRef, name: &str) -> Result<Value, HostError> {
        (**self).get_property(obj, name)
    }

    fn has_method(&self, obj: ObjectRef, name: &str) -> bool {
        (**self).has_method(obj, name)
    }

    fn invoke_method(
        &self,
        obj: ObjectRef,
        name: &str,
        args: &[Value],
    ) -> Result<Value, HostError> {
        (**self).invoke_method(obj, name, args)
    }

    fn class_name_of(&self, obj: ObjectRef) -> String {
        (**self).class_name_of(obj)
    }

    fn is_instance_of(&self, obj: ObjectRef, class_name: &str) -> bool {
        (**self).is_instance_of(obj, class_name)
    }

    fn object_to_string(&self, obj: ObjectRef) -> Option<String> {
        (**self).object_to_string(obj)
    }

    fn has_constant(&self, class: &str, name: &str) -> bool {
        (**self).has_constant(class, name)
    }

    fn constant_value(&self, class: &str, name: &str) -> Result<Value, HostError> {
        (**self).constant_value(class, name)
    }

    fn has_static_method(&self, class: &str, name: &str) -> bool {
        (**self).has_static_method(class, name)
    }

    fn invoke_static_method(
        &self,
        class: &str,
        name: &str,
        args: &[Value],
    ) -> Result<Value, HostError> {
        (**self).invoke_static_method(class, name, args)
    }

    fn function_exists(&self, name: &str) -> bool {
        (**self).function_exists(name)
    }

    fn invoke_function(&self, name: &str, args: &[Value]) -> Result<Value, HostError> {
        (**self).invoke_function(name, args)
    }
}

/// A host with no objects and no functions. Only pure expressions evaluate.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHost;

impl HostAdapter for NoHost {}

/// Canonical form of a callable name: ASCII lowercase, without a leading
/// namespace separator. Callable names are case-insensitive.
pub fn canonical_function_name(name: &str) -> String {
    name.strip_prefix('\\').unwrap_or(name).to_ascii_lowercase()
}
