use hashbrown::HashMap;

use super::{HostAdapter, HostError, canonical_function_name};
use crate::values::Value;

/// A native function callable from expressions.
pub type NativeFn = fn(&[Value]) -> Result<Value, HostError>;

/// Host adapter that dispatches registered native functions by name.
///
/// Lookup is case-insensitive and ignores a leading `\`. Objects are not
/// supported; wrap the table in another adapter to add them.
#[derive(Clone, Default)]
pub struct FunctionTable {
    functions: HashMap<String, NativeFn>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `function` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: &str, function: NativeFn) -> &mut Self {
        self.functions.insert(canonical_function_name(name), function);
        self
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, name: &str, function: NativeFn) -> Self {
        self.register(name, function);
        self
    }

    pub fn get(&self, name: &str) -> Option<NativeFn> {
        self.functions.get(&canonical_function_name(name)).copied()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl core::fmt::Debug for FunctionTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FunctionTable")
            .field("functions", &self.names())
            .finish()
    }
}

impl HostAdapter for FunctionTable {
    fn function_exists(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    fn invoke_function(&self, name: &str, args: &[Value]) -> Result<Value, HostError> {
        match self.get(name) {
            Some(function) => function(args),
            None => Err(HostError::Unavailable(format!("function {}()", name))),
        }
    }
}
