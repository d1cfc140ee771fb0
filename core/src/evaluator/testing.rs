//! A scriptable host adapter for evaluator tests.
//!
//! Objects have a class, optional parent classes, properties, methods and an
//! optional string form. Every adapter call is recorded so tests can check
//! which sub-evaluations reached the host.

use std::cell::RefCell;

use hashbrown::HashMap;

use crate::host::{FunctionTable, HostAdapter, HostError, NativeFn};
use crate::values::{ObjectRef, Value};

#[derive(Default)]
struct TestObject {
    class: String,
    parents: Vec<String>,
    properties: HashMap<String, Value>,
    methods: HashMap<String, NativeFn>,
    string: Option<String>,
}

#[derive(Default)]
pub(crate) struct TestHost {
    objects: Vec<TestObject>,
    constants: HashMap<(String, String), Value>,
    static_methods: HashMap<(String, String), NativeFn>,
    functions: FunctionTable,
    calls: RefCell<Vec<String>>,
}

impl TestHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object(&mut self, class: &str) -> ObjectRef {
        self.objects.push(TestObject {
            class: class.to_string(),
            ..TestObject::default()
        });
        ObjectRef(self.objects.len() as u64 - 1)
    }

    fn object_mut(&mut self, obj: ObjectRef) -> &mut TestObject {
        &mut self.objects[obj.0 as usize]
    }

    pub fn property(&mut self, obj: ObjectRef, name: &str, value: impl Into<Value>) -> &mut Self {
        self.object_mut(obj)
            .properties
            .insert(name.to_string(), value.into());
        self
    }

    pub fn method(&mut self, obj: ObjectRef, name: &str, method: NativeFn) -> &mut Self {
        self.object_mut(obj).methods.insert(name.to_string(), method);
        self
    }

    pub fn parent(&mut self, obj: ObjectRef, class: &str) -> &mut Self {
        self.object_mut(obj).parents.push(class.to_string());
        self
    }

    pub fn stringable(&mut self, obj: ObjectRef, text: &str) -> &mut Self {
        self.object_mut(obj).string = Some(text.to_string());
        self
    }

    pub fn constant(&mut self, class: &str, name: &str, value: impl Into<Value>) -> &mut Self {
        self.constants
            .insert((class.to_string(), name.to_string()), value.into());
        self
    }

    pub fn static_method(&mut self, class: &str, name: &str, method: NativeFn) -> &mut Self {
        self.static_methods
            .insert((class.to_string(), name.to_string()), method);
        self
    }

    pub fn function(&mut self, name: &str, function: NativeFn) -> &mut Self {
        self.functions.register(name, function);
        self
    }

    /// Recorded adapter calls, in order, as `capability:subject`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, capability: &str, subject: impl core::fmt::Display) {
        self.calls
            .borrow_mut()
            .push(format!("{}:{}", capability, subject));
    }

    fn get(&self, obj: ObjectRef) -> Option<&TestObject> {
        self.objects.get(obj.0 as usize)
    }
}

impl HostAdapter for TestHost {
    fn has_property(&self, obj: ObjectRef, name: &str) -> bool {
        self.record("has_property", name);
        self.get(obj).is_some_and(|o| o.properties.contains_key(name))
    }

    fn get_property(&self, obj: ObjectRef, name: &str) -> Result<Value, HostError> {
        self.record("get_property", name);
        self.get(obj)
            .and_then(|o| o.properties.get(name).cloned())
            .ok_or_else(|| HostError::failed(format!("no property {}", name)))
    }

    fn has_method(&self, obj: ObjectRef, name: &str) -> bool {
        self.record("has_method", name);
        self.get(obj).is_some_and(|o| o.methods.contains_key(name))
    }

    fn invoke_method(&self, obj: ObjectRef, name: &str, args: &[Value]) -> Result<Value, HostError> {
        self.record("invoke_method", name);
        match self.get(obj).and_then(|o| o.methods.get(name)) {
            Some(method) => method(args),
            None => Err(HostError::failed(format!("no method {}", name))),
        }
    }

    fn class_name_of(&self, obj: ObjectRef) -> String {
        self.get(obj)
            .map(|o| o.class.clone())
            .unwrap_or_else(|| "object".to_string())
    }

    fn is_instance_of(&self, obj: ObjectRef, class_name: &str) -> bool {
        self.record("is_instance_of", class_name);
        self.get(obj).is_some_and(|o| {
            o.class.eq_ignore_ascii_case(class_name)
                || o.parents.iter().any(|p| p.eq_ignore_ascii_case(class_name))
        })
    }

    fn object_to_string(&self, obj: ObjectRef) -> Option<String> {
        self.record("object_to_string", obj);
        self.get(obj).and_then(|o| o.string.clone())
    }

    fn has_constant(&self, class: &str, name: &str) -> bool {
        self.record("has_constant", format_args!("{}::{}", class, name));
        self.constants
            .contains_key(&(class.to_string(), name.to_string()))
    }

    fn constant_value(&self, class: &str, name: &str) -> Result<Value, HostError> {
        self.record("constant_value", format_args!("{}::{}", class, name));
        self.constants
            .get(&(class.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| HostError::failed("no such constant"))
    }

    fn has_static_method(&self, class: &str, name: &str) -> bool {
        self.record("has_static_method", format_args!("{}::{}", class, name));
        self.static_methods
            .contains_key(&(class.to_string(), name.to_string()))
    }

    fn invoke_static_method(
        &self,
        class: &str,
        name: &str,
        args: &[Value],
    ) -> Result<Value, HostError> {
        self.record("invoke_static_method", format_args!("{}::{}", class, name));
        match self.static_methods.get(&(class.to_string(), name.to_string())) {
            Some(method) => method(args),
            None => Err(HostError::failed("no such static method")),
        }
    }

    fn function_exists(&self, name: &str) -> bool {
        self.record("function_exists", name);
        self.functions.function_exists(name)
    }

    fn invoke_function(&self, name: &str, args: &[Value]) -> Result<Value, HostError> {
        self.record("invoke_function", name);
        self.functions.invoke_function(name, args)
    }
}
