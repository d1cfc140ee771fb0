//! Shared helpers for the integration tests: a recording host with a small
//! object model, and the `test_case!` macro.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use bumpalo::Bump;
use sandex::{
    Context, EvalError, FunctionTable, HostAdapter, HostError, NativeFn, ObjectRef,
    UnsafeFunctions, Value, stdlib,
};

/// An object exposed by [`TestHost`].
#[derive(Default)]
pub struct Object {
    pub class: String,
    pub parents: Vec<String>,
    pub properties: HashMap<String, Value>,
    pub methods: HashMap<String, NativeFn>,
    pub string: Option<String>,
}

impl Object {
    pub fn new(class: &str) -> Self {
        Object {
            class: class.to_string(),
            ..Object::default()
        }
    }

    pub fn property(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(name.to_string(), value.into());
        self
    }

    pub fn method(mut self, name: &str, method: NativeFn) -> Self {
        self.methods.insert(name.to_string(), method);
        self
    }

    pub fn extends(mut self, class: &str) -> Self {
        self.parents.push(class.to_string());
        self
    }

    pub fn stringable(mut self, text: &str) -> Self {
        self.string = Some(text.to_string());
        self
    }
}

/// Host adapter backed by the bundled stdlib plus registered objects,
/// class constants and static methods. Every call is recorded as
/// `capability:subject`.
pub struct TestHost {
    functions: FunctionTable,
    objects: Vec<Object>,
    constants: HashMap<(String, String), Value>,
    static_methods: HashMap<(String, String), NativeFn>,
    calls: RefCell<Vec<String>>,
}

impl Default for TestHost {
    fn default() -> Self {
        TestHost {
            functions: stdlib::function_table(),
            objects: Vec::new(),
            constants: HashMap::new(),
            static_methods: HashMap::new(),
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl TestHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, object: Object) -> ObjectRef {
        self.objects.push(object);
        ObjectRef(self.objects.len() as u64 - 1)
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

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, capability: &str, subject: &str) {
        self.calls
            .borrow_mut()
            .push(format!("{}:{}", capability, subject));
    }

    fn object(&self, obj: ObjectRef) -> Option<&Object> {
        self.objects.get(obj.0 as usize)
    }
}

impl HostAdapter for TestHost {
    fn has_property(&self, obj: ObjectRef, name: &str) -> bool {
        self.record("has_property", name);
        self.object(obj)
            .is_some_and(|o| o.properties.contains_key(name))
    }

    fn get_property(&self, obj: ObjectRef, name: &str) -> Result<Value, HostError> {
        self.record("get_property", name);
        self.object(obj)
            .and_then(|o| o.properties.get(name).cloned())
            .ok_or_else(|| HostError::failed(format!("no property {}", name)))
    }

    fn has_method(&self, obj: ObjectRef, name: &str) -> bool {
        self.record("has_method", name);
        self.object(obj).is_some_and(|o| o.methods.contains_key(name))
    }

    fn invoke_method(&self, obj: ObjectRef, name: &str, args: &[Value]) -> Result<Value, HostError> {
        self.record("invoke_method", name);
        match self.object(obj).and_then(|o| o.methods.get(name)) {
            Some(method) => method(args),
            None => Err(HostError::failed(format!("no method {}", name))),
        }
    }

    fn class_name_of(&self, obj: ObjectRef) -> String {
        self.object(obj)
            .map(|o| o.class.clone())
            .unwrap_or_else(|| "object".to_string())
    }

    fn is_instance_of(&self, obj: ObjectRef, class_name: &str) -> bool {
        self.record("is_instance_of", class_name);
        self.object(obj).is_some_and(|o| {
            o.class.eq_ignore_ascii_case(class_name)
                || o.parents.iter().any(|p| p.eq_ignore_ascii_case(class_name))
        })
    }

    fn object_to_string(&self, obj: ObjectRef) -> Option<String> {
        self.record("object_to_string", &obj.to_string());
        self.object(obj).and_then(|o| o.string.clone())
    }

    fn has_constant(&self, class: &str, name: &str) -> bool {
        self.record("has_constant", &format!("{}::{}", class, name));
        self.constants
            .contains_key(&(class.to_string(), name.to_string()))
    }

    fn constant_value(&self, class: &str, name: &str) -> Result<Value, HostError> {
        self.record("constant_value", &format!("{}::{}", class, name));
        self.constants
            .get(&(class.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| HostError::failed("no such constant"))
    }

    fn has_static_method(&self, class: &str, name: &str) -> bool {
        self.record("has_static_method", &format!("{}::{}", class, name));
        self.static_methods
            .contains_key(&(class.to_string(), name.to_string()))
    }

    fn invoke_static_method(
        &self,
        class: &str,
        name: &str,
        args: &[Value],
    ) -> Result<Value, HostError> {
        self.record("invoke_static_method", &format!("{}::{}", class, name));
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

/// The host used by `test_case!`: the stdlib, a `User` object bound to
/// `$user`, a `Config::VERSION` constant and a `Math::square` static method.
pub fn fixture() -> (TestHost, Context) {
    fn greet(args: &[Value]) -> Result<Value, HostError> {
        let name = args.first().and_then(Value::as_str).unwrap_or("world");
        Ok(Value::from(format!("Hello, {}!", name)))
    }

    fn square(args: &[Value]) -> Result<Value, HostError> {
        match args {
            [Value::Int(n)] => Ok(Value::Int(n * n)),
            _ => Err(HostError::failed("square() expects an int")),
        }
    }

    let mut host = TestHost::new();
    let user = host.add(
        Object::new("User")
            .extends("Model")
            .property("name", "Ada")
            .property("age", 36)
            .property("tags", Value::list(["admin".into(), "ops".into()]))
            .method("greet", greet)
            .stringable("Ada Lovelace"),
    );
    host.constant("Config", "VERSION", "1.2.0")
        .static_method("Math", "square", square);

    (host, Context::new().with("user", user))
}

/// Parse and evaluate `input` against the fixture host, merging `extra`
/// variables into the fixture context.
pub fn eval(input: &str, extra: Context) -> Result<Value, EvalError> {
    let (host, mut context) = fixture();
    for (name, value) in extra.iter() {
        context.insert(name, value.clone());
    }
    let arena = Bump::new();
    let parsed = sandex::parser::parse(&arena, input)
        .unwrap_or_else(|e| panic!("Expression parsing failed: {}\n{}", input, e));
    sandex::evaluator::eval(parsed.expr, &context, &host, &UnsafeFunctions::default())
}

/// Fully parenthesised rendering of the parsed tree, or the parse error.
pub fn tree(input: &str) -> Result<String, sandex::ParseError> {
    let arena = Bump::new();
    sandex::parser::parse(&arena, input).map(|parsed| parsed.expr.to_string())
}

/// Declare a test that parses and evaluates one expression.
///
/// Every section after `input` is optional, but they must appear in this
/// order:
///
/// ```ignore
/// test_case! {
///     name: addition,
///     input: "$a + 2",
///     context: { "a" => 1 },
///     tree: { "($a + 2)" },
///     value: { Value::Int(3) },
/// }
/// ```
///
/// `eval_error` and `parse_error` take a pattern matched against the
/// `EvalError` or `ParseErrorKind`.
#[macro_export]
macro_rules! test_case {
    (
        name: $name:ident,
        input: $input:expr
        $(, context: { $($var:literal => $val:expr),* $(,)? })?
        $(, tree: { $tree:expr })?
        $(, value: { $value:expr })?
        $(, eval_error: { $eval_error:pat })?
        $(, parse_error: { $parse_error:pat })?
        $(,)?
    ) => {
        #[test]
        fn $name() {
            #[allow(unused_mut)]
            let mut context = sandex::Context::new();
            $($(context.insert($var, $val);)*)?
            let _ = &context;

            $(
                let tree = $crate::cases::tree($input)
                    .unwrap_or_else(|e| panic!("Expression parsing failed: {}\n{}", $input, e));
                pretty_assertions::assert_eq!(tree, $tree);
            )?
            $(
                pretty_assertions::assert_eq!(
                    $crate::cases::eval($input, context.clone()),
                    Ok($value)
                );
            )?
            $(
                let result = $crate::cases::eval($input, context.clone());
                assert!(
                    matches!(result, Err($eval_error)),
                    "unexpected result for {}: {:?}",
                    $input,
                    result
                );
            )?
            $(
                let result = $crate::cases::tree($input);
                assert!(
                    matches!(result.as_ref().map_err(|e| &e.kind), Err($parse_error)),
                    "unexpected parse result for {}: {:?}",
                    $input,
                    result
                );
            )?
        }
    };
}
