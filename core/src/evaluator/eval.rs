//! Core evaluation logic.

use tracing::{trace, warn};

use crate::api::{Context, UnsafeFunctions};
use crate::evaluator::{EvalError, literals, operators};
use crate::host::{HostAdapter, HostError};
use crate::lexer::{Token, TokenKind};
use crate::parser::{Argument, ArrayElement, Expr};
use crate::stack::ensure_sufficient_stack;
use crate::syntax::Location;
use crate::values::{Array, Key, ObjectRef, Value, to_bool};

/// Tree-walking evaluator for one `eval` call.
///
/// Holds only borrowed, read-only state plus the recursion depth, so a tree
/// can be evaluated any number of times and from several threads at once.
pub(crate) struct Evaluator<'e> {
    context: &'e Context,
    host: &'e dyn HostAdapter,
    unsafe_functions: &'e UnsafeFunctions,
    max_depth: usize,
    depth: usize,
}

impl<'e> Evaluator<'e> {
    pub fn new(
        context: &'e Context,
        host: &'e dyn HostAdapter,
        unsafe_functions: &'e UnsafeFunctions,
        max_depth: usize,
    ) -> Self {
        Self {
            context,
            host,
            unsafe_functions,
            max_depth,
            depth: 0,
        }
    }

    /// Evaluate an expression node.
    pub fn eval(&mut self, expr: &Expr<'_>) -> Result<Value, EvalError> {
        // Check depth before recursing
        if self.depth >= self.max_depth {
            return Err(EvalError::StackOverflow {
                depth: self.depth,
                max_depth: self.max_depth,
                location: expr.location(),
            });
        }

        self.depth += 1;
        let result = ensure_sufficient_stack(|| self.eval_inner(expr));
        self.depth -= 1;

        result
    }

    fn eval_inner(&mut self, expr: &Expr<'_>) -> Result<Value, EvalError> {
        match *expr {
            Expr::Literal(token) => literals::decode(token),
            Expr::Variable(token) => self.variable(token),
            Expr::Unary { op, operand } => {
                let value = self.eval(operand)?;
                operators::unary(op, value)
            }
            Expr::Cast { op, ty, operand } => {
                let value = self.eval(operand)?;
                operators::cast(op, ty, value)
            }
            Expr::Binary { left, op, right } => self.binary(left, op, right),
            Expr::Ternary {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                let condition = self.eval(condition)?;
                if to_bool(&condition) {
                    self.eval(then_branch)
                } else {
                    self.eval(else_branch)
                }
            }
            Expr::Assign { op, .. } => Err(EvalError::Unsupported {
                message: "Assignment expressions are not supported",
                location: op.location,
            }),
            Expr::InstanceOf { value, class, .. } => self.instance_of(value, class),
            Expr::ArrayAccess {
                target,
                bracket,
                offset,
            } => self.array_access(target, bracket, offset),
            Expr::Array { elements, .. } => self.array_literal(elements),
            Expr::PropertyAccess {
                target,
                op,
                name,
                is_static,
            } => {
                if is_static {
                    self.class_constant(target, op, name)
                } else {
                    self.property(target, op, name)
                }
            }
            Expr::MethodCall {
                target,
                op,
                name,
                args,
                is_static,
            } => {
                if is_static {
                    self.static_call(target, op, name, args)
                } else {
                    self.method_call(target, op, name, args)
                }
            }
            Expr::FunctionCall { name, paren, args } => self.function_call(name, paren, args),
            Expr::StringInterpolation { parts, .. } => self.interpolation(parts),
        }
    }

    fn variable(&self, token: Token<'_>) -> Result<Value, EvalError> {
        self.context
            .get(token.variable_name())
            .cloned()
            .ok_or_else(|| EvalError::UndefinedVariable {
                name: token.text.to_string(),
                location: token.location,
            })
    }

    fn binary(
        &mut self,
        left: &Expr<'_>,
        op: Token<'_>,
        right: &Expr<'_>,
    ) -> Result<Value, EvalError> {
        match op.kind {
            TokenKind::AndAnd | TokenKind::And => {
                if !to_bool(&self.eval(left)?) {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(to_bool(&self.eval(right)?)))
            }
            TokenKind::OrOr | TokenKind::Or => {
                if to_bool(&self.eval(left)?) {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(to_bool(&self.eval(right)?)))
            }
            TokenKind::Coalesce => {
                let value = self.eval(left)?;
                if !value.is_null() {
                    return Ok(value);
                }
                self.eval(right)
            }
            _ => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                operators::binary(op, left, right, self.host)
            }
        }
    }

    fn instance_of(&mut self, value: &Expr<'_>, class: &Expr<'_>) -> Result<Value, EvalError> {
        let Value::Object(obj) = self.eval(value)? else {
            return Ok(Value::Bool(false));
        };
        let class = self.class_name(class)?;
        Ok(Value::Bool(self.host.is_instance_of(obj, &class)))
    }

    fn array_literal(&mut self, elements: &[ArrayElement<'_>]) -> Result<Value, EvalError> {
        let mut array = Array::new();
        for element in elements {
            match element.key {
                Some(key_expr) => {
                    let key = self.eval(key_expr)?;
                    let key = array_key(key, key_expr.location())?;
                    let value = self.eval(element.value)?;
                    array.insert(key, value);
                }
                None => {
                    let value = self.eval(element.value)?;
                    array.push(value);
                }
            }
        }
        Ok(Value::Array(array))
    }

    fn array_access(
        &mut self,
        target: &Expr<'_>,
        bracket: Token<'_>,
        offset: &Expr<'_>,
    ) -> Result<Value, EvalError> {
        let container = self.eval(target)?;
        let offset_value = self.eval(offset)?;
        match container {
            Value::Array(array) => {
                let key = array_key(offset_value, offset.location())?;
                array
                    .get(&key)
                    .cloned()
                    .ok_or_else(|| EvalError::UndefinedOffset {
                        offset: describe_key(&key),
                        location: bracket.location,
                    })
            }
            Value::Object(obj) => {
                let name = match offset_value {
                    Value::Str(s) => s,
                    Value::Int(n) => n.to_string(),
                    other => {
                        return Err(EvalError::InvalidName {
                            what: "Property",
                            kind: other.kind(),
                            location: offset.location(),
                        });
                    }
                };
                self.read_property(obj, name, bracket.location)
            }
            other => Err(EvalError::NotIndexable {
                kind: other.kind(),
                location: bracket.location,
            }),
        }
    }

    fn property(
        &mut self,
        target: &Expr<'_>,
        op: Token<'_>,
        name: &Expr<'_>,
    ) -> Result<Value, EvalError> {
        let object = self.eval(target)?;
        let name = self.member_name(name)?;
        let obj = expect_object(object, &name, op.location)?;
        self.read_property(obj, name, op.location)
    }

    fn read_property(
        &self,
        obj: ObjectRef,
        name: String,
        location: Location,
    ) -> Result<Value, EvalError> {
        if !self.host.has_property(obj, &name) {
            return Err(EvalError::UndefinedProperty {
                name,
                class: self.host.class_name_of(obj),
                location,
            });
        }
        self.host.get_property(obj, &name).map_err(|error| {
            host_error(format!("{}->{}", self.host.class_name_of(obj), name), error, location)
        })
    }

    fn method_call(
        &mut self,
        target: &Expr<'_>,
        op: Token<'_>,
        name: &Expr<'_>,
        args: &[Argument<'_>],
    ) -> Result<Value, EvalError> {
        let object = self.eval(target)?;
        let name = self.member_name(name)?;
        let obj = expect_object(object, &name, op.location)?;
        if !self.host.has_method(obj, &name) {
            return Err(EvalError::UndefinedMethod {
                name,
                class: self.host.class_name_of(obj),
                location: op.location,
            });
        }

        let args = self.arguments(args)?;
        trace!(object = %obj, method = %name, args = args.len(), "invoking host method");
        self.host.invoke_method(obj, &name, &args).map_err(|error| {
            host_error(format!("{}->{}()", self.host.class_name_of(obj), name), error, op.location)
        })
    }

    /// `Class::NAME`, including the `Class::class` pseudo-constant.
    fn class_constant(
        &mut self,
        target: &Expr<'_>,
        op: Token<'_>,
        name: &Expr<'_>,
    ) -> Result<Value, EvalError> {
        let class = self.class_name(target)?;
        let name = self.member_name(name)?;
        if name.eq_ignore_ascii_case("class") {
            return Ok(Value::Str(class));
        }
        if !self.host.has_constant(&class, &name) {
            return Err(EvalError::UndefinedConstant {
                name,
                class,
                location: op.location,
            });
        }
        self.host
            .constant_value(&class, &name)
            .map_err(|error| host_error(format!("{}::{}", class, name), error, op.location))
    }

    fn static_call(
        &mut self,
        target: &Expr<'_>,
        op: Token<'_>,
        name: &Expr<'_>,
        args: &[Argument<'_>],
    ) -> Result<Value, EvalError> {
        let class = self.class_name(target)?;
        let name = self.member_name(name)?;
        if !self.host.has_static_method(&class, &name) {
            return Err(EvalError::UndefinedStaticMethod {
                name,
                class,
                location: op.location,
            });
        }

        let args = self.arguments(args)?;
        trace!(class = %class, method = %name, args = args.len(), "invoking static host method");
        self.host
            .invoke_static_method(&class, &name, &args)
            .map_err(|error| host_error(format!("{}::{}()", class, name), error, op.location))
    }

    fn function_call(
        &mut self,
        name: &Expr<'_>,
        paren: Token<'_>,
        args: &[Argument<'_>],
    ) -> Result<Value, EvalError> {
        let function = match name.as_identifier() {
            Some(ident) => ident.to_string(),
            None => match self.eval(name)? {
                Value::Str(s) => s,
                other => {
                    return Err(EvalError::InvalidName {
                        what: "Function",
                        kind: other.kind(),
                        location: name.location(),
                    });
                }
            },
        };

        // The deny-list is consulted before the host is asked anything.
        if self.unsafe_functions.is_denied(&function) {
            warn!(function = %function, "rejected call to unsafe function");
            return Err(EvalError::FunctionNotAllowed {
                name: function,
                location: name.location(),
            });
        }
        if !self.host.function_exists(&function) {
            return Err(EvalError::UndefinedFunction {
                name: function,
                location: name.location(),
            });
        }

        let args = self.arguments(args)?;
        trace!(function = %function, args = args.len(), "invoking host function");
        self.host
            .invoke_function(&function, &args)
            .map_err(|error| host_error(format!("{}()", function), error, paren.location))
    }

    fn interpolation(&mut self, parts: &[&Expr<'_>]) -> Result<Value, EvalError> {
        let mut text = String::new();
        for &part in parts {
            if let Expr::Literal(token) = part {
                if token.kind == TokenKind::StringFragment {
                    if let Value::Str(fragment) = literals::decode(*token)? {
                        text.push_str(&fragment);
                    }
                    continue;
                }
            }

            let value = self.eval(part)?;
            match operators::stringify(&value, self.host) {
                Some(s) => text.push_str(&s),
                None => {
                    return Err(EvalError::InterpolationPart {
                        part: part.to_string(),
                        kind: value.kind(),
                        location: part.location(),
                    });
                }
            }
        }
        Ok(Value::Str(text))
    }

    /// Arguments, left to right. By-reference passing is rejected outright.
    fn arguments(&mut self, args: &[Argument<'_>]) -> Result<Vec<Value>, EvalError> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            if arg.by_ref {
                return Err(EvalError::Unsupported {
                    message: "Arguments passed by reference are not supported",
                    location: arg.value.location(),
                });
            }
            values.push(self.eval(arg.value)?);
        }
        Ok(values)
    }

    /// A member name: a bare word, or a computed expression yielding a string.
    fn member_name(&mut self, name: &Expr<'_>) -> Result<String, EvalError> {
        if let Some(ident) = name.as_identifier() {
            return Ok(ident.to_string());
        }
        match self.eval(name)? {
            Value::Str(s) => Ok(s),
            other => Err(EvalError::InvalidName {
                what: "Member",
                kind: other.kind(),
                location: name.location(),
            }),
        }
    }

    /// A class name: a bare (possibly qualified) identifier, a string, or
    /// an object standing for its own class.
    fn class_name(&mut self, target: &Expr<'_>) -> Result<String, EvalError> {
        if let Some(ident) = target.as_identifier() {
            return Ok(ident.strip_prefix('\\').unwrap_or(ident).to_string());
        }
        match self.eval(target)? {
            Value::Str(s) => Ok(s),
            Value::Object(obj) => Ok(self.host.class_name_of(obj)),
            other => Err(EvalError::InvalidName {
                what: "Class",
                kind: other.kind(),
                location: target.location(),
            }),
        }
    }
}

fn array_key(value: Value, location: Location) -> Result<Key, EvalError> {
    match value {
        Value::Int(n) => Ok(Key::Int(n)),
        Value::Str(s) => Ok(Key::from_string(s)),
        other => Err(EvalError::InvalidArrayKey {
            kind: other.kind(),
            location,
        }),
    }
}

fn describe_key(key: &Key) -> String {
    match key {
        Key::Int(n) => n.to_string(),
        Key::Str(s) => format!("\"{}\"", s),
    }
}

fn expect_object(value: Value, member: &str, location: Location) -> Result<ObjectRef, EvalError> {
    match value {
        Value::Object(obj) => Ok(obj),
        other => Err(EvalError::NotAnObject {
            member: member.to_string(),
            kind: other.kind(),
            location,
        }),
    }
}

fn host_error(callee: String, error: HostError, location: Location) -> EvalError {
    EvalError::Host {
        callee,
        error,
        location,
    }
}
