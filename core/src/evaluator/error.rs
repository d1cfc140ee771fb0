//! Evaluation errors.
//!
//! Every error carries the location of the node that failed. All of them
//! abort the evaluation that raised them; [`EvalError::StackOverflow`] is
//! additionally reported as a resource limit at the API boundary.

use core::fmt;

use thiserror::Error;

use crate::api::{Diagnostic, Severity};
use crate::host::HostError;
use crate::syntax::Location;
use crate::syntax::string_literal::UnescapeError;
use crate::values::ValueKind;

/// Which operand of a binary operator failed to coerce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("Variable is not defined in the context: {name}")]
    UndefinedVariable { name: String, location: Location },

    #[error("Unsupported operand type {kind} for unary '{op}' at {location}")]
    UnaryOperand {
        op: String,
        kind: ValueKind,
        location: Location,
    },

    #[error("Unsupported {side} operand type {kind} for '{op}' at {location}")]
    ArithmeticOperand {
        op: String,
        side: Side,
        kind: ValueKind,
        location: Location,
    },

    #[error("Cannot convert {side} operand of type {kind} to string for '.' at {location}")]
    ConcatOperand {
        side: Side,
        kind: ValueKind,
        location: Location,
    },

    #[error("Cannot convert {part} to string")]
    InterpolationPart {
        part: String,
        kind: ValueKind,
        location: Location,
    },

    #[error("{} by zero", zero_division_name(.op))]
    DivisionByZero { op: String, location: Location },

    #[error("Cannot cast {kind} to {target}")]
    InvalidCast {
        target: &'static str,
        kind: ValueKind,
        location: Location,
    },

    #[error("Illegal array key type {kind}")]
    InvalidArrayKey { kind: ValueKind, location: Location },

    #[error("Undefined array offset {offset}")]
    UndefinedOffset { offset: String, location: Location },

    #[error("Cannot use a value of type {kind} as an array")]
    NotIndexable { kind: ValueKind, location: Location },

    #[error("Property {name} does not exist on object of type {class}")]
    UndefinedProperty {
        name: String,
        class: String,
        location: Location,
    },

    #[error("Method {name} does not exist on object of type {class}")]
    UndefinedMethod {
        name: String,
        class: String,
        location: Location,
    },

    #[error("Constant {name} does not exist in class {class}")]
    UndefinedConstant {
        name: String,
        class: String,
        location: Location,
    },

    #[error("Static method {name} does not exist in class {class}")]
    UndefinedStaticMethod {
        name: String,
        class: String,
        location: Location,
    },

    #[error("Cannot access member {member} on {kind}")]
    NotAnObject {
        member: String,
        kind: ValueKind,
        location: Location,
    },

    #[error("{what} name must be a string, got {kind}")]
    InvalidName {
        what: &'static str,
        kind: ValueKind,
        location: Location,
    },

    #[error("Function {name} is not allowed")]
    FunctionNotAllowed { name: String, location: Location },

    #[error("Function {name} does not exist")]
    UndefinedFunction { name: String, location: Location },

    /// A host call failed; `callee` is the function or member invoked.
    #[error("{error}")]
    Host {
        callee: String,
        #[source]
        error: HostError,
        location: Location,
    },

    #[error("{error}")]
    InvalidEscape {
        error: UnescapeError,
        location: Location,
    },

    #[error("Invalid numeric literal {text}")]
    InvalidLiteral { text: String, location: Location },

    #[error("{message}")]
    Unsupported {
        message: &'static str,
        location: Location,
    },

    #[error("Evaluation stack overflow: depth {depth} exceeds maximum of {max_depth}")]
    StackOverflow {
        depth: usize,
        max_depth: usize,
        location: Location,
    },
}

fn zero_division_name(op: &str) -> &'static str {
    if op == "%" { "Modulo" } else { "Division" }
}

impl EvalError {
    pub fn location(&self) -> Location {
        match self {
            EvalError::UndefinedVariable { location, .. }
            | EvalError::UnaryOperand { location, .. }
            | EvalError::ArithmeticOperand { location, .. }
            | EvalError::ConcatOperand { location, .. }
            | EvalError::InterpolationPart { location, .. }
            | EvalError::DivisionByZero { location, .. }
            | EvalError::InvalidCast { location, .. }
            | EvalError::InvalidArrayKey { location, .. }
            | EvalError::UndefinedOffset { location, .. }
            | EvalError::NotIndexable { location, .. }
            | EvalError::UndefinedProperty { location, .. }
            | EvalError::UndefinedMethod { location, .. }
            | EvalError::UndefinedConstant { location, .. }
            | EvalError::UndefinedStaticMethod { location, .. }
            | EvalError::NotAnObject { location, .. }
            | EvalError::InvalidName { location, .. }
            | EvalError::FunctionNotAllowed { location, .. }
            | EvalError::UndefinedFunction { location, .. }
            | EvalError::Host { location, .. }
            | EvalError::InvalidEscape { location, .. }
            | EvalError::InvalidLiteral { location, .. }
            | EvalError::Unsupported { location, .. }
            | EvalError::StackOverflow { location, .. } => *location,
        }
    }

    /// Resource limits are reported separately from semantic failures.
    pub fn is_resource_exceeded(&self) -> bool {
        matches!(self, EvalError::StackOverflow { .. })
    }

    /// Convert to a Diagnostic for API boundary
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (code, help) = match self {
            EvalError::UndefinedVariable { .. } => {
                ("E001", Some("Pass the variable in the evaluation context"))
            }
            EvalError::UnaryOperand { .. } => ("E002", None),
            EvalError::ArithmeticOperand { .. } => {
                ("E003", Some("Arithmetic needs numbers or numeric strings"))
            }
            EvalError::ConcatOperand { .. } => ("E004", None),
            EvalError::InterpolationPart { .. } => ("E005", None),
            EvalError::DivisionByZero { .. } => ("E006", None),
            EvalError::InvalidCast { .. } => ("E007", Some("Only scalars can be cast")),
            EvalError::InvalidArrayKey { .. } => {
                ("E008", Some("Array keys must be integers or strings"))
            }
            EvalError::UndefinedOffset { .. } => ("E009", None),
            EvalError::NotIndexable { .. } => ("E010", None),
            EvalError::UndefinedProperty { .. } => ("E011", None),
            EvalError::UndefinedMethod { .. } => ("E012", None),
            EvalError::UndefinedConstant { .. } => ("E013", None),
            EvalError::UndefinedStaticMethod { .. } => ("E014", None),
            EvalError::NotAnObject { .. } => ("E015", None),
            EvalError::InvalidName { .. } => ("E016", None),
            EvalError::FunctionNotAllowed { .. } => {
                ("E017", Some("This function is on the unsafe-function list"))
            }
            EvalError::UndefinedFunction { .. } => ("E018", None),
            EvalError::Host { .. } => ("E019", None),
            EvalError::InvalidEscape { .. } => ("E020", None),
            EvalError::InvalidLiteral { .. } => ("E021", None),
            EvalError::Unsupported { .. } => ("E022", None),
            EvalError::StackOverflow { .. } => {
                ("E100", Some("Reduce nesting or simplify the expression"))
            }
        };

        Diagnostic {
            severity: Severity::Error,
            message: self.to_string(),
            span: self.location().span(),
            help: help.map(str::to_string),
            code: Some(code.to_string()),
        }
    }
}
