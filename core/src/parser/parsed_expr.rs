use core::fmt;

use crate::lexer::{Token, TokenKind};
use crate::syntax::Location;

/// A parsed expression together with the source it was parsed from.
#[derive(Debug)]
pub struct ParsedExpr<'a> {
    pub expr: &'a Expr<'a>,
    pub source: &'a str,
}

/// Expression tree node.
///
/// Children are arena references, so a tree is acyclic by construction and
/// can be shared between threads once built. Nodes keep the token that
/// introduced them for error positions.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr<'a> {
    /// Integer, float, string, bool or null token. Also used for bare names
    /// (identifier tokens) in function, class and member positions, and for
    /// the raw fragments of an interpolated string.
    Literal(Token<'a>),
    Variable(Token<'a>),
    Unary {
        op: Token<'a>,
        operand: &'a Expr<'a>,
    },
    Cast {
        op: Token<'a>,
        ty: CastType,
        operand: &'a Expr<'a>,
    },
    Binary {
        left: &'a Expr<'a>,
        op: Token<'a>,
        right: &'a Expr<'a>,
    },
    Ternary {
        condition: &'a Expr<'a>,
        question: Token<'a>,
        then_branch: &'a Expr<'a>,
        else_branch: &'a Expr<'a>,
    },
    /// Parsed only so evaluation can reject it with a clear message.
    Assign {
        target: &'a Expr<'a>,
        op: Token<'a>,
        value: &'a Expr<'a>,
    },
    InstanceOf {
        value: &'a Expr<'a>,
        op: Token<'a>,
        class: &'a Expr<'a>,
    },
    ArrayAccess {
        target: &'a Expr<'a>,
        bracket: Token<'a>,
        offset: &'a Expr<'a>,
    },
    Array {
        open: Token<'a>,
        elements: &'a [ArrayElement<'a>],
    },
    PropertyAccess {
        target: &'a Expr<'a>,
        op: Token<'a>,
        name: &'a Expr<'a>,
        is_static: bool,
    },
    MethodCall {
        target: &'a Expr<'a>,
        op: Token<'a>,
        name: &'a Expr<'a>,
        args: &'a [Argument<'a>],
        is_static: bool,
    },
    FunctionCall {
        name: &'a Expr<'a>,
        paren: Token<'a>,
        args: &'a [Argument<'a>],
    },
    /// Alternating `StringFragment` literals and embedded expressions.
    StringInterpolation {
        open: Token<'a>,
        parts: &'a [&'a Expr<'a>],
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrayElement<'a> {
    pub key: Option<&'a Expr<'a>>,
    pub value: &'a Expr<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Argument<'a> {
    pub value: &'a Expr<'a>,
    pub by_ref: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastType {
    Int,
    Float,
    String,
    Bool,
    Array,
}

impl CastType {
    /// Parse the inside of a `(type)` cast token.
    pub fn from_cast_text(text: &str) -> Option<Self> {
        let name = text
            .trim_start_matches('(')
            .trim_end_matches(')')
            .trim()
            .to_ascii_lowercase();
        match name.as_str() {
            "int" | "integer" => Some(CastType::Int),
            "float" | "double" => Some(CastType::Float),
            "string" => Some(CastType::String),
            "bool" | "boolean" => Some(CastType::Bool),
            "array" => Some(CastType::Array),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CastType::Int => "int",
            CastType::Float => "float",
            CastType::String => "string",
            CastType::Bool => "bool",
            CastType::Array => "array",
        }
    }
}

impl<'a> Expr<'a> {
    /// Location of the token that best identifies this node in errors.
    pub fn location(&self) -> Location {
        match self {
            Expr::Literal(token) | Expr::Variable(token) => token.location,
            Expr::Unary { op, .. }
            | Expr::Cast { op, .. }
            | Expr::Binary { op, .. }
            | Expr::Assign { op, .. }
            | Expr::InstanceOf { op, .. }
            | Expr::PropertyAccess { op, .. }
            | Expr::MethodCall { op, .. } => op.location,
            Expr::Ternary { question, .. } => question.location,
            Expr::ArrayAccess { bracket, .. } => bracket.location,
            Expr::Array { open, .. } | Expr::StringInterpolation { open, .. } => open.location,
            Expr::FunctionCall { paren, .. } => paren.location,
        }
    }

    /// The bare name if this node is an identifier literal.
    pub fn as_identifier(&self) -> Option<&'a str> {
        match self {
            Expr::Literal(token) if token.kind.is_word() => Some(token.text),
            _ => None,
        }
    }
}

/// Fully parenthesised rendering, so the tree shape is visible.
impl fmt::Display for Expr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(token) | Expr::Variable(token) => write!(f, "{}", token.text),
            Expr::Unary { op, operand } => write!(f, "({}{})", op.text, operand),
            Expr::Cast { ty, operand, .. } => write!(f, "(({}) {})", ty.name(), operand),
            Expr::Binary { left, op, right } => {
                write!(f, "({} {} {})", left, op.text.to_ascii_lowercase(), right)
            }
            Expr::Ternary {
                condition,
                then_branch,
                else_branch,
                ..
            } => write!(f, "({} ? {} : {})", condition, then_branch, else_branch),
            Expr::Assign { target, value, .. } => write!(f, "({} = {})", target, value),
            Expr::InstanceOf { value, class, .. } => {
                write!(f, "({} instanceof {})", value, class)
            }
            Expr::ArrayAccess { target, offset, .. } => write!(f, "{}[{}]", target, offset),
            Expr::Array { elements, .. } => {
                write!(f, "[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    if let Some(key) = element.key {
                        write!(f, "{} => ", key)?;
                    }
                    write!(f, "{}", element.value)?;
                }
                write!(f, "]")
            }
            Expr::PropertyAccess {
                target,
                name,
                is_static,
                ..
            } => {
                write!(f, "{}{}", target, member_op(*is_static))?;
                write_member_name(f, name)
            }
            Expr::MethodCall {
                target,
                name,
                args,
                is_static,
                ..
            } => {
                write!(f, "{}{}", target, member_op(*is_static))?;
                write_member_name(f, name)?;
                write_args(f, args)
            }
            Expr::FunctionCall { name, args, .. } => {
                write!(f, "{}", name)?;
                write_args(f, args)
            }
            Expr::StringInterpolation { parts, .. } => {
                write!(f, "\"")?;
                for part in parts.iter() {
                    match part {
                        Expr::Literal(token) if token.kind == TokenKind::StringFragment => {
                            write!(f, "{}", token.text)?
                        }
                        other => write!(f, "{{{}}}", other)?,
                    }
                }
                write!(f, "\"")
            }
        }
    }
}

fn member_op(is_static: bool) -> &'static str {
    if is_static { "::" } else { "->" }
}

fn write_member_name(f: &mut fmt::Formatter<'_>, name: &Expr<'_>) -> fmt::Result {
    match name.as_identifier() {
        Some(ident) => write!(f, "{}", ident),
        None => write!(f, "{{{}}}", name),
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[Argument<'_>]) -> fmt::Result {
    write!(f, "(")?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        if arg.by_ref {
            write!(f, "&")?;
        }
        write!(f, "{}", arg.value)?;
    }
    write!(f, ")")
}
