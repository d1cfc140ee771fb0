//! Unary, cast and binary operator implementations.
//!
//! Short-circuiting operators (`&&`, `||`, `and`, `or`, `??`) need control
//! over operand evaluation and live in the evaluator itself; everything here
//! works on already evaluated operands.

use core::cmp::Ordering;

use crate::evaluator::{EvalError, Side};
use crate::host::HostAdapter;
use crate::lexer::{Token, TokenKind};
use crate::parser::CastType;
use crate::values::convert::{scalar_to_string, to_array, to_float, to_int};
use crate::values::{Number, Value, compare, identical, loose_equals, to_bool, to_number};

/// String conversion used by `.` and interpolation: scalars directly,
/// objects only if the host can stringify them.
pub(super) fn stringify(value: &Value, host: &dyn HostAdapter) -> Option<String> {
    match value {
        Value::Object(obj) => host.object_to_string(*obj),
        other => scalar_to_string(other),
    }
}

pub(super) fn unary(op: Token<'_>, operand: Value) -> Result<Value, EvalError> {
    if op.kind == TokenKind::Bang {
        return Ok(Value::Bool(!to_bool(&operand)));
    }

    let number = to_number(&operand).ok_or_else(|| EvalError::UnaryOperand {
        op: op.text.to_string(),
        kind: operand.kind(),
        location: op.location,
    })?;
    match (op.kind, number) {
        (TokenKind::Plus, n) => Ok(n.into()),
        (TokenKind::Minus, Number::Int(n)) => Ok(match n.checked_neg() {
            Some(n) => Value::Int(n),
            None => Value::Float(-(n as f64)),
        }),
        (TokenKind::Minus, Number::Float(x)) => Ok(Value::Float(-x)),
        _ => Err(EvalError::Unsupported {
            message: "unknown unary operator",
            location: op.location,
        }),
    }
}

pub(super) fn cast(op: Token<'_>, ty: CastType, operand: Value) -> Result<Value, EvalError> {
    if ty == CastType::Array {
        return Ok(Value::Array(to_array(operand)));
    }
    if !operand.is_scalar() {
        return Err(EvalError::InvalidCast {
            target: ty.name(),
            kind: operand.kind(),
            location: op.location,
        });
    }
    Ok(match ty {
        CastType::Int => Value::Int(to_int(&operand).unwrap_or_default()),
        CastType::Float => Value::Float(to_float(&operand).unwrap_or_default()),
        CastType::String => Value::Str(scalar_to_string(&operand).unwrap_or_default()),
        CastType::Bool => Value::Bool(to_bool(&operand)),
        CastType::Array => Value::Array(to_array(operand)),
    })
}

/// Every binary operator that evaluates both operands unconditionally.
pub(super) fn binary(
    op: Token<'_>,
    left: Value,
    right: Value,
    host: &dyn HostAdapter,
) -> Result<Value, EvalError> {
    use TokenKind::*;

    match op.kind {
        Plus | Minus | Star | Slash | Percent | StarStar => arithmetic(op, &left, &right),
        Dot => concat(op, &left, &right, host),
        Xor => Ok(Value::Bool(to_bool(&left) ^ to_bool(&right))),
        Equal => Ok(Value::Bool(loose_equals(&left, &right, host))),
        NotEqual => Ok(Value::Bool(!loose_equals(&left, &right, host))),
        Identical => Ok(Value::Bool(identical(&left, &right))),
        NotIdentical => Ok(Value::Bool(!identical(&left, &right))),
        Less | LessEqual | Greater | GreaterEqual => {
            let ordering = compare(&left, &right, host);
            let result = match op.kind {
                Less => ordering == Some(Ordering::Less),
                LessEqual => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
                Greater => ordering == Some(Ordering::Greater),
                _ => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
            };
            Ok(Value::Bool(result))
        }
        Spaceship => Ok(Value::Int(match compare(&left, &right, host) {
            Some(Ordering::Less) => -1,
            Some(Ordering::Equal) => 0,
            Some(Ordering::Greater) | None => 1,
        })),
        _ => Err(EvalError::Unsupported {
            message: "unknown binary operator",
            location: op.location,
        }),
    }
}

fn operand(op: Token<'_>, side: Side, value: &Value) -> Result<Number, EvalError> {
    to_number(value).ok_or_else(|| EvalError::ArithmeticOperand {
        op: op.text.to_string(),
        side,
        kind: value.kind(),
        location: op.location,
    })
}

fn division_by_zero(op: Token<'_>) -> EvalError {
    EvalError::DivisionByZero {
        op: op.text.to_string(),
        location: op.location,
    }
}

/// `+ - * / % **`. Integer results that overflow become floats.
fn arithmetic(op: Token<'_>, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let a = operand(op, Side::Left, left)?;
    let b = operand(op, Side::Right, right)?;

    if op.kind == TokenKind::Percent {
        let (a, b) = (truncate(a), truncate(b));
        if b == 0 {
            return Err(division_by_zero(op));
        }
        return Ok(Value::Int(a.wrapping_rem(b)));
    }

    if op.kind == TokenKind::Slash && b.to_f64() == 0.0 {
        return Err(division_by_zero(op));
    }

    if let (Number::Int(x), Number::Int(y)) = (a, b) {
        if let Some(n) = int_arithmetic(op.kind, x, y) {
            return Ok(Value::Int(n));
        }
    }

    let (x, y) = (a.to_f64(), b.to_f64());
    Ok(Value::Float(match op.kind {
        TokenKind::Plus => x + y,
        TokenKind::Minus => x - y,
        TokenKind::Star => x * y,
        TokenKind::Slash => x / y,
        _ => x.powf(y),
    }))
}

/// Exact integer result, or `None` when the result needs a float.
fn int_arithmetic(kind: TokenKind, x: i64, y: i64) -> Option<i64> {
    match kind {
        TokenKind::Plus => x.checked_add(y),
        TokenKind::Minus => x.checked_sub(y),
        TokenKind::Star => x.checked_mul(y),
        TokenKind::Slash => match x.checked_rem(y)? {
            0 => x.checked_div(y),
            _ => None,
        },
        TokenKind::StarStar => u32::try_from(y).ok().and_then(|exp| x.checked_pow(exp)),
        _ => None,
    }
}

/// Integer conversion for `%`: floats truncate toward zero.
fn truncate(n: Number) -> i64 {
    match n {
        Number::Int(n) => n,
        Number::Float(x) => x as i64,
    }
}

fn concat(
    op: Token<'_>,
    left: &Value,
    right: &Value,
    host: &dyn HostAdapter,
) -> Result<Value, EvalError> {
    let fail = |side: Side, value: &Value| EvalError::ConcatOperand {
        side,
        kind: value.kind(),
        location: op.location,
    };
    let mut text = stringify(left, host).ok_or_else(|| fail(Side::Left, left))?;
    text.push_str(&stringify(right, host).ok_or_else(|| fail(Side::Right, right))?);
    Ok(Value::Str(text))
}
