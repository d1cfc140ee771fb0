//! Math functions.

use core::cmp::Ordering;

use super::Args;
use crate::host::{FunctionTable, HostError, NoHost};
use crate::values::{Number, Value, compare};

pub fn register_math_functions(table: &mut FunctionTable) {
    table
        .register("abs", abs)
        .register("max", max)
        .register("min", min)
        .register("round", round)
        .register("floor", floor)
        .register("ceil", ceil)
        .register("sqrt", sqrt)
        .register("intdiv", intdiv);
}

fn abs(values: &[Value]) -> Result<Value, HostError> {
    let args = Args::new("abs", values, 1, 1)?;
    Ok(match args.number(0)? {
        Number::Int(n) => match n.checked_abs() {
            Some(n) => Value::Int(n),
            None => Value::Float(-(n as f64)),
        },
        Number::Float(x) => Value::Float(x.abs()),
    })
}

/// `max`/`min` over either a single array or two or more arguments, using
/// loose comparison. The first of equal candidates wins.
fn extreme(name: &'static str, values: &[Value], wanted: Ordering) -> Result<Value, HostError> {
    let args = Args::new(name, values, 1, usize::MAX)?;
    let candidates: Vec<&Value> = if args.len() == 1 {
        args.array(0)?.values().collect()
    } else {
        args.all().iter().collect()
    };
    let mut best = match candidates.first() {
        Some(first) => *first,
        None => return Err(args.failed("argument #1 ($value) must contain at least one element")),
    };
    for &candidate in &candidates[1..] {
        if compare(candidate, best, &NoHost) == Some(wanted) {
            best = candidate;
        }
    }
    Ok(best.clone())
}

fn max(values: &[Value]) -> Result<Value, HostError> {
    extreme("max", values, Ordering::Greater)
}

fn min(values: &[Value]) -> Result<Value, HostError> {
    extreme("min", values, Ordering::Less)
}

fn round(values: &[Value]) -> Result<Value, HostError> {
    let args = Args::new("round", values, 1, 2)?;
    let x = args.number(0)?.to_f64();
    let precision = match args.optional(1) {
        Some(_) => args.int(1)?,
        None => 0,
    };
    let factor = 10f64.powi(precision.unsigned_abs().min(308) as i32);
    // Half away from zero, like f64::round.
    let rounded = if precision >= 0 {
        (x * factor).round() / factor
    } else {
        (x / factor).round() * factor
    };
    Ok(Value::Float(if rounded.is_finite() { rounded } else { x }))
}

fn floor(values: &[Value]) -> Result<Value, HostError> {
    let args = Args::new("floor", values, 1, 1)?;
    Ok(Value::Float(args.number(0)?.to_f64().floor()))
}

fn ceil(values: &[Value]) -> Result<Value, HostError> {
    let args = Args::new("ceil", values, 1, 1)?;
    Ok(Value::Float(args.number(0)?.to_f64().ceil()))
}

fn sqrt(values: &[Value]) -> Result<Value, HostError> {
    let args = Args::new("sqrt", values, 1, 1)?;
    Ok(Value::Float(args.number(0)?.to_f64().sqrt()))
}

fn intdiv(values: &[Value]) -> Result<Value, HostError> {
    let args = Args::new("intdiv", values, 2, 2)?;
    let dividend = args.int(0)?;
    let divisor = args.int(1)?;
    if divisor == 0 {
        return Err(args.failed("division by zero"));
    }
    dividend
        .checked_div(divisor)
        .map(Value::Int)
        .ok_or_else(|| args.failed("division of the minimum integer by -1 overflows"))
}
