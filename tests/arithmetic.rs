use sandex::evaluator::Side;
use sandex::{EvalError, Value, ValueKind};

mod cases;

// ======== Integer literals ========

test_case! {
    name: decimal_int,
    input: "42",
    tree: { "42" },
    value: { Value::Int(42) },
}

test_case! {
    name: hex_int,
    input: "0x2A",
    value: { Value::Int(42) },
}

test_case! {
    name: binary_int,
    input: "0b101010",
    value: { Value::Int(42) },
}

test_case! {
    name: octal_int,
    input: "0o52",
    value: { Value::Int(42) },
}

test_case! {
    name: legacy_octal_int,
    input: "052",
    value: { Value::Int(42) },
}

test_case! {
    name: int_with_separators,
    input: "1_000_000",
    value: { Value::Int(1_000_000) },
}

test_case! {
    name: int_overflow_becomes_float,
    input: "9223372036854775808",
    value: { Value::Float(9.223372036854776e18) },
}

// ======== Float literals ========

test_case! {
    name: float_with_exponent,
    input: "1.5e3",
    value: { Value::Float(1500.0) },
}

test_case! {
    name: float_leading_dot,
    input: ".5 + 1",
    value: { Value::Float(1.5) },
}

// ======== Precedence and associativity ========

test_case! {
    name: mixed_precedence,
    input: "1 + 2 * 3 - 4",
    tree: { "((1 + (2 * 3)) - 4)" },
    value: { Value::Int(3) },
}

test_case! {
    name: grouping_overrides_precedence,
    input: "(1 + 2) * 3",
    value: { Value::Int(9) },
}

test_case! {
    name: power_is_right_associative,
    input: "2 ** 3 ** 2",
    tree: { "(2 ** (3 ** 2))" },
    value: { Value::Int(512) },
}

test_case! {
    name: power_with_negative_exponent_chain,
    input: "2 ** 3 ** -4",
    tree: { "(2 ** (3 ** (-4)))" },
    value: { Value::Float(2f64.powf(3f64.powf(-4.0))) },
}

test_case! {
    name: unary_minus_binds_before_power,
    input: "-2 ** 2",
    tree: { "((-2) ** 2)" },
    value: { Value::Int(4) },
}

test_case! {
    name: subtraction_is_left_associative,
    input: "10 - 4 - 3",
    value: { Value::Int(3) },
}

// ======== Division and modulo ========

test_case! {
    name: exact_division_stays_int,
    input: "10 / 2",
    value: { Value::Int(5) },
}

test_case! {
    name: inexact_division_is_float,
    input: "7 / 2",
    value: { Value::Float(3.5) },
}

test_case! {
    name: modulo_keeps_dividend_sign,
    input: "-7 % 3",
    value: { Value::Int(-1) },
}

test_case! {
    name: modulo_truncates_floats,
    input: "7.9 % 2.1",
    value: { Value::Int(1) },
}

test_case! {
    name: division_by_zero,
    input: "1 / 0",
    eval_error: { EvalError::DivisionByZero { .. } },
}

test_case! {
    name: modulo_by_zero,
    input: "1 % 0.5",
    eval_error: { EvalError::DivisionByZero { .. } },
}

// ======== Overflow ========

test_case! {
    name: addition_overflow_becomes_float,
    input: "9223372036854775807 + 1",
    value: { Value::Float(9.223372036854776e18) },
}

test_case! {
    name: power_overflow_becomes_float,
    input: "2 ** 64",
    value: { Value::Float(18446744073709551616.0) },
}

// ======== Coercion ========

test_case! {
    name: numeric_string_operands,
    input: "'3' + 4",
    value: { Value::Int(7) },
}

test_case! {
    name: float_string_operand,
    input: "' 1.5 ' * 2",
    value: { Value::Float(3.0) },
}

test_case! {
    name: null_and_bool_operands,
    input: "null + true + 1",
    value: { Value::Int(2) },
}

test_case! {
    name: non_numeric_left_operand,
    input: "'abc' * 2",
    eval_error: { EvalError::ArithmeticOperand { side: Side::Left, kind: ValueKind::String, .. } },
}

test_case! {
    name: array_right_operand,
    input: "1 - [1]",
    eval_error: { EvalError::ArithmeticOperand { side: Side::Right, kind: ValueKind::Array, .. } },
}

test_case! {
    name: unary_minus_numeric_string,
    input: "-'5'",
    value: { Value::Int(-5) },
}

test_case! {
    name: unary_plus_rejects_non_numeric,
    input: "+'five'",
    eval_error: { EvalError::UnaryOperand { kind: ValueKind::String, .. } },
}

test_case! {
    name: variables_in_arithmetic,
    input: "$a * $b",
    context: { "a" => 6, "b" => 7 },
    value: { Value::Int(42) },
}

// ======== Casts ========

test_case! {
    name: int_cast_truncates,
    input: "(int) 3.9",
    tree: { "((int) 3.9)" },
    value: { Value::Int(3) },
}

test_case! {
    name: int_cast_saturates,
    input: "(integer) 1e30",
    value: { Value::Int(i64::MAX) },
}

test_case! {
    name: float_cast_uses_numeric_prefix,
    input: "(float) '2.5kg'",
    value: { Value::Float(2.5) },
}

test_case! {
    name: cast_binds_tighter_than_addition,
    input: "(int) '7' + 1",
    tree: { "(((int) '7') + 1)" },
    value: { Value::Int(8) },
}

test_case! {
    name: cast_of_array_fails,
    input: "(float) []",
    eval_error: { EvalError::InvalidCast { target: "float", kind: ValueKind::Array, .. } },
}

// ======== Math functions ========

test_case! {
    name: abs_function,
    input: "abs(-5) + abs(-1.5)",
    value: { Value::Float(6.5) },
}

test_case! {
    name: max_of_arguments,
    input: "max(1, 5, 3)",
    value: { Value::Int(5) },
}

test_case! {
    name: min_of_array,
    input: "min([4, 2, 8])",
    value: { Value::Int(2) },
}

test_case! {
    name: round_half_away_from_zero,
    input: "round(2.5) + round(-2.5)",
    value: { Value::Float(0.0) },
}

test_case! {
    name: round_to_precision,
    input: "round(1234.5678, -2)",
    value: { Value::Float(1200.0) },
}

test_case! {
    name: floor_and_ceil,
    input: "[floor(1.7), ceil(1.2)]",
    value: { Value::list([Value::Float(1.0), Value::Float(2.0)]) },
}

test_case! {
    name: sqrt_function,
    input: "sqrt(16)",
    value: { Value::Float(4.0) },
}

test_case! {
    name: intdiv_function,
    input: "intdiv(7, 2)",
    value: { Value::Int(3) },
}

test_case! {
    name: intdiv_by_zero,
    input: "intdiv(1, 0)",
    eval_error: { EvalError::Host { .. } },
}
