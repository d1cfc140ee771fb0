use sandex::{EvalError, Key, Value, ValueKind};

mod cases;

// ======== Literals ========

test_case! {
    name: list_literal,
    input: "[1, 'two', 3.0]",
    tree: { "[1, 'two', 3.0]" },
    value: { Value::list([Value::Int(1), Value::from("two"), Value::Float(3.0)]) },
}

test_case! {
    name: array_function_syntax,
    input: "array(1, 2,)",
    tree: { "[1, 2]" },
    value: { Value::list([Value::Int(1), Value::Int(2)]) },
}

test_case! {
    name: empty_array,
    input: "[]",
    value: { Value::list([]) },
}

test_case! {
    name: keyed_literal,
    input: "['a' => 1, 'b' => 2]",
    value: { Value::map([("a", Value::Int(1)), ("b", Value::Int(2))]) },
}

test_case! {
    name: implicit_key_counts_entries,
    input: "[10 => 'a', 'b', 'c']",
    value: {
        Value::map([
            (Key::Int(10), Value::from("a")),
            (Key::Int(1), Value::from("b")),
            (Key::Int(2), Value::from("c")),
        ])
    },
}

test_case! {
    name: implicit_key_collision_overwrites,
    input: "[1 => 'a', 'b', 'c']",
    value: { Value::map([(Key::Int(1), Value::from("c"))]) },
}

test_case! {
    name: numeric_string_keys_are_ints,
    input: "['7' => 'x', '07' => 'y', '-3' => 'z']",
    value: {
        Value::map([
            (Key::Int(7), Value::from("x")),
            (Key::from("07"), Value::from("y")),
            (Key::Int(-3), Value::from("z")),
        ])
    },
}

test_case! {
    name: duplicate_key_overwrites_in_place,
    input: "['a' => 1, 'b' => 2, 'a' => 3]",
    value: { Value::map([("a", Value::Int(3)), ("b", Value::Int(2))]) },
}

test_case! {
    name: computed_keys,
    input: "[$k . '_id' => $v * 2]",
    context: { "k" => "user", "v" => 21 },
    value: { Value::map([("user_id", Value::Int(42))]) },
}

test_case! {
    name: float_key_rejected,
    input: "[1.5 => 'x']",
    eval_error: { EvalError::InvalidArrayKey { kind: ValueKind::Float, .. } },
}

test_case! {
    name: bool_key_rejected,
    input: "[true => 'x']",
    eval_error: { EvalError::InvalidArrayKey { kind: ValueKind::Bool, .. } },
}

// ======== Access ========

test_case! {
    name: index_list,
    input: r#"["a","b","c"][2]"#,
    tree: { r#"["a", "b", "c"][2]"# },
    value: { Value::from("c") },
}

test_case! {
    name: index_past_end,
    input: r#"["a","b","c"][3]"#,
    eval_error: { EvalError::UndefinedOffset { .. } },
}

test_case! {
    name: index_nested,
    input: "$data['users'][1]['name']",
    context: {
        "data" => Value::map([(
            "users",
            Value::list([
                Value::map([("name", Value::from("Ada"))]),
                Value::map([("name", Value::from("Grace"))]),
            ]),
        )]),
    },
    value: { Value::from("Grace") },
}

test_case! {
    name: index_with_numeric_string,
    input: "[5, 6]['1']",
    value: { Value::Int(6) },
}

test_case! {
    name: index_missing_string_key,
    input: "['a' => 1]['b']",
    eval_error: { EvalError::UndefinedOffset { .. } },
}

test_case! {
    name: index_scalar_fails,
    input: "$n[0]",
    context: { "n" => 5 },
    eval_error: { EvalError::NotIndexable { kind: ValueKind::Int, .. } },
}

test_case! {
    name: index_object_reads_property,
    input: "$user['name']",
    value: { Value::from("Ada") },
}

test_case! {
    name: index_object_missing_property,
    input: "$user['email']",
    eval_error: { EvalError::UndefinedProperty { .. } },
}

test_case! {
    name: index_property_array,
    input: "$user->tags[1]",
    value: { Value::from("ops") },
}

// ======== Casts and functions ========

test_case! {
    name: array_cast_wraps_scalar,
    input: "(array) 'x'",
    value: { Value::list([Value::from("x")]) },
}

test_case! {
    name: array_cast_of_null_is_empty,
    input: "(array) null",
    value: { Value::list([]) },
}

test_case! {
    name: count_function,
    input: "count([1, 2, 3]) + count([])",
    value: { Value::Int(3) },
}

test_case! {
    name: in_array_loose_and_strict,
    input: "[in_array('1', [1, 2]), in_array('1', [1, 2], true)]",
    value: { Value::list([Value::Bool(true), Value::Bool(false)]) },
}

test_case! {
    name: array_keys_function,
    input: "array_keys(['a' => 1, 5 => 2])",
    value: { Value::list([Value::from("a"), Value::Int(5)]) },
}

test_case! {
    name: array_values_function,
    input: "array_values(['a' => 1, 5 => 2])",
    value: { Value::list([Value::Int(1), Value::Int(2)]) },
}

test_case! {
    name: count_requires_array,
    input: "count('abc')",
    eval_error: { EvalError::Host { .. } },
}
