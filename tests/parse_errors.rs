use sandex::ParseErrorKind;

mod cases;

test_case! {
    name: trailing_tokens,
    input: "1 2",
    parse_error: { ParseErrorKind::UnexpectedToken { .. } },
}

test_case! {
    name: dangling_operator,
    input: "1 +",
    parse_error: { ParseErrorKind::UnexpectedEnd { .. } },
}

test_case! {
    name: empty_input,
    input: "",
    parse_error: { ParseErrorKind::UnexpectedEnd { .. } },
}

test_case! {
    name: unclosed_call,
    input: "strlen('abc'",
    parse_error: { ParseErrorKind::UnexpectedEnd { .. } },
}

test_case! {
    name: ternary_without_else,
    input: "$a ? 1",
    parse_error: { ParseErrorKind::UnexpectedEnd { .. } },
}

test_case! {
    name: bare_constant_name,
    input: "PHP_EOL",
    parse_error: { ParseErrorKind::UnexpectedEnd { .. } },
}

test_case! {
    name: unterminated_single_quote,
    input: "'abc",
    parse_error: { ParseErrorKind::UnterminatedString { .. } },
}

test_case! {
    name: unterminated_double_quote,
    input: r#""abc {$x}"#,
    parse_error: { ParseErrorKind::UnterminatedString { .. } },
}

test_case! {
    name: digits_run_into_letters,
    input: "12abc",
    parse_error: { ParseErrorKind::InvalidNumber { .. } },
}

test_case! {
    name: bad_hex_digits,
    input: "0xZZ",
    parse_error: { ParseErrorKind::InvalidNumber { .. } },
}

test_case! {
    name: bad_legacy_octal,
    input: "089",
    parse_error: { ParseErrorKind::InvalidNumber { .. } },
}

test_case! {
    name: misplaced_underscore,
    input: "1__000",
    parse_error: { ParseErrorKind::InvalidNumber { .. } },
}

test_case! {
    name: unknown_character,
    input: "1 @ 2",
    parse_error: { ParseErrorKind::UnexpectedCharacter { .. } },
}

test_case! {
    name: static_variable_member,
    input: "Foo::$bar",
    parse_error: { ParseErrorKind::UnexpectedToken { .. } },
}

test_case! {
    name: missing_array_separator,
    input: "[1 2]",
    parse_error: { ParseErrorKind::UnexpectedToken { .. } },
}

test_case! {
    name: deep_nesting_rejected,
    input: &format!("{}1{}", "(".repeat(500), ")".repeat(500)),
    parse_error: { ParseErrorKind::MaxDepthExceeded { max_depth: 128, .. } },
}
