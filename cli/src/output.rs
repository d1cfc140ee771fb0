//! Literal rendering of results, so `'1'` and `1` print differently.

use sandex::values::{Key, Value, format_float};

pub fn format_value(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Int(n) => out.push_str(&n.to_string()),
        Value::Float(x) => {
            let text = format_float(*x);
            let integral = text.bytes().all(|b| b.is_ascii_digit() || b == b'-');
            out.push_str(&text);
            if integral {
                out.push_str(".0");
            }
        }
        Value::Str(s) => write_quoted(out, s),
        Value::Array(array) => {
            out.push('[');
            for (i, (key, item)) in array.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                match key {
                    Key::Int(n) => out.push_str(&n.to_string()),
                    Key::Str(s) => write_quoted(out, s),
                }
                out.push_str(" => ");
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Object(obj) => out.push_str(&format!("object({})", obj)),
    }
}

fn write_quoted(out: &mut String, s: &str) {
    out.push('\'');
    for c in s.chars() {
        if matches!(c, '\'' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
}
