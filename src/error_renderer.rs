//! Error rendering using ariadne
//!
//! Renders [`Error`]s with a snippet of the offending expression, the
//! diagnostic code, and help text where there is some.

use crate::{Diagnostic, Error, Severity};
use ariadne::{ColorGenerator, Label, Report, ReportKind, Source};
use std::io::Write;

const SOURCE_ID: &str = "<expr>";

/// Render an error with formatting to stderr
///
/// # Example
/// ```no_run
/// use bumpalo::Bump;
/// use sandex::{Engine, EngineOptions, render_error};
///
/// let arena = Bump::new();
/// let engine = Engine::new(&arena, EngineOptions::default());
///
/// if let Err(e) = engine.compile("1 + + ") {
///     render_error(&e);
/// }
/// ```
pub fn render_error(error: &Error) {
    render_error_to_writer(error, &mut std::io::stderr(), true).ok();
}

/// Render an error to a specific writer
pub fn render_error_to(error: &Error, writer: &mut dyn Write) -> std::io::Result<()> {
    render_error_to_writer(error, writer, true)
}

/// Render an error to a String (useful for logs, web UIs, etc.)
pub fn render_error_to_string(error: &Error) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, &mut buf, true).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Render an error to a String without color codes (useful for tests)
///
/// This is the same as `render_error_to_string` but without ANSI color codes,
/// making the output easier to compare in tests.
pub fn render_error_to_string_no_color(error: &Error) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, &mut buf, false).ok();
    String::from_utf8_lossy(&buf).to_string()
}

fn render_error_to_writer(
    error: &Error,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    render_diagnostic(
        error.source_text(),
        &error.to_diagnostic(),
        writer,
        use_color,
    )
}

fn render_diagnostic(
    source: &str,
    diag: &Diagnostic,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    let mut colors = ColorGenerator::new();
    colors.next(); // Skip the first color.

    let kind = match diag.severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
        Severity::Info => ReportKind::Advice,
    };

    // Clamp so a span at end of input still points inside the snippet.
    let end = diag.span.0.end.min(source.len());
    let start = diag.span.0.start.min(end);
    let span = start..end;

    let mut report = Report::build(kind, (SOURCE_ID, span.clone()))
        .with_message(&diag.message)
        .with_config(ariadne::Config::default().with_color(use_color));

    if let Some(code) = &diag.code {
        report = report.with_code(code);
    }

    report = report.with_label(
        Label::new((SOURCE_ID, span))
            .with_message(&diag.message)
            .with_color(colors.next()),
    );

    if let Some(help) = &diag.help {
        report = report.with_help(help);
    }

    report
        .finish()
        .write((SOURCE_ID, Source::from(source)), &mut *writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Context, Engine, EngineOptions, NoHost};
    use bumpalo::Bump;

    #[test]
    fn test_render_parse_error() {
        let arena = Bump::new();
        let engine = Engine::new(&arena, EngineOptions::default());

        let result = engine.compile("1 + * 2");
        let Err(e) = result else {
            panic!("expected a parse error");
        };
        let output = render_error_to_string_no_color(&e);

        assert!(output.contains("Error"), "{}", output);
        assert!(output.contains("P001"), "{}", output);
        assert!(output.contains("1 + * 2"), "{}", output);
    }

    #[test]
    fn test_render_runtime_error_with_help() {
        let arena = Bump::new();
        let engine = Engine::new(&arena, EngineOptions::default());

        let expr = engine.compile("$total * 2").unwrap();
        let e = expr.run(&Context::new(), &NoHost).unwrap_err();
        let output = render_error_to_string_no_color(&e);

        assert!(output.contains("Variable is not defined in the context: $total"));
        assert!(output.contains("E001"));
        assert!(output.contains("Help"), "{}", output);
    }

    #[test]
    fn test_render_unterminated_string_at_end() {
        let arena = Bump::new();
        let engine = Engine::new(&arena, EngineOptions::default());

        let Err(e) = engine.compile("'abc") else {
            panic!("expected a parse error");
        };
        let output = render_error_to_string_no_color(&e);
        assert!(output.lines().count() > 1);
        assert!(!output.contains('\u{1b}'));
    }

    #[test]
    fn test_render_to_writer_uses_color() {
        let arena = Bump::new();
        let engine = Engine::new(&arena, EngineOptions::default());
        let Err(e) = engine.compile("1 +") else {
            panic!("expected a parse error");
        };

        let mut buf = Vec::new();
        render_error_to(&e, &mut buf).unwrap();
        assert!(String::from_utf8_lossy(&buf).contains('\u{1b}'));
    }
}
