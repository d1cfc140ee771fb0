use reedline::{ValidationResult, Validator};
use sandex::ParseErrorKind;
use sandex::lexer::{TokenKind, tokenize};

/// Keeps the REPL reading while brackets or a string are still open.
pub struct ExpressionValidator;

impl Validator for ExpressionValidator {
    fn validate(&self, line: &str) -> ValidationResult {
        match open_depth(line) {
            Some(0) | None => ValidationResult::Complete,
            Some(_) => ValidationResult::Incomplete,
        }
    }
}

/// Number of unclosed `(`, `[` and `{`, counting an unterminated string as
/// one more. `None` when the line has some other lexical error; the parser
/// reports those.
pub fn open_depth(buffer: &str) -> Option<usize> {
    let tokens = match tokenize(buffer) {
        Ok(tokens) => tokens,
        Err(e) if matches!(e.kind, ParseErrorKind::UnterminatedString { .. }) => return Some(1),
        Err(_) => return None,
    };

    let mut depth: isize = 0;
    for token in &tokens {
        match token.kind {
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => depth -= 1,
            _ => {}
        }
    }
    Some(depth.max(0) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balanced_input_is_complete() {
        assert_eq!(open_depth("strlen('abc') + [1, 2][0]"), Some(0));
        assert_eq!(open_depth(""), Some(0));
    }

    #[test]
    fn test_open_brackets_are_counted() {
        assert_eq!(open_depth("max(1, [2,"), Some(2));
        assert_eq!(open_depth("$user->{'na'"), Some(1));
    }

    #[test]
    fn test_extra_closers_do_not_go_negative() {
        assert_eq!(open_depth("1)]"), Some(0));
    }

    #[test]
    fn test_unterminated_string_is_incomplete() {
        assert_eq!(open_depth("'abc"), Some(1));
        assert!(matches!(
            ExpressionValidator.validate("\"Hello"),
            ValidationResult::Incomplete
        ));
    }

    #[test]
    fn test_other_lexical_errors_are_left_to_the_parser() {
        assert_eq!(open_depth("1 @ 2"), None);
        assert!(matches!(
            ExpressionValidator.validate("1 @ 2"),
            ValidationResult::Complete
        ));
    }
}
