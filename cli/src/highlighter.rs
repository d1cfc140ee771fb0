use nu_ansi_term::{Color, Style};
use reedline::StyledText;
use sandex::lexer::{TokenKind, tokenize};

/// Token classes that get their own color.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Class {
    Plain,
    Keyword,
    Constant,
    Number,
    String,
    Function,
    Variable,
}

impl Class {
    fn style(self) -> Style {
        let fg = match self {
            Class::Plain => Color::White,
            Class::Keyword => Color::Magenta,
            Class::Constant | Class::Number => Color::Cyan,
            Class::String => Color::Green,
            Class::Function => Color::Blue,
            Class::Variable => Color::Red,
        };
        Style::new().fg(fg)
    }
}

fn classify(kind: TokenKind) -> Class {
    match kind {
        TokenKind::Integer | TokenKind::Float => Class::Number,
        TokenKind::Bool | TokenKind::Null => Class::Constant,
        TokenKind::String | TokenKind::Quote | TokenKind::StringFragment => Class::String,
        TokenKind::Identifier => Class::Function,
        TokenKind::Variable => Class::Variable,
        TokenKind::And
        | TokenKind::Or
        | TokenKind::Xor
        | TokenKind::Array
        | TokenKind::InstanceOf
        | TokenKind::Cast => Class::Keyword,
        _ => Class::Plain,
    }
}

/// Colors REPL input using the expression tokenizer. Lines that don't
/// tokenize (an unterminated string, say) are left plain.
pub struct Highlighter;

impl reedline::Highlighter for Highlighter {
    fn highlight(&self, line: &str, _: usize) -> StyledText {
        let mut output = StyledText::new();

        let Ok(tokens) = tokenize(line) else {
            output.push((Class::Plain.style(), line.to_string()));
            return output;
        };

        let mut curr_end = 0;
        for token in tokens.iter().filter(|t| t.kind != TokenKind::Eof) {
            let span = token.location.span().0;
            if span.start < curr_end || span.end > line.len() {
                continue;
            }
            if span.start > curr_end {
                output.push((Class::Plain.style(), line[curr_end..span.start].to_string()));
            }
            output.push((classify(token.kind).style(), line[span.clone()].to_string()));
            curr_end = span.end;
        }
        if curr_end < line.len() {
            output.push((Class::Plain.style(), line[curr_end..].to_string()));
        }

        output
    }
}
