mod highlighter;
mod output;
mod validator;

use bumpalo::Bump;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use reedline::{
    DefaultCompleter, DefaultPrompt, DefaultPromptSegment, DescriptionMode, EditCommand, Emacs,
    FileBackedHistory, IdeMenu, KeyCode, KeyModifiers, Keybindings, MenuBuilder, Reedline,
    ReedlineEvent, ReedlineMenu, Signal, default_emacs_keybindings,
};
use sandex::{
    Context, Engine, EngineOptions, FunctionTable, UnsafeFunctions, Value, render_error, stdlib,
};
use std::io::BufRead;
use std::io::BufReader;
use tracing::{debug, warn};

use crate::highlighter::Highlighter;
use crate::output::format_value;
use crate::validator::ExpressionValidator;

/// Sandex - sandboxed evaluation of PHP-style expressions
#[derive(Parser, Debug)]
#[command(name = "sandex")]
#[command(about = "Evaluate sandboxed PHP-style expressions", long_about = None)]
struct Args {
    /// Bind a variable to the value of an expression (repeatable)
    #[arg(long = "var", value_name = "NAME=EXPR", value_parser = parse_binding)]
    vars: Vec<(String, String)>,

    /// Add a function to the deny-list (repeatable)
    #[arg(long = "deny", value_name = "FUNCTION")]
    deny: Vec<String>,

    /// Start from an empty deny-list instead of the default one
    #[arg(long)]
    allow_unsafe: bool,

    /// Print the parsed tree before evaluating
    #[arg(long)]
    ast: bool,

    /// Log compilation and host calls to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Expression to evaluate (if not provided, reads from stdin)
    expression: Option<String>,
}

fn parse_binding(raw: &str) -> std::result::Result<(String, String), String> {
    let (name, expr) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=EXPR, got '{}'", raw))?;
    let name = name.trim().trim_start_matches('$');
    if name.is_empty() {
        return Err(format!("missing variable name in '{}'", raw));
    }
    Ok((name.to_string(), expr.to_string()))
}

/// Everything an input line is evaluated against.
struct Session {
    host: FunctionTable,
    context: Context,
    unsafe_functions: UnsafeFunctions,
    print_ast: bool,
}

impl Session {
    fn new(args: &Args) -> Self {
        let mut unsafe_functions = if args.allow_unsafe {
            UnsafeFunctions::empty()
        } else {
            UnsafeFunctions::default()
        };
        for name in &args.deny {
            unsafe_functions.insert(name);
        }

        Session {
            host: stdlib::function_table(),
            context: Context::new(),
            unsafe_functions,
            print_ast: args.ast,
        }
    }

    /// Compile and run `input`. Errors are rendered to stderr.
    fn evaluate(&self, input: &str) -> Option<Value> {
        // A fresh arena per input keeps a long REPL session from growing.
        let arena = Bump::new();
        let engine = Engine::new(&arena, EngineOptions::default())
            .with_unsafe_functions(self.unsafe_functions.clone());

        let expr = match engine.compile(input) {
            Ok(expr) => expr,
            Err(e) => {
                render_error(&e);
                return None;
            }
        };

        if self.print_ast {
            println!("=== Parsed AST ===");
            println!("{}", expr.expr());
            println!();
        }

        match expr.run(&self.context, &self.host) {
            Ok(value) => Some(value),
            Err(e) => {
                render_error(&e);
                None
            }
        }
    }

    /// Evaluate and print. Returns whether evaluation succeeded.
    fn interpret(&self, input: &str) -> bool {
        if input.trim().is_empty() {
            return true;
        }
        match self.evaluate(input) {
            Some(value) => {
                println!("{}", format_value(&value));
                true
            }
            None => false,
        }
    }

    /// Bind `--var` values in order, so later ones can use earlier ones.
    fn bind(&mut self, vars: &[(String, String)]) -> bool {
        for (name, expr) in vars {
            let Some(value) = self.evaluate(expr) else {
                eprintln!("Could not bind ${}", name);
                return false;
            };
            debug!(variable = %name, value = %format_value(&value), "bound variable");
            self.context.insert(name.clone(), value);
        }
        true
    }

    fn completions(&self) -> Vec<String> {
        let mut words: Vec<String> = self.host.names().into_iter().map(String::from).collect();
        words.extend(self.context.iter().map(|(name, _)| format!("${}", name)));
        words.sort();
        words
    }
}

const HISTORY_SIZE: usize = 1000;

fn add_menu_keybindings(keybindings: &mut Keybindings) {
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::UntilFound(vec![
            ReedlineEvent::Menu("completion_menu".to_string()),
            ReedlineEvent::MenuNext,
        ]),
    );
    keybindings.add_binding(
        KeyModifiers::ALT,
        KeyCode::Enter,
        ReedlineEvent::Edit(vec![EditCommand::InsertNewline]),
    );
}

fn setup_reedline(words: Vec<String>) -> (Reedline, DefaultPrompt) {
    let completer = Box::new({
        let mut completions = DefaultCompleter::with_inclusions(&['$', '_']);
        completions.insert(words);
        completions
    });

    let ide_menu = IdeMenu::default()
        .with_name("completion_menu")
        .with_min_completion_width(0)
        .with_max_completion_width(50)
        .with_max_completion_height(u16::MAX)
        .with_padding(0)
        .with_cursor_offset(0)
        .with_description_mode(DescriptionMode::PreferRight)
        .with_min_description_width(0)
        .with_max_description_width(50)
        .with_description_offset(1)
        .with_correct_cursor_pos(false);

    let completion_menu = Box::new(ide_menu);

    let mut keybindings = default_emacs_keybindings();
    add_menu_keybindings(&mut keybindings);

    let edit_mode = Box::new(Emacs::new(keybindings));

    let mut line_editor = Reedline::create()
        .with_highlighter(Box::new(Highlighter))
        .with_validator(Box::new(ExpressionValidator))
        .with_completer(completer)
        .with_menu(ReedlineMenu::EngineCompleter(completion_menu))
        .with_edit_mode(edit_mode);

    if let Some(dir) = dirs::data_dir().map(|dir| dir.join("sandex")) {
        let path = dir.join("history.txt");
        if let Err(e) = std::fs::create_dir_all(&dir) {
            warn!(error = %e, "cannot create history directory");
        }
        match FileBackedHistory::with_file(HISTORY_SIZE, path) {
            Ok(history) => line_editor = line_editor.with_history(Box::new(history)),
            Err(e) => warn!(error = %e, "history disabled"),
        }
    }

    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic("sandex".to_string()),
        DefaultPromptSegment::Empty,
    );

    (line_editor, prompt)
}

fn init_logging(verbose: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt};

    // SANDEX_LOG, then RUST_LOG, then the --verbose default.
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("SANDEX_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .or_else(|_| EnvFilter::try_new(default))
        .into_diagnostic()?;

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    let mut session = Session::new(&args);
    debug!(denied = session.unsafe_functions.len(), "deny-list ready");
    if !session.bind(&args.vars) {
        std::process::exit(2);
    }

    if let Some(expr) = &args.expression {
        if !session.interpret(expr) {
            std::process::exit(1);
        }
        return Ok(());
    }

    let is_interactive = atty::is(atty::Stream::Stdin);

    if is_interactive {
        let (mut line_editor, prompt) = setup_reedline(session.completions());

        println!("Sandex REPL - Type expressions to evaluate (Ctrl+D or Ctrl+C to exit)");

        loop {
            let sig = match line_editor.read_line(&prompt) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Reedline error: {e}");
                    return Ok(());
                }
            };

            match sig {
                Signal::Success(buffer) => {
                    session.interpret(&buffer);
                }
                Signal::CtrlD | Signal::CtrlC => {
                    println!("\nGoodbye!");
                    return Ok(());
                }
            }
        }
    } else {
        let stdin = std::io::stdin();
        let reader = BufReader::new(stdin.lock());

        let mut failed = false;
        for line in reader.lines() {
            let line = line.into_diagnostic()?;
            failed |= !session.interpret(&line);
        }
        if failed {
            std::process::exit(1);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::parse_from(std::iter::once("sandex").chain(argv.iter().copied()))
    }

    #[test]
    fn test_parse_binding() {
        assert_eq!(
            parse_binding("$name='Ada'"),
            Ok(("name".to_string(), "'Ada'".to_string()))
        );
        assert_eq!(
            parse_binding("n = 1 + 1"),
            Ok(("n".to_string(), " 1 + 1".to_string()))
        );
        assert!(parse_binding("novalue").is_err());
        assert!(parse_binding("=1").is_err());
    }

    #[test]
    fn test_bindings_see_earlier_bindings() {
        let args = args(&["--var", "a=20", "--var", "b=$a * 2 + 2", "$b"]);
        let mut session = Session::new(&args);
        assert!(session.bind(&args.vars));
        assert_eq!(session.evaluate("$b"), Some(Value::Int(42)));
    }

    #[test]
    fn test_deny_flags() {
        let session = Session::new(&args(&["--deny", "strlen"]));
        assert!(session.unsafe_functions.is_denied("strlen"));
        assert!(session.unsafe_functions.is_denied("exec"));
        assert_eq!(session.evaluate("strlen('abc')"), None);

        let session = Session::new(&args(&["--allow-unsafe"]));
        assert!(session.unsafe_functions.is_empty());
        assert_eq!(session.evaluate("strlen('abc')"), Some(Value::Int(3)));
    }

    #[test]
    fn test_completions_include_functions_and_variables() {
        let args = args(&["--var", "price=3"]);
        let mut session = Session::new(&args);
        assert!(session.bind(&args.vars));
        let words = session.completions();
        assert!(words.contains(&"strtoupper".to_string()));
        assert!(words.contains(&"$price".to_string()));
    }
}
