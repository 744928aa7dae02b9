// ABOUTME: Command-line entry point: batch evaluation of files or the interactive REPL

use clap::Parser;
use log::debug;
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor};
use simple_logger::SimpleLogger;
use std::path::PathBuf;
use std::process::ExitCode;
use vesper::eval::Interp;
use vesper::heap::ObjKind;
use vesper::{lexer, parser};

/// The Vesper interpreter
#[derive(Parser, Debug)]
#[command(name = "vesper")]
#[command(version)]
#[command(about = "A tree-walking interpreter for the Vesper Lisp dialect")]
struct CliArgs {
    /// Source files to evaluate in order (starts the REPL when none are given)
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    let _ = SimpleLogger::new().with_level(level).init();

    let mut interp = Interp::new();
    if args.files.is_empty() {
        repl(&mut interp)
    } else {
        batch(&mut interp, &args.files)
    }
}

/// Evaluate each file in order. The first unhandled error terminates the
/// process with a failing status.
fn batch(interp: &mut Interp, files: &[PathBuf]) -> ExitCode {
    for path in files {
        debug!("loading {}", path.display());
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(_) => {
                eprintln!("\"{}\" not available.", path.display());
                return ExitCode::FAILURE;
            }
        };
        match interp.eval_source(&source) {
            Ok(last) if interp.heap.kind(last) == ObjKind::Error => {
                eprintln!("{}", interp.render_error(last));
                return ExitCode::FAILURE;
            }
            Ok(_) => {}
            Err(err) => {
                eprintln!("{}", err);
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}

fn repl(interp: &mut Interp) -> ExitCode {
    let config = Config::builder().auto_add_history(true).build();
    let mut editor = match DefaultEditor::with_config(config) {
        Ok(editor) => editor,
        Err(err) => {
            eprintln!("Failed to initialize the REPL: {}", err);
            return ExitCode::FAILURE;
        }
    };

    loop {
        let mut buffer = match editor.readline("V >> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => return ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("Error: {}", err);
                return ExitCode::FAILURE;
            }
        };

        if buffer == "exit" || buffer == "quit" {
            std::process::exit(1);
        }
        if buffer.trim().is_empty() {
            continue;
        }

        // An input is complete once its parentheses balance; until then,
        // keep reading continuation lines.
        while !parens_balanced(&buffer) {
            match editor.readline("     ") {
                Ok(more) => {
                    buffer.push('\n');
                    buffer.push_str(&more);
                }
                Err(_) => break,
            }
        }

        run_input(interp, &buffer);
    }
}

/// Lex, parse, and evaluate one REPL input, printing each top-level result
/// on its own line. Errors are printed and the loop continues.
fn run_input(interp: &mut Interp, input: &str) {
    let tokens = match lexer::lex(input) {
        Ok(tokens) => tokens,
        Err(err) => {
            eprintln!("{}", err);
            return;
        }
    };
    if tokens.is_empty() {
        return;
    }

    let program = parser::parse_tokens(tokens);
    let diagnostics = parser::diagnostics(&program);
    if !diagnostics.is_empty() {
        for diagnostic in diagnostics {
            eprintln!("{}", diagnostic);
        }
        return;
    }

    for expr in &program {
        let value = interp.eval(expr);
        match interp.heap.kind(value) {
            ObjKind::Error => {
                eprintln!("{}", interp.render_error(value));
                return;
            }
            // A go that reached the top frame has nowhere to land.
            ObjKind::Flow => {}
            _ => println!("{}", interp.display_value(value)),
        }
    }
}

/// Whether every `(` has been closed. Only parentheses count, and only
/// outside string literals; brackets and braces never hold an input open.
fn parens_balanced(input: &str) -> bool {
    let mut depth: i64 = 0;
    let mut in_string = false;
    let mut prev = ' ';
    for c in input.chars() {
        match c {
            '"' if prev != '\\' => in_string = !in_string,
            '(' if !in_string => depth += 1,
            ')' if !in_string => depth -= 1,
            _ => {}
        }
        prev = c;
    }
    depth <= 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parens_balanced() {
        assert!(parens_balanced("(+ 1 2)"));
        assert!(parens_balanced("42"));
        assert!(!parens_balanced("(+ 1"));
        assert!(!parens_balanced("(set f (lambda (x)"));
    }

    #[test]
    fn test_parens_inside_strings_do_not_count() {
        assert!(parens_balanced("(print \"(\")"));
        assert!(!parens_balanced("(print \")\""));
    }

    #[test]
    fn test_brackets_do_not_hold_input_open() {
        assert!(parens_balanced("[a b"));
        assert!(parens_balanced("{a b"));
    }

    #[test]
    fn test_over_closed_input_counts_as_complete() {
        // The parser reports the stray closer; the REPL must not hang.
        assert!(parens_balanced(")("));
    }
}
