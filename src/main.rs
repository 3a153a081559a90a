// sorrel - A Clojure-like Lisp interpreter
// Copyright (c) 2025 Tom Waddington. MIT licensed.

use std::env;
use std::path::Path;
use std::process;
use std::thread;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use sorrel_embed::{EvalResult, Interpreter, InterpreterConfig};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Deep recursion in the evaluator needs more than the default main-thread
/// stack before `max_eval_depth` is reached.
const STACK_SIZE: usize = 256 * 1024 * 1024;

const USAGE: &str = "usage: sorrel [--version] [--max-depth N] [-e EXPR] [FILE.srl ...]";

enum Input {
    Expr(String),
    File(String),
}

struct Options {
    config: InterpreterConfig,
    inputs: Vec<Input>,
}

fn main() {
    init_tracing();

    let options = match parse_args(env::args().skip(1)) {
        Ok(Some(options)) => options,
        Ok(None) => return,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("{}", USAGE);
            process::exit(2);
        }
    };

    let worker = thread::Builder::new()
        .name("sorrel".to_string())
        .stack_size(STACK_SIZE)
        .spawn(move || run(options));

    let code = match worker.map(|handle| handle.join()) {
        Ok(Ok(code)) => code,
        Ok(Err(_)) => 101,
        Err(err) => {
            eprintln!("Failed to start interpreter thread: {}", err);
            1
        }
    };
    process::exit(code);
}

/// Install a tracing subscriber when `SORREL_LOG` is set.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    if env::var("SORREL_LOG").is_ok() {
        let filter = EnvFilter::from_env("SORREL_LOG");
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_level(true))
            .with(filter)
            .init();
    }
}

/// Returns `Ok(None)` when the invocation is fully handled (`--version`).
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Option<Options>, String> {
    let mut config = InterpreterConfig::default();
    let mut inputs = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-v" => {
                println!("Sorrel v{}", VERSION);
                return Ok(None);
            }
            "--max-depth" => {
                let depth = args
                    .next()
                    .ok_or("--max-depth requires a value")?
                    .parse::<usize>()
                    .map_err(|e| format!("--max-depth: {}", e))?;
                config = config.with_max_eval_depth(depth);
            }
            "-e" => {
                let expr = args.next().ok_or("-e requires an expression")?;
                inputs.push(Input::Expr(expr));
            }
            flag if flag.starts_with('-') => {
                return Err(format!("unknown option '{}'", flag));
            }
            _ => inputs.push(Input::File(arg)),
        }
    }

    Ok(Some(Options { config, inputs }))
}

fn run(options: Options) -> i32 {
    let Options { config, inputs } = options;
    let interp = match Interpreter::with_config(config) {
        Ok(interp) => interp,
        Err(e) => {
            eprintln!("Failed to start interpreter: {}", e);
            return 1;
        }
    };

    if inputs.is_empty() {
        run_repl(&interp);
        return 0;
    }

    for input in &inputs {
        let outcome = match input {
            Input::Expr(expr) => {
                let result = interp.evaluate(expr);
                if interp.config().echo_results && matches!(result, EvalResult::Success(_)) {
                    println!("{}", Interpreter::describe(&result));
                }
                result
            }
            Input::File(path) => match check_extension(path) {
                Ok(()) => interp.evaluate_file(path),
                Err(message) => {
                    eprintln!("Error: {}", message);
                    return 1;
                }
            },
        };
        if !matches!(outcome, EvalResult::Success(_)) {
            eprintln!("{}", Interpreter::describe(&outcome));
            return 1;
        }
    }
    0
}

fn check_extension(file_path: &str) -> Result<(), String> {
    match Path::new(file_path).extension().and_then(|e| e.to_str()) {
        Some("srl") => Ok(()),
        Some(ext) => Err(format!(
            "unsupported file extension '.{}' for '{}'",
            ext, file_path
        )),
        None => Err(format!(
            "file '{}' has no extension (expected .srl)",
            file_path
        )),
    }
}

/// Run the interactive REPL
fn run_repl(interp: &Interpreter) {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("Failed to create line editor: {}", e);
            return;
        }
    };

    println!("Sorrel v{}", VERSION);

    loop {
        let prompt = format!("{}=> ", interp.current_namespace().name());
        match editor.readline(&prompt) {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(input);

                let result = interp.evaluate(input);
                match result {
                    EvalResult::Success(_) if !interp.config().echo_results => {}
                    EvalResult::Success(_) => println!("{}", Interpreter::describe(&result)),
                    _ => eprintln!("{}", Interpreter::describe(&result)),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => {
                println!();
                break;
            }
            Err(e) => {
                eprintln!("Read error: {}", e);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> impl Iterator<Item = String> {
        items
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn test_parse_args() {
        let options = parse_args(args(&["--max-depth", "50", "-e", "(+ 1 2)", "a.srl"]))
            .unwrap()
            .unwrap();
        assert_eq!(options.config.max_eval_depth, 50);
        assert!(matches!(&options.inputs[0], Input::Expr(e) if e == "(+ 1 2)"));
        assert!(matches!(&options.inputs[1], Input::File(f) if f == "a.srl"));
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(args(&["--max-depth"])).is_err());
        assert!(parse_args(args(&["--max-depth", "x"])).is_err());
        assert!(parse_args(args(&["-e"])).is_err());
        assert!(parse_args(args(&["--bogus"])).is_err());
    }

    #[test]
    fn test_check_extension() {
        assert!(check_extension("x.srl").is_ok());
        assert!(check_extension("x.clj").is_err());
        assert!(check_extension("x").is_err());
    }
}
