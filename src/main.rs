//! Command-line entry point for the Monkey interpreter.

use std::env;
use std::fs;
use std::process;

use monkey_lang::error::Diagnostic;
use monkey_lang::parser::printer;
use monkey_lang::repl::Repl;
use monkey_lang::runtime::Evaluator;
use monkey_lang::{evaluate, parse, tokenize, Evaluation};

const USAGE: &str = "Usage: monkey [run <path> | --tokens <path> | --ast <path>]";

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    let code = match args.as_slice() {
        [] => run_repl(),
        [flag] if flag == "--help" || flag == "-h" => {
            println!("{}", USAGE);
            0
        }
        [mode, path] => run_command(mode, path),
        _ => {
            eprintln!("{}", USAGE);
            2
        }
    };

    process::exit(code);
}

fn run_repl() -> i32 {
    println!(
        "Monkey {} -- type :help for commands, :quit to exit.",
        monkey_lang::VERSION
    );
    let mut repl = Repl::new();
    match repl.run() {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("io error: {}", err);
            1
        }
    }
}

fn run_command(mode: &str, path: &str) -> i32 {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Could not read {}: {}", path, err);
            return 1;
        }
    };

    match mode {
        "run" => run_file(path, &source),
        "--tokens" => {
            for token in tokenize(&source) {
                println!("{}", token);
            }
            0
        }
        "--ast" => print_ast(path, &source),
        _ => {
            eprintln!("{}", USAGE);
            2
        }
    }
}

fn run_file(path: &str, source: &str) -> i32 {
    let mut evaluator = Evaluator::new();
    match evaluate(source, &mut evaluator) {
        Evaluation::Value(value) => {
            println!("{}", value);
            0
        }
        Evaluation::ParseErrors(errors) => {
            print_parse_errors(path, &errors);
            1
        }
        Evaluation::RuntimeError(error) => {
            eprintln!("Runtime error in {}:", path);
            eprint!("{}", Diagnostic::with_source(error, source).format());
            1
        }
    }
}

fn print_ast(path: &str, source: &str) -> i32 {
    let (program, errors) = parse(source);
    if !errors.is_empty() {
        print_parse_errors(path, &errors);
        return 1;
    }
    print!("{}", printer::print_program(&program));
    0
}

fn print_parse_errors(path: &str, errors: &[String]) {
    eprintln!("Parse errors in {}:", path);
    for error in errors {
        eprintln!("- {}", error);
    }
}
