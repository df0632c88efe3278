//! Monkey language interpreter
//!
//! A lexer, Pratt parser and tree-walking evaluator for the Monkey
//! programming language: integers, booleans, strings, arrays, hashes,
//! first-class functions with closures, conditionals, `while` loops with
//! `break`/`continue`, and a handful of built-in functions.
//!
//! The pipeline is source text -> [`lexer::Lexer`] -> [`parser::Parser`]
//! -> [`runtime::Evaluator`]. The three entry points below are what the
//! CLI and REPL consume.

pub mod error;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod runtime;

use error::RuntimeError;
use lexer::{Lexer, Token, TokenKind};
use parser::{Parser, Program};
use runtime::{Evaluator, Value};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Drain the lexer to EOF inclusive. Used for token-dump diagnostics.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}

/// Parse source text, returning the program together with any parse
/// errors in the order they were recorded.
pub fn parse(source: &str) -> (Program, Vec<String>) {
    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse_program();
    let errors = parser.take_errors();
    (program, errors)
}

/// Outcome of running a piece of source through the full pipeline.
#[derive(Debug)]
pub enum Evaluation {
    Value(Value),
    ParseErrors(Vec<String>),
    RuntimeError(RuntimeError),
}

/// Parse and, if error-free, evaluate against the given evaluator.
/// Callers reuse one evaluator across calls for persistent bindings.
pub fn evaluate(source: &str, evaluator: &mut Evaluator) -> Evaluation {
    let (program, errors) = parse(source);
    if !errors.is_empty() {
        return Evaluation::ParseErrors(errors);
    }
    match evaluator.eval_program(&program) {
        Ok(value) => Evaluation::Value(value),
        Err(error) => Evaluation::RuntimeError(error),
    }
}
