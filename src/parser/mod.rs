//! Syntax analysis: the AST, the Pratt parser and the tree printer.

pub mod ast;
#[allow(clippy::module_inception)]
pub mod parser;
pub mod printer;

pub use ast::{BlockStatement, Expression, Identifier, Program, Statement};
pub use parser::Parser;
