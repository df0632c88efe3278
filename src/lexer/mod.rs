//! Lexical analysis: tokens and the scanner.

pub mod scanner;
pub mod token;

pub use scanner::Lexer;
pub use token::{Token, TokenKind};
