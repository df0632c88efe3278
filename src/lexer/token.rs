//! Token definitions for the Monkey language
//!
//! This module defines the token kinds produced by the lexer.

use std::fmt;

use crate::error::SourcePosition;

/// A token in the Monkey language.
///
/// Equality compares kind and literal only; the position is excluded so
/// tokens can be compared in tests independent of where they appeared.
#[derive(Debug, Clone, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub position: SourcePosition,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, position: SourcePosition) -> Self {
        Self {
            kind,
            literal: literal.into(),
            position,
        }
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.literal == other.literal
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}('{}') @ {}", self.kind, self.literal, self.position)
    }
}

/// Token kinds in the Monkey language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Illegal,
    Eof,

    // Identifiers + literals
    Ident,
    Int,
    String,

    // Operators
    Assign,   // =
    Plus,     // +
    Minus,    // -
    Bang,     // !
    Asterisk, // *
    Slash,    // /

    Lt,    // <
    Gt,    // >
    LtEq,  // <=
    GtEq,  // >=
    Eq,    // ==
    NotEq, // !=
    And,   // &&
    Or,    // ||

    // Delimiters
    Comma,     // ,
    Semicolon, // ;
    Colon,     // :

    LParen,   // (
    RParen,   // )
    LBrace,   // {
    RBrace,   // }
    LBracket, // [
    RBracket, // ]

    // Keywords
    Function,
    Let,
    True,
    False,
    If,
    Else,
    Return,
    While,
    Break,
    Continue,
}

impl TokenKind {
    /// Keyword lookup for a scanned identifier.
    pub fn lookup_keyword(ident: &str) -> Option<TokenKind> {
        match ident {
            "fn" => Some(Self::Function),
            "let" => Some(Self::Let),
            "true" => Some(Self::True),
            "false" => Some(Self::False),
            "if" => Some(Self::If),
            "else" => Some(Self::Else),
            "return" => Some(Self::Return),
            "while" => Some(Self::While),
            "break" => Some(Self::Break),
            "continue" => Some(Self::Continue),
            _ => None,
        }
    }

    /// Screaming-case name, used in parse-error messages and token dumps.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Illegal => "ILLEGAL",
            Self::Eof => "EOF",
            Self::Ident => "IDENT",
            Self::Int => "INT",
            Self::String => "STRING",
            Self::Assign => "ASSIGN",
            Self::Plus => "PLUS",
            Self::Minus => "MINUS",
            Self::Bang => "BANG",
            Self::Asterisk => "ASTERISK",
            Self::Slash => "SLASH",
            Self::Lt => "LT",
            Self::Gt => "GT",
            Self::LtEq => "LTE",
            Self::GtEq => "GTE",
            Self::Eq => "EQ",
            Self::NotEq => "NOT_EQ",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Comma => "COMMA",
            Self::Semicolon => "SEMICOLON",
            Self::Colon => "COLON",
            Self::LParen => "LPAREN",
            Self::RParen => "RPAREN",
            Self::LBrace => "LBRACE",
            Self::RBrace => "RBRACE",
            Self::LBracket => "LBRACKET",
            Self::RBracket => "RBRACKET",
            Self::Function => "FUNCTION",
            Self::Let => "LET",
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::If => "IF",
            Self::Else => "ELSE",
            Self::Return => "RETURN",
            Self::While => "WHILE",
            Self::Break => "BREAK",
            Self::Continue => "CONTINUE",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
