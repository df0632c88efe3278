//! Lexer/Scanner implementation for the Monkey language
//!
//! Converts source text into a lazy stream of tokens via `next_token`.
//! Every token carries the line/column of its first character.

use crate::error::SourcePosition;

use super::token::{Token, TokenKind};

/// Lexer for Monkey source code.
///
/// `next_token` may be called repeatedly; once the input is exhausted it
/// returns an `EOF` token forever.
pub struct Lexer {
    source: Vec<char>,
    position: usize,
    read_position: usize,
    ch: Option<char>,
    line: u32,
    column: u32,
}

impl Lexer {
    /// Create a new lexer over the given source text.
    pub fn new(source: &str) -> Self {
        let mut lexer = Self {
            source: source.chars().collect(),
            position: 0,
            read_position: 0,
            ch: None,
            line: 1,
            column: 0,
        };
        lexer.read_char();
        lexer
    }

    /// Produce the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        let position = self.current_position();

        let ch = match self.ch {
            Some(c) => c,
            // Idempotent at end of stream: no further advancing.
            None => return Token::new(TokenKind::Eof, "", position),
        };

        let token = match ch {
            '=' => {
                if self.peek_char() == Some('=') {
                    self.read_char();
                    Token::new(TokenKind::Eq, "==", position)
                } else {
                    Token::new(TokenKind::Assign, "=", position)
                }
            }
            '!' => {
                if self.peek_char() == Some('=') {
                    self.read_char();
                    Token::new(TokenKind::NotEq, "!=", position)
                } else {
                    Token::new(TokenKind::Bang, "!", position)
                }
            }
            '<' => {
                if self.peek_char() == Some('=') {
                    self.read_char();
                    Token::new(TokenKind::LtEq, "<=", position)
                } else {
                    Token::new(TokenKind::Lt, "<", position)
                }
            }
            '>' => {
                if self.peek_char() == Some('=') {
                    self.read_char();
                    Token::new(TokenKind::GtEq, ">=", position)
                } else {
                    Token::new(TokenKind::Gt, ">", position)
                }
            }
            '&' => {
                if self.peek_char() == Some('&') {
                    self.read_char();
                    Token::new(TokenKind::And, "&&", position)
                } else {
                    Token::new(TokenKind::Illegal, "&", position)
                }
            }
            '|' => {
                if self.peek_char() == Some('|') {
                    self.read_char();
                    Token::new(TokenKind::Or, "||", position)
                } else {
                    Token::new(TokenKind::Illegal, "|", position)
                }
            }
            '+' => Token::new(TokenKind::Plus, "+", position),
            '-' => Token::new(TokenKind::Minus, "-", position),
            '*' => Token::new(TokenKind::Asterisk, "*", position),
            '/' => Token::new(TokenKind::Slash, "/", position),
            ',' => Token::new(TokenKind::Comma, ",", position),
            ';' => Token::new(TokenKind::Semicolon, ";", position),
            ':' => Token::new(TokenKind::Colon, ":", position),
            '(' => Token::new(TokenKind::LParen, "(", position),
            ')' => Token::new(TokenKind::RParen, ")", position),
            '{' => Token::new(TokenKind::LBrace, "{", position),
            '}' => Token::new(TokenKind::RBrace, "}", position),
            '[' => Token::new(TokenKind::LBracket, "[", position),
            ']' => Token::new(TokenKind::RBracket, "]", position),
            '"' => return self.read_string(position),
            c if is_identifier_start(c) => return self.read_identifier(position),
            c if c.is_ascii_digit() => return self.read_number(position),
            c => Token::new(TokenKind::Illegal, c.to_string(), position),
        };

        self.read_char();
        token
    }

    /// Scan an identifier or keyword. Leaves the cursor past the last
    /// identifier character, so the caller must not advance again.
    fn read_identifier(&mut self, position: SourcePosition) -> Token {
        let start = self.position;
        while matches!(self.ch, Some(c) if is_identifier_continue(c)) {
            self.read_char();
        }
        let literal: String = self.source[start..self.position].iter().collect();

        match TokenKind::lookup_keyword(&literal) {
            Some(keyword) => Token::new(keyword, literal, position),
            None => Token::new(TokenKind::Ident, literal, position),
        }
    }

    /// Scan an integer literal. The raw digit run is kept as the literal;
    /// overflow is the parser's concern, not the lexer's.
    fn read_number(&mut self, position: SourcePosition) -> Token {
        let start = self.position;
        while matches!(self.ch, Some(c) if c.is_ascii_digit()) {
            self.read_char();
        }
        let literal: String = self.source[start..self.position].iter().collect();
        Token::new(TokenKind::Int, literal, position)
    }

    /// Scan a string literal: everything up to the next unescaped `"` or
    /// EOF, copied raw (escape sequences are not interpreted).
    fn read_string(&mut self, position: SourcePosition) -> Token {
        let mut value = String::new();
        self.read_char(); // consume opening quote

        loop {
            match self.ch {
                None => break,
                Some('"') => {
                    self.read_char(); // consume closing quote
                    break;
                }
                Some('\\') if self.peek_char() == Some('"') => {
                    value.push('\\');
                    value.push('"');
                    self.read_char();
                    self.read_char();
                }
                Some(c) => {
                    value.push(c);
                    self.read_char();
                }
            }
        }

        Token::new(TokenKind::String, value, position)
    }

    /// Skip whitespace and `#`-to-end-of-line comments, which may interleave.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while matches!(self.ch, Some(c) if c.is_whitespace()) {
                self.read_char();
            }
            if self.ch == Some('#') {
                while !matches!(self.ch, Some('\n') | None) {
                    self.read_char();
                }
            } else {
                return;
            }
        }
    }

    /// Advance to the next character, maintaining line/column bookkeeping.
    fn read_char(&mut self) {
        if self.ch == Some('\n') {
            self.line += 1;
            self.column = 0;
        }
        self.ch = self.source.get(self.read_position).copied();
        self.position = self.read_position;
        self.read_position += 1;
        self.column += 1;
    }

    /// Peek at the next character without consuming it.
    fn peek_char(&self) -> Option<char> {
        self.source.get(self.read_position).copied()
    }

    fn current_position(&self) -> SourcePosition {
        SourcePosition::new(self.line, self.column)
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_empty_source() {
        let tokens = tokenize("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
    }

    #[test]
    fn test_eof_is_idempotent() {
        let mut lexer = Lexer::new("5");
        assert_eq!(lexer.next_token().kind, TokenKind::Int);
        let first = lexer.next_token();
        let second = lexer.next_token();
        assert_eq!(first.kind, TokenKind::Eof);
        assert_eq!(second.kind, TokenKind::Eof);
        assert_eq!(first.position, second.position);
    }

    #[test]
    fn test_single_character_tokens() {
        let tokens = tokenize("=+-!*/<>,;:(){}[]");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Assign,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Bang,
                TokenKind::Asterisk,
                TokenKind::Slash,
                TokenKind::Lt,
                TokenKind::Gt,
                TokenKind::Comma,
                TokenKind::Semicolon,
                TokenKind::Colon,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_two_character_tokens() {
        let tokens = tokenize("== != <= >= && ||");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Eq,
                TokenKind::NotEq,
                TokenKind::LtEq,
                TokenKind::GtEq,
                TokenKind::And,
                TokenKind::Or,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[0].literal, "==");
        assert_eq!(tokens[4].literal, "&&");
    }

    #[test]
    fn test_lone_ampersand_and_pipe_are_illegal() {
        let tokens = tokenize("& |");
        assert_eq!(tokens[0].kind, TokenKind::Illegal);
        assert_eq!(tokens[0].literal, "&");
        assert_eq!(tokens[1].kind, TokenKind::Illegal);
        assert_eq!(tokens[1].literal, "|");
    }

    #[test]
    fn test_keywords() {
        let tokens = tokenize("fn let true false if else return while break continue");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Function,
                TokenKind::Let,
                TokenKind::True,
                TokenKind::False,
                TokenKind::If,
                TokenKind::Else,
                TokenKind::Return,
                TokenKind::While,
                TokenKind::Break,
                TokenKind::Continue,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_let_statement_positions() {
        let tokens = tokenize("let x = 5;");
        let expected: Vec<(TokenKind, &str, u32)> = vec![
            (TokenKind::Let, "let", 1),
            (TokenKind::Ident, "x", 5),
            (TokenKind::Assign, "=", 7),
            (TokenKind::Int, "5", 9),
            (TokenKind::Semicolon, ";", 10),
            (TokenKind::Eof, "", 11),
        ];
        for (token, (kind, literal, column)) in tokens.iter().zip(expected) {
            assert_eq!(token.kind, kind);
            assert_eq!(token.literal, literal);
            assert_eq!(token.position.line, 1);
            assert_eq!(token.position.column, column);
        }
    }

    #[test]
    fn test_line_tracking() {
        let tokens = tokenize("let\nx");
        assert_eq!(tokens[0].position, SourcePosition::new(1, 1));
        assert_eq!(tokens[1].position, SourcePosition::new(2, 1));
    }

    #[test]
    fn test_identifiers() {
        let tokens = tokenize("foo bar_baz _private myVar123");
        for (token, literal) in tokens.iter().zip(["foo", "bar_baz", "_private", "myVar123"]) {
            assert_eq!(token.kind, TokenKind::Ident);
            assert_eq!(token.literal, literal);
        }
    }

    #[test]
    fn test_string_literals() {
        let tokens = tokenize(r#""hello" "foo bar""#);
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].literal, "hello");
        assert_eq!(tokens[1].literal, "foo bar");
    }

    #[test]
    fn test_string_escaped_quote_is_copied_raw() {
        let tokens = tokenize(r#""say \"hi\"""#);
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].literal, r#"say \"hi\""#);
    }

    #[test]
    fn test_unterminated_string_stops_at_eof() {
        let tokens = tokenize("\"unterminated");
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].literal, "unterminated");
        assert_eq!(tokens[1].kind, TokenKind::Eof);
    }

    #[test]
    fn test_comments_are_skipped() {
        let tokens = tokenize("let x = 1; # trailing comment\n# full-line comment\nlet y = 2;");
        let idents: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Ident)
            .map(|t| t.literal.as_str())
            .collect();
        assert_eq!(idents, vec!["x", "y"]);
    }

    #[test]
    fn test_comment_then_whitespace_interleaving() {
        let tokens = tokenize("# one\n   # two\n  5");
        assert_eq!(tokens[0].kind, TokenKind::Int);
        assert_eq!(tokens[0].position, SourcePosition::new(3, 3));
    }

    #[test]
    fn test_complete_program() {
        let source = "let add = fn(x, y) { x + y; };\nlet result = add(5, 10);";
        let tokens = tokenize(source);
        assert_eq!(tokens[0].kind, TokenKind::Let);
        assert_eq!(tokens[3].kind, TokenKind::Function);
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
        // second line starts fresh at column 1
        let result_token = tokens.iter().find(|t| t.literal == "result").unwrap();
        assert_eq!(result_token.position, SourcePosition::new(2, 5));
    }
}
