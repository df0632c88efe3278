//! Pratt parser for the Monkey language
//!
//! Precedence-climbing expression parser with prefix and infix dispatch
//! tables expressed as match arms. Errors accumulate in a list and never
//! abort the parse; a failed statement is dropped and parsing resumes at
//! the next token.

use crate::lexer::{Lexer, Token, TokenKind};

use super::ast::{BlockStatement, Expression, Identifier, Program, Statement};

/// Binding power levels, lowest to highest. Call and index share the top
/// level so `f(x)[0]` and `a[0](x)` both group left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Lowest,
    Or,
    And,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
}

impl Precedence {
    fn for_token(kind: TokenKind) -> Precedence {
        match kind {
            TokenKind::Or => Precedence::Or,
            TokenKind::And => Precedence::And,
            TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
            TokenKind::Lt | TokenKind::Gt | TokenKind::LtEq | TokenKind::GtEq => {
                Precedence::LessGreater
            }
            TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
            TokenKind::Asterisk | TokenKind::Slash => Precedence::Product,
            TokenKind::LParen | TokenKind::LBracket => Precedence::Call,
            _ => Precedence::Lowest,
        }
    }
}

/// Parser over a token stream.
pub struct Parser {
    lexer: Lexer,
    current: Token,
    peek: Token,
    errors: Vec<String>,
}

impl Parser {
    /// Create a parser, pre-fetching the first two tokens.
    pub fn new(mut lexer: Lexer) -> Self {
        let current = lexer.next_token();
        let peek = lexer.next_token();
        Self {
            lexer,
            current,
            peek,
            errors: Vec::new(),
        }
    }

    /// Parse the whole input. Errors are collected, not returned here;
    /// drain them with `take_errors` afterwards.
    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();

        while !self.current_is(TokenKind::Eof) {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.next_token();
        }

        Program::new(statements)
    }

    /// The accumulated parse errors, in the order they were recorded.
    pub fn take_errors(&mut self) -> Vec<String> {
        std::mem::take(&mut self.errors)
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.current.kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::Break => self.parse_break_statement(),
            TokenKind::Continue => self.parse_continue_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Option<Statement> {
        let token = self.current.clone();

        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = Identifier::new(self.current.clone());

        if !self.expect_peek(TokenKind::Assign) {
            return None;
        }

        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Some(Statement::Let { token, name, value })
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        let token = self.current.clone();

        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Some(Statement::Return { token, value })
    }

    fn parse_while_statement(&mut self) -> Option<Statement> {
        let token = self.current.clone();

        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block_statement();

        Some(Statement::While {
            token,
            condition,
            body,
        })
    }

    fn parse_break_statement(&mut self) -> Option<Statement> {
        let token = self.current.clone();
        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }
        Some(Statement::Break { token })
    }

    fn parse_continue_statement(&mut self) -> Option<Statement> {
        let token = self.current.clone();
        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }
        Some(Statement::Continue { token })
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let token = self.current.clone();
        let expression = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Some(Statement::Expression { token, expression })
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let mut left = self.parse_prefix()?;

        while !self.peek_is(TokenKind::Semicolon)
            && precedence < Precedence::for_token(self.peek.kind)
        {
            left = match self.peek.kind {
                TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Slash
                | TokenKind::Asterisk
                | TokenKind::Eq
                | TokenKind::NotEq
                | TokenKind::Lt
                | TokenKind::Gt
                | TokenKind::LtEq
                | TokenKind::GtEq
                | TokenKind::And
                | TokenKind::Or => {
                    self.next_token();
                    self.parse_infix_expression(left)?
                }
                TokenKind::LParen => {
                    self.next_token();
                    self.parse_call_expression(left)?
                }
                TokenKind::LBracket => {
                    self.next_token();
                    self.parse_index_expression(left)?
                }
                _ => return Some(left),
            };
        }

        Some(left)
    }

    /// Prefix dispatch on the current token.
    fn parse_prefix(&mut self) -> Option<Expression> {
        match self.current.kind {
            TokenKind::Ident => Some(Expression::Identifier(Identifier::new(
                self.current.clone(),
            ))),
            TokenKind::Int => self.parse_integer_literal(),
            TokenKind::String => Some(Expression::StringLiteral {
                token: self.current.clone(),
                value: self.current.literal.clone(),
            }),
            TokenKind::True | TokenKind::False => Some(Expression::BooleanLiteral {
                token: self.current.clone(),
                value: self.current_is(TokenKind::True),
            }),
            TokenKind::Bang | TokenKind::Minus => self.parse_prefix_expression(),
            TokenKind::LParen => self.parse_grouped_expression(),
            TokenKind::If => self.parse_if_expression(),
            TokenKind::Function => self.parse_function_literal(),
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::LBrace => self.parse_hash_literal(),
            _ => {
                self.errors.push(format!(
                    "no prefix parse function for {} found",
                    self.current.kind
                ));
                None
            }
        }
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        match token.literal.parse::<i64>() {
            Ok(value) => Some(Expression::IntegerLiteral { token, value }),
            Err(_) => {
                self.errors
                    .push(format!("Could not parse {} as integer", token.literal));
                None
            }
        }
    }

    fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        let operator = token.literal.clone();

        self.next_token();
        let right = Box::new(self.parse_expression(Precedence::Prefix)?);

        Some(Expression::Prefix {
            token,
            operator,
            right,
        })
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.current.clone();
        let operator = token.literal.clone();
        let precedence = Precedence::for_token(token.kind);

        self.next_token();
        let right = Box::new(self.parse_expression(precedence)?);

        Some(Expression::Infix {
            token,
            left: Box::new(left),
            operator,
            right,
        })
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.next_token();
        let expression = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }

        Some(expression)
    }

    fn parse_if_expression(&mut self) -> Option<Expression> {
        let token = self.current.clone();

        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        self.next_token();
        let condition = Box::new(self.parse_expression(Precedence::Lowest)?);

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let consequence = self.parse_block_statement();

        let mut alternative = None;
        if self.peek_is(TokenKind::Else) {
            self.next_token();

            if self.peek_is(TokenKind::If) {
                // `else if` chains by parsing the nested `if` as the whole
                // alternative, wrapped in a synthetic block.
                self.next_token();
                let else_if_token = self.current.clone();
                let nested = self.parse_if_expression()?;
                alternative = Some(BlockStatement {
                    token: else_if_token.clone(),
                    statements: vec![Statement::Expression {
                        token: else_if_token,
                        expression: nested,
                    }],
                });
            } else {
                if !self.expect_peek(TokenKind::LBrace) {
                    return None;
                }
                alternative = Some(self.parse_block_statement());
            }
        }

        Some(Expression::If {
            token,
            condition,
            consequence,
            alternative,
        })
    }

    fn parse_block_statement(&mut self) -> BlockStatement {
        let token = self.current.clone();
        let mut statements = Vec::new();

        self.next_token();
        while !self.current_is(TokenKind::RBrace) && !self.current_is(TokenKind::Eof) {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.next_token();
        }

        BlockStatement { token, statements }
    }

    fn parse_function_literal(&mut self) -> Option<Expression> {
        let token = self.current.clone();

        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        let parameters = self.parse_function_parameters()?;

        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block_statement();

        Some(Expression::FunctionLiteral {
            token,
            parameters,
            body,
        })
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<Identifier>> {
        let mut identifiers = Vec::new();

        if self.peek_is(TokenKind::RParen) {
            self.next_token();
            return Some(identifiers);
        }

        self.next_token();
        identifiers.push(Identifier::new(self.current.clone()));

        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            identifiers.push(Identifier::new(self.current.clone()));
        }

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }

        Some(identifiers)
    }

    fn parse_call_expression(&mut self, function: Expression) -> Option<Expression> {
        let token = self.current.clone();
        let arguments = self.parse_expression_list(TokenKind::RParen)?;

        Some(Expression::Call {
            token,
            function: Box::new(function),
            arguments,
        })
    }

    fn parse_array_literal(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        let elements = self.parse_expression_list(TokenKind::RBracket)?;

        Some(Expression::ArrayLiteral { token, elements })
    }

    fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<Expression>> {
        let mut list = Vec::new();

        if self.peek_is(end) {
            self.next_token();
            return Some(list);
        }

        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        if !self.expect_peek(end) {
            return None;
        }

        Some(list)
    }

    fn parse_hash_literal(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        let mut pairs = Vec::new();

        while !self.peek_is(TokenKind::RBrace) {
            self.next_token();
            let key = self.parse_expression(Precedence::Lowest)?;

            if !self.expect_peek(TokenKind::Colon) {
                return None;
            }

            self.next_token();
            let value = self.parse_expression(Precedence::Lowest)?;
            pairs.push((key, value));

            if !self.peek_is(TokenKind::RBrace) && !self.expect_peek(TokenKind::Comma) {
                return None;
            }
        }

        if !self.expect_peek(TokenKind::RBrace) {
            return None;
        }

        Some(Expression::HashLiteral { token, pairs })
    }

    fn parse_index_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.current.clone();

        self.next_token();
        let index = Box::new(self.parse_expression(Precedence::Lowest)?);

        if !self.expect_peek(TokenKind::RBracket) {
            return None;
        }

        Some(Expression::Index {
            token,
            left: Box::new(left),
            index,
        })
    }

    fn next_token(&mut self) {
        self.current = std::mem::replace(&mut self.peek, self.lexer.next_token());
    }

    fn current_is(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    /// Advance if the peek token matches, otherwise record an error.
    fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_is(kind) {
            self.next_token();
            true
        } else {
            self.errors.push(format!(
                "expected next token to be {}, got {} instead at {}",
                kind, self.peek.kind, self.peek.position
            ));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(source: &str) -> (Program, Vec<String>) {
        let mut parser = Parser::new(Lexer::new(source));
        let program = parser.parse_program();
        let errors = parser.take_errors();
        (program, errors)
    }

    fn parse_ok(source: &str) -> Program {
        let (program, errors) = parse(source);
        assert!(errors.is_empty(), "unexpected parse errors: {:?}", errors);
        program
    }

    #[test]
    fn test_let_statements() {
        let program = parse_ok("let x = 5; let y = true; let foobar = y;");
        assert_eq!(program.statements.len(), 3);
        assert_eq!(program.statements[0].to_string(), "let x = 5;");
        assert_eq!(program.statements[1].to_string(), "let y = true;");
        assert_eq!(program.statements[2].to_string(), "let foobar = y;");
    }

    #[test]
    fn test_return_statement() {
        let program = parse_ok("return 5 + 10;");
        assert_eq!(program.statements[0].to_string(), "return (5 + 10);");
    }

    #[test]
    fn test_prefix_expressions() {
        for (source, expected) in [("!5;", "(!5)"), ("-15;", "(-15)"), ("!true;", "(!true)")] {
            assert_eq!(parse_ok(source).to_string(), expected);
        }
    }

    #[test]
    fn test_operator_precedence() {
        let cases = [
            ("-a * b", "((-a) * b)"),
            ("!-a", "(!(-a))"),
            ("a + b + c", "((a + b) + c)"),
            ("a + b - c", "((a + b) - c)"),
            ("a * b * c", "((a * b) * c)"),
            ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
            ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
            ("3 + 4 * 5 == 3 * 1 + 4 * 5", "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))"),
            ("!(true == true)", "(!(true == true))"),
            ("(5 + 5) * 2", "((5 + 5) * 2)"),
            ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
            ("a * [1, 2, 3, 4][b * c] * d", "((a * ([1, 2, 3, 4][(b * c)])) * d)"),
            ("add(a * b[2], b[1], 2 * [1, 2][1])", "add((a * (b[2])), (b[1]), (2 * ([1, 2][1])))"),
            ("a <= b == c >= d", "((a <= b) == (c >= d))"),
            ("a && b || c && d", "((a && b) || (c && d))"),
            ("a == b && c != d", "((a == b) && (c != d))"),
        ];
        for (source, expected) in cases {
            assert_eq!(parse_ok(source).to_string(), expected, "source: {}", source);
        }
    }

    #[test]
    fn test_if_expression() {
        let program = parse_ok("if (x < y) { x }");
        assert_eq!(program.to_string(), "if((x < y)) {x}");
    }

    #[test]
    fn test_if_else_expression() {
        let program = parse_ok("if (x < y) { x } else { y }");
        assert_eq!(program.to_string(), "if((x < y)) {x}else {y}");
    }

    #[test]
    fn test_else_if_chains_as_nested_if() {
        let program = parse_ok("if (a) { 1 } else if (b) { 2 } else { 3 }");
        assert_eq!(program.to_string(), "if(a) {1}else {if(b) {2}else {3}}");
    }

    #[test]
    fn test_function_literal() {
        let program = parse_ok("fn(x, y) { x + y; }");
        assert_eq!(program.to_string(), "fn(x, y) {(x + y)}");
    }

    #[test]
    fn test_function_parameters() {
        for (source, expected) in [
            ("fn() {};", vec![]),
            ("fn(x) {};", vec!["x"]),
            ("fn(x, y, z) {};", vec!["x", "y", "z"]),
        ] {
            let program = parse_ok(source);
            let Statement::Expression {
                expression: Expression::FunctionLiteral { parameters, .. },
                ..
            } = &program.statements[0]
            else {
                panic!("expected a function literal in {}", source);
            };
            let names: Vec<&str> = parameters.iter().map(|p| p.value.as_str()).collect();
            assert_eq!(names, expected);
        }
    }

    #[test]
    fn test_call_expression() {
        let program = parse_ok("add(1, 2 * 3, 4 + 5);");
        assert_eq!(program.to_string(), "add(1, (2 * 3), (4 + 5))");
    }

    #[test]
    fn test_call_token_is_call_site() {
        let program = parse_ok("add(1)");
        let Statement::Expression {
            expression: Expression::Call { token, .. },
            ..
        } = &program.statements[0]
        else {
            panic!("expected a call expression");
        };
        assert_eq!(token.kind, TokenKind::LParen);
        assert_eq!(token.position.column, 4);
    }

    #[test]
    fn test_string_literal() {
        let program = parse_ok("\"hello world\";");
        assert_eq!(program.to_string(), "hello world");
    }

    #[test]
    fn test_array_literal() {
        let program = parse_ok("[1, 2 * 2, 3 + 3]");
        assert_eq!(program.to_string(), "[1, (2 * 2), (3 + 3)]");
    }

    #[test]
    fn test_empty_array_literal() {
        let program = parse_ok("[]");
        assert_eq!(program.to_string(), "[]");
    }

    #[test]
    fn test_hash_literal() {
        let program = parse_ok("{\"one\": 1, \"two\": 2}");
        assert_eq!(program.to_string(), "{one : 1, two : 2}");
    }

    #[test]
    fn test_empty_hash_literal() {
        let program = parse_ok("{}");
        assert_eq!(program.to_string(), "{}");
    }

    #[test]
    fn test_hash_literal_with_expression_keys() {
        let program = parse_ok("{1 + 1: 2}");
        assert_eq!(program.to_string(), "{(1 + 1) : 2}");
    }

    #[test]
    fn test_while_statement() {
        let program = parse_ok("while (i < 5) { let i = i + 1; }");
        assert_eq!(program.to_string(), "while ((i < 5)) {let i = (i + 1);}");
    }

    #[test]
    fn test_break_and_continue() {
        let program = parse_ok("while (true) { break; continue; }");
        assert_eq!(
            program.to_string(),
            "while (true) {break;\ncontinue;}"
        );
    }

    #[test]
    fn test_let_errors_accumulate() {
        // Recovery resumes at the next token, so leftovers of a failed
        // statement may produce cascading errors; all are kept in order.
        let (_, errors) = parse("let x 5; let = 10; let 838383;");
        assert_eq!(errors.len(), 4);
        assert!(errors[0].contains("expected next token to be ASSIGN, got INT instead"));
        assert!(errors[1].contains("expected next token to be IDENT, got ASSIGN instead"));
        assert!(errors[2].contains("no prefix parse function for ASSIGN found"));
        assert!(errors[3].contains("expected next token to be IDENT, got INT instead"));
    }

    #[test]
    fn test_no_prefix_parse_function_error() {
        let (_, errors) = parse("+5;");
        assert!(!errors.is_empty());
        assert!(errors[0].contains("no prefix parse function for PLUS found"));
    }

    #[test]
    fn test_failed_statement_is_dropped_but_rest_survive() {
        let (program, errors) = parse("let x 5; let y = 10;");
        assert_eq!(errors.len(), 1);
        // The failed let is dropped; its leftover `5` re-parses as an
        // expression statement before the next statement continues.
        assert_eq!(program.statements.len(), 2);
        assert_eq!(program.statements[0].to_string(), "5");
        assert_eq!(program.statements[1].to_string(), "let y = 10;");
    }

    #[test]
    fn test_integer_overflow_is_a_parse_error() {
        let (_, errors) = parse("99999999999999999999;");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Could not parse 99999999999999999999 as integer"));
    }
}
