//! Abstract syntax tree node definitions
//!
//! Nodes are built once by the parser and never mutated afterwards. Every
//! node keeps its originating token so the evaluator can attach source
//! positions to runtime errors. `Display` renders the canonical string form
//! with infix expressions fully parenthesized.

use std::fmt;

use crate::lexer::Token;

/// A parsed program: the root node, a sequence of statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.statements.iter().map(Statement::to_string).collect();
        write!(f, "{}", rendered.join("\n"))
    }
}

/// An identifier, used both as an expression and as a binding name.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub token: Token,
    pub value: String,
}

impl Identifier {
    pub fn new(token: Token) -> Self {
        let value = token.literal.clone();
        Self { token, value }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A braced sequence of statements. Blocks do not open a new scope; that
/// is the evaluator's contract, not the parser's.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub token: Token,
    pub statements: Vec<Statement>,
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.statements.iter().map(Statement::to_string).collect();
        write!(f, "{}", rendered.join("\n"))
    }
}

/// Statement nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Let {
        token: Token,
        name: Identifier,
        value: Expression,
    },
    Return {
        token: Token,
        value: Expression,
    },
    Expression {
        token: Token,
        expression: Expression,
    },
    While {
        token: Token,
        condition: Expression,
        body: BlockStatement,
    },
    Break {
        token: Token,
    },
    Continue {
        token: Token,
    },
}

impl Statement {
    /// The token this statement started at.
    pub fn token(&self) -> &Token {
        match self {
            Self::Let { token, .. }
            | Self::Return { token, .. }
            | Self::Expression { token, .. }
            | Self::While { token, .. }
            | Self::Break { token }
            | Self::Continue { token } => token,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Let { name, value, .. } => write!(f, "let {} = {};", name, value),
            Self::Return { value, .. } => write!(f, "return {};", value),
            Self::Expression { expression, .. } => write!(f, "{}", expression),
            Self::While {
                condition, body, ..
            } => write!(f, "while ({}) {{{}}}", condition, body),
            Self::Break { .. } => write!(f, "break;"),
            Self::Continue { .. } => write!(f, "continue;"),
        }
    }
}

/// Expression nodes.
///
/// For prefix and infix variants the token is the operator token, so its
/// position points at the operator itself. For calls it is the `(` that
/// triggered the call, which becomes the call site in stack traces.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    IntegerLiteral {
        token: Token,
        value: i64,
    },
    StringLiteral {
        token: Token,
        value: String,
    },
    BooleanLiteral {
        token: Token,
        value: bool,
    },
    Prefix {
        token: Token,
        operator: String,
        right: Box<Expression>,
    },
    Infix {
        token: Token,
        left: Box<Expression>,
        operator: String,
        right: Box<Expression>,
    },
    If {
        token: Token,
        condition: Box<Expression>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },
    FunctionLiteral {
        token: Token,
        parameters: Vec<Identifier>,
        body: BlockStatement,
    },
    Call {
        token: Token,
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },
    ArrayLiteral {
        token: Token,
        elements: Vec<Expression>,
    },
    HashLiteral {
        token: Token,
        pairs: Vec<(Expression, Expression)>,
    },
    Index {
        token: Token,
        left: Box<Expression>,
        index: Box<Expression>,
    },
}

impl Expression {
    /// The token that anchors this expression for diagnostics.
    pub fn token(&self) -> &Token {
        match self {
            Self::Identifier(ident) => &ident.token,
            Self::IntegerLiteral { token, .. }
            | Self::StringLiteral { token, .. }
            | Self::BooleanLiteral { token, .. }
            | Self::Prefix { token, .. }
            | Self::Infix { token, .. }
            | Self::If { token, .. }
            | Self::FunctionLiteral { token, .. }
            | Self::Call { token, .. }
            | Self::ArrayLiteral { token, .. }
            | Self::HashLiteral { token, .. }
            | Self::Index { token, .. } => token,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(ident) => write!(f, "{}", ident),
            Self::IntegerLiteral { value, .. } => write!(f, "{}", value),
            Self::StringLiteral { value, .. } => write!(f, "{}", value),
            Self::BooleanLiteral { value, .. } => write!(f, "{}", value),
            Self::Prefix {
                operator, right, ..
            } => write!(f, "({}{})", operator, right),
            Self::Infix {
                left,
                operator,
                right,
                ..
            } => write!(f, "({} {} {})", left, operator, right),
            Self::If {
                condition,
                consequence,
                alternative,
                ..
            } => {
                write!(f, "if({}) {{{}}}", condition, consequence)?;
                if let Some(alt) = alternative {
                    write!(f, "else {{{}}}", alt)?;
                }
                Ok(())
            }
            Self::FunctionLiteral {
                parameters, body, ..
            } => {
                let params: Vec<String> = parameters.iter().map(Identifier::to_string).collect();
                write!(f, "fn({}) {{{}}}", params.join(", "), body)
            }
            Self::Call {
                function,
                arguments,
                ..
            } => {
                let args: Vec<String> = arguments.iter().map(Expression::to_string).collect();
                write!(f, "{}({})", function, args.join(", "))
            }
            Self::ArrayLiteral { elements, .. } => {
                let elems: Vec<String> = elements.iter().map(Expression::to_string).collect();
                write!(f, "[{}]", elems.join(", "))
            }
            Self::HashLiteral { pairs, .. } => {
                let rendered: Vec<String> = pairs
                    .iter()
                    .map(|(key, value)| format!("{} : {}", key, value))
                    .collect();
                write!(f, "{{{}}}", rendered.join(", "))
            }
            Self::Index { left, index, .. } => write!(f, "({}[{}])", left, index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourcePosition;
    use crate::lexer::TokenKind;

    fn token(kind: TokenKind, literal: &str) -> Token {
        Token::new(kind, literal, SourcePosition::new(1, 1))
    }

    #[test]
    fn test_let_statement_display() {
        let stmt = Statement::Let {
            token: token(TokenKind::Let, "let"),
            name: Identifier::new(token(TokenKind::Ident, "myVar")),
            value: Expression::Identifier(Identifier::new(token(
                TokenKind::Ident,
                "anotherVar",
            ))),
        };
        assert_eq!(stmt.to_string(), "let myVar = anotherVar;");
    }

    #[test]
    fn test_infix_display_is_parenthesized() {
        let expr = Expression::Infix {
            token: token(TokenKind::Plus, "+"),
            left: Box::new(Expression::IntegerLiteral {
                token: token(TokenKind::Int, "5"),
                value: 5,
            }),
            operator: "+".to_string(),
            right: Box::new(Expression::IntegerLiteral {
                token: token(TokenKind::Int, "5"),
                value: 5,
            }),
        };
        assert_eq!(expr.to_string(), "(5 + 5)");
    }

    #[test]
    fn test_index_display() {
        let expr = Expression::Index {
            token: token(TokenKind::LBracket, "["),
            left: Box::new(Expression::Identifier(Identifier::new(token(
                TokenKind::Ident,
                "arr",
            )))),
            index: Box::new(Expression::IntegerLiteral {
                token: token(TokenKind::Int, "0"),
                value: 0,
            }),
        };
        assert_eq!(expr.to_string(), "(arr[0])");
    }
}
