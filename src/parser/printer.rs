//! Indented tree rendering of the AST
//!
//! Structural inspection format used by the `--ast` flag and the REPL's
//! `:ast` command. Each node prints on its own line, children indented two
//! spaces, with labeled slots (Name, Value, Condition, ...) for clarity.

use super::ast::{BlockStatement, Expression, Program, Statement};

const INDENT: &str = "  ";

/// Render a program as an indented node tree.
pub fn print_program(program: &Program) -> String {
    let mut out = String::new();
    push_line(&mut out, 0, "Program");
    for statement in &program.statements {
        append_statement(&mut out, statement, 1);
    }
    out
}

fn append_statement(out: &mut String, statement: &Statement, depth: usize) {
    match statement {
        Statement::Let { name, value, .. } => {
            push_line(out, depth, "LetStatement");
            push_line(out, depth + 1, "Name");
            push_line(out, depth + 2, &format!("Identifier({})", name.value));
            push_line(out, depth + 1, "Value");
            append_expression(out, value, depth + 2);
        }
        Statement::Return { value, .. } => {
            push_line(out, depth, "ReturnStatement");
            push_line(out, depth + 1, "Value");
            append_expression(out, value, depth + 2);
        }
        Statement::Expression { expression, .. } => {
            push_line(out, depth, "ExpressionStatement");
            push_line(out, depth + 1, "Expression");
            append_expression(out, expression, depth + 2);
        }
        Statement::While {
            condition, body, ..
        } => {
            push_line(out, depth, "WhileStatement");
            push_line(out, depth + 1, "Condition");
            append_expression(out, condition, depth + 2);
            push_line(out, depth + 1, "Body");
            append_block(out, body, depth + 2);
        }
        Statement::Break { .. } => push_line(out, depth, "BreakStatement"),
        Statement::Continue { .. } => push_line(out, depth, "ContinueStatement"),
    }
}

fn append_block(out: &mut String, block: &BlockStatement, depth: usize) {
    push_line(out, depth, "BlockStatement");
    for statement in &block.statements {
        append_statement(out, statement, depth + 1);
    }
}

fn append_expression(out: &mut String, expression: &Expression, depth: usize) {
    match expression {
        Expression::Identifier(ident) => {
            push_line(out, depth, &format!("Identifier({})", ident.value));
        }
        Expression::IntegerLiteral { value, .. } => {
            push_line(out, depth, &format!("IntegerLiteral({})", value));
        }
        Expression::BooleanLiteral { value, .. } => {
            push_line(out, depth, &format!("BooleanLiteral({})", value));
        }
        Expression::StringLiteral { value, .. } => {
            push_line(out, depth, &format!("StringLiteral(\"{}\")", value));
        }
        Expression::Prefix {
            operator, right, ..
        } => {
            push_line(out, depth, &format!("PrefixExpression({})", operator));
            push_line(out, depth + 1, "Right");
            append_expression(out, right, depth + 2);
        }
        Expression::Infix {
            left,
            operator,
            right,
            ..
        } => {
            push_line(out, depth, &format!("InfixExpression({})", operator));
            push_line(out, depth + 1, "Left");
            append_expression(out, left, depth + 2);
            push_line(out, depth + 1, "Right");
            append_expression(out, right, depth + 2);
        }
        Expression::If {
            condition,
            consequence,
            alternative,
            ..
        } => {
            push_line(out, depth, "IfExpression");
            push_line(out, depth + 1, "Condition");
            append_expression(out, condition, depth + 2);
            push_line(out, depth + 1, "Consequence");
            append_block(out, consequence, depth + 2);
            if let Some(alt) = alternative {
                push_line(out, depth + 1, "Alternative");
                append_block(out, alt, depth + 2);
            }
        }
        Expression::FunctionLiteral {
            parameters, body, ..
        } => {
            push_line(out, depth, "FunctionLiteral");
            push_line(out, depth + 1, "Parameters");
            for parameter in parameters {
                push_line(out, depth + 2, &format!("Identifier({})", parameter.value));
            }
            push_line(out, depth + 1, "Body");
            append_block(out, body, depth + 2);
        }
        Expression::Call {
            function,
            arguments,
            ..
        } => {
            push_line(out, depth, "CallExpression");
            push_line(out, depth + 1, "Function");
            append_expression(out, function, depth + 2);
            push_line(out, depth + 1, "Arguments");
            for argument in arguments {
                append_expression(out, argument, depth + 2);
            }
        }
        Expression::ArrayLiteral { elements, .. } => {
            push_line(out, depth, "ArrayLiteral");
            for element in elements {
                append_expression(out, element, depth + 1);
            }
        }
        Expression::HashLiteral { pairs, .. } => {
            push_line(out, depth, "HashLiteral");
            for (index, (key, value)) in pairs.iter().enumerate() {
                push_line(out, depth + 1, &format!("Pair[{}]", index));
                push_line(out, depth + 2, "Key");
                append_expression(out, key, depth + 3);
                push_line(out, depth + 2, "Value");
                append_expression(out, value, depth + 3);
            }
        }
        Expression::Index { left, index, .. } => {
            push_line(out, depth, "IndexExpression");
            push_line(out, depth + 1, "Left");
            append_expression(out, left, depth + 2);
            push_line(out, depth + 1, "Index");
            append_expression(out, index, depth + 2);
        }
    }
}

fn push_line(out: &mut String, depth: usize, text: &str) {
    out.push_str(&INDENT.repeat(depth));
    out.push_str(text);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn print(source: &str) -> String {
        let mut parser = Parser::new(Lexer::new(source));
        let program = parser.parse_program();
        assert!(parser.take_errors().is_empty());
        print_program(&program)
    }

    #[test]
    fn test_print_let_statement() {
        let output = print("let x = 5;");
        let expected = "\
Program
  LetStatement
    Name
      Identifier(x)
    Value
      IntegerLiteral(5)
";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_print_infix_tree() {
        let output = print("1 + 2 * 3;");
        let expected = "\
Program
  ExpressionStatement
    Expression
      InfixExpression(+)
        Left
          IntegerLiteral(1)
        Right
          InfixExpression(*)
            Left
              IntegerLiteral(2)
            Right
              IntegerLiteral(3)
";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_print_hash_pairs_are_indexed() {
        let output = print("{\"a\": 1, \"b\": 2}");
        assert!(output.contains("Pair[0]"));
        assert!(output.contains("Pair[1]"));
        assert!(output.contains("StringLiteral(\"a\")"));
    }

    #[test]
    fn test_print_if_with_alternative() {
        let output = print("if (x) { 1 } else { 2 }");
        assert!(output.contains("IfExpression"));
        assert!(output.contains("Consequence"));
        assert!(output.contains("Alternative"));
    }
}
