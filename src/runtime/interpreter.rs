//! Tree-walking evaluator
//!
//! A single recursive walk over the AST. Non-local control flow (`return`,
//! `break`, `continue`) travels as ordinary values that block evaluation
//! detects and unwraps, so runtime errors stay an independent channel.
//! The evaluator carries the call stack for diagnostics and a loop-depth
//! counter that validates `break`/`continue`.

use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{RuntimeError, RuntimeErrorKind, RuntimeResult, StackFrame};
use crate::lexer::{Token, TokenKind};
use crate::parser::{BlockStatement, Expression, Identifier, Program, Statement};

use super::builtins;
use super::environment::{Env, Environment};
use super::value::{FunctionValue, HashKey, Value};

/// Evaluates programs against an environment. One instance per session;
/// the environment persists across `eval_program` calls so a REPL keeps
/// its bindings.
pub struct Evaluator {
    env: Env,
    call_stack: Vec<StackFrame>,
    loop_depth: u32,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::with_env(Environment::new())
    }

    pub fn with_env(env: Env) -> Self {
        Self {
            env,
            call_stack: Vec::new(),
            loop_depth: 0,
        }
    }

    /// The evaluator's root environment.
    pub fn env(&self) -> Env {
        self.env.clone()
    }

    /// Evaluate a program. A top-level `return` unwraps to its inner value.
    pub fn eval_program(&mut self, program: &Program) -> RuntimeResult<Value> {
        self.eval_statements(&program.statements, true)
    }

    fn eval_statements(
        &mut self,
        statements: &[Statement],
        unwrap_return: bool,
    ) -> RuntimeResult<Value> {
        let mut result = Value::Null;

        for statement in statements {
            let value = self.eval_statement(statement)?;
            match value {
                Value::Return(inner) => {
                    return Ok(if unwrap_return {
                        *inner
                    } else {
                        Value::Return(inner)
                    });
                }
                Value::Break | Value::Continue => return Ok(value),
                other => result = other,
            }
        }

        Ok(result)
    }

    fn eval_statement(&mut self, statement: &Statement) -> RuntimeResult<Value> {
        match statement {
            Statement::Let { name, value, .. } => {
                let value = self.eval_expression(value)?;
                self.env.borrow_mut().set(name.value.clone(), value.clone());
                Ok(value)
            }
            Statement::Return { value, .. } => {
                let value = self.eval_expression(value)?;
                Ok(Value::Return(Box::new(value)))
            }
            Statement::Expression { expression, .. } => self.eval_expression(expression),
            Statement::While {
                condition, body, ..
            } => self.eval_while(condition, body),
            Statement::Break { token } => {
                if self.loop_depth == 0 {
                    return Err(self.error(
                        RuntimeErrorKind::InvalidControlFlow,
                        token,
                        "`break` not allowed outside loop",
                    ));
                }
                Ok(Value::Break)
            }
            Statement::Continue { token } => {
                if self.loop_depth == 0 {
                    return Err(self.error(
                        RuntimeErrorKind::InvalidControlFlow,
                        token,
                        "`continue` not allowed outside loop",
                    ));
                }
                Ok(Value::Continue)
            }
        }
    }

    /// Blocks evaluate in the current environment; only function calls
    /// open a new scope.
    fn eval_block(&mut self, block: &BlockStatement) -> RuntimeResult<Value> {
        self.eval_statements(&block.statements, false)
    }

    fn eval_while(&mut self, condition: &Expression, body: &BlockStatement) -> RuntimeResult<Value> {
        self.loop_depth += 1;
        let result = self.run_while(condition, body);
        // restored even when the body errored out
        self.loop_depth -= 1;
        result
    }

    fn run_while(&mut self, condition: &Expression, body: &BlockStatement) -> RuntimeResult<Value> {
        let mut result = Value::Null;

        while self.eval_expression(condition)?.is_truthy() {
            result = self.eval_block(body)?;

            match result {
                Value::Break => return Ok(Value::Null),
                Value::Continue => {
                    result = Value::Null;
                    continue;
                }
                Value::Return(_) => return Ok(result),
                _ => {}
            }
        }

        Ok(result)
    }

    fn eval_expression(&mut self, expression: &Expression) -> RuntimeResult<Value> {
        match expression {
            Expression::IntegerLiteral { value, .. } => Ok(Value::Integer(*value)),
            Expression::BooleanLiteral { value, .. } => Ok(Value::Boolean(*value)),
            Expression::StringLiteral { value, .. } => Ok(Value::string(value.clone())),
            Expression::Identifier(ident) => self.eval_identifier(ident),
            Expression::Prefix { token, right, .. } => self.eval_prefix(token, right),
            Expression::Infix {
                token, left, right, ..
            } => self.eval_infix(token, left, right),
            Expression::If {
                condition,
                consequence,
                alternative,
                ..
            } => self.eval_if(condition, consequence, alternative.as_ref()),
            Expression::FunctionLiteral {
                parameters, body, ..
            } => Ok(Value::Function(Rc::new(FunctionValue {
                parameters: parameters.clone(),
                body: body.clone(),
                env: self.env.clone(),
            }))),
            Expression::Call {
                token,
                function,
                arguments,
            } => self.eval_call(token, function, arguments),
            Expression::ArrayLiteral { elements, .. } => {
                let values = self.eval_expressions(elements)?;
                Ok(Value::Array(Rc::new(values)))
            }
            Expression::HashLiteral { pairs, .. } => self.eval_hash_literal(pairs),
            Expression::Index { token, left, index } => self.eval_index(token, left, index),
        }
    }

    fn eval_identifier(&mut self, ident: &Identifier) -> RuntimeResult<Value> {
        if let Some(value) = self.env.borrow().get(&ident.value) {
            return Ok(value);
        }
        match builtins::lookup(&ident.value) {
            Some(builtin) => Ok(Value::Builtin(builtin)),
            None => Err(self.error(
                RuntimeErrorKind::UnknownIdentifier,
                &ident.token,
                format!("Identifier not found: {}", ident.value),
            )),
        }
    }

    fn eval_prefix(&mut self, token: &Token, right: &Expression) -> RuntimeResult<Value> {
        let operand = self.eval_expression(right)?;

        match token.kind {
            TokenKind::Bang => Ok(Value::Boolean(!operand.is_truthy())),
            TokenKind::Minus => match operand {
                Value::Integer(n) => Ok(Value::Integer(n.wrapping_neg())),
                Value::Null => Ok(Value::Null),
                other => Err(self.error(
                    RuntimeErrorKind::TypeMismatch,
                    token,
                    format!("Operation - not supported for type {}", other.type_name()),
                )),
            },
            _ => Err(self.error(
                RuntimeErrorKind::UnsupportedOperation,
                token,
                format!(
                    "Operation {} not supported for type {}",
                    token.literal,
                    operand.type_name()
                ),
            )),
        }
    }

    fn eval_infix(
        &mut self,
        token: &Token,
        left: &Expression,
        right: &Expression,
    ) -> RuntimeResult<Value> {
        // && and || short-circuit and coerce to boolean
        match token.kind {
            TokenKind::And => {
                let left = self.eval_expression(left)?;
                if !left.is_truthy() {
                    return Ok(Value::Boolean(false));
                }
                let right = self.eval_expression(right)?;
                return Ok(Value::Boolean(right.is_truthy()));
            }
            TokenKind::Or => {
                let left = self.eval_expression(left)?;
                if left.is_truthy() {
                    return Ok(Value::Boolean(true));
                }
                let right = self.eval_expression(right)?;
                return Ok(Value::Boolean(right.is_truthy()));
            }
            _ => {}
        }

        let left = self.eval_expression(left)?;
        let right = self.eval_expression(right)?;

        match (&left, &right) {
            (Value::Integer(a), Value::Integer(b)) => self.eval_integer_infix(token, *a, *b),
            (Value::Str(a), Value::Str(b)) => match token.kind {
                TokenKind::Plus => Ok(Value::string(format!("{}{}", a, b))),
                _ => Err(self.error(
                    RuntimeErrorKind::UnsupportedOperation,
                    token,
                    format!(
                        "Operation {} not supported for types STRING and STRING",
                        token.literal
                    ),
                )),
            },
            (Value::Boolean(a), Value::Boolean(b)) => match token.kind {
                TokenKind::Eq => Ok(Value::Boolean(a == b)),
                TokenKind::NotEq => Ok(Value::Boolean(a != b)),
                _ => Err(self.type_mismatch(token, &left, &right)),
            },
            _ => Err(self.type_mismatch(token, &left, &right)),
        }
    }

    fn eval_integer_infix(&self, token: &Token, a: i64, b: i64) -> RuntimeResult<Value> {
        match token.kind {
            TokenKind::Plus => Ok(Value::Integer(a.wrapping_add(b))),
            TokenKind::Minus => Ok(Value::Integer(a.wrapping_sub(b))),
            TokenKind::Asterisk => Ok(Value::Integer(a.wrapping_mul(b))),
            TokenKind::Slash => {
                if b == 0 {
                    return Err(self.error(
                        RuntimeErrorKind::DivisionByZero,
                        token,
                        "Cannot divide by 0!",
                    ));
                }
                Ok(Value::Integer(a.wrapping_div(b)))
            }
            TokenKind::Lt => Ok(Value::Boolean(a < b)),
            TokenKind::Gt => Ok(Value::Boolean(a > b)),
            TokenKind::LtEq => Ok(Value::Boolean(a <= b)),
            TokenKind::GtEq => Ok(Value::Boolean(a >= b)),
            TokenKind::Eq => Ok(Value::Boolean(a == b)),
            TokenKind::NotEq => Ok(Value::Boolean(a != b)),
            _ => Err(self.error(
                RuntimeErrorKind::UnsupportedOperation,
                token,
                format!(
                    "Operation {} not supported for types INTEGER and INTEGER",
                    token.literal
                ),
            )),
        }
    }

    fn type_mismatch(&self, token: &Token, left: &Value, right: &Value) -> RuntimeError {
        self.error(
            RuntimeErrorKind::TypeMismatch,
            token,
            format!(
                "Operation {} not supported for types {} and {}",
                token.literal,
                left.type_name(),
                right.type_name()
            ),
        )
    }

    fn eval_if(
        &mut self,
        condition: &Expression,
        consequence: &BlockStatement,
        alternative: Option<&BlockStatement>,
    ) -> RuntimeResult<Value> {
        if self.eval_expression(condition)?.is_truthy() {
            self.eval_block(consequence)
        } else if let Some(alternative) = alternative {
            self.eval_block(alternative)
        } else {
            Ok(Value::Null)
        }
    }

    fn eval_call(
        &mut self,
        token: &Token,
        function: &Expression,
        arguments: &[Expression],
    ) -> RuntimeResult<Value> {
        let callee = self.eval_expression(function)?;

        match callee {
            Value::Builtin(builtin) => {
                let args = self.eval_expressions(arguments)?;
                self.call_stack
                    .push(StackFrame::new(builtin.name, token.position, args.len()));
                let result = (builtin.func)(&args)
                    .map_err(|err| self.error(err.kind, token, err.message));
                self.call_stack.pop();
                result
            }
            Value::Function(function_value) => {
                let args = self.eval_expressions(arguments)?;
                let name = Self::resolve_function_name(function);
                self.call_stack
                    .push(StackFrame::new(name, token.position, args.len()));
                let result = self.apply_function(&function_value, args, token);
                self.call_stack.pop();
                result
            }
            other => Err(self.error(
                RuntimeErrorKind::NotCallable,
                token,
                format!("Not a function: {}", other),
            )),
        }
    }

    /// Frame name for stack traces: the identifier the callee was reached
    /// through, or `<anonymous>` for immediately-invoked literals.
    fn resolve_function_name(function: &Expression) -> String {
        match function {
            Expression::Identifier(ident) => ident.value.clone(),
            _ => "<anonymous>".to_string(),
        }
    }

    fn apply_function(
        &mut self,
        function: &FunctionValue,
        args: Vec<Value>,
        token: &Token,
    ) -> RuntimeResult<Value> {
        if args.len() != function.parameters.len() {
            return Err(self.error(
                RuntimeErrorKind::InvalidArgument,
                token,
                format!(
                    "Wrong number of arguments. Expected {}, got {}",
                    function.parameters.len(),
                    args.len()
                ),
            ));
        }

        let call_env = Environment::new_enclosed(function.env.clone());
        {
            let mut env = call_env.borrow_mut();
            for (parameter, arg) in function.parameters.iter().zip(args) {
                env.set(parameter.value.clone(), arg);
            }
        }

        // The body runs outside any loop of the caller, so break/continue
        // inside it must not see the caller's loop depth.
        let saved_env = std::mem::replace(&mut self.env, call_env);
        let saved_loop_depth = std::mem::replace(&mut self.loop_depth, 0);
        let result = self.eval_block(&function.body);
        self.env = saved_env;
        self.loop_depth = saved_loop_depth;

        // a return signal ends at its call boundary
        match result? {
            Value::Return(inner) => Ok(*inner),
            value => Ok(value),
        }
    }

    /// Arguments evaluate left to right; the first error aborts.
    fn eval_expressions(&mut self, expressions: &[Expression]) -> RuntimeResult<Vec<Value>> {
        let mut values = Vec::with_capacity(expressions.len());
        for expression in expressions {
            values.push(self.eval_expression(expression)?);
        }
        Ok(values)
    }

    fn eval_hash_literal(&mut self, pairs: &[(Expression, Expression)]) -> RuntimeResult<Value> {
        let mut map = HashMap::new();

        for (key_expr, value_expr) in pairs {
            let key_value = self.eval_expression(key_expr)?;
            let Some(key) = HashKey::from_value(&key_value) else {
                return Err(self.error(
                    RuntimeErrorKind::InvalidHashKey,
                    key_expr.token(),
                    format!("unusable as hash key: {}", key_value.type_name()),
                ));
            };
            let value = self.eval_expression(value_expr)?;
            // later duplicates overwrite earlier ones
            map.insert(key, value);
        }

        Ok(Value::Hash(Rc::new(map)))
    }

    fn eval_index(
        &mut self,
        token: &Token,
        left: &Expression,
        index: &Expression,
    ) -> RuntimeResult<Value> {
        let left = self.eval_expression(left)?;

        match left {
            Value::Array(elements) => {
                let index_value = self.eval_expression(index)?;
                let Value::Integer(index) = index_value else {
                    return Err(self.error(
                        RuntimeErrorKind::InvalidIndex,
                        token,
                        "Index to an array must be an Expression that yields an Int",
                    ));
                };
                if index < 0 || index as usize >= elements.len() {
                    return Ok(Value::Null);
                }
                Ok(elements[index as usize].clone())
            }
            Value::Hash(pairs) => {
                let key_value = self.eval_expression(index)?;
                let Some(key) = HashKey::from_value(&key_value) else {
                    return Err(self.error(
                        RuntimeErrorKind::InvalidHashKey,
                        token,
                        "Index to an hash must be an Expression that yields an Int, String or Boolean",
                    ));
                };
                Ok(pairs.get(&key).cloned().unwrap_or(Value::Null))
            }
            other => Err(self.error(
                RuntimeErrorKind::InvalidIndex,
                token,
                format!("Index operator not supported for {}", other.type_name()),
            )),
        }
    }

    fn error(
        &self,
        kind: RuntimeErrorKind,
        token: &Token,
        message: impl Into<String>,
    ) -> RuntimeError {
        RuntimeError::new(kind, message, token.position, self.snapshot_stack())
    }

    /// Frames innermost-first, matching the rendering order.
    fn snapshot_stack(&self) -> Vec<StackFrame> {
        self.call_stack.iter().rev().cloned().collect()
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}
