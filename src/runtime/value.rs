//! Runtime value representation
//!
//! Values are immutable once constructed; arrays and hashes are snapshot
//! copies, never mutated in place. The only mutable state in the whole
//! runtime is the environment binding table. `Return`, `Break` and
//! `Continue` are internal control-flow markers that block evaluation
//! detects and unwraps; they are never exposed to user code.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::parser::{BlockStatement, Identifier};

use super::builtins::BuiltinFunction;
use super::environment::Env;

/// A runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    Str(Rc<String>),
    Null,
    Array(Rc<Vec<Value>>),
    Hash(Rc<HashMap<HashKey, Value>>),
    Function(Rc<FunctionValue>),
    Builtin(BuiltinFunction),
    /// Wraps the value of a `return` statement while it unwinds to the
    /// nearest call boundary (or the program top level).
    Return(Box<Value>),
    Break,
    Continue,
}

/// A user-defined function: parameters, body, and the environment captured
/// at the definition site. Calls evaluate the body in a fresh child of the
/// captured environment, which is what makes closures work.
#[derive(Debug)]
pub struct FunctionValue {
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
    pub env: Env,
}

impl Value {
    pub fn string(value: impl Into<String>) -> Self {
        Self::Str(Rc::new(value.into()))
    }

    /// `false` and `null` are falsy, everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Boolean(false) | Value::Null)
    }

    /// The type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "INTEGER",
            Self::Boolean(_) => "BOOLEAN",
            Self::Str(_) => "STRING",
            Self::Null => "NULL",
            Self::Array(_) => "ARRAY",
            Self::Hash(_) => "HASH",
            Self::Function(_) => "FUNCTION",
            Self::Builtin(_) => "BUILTIN",
            Self::Return(_) => "RETURN",
            Self::Break => "BREAK",
            Self::Continue => "CONTINUE",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Null, Self::Null) => true,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Hash(a), Self::Hash(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::Builtin(a), Self::Builtin(b)) => a == b,
            (Self::Return(a), Self::Return(b)) => a == b,
            (Self::Break, Self::Break) => true,
            (Self::Continue, Self::Continue) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{}", value),
            Self::Boolean(value) => write!(f, "{}", value),
            Self::Str(value) => write!(f, "{}", value),
            Self::Null => write!(f, "null"),
            Self::Array(elements) => {
                let rendered: Vec<String> = elements.iter().map(Value::to_string).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
            Self::Hash(pairs) => {
                let rendered: Vec<String> = pairs
                    .iter()
                    .map(|(key, value)| format!("{} : {}", key, value))
                    .collect();
                write!(f, "{{{}}}", rendered.join(", "))
            }
            Self::Function(function) => {
                let params: Vec<String> = function
                    .parameters
                    .iter()
                    .map(Identifier::to_string)
                    .collect();
                write!(f, "fn({}) {{\n{}\n}}", params.join(", "), function.body)
            }
            Self::Builtin(_) => write!(f, "builtin function"),
            Self::Return(inner) => write!(f, "{}", inner),
            Self::Break => write!(f, "break"),
            Self::Continue => write!(f, "continue"),
        }
    }
}

/// Canonical hash-map key. Only integers, booleans and strings are
/// hashable; two values collide iff they have the same runtime type and
/// equal underlying value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HashKey {
    Integer(i64),
    Boolean(bool),
    Str(String),
}

impl HashKey {
    /// Derive a key from a value, or `None` when the type is not hashable.
    pub fn from_value(value: &Value) -> Option<HashKey> {
        match value {
            Value::Integer(n) => Some(HashKey::Integer(*n)),
            Value::Boolean(b) => Some(HashKey::Boolean(*b)),
            Value::Str(s) => Some(HashKey::Str(s.as_ref().clone())),
            _ => None,
        }
    }
}

impl fmt::Display for HashKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{}", value),
            Self::Boolean(value) => write!(f, "{}", value),
            Self::Str(value) => write!(f, "{}", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(Value::Integer(0).is_truthy());
        assert!(Value::Integer(5).is_truthy());
        assert!(Value::Boolean(true).is_truthy());
        assert!(Value::string("").is_truthy());
        assert!(!Value::Boolean(false).is_truthy());
        assert!(!Value::Null.is_truthy());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Integer(42).to_string(), "42");
        assert_eq!(Value::Boolean(true).to_string(), "true");
        assert_eq!(Value::string("hello").to_string(), "hello");
        assert_eq!(Value::Null.to_string(), "null");
        let array = Value::Array(Rc::new(vec![Value::Integer(1), Value::Integer(2)]));
        assert_eq!(array.to_string(), "[1, 2]");
    }

    #[test]
    fn test_hash_key_equality_is_type_and_value() {
        assert_eq!(
            HashKey::from_value(&Value::Integer(1)),
            Some(HashKey::Integer(1))
        );
        assert_ne!(HashKey::Integer(1), HashKey::Boolean(true));
        assert_eq!(
            HashKey::from_value(&Value::string("a")),
            HashKey::from_value(&Value::string("a"))
        );
    }

    #[test]
    fn test_only_scalars_are_hashable() {
        assert!(HashKey::from_value(&Value::Null).is_none());
        assert!(HashKey::from_value(&Value::Array(Rc::new(vec![]))).is_none());
    }
}
