//! Built-in functions
//!
//! Builtins are invoked through the same call path as user functions, so
//! they get the same stack-frame bookkeeping. Each validates its own
//! argument count and types; the evaluator attaches the call-site position
//! and stack snapshot to any error raised here.

use std::rc::Rc;

use crate::error::RuntimeErrorKind;

use super::value::Value;

/// An error raised inside a builtin, before the evaluator adds position
/// and stack context.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltinError {
    pub kind: RuntimeErrorKind,
    pub message: String,
}

impl BuiltinError {
    fn invalid_argument(message: String) -> Self {
        Self {
            kind: RuntimeErrorKind::InvalidArgument,
            message,
        }
    }
}

pub type BuiltinResult = Result<Value, BuiltinError>;

/// A native function exposed to user code.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinFunction {
    pub name: &'static str,
    pub func: fn(&[Value]) -> BuiltinResult,
}

impl PartialEq for BuiltinFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// Resolve a builtin by name. Environment bindings take priority over
/// builtins, so user code can shadow these.
pub fn lookup(name: &str) -> Option<BuiltinFunction> {
    let builtin = match name {
        "len" => BuiltinFunction { name: "len", func: builtin_len },
        "first" => BuiltinFunction { name: "first", func: builtin_first },
        "last" => BuiltinFunction { name: "last", func: builtin_last },
        "rest" => BuiltinFunction { name: "rest", func: builtin_rest },
        "push" => BuiltinFunction { name: "push", func: builtin_push },
        "puts" => BuiltinFunction { name: "puts", func: builtin_puts },
        _ => return None,
    };
    Some(builtin)
}

fn check_argument_count(expected: usize, actual: usize) -> Result<(), BuiltinError> {
    if actual != expected {
        return Err(BuiltinError::invalid_argument(format!(
            "Wrong number of arguments. Expected {}, got {}",
            expected, actual
        )));
    }
    Ok(())
}

fn builtin_len(args: &[Value]) -> BuiltinResult {
    check_argument_count(1, args.len())?;
    match &args[0] {
        Value::Str(s) => Ok(Value::Integer(s.len() as i64)),
        Value::Array(elements) => Ok(Value::Integer(elements.len() as i64)),
        other => Err(BuiltinError::invalid_argument(format!(
            "Argument to `len` not supported, got {}",
            other.type_name()
        ))),
    }
}

fn builtin_first(args: &[Value]) -> BuiltinResult {
    check_argument_count(1, args.len())?;
    match &args[0] {
        Value::Array(elements) => Ok(elements.first().cloned().unwrap_or(Value::Null)),
        other => Err(BuiltinError::invalid_argument(format!(
            "Argument to `first` not supported, got {}",
            other.type_name()
        ))),
    }
}

fn builtin_last(args: &[Value]) -> BuiltinResult {
    check_argument_count(1, args.len())?;
    match &args[0] {
        Value::Array(elements) => Ok(elements.last().cloned().unwrap_or(Value::Null)),
        other => Err(BuiltinError::invalid_argument(format!(
            "Argument to `last` not supported, got {}",
            other.type_name()
        ))),
    }
}

fn builtin_rest(args: &[Value]) -> BuiltinResult {
    check_argument_count(1, args.len())?;
    match &args[0] {
        Value::Array(elements) => {
            if elements.is_empty() {
                Ok(Value::Null)
            } else {
                Ok(Value::Array(Rc::new(elements[1..].to_vec())))
            }
        }
        other => Err(BuiltinError::invalid_argument(format!(
            "Argument to `rest` not supported, got {}",
            other.type_name()
        ))),
    }
}

fn builtin_push(args: &[Value]) -> BuiltinResult {
    check_argument_count(2, args.len())?;
    match &args[0] {
        Value::Array(elements) => {
            // snapshot copy: the original array is never mutated
            let mut copy = elements.as_ref().clone();
            copy.push(args[1].clone());
            Ok(Value::Array(Rc::new(copy)))
        }
        other => Err(BuiltinError::invalid_argument(format!(
            "Argument to `push` must be ARRAY, got {}",
            other.type_name()
        ))),
    }
}

fn builtin_puts(args: &[Value]) -> BuiltinResult {
    for arg in args {
        println!("{}", arg);
    }
    Ok(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn array(values: Vec<Value>) -> Value {
        Value::Array(Rc::new(values))
    }

    #[test]
    fn test_lookup_known_and_unknown() {
        assert!(lookup("len").is_some());
        assert!(lookup("puts").is_some());
        assert!(lookup("nope").is_none());
    }

    #[test]
    fn test_len() {
        assert_eq!(
            builtin_len(&[Value::string("hello")]),
            Ok(Value::Integer(5))
        );
        assert_eq!(
            builtin_len(&[array(vec![Value::Integer(1), Value::Integer(2)])]),
            Ok(Value::Integer(2))
        );
    }

    #[test]
    fn test_len_rejects_integers() {
        let err = builtin_len(&[Value::Integer(1)]).unwrap_err();
        assert_eq!(err.kind, RuntimeErrorKind::InvalidArgument);
        assert_eq!(err.message, "Argument to `len` not supported, got INTEGER");
    }

    #[test]
    fn test_wrong_argument_count() {
        let err = builtin_len(&[]).unwrap_err();
        assert_eq!(err.kind, RuntimeErrorKind::InvalidArgument);
        assert_eq!(err.message, "Wrong number of arguments. Expected 1, got 0");
    }

    #[test]
    fn test_first_last_on_empty_array_yield_null() {
        assert_eq!(builtin_first(&[array(vec![])]), Ok(Value::Null));
        assert_eq!(builtin_last(&[array(vec![])]), Ok(Value::Null));
    }

    #[test]
    fn test_first_and_last() {
        let arr = array(vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]);
        assert_eq!(builtin_first(&[arr.clone()]), Ok(Value::Integer(1)));
        assert_eq!(builtin_last(&[arr]), Ok(Value::Integer(3)));
    }

    #[test]
    fn test_rest() {
        let arr = array(vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]);
        assert_eq!(
            builtin_rest(&[arr]),
            Ok(array(vec![Value::Integer(2), Value::Integer(3)]))
        );
        assert_eq!(builtin_rest(&[array(vec![])]), Ok(Value::Null));
    }

    #[test]
    fn test_push_copies_instead_of_mutating() {
        let original = array(vec![Value::Integer(1)]);
        let pushed = builtin_push(&[original.clone(), Value::Integer(2)]).unwrap();
        assert_eq!(
            pushed,
            array(vec![Value::Integer(1), Value::Integer(2)])
        );
        assert_eq!(original, array(vec![Value::Integer(1)]));
    }

    #[test]
    fn test_push_requires_array() {
        let err = builtin_push(&[Value::Integer(1), Value::Integer(2)]).unwrap_err();
        assert_eq!(err.message, "Argument to `push` must be ARRAY, got INTEGER");
    }
}
