//! Runtime: values, environments, builtins and the evaluator.

pub mod builtins;
pub mod environment;
pub mod interpreter;
pub mod value;

pub use environment::{Env, Environment};
pub use interpreter::Evaluator;
pub use value::{HashKey, Value};
