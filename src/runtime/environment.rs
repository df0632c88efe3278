//! Lexically scoped variable environments
//!
//! Each environment owns its bindings and holds a shared reference to its
//! parent. Lookup walks outward through the parent chain. Closures keep
//! their defining environment alive through the same shared references,
//! which is exactly the lifetime the language needs.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::value::Value;

/// Shared handle to an environment. Function calls and closures alias
/// environments freely, so they live behind `Rc<RefCell<..>>`.
pub type Env = Rc<RefCell<Environment>>;

/// A single scope's bindings plus the link to its enclosing scope.
#[derive(Debug, Default)]
pub struct Environment {
    bindings: HashMap<String, Value>,
    parent: Option<Env>,
}

impl Environment {
    /// A root environment with no parent.
    pub fn new() -> Env {
        Rc::new(RefCell::new(Self::default()))
    }

    /// A child environment for a function call, parented at the closure's
    /// captured environment.
    pub fn new_enclosed(parent: Env) -> Env {
        Rc::new(RefCell::new(Self {
            bindings: HashMap::new(),
            parent: Some(parent),
        }))
    }

    /// Look up a name here or in any enclosing scope.
    pub fn get(&self, name: &str) -> Option<Value> {
        match self.bindings.get(name) {
            Some(value) => Some(value.clone()),
            None => self
                .parent
                .as_ref()
                .and_then(|parent| parent.borrow().get(name)),
        }
    }

    /// Bind a name in this scope, shadowing any outer binding.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    /// Names bound directly in this scope, sorted. Used by the REPL's
    /// environment dump.
    pub fn local_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.bindings.keys().cloned().collect();
        names.sort();
        names
    }
}
