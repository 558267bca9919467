use crate::value::Value;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

/// One scope in the lexical chain.
///
/// The interpreter owns the root (global) scope; every function call gets a
/// fresh scope whose parent is the environment the function was defined in.
#[derive(Debug, Default)]
pub struct Environment {
    values: RefCell<IndexMap<String, Value>>,
    globals: RefCell<HashSet<String>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent(parent: Rc<Environment>) -> Self {
        Self {
            parent: Some(parent),
            ..Self::default()
        }
    }

    /// Looks a name up in this scope, then each parent in turn.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.values.borrow().get(name) {
            return Some(value.clone());
        }
        self.parent.as_ref().and_then(|parent| parent.get(name))
    }

    /// Binds in this scope, ignoring `global` declarations.
    pub fn define(&self, name: &str, value: Value) {
        self.values.borrow_mut().insert(name.to_string(), value);
    }

    /// Binds the way an assignment statement does: in this scope, or in the
    /// root scope when the name was declared `global` here.
    pub fn assign(&self, name: &str, value: Value) {
        if self.is_global(name) {
            self.root().define(name, value);
        } else {
            self.define(name, value);
        }
    }

    pub fn declare_global(&self, name: &str) {
        if self.parent.is_some() {
            self.globals.borrow_mut().insert(name.to_string());
        }
    }

    pub fn is_global(&self, name: &str) -> bool {
        self.globals.borrow().contains(name)
    }

    fn root(&self) -> &Environment {
        let mut env = self;
        while let Some(parent) = &env.parent {
            env = parent;
        }
        env
    }

    /// Names bound directly in this scope, in definition order.
    #[cfg(test)]
    fn names(&self) -> Vec<String> {
        self.values.borrow().keys().cloned().collect()
    }
}
