//! The environment chain (spec §3.5).
//!
//! A frame owns a flat name -> value map and a link to its enclosing
//! frame. The chain forms a tree rather than a single stack because a
//! dynamic-bound call's frame links back to the *caller's* frame instead
//! of the top-level one (spec §9's "closure substitute"), so two different
//! call chains can each reach the same ancestor frame at once — hence
//! `Rc<RefCell<_>>` rather than a `Vec`-backed stack.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::value::Value;

use super::error::{EvalResult, RuntimeError};

pub type EnvRef = Rc<RefCell<Environment>>;

#[derive(Debug)]
pub struct Environment {
    vars: HashMap<String, Value>,
    parent: Option<EnvRef>,
}

impl Environment {
    pub fn root() -> EnvRef {
        Rc::new(RefCell::new(Environment {
            vars: HashMap::new(),
            parent: None,
        }))
    }

    pub fn child_of(parent: &EnvRef) -> EnvRef {
        Rc::new(RefCell::new(Environment {
            vars: HashMap::new(),
            parent: Some(Rc::clone(parent)),
        }))
    }

    /// Bind a new name in this frame. Redeclaration in the same frame is
    /// a runtime error (spec §3.5, §4.6).
    pub fn declare(&mut self, name: &str, value: Value) -> EvalResult<()> {
        if self.vars.contains_key(name) {
            return Err(RuntimeError::new(format!("variable '{name}' redeclared in this scope")));
        }
        self.vars.insert(name.to_string(), value);
        Ok(())
    }

    /// Force-bind a name in this frame, overwriting any existing value.
    /// Used for parameter binding, where "redeclaration" does not apply.
    pub fn bind(&mut self, name: &str, value: Value) {
        self.vars.insert(name.to_string(), value);
    }
}

/// Walk the chain from `env` outward until `name` is found, reading its
/// current value (spec §3.5's `lookup`, grounded on the original
/// `searchVariable`'s outer-env walk).
pub fn lookup(env: &EnvRef, name: &str) -> EvalResult<Value> {
    let mut current = Rc::clone(env);
    loop {
        if let Some(value) = current.borrow().vars.get(name) {
            return Ok(value.clone());
        }
        let parent = current.borrow().parent.clone();
        match parent {
            Some(p) => current = p,
            None => return Err(RuntimeError::new(format!("undefined variable '{name}'"))),
        }
    }
}

/// Walk the chain from `env` outward and overwrite `name`'s value in
/// whichever frame already binds it.
pub fn assign(env: &EnvRef, name: &str, value: Value) -> EvalResult<()> {
    let mut current = Rc::clone(env);
    loop {
        if current.borrow().vars.contains_key(name) {
            current.borrow_mut().vars.insert(name.to_string(), value);
            return Ok(());
        }
        let parent = current.borrow().parent.clone();
        match parent {
            Some(p) => current = p,
            None => return Err(RuntimeError::new(format!("undefined variable '{name}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_outward_through_parent_frames() {
        let root = Environment::root();
        root.borrow_mut().declare("x", Value::Int(1)).unwrap();
        let child = Environment::child_of(&root);
        assert_eq!(lookup(&child, "x").unwrap().to_int(), 1);
    }

    #[test]
    fn redeclaration_in_same_frame_is_an_error() {
        let root = Environment::root();
        root.borrow_mut().declare("x", Value::Int(1)).unwrap();
        assert!(root.borrow_mut().declare("x", Value::Int(2)).is_err());
    }

    #[test]
    fn assign_mutates_the_defining_frame_not_a_shadowing_child() {
        let root = Environment::root();
        root.borrow_mut().declare("x", Value::Int(1)).unwrap();
        let child = Environment::child_of(&root);
        assign(&child, "x", Value::Int(42)).unwrap();
        assert_eq!(lookup(&root, "x").unwrap().to_int(), 42);
    }

    #[test]
    fn assign_to_undefined_name_is_an_error() {
        let root = Environment::root();
        assert!(assign(&root, "missing", Value::Int(0)).is_err());
    }
}
