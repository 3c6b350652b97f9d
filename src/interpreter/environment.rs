use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use crate::interpreter::error::{RuntimeError, RuntimeResult};
use crate::interpreter::lexer::Token;
use crate::interpreter::value::Value;

/// One scope of variable bindings.
///
/// Every child holds a strong reference to its enclosing scope: a closure may outlive the block
/// that created it, and the scope has to stay alive for as long as the closure does.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new_global() -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment::default()))
    }

    pub fn new_with_parent(parent: Rc<RefCell<Environment>>) -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment {
            values: HashMap::new(),
            enclosing: Some(parent),
        }))
    }

    /// Binds `name` in this scope, replacing an existing binding of the same name.
    pub fn define(&mut self, name: &str, value: Value) {
        tracing::trace!(name, "define");
        self.values.insert(name.to_owned(), value);
    }

    pub fn get(&self, name: &Token) -> RuntimeResult<Value> {
        if let Some(value) = self.values.get(name.source()) {
            return Ok(value.clone());
        }

        match &self.enclosing {
            Some(enclosing) => enclosing.borrow().get(name),
            None => Err(RuntimeError::UndefinedVariable(name.clone())),
        }
    }

    /// Overwrites the innermost existing binding of `name`. Never creates a new one.
    pub fn assign(&mut self, name: &Token, value: Value) -> RuntimeResult<()> {
        if let Some(slot) = self.values.get_mut(name.source()) {
            *slot = value;
            return Ok(());
        }

        match &self.enclosing {
            Some(enclosing) => enclosing.borrow_mut().assign(name, value),
            None => Err(RuntimeError::UndefinedVariable(name.clone())),
        }
    }

    #[cfg(test)]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
}
