use std::cell::RefCell;
use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;
use crate::interpreter::ast::{FunctionDecl, LiteralValue};
use crate::interpreter::environment::Environment;
use crate::interpreter::error::{RuntimeError, RuntimeResult};
use crate::interpreter::evaluator::{Interpreter, Unwind};
use crate::interpreter::lexer::Token;
use crate::util;

#[derive(Clone, Debug)]
pub enum Value {
    Nil,
    Boolean(bool),
    Number(f64),
    String(Rc<str>),
    Callable(Callable),
}

impl Value {
    /// `nil` and `false` are falsy, everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Boolean(false))
    }
}

/// Values of different kinds are never equal. Numbers compare by IEEE 754 rules,
/// callables by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Boolean(left), Value::Boolean(right)) => left == right,
            (Value::Number(left), Value::Number(right)) => left == right,
            (Value::String(left), Value::String(right)) => left == right,
            (Value::Callable(left), Value::Callable(right)) => left == right,
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Boolean(value) => write!(f, "{}", value),
            Value::Number(value) => f.write_str(&util::format_number(*value)),
            Value::String(value) => f.write_str(value),
            Value::Callable(callable) => write!(f, "{}", callable),
        }
    }
}

impl From<&LiteralValue> for Value {
    fn from(literal: &LiteralValue) -> Self {
        match literal {
            LiteralValue::Nil => Value::Nil,
            LiteralValue::Boolean(value) => Value::Boolean(*value),
            LiteralValue::Number(value) => Value::Number(*value),
            LiteralValue::String(value) => Value::String(Rc::from(value.as_str())),
        }
    }
}

impl From<Callable> for Value {
    fn from(callable: Callable) -> Self {
        Value::Callable(callable)
    }
}

#[derive(Clone, Debug)]
pub enum Callable {
    Function(Rc<Function>),
    Native(Rc<NativeFunction>),
}

impl Callable {
    pub fn name(&self) -> &str {
        match self {
            Callable::Function(function) => function.declaration.name.source(),
            Callable::Native(native) => native.name,
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Callable::Function(function) => function.declaration.params.len(),
            Callable::Native(native) => native.arity,
        }
    }

    /// Invokes the callable. The argument count has already been checked against
    /// [`Callable::arity`]; `paren` is the call site used for error reporting.
    pub fn call(&self, interpreter: &mut Interpreter, paren: &Token, arguments: Vec<Value>) -> RuntimeResult<Value> {
        match self {
            Callable::Function(function) => function.call(interpreter, arguments),
            Callable::Native(native) => (native.function)(interpreter, &arguments)
                .map_err(|message| RuntimeError::Native { token: paren.clone(), message }),
        }
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Callable::Function(left), Callable::Function(right)) => Rc::ptr_eq(left, right),
            (Callable::Native(left), Callable::Native(right)) => Rc::ptr_eq(left, right),
            _ => false,
        }
    }
}

impl Display for Callable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Callable::Function(function) => write!(f, "<fn {}>", function.declaration.name.source()),
            Callable::Native(native) => write!(f, "<native fn {}>", native.name),
        }
    }
}

/// A user-defined function together with the scope it was declared in.
pub struct Function {
    declaration: Rc<FunctionDecl>,
    closure: Rc<RefCell<Environment>>,
}

impl Function {
    pub fn new(declaration: Rc<FunctionDecl>, closure: Rc<RefCell<Environment>>) -> Function {
        Function { declaration, closure }
    }

    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>) -> RuntimeResult<Value> {
        // Parameters live in a fresh scope enclosed by the declaring scope, not the caller's
        let environment = Environment::new_with_parent(Rc::clone(&self.closure));

        {
            let mut environment_borrow = environment.borrow_mut();

            for (param, argument) in self.declaration.params.iter().zip(arguments) {
                environment_borrow.define(param.source(), argument);
            }
        }

        match interpreter.execute_block(&self.declaration.body, environment) {
            Ok(()) => Ok(Value::Nil),
            Err(Unwind::Return(value)) => Ok(value),
            Err(Unwind::Error(err)) => Err(err),
        }
    }
}

// The closure can (indirectly) contain this function again, so it is left out
impl Debug for Function {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Function({})", self.declaration.name.source())
    }
}

pub type NativeFn = fn(&mut Interpreter, &[Value]) -> Result<Value, String>;

/// A host-provided function. It has no captured scope.
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub function: NativeFn,
}

impl Debug for NativeFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "NativeFunction({}/{})", self.name, self.arity)
    }
}
