use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use crate::interpreter::ast::{Expr, Stmt};
use crate::interpreter::environment::Environment;
use crate::interpreter::error::{RuntimeError, RuntimeResult};
use crate::interpreter::lexer::{Token, TokenType};
use crate::interpreter::natives;
use crate::interpreter::value::{Callable, Function, NativeFn, NativeFunction, Value};


/// Abrupt completion of a statement.
#[derive(Debug)]
pub enum Unwind {
    /// Travels up to the nearest function call, which turns it into the call's result.
    Return(Value),
    Error(RuntimeError),
}

impl From<RuntimeError> for Unwind {
    fn from(error: RuntimeError) -> Self {
        Unwind::Error(error)
    }
}

pub type ExecResult = Result<(), Unwind>;

pub struct Interpreter {
    globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,

    output: Box<dyn Write>,
}

impl Interpreter {
    /// Creates an interpreter that prints to stdout.
    pub fn new() -> Interpreter {
        Interpreter::with_output(Box::new(std::io::stdout()))
    }

    pub fn with_output(output: Box<dyn Write>) -> Interpreter {
        let globals = Environment::new_global();

        let mut interpreter = Interpreter {
            environment: Rc::clone(&globals),
            globals,
            output,
        };

        natives::define_natives(&mut interpreter);
        interpreter
    }

    pub fn define_native(&mut self, name: &'static str, arity: usize, function: NativeFn) {
        let native = Callable::Native(Rc::new(NativeFunction { name, arity, function }));
        self.globals.borrow_mut().define(name, native.into());
    }

    /// Executes the statements in order. The first runtime error aborts the rest of the program;
    /// changes made before it stay in effect.
    pub fn interpret(&mut self, statements: &[Stmt]) -> RuntimeResult<()> {
        tracing::debug!(statements = statements.len(), "interpreting program");

        for stmt in statements {
            match self.execute(stmt) {
                Ok(()) => {},
                Err(Unwind::Error(err)) => return Err(err),
                // Rejected by the parser outside of functions
                Err(Unwind::Return(_)) => break,
            }
        }

        Ok(())
    }

    // Statements

    fn execute(&mut self, stmt: &Stmt) -> ExecResult {
        match stmt {
            Stmt::Block(statements) => {
                let environment = Environment::new_with_parent(Rc::clone(&self.environment));
                self.execute_block(statements, environment)
            },
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(())
            },
            Stmt::Function(declaration) => {
                tracing::debug!(name = declaration.name.source(), params = declaration.params.len(), "declare function");

                let function = Function::new(Rc::clone(declaration), Rc::clone(&self.environment));
                let value = Value::Callable(Callable::Function(Rc::new(function)));
                self.environment.borrow_mut().define(declaration.name.source(), value);

                Ok(())
            },
            Stmt::If { condition, then, otherwise } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then)
                } else if let Some(otherwise) = otherwise {
                    self.execute(otherwise)
                } else {
                    Ok(())
                }
            },
            Stmt::Print { keyword, expr } => {
                let value = self.evaluate(expr)?;

                writeln!(self.output, "{}", value)
                    .map_err(|err| RuntimeError::Output { token: keyword.clone(), message: err.to_string() })?;
                Ok(())
            },
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(value) => self.evaluate(value)?,
                    None => Value::Nil,
                };

                Err(Unwind::Return(value))
            },
            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(initializer) => self.evaluate(initializer)?,
                    None => Value::Nil,
                };

                self.environment.borrow_mut().define(name.source(), value);
                Ok(())
            },
            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    self.execute(body)?;
                }

                Ok(())
            },
        }
    }

    /// Runs `statements` inside `environment` and restores the current scope afterwards,
    /// whether the block completes normally or not.
    pub fn execute_block(&mut self, statements: &[Stmt], environment: Rc<RefCell<Environment>>) -> ExecResult {
        tracing::trace!(statements = statements.len(), "enter block");

        let previous = std::mem::replace(&mut self.environment, environment);
        let result = statements.iter().try_for_each(|stmt| self.execute(stmt));
        self.environment = previous;

        result
    }

    // Expressions

    fn evaluate(&mut self, expr: &Expr) -> RuntimeResult<Value> {
        match expr {
            Expr::Assign { name, value } => {
                let value = self.evaluate(value)?;
                self.environment.borrow_mut().assign(name, value.clone())?;

                Ok(value)
            },
            Expr::Binary { left, operator, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;

                Self::evaluate_binary(left, operator, right)
            },
            Expr::Grouping(expr) => self.evaluate(expr),
            Expr::Literal(value) => Ok(Value::from(value)),
            Expr::Logical { left, operator, right } => {
                let left = self.evaluate(left)?;

                let short_circuit = if operator.token_type() == TokenType::Or {
                    left.is_truthy()
                } else {
                    !left.is_truthy()
                };

                if short_circuit {
                    Ok(left)
                } else {
                    self.evaluate(right)
                }
            },
            Expr::Unary { operator, expr } => {
                let operand = self.evaluate(expr)?;

                match operator.token_type() {
                    TokenType::Minus => match operand {
                        Value::Number(value) => Ok(Value::Number(-value)),
                        _ => Err(RuntimeError::OperandMustBeNumber(operator.clone())),
                    },
                    TokenType::Not => Ok(Value::Boolean(!operand.is_truthy())),
                    _ => unreachable!("Parser produced unary operator {}", operator),
                }
            },
            Expr::Variable(name) => self.environment.borrow().get(name),
            Expr::Call { callee, paren, args } => {
                let callee = self.evaluate(callee)?;

                let mut arguments = Vec::with_capacity(args.len());

                for arg in args {
                    arguments.push(self.evaluate(arg)?);
                }

                self.call(callee, paren, arguments)
            },
        }
    }

    fn evaluate_binary(left: Value, operator: &Token, right: Value) -> RuntimeResult<Value> {
        match operator.token_type() {
            TokenType::Plus => match (left, right) {
                (Value::Number(left), Value::Number(right)) => Ok(Value::Number(left + right)),
                (Value::String(left), Value::String(right)) => {
                    let mut concatenated = String::with_capacity(left.len() + right.len());
                    concatenated.push_str(&left);
                    concatenated.push_str(&right);

                    Ok(Value::String(Rc::from(concatenated)))
                },
                _ => Err(RuntimeError::InvalidAddition(operator.clone())),
            },
            TokenType::Equal => Ok(Value::Boolean(left == right)),
            TokenType::NotEqual => Ok(Value::Boolean(left != right)),
            _ => {
                let (left, right) = match (left, right) {
                    (Value::Number(left), Value::Number(right)) => (left, right),
                    _ => return Err(RuntimeError::OperandsMustBeNumbers(operator.clone())),
                };

                Ok(match operator.token_type() {
                    TokenType::Minus => Value::Number(left - right),
                    TokenType::Multiply => Value::Number(left * right),
                    TokenType::Divide => Value::Number(left / right),
                    TokenType::Greater => Value::Boolean(left > right),
                    TokenType::GreaterEqual => Value::Boolean(left >= right),
                    TokenType::Less => Value::Boolean(left < right),
                    TokenType::LessEqual => Value::Boolean(left <= right),
                    _ => unreachable!("Parser produced binary operator {}", operator),
                })
            },
        }
    }

    fn call(&mut self, callee: Value, paren: &Token, arguments: Vec<Value>) -> RuntimeResult<Value> {
        let callable = match callee {
            Value::Callable(callable) => callable,
            _ => return Err(RuntimeError::NotCallable(paren.clone())),
        };

        if arguments.len() != callable.arity() {
            return Err(RuntimeError::ArityMismatch {
                token: paren.clone(),
                expected: callable.arity(),
                got: arguments.len(),
            });
        }

        tracing::debug!(name = callable.name(), arguments = arguments.len(), "call");
        callable.call(self, paren, arguments)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}
