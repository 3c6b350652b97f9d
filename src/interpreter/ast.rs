use std::fmt::{Display, Formatter};
use std::rc::Rc;
use crate::interpreter::lexer::Token;
use crate::util;

#[derive(Clone, Debug, PartialEq)]
pub enum LiteralValue {
    Nil,
    Boolean(bool),
    Number(f64),
    String(String),
}

impl Display for LiteralValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LiteralValue::Nil => f.write_str("nil"),
            LiteralValue::Boolean(value) => write!(f, "{}", value),
            LiteralValue::Number(value) => f.write_str(&util::format_number(*value)),
            LiteralValue::String(value) => write!(f, "\"{}\"", value),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Assign {
        name: Token,
        value: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    Grouping(Box<Expr>),
    Literal(LiteralValue),
    /// Short-circuiting `and` / `or`
    Logical {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    Unary {
        operator: Token,
        expr: Box<Expr>,
    },
    Variable(Token),
    Call {
        callee: Box<Expr>,
        paren: Token, // for error reporting
        args: Vec<Expr>,
    },
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Assign { name, value } => write!(f, "(= {} {})", name.source(), value),
            Expr::Binary { left, operator, right }
            | Expr::Logical { left, operator, right } => write!(f, "({} {} {})", operator.source(), left, right),
            Expr::Grouping(expr) => write!(f, "(group {})", expr),
            Expr::Literal(value) => write!(f, "{}", value),
            Expr::Unary { operator, expr } => write!(f, "({} {})", operator.source(), expr),
            Expr::Variable(name) => f.write_str(name.source()),
            Expr::Call { callee, args, .. } => {
                write!(f, "(call {}", callee)?;

                for arg in args {
                    write!(f, " {}", arg)?;
                }

                f.write_str(")")
            },
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct FunctionDecl {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Block(Vec<Stmt>),
    Expression(Expr),
    /// Shared so that function values can keep their declaration alive without copying the body
    Function(Rc<FunctionDecl>),
    If {
        condition: Expr,
        then: Box<Stmt>,
        otherwise: Option<Box<Stmt>>,
    },
    Print {
        keyword: Token, // for error reporting
        expr: Expr,
    },
    Return {
        keyword: Token,
        value: Option<Expr>,
    },
    Var {
        name: Token,
        initializer: Option<Expr>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
}

impl Display for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Stmt::Block(statements) => write!(f, "{{ {} }}", statements.iter().map(|stmt| stmt.to_string())
                .collect::<Vec<String>>().join(" ")),
            Stmt::Expression(expr) => write!(f, "{};", expr),
            Stmt::Function(decl) => write!(f, "fun {}({}) {{ {} }}", decl.name.source(),
                decl.params.iter().map(|param| param.source().to_owned()).collect::<Vec<String>>().join(", "),
                decl.body.iter().map(|stmt| stmt.to_string()).collect::<Vec<String>>().join(" ")),
            Stmt::If { condition, then, otherwise } => {
                write!(f, "if {} {}", condition, then)?;

                if let Some(otherwise) = otherwise {
                    write!(f, " else {}", otherwise)?;
                }

                Ok(())
            },
            Stmt::Print { expr, .. } => write!(f, "print {};", expr),
            Stmt::Return { value: Some(value), .. } => write!(f, "return {};", value),
            Stmt::Return { value: None, .. } => f.write_str("return;"),
            Stmt::Var { name, initializer: Some(initializer) } => write!(f, "var {} = {};", name.source(), initializer),
            Stmt::Var { name, initializer: None } => write!(f, "var {};", name.source()),
            Stmt::While { condition, body } => write!(f, "while {} {}", condition, body),
        }
    }
}
