pub mod ast;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod natives;
pub mod parser;
pub mod value;
