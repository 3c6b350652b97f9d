use thiserror::Error;
use crate::interpreter::lexer::{Token, TokenPos, TokenType};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexerError {
    #[error("{0} Unexpected character '{1}'")]
    UnexpectedCharacter(TokenPos, char),
    #[error("{pos} Unterminated string")]
    UnterminatedString {
        pos: TokenPos,
    },
    #[error("{pos} Unterminated block comment")]
    UnterminatedComment {
        pos: TokenPos,
    },
}

impl LexerError {
    pub fn get_pos(&self) -> TokenPos {
        match self {
            LexerError::UnexpectedCharacter(pos, _) => *pos,
            LexerError::UnterminatedString { pos } => *pos,
            LexerError::UnterminatedComment { pos } => *pos,
        }
    }

    pub fn message(&self) -> String {
        match self {
            LexerError::UnexpectedCharacter(_, c) => format!("Unexpected character '{}'.", c),
            LexerError::UnterminatedString { .. } => String::from("Unterminated string."),
            LexerError::UnterminatedComment { .. } => String::from("Unterminated block comment."),
        }
    }
}

/// A lexical or syntactic error. Any of these suppresses evaluation of the whole program.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{pos} Error{location}: {message}")]
pub struct StaticError {
    pub pos: TokenPos,
    pub location: String,
    pub message: String,
}

impl StaticError {
    pub fn at_token(token: &Token, message: &str) -> StaticError {
        let location = if token.token_type() == TokenType::Eof {
            String::from(" at end")
        } else {
            format!(" at '{}'", token.source())
        };

        StaticError { pos: *token.start(), location, message: message.to_owned() }
    }
}

impl From<LexerError> for StaticError {
    fn from(error: LexerError) -> Self {
        StaticError { pos: error.get_pos(), location: String::new(), message: error.message() }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("Undefined variable '{}'.", .0.source())]
    UndefinedVariable(Token),
    #[error("Operand must be a number.")]
    OperandMustBeNumber(Token),
    #[error("Operands must be numbers.")]
    OperandsMustBeNumbers(Token),
    #[error("Operands must be two numbers or two strings.")]
    InvalidAddition(Token),
    #[error("Can only call functions and classes.")]
    NotCallable(Token),
    #[error("Expected {expected} arguments but got {got}.")]
    ArityMismatch {
        token: Token,
        expected: usize,
        got: usize,
    },
    #[error("{message}")]
    Native {
        token: Token,
        message: String,
    },
    #[error("Failed to write output: {message}")]
    Output {
        token: Token,
        message: String,
    },
}

impl RuntimeError {
    pub fn token(&self) -> &Token {
        match self {
            RuntimeError::UndefinedVariable(token)
            | RuntimeError::OperandMustBeNumber(token)
            | RuntimeError::OperandsMustBeNumbers(token)
            | RuntimeError::InvalidAddition(token)
            | RuntimeError::NotCallable(token) => token,
            RuntimeError::ArityMismatch { token, .. }
            | RuntimeError::Native { token, .. }
            | RuntimeError::Output { token, .. } => token,
        }
    }

    /// The one-line diagnostic plus the line it came from.
    pub fn report(&self) -> String {
        format!("{}\n[line {}]", self, self.token().line())
    }
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum LoxError {
    #[error("{} static error(s)", .0.len())]
    Static(Vec<StaticError>),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LoxError {
    pub fn exit_code(&self) -> u8 {
        match self {
            LoxError::Static(_) => 65,
            LoxError::Runtime(_) => 70,
            LoxError::Io(_) => 74,
        }
    }
}
