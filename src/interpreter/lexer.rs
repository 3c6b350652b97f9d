use std::fmt::{Display, Formatter};
use std::str::Chars;
use crate::interpreter::error::LexerError;
use crate::util;


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenPos {
    pub line: i32,
    pub column: i32,
}

impl TokenPos {
    pub fn new(line: i32, column: i32) -> TokenPos {
        TokenPos { line, column }
    }

    pub fn begin() -> TokenPos {
        TokenPos::new(1, 1)
    }
}

impl Display for TokenPos {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line {} column {}]", self.line, self.column)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum TokenType {
    None,

    ParenthesisLeft, ParenthesisRight,
    BracketLeft, BracketRight,
    Dot, Comma, Semicolon,

    Assign, Equal,
    Not, NotEqual,
    Greater, GreaterEqual,
    Less, LessEqual,

    Plus, Minus,
    Multiply, Divide,

    Identifier,
    Number,
    String,

    // Keywords
    And, Class, Else, False,
    Fun, For, If, Nil, Or,
    Print, Return, Super, This,
    True, Var, While,

    // EOF
    Eof,
}

/// The value carried by a literal token.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    token_type: TokenType,
    source: String,
    literal: Option<Literal>,
    start: TokenPos,
}

impl Token {
    pub fn new(token_type: TokenType, source: String, literal: Option<Literal>, start: TokenPos) -> Token {
        Token {
            token_type, source, literal,
            start,
        }
    }

    pub fn empty() -> Token {
        Token {
            token_type: TokenType::None,
            source: String::from(""),
            literal: None,
            start: TokenPos::begin(),
        }
    }

    pub fn token_type(&self) -> TokenType { self.token_type }
    pub fn source(&self) -> &str { &self.source }
    pub fn literal(&self) -> Option<&Literal> { self.literal.as_ref() }
    pub fn start(&self) -> &TokenPos { &self.start }
    pub fn line(&self) -> i32 { self.start.line }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.token_type {
            TokenType::None => f.write_str("None"),
            TokenType::Eof => f.write_str("Eof"),
            _ => write!(f, "`{}`", self.source),
        }
    }
}

pub type LexerResult<T> = Result<T, LexerError>;

pub struct Lexer<'source> {
    input: &'source str,

    chars: Chars<'source>,
    peek_1: Option<char>,
    peek_2: Option<char>,

    start_index: usize,
    current_index: usize,

    start_pos: TokenPos,
    current_pos: TokenPos,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Lexer<'source> {
        Lexer {
            input: source,

            chars: source.chars(),
            peek_1: None,
            peek_2: None,

            start_index: 0,
            current_index: 0,

            start_pos: TokenPos::begin(),
            current_pos: TokenPos::begin(),
        }
    }

    /// Scans the whole input. The token list always ends with an [`TokenType::Eof`] token;
    /// errors do not stop scanning.
    pub fn scan_tokens(mut self) -> (Vec<Token>, Vec<LexerError>) {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();

        loop {
            match self.scan_token() {
                Ok(token) => {
                    let eof = token.token_type() == TokenType::Eof;
                    tokens.push(token);

                    if eof {
                        break;
                    }
                },
                Err(err) => errors.push(err),
            }
        }

        (tokens, errors)
    }

    pub fn scan_token(&mut self) -> LexerResult<Token> {
        loop {
            self.skip_whitespace();
            self.start_index = self.current_index;
            self.start_pos = self.current_pos;

            let c = match self.consume() {
                Some(c) => c,
                None => return Ok(self.make_token(TokenType::Eof)),
            };

            return match c {
                '(' => Ok(self.make_token(TokenType::ParenthesisLeft)),
                ')' => Ok(self.make_token(TokenType::ParenthesisRight)),
                '{' => Ok(self.make_token(TokenType::BracketLeft)),
                '}' => Ok(self.make_token(TokenType::BracketRight)),
                '.' => Ok(self.make_token(TokenType::Dot)),
                ',' => Ok(self.make_token(TokenType::Comma)),
                ';' => Ok(self.make_token(TokenType::Semicolon)),
                '+' => Ok(self.make_token(TokenType::Plus)),
                '-' => Ok(self.make_token(TokenType::Minus)),
                '*' => Ok(self.make_token(TokenType::Multiply)),

                '=' => Ok(if self.expect('=') { self.make_token(TokenType::Equal) } else {
                    self.make_token(TokenType::Assign)
                }),
                '!' => Ok(if self.expect('=') { self.make_token(TokenType::NotEqual) } else {
                    self.make_token(TokenType::Not)
                }),
                '>' => Ok(if self.expect('=') { self.make_token(TokenType::GreaterEqual) } else {
                    self.make_token(TokenType::Greater)
                }),
                '<' => Ok(if self.expect('=') { self.make_token(TokenType::LessEqual) } else {
                    self.make_token(TokenType::Less)
                }),

                '/' => if self.expect('/') {
                    self.skip_line();
                    continue;
                } else if self.expect('*') {
                    self.skip_block_comment()?;
                    continue;
                } else {
                    Ok(self.make_token(TokenType::Divide))
                },

                '"' => self.scan_string(),
                c if util::is_numeric(c) => Ok(self.scan_number()),
                c if util::is_alphabetic(c) => Ok(self.scan_identifier()),

                _ => Err(LexerError::UnexpectedCharacter(self.start_pos, c)),
            };
        }
    }

    fn scan_string(&mut self) -> LexerResult<Token> {
        while let Some(c) = self.peek() {
            if c == '"' {
                break;
            }

            self.consume();
        }

        if self.consume().is_none() {
            return Err(LexerError::UnterminatedString { pos: self.start_pos });
        }

        // Don't add leading and trailing '"' characters to the literal
        let value = self.input[(self.start_index + 1)..(self.current_index - 1)].to_owned();
        Ok(self.make_literal_token(TokenType::String, Literal::String(value)))
    }

    fn scan_number(&mut self) -> Token {
        while let Some('0'..='9') = self.peek() {
            self.consume();
        }

        if let Some('.') = self.peek() {
            if let Some('0'..='9') = self.peek_next() {
                self.consume();

                while let Some('0'..='9') = self.peek() {
                    self.consume();
                }
            }
        }

        let literal = &self.input[self.start_index..self.current_index];

        // Only digits with at most one inner '.' get here, which always parses
        let value = literal.parse::<f64>()
            .unwrap_or_else(|_| unreachable!("Lexer accepted invalid number literal {}", literal));

        self.make_literal_token(TokenType::Number, Literal::Number(value))
    }

    fn scan_identifier(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if !util::is_alphanumeric(c) {
                break;
            }

            self.consume();
        }

        let name = &self.input[self.start_index..self.current_index];
        let mut chars = name.chars();

        let token_type = match chars.next() {
            Some('a') => Lexer::check_keyword(name, 1, "and", TokenType::And),
            Some('c') => Lexer::check_keyword(name, 1, "class", TokenType::Class),
            Some('e') => Lexer::check_keyword(name, 1, "else", TokenType::Else),
            Some('f') => match chars.next() {
                Some('a') => Lexer::check_keyword(name, 2, "false", TokenType::False),
                Some('o') => Lexer::check_keyword(name, 2, "for", TokenType::For),
                Some('u') => Lexer::check_keyword(name, 2, "fun", TokenType::Fun),
                _ => TokenType::Identifier,
            },
            Some('i') => Lexer::check_keyword(name, 1, "if", TokenType::If),
            Some('n') => Lexer::check_keyword(name, 1, "nil", TokenType::Nil),
            Some('o') => Lexer::check_keyword(name, 1, "or", TokenType::Or),
            Some('p') => Lexer::check_keyword(name, 1, "print", TokenType::Print),
            Some('r') => Lexer::check_keyword(name, 1, "return", TokenType::Return),
            Some('s') => Lexer::check_keyword(name, 1, "super", TokenType::Super),
            Some('t') => match chars.next() {
                Some('h') => Lexer::check_keyword(name, 2, "this", TokenType::This),
                Some('r') => Lexer::check_keyword(name, 2, "true", TokenType::True),
                _ => TokenType::Identifier,
            },
            Some('v') => Lexer::check_keyword(name, 1, "var", TokenType::Var),
            Some('w') => Lexer::check_keyword(name, 1, "while", TokenType::While),
            _ => TokenType::Identifier,
        };

        self.make_token(token_type)
    }

    fn check_keyword(name: &str, start: usize, keyword: &'static str, token_type: TokenType) -> TokenType {
        if name[start..] == keyword[start..] {
            token_type
        } else {
            TokenType::Identifier
        }
    }

    fn make_token(&self, token_type: TokenType) -> Token {
        Token {
            token_type,
            source: self.input[self.start_index..self.current_index].to_owned(),
            literal: None,
            start: self.start_pos,
        }
    }

    fn make_literal_token(&self, token_type: TokenType, literal: Literal) -> Token {
        Token {
            literal: Some(literal),
            ..self.make_token(token_type)
        }
    }

    fn consume(&mut self) -> Option<char> {
        let c = match self.peek_1.take() {
            Some(c) => {
                self.peek_1 = self.peek_2.take();
                c
            },
            None => self.chars.next()?,
        };

        self.current_index += c.len_utf8();

        if c == '\n' {
            self.current_pos.line += 1;
            self.current_pos.column = 1;
        } else {
            self.current_pos.column += 1;
        }

        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        if self.peek_1.is_none() {
            self.peek_1 = self.chars.next();
        }

        self.peek_1
    }

    fn peek_next(&mut self) -> Option<char> {
        self.peek()?;

        if self.peek_2.is_none() {
            self.peek_2 = self.chars.next();
        }

        self.peek_2
    }

    fn expect(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.consume();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                return;
            }

            self.consume();
        }
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                return;
            }

            self.consume();
        }
    }

    fn skip_block_comment(&mut self) -> LexerResult<()> {
        let mut comment_count = 1;

        while let Some(c) = self.consume() {
            if c == '/' && self.expect('*') {
                comment_count += 1;
            } else if c == '*' && self.expect('/') {
                comment_count -= 1;
            }

            if comment_count <= 0 {
                return Ok(());
            }
        }

        Err(LexerError::UnterminatedComment { pos: self.start_pos })
    }
}
