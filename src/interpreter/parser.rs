use std::rc::Rc;
use lazy_static::lazy_static;
use crate::interpreter::ast::{Expr, FunctionDecl, LiteralValue, Stmt};
use crate::interpreter::error::StaticError;
use crate::interpreter::lexer::{Lexer, Literal, Token, TokenType};

#[cfg(test)]
mod tests;

/// Upper bound on the number of call arguments and function parameters.
pub const MAX_ARGUMENTS: usize = 255;

lazy_static! {
    /// Tokens that start a new statement; error recovery stops right before them.
    static ref STATEMENT_START_TYPES: [TokenType; 8] = [
        TokenType::Class, TokenType::Fun, TokenType::Var,
        TokenType::For, TokenType::If, TokenType::While,
        TokenType::Print, TokenType::Return,
    ];

    static ref EQUALITY_OPERATORS: [TokenType; 2] = [TokenType::Equal, TokenType::NotEqual];
    static ref COMPARISON_OPERATORS: [TokenType; 4] = [
        TokenType::Greater, TokenType::GreaterEqual,
        TokenType::Less, TokenType::LessEqual,
    ];
    static ref TERM_OPERATORS: [TokenType; 2] = [TokenType::Plus, TokenType::Minus];
    static ref FACTOR_OPERATORS: [TokenType; 2] = [TokenType::Multiply, TokenType::Divide];
    static ref UNARY_OPERATORS: [TokenType; 2] = [TokenType::Not, TokenType::Minus];
}

/// Unwinds the parser to the enclosing declaration after an error has been recorded.
#[derive(Debug)]
struct ParseError;

type ParseResult<T> = Result<T, ParseError>;

pub struct Parser<'source> {
    lexer: Lexer<'source>,
    previous: Token, current: Token,

    function_depth: usize,
    errors: Vec<StaticError>,
}

impl<'source> Parser<'source> {
    pub fn new(lexer: Lexer<'source>) -> Parser<'source> {
        Parser {
            lexer,
            previous: Token::empty(), current: Token::empty(),
            function_depth: 0,
            errors: Vec::new(),
        }
    }

    pub fn had_error(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[StaticError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<StaticError> {
        self.errors
    }

    // Declaration parsing

    pub fn parse(&mut self) -> Vec<Stmt> {
        self.consume();

        let mut statements = Vec::new();

        while !self.is_eof() {
            if let Some(stmt) = self.parse_declaration() {
                statements.push(stmt);
            }
        }

        tracing::debug!(statements = statements.len(), errors = self.errors.len(), "parsed program");
        statements
    }

    fn parse_declaration(&mut self) -> Option<Stmt> {
        let result = if self.matches(TokenType::Fun) {
            self.parse_function_declaration("function")
        } else if self.matches(TokenType::Var) {
            self.parse_var_declaration()
        } else {
            self.parse_statement()
        };

        match result {
            Ok(stmt) => Some(stmt),
            Err(ParseError) => {
                self.synchronize();
                None
            },
        }
    }

    fn parse_function_declaration(&mut self, kind: &str) -> ParseResult<Stmt> {
        let name = self.expect(TokenType::Identifier, &format!("Expect {} name.", kind))?;
        self.expect(TokenType::ParenthesisLeft, &format!("Expect '(' after {} name.", kind))?;

        let mut params = vec![];

        if !self.check(TokenType::ParenthesisRight) {
            loop {
                if params.len() >= MAX_ARGUMENTS {
                    self.error_at_current(&format!("Can't have more than {} parameters.", MAX_ARGUMENTS));
                }

                params.push(self.expect(TokenType::Identifier, "Expect parameter name.")?);

                if !self.matches(TokenType::Comma) {
                    break;
                }
            }
        }

        self.expect(TokenType::ParenthesisRight, "Expect ')' after parameters.")?;
        self.expect(TokenType::BracketLeft, &format!("Expect '{{' before {} body.", kind))?;

        self.function_depth += 1;
        let body = self.parse_block();
        self.function_depth -= 1;

        Ok(Stmt::Function(Rc::new(FunctionDecl { name, params, body: body? })))
    }

    fn parse_var_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.expect(TokenType::Identifier, "Expect variable name.")?;

        let initializer = if self.matches(TokenType::Assign) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        self.expect_statement_end("Expect ';' after variable declaration.")?;
        Ok(Stmt::Var { name, initializer })
    }

    // Statement parsing

    fn parse_statement(&mut self) -> ParseResult<Stmt> {
        if self.matches(TokenType::For) {
            self.parse_for_statement()
        } else if self.matches(TokenType::If) {
            self.parse_if_statement()
        } else if self.matches(TokenType::Print) {
            self.parse_print_statement()
        } else if self.matches(TokenType::Return) {
            self.parse_return_statement()
        } else if self.matches(TokenType::While) {
            self.parse_while_statement()
        } else if self.matches(TokenType::BracketLeft) {
            Ok(Stmt::Block(self.parse_block()?))
        } else {
            self.parse_expression_statement()
        }
    }

    /// `for` has no node of its own; it is rewritten into a block around a `while` loop.
    fn parse_for_statement(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenType::ParenthesisLeft, "Expect '(' after 'for'.")?;

        let initializer = if self.matches(TokenType::Semicolon) {
            None
        } else if self.matches(TokenType::Var) {
            Some(self.parse_var_declaration()?)
        } else {
            Some(self.parse_expression_statement()?)
        };

        let condition = if !self.check(TokenType::Semicolon) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        self.expect(TokenType::Semicolon, "Expect ';' after loop condition.")?;

        let increment = if !self.check(TokenType::ParenthesisRight) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        self.expect(TokenType::ParenthesisRight, "Expect ')' after for clauses.")?;

        let mut body = self.parse_statement()?;

        if let Some(increment) = increment {
            body = Stmt::Block(vec![body, Stmt::Expression(increment)]);
        }

        body = Stmt::While {
            condition: condition.unwrap_or(Expr::Literal(LiteralValue::Boolean(true))),
            body: Box::new(body),
        };

        if let Some(initializer) = initializer {
            body = Stmt::Block(vec![initializer, body]);
        }

        Ok(body)
    }

    fn parse_if_statement(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenType::ParenthesisLeft, "Expect '(' after 'if'.")?;
        let condition = self.parse_expression()?;
        self.expect(TokenType::ParenthesisRight, "Expect ')' after if condition.")?;

        let then = Box::new(self.parse_statement()?);
        let otherwise = if self.matches(TokenType::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(Stmt::If { condition, then, otherwise })
    }

    fn parse_print_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous.clone();
        let expr = self.parse_expression()?;
        self.expect_statement_end("Expect ';' after value.")?;

        Ok(Stmt::Print { keyword, expr })
    }

    fn parse_return_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous.clone();

        if self.function_depth == 0 {
            self.error("Can't return from top-level code.");
        }

        let value = if !self.check(TokenType::Semicolon) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        self.expect_statement_end("Expect ';' after return value.")?;
        Ok(Stmt::Return { keyword, value })
    }

    fn parse_while_statement(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenType::ParenthesisLeft, "Expect '(' after 'while'.")?;
        let condition = self.parse_expression()?;
        self.expect(TokenType::ParenthesisRight, "Expect ')' after condition.")?;

        let body = Box::new(self.parse_statement()?);
        Ok(Stmt::While { condition, body })
    }

    fn parse_expression_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.parse_expression()?;
        self.expect_statement_end("Expect ';' after expression.")?;

        Ok(Stmt::Expression(expr))
    }

    fn parse_block(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();

        while !self.check(TokenType::BracketRight) && !self.is_eof() {
            if let Some(stmt) = self.parse_declaration() {
                statements.push(stmt);
            }
        }

        self.expect(TokenType::BracketRight, "Expect '}' after block.")?;
        Ok(statements)
    }

    // Expression parsing

    fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.parse_or()?;

        if self.matches(TokenType::Assign) {
            let equals = self.previous.clone();
            let value = self.parse_assignment()?;

            return match expr {
                Expr::Variable(name) => Ok(Expr::Assign { name, value: Box::new(value) }),
                expr => {
                    // Reported, but there is no need to resynchronize
                    self.error_at(&equals, "Invalid assignment target.");
                    Ok(expr)
                },
            };
        }

        Ok(expr)
    }

    fn parse_or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_and()?;

        while self.matches(TokenType::Or) {
            let operator = self.previous.clone();
            let right = self.parse_and()?;

            expr = Expr::Logical { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn parse_and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_equality()?;

        while self.matches(TokenType::And) {
            let operator = self.previous.clone();
            let right = self.parse_equality()?;

            expr = Expr::Logical { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn parse_equality(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_comparison()?;

        while self.matches_any(&*EQUALITY_OPERATORS) {
            let operator = self.previous.clone();
            let right = self.parse_comparison()?;

            expr = Expr::Binary { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_term()?;

        while self.matches_any(&*COMPARISON_OPERATORS) {
            let operator = self.previous.clone();
            let right = self.parse_term()?;

            expr = Expr::Binary { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn parse_term(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_factor()?;

        while self.matches_any(&*TERM_OPERATORS) {
            let operator = self.previous.clone();
            let right = self.parse_factor()?;

            expr = Expr::Binary { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn parse_factor(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_unary()?;

        while self.matches_any(&*FACTOR_OPERATORS) {
            let operator = self.previous.clone();
            let right = self.parse_unary()?;

            expr = Expr::Binary { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        if self.matches_any(&*UNARY_OPERATORS) {
            let operator = self.previous.clone();
            let right = self.parse_unary()?;

            return Ok(Expr::Unary { operator, expr: Box::new(right) });
        }

        self.parse_call()
    }

    fn parse_call(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;

        while self.matches(TokenType::ParenthesisLeft) {
            expr = self.finish_call(expr)?;
        }

        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let mut arguments = vec![];

        if !self.check(TokenType::ParenthesisRight) {
            loop {
                if arguments.len() >= MAX_ARGUMENTS {
                    self.error_at_current(&format!("Can't have more than {} arguments.", MAX_ARGUMENTS));
                }

                arguments.push(self.parse_expression()?);

                if !self.matches(TokenType::Comma) {
                    break;
                }
            }
        }

        let paren = self.expect(TokenType::ParenthesisRight, "Expect ')' after arguments.")?;
        Ok(Expr::Call { callee: Box::new(callee), paren, args: arguments })
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        if self.matches(TokenType::False) {
            return Ok(Expr::Literal(LiteralValue::Boolean(false)));
        } else if self.matches(TokenType::True) {
            return Ok(Expr::Literal(LiteralValue::Boolean(true)));
        } else if self.matches(TokenType::Nil) {
            return Ok(Expr::Literal(LiteralValue::Nil));
        } else if self.matches_any(&[TokenType::Number, TokenType::String]) {
            return Ok(Expr::Literal(match self.previous.literal() {
                Some(Literal::Number(value)) => LiteralValue::Number(*value),
                Some(Literal::String(value)) => LiteralValue::String(value.clone()),
                None => LiteralValue::Nil,
            }));
        } else if self.matches(TokenType::Identifier) {
            return Ok(Expr::Variable(self.previous.clone()));
        } else if self.matches(TokenType::ParenthesisLeft) {
            let expr = self.parse_expression()?;
            self.expect(TokenType::ParenthesisRight, "Expect ')' after expression.")?;

            return Ok(Expr::Grouping(Box::new(expr)));
        }

        Err(self.error_at_current("Expect expression."))
    }

    fn consume(&mut self) {
        std::mem::swap(&mut self.previous, &mut self.current); // self.previous = self.current; self.current gets replaced below

        loop {
            match self.lexer.scan_token() {
                Ok(token) => {
                    self.current = token;
                    break;
                },
                Err(err) => self.errors.push(err.into()),
            }
        }
    }

    fn expect(&mut self, token_type: TokenType, message: &str) -> ParseResult<Token> {
        if self.current.token_type() == token_type {
            self.consume();
            return Ok(self.previous.clone());
        }

        Err(self.error_at_current(message))
    }

    #[inline]
    fn expect_statement_end(&mut self, message: &str) -> ParseResult<Token> {
        self.expect(TokenType::Semicolon, message)
    }

    fn matches(&mut self, token_type: TokenType) -> bool { // Should be called "match", but that's a keyword
        if !self.check(token_type) {
            return false;
        }

        self.consume();
        true
    }

    fn matches_any(&mut self, token_types: &[TokenType]) -> bool {
        for token_type in token_types {
            if self.check(*token_type) {
                self.consume();
                return true;
            }
        }

        false
    }

    #[inline]
    fn check(&self, token_type: TokenType) -> bool {
        self.current.token_type() == token_type
    }

    fn is_eof(&self) -> bool {
        self.current.token_type() == TokenType::Eof
    }

    // Error handling

    /// Discards tokens until just past a `;` or right before a token that starts a statement.
    fn synchronize(&mut self) {
        self.consume();

        while !self.is_eof() {
            if self.previous.token_type() == TokenType::Semicolon {
                return;
            }

            if STATEMENT_START_TYPES.contains(&self.current.token_type()) {
                return;
            }

            self.consume();
        }
    }

    fn error_at_current(&mut self, message: &str) -> ParseError {
        let token = self.current.clone();
        self.error_at(&token, message)
    }

    fn error(&mut self, message: &str) -> ParseError {
        let token = self.previous.clone();
        self.error_at(&token, message)
    }

    fn error_at(&mut self, token: &Token, message: &str) -> ParseError {
        self.errors.push(StaticError::at_token(token, message));
        ParseError
    }
}
