//! Safe arithmetic evaluator
//!
//! Grammar:
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/' | '%') unary)*
//! unary   := ('+' | '-') unary | primary
//! primary := number | '(' expr ')' | 'sqrt' '(' expr ')'
//! ```
//! Anything else is rejected before evaluation. `%` is floored modulo: the
//! result takes the sign of the divisor. Parentheses and `sqrt` calls nest at
//! most [`MAX_NESTING`] deep.

use std::fmt;

/// Deepest accepted nesting of `(` and `sqrt(`
pub const MAX_NESTING: usize = 256;

/// Evaluation failures
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalcError {
    #[error("Invalid characters in expression")]
    InvalidCharacters,

    #[error("Empty expression")]
    Empty,

    #[error("Invalid number literal '{0}'")]
    InvalidNumber(String),

    #[error("Unexpected token '{0}'")]
    UnexpectedToken(String),

    #[error("Unexpected end of expression")]
    UnexpectedEnd,

    #[error("division by zero")]
    DivisionByZero,

    #[error("modulo by zero")]
    ModuloByZero,

    #[error("math domain error")]
    MathDomain,

    #[error("result is not a finite number")]
    NonFinite,

    #[error("Expression nested deeper than {MAX_NESTING} levels")]
    TooDeep,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    LParen,
    RParen,
    Sqrt,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Percent => write!(f, "%"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Sqrt => write!(f, "sqrt"),
        }
    }
}

/// Evaluate an arithmetic expression
pub fn evaluate(expression: &str) -> Result<f64, CalcError> {
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err(CalcError::Empty);
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    if let Some(tok) = parser.peek() {
        return Err(CalcError::UnexpectedToken(tok.to_string()));
    }
    if !value.is_finite() {
        return Err(CalcError::NonFinite);
    }
    Ok(value)
}

fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '+' => push(&mut tokens, &mut i, Token::Plus),
            '-' => push(&mut tokens, &mut i, Token::Minus),
            '*' => push(&mut tokens, &mut i, Token::Star),
            '/' => push(&mut tokens, &mut i, Token::Slash),
            '%' => push(&mut tokens, &mut i, Token::Percent),
            '(' => push(&mut tokens, &mut i, Token::LParen),
            ')' => push(&mut tokens, &mut i, Token::RParen),
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| CalcError::InvalidNumber(literal.clone()))?;
                tokens.push(Token::Number(value));
            }
            's' if chars[i..].starts_with(&['s', 'q', 'r', 't']) => {
                tokens.push(Token::Sqrt);
                i += 4;
            }
            _ => return Err(CalcError::InvalidCharacters),
        }
    }

    Ok(tokens)
}

fn push(tokens: &mut Vec<Token>, i: &mut usize, token: Token) {
    tokens.push(token);
    *i += 1;
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.peek();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, expected: Token) -> Result<(), CalcError> {
        match self.next() {
            Some(tok) if tok == expected => Ok(()),
            Some(tok) => Err(CalcError::UnexpectedToken(tok.to_string())),
            None => Err(CalcError::UnexpectedEnd),
        }
    }

    fn expr(&mut self) -> Result<f64, CalcError> {
        let mut value = self.term()?;
        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == Token::Plus { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, CalcError> {
        let mut value = self.unary()?;
        while let Some(op @ (Token::Star | Token::Slash | Token::Percent)) = self.peek() {
            self.pos += 1;
            let rhs = self.unary()?;
            value = match op {
                Token::Star => value * rhs,
                Token::Slash => {
                    if rhs == 0.0 {
                        return Err(CalcError::DivisionByZero);
                    }
                    value / rhs
                }
                _ => {
                    if rhs == 0.0 {
                        return Err(CalcError::ModuloByZero);
                    }
                    value - rhs * (value / rhs).floor()
                }
            };
        }
        Ok(value)
    }

    // Sign runs are folded in a loop so `- - - ... 1` cannot recurse.
    fn unary(&mut self) -> Result<f64, CalcError> {
        let mut negate = false;
        while let Some(sign @ (Token::Minus | Token::Plus)) = self.peek() {
            self.pos += 1;
            if sign == Token::Minus {
                negate = !negate;
            }
        }
        let value = self.primary()?;
        Ok(if negate { -value } else { value })
    }

    fn nested(&mut self) -> Result<f64, CalcError> {
        if self.depth >= MAX_NESTING {
            return Err(CalcError::TooDeep);
        }
        self.depth += 1;
        let value = self.expr();
        self.depth -= 1;
        value
    }

    fn primary(&mut self) -> Result<f64, CalcError> {
        match self.next() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::LParen) => {
                let value = self.nested()?;
                self.expect(Token::RParen)?;
                Ok(value)
            }
            Some(Token::Sqrt) => {
                self.expect(Token::LParen)?;
                let value = self.nested()?;
                self.expect(Token::RParen)?;
                if value < 0.0 {
                    return Err(CalcError::MathDomain);
                }
                Ok(value.sqrt())
            }
            Some(tok) => Err(CalcError::UnexpectedToken(tok.to_string())),
            None => Err(CalcError::UnexpectedEnd),
        }
    }
}
