//! OpenSBP expression evaluation
//!
//! Supports the expression forms generated programs use: numeric and string
//! literals, `&VARIABLE` references, `%(n)` position registers, the four
//! arithmetic operators, unary minus and parentheses.
//!
//! `+` concatenates as soon as either side is text; every other operator
//! coerces text to a number and fails if it cannot.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Errors raised while evaluating an expression
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    /// A character that starts no token
    #[error("Unexpected character '{0}'")]
    UnexpectedChar(char),

    /// A string literal without its closing quote
    #[error("Unterminated string literal")]
    UnterminatedString,

    /// A malformed numeric literal
    #[error("Invalid number '{0}'")]
    InvalidNumber(String),

    /// A register reference that is not `%(n)`
    #[error("Invalid register reference")]
    InvalidRegister,

    /// A reference to a variable never assigned
    #[error("Undefined variable &{0}")]
    UndefinedVariable(String),

    /// A register the machine does not have
    #[error("Unknown position register %({0})")]
    UnknownRegister(usize),

    /// Text used where a number is required
    #[error("'{0}' is not a number")]
    NotANumber(String),

    /// Division by zero
    #[error("Division by zero")]
    DivisionByZero,

    /// The expression stopped early
    #[error("Unexpected end of expression")]
    UnexpectedEnd,

    /// A token out of place
    #[error("Unexpected token {0}")]
    UnexpectedToken(String),
}

/// Value held by a controller variable
#[derive(Debug, Clone, PartialEq)]
pub enum SbpValue {
    /// Numeric value
    Number(f64),
    /// Text value
    Text(String),
}

impl SbpValue {
    /// Numeric view, parsing text
    pub fn as_number(&self) -> Result<f64, ExpressionError> {
        match self {
            SbpValue::Number(n) => Ok(*n),
            SbpValue::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| ExpressionError::NotANumber(s.clone())),
        }
    }

    /// JSON form reported in configuration snapshots
    pub fn to_json(&self) -> Value {
        match self {
            SbpValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(n.to_string())),
            SbpValue::Text(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for SbpValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SbpValue::Number(n) => write!(f, "{}", n),
            SbpValue::Text(s) => f.write_str(s),
        }
    }
}

/// Variable and register lookup used during evaluation
pub trait Environment {
    /// Value of a variable (name already upper-cased)
    fn variable(&self, name: &str) -> Option<SbpValue>;
    /// Value of a position register
    fn register(&self, index: usize) -> Option<f64>;
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Text(String),
    Variable(String),
    Register(usize),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(expr: &str) -> Result<Vec<Token>, ExpressionError> {
    let chars: Vec<char> = expr.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' => i += 1,
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '"' => {
                let start = i + 1;
                let end = chars[start..]
                    .iter()
                    .position(|&ch| ch == '"')
                    .ok_or(ExpressionError::UnterminatedString)?;
                tokens.push(Token::Text(chars[start..start + end].iter().collect()));
                i = start + end + 1;
            }
            '&' => {
                let start = i + 1;
                let len = chars[start..]
                    .iter()
                    .take_while(|ch| ch.is_ascii_alphanumeric() || **ch == '_')
                    .count();
                if len == 0 {
                    return Err(ExpressionError::UnexpectedChar('&'));
                }
                let name: String = chars[start..start + len].iter().collect();
                tokens.push(Token::Variable(name.to_ascii_uppercase()));
                i = start + len;
            }
            '%' => {
                if chars.get(i + 1) != Some(&'(') {
                    return Err(ExpressionError::InvalidRegister);
                }
                let start = i + 2;
                let len = chars[start..]
                    .iter()
                    .take_while(|ch| ch.is_ascii_digit())
                    .count();
                if len == 0 || chars.get(start + len) != Some(&')') {
                    return Err(ExpressionError::InvalidRegister);
                }
                let digits: String = chars[start..start + len].iter().collect();
                let index = digits
                    .parse()
                    .map_err(|_| ExpressionError::InvalidRegister)?;
                tokens.push(Token::Register(index));
                i = start + len + 1;
            }
            c if c.is_ascii_digit() || c == '.' => {
                let len = chars[i..]
                    .iter()
                    .take_while(|ch| ch.is_ascii_digit() || **ch == '.')
                    .count();
                let text: String = chars[i..i + len].iter().collect();
                let value = text
                    .parse()
                    .map_err(|_| ExpressionError::InvalidNumber(text.clone()))?;
                tokens.push(Token::Number(value));
                i += len;
            }
            other => return Err(ExpressionError::UnexpectedChar(other)),
        }
    }

    Ok(tokens)
}

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    env: &'a dyn Environment,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn expression(&mut self) -> Result<SbpValue, ExpressionError> {
        let mut left = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    let right = self.term()?;
                    left = match (left, right) {
                        (SbpValue::Number(a), SbpValue::Number(b)) => SbpValue::Number(a + b),
                        (a, b) => SbpValue::Text(format!("{}{}", a, b)),
                    };
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    let right = self.term()?;
                    left = SbpValue::Number(left.as_number()? - right.as_number()?);
                }
                _ => return Ok(left),
            }
        }
    }

    fn term(&mut self) -> Result<SbpValue, ExpressionError> {
        let mut left = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    let right = self.unary()?;
                    left = SbpValue::Number(left.as_number()? * right.as_number()?);
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    let divisor = self.unary()?.as_number()?;
                    if divisor == 0.0 {
                        return Err(ExpressionError::DivisionByZero);
                    }
                    left = SbpValue::Number(left.as_number()? / divisor);
                }
                _ => return Ok(left),
            }
        }
    }

    fn unary(&mut self) -> Result<SbpValue, ExpressionError> {
        if self.peek() == Some(&Token::Minus) {
            self.pos += 1;
            return Ok(SbpValue::Number(-self.unary()?.as_number()?));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<SbpValue, ExpressionError> {
        match self.next() {
            Some(Token::Number(n)) => Ok(SbpValue::Number(n)),
            Some(Token::Text(s)) => Ok(SbpValue::Text(s)),
            Some(Token::Variable(name)) => self
                .env
                .variable(&name)
                .ok_or(ExpressionError::UndefinedVariable(name)),
            Some(Token::Register(index)) => self
                .env
                .register(index)
                .map(SbpValue::Number)
                .ok_or(ExpressionError::UnknownRegister(index)),
            Some(Token::LParen) => {
                let value = self.expression()?;
                match self.next() {
                    Some(Token::RParen) => Ok(value),
                    Some(other) => Err(ExpressionError::UnexpectedToken(format!("{:?}", other))),
                    None => Err(ExpressionError::UnexpectedEnd),
                }
            }
            Some(other) => Err(ExpressionError::UnexpectedToken(format!("{:?}", other))),
            None => Err(ExpressionError::UnexpectedEnd),
        }
    }
}

/// Evaluate an expression against an environment
pub fn evaluate(expr: &str, env: &dyn Environment) -> Result<SbpValue, ExpressionError> {
    let mut parser = Parser {
        tokens: tokenize(expr)?,
        pos: 0,
        env,
    };
    let value = parser.expression()?;
    match parser.next() {
        None => Ok(value),
        Some(extra) => Err(ExpressionError::UnexpectedToken(format!("{:?}", extra))),
    }
}

/// Split a statement's argument list on commas outside string literals
pub fn split_arguments(args: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_string = false;

    for c in args.chars() {
        match c {
            '"' => {
                in_string = !in_string;
                current.push(c);
            }
            ',' if !in_string => {
                parts.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    parts.push(current.trim().to_string());
    parts
}
