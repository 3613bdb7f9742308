//! Cost formulas: infix arithmetic over the next level `n`.
//!
//! Formulas are tokenized and parsed once when the upgrade tree is built;
//! evaluating a parsed formula never re-reads the source text.

use crate::core::error::FormulaError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Level,
    Neg(Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    fn eval(&self, n: f64) -> Result<f64, FormulaError> {
        match self {
            Expr::Number(v) => Ok(*v),
            Expr::Level => Ok(n),
            Expr::Neg(inner) => Ok(-inner.eval(n)?),
            Expr::Binary(op, lhs, rhs) => {
                let a = lhs.eval(n)?;
                let b = rhs.eval(n)?;
                match op {
                    BinaryOp::Add => Ok(a + b),
                    BinaryOp::Sub => Ok(a - b),
                    BinaryOp::Mul => Ok(a * b),
                    BinaryOp::Div => {
                        if b == 0.0 {
                            Err(FormulaError::DivisionByZero)
                        } else {
                            Ok(a / b)
                        }
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Level,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(src: &str) -> Result<Vec<(Token, usize)>, FormulaError> {
    let chars: Vec<char> = src.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        let tok = match ch {
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            c if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| FormulaError::InvalidNumber { text, pos: start })?;
                tokens.push((Token::Number(value), start));
                continue;
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let name: String = chars[start..i].iter().collect();
                if name == "n" {
                    tokens.push((Token::Level, start));
                    continue;
                }
                return Err(FormulaError::UnknownIdentifier { name, pos: start });
            }
            c => return Err(FormulaError::UnexpectedChar { ch: c, pos: i }),
        };
        tokens.push((tok, i));
        i += 1;
    }
    Ok(tokens)
}

/// Deepest expression tree a formula may build, counting parentheses,
/// unary signs and operator chains.
pub const MAX_FORMULA_DEPTH: usize = 64;

/// A parsed subexpression and the height of its tree.
type Parsed = (Expr, usize);

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map(|(_, p)| *p).unwrap_or(0)
    }

    fn advance(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).map(|(t, _)| t.clone());
        self.pos += 1;
        tok
    }

    fn enter(&mut self, pos: usize) -> Result<(), FormulaError> {
        self.depth += 1;
        if self.depth > MAX_FORMULA_DEPTH {
            return Err(FormulaError::TooDeep { pos });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn binary(op: BinaryOp, lhs: Parsed, rhs: Parsed, pos: usize) -> Result<Parsed, FormulaError> {
        let height = lhs.1.max(rhs.1) + 1;
        if height > MAX_FORMULA_DEPTH {
            return Err(FormulaError::TooDeep { pos });
        }
        Ok((Expr::Binary(op, Box::new(lhs.0), Box::new(rhs.0)), height))
    }

    // expr := term (('+' | '-') term)*
    fn expr(&mut self) -> Result<Parsed, FormulaError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            let pos = self.offset();
            self.advance();
            let rhs = self.term()?;
            lhs = Self::binary(op, lhs, rhs, pos)?;
        }
    }

    // term := unary (('*' | '/') unary)*
    fn term(&mut self) -> Result<Parsed, FormulaError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Ok(lhs),
            };
            let pos = self.offset();
            self.advance();
            let rhs = self.unary()?;
            lhs = Self::binary(op, lhs, rhs, pos)?;
        }
    }

    fn unary(&mut self) -> Result<Parsed, FormulaError> {
        let pos = self.offset();
        match self.peek() {
            Some(Token::Minus) => {
                self.advance();
                self.enter(pos)?;
                let (inner, height) = self.unary()?;
                self.leave();
                Ok((Expr::Neg(Box::new(inner)), height + 1))
            }
            Some(Token::Plus) => {
                self.advance();
                self.enter(pos)?;
                let inner = self.unary()?;
                self.leave();
                Ok(inner)
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Parsed, FormulaError> {
        let pos = self.offset();
        match self.advance() {
            Some(Token::Number(v)) => Ok((Expr::Number(v), 1)),
            Some(Token::Level) => Ok((Expr::Level, 1)),
            Some(Token::LParen) => {
                self.enter(pos)?;
                let inner = self.expr()?;
                self.leave();
                match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(FormulaError::UnbalancedParen { pos }),
                }
            }
            Some(Token::RParen) => Err(FormulaError::UnbalancedParen { pos }),
            Some(_) => Err(FormulaError::UnexpectedToken { pos }),
            None => Err(FormulaError::UnexpectedEnd),
        }
    }
}

/// A parsed cost formula together with its source text.
#[derive(Debug, Clone, PartialEq)]
pub struct CostFormula {
    source: String,
    expr: Expr,
}

impl CostFormula {
    pub fn parse(src: &str) -> Result<Self, FormulaError> {
        let tokens = tokenize(src)?;
        if tokens.is_empty() {
            return Err(FormulaError::Empty);
        }
        let mut parser = Parser {
            tokens,
            pos: 0,
            depth: 0,
        };
        let (expr, _) = parser.expr()?;
        if parser.pos < parser.tokens.len() {
            let pos = parser.offset();
            return Err(match parser.peek() {
                Some(Token::RParen) => FormulaError::UnbalancedParen { pos },
                _ => FormulaError::UnexpectedToken { pos },
            });
        }
        Ok(Self {
            source: src.to_string(),
            expr,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluates with `n` bound to `level`.
    pub fn evaluate(&self, level: i32) -> Result<f64, FormulaError> {
        let value = self.expr.eval(level as f64)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(FormulaError::NonFinite)
        }
    }
}

impl fmt::Display for CostFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Rounds half to even and clamps into `[1, i32::MAX]`.
pub fn clamp_cost(raw: f64) -> i32 {
    let rounded = raw.round_ties_even();
    if rounded >= i32::MAX as f64 {
        i32::MAX
    } else {
        (rounded as i32).max(1)
    }
}
