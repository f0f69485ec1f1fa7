//! Arithmetic evaluator for candidate expressions.
//!
//! Supports integer literals, `+ - * / ^` and parentheses. `^` binds
//! tightest and is right-associative; `* /` come next, then `+ -`, both
//! left-associative. Unary `+`/`-` may prefix any operand. Every failure,
//! including division by zero and non-finite intermediate values, is an
//! [`EvalError`] rather than a panic.

use smallvec::SmallVec;
use thiserror::Error;

/// Maximum nesting depth before evaluation gives up
const MAX_DEPTH: usize = 256;

/// Why an expression could not be evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("empty expression")]
    Empty,
    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),
    #[error("unexpected token at position {0}")]
    UnexpectedToken(usize),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("unclosed parenthesis")]
    UnclosedParen,
    #[error("division by zero")]
    DivisionByZero,
    #[error("non-finite result")]
    NonFinite,
    #[error("expression nested too deeply")]
    TooDeep,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

type Tokens = SmallVec<[Token; 16]>;

fn tokenize(expr: &str) -> Result<Tokens, EvalError> {
    let mut tokens = Tokens::new();
    let mut chars = expr.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        let token = match c {
            '0'..='9' => {
                let mut end = start + 1;
                while let Some(&(i, '0'..='9')) = chars.peek() {
                    end = i + 1;
                    chars.next();
                }
                // A run of ASCII digits always parses
                let value = expr[start..end]
                    .parse::<f64>()
                    .map_err(|_| EvalError::UnexpectedChar(c))?;
                Token::Number(value)
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '^' => Token::Caret,
            '(' => Token::LParen,
            ')' => Token::RParen,
            c if c.is_whitespace() => continue,
            other => return Err(EvalError::UnexpectedChar(other)),
        };
        tokens.push(token);
    }

    Ok(tokens)
}

fn finite(value: f64) -> Result<f64, EvalError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::NonFinite)
    }
}

struct Parser {
    tokens: Tokens,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expression(&mut self) -> Result<f64, EvalError> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    value = finite(value + self.term()?)?;
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    value = finite(value - self.term()?)?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<f64, EvalError> {
        let mut value = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    value = finite(value * self.unary()?)?;
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    let divisor = self.unary()?;
                    if divisor == 0.0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    value = finite(value / divisor)?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn unary(&mut self) -> Result<f64, EvalError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                self.nested(|p| p.unary()).map(|v| -v)
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.nested(|p| p.unary())
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<f64, EvalError> {
        let base = self.primary()?;
        if self.peek() == Some(Token::Caret) {
            self.pos += 1;
            // Right-associative: the exponent is itself a unary/power chain
            let exponent = self.nested(|p| p.unary())?;
            return finite(base.powf(exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<f64, EvalError> {
        match self.advance() {
            Some(Token::Number(value)) => Ok(value),
            Some(Token::LParen) => {
                let value = self.nested(|p| p.expression())?;
                match self.advance() {
                    Some(Token::RParen) => Ok(value),
                    Some(_) => Err(EvalError::UnexpectedToken(self.pos - 1)),
                    None => Err(EvalError::UnclosedParen),
                }
            }
            Some(_) => Err(EvalError::UnexpectedToken(self.pos - 1)),
            None => Err(EvalError::UnexpectedEnd),
        }
    }

    fn nested(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<f64, EvalError>,
    ) -> Result<f64, EvalError> {
        if self.depth >= MAX_DEPTH {
            return Err(EvalError::TooDeep);
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}

/// Evaluate an arithmetic expression
pub fn evaluate(expr: &str) -> Result<f64, EvalError> {
    let tokens = tokenize(expr)?;
    if tokens.is_empty() {
        return Err(EvalError::Empty);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expression()?;

    if parser.pos < parser.tokens.len() {
        return Err(EvalError::UnexpectedToken(parser.pos));
    }
    finite(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_ok(expr: &str) -> f64 {
        evaluate(expr).unwrap_or_else(|e| panic!("{expr:?} failed: {e}"))
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval_ok("1+2*3"), 7.0);
        assert_eq!(eval_ok("(1+2)*3"), 9.0);
        assert_eq!(eval_ok("8-3-2"), 3.0);
        assert_eq!(eval_ok("8/4/2"), 1.0);
        assert_eq!(eval_ok("2*3^2"), 18.0);
        assert_eq!(eval_ok("2^3^2"), 512.0);
        assert_eq!(eval_ok("7/2"), 3.5);
    }

    #[test]
    fn test_multi_digit_literals() {
        assert_eq!(eval_ok("12+3"), 15.0);
        assert_eq!(eval_ok("100"), 100.0);
    }

    #[test]
    fn test_unary_operators() {
        assert_eq!(eval_ok("-2+5"), 3.0);
        assert_eq!(eval_ok("3--2"), 5.0);
        assert_eq!(eval_ok("-2^2"), -4.0);
        assert_eq!(eval_ok("2^-1"), 0.5);
        assert_eq!(eval_ok("+4"), 4.0);
    }

    #[test]
    fn test_whitespace_is_ignored() {
        assert_eq!(eval_ok(" 6 * ( 5 + 4 ) "), 54.0);
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(evaluate("6/0+1+2+3+4+5"), Err(EvalError::DivisionByZero));
        assert_eq!(evaluate("1/(2-2)"), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(evaluate("9^9^9"), Err(EvalError::NonFinite));
    }

    #[test]
    fn test_malformed() {
        assert_eq!(evaluate(""), Err(EvalError::Empty));
        assert_eq!(evaluate("   "), Err(EvalError::Empty));
        assert_eq!(evaluate("1+"), Err(EvalError::UnexpectedEnd));
        assert_eq!(evaluate("(1+2"), Err(EvalError::UnclosedParen));
        assert_eq!(evaluate("1+2)"), Err(EvalError::UnexpectedToken(3)));
        assert_eq!(evaluate("(12)3"), Err(EvalError::UnexpectedToken(3)));
        assert_eq!(evaluate("1()2"), Err(EvalError::UnexpectedToken(1)));
        assert_eq!(evaluate("*3"), Err(EvalError::UnexpectedToken(0)));
        assert_eq!(evaluate("2x3"), Err(EvalError::UnexpectedChar('x')));
    }

    #[test]
    fn test_deep_nesting_is_rejected() {
        let expr = format!("{}1{}", "(".repeat(1000), ")".repeat(1000));
        assert_eq!(evaluate(&expr), Err(EvalError::TooDeep));

        let shallow = format!("{}1{}", "(".repeat(50), ")".repeat(50));
        assert_eq!(evaluate(&shallow), Ok(1.0));
    }
}
