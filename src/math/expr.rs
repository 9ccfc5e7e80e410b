//! Arithmetic expression parser
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expr    = term (("+" | "-") term)*
//! term    = unary (("*" | "/") unary)*
//! unary   = ("-" | "+") unary | power
//! power   = primary ("^" unary)?
//! primary = number | "(" expr ")"
//! ```
//!
//! `^` is right-associative and binds tighter than unary minus on its left,
//! so `-2^2` is `-4`.

use thiserror::Error;

/// Deepest nesting of parentheses and signs accepted
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("result is not a finite number")]
    NotFinite,

    #[error("expression nested too deeply")]
    TooDeep,
}

/// Evaluate an arithmetic expression over `+ - * / ^ ( )` and decimals
pub fn evaluate(input: &str) -> Result<f64, ExprError> {
    let chars: Vec<char> = input.chars().filter(|c| !c.is_whitespace()).collect();
    let mut parser = Parser {
        chars: &chars,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    if let Some(&c) = parser.peek() {
        return Err(ExprError::UnexpectedChar(c));
    }
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ExprError::NotFinite)
    }
}

struct Parser<'a> {
    chars: &'a [char],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&char> {
        self.chars.get(self.pos)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(&expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expr(&mut self) -> Result<f64, ExprError> {
        let mut value = self.term()?;
        loop {
            if self.eat('+') {
                value += self.term()?;
            } else if self.eat('-') {
                value -= self.term()?;
            } else {
                return Ok(value);
            }
        }
    }

    fn term(&mut self) -> Result<f64, ExprError> {
        let mut value = self.unary()?;
        loop {
            if self.eat('*') {
                value *= self.unary()?;
            } else if self.eat('/') {
                let divisor = self.unary()?;
                if divisor == 0.0 {
                    return Err(ExprError::DivisionByZero);
                }
                value /= divisor;
            } else {
                return Ok(value);
            }
        }
    }

    // Every nested "(" and sign passes through here
    fn unary(&mut self) -> Result<f64, ExprError> {
        if self.depth >= MAX_DEPTH {
            return Err(ExprError::TooDeep);
        }
        self.depth += 1;
        let value = self.signed();
        self.depth -= 1;
        value
    }

    fn signed(&mut self) -> Result<f64, ExprError> {
        if self.eat('-') {
            Ok(-self.unary()?)
        } else if self.eat('+') {
            self.unary()
        } else {
            self.power()
        }
    }

    fn power(&mut self) -> Result<f64, ExprError> {
        let base = self.primary()?;
        if self.eat('^') {
            let exponent = self.unary()?;
            Ok(base.powf(exponent))
        } else {
            Ok(base)
        }
    }

    fn primary(&mut self) -> Result<f64, ExprError> {
        match self.peek() {
            Some('(') => {
                self.pos += 1;
                let value = self.expr()?;
                if self.eat(')') {
                    Ok(value)
                } else {
                    match self.peek() {
                        Some(&c) => Err(ExprError::UnexpectedChar(c)),
                        None => Err(ExprError::UnexpectedEnd),
                    }
                }
            }
            Some(c) if c.is_ascii_digit() || *c == '.' => self.number(),
            Some(&c) => Err(ExprError::UnexpectedChar(c)),
            None => Err(ExprError::UnexpectedEnd),
        }
    }

    fn number(&mut self) -> Result<f64, ExprError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || *c == '.') {
            self.pos += 1;
        }
        let literal: String = self.chars[start..self.pos].iter().collect();
        literal
            .parse()
            .map_err(|_| ExprError::InvalidNumber(literal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence() {
        assert_eq!(evaluate("2+3*4"), Ok(14.0));
        assert_eq!(evaluate("(2+3)*4"), Ok(20.0));
        assert_eq!(evaluate("10-4-3"), Ok(3.0));
        assert_eq!(evaluate("8/2/2"), Ok(2.0));
    }

    #[test]
    fn test_power() {
        assert_eq!(evaluate("2^10"), Ok(1024.0));
        assert_eq!(evaluate("2^3^2"), Ok(512.0));
        assert_eq!(evaluate("-2^2"), Ok(-4.0));
        assert_eq!(evaluate("2^-1"), Ok(0.5));
    }

    #[test]
    fn test_decimals_and_whitespace() {
        assert_eq!(evaluate(" 1.5 * 2 "), Ok(3.0));
        assert_eq!(evaluate("-(3)"), Ok(-3.0));
    }

    #[test]
    fn test_errors() {
        assert_eq!(evaluate("1/0"), Err(ExprError::DivisionByZero));
        assert_eq!(evaluate("1.2.3"), Err(ExprError::InvalidNumber("1.2.3".into())));
        assert_eq!(evaluate("(1+2"), Err(ExprError::UnexpectedEnd));
        assert_eq!(evaluate("2 x 3"), Err(ExprError::UnexpectedChar('x')));
        assert_eq!(evaluate(""), Err(ExprError::UnexpectedEnd));
        assert_eq!(evaluate("10^400"), Err(ExprError::NotFinite));
    }

    #[test]
    fn test_deep_nesting_is_rejected() {
        let parens = format!("{}1{}", "(".repeat(50_000), ")".repeat(50_000));
        assert_eq!(evaluate(&parens), Err(ExprError::TooDeep));

        let signs = format!("{}1", "-".repeat(50_000));
        assert_eq!(evaluate(&signs), Err(ExprError::TooDeep));

        let nested = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(evaluate(&nested), Ok(1.0));
        assert_eq!(evaluate("2*3+4*5-6/2"), Ok(23.0));
    }
}
