//! Arithmetic evaluation for bill expressions.
//!
//! Grammar, over numeric literals and `+ - * / ( )` only:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | primary
//! primary := NUMBER | '(' expr ')'
//! ```

use crate::error::EvalError;

/// Deepest allowed nesting of parentheses and unary signs.
pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<(usize, Token)>, EvalError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        let token = match c {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '0'..='9' | '.' => {
                let mut end = offset;
                let mut seen_dot = false;
                while let Some(&(i, d)) = chars.peek() {
                    if d.is_ascii_digit() || (d == '.' && !seen_dot) {
                        seen_dot |= d == '.';
                        end = i + d.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let literal = &input[offset..end];
                let value = literal.parse::<f64>().map_err(|_| EvalError::UnexpectedToken {
                    token: literal.to_string(),
                    offset,
                })?;
                tokens.push((offset, Token::Number(value)));
                continue;
            }
            other => {
                return Err(EvalError::UnexpectedToken {
                    token: other.to_string(),
                    offset,
                });
            }
        };
        tokens.push((offset, token));
        chars.next();
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn descend(&mut self) -> Result<(), EvalError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(EvalError::TooDeep { limit: MAX_DEPTH });
        }
        Ok(())
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).map(|(_, t)| *t)
    }

    fn advance(&mut self) -> Option<(usize, Token)> {
        let token = self.tokens.get(self.pos).copied();
        self.pos += 1;
        token
    }

    fn expr(&mut self) -> Result<f64, EvalError> {
        let mut value = self.term()?;
        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == Token::Plus { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, EvalError> {
        let mut value = self.unary()?;
        while let Some(op @ (Token::Star | Token::Slash)) = self.peek() {
            self.pos += 1;
            let rhs = self.unary()?;
            value = if op == Token::Star {
                value * rhs
            } else if rhs == 0.0 {
                return Err(EvalError::DivisionByZero);
            } else {
                value / rhs
            };
        }
        Ok(value)
    }

    fn unary(&mut self) -> Result<f64, EvalError> {
        match self.peek() {
            Some(Token::Plus) => {
                self.pos += 1;
                self.descend()?;
                let value = self.unary()?;
                self.depth -= 1;
                Ok(value)
            }
            Some(Token::Minus) => {
                self.pos += 1;
                self.descend()?;
                let value = self.unary()?;
                self.depth -= 1;
                Ok(-value)
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<f64, EvalError> {
        match self.advance() {
            Some((_, Token::Number(value))) => Ok(value),
            Some((_, Token::LParen)) => {
                self.descend()?;
                let value = self.expr()?;
                self.depth -= 1;
                match self.advance() {
                    Some((_, Token::RParen)) => Ok(value),
                    Some((offset, token)) => Err(unexpected(offset, token)),
                    None => Err(EvalError::UnexpectedEnd),
                }
            }
            Some((offset, token)) => Err(unexpected(offset, token)),
            None => Err(EvalError::UnexpectedEnd),
        }
    }
}

fn unexpected(offset: usize, token: Token) -> EvalError {
    let token = match token {
        Token::Number(n) => n.to_string(),
        Token::Plus => "+".into(),
        Token::Minus => "-".into(),
        Token::Star => "*".into(),
        Token::Slash => "/".into(),
        Token::LParen => "(".into(),
        Token::RParen => ")".into(),
    };
    EvalError::UnexpectedToken { token, offset }
}

/// Evaluate a pure arithmetic expression.
pub fn evaluate_arithmetic(input: &str) -> Result<f64, EvalError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(EvalError::UnexpectedEnd);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;

    if let Some((offset, token)) = parser.advance() {
        return Err(unexpected(offset, token));
    }
    if !value.is_finite() {
        return Err(EvalError::NonFinite);
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_and_grouping() {
        assert_eq!(evaluate_arithmetic("120+60"), Ok(180.0));
        assert_eq!(evaluate_arithmetic("2 + 3 * 4"), Ok(14.0));
        assert_eq!(evaluate_arithmetic("(2 + 3) * 4"), Ok(20.0));
        assert_eq!(evaluate_arithmetic("100 - 20 - 30"), Ok(50.0));
        assert_eq!(evaluate_arithmetic("10 / 4"), Ok(2.5));
        assert_eq!(evaluate_arithmetic("450.5*2"), Ok(901.0));
    }

    #[test]
    fn test_unary_signs() {
        assert_eq!(evaluate_arithmetic("-5 + 10"), Ok(5.0));
        assert_eq!(evaluate_arithmetic("2 * -(3 + 1)"), Ok(-8.0));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(evaluate_arithmetic("5/0"), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_incomplete_expressions() {
        assert_eq!(evaluate_arithmetic("500/-"), Err(EvalError::UnexpectedEnd));
        assert_eq!(evaluate_arithmetic("(1+2"), Err(EvalError::UnexpectedEnd));
        assert_eq!(evaluate_arithmetic(""), Err(EvalError::UnexpectedEnd));
    }

    #[test]
    fn test_rejects_juxtaposed_numbers_and_stray_tokens() {
        assert!(matches!(
            evaluate_arithmetic("1 2"),
            Err(EvalError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            evaluate_arithmetic("2**3"),
            Err(EvalError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            evaluate_arithmetic("."),
            Err(EvalError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            evaluate_arithmetic("abs(1)"),
            Err(EvalError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn test_nesting_is_bounded() {
        let nested = format!("{}1{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert_eq!(evaluate_arithmetic(&nested), Ok(1.0));

        let parens = format!("{}1{}+1", "(".repeat(100_000), ")".repeat(100_000));
        assert_eq!(
            evaluate_arithmetic(&parens),
            Err(EvalError::TooDeep { limit: MAX_DEPTH })
        );

        let signs = format!("{}1", "-".repeat(100_000));
        assert_eq!(
            evaluate_arithmetic(&signs),
            Err(EvalError::TooDeep { limit: MAX_DEPTH })
        );
    }
}
