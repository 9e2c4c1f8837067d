//! Parsing polynomials from text, for example `y^3 - x*z + 1/2` or `3x^2y`.
//!
//! The grammar accepts sums, products (explicit `*` or juxtaposition), powers
//! with non-negative integer exponents (`^` or `**`), parentheses, integer and
//! decimal numbers, and division by constants.

use std::fmt::Display;

use smartstring::{LazyCompact, SmartString};

use crate::domains::Field;
use crate::error::{AlgebraError, Result};

use super::polynomial::{MultivariatePolynomial, PolynomialRing};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Number(SmartString<LazyCompact>),
    ID(SmartString<LazyCompact>),
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    OpenParenthesis,
    CloseParenthesis,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(n) => f.write_str(n),
            Token::ID(n) => f.write_str(n),
            Token::Add => f.write_str("+"),
            Token::Sub => f.write_str("-"),
            Token::Mul => f.write_str("*"),
            Token::Div => f.write_str("/"),
            Token::Pow => f.write_str("^"),
            Token::OpenParenthesis => f.write_str("("),
            Token::CloseParenthesis => f.write_str(")"),
        }
    }
}

fn tokenize(input: &str) -> std::result::Result<Vec<Token>, String> {
    let mut tokens = vec![];
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut n = SmartString::new();
                let mut seen_dot = false;
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() {
                        n.push(d);
                    } else if d == '.' && !seen_dot {
                        seen_dot = true;
                        n.push(d);
                    } else {
                        break;
                    }
                    chars.next();
                }
                if n == "." {
                    return Err("a lone '.' is not a number".to_string());
                }
                tokens.push(Token::Number(n));
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut id = SmartString::new();
                while let Some(&d) = chars.peek() {
                    if d.is_alphanumeric() || d == '_' {
                        id.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::ID(id));
            }
            '+' => {
                chars.next();
                tokens.push(Token::Add);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Sub);
            }
            '*' => {
                chars.next();
                if chars.peek() == Some(&'*') {
                    chars.next();
                    tokens.push(Token::Pow);
                } else {
                    tokens.push(Token::Mul);
                }
            }
            '/' => {
                chars.next();
                tokens.push(Token::Div);
            }
            '^' => {
                chars.next();
                tokens.push(Token::Pow);
            }
            '(' => {
                chars.next();
                tokens.push(Token::OpenParenthesis);
            }
            ')' => {
                chars.next();
                tokens.push(Token::CloseParenthesis);
            }
            c => return Err(format!("unexpected character '{}'", c)),
        }
    }

    Ok(tokens)
}

struct Parser<'a, F: Field> {
    ring: &'a PolynomialRing<F>,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a, F: Field> Parser<'a, F> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        t
    }

    fn expr(&mut self) -> std::result::Result<MultivariatePolynomial<F>, String> {
        let mut res = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Add) => {
                    self.pos += 1;
                    res = &res + &self.term()?;
                }
                Some(Token::Sub) => {
                    self.pos += 1;
                    res = &res - &self.term()?;
                }
                _ => return Ok(res),
            }
        }
    }

    fn term(&mut self) -> std::result::Result<MultivariatePolynomial<F>, String> {
        let mut res = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Mul) => {
                    self.pos += 1;
                    let f = self.unary()?;
                    res = res.checked_mul(&f).map_err(|e| e.to_string())?;
                }
                Some(Token::Div) => {
                    self.pos += 1;
                    let d = self.unary()?;
                    if !d.is_constant() {
                        return Err(format!("cannot divide by the non-constant {}", d));
                    }
                    res = res
                        .checked_div_coeff(&d.lcoeff())
                        .map_err(|_| "division by zero".to_string())?;
                }
                Some(Token::Number(_) | Token::ID(_) | Token::OpenParenthesis) => {
                    let f = self.unary()?;
                    res = res.checked_mul(&f).map_err(|e| e.to_string())?;
                }
                _ => return Ok(res),
            }
        }
    }

    fn unary(&mut self) -> std::result::Result<MultivariatePolynomial<F>, String> {
        match self.peek() {
            Some(Token::Sub) => {
                self.pos += 1;
                Ok(-self.unary()?)
            }
            Some(Token::Add) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> std::result::Result<MultivariatePolynomial<F>, String> {
        let base = self.atom()?;
        if self.peek() != Some(&Token::Pow) {
            return Ok(base);
        }
        self.pos += 1;

        match self.next() {
            Some(Token::Number(n)) => {
                let e: u32 = n
                    .parse()
                    .map_err(|_| format!("exponent '{}' is not a non-negative integer", n))?;
                if e > u16::MAX as u32 {
                    return Err(format!("exponent {} is too large", e));
                }
                base.checked_pow(e).map_err(|e| e.to_string())
            }
            Some(t) => Err(format!("expected an exponent after '^', found '{}'", t)),
            None => Err("expected an exponent after '^'".to_string()),
        }
    }

    fn atom(&mut self) -> std::result::Result<MultivariatePolynomial<F>, String> {
        match self.next() {
            Some(Token::Number(n)) => Ok(self.ring.constant(self.number(&n))),
            Some(Token::ID(id)) => self
                .ring
                .variables()
                .iter()
                .position(|v| *v == id)
                .map(|i| self.ring.variable(i))
                .ok_or_else(|| format!("unknown variable '{}'", id)),
            Some(Token::OpenParenthesis) => {
                let r = self.expr()?;
                match self.next() {
                    Some(Token::CloseParenthesis) => Ok(r),
                    _ => Err("missing closing parenthesis".to_string()),
                }
            }
            Some(t) => Err(format!("unexpected '{}'", t)),
            None => Err("unexpected end of input".to_string()),
        }
    }

    /// Convert a decimal literal into a field element, digit by digit so that
    /// arbitrarily long integers are exact in exact fields.
    fn number(&self, n: &str) -> F::Element {
        let field = self.ring.field();
        let ten = field.nth(10);
        let mut res = field.zero();
        let mut decimals = 0;
        let mut after_dot = false;
        for c in n.chars() {
            if c == '.' {
                after_dot = true;
                continue;
            }
            if after_dot {
                decimals += 1;
            }
            res = field.mul(&res, &ten);
            field.add_assign(&mut res, &field.nth((c as u8 - b'0') as i64));
        }

        if decimals > 0 {
            field.div(&res, &field.pow(&ten, decimals))
        } else {
            res
        }
    }
}

impl<F: Field> PolynomialRing<F> {
    /// Parse a polynomial in this ring from a string.
    ///
    /// ```
    /// use hilbert_tangent::domains::rational::Q;
    /// use hilbert_tangent::poly::{polynomial::PolynomialRing, MonomialOrder};
    ///
    /// let r = PolynomialRing::new(Q, 3, MonomialOrder::GrevLex);
    /// let p = r.parse("y^3 - x*z").unwrap();
    /// assert_eq!(p.to_string(), "y^3-x*z");
    /// ```
    pub fn parse(&self, input: &str) -> Result<MultivariatePolynomial<F>> {
        let err = |reason: String| AlgebraError::Parse {
            input: input.to_string(),
            reason,
        };

        let tokens = tokenize(input).map_err(err)?;
        if tokens.is_empty() {
            return Err(err("expression is empty".to_string()));
        }

        let mut parser = Parser {
            ring: self,
            tokens,
            pos: 0,
        };

        let p = parser.expr().map_err(err)?;
        if let Some(t) = parser.peek() {
            return Err(err(format!("unexpected '{}'", t)));
        }
        Ok(p)
    }

    /// Parse a list of polynomials.
    pub fn parse_all<S: AsRef<str>>(&self, inputs: &[S]) -> Result<Vec<MultivariatePolynomial<F>>> {
        inputs.iter().map(|s| self.parse(s.as_ref())).collect()
    }
}
