use std::str::FromStr;

use num::BigInt;
use num::BigRational;
use num::One;
use num::Zero;

use super::polynomial::Polynomial;
use crate::error::PtolemyError;
use crate::error::Result;

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Number(BigInt),
    Identifier(String),
    Operator(char),
}

fn tokenize(s: &str) -> Result<Vec<Token>> {
    let mut tokens = vec![];
    let chars: Vec<char> = s.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
        } else if c.is_ascii_digit() {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            let digits: String = chars[start..i].iter().collect();
            let number = digits
                .parse()
                .map_err(|_| PtolemyError::parse(format!("invalid number {}", digits)))?;
            tokens.push(Token::Number(number));
        } else if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            tokens.push(Token::Identifier(chars[start..i].iter().collect()));
        } else if "+-*/^()".contains(c) {
            tokens.push(Token::Operator(c));
            i += 1;
        } else {
            return Err(PtolemyError::parse(format!(
                "unexpected character '{}' in polynomial {}",
                c, s
            )));
        }
    }
    Ok(tokens)
}

struct Parser<'a> {
    input: &'a str,
    tokens: Vec<Token>,
    position: usize,
}

type RationalPolynomial<V> = Polynomial<V, BigRational>;

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn error(&self, message: &str) -> PtolemyError {
        PtolemyError::parse(format!(
            "{} at token {} of polynomial {}",
            message, self.position, self.input
        ))
    }

    fn accept(&mut self, operator: char) -> bool {
        if self.peek() == Some(&Token::Operator(operator)) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn expression<V: Ord + Clone + FromStr>(&mut self) -> Result<RationalPolynomial<V>> {
        let mut result = if self.accept('-') {
            -self.term()?
        } else {
            self.accept('+');
            self.term()?
        };
        loop {
            if self.accept('+') {
                result = result + self.term()?;
            } else if self.accept('-') {
                result = result - self.term()?;
            } else {
                return Ok(result);
            }
        }
    }

    fn term<V: Ord + Clone + FromStr>(&mut self) -> Result<RationalPolynomial<V>> {
        let mut result = self.power::<V>()?;
        loop {
            if self.accept('*') {
                result = result * self.power::<V>()?;
            } else if self.accept('/') {
                let divisor = self.power::<V>()?;
                if !divisor.is_constant() || divisor.constant_term().is_zero() {
                    return Err(self.error("division by a non-constant or zero"));
                }
                result = result.scale(&(BigRational::one() / divisor.constant_term()));
            } else {
                return Ok(result);
            }
        }
    }

    fn power<V: Ord + Clone + FromStr>(&mut self) -> Result<RationalPolynomial<V>> {
        let base = self.atom()?;
        if self.accept('^') {
            match self.peek().cloned() {
                Some(Token::Number(exponent)) => {
                    self.position += 1;
                    let exponent = u32::try_from(exponent)
                        .map_err(|_| self.error("exponent out of range"))?;
                    Ok(base.pow(exponent))
                }
                _ => Err(self.error("expected integer exponent")),
            }
        } else {
            Ok(base)
        }
    }

    fn atom<V: Ord + Clone + FromStr>(&mut self) -> Result<RationalPolynomial<V>> {
        match self.peek().cloned() {
            Some(Token::Number(n)) => {
                self.position += 1;
                Ok(Polynomial::constant(BigRational::from_integer(n)))
            }
            Some(Token::Identifier(name)) => {
                self.position += 1;
                let v = name
                    .parse()
                    .map_err(|_| self.error(&format!("unknown variable {}", name)))?;
                Ok(Polynomial::variable(v))
            }
            Some(Token::Operator('(')) => {
                self.position += 1;
                let inner = self.expression()?;
                if !self.accept(')') {
                    return Err(self.error("expected ')'"));
                }
                Ok(inner)
            }
            Some(Token::Operator('-')) => {
                self.position += 1;
                Ok(-self.atom()?)
            }
            _ => Err(self.error("expected number, variable or '('")),
        }
    }
}

/// Parses a polynomial with rational coefficients in infix notation,
/// e.g. `2/3*x^2*y - (y + 1)^2`.
pub fn parse_polynomial<V: Ord + Clone + FromStr>(s: &str) -> Result<RationalPolynomial<V>> {
    let mut parser = Parser {
        input: s,
        tokens: tokenize(s)?,
        position: 0,
    };
    let result = parser.expression()?;
    if parser.position != parser.tokens.len() {
        return Err(parser.error("trailing input"));
    }
    Ok(result)
}

/// Parses a comma separated list of polynomials.
pub fn parse_polynomial_list<V: Ord + Clone + FromStr>(s: &str) -> Result<Vec<RationalPolynomial<V>>> {
    s.split(',')
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(parse_polynomial)
        .collect()
}

#[cfg(test)]
mod tests {
    use num::BigRational;

    use super::parse_polynomial;
    use super::parse_polynomial_list;
    use crate::algebra::polynomial::Polynomial;

    type P = Polynomial<char, BigRational>;

    fn parse(s: &str) -> P {
        parse_polynomial(s).unwrap()
    }

    #[test]
    fn parse_and_print() {
        for s in ["x^2 - 2*x*y + 1", "-x + 3", "y^3*x - 5"] {
            let p = parse(s);
            assert_eq!(parse(&p.to_string()), p);
        }
        assert_eq!(parse("(x + 1)^2"), parse("x^2 + 2*x + 1"));
        assert_eq!(parse("x*(y - 1) - -x"), parse("x*y"));
    }

    #[test]
    fn rational_coefficients() {
        let p = parse("2/3*x + x/3");
        assert_eq!(p, parse("x"));
        assert_eq!(
            parse("1/2").constant_term(),
            BigRational::new(1.into(), 2.into())
        );
    }

    #[test]
    fn errors() {
        assert!(parse_polynomial::<char>("x +").is_err());
        assert!(parse_polynomial::<char>("x / y").is_err());
        assert!(parse_polynomial::<char>("(x").is_err());
        assert!(parse_polynomial::<char>("x $ y").is_err());
        assert!(parse_polynomial::<char>("xy").is_err());
    }

    #[test]
    fn lists() {
        let list = parse_polynomial_list::<char>("x - 1,\n y^2 + x, ").unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1], parse("y^2 + x"));
    }
}
