use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;
use std::ops::Add;
use std::ops::Mul;
use std::ops::Neg;
use std::ops::Sub;

/// Coefficient types polynomials can be built over.
pub trait Coefficient: num::Num + Clone + Neg<Output = Self> + fmt::Debug {}

impl<T> Coefficient for T where T: num::Num + Clone + Neg<Output = T> + fmt::Debug {}

/// Product of variables with positive exponents.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Monomial<V: Ord>(BTreeMap<V, u32>);

impl<V: Ord + Clone> Monomial<V> {
    pub fn one() -> Self {
        Self(BTreeMap::new())
    }

    pub fn variable(v: V) -> Self {
        Self(BTreeMap::from([(v, 1)]))
    }

    pub fn is_one(&self) -> bool {
        self.0.is_empty()
    }

    pub fn degree(&self) -> u32 {
        self.0.values().sum()
    }

    pub fn degree_in(&self, v: &V) -> u32 {
        self.0.get(v).cloned().unwrap_or(0)
    }

    pub fn variables(&self) -> impl Iterator<Item = &V> {
        self.0.keys()
    }

    pub fn exponents(&self) -> impl Iterator<Item = (&V, &u32)> {
        self.0.iter()
    }

    fn times(&self, other: &Self) -> Self {
        let mut result = self.0.clone();
        for (v, e) in other.0.iter() {
            *result.entry(v.clone()).or_insert(0) += e;
        }
        Self(result)
    }

    /// Splits off the given variable, returning its exponent and the rest.
    fn split(&self, v: &V) -> (u32, Self) {
        let mut rest = self.0.clone();
        let exponent = rest.remove(v).unwrap_or(0);
        (exponent, Self(rest))
    }
}

impl<V: Ord + fmt::Display> fmt::Display for Monomial<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (v, e)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "*")?;
            }
            if *e == 1 {
                write!(f, "{}", v)?;
            } else {
                write!(f, "{}^{}", v, e)?;
            }
        }
        Ok(())
    }
}

/// A sparse multivariate polynomial. Zero coefficients are never stored.
#[derive(Clone, Debug, PartialEq)]
pub struct Polynomial<V: Ord, C> {
    terms: BTreeMap<Monomial<V>, C>,
}

impl<V: Ord + Clone, C: Coefficient> Polynomial<V, C> {
    pub fn zero() -> Self {
        Self {
            terms: BTreeMap::new(),
        }
    }

    pub fn constant(c: C) -> Self {
        Self::from_terms([(Monomial::one(), c)])
    }

    pub fn variable(v: V) -> Self {
        Self::from_terms([(Monomial::variable(v), C::one())])
    }

    pub fn from_terms(terms: impl IntoIterator<Item = (Monomial<V>, C)>) -> Self {
        let mut result = Self::zero();
        for (monomial, c) in terms {
            result.add_term(monomial, c);
        }
        result
    }

    fn add_term(&mut self, monomial: Monomial<V>, c: C) {
        let sum = match self.terms.remove(&monomial) {
            Some(existing) => existing + c,
            None => c,
        };
        if !sum.is_zero() {
            self.terms.insert(monomial, sum);
        }
    }

    pub fn terms(&self) -> impl Iterator<Item = (&Monomial<V>, &C)> {
        self.terms.iter()
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn is_constant(&self) -> bool {
        self.terms.keys().all(|m| m.is_one())
    }

    pub fn constant_term(&self) -> C {
        self.terms
            .get(&Monomial::one())
            .cloned()
            .unwrap_or_else(C::zero)
    }

    pub fn variables(&self) -> BTreeSet<V> {
        self.terms
            .keys()
            .flat_map(|m| m.variables().cloned())
            .collect()
    }

    /// The variable if the polynomial depends on exactly one.
    pub fn univariate_variable(&self) -> Option<V> {
        let variables = self.variables();
        if variables.len() == 1 {
            variables.into_iter().next()
        } else {
            None
        }
    }

    pub fn degree(&self) -> u32 {
        self.terms.keys().map(|m| m.degree()).max().unwrap_or(0)
    }

    pub fn degree_in(&self, v: &V) -> u32 {
        self.terms.keys().map(|m| m.degree_in(v)).max().unwrap_or(0)
    }

    /// Coefficients of the powers of `v`, starting with the constant
    /// term. Only meaningful for polynomials in `v` alone.
    pub fn univariate_coefficients(&self, v: &V) -> Vec<C> {
        let mut coefficients = vec![C::zero(); self.degree_in(v) as usize + 1];
        for (monomial, c) in self.terms.iter() {
            let (exponent, _) = monomial.split(v);
            coefficients[exponent as usize] = coefficients[exponent as usize].clone() + c.clone();
        }
        coefficients
    }

    pub fn scale(&self, factor: &C) -> Self {
        Self::from_terms(
            self.terms
                .iter()
                .map(|(m, c)| (m.clone(), c.clone() * factor.clone())),
        )
    }

    pub fn pow(&self, exponent: u32) -> Self {
        (0..exponent).fold(Self::constant(C::one()), |acc, _| acc * self.clone())
    }

    /// Replaces `v` by a value.
    pub fn substitute(&self, v: &V, value: &C) -> Self {
        Self::from_terms(self.terms.iter().map(|(monomial, c)| {
            let (exponent, rest) = monomial.split(v);
            let factor = (0..exponent).fold(C::one(), |acc, _| acc * value.clone());
            (rest, c.clone() * factor)
        }))
    }

    /// Replaces every variable in the map by the corresponding polynomial.
    /// All replacements happen simultaneously.
    pub fn substitute_polynomials(&self, replacements: &BTreeMap<V, Polynomial<V, C>>) -> Self {
        let mut result = Self::zero();
        for (monomial, c) in self.terms.iter() {
            let mut term = Self::constant(c.clone());
            for (v, e) in monomial.exponents() {
                let factor = match replacements.get(v) {
                    Some(p) => p.pow(*e),
                    None => Self::from_terms([(
                        Monomial(BTreeMap::from([(v.clone(), *e)])),
                        C::one(),
                    )]),
                };
                term = term * factor;
            }
            result = result + term;
        }
        result
    }

    /// Value at the given point, `None` if a variable has no value.
    pub fn evaluate(&self, values: &BTreeMap<V, C>) -> Option<C> {
        let mut result = C::zero();
        for (monomial, c) in self.terms.iter() {
            let mut term = c.clone();
            for (v, e) in monomial.exponents() {
                let value = values.get(v)?;
                for _ in 0..*e {
                    term = term * value.clone();
                }
            }
            result = result + term;
        }
        Some(result)
    }

    pub fn map_coefficients<D: Coefficient>(&self, f: impl Fn(&C) -> D) -> Polynomial<V, D> {
        Polynomial::from_terms(self.terms.iter().map(|(m, c)| (m.clone(), f(c))))
    }
}

impl<V: Ord + Clone, C: Coefficient> Add for Polynomial<V, C> {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        for (monomial, c) in other.terms {
            self.add_term(monomial, c);
        }
        self
    }
}

impl<V: Ord + Clone, C: Coefficient> Sub for Polynomial<V, C> {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self + (-other)
    }
}

impl<V: Ord + Clone, C: Coefficient> Neg for Polynomial<V, C> {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            terms: self.terms.into_iter().map(|(m, c)| (m, -c)).collect(),
        }
    }
}

impl<V: Ord + Clone, C: Coefficient> Mul for Polynomial<V, C> {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        let mut result = Self::zero();
        for (m1, c1) in self.terms.iter() {
            for (m2, c2) in other.terms.iter() {
                result.add_term(m1.times(m2), c1.clone() * c2.clone());
            }
        }
        result
    }
}

impl<V: Ord + fmt::Display + Clone, C: Coefficient + fmt::Display> fmt::Display
    for Polynomial<V, C>
{
    /// Infix notation with the highest monomial first.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (i, (monomial, c)) in self.terms.iter().rev().enumerate() {
            let term = if monomial.is_one() {
                c.to_string()
            } else if c.is_one() {
                monomial.to_string()
            } else if (-c.clone()).is_one() {
                format!("-{}", monomial)
            } else {
                format!("{}*{}", c, monomial)
            };
            match (i, term.strip_prefix('-')) {
                (0, _) => write!(f, "{}", term)?,
                (_, Some(rest)) => write!(f, " - {}", rest)?,
                (_, None) => write!(f, " + {}", term)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use num::BigRational;
    use num::Complex;
    use num::ToPrimitive;
    use proptest::prelude::*;

    use super::Polynomial;

    type P = Polynomial<char, BigRational>;

    fn r(n: i64) -> BigRational {
        BigRational::from_integer(n.into())
    }

    fn x() -> P {
        P::variable('x')
    }

    fn y() -> P {
        P::variable('y')
    }

    fn c(n: i64) -> P {
        P::constant(r(n))
    }

    #[test]
    fn arithmetic() {
        let p = (x() + y()) * (x() - y());
        assert_eq!(p, x() * x() - y() * y());
        assert_eq!(p.degree(), 2);
        assert_eq!(p.num_terms(), 2);
        assert!((p.clone() - p).is_zero());
        assert_eq!((x() + c(1)).pow(2), x() * x() + c(2) * x() + c(1));
    }

    #[test]
    fn univariate() {
        let p = c(3) * x().pow(3) - c(1) + x();
        assert_eq!(p.univariate_variable(), Some('x'));
        assert_eq!(p.univariate_coefficients(&'x'), vec![r(-1), r(1), r(0), r(3)]);
        assert_eq!((x() * y()).univariate_variable(), None);
        assert_eq!(c(5).univariate_variable(), None);
    }

    #[test]
    fn substitution() {
        let p = x() * x() * y() + c(2) * y();
        let q = p.substitute(&'x', &r(3));
        assert_eq!(q, c(11) * y());
        let replacements = BTreeMap::from([('x', -y()), ('y', x())]);
        assert_eq!(
            p.substitute_polynomials(&replacements),
            y() * y() * x() + c(2) * x()
        );
        let q = q.substitute(&'y', &r(2));
        assert!(q.is_constant());
        assert_eq!(q.constant_term(), r(22));
    }

    #[test]
    fn evaluation_and_coefficient_change() {
        let p = x() * y() - c(1);
        let values = BTreeMap::from([('x', r(2)), ('y', r(3))]);
        assert_eq!(p.evaluate(&values), Some(r(5)));
        assert_eq!(p.evaluate(&BTreeMap::from([('x', r(2))])), None);
        let q = p.map_coefficients(|c| Complex::new(c.to_f64().unwrap(), 0.0));
        let values = BTreeMap::from([('x', Complex::new(0.0, 1.0)), ('y', Complex::new(0.0, 1.0))]);
        assert_eq!(q.evaluate(&values), Some(Complex::new(-2.0, 0.0)));
    }

    #[test]
    fn display() {
        let p = x() * x() - c(2) * x() * y() + c(1);
        assert_eq!(p.to_string(), "x^2 - 2*x*y + 1");
        assert_eq!((-x() + c(3)).to_string(), "-x + 3");
        assert_eq!(P::zero().to_string(), "0");
    }

    fn arb_polynomial() -> impl Strategy<Value = P> {
        proptest::collection::vec((-3i64..4, 0u32..3, 0u32..3), 0..5).prop_map(|terms| {
            terms
                .into_iter()
                .fold(P::zero(), |acc, (coeff, ex, ey)| {
                    acc + c(coeff) * x().pow(ex) * y().pow(ey)
                })
        })
    }

    proptest! {
        #[test]
        fn multiplication_distributes(a in arb_polynomial(), b in arb_polynomial(), d in arb_polynomial()) {
            prop_assert_eq!(a.clone() * (b.clone() + d.clone()), a.clone() * b + a * d);
        }

        #[test]
        fn substitution_is_a_ring_homomorphism(a in arb_polynomial(), b in arb_polynomial(), v in -3i64..4) {
            prop_assert_eq!(
                (a.clone() * b.clone()).substitute(&'x', &r(v)),
                a.substitute(&'x', &r(v)) * b.substitute(&'x', &r(v))
            );
        }
    }
}
