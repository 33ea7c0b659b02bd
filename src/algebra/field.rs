use std::fmt;
use std::fmt::Debug;
use std::ops::Add;
use std::ops::Div;
use std::ops::Mul;
use std::ops::Neg;
use std::ops::Sub;

use num::BigInt;
use num::BigRational;
use num::One;
use num::Zero;

pub trait Field:
    Clone
    + PartialEq
    + Debug
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    fn from_int(n: i64) -> Self;
}

pub trait FiniteField: Field {
    /// All elements, starting with zero.
    fn elements() -> Vec<Self>;
}

impl Field for BigRational {
    fn from_int(n: i64) -> Self {
        BigRational::from_integer(BigInt::from(n))
    }
}

/// The integers modulo the prime `P`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimeField<const P: u64>(u64);

pub type F2 = PrimeField<2>;

impl<const P: u64> PrimeField<P> {
    pub fn new(n: i64) -> Self {
        Self(n.rem_euclid(P as i64) as u64)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    fn pow(self, mut exponent: u64) -> Self {
        let mut base = self;
        let mut result = Self::one();
        while exponent > 0 {
            if exponent % 2 == 1 {
                result = result * base;
            }
            base = base * base;
            exponent /= 2;
        }
        result
    }

    pub fn inverse(self) -> Self {
        debug_assert!(self.0 != 0, "Inverse of zero in Z/{}", P);
        self.pow(P - 2)
    }
}

impl<const P: u64> Debug for PrimeField<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (mod {})", self.0, P)
    }
}

impl<const P: u64> fmt::Display for PrimeField<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<const P: u64> Add for PrimeField<P> {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self((self.0 + other.0) % P)
    }
}

impl<const P: u64> Sub for PrimeField<P> {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self((self.0 + P - other.0) % P)
    }
}

impl<const P: u64> Mul for PrimeField<P> {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        Self((self.0 * other.0) % P)
    }
}

impl<const P: u64> Div for PrimeField<P> {
    type Output = Self;

    #[allow(clippy::suspicious_arithmetic_impl)]
    fn div(self, other: Self) -> Self {
        self * other.inverse()
    }
}

impl<const P: u64> Neg for PrimeField<P> {
    type Output = Self;

    fn neg(self) -> Self {
        Self((P - self.0) % P)
    }
}

impl<const P: u64> Zero for PrimeField<P> {
    fn zero() -> Self {
        Self(0)
    }

    fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl<const P: u64> One for PrimeField<P> {
    fn one() -> Self {
        Self(1 % P)
    }
}

impl<const P: u64> Field for PrimeField<P> {
    fn from_int(n: i64) -> Self {
        Self::new(n)
    }
}

impl<const P: u64> FiniteField for PrimeField<P> {
    fn elements() -> Vec<Self> {
        (0..P).map(Self).collect()
    }
}

/// All vectors of the given length, in lexicographic order with the
/// first entry most significant.
pub fn all_vectors<F: FiniteField>(length: usize) -> Vec<Vec<F>> {
    if length == 0 {
        return vec![vec![]];
    }
    let shorter = all_vectors::<F>(length - 1);
    F::elements()
        .into_iter()
        .flat_map(|first| {
            shorter.iter().map(move |rest| {
                let mut v = vec![first.clone()];
                v.extend(rest.iter().cloned());
                v
            })
        })
        .collect()
}
