use std::f64::consts::LOG2_10;
use std::f64::consts::PI;
use std::fmt::Debug;
use std::fmt::Display;
use std::ops::Neg;

use num::BigRational;
use num::Complex;
use num::One;
use num::ToPrimitive;
use num::Zero;

use super::bigfloat::BigComplex;
use super::bigfloat::BigFloat;
use crate::error::PtolemyError;
use crate::error::Result;

/// Working precision and the tolerance used by every numerical
/// consistency check. Constructed once and passed down explicitly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Precision {
    pub digits: u32,
    pub epsilon: f64,
}

/// The tolerance is this many digits coarser than the working precision.
pub const TOLERANCE_DIGITS_LOST: u32 = 6;
/// Up to this many digits, computations run in double precision.
pub const DOUBLE_DIGITS: u32 = 15;
pub const MAX_DIGITS: u32 = 300;
/// Bits carried beyond the requested digits.
const EXTRA_BITS: u64 = 8;

impl Precision {
    pub fn new(digits: u32, epsilon: Option<f64>) -> Result<Self> {
        if digits > MAX_DIGITS {
            return Err(PtolemyError::Parameters(format!(
                "requested {} digits, at most {} are supported",
                digits, MAX_DIGITS
            )));
        }
        if digits <= TOLERANCE_DIGITS_LOST && epsilon.is_none() {
            return Err(PtolemyError::Parameters(format!(
                "at least {} digits needed",
                TOLERANCE_DIGITS_LOST + 1
            )));
        }
        let epsilon =
            epsilon.unwrap_or_else(|| 10f64.powi(-((digits - TOLERANCE_DIGITS_LOST) as i32)));
        Ok(Self { digits, epsilon })
    }

    /// Whether double precision arithmetic carries enough digits.
    pub fn fits_double(&self) -> bool {
        self.digits <= DOUBLE_DIGITS
    }

    /// Significant bits of arbitrary precision numbers.
    pub fn bits(&self) -> u64 {
        (self.digits as f64 * LOG2_10).ceil() as u64 + EXTRA_BITS
    }

    /// Relative step size at which iterative methods stop.
    pub fn convergence_threshold(&self) -> f64 {
        10f64.powi(2 - self.digits as i32)
    }

    pub fn is_negligible<S: Scalar>(&self, x: &S) -> bool {
        x.abs().to_f64() < self.epsilon
    }

    pub fn is_small<R: Real>(&self, x: &R) -> bool {
        x.abs().to_f64() < self.epsilon
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self {
            digits: DOUBLE_DIGITS,
            epsilon: 1e-9,
        }
    }
}

/// Real numbers underlying a [`Scalar`].
pub trait Real: num::Num + Clone + PartialOrd + Neg<Output = Self> + Debug + Display {
    /// The exact value of `x`.
    fn from_f64(x: f64) -> Self;
    fn to_f64(&self) -> f64;
    fn abs(&self) -> Self;
    fn ln(&self) -> Self;
    fn is_finite(&self) -> bool;
    /// The nearest integer, if it fits.
    fn round(&self) -> Option<i64>;
}

impl Real for f64 {
    fn from_f64(x: f64) -> Self {
        x
    }

    fn to_f64(&self) -> f64 {
        *self
    }

    fn abs(&self) -> Self {
        f64::abs(*self)
    }

    fn ln(&self) -> Self {
        f64::ln(*self)
    }

    fn is_finite(&self) -> bool {
        f64::is_finite(*self)
    }

    fn round(&self) -> Option<i64> {
        let rounded = f64::round(*self);
        (rounded.abs() < i64::MAX as f64).then(|| rounded as i64)
    }
}

impl Real for BigFloat {
    fn from_f64(x: f64) -> Self {
        BigFloat::from_f64(x)
    }

    fn to_f64(&self) -> f64 {
        BigFloat::to_f64(self)
    }

    fn abs(&self) -> Self {
        BigFloat::abs(self)
    }

    fn ln(&self) -> Self {
        BigFloat::ln(self)
    }

    fn is_finite(&self) -> bool {
        BigFloat::is_finite(self)
    }

    fn round(&self) -> Option<i64> {
        self.round_to_integer().and_then(|n| n.to_i64())
    }
}

/// The complex numbers all numerical algorithms are generic over.
pub trait Scalar: num::Num + Clone + Neg<Output = Self> + Debug + Display {
    type Real: Real;

    fn new(re: Self::Real, im: Self::Real) -> Self;
    fn re(&self) -> Self::Real;
    fn im(&self) -> Self::Real;

    fn from_parts(re: f64, im: f64, precision: &Precision) -> Self;
    fn from_rational(x: &BigRational, precision: &Precision) -> Self;
    fn pi(precision: &Precision) -> Self::Real;

    fn abs(&self) -> Self::Real;
    /// In `(-pi, pi]`.
    fn arg(&self) -> Self::Real;
    fn ln(&self) -> Self;
    fn exp(&self) -> Self;
    fn sqrt(&self) -> Self;

    fn powu(&self, exponent: u32) -> Self {
        num::pow(self.clone(), exponent as usize)
    }

    fn from_integer(n: i64) -> Self {
        Self::new(Self::Real::from_f64(n as f64), Self::Real::zero())
    }

    fn scale(&self, factor: i64) -> Self {
        self.clone() * Self::from_integer(factor)
    }

    fn pi_i(precision: &Precision) -> Self {
        Self::new(Self::Real::zero(), Self::pi(precision))
    }

    fn i() -> Self {
        Self::new(Self::Real::zero(), Self::Real::one())
    }

    fn to_complex(&self) -> Complex<f64> {
        Complex::new(self.re().to_f64(), self.im().to_f64())
    }
}

impl Scalar for Complex<f64> {
    type Real = f64;

    fn new(re: f64, im: f64) -> Self {
        Complex::new(re, im)
    }

    fn re(&self) -> f64 {
        self.re
    }

    fn im(&self) -> f64 {
        self.im
    }

    fn from_parts(re: f64, im: f64, _: &Precision) -> Self {
        Complex::new(re, im)
    }

    fn from_rational(x: &BigRational, _: &Precision) -> Self {
        Complex::new(x.to_f64().unwrap_or(f64::NAN), 0.0)
    }

    fn pi(_: &Precision) -> f64 {
        PI
    }

    fn abs(&self) -> f64 {
        self.norm()
    }

    fn arg(&self) -> f64 {
        Complex::arg(*self)
    }

    fn ln(&self) -> Self {
        Complex::ln(*self)
    }

    fn exp(&self) -> Self {
        Complex::exp(*self)
    }

    fn sqrt(&self) -> Self {
        Complex::sqrt(*self)
    }

    fn powu(&self, exponent: u32) -> Self {
        Complex::powu(self, exponent)
    }
}

impl Scalar for BigComplex {
    type Real = BigFloat;

    fn new(re: BigFloat, im: BigFloat) -> Self {
        Complex::new(re, im)
    }

    fn re(&self) -> BigFloat {
        self.re.clone()
    }

    fn im(&self) -> BigFloat {
        self.im.clone()
    }

    fn from_parts(re: f64, im: f64, precision: &Precision) -> Self {
        Complex::new(
            BigFloat::from_f64(re).with_bits(precision.bits()),
            BigFloat::from_f64(im).with_bits(precision.bits()),
        )
    }

    fn from_rational(x: &BigRational, precision: &Precision) -> Self {
        Complex::new(
            BigFloat::from_rational(x, precision.bits()),
            BigFloat::zero().with_bits(precision.bits()),
        )
    }

    fn pi(precision: &Precision) -> BigFloat {
        BigFloat::pi(precision.bits())
    }

    fn abs(&self) -> BigFloat {
        (self.re.clone() * self.re.clone() + self.im.clone() * self.im.clone()).sqrt()
    }

    fn arg(&self) -> BigFloat {
        self.im.atan2(&self.re)
    }

    fn ln(&self) -> Self {
        Complex::new(Scalar::abs(self).ln(), Scalar::arg(self))
    }

    fn exp(&self) -> Self {
        let (sin, cos) = self.im.sin_cos();
        let radius = self.re.exp();
        Complex::new(radius.clone() * cos, radius * sin)
    }

    fn sqrt(&self) -> Self {
        if self.is_zero() {
            return self.clone();
        }
        let two = BigFloat::from(2);
        let radius = Scalar::abs(self);
        if !self.re.is_negative() {
            let t = ((radius + self.re.clone()) / two.clone()).sqrt();
            let im = self.im.clone() / (two * t.clone());
            Complex::new(t, im)
        } else {
            let t = ((radius - self.re.clone()) / two.clone()).sqrt();
            let re = self.im.abs() / (two * t.clone());
            let im = if self.im.is_negative() { -t } else { t };
            Complex::new(re, im)
        }
    }
}

#[cfg(test)]
mod tests {
    use num::BigRational;
    use num::Complex;

    use super::Precision;
    use super::Real;
    use super::Scalar;
    use crate::algebra::bigfloat::BigComplex;
    use crate::algebra::bigfloat::BigFloat;

    type C = Complex<f64>;

    #[test]
    fn default_precision() {
        let precision = Precision::new(15, None).unwrap();
        assert_eq!(precision, Precision::default());
        assert!(precision.fits_double());
        assert!(Precision::new(301, None).is_err());
        assert!(Precision::new(5, None).is_err());
        assert_eq!(Precision::new(12, Some(1e-7)).unwrap().epsilon, 1e-7);
    }

    #[test]
    fn high_precision() {
        let precision = Precision::new(30, None).unwrap();
        assert!(!precision.fits_double());
        assert!((precision.epsilon / 1e-24 - 1.0).abs() < 1e-12);
        assert_eq!(precision.bits(), 108);
        assert!(Precision::new(300, None).is_ok());
    }

    #[test]
    fn negligible() {
        let precision = Precision::default();
        assert!(precision.is_negligible(&C::new(1e-10, -1e-10)));
        assert!(!precision.is_negligible(&C::new(1e-8, 0.0)));
        assert!(precision.is_small(&-1e-10));
    }

    #[test]
    fn rounding() {
        assert_eq!(Real::round(&-2.0000000001f64), Some(-2));
        assert_eq!(Real::round(&1e300f64), None);
        assert_eq!(Real::round(&f64::NAN), None);
    }

    #[test]
    fn conversions() {
        let precision = Precision::default();
        let x = C::from_rational(&BigRational::new(3.into(), 4.into()), &precision);
        assert_eq!(x, C::new(0.75, 0.0));
        assert_eq!(C::pi_i(&precision) * C::i(), C::new(-C::pi(&precision), 0.0));
    }

    #[test]
    fn big_complex_functions() {
        let precision = Precision::new(40, None).unwrap();
        let third = BigRational::new(1.into(), 3.into());
        let z = BigComplex::from_rational(&third, &precision) + BigComplex::i();
        let recovered = Scalar::exp(&Scalar::ln(&z));
        assert!(precision.is_negligible(&(recovered - z.clone())));
        let root = Scalar::sqrt(&z);
        assert!(precision.is_negligible(&(root.clone() * root - z)));
        let minus_four = BigComplex::from_integer(-4);
        let root = Scalar::sqrt(&minus_four);
        assert!(precision.is_negligible(&(root - Scalar::scale(&BigComplex::i(), 2))));
        let pi = BigComplex::pi(&precision);
        assert_eq!(pi.bits(), precision.bits());
        let half_turn = Scalar::exp(&BigComplex::pi_i(&precision));
        assert!(precision.is_negligible(&(half_turn + BigComplex::from_integer(1))));
        assert_eq!(
            Scalar::arg(&BigComplex::from_integer(-1)),
            BigFloat::pi(128)
        );
        assert_eq!(Real::round(&BigFloat::from_f64(-2.5)), Some(-3));
    }
}
