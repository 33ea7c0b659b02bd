use num::BigInt;
use num::BigRational;
use num::One;
use num::Zero;

use super::number::Precision;
use super::number::Real;
use super::number::Scalar;

/// Coefficients `B_{2k} / (2k+1)!` for `k = 1..=count`.
///
/// Uses `sum_{j=0}^{m} b_j / (m + 1 - j)! = 0` for the scaled
/// Bernoulli numbers `b_j = B_j / j!`.
fn bernoulli_coefficients(count: usize) -> Vec<BigRational> {
    let mut inverse_factorials = vec![BigRational::one()];
    for n in 1..=2 * count + 1 {
        let next = &inverse_factorials[n - 1] / BigRational::from_integer(BigInt::from(n));
        inverse_factorials.push(next);
    }
    let half = BigRational::new(BigInt::one(), BigInt::from(2));
    let mut even: Vec<BigRational> = Vec::with_capacity(count);
    for k in 1..=count {
        let mut sum = &inverse_factorials[2 * k + 1] - &half * &inverse_factorials[2 * k];
        for (i, b) in even.iter().enumerate() {
            sum += b * &inverse_factorials[2 * (k - i) - 1];
        }
        even.push(-sum);
    }
    even.into_iter()
        .enumerate()
        .map(|(i, b)| b / BigRational::from_integer(BigInt::from(2 * i + 3)))
        .collect()
}

/// The principal branch of the dilogarithm at a fixed precision, with
/// the branch cut on the real axis from 1 to infinity. On the cut the
/// imaginary part is taken as `-pi * ln(z)`.
pub struct Dilogarithm<S: Scalar> {
    coefficients: Vec<S>,
    quarter: S,
    pi: S::Real,
    pi_squared_over_six: S,
}

impl<S: Scalar> Dilogarithm<S> {
    pub fn new(precision: &Precision) -> Self {
        // |u| stays below 1.3, so every term gains more than four bits
        let count = (precision.bits() / 4 + 4) as usize;
        let coefficients = bernoulli_coefficients(count)
            .iter()
            .map(|c| S::from_rational(c, precision))
            .collect();
        let pi = S::pi(precision);
        let pi_squared = S::new(pi.clone() * pi.clone(), S::Real::zero());
        Self {
            coefficients,
            quarter: S::from_parts(0.25, 0.0, precision),
            pi,
            pi_squared_over_six: pi_squared / S::from_integer(6),
        }
    }

    /// Bernoulli series of `Li2(1 - e^{-u})`.
    fn series(&self, u: &S) -> S {
        let u2 = u.clone() * u.clone();
        let mut sum = S::zero();
        for c in self.coefficients.iter().rev() {
            sum = sum * u2.clone() + c.clone();
        }
        u.clone() + u2 * (u.clone() * sum - self.quarter.clone())
    }

    /// Uses `Li2(z) = -Li2(1/z) - ln(-z)^2 / 2 - pi^2 / 6`.
    fn reflected(&self, z: &S) -> S {
        let one = S::one();
        let u = -(one.clone() - one / z.clone()).ln();
        let log = (-z.clone()).ln();
        -self.series(&u) - log.clone() * log / S::from_integer(2) - self.pi_squared_over_six.clone()
    }

    pub fn eval(&self, z: &S) -> S {
        if z.is_zero() {
            return S::zero();
        }
        if z.is_one() {
            return self.pi_squared_over_six.clone();
        }
        let one = S::one();
        let (re, im) = (z.re().to_f64(), z.im().to_f64());
        let norm_sqr = re * re + im * im;
        let value = if re <= 0.5 {
            if norm_sqr > 1.0 {
                self.reflected(z)
            } else {
                self.series(&-(one - z.clone()).ln())
            }
        } else if norm_sqr <= 2.0 * re {
            let u = -z.ln();
            -self.series(&u) + u * (one - z.clone()).ln() + self.pi_squared_over_six.clone()
        } else {
            self.reflected(z)
        };
        if z.im().is_zero() && re > 1.0 {
            S::new(value.re(), -(self.pi.clone() * z.re().ln()))
        } else {
            value
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use num::BigInt;
    use num::BigRational;
    use num::Complex;

    use super::bernoulli_coefficients;
    use super::Dilogarithm;
    use crate::algebra::bigfloat::BigComplex;
    use crate::algebra::bigfloat::BigFloat;
    use crate::algebra::number::Precision;
    use crate::algebra::number::Scalar;

    type C = Complex<f64>;

    fn dilog(z: C) -> C {
        Dilogarithm::new(&Precision::default()).eval(&z)
    }

    fn assert_close(x: C, y: C) {
        assert!((x - y).norm() < 1e-13, "{} {}", x, y);
    }

    #[test]
    fn coefficients() {
        let rational = |n: i64, d: i64| BigRational::new(BigInt::from(n), BigInt::from(d));
        assert_eq!(
            bernoulli_coefficients(4),
            vec![
                rational(1, 36),
                rational(-1, 3600),
                rational(1, 211680),
                rational(-1, 10886400)
            ]
        );
    }

    #[test]
    fn special_values() {
        assert_close(dilog(C::new(0.0, 0.0)), C::new(0.0, 0.0));
        assert_close(dilog(C::new(1.0, 0.0)), C::new(PI * PI / 6.0, 0.0));
        assert_close(dilog(C::new(-1.0, 0.0)), C::new(-PI * PI / 12.0, 0.0));
        let ln2 = 2f64.ln();
        assert_close(
            dilog(C::new(0.5, 0.0)),
            C::new(PI * PI / 12.0 - ln2 * ln2 / 2.0, 0.0),
        );
        assert_close(dilog(C::new(2.0, 0.0)), C::new(PI * PI / 4.0, -PI * ln2));
    }

    #[test]
    fn sixth_root_of_unity() {
        // Im Li2(e^{i pi / 3}) is the volume of the regular ideal tetrahedron.
        let z = C::from_polar(1.0, PI / 3.0);
        let value = dilog(z);
        assert!((value.re - PI * PI / 36.0).abs() < 1e-13);
        assert!((value.im - 1.0149416064096536).abs() < 1e-13);
    }

    #[test]
    fn sixth_root_of_unity_to_forty_digits() {
        let precision = Precision::new(40, None).unwrap();
        let bits = precision.bits();
        let two = BigFloat::from(2);
        let z = BigComplex::new(
            BigFloat::from_f64(0.5).with_bits(bits),
            BigFloat::from(3).with_bits(bits).sqrt() / two,
        );
        let value = Dilogarithm::new(&precision).eval(&z);
        let expected_im =
            BigFloat::parse_with_bits("1.01494160640965362502120255427452028594169", bits).unwrap();
        assert!((value.im.clone() - expected_im).abs().to_f64() < 1e-35, "{}", value);
        let pi = BigComplex::pi(&precision);
        let expected_re = pi.clone() * pi / BigFloat::from(36);
        assert!((value.re - expected_re).abs().to_f64() < 1e-35);
    }

    #[test]
    fn reflection_formula() {
        // Li2(z) + Li2(1 - z) = pi^2 / 6 - ln(z) ln(1 - z)
        let one = C::new(1.0, 0.0);
        for z in [
            C::new(0.3, 0.4),
            C::new(-2.0, 1.5),
            C::new(0.9, -0.7),
            C::new(3.0, 0.2),
        ] {
            let lhs = dilog(z) + dilog(one - z);
            let rhs = C::new(PI * PI / 6.0, 0.0) - z.ln() * (one - z).ln();
            assert_close(lhs, rhs);
        }
    }

    #[test]
    fn series_agrees_with_definition_inside_unit_disk() {
        let z = C::new(0.2, -0.3);
        let direct: C = (1..200).map(|k| z.powu(k) / (k * k) as f64).sum();
        assert_close(dilog(z), direct);
    }
}
