//! Binary floating point numbers of arbitrary precision, `m · 2^e`
//! with a big integer mantissa.
//!
//! Every number carries the number of significant bits arithmetic on
//! it keeps. Results of an operation get the larger precision of the
//! operands. Numbers converted from doubles and integers are exact and
//! have no precision of their own.

use std::cmp::Ordering;
use std::f64::consts::FRAC_PI_2;
use std::f64::consts::LN_2;
use std::f64::consts::LOG10_2;
use std::fmt;
use std::ops::Add;
use std::ops::Div;
use std::ops::Mul;
use std::ops::Neg;
use std::ops::Rem;
use std::ops::Sub;
use std::str::FromStr;

use num::bigint::Sign;
use num::BigInt;
use num::BigRational;
use num::Complex;
use num::One;
use num::Signed;
use num::ToPrimitive;
use num::Zero;
use thiserror::Error;

/// Bits carried beyond the result precision inside elementary functions.
const GUARD_BITS: u64 = 32;
/// Precision of quotients and elementary functions of exact numbers.
const EXACT_RESULT_BITS: u64 = 128;
/// The exponential series is summed for `x / 2^EXP_HALVINGS`.
const EXP_HALVINGS: u64 = 8;
/// Half angle reductions before the arctangent series.
const ATAN_HALVINGS: u32 = 3;
/// Arguments of `exp` and `sin_cos` beyond this are rejected.
const MAX_ARGUMENT: f64 = 1e12;

pub type BigComplex = Complex<BigFloat>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid number: {0}")]
pub struct ParseBigFloatError(String);

#[derive(Clone, Debug)]
pub struct BigFloat {
    mantissa: BigInt,
    exponent: i64,
    /// Zero for exact numbers.
    bits: u64,
    /// Cleared by invalid operations such as division by zero.
    finite: bool,
}

/// `x / 2^shift`, rounded to the nearest integer with halves away
/// from zero.
fn round_shift(x: &BigInt, shift: u64) -> BigInt {
    if shift == 0 {
        return x.clone();
    }
    let half = BigInt::one() << (shift - 1);
    let magnitude = (x.abs() + half) >> shift;
    if x.is_negative() {
        -magnitude
    } else {
        magnitude
    }
}

fn bit_length(n: i64) -> u64 {
    64 - n.unsigned_abs().leading_zeros() as u64
}

/// `atan(1/n)` in fixed point with `w` fractional bits.
fn atan_inverse(n: u32, w: u64) -> BigInt {
    let mut term = (BigInt::one() << w) / n;
    let mut sum = term.clone();
    let n_squared = n * n;
    for k in 1u32.. {
        term = term / n_squared;
        if term.is_zero() {
            break;
        }
        let summand = &term / (2 * k + 1);
        if k % 2 == 1 {
            sum -= summand;
        } else {
            sum += summand;
        }
    }
    sum
}

/// `atanh(1/n)` in fixed point with `w` fractional bits.
fn atanh_inverse(n: u32, w: u64) -> BigInt {
    let mut term = (BigInt::one() << w) / n;
    let mut sum = term.clone();
    let n_squared = n * n;
    for k in 1u32.. {
        term = term / n_squared;
        if term.is_zero() {
            break;
        }
        sum += &term / (2 * k + 1);
    }
    sum
}

/// Machin's formula `pi = 16 atan(1/5) - 4 atan(1/239)`.
fn pi_fixed(w: u64) -> BigInt {
    let wide = w + 16;
    (atan_inverse(5, wide) * 16u32 - atan_inverse(239, wide) * 4u32) >> 16u32
}

/// `ln 2 = 2 atanh(1/3)`.
fn ln2_fixed(w: u64) -> BigInt {
    let wide = w + 16;
    (atanh_inverse(3, wide) * 2u32) >> 16u32
}

/// `exp(r)` for `|r| <= ln(2) / 2`, both in fixed point.
fn exp_series(r: &BigInt, w: u64) -> BigInt {
    // r / 2^EXP_HALVINGS at precision wide has the same digits as r
    let wide = w + EXP_HALVINGS;
    let one = BigInt::one() << wide;
    let mut sum = &one + r;
    let mut term = r.clone();
    for n in 2u64.. {
        term = ((term * r) >> wide) / n;
        if term.is_zero() {
            break;
        }
        sum += &term;
    }
    for _ in 0..EXP_HALVINGS {
        sum = (&sum * &sum) >> wide;
    }
    sum >> EXP_HALVINGS
}

/// `(sin r, cos r)` for `|r| <= pi / 4`, both in fixed point.
fn sin_cos_series(r: &BigInt, w: u64) -> (BigInt, BigInt) {
    let r_squared = (r * r) >> w;
    let mut sin = r.clone();
    let mut term = r.clone();
    for n in 1u64.. {
        term = -((term * &r_squared) >> w) / ((2 * n) * (2 * n + 1));
        if term.is_zero() {
            break;
        }
        sin += &term;
    }
    let mut cos = BigInt::one() << w;
    let mut term = cos.clone();
    for n in 1u64.. {
        term = -((term * &r_squared) >> w) / ((2 * n - 1) * (2 * n));
        if term.is_zero() {
            break;
        }
        cos += &term;
    }
    (sin, cos)
}

/// `atan(r)` for `0 <= r <= 1` in fixed point.
fn atan_series(r: &BigInt, w: u64) -> BigInt {
    let one = BigInt::one() << w;
    let mut r = r.clone();
    for _ in 0..ATAN_HALVINGS {
        // atan(r) = 2 atan(r / (1 + sqrt(1 + r^2)))
        let root = ((&one + ((&r * &r) >> w)) << w).sqrt();
        r = (r << w) / (&one + root);
    }
    let r_squared = (&r * &r) >> w;
    let mut sum = r.clone();
    let mut power = r;
    for n in 1u64.. {
        power = -((power * &r_squared) >> w);
        let term = &power / (2 * n + 1);
        if term.is_zero() {
            break;
        }
        sum += term;
    }
    sum << ATAN_HALVINGS
}

impl BigFloat {
    fn from_parts(mantissa: BigInt, exponent: i64, bits: u64) -> Self {
        Self {
            mantissa,
            exponent,
            bits,
            finite: true,
        }
        .normalized()
    }

    fn from_fixed(value: BigInt, w: u64, bits: u64) -> Self {
        Self::from_parts(value, -(w as i64), bits)
    }

    pub fn nan() -> Self {
        Self {
            mantissa: BigInt::zero(),
            exponent: 0,
            bits: 0,
            finite: false,
        }
    }

    /// The exact value of a double. Infinities and NaN are not finite.
    pub fn from_f64(x: f64) -> Self {
        if !x.is_finite() {
            return Self::nan();
        }
        let (mantissa, exponent, sign) = num::Float::integer_decode(x);
        let mantissa = BigInt::from(mantissa) * i64::from(sign);
        Self::from_parts(mantissa, i64::from(exponent), 0)
    }

    pub fn from_rational(x: &BigRational, bits: u64) -> Self {
        let (numerator, denominator) = (x.numer(), x.denom());
        if numerator.is_zero() {
            return Self::zero().with_bits(bits);
        }
        let target = bits + 2;
        let shift = (target + denominator.bits()).saturating_sub(numerator.bits());
        Self::from_parts((numerator << shift) / denominator, -(shift as i64), bits)
    }

    pub fn pi(bits: u64) -> Self {
        let w = bits + GUARD_BITS;
        Self::from_fixed(pi_fixed(w), w, bits)
    }

    /// The same value, rounded to `bits` significant bits from now on.
    pub fn with_bits(mut self, bits: u64) -> Self {
        self.bits = bits;
        self.normalized()
    }

    pub fn bits(&self) -> u64 {
        self.bits
    }

    pub fn is_finite(&self) -> bool {
        self.finite
    }

    pub fn is_negative(&self) -> bool {
        self.finite && self.mantissa.is_negative()
    }

    fn normalized(mut self) -> Self {
        if self.mantissa.is_zero() {
            self.exponent = 0;
            return self;
        }
        let length = self.mantissa.bits();
        if self.bits > 0 && length > self.bits {
            let shift = length - self.bits;
            self.mantissa = round_shift(&self.mantissa, shift);
            self.exponent += shift as i64;
        }
        self
    }

    /// `2^(top - 1) <= |x| < 2^top` for non-zero `x`.
    fn top(&self) -> i64 {
        self.exponent + self.mantissa.bits() as i64
    }

    fn working_bits(&self) -> u64 {
        if self.bits == 0 {
            EXACT_RESULT_BITS
        } else {
            self.bits
        }
    }

    fn combined_bits(&self, other: &Self) -> u64 {
        self.bits.max(other.bits)
    }

    /// `round(x · 2^w)`.
    fn to_fixed(&self, w: u64) -> BigInt {
        let shift = self.exponent + w as i64;
        if shift >= 0 {
            &self.mantissa << shift as u64
        } else {
            round_shift(&self.mantissa, shift.unsigned_abs())
        }
    }

    pub fn abs(&self) -> Self {
        Self {
            mantissa: self.mantissa.abs(),
            ..self.clone()
        }
    }

    pub fn to_f64(&self) -> f64 {
        if !self.finite {
            return f64::NAN;
        }
        if self.mantissa.is_zero() {
            return 0.0;
        }
        let length = self.mantissa.bits();
        let (mantissa, exponent) = if length > 64 {
            (
                round_shift(&self.mantissa, length - 64),
                self.exponent + (length - 64) as i64,
            )
        } else {
            (self.mantissa.clone(), self.exponent)
        };
        let mantissa = mantissa.to_f64().unwrap_or(f64::NAN);
        if exponent > 2200 {
            return mantissa * f64::INFINITY;
        }
        if exponent < -2300 {
            return 0.0;
        }
        let exponent = exponent as i32;
        let third = exponent / 3;
        mantissa * 2f64.powi(third) * 2f64.powi(third) * 2f64.powi(exponent - 2 * third)
    }

    /// The nearest integer, halves rounded away from zero.
    pub fn round_to_integer(&self) -> Option<BigInt> {
        if !self.finite {
            return None;
        }
        if self.exponent >= 0 {
            if self.top() > 4096 {
                return None;
            }
            Some(&self.mantissa << self.exponent as u64)
        } else {
            Some(round_shift(&self.mantissa, self.exponent.unsigned_abs()))
        }
    }

    /// Rounds towards zero.
    fn trunc(&self) -> Self {
        if self.exponent >= 0 || !self.finite {
            return self.clone();
        }
        let divisor = BigInt::one() << self.exponent.unsigned_abs();
        Self::from_parts(&self.mantissa / divisor, 0, 0)
    }

    pub fn sqrt(&self) -> Self {
        if !self.finite || self.is_negative() {
            return Self::nan();
        }
        let bits = self.working_bits();
        if self.mantissa.is_zero() {
            return Self::zero().with_bits(bits);
        }
        let target = 2 * (bits + 2);
        let mut shift = target.saturating_sub(self.mantissa.bits()) as i64;
        if (self.exponent - shift).rem_euclid(2) == 1 {
            shift += 1;
        }
        let mantissa = &self.mantissa << shift as u64;
        Self::from_parts(mantissa.sqrt(), (self.exponent - shift) / 2, bits)
    }

    pub fn exp(&self) -> Self {
        if !self.finite {
            return Self::nan();
        }
        let bits = self.working_bits();
        let approximate = self.to_f64();
        if approximate.abs() > MAX_ARGUMENT {
            return Self::nan();
        }
        // x = k ln 2 + r
        let k = (approximate / LN_2).round() as i64;
        let w = bits + GUARD_BITS;
        let wide = w + bit_length(k) + 2;
        let r = (self.to_fixed(wide) - ln2_fixed(wide) * k) >> (wide - w);
        Self::from_parts(exp_series(&r, w), k - w as i64, bits)
    }

    /// Natural logarithm of a positive number.
    pub fn ln(&self) -> Self {
        if !self.finite || self.mantissa.sign() != Sign::Plus {
            return Self::nan();
        }
        let bits = self.working_bits();
        let w = bits + GUARD_BITS;
        // x = y 2^k with 3/4 <= y < 3/2
        let length = self.mantissa.bits();
        let mut k = self.exponent + length as i64;
        let mut y = if length <= w {
            &self.mantissa << (w - length)
        } else {
            round_shift(&self.mantissa, length - w)
        };
        if y < BigInt::from(3u32) << (w - 2) {
            y <<= 1u32;
            k -= 1;
        }
        let one = BigInt::one() << w;
        // ln y = 2 atanh((y - 1) / (y + 1))
        let t = ((&y - &one) << w) / (&y + &one);
        let t_squared = (&t * &t) >> w;
        let mut sum = t.clone();
        let mut power = t;
        for n in 1u64.. {
            power = (power * &t_squared) >> w;
            let term = &power / (2 * n + 1);
            if term.is_zero() {
                break;
            }
            sum += term;
        }
        let extra = bit_length(k);
        let log2_multiple = (ln2_fixed(w + extra) * k) >> extra;
        Self::from_fixed((sum << 1u32) + log2_multiple, w, bits)
    }

    /// The angle of `(x, self)` in `(-pi, pi]`.
    pub fn atan2(&self, x: &Self) -> Self {
        if !self.finite || !x.finite {
            return Self::nan();
        }
        let bits = self.combined_bits(x).max(if self.bits == 0 && x.bits == 0 {
            EXACT_RESULT_BITS
        } else {
            0
        });
        if self.mantissa.is_zero() && x.mantissa.is_zero() {
            return Self::zero().with_bits(bits);
        }
        let w = bits + GUARD_BITS;
        let (y_abs, x_abs) = (self.abs().with_bits(bits), x.abs());
        let steep = y_abs > x_abs;
        let ratio = if steep { x_abs / y_abs } else { y_abs / x_abs };
        let mut angle = atan_series(&ratio.to_fixed(w), w);
        let pi = pi_fixed(w);
        if steep {
            angle = (&pi >> 1u32) - angle;
        }
        if x.is_negative() {
            angle = pi - angle;
        }
        if self.is_negative() {
            angle = -angle;
        }
        Self::from_fixed(angle, w, bits)
    }

    pub fn sin_cos(&self) -> (Self, Self) {
        if !self.finite {
            return (Self::nan(), Self::nan());
        }
        let bits = self.working_bits();
        let approximate = self.to_f64();
        if approximate.abs() > MAX_ARGUMENT {
            return (Self::nan(), Self::nan());
        }
        // x = k pi / 2 + r
        let k = (approximate / FRAC_PI_2).round() as i64;
        let w = bits + GUARD_BITS;
        let wide = w + bit_length(k) + 2;
        let half_pi = pi_fixed(wide) >> 1u32;
        let r = (self.to_fixed(wide) - half_pi * k) >> (wide - w);
        let (sin, cos) = sin_cos_series(&r, w);
        let (sin, cos) = match k.rem_euclid(4) {
            0 => (sin, cos),
            1 => (cos, -sin),
            2 => (-sin, -cos),
            _ => (-cos, sin),
        };
        (
            Self::from_fixed(sin, w, bits),
            Self::from_fixed(cos, w, bits),
        )
    }

    fn significant_digits(&self) -> usize {
        if self.bits > 0 {
            return ((self.bits as f64 * LOG10_2).floor() as usize).max(1);
        }
        // m 2^-k has at most k more decimal digits than m
        let length = self.mantissa.bits() + self.exponent.max(0) as u64;
        (length as f64 * LOG10_2).ceil() as usize + self.exponent.min(0).unsigned_abs() as usize
    }

    /// `round(|x| · 10^power)`.
    fn scaled_to_integer(&self, power: i64) -> BigInt {
        let ten = BigInt::from(10u32);
        let mut numerator = self.mantissa.abs();
        let mut denominator = BigInt::one();
        if power >= 0 {
            numerator *= ten.pow(power as u32);
        } else {
            denominator *= ten.pow(power.unsigned_abs() as u32);
        }
        if self.exponent >= 0 {
            numerator <<= self.exponent as u64;
        } else {
            denominator <<= self.exponent.unsigned_abs();
        }
        (numerator * 2u32 + &denominator) / (denominator * 2u32)
    }
}

impl From<i64> for BigFloat {
    fn from(n: i64) -> Self {
        Self::from_parts(BigInt::from(n), 0, 0)
    }
}

impl Zero for BigFloat {
    fn zero() -> Self {
        Self::from_parts(BigInt::zero(), 0, 0)
    }

    fn is_zero(&self) -> bool {
        self.finite && self.mantissa.is_zero()
    }
}

impl One for BigFloat {
    fn one() -> Self {
        Self::from_parts(BigInt::one(), 0, 0)
    }
}

impl Neg for BigFloat {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            mantissa: -self.mantissa,
            ..self
        }
    }
}

impl Add for BigFloat {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        if !self.finite || !other.finite {
            return Self::nan();
        }
        let bits = self.combined_bits(&other);
        if other.mantissa.is_zero() {
            return self.with_bits(bits);
        }
        if self.mantissa.is_zero() {
            return other.with_bits(bits);
        }
        if bits > 0 {
            let margin = bits as i64 + 2;
            if self.top() > other.top() + margin {
                return self.with_bits(bits);
            }
            if other.top() > self.top() + margin {
                return other.with_bits(bits);
            }
        }
        let exponent = self.exponent.min(other.exponent);
        let mantissa = (self.mantissa << (self.exponent - exponent) as u64)
            + (other.mantissa << (other.exponent - exponent) as u64);
        Self::from_parts(mantissa, exponent, bits)
    }
}

impl Sub for BigFloat {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self + (-other)
    }
}

impl Mul for BigFloat {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        if !self.finite || !other.finite {
            return Self::nan();
        }
        let bits = self.combined_bits(&other);
        Self::from_parts(
            self.mantissa * other.mantissa,
            self.exponent + other.exponent,
            bits,
        )
    }
}

impl Div for BigFloat {
    type Output = Self;

    fn div(self, other: Self) -> Self {
        if !self.finite || !other.finite || other.mantissa.is_zero() {
            return Self::nan();
        }
        let bits = match self.combined_bits(&other) {
            0 => EXACT_RESULT_BITS,
            bits => bits,
        };
        if self.mantissa.is_zero() {
            return self.with_bits(bits);
        }
        let target = bits + 2;
        let shift = (target + other.mantissa.bits()).saturating_sub(self.mantissa.bits());
        let quotient = (self.mantissa << shift) / other.mantissa;
        Self::from_parts(
            quotient,
            self.exponent - other.exponent - shift as i64,
            bits,
        )
    }
}

impl Rem for BigFloat {
    type Output = Self;

    fn rem(self, other: Self) -> Self {
        let quotient = (self.clone() / other.clone()).trunc();
        self - other * quotient
    }
}

impl PartialEq for BigFloat {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for BigFloat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if !self.finite || !other.finite {
            return None;
        }
        let (sign, other_sign) = (self.mantissa.sign(), other.mantissa.sign());
        if sign != other_sign {
            return Some(sign.cmp(&other_sign));
        }
        if sign == Sign::NoSign {
            return Some(Ordering::Equal);
        }
        let magnitude = match self.top().cmp(&other.top()) {
            Ordering::Equal => {
                let exponent = self.exponent.min(other.exponent);
                let a = self.mantissa.abs() << (self.exponent - exponent) as u64;
                let b = other.mantissa.abs() << (other.exponent - exponent) as u64;
                a.cmp(&b)
            }
            order => order,
        };
        Some(if sign == Sign::Minus {
            magnitude.reverse()
        } else {
            magnitude
        })
    }
}

/// Splits `-12.5e-3` into `-125` and `-4`.
fn parse_decimal(text: &str) -> Result<(BigInt, i64), ParseBigFloatError> {
    let error = || ParseBigFloatError(text.to_owned());
    let (number, exponent) = match text.find(|c: char| c == 'e' || c == 'E') {
        Some(position) => (
            &text[..position],
            text[position + 1..].parse::<i64>().map_err(|_| error())?,
        ),
        None => (text, 0),
    };
    let (integer, fraction) = number.split_once('.').unwrap_or((number, ""));
    let digits = format!("{}{}", integer, fraction);
    if fraction.starts_with(|c: char| c == '+' || c == '-')
        || !digits.chars().any(|c| c.is_ascii_digit())
    {
        return Err(error());
    }
    let mantissa = digits.parse::<BigInt>().map_err(|_| error())?;
    Ok((mantissa, exponent - fraction.len() as i64))
}

impl BigFloat {
    /// A decimal number rounded to `bits` significant bits.
    pub fn parse_with_bits(text: &str, bits: u64) -> Result<Self, ParseBigFloatError> {
        let (mantissa, power) = parse_decimal(text)?;
        let ten = BigInt::from(10u32);
        if power >= 0 {
            return Ok(Self::from_parts(mantissa * ten.pow(power as u32), 0, bits));
        }
        let value = BigRational::new(mantissa, ten.pow(power.unsigned_abs() as u32));
        Ok(Self::from_rational(&value, bits))
    }
}

impl FromStr for BigFloat {
    type Err = ParseBigFloatError;

    /// Integers are exact. Other decimals keep four bits per digit.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let (mantissa, power) = parse_decimal(text)?;
        if power >= 0 {
            return Self::parse_with_bits(text, 0);
        }
        let bits = EXACT_RESULT_BITS.max(4 * mantissa.bits());
        Self::parse_with_bits(text, bits)
    }
}

impl num::Num for BigFloat {
    type FromStrRadixErr = ParseBigFloatError;

    fn from_str_radix(text: &str, radix: u32) -> Result<Self, Self::FromStrRadixErr> {
        if radix != 10 {
            return Err(ParseBigFloatError(format!("{} in radix {}", text, radix)));
        }
        text.parse()
    }
}

impl fmt::Display for BigFloat {
    /// All significant decimal digits, positional for moderate
    /// exponents and scientific otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.finite {
            return write!(f, "NaN");
        }
        if self.mantissa.is_zero() {
            return write!(f, "0");
        }
        let digits = self.significant_digits();
        let mut power10 = ((self.top() - 1) as f64 * LOG10_2).floor() as i64;
        let mut scaled = self.scaled_to_integer(digits as i64 - 1 - power10);
        let bound = BigInt::from(10u32).pow(digits as u32);
        if scaled >= bound {
            power10 += 1;
            scaled = self.scaled_to_integer(digits as i64 - 1 - power10);
        }
        let text = scaled.to_string();
        if self.mantissa.is_negative() {
            write!(f, "-")?;
        }
        let positional = (-5..21).contains(&power10);
        let (integer, fraction) = if !positional {
            (text[..1].to_owned(), text[1..].to_owned())
        } else if power10 >= 0 {
            let split = power10 as usize + 1;
            if split >= text.len() {
                (format!("{}{}", text, "0".repeat(split - text.len())), String::new())
            } else {
                (text[..split].to_owned(), text[split..].to_owned())
            }
        } else {
            (
                "0".to_owned(),
                format!("{}{}", "0".repeat(power10.unsigned_abs() as usize - 1), text),
            )
        };
        let fraction = fraction.trim_end_matches('0');
        write!(f, "{}", integer)?;
        if !fraction.is_empty() {
            write!(f, ".{}", fraction)?;
        }
        if !positional {
            write!(f, "e{}", power10)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use num::BigInt;
    use num::BigRational;
    use num::One;
    use num::Zero;

    use super::BigFloat;

    const BITS: u64 = 160;

    fn number(text: &str) -> BigFloat {
        BigFloat::parse_with_bits(text, BITS).unwrap()
    }

    /// Agreement to 45 significant digits.
    fn assert_close(x: &BigFloat, expected: &str) {
        let expected = number(expected);
        let difference = (x.clone() - expected.clone()).abs();
        let scale = expected.abs().max_with_one();
        assert!(
            difference < scale * number("1e-45"),
            "{} {}",
            x,
            expected
        );
    }

    impl BigFloat {
        fn max_with_one(self) -> Self {
            if self > BigFloat::one() {
                self
            } else {
                BigFloat::one()
            }
        }
    }

    #[test]
    fn constants() {
        assert_close(
            &BigFloat::pi(BITS),
            "3.14159265358979323846264338327950288419716939937510582",
        );
        assert_close(
            &BigFloat::one().with_bits(BITS).exp(),
            "2.71828182845904523536028747135266249775724709369995957",
        );
        assert_close(
            &BigFloat::from(2).with_bits(BITS).sqrt(),
            "1.41421356237309504880168872420969807856967187537694807",
        );
        assert_close(
            &BigFloat::from(2).with_bits(BITS).ln(),
            "0.693147180559945309417232121458176568075500134360255254",
        );
    }

    #[test]
    fn exp_and_ln_are_inverse() {
        for text in ["0.5", "-3.25", "17.125", "1e-20", "123.456"] {
            let x = number(text);
            assert_close(&x.exp().ln(), text);
        }
        for text in ["0.001", "0.7", "1.0000000001", "2.5", "1e30"] {
            let x = number(text);
            let recovered = x.ln().exp();
            assert_close(&(recovered / x), "1");
        }
    }

    #[test]
    fn trigonometry() {
        let (sin, cos) = number("1").sin_cos();
        assert_close(&sin, "0.841470984807896506652502321630298999622563060798371065");
        assert_close(&cos, "0.540302305868139717400936607442976603732310420617922227");
        let (sin, cos) = number("-10").sin_cos();
        assert_close(&sin, "0.544021110889369813404747661851377281683643012916223892");
        assert_close(&cos, "-0.839071529076452452258863947824064834519930165133168546");
        let one = number("1");
        let quarter_pi = "0.785398163397448309615660845819875721049292349843776455";
        assert_close(&one.atan2(&one), quarter_pi);
        assert_close(
            &one.atan2(&-one.clone()),
            "2.35619449019234492884698253745962716314787704953132937",
        );
        assert_close(
            &(-one.clone()).atan2(&-one.clone()),
            "-2.35619449019234492884698253745962716314787704953132937",
        );
        assert_close(&BigFloat::zero().atan2(&-one.clone()), "3.14159265358979323846264338327950288419716939937510582");
        assert_close(&one.atan2(&BigFloat::zero()), "1.57079632679489661923132169163975144209858469968755291");
        assert_close(
            &number("0.5").atan2(&one),
            "0.463647609000806116214256231461214402028537054286120264",
        );
    }

    #[test]
    fn arithmetic_keeps_precision() {
        let third = number("1") / number("3");
        assert_eq!(third.bits(), BITS);
        assert_close(&(third.clone() * BigFloat::from(3)), "1");
        assert_close(&(third.clone() + third.clone() + third), "1");
        let tiny = number("1e-60");
        assert_eq!(number("1") + tiny.clone(), number("1"));
        assert!(number("1") < number("1") + number("1e-40"));
        assert!(-tiny.clone() < tiny);
        assert!((number("1") / BigFloat::zero()).to_f64().is_nan());
        assert!(!BigFloat::zero().ln().is_finite());
        assert_eq!(number("7.5") % number("2"), number("1.5"));
    }

    #[test]
    fn conversions() {
        assert_eq!(BigFloat::from_f64(0.75), number("0.75"));
        assert_eq!(BigFloat::from_f64(-1.5e-300).to_f64(), -1.5e-300);
        assert_eq!(number("0.1").to_f64(), 0.1);
        assert_eq!("0.375".parse::<BigFloat>().unwrap(), BigFloat::from_f64(0.375));
        let x = BigFloat::from_rational(&BigRational::new(BigInt::from(-7), BigInt::from(4)), BITS);
        assert_eq!(x.round_to_integer(), Some(BigInt::from(-2)));
        assert_eq!(number("2.5").round_to_integer(), Some(BigInt::from(3)));
        assert_eq!(x.to_string(), "-1.75");
        assert_eq!(BigFloat::from(1000).to_string(), "1000");
        assert_eq!(number("-0.00125").to_string(), "-0.00125");
        assert_eq!(number("6.25e40").to_string(), "6.25e40");
        assert!(BigFloat::pi(BITS).to_string().starts_with("3.141592653589793238462643383279502884197"));
        assert!("1.2.3".parse::<BigFloat>().is_err());
        assert!("".parse::<BigFloat>().is_err());
    }
}
