use log::trace;
use num::Zero;

use crate::algebra::dilog::Dilogarithm;
use crate::algebra::number::Real;
use crate::algebra::Precision;
use crate::algebra::Scalar;
use crate::error::PtolemyError;
use crate::error::Result;

/// The six edge coordinates of one (small) tetrahedron and its
/// orientation.
#[derive(Clone, Debug, PartialEq)]
pub struct PtolemyCochain<S> {
    pub sign: i32,
    pub c01: S,
    pub c02: S,
    pub c03: S,
    pub c12: S,
    pub c13: S,
    pub c23: S,
}

/// `log(c²) / 2`, refusing arguments whose square is close to the
/// negative real axis.
fn log_of_square<S: Scalar>(c: &S, precision: &Precision) -> Result<S> {
    let square = c.clone() * c.clone();
    if !(square.re() > S::Real::zero() || !precision.is_small(&square.im())) {
        return Err(PtolemyError::numerical(
            "logarithm of square near branch cut",
            vec![c.to_complex()],
        ));
    }
    Ok(square.ln() / S::from_integer(2))
}

fn signed<R: Real>(sign: i32, value: R) -> R {
    if sign < 0 {
        -value
    } else {
        value
    }
}

impl<S: Scalar> PtolemyCochain<S> {
    /// Edge coordinates in the order 01, 02, 03, 12, 13, 23.
    pub fn new(sign: i32, edges: [S; 6]) -> Self {
        let [c01, c02, c03, c12, c13, c23] = edges;
        Self {
            sign,
            c01,
            c02,
            c03,
            c12,
            c13,
            c23,
        }
    }

    fn values(&self) -> Vec<num::Complex<f64>> {
        [&self.c01, &self.c02, &self.c03, &self.c12, &self.c13, &self.c23]
            .iter()
            .map(|c| c.to_complex())
            .collect()
    }

    /// The Ptolemy relation `c03 c12 = ±c01 c23 ± c02 c13` must hold
    /// for one choice of signs.
    pub fn check_consistency(&self, precision: &Precision) -> Result<()> {
        let c01c23 = self.c01.clone() * self.c23.clone();
        let c02c13 = self.c02.clone() * self.c13.clone();
        let c03c12 = self.c03.clone() * self.c12.clone();
        let residuals = [
            -c03c12.clone() - c01c23.clone() + c02c13.clone(),
            -c03c12.clone() + c01c23.clone() + c02c13.clone(),
            c03c12.clone() - c01c23.clone() + c02c13.clone(),
            c03c12 + c01c23 + c02c13,
        ];
        if residuals.iter().any(|r| precision.is_negligible(r)) {
            Ok(())
        } else {
            Err(PtolemyError::numerical(
                "Ptolemy relation violated by cochain",
                self.values(),
            ))
        }
    }

    pub fn w_triple(&self, precision: &Precision) -> Result<WTriple<S>> {
        self.check_consistency(precision)?;
        let l01 = log_of_square(&self.c01, precision)?;
        let l02 = log_of_square(&self.c02, precision)?;
        let l03 = log_of_square(&self.c03, precision)?;
        let l12 = log_of_square(&self.c12, precision)?;
        let l13 = log_of_square(&self.c13, precision)?;
        let l23 = log_of_square(&self.c23, precision)?;
        let w = WTriple {
            sign: self.sign,
            w0: l03.clone() + l12.clone() - l02.clone() - l13.clone(),
            w1: l02 + l13 - l01.clone() - l23.clone(),
            w2: l01 + l23 - l03 - l12,
        };
        w.check_consistency(precision)?;
        Ok(w)
    }
}

/// Logarithmic edge invariants of a tetrahedron. They sum to zero.
#[derive(Clone, Debug, PartialEq)]
pub struct WTriple<S> {
    pub sign: i32,
    pub w0: S,
    pub w1: S,
    pub w2: S,
}

impl<S: Scalar> WTriple<S> {
    fn values(&self) -> Vec<num::Complex<f64>> {
        vec![self.w0.to_complex(), self.w1.to_complex(), self.w2.to_complex()]
    }

    /// `1 = ±exp(w0) ± exp(-w1)` for one choice of signs, and
    /// `w0 + w1 + w2 = 0`.
    pub fn check_consistency(&self, precision: &Precision) -> Result<()> {
        let one = S::one();
        let e0 = self.w0.exp();
        let e1 = (-self.w1.clone()).exp();
        let residuals = [
            one.clone() - e0.clone() - e1.clone(),
            one.clone() + e0.clone() - e1.clone(),
            one.clone() - e0.clone() + e1.clone(),
            one + e0 + e1,
        ];
        if !residuals.iter().any(|r| precision.is_negligible(r)) {
            return Err(PtolemyError::numerical(
                "w triple does not satisfy the Ptolemy relation",
                self.values(),
            ));
        }
        let sum = self.w0.clone() + self.w1.clone() + self.w2.clone();
        if !precision.is_negligible(&sum) {
            return Err(PtolemyError::numerical(
                "w triple does not sum to zero",
                self.values(),
            ));
        }
        Ok(())
    }

    /// The candidate `z` with its branch integers and the residual of
    /// `w2 + log z - log(1 - z) + (p + q) πi = 0`.
    fn candidate(&self, z: S, precision: &Precision) -> (ZpqTriple<S>, f64) {
        let one_minus_z = S::one() - z.clone();
        if precision.is_negligible(&one_minus_z) {
            return (
                ZpqTriple {
                    sign: self.sign,
                    z,
                    p: 0,
                    q: 0,
                },
                0.0,
            );
        }
        let pi_i = S::pi_i(precision);
        let log_z = z.ln();
        let log_one_minus_z = one_minus_z.ln();
        let p = ((self.w0.clone() - log_z.clone()) / pi_i.clone()).re().round();
        let q = ((self.w1.clone() + log_one_minus_z.clone()) / pi_i.clone()).re().round();
        let (p, q, residual) = match (p, q) {
            (Some(p), Some(q)) => {
                let residual = self.w2.clone() + log_z - log_one_minus_z + pi_i.scale(p + q);
                (p, q, residual.abs().to_f64())
            }
            _ => (0, 0, f64::INFINITY),
        };
        (
            ZpqTriple {
                sign: self.sign,
                z,
                p,
                q,
            },
            residual,
        )
    }

    /// Tries `z = ±exp(w0)` and keeps the one with the smaller residual.
    pub fn zpq_triple(&self, precision: &Precision) -> Result<ZpqTriple<S>> {
        let z = self.w0.exp();
        let (first, first_residual) = self.candidate(z.clone(), precision);
        let (second, second_residual) = self.candidate(-z, precision);
        let (best, residual) = if first_residual < second_residual {
            (first, first_residual)
        } else {
            (second, second_residual)
        };
        trace!(
            "zpq triple z = {}, p = {}, q = {}, residual {:e}",
            best.z,
            best.p,
            best.q,
            residual
        );
        if residual > precision.epsilon {
            return Err(PtolemyError::numerical(
                format!("no branch for w triple, best residual {:e}", residual),
                self.values(),
            ));
        }
        Ok(best)
    }
}

/// An element of the extended Bloch group: a shape `z` with branch
/// integers `p`, `q`.
#[derive(Clone, Debug, PartialEq)]
pub struct ZpqTriple<S> {
    pub sign: i32,
    pub z: S,
    pub p: i64,
    pub q: i64,
}

impl<S: Scalar> ZpqTriple<S> {
    /// `z = 1` describes a flat tetrahedron, which contributes nothing.
    pub fn is_degenerate(&self, precision: &Precision) -> bool {
        precision.is_negligible(&(S::one() - self.z.clone()))
    }

    /// Bloch–Wigner dilogarithm `arg(1 - z) log|z| + Im Li₂(z)`.
    pub fn volume(&self, dilog: &Dilogarithm<S>, precision: &Precision) -> S::Real {
        if self.is_degenerate(precision) {
            return S::Real::zero();
        }
        let one_minus_z = S::one() - self.z.clone();
        let value = one_minus_z.arg() * self.z.abs().ln() + dilog.eval(&self.z).im();
        signed(self.sign, value)
    }

    /// Rogers dilogarithm `Li₂(z) + (log z + pπi)(log(1 - z) + qπi)/2 - π²/6`.
    pub fn l_function(&self, dilog: &Dilogarithm<S>, precision: &Precision) -> S {
        if self.is_degenerate(precision) {
            return S::zero();
        }
        let pi_i = S::pi_i(precision);
        let one_minus_z = S::one() - self.z.clone();
        let value = dilog.eval(&self.z)
            + (self.z.ln() + pi_i.scale(self.p)) * (one_minus_z.ln() + pi_i.scale(self.q))
                / S::from_integer(2)
            + pi_i.clone() * pi_i / S::from_integer(6);
        value.scale(i64::from(self.sign))
    }
}

/// Volume and complex volume (volume + i CS) of a collection of
/// cochains. The real part of the complex volume has to agree with the
/// separately computed volume.
pub fn complex_volume<S: Scalar>(
    cochains: &[PtolemyCochain<S>],
    dilog: &Dilogarithm<S>,
    precision: &Precision,
) -> Result<(S::Real, S)> {
    let mut volume = S::Real::zero();
    let mut l_sum = S::zero();
    for cochain in cochains {
        let zpq = cochain.w_triple(precision)?.zpq_triple(precision)?;
        volume = volume + zpq.volume(dilog, precision);
        l_sum = l_sum + zpq.l_function(dilog, precision);
    }
    let complex_volume = l_sum / S::i();
    if !precision.is_small(&(volume.clone() - complex_volume.re())) {
        return Err(PtolemyError::numerical(
            "volume and complex volume do not match",
            vec![num::Complex::new(volume.to_f64(), 0.0), complex_volume.to_complex()],
        ));
    }
    Ok((volume, complex_volume))
}
