use std::f64::consts::PI;

use log::trace;
use ordered_float::OrderedFloat;

use super::number::Precision;
use super::number::Real;
use super::number::Scalar;
use crate::error::PtolemyError;
use crate::error::Result;

const MAX_ITERATIONS: usize = 1000;
const POLISH_ITERATIONS: usize = 3;

fn evaluate<S: Scalar>(coefficients: &[S], z: &S) -> (S, S) {
    // Horner scheme for the value and the derivative
    let mut value = S::zero();
    let mut derivative = S::zero();
    for c in coefficients.iter().rev() {
        derivative = derivative * z.clone() + value.clone();
        value = value * z.clone() + c.clone();
    }
    (value, derivative)
}

/// All roots of the polynomial with the given coefficients (constant
/// term first), with multiplicity, sorted by real and then imaginary
/// part. Returns exactly as many roots as the degree.
pub fn find_roots<S: Scalar>(coefficients: &[S], precision: &Precision) -> Result<Vec<S>> {
    find_roots_with_iterations(coefficients, precision, MAX_ITERATIONS)
}

fn find_roots_with_iterations<S: Scalar>(
    coefficients: &[S],
    precision: &Precision,
    max_iterations: usize,
) -> Result<Vec<S>> {
    let degree = match coefficients.len() {
        0 => return Ok(vec![]),
        n => n - 1,
    };
    let leading = coefficients[degree].clone();
    if precision.is_negligible(&leading) {
        return Err(PtolemyError::numerical(
            "leading coefficient vanishes, degree is ill-defined",
            coefficients.iter().map(|c| c.to_complex()).collect::<Vec<_>>(),
        ));
    }
    let monic: Vec<S> = coefficients
        .iter()
        .map(|c| c.clone() / leading.clone())
        .collect();
    let mut roots = match degree {
        0 => vec![],
        1 => vec![-monic[0].clone()],
        _ => aberth(&monic, degree, precision, max_iterations)?,
    };
    for root in roots.iter_mut() {
        for _ in 0..POLISH_ITERATIONS {
            let (value, derivative) = evaluate(&monic, root);
            if derivative.is_zero() {
                break;
            }
            *root = root.clone() - value / derivative;
        }
    }
    roots.sort_by_key(|z| (OrderedFloat(z.re().to_f64()), OrderedFloat(z.im().to_f64())));
    if roots.len() != degree || roots.iter().any(|z| !z.abs().is_finite()) {
        return Err(PtolemyError::numerical(
            format!("found {} roots for polynomial of degree {}", roots.len(), degree),
            roots.iter().map(|r| r.to_complex()).collect::<Vec<_>>(),
        ));
    }
    for root in roots.iter() {
        check_residual(&monic, root, precision)?;
    }
    Ok(roots)
}

/// Accepts `root` if it is a root of a polynomial whose coefficients
/// differ from `monic` by at most epsilon times the largest one.
fn check_residual<S: Scalar>(monic: &[S], root: &S, precision: &Precision) -> Result<()> {
    let (value, _) = evaluate(monic, root);
    let radius = root.abs().to_f64();
    let largest = monic.iter().map(|c| c.abs().to_f64()).fold(0.0, f64::max);
    let powers: f64 = (0..monic.len()).map(|i| radius.powi(i as i32)).sum();
    if value.abs().to_f64() <= precision.epsilon * largest * powers {
        Ok(())
    } else {
        Err(PtolemyError::numerical(
            "root finding did not converge",
            vec![root.to_complex(), value.to_complex()],
        ))
    }
}

fn aberth<S: Scalar>(
    monic: &[S],
    degree: usize,
    precision: &Precision,
    max_iterations: usize,
) -> Result<Vec<S>> {
    let radius = 1.0
        + monic[..degree]
            .iter()
            .map(|c| c.abs().to_f64())
            .fold(0.0, f64::max);
    let mut roots: Vec<S> = (0..degree)
        .map(|k| {
            let angle = 2.0 * PI * k as f64 / degree as f64 + 0.4;
            S::from_parts(radius * angle.cos(), radius * angle.sin(), precision)
        })
        .collect();
    let threshold = precision.convergence_threshold();
    for iteration in 0..max_iterations {
        let mut max_step = 0.0f64;
        for k in 0..degree {
            let (value, derivative) = evaluate(monic, &roots[k]);
            if value.is_zero() {
                continue;
            }
            let ratio = value / derivative;
            let repulsion = (0..degree)
                .filter(|j| *j != k)
                .fold(S::zero(), |acc, j| {
                    acc + S::one() / (roots[k].clone() - roots[j].clone())
                });
            let step = ratio.clone() / (S::one() - ratio * repulsion);
            max_step = max_step.max(step.abs().to_f64() / (1.0 + roots[k].abs().to_f64()));
            roots[k] = roots[k].clone() - step;
        }
        if !max_step.is_finite() {
            return Err(PtolemyError::numerical(
                "root finding diverged",
                monic.iter().map(|c| c.to_complex()).collect::<Vec<_>>(),
            ));
        }
        if max_step < threshold {
            trace!("Root finding converged after {} iterations", iteration);
            return Ok(roots);
        }
    }
    trace!("Root finding stopped after {} iterations", max_iterations);
    Ok(roots)
}
