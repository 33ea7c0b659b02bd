use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::fmt::Display;

use log::debug;
use log::trace;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use crate::algebra::roots::find_roots;
use crate::algebra::Polynomial;
use crate::algebra::Precision;
use crate::algebra::Scalar;
use crate::error::NumericalValues;
use crate::error::PtolemyError;
use crate::error::Result;

pub type Assignment<V, S> = BTreeMap<V, S>;

/// The solutions found, together with the errors of the branches of
/// the search that failed numerically.
#[derive(Debug)]
pub struct Solutions<V, S> {
    pub assignments: Vec<Assignment<V, S>>,
    pub failures: Vec<PtolemyError>,
}

impl<V, S> Default for Solutions<V, S> {
    fn default() -> Self {
        Self {
            assignments: vec![],
            failures: vec![],
        }
    }
}

/// Isolates all solutions of a polynomial system by repeatedly solving
/// the first univariate equation and substituting each of its roots.
/// Up to `free_dimension` variables that are not determined by the
/// system are set to random values on the unit circle.
pub struct Solver<'a> {
    precision: &'a Precision,
    free_dimension: usize,
    rng: StdRng,
}

impl<'a> Solver<'a> {
    pub fn new(precision: &'a Precision, free_dimension: usize, seed: u64) -> Self {
        Self {
            precision,
            free_dimension,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// All solutions. Fails if any branch of the search fails.
    pub fn solve<V, S>(&mut self, equations: &[Polynomial<V, S>]) -> Result<Vec<Assignment<V, S>>>
    where
        V: Ord + Clone + Display,
        S: Scalar,
    {
        let solutions = self.solve_partially(equations)?;
        match solutions.failures.into_iter().next() {
            Some(error) => Err(error),
            None => Ok(solutions.assignments),
        }
    }

    /// All solutions of the branches that succeed. Numerical failures
    /// of a branch are collected and do not affect its siblings.
    /// Structural errors abort the search.
    pub fn solve_partially<V, S>(&mut self, equations: &[Polynomial<V, S>]) -> Result<Solutions<V, S>>
    where
        V: Ord + Clone + Display,
        S: Scalar,
    {
        let equations = equations.iter().map(|e| self.prune(e)).collect();
        let mut solutions = Solutions::default();
        self.branch(equations, self.free_dimension, BTreeMap::new(), &mut solutions)?;
        debug!(
            "Found {} solutions, {} branches failed",
            solutions.assignments.len(),
            solutions.failures.len()
        );
        Ok(solutions)
    }

    fn branch<V, S>(
        &mut self,
        equations: Vec<Polynomial<V, S>>,
        free_dimension: usize,
        assignment: Assignment<V, S>,
        solutions: &mut Solutions<V, S>,
    ) -> Result<()>
    where
        V: Ord + Clone + Display,
        S: Scalar,
    {
        match self.solve_recursively(equations, free_dimension, assignment, solutions) {
            Err(e) if !e.is_fatal() => {
                debug!("Branch failed: {}", e);
                solutions.failures.push(e);
                Ok(())
            }
            result => result,
        }
    }

    /// Removes terms whose coefficients vanish numerically.
    fn prune<V: Ord + Clone, S: Scalar>(&self, equation: &Polynomial<V, S>) -> Polynomial<V, S> {
        Polynomial::from_terms(
            equation
                .terms()
                .filter(|(_, c)| !self.precision.is_negligible(*c))
                .map(|(m, c)| (m.clone(), c.clone())),
        )
    }

    fn solve_recursively<V, S>(
        &mut self,
        equations: Vec<Polynomial<V, S>>,
        free_dimension: usize,
        assignment: Assignment<V, S>,
        solutions: &mut Solutions<V, S>,
    ) -> Result<()>
    where
        V: Ord + Clone + Display,
        S: Scalar,
    {
        let mut remaining = vec![];
        for equation in equations {
            if !equation.is_constant() {
                remaining.push(equation);
            } else if !self.precision.is_negligible(&equation.constant_term()) {
                trace!("Branch is inconsistent: {} = 0", equation);
                return Ok(());
            }
        }
        if remaining.is_empty() {
            if free_dimension > 0 {
                return Err(PtolemyError::numerical(
                    format!("{} free variables left unused", free_dimension),
                    NumericalValues::default(),
                ));
            }
            solutions.assignments.push(assignment);
            return Ok(());
        }
        let univariate = remaining
            .iter()
            .enumerate()
            .find_map(|(i, e)| e.univariate_variable().map(|v| (i, v)));
        let (variable, values, free_dimension) = match univariate {
            Some((i, variable)) => {
                let equation = remaining.remove(i);
                let values = self.roots(&equation, &variable, &remaining)?;
                (variable, values, free_dimension)
            }
            None if free_dimension > 0 => {
                let variable = remaining
                    .last()
                    .and_then(|e| e.variables().into_iter().next())
                    .ok_or_else(|| PtolemyError::structural("non-constant equation without variables"))?;
                let angle = self.rng.gen_range(0.0..2.0 * PI);
                let value = S::from_parts(angle.cos(), angle.sin(), self.precision);
                trace!("Picked random value {} for {}", value, variable);
                (variable, vec![value], free_dimension - 1)
            }
            None => {
                return Err(PtolemyError::Exhaustion(format!(
                    "no univariate equation left in\n{}",
                    history(&remaining)
                )))
            }
        };
        for value in values {
            let substituted = remaining
                .iter()
                .map(|e| self.prune(&e.substitute(&variable, &value)))
                .collect();
            let mut assignment = assignment.clone();
            assignment.insert(variable.clone(), value);
            self.branch(substituted, free_dimension, assignment, solutions)?;
        }
        Ok(())
    }

    fn roots<V, S>(
        &self,
        equation: &Polynomial<V, S>,
        variable: &V,
        remaining: &[Polynomial<V, S>],
    ) -> Result<Vec<S>>
    where
        V: Ord + Clone + Display,
        S: Scalar,
    {
        let coefficients = equation.univariate_coefficients(variable);
        let describe = |message: String| {
            PtolemyError::numerical(
                format!(
                    "{} when solving {} for {}, remaining equations:\n{}",
                    message,
                    equation,
                    variable,
                    history(remaining)
                ),
                coefficients.iter().map(|c| c.to_complex()).collect::<Vec<_>>(),
            )
        };
        let roots = find_roots(&coefficients, self.precision).map_err(|e| describe(e.to_string()))?;
        let degree = equation.degree_in(variable) as usize;
        if roots.len() != degree {
            return Err(describe(format!(
                "found {} roots of a polynomial of degree {}",
                roots.len(),
                degree
            )));
        }
        trace!("Roots for {}: {:?}", variable, roots);
        Ok(roots)
    }
}

fn history<V, S>(equations: &[Polynomial<V, S>]) -> String
where
    V: Ord + Clone + Display,
    S: Scalar,
{
    equations
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Converts exact equations to the numeric type.
pub fn to_numeric<V: Ord + Clone, S: Scalar>(
    equations: &[Polynomial<V, num::BigRational>],
    precision: &Precision,
) -> Vec<Polynomial<V, S>> {
    equations
        .iter()
        .map(|e| e.map_coefficients(|c| S::from_rational(c, precision)))
        .collect()
}
