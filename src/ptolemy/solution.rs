use std::collections::BTreeMap;

use super::coordinate::simplex_points;
use super::coordinate::PtolemyCoordinate;
use super::coordinate::Variable;
use super::variety::face_identifications;
use super::variety::relation_signs;
use super::variety::PtolemyVariety;
use super::variety::EDGE_OFFSETS;
use crate::algebra::Precision;
use crate::algebra::Scalar;
use crate::bloch::PtolemyCochain;
use crate::error::NumericalValues;
use crate::error::PtolemyError;
use crate::error::Result;

/// Ptolemy coordinates are projective. Multiplying all of them by this
/// generic constant keeps the squares used for logarithms away from the
/// negative real axis.
pub const GENERIC_ROTATION: (f64, f64) = (1.0, 0.32433234644);

/// A value for every Ptolemy coordinate of a variety.
#[derive(Clone, Debug, PartialEq)]
pub struct PtolemySolution<S> {
    values: BTreeMap<PtolemyCoordinate, S>,
}

impl<S: Scalar> PtolemySolution<S> {
    /// Extends an assignment of the variety's variables to every
    /// coordinate through the signed identification.
    pub fn from_assignment(
        variety: &PtolemyVariety,
        assignment: &BTreeMap<Variable, S>,
        rotate: bool,
        precision: &Precision,
    ) -> Result<Self> {
        let rotation = if rotate {
            S::from_parts(GENERIC_ROTATION.0, GENERIC_ROTATION.1, precision)
        } else {
            S::one()
        };
        let values = variety
            .identification
            .iter()
            .map(|(c, (sign, representative))| {
                let value = assignment
                    .get(&Variable::Ptolemy(*representative))
                    .ok_or_else(|| {
                        PtolemyError::numerical(
                            format!("solution assigns no value to {}", representative),
                            NumericalValues::default(),
                        )
                    })?;
                Ok((*c, value.scale(*sign as i64) * rotation.clone()))
            })
            .collect::<Result<_>>()?;
        Ok(Self { values })
    }

    pub fn get(&self, c: &PtolemyCoordinate) -> Option<&S> {
        self.values.get(c)
    }

    pub fn values(&self) -> &BTreeMap<PtolemyCoordinate, S> {
        &self.values
    }

    fn value(&self, c: &PtolemyCoordinate) -> Result<&S> {
        self.values.get(c).ok_or_else(|| {
            PtolemyError::structural(format!("no value for Ptolemy coordinate {}", c))
        })
    }

    /// Coordinates on glued faces agree up to their sign.
    pub fn check_identification(&self, variety: &PtolemyVariety, precision: &Precision) -> Result<()> {
        for (a, b, sign) in face_identifications(&variety.triangulation, variety.n) {
            let value_a = self.value(&a)?;
            let value_b = self.value(&b)?;
            let difference = value_a.scale(sign as i64) - value_b.clone();
            if !precision.is_negligible(&difference) {
                return Err(PtolemyError::numerical(
                    format!("identification of {} and {} violated", a, b),
                    vec![value_a.to_complex(), value_b.to_complex()],
                ));
            }
        }
        Ok(())
    }

    /// Every Ptolemy relation, with the signs of the obstruction class,
    /// vanishes.
    pub fn check_relations(&self, variety: &PtolemyVariety, precision: &Precision) -> Result<()> {
        for tet in variety.triangulation.tetrahedra() {
            let (sign_01, sign_12) = relation_signs(variety.obstruction_class.as_ref(), tet.index);
            for base in simplex_points(variety.n - 2) {
                let base = PtolemyCoordinate::new(base, tet.index);
                let c = |offset| self.value(&base.shifted(offset)).cloned();
                let residual = (c([1, 0, 0, 1])? * c([0, 1, 1, 0])?).scale(-sign_01 as i64)
                    - (c([1, 1, 0, 0])? * c([0, 0, 1, 1])?).scale(sign_12 as i64)
                    + c([1, 0, 1, 0])? * c([0, 1, 0, 1])?;
                if !precision.is_negligible(&residual) {
                    return Err(PtolemyError::numerical(
                        format!("Ptolemy relation at {} violated", base),
                        vec![residual.to_complex()],
                    ));
                }
            }
        }
        Ok(())
    }

    /// One cochain per small tetrahedron of the subdivision.
    pub fn cochains(&self, variety: &PtolemyVariety) -> Result<Vec<PtolemyCochain<S>>> {
        let mut cochains = vec![];
        for tet in variety.triangulation.tetrahedra() {
            let sign = tet.orientation_sign();
            for base in simplex_points(variety.n - 2) {
                let base = PtolemyCoordinate::new(base, tet.index);
                let [c01, c02, c03, c12, c13, c23] =
                    EDGE_OFFSETS.map(|offset| self.value(&base.shifted(offset)).cloned());
                cochains.push(PtolemyCochain::new(
                    sign,
                    [c01?, c02?, c03?, c12?, c13?, c23?],
                ));
            }
        }
        Ok(cochains)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use num::Complex;

    use super::PtolemySolution;
    use crate::algebra::Precision;
    use crate::ptolemy::coordinate::Variable;
    use crate::ptolemy::variety::ptolemy_varieties;
    use crate::triangulation::tests::figure_eight;

    type C = Complex<f64>;

    fn assignment(b: C) -> BTreeMap<Variable, C> {
        BTreeMap::from([
            ("c_0011_0".parse().unwrap(), C::new(1.0, 0.0)),
            ("c_0101_1".parse().unwrap(), b),
            (Variable::NonZero, C::new(1.0, 0.0) / b),
        ])
    }

    #[test]
    fn figure_eight_solution() {
        let precision = Precision::default();
        let varieties = ptolemy_varieties(&figure_eight(), 2).unwrap();
        let variety = &varieties[1];
        let b = C::new(0.5, -(3f64).sqrt() / 2.0);
        for rotate in [false, true] {
            let solution =
                PtolemySolution::from_assignment(variety, &assignment(b), rotate, &precision)
                    .unwrap();
            assert_eq!(solution.values().len(), 12);
            solution.check_identification(variety, &precision).unwrap();
            solution.check_relations(variety, &precision).unwrap();
            let cochains = solution.cochains(variety).unwrap();
            assert_eq!(cochains.len(), 2);
            for cochain in cochains.iter() {
                cochain.check_consistency(&precision).unwrap();
            }
        }
    }

    #[test]
    fn wrong_values_are_detected() {
        let precision = Precision::default();
        let varieties = ptolemy_varieties(&figure_eight(), 2).unwrap();
        let wrong = assignment(C::new(2.0, 0.0));
        let solution =
            PtolemySolution::from_assignment(&varieties[1], &wrong, false, &precision).unwrap();
        solution.check_identification(&varieties[1], &precision).unwrap();
        assert!(solution.check_relations(&varieties[1], &precision).is_err());
    }

    #[test]
    fn missing_variable_is_an_error() {
        let varieties = ptolemy_varieties(&figure_eight(), 2).unwrap();
        let partial = BTreeMap::from([("c_0011_0".parse().unwrap(), C::new(1.0, 0.0))]);
        assert!(
            PtolemySolution::from_assignment(&varieties[1], &partial, true, &Precision::default())
                .is_err()
        );
    }
}
