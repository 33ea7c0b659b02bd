use log::debug;
use num::Zero;

use crate::algebra::field::all_vectors;
use crate::algebra::field::FiniteField;
use crate::algebra::matrix::quotient_basis;
use crate::algebra::Field;
use crate::algebra::Matrix;
use crate::algebra::F2;
use crate::error::PtolemyError;
use crate::error::Result;
use crate::triangulation::FaceClass;
use crate::triangulation::Triangulation;

/// The boundary maps of the cellular chain complex of a triangulation,
/// relative to its vertices, in degrees 3 and 2.
#[derive(Clone, Debug)]
pub struct ChainComplex<F> {
    face_classes: Vec<FaceClass>,
    num_tetrahedra: usize,
    /// Face classes × tetrahedra.
    d3: Matrix<F>,
    /// Edge classes × face classes.
    d2: Matrix<F>,
}

impl<F: Field> ChainComplex<F> {
    pub fn new(triangulation: &Triangulation) -> Result<Self> {
        let face_classes = triangulation.face_classes();
        let num_tetrahedra = triangulation.num_tetrahedra();
        let d3 = boundary_map_3(&face_classes, num_tetrahedra);
        let d2 = boundary_map_2(triangulation, &face_classes)?;
        if !(&d2 * &d3).is_zero() {
            return Err(PtolemyError::structural(format!(
                "boundary maps of triangulation {} do not compose to zero",
                triangulation.name
            )));
        }
        Ok(Self {
            face_classes,
            num_tetrahedra,
            d3,
            d2,
        })
    }

    pub fn d3(&self) -> &Matrix<F> {
        &self.d3
    }

    pub fn d2(&self) -> &Matrix<F> {
        &self.d2
    }

    pub fn face_classes(&self) -> &[FaceClass] {
        &self.face_classes
    }

    /// Representatives of a basis of `ker(d3ᵀ) / im(d2ᵀ)`, as values on
    /// the face classes.
    pub fn cohomology_basis(&self) -> Vec<Vec<F>> {
        quotient_basis(&self.d3.transpose(), &self.d2.transpose())
    }

    /// Per tetrahedron and face, the value of the cocycle on that face.
    /// The value at the second face of a face class is multiplied by
    /// the orientation of the gluing.
    pub fn coefficients(&self, face_values: &[F]) -> Vec<[F; 4]> {
        let mut coefficients = vec![[F::zero(), F::zero(), F::zero(), F::zero()]; self.num_tetrahedra];
        for (class, value) in self.face_classes.iter().zip(face_values.iter()) {
            coefficients[class.tet1][class.face1] = value.clone();
            coefficients[class.tet2][class.face2] = if class.orientation > 0 {
                value.clone()
            } else {
                -value.clone()
            };
        }
        coefficients
    }
}

impl<F: FiniteField> ChainComplex<F> {
    /// Every element of the cohomology group, in lexicographic order of
    /// its coordinates in `cohomology_basis`. The first one is zero.
    pub fn all_classes(&self) -> Vec<ObstructionClass<F>> {
        let basis = self.cohomology_basis();
        let num_faces = self.face_classes.len();
        all_vectors::<F>(basis.len())
            .into_iter()
            .enumerate()
            .map(|(index, coordinates)| {
                let mut face_values = vec![F::zero(); num_faces];
                for (c, h) in coordinates.iter().zip(basis.iter()) {
                    for (value, h_value) in face_values.iter_mut().zip(h.iter()) {
                        *value = value.clone() + c.clone() * h_value.clone();
                    }
                }
                ObstructionClass {
                    index,
                    coefficients: self.coefficients(&face_values),
                    face_values,
                }
            })
            .collect()
    }
}

fn boundary_map_3<F: Field>(face_classes: &[FaceClass], num_tetrahedra: usize) -> Matrix<F> {
    let rows: Vec<Vec<i64>> = face_classes
        .iter()
        .map(|class| {
            (0..num_tetrahedra)
                .map(|tet| {
                    i64::from(tet == class.tet1)
                        + if tet == class.tet2 {
                            class.orientation as i64
                        } else {
                            0
                        }
                })
                .collect()
        })
        .collect();
    Matrix::from_integers(&rows, num_tetrahedra)
}

/// Whether the edge from `v0` to `v1` of a face runs along its boundary
/// orientation, once the vertices of the face are relabelled 0, 1, 2.
fn edge_is_positive_on_face(v0: usize, v1: usize, face: usize) -> bool {
    let relabel = |v: usize| if v > face { v - 1 } else { v };
    matches!((relabel(v0), relabel(v1)), (0, 1) | (1, 2) | (2, 0))
}

fn boundary_map_2<F: Field>(
    triangulation: &Triangulation,
    face_classes: &[FaceClass],
) -> Result<Matrix<F>> {
    let edge_classes = triangulation.edge_classes(false)?;
    let rows: Vec<Vec<i64>> = edge_classes
        .iter()
        .map(|edge_class| {
            face_classes
                .iter()
                .map(|face_class| {
                    let face_sign = if face_class.face1 % 2 == 0 { 1 } else { -1 };
                    edge_class
                        .edges()
                        .iter()
                        .filter(|edge| {
                            edge.tet == face_class.tet1
                                && edge.v0 != face_class.face1
                                && edge.v1 != face_class.face1
                        })
                        .map(|edge| {
                            if edge_is_positive_on_face(edge.v0, edge.v1, face_class.face1) {
                                face_sign
                            } else {
                                -face_sign
                            }
                        })
                        .sum()
                })
                .collect()
        })
        .collect();
    debug!(
        "Boundary map d2 of {}: {} edge classes, {} face classes",
        triangulation.name,
        edge_classes.len(),
        face_classes.len()
    );
    Ok(Matrix::from_integers(&rows, face_classes.len()))
}

/// An element of H²(M, ∂M; F) together with its values on every face
/// of every tetrahedron.
#[derive(Clone, Debug, PartialEq)]
pub struct ObstructionClass<F> {
    pub index: usize,
    pub face_values: Vec<F>,
    pub coefficients: Vec<[F; 4]>,
}

impl<F: Field> ObstructionClass<F> {
    pub fn is_trivial(&self) -> bool {
        self.face_values.iter().all(|x| x.is_zero())
    }
}

fn sign_of_sum(a: &F2, b: &F2) -> i32 {
    if (*a + *b).is_zero() {
        1
    } else {
        -1
    }
}

impl ObstructionClass<F2> {
    /// Sign of the `c_1001 · c_0110` term in the Ptolemy relations of
    /// the given tetrahedron.
    pub fn sign_01(&self, tet: usize) -> i32 {
        let c = &self.coefficients[tet];
        sign_of_sum(&c[2], &c[3])
    }

    /// Sign of the `c_1100 · c_0011` term.
    pub fn sign_12(&self, tet: usize) -> i32 {
        let c = &self.coefficients[tet];
        sign_of_sum(&c[0], &c[3])
    }
}

/// All obstruction classes to lifting a PSL(N, C) representation to
/// SL(N, C).
pub fn obstruction_classes(triangulation: &Triangulation) -> Result<Vec<ObstructionClass<F2>>> {
    let complex = ChainComplex::<F2>::new(triangulation)?;
    let classes = complex.all_classes();
    debug!(
        "Triangulation {} has {} obstruction classes",
        triangulation.name,
        classes.len()
    );
    Ok(classes)
}

#[cfg(test)]
mod tests {
    use num::BigRational;
    use num::Zero;

    use super::obstruction_classes;
    use super::ChainComplex;
    use crate::algebra::field::PrimeField;
    use crate::algebra::Field;
    use crate::algebra::F2;
    use crate::triangulation::tests::figure_eight;
    use crate::triangulation::tests::unorderable;

    fn f2(values: &[i64]) -> Vec<F2> {
        values.iter().map(|x| F2::new(*x)).collect()
    }

    fn check_tetrahedron_sums<F: Field>(complex: &ChainComplex<F>, face_values: &[F]) {
        for coefficients in complex.coefficients(face_values) {
            let sum = coefficients
                .iter()
                .cloned()
                .fold(F::zero(), |acc, x| acc + x);
            assert!(sum.is_zero());
        }
    }

    #[test]
    fn boundary_maps_compose_to_zero() {
        for t in [figure_eight(), unorderable()] {
            let complex = ChainComplex::<BigRational>::new(&t).unwrap();
            assert_eq!(complex.d3().num_rows(), 4);
            assert_eq!(complex.d3().num_columns(), 2);
            assert_eq!(complex.d2().num_rows(), 2);
            assert!((complex.d2() * complex.d3()).is_zero());
            ChainComplex::<PrimeField<5>>::new(&t).unwrap();
        }
    }

    #[test]
    fn figure_eight_cohomology() {
        let t = figure_eight();
        let rational = ChainComplex::<BigRational>::new(&t).unwrap();
        let basis = rational.cohomology_basis();
        assert_eq!(basis.len(), 1);
        check_tetrahedron_sums(&rational, &basis[0]);
        let complex = ChainComplex::<F2>::new(&t).unwrap();
        assert_eq!(complex.cohomology_basis(), vec![f2(&[1, 1, 0, 0])]);
    }

    #[test]
    fn figure_eight_obstruction_classes() {
        let t = figure_eight();
        let classes = obstruction_classes(&t).unwrap();
        assert_eq!(classes.len(), 2);
        assert!(classes[0].is_trivial());
        assert_eq!(classes[1].face_values, f2(&[1, 1, 0, 0]));
        let complex = ChainComplex::<F2>::new(&t).unwrap();
        for class in classes.iter() {
            check_tetrahedron_sums(&complex, &class.face_values);
        }
        for tet in 0..2 {
            assert_eq!(classes[0].sign_01(tet), 1);
            assert_eq!(classes[0].sign_12(tet), 1);
        }
    }

    #[test]
    fn trivial_class_has_zero_coefficients() {
        let classes = obstruction_classes(&unorderable()).unwrap();
        assert!(classes[0]
            .coefficients
            .iter()
            .flatten()
            .all(|x| x.is_zero()));
    }
}
