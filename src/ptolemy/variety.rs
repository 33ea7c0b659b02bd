use std::collections::BTreeMap;
use std::collections::BTreeSet;

use bimap::BiMap;
use log::debug;
use log::info;
use num::BigRational;
use num::One;
use num::Zero;

use super::coordinate::face_points;
use super::coordinate::include_face_point;
use super::coordinate::simplex_points;
use super::coordinate::PtolemyCoordinate;
use super::coordinate::Variable;
use super::equivalence::SignedEquivalence;
use crate::algebra::Field;
use crate::algebra::Polynomial;
use crate::algebra::F2;
use crate::cohomology::obstruction_classes;
use crate::cohomology::ObstructionClass;
use crate::error::PtolemyError;
use crate::error::Result;
use crate::triangulation::Triangulation;

/// A polynomial equation with exact coefficients.
pub type Equation = Polynomial<Variable, BigRational>;

/// Offsets of the six edges of a small tetrahedron, in the order
/// 01, 02, 03, 12, 13, 23.
pub const EDGE_OFFSETS: [[usize; 4]; 6] = [
    [1, 1, 0, 0],
    [1, 0, 1, 0],
    [1, 0, 0, 1],
    [0, 1, 1, 0],
    [0, 1, 0, 1],
    [0, 0, 1, 1],
];

fn coordinate_polynomial(c: PtolemyCoordinate) -> Equation {
    Polynomial::variable(Variable::Ptolemy(c))
}

fn integer(n: i64) -> Equation {
    Polynomial::constant(BigRational::from_int(n))
}

/// Signs of the two products in the Ptolemy relations of a tetrahedron.
pub fn relation_signs(class: Option<&ObstructionClass<F2>>, tet: usize) -> (i32, i32) {
    match class {
        Some(class) => (class.sign_01(tet), class.sign_12(tet)),
        None => (1, 1),
    }
}

/// One relation per tetrahedron and small tetrahedron inside it:
/// `-s01 c_1001 c_0110 - s12 c_1100 c_0011 + c_1010 c_0101`.
pub fn ptolemy_relations(
    triangulation: &Triangulation,
    n: usize,
    class: Option<&ObstructionClass<F2>>,
) -> Vec<Equation> {
    let mut relations = vec![];
    for tet in triangulation.tetrahedra() {
        let (sign_01, sign_12) = relation_signs(class, tet.index);
        for base in simplex_points(n - 2) {
            let c = |offset: [usize; 4]| {
                coordinate_polynomial(PtolemyCoordinate::new(base, tet.index).shifted(offset))
            };
            relations.push(
                integer(-sign_01 as i64) * c([1, 0, 0, 1]) * c([0, 1, 1, 0])
                    - integer(sign_12 as i64) * c([1, 1, 0, 0]) * c([0, 0, 1, 1])
                    + c([1, 0, 1, 0]) * c([0, 1, 0, 1]),
            );
        }
    }
    relations
}

/// Pairs of coordinates on glued faces that describe the same point,
/// with the sign relating them.
pub fn face_identifications(
    triangulation: &Triangulation,
    n: usize,
) -> Vec<(PtolemyCoordinate, PtolemyCoordinate, i32)> {
    let mut identifications = vec![];
    for tet in triangulation.tetrahedra() {
        for face in 0..4 {
            let gluing = tet.gluings[face];
            let inverse = gluing.inverse();
            for point in face_points(n) {
                let coords = include_face_point(point, face);
                if coords.contains(&n) {
                    continue;
                }
                let adjacent_coords = [0, 1, 2, 3].map(|k| coords[inverse[k]]);
                let odd_positions: Vec<usize> = (0..4).filter(|i| coords[*i] % 2 == 1).collect();
                identifications.push((
                    PtolemyCoordinate::new(coords, tet.index),
                    PtolemyCoordinate::new(adjacent_coords, tet.neighbors[face]),
                    gluing.restricted_sign(&odd_positions),
                ));
            }
        }
    }
    identifications
}

/// The signed equivalence between all non-vertex Ptolemy coordinates
/// induced by the face gluings.
pub fn identified_coordinates(
    triangulation: &Triangulation,
    n: usize,
) -> Result<SignedEquivalence<PtolemyCoordinate>> {
    let mut equivalence = SignedEquivalence::default();
    for tet in triangulation.tetrahedra() {
        for coords in simplex_points(n) {
            if !coords.contains(&0) {
                let c = PtolemyCoordinate::new(coords, tet.index);
                equivalence.identify(c, c, 1)?;
            }
        }
    }
    for (a, b, sign) in face_identifications(triangulation, n) {
        equivalence.identify(a, b, sign)?;
    }
    Ok(equivalence)
}

/// Replaces every coordinate by its signed representative.
pub fn identify_coordinates(
    equations: &[Equation],
    representatives: &BTreeMap<PtolemyCoordinate, (i32, PtolemyCoordinate)>,
) -> Vec<Equation> {
    let replacements: BTreeMap<Variable, Equation> = representatives
        .iter()
        .map(|(c, (sign, representative))| {
            (
                Variable::Ptolemy(*c),
                integer(*sign as i64) * coordinate_polynomial(*representative),
            )
        })
        .collect();
    equations
        .iter()
        .map(|e| e.substitute_polynomials(&replacements))
        .collect()
}

/// How rescaling the decoration at each cusp and level changes a
/// coordinate. Entry `cusp + level · num_cusps` counts the vertices of
/// the coordinate's tetrahedron at that cusp whose coordinate exceeds
/// `level`.
pub fn decoration_vectors(
    triangulation: &Triangulation,
    n: usize,
) -> Result<BTreeMap<PtolemyCoordinate, Vec<i64>>> {
    let num_cusps = triangulation.num_cusps();
    let mut vectors = BTreeMap::new();
    for tet in triangulation.tetrahedra() {
        let cusps = tet.cusp_indices.map(|c| c.ok_or(()));
        for coords in simplex_points(n) {
            if coords.contains(&n) {
                continue;
            }
            let mut v = vec![0; (n - 1) * num_cusps];
            for (vertex, c) in coords.iter().enumerate() {
                let cusp = cusps[vertex].map_err(|_| {
                    PtolemyError::structural(format!(
                        "vertex {} of tetrahedron {} has no cusp index",
                        vertex, tet.index
                    ))
                })?;
                for level in 0..*c {
                    v[cusp + level * num_cusps] += 1;
                }
            }
            vectors.insert(PtolemyCoordinate::new(coords, tet.index), v);
        }
    }
    Ok(vectors)
}

/// Selects keys whose vectors span the whole space. Every round scans
/// the keys in order and takes the first one whose vector is
/// independent of the ones already taken.
pub fn find_independent_vectors<K: Clone + Ord>(vectors: &BTreeMap<K, Vec<i64>>) -> Result<Vec<K>> {
    let size = vectors.values().next().map(|v| v.len()).unwrap_or(0);
    let mut rows: Vec<Vec<BigRational>> = vec![];
    let mut selected = vec![];
    while rows.len() < size {
        let pivot = rows.len();
        let next = vectors.iter().find_map(|(key, v)| {
            let mut row: Vec<BigRational> = v.iter().map(|x| BigRational::from_int(*x)).collect();
            for (index, old) in rows.iter().enumerate() {
                let factor = row[index].clone();
                row = row
                    .iter()
                    .zip(old.iter())
                    .map(|(x, y)| x.clone() - y.clone() * factor.clone())
                    .collect();
            }
            if row[pivot].is_zero() {
                return None;
            }
            let scale = row[pivot].clone();
            Some((key, row.into_iter().map(|x| x / scale.clone()).collect()))
        });
        match next {
            Some((key, row)) => {
                selected.push(key.clone());
                rows.push(row);
            }
            None => {
                return Err(PtolemyError::structural(format!(
                    "decoration vectors span only {} of {} dimensions",
                    rows.len(),
                    size
                )))
            }
        }
    }
    Ok(selected)
}

/// Coordinates fixed to one to remove the freedom in choosing the
/// decoration.
pub fn additional_coordinates(
    triangulation: &Triangulation,
    n: usize,
) -> Result<Vec<PtolemyCoordinate>> {
    find_independent_vectors(&decoration_vectors(triangulation, n)?)
}

pub fn additional_equations_independent(triangulation: &Triangulation, n: usize) -> Result<Vec<Equation>> {
    Ok(additional_coordinates(triangulation, n)?
        .into_iter()
        .map(|c| coordinate_polynomial(c) - integer(1))
        .collect())
}

pub fn all_variables(equations: &[Equation]) -> BTreeSet<Variable> {
    equations.iter().flat_map(|e| e.variables()).collect()
}

/// `t · Π x - 1` over all variables `x` of the equations.
pub fn non_zero_condition(equations: &[Equation]) -> Equation {
    let product = all_variables(equations)
        .into_iter()
        .filter(|v| *v != Variable::NonZero)
        .fold(Polynomial::variable(Variable::NonZero), |acc, v| {
            acc * Polynomial::variable(v)
        });
    product - Polynomial::constant(BigRational::one())
}

/// The Ptolemy variety of a triangulation for one `N` and one
/// obstruction class.
#[derive(Clone, Debug)]
pub struct PtolemyVariety {
    pub triangulation: Triangulation,
    pub n: usize,
    pub obstruction_class: Option<ObstructionClass<F2>>,
    /// Relations and decoration fixing equations before identification.
    pub unidentified_equations: Vec<Equation>,
    pub identification: BTreeMap<PtolemyCoordinate, (i32, PtolemyCoordinate)>,
    pub equations: Vec<Equation>,
    /// Variables in the term order, `t` first.
    pub term_order: BiMap<Variable, usize>,
}

impl PtolemyVariety {
    pub fn new(
        triangulation: &Triangulation,
        n: usize,
        obstruction_class: Option<ObstructionClass<F2>>,
    ) -> Result<Self> {
        if n < 2 {
            return Err(PtolemyError::Parameters(format!(
                "N must be at least 2, got {}",
                n
            )));
        }
        let mut triangulation = triangulation.clone();
        triangulation.orient();
        triangulation.check_consistency()?;
        let mut unidentified_equations =
            ptolemy_relations(&triangulation, n, obstruction_class.as_ref());
        unidentified_equations.extend(additional_equations_independent(&triangulation, n)?);
        let identification = identified_coordinates(&triangulation, n)?.canonical_representatives();
        let mut equations = identify_coordinates(&unidentified_equations, &identification);
        equations.push(non_zero_condition(&equations));
        let term_order = all_variables(&equations)
            .into_iter()
            .enumerate()
            .map(|(i, v)| (v, i))
            .collect();
        debug!(
            "Ptolemy variety of {} for N = {}: {} equations",
            triangulation.name,
            n,
            equations.len()
        );
        Ok(Self {
            triangulation,
            n,
            obstruction_class,
            unidentified_equations,
            identification,
            equations,
            term_order,
        })
    }

    /// Index of the obstruction class, 0 if there is none.
    pub fn class_index(&self) -> usize {
        self.obstruction_class
            .as_ref()
            .map(|c| c.index)
            .unwrap_or(0)
    }

    pub fn variables(&self) -> Vec<Variable> {
        (0..self.term_order.len())
            .filter_map(|i| self.term_order.get_by_right(&i).copied())
            .collect()
    }

    pub fn variable_index(&self, variable: &Variable) -> Option<usize> {
        self.term_order.get_by_left(variable).copied()
    }
}

/// The obstruction classes to consider: all of them for even `N`, only
/// the trivial one otherwise.
pub fn obstruction_classes_for(
    triangulation: &Triangulation,
    n: usize,
) -> Result<Vec<Option<ObstructionClass<F2>>>> {
    if n % 2 == 0 {
        Ok(obstruction_classes(triangulation)?
            .into_iter()
            .map(Some)
            .collect())
    } else {
        Ok(vec![None])
    }
}

/// One variety per obstruction class.
pub fn ptolemy_varieties(triangulation: &Triangulation, n: usize) -> Result<Vec<PtolemyVariety>> {
    let varieties = obstruction_classes_for(triangulation, n)?
        .into_iter()
        .map(|class| PtolemyVariety::new(triangulation, n, class))
        .collect::<Result<Vec<_>>>()?;
    info!(
        "Constructed {} Ptolemy varieties of {} for N = {}",
        varieties.len(),
        triangulation.name,
        n
    );
    Ok(varieties)
}
