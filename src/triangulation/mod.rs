mod classes;
mod cusps;
mod ordering;
mod permutation;
mod snappea;

use std::collections::VecDeque;

use log::debug;
use log::info;

pub use self::classes::Edge;
pub use self::classes::EdgeClass;
pub use self::classes::FaceClass;
pub use self::cusps::CuspStructure;
pub use self::ordering::EdgeOrdering;
pub use self::permutation::all_permutations;
pub use self::permutation::Permutation;
pub use self::snappea::Cusp;
pub use self::snappea::PeripheralCurves;
pub use self::snappea::SnapPeaText;
use crate::error::PtolemyError;
use crate::error::Result;

/// The faces of a tetrahedron, labelled by the vertex they omit.
pub const FACES: [[usize; 3]; 4] = [[1, 2, 3], [0, 2, 3], [0, 1, 3], [0, 1, 2]];

#[derive(Clone, Debug, PartialEq)]
pub struct Tetrahedron {
    pub index: usize,
    /// The tetrahedron glued to face `f`.
    pub neighbors: [usize; 4],
    /// Maps the vertex labels of this tetrahedron to those of the
    /// neighbor glued to face `f`.
    pub gluings: [Permutation; 4],
    pub cusp_indices: [Option<usize>; 4],
    pub peripheral_curves: PeripheralCurves,
    pub shape: (f64, f64),
    pub positive_orientation: bool,
}

impl Tetrahedron {
    pub fn new(index: usize, neighbors: [usize; 4], gluings: [Permutation; 4]) -> Self {
        Self {
            index,
            neighbors,
            gluings,
            cusp_indices: [None; 4],
            peripheral_curves: PeripheralCurves::default(),
            shape: (0.0, 0.0),
            positive_orientation: true,
        }
    }

    /// The face of the neighbor that face `face` is glued to.
    pub fn neighbor_face(&self, face: usize) -> usize {
        self.gluings[face][face]
    }

    pub fn orientation_sign(&self) -> i32 {
        if self.positive_orientation {
            1
        } else {
            -1
        }
    }
}

/// Header lines of the text format which carry no combinatorial
/// information but are kept so that files round trip.
#[derive(Clone, Debug, PartialEq)]
pub struct Header {
    pub solution_type: String,
    pub orientability: String,
    pub chern_simons: String,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            solution_type: "not_attempted 0.0000".into(),
            orientability: "unknown_orientability".into(),
            chern_simons: "CS_unknown".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Triangulation {
    pub name: String,
    pub header: Header,
    pub num_orientable_cusps: usize,
    pub num_nonorientable_cusps: usize,
    pub cusps: Vec<Cusp>,
    tetrahedra: Vec<Tetrahedron>,
}

impl Triangulation {
    pub fn new(name: impl Into<String>, tetrahedra: Vec<Tetrahedron>) -> Result<Self> {
        let mut triangulation = Self {
            name: name.into(),
            header: Header::default(),
            num_orientable_cusps: 0,
            num_nonorientable_cusps: 0,
            cusps: vec![],
            tetrahedra,
        };
        triangulation.validate_indices()?;
        let cusp_structure = triangulation.cusp_structure()?;
        triangulation.assign_cusp_indices(&cusp_structure);
        Ok(triangulation)
    }

    pub(crate) fn from_parts(
        name: String,
        header: Header,
        num_orientable_cusps: usize,
        num_nonorientable_cusps: usize,
        cusps: Vec<Cusp>,
        tetrahedra: Vec<Tetrahedron>,
    ) -> Result<Self> {
        let triangulation = Self {
            name,
            header,
            num_orientable_cusps,
            num_nonorientable_cusps,
            cusps,
            tetrahedra,
        };
        triangulation.validate_indices()?;
        Ok(triangulation)
    }

    fn validate_indices(&self) -> Result<()> {
        for (i, tet) in self.tetrahedra.iter().enumerate() {
            if tet.index != i {
                return Err(PtolemyError::structural(format!(
                    "tetrahedron at position {} has index {}",
                    i, tet.index
                )));
            }
            if let Some(neighbor) = tet.neighbors.iter().find(|n| **n >= self.tetrahedra.len()) {
                return Err(PtolemyError::structural(format!(
                    "tetrahedron {} has neighbor {} out of range",
                    i, neighbor
                )));
            }
        }
        Ok(())
    }

    pub fn num_tetrahedra(&self) -> usize {
        self.tetrahedra.len()
    }

    pub fn num_cusps(&self) -> usize {
        self.num_orientable_cusps + self.num_nonorientable_cusps
    }

    pub fn tetrahedra(&self) -> &[Tetrahedron] {
        &self.tetrahedra
    }

    pub fn tetrahedron(&self, index: usize) -> &Tetrahedron {
        &self.tetrahedra[index]
    }

    pub fn orientations(&self) -> Vec<bool> {
        self.tetrahedra
            .iter()
            .map(|tet| tet.positive_orientation)
            .collect()
    }

    /// Propagates the orientation of tetrahedron 0 to all others. A
    /// neighbor reached through an even gluing gets the opposite
    /// orientation, one reached through an odd gluing the same.
    pub fn orient(&mut self) {
        if self.tetrahedra.is_empty() {
            return;
        }
        let mut visited = vec![false; self.tetrahedra.len()];
        let mut queue = VecDeque::from([(0, true)]);
        while let Some((index, positive)) = queue.pop_front() {
            if visited[index] {
                continue;
            }
            visited[index] = true;
            let tet = &mut self.tetrahedra[index];
            tet.positive_orientation = positive;
            for face in 0..4 {
                let neighbor = tet.neighbors[face];
                if !visited[neighbor] {
                    queue.push_back((neighbor, positive ^ tet.gluings[face].is_even()));
                }
            }
        }
        if visited.iter().any(|v| !v) {
            debug!("Triangulation {} is not connected", self.name);
        }
    }

    pub fn all_positively_oriented(&self) -> bool {
        self.tetrahedra.iter().all(|tet| tet.positive_orientation)
    }

    pub fn check_consistency(&self) -> Result<()> {
        for (index, tet) in self.tetrahedra.iter().enumerate() {
            for face in 0..4 {
                let gluing = tet.gluings[face];
                let neighbor = &self.tetrahedra[tet.neighbors[face]];
                let neighbor_face = gluing[face];
                let back_gluing = neighbor.gluings[neighbor_face];
                let error = |what: &str| {
                    Err(PtolemyError::structural(format!(
                        "{} of face {} of tetrahedron {} (glued to face {} of tetrahedron {})",
                        what, face, index, neighbor_face, neighbor.index
                    )))
                };
                if neighbor.neighbors[neighbor_face] != index {
                    return error("neighbor back-reference mismatch");
                }
                if back_gluing[neighbor_face] != face {
                    return error("face round trip mismatch");
                }
                for vertex in 0..4 {
                    if back_gluing[gluing[vertex]] != vertex {
                        return error("vertex round trip mismatch");
                    }
                }
                if neighbor.positive_orientation != tet.positive_orientation ^ gluing.is_even() {
                    return error("inconsistent orientation");
                }
            }
        }
        Ok(())
    }

    /// True if every gluing preserves the order of the vertices on the
    /// glued faces, i.e. the vertex labels come from a global ordering.
    pub fn is_ordered(&self) -> bool {
        self.tetrahedra.iter().all(|tet| {
            (0..4).all(|face| {
                let images = tet.gluings[face].images_without(face);
                images[0] < images[1] && images[1] < images[2]
            })
        })
    }

    /// Relabels the vertices of each tetrahedron: vertex `i` of
    /// tetrahedron `t` becomes vertex `perms[t][i]`.
    pub fn reorder_tets(&self, perms: &[Permutation]) -> Result<Triangulation> {
        if perms.len() != self.tetrahedra.len() {
            return Err(PtolemyError::structural(format!(
                "expected {} relabelling permutations, got {}",
                self.tetrahedra.len(),
                perms.len()
            )));
        }
        let inverses: Vec<Permutation> = perms.iter().map(|p| p.inverse()).collect();
        let tetrahedra = self
            .tetrahedra
            .iter()
            .map(|tet| {
                let inverse = inverses[tet.index];
                let neighbors = [0, 1, 2, 3].map(|i| tet.neighbors[inverse[i]]);
                let gluings = [0, 1, 2, 3].map(|i| {
                    let old_face = inverse[i];
                    let neighbor_perm = perms[tet.neighbors[old_face]];
                    let old_gluing = tet.gluings[old_face];
                    neighbor_perm * old_gluing * inverse
                });
                Tetrahedron {
                    index: tet.index,
                    neighbors,
                    gluings,
                    cusp_indices: [0, 1, 2, 3].map(|i| tet.cusp_indices[inverse[i]]),
                    peripheral_curves: tet.peripheral_curves.relabel(&inverse),
                    shape: tet.shape,
                    positive_orientation: tet.positive_orientation ^ perms[tet.index].is_odd(),
                }
            })
            .collect();
        Ok(Triangulation {
            tetrahedra,
            ..self.clone()
        })
    }

    /// Orients the triangulation and swaps vertices 2 and 3 of every
    /// negatively oriented tetrahedron, so that all of them end up
    /// positively oriented.
    pub fn reorder_orient(&self) -> Result<Triangulation> {
        let mut oriented = self.clone();
        oriented.orient();
        let swap = Permutation::new([0, 1, 3, 2])?;
        let perms: Vec<Permutation> = oriented
            .tetrahedra
            .iter()
            .map(|tet| {
                if tet.positive_orientation {
                    Permutation::identity()
                } else {
                    swap
                }
            })
            .collect();
        oriented.reorder_tets(&perms)
    }

    /// Orients the triangulation and relabels it according to an edge
    /// ordering, preferring orientation preserving ones.
    pub fn order(&self) -> Result<Triangulation> {
        let mut oriented = self.clone();
        oriented.orient();
        oriented.check_consistency()?;
        if oriented.is_ordered() {
            info!("Triangulation {} already ordered", self.name);
            return Ok(oriented);
        }
        let orderings = oriented.find_orderings()?;
        info!(
            "Number of orderings of triangulation {}: {}",
            self.name,
            orderings.len()
        );
        let chosen = orderings
            .iter()
            .find(|ordering| ordering.is_orientation_preserving(oriented.num_tetrahedra()))
            .or_else(|| orderings.first())
            .ok_or_else(|| {
                PtolemyError::Exhaustion(format!("no ordering of triangulation {}", self.name))
            })?;
        let reordered = oriented.reorder_tets(&chosen.permutations(oriented.num_tetrahedra())?)?;
        reordered.check_consistency()?;
        if !reordered.is_ordered() {
            return Err(PtolemyError::structural(format!(
                "relabelling triangulation {} by an edge ordering did not order it",
                self.name
            )));
        }
        Ok(reordered)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use proptest::prelude::*;

    use super::all_permutations;
    use super::Permutation;
    use super::Tetrahedron;
    use super::Triangulation;
    use crate::test_utils::tests_path;

    pub fn read_triangulation(name: &str) -> Triangulation {
        Triangulation::from_file(&tests_path().join("triangulations").join(name)).unwrap()
    }

    pub fn figure_eight() -> Triangulation {
        read_triangulation("m004.trig")
    }

    pub fn unorderable() -> Triangulation {
        read_triangulation("m003.trig")
    }

    fn perm(s: &str) -> Permutation {
        s.parse().unwrap()
    }

    #[test]
    fn orient_figure_eight() {
        let mut t = figure_eight();
        t.orient();
        assert_eq!(t.orientations(), vec![true, true]);
        t.check_consistency().unwrap();
        t.orient();
        assert_eq!(t.orientations(), vec![true, true]);
    }

    #[test]
    fn gluings_round_trip() {
        for t in [figure_eight(), unorderable()] {
            for tet in t.tetrahedra() {
                for face in 0..4 {
                    let neighbor = t.tetrahedron(tet.neighbors[face]);
                    let back = neighbor.gluings[tet.neighbor_face(face)];
                    for vertex in super::FACES[face] {
                        assert_eq!(back[tet.gluings[face][vertex]], vertex);
                    }
                }
            }
        }
    }

    #[test]
    fn broken_back_reference_is_detected() {
        let mut t = unorderable();
        t.orient();
        t.check_consistency().unwrap();
        t.tetrahedra[0].neighbors[0] = 0;
        assert!(t.check_consistency().is_err());
    }

    #[test]
    fn wrong_orientation_is_detected() {
        let mut t = figure_eight();
        t.orient();
        t.tetrahedra[1].positive_orientation = false;
        assert!(t.check_consistency().is_err());
    }

    #[test]
    fn reorder_keeps_consistency() {
        let mut t = figure_eight();
        t.orient();
        let perms = [perm("1023"), perm("2301")];
        let reordered = t.reorder_tets(&perms).unwrap();
        reordered.check_consistency().unwrap();
        assert_eq!(reordered.orientations(), vec![false, true]);
        let back = reordered
            .reorder_tets(&[perms[0].inverse(), perms[1].inverse()])
            .unwrap();
        assert_eq!(back, t);
    }

    proptest! {
        #[test]
        fn reorder_with_any_permutations_keeps_consistency(
            indices in proptest::collection::vec(0..24usize, 2),
            use_unorderable in proptest::bool::ANY,
        ) {
            let mut t = if use_unorderable { unorderable() } else { figure_eight() };
            t.orient();
            let permutations = all_permutations();
            let perms: Vec<Permutation> = indices.iter().map(|i| permutations[*i]).collect();
            let reordered = t.reorder_tets(&perms).unwrap();
            prop_assert!(reordered.check_consistency().is_ok());
            prop_assert_eq!(reordered.num_cusps(), t.num_cusps());
            for (tet, perm) in perms.iter().enumerate() {
                prop_assert_eq!(
                    reordered.orientations()[tet],
                    t.orientations()[tet] ^ perm.is_odd()
                );
            }
            let inverses: Vec<Permutation> = perms.iter().map(|p| p.inverse()).collect();
            prop_assert_eq!(reordered.reorder_tets(&inverses).unwrap(), t);
        }
    }

    #[test]
    fn reorder_orient_makes_everything_positive() {
        let mut t = figure_eight();
        t.orient();
        let t = t.reorder_tets(&[perm("0132"), perm("0123")]).unwrap();
        assert!(!t.all_positively_oriented());
        let t = t.reorder_orient().unwrap();
        t.check_consistency().unwrap();
        assert!(t.all_positively_oriented());
    }

    #[test]
    fn order_figure_eight() {
        let t = figure_eight();
        assert!(!t.is_ordered());
        let ordered = t.order().unwrap();
        ordered.check_consistency().unwrap();
        assert!(ordered.is_ordered());
    }

    #[test]
    fn order_fails_for_unorderable_triangulation() {
        assert!(unorderable().order().is_err());
    }

    #[test]
    fn construct_from_tetrahedra() {
        let t = figure_eight();
        let tets: Vec<Tetrahedron> = t
            .tetrahedra()
            .iter()
            .map(|tet| Tetrahedron::new(tet.index, tet.neighbors, tet.gluings))
            .collect();
        let constructed = Triangulation::new("m004", tets).unwrap();
        assert_eq!(constructed.num_cusps(), 1);
        assert_eq!(constructed.num_tetrahedra(), 2);
    }
}
