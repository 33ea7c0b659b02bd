use log::debug;

use super::EdgeClass;
use super::Permutation;
use super::Triangulation;
use super::FACES;
use crate::error::Result;

/// Orientation marks of the six edges of every tetrahedron during the
/// ordering search. `marks[t][a][b]` is `1` if the edge of `t` points
/// from `a` to `b`, `-1` if it points from `b` to `a` and `0` if it is
/// not yet oriented.
#[derive(Clone, Debug)]
struct SearchState {
    marks: Vec<[[i8; 4]; 4]>,
}

impl SearchState {
    fn new(num_tetrahedra: usize) -> Self {
        Self {
            marks: vec![[[0; 4]; 4]; num_tetrahedra],
        }
    }

    /// Returns the state with all edges of the class oriented as given,
    /// or `None` if this creates a cyclically oriented face.
    fn with_oriented(&self, class: &EdgeClass) -> Option<Self> {
        let mut next = self.clone();
        for edge in class.edges() {
            next.marks[edge.tet][edge.v0][edge.v1] = 1;
            next.marks[edge.tet][edge.v1][edge.v0] = -1;
        }
        let consistent = class
            .edges()
            .iter()
            .all(|edge| next.is_tetrahedron_consistent(edge.tet));
        consistent.then_some(next)
    }

    fn is_tetrahedron_consistent(&self, tet: usize) -> bool {
        FACES.iter().all(|face| self.is_face_consistent(tet, face))
    }

    /// A face is fine as long as one of its edges is unoriented or its
    /// edges do not all point around it in the same direction.
    fn is_face_consistent(&self, tet: usize, face: &[usize; 3]) -> bool {
        let signs = [
            self.marks[tet][face[0]][face[1]],
            self.marks[tet][face[1]][face[2]],
            self.marks[tet][face[2]][face[0]],
        ];
        signs.contains(&0) || (signs.contains(&1) && signs.contains(&-1))
    }
}

/// A choice of direction for every edge class such that no face is
/// oriented cyclically.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeOrdering(pub Vec<EdgeClass>);

impl EdgeOrdering {
    /// One relabelling permutation per tetrahedron. A vertex is
    /// relabelled by the number of oriented edges pointing to it.
    pub fn permutations(&self, num_tetrahedra: usize) -> Result<Vec<Permutation>> {
        let mut images = vec![[0; 4]; num_tetrahedra];
        for class in self.0.iter() {
            for edge in class.edges() {
                images[edge.tet][edge.v1] += 1;
            }
        }
        images.into_iter().map(Permutation::new).collect()
    }

    /// True if every relabelling permutation is odd.
    pub fn is_orientation_preserving(&self, num_tetrahedra: usize) -> bool {
        self.permutations(num_tetrahedra)
            .map(|perms| perms.iter().all(|p| p.is_odd()))
            .unwrap_or(false)
    }
}

impl Triangulation {
    /// All edge orderings, by exhaustive backtracking over the edge
    /// classes. Each class is first tried in its reported direction,
    /// then flipped.
    pub fn find_orderings(&self) -> Result<Vec<EdgeOrdering>> {
        let classes = self.edge_classes(false)?;
        let mut orderings = vec![];
        extend_ordering(
            SearchState::new(self.num_tetrahedra()),
            vec![],
            &classes,
            &mut orderings,
        );
        debug!(
            "Found {} orderings for {} edge classes",
            orderings.len(),
            classes.len()
        );
        Ok(orderings)
    }
}

fn extend_ordering(
    state: SearchState,
    oriented: Vec<EdgeClass>,
    remaining: &[EdgeClass],
    orderings: &mut Vec<EdgeOrdering>,
) {
    let (class, rest) = match remaining.split_first() {
        Some(split) => split,
        None => {
            orderings.push(EdgeOrdering(oriented));
            return;
        }
    };
    for candidate in [class.clone(), class.flip()] {
        if let Some(next_state) = state.with_oriented(&candidate) {
            let mut next_oriented = oriented.clone();
            next_oriented.push(candidate);
            extend_ordering(next_state, next_oriented, rest, orderings);
        }
    }
}
