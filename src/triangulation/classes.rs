use std::collections::HashSet;

use super::Triangulation;
use crate::error::PtolemyError;
use crate::error::Result;

const EDGES: [(usize, usize); 6] = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];

/// The edge of tetrahedron `tet` from vertex `v0` to vertex `v1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub tet: usize,
    pub v0: usize,
    pub v1: usize,
}

impl Edge {
    pub fn new(tet: usize, v0: usize, v1: usize) -> Self {
        Self { tet, v0, v1 }
    }

    pub fn flip(&self) -> Self {
        Self::new(self.tet, self.v1, self.v0)
    }
}

/// All edges identified with each other, sorted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeClass(pub Vec<Edge>);

impl EdgeClass {
    pub fn edges(&self) -> &[Edge] {
        &self.0
    }

    pub fn contains(&self, edge: &Edge) -> bool {
        self.0.binary_search(edge).is_ok()
    }

    pub fn flip(&self) -> Self {
        Self(self.0.iter().map(|e| e.flip()).collect())
    }
}

/// Face `face1` of `tet1` glued to face `face2` of `tet2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceClass {
    pub tet1: usize,
    pub face1: usize,
    pub tet2: usize,
    pub face2: usize,
    /// Sign of the gluing permutation.
    pub orientation: i32,
}

fn left_out(vertices: [usize; 3]) -> usize {
    (0..4).find(|v| !vertices.contains(v)).unwrap_or(3)
}

impl Triangulation {
    pub fn face_classes(&self) -> Vec<FaceClass> {
        let mut processed = HashSet::new();
        let mut classes = vec![];
        for tet in self.tetrahedra() {
            for face in 0..4 {
                if processed.contains(&(tet.index, face)) {
                    continue;
                }
                let class = FaceClass {
                    tet1: tet.index,
                    face1: face,
                    tet2: tet.neighbors[face],
                    face2: tet.neighbor_face(face),
                    orientation: tet.gluings[face].sign(),
                };
                processed.insert((class.tet1, class.face1));
                processed.insert((class.tet2, class.face2));
                classes.push(class);
            }
        }
        classes
    }

    /// The edge the given edge is glued to across `face`, together with
    /// the face of the new tetrahedron to continue through.
    fn next_edge(&self, edge: Edge, face: usize) -> (Edge, usize) {
        let tet = self.tetrahedron(edge.tet);
        let gluing = tet.gluings[face];
        let next = Edge::new(tet.neighbors[face], gluing[edge.v0], gluing[edge.v1]);
        (next, gluing[left_out([edge.v0, edge.v1, face])])
    }

    /// Walks around the edge through the glued faces until the walk
    /// returns to an edge it has already visited.
    pub fn edge_class(&self, start: Edge) -> Result<EdgeClass> {
        let mut face = (0..4).find(|f| *f != start.v0 && *f != start.v1).unwrap_or(0);
        let mut edges = vec![];
        let mut edge = start;
        loop {
            edges.push(edge);
            if edges.len() > 6 * self.num_tetrahedra() {
                return Err(PtolemyError::structural(format!(
                    "edge class of {:?} does not close",
                    start
                )));
            }
            let (next, next_face) = self.next_edge(edge, face);
            if edges.contains(&next) {
                break;
            }
            edge = next;
            face = next_face;
        }
        edges.sort();
        Ok(EdgeClass(edges))
    }

    /// All edge classes. With `both_orientations`, each class is
    /// reported once per direction; otherwise once, in the direction
    /// of the first edge encountered in the order 01, 02, 03, 12, 13, 23.
    pub fn edge_classes(&self, both_orientations: bool) -> Result<Vec<EdgeClass>> {
        let edges: Vec<(usize, usize)> = if both_orientations {
            EDGES
                .iter()
                .cloned()
                .chain(EDGES.iter().map(|(a, b)| (*b, *a)))
                .collect()
        } else {
            EDGES.to_vec()
        };
        let mut processed = HashSet::new();
        let mut classes = vec![];
        for tet in 0..self.num_tetrahedra() {
            for (v0, v1) in edges.iter() {
                let edge = Edge::new(tet, *v0, *v1);
                if processed.contains(&edge) {
                    continue;
                }
                let class = self.edge_class(edge)?;
                processed.extend(class.edges().iter().cloned());
                if !both_orientations {
                    processed.extend(class.edges().iter().map(|e| e.flip()));
                }
                classes.push(class);
            }
        }
        Ok(classes)
    }
}
