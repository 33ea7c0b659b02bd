use std::collections::BTreeSet;

use super::Edge;
use super::Triangulation;
use crate::error::PtolemyError;
use crate::error::Result;

/// The vertices of the triangulation up to identification. Each class
/// is a cusp whose link is triangulated by the vertex corners.
#[derive(Clone, Debug, PartialEq)]
pub struct CuspStructure {
    /// Cusp index of each vertex of each tetrahedron.
    pub vertex_cusps: Vec<[usize; 4]>,
    pub euler_characteristics: Vec<i64>,
}

impl CuspStructure {
    pub fn num_cusps(&self) -> usize {
        self.euler_characteristics.len()
    }

    /// True if every cusp link is a torus or Klein bottle.
    pub fn all_cusps_have_zero_euler_characteristic(&self) -> bool {
        self.euler_characteristics.iter().all(|chi| *chi == 0)
    }
}

impl Triangulation {
    pub fn cusp_structure(&self) -> Result<CuspStructure> {
        let mut vertex_cusps: Vec<[Option<usize>; 4]> = vec![[None; 4]; self.num_tetrahedra()];
        let mut num_cusps = 0;
        for tet in 0..self.num_tetrahedra() {
            for vertex in 0..4 {
                if vertex_cusps[tet][vertex].is_some() {
                    continue;
                }
                let mut stack = vec![(tet, vertex)];
                while let Some((t, v)) = stack.pop() {
                    if vertex_cusps[t][v].is_some() {
                        continue;
                    }
                    vertex_cusps[t][v] = Some(num_cusps);
                    let tetrahedron = self.tetrahedron(t);
                    for face in (0..4).filter(|face| *face != v) {
                        stack.push((tetrahedron.neighbors[face], tetrahedron.gluings[face][v]));
                    }
                }
                num_cusps += 1;
            }
        }
        let vertex_cusps: Vec<[usize; 4]> = vertex_cusps
            .into_iter()
            .map(|cusps| cusps.map(|c| c.unwrap_or(0)))
            .collect();
        let edge_classes = self.edge_classes(true)?;
        let euler_characteristics = (0..num_cusps)
            .map(|cusp| {
                let mut link_vertices = BTreeSet::new();
                let mut link_triangles = 0;
                for (tet, cusps) in vertex_cusps.iter().enumerate() {
                    for vertex in (0..4).filter(|v| cusps[*v] == cusp) {
                        link_triangles += 1;
                        for other in (0..4).filter(|v| *v != vertex) {
                            let edge = Edge::new(tet, vertex, other);
                            if let Some(index) = edge_classes.iter().position(|c| c.contains(&edge)) {
                                link_vertices.insert(index);
                            }
                        }
                    }
                }
                if link_triangles % 2 != 0 {
                    return Err(PtolemyError::structural(format!(
                        "odd number of triangles in the link of cusp {}",
                        cusp
                    )));
                }
                Ok(link_vertices.len() as i64 - link_triangles / 2)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(CuspStructure {
            vertex_cusps,
            euler_characteristics,
        })
    }

    pub fn assign_cusp_indices(&mut self, cusp_structure: &CuspStructure) {
        for (tet, cusps) in self.tetrahedra.iter_mut().zip(cusp_structure.vertex_cusps.iter()) {
            tet.cusp_indices = cusps.map(Some);
        }
        if self.num_cusps() != cusp_structure.num_cusps() {
            self.num_orientable_cusps = cusp_structure.num_cusps();
            self.num_nonorientable_cusps = 0;
            self.cusps
                .resize_with(cusp_structure.num_cusps(), Default::default);
        }
    }
}
