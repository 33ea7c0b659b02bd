use std::fmt;
use std::fs;
use std::path::Path;

use super::Header;
use super::Permutation;
use super::Tetrahedron;
use super::Triangulation;
use crate::error::PtolemyError;
use crate::error::Result;

const ORIENTATIONS_MARKER: &str = "orientations:";
const TOKENS_PER_TETRAHEDRON: usize = 4 + 4 + 4 + 64 + 2;

/// The SnapPea text of a triangulation, preceded by a comment line
/// recording the orientation of each tetrahedron.
pub struct SnapPeaText<'a>(pub &'a Triangulation);

impl fmt::Display for SnapPeaText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "% Triangulation {}", ORIENTATIONS_MARKER)?;
        for tet in self.0.tetrahedra() {
            let orientation = if tet.positive_orientation {
                "positive"
            } else {
                "negative"
            };
            write!(f, " {}", orientation)?;
        }
        writeln!(f)?;
        self.0.write_body(f)
    }
}

/// Meridian and longitude of the cusps, for both sheets of the cusp
/// cover, indexed by `[curve][sheet][vertex][face]`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PeripheralCurves(pub [[[[i32; 4]; 4]; 2]; 2]);

impl PeripheralCurves {
    /// The curves after vertex `inverse[i]` has been renamed to `i`.
    pub fn relabel(&self, inverse: &Permutation) -> Self {
        let mut result = Self::default();
        for curve in 0..2 {
            for sheet in 0..2 {
                for vertex in 0..4 {
                    for face in 0..4 {
                        result.0[curve][sheet][vertex][face] =
                            self.0[curve][sheet][inverse[vertex]][inverse[face]];
                    }
                }
            }
        }
        result
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Cusp {
    pub kind: String,
    pub shape: (f64, f64),
}

impl Default for Cusp {
    fn default() -> Self {
        Self {
            kind: "torus".into(),
            shape: (0.0, 0.0),
        }
    }
}

struct Tokens<'a> {
    tokens: std::str::SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn next_str(&mut self, what: &str) -> Result<&'a str> {
        self.tokens
            .next()
            .ok_or_else(|| PtolemyError::parse(format!("unexpected end of file reading {}", what)))
    }

    fn next<T: std::str::FromStr>(&mut self, what: &str) -> Result<T> {
        let token = self.next_str(what)?;
        token
            .parse()
            .map_err(|_| PtolemyError::parse(format!("invalid {}: {}", what, token)))
    }

    fn next_array<T: std::str::FromStr + Default + Copy>(&mut self, what: &str) -> Result<[T; 4]> {
        let mut result = [T::default(); 4];
        for entry in result.iter_mut() {
            *entry = self.next(what)?;
        }
        Ok(result)
    }
}

fn parse_orientations(comment: &str) -> Vec<bool> {
    comment
        .split_whitespace()
        .skip_while(|token| *token != ORIENTATIONS_MARKER)
        .skip(1)
        .map(|token| token != "negative")
        .collect()
}

impl Triangulation {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| PtolemyError::io(path, e))?;
        Self::from_snappea(&contents)
    }

    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_snappea()).map_err(|e| PtolemyError::io(path, e))
    }

    pub fn from_snappea(contents: &str) -> Result<Self> {
        let mut lines = contents.lines();
        let mut header_line = |what: &str| {
            lines
                .next()
                .map(|line| line.trim().to_owned())
                .ok_or_else(|| PtolemyError::parse(format!("missing {} line", what)))
        };
        let comment = header_line("comment")?;
        if !comment.starts_with('%') {
            return Err(PtolemyError::parse(format!(
                "not a triangulation file, first line is {}",
                comment
            )));
        }
        let name = header_line("name")?;
        let header = Header {
            solution_type: header_line("solution type")?,
            orientability: header_line("orientability")?,
            chern_simons: header_line("Chern-Simons")?,
        };
        let rest: Vec<&str> = lines.collect();
        let rest = rest.join("\n");
        let mut tokens = Tokens {
            tokens: rest.split_whitespace(),
        };
        let num_orientable_cusps = tokens.next("number of orientable cusps")?;
        let num_nonorientable_cusps: usize = tokens.next("number of non-orientable cusps")?;
        let cusps = (0..num_orientable_cusps + num_nonorientable_cusps)
            .map(|_| {
                Ok(Cusp {
                    kind: tokens.next_str("cusp type")?.to_owned(),
                    shape: (tokens.next("cusp shape")?, tokens.next("cusp shape")?),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let num_tetrahedra: usize = tokens.next("number of tetrahedra")?;
        let orientations = parse_orientations(&comment);
        let tetrahedra = (0..num_tetrahedra)
            .map(|index| {
                let neighbors = tokens.next_array("neighbor index")?;
                let mut gluings = [Permutation::identity(); 4];
                for gluing in gluings.iter_mut() {
                    *gluing = tokens.next("gluing permutation")?;
                }
                let cusp_indices: [i64; 4] = tokens.next_array("cusp index")?;
                let mut peripheral_curves = PeripheralCurves::default();
                for curve in 0..2 {
                    for sheet in 0..2 {
                        for vertex in 0..4 {
                            peripheral_curves.0[curve][sheet][vertex] =
                                tokens.next_array("peripheral curve")?;
                        }
                    }
                }
                let shape = (tokens.next("shape")?, tokens.next("shape")?);
                Ok(Tetrahedron {
                    index,
                    neighbors,
                    gluings,
                    cusp_indices: cusp_indices.map(|c| usize::try_from(c).ok()),
                    peripheral_curves,
                    shape,
                    positive_orientation: orientations.get(index).cloned().unwrap_or(true),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        if tokens.tokens.next().is_some() {
            return Err(PtolemyError::parse(format!(
                "trailing data after {} tetrahedra ({} tokens each)",
                num_tetrahedra, TOKENS_PER_TETRAHEDRON
            )));
        }
        Triangulation::from_parts(
            name,
            header,
            num_orientable_cusps,
            num_nonorientable_cusps,
            cusps,
            tetrahedra,
        )
    }

    pub fn to_snappea(&self) -> String {
        SnapPeaText(self).to_string()
    }

    fn write_body(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(out, "{}", self.name)?;
        writeln!(out, "{}", self.header.solution_type)?;
        writeln!(out, "{}", self.header.orientability)?;
        writeln!(out, "{}", self.header.chern_simons)?;
        writeln!(out)?;
        writeln!(
            out,
            "{} {}",
            self.num_orientable_cusps, self.num_nonorientable_cusps
        )?;
        for cusp in self.cusps.iter() {
            writeln!(
                out,
                "    {} {:16.12} {:16.12}",
                cusp.kind, cusp.shape.0, cusp.shape.1
            )?;
        }
        writeln!(out)?;
        writeln!(out, "{}", self.num_tetrahedra())?;
        for tet in self.tetrahedra() {
            for neighbor in tet.neighbors.iter() {
                write!(out, "{:4} ", neighbor)?;
            }
            writeln!(out)?;
            for gluing in tet.gluings.iter() {
                write!(out, " {}", gluing)?;
            }
            writeln!(out)?;
            for cusp in tet.cusp_indices.iter() {
                match cusp {
                    Some(cusp) => write!(out, "{:4} ", cusp)?,
                    None => write!(out, "{:4} ", -1)?,
                }
            }
            writeln!(out)?;
            for curve in tet.peripheral_curves.0.iter() {
                for sheet in curve.iter() {
                    for vertex in sheet.iter() {
                        for entry in vertex.iter() {
                            write!(out, " {:2}", entry)?;
                        }
                    }
                    writeln!(out)?;
                }
            }
            writeln!(out, " {:16.12} {:16.12}", tet.shape.0, tet.shape.1)?;
            writeln!(out)?;
        }
        Ok(())
    }
}
