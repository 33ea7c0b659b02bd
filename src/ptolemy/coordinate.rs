use std::fmt;
use std::str::FromStr;

use crate::error::PtolemyError;

/// A Ptolemy coordinate: a point of the simplex of size `N` inside the
/// tetrahedron `tet`, given by its four barycentric integer coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PtolemyCoordinate {
    pub coords: [usize; 4],
    pub tet: usize,
}

impl PtolemyCoordinate {
    pub fn new(coords: [usize; 4], tet: usize) -> Self {
        Self { coords, tet }
    }

    pub fn size(&self) -> usize {
        self.coords.iter().sum()
    }

    pub fn shifted(&self, offset: [usize; 4]) -> Self {
        Self {
            coords: [0, 1, 2, 3].map(|i| self.coords[i] + offset[i]),
            tet: self.tet,
        }
    }

    /// Lies on the boundary of its tetrahedron.
    pub fn is_on_boundary(&self) -> bool {
        self.coords.contains(&0)
    }

    /// Coincides with a vertex of its tetrahedron.
    pub fn is_vertex(&self) -> bool {
        let size = self.size();
        self.coords.contains(&size)
    }
}

/// Entries above 9 are preceded by an underscore and must have two
/// digits.
impl fmt::Display for PtolemyCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c_")?;
        for c in self.coords.iter() {
            if *c > 9 {
                write!(f, "_")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, "_{}", self.tet)
    }
}

impl FromStr for PtolemyCoordinate {
    type Err = PtolemyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || PtolemyError::parse(format!("invalid Ptolemy coordinate: {}", s));
        let rest = s.strip_prefix("c_").ok_or_else(error)?;
        let (digits, tet) = rest.rsplit_once('_').ok_or_else(error)?;
        let tet = tet.parse().map_err(|_| error())?;
        let mut coords = vec![];
        let mut chars = digits.chars();
        while let Some(c) = chars.next() {
            let entry = if c == '_' {
                let high = chars.next().and_then(|c| c.to_digit(10)).ok_or_else(error)?;
                let low = chars.next().and_then(|c| c.to_digit(10)).ok_or_else(error)?;
                10 * high + low
            } else {
                c.to_digit(10).ok_or_else(error)?
            };
            coords.push(entry as usize);
        }
        let coords: [usize; 4] = coords.try_into().map_err(|_| error())?;
        Ok(Self { coords, tet })
    }
}

/// A variable of the Ptolemy variety. The auxiliary variable `t`
/// enforcing that no coordinate vanishes sorts first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variable {
    NonZero,
    Ptolemy(PtolemyCoordinate),
}

impl Variable {
    pub fn coordinate(&self) -> Option<&PtolemyCoordinate> {
        match self {
            Variable::Ptolemy(c) => Some(c),
            Variable::NonZero => None,
        }
    }
}

impl From<PtolemyCoordinate> for Variable {
    fn from(c: PtolemyCoordinate) -> Self {
        Variable::Ptolemy(c)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variable::NonZero => write!(f, "t"),
            Variable::Ptolemy(c) => write!(f, "{}", c),
        }
    }
}

impl FromStr for Variable {
    type Err = PtolemyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "t" {
            Ok(Variable::NonZero)
        } else {
            s.parse().map(Variable::Ptolemy)
        }
    }
}

/// All tuples of nonnegative integers of the given length with the
/// given sum, in lexicographic order.
pub fn tuples_with_sum(length: usize, sum: usize) -> Vec<Vec<usize>> {
    match length {
        0 if sum == 0 => vec![vec![]],
        0 => vec![],
        1 => vec![vec![sum]],
        _ => (0..=sum)
            .flat_map(|first| {
                tuples_with_sum(length - 1, sum - first)
                    .into_iter()
                    .map(move |rest| {
                        let mut tuple = vec![first];
                        tuple.extend(rest);
                        tuple
                    })
            })
            .collect(),
    }
}

/// The integer points of a tetrahedron subdivided into `size` steps
/// along each edge.
pub fn simplex_points(size: usize) -> Vec<[usize; 4]> {
    tuples_with_sum(4, size)
        .into_iter()
        .map(|t| [t[0], t[1], t[2], t[3]])
        .collect()
}

/// The integer points of a face, i.e. of a triangle subdivided into
/// `size` steps.
pub fn face_points(size: usize) -> Vec<[usize; 3]> {
    tuples_with_sum(3, size)
        .into_iter()
        .map(|t| [t[0], t[1], t[2]])
        .collect()
}

/// The image of a point of face `face` in the tetrahedron.
pub fn include_face_point(point: [usize; 3], face: usize) -> [usize; 4] {
    let mut coords = [0; 4];
    let mut k = 0;
    for (i, c) in coords.iter_mut().enumerate() {
        if i != face {
            *c = point[k];
            k += 1;
        }
    }
    coords
}

#[cfg(test)]
mod tests {
    use super::include_face_point;
    use super::simplex_points;
    use super::tuples_with_sum;
    use super::PtolemyCoordinate;
    use super::Variable;

    #[test]
    fn tuples() {
        assert_eq!(
            tuples_with_sum(3, 2),
            vec![
                vec![0, 0, 2],
                vec![0, 1, 1],
                vec![0, 2, 0],
                vec![1, 0, 1],
                vec![1, 1, 0],
                vec![2, 0, 0],
            ]
        );
        assert_eq!(tuples_with_sum(4, 0), vec![vec![0, 0, 0, 0]]);
        assert_eq!(simplex_points(2).len(), 10);
        assert_eq!(simplex_points(3).len(), 20);
    }

    #[test]
    fn inclusion_of_face_points() {
        assert_eq!(include_face_point([6, 5, 2], 1), [6, 0, 5, 2]);
        assert_eq!(include_face_point([1, 1, 0], 3), [1, 1, 0, 0]);
    }

    #[test]
    fn coordinate_names() {
        let c = PtolemyCoordinate::new([1, 2, 3, 1], 5);
        assert_eq!(c.to_string(), "c_1231_5");
        assert_eq!("c_1231_5".parse::<PtolemyCoordinate>().unwrap(), c);
        let c = PtolemyCoordinate::new([12, 0, 1, 0], 13);
        assert_eq!(c.to_string(), "c__12010_13");
        assert_eq!(c.to_string().parse::<PtolemyCoordinate>().unwrap(), c);
        assert!("c_123_5".parse::<PtolemyCoordinate>().is_err());
        assert!("d_1231_5".parse::<PtolemyCoordinate>().is_err());
        assert!("c_1231".parse::<PtolemyCoordinate>().is_err());
    }

    #[test]
    fn variables_sort_with_t_first() {
        let mut variables = vec![
            Variable::Ptolemy("c_0101_1".parse().unwrap()),
            Variable::NonZero,
            Variable::Ptolemy("c_0011_0".parse().unwrap()),
        ];
        variables.sort();
        let names: Vec<String> = variables.iter().map(|v| v.to_string()).collect();
        assert_eq!(names, vec!["t", "c_0011_0", "c_0101_1"]);
        assert_eq!("t".parse::<Variable>().unwrap(), Variable::NonZero);
    }

    #[test]
    fn boundary_and_vertices() {
        let c = PtolemyCoordinate::new([0, 1, 1, 0], 0);
        assert!(c.is_on_boundary());
        assert!(!c.is_vertex());
        assert!(PtolemyCoordinate::new([2, 0, 0, 0], 0).is_vertex());
        assert!(!PtolemyCoordinate::new([1, 1, 1, 1], 0).is_on_boundary());
        assert_eq!(c.shifted([1, 0, 0, 1]).coords, [1, 1, 1, 1]);
    }
}
