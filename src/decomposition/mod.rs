mod process;
mod text;

use std::fmt;

pub use self::process::ExternalDecomposer;
pub use self::text::decomposition_input;
pub use self::text::DecompositionInput;
pub use self::text::input_file_name;
pub use self::text::parse_output;
pub use self::text::DecompositionHeader;
pub use self::text::DecompositionOutput;
use crate::ptolemy::Equation;

/// One component of the primary decomposition of a Ptolemy variety,
/// given by a Groebner basis.
#[derive(Clone, Debug, PartialEq)]
pub struct PrimeIdeal {
    pub generators: Vec<Equation>,
    pub dimension: usize,
    /// Number of points over the algebraic closure, reported for
    /// zero-dimensional components.
    pub number_of_points: Option<usize>,
}

impl PrimeIdeal {
    /// How many variables the solver may set to random values.
    pub fn free_variables(&self) -> usize {
        self.dimension
    }
}

/// Ways the external decomposition can end without a result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessFailure {
    Crashed,
    OutOfMemory,
}

impl fmt::Display for ProcessFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessFailure::Crashed => write!(f, "decomposition crashed or was aborted"),
            ProcessFailure::OutOfMemory => write!(f, "decomposition ran out of memory"),
        }
    }
}
