mod file_contents;

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use derive_custom::ptolemy_parameters;

pub use self::file_contents::Override;
pub use self::file_contents::ParameterFileContents;
use crate::algebra::Precision;
use crate::error::PtolemyError;
use crate::error::Result;

/// Working precision of all numerical computations.
#[ptolemy_parameters("precision")]
#[serde(default)]
pub struct PrecisionParameters {
    pub digits: u32,
    /// Tolerance of all consistency checks. Defaults to six digits
    /// less than the working precision.
    pub epsilon: Option<f64>,
}

impl Default for PrecisionParameters {
    fn default() -> Self {
        Self {
            digits: 15,
            epsilon: None,
        }
    }
}

impl PrecisionParameters {
    pub fn precision(&self) -> Result<Precision> {
        Precision::new(self.digits, self.epsilon)
    }
}

#[ptolemy_parameters("solver")]
#[serde(default)]
pub struct SolverParameters {
    /// Number of variables that get random values when solving a
    /// variety directly, without a decomposition.
    pub free_dimension: usize,
    pub seed: u64,
    /// Also check that coordinates on glued faces agree.
    pub paranoid: bool,
    /// Evaluate positive dimensional components at a random point.
    pub solve_positive_dimensional: bool,
    /// Largest coefficient allowed when recognizing the Chern-Simons
    /// invariant as a rational multiple of pi^2.
    pub max_relation_coefficient: i64,
}

impl Default for SolverParameters {
    fn default() -> Self {
        Self {
            free_dimension: 0,
            seed: 0,
            paranoid: false,
            solve_positive_dimensional: false,
            max_relation_coefficient: 1000,
        }
    }
}

/// The external program computing primary decompositions.
#[ptolemy_parameters("decomposition")]
#[serde(default)]
pub struct DecompositionParameters {
    pub command: String,
    pub arguments: Vec<String>,
    pub timeout_seconds: u64,
    /// Where input files are written. Defaults to the directory of the
    /// triangulation.
    pub output_directory: Option<PathBuf>,
}

impl Default for DecompositionParameters {
    fn default() -> Self {
        Self {
            command: "magma".into(),
            arguments: vec![],
            timeout_seconds: 3600,
            output_directory: None,
        }
    }
}

impl DecompositionParameters {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[ptolemy_parameters("run")]
#[serde(default)]
pub struct RunParameters {
    /// Representations into PSL(n, C).
    pub n: usize,
    /// Indices of the obstruction classes to consider, all if empty.
    pub obstruction_classes: Vec<usize>,
}

impl Default for RunParameters {
    fn default() -> Self {
        Self {
            n: 2,
            obstruction_classes: vec![],
        }
    }
}

impl RunParameters {
    pub fn includes_class(&self, index: usize) -> bool {
        self.obstruction_classes.is_empty() || self.obstruction_classes.contains(&index)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Parameters {
    pub precision: PrecisionParameters,
    pub solver: SolverParameters,
    pub decomposition: DecompositionParameters,
    pub run: RunParameters,
}

impl Parameters {
    pub fn from_contents(contents: &mut ParameterFileContents) -> Result<Self> {
        let parameters = Self {
            precision: contents.extract_parameter_struct()?,
            solver: contents.extract_parameter_struct()?,
            decomposition: contents.extract_parameter_struct()?,
            run: contents.extract_parameter_struct()?,
        };
        for name in contents.get_section_names() {
            if !SECTION_NAMES.contains(&name.as_str()) {
                return Err(PtolemyError::Parameters(format!("unknown section {}", name)));
            }
        }
        Ok(parameters)
    }

    /// Reads the parameter file, if any, and applies the overrides.
    pub fn read(path: Option<&Path>, overrides: Vec<Override>) -> Result<(Self, ParameterFileContents)> {
        let text = match path {
            Some(path) => fs::read_to_string(path).map_err(|e| PtolemyError::io(path, e))?,
            None => String::new(),
        };
        let mut contents = ParameterFileContents::new(&text)?;
        contents.with_overrides(overrides);
        let parameters = Self::from_contents(&mut contents)?;
        Ok((parameters, contents))
    }
}

const SECTION_NAMES: [&str; 4] = ["precision", "solver", "decomposition", "run"];
