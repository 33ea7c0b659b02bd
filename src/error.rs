use std::fmt;
use std::io;
use std::path::PathBuf;

use derive_more::From;
use num::Complex;
use thiserror::Error;

pub type Result<T, E = PtolemyError> = std::result::Result<T, E>;

/// Numbers attached to a numerical error for diagnosis.
#[derive(Clone, Debug, Default, PartialEq, From)]
pub struct NumericalValues(pub Vec<Complex<f64>>);

impl fmt::Display for NumericalValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "]")
    }
}

#[derive(Debug, Error)]
pub enum PtolemyError {
    /// The triangulation is malformed. Never recovered.
    #[error("inconsistent triangulation: {0}")]
    Structural(String),
    #[error("numerical error: {message} {values}")]
    Numerical {
        message: String,
        values: NumericalValues,
    },
    #[error("no solution found: {0}")]
    Exhaustion(String),
    #[error("external process failed: {0}")]
    ExternalProcess(String),
    #[error("external process timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid parameters: {0}")]
    Parameters(String),
}

impl PtolemyError {
    pub fn numerical(message: impl Into<String>, values: impl Into<NumericalValues>) -> Self {
        Self::Numerical {
            message: message.into(),
            values: values.into(),
        }
    }

    pub fn structural(message: impl Into<String>) -> Self {
        Self::Structural(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Structural errors indicate malformed input and abort a whole
    /// batch. Everything else is reported per item.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Structural(_) | Self::Parameters(_))
    }
}
