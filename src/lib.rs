pub mod algebra;
pub mod bloch;
pub mod cohomology;
pub mod command_line_options;
pub mod decomposition;
pub mod emit_build_information;
pub mod error;
pub mod parameters;
pub mod pipeline;
pub mod ptolemy;
pub mod solver;
pub mod triangulation;

#[cfg(test)]
pub(crate) mod test_utils;

pub mod prelude {
    pub use super::algebra::Precision;
    pub use super::error::PtolemyError;
    pub use super::error::Result;
    pub use super::parameters::Parameters;
    pub use super::pipeline::Report;
    pub use super::ptolemy::PtolemyVariety;
    pub use super::triangulation::Triangulation;
}
