pub mod coordinate;
pub mod equivalence;
pub mod solution;
pub mod variety;

pub use self::coordinate::PtolemyCoordinate;
pub use self::coordinate::Variable;
pub use self::equivalence::SignedEquivalence;
pub use self::solution::PtolemySolution;
pub use self::variety::ptolemy_varieties;
pub use self::variety::Equation;
pub use self::variety::PtolemyVariety;
