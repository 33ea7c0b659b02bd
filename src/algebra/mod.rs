pub mod bigfloat;
pub mod dilog;
pub mod field;
pub mod integer_relation;
pub mod matrix;
pub mod number;
pub mod parse;
pub mod polynomial;
pub mod roots;

pub use self::bigfloat::BigComplex;
pub use self::bigfloat::BigFloat;
pub use self::field::Field;
pub use self::field::F2;
pub use self::matrix::Matrix;
pub use self::number::Precision;
pub use self::number::Real;
pub use self::number::Scalar;
pub use self::polynomial::Polynomial;
