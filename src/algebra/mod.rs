//! Activeqp algebra module.
//!
//! __NB__: Activeqp uses its own dense matrix type for all of its internal
//! calculations.  The factorizations here (LU, Cholesky, SVD and a symmetric
//! eigensolver) cover what an active-set iteration needs on problems small
//! enough to hold in dense column major storage.  The kernels underneath are
//! provided by `nalgebra` through the [`DenseFloatT`] trait.
//!
//! Users should only need to use the [`Matrix`](crate::algebra::Matrix) type
//! to construct problem data.

// first import and define the floating point type
// and primitive conversion helpers
mod floats;
pub use floats::*;

// matrix types and traits
mod error_types;
mod math_traits;
mod matrix_traits;
mod matrix_types;
mod vecmath;
pub use error_types::*;
pub use math_traits::*;
pub use matrix_traits::*;
pub use matrix_types::*;

// native dense implementations
mod dense;
pub use dense::*;
