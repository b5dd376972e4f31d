#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// All matrix data in the solver and in the API is held
// in dense, column major format.

/// Dense matrix in column major format
///
/// __Example usage__ : To construct the 3 x 3 matrix
/// ```text
/// A = [1.  3.  5.]
///     [2.  0.  6.]
///     [0.  4.  7.]
/// ```
///
/// ```
/// use activeqp::algebra::Matrix;
///
/// let A : Matrix<f64> = Matrix::new(
///    (3, 3),                                    // size as tuple
///    vec![1., 2., 0., 3., 0., 4., 5., 6., 7.],  // data in column major order
///  );
///
/// // or equivalently from row arrays
/// let B = Matrix::from(&[
///     [1., 3., 5.],
///     [2., 0., 6.],
///     [0., 4., 7.],
/// ]);
///
/// assert_eq!(A, B);
/// ```
///
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Matrix<T = f64> {
    /// number of rows
    pub m: usize,
    /// number of columns
    pub n: usize,
    /// vector of data in column major format
    pub data: Vec<T>,
}

/// Matrix orientation marker
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum MatrixShape {
    /// Normal matrix orientation
    N,
    /// Transposed matrix orientation
    T,
}

/// Adjoint of a matrix.  This is a read-only view of the
/// source matrix and does not copy any data.
#[derive(Debug, Clone, Copy)]
pub struct Adjoint<'a, M> {
    pub src: &'a M,
}
