use thiserror::Error;

/// Error type returned by matrix concatenation operations.
#[derive(Error, Debug)]
pub enum MatrixConcatenationError {
    #[error("Incompatible dimensions")]
    /// Indicates inputs have incompatible dimension
    IncompatibleDimension,
}

/// Error type returned by dense factorization routines.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DenseFactorizationError {
    /// Matrix dimension fields and/or array lengths are incompatible
    #[error("Matrix dimension fields and/or array lengths are incompatible")]
    IncompatibleDimension,
    /// Factorization encountered a (numerically) zero pivot in the given column
    #[error("Matrix is singular to working precision (pivot {0})")]
    Singular(usize),
    /// Cholesky factorization found a nonpositive pivot in the given column
    #[error("Matrix is not positive definite (pivot {0})")]
    NotPositiveDefinite(usize),
    /// An iterative decomposition did not converge
    #[error("Decomposition did not converge")]
    NoConvergence,
    /// Factorization was used before `factor` was called successfully
    #[error("No factorization available")]
    NotFactored,
}
