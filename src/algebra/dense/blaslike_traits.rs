#![allow(non_snake_case)]
use crate::algebra::{DenseFactorizationError, DenseMatrix, Matrix};

/// LU factorization with partial pivoting
pub trait FactorLU {
    type T;
    /// Compute `PA = LU` for the square matrix `A`.  Fails if a pivot
    /// is numerically zero relative to the size of `A`.
    fn factor(&mut self, A: &Matrix<Self::T>) -> Result<(), DenseFactorizationError>;

    /// Solve `Ax = b` in place using the most recent factorization.
    fn solve(&self, b: &mut [Self::T]) -> Result<(), DenseFactorizationError>;
}

/// Cholesky factorization of a symmetric positive definite matrix
pub trait FactorCholesky {
    type T;
    // computes the Cholesky decomposition.  Only the lower
    // part of the input A will be referenced. The Cholesky factor
    // is stored in self.L
    fn factor(&mut self, A: &Matrix<Self::T>) -> Result<(), DenseFactorizationError>;

    // Solve Ax = b in place using the previously computed factor
    fn solve(&self, b: &mut [Self::T]) -> Result<(), DenseFactorizationError>;
}

/// Singular value decomposition `A = UΣV'`
pub trait FactorSVD {
    type T;
    /// Factor `A`, determining its numerical rank with respect to `tol`.
    /// Any shape is accepted.
    fn factor(&mut self, A: &Matrix<Self::T>, tol: Self::T) -> Result<(), DenseFactorizationError>;

    /// numerical rank determined during `factor`
    fn rank(&self) -> usize;
}

/// Symmetric eigendecomposition `A = VΛV'`
pub trait FactorEigen {
    type T;
    /// computes eigenvalues and vectors (full set).  Only the
    /// symmetric part of `A` is used.
    fn eigen(&mut self, A: &Matrix<Self::T>) -> Result<(), DenseFactorizationError>;
}

pub trait MultiplyGEMM {
    type T;
    fn mul<MATA, MATB>(&mut self, A: &MATA, B: &MATB, α: Self::T, β: Self::T) -> &Self
    where
        MATB: DenseMatrix<T = Self::T>,
        MATA: DenseMatrix<T = Self::T>;
}
