#![allow(non_snake_case)]

use crate::algebra::{
    AsFloatT, DenseFactorizationError, DenseFloatT, DenseMatrix, FactorCholesky, FloatT, Matrix,
    MatrixMath, ShapedMatrix,
};

pub struct CholeskyEngine<T> {
    /// lower triangular factor (stored as square dense)
    pub L: Matrix<T>,
    is_factored: bool,
}

impl<T> CholeskyEngine<T>
where
    T: FloatT,
{
    pub fn new(n: usize) -> Self {
        let L = Matrix::<T>::zeros((n, n));
        Self {
            L,
            is_factored: false,
        }
    }
}

impl<T> FactorCholesky for CholeskyEngine<T>
where
    T: FloatT,
{
    type T = T;
    fn factor(&mut self, A: &Matrix<Self::T>) -> Result<(), DenseFactorizationError> {
        if !A.is_square() {
            return Err(DenseFactorizationError::IncompatibleDimension);
        }
        let n = A.nrows();
        self.is_factored = false;
        self.L = A.clone();

        // nonpositive pivots are left as zeros on the diagonal of L,
        // and pivots this small relative to A count as zero
        let tol = T::epsilon() * usize::max(n, 1).as_T() * A.norm_max();
        if !T::xpotrf(n, self.L.data_mut(), T::zero()) {
            return Err(DenseFactorizationError::NotPositiveDefinite(0));
        }

        let L = &self.L;
        if let Some(j) = (0..n).find(|&j| !(L[(j, j)] * L[(j, j)] > tol)) {
            return Err(DenseFactorizationError::NotPositiveDefinite(j));
        }

        self.is_factored = true;
        Ok(())
    }

    fn solve(&self, b: &mut [T]) -> Result<(), DenseFactorizationError> {
        if !self.is_factored {
            return Err(DenseFactorizationError::NotFactored);
        }
        let n = self.L.nrows();
        if b.len() != n {
            return Err(DenseFactorizationError::IncompatibleDimension);
        }
        T::xpotrs(n, self.L.data(), b);
        Ok(())
    }
}

#[test]
fn test_cholesky() {
    use crate::algebra::{MultiplyGEMM, VectorMath};

    #[rustfmt::skip]
    let S = Matrix::from(
        &[[ 8., -2., 4.],
          [-2., 12., 2.],
          [ 4.,  2., 6.]]);

    let mut eng = CholeskyEngine::<f64>::new(3);
    assert!(eng.factor(&S).is_ok());

    let mut M = Matrix::<f64>::zeros((3, 3));
    M.mul(&eng.L, &eng.L.t(), 1.0, 0.0);

    assert!(M.data().norm_inf_diff(S.data()) < 1e-8);

    // S*[1,1,1] = [10,12,12]
    let mut b = vec![10., 12., 12.];
    eng.solve(&mut b).unwrap();
    assert!(b.norm_inf_diff(&[1., 1., 1.]) < 1e-10);
}

#[test]
fn test_cholesky_semidefinite() {
    let S = Matrix::from(&[
        [1., 0.], //
        [0., 0.], //
    ]);
    let mut eng = CholeskyEngine::<f64>::new(2);
    assert_eq!(
        eng.factor(&S),
        Err(DenseFactorizationError::NotPositiveDefinite(1))
    );
}
