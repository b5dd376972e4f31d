#![allow(non_snake_case)]

use crate::algebra::*;

/// Symmetric eigensolver.
///
/// Eigenvalues are returned in ascending order in `λ`, with the
/// corresponding orthonormal eigenvectors as the columns of `V`.
pub struct EigenEngine<T> {
    /// Computed eigenvalues in ascending order
    pub λ: Vec<T>,

    /// Computed eigenvectors
    pub V: Matrix<T>,
}

impl<T> EigenEngine<T>
where
    T: FloatT,
{
    pub fn new(n: usize) -> Self {
        let λ = vec![T::zero(); n];
        let V = Matrix::<T>::zeros((n, n));
        Self { λ, V }
    }
}

impl<T> FactorEigen for EigenEngine<T>
where
    T: FloatT,
{
    type T = T;
    fn eigen(&mut self, A: &Matrix<T>) -> Result<(), DenseFactorizationError> {
        if !A.is_square() {
            return Err(DenseFactorizationError::IncompatibleDimension);
        }
        let n = A.nrows();

        let mut W = A.clone();
        W.symmetrize();

        let mut w = vec![T::zero(); n];
        let mut Z = Matrix::<T>::zeros((n, n));
        if n > 0 && !T::xsyev(n, W.data(), &mut w, Z.data_mut()) {
            return Err(DenseFactorizationError::NoConvergence);
        }

        // sort ascending, carrying the eigenvectors along
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&i, &j| w[i].partial_cmp(&w[j]).unwrap_or(std::cmp::Ordering::Equal));

        self.λ = order.iter().map(|&i| w[i]).collect();
        self.V = Matrix::zeros((n, n));
        for (k, &i) in order.iter().enumerate() {
            self.V.col_slice_mut(k).copy_from(Z.col_slice(i));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eigen() {
        #[rustfmt::skip]
        let S = Matrix::from(
            &[[3., 2., 4.],
              [2., 0., 2.],
              [4., 2., 3.]]);

        let mut eng = EigenEngine::<f64>::new(3);
        eng.eigen(&S).unwrap();

        let λ = &eng.λ;
        assert!(λ.norm_inf_diff(&[-1., -1., 8.]) < 1e-10);

        // S = VΛV'
        let V = &eng.V;
        let mut VΛ = V.clone();
        for (j, &λj) in λ.iter().enumerate() {
            VΛ.col_slice_mut(j).scale(λj);
        }
        let mut M = Matrix::<f64>::zeros((3, 3));
        M.mul(&VΛ, &V.t(), 1.0, 0.0);
        assert!(M.data().norm_inf_diff(S.data()) < 1e-10);

        // V'V = I
        let mut I = Matrix::<f64>::zeros((3, 3));
        I.mul(&V.t(), V, 1.0, 0.0);
        assert!(I.data().norm_inf_diff(Matrix::<f64>::identity(3).data()) < 1e-10);
    }

    #[test]
    fn test_eigen_singular() {
        // rank one, eigenvalues 0 and 2
        let S = Matrix::from(&[
            [1., 1.], //
            [1., 1.], //
        ]);
        let mut eng = EigenEngine::<f64>::new(2);
        eng.eigen(&S).unwrap();
        assert!(eng.λ.norm_inf_diff(&[0., 2.]) < 1e-12);

        let v = eng.V.col_slice(0);
        assert!((v[0] + v[1]).abs() < 1e-12);
    }

    #[test]
    fn test_eigen_diagonal() {
        let S = Matrix::from(&[
            [2., 0.], //
            [0., -1.], //
        ]);
        let mut eng = EigenEngine::<f64>::new(2);
        eng.eigen(&S).unwrap();
        assert!(eng.λ.norm_inf_diff(&[-1., 2.]) < 1e-14);

        // eigenvectors are determined up to sign
        let v = eng.V.col_slice(0);
        assert!(v[0].abs() < 1e-14 && (v[1].abs() - 1.).abs() < 1e-14);
    }

    #[test]
    fn test_eigen_empty() {
        let S = Matrix::<f64>::zeros((0, 0));
        let mut eng = EigenEngine::<f64>::new(0);
        eng.eigen(&S).unwrap();
        assert!(eng.λ.is_empty());
    }
}
