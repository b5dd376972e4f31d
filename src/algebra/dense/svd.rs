#![allow(non_snake_case)]

use crate::algebra::*;

/// Full singular value decomposition engine.
///
/// For `A` of size `m x n` the left factor `U` is always a complete
/// `m x m` orthonormal basis, so that its trailing columns span the null
/// space of `A'`.  Singular values are sorted in descending order.
#[derive(Debug, Clone)]
pub struct SVDEngine<T> {
    /// left singular vectors, `m x m`
    pub U: Matrix<T>,

    /// singular values in descending order, length `m`
    pub s: Vec<T>,

    /// right singular vectors (transposed), `m x max(m,n)`.  Only the
    /// first `n` columns belong to `A`.
    pub Vt: Matrix<T>,

    ncols: usize,
    rank: usize,
    is_factored: bool,
}

impl<T> SVDEngine<T>
where
    T: FloatT,
{
    pub fn new(size: (usize, usize)) -> Self {
        let (m, n) = size;
        Self {
            U: Matrix::identity(m),
            s: vec![T::zero(); m],
            Vt: Matrix::zeros((m, usize::max(m, n))),
            ncols: n,
            rank: 0,
            is_factored: false,
        }
    }

    /// orthonormal basis for the null space of `A'`, as an
    /// `m x (m - rank)` matrix
    pub fn nullspace(&self) -> Matrix<T> {
        let m = self.U.nrows();
        let mut Z = Matrix::zeros((m, m - self.rank));
        for (k, j) in (self.rank..m).enumerate() {
            Z.col_slice_mut(k).copy_from(self.U.col_slice(j));
        }
        Z
    }

    /// Least squares solution `y` of `Ay ≈ rhs` with the smallest norm
    pub fn solve_least_squares(&self, rhs: &[T], y: &mut [T]) -> Result<(), DenseFactorizationError> {
        if !self.is_factored {
            return Err(DenseFactorizationError::NotFactored);
        }
        if rhs.len() != self.U.nrows() || y.len() != self.ncols {
            return Err(DenseFactorizationError::IncompatibleDimension);
        }

        // y = V_r Σ_r⁻¹ U_r' rhs
        y.set(T::zero());
        for i in 0..self.rank {
            let c = self.U.col_slice(i).dot(rhs) / self.s[i];
            for (j, yj) in y.iter_mut().enumerate() {
                *yj += c * self.Vt[(i, j)];
            }
        }
        Ok(())
    }

    /// Minimum norm solution `x` of `A'x = b`, assuming it is consistent
    pub fn solve_adjoint_min_norm(&self, b: &[T], x: &mut [T]) -> Result<(), DenseFactorizationError> {
        if !self.is_factored {
            return Err(DenseFactorizationError::NotFactored);
        }
        if b.len() != self.ncols || x.len() != self.U.nrows() {
            return Err(DenseFactorizationError::IncompatibleDimension);
        }

        // x = U_r Σ_r⁻¹ V_r' b
        x.set(T::zero());
        for i in 0..self.rank {
            let c = (0..self.ncols).fold(T::zero(), |acc, j| acc + self.Vt[(i, j)] * b[j]);
            x.axpby(c / self.s[i], self.U.col_slice(i), T::one());
        }
        Ok(())
    }
}

impl<T> FactorSVD for SVDEngine<T>
where
    T: FloatT,
{
    type T = T;

    fn factor(&mut self, A: &Matrix<T>, tol: T) -> Result<(), DenseFactorizationError> {
        let (m, n) = A.size();
        let np = usize::max(m, n);
        self.is_factored = false;
        self.ncols = n;
        self.rank = 0;

        if m == 0 || n == 0 {
            self.U = Matrix::identity(m);
            self.s = vec![T::zero(); m];
            self.Vt = Matrix::zeros((m, np));
            self.is_factored = true;
            return Ok(());
        }

        // zero columns make the thin factorization a full one on the left
        let mut Apad = Matrix::zeros((m, np));
        Apad.data_mut()[0..m * n].copy_from_slice(A.data());

        let mut s = vec![T::zero(); m];
        let mut U = Matrix::<T>::zeros((m, m));
        let mut Vt = Matrix::<T>::zeros((m, np));
        if !T::xgesvd(m, np, Apad.data(), &mut s, U.data_mut(), Vt.data_mut()) {
            return Err(DenseFactorizationError::NoConvergence);
        }

        let mut order: Vec<usize> = (0..m).collect();
        order.sort_by(|&i, &j| s[j].partial_cmp(&s[i]).unwrap_or(std::cmp::Ordering::Equal));

        self.U = Matrix::zeros((m, m));
        self.Vt = Matrix::zeros((m, np));
        for (k, &i) in order.iter().enumerate() {
            self.U.col_slice_mut(k).copy_from(U.col_slice(i));
            for j in 0..np {
                self.Vt[(k, j)] = Vt[(i, j)];
            }
        }
        self.s = order.iter().map(|&i| s[i]).collect();
        self.rank = self.s.iter().filter(|&&σ| σ > tol).count();
        self.is_factored = true;
        Ok(())
    }

    fn rank(&self) -> usize {
        self.rank
    }
}
