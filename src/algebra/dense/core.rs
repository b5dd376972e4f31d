#![allow(non_snake_case)]

use crate::algebra::{
    Adjoint, AsFloatT, DenseMatrix, FloatT, Matrix, MatrixShape, ShapedMatrix, VectorMath,
};
use std::ops::{Index, IndexMut};

impl<T> DenseMatrix for Matrix<T>
where
    T: FloatT,
{
    type T = T;
    fn index_linear(&self, idx: (usize, usize)) -> usize {
        idx.0 + self.m * idx.1
    }
    fn data(&self) -> &[T] {
        &self.data
    }
}

impl<'a, T> DenseMatrix for Adjoint<'a, Matrix<T>>
where
    T: FloatT,
{
    type T = T;
    #[inline]
    fn index_linear(&self, idx: (usize, usize)) -> usize {
        self.src.index_linear((idx.1, idx.0))
    }
    fn data(&self) -> &[T] {
        &self.src.data
    }
}

impl<T> Matrix<T>
where
    T: FloatT,
{
    /// Create a new matrix from column major data
    ///
    /// # Panics
    /// Panics if `data` does not have `m*n` entries
    pub fn new(size: (usize, usize), data: Vec<T>) -> Self {
        let (m, n) = size;
        assert_eq!(m * n, data.len());
        Self { m, n, data }
    }

    pub fn zeros(size: (usize, usize)) -> Self {
        let (m, n) = size;
        let data = vec![T::zero(); m * n];
        Self { m, n, data }
    }

    pub fn identity(n: usize) -> Self {
        let mut mat = Matrix::zeros((n, n));
        mat.set_identity();
        mat
    }

    pub fn set_identity(&mut self) {
        assert!(self.m == self.n);
        self.data_mut().set(T::zero());
        for i in 0..self.n {
            self[(i, i)] = T::one();
        }
    }

    pub fn new_from_slice(size: (usize, usize), src: &[T]) -> Self {
        Self::new(size, src.to_vec())
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Read-only transposed view
    pub fn t(&self) -> Adjoint<'_, Self> {
        Adjoint { src: self }
    }

    /// Owned transpose
    pub fn transpose(&self) -> Self {
        let mut out = Self::zeros((self.n, self.m));
        for j in 0..self.n {
            for i in 0..self.m {
                out[(j, i)] = self[(i, j)];
            }
        }
        out
    }

    pub fn col_slice(&self, col: usize) -> &[T] {
        assert!(col < self.n);
        &self.data[(col * self.m)..(col + 1) * self.m]
    }

    pub fn col_slice_mut(&mut self, col: usize) -> &mut [T] {
        assert!(col < self.n);
        &mut self.data[(col * self.m)..(col + 1) * self.m]
    }

    /// New matrix made from the listed rows, in the order given
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        let mut out = Self::zeros((rows.len(), self.n));
        for j in 0..self.n {
            for (k, &i) in rows.iter().enumerate() {
                out[(k, j)] = self[(i, j)];
            }
        }
        out
    }

    /// New matrix made from the columns `first..self.n`
    pub fn trailing_cols(&self, first: usize) -> Self {
        assert!(first <= self.n);
        let data = self.data[(first * self.m)..].to_vec();
        Self::new((self.m, self.n - first), data)
    }

    /// True if the matrix is square and `|A[i,j] - A[j,i]| <= tol` everywhere
    pub fn is_symmetric(&self, tol: T) -> bool {
        if !self.is_square() {
            return false;
        }
        for j in 0..self.n {
            for i in (j + 1)..self.m {
                if T::abs(self[(i, j)] - self[(j, i)]) > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Replace the matrix by its symmetric part `(A + A')/2`
    pub fn symmetrize(&mut self) {
        assert!(self.is_square());
        let half: T = (0.5).as_T();
        for j in 0..self.n {
            for i in (j + 1)..self.m {
                let v = (self[(i, j)] + self[(j, i)]) * half;
                self[(i, j)] = v;
                self[(j, i)] = v;
            }
        }
    }
}

/// Construct from an array of rows
impl<T, const M: usize, const N: usize> From<&[[T; N]; M]> for Matrix<T>
where
    T: FloatT,
{
    fn from(rows: &[[T; N]; M]) -> Self {
        let mut out = Self::zeros((M, N));
        for (i, row) in rows.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                out[(i, j)] = v;
            }
        }
        out
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T>
where
    T: FloatT,
{
    fn index_mut(&mut self, idx: (usize, usize)) -> &mut Self::Output {
        let lidx = self.index_linear(idx);
        &mut self.data[lidx]
    }
}

impl<T> Index<(usize, usize)> for Matrix<T>
where
    T: FloatT,
{
    type Output = T;
    fn index(&self, idx: (usize, usize)) -> &Self::Output {
        &self.data()[self.index_linear(idx)]
    }
}

impl<T> Index<(usize, usize)> for Adjoint<'_, Matrix<T>>
where
    T: FloatT,
{
    type Output = T;
    fn index(&self, idx: (usize, usize)) -> &Self::Output {
        &self.data()[self.index_linear(idx)]
    }
}

impl<T> ShapedMatrix for Matrix<T>
where
    T: FloatT,
{
    fn nrows(&self) -> usize {
        self.m
    }
    fn ncols(&self) -> usize {
        self.n
    }
    fn shape(&self) -> MatrixShape {
        MatrixShape::N
    }
}

impl<T> ShapedMatrix for Adjoint<'_, Matrix<T>>
where
    T: FloatT,
{
    fn nrows(&self) -> usize {
        self.src.n
    }
    fn ncols(&self) -> usize {
        self.src.m
    }
    fn shape(&self) -> MatrixShape {
        MatrixShape::T
    }
}

impl<T> std::fmt::Display for Matrix<T>
where
    T: FloatT,
{
    // This trait requires `fmt` with this exact signature.
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f)?;
        for i in 0..self.nrows() {
            write!(f, "[ ")?;
            for j in 0..self.ncols() {
                write!(f, " {:?}", self[(i, j)])?;
            }
            writeln!(f, "]")?;
        }
        writeln!(f)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_indexing_matrix() -> Matrix<f64> {
        // [ 1.0  4.0  7.0 ]
        // [ 2.0  5.0  8.0 ]
        // [ 3.0  6.0  9.0 ]
        Matrix::from(&[[1.0, 4.0, 7.0], [2.0, 5.0, 8.0], [3.0, 6.0, 9.0]])
    }

    #[test]
    fn test_matrix_indexing() {
        let A = create_indexing_matrix();
        assert_eq!(A.data, vec![1., 2., 3., 4., 5., 6., 7., 8., 9.]);
        assert_eq!(A[(2, 1)], 6.0);
        assert_eq!(A.index_linear((1, 2)), 7);
    }

    #[test]
    fn test_adjoint_indexing() {
        let A = create_indexing_matrix();
        let At = A.t();
        assert_eq!(At.size(), (3, 3));
        assert_eq!(At[(0, 1)], 2.0);
        assert_eq!(At[(2, 0)], 7.0);
        assert_eq!(A.transpose()[(0, 2)], At[(0, 2)]);
    }

    #[test]
    fn test_row_and_col_selection() {
        let A = create_indexing_matrix();
        let B = A.select_rows(&[2, 0]);
        assert_eq!(B, Matrix::from(&[[3.0, 6.0, 9.0], [1.0, 4.0, 7.0]]));

        let C = A.trailing_cols(1);
        assert_eq!(C, Matrix::from(&[[4.0, 7.0], [5.0, 8.0], [6.0, 9.0]]));

        let D = A.trailing_cols(3);
        assert_eq!(D.size(), (3, 0));
    }

    #[test]
    fn test_symmetrize() {
        let mut A = create_indexing_matrix();
        assert!(!A.is_symmetric(1e-12));
        A.symmetrize();
        assert!(A.is_symmetric(0.0));
        assert_eq!(A[(0, 2)], 5.0);
        assert_eq!(A[(2, 0)], 5.0);
    }
}
