#![allow(non_snake_case)]

use crate::algebra::*;

impl<T: FloatT> MatrixVectorMultiply for Matrix<T> {
    type T = T;

    // implements y = αA*x + βy
    fn gemv(&self, y: &mut [T], x: &[T], α: T, β: T) {
        assert!(self.n == x.len() && self.m == y.len());
        T::xgemv(false, self.m, self.n, α, &self.data, x, β, y);
    }
}

impl<T: FloatT> MatrixVectorMultiply for Adjoint<'_, Matrix<T>> {
    type T = T;

    // implements y = αA'*x + βy
    fn gemv(&self, y: &mut [T], x: &[T], α: T, β: T) {
        let A = self.src;
        assert!(A.m == x.len() && A.n == y.len());
        T::xgemv(true, A.m, A.n, α, &A.data, x, β, y);
    }
}

impl<T: FloatT> MatrixMath for Matrix<T> {
    type T = T;

    fn scale(&mut self, c: T) {
        self.data.scale(c);
    }

    fn negate(&mut self) {
        self.data.negate();
    }

    fn quad_form(&self, y: &[T], x: &[T]) -> T {
        assert!(self.m == y.len() && self.n == x.len());
        let mut Mx = vec![T::zero(); self.m];
        self.gemv(&mut Mx, x, T::one(), T::zero());
        y.dot(&Mx)
    }

    fn norm_max(&self) -> T {
        self.data.norm_inf()
    }

    fn row_dot(&self, row: usize, x: &[T]) -> T {
        assert!(row < self.m && self.n == x.len());
        let mut out = T::zero();
        for (col, &xj) in x.iter().enumerate() {
            out += self[(row, col)] * xj;
        }
        out
    }
}

impl<T: FloatT> MultiplyGEMM for Matrix<T> {
    type T = T;

    // implements self = αA*B + βself, for A and B in
    // either normal or transposed orientation
    fn mul<MATA, MATB>(&mut self, A: &MATA, B: &MATB, α: T, β: T) -> &Self
    where
        MATA: DenseMatrix<T = T>,
        MATB: DenseMatrix<T = T>,
    {
        assert!(A.ncols() == B.nrows() && self.nrows() == A.nrows() && self.ncols() == B.ncols());

        let (m, n) = self.size();
        let k = A.ncols();
        let transa = A.shape() == MatrixShape::T;
        let transb = B.shape() == MatrixShape::T;

        T::xgemm(
            transa,
            transb,
            m,
            n,
            k,
            α,
            A.data(),
            B.data(),
            β,
            self.data_mut(),
        );
        self
    }
}

#[test]
fn test_gemv() {
    let (m, n) = (2, 3);
    let a = vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0];
    let A = Matrix::new_from_slice((m, n), &a);

    let x = vec![1., 2., 3.];
    let mut y = vec![-1., -2.];
    A.gemv(&mut y, &x, 2.0, 3.0);
    assert!(y == [25.0, 58.0]);

    let x = vec![1., 2.];
    let mut y = vec![-1., -2., -3.];
    A.t().gemv(&mut y, &x, 2.0, 3.0);
    assert!(y == [15.0, 18.0, 21.0]);
}

#[test]
fn test_gemm() {
    let A = Matrix::from(&[
        [1., 2.], //
        [3., 4.], //
        [5., 6.], //
    ]);
    let B = Matrix::from(&[
        [1., 0., 2.], //
        [0., 1., -1.], //
    ]);

    let mut C = Matrix::<f64>::zeros((3, 3));
    C.mul(&A, &B, 1.0, 0.0);
    assert_eq!(
        C,
        Matrix::from(&[
            [1., 2., 0.], //
            [3., 4., 2.], //
            [5., 6., 4.], //
        ])
    );

    // A'A
    let mut D = Matrix::<f64>::zeros((2, 2));
    D.mul(&A.t(), &A, 1.0, 0.0);
    assert_eq!(D, Matrix::from(&[[35., 44.], [44., 56.]]));
}

#[test]
fn test_quad_form_and_rows() {
    let Q = Matrix::from(&[
        [2., 1.], //
        [1., 4.], //
    ]);
    let x = [1., -1.];
    assert_eq!(Q.quad_form(&x, &x), 4.);
    assert_eq!(Q.row_dot(1, &x), -3.);
    assert_eq!(Q.norm_max(), 4.);
}
