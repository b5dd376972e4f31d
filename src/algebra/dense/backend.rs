#![allow(non_snake_case)]

// Dense kernels for f32/f64, computed by nalgebra on column major
// slices.  The engines in this module only see slices and our own
// `Matrix` type.

use nalgebra::linalg::{Cholesky, SymmetricEigen, LU, SVD};
use nalgebra::{DMatrix, DVector};

/// Floating point types with dense factorization support.
///
/// Sealed, with implementations for f32 and f64 only.
pub trait DenseFloatT: private::DenseFloatSealed + Sized {
    /// LU factorization with partial pivoting of the `n x n` matrix `a`.
    /// On exit `a` holds `U` on and above the diagonal and the unit lower
    /// factor below it.  Row `i` of `PA` is row `perm[i]` of `A`.
    fn xgetrf(n: usize, a: &mut [Self], perm: &mut [usize]);

    /// Solves `Ax = b` in place from the output of `xgetrf`
    fn xgetrs(n: usize, a: &[Self], perm: &[usize], b: &mut [Self]);

    /// Lower Cholesky factor of the `n x n` matrix `a`, written over `a`.
    /// Nonpositive pivots are replaced with `substitute`.
    fn xpotrf(n: usize, a: &mut [Self], substitute: Self) -> bool;

    /// Solves `LL'x = b` in place for the factor from `xpotrf`
    fn xpotrs(n: usize, l: &[Self], b: &mut [Self]);

    /// Symmetric eigendecomposition, unsorted.  Eigenvalues go to `w` and
    /// eigenvectors to the columns of `z`.  Returns false if the iteration
    /// did not converge.
    fn xsyev(n: usize, a: &[Self], w: &mut [Self], z: &mut [Self]) -> bool;

    /// Thin SVD of the `m x n` matrix `a`, unsorted.  With `k = min(m,n)`,
    /// `u` is `m x k`, `s` has length `k` and `vt` is `k x n`.
    fn xgesvd(
        m: usize,
        n: usize,
        a: &[Self],
        s: &mut [Self],
        u: &mut [Self],
        vt: &mut [Self],
    ) -> bool;

    /// `y = α op(A) x + β y` with `A` of size `m x n`
    #[allow(clippy::too_many_arguments)]
    fn xgemv(
        trans: bool,
        m: usize,
        n: usize,
        α: Self,
        a: &[Self],
        x: &[Self],
        β: Self,
        y: &mut [Self],
    );

    /// `C = α op(A) op(B) + β C` with `C` of size `m x n` and inner
    /// dimension `k`.  `a` and `b` are stored untransposed.
    #[allow(clippy::too_many_arguments)]
    fn xgemm(
        transa: bool,
        transb: bool,
        m: usize,
        n: usize,
        k: usize,
        α: Self,
        a: &[Self],
        b: &[Self],
        β: Self,
        c: &mut [Self],
    );
}

mod private {
    pub trait DenseFloatSealed {}
    impl DenseFloatSealed for f32 {}
    impl DenseFloatSealed for f64 {}
}

// iterative decompositions give up after this many sweeps per row
const ITERATIONS_PER_DIM: usize = 1000;

macro_rules! impl_dense_float {
    ($T:ty) => {
        impl DenseFloatT for $T {
            fn xgetrf(n: usize, a: &mut [Self], perm: &mut [usize]) {
                let lu = LU::new(DMatrix::from_column_slice(n, n, a));

                // push the row indices through the same permutation
                let mut order = DVector::<$T>::from_fn(n, |i, _| i as $T);
                lu.p().permute_rows(&mut order);
                for (p, &o) in perm.iter_mut().zip(order.iter()) {
                    *p = o as usize;
                }

                let (_, L, U) = lu.unpack();
                for j in 0..n {
                    for i in 0..n {
                        a[i + j * n] = if i > j { L[(i, j)] } else { U[(i, j)] };
                    }
                }
            }

            fn xgetrs(n: usize, a: &[Self], perm: &[usize], b: &mut [Self]) {
                let U = DMatrix::from_column_slice(n, n, a);
                let mut L = U.clone();
                L.fill_diagonal(1.0);

                let mut x = DVector::from_iterator(n, perm.iter().map(|&i| b[i]));
                L.solve_lower_triangular_mut(&mut x);
                U.solve_upper_triangular_mut(&mut x);
                b.copy_from_slice(x.as_slice());
            }

            fn xpotrf(n: usize, a: &mut [Self], substitute: Self) -> bool {
                let A = DMatrix::from_column_slice(n, n, a);
                match Cholesky::new_with_substitute(A, substitute) {
                    Some(chol) => {
                        a.copy_from_slice(chol.unpack().as_slice());
                        true
                    }
                    None => false,
                }
            }

            fn xpotrs(n: usize, l: &[Self], b: &mut [Self]) {
                let L = DMatrix::from_column_slice(n, n, l);
                let mut x = DVector::from_column_slice(b);
                L.solve_lower_triangular_mut(&mut x);
                L.transpose().solve_upper_triangular_mut(&mut x);
                b.copy_from_slice(x.as_slice());
            }

            fn xsyev(n: usize, a: &[Self], w: &mut [Self], z: &mut [Self]) -> bool {
                let A = DMatrix::from_column_slice(n, n, a);
                let maxiter = ITERATIONS_PER_DIM * usize::max(n, 1);
                match SymmetricEigen::try_new(A, <$T>::EPSILON, maxiter) {
                    Some(eig) => {
                        w.copy_from_slice(eig.eigenvalues.as_slice());
                        z.copy_from_slice(eig.eigenvectors.as_slice());
                        true
                    }
                    None => false,
                }
            }

            fn xgesvd(
                m: usize,
                n: usize,
                a: &[Self],
                s: &mut [Self],
                u: &mut [Self],
                vt: &mut [Self],
            ) -> bool {
                let A = DMatrix::from_column_slice(m, n, a);
                let maxiter = ITERATIONS_PER_DIM * usize::max(m, n).max(1);
                let svd = match SVD::try_new(A, true, true, <$T>::EPSILON, maxiter) {
                    Some(svd) => svd,
                    None => return false,
                };
                match (svd.u, svd.v_t) {
                    (Some(U), Some(Vt)) => {
                        s.copy_from_slice(svd.singular_values.as_slice());
                        u.copy_from_slice(U.as_slice());
                        vt.copy_from_slice(Vt.as_slice());
                        true
                    }
                    _ => false,
                }
            }

            fn xgemv(
                trans: bool,
                m: usize,
                n: usize,
                α: Self,
                a: &[Self],
                x: &[Self],
                β: Self,
                y: &mut [Self],
            ) {
                let A = DMatrix::from_column_slice(m, n, a);
                let x = DVector::from_column_slice(x);
                let mut yv = DVector::from_column_slice(y);
                if trans {
                    yv.gemv_tr(α, &A, &x, β);
                } else {
                    yv.gemv(α, &A, &x, β);
                }
                y.copy_from_slice(yv.as_slice());
            }

            fn xgemm(
                transa: bool,
                transb: bool,
                m: usize,
                n: usize,
                k: usize,
                α: Self,
                a: &[Self],
                b: &[Self],
                β: Self,
                c: &mut [Self],
            ) {
                let A = if transa {
                    DMatrix::from_column_slice(k, m, a).transpose()
                } else {
                    DMatrix::from_column_slice(m, k, a)
                };
                let B = if transb {
                    DMatrix::from_column_slice(n, k, b).transpose()
                } else {
                    DMatrix::from_column_slice(k, n, b)
                };
                let mut C = DMatrix::from_column_slice(m, n, c);
                C.gemm(α, &A, &B, β);
                c.copy_from_slice(C.as_slice());
            }
        }
    };
}

impl_dense_float!(f32);
impl_dense_float!(f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xgetrf_permutation() {
        // the largest entry of column 0 is in row 2
        let mut a = vec![1., 2., 4., 3., 1., 1., 2., 5., 1.];
        let mut perm = vec![0; 3];
        f64::xgetrf(3, &mut a, &mut perm);
        assert_eq!(perm[0], 2);

        let mut sorted = perm.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2]);
    }

    #[test]
    fn test_xgemm_transposes() {
        // A = [1 2; 3 4] in column major order
        let a = [1., 3., 2., 4.];
        let mut c = [0.; 4];

        // A'A = [10 14; 14 20]
        f64::xgemm(true, false, 2, 2, 2, 1.0, &a, &a, 0.0, &mut c);
        assert_eq!(c, [10., 14., 14., 20.]);

        // AA' = [5 11; 11 25]
        f64::xgemm(false, true, 2, 2, 2, 1.0, &a, &a, 0.0, &mut c);
        assert_eq!(c, [5., 11., 11., 25.]);
    }
}
