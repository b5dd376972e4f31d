#![allow(non_snake_case)]
use crate::algebra::*;

/// Dense LU solver with partial (row) pivoting.
///
/// Factors are stored in place in `LU`, with the unit lower triangle
/// below the diagonal and `U` on and above it.
pub struct LUEngine<T> {
    pub LU: Matrix<T>,
    perm: Vec<usize>,
    is_factored: bool,
}

impl<T> LUEngine<T>
where
    T: FloatT,
{
    pub fn new(n: usize) -> Self {
        let LU = Matrix::<T>::zeros((n, n));
        let perm = (0..n).collect();
        Self {
            LU,
            perm,
            is_factored: false,
        }
    }

    // pivots at or below this size are treated as zero
    fn pivot_tolerance(A: &Matrix<T>) -> T {
        let n: T = usize::max(A.nrows(), 1).as_T();
        T::epsilon() * n * (100.).as_T() * A.norm_max()
    }
}

impl<T> FactorLU for LUEngine<T>
where
    T: FloatT,
{
    type T = T;
    fn factor(&mut self, A: &Matrix<T>) -> Result<(), DenseFactorizationError> {
        if !A.is_square() {
            return Err(DenseFactorizationError::IncompatibleDimension);
        }

        let n = A.nrows();
        self.is_factored = false;
        self.LU = A.clone();
        self.perm.resize(n, 0);

        T::xgetrf(n, self.LU.data_mut(), &mut self.perm);

        let tol = Self::pivot_tolerance(A);
        if let Some(k) = (0..n).find(|&k| !(T::abs(self.LU[(k, k)]) > tol)) {
            return Err(DenseFactorizationError::Singular(k));
        }

        self.is_factored = true;
        Ok(())
    }

    fn solve(&self, b: &mut [T]) -> Result<(), DenseFactorizationError> {
        if !self.is_factored {
            return Err(DenseFactorizationError::NotFactored);
        }
        let n = self.LU.nrows();
        if b.len() != n {
            return Err(DenseFactorizationError::IncompatibleDimension);
        }
        T::xgetrs(n, self.LU.data(), &self.perm, b);
        Ok(())
    }
}

macro_rules! generate_test_lu {
    ($fxx:ty, $test_name:ident) => {
        #[test]
        fn $test_name() {
            let A = Matrix::<$fxx>::from(&[
                [3., 2., 4.], //
                [2., 0., 2.], //
                [4., 2., 3.], //
            ]);

            let mut b = vec![-5., -2., -2.];
            let x = vec![1., 0., -2.];

            let mut lu = LUEngine::<$fxx>::new(3);
            lu.factor(&A).unwrap();
            lu.solve(&mut b).unwrap();
            assert!(b.norm_inf_diff(&x) < (1e-5 as $fxx));
        }
    };
}

generate_test_lu!(f32, test_lu_f32);
generate_test_lu!(f64, test_lu_f64);

#[test]
fn test_lu_singular() {
    // KKT matrix of an LP with no active constraints
    let A = Matrix::<f64>::from(&[
        [0., 0., 1.], //
        [0., 0., 1.], //
        [1., 1., 0.], //
    ]);
    let mut lu = LUEngine::<f64>::new(3);
    assert!(matches!(
        lu.factor(&A),
        Err(DenseFactorizationError::Singular(_))
    ));

    let mut b = vec![1., 1., 1.];
    assert_eq!(lu.solve(&mut b), Err(DenseFactorizationError::NotFactored));

    let A = Matrix::<f64>::zeros((2, 3));
    assert_eq!(
        lu.factor(&A),
        Err(DenseFactorizationError::IncompatibleDimension)
    );
}

#[test]
fn test_lu_empty() {
    let A = Matrix::<f64>::zeros((0, 0));
    let mut lu = LUEngine::<f64>::new(0);
    lu.factor(&A).unwrap();
    let mut b: Vec<f64> = vec![];
    lu.solve(&mut b).unwrap();
}
