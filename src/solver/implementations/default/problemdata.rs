#![allow(non_snake_case)]
use super::DefaultSettings;
use crate::algebra::*;
use crate::solver::core::traits::ProblemData;
use thiserror::Error;

/// Error type returned when the problem data is malformed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataValidationError {
    #[error("Incompatible dimensions in {0}")]
    /// Matrix and vector dimensions do not agree
    DimensionMismatch(&'static str),
    #[error("Q is not symmetric")]
    /// The quadratic term is asymmetric and `strict_symmetry` is set
    NotSymmetric,
    #[error("Non-finite value in {0}")]
    /// NaN or infinite value somewhere in the data
    NonFiniteData(&'static str),
}

// ---------------
// Equality preprocessing
// ---------------

/// Linearly independent subset of the equality constraints `Ax = b`.
///
/// Rows are taken in order and kept whenever they raise the numerical
/// rank of the rows kept so far.  Dependent rows are either consistent
/// with the retained ones, in which case they are dropped, or they make
/// the problem infeasible.
#[derive(Debug, Clone)]
pub struct EqualityReduction<T> {
    /// retained rows of `A`, in their original order
    pub A: Matrix<T>,
    /// retained entries of `b`
    pub b: Vec<T>,
    /// original index of each retained row
    pub rows: Vec<usize>,
    /// dependent rows that were consistent and dropped
    pub dropped: Vec<usize>,
    /// dependent rows that contradict the retained ones
    pub inconsistent: Vec<usize>,
    /// minimum norm solution of the retained rows
    pub x_min_norm: Vec<T>,
    svd: SVDEngine<T>,
}

impl<T> EqualityReduction<T>
where
    T: FloatT,
{
    pub fn new(A: &Matrix<T>, b: &[T], tol: T) -> Self {
        let (neq, n) = A.size();
        let At = A.transpose();

        let maxrownorm = (0..neq)
            .map(|i| At.col_slice(i).norm())
            .fold(T::zero(), T::max);
        let rank_tol = tol * T::max(T::one(), maxrownorm);

        let mut rows: Vec<usize> = Vec::with_capacity(neq);
        let mut dependent = vec![];
        for i in 0..neq {
            rows.push(i);
            let Asel = A.select_rows(&rows).transpose();
            let mut svd = SVDEngine::new(Asel.size());
            let independent = match svd.factor(&Asel, rank_tol) {
                Ok(()) => svd.rank() == rows.len(),
                Err(_) => false,
            };
            if !independent {
                rows.pop();
                dependent.push(i);
            }
        }

        // A_red' factored once more for the minimum norm solves
        let Ared = A.select_rows(&rows);
        let bred = b.select(&rows);
        let Aredt = Ared.transpose();
        let mut svd = SVDEngine::new(Aredt.size());
        let mut x_min_norm = vec![T::zero(); n];
        if svd.factor(&Aredt, rank_tol).is_ok() {
            // dimensions agree by construction
            let _ = svd.solve_adjoint_min_norm(&bred, &mut x_min_norm);
        }

        let (dropped, inconsistent): (Vec<usize>, Vec<usize>) =
            dependent.into_iter().partition(|&j| {
                let resid = A.row_dot(j, &x_min_norm) - b[j];
                T::abs(resid) <= tol * T::max(T::one(), T::abs(b[j]))
            });

        Self {
            A: Ared,
            b: bred,
            rows,
            dropped,
            inconsistent,
            x_min_norm,
            svd,
        }
    }

    /// number of retained rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_consistent(&self) -> bool {
        self.inconsistent.is_empty()
    }

    /// `x` plus the smallest correction that satisfies the retained rows.
    /// `Afull` and `bfull` are the unreduced equality data.
    pub fn project(&self, x: &[T], Afull: &Matrix<T>, bfull: &[T]) -> Vec<T> {
        let mut resid = bfull.to_vec();
        Afull.gemv(&mut resid, x, -T::one(), T::one());

        let mut δ = vec![T::zero(); x.len()];
        let _ = self.svd.solve_adjoint_min_norm(&resid, &mut δ);
        δ.axpby(T::one(), x, T::one());
        δ
    }

    /// largest residual of the retained rows at `x`
    pub fn residual(&self, x: &[T]) -> T {
        (0..self.len())
            .map(|i| T::abs(self.A.row_dot(i, x) - self.b[i]))
            .fold(T::zero(), T::max)
    }
}

// ---------------
// Problem data
// ---------------

/// Standard-form solver type implementing the [`ProblemData`](crate::solver::core::traits::ProblemData) trait
#[derive(Debug, Clone)]
pub struct DefaultProblemData<T> {
    /// quadratic term, stored as its symmetric part
    pub Q: Matrix<T>,
    pub p: Vec<T>,
    pub G: Matrix<T>,
    pub h: Vec<T>,
    pub A: Matrix<T>,
    pub b: Vec<T>,

    /// number of variables
    pub n: usize,
    /// number of inequality rows
    pub m: usize,
    /// number of equality rows
    pub neq: usize,

    pub equalities: EqualityReduction<T>,

    /// `Q` has a negative eigenvalue, so a nonsingular KKT matrix
    /// may still belong to a saddle point
    pub q_indefinite: bool,
}

impl<T> DefaultProblemData<T>
where
    T: FloatT,
{
    /// Validates and stores a problem.  `Q` is symmetrized unless
    /// `settings.strict_symmetry` is set, in which case an asymmetric
    /// `Q` is an error.
    pub fn new(
        Q: &Matrix<T>,
        p: &[T],
        G: &Matrix<T>,
        h: &[T],
        A: &Matrix<T>,
        b: &[T],
        settings: &DefaultSettings<T>,
    ) -> Result<Self, DataValidationError> {
        check_dimensions(Q, p, G, h, A, b)?;
        check_finite(Q, p, G, h, A, b)?;

        let sym_tol = settings.tol * T::max(T::one(), Q.norm_max());
        if settings.strict_symmetry && !Q.is_symmetric(sym_tol) {
            return Err(DataValidationError::NotSymmetric);
        }
        let mut Q = Q.clone();
        Q.symmetrize();

        Ok(Self::assemble(
            Q,
            p.to_vec(),
            G.clone(),
            h.to_vec(),
            A.clone(),
            b.to_vec(),
            settings.tol,
        ))
    }

    // data is assumed valid from here on
    fn assemble(
        Q: Matrix<T>,
        p: Vec<T>,
        G: Matrix<T>,
        h: Vec<T>,
        A: Matrix<T>,
        b: Vec<T>,
        tol: T,
    ) -> Self {
        let (n, m, neq) = (p.len(), h.len(), b.len());
        let equalities = EqualityReduction::new(&A, &b, tol);
        let q_indefinite = has_negative_curvature(&Q, tol);
        Self {
            Q,
            p,
            G,
            h,
            A,
            b,
            n,
            m,
            neq,
            equalities,
            q_indefinite,
        }
    }

    /// `max(G x - h)`, or -∞ with no inequalities
    fn max_ineq_residual(&self, x: &[T]) -> T {
        (0..self.m)
            .map(|i| self.ineq_residual(i, x))
            .fold(T::neg_infinity(), T::max)
    }
}

// a failed eigensolve leaves the inertia unknown, which is treated
// like indefiniteness so that each working set gets checked
fn has_negative_curvature<T: FloatT>(Q: &Matrix<T>, tol: T) -> bool {
    let mut eig = EigenEngine::new(Q.nrows());
    if eig.eigen(Q).is_err() {
        return true;
    }
    match eig.λ.first() {
        Some(&λmin) => λmin < -tol * T::max(T::one(), eig.λ.norm_inf()),
        None => false,
    }
}

fn check_dimensions<T: FloatT>(
    Q: &Matrix<T>,
    p: &[T],
    G: &Matrix<T>,
    h: &[T],
    A: &Matrix<T>,
    b: &[T],
) -> Result<(), DataValidationError> {
    let n = p.len();
    if Q.size() != (n, n) {
        return Err(DataValidationError::DimensionMismatch("Q"));
    }
    if G.ncols() != n || G.nrows() != h.len() {
        return Err(DataValidationError::DimensionMismatch("G"));
    }
    if A.ncols() != n || A.nrows() != b.len() {
        return Err(DataValidationError::DimensionMismatch("A"));
    }
    Ok(())
}

fn check_finite<T: FloatT>(
    Q: &Matrix<T>,
    p: &[T],
    G: &Matrix<T>,
    h: &[T],
    A: &Matrix<T>,
    b: &[T],
) -> Result<(), DataValidationError> {
    let fields: [(&'static str, &[T]); 6] = [
        ("Q", &Q.data[..]),
        ("p", p),
        ("G", &G.data[..]),
        ("h", h),
        ("A", &A.data[..]),
        ("b", b),
    ];
    for (name, v) in fields {
        if !v.is_finite() {
            return Err(DataValidationError::NonFiniteData(name));
        }
    }
    Ok(())
}

impl<T> ProblemData<T> for DefaultProblemData<T>
where
    T: FloatT,
{
    fn nvars(&self) -> usize {
        self.n
    }

    fn nineq(&self) -> usize {
        self.m
    }

    fn neq_reduced(&self) -> usize {
        self.equalities.len()
    }

    fn ineq_residual(&self, i: usize, x: &[T]) -> T {
        self.G.row_dot(i, x) - self.h[i]
    }

    fn ineq_dot(&self, i: usize, d: &[T]) -> T {
        self.G.row_dot(i, d)
    }

    fn objective(&self, x: &[T]) -> T {
        let half: T = (0.5).as_T();
        half * self.Q.quad_form(x, x) + self.p.dot(x)
    }

    fn max_violation(&self, x: &[T]) -> T {
        let ineq = self.max_ineq_residual(x);
        let eq = (0..self.neq)
            .map(|j| T::abs(self.A.row_dot(j, x) - self.b[j]))
            .fold(T::zero(), T::max);
        T::max(T::zero(), T::max(ineq, eq))
    }

    fn is_unconstrained(&self) -> bool {
        self.m == 0 && self.equalities.is_empty()
    }

    fn equalities_consistent(&self) -> bool {
        self.equalities.is_consistent()
    }

    fn initial_point(&self, guess: Option<&[T]>, tol: T) -> Vec<T> {
        match guess {
            Some(x) if x.len() == self.n => {
                if self.equalities.residual(x) <= tol {
                    x.to_vec()
                } else {
                    self.equalities.project(x)
                }
            }
            _ => self.equalities.x_min_norm.clone(),
        }
    }

    // minimize t over (x,t) subject to
    //   Gx - t ≤ h,  -t ≤ 0,  [A 0](x,t) = b
    fn phase_one(&self, x: &[T], tol: T) -> Option<(Self, Vec<T>)> {
        let viol = self.max_ineq_residual(x);
        if !(viol > tol) {
            return None;
        }

        let (n, m) = (self.n, self.m);

        let Q = Matrix::zeros((n + 1, n + 1));
        let mut p = vec![T::zero(); n + 1];
        p[n] = T::one();

        let mut G = Matrix::zeros((m + 1, n + 1));
        for j in 0..n {
            G.col_slice_mut(j)[0..m].copy_from(self.G.col_slice(j));
        }
        G.col_slice_mut(n).set(-T::one());
        let mut h = self.h.clone();
        h.push(T::zero());

        let Ared = &self.equalities.A;
        let A = Matrix::hcat(Ared, &Matrix::zeros((Ared.nrows(), 1)));
        let b = self.equalities.b.clone();

        let mut z0 = x.to_vec();
        z0.push(T::max(T::zero(), viol));

        Some((Self::assemble(Q, p, G, h, A, b, tol), z0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn box_data(A: Matrix<f64>, b: Vec<f64>) -> DefaultProblemData<f64> {
        let Q = Matrix::identity(2);
        let G = Matrix::from(&[
            [1., 0.],  //
            [0., 1.],  //
            [-1., 0.], //
            [0., -1.], //
        ]);
        let h = [1., 1., 0., 0.];
        let settings = DefaultSettings::default();
        DefaultProblemData::new(&Q, &[0., 0.], &G, &h, &A, &b, &settings).unwrap()
    }

    #[test]
    fn test_equality_reduction_redundant() {
        // second row is twice the first
        let A = Matrix::from(&[
            [1., 1.], //
            [2., 2.], //
            [1., -1.], //
        ]);
        let b = vec![1., 2., 0.];
        let data = box_data(A, b);
        let eq = &data.equalities;

        assert_eq!(eq.len(), 2);
        assert_eq!(eq.dropped.len(), 1);
        assert!(eq.is_consistent());
        assert!(eq.x_min_norm.norm_inf_diff(&[0.5, 0.5]) < 1e-12);
        assert!(data.max_violation(&eq.x_min_norm) < 1e-12);
    }

    #[test]
    fn test_equality_reduction_inconsistent() {
        let A = Matrix::from(&[
            [1., 1.], //
            [1., 1.], //
        ]);
        let data = box_data(A, vec![1., 2.]);
        assert!(!data.equalities_consistent());
        assert_eq!(data.equalities.inconsistent.len(), 1);
    }

    #[test]
    fn test_initial_point_projection() {
        let A = Matrix::from(&[[1., 1.]]);
        let data = box_data(A, vec![1.]);

        // feasible guesses are kept
        let x = data.initial_point(Some(&[1.0, 0.0]), 1e-8);
        assert_eq!(x, vec![1.0, 0.0]);

        // others are projected
        let x = data.initial_point(Some(&[1.0, 1.0]), 1e-8);
        assert!(x.norm_inf_diff(&[0.5, 0.5]) < 1e-12);

        // no guess or a bad length gives the minimum norm point
        let x = data.initial_point(None, 1e-8);
        assert!(x.norm_inf_diff(&[0.5, 0.5]) < 1e-12);
        let x = data.initial_point(Some(&[1.0]), 1e-8);
        assert!(x.norm_inf_diff(&[0.5, 0.5]) < 1e-12);
    }

    #[test]
    fn test_phase_one_data() {
        let A = Matrix::from(&[[1., 1.]]);
        let data = box_data(A, vec![5.]);

        let x0 = data.initial_point(None, 1e-8);
        let (p1, z0) = data.phase_one(&x0, 1e-8).unwrap();
        assert_eq!((p1.n, p1.m, p1.neq), (3, 5, 1));
        assert!(z0.norm_inf_diff(&[2.5, 2.5, 1.5]) < 1e-12);

        // start point is feasible for the auxiliary problem
        assert!(p1.max_violation(&z0) < 1e-12);
        assert!((p1.objective(&z0) - 1.5).abs() < 1e-12);

        // feasible points need no phase one
        let data = box_data(Matrix::from(&[[1., 1.]]), vec![1.]);
        assert!(data.phase_one(&[0.5, 0.5], 1e-8).is_none());
    }

    #[test]
    fn test_q_inertia() {
        let settings = DefaultSettings::<f64>::default();
        let G = Matrix::zeros((0, 2));
        let A = Matrix::zeros((0, 2));

        let Q = Matrix::from(&[
            [-1., 0.], //
            [0., 1.],  //
        ]);
        let data = DefaultProblemData::new(&Q, &[0., 0.], &G, &[], &A, &[], &settings).unwrap();
        assert!(data.q_indefinite);

        // singular but semidefinite
        let Q = Matrix::from(&[
            [1., 1.], //
            [1., 1.], //
        ]);
        let data = DefaultProblemData::new(&Q, &[0., 0.], &G, &[], &A, &[], &settings).unwrap();
        assert!(!data.q_indefinite);
    }

    #[test]
    fn test_data_validation() {
        let settings = DefaultSettings::<f64>::default();
        let Q = Matrix::from(&[
            [1., 2.], //
            [0., 1.], //
        ]);
        let G = Matrix::zeros((0, 2));
        let A = Matrix::zeros((0, 2));

        // symmetrized by default
        let data = DefaultProblemData::new(&Q, &[0., 0.], &G, &[], &A, &[], &settings).unwrap();
        assert_eq!(data.Q, Matrix::from(&[[1., 1.], [1., 1.]]));
        assert!(data.is_unconstrained());

        let strict = DefaultSettings {
            strict_symmetry: true,
            ..settings.clone()
        };
        assert_eq!(
            DefaultProblemData::new(&Q, &[0., 0.], &G, &[], &A, &[], &strict).unwrap_err(),
            DataValidationError::NotSymmetric
        );

        assert_eq!(
            DefaultProblemData::new(&Q, &[0.], &G, &[], &A, &[], &settings).unwrap_err(),
            DataValidationError::DimensionMismatch("Q")
        );
        assert_eq!(
            DefaultProblemData::new(&Q, &[0., 0.], &G, &[1.], &A, &[], &settings).unwrap_err(),
            DataValidationError::DimensionMismatch("G")
        );
        assert_eq!(
            DefaultProblemData::new(&Q, &[0., f64::NAN], &G, &[], &A, &[], &settings)
                .unwrap_err(),
            DataValidationError::NonFiniteData("p")
        );
    }
}
