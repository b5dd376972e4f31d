#![allow(non_snake_case)]
use super::*;
use crate::solver::core::{
    traits::{EqpStep, KKTSystem, Settings},
    workingset::WorkingSet,
};

use crate::algebra::*;

/// Standard-form solver type implementing the [`KKTSystem`](crate::solver::core::traits::KKTSystem) trait
///
/// Each working set problem is solved through the full KKT system
///
/// ```text
/// [Q  C'] [x] = [-p]
/// [C  0 ] [μ]   [ d]
/// ```
///
/// where `C` stacks the reduced equality rows and the active inequality
/// rows.  If the KKT matrix is singular the step falls back to a null
/// space method, which also detects directions of unbounded descent.
pub struct DefaultKKTSystem<T> {
    lu: LUEngine<T>,
    cholesky: CholeskyEngine<T>,
    svd: SVDEngine<T>,
    eigen: EigenEngine<T>,

    /// number of steps that needed the null space fallback
    pub nullspace_steps: u32,
}

impl<T> DefaultKKTSystem<T>
where
    T: FloatT,
{
    pub fn new(data: &DefaultProblemData<T>) -> Self {
        let n = data.n;
        let neq = data.equalities.len();
        Self {
            lu: LUEngine::new(n + neq),
            cholesky: CholeskyEngine::new(n),
            svd: SVDEngine::new((n, neq)),
            eigen: EigenEngine::new(n),
            nullspace_steps: 0,
        }
    }

    // rows of C and the matching right hand side d
    fn constraint_system(
        data: &DefaultProblemData<T>,
        workingset: &WorkingSet,
    ) -> (Matrix<T>, Vec<T>) {
        let eq = &data.equalities;
        let Gw = data.G.select_rows(workingset.as_slice());
        let C = Matrix::vcat(&eq.A, &Gw);

        let mut d = eq.b.clone();
        d.extend(data.h.select(workingset.as_slice()));
        (C, d)
    }

    // Orthonormal basis Z of null(C) and the reduced Hessian Z'QZ
    fn reduced_hessian(
        &mut self,
        data: &DefaultProblemData<T>,
        C: &Matrix<T>,
        tol: T,
    ) -> Result<(Matrix<T>, Matrix<T>), DenseFactorizationError> {
        let n = data.n;
        let Ct = C.transpose();
        self.svd.factor(&Ct, tol * T::max(T::one(), Ct.norm_max()))?;
        let Z = self.svd.nullspace();
        let nz = Z.ncols();

        let mut QZ = Matrix::zeros((n, nz));
        QZ.mul(&data.Q, &Z, T::one(), T::zero());
        let mut H = Matrix::zeros((nz, nz));
        H.mul(&Z.t(), &QZ, T::one(), T::zero());
        Ok((Z, H))
    }

    // Descent ray along the eigenvector of the most negative eigenvalue
    // of the reduced Hessian, if that eigenvalue is below -curv_tol.
    // The eigenvalues of H must already be in self.eigen.
    fn negative_curvature_ray(&self, Z: &Matrix<T>, g: &[T], curv_tol: T) -> Option<Vec<T>> {
        let λ = &self.eigen.λ;
        match λ.first() {
            Some(&λmin) if λmin < -curv_tol => {
                let mut d = vec![T::zero(); Z.nrows()];
                Z.gemv(&mut d, self.eigen.V.col_slice(0), T::one(), T::zero());
                if d.dot(g) > T::zero() {
                    d.negate();
                }
                d.normalize();
                Some(d)
            }
            _ => None,
        }
    }

    // gradient Qx + p
    fn gradient(data: &DefaultProblemData<T>, x: &[T]) -> Vec<T> {
        let mut g = data.p.clone();
        data.Q.gemv(&mut g, x, T::one(), T::one());
        g
    }

    // Minimizes over x + null(C) with x as the particular solution
    fn nullspace_step(
        &mut self,
        data: &DefaultProblemData<T>,
        C: &Matrix<T>,
        x: &[T],
        tol: T,
    ) -> Result<EqpStep<T>, DenseFactorizationError> {
        self.nullspace_steps += 1;
        let n = data.n;
        let Q = &data.Q;

        let (Z, H) = self.reduced_hessian(data, C, tol)?;
        let nz = Z.ncols();
        let g = Self::gradient(data, x);

        let mut xc = x.to_vec();

        if nz > 0 {
            let mut gz = vec![T::zero(); nz];
            Z.t().gemv(&mut gz, &g, T::one(), T::zero());

            self.eigen.eigen(&H)?;
            let curv_tol = tol * T::max(T::one(), self.eigen.λ.norm_inf());

            if let Some(d) = self.negative_curvature_ray(&Z, &g, curv_tol) {
                return Ok(EqpStep::Ray(d));
            }
            let λ = &self.eigen.λ;
            let V = &self.eigen.V;

            // linear descent along directions of zero curvature
            let mut cnull = vec![T::zero(); nz];
            let mut w = vec![T::zero(); nz];
            for (j, &λj) in λ.iter().enumerate() {
                let vj = V.col_slice(j);
                let c = vj.dot(&gz);
                if λj <= curv_tol {
                    cnull.axpby(c, vj, T::one());
                } else {
                    w.axpby(-c / λj, vj, T::one());
                }
            }
            if cnull.norm() > tol * T::max(T::one(), g.norm()) {
                let mut d = vec![T::zero(); n];
                Z.gemv(&mut d, &cnull, -T::one(), T::zero());
                d.normalize();
                return Ok(EqpStep::Ray(d));
            }

            Z.gemv(&mut xc, &w, T::one(), T::one());
        }

        // C'μ = -(Qxc + p) in the least squares sense
        let mut rhs = data.p.clone();
        Q.gemv(&mut rhs, &xc, -T::one(), -T::one());
        let mut μ = vec![T::zero(); C.nrows()];
        self.svd.solve_least_squares(&rhs, &mut μ)?;

        Ok(EqpStep::Point { x: xc, μ })
    }
}

impl<T> KKTSystem<T> for DefaultKKTSystem<T>
where
    T: FloatT,
{
    type D = DefaultProblemData<T>;
    type SE = DefaultSettings<T>;

    fn solve(
        &mut self,
        data: &DefaultProblemData<T>,
        workingset: &WorkingSet,
        x: &[T],
        settings: &DefaultSettings<T>,
    ) -> Result<EqpStep<T>, DenseFactorizationError> {
        let n = data.n;
        let (C, d) = Self::constraint_system(data, workingset);
        let k = C.nrows();

        let Ct = C.transpose();
        let Z = Matrix::zeros((k, k));
        let K = Matrix::hvcat(&[&[&data.Q, &Ct], &[&C, &Z]])
            .map_err(|_| DenseFactorizationError::IncompatibleDimension)?;

        let mut sol = data.p.clone();
        sol.negate();
        sol.extend(d);

        match self.lu.factor(&K) {
            Ok(()) => {
                // a nonsingular K can still be a saddle of an indefinite Q
                if data.q_indefinite {
                    let tol = settings.core().tol;
                    let (Z, H) = self.reduced_hessian(data, &C, tol)?;
                    if Z.ncols() > 0 {
                        self.eigen.eigen(&H)?;
                        let curv_tol = tol * T::max(T::one(), self.eigen.λ.norm_inf());
                        let g = Self::gradient(data, x);
                        if let Some(d) = self.negative_curvature_ray(&Z, &g, curv_tol) {
                            return Ok(EqpStep::Ray(d));
                        }
                    }
                }

                self.lu.solve(&mut sol)?;
                let μ = sol.split_off(n);
                Ok(EqpStep::Point { x: sol, μ })
            }
            Err(DenseFactorizationError::Singular(_)) => {
                self.nullspace_step(data, &C, x, settings.core().tol)
            }
            Err(e) => Err(e),
        }
    }

    fn solve_unconstrained(
        &mut self,
        data: &DefaultProblemData<T>,
        settings: &DefaultSettings<T>,
    ) -> Result<EqpStep<T>, DenseFactorizationError> {
        let n = data.n;
        match self.cholesky.factor(&data.Q) {
            Ok(()) => {
                let mut x = data.p.clone();
                x.negate();
                self.cholesky.solve(&mut x)?;
                Ok(EqpStep::Point { x, μ: vec![] })
            }
            Err(DenseFactorizationError::NotPositiveDefinite(_)) => {
                let C = Matrix::zeros((0, n));
                let x = vec![T::zero(); n];
                self.nullspace_step(data, &C, &x, settings.core().tol)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(
        Q: Matrix<f64>,
        p: &[f64],
        G: Matrix<f64>,
        h: &[f64],
        A: Matrix<f64>,
        b: &[f64],
    ) -> DefaultProblemData<f64> {
        let settings = DefaultSettings::default();
        DefaultProblemData::new(&Q, p, &G, h, &A, b, &settings).unwrap()
    }

    #[test]
    fn test_kkt_point() {
        let Q = Matrix::from(&[
            [4., 1.], //
            [1., 2.], //
        ]);
        let d = data(
            Q,
            &[1., 1.],
            Matrix::zeros((0, 2)),
            &[],
            Matrix::from(&[[1., 1.]]),
            &[1.],
        );
        let settings = DefaultSettings::default();
        let mut kkt = DefaultKKTSystem::new(&d);
        let ws = WorkingSet::new(0);

        let step = kkt.solve(&d, &ws, &[0.5, 0.5], &settings).unwrap();
        let EqpStep::Point { x, μ } = step else {
            panic!("expected a point");
        };
        assert!(x.norm_inf_diff(&[0.25, 0.75]) < 1e-12);
        // Qx + p + A'ν = 0
        assert!((μ[0] + 2.75).abs() < 1e-12);
        assert_eq!(kkt.nullspace_steps, 0);
    }

    #[test]
    fn test_kkt_singular_ray() {
        // no curvature in x2 and a linear pull along it
        let Q = Matrix::from(&[
            [1., 0.], //
            [0., 0.], //
        ]);
        let d = data(
            Q,
            &[0., -1.],
            Matrix::from(&[[-1., 0.]]),
            &[0.],
            Matrix::zeros((0, 2)),
            &[],
        );
        let settings = DefaultSettings::default();
        let mut kkt = DefaultKKTSystem::new(&d);
        let ws = WorkingSet::new(1);

        let step = kkt.solve(&d, &ws, &[0., 0.], &settings).unwrap();
        assert_eq!(step, EqpStep::Ray(vec![0., 1.]));
        assert_eq!(kkt.nullspace_steps, 1);
    }

    #[test]
    fn test_kkt_singular_point() {
        // singular Q but bounded along the active row
        let Q = Matrix::from(&[
            [1., 0.], //
            [0., 0.], //
        ]);
        let d = data(
            Q,
            &[-1., -1.],
            Matrix::from(&[[0., 1.]]),
            &[2.],
            Matrix::zeros((0, 2)),
            &[],
        );
        let settings = DefaultSettings::default();
        let mut kkt = DefaultKKTSystem::new(&d);
        let mut ws = WorkingSet::new(1);
        ws.add(0);

        // K is nonsingular here, so solve directly
        let step = kkt.solve(&d, &ws, &[0., 2.], &settings).unwrap();
        let EqpStep::Point { x, μ } = step else {
            panic!("expected a point");
        };
        assert!(x.norm_inf_diff(&[1., 2.]) < 1e-12);
        assert!((μ[0] - 1.).abs() < 1e-12);

        // and through the null space with no constraints active
        let C = Matrix::from(&[[0., 1.]]);
        let step = kkt.nullspace_step(&d, &C, &[0., 2.], 1e-8).unwrap();
        let EqpStep::Point { x, μ } = step else {
            panic!("expected a point");
        };
        assert!(x.norm_inf_diff(&[1., 2.]) < 1e-12);
        assert!((μ[0] - 1.).abs() < 1e-12);
    }

    #[test]
    fn test_kkt_negative_curvature() {
        let Q = Matrix::from(&[
            [-1., 0.], //
            [0., 1.],  //
        ]);
        let d = data(
            Q,
            &[1., 0.],
            Matrix::zeros((0, 2)),
            &[],
            Matrix::zeros((0, 2)),
            &[],
        );
        let settings = DefaultSettings::default();
        let mut kkt = DefaultKKTSystem::new(&d);
        let step = kkt.solve_unconstrained(&d, &settings).unwrap();

        // descends along -x1 since the gradient is +x1
        assert_eq!(step, EqpStep::Ray(vec![-1., 0.]));
    }

    #[test]
    fn test_kkt_saddle_point() {
        // K is nonsingular but Q has negative curvature along x1
        let Q = Matrix::from(&[
            [-1., 0.], //
            [0., 1.],  //
        ]);
        let G = Matrix::from(&[
            [1., 0.],  //
            [0., 1.],  //
            [0., -1.], //
        ]);
        let d = data(Q, &[0., 0.], G, &[2., 1., 1.], Matrix::zeros((0, 2)), &[]);
        assert!(d.q_indefinite);

        let settings = DefaultSettings::default();
        let mut kkt = DefaultKKTSystem::new(&d);
        let mut ws = WorkingSet::new(3);

        let step = kkt.solve(&d, &ws, &[0., 0.], &settings).unwrap();
        let EqpStep::Ray(r) = step else {
            panic!("expected a ray");
        };
        assert!((r[0].abs() - 1.).abs() < 1e-12);
        assert!(r[1].abs() < 1e-12);
        assert_eq!(kkt.nullspace_steps, 0);

        // fixing x1 leaves only positive curvature
        ws.add(0);
        let step = kkt.solve(&d, &ws, &[0., 0.], &settings).unwrap();
        let EqpStep::Point { x, μ } = step else {
            panic!("expected a point");
        };
        assert!(x.norm_inf_diff(&[2., 0.]) < 1e-12);
        assert!((μ[0] - 2.).abs() < 1e-12);
    }
}
