#![allow(non_snake_case)]

use activeqp::{algebra::*, solver::*};

fn quiet() -> DefaultSettings<f64> {
    DefaultSettingsBuilder::default()
        .verbose(false)
        .build()
        .unwrap()
}

#[allow(clippy::type_complexity)]
fn basic_qp_data() -> (
    Matrix<f64>,
    Vec<f64>,
    Matrix<f64>,
    Vec<f64>,
    Matrix<f64>,
    Vec<f64>,
) {
    // Q = 2*[2 .5; .5 1]
    let Q = Matrix::from(&[
        [4., 1.], //
        [1., 2.], //
    ]);
    let p = vec![1., 1.];

    // x ≥ 0
    let G = Matrix::from(&[
        [-1., 0.], //
        [0., -1.], //
    ]);
    let h = vec![0., 0.];

    let A = Matrix::from(&[[1., 1.]]);
    let b = vec![1.];

    (Q, p, G, h, A, b)
}

#[allow(clippy::type_complexity)]
fn basic_qp_data_phase_one() -> (Matrix<f64>, Vec<f64>, Matrix<f64>, Vec<f64>) {
    // Q = 2*[3 1; 1 1]
    let Q = Matrix::from(&[
        [6., 2.], //
        [2., 2.], //
    ]);
    let p = vec![1., 6.];

    // 2x1 + 3x2 ≥ 4, x ≥ 0
    let G = Matrix::from(&[
        [-2., -3.], //
        [-1., 0.],  //
        [0., -1.],  //
    ]);
    let h = vec![-4., 0., 0.];

    (Q, p, G, h)
}

#[allow(clippy::type_complexity)]
fn basic_qp_data_three_rows() -> (Matrix<f64>, Vec<f64>, Matrix<f64>, Vec<f64>) {
    let Q = Matrix::from(&[
        [1., -1.], //
        [-1., 2.], //
    ]);
    let p = vec![-2., -6.];

    let G = Matrix::from(&[
        [1., 1.],  //
        [-1., 2.], //
        [2., 1.],  //
    ]);
    let h = vec![2., 2., 3.];

    (Q, p, G, h)
}

#[test]
fn test_qp_feasible() {
    let (Q, p, G, h, A, b) = basic_qp_data();

    let mut solver = DefaultSolver::new(&Q, &p, &G, &h, &A, &b, quiet()).unwrap();
    solver.solve();

    assert_eq!(solver.solution.status, SolverStatus::Optimal);

    let refsol = vec![0.25, 0.75];
    assert!(solver.solution.x.dist(&refsol) <= 1e-8);

    let refobj = 1.875;
    assert!(f64::abs(solver.solution.obj_val - refobj) <= 1e-8);

    // nothing active, so only the equality multiplier is nonzero
    assert_eq!(solver.solution.λ, vec![0., 0.]);
    assert!(f64::abs(solver.solution.ν[0] + 2.75) <= 1e-8);
    assert!(solver.solution.working_set.is_empty());
    assert_eq!(solver.solution.phase_one_iterations, 0);
}

#[test]
fn test_qp_phase_one() {
    let (Q, p, G, h) = basic_qp_data_phase_one();
    let A = Matrix::zeros((0, 2));

    let mut solver = DefaultSolver::new(&Q, &p, &G, &h, &A, &[], quiet()).unwrap();
    solver.solve();

    assert_eq!(solver.solution.status, SolverStatus::Optimal);

    let refsol = vec![0.5, 1.0];
    assert!(solver.solution.x.dist(&refsol) <= 1e-8);

    // 11.25 with the constant term 2
    let refobj = 9.25;
    assert!(f64::abs(solver.solution.obj_val - refobj) <= 1e-8);

    // the origin is infeasible
    assert!(solver.solution.phase_one_iterations > 0);
    assert!(solver.solution.iterations > solver.solution.phase_one_iterations);

    assert_eq!(solver.solution.working_set, vec![0]);
    assert!(solver.solution.λ.dist(&[3., 0., 0.]) <= 1e-8);
}

#[test]
fn test_qp_two_active_rows() {
    let (Q, p, G, h) = basic_qp_data_three_rows();
    let A = Matrix::zeros((0, 2));

    let mut solver = DefaultSolver::new(&Q, &p, &G, &h, &A, &[], quiet()).unwrap();
    solver.solve();

    assert_eq!(solver.solution.status, SolverStatus::Optimal);

    let refsol = vec![2. / 3., 4. / 3.];
    assert!(solver.solution.x.dist(&refsol) <= 1e-8);

    let refobj = -74. / 9.;
    assert!(f64::abs(solver.solution.obj_val - refobj) <= 1e-8);

    let refλ = vec![28. / 9., 4. / 9., 0.];
    assert!(solver.solution.λ.dist(&refλ) <= 1e-8);

    let mut ws = solver.solution.working_set.clone();
    ws.sort();
    assert_eq!(ws, vec![0, 1]);
}

#[test]
fn test_qp_iteration_limit() {
    let (Q, p, G, h) = basic_qp_data_three_rows();
    let A = Matrix::zeros((0, 2));

    let settings = DefaultSettingsBuilder::default()
        .verbose(false)
        .max_iter(1)
        .build()
        .unwrap();

    let mut solver = DefaultSolver::new(&Q, &p, &G, &h, &A, &[], settings).unwrap();
    solver.solve();

    assert_eq!(solver.solution.status, SolverStatus::IterationLimitExceeded);
    assert_eq!(solver.solution.iterations, 1);

    // the first step is blocked by the third row
    assert_eq!(solver.solution.working_set, vec![2]);
    let refsol = vec![30. / 28., 24. / 28.];
    assert!(solver.solution.x.dist(&refsol) <= 1e-8);
    assert!(solver.solution.obj_val.is_finite());
    assert!(solver.solution.r_prim <= 1e-8);
}

#[test]
fn test_qp_repeated_solve() {
    let (Q, p, G, h) = basic_qp_data_phase_one();
    let A = Matrix::zeros((0, 2));

    let mut solver = DefaultSolver::new(&Q, &p, &G, &h, &A, &[], quiet()).unwrap();
    solver.solve();
    let first = solver.solution.clone();
    solver.solve();

    // bitwise identical
    assert_eq!(first.status, solver.solution.status);
    assert_eq!(first.x, solver.solution.x);
    assert_eq!(first.λ, solver.solution.λ);
    assert_eq!(first.iterations, solver.solution.iterations);
}

#[test]
fn test_qp_initial_point() {
    let (Q, p, G, h) = basic_qp_data_three_rows();
    let A = Matrix::zeros((0, 2));

    // start on the optimal face
    let settings = DefaultSettingsBuilder::default()
        .verbose(false)
        .initial_point(vec![0., 1.])
        .build()
        .unwrap();

    let sol = solve(&Q, &p, &G, &h, &A, &[], settings).unwrap();
    assert_eq!(sol.status, SolverStatus::Optimal);
    assert!(sol.x.dist(&[2. / 3., 4. / 3.]) <= 1e-8);

    // an infeasible start goes through phase one
    let settings = DefaultSettingsBuilder::default()
        .verbose(false)
        .initial_point(vec![5., 5.])
        .build()
        .unwrap();

    let sol = solve(&Q, &p, &G, &h, &A, &[], settings).unwrap();
    assert_eq!(sol.status, SolverStatus::Optimal);
    assert!(sol.phase_one_iterations > 0);
    assert!(sol.x.dist(&[2. / 3., 4. / 3.]) <= 1e-8);
}

#[test]
fn test_qp_f32() {
    let Q = Matrix::<f32>::from(&[
        [4., 1.], //
        [1., 2.], //
    ]);
    let G = Matrix::from(&[
        [-1., 0.], //
        [0., -1.], //
    ]);
    let A = Matrix::from(&[[1., 1.]]);

    let settings = DefaultSettingsBuilder::<f32>::default()
        .verbose(false)
        .tol(1e-5)
        .build()
        .unwrap();

    let sol = solve(&Q, &[1., 1.], &G, &[0., 0.], &A, &[1.], settings).unwrap();
    assert_eq!(sol.status, SolverStatus::Optimal);
    assert!(sol.x.dist(&[0.25, 0.75]) <= 1e-4);
}

// Qx + p + G'λ = 0 with λ ≥ 0, zero off the working set
fn assert_multipliers(sol: &DefaultSolution<f64>, Q: &Matrix<f64>, p: &[f64], G: &Matrix<f64>) {
    let mut r = p.to_vec();
    Q.gemv(&mut r, &sol.x, 1., 1.);
    G.t().gemv(&mut r, &sol.λ, 1., 1.);
    assert!(r.norm_inf() <= 1e-8);

    assert!(sol.λ.iter().all(|&λi| λi >= -1e-8));
    for (i, &λi) in sol.λ.iter().enumerate() {
        if !sol.working_set.contains(&i) {
            assert_eq!(λi, 0.);
        }
    }
}

#[test]
fn test_qp_duplicate_rows() {
    // rows 0 and 1 are identical, and all four rows meet at (1,1)
    let Q = Matrix::from(&[
        [2., 0.], //
        [0., 2.], //
    ]);
    let p = [-4., -4.];
    let G = Matrix::from(&[
        [1., 0.], //
        [1., 0.], //
        [0., 1.], //
        [1., 1.], //
    ]);
    let h = [1., 1., 1., 2.];
    let A = Matrix::zeros((0, 2));

    let sol = solve(&Q, &p, &G, &h, &A, &[], quiet()).unwrap();
    assert_eq!(sol.status, SolverStatus::Optimal);
    assert!(sol.x.dist(&[1., 1.]) <= 1e-8);
    assert!(f64::abs(sol.obj_val + 6.) <= 1e-8);

    let ws = &sol.working_set;
    assert!(ws.len() <= 2);
    assert!(!(ws.contains(&0) && ws.contains(&1)));
    assert_multipliers(&sol, &Q, &p, &G);
}

#[test]
fn test_qp_degenerate_vertex() {
    // five rows are active at (1,0), more than the two variables
    let Q = Matrix::<f64>::identity(2);
    let G = Matrix::from(&[
        [1., 0.],  //
        [1., 0.],  //
        [0., -1.], //
        [1., 1.],  //
        [1., -1.], //
    ]);
    let h = [1., 1., 0., 1., 1.];
    let A = Matrix::zeros((0, 2));

    let p = [-2., 1.];
    let sol = solve(&Q, &p, &G, &h, &A, &[], quiet()).unwrap();
    assert_eq!(sol.status, SolverStatus::Optimal);
    assert!(sol.x.dist(&[1., 0.]) <= 1e-8);
    assert!(f64::abs(sol.obj_val + 1.5) <= 1e-8);
    assert!(sol.working_set.len() <= 2);
    assert_multipliers(&sol, &Q, &p, &G);

    // starting on the degenerate vertex and leaving it
    let p = [-0.5, 1.];
    let settings = DefaultSettingsBuilder::default()
        .verbose(false)
        .initial_point(vec![1., 0.])
        .build()
        .unwrap();
    let sol = solve(&Q, &p, &G, &h, &A, &[], settings).unwrap();
    assert_eq!(sol.status, SolverStatus::Optimal);
    assert!(sol.x.dist(&[0.5, 0.]) <= 1e-8);
    assert!(f64::abs(sol.obj_val + 0.125) <= 1e-8);
    assert_eq!(sol.phase_one_iterations, 0);
    assert_multipliers(&sol, &Q, &p, &G);
}

#[test]
fn test_qp_phase_one_degenerate() {
    // x1 ≥ 1 twice, x2 ≥ 0 and x1 + x2 ≥ 1, all active at (1,0)
    let Q = Matrix::<f64>::identity(2);
    let p = [0., 0.];
    let G = Matrix::from(&[
        [-1., 0.],  //
        [-1., 0.],  //
        [0., -1.],  //
        [-1., -1.], //
    ]);
    let h = [-1., -1., 0., -1.];
    let A = Matrix::zeros((0, 2));

    let sol = solve(&Q, &p, &G, &h, &A, &[], quiet()).unwrap();
    assert_eq!(sol.status, SolverStatus::Optimal);
    assert!(sol.phase_one_iterations > 0);
    assert!(sol.x.dist(&[1., 0.]) <= 1e-8);
    assert!(f64::abs(sol.obj_val - 0.5) <= 1e-8);
    assert!(sol.r_prim <= 1e-8);

    let ws = &sol.working_set;
    assert!(!(ws.contains(&0) && ws.contains(&1)));
    assert_multipliers(&sol, &Q, &p, &G);
}
