#![allow(non_snake_case)]

use activeqp::{algebra::*, solver::*};

#[allow(clippy::type_complexity)]
fn api_dim_check_data() -> (
    Matrix<f64>,
    Vec<f64>,
    Matrix<f64>,
    Vec<f64>,
    Matrix<f64>,
    Vec<f64>,
) {
    let Q = Matrix::identity(3);
    let p = vec![0., 0., 0.];
    let G = Matrix::from(&[
        [1., 0., 0.], //
        [0., 1., 0.], //
    ]);
    let h = vec![1., 1.];
    let A = Matrix::from(&[[1., 1., 1.]]);
    let b = vec![1.];
    (Q, p, G, h, A, b)
}

fn quiet() -> DefaultSettings<f64> {
    DefaultSettingsBuilder::default()
        .verbose(false)
        .build()
        .unwrap()
}

#[test]
fn api_dim_check_working() {
    let (Q, p, G, h, A, b) = api_dim_check_data();
    let solver = DefaultSolver::new(&Q, &p, &G, &h, &A, &b, quiet());
    assert!(solver.is_ok());
}

#[test]
fn api_dim_check_bad_Q() {
    let (_, p, G, h, A, b) = api_dim_check_data();
    let Q = Matrix::identity(2);
    let solver = DefaultSolver::new(&Q, &p, &G, &h, &A, &b, quiet());
    assert!(matches!(
        solver,
        Err(SolverError::Data(DataValidationError::DimensionMismatch("Q")))
    ));
}

#[test]
fn api_dim_check_bad_G_cols() {
    let (Q, p, _, h, A, b) = api_dim_check_data();
    let G = Matrix::zeros((2, 4));
    let solver = DefaultSolver::new(&Q, &p, &G, &h, &A, &b, quiet());
    assert!(matches!(
        solver,
        Err(SolverError::Data(DataValidationError::DimensionMismatch("G")))
    ));
}

#[test]
fn api_dim_check_bad_h() {
    let (Q, p, G, _, A, b) = api_dim_check_data();
    let h = vec![1., 1., 1.];
    let solver = DefaultSolver::new(&Q, &p, &G, &h, &A, &b, quiet());
    assert!(matches!(
        solver,
        Err(SolverError::Data(DataValidationError::DimensionMismatch("G")))
    ));
}

#[test]
fn api_dim_check_bad_b() {
    let (Q, p, G, h, A, _) = api_dim_check_data();
    let b = vec![1., 2.];
    let solver = DefaultSolver::new(&Q, &p, &G, &h, &A, &b, quiet());
    assert!(matches!(
        solver,
        Err(SolverError::Data(DataValidationError::DimensionMismatch("A")))
    ));
}

#[test]
fn api_check_non_finite() {
    let (Q, p, G, mut h, A, b) = api_dim_check_data();
    h[1] = f64::NAN;
    let solver = DefaultSolver::new(&Q, &p, &G, &h, &A, &b, quiet());
    assert!(matches!(
        solver,
        Err(SolverError::Data(DataValidationError::NonFiniteData("h")))
    ));
}

#[test]
fn api_check_symmetry() {
    let (_, p, G, h, A, b) = api_dim_check_data();
    let Q = Matrix::from(&[
        [1., 1., 0.], //
        [0., 1., 0.], //
        [0., 0., 1.], //
    ]);

    // symmetrized by default
    let solver = DefaultSolver::new(&Q, &p, &G, &h, &A, &b, quiet()).unwrap();
    assert_eq!(solver.data.Q[(0, 1)], 0.5);
    assert_eq!(solver.data.Q[(1, 0)], 0.5);

    // rejected in strict mode
    let settings = DefaultSettingsBuilder::default()
        .verbose(false)
        .strict_symmetry(true)
        .build()
        .unwrap();
    let solver = DefaultSolver::new(&Q, &p, &G, &h, &A, &b, settings);
    assert!(matches!(
        solver,
        Err(SolverError::Data(DataValidationError::NotSymmetric))
    ));
}

#[test]
fn api_check_initial_point() {
    let (Q, p, G, h, A, b) = api_dim_check_data();
    let settings = DefaultSettingsBuilder::default()
        .verbose(false)
        .initial_point(vec![0., 0.])
        .build()
        .unwrap();
    let solver = DefaultSolver::new(&Q, &p, &G, &h, &A, &b, settings);
    assert!(matches!(solver, Err(SolverError::BadInitialPoint(2, 3))));
}

#[test]
fn api_check_bad_settings() {
    let (Q, p, G, h, A, b) = api_dim_check_data();

    // bypass the builder validation
    let settings = DefaultSettings {
        tol: 0.0,
        verbose: false,
        ..DefaultSettings::default()
    };
    let solver = DefaultSolver::new(&Q, &p, &G, &h, &A, &b, settings);
    assert!(matches!(
        solver,
        Err(SolverError::Settings(SettingsError::BadFieldValue("tol")))
    ));
}

#[test]
fn api_check_empty_problem() {
    let Q = Matrix::<f64>::zeros((0, 0));
    let G = Matrix::zeros((0, 0));
    let A = Matrix::zeros((0, 0));

    let sol = solve(&Q, &[], &G, &[], &A, &[], quiet()).unwrap();
    assert_eq!(sol.status, SolverStatus::Optimal);
    assert!(sol.x.is_empty());
    assert_eq!(sol.obj_val, 0.);
}
