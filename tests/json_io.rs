#![cfg(feature = "serde")]
#![allow(non_snake_case)]

use activeqp::{algebra::*, solver::*};
use std::io::{Seek, SeekFrom, Write};

fn test_json_solver() -> DefaultSolver<f64> {
    let Q = Matrix::from(&[
        [6., 2.], //
        [2., 2.], //
    ]);
    let p = [1., 6.];
    let G = Matrix::from(&[
        [-2., -3.], //
        [-1., 0.],  //
        [0., -1.],  //
    ]);
    let h = [-4., 0., 0.];
    let A = Matrix::zeros((0, 2));

    let settings = DefaultSettingsBuilder::default()
        .verbose(false)
        .initial_point(vec![1., 1.])
        .build()
        .unwrap();

    DefaultSolver::new(&Q, &p, &G, &h, &A, &[], settings).unwrap()
}

#[test]
fn test_json_roundtrip() {
    let mut solver = test_json_solver();
    solver.solve();

    let mut file = tempfile::tempfile().unwrap();
    solver.save_to_file(&mut file).unwrap();

    file.seek(SeekFrom::Start(0)).unwrap();
    let mut solver2 = DefaultSolver::<f64>::load_from_file(&mut file, None).unwrap();

    assert_eq!(solver2.settings.initial_point, Some(vec![1., 1.]));
    assert_eq!(solver2.data.Q, solver.data.Q);

    solver2.solve();
    assert_eq!(solver.solution.status, solver2.solution.status);
    assert_eq!(solver.solution.x, solver2.solution.x);
}

#[test]
fn test_json_bad_file() {
    let mut file = tempfile::tempfile().unwrap();
    file.write_all(b"{\"Q\": 1}").unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();

    assert!(DefaultSolver::<f64>::load_from_file(&mut file, None).is_err());
}

#[test]
fn test_json_bad_dimensions() {
    // valid json describing an invalid problem
    let json = r#"{
        "Q": {"m": 1, "n": 1, "data": [1.0]},
        "p": [1.0, 2.0],
        "G": {"m": 0, "n": 2, "data": []},
        "h": [],
        "A": {"m": 0, "n": 2, "data": []},
        "b": [],
        "settings": {}
    }"#;
    let mut file = tempfile::tempfile().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();

    let err = DefaultSolver::<f64>::load_from_file(&mut file, None)
        .err()
        .unwrap();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
}
