#![allow(non_snake_case)]
use super::*;
use crate::io::ConfigurablePrintTarget;
use crate::solver::core::{traits::Settings, ActiveSetSolver, SettingsError, Solver};

use crate::algebra::*;
use crate::timers::*;
use std::io::Write;
use thiserror::Error;

/// Solver for convex quadratic programs with dense linear constraints

pub type DefaultSolver<T = f64> = Solver<
    DefaultProblemData<T>,
    DefaultKKTSystem<T>,
    DefaultInfo<T>,
    DefaultSolution<T>,
    DefaultSettings<T>,
>;

/// Error type returned when a solver can not be constructed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Bad problem data: {0}")]
    /// The problem data failed validation
    Data(#[from] DataValidationError),
    #[error("Bad settings: {0}")]
    /// The settings failed validation
    Settings(#[from] SettingsError),
    #[error("Initial point has length {0} but the problem has {1} variables")]
    /// The initial point does not match the number of variables
    BadInitialPoint(usize, usize),
}

impl<T> DefaultSolver<T>
where
    T: FloatT,
{
    pub fn new(
        Q: &Matrix<T>,
        p: &[T],
        G: &Matrix<T>,
        h: &[T],
        A: &Matrix<T>,
        b: &[T],
        settings: DefaultSettings<T>,
    ) -> Result<Self, SolverError> {
        settings.validate()?;

        let mut timers = Timers::default();
        let mut output;

        timeit! {timers => "setup"; {

        let data = DefaultProblemData::<T>::new(Q,p,G,h,A,b,&settings)?;

        if let Some(ref x0) = settings.initial_point {
            if x0.len() != data.n {
                return Err(SolverError::BadInitialPoint(x0.len(), data.n));
            }
        }

        let info = DefaultInfo::<T>::new();

        let kktsystem;
        timeit!{timers => "kktinit"; {
            kktsystem = DefaultKKTSystem::<T>::new(&data);
        }}

        // user facing results go here.
        let solution = DefaultSolution::<T>::new(data.n, data.m, data.neq);

        output = Self{data,kktsystem,info,solution,settings,timers: None};

        }} //end "setup" timer.

        //now that the timer is finished we can swap our
        //timer object into the solver structure
        output.timers.replace(timers);

        Ok(output)
    }

    /// Write a breakdown of setup and solve times to the print target
    pub fn print_timers(&mut self) -> std::io::Result<()> {
        let out = &mut self.info.stream;
        match self.timers {
            Some(ref timers) => timers.write_report(out),
            None => writeln!(out, "no timing information"),
        }
    }
}

impl<T> ConfigurablePrintTarget for DefaultSolver<T>
where
    T: FloatT,
{
    fn print_to_stdout(&mut self) {
        self.info.print_to_stdout()
    }
    fn print_to_file(&mut self, file: std::fs::File) {
        self.info.print_to_file(file)
    }
    fn print_to_stream(&mut self, stream: Box<dyn Write + Send + Sync>) {
        self.info.print_to_stream(stream)
    }
    fn print_to_sink(&mut self) {
        self.info.print_to_sink()
    }
    fn print_to_buffer(&mut self) {
        self.info.print_to_buffer()
    }
    fn get_print_buffer(&mut self) -> std::io::Result<String> {
        self.info.get_print_buffer()
    }
}

/// Build a [`DefaultSolver`] for the given problem, run it and return
/// the solution.
///
/// __Example usage__ : To solve
///
/// ```text
/// minimize    2x₁² + x₁x₂ + x₂² + x₁ + x₂
/// subject to  x₁ + x₂ = 1
/// ```
///
/// ```
/// use activeqp::algebra::*;
/// use activeqp::solver::*;
///
/// let Q = Matrix::from(&[
///     [4., 1.], //
///     [1., 2.], //
/// ]);
/// let p: [f64; 2] = [1., 1.];
/// let G = Matrix::zeros((0, 2));
/// let A = Matrix::from(&[[1., 1.]]);
///
/// let settings = DefaultSettingsBuilder::default()
///     .verbose(false)
///     .build()
///     .unwrap();
///
/// let sol = solve(&Q, &p, &G, &[], &A, &[1.], settings).unwrap();
/// assert_eq!(sol.status, SolverStatus::Optimal);
/// assert!((sol.x[0] - 0.25).abs() < 1e-9);
/// ```
pub fn solve<T: FloatT>(
    Q: &Matrix<T>,
    p: &[T],
    G: &Matrix<T>,
    h: &[T],
    A: &Matrix<T>,
    b: &[T],
    settings: DefaultSettings<T>,
) -> Result<DefaultSolution<T>, SolverError> {
    let mut solver = DefaultSolver::new(Q, p, G, h, A, b, settings)?;
    solver.solve();
    Ok(solver.solution)
}
