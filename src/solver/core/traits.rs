//! Required traits for types providing an active-set solver implementation.
//!
//! This module defines the core traits that must be implemented by a collection
//! of mutually associated data types to make a solver for a particular problem
//! format.
//!
//! In nearly all cases there is no need for a user to implement these traits.
//! Instead, users should use the collection of types that are provided
//! in the [Default solver implementation](crate::solver::implementations::default),
//! which collectively implement support for the problem format described in the top
//! level crate documentation.

use super::workingset::{Iterate, WorkingSet};
use super::{CoreSettings, SettingsError, SolvePhase, SolverStatus, StepAction};
use crate::algebra::*;
use crate::timers::*;

/// Data for a convex quadratic program with linear constraints.
pub trait ProblemData<T: FloatT>: Sized {
    /// number of variables
    fn nvars(&self) -> usize;

    /// number of inequality rows
    fn nineq(&self) -> usize;

    /// number of independent equality rows retained after preprocessing
    fn neq_reduced(&self) -> usize;

    /// `G[i,:]x - h[i]`
    fn ineq_residual(&self, i: usize, x: &[T]) -> T;

    /// `G[i,:]d`
    fn ineq_dot(&self, i: usize, d: &[T]) -> T;

    /// objective value at `x`
    fn objective(&self, x: &[T]) -> T;

    /// largest violation of any constraint at `x`, or zero
    fn max_violation(&self, x: &[T]) -> T;

    /// true if there is nothing to iterate over
    fn is_unconstrained(&self) -> bool;

    /// false if the equality rows can not be satisfied simultaneously
    fn equalities_consistent(&self) -> bool;

    /// A point satisfying the equality constraints, preferring `guess`
    fn initial_point(&self, guess: Option<&[T]>, tol: T) -> Vec<T>;

    /// The feasibility problem to solve when `x` violates the
    /// inequalities by more than `tol`, with its starting point.
    /// Returns `None` when `x` is already feasible.
    fn phase_one(&self, x: &[T], tol: T) -> Option<(Self, Vec<T>)>;
}

/// Result of solving the equality-constrained subproblem for a working set
#[derive(Debug, Clone, PartialEq)]
pub enum EqpStep<T> {
    /// Minimizer `x` with multipliers `μ = [ν; λ]`, equality rows first and
    /// inequality rows in working set order
    Point { x: Vec<T>, μ: Vec<T> },
    /// Unit direction along which the objective decreases without bound
    /// while the working set stays satisfied
    Ray(Vec<T>),
}

/// KKT linear solver object.
pub trait KKTSystem<T: FloatT> {
    type D: ProblemData<T>;
    type SE: Settings<T>;

    /// Solve the equality-constrained QP in which the rows of `workingset`
    /// hold with equality.  `x` must satisfy those rows.
    fn solve(
        &mut self,
        data: &Self::D,
        workingset: &WorkingSet,
        x: &[T],
        settings: &Self::SE,
    ) -> Result<EqpStep<T>, DenseFactorizationError>;

    /// Minimize the objective with no constraints at all
    fn solve_unconstrained(
        &mut self,
        data: &Self::D,
        settings: &Self::SE,
    ) -> Result<EqpStep<T>, DenseFactorizationError>;
}

/// Printing functions for the solver's Info
pub trait InfoPrint<T>
where
    T: FloatT,
{
    type D: ProblemData<T>;
    type SE: Settings<T>;

    /// Print the solver configuration, e.g. settings etc.
    /// This function is called once at the start of the solve.
    fn print_configuration(&mut self, settings: &Self::SE, data: &Self::D) -> std::io::Result<()>;

    /// Print a header to appear at the top of progress information.
    fn print_status_header(&mut self, settings: &Self::SE) -> std::io::Result<()>;

    /// Print solver progress information.   Called once per iteration.
    fn print_status(&mut self, settings: &Self::SE) -> std::io::Result<()>;

    /// Print solver final status and other exit information.   Called at
    /// solver termination.
    fn print_footer(&mut self, settings: &Self::SE) -> std::io::Result<()>;

    /// The stream that progress information is written to
    fn print_target(&mut self) -> &mut dyn std::io::Write;
}

/// Internal information for the solver to monitor progress.
pub trait Info<T>: InfoPrint<T>
where
    T: FloatT,
{
    /// Reset internal data, particularly solve timers.
    fn reset(&mut self, timers: &mut Timers);

    /// Record the outcome of one iteration.
    #[allow(clippy::too_many_arguments)]
    fn update(
        &mut self,
        data: &Self::D,
        iterate: &Iterate<T>,
        phase: SolvePhase,
        iterations: u32,
        action: StepAction,
        α: T,
    );

    /// Compute final values before solver termination
    fn finalize(&mut self, data: &Self::D, iterate: &Iterate<T>, timers: &mut Timers);

    /// Report or update termination status
    fn get_status(&self) -> SolverStatus;
    fn set_status(&mut self, status: SolverStatus);
}

/// Solution for a quadratic program.
pub trait Solution<T: FloatT> {
    type D: ProblemData<T>;
    type I: Info<T>;

    /// Compute solution from the final iterate at solver termination
    fn finalize(&mut self, data: &Self::D, iterate: &Iterate<T>, info: &Self::I);
}

/// Settings for a quadratic program.
///
/// Implementors of this trait can define any internal or problem
/// specific settings they wish.   They must, however, also maintain
/// a settings object of type [`CoreSettings`](crate::solver::core::CoreSettings)
/// and return this to the solver internally.
pub trait Settings<T: FloatT> {
    /// Return the core settings.
    fn core(&self) -> &CoreSettings<T>;

    /// Return the core settings (mutably).
    fn core_mut(&mut self) -> &mut CoreSettings<T>;

    /// Check that the settings are valid
    fn validate(&self) -> Result<(), SettingsError>;
}
