use super::*;
use crate::{
    algebra::*,
    solver::core::{
        traits::{ProblemData, Solution},
        workingset::Iterate,
        SolverStatus,
    },
};

/// Standard-form solver type implementing the [`Solution`](crate::solver::core::traits::Solution) trait
#[derive(Debug, Clone)]
pub struct DefaultSolution<T> {
    /// primal solution
    pub x: Vec<T>,
    /// inequality multipliers, one per row of `G`.  Zero off the working set.
    pub λ: Vec<T>,
    /// equality multipliers, one per row of `A`.  Zero for dropped rows.
    pub ν: Vec<T>,
    /// rows of `G` active at termination, in the order they were added
    pub working_set: Vec<usize>,
    /// final solver status
    pub status: SolverStatus,
    /// objective value, or NaN when the problem has no solution
    pub obj_val: T,
    /// largest constraint violation at `x`
    pub r_prim: T,
    /// solve time in seconds
    pub solve_time: f64,
    /// number of iterations over both phases
    pub iterations: u32,
    /// number of iterations spent finding a feasible point
    pub phase_one_iterations: u32,
}

impl<T> DefaultSolution<T>
where
    T: FloatT,
{
    /// Create a new `DefaultSolution` object
    pub fn new(n: usize, m: usize, neq: usize) -> Self {
        Self {
            x: vec![T::zero(); n],
            λ: vec![T::zero(); m],
            ν: vec![T::zero(); neq],
            working_set: Vec::new(),
            status: SolverStatus::Unsolved,
            obj_val: T::nan(),
            r_prim: T::nan(),
            solve_time: 0f64,
            iterations: 0,
            phase_one_iterations: 0,
        }
    }
}

impl<T> Solution<T> for DefaultSolution<T>
where
    T: FloatT,
{
    type D = DefaultProblemData<T>;
    type I = DefaultInfo<T>;

    fn finalize(&mut self, data: &DefaultProblemData<T>, iterate: &Iterate<T>, info: &DefaultInfo<T>) {
        self.status = info.status;
        self.x.copy_from_slice(&iterate.x);

        self.obj_val = if info.status.has_objective() {
            data.objective(&self.x)
        } else {
            T::nan()
        };
        self.r_prim = data.max_violation(&self.x);

        // multipliers are scattered back to the original rows
        self.λ.set(T::zero());
        for (&row, &λi) in iterate.multiplier_set.iter().zip(&iterate.λ) {
            if row < self.λ.len() {
                self.λ[row] = λi;
            }
        }
        self.ν.set(T::zero());
        for (&row, &νi) in data.equalities.rows.iter().zip(&iterate.ν) {
            self.ν[row] = νi;
        }

        self.working_set = iterate.workingset.as_slice().to_vec();

        self.iterations = info.iterations;
        self.phase_one_iterations = info.phase_one_iterations;
        self.solve_time = info.solve_time;
    }
}
