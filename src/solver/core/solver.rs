use self::internal::*;
use super::traits::*;
use super::workingset::Iterate;
use crate::algebra::*;
use crate::timers::*;
use std::io::Write;

// ---------------------------------
// Solver status type
// ---------------------------------

/// Status of solver at termination
#[repr(u32)]
#[derive(PartialEq, Eq, Clone, Debug, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverStatus {
    /// Problem is not solved (solver hasn't run).
    #[default]
    Unsolved,
    /// Solver terminated with a solution satisfying the KKT conditions.
    Optimal,
    /// No point satisfies the constraints.
    Infeasible,
    /// The objective decreases without bound over the feasible set.
    Unbounded,
    /// Iteration limit reached before a solution was found.
    IterationLimitExceeded,
}

impl SolverStatus {
    /// true if the reported objective value is meaningful
    pub(crate) fn has_objective(&self) -> bool {
        matches!(
            *self,
            SolverStatus::Optimal | SolverStatus::IterationLimitExceeded
        )
    }
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Which problem the active-set iteration is working on
#[repr(u32)]
#[derive(PartialEq, Eq, Clone, Debug, Copy, Default)]
pub enum SolvePhase {
    /// finding a feasible point
    One,
    /// minimizing the objective from a feasible point
    #[default]
    Two,
}

impl std::fmt::Display for SolvePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            SolvePhase::One => write!(f, "1"),
            SolvePhase::Two => write!(f, "2"),
        }
    }
}

/// What an iteration did to the working set
#[derive(PartialEq, Eq, Clone, Debug, Copy, Default)]
pub enum StepAction {
    #[default]
    None,
    /// blocking row added after a partial step
    Add(usize),
    /// row with the most negative multiplier removed
    Drop(usize),
    /// subproblem minimizer accepted with all multipliers nonnegative
    Converged,
    /// descent ray with nothing blocking it
    Unbounded,
}

impl std::fmt::Display for StepAction {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            StepAction::None => write!(f, "-"),
            StepAction::Add(i) => write!(f, "add {i}"),
            StepAction::Drop(i) => write!(f, "drop {i}"),
            StepAction::Converged => write!(f, "optimal"),
            StepAction::Unbounded => write!(f, "ray"),
        }
    }
}

// ---------------------------------
// top level solver container type
// ---------------------------------

// The top-level solver.

// This struct is defined with a collection of mutually interacting associated types.
// See the [`DefaultSolver`](crate::solver::implementations::default) for an example.

pub struct Solver<D, K, I, SO, SE> {
    pub data: D,
    pub kktsystem: K,
    pub info: I,
    pub solution: SO,
    pub settings: SE,
    pub timers: Option<Timers>,
}

fn _print_banner(out: &mut dyn Write, is_verbose: bool) -> std::io::Result<()> {
    if !is_verbose {
        return Ok(());
    }

    writeln!(out, "-------------------------------------------------------------")?;
    writeln!(
        out,
        "          activeqp v{}  -  dense active-set QP solver        \n",
        crate::VERSION
    )?;
    writeln!(out, "-------------------------------------------------------------")?;
    Ok(())
}

// ---------------------------------
// ActiveSetSolver trait and its standard implementation.
// ---------------------------------

/// A primal active-set solver with a phase one feasibility stage

// Only the main solver function lives in ActiveSetSolver, since this is the
// only publicly facing trait we want to give the solver.   Additional
// internal functionality lives in the private `internal` module below.

pub trait ActiveSetSolver<T, D, K, I, SO, SE> {
    /// Run the solver
    fn solve(&mut self);
}

impl<T, D, K, I, SO, SE> ActiveSetSolver<T, D, K, I, SO, SE> for Solver<D, K, I, SO, SE>
where
    T: FloatT,
    D: ProblemData<T>,
    K: KKTSystem<T, D = D, SE = SE>,
    I: Info<T, D = D, SE = SE>,
    SO: Solution<T, D = D, I = I>,
    SE: Settings<T>,
{
    fn solve(&mut self) {
        //timers is stored as an option so that
        //we can swap it out here and avoid
        //borrow conflicts with other fields.
        let mut timers = self.timers.take().unwrap_or_default();

        // print errors never affect the solve
        notimeit! {timers; {
            let verbose = self.settings.core().verbose;
            let _ = _print_banner(self.info.print_target(), verbose);
            let _ = self.info.print_configuration(&self.settings, &self.data);
            let _ = self.info.print_status_header(&self.settings);
        }}

        self.info.reset(&mut timers);

        let x0 = vec![T::zero(); self.data.nvars()];
        let mut iterate = Iterate::new(x0, self.data.nineq());
        let status;

        timeit! {timers => "solve"; {
            status = solve_phases(self, &mut iterate, &mut timers);
        }}

        self.info.set_status(status);
        self.info.finalize(&self.data, &iterate, &mut timers);
        self.solution.finalize(&self.data, &iterate, &self.info);

        let _ = self.info.print_footer(&self.settings);

        //stow the timers back into Option in the solver struct
        self.timers.replace(timers);
    }
}

// Encapsulate the internal helpers in a private module
// so they don't get exported
mod internal {
    use super::*;

    pub(super) fn solve_phases<T, D, K, I, SO, SE>(
        solver: &mut Solver<D, K, I, SO, SE>,
        iterate: &mut Iterate<T>,
        timers: &mut Timers,
    ) -> SolverStatus
    where
        T: FloatT,
        D: ProblemData<T>,
        K: KKTSystem<T, D = D, SE = SE>,
        I: Info<T, D = D, SE = SE>,
        SE: Settings<T>,
    {
        let Solver {
            data,
            kktsystem,
            info,
            settings,
            ..
        } = solver;

        let tol = settings.core().tol;

        if !data.equalities_consistent() {
            return SolverStatus::Infeasible;
        }

        let default_cap = 10 * (data.nvars() + data.nineq());
        let max_iter = settings
            .core()
            .max_iter
            .unwrap_or(u32::try_from(default_cap).unwrap_or(u32::MAX));

        iterate.x = data.initial_point(settings.core().initial_point.as_deref(), tol);

        if data.is_unconstrained() {
            return solve_unconstrained(data, kktsystem, info, settings, iterate, timers);
        }

        // shared between both phases
        let mut iterations = 0u32;

        if let Some((p1data, z0)) = data.phase_one(&iterate.x, tol) {
            let mut p1iterate = Iterate::new(z0, p1data.nineq());
            let status;
            timeit! {timers => "phase one"; {
                status = active_set_iterations(
                    &p1data, kktsystem, info, settings, &mut p1iterate,
                    SolvePhase::One, &mut iterations, max_iter, timers,
                );
            }}

            // the auxiliary variable is last
            let n = data.nvars();
            let t = p1iterate.x[n];
            iterate.x.copy_from_slice(&p1iterate.x[..n]);

            if let Some(status) = phase_one_outcome(status, t, tol) {
                return status;
            }
        }

        let status;
        timeit! {timers => "phase two"; {
            status = active_set_iterations(
                data, kktsystem, info, settings, iterate,
                SolvePhase::Two, &mut iterations, max_iter, timers,
            );
        }}
        status
    }

    // Terminal status after phase one, or None if phase two should run.
    // Only an optimal auxiliary problem proves infeasibility.
    pub(super) fn phase_one_outcome<T: FloatT>(
        status: SolverStatus,
        t: T,
        tol: T,
    ) -> Option<SolverStatus> {
        match status {
            SolverStatus::Optimal if t <= tol => None,
            SolverStatus::Optimal => Some(SolverStatus::Infeasible),
            _ => Some(status),
        }
    }

    fn solve_unconstrained<T, D, K, I, SE>(
        data: &D,
        kktsystem: &mut K,
        info: &mut I,
        settings: &SE,
        iterate: &mut Iterate<T>,
        timers: &mut Timers,
    ) -> SolverStatus
    where
        T: FloatT,
        D: ProblemData<T>,
        K: KKTSystem<T, D = D, SE = SE>,
        I: Info<T, D = D, SE = SE>,
        SE: Settings<T>,
    {
        let (status, action) = match kktsystem.solve_unconstrained(data, settings) {
            Ok(EqpStep::Point { x, .. }) => {
                iterate.x = x;
                (SolverStatus::Optimal, StepAction::Converged)
            }
            Ok(EqpStep::Ray(_)) => (SolverStatus::Unbounded, StepAction::Unbounded),
            Err(_) => (SolverStatus::Infeasible, StepAction::None),
        };

        info.update(data, iterate, SolvePhase::Two, 0, action, T::one());
        notimeit! {timers; {
            let _ = info.print_status(settings);
        }}
        status
    }

    // Iterates until the working set problem converges, a ray escapes,
    // or `iterations` reaches `max_iter`.  Every KKT solve counts as an
    // iteration.
    #[allow(clippy::too_many_arguments)]
    pub(super) fn active_set_iterations<T, D, K, I, SE>(
        data: &D,
        kktsystem: &mut K,
        info: &mut I,
        settings: &SE,
        iterate: &mut Iterate<T>,
        phase: SolvePhase,
        iterations: &mut u32,
        max_iter: u32,
        timers: &mut Timers,
    ) -> SolverStatus
    where
        T: FloatT,
        D: ProblemData<T>,
        K: KKTSystem<T, D = D, SE = SE>,
        I: Info<T, D = D, SE = SE>,
        SE: Settings<T>,
    {
        let tol = settings.core().tol;

        loop {
            if *iterations >= max_iter {
                return SolverStatus::IterationLimitExceeded;
            }
            *iterations += 1;

            let step = match kktsystem.solve(data, &iterate.workingset, &iterate.x, settings) {
                Ok(step) => step,
                // the singular fallback itself failed
                Err(_) => return SolverStatus::Infeasible,
            };

            let (action, α) = match step {
                EqpStep::Point { x, μ } => {
                    let mut d = x.clone();
                    d.axpby(-T::one(), &iterate.x, T::one());

                    match ratio_test(data, iterate, &d, tol, true) {
                        Some((row, α)) => {
                            iterate.take_step(&d, α);
                            iterate.workingset.add(row);
                            (StepAction::Add(row), α)
                        }
                        None => {
                            iterate.x = x;
                            iterate.save_multipliers(&μ, data.neq_reduced());
                            match iterate.λ.argmin() {
                                Some((pos, λmin)) if λmin < -tol => {
                                    let row = iterate.workingset.remove_at(pos);
                                    (StepAction::Drop(row), T::one())
                                }
                                _ => (StepAction::Converged, T::one()),
                            }
                        }
                    }
                }
                EqpStep::Ray(d) => match ratio_test(data, iterate, &d, tol, false) {
                    Some((row, α)) => {
                        iterate.take_step(&d, α);
                        iterate.workingset.add(row);
                        (StepAction::Add(row), α)
                    }
                    None => (StepAction::Unbounded, T::infinity()),
                },
            };

            info.update(data, iterate, phase, *iterations, action, α);
            notimeit! {timers; {
                let _ = info.print_status(settings);
            }}

            match action {
                StepAction::Converged => return SolverStatus::Optimal,
                StepAction::Unbounded => return SolverStatus::Unbounded,
                _ => {}
            }
        }
    }

    // Longest step along `d` that keeps every inactive row satisfied,
    // and the first row to block it.
    //
    // For a step to a subproblem minimizer (`to_point`) only rows that
    // the full step would violate are considered and α ≤ 1.  For a ray
    // every row that `d` heads towards is considered.
    pub(super) fn ratio_test<T, D>(
        data: &D,
        iterate: &Iterate<T>,
        d: &[T],
        tol: T,
        to_point: bool,
    ) -> Option<(usize, T)>
    where
        T: FloatT,
        D: ProblemData<T>,
    {
        let mut best: Option<(usize, T)> = None;

        for i in 0..data.nineq() {
            if iterate.workingset.contains(i) {
                continue;
            }
            let gd = data.ineq_dot(i, d);
            let r = data.ineq_residual(i, &iterate.x);

            let candidate = if to_point {
                gd > T::zero() && r + gd > tol
            } else {
                gd > tol
            };
            if !candidate {
                continue;
            }

            let α = T::max(T::zero(), -r / gd);
            // strict comparison keeps the lowest index on ties
            if best.map_or(true, |(_, αbest)| α < αbest) {
                best = Some((i, α));
            }
        }

        if to_point {
            best.map(|(i, α)| (i, T::min(α, T::one())))
        } else {
            best
        }
    }
}

#[cfg(test)]
mod tests {
    use super::internal::phase_one_outcome;
    use super::SolverStatus;

    #[test]
    fn test_phase_one_outcome() {
        let tol = 1e-8;
        assert_eq!(phase_one_outcome(SolverStatus::Optimal, 0.0, tol), None);
        assert_eq!(
            phase_one_outcome(SolverStatus::Optimal, 0.5, tol),
            Some(SolverStatus::Infeasible)
        );
        assert_eq!(
            phase_one_outcome(SolverStatus::IterationLimitExceeded, 0.5, tol),
            Some(SolverStatus::IterationLimitExceeded)
        );
        // anything else is passed on rather than read as infeasibility
        assert_eq!(
            phase_one_outcome(SolverStatus::Unbounded, 0.5, tol),
            Some(SolverStatus::Unbounded)
        );
    }
}
