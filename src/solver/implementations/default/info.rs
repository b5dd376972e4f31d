use super::*;
use crate::algebra::*;
use crate::io::PrintTarget;
use crate::solver::core::{
    traits::{Info, ProblemData},
    workingset::Iterate,
    SolvePhase, SolverStatus, StepAction,
};
use crate::timers::*;

/// Standard-form solver type implementing the [`Info`](crate::solver::core::traits::Info) and [`InfoPrint`](crate::solver::core::traits::InfoPrint) traits

#[derive(Default, Debug, Clone)]
pub struct DefaultInfo<T> {
    pub phase: SolvePhase,
    /// iterations over both phases
    pub iterations: u32,
    pub phase_one_iterations: u32,
    /// objective of the problem in the current phase
    pub objective: T,
    pub max_violation: T,
    pub step_length: T,
    pub working_set_size: usize,
    pub action: StepAction,

    pub solve_time: f64,
    pub status: SolverStatus,

    // target stream for printing
    pub(crate) stream: PrintTarget,
}

impl<T> DefaultInfo<T>
where
    T: FloatT,
{
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T> Info<T> for DefaultInfo<T>
where
    T: FloatT,
{
    fn reset(&mut self, timers: &mut Timers) {
        self.status = SolverStatus::Unsolved;
        self.phase = SolvePhase::Two;
        self.iterations = 0;
        self.phase_one_iterations = 0;
        self.action = StepAction::None;
        self.step_length = T::zero();
        self.solve_time = 0f64;

        timers.reset_timer("solve");
    }

    fn update(
        &mut self,
        data: &DefaultProblemData<T>,
        iterate: &Iterate<T>,
        phase: SolvePhase,
        iterations: u32,
        action: StepAction,
        α: T,
    ) {
        self.phase = phase;
        self.iterations = iterations;
        if phase == SolvePhase::One {
            self.phase_one_iterations = iterations;
        }
        self.objective = data.objective(&iterate.x);
        self.max_violation = data.max_violation(&iterate.x);
        self.step_length = α;
        self.working_set_size = iterate.workingset.len();
        self.action = action;
    }

    fn finalize(
        &mut self,
        data: &DefaultProblemData<T>,
        iterate: &Iterate<T>,
        timers: &mut Timers,
    ) {
        // final values refer to the original problem even when
        // the solve stopped in phase one
        self.objective = data.objective(&iterate.x);
        self.max_violation = data.max_violation(&iterate.x);
        self.solve_time = timers.elapsed(&["solve"]).as_secs_f64();
    }

    fn get_status(&self) -> SolverStatus {
        self.status
    }

    fn set_status(&mut self, status: SolverStatus) {
        self.status = status;
    }
}
