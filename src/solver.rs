//! The outer loop: perturb, descend, and keep the best assignment seen.

use crate::bit_state::BitState;
use crate::flip_state::FlipState;
use crate::local_search::descend;
use crate::perturbation::{perturb, HashSchedule, PerturbationSchedule};
use crate::qubo::Qubo;
use crate::solver_logger::SolverOutputLogger;
use crate::solver_options::SolverOptions;
use crate::utils::get_current_time;
use crate::verify;

/// Struct for the perturb and descend solver
pub struct FlipSolver<S: PerturbationSchedule = HashSchedule> {
    pub qubo: Qubo,
    pub state: FlipState,
    pub best_solution: BitState,
    pub best_solution_value: i64,
    pub steps_run: usize,
    pub flips_applied: usize,
    pub time_start: f64,
    pub schedule: S,
    pub options: SolverOptions,
    pub solver_logger: SolverOutputLogger,
}

/// The outcome of a run, with the best energy checked against a direct evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolverResult {
    pub best_solution: BitState,
    pub best_solution_value: i64,
    pub verified_value: i64,
    pub steps: usize,
    pub flips: usize,
}

impl SolverResult {
    /// True when the incrementally tracked energy agrees with the direct evaluation.
    pub fn is_verified(&self) -> bool {
        self.best_solution_value == self.verified_value
    }
}

impl FlipSolver<HashSchedule> {
    /// Creates a solver starting from the all-zero assignment, which is also the initial best.
    pub fn new(qubo: Qubo, options: SolverOptions) -> Self {
        Self::with_schedule(qubo, options, HashSchedule)
    }
}

impl<S: PerturbationSchedule> FlipSolver<S> {
    pub fn with_schedule(qubo: Qubo, options: SolverOptions, schedule: S) -> Self {
        let num_x = qubo.num_x();
        let state = FlipState::new(&qubo);
        let output_level = options.verbose;

        Self {
            qubo,
            state,
            best_solution: BitState::new(num_x),
            best_solution_value: 0,
            steps_run: 0,
            flips_applied: 0,
            time_start: get_current_time(),
            schedule,
            options,
            solver_logger: SolverOutputLogger::new(output_level),
        }
    }

    /// Runs one perturb and descend round with the given step index, updating the best solution
    /// on strict improvement.
    pub fn step(&mut self, step: usize) {
        self.flips_applied += perturb(&mut self.state, &self.qubo, &self.schedule, step);
        self.flips_applied += descend(&mut self.state, &self.qubo);
        self.steps_run += 1;

        if self.state.current_e < self.best_solution_value {
            self.best_solution = self.state.x.clone();
            self.best_solution_value = self.state.current_e;
            let logged = self.solver_logger.output_improvement(
                &mut std::io::stdout(),
                step,
                self.best_solution_value,
            );
            if let Err(e) = logged {
                eprintln!("Warning: failed to report step {step}: {e}");
            }
        }
    }

    /// The main solve function, runs `options.steps` rounds and verifies the best energy.
    pub fn solve(&mut self) -> SolverResult {
        self.time_start = get_current_time();

        for step in 0..self.options.steps {
            self.step(step);
        }

        let verified_value = verify::energy(self.qubo.b(), &self.best_solution, self.qubo.w());

        SolverResult {
            best_solution: self.best_solution.clone(),
            best_solution_value: self.best_solution_value,
            verified_value,
            steps: self.steps_run,
            flips: self.flips_applied,
        }
    }
}
