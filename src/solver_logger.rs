use std::io::{self, Write};

use crate::qubo_io::ReadSummary;
use crate::solver::SolverResult;
use crate::utils::get_current_time;

/// This is the main logic behind the solver output
///
/// It has varying levels of output, where 0 means nothing is displayed to the screen, and each
/// additional level includes everything previous
///
/// 0 - Nothing
/// 1 - Header, Result and Warnings
/// 2 - Each New Best Solution and the Number of Flips
///
pub struct SolverOutputLogger {
    pub output_level: usize,
}

impl SolverOutputLogger {
    pub const fn new(level: usize) -> Self {
        Self {
            output_level: level,
        }
    }

    pub fn output_header<W: Write>(
        &self,
        out: &mut W,
        filename: &str,
        num_x: usize,
        steps: usize,
    ) -> io::Result<()> {
        if self.output_level < 1 {
            return Ok(());
        }

        writeln!(out, "{filename}")?;
        writeln!(out, "N {num_x}, STEP {steps}")
    }

    pub fn output_read_warnings(&self, summary: &ReadSummary) {
        if self.output_level < 1 {
            return;
        }

        if summary.malformed_tokens > 0 {
            eprintln!(
                "Warning: {} malformed entries were read as 0",
                summary.malformed_tokens
            );
        }
        if summary.ignored_entries > 0 {
            eprintln!(
                "Warning: {} entries outside the {}x{} upper triangle were ignored",
                summary.ignored_entries, summary.num_x, summary.num_x
            );
        }
    }

    pub fn output_improvement<W: Write>(
        &self,
        out: &mut W,
        step: usize,
        value: i64,
    ) -> io::Result<()> {
        if self.output_level < 2 {
            return Ok(());
        }

        writeln!(out, "step {step}: new best {value}")
    }

    pub fn generate_exit_line<W: Write>(
        &self,
        out: &mut W,
        result: &SolverResult,
        time_start: f64,
    ) -> io::Result<()> {
        if self.output_level < 1 {
            return Ok(());
        }

        let best = result.best_solution_value;
        let verified = result.verified_value;
        let num_x = result.best_solution.len();
        let time_passed = get_current_time() - time_start;

        writeln!(out, "{best} (verification: {verified})")?;
        writeln!(out, "Solution bits (N={num_x}):")?;
        writeln!(out, "{}", result.best_solution)?;
        writeln!(out, "time = {time_passed:.6} sec.")?;

        if self.output_level >= 2 {
            writeln!(out, "flips = {} over {} steps", result.flips, result.steps)?;
        }

        if !result.is_verified() {
            eprintln!(
                "Warning: tracked energy {best} does not match the verified energy {verified}"
            );
        }
        Ok(())
    }
}
