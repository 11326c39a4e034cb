use crate::qubo_io::ParseMode;

/// Number of perturb + descend rounds when none is given.
pub const DEFAULT_STEPS: usize = 1000;

/// Options for the solver and the matrix reader
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolverOptions {
    pub steps: usize,
    pub verbose: usize,
    pub parse_mode: ParseMode,
}

impl SolverOptions {
    pub fn new() -> Self {
        Self {
            steps: DEFAULT_STEPS,
            verbose: 1,
            parse_mode: ParseMode::Permissive,
        }
    }

    /// Sets the step count from a command line string with `atoi` semantics: anything that does
    /// not start with an integer gives 0, and negative counts are clamped to 0.
    pub fn set_steps(&mut self, steps: Option<&str>) {
        if let Some(s) = steps {
            let parsed = crate::utils::parse_leading_int(s).unwrap_or(0);
            self.steps = usize::try_from(parsed).unwrap_or(0);
        }
    }

    pub fn set_parse_mode(&mut self, mode: Option<&str>) {
        if let Some(m) = mode {
            match m {
                "strict" | "Strict" => self.parse_mode = ParseMode::Strict,
                "permissive" | "Permissive" => self.parse_mode = ParseMode::Permissive,
                _ => {}
            }
        }
    }
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self::new()
    }
}
