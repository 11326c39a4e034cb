use std::ffi::OsString;
use std::io::Write;

use anyhow::Result;
use clap::{arg, ArgMatches, Command};

use qubo_descent::qubo_io::read_qubo;
use qubo_descent::solver::FlipSolver;
use qubo_descent::solver_options::SolverOptions;

fn cli() -> Command {
    Command::new("solve")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Perturbed greedy descent for QUBO instances stored as packed upper triangular CSV")
        .arg(
            arg!(<MATRIX_FILE> "Path to the CSV file, N on the first line then one row per line")
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            // anything that is not a known flag reaches set_steps, so `-abc` runs 0 steps
            arg!([STEPS] "Number of perturb and descend rounds (default: 1000)")
                .value_parser(clap::value_parser!(String))
                .allow_hyphen_values(true),
        )
        .arg(
            arg!(--verbose <LEVEL> "Output level, 0 silent, 1 result, 2 every new best and flip count")
                .required(false)
                .value_parser(clap::value_parser!(usize))
                .default_value("1"),
        )
        .arg(arg!(--strict "Reject malformed or out of range matrix entries instead of reading them as 0"))
}

fn main() {
    let stdout = std::io::stdout();
    let code = run_cli(std::env::args_os(), &mut stdout.lock());
    std::process::exit(code);
}

/// Parses the arguments, runs the solver and returns the process exit code: 0 on success (and
/// for `--help`/`--version`), 1 on usage or input errors.
fn run_cli<I, T, W>(args: I, out: &mut W) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    W: Write,
{
    let matches = match cli().try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(e) => {
            if e.use_stderr() {
                eprint!("{}", e.render());
                return 1;
            }
            // help and version text go to stdout, a failed write there is still a failure
            return match write!(out, "{}", e.render()) {
                Ok(()) => 0,
                Err(_) => 1,
            };
        }
    };

    match run(&matches, out) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {e:#}");
            1
        }
    }
}

fn options_from_matches(matches: &ArgMatches) -> SolverOptions {
    let mut options = SolverOptions::new();
    options.set_steps(matches.get_one::<String>("STEPS").map(String::as_str));
    if let Some(level) = matches.get_one::<usize>("verbose") {
        options.verbose = *level;
    }
    options.set_parse_mode(matches.get_flag("strict").then_some("strict"));
    options
}

fn run<W: Write>(matches: &ArgMatches, out: &mut W) -> Result<()> {
    let filename = matches
        .get_one::<String>("MATRIX_FILE")
        .cloned()
        .unwrap_or_default();
    let options = options_from_matches(matches);

    let (qubo, summary) = read_qubo(&filename, options.parse_mode)?;
    let num_x = qubo.num_x();
    let steps = options.steps;

    let mut solver = FlipSolver::new(qubo, options);
    solver.solver_logger.output_read_warnings(&summary);
    solver
        .solver_logger
        .output_header(out, &filename, num_x, steps)?;
    out.flush()?;

    let result = solver.solve();
    solver
        .solver_logger
        .generate_exit_line(out, &result, solver.time_start)?;
    out.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qubo_descent::qubo_io::ParseMode;
    use std::path::PathBuf;

    /// Writes `contents` to a file in the temp directory, unique per test name.
    fn instance_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "qubo_descent_cli_{}_{}.csv",
            std::process::id(),
            name
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn run_args(args: &[&str]) -> (i32, Vec<String>) {
        let mut out = Vec::new();
        let code = run_cli(args.iter().copied(), &mut out);
        let lines = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect();
        (code, lines)
    }

    fn matches_for(args: &[&str]) -> ArgMatches {
        cli().try_get_matches_from(args.iter().copied()).unwrap()
    }

    #[test]
    fn test_options_mapping() {
        let options = options_from_matches(&matches_for(&["solve", "f.csv"]));
        assert_eq!(options, SolverOptions::new());

        let options = options_from_matches(&matches_for(&[
            "solve", "f.csv", "12abc", "--strict", "--verbose", "2",
        ]));
        assert_eq!(options.steps, 12);
        assert_eq!(options.verbose, 2);
        assert_eq!(options.parse_mode, ParseMode::Strict);
    }

    #[test]
    fn test_hyphen_step_values_run_zero_steps() {
        for steps in ["-abc", "-5x", "--x", "-3"] {
            let options = options_from_matches(&matches_for(&["solve", "f.csv", steps]));
            assert_eq!(options.steps, 0, "steps argument {steps}");
        }

        let path = instance_file("hyphen", "2\n1,-2\n1\n");
        let path = path.to_str().unwrap();
        for steps in ["-abc", "-5x", "--x"] {
            let (code, lines) = run_args(&["solve", path, steps]);
            assert_eq!(code, 0, "steps argument {steps}");
            assert_eq!(lines[1], "N 2, STEP 0");
        }
    }

    #[test]
    fn test_wrong_argument_count() {
        assert_eq!(run_args(&["solve"]).0, 1);
        assert_eq!(run_args(&["solve", "a.csv", "10", "extra"]).0, 1);
    }

    #[test]
    fn test_help_exits_zero() {
        let (code, lines) = run_args(&["solve", "--help"]);
        assert_eq!(code, 0);
        assert!(lines.iter().any(|line| line.contains("MATRIX_FILE")));
    }

    #[test]
    fn test_unreadable_file() {
        let missing = std::env::temp_dir().join("qubo_descent_cli_does_not_exist.csv");
        let (code, lines) = run_args(&["solve", missing.to_str().unwrap()]);
        assert_eq!(code, 1);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_invalid_n() {
        for (name, contents) in [("zero_n", "0\n"), ("negative_n", "-2\n1\n"), ("empty", "")] {
            let path = instance_file(name, contents);
            let (code, lines) = run_args(&["solve", path.to_str().unwrap(), "5"]);
            assert_eq!(code, 1, "{name}");
            assert!(lines.is_empty());
        }
    }

    #[test]
    fn test_strict_rejects_malformed_entries() {
        let path = instance_file("strict", "2\nfoo,7\n1\n");
        let path = path.to_str().unwrap();
        assert_eq!(run_args(&["solve", path, "5"]).0, 0);
        assert_eq!(run_args(&["solve", path, "5", "--strict"]).0, 1);
    }

    #[test]
    fn test_successful_run_output() {
        let path = instance_file("success", "2\n1,-3\n1\n");
        let path = path.to_str().unwrap();
        let (code, lines) = run_args(&["solve", path, "3"]);

        assert_eq!(code, 0);
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], path);
        assert_eq!(lines[1], "N 2, STEP 3");
        assert_eq!(lines[2], "-1 (verification: -1)");
        assert_eq!(lines[3], "Solution bits (N=2):");
        assert_eq!(lines[4], "11");
        assert!(lines[5].starts_with("time = "));
        assert!(lines[5].ends_with(" sec."));
    }

    #[test]
    fn test_silent_run() {
        let path = instance_file("silent", "1\n-5\n");
        let (code, lines) = run_args(&["solve", path.to_str().unwrap(), "--verbose", "0"]);
        assert_eq!(code, 0);
        assert!(lines.is_empty());
    }
}
