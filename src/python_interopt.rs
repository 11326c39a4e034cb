//! Acts as the interface to rust code from python. Supports reading and writing instances in the CSV
//! format and running the perturb and descend solver on them.
use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;
use sprs::TriMat;

use crate::qubo::Qubo;
use crate::qubo_io::{self, ParseMode};
use crate::solver::FlipSolver;
use crate::solver_options::SolverOptions;

// type alias for the qubo data object from python: row indices, column indices, raw coefficients
// (linear terms on the diagonal) and the number of variables
type QuboData = (Vec<usize>, Vec<usize>, Vec<i16>, usize);

fn qubo_from_data(problem: QuboData) -> PyResult<Qubo> {
    let (i_indexs, j_indexs, q_values, num_x) = problem;

    if i_indexs.len() != j_indexs.len() || i_indexs.len() != q_values.len() {
        return Err(PyValueError::new_err(
            "index and value lists must have the same length",
        ));
    }

    let mut q = TriMat::new((num_x, num_x));
    for ((&i, &j), &value) in i_indexs.iter().zip(&j_indexs).zip(&q_values) {
        if i >= num_x || j >= num_x {
            return Err(PyValueError::new_err(format!(
                "entry ({i}, {j}) is outside a problem with {num_x} variables"
            )));
        }
        q.add_triplet(i, j, value);
    }

    Qubo::from_sparse(&q.to_csr()).map_err(|e| PyValueError::new_err(e.to_string()))
}

fn qubo_to_data(qubo: &Qubo) -> QuboData {
    let mut i_indexs = Vec::new();
    let mut j_indexs = Vec::new();
    let mut q_values = Vec::new();

    for (&value, (i, j)) in qubo.to_sparse().iter() {
        i_indexs.push(i);
        j_indexs.push(j);
        q_values.push(value);
    }

    (i_indexs, j_indexs, q_values, qubo.num_x())
}

/// This reads in the QUBO from a packed upper triangular CSV file
///
/// Example
/// ``` python
/// import qubo_descent
///
/// # read in the QUBO from a file
/// p = qubo_descent.read_qubo("file.csv")
/// ```
/// # Errors
///
/// Raises an IOError if the file cannot be read or is not a valid instance
#[pyfunction]
#[pyo3(signature = (filename, strict=false))]
pub fn read_qubo(filename: String, strict: bool) -> PyResult<QuboData> {
    let mode = match strict {
        true => ParseMode::Strict,
        false => ParseMode::Permissive,
    };

    let (p, _) = qubo_io::read_qubo(filename.as_str(), mode)
        .map_err(|e| PyIOError::new_err(format!("{e:#}")))?;

    Ok(qubo_to_data(&p))
}

/// This writes the QUBO to a packed upper triangular CSV file
///
/// Example
/// ``` python
/// import qubo_descent
///
/// p = qubo_descent.read_qubo("file.csv")
/// qubo_descent.write_qubo(p, "copy.csv")
/// ```
/// # Errors
///
/// Raises a ValueError if the problem is malformed and an IOError if the file cannot be written
#[pyfunction]
#[pyo3(signature = (problem, filename,))]
pub fn write_qubo(problem: QuboData, filename: String) -> PyResult<()> {
    let p = qubo_from_data(problem)?;

    qubo_io::write_qubo(&p, filename.as_str()).map_err(|e| PyIOError::new_err(format!("{e:#}")))
}

/// This solves the QUBO with perturbation and greedy descent, returns the best solution found, its
/// tracked energy and its directly evaluated energy.
///
/// Example
/// ``` python
/// import qubo_descent
///
/// problem = qubo_descent.read_qubo("file.csv")
/// x, obj, verified = qubo_descent.solve(problem, 1000)
/// ```
/// # Errors
///
/// Raises a ValueError if the problem is malformed
#[pyfunction]
#[pyo3(signature = (problem, steps=1000))]
pub fn solve(problem: QuboData, steps: usize) -> PyResult<(Vec<usize>, i64, i64)> {
    let p = qubo_from_data(problem)?;

    let options = SolverOptions {
        steps,
        verbose: 0,
        ..SolverOptions::new()
    };

    let result = FlipSolver::new(p, options).solve();

    Ok((
        result.best_solution.to_vec(),
        result.best_solution_value,
        result.verified_value,
    ))
}

#[pymodule]
fn qubo_descent(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(read_qubo, m)?)?;
    m.add_function(wrap_pyfunction!(write_qubo, m)?)?;
    m.add_function(wrap_pyfunction!(solve, m)?)?;
    Ok(())
}
