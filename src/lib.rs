//! # qubo_descent
//!
//! A heuristic solver for integer QUBO instances,
//! $\min_{x \in \{0,1\}^n} \sum_i b_i x_i + \sum_{i<j} w_{ij} x_i x_j$.
//!
//! The search alternates a deterministic hash driven perturbation with a greedy single flip descent,
//! keeping the best assignment seen. Per-variable flip deltas are maintained incrementally so each
//! flip costs O(n), and the final energy is checked against a direct evaluation.
//!
//! ```rust
//! use ndarray::array;
//! use qubo_descent::qubo::Qubo;
//! use qubo_descent::solver::FlipSolver;
//! use qubo_descent::solver_options::SolverOptions;
//!
//! let p = Qubo::from_raw(array![[-5i16, 2], [2, 1]]).unwrap();
//! let mut options = SolverOptions::new();
//! options.verbose = 0;
//!
//! let result = FlipSolver::new(p, options).solve();
//! assert_eq!(result.best_solution_value, -5);
//! assert!(result.is_verified());
//! ```

pub mod bit_state;
pub mod flip_state;
pub mod local_search;
pub mod perturbation;
pub mod qubo;
pub mod qubo_io;
pub mod solver;
pub mod solver_logger;
pub mod solver_options;
pub mod utils;
pub mod verify;

#[cfg(feature = "python")]
pub mod python_interopt;
