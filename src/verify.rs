//! Direct evaluation of the QUBO objective.
//!
//! Nothing here touches the incremental delta bookkeeping, so the result can be used to cross-check
//! the energy the search reports.

use crate::bit_state::BitState;
use ndarray::{Array1, Array2};

/// Computes $\sum_i b_i x_i + \sum_{i<j} w_{ij} x_i x_j$ for the assignment `x`.
///
/// Runs in O(n^2) and only reads the upper triangle of `w`.
///
/// Example:
/// ```rust
/// use ndarray::{array, Array1};
/// use qubo_descent::bit_state::BitState;
/// use qubo_descent::verify::energy;
///
/// let b: Array1<i32> = array![1, 1];
/// let w = array![[0i16, -2], [-2, 0]];
/// let x = BitState::from_bits(&[1, 1]);
/// assert_eq!(energy(&b, &x, &w), 0);
/// ```
pub fn energy(b: &Array1<i32>, x: &BitState, w: &Array2<i16>) -> i64 {
    let num_x = b.len();
    let mut e = 0i64;

    for i in 0..num_x {
        if x.get(i) == 0 {
            continue;
        }

        e += b[i] as i64;
        for j in (i + 1)..num_x {
            if x.get(j) == 1 {
                e += w[[i, j]] as i64;
            }
        }
    }

    e
}
