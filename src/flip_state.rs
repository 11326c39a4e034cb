//! The mutable search state: the assignment, the per-variable flip deltas, and the running energy.
//!
//! `delta_e[v]` always holds the change in energy that flipping `v` alone would cause from the
//! current assignment, so every flip can be applied in O(n) without evaluating the objective.

use ndarray::Array1;

use crate::bit_state::BitState;
use crate::qubo::Qubo;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlipState {
    pub x: BitState,
    pub delta_e: Array1<i64>,
    pub current_e: i64,
}

impl FlipState {
    /// The all-zero assignment. Its energy is 0 and flipping `v` costs exactly `b[v]`.
    pub fn new(qubo: &Qubo) -> Self {
        Self {
            x: BitState::new(qubo.num_x()),
            delta_e: qubo.b().mapv(|b| b as i64),
            current_e: 0,
        }
    }

    /// Builds the state for an arbitrary assignment, computing every delta directly.
    pub fn from_assignment(qubo: &Qubo, x: BitState) -> Self {
        let delta_e = Array1::from_shape_fn(qubo.num_x(), |v| recompute_delta(qubo, &x, v));
        let current_e = qubo.eval(&x);
        Self {
            x,
            delta_e,
            current_e,
        }
    }

    pub fn num_x(&self) -> usize {
        self.x.len()
    }

    /// Flips `target`, whose value before the call must be `value_before`, updating the deltas of
    /// every variable and the running energy.
    ///
    /// Flipping `target` changes its pairwise term with each `v` by `w[target][v]`, with a sign
    /// given by whether `v` agrees with the old value of `target`. The diagonal of `w` is zero so
    /// the loop leaves `delta_e[target]` alone; that entry is the energy actually realized and is
    /// negated afterwards, since flipping back undoes it.
    pub fn apply_flip(&mut self, qubo: &Qubo, target: usize, value_before: usize) {
        debug_assert_eq!(self.x.get(target), value_before);

        let row = qubo.w().row(target);
        for (v, &w_tv) in row.iter().enumerate() {
            let sgn = 1 - 2 * ((value_before ^ self.x.get(v)) as i64);
            self.delta_e[v] += sgn * w_tv as i64;
        }

        self.current_e += self.delta_e[target];
        self.delta_e[target] = -self.delta_e[target];
        self.x.flip(target);
    }

    /// Flips `target` from whatever value it currently holds.
    pub fn flip(&mut self, qubo: &Qubo, target: usize) {
        let value_before = self.x.get(target);
        self.apply_flip(qubo, target, value_before);
    }

    /// Checks every delta and the running energy against a direct evaluation. O(n^2).
    pub fn is_consistent(&self, qubo: &Qubo) -> bool {
        self.current_e == qubo.eval(&self.x)
            && (0..self.num_x()).all(|v| self.delta_e[v] == recompute_delta(qubo, &self.x, v))
    }
}

/// The energy change of flipping `v` alone at `x`, computed from scratch in O(n).
pub fn recompute_delta(qubo: &Qubo, x: &BitState, v: usize) -> i64 {
    let field: i64 = qubo.b()[v] as i64
        + qubo
            .w()
            .row(v)
            .iter()
            .enumerate()
            .filter(|(j, _)| x.get(*j) == 1)
            .map(|(_, &w)| w as i64)
            .sum::<i64>();

    match x.get(v) {
        0 => field,
        _ => -field,
    }
}
