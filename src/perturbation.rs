//! Deterministic perturbation used to kick the search out of its current local minimum.
//!
//! Which variables get flipped at a given outer step is a pure function of the variable index and
//! the step, so two runs with the same instance and step count visit exactly the same states.

use crate::flip_state::FlipState;
use crate::qubo::Qubo;

/// Decides which variables are flipped during the perturbation at a given outer step.
pub trait PerturbationSchedule {
    fn should_flip(&self, var: usize, step: usize) -> bool;
}

/// Flips `var` when the low bit of `hash_u32(var + step)` is set.
#[derive(Clone, Copy, Debug, Default)]
pub struct HashSchedule;

impl PerturbationSchedule for HashSchedule {
    fn should_flip(&self, var: usize, step: usize) -> bool {
        let key = (var as u32).wrapping_add(step as u32);
        hash_u32(key) & 1 == 1
    }
}

/// Integer mixing hash, all arithmetic wraps at 32 bits.
pub const fn hash_u32(x: u32) -> u32 {
    let x = ((x >> 16) ^ x).wrapping_mul(0x45d9_f3b);
    let x = ((x >> 16) ^ x).wrapping_mul(0x45d9_f3b);
    (x >> 16) ^ x
}

/// Flips every variable the schedule selects for `step`, in index order and regardless of the
/// energy change. Returns the number of flips applied.
pub fn perturb<S: PerturbationSchedule>(
    state: &mut FlipState,
    qubo: &Qubo,
    schedule: &S,
    step: usize,
) -> usize {
    let mut flips = 0;
    for i in 0..state.num_x() {
        if schedule.should_flip(i, step) {
            let value_before = state.x.get(i);
            state.apply_flip(qubo, i, value_before);
            flips += 1;
        }
    }
    flips
}
