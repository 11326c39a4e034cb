//! # Greedy single flip descent
//!
//! Repeatedly applies the flip with the most negative delta until no flip improves the energy.
//! Each accepted flip strictly lowers the running energy, which is bounded below, so the descent
//! always ends in a single flip local minimum.

use crate::flip_state::FlipState;
use crate::qubo::Qubo;

/// Scans the deltas for the most improving flip. The first index attaining the minimum wins.
///
/// Returns `None` when there are no variables.
///
/// Example:
/// ```rust
/// use ndarray::array;
/// use qubo_descent::flip_state::FlipState;
/// use qubo_descent::local_search::find_best_flip;
/// use qubo_descent::qubo::Qubo;
///
/// let p = Qubo::from_raw(array![[3i16, 0, 0], [0, -2, 0], [0, 0, -2]]).unwrap();
/// let state = FlipState::new(&p);
/// assert_eq!(find_best_flip(&state), Some((1, -2)));
/// ```
pub fn find_best_flip(state: &FlipState) -> Option<(usize, i64)> {
    let mut best: Option<(usize, i64)> = None;
    for (v, &d) in state.delta_e.iter().enumerate() {
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((v, d)),
        }
    }
    best
}

/// Descends to a local minimum from the current state, returning the number of flips taken.
pub fn descend(state: &mut FlipState, qubo: &Qubo) -> usize {
    let mut flips = 0;

    while let Some((v, d)) = find_best_flip(state) {
        if d >= 0 {
            break;
        }

        let value_before = state.x.get(v);
        state.apply_flip(qubo, v, value_before);
        flips += 1;
    }

    flips
}

/// Returns true if no single flip lowers the energy.
pub fn is_local_minimum(state: &FlipState) -> bool {
    state.delta_e.iter().all(|&d| d >= 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perturbation::{perturb, HashSchedule};
    use ndarray::array;
    use smolprng::{JsfLarge, PRNG};

    #[test]
    fn test_ties_take_first_index() {
        let p = Qubo::from_raw(array![[-4i16, 0, 0], [0, -4, 0], [0, 0, -4]]).unwrap();
        let state = FlipState::new(&p);
        assert_eq!(find_best_flip(&state), Some((0, -4)));
    }

    #[test]
    fn test_empty_problem() {
        let p = Qubo::from_raw(ndarray::Array2::zeros((0, 0))).unwrap();
        let mut state = FlipState::new(&p);
        assert_eq!(find_best_flip(&state), None);
        assert_eq!(descend(&mut state, &p), 0);
    }

    #[test]
    fn test_single_variable() {
        let p = Qubo::from_raw(array![[-5i16]]).unwrap();
        let mut state = FlipState::new(&p);

        assert_eq!(descend(&mut state, &p), 1);
        assert_eq!(state.current_e, -5);
        assert_eq!(state.x.to_vec(), vec![1]);
        assert!(is_local_minimum(&state));
    }

    #[test]
    fn test_descent_is_monotone_and_ends_in_minimum() {
        let mut prng = PRNG {
            generator: JsfLarge::from(21u64),
        };
        let p = Qubo::make_random_qubo(80, &mut prng, 0.2);
        let mut state = FlipState::new(&p);

        for step in 0..20 {
            perturb(&mut state, &p, &HashSchedule, step);

            // step through the descent by hand to watch the energy
            let mut last_e = state.current_e;
            let mut flips = 0;
            while let Some((v, d)) = find_best_flip(&state) {
                if d >= 0 {
                    break;
                }
                state.flip(&p, v);
                assert!(state.current_e < last_e);
                last_e = state.current_e;
                flips += 1;
                assert!(flips <= 80 * 80 * 100, "descent failed to terminate");
            }

            assert!(is_local_minimum(&state));
            assert!(state.is_consistent(&p));
        }
    }

    #[test]
    fn test_descend_matches_brute_force_on_minimum() {
        let mut prng = PRNG {
            generator: JsfLarge::from(5u64),
        };
        let p = Qubo::make_random_qubo(12, &mut prng, 0.6);
        let mut state = FlipState::new(&p);
        descend(&mut state, &p);

        // no neighbour of the result is strictly better
        for v in 0..12 {
            let mut x = state.x.clone();
            x.flip(v);
            assert!(p.eval(&x) >= state.current_e);
        }
        assert_eq!(p.eval(&state.x), state.current_e);
    }
}
