//! The integer QUBO model: a bias per variable and a symmetric pairwise weight matrix.
//!
//! The objective is $E(x) = \sum_i b_i x_i + \sum_{i<j} w_{ij} x_i x_j$ with $x \in \{0, 1\}^n$.
//! The raw coefficient matrix carries the linear terms on its diagonal; on construction they are
//! moved into `b` and the diagonal of `w` is zeroed, which is the form the flip bookkeeping needs.

use anyhow::{bail, Result};
use ndarray::{Array1, Array2};
use smolprng::{Algorithm, PRNG};
use sprs::{CsMat, TriMat};

use crate::bit_state::BitState;
use crate::verify;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Qubo {
    w: Array2<i16>,
    b: Array1<i32>,
}

impl Qubo {
    /// Builds the model from a raw symmetric coefficient matrix, extracting its diagonal as the bias.
    ///
    /// # Errors
    ///
    /// Fails if the matrix is not square or not symmetric.
    pub fn from_raw(q: Array2<i16>) -> Result<Self> {
        let (rows, cols) = q.dim();
        if rows != cols {
            bail!("coefficient matrix must be square, got {rows}x{cols}");
        }
        if let Some((i, j)) = find_asymmetry(&q) {
            bail!("coefficient matrix is not symmetric at ({i}, {j})");
        }

        Ok(split_diagonal(q))
    }

    /// Builds the model from an already split weight matrix and bias vector.
    ///
    /// # Errors
    ///
    /// Fails if the shapes disagree, `w` is not symmetric or `w` has a non-zero diagonal.
    pub fn new_with_b(w: Array2<i16>, b: Array1<i32>) -> Result<Self> {
        let (rows, cols) = w.dim();
        if rows != cols || rows != b.len() {
            bail!(
                "weight matrix is {rows}x{cols} but the bias has {} entries",
                b.len()
            );
        }
        if let Some((i, j)) = find_asymmetry(&w) {
            bail!("weight matrix is not symmetric at ({i}, {j})");
        }
        if let Some(i) = (0..rows).find(|&i| w[[i, i]] != 0) {
            bail!("weight matrix has a non-zero diagonal at {i}");
        }

        Ok(Self { w, b })
    }

    /// Builds the model from a sparse raw coefficient matrix, see [`Qubo::from_raw`].
    ///
    /// # Errors
    ///
    /// Fails if the matrix is not square or not symmetric.
    pub fn from_sparse(q: &CsMat<i16>) -> Result<Self> {
        if q.rows() != q.cols() {
            bail!(
                "coefficient matrix must be square, got {}x{}",
                q.rows(),
                q.cols()
            );
        }
        Self::from_raw(dense_from_sparse(q))
    }

    /// Generates a random symmetric instance, with each upper triangular entry present with
    /// probability `sparsity` and drawn from [-100, 100].
    pub fn make_random_qubo<T: Algorithm>(num_x: usize, prng: &mut PRNG<T>, sparsity: f64) -> Self {
        let mut q = TriMat::<i16>::new((num_x, num_x));
        for i in 0..num_x {
            for j in i..num_x {
                if prng.gen_f64() < sparsity {
                    let value = (prng.gen_u64() % 201) as i16 - 100;
                    q.add_triplet(i, j, value);
                    if i != j {
                        q.add_triplet(j, i, value);
                    }
                }
            }
        }

        split_diagonal(dense_from_sparse(&q.to_csr()))
    }

    pub fn num_x(&self) -> usize {
        self.b.len()
    }

    /// Pairwise weights, symmetric with a zero diagonal.
    pub fn w(&self) -> &Array2<i16> {
        &self.w
    }

    /// Linear coefficients, the diagonal of the raw matrix.
    pub fn b(&self) -> &Array1<i32> {
        &self.b
    }

    /// The raw coefficient at (i, j), the bias on the diagonal and the weight elsewhere.
    pub fn raw_entry(&self, i: usize, j: usize) -> i32 {
        if i == j {
            self.b[i]
        } else {
            self.w[[i, j]] as i32
        }
    }

    /// Evaluates the objective directly at `x`.
    pub fn eval(&self, x: &BitState) -> i64 {
        verify::energy(&self.b, x, &self.w)
    }

    /// Returns the raw coefficient matrix in sparse form, bias on the diagonal. Biases that do not
    /// fit in 16 bits are saturated.
    pub fn to_sparse(&self) -> CsMat<i16> {
        let num_x = self.num_x();
        let mut q = TriMat::<i16>::new((num_x, num_x));
        for i in 0..num_x {
            let bias = self.b[i].clamp(i16::MIN as i32, i16::MAX as i32) as i16;
            if bias != 0 {
                q.add_triplet(i, i, bias);
            }
            for j in 0..num_x {
                if i != j && self.w[[i, j]] != 0 {
                    q.add_triplet(i, j, self.w[[i, j]]);
                }
            }
        }
        q.to_csr()
    }
}

fn dense_from_sparse(q: &CsMat<i16>) -> Array2<i16> {
    let mut dense = Array2::<i16>::zeros((q.rows(), q.cols()));
    for (&value, (i, j)) in q.iter() {
        dense[[i, j]] = value;
    }
    dense
}

/// Moves the diagonal into the bias and zeroes it. Assumes `q` is square.
fn split_diagonal(mut q: Array2<i16>) -> Qubo {
    let num_x = q.nrows();
    let mut b = Array1::<i32>::zeros(num_x);
    for i in 0..num_x {
        b[i] = q[[i, i]] as i32;
        q[[i, i]] = 0;
    }
    Qubo { w: q, b }
}

fn find_asymmetry(q: &Array2<i16>) -> Option<(usize, usize)> {
    let n = q.nrows();
    for i in 0..n {
        for j in (i + 1)..n {
            if q[[i, j]] != q[[j, i]] {
                return Some((i, j));
            }
        }
    }
    None
}
