//! Packed storage for a binary assignment.
//!
//! Variable `i` lives in word `i >> 5` at bit `i & 31`. Access is O(1) and no bounds checks beyond
//! the slice index are performed; callers are expected to keep `i < len()`.

use std::fmt;

const WORD_BITS: usize = 32;

/// An N-bit assignment vector backed by 32-bit words.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitState {
    words: Vec<u32>,
    num_bits: usize,
}

impl BitState {
    /// Creates the all-zero assignment of `num_bits` variables.
    pub fn new(num_bits: usize) -> Self {
        let num_words = num_bits.div_ceil(WORD_BITS);
        Self {
            words: vec![0u32; num_words],
            num_bits,
        }
    }

    /// Builds a state from a 0/1 slice, anything non-zero is read as 1.
    pub fn from_bits(bits: &[usize]) -> Self {
        let mut x = Self::new(bits.len());
        for (i, &b) in bits.iter().enumerate() {
            if b != 0 {
                x.flip(i);
            }
        }
        x
    }

    #[inline]
    pub fn get(&self, i: usize) -> usize {
        debug_assert!(i < self.num_bits);
        ((self.words[i >> 5] >> (i & 31)) & 1u32) as usize
    }

    #[inline]
    pub fn flip(&mut self, i: usize) {
        debug_assert!(i < self.num_bits);
        self.words[i >> 5] ^= 1u32 << (i & 31);
    }

    pub fn len(&self) -> usize {
        self.num_bits
    }

    pub fn is_empty(&self) -> bool {
        self.num_bits == 0
    }

    /// Number of variables set to 1.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn to_vec(&self) -> Vec<usize> {
        (0..self.num_bits).map(|i| self.get(i)).collect()
    }
}

/// Renders the assignment as a single line of `0`/`1`, variable 0 first.
impl fmt::Display for BitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line: String = (0..self.num_bits)
            .map(|i| if self.get(i) == 1 { '1' } else { '0' })
            .collect();
        f.write_str(&line)
    }
}
