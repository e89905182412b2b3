//! Bit vectors over GF(2) and arithmetic in `GF(2)[X] / (X^n - 1)`.
//!
//! Bit `i` is the coefficient of `X^i`. Bits past `len` in the last word are
//! always zero.

use rand::Rng;
use rand::seq::index;

use crate::hqc::CodeError;

const WORD_BITS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitVector {
    len: usize,
    words: Vec<u64>,
}

const fn word_count(len: usize) -> usize {
    len.div_ceil(WORD_BITS)
}

impl BitVector {
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self {
            len,
            words: vec![0; word_count(len)],
        }
    }

    /// Vector with ones exactly at `positions`.
    pub fn from_support(len: usize, positions: &[usize]) -> Result<Self, CodeError> {
        let mut vector = Self::zeros(len);
        for &position in positions {
            vector.set(position, true)?;
        }
        Ok(vector)
    }

    /// Uniformly random vector.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Self {
        let mut vector = Self {
            len,
            words: (0..word_count(len)).map(|_| rng.random()).collect(),
        };
        vector.clear_tail();
        vector
    }

    /// Random vector of Hamming weight exactly `weight`.
    pub fn random_fixed_weight<R: Rng + ?Sized>(
        rng: &mut R,
        len: usize,
        weight: usize,
    ) -> Result<Self, CodeError> {
        if weight > len {
            return Err(CodeError::WeightTooLarge { weight, len });
        }
        let positions = index::sample(rng, len, weight).into_vec();
        Self::from_support(len, &positions)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    pub fn get(&self, position: usize) -> Result<bool, CodeError> {
        self.check_index(position)?;
        Ok((self.words[position / WORD_BITS] >> (position % WORD_BITS)) & 1 == 1)
    }

    pub fn set(&mut self, position: usize, value: bool) -> Result<(), CodeError> {
        self.check_index(position)?;
        let mask = 1u64 << (position % WORD_BITS);
        if value {
            self.words[position / WORD_BITS] |= mask;
        } else {
            self.words[position / WORD_BITS] &= !mask;
        }
        Ok(())
    }

    fn flip_unchecked(&mut self, position: usize) {
        self.words[position / WORD_BITS] ^= 1u64 << (position % WORD_BITS);
    }

    /// Hamming weight.
    #[must_use]
    pub fn weight(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Positions of the set bits, ascending.
    #[must_use]
    pub fn support(&self) -> Vec<usize> {
        let mut positions = Vec::with_capacity(self.weight());
        for (i, &word) in self.words.iter().enumerate() {
            let mut rest = word;
            while rest != 0 {
                positions.push(i * WORD_BITS + rest.trailing_zeros() as usize);
                rest &= rest - 1;
            }
        }
        positions
    }

    /// Coefficient-wise sum.
    pub fn add(&self, other: &Self) -> Result<Self, CodeError> {
        self.check_same_len(other)?;
        Ok(Self {
            len: self.len,
            words: self
                .words
                .iter()
                .zip(&other.words)
                .map(|(a, b)| a ^ b)
                .collect(),
        })
    }

    /// Truncate or zero-extend to `len` bits.
    #[must_use]
    pub fn resize(&self, len: usize) -> Self {
        let mut words = self.words.clone();
        words.resize(word_count(len), 0);
        let mut resized = Self { len, words };
        resized.clear_tail();
        resized
    }

    /// Multiply by `X^shift` modulo `X^n - 1`.
    #[must_use]
    pub fn rotate(&self, shift: usize) -> Self {
        let mut rotated = Self::zeros(self.len);
        if self.len == 0 {
            return rotated;
        }
        let shift = shift % self.len;
        for position in self.support() {
            rotated.flip_unchecked((position + shift) % self.len);
        }
        rotated
    }

    /// Product with `self` as the sparse operand, modulo `X^n - 1`.
    pub fn mul_sparse(&self, dense: &Self) -> Result<Self, CodeError> {
        self.check_same_len(dense)?;
        let n = self.len;
        let mut product = Self::zeros(n);
        let dense_support = dense.support();
        for shift in self.support() {
            for &position in &dense_support {
                let target = position + shift;
                product.flip_unchecked(if target >= n { target - n } else { target });
            }
        }
        Ok(product)
    }

    fn check_index(&self, position: usize) -> Result<(), CodeError> {
        if position >= self.len {
            return Err(CodeError::IndexOutOfRange {
                index: position,
                len: self.len,
            });
        }
        Ok(())
    }

    fn check_same_len(&self, other: &Self) -> Result<(), CodeError> {
        if self.len != other.len {
            return Err(CodeError::LengthMismatch {
                expected: self.len,
                actual: other.len,
            });
        }
        Ok(())
    }

    fn clear_tail(&mut self) {
        let used = self.len % WORD_BITS;
        if used != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << used) - 1;
            }
        }
    }
}
