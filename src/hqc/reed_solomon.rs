//! Shortened Reed-Solomon code over GF(2^8).
//!
//! Codewords are laid out parity first: `c = (parity[0..2δ], message[0..k])`,
//! read as the polynomial `c(x) = Σ c_j x^j`. The generator is
//! `g(x) = Π_{i=1..2δ} (x - α^i)`, so every codeword vanishes at `α^1..α^2δ`.

use crate::hqc::gf;
use crate::hqc::params::VariantParams;
use crate::hqc::CodeError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReedSolomon {
    n1: usize,
    k: usize,
    delta: usize,
    /// Coefficients of `g`, lowest degree first; monic of degree `2δ`.
    generator: Vec<u8>,
}

impl ReedSolomon {
    /// Build a code of length `n1`, dimension `k` correcting `delta` errors.
    pub fn new(n1: usize, k: usize, delta: usize) -> Result<Self, CodeError> {
        if n1 > gf::ORDER {
            return Err(CodeError::InvalidParameters(format!(
                "length {n1} exceeds {}",
                gf::ORDER
            )));
        }
        if k == 0 || k >= n1 || n1 - k != 2 * delta {
            return Err(CodeError::InvalidParameters(format!(
                "n1={n1}, k={k}, delta={delta} do not satisfy n1 - k = 2 * delta"
            )));
        }
        Ok(Self {
            n1,
            k,
            delta,
            generator: generator_poly(2 * delta),
        })
    }

    pub fn for_params(params: &VariantParams) -> Result<Self, CodeError> {
        Self::new(params.n1, params.k, params.delta)
    }

    #[must_use]
    pub const fn n1(&self) -> usize {
        self.n1
    }

    #[must_use]
    pub const fn k(&self) -> usize {
        self.k
    }

    #[must_use]
    pub const fn delta(&self) -> usize {
        self.delta
    }

    #[must_use]
    pub const fn parity_len(&self) -> usize {
        2 * self.delta
    }

    #[must_use]
    pub fn generator(&self) -> &[u8] {
        &self.generator
    }

    /// Systematic encoding: the parity is `x^2δ · m(x) mod g(x)`.
    pub fn encode(&self, message: &[u8]) -> Result<Vec<u8>, CodeError> {
        if message.len() != self.k {
            return Err(CodeError::LengthMismatch {
                expected: self.k,
                actual: message.len(),
            });
        }

        let r = self.parity_len();
        let mut parity = vec![0u8; r];
        for &symbol in message.iter().rev() {
            let feedback = gf::add(symbol, parity[r - 1]);
            for j in (1..r).rev() {
                parity[j] = gf::add(parity[j - 1], gf::mul(feedback, self.generator[j]));
            }
            parity[0] = gf::mul(feedback, self.generator[0]);
        }

        let mut codeword = parity;
        codeword.extend_from_slice(message);
        Ok(codeword)
    }

    /// The `2δ` syndromes `S_i = c(α^i)`, `i = 1..=2δ`.
    pub fn syndromes(&self, codeword: &[u8]) -> Result<Vec<u8>, CodeError> {
        if codeword.len() != self.n1 {
            return Err(CodeError::LengthMismatch {
                expected: self.n1,
                actual: codeword.len(),
            });
        }
        Ok((1..=self.parity_len())
            .map(|i| evaluate(codeword, gf::exp(i)))
            .collect())
    }

    /// True when every syndrome is zero.
    pub fn is_codeword(&self, word: &[u8]) -> Result<bool, CodeError> {
        Ok(self.syndromes(word)?.iter().all(|&s| s == 0))
    }

    /// Message part of a systematic codeword.
    pub fn message<'a>(&self, codeword: &'a [u8]) -> Result<&'a [u8], CodeError> {
        if codeword.len() != self.n1 {
            return Err(CodeError::LengthMismatch {
                expected: self.n1,
                actual: codeword.len(),
            });
        }
        Ok(&codeword[self.parity_len()..])
    }
}

/// `Π_{i=1..degree} (x + α^i)`, lowest degree first.
fn generator_poly(degree: usize) -> Vec<u8> {
    let mut poly = vec![1u8];
    for i in 1..=degree {
        let root = gf::exp(i);
        let mut next = vec![0u8; poly.len() + 1];
        for (j, &coeff) in poly.iter().enumerate() {
            next[j] = gf::add(next[j], gf::mul(coeff, root));
            next[j + 1] = gf::add(next[j + 1], coeff);
        }
        poly = next;
    }
    poly
}

/// Horner evaluation of a polynomial given lowest degree first.
#[must_use]
pub fn evaluate(poly: &[u8], x: u8) -> u8 {
    poly.iter()
        .rev()
        .fold(0u8, |acc, &coeff| gf::add(gf::mul(acc, x), coeff))
}
