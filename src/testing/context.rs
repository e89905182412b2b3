//! Per-invocation fixture handed to test actions.

use rand::SeedableRng;
use rand::rngs::StdRng;

/// Fresh state for one invocation of a test action.
///
/// Every invocation gets its own context; nothing in it survives into the
/// next case or the next iteration.
#[derive(Debug)]
pub struct CaseContext {
    path: String,
    seed: u64,
    iteration: u32,
    rng: StdRng,
}

impl CaseContext {
    pub fn new(path: impl Into<String>, seed: u64, iteration: u32) -> Self {
        Self {
            path: path.into(),
            seed,
            iteration,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Qualified path of the running case.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Seed of this invocation's PRNG.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Zero-based iteration number.
    #[must_use]
    pub const fn iteration(&self) -> u32 {
        self.iteration
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

/// Derive the seed for one invocation from the run seed.
///
/// Stable for a given `(run_seed, case_index, iteration)` so a failing case can
/// be reproduced in isolation with the same `--seed`.
#[must_use]
pub const fn derive_seed(run_seed: u64, case_index: usize, iteration: u32) -> u64 {
    let mixed = run_seed
        ^ (case_index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ ((iteration as u64) << 32);
    splitmix64(mixed)
}

const fn splitmix64(value: u64) -> u64 {
    let mut z = value.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
