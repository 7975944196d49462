//! Seed management for the random sources
//!
//! Every seeded source gets its own seed derived from a master seed, so one
//! number reproduces a whole session. The per-pass seeds used by layered
//! generation come from a [`SeedSequence`] stream derived the same way.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::random::LEHMER_MODULUS;

/// Seeds for all seeded sources.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceSeeds {
    /// Master seed (used for display/reference)
    pub master: u64,
    /// ChaCha uniform source
    pub uniform: u64,
    /// Lehmer generator initial state
    pub lehmer: u64,
    /// Coherent noise permutation before the first reseed
    pub noise: u64,
    /// Stream that hands out reseeds for noise passes
    pub passes: u64,
}

impl SourceSeeds {
    /// Create seeds from a master seed, deriving all sub-seeds deterministically.
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            uniform: derive_seed(master, "uniform"),
            lehmer: nonzero_lehmer_seed(derive_seed(master, "lehmer")),
            noise: derive_seed(master, "noise"),
            passes: derive_seed(master, "passes"),
        }
    }

    /// Override the Lehmer seed, keeping everything else derived.
    pub fn with_lehmer(mut self, seed: u64) -> Self {
        self.lehmer = seed;
        self
    }
}

/// Derive a sub-seed from a master seed and a system name.
fn derive_seed(master: u64, system: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    master.hash(&mut hasher);
    system.hash(&mut hasher);
    hasher.finish()
}

/// Nudge a derived seed off the Lehmer generator's degenerate residue.
/// Explicit user seeds are not passed through here and are still rejected.
fn nonzero_lehmer_seed(seed: u64) -> u64 {
    if seed % LEHMER_MODULUS == 0 {
        // u64::MAX is not a multiple of the modulus, so this cannot overflow
        seed + 1
    } else {
        seed
    }
}

/// Deterministic stream of fresh seeds for noise reseeding.
#[derive(Clone, Debug)]
pub struct SeedSequence {
    rng: ChaCha8Rng,
}

impl SeedSequence {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn next_seed(&mut self) -> u64 {
        self.rng.gen()
    }

    /// The next `N` seeds, in draw order.
    pub fn take<const N: usize>(&mut self) -> [u64; N] {
        std::array::from_fn(|_| self.next_seed())
    }
}

impl std::fmt::Display for SourceSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SourceSeeds {{ master: {}, uniform: {}, lehmer: {}, noise: {}, passes: {} }}",
            self.master, self.uniform, self.lehmer, self.noise, self.passes,
        )
    }
}
