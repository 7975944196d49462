use super::{BlendRule, RandomSource, UniformDraw};
use crate::error::ConfigError;

/// Park–Miller modulus, the Mersenne prime 2^31 − 1.
pub const LEHMER_MODULUS: u64 = 2_147_483_647;
/// Park–Miller "minimal standard" multiplier (1993 revision).
pub const LEHMER_MULTIPLIER: u64 = 48_271;

/// Draws are reduced mod this before scaling, giving 1/100 resolution.
const LEHMER_BUCKETS: u64 = 100;

/// Multiplicative congruential generator: `state' = state * A mod M`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LehmerGenerator {
    state: u64,
}

impl LehmerGenerator {
    /// Seeds are reduced mod M; anything landing on zero is rejected.
    pub fn new(seed: u64) -> Result<Self, ConfigError> {
        let state = seed % LEHMER_MODULUS;
        if state == 0 {
            return Err(ConfigError::DegenerateLehmerSeed(seed));
        }
        Ok(Self { state })
    }

    /// Advance the recurrence and return the new state, in `1..M`.
    pub fn advance(&mut self) -> u64 {
        // state < 2^31 and A < 2^16, so the product fits in u64
        self.state = self.state * LEHMER_MULTIPLIER % LEHMER_MODULUS;
        self.state
    }

    pub fn state(&self) -> u64 {
        self.state
    }
}

impl UniformDraw for LehmerGenerator {
    fn next_uniform(&mut self) -> f64 {
        (self.advance() % LEHMER_BUCKETS) as f64 / LEHMER_BUCKETS as f64
    }
}

impl RandomSource for LehmerGenerator {
    fn sample(&mut self, _x_norm: f64, _y_norm: f64) -> f64 {
        self.next_uniform()
    }

    fn blend_rule(&self) -> BlendRule {
        BlendRule::Multiply
    }

    fn name(&self) -> &'static str {
        "lehmer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = LehmerGenerator::new(123_456_789).unwrap();
        let mut b = LehmerGenerator::new(123_456_789).unwrap();
        for _ in 0..1000 {
            assert_eq!(a.advance(), b.advance());
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = LehmerGenerator::new(1).unwrap();
        let mut b = LehmerGenerator::new(2).unwrap();
        let same = (0..100).filter(|_| a.advance() == b.advance()).count();
        assert!(same < 100);
    }

    #[test]
    fn test_zero_seed_rejected() {
        assert_eq!(
            LehmerGenerator::new(0),
            Err(ConfigError::DegenerateLehmerSeed(0))
        );
        assert_eq!(
            LehmerGenerator::new(LEHMER_MODULUS * 3),
            Err(ConfigError::DegenerateLehmerSeed(LEHMER_MODULUS * 3))
        );
    }

    #[test]
    fn test_known_first_step() {
        // seed 1 advances straight to the multiplier
        let mut lehmer = LehmerGenerator::new(1).unwrap();
        assert_eq!(lehmer.advance(), LEHMER_MULTIPLIER);
        assert_eq!(lehmer.advance(), LEHMER_MULTIPLIER * LEHMER_MULTIPLIER % LEHMER_MODULUS);
    }

    #[test]
    fn test_uniform_range_and_resolution() {
        let mut lehmer = LehmerGenerator::new(42).unwrap();
        for _ in 0..1000 {
            let v = lehmer.next_uniform();
            assert!((0.0..1.0).contains(&v));
            let steps = v * 100.0;
            assert!((steps - steps.round()).abs() < 1e-9);
        }
        assert_ne!(lehmer.state(), 0);
    }
}
