//! Configuration errors raised when building grids and random sources.

/// Errors raised while validating generator configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Grid with a zero dimension.
    #[error("grid must have non-zero dimensions, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },

    /// Lehmer seed congruent to zero; the generator would emit zeros forever.
    #[error("lehmer seed {0} is congruent to 0 modulo the generator modulus")]
    DegenerateLehmerSeed(u64),

    /// Coherent-noise parameters out of range.
    #[error("invalid noise parameters: {0}")]
    InvalidNoise(String),
}
