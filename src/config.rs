//! Generator configuration

use std::time::Duration;

use crate::error::ConfigError;
use crate::random::NoiseParams;

/// Everything needed to build a [`TerrainContext`](crate::context::TerrainContext).
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorConfig {
    /// Grid width in tiles
    pub width: usize,
    /// Grid height in tiles
    pub height: usize,
    /// Master seed; random when `None`
    pub seed: Option<u64>,
    /// Explicit Lehmer seed; derived from the master seed when `None`
    pub lehmer_seed: Option<u64>,
    /// Coherent noise shape
    pub noise: NoiseParams,
    /// Sleep before each layered-generation step (zero in normal use)
    pub pass_delay: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 675,
            seed: None,
            lehmer_seed: None,
            noise: NoiseParams::default(),
            pass_delay: Duration::ZERO,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }
        self.noise.validate()
    }
}
