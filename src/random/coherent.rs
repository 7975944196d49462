use noise::{NoiseFn, Perlin, Seedable};
use serde::{Deserialize, Serialize};

use super::{BlendRule, RandomSource};
use crate::error::ConfigError;

/// Parameters for octave-summed Perlin noise
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseParams {
    /// Amplitude divisor per octave (higher = smoother)
    pub alpha: f64,
    /// Frequency multiplier per octave
    pub beta: f64,
    /// Number of noise octaves
    pub octaves: u32,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            alpha: 3.0,
            beta: 4.0,
            octaves: 9,
        }
    }
}

impl NoiseParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.octaves == 0 {
            return Err(ConfigError::InvalidNoise("octave count must be positive".into()));
        }
        if !self.alpha.is_finite() || self.alpha <= 0.0 {
            return Err(ConfigError::InvalidNoise(format!(
                "persistence (alpha) must be positive, got {}",
                self.alpha
            )));
        }
        if !self.beta.is_finite() || self.beta <= 0.0 {
            return Err(ConfigError::InvalidNoise(format!(
                "frequency multiplier (beta) must be positive, got {}",
                self.beta
            )));
        }
        Ok(())
    }
}

/// Multi-octave Perlin gradient noise over the unit square.
///
/// `noise2d(x, y) = Σ perlin(x·βⁱ, y·βⁱ) / αⁱ` for `i` in `0..octaves`.
/// The raw sum is roughly centred on zero and is clamped to `[0, 1]` when
/// used as a tile sample.
#[derive(Clone)]
pub struct CoherentNoise {
    params: NoiseParams,
    seed: u64,
    perlin: Perlin,
}

impl CoherentNoise {
    pub fn new(params: NoiseParams, seed: u64) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            params,
            seed,
            perlin: Perlin::new(1).set_seed(fold_seed(seed)),
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Swap in a new permutation table; parameters are kept.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.perlin = Perlin::new(1).set_seed(fold_seed(seed));
    }

    /// Unclamped octave sum at `(x, y)`.
    pub fn noise2d(&self, x: f64, y: f64) -> f64 {
        let mut sum = 0.0;
        let mut scale = 1.0;
        let mut point = [x, y];

        for _ in 0..self.params.octaves {
            sum += self.perlin.get(point) / scale;
            scale *= self.params.alpha;
            point = [point[0] * self.params.beta, point[1] * self.params.beta];
        }

        sum
    }
}

impl std::fmt::Debug for CoherentNoise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoherentNoise")
            .field("params", &self.params)
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

impl RandomSource for CoherentNoise {
    fn sample(&mut self, x_norm: f64, y_norm: f64) -> f64 {
        self.noise2d(x_norm, y_norm).clamp(0.0, 1.0)
    }

    fn blend_rule(&self) -> BlendRule {
        BlendRule::BiasedMultiply
    }

    fn name(&self) -> &'static str {
        "perlin"
    }
}

/// `noise::Perlin` takes a 32-bit seed; fold both halves in so high bits count.
fn fold_seed(seed: u64) -> u32 {
    (seed ^ (seed >> 32)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_valid() {
        assert!(NoiseParams::default().validate().is_ok());
    }

    #[test]
    fn test_params_serde_round_trip() {
        let params = NoiseParams { alpha: 2.5, beta: 3.0, octaves: 6 };
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(json, r#"{"alpha":2.5,"beta":3.0,"octaves":6}"#);
        assert_eq!(serde_json::from_str::<NoiseParams>(&json).unwrap(), params);
    }

    #[test]
    fn test_invalid_params_rejected_at_construction() {
        let zero_octaves = NoiseParams { octaves: 0, ..Default::default() };
        assert!(matches!(
            CoherentNoise::new(zero_octaves, 1),
            Err(ConfigError::InvalidNoise(_))
        ));

        let bad_alpha = NoiseParams { alpha: 0.0, ..Default::default() };
        assert!(CoherentNoise::new(bad_alpha, 1).is_err());

        let bad_beta = NoiseParams { beta: -2.0, ..Default::default() };
        assert!(CoherentNoise::new(bad_beta, 1).is_err());

        let nan_alpha = NoiseParams { alpha: f64::NAN, ..Default::default() };
        assert!(CoherentNoise::new(nan_alpha, 1).is_err());
    }

    #[test]
    fn test_deterministic_for_seed() {
        let a = CoherentNoise::new(NoiseParams::default(), 9001).unwrap();
        let b = CoherentNoise::new(NoiseParams::default(), 9001).unwrap();
        for i in 0..50 {
            let x = i as f64 * 0.0173;
            let y = 1.0 - i as f64 * 0.011;
            assert_eq!(a.noise2d(x, y).to_bits(), b.noise2d(x, y).to_bits());
        }
    }

    #[test]
    fn test_reseed_matches_fresh_generator() {
        let mut a = CoherentNoise::new(NoiseParams::default(), 1).unwrap();
        a.reseed(555);
        let b = CoherentNoise::new(NoiseParams::default(), 555).unwrap();
        assert_eq!(a.seed(), 555);
        assert_eq!(a.noise2d(0.31, 0.77).to_bits(), b.noise2d(0.31, 0.77).to_bits());
    }

    #[test]
    fn test_continuity() {
        // Single octave so the gradient is bounded by Perlin's own slope
        let params = NoiseParams { octaves: 1, ..Default::default() };
        let noise = CoherentNoise::new(params, 3).unwrap();
        let eps = 1e-6;
        for i in 0..20 {
            let x = 0.05 * i as f64 + 0.013;
            let d = (noise.noise2d(x, 0.4) - noise.noise2d(x + eps, 0.4)).abs();
            assert!(d < 1e-3, "jump of {} at x={}", d, x);
        }
    }

    #[test]
    fn test_sample_is_clamped() {
        let mut noise = CoherentNoise::new(NoiseParams::default(), 42).unwrap();
        for y in 0..30 {
            for x in 0..30 {
                let v = noise.sample(x as f64 / 30.0, y as f64 / 30.0);
                assert!((0.0..=1.0).contains(&v));
            }
        }
    }
}
