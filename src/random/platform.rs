use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{BlendRule, RandomSource, UniformDraw};

/// Steps per unit for [`PlatformSource`]; draws land on multiples of 0.01.
const PLATFORM_STEPS: u32 = 100;

/// Host thread RNG quantized to hundredths. Not reproducible between runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlatformSource;

impl UniformDraw for PlatformSource {
    fn next_uniform(&mut self) -> f64 {
        rand::thread_rng().gen_range(0..PLATFORM_STEPS) as f64 / PLATFORM_STEPS as f64
    }
}

impl RandomSource for PlatformSource {
    fn sample(&mut self, _x_norm: f64, _y_norm: f64) -> f64 {
        self.next_uniform()
    }

    fn blend_rule(&self) -> BlendRule {
        BlendRule::Multiply
    }

    fn name(&self) -> &'static str {
        "platform"
    }
}

/// Full-resolution uniform draws from a seeded ChaCha8 stream.
#[derive(Clone, Debug)]
pub struct UniformSource {
    rng: ChaCha8Rng,
}

impl UniformSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl UniformDraw for UniformSource {
    fn next_uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

impl RandomSource for UniformSource {
    fn sample(&mut self, _x_norm: f64, _y_norm: f64) -> f64 {
        self.next_uniform()
    }

    fn blend_rule(&self) -> BlendRule {
        BlendRule::Multiply
    }

    fn name(&self) -> &'static str {
        "uniform"
    }
}
