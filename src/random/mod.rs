//! Random sources that feed the tile generators.
//!
//! Every source answers `sample(x, y)` for normalized grid coordinates. Point
//! sources ignore the coordinates and return the next uniform draw; coherent
//! noise evaluates a continuous function of them. Each source also names the
//! [`BlendRule`] used when its samples are layered over existing terrain.

mod coherent;
mod lehmer;
mod platform;

pub use coherent::{CoherentNoise, NoiseParams};
pub use lehmer::{LehmerGenerator, LEHMER_MODULUS, LEHMER_MULTIPLIER};
pub use platform::{PlatformSource, UniformSource};

/// Offset added by [`BlendRule::BiasedMultiply`] before clamping.
pub const NOISE_BLEND_BIAS: f64 = 0.25;

/// How a fresh sample is combined with the value already in a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendRule {
    /// `new = old * r`, result is the mean of old and new.
    Multiply,
    /// `new = clamp(old * r + 0.25, 0, 1)`, result is the mean of old and new.
    /// The bias stops repeated noise passes from sinking towards zero.
    BiasedMultiply,
}

impl BlendRule {
    pub fn combine(self, old: f64, r: f64) -> f64 {
        let new = match self {
            BlendRule::Multiply => old * r,
            BlendRule::BiasedMultiply => (old * r + NOISE_BLEND_BIAS).clamp(0.0, 1.0),
        };
        (old + new) / 2.0
    }
}

/// Anything that can fill a tile with a value.
pub trait RandomSource {
    /// Sample for the cell at normalized coordinates (`x / width`, `y / height`).
    fn sample(&mut self, x_norm: f64, y_norm: f64) -> f64;

    /// Formula used when blending this source's samples over prior values.
    fn blend_rule(&self) -> BlendRule;

    /// Short label for logging.
    fn name(&self) -> &'static str;
}

/// Sources that produce a plain stream of uniform values in `[0, 1)`.
pub trait UniformDraw {
    fn next_uniform(&mut self) -> f64;
}
