//! Tile generation passes
//!
//! One parameterized `randomize` covers every source; the source decides its
//! own blend formula. `layered_generate` stacks several coherent-noise blend
//! passes and normalizes the result into a terrain-like field.

use tracing::debug;

use crate::random::{CoherentNoise, RandomSource};
use crate::tilemap::{TileGrid, DEFAULT_ELEVATION};

/// Number of noise passes in a layered generation.
pub const LAYERED_PASSES: usize = 4;

/// Fill the grid from `source`.
///
/// With `blend` unset every cell is overwritten with its sample. With `blend`
/// set the sample is combined with the old value using the source's
/// [`BlendRule`](crate::random::BlendRule).
pub fn randomize<S: RandomSource + ?Sized>(grid: &mut TileGrid, source: &mut S, blend: bool) {
    let width = grid.width() as f64;
    let height = grid.height() as f64;
    let rule = source.blend_rule();

    grid.for_each_cell(|x, y, cell| {
        let r = source.sample(x as f64 / width, y as f64 / height);
        *cell = if blend { rule.combine(*cell, r) } else { r };
    });

    debug!(source = source.name(), blend, "randomized grid");
}

/// Layered terrain generation:
/// 1. Optional reset to the default elevation
/// 2. [`LAYERED_PASSES`] noise blend passes, reseeding before each
/// 3. Min-max normalization
pub fn layered_generate(
    grid: &mut TileGrid,
    noise: &mut CoherentNoise,
    pass_seeds: &[u64; LAYERED_PASSES],
    reset: bool,
) {
    layered_generate_with(grid, noise, pass_seeds, reset, |_| true);
}

/// [`layered_generate`] with a checkpoint before every pass and before the
/// final normalize. `keep_going` gets the index of the step about to run
/// (`LAYERED_PASSES` for normalize); returning false stops the run early and
/// leaves `grid` partially written. Returns true if every step ran.
pub fn layered_generate_with<F>(
    grid: &mut TileGrid,
    noise: &mut CoherentNoise,
    pass_seeds: &[u64; LAYERED_PASSES],
    reset: bool,
    mut keep_going: F,
) -> bool
where
    F: FnMut(usize) -> bool,
{
    if reset {
        grid.reset(DEFAULT_ELEVATION);
    }

    for (pass, &seed) in pass_seeds.iter().enumerate() {
        if !keep_going(pass) {
            return false;
        }
        noise.reseed(seed);
        randomize(grid, noise, true);
    }

    if !keep_going(LAYERED_PASSES) {
        return false;
    }
    grid.normalize();
    true
}
