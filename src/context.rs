//! Terrain context: the grid, its random sources and the operator entry points
//!
//! The grid sits behind an `RwLock`. Foreground operators hold the write lock
//! for their whole pass, so a reader sees either the old field or the new
//! one. Layered generation runs on a worker thread against a scratch copy and
//! swaps it in under the write lock when it finishes.
//!
//! Every mutation bumps a shared epoch. A worker checks the epoch before each
//! pass and again under the lock right before publishing; if anything newer
//! was requested in the meantime it drops its scratch grid. A new layered
//! trigger therefore cancels and replaces the one in flight, and a direct
//! edit cancels any layered run started before it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, error, info};

use crate::config::GeneratorConfig;
use crate::error::ConfigError;
use crate::generation::{self, LAYERED_PASSES};
use crate::random::{CoherentNoise, LehmerGenerator, PlatformSource, UniformSource};
use crate::seeds::{SeedSequence, SourceSeeds};
use crate::tilemap::{TileGrid, DEFAULT_ELEVATION};

/// User-triggerable operations
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Reset,
    RandomizePlatform,
    RandomizeUniform,
    RandomizeNoise,
    RandomizeLehmer,
    Normalize,
    LayeredGenerate,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::Reset => "reset",
            Action::RandomizePlatform => "randomize (platform)",
            Action::RandomizeUniform => "randomize (uniform)",
            Action::RandomizeNoise => "randomize (perlin)",
            Action::RandomizeLehmer => "randomize (lehmer)",
            Action::Normalize => "normalize",
            Action::LayeredGenerate => "layered generation",
        }
    }
}

type SharedGrid = Arc<RwLock<TileGrid>>;

pub struct TerrainContext {
    grid: SharedGrid,
    width: usize,
    height: usize,
    /// Bumped by every mutation request
    epoch: Arc<AtomicU64>,
    /// Epoch of the last layered run that reached the grid
    published: Arc<AtomicU64>,
    platform: PlatformSource,
    uniform: UniformSource,
    lehmer: LehmerGenerator,
    noise: CoherentNoise,
    pass_seeds: SeedSequence,
    seeds: SourceSeeds,
    pass_delay: Duration,
    workers: Vec<JoinHandle<()>>,
}

impl TerrainContext {
    pub fn new(config: &GeneratorConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut seeds = SourceSeeds::from_master(config.seed.unwrap_or_else(rand::random));
        if let Some(lehmer_seed) = config.lehmer_seed {
            seeds = seeds.with_lehmer(lehmer_seed);
        }

        let grid = TileGrid::new(config.width, config.height)?;
        let lehmer = LehmerGenerator::new(seeds.lehmer)?;
        let noise = CoherentNoise::new(config.noise, seeds.noise)?;

        debug!(%seeds, "terrain context seeded");

        Ok(Self {
            grid: Arc::new(RwLock::new(grid)),
            width: config.width,
            height: config.height,
            epoch: Arc::new(AtomicU64::new(0)),
            published: Arc::new(AtomicU64::new(0)),
            platform: PlatformSource,
            uniform: UniformSource::new(seeds.uniform),
            lehmer,
            noise,
            pass_seeds: SeedSequence::new(seeds.passes),
            seeds,
            pass_delay: config.pass_delay,
            workers: Vec::new(),
        })
    }

    pub fn seeds(&self) -> &SourceSeeds {
        &self.seeds
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Single cell read. Prefer [`read_grid`](Self::read_grid) for whole-frame draws.
    pub fn value(&self, x: usize, y: usize) -> f64 {
        self.read_grid().value(x, y)
    }

    /// Read guard over the complete grid; hold it for one frame's draw.
    pub fn read_grid(&self) -> RwLockReadGuard<'_, TileGrid> {
        self.grid.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// An owned copy of the current grid.
    pub fn snapshot(&self) -> TileGrid {
        self.read_grid().clone()
    }

    /// Current mutation epoch.
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Epoch of the last layered generation that was published, 0 if none.
    pub fn published_epoch(&self) -> u64 {
        self.published.load(Ordering::SeqCst)
    }

    /// True while any layered worker is still running.
    pub fn is_generating(&self) -> bool {
        self.workers.iter().any(|worker| !worker.is_finished())
    }

    /// Dispatch a user action. `modifier` selects blending for the randomize
    /// actions and skips the reset for layered generation.
    pub fn apply(&mut self, action: Action, modifier: bool) {
        info!(action = action.label(), modifier, "applying action");
        match action {
            Action::Reset => self.reset(),
            Action::RandomizePlatform => self.randomize_platform(modifier),
            Action::RandomizeUniform => self.randomize_uniform(modifier),
            Action::RandomizeNoise => self.randomize_noise(modifier),
            Action::RandomizeLehmer => self.randomize_lehmer(modifier),
            Action::Normalize => self.normalize(),
            Action::LayeredGenerate => self.layered_generate(!modifier),
        }
    }

    pub fn reset(&mut self) {
        self.supersede();
        write(&self.grid).reset(DEFAULT_ELEVATION);
    }

    pub fn normalize(&mut self) {
        self.supersede();
        write(&self.grid).normalize();
    }

    pub fn randomize_platform(&mut self, blend: bool) {
        self.supersede();
        generation::randomize(&mut write(&self.grid), &mut self.platform, blend);
    }

    pub fn randomize_uniform(&mut self, blend: bool) {
        self.supersede();
        generation::randomize(&mut write(&self.grid), &mut self.uniform, blend);
    }

    pub fn randomize_lehmer(&mut self, blend: bool) {
        self.supersede();
        generation::randomize(&mut write(&self.grid), &mut self.lehmer, blend);
    }

    /// Noise randomization draws a fresh permutation every time.
    pub fn randomize_noise(&mut self, blend: bool) {
        self.supersede();
        self.noise.reseed(self.pass_seeds.next_seed());
        generation::randomize(&mut write(&self.grid), &mut self.noise, blend);
    }

    /// Start a layered generation in the background, replacing any run that
    /// is still in flight. Pass seeds are drawn here, so the result depends
    /// only on the master seed and the order of requests.
    pub fn layered_generate(&mut self, reset: bool) {
        let epoch = self.supersede();
        let pass_seeds: [u64; LAYERED_PASSES] = self.pass_seeds.take();
        self.workers.retain(|worker| !worker.is_finished());

        let job = LayeredJob {
            base: if reset { None } else { Some(self.snapshot()) },
            width: self.width,
            height: self.height,
            noise: self.noise.clone(),
            pass_seeds,
            reset,
            epoch,
            pass_delay: self.pass_delay,
            grid: Arc::clone(&self.grid),
            current: Arc::clone(&self.epoch),
            published: Arc::clone(&self.published),
        };

        let spawned = thread::Builder::new()
            .name(format!("layered-gen-{}", epoch))
            .spawn(move || job.run());

        match spawned {
            Ok(worker) => self.workers.push(worker),
            Err(err) => error!(epoch, %err, "failed to spawn layered generation worker"),
        }
    }

    /// Block until every worker has exited.
    pub fn wait_idle(&mut self) {
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                error!("layered generation worker panicked");
            }
        }
    }

    /// Invalidate whatever is in flight and return the new epoch.
    fn supersede(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl Drop for TerrainContext {
    fn drop(&mut self) {
        self.supersede();
        self.wait_idle();
    }
}

fn write(grid: &SharedGrid) -> RwLockWriteGuard<'_, TileGrid> {
    grid.write().unwrap_or_else(PoisonError::into_inner)
}

/// One background layered generation.
struct LayeredJob {
    /// Starting field when not resetting
    base: Option<TileGrid>,
    width: usize,
    height: usize,
    noise: CoherentNoise,
    pass_seeds: [u64; LAYERED_PASSES],
    reset: bool,
    epoch: u64,
    pass_delay: Duration,
    grid: SharedGrid,
    current: Arc<AtomicU64>,
    published: Arc<AtomicU64>,
}

impl LayeredJob {
    fn run(self) {
        let LayeredJob {
            base,
            width,
            height,
            mut noise,
            pass_seeds,
            reset,
            epoch,
            pass_delay,
            grid,
            current,
            published,
        } = self;
        let is_current = || current.load(Ordering::SeqCst) == epoch;

        let mut scratch = match base {
            Some(base) => base,
            None => match TileGrid::new(width, height) {
                Ok(grid) => grid,
                Err(err) => {
                    error!(epoch, %err, "could not allocate scratch grid");
                    return;
                }
            },
        };

        let finished = generation::layered_generate_with(
            &mut scratch,
            &mut noise,
            &pass_seeds,
            reset,
            |step| {
                if !pass_delay.is_zero() {
                    thread::sleep(pass_delay);
                }
                let live = is_current();
                if live {
                    debug!(epoch, step, "layered generation step");
                }
                live
            },
        );

        if !finished {
            debug!(epoch, "layered generation superseded, discarding");
            return;
        }

        let mut shared = write(&grid);
        if !is_current() {
            debug!(epoch, "layered generation superseded before publish");
            return;
        }
        std::mem::swap(&mut *shared, &mut scratch);
        published.store(epoch, Ordering::SeqCst);
        info!(epoch, "layered generation published");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(seed: u64) -> GeneratorConfig {
        GeneratorConfig {
            width: 40,
            height: 24,
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn test_context_rejects_bad_config() {
        let zero_lehmer = GeneratorConfig { lehmer_seed: Some(0), ..config(1) };
        assert!(matches!(
            TerrainContext::new(&zero_lehmer),
            Err(ConfigError::DegenerateLehmerSeed(0))
        ));

        let empty = GeneratorConfig { width: 0, ..config(1) };
        assert!(TerrainContext::new(&empty).is_err());
    }

    #[test]
    fn test_starts_at_default_elevation() {
        let ctx = TerrainContext::new(&config(3)).unwrap();
        assert_eq!((ctx.width(), ctx.height()), (40, 24));
        assert_eq!(ctx.value(39, 23), DEFAULT_ELEVATION);
    }

    #[test]
    fn test_same_seed_same_lehmer_field() {
        let mut a = TerrainContext::new(&config(77)).unwrap();
        let mut b = TerrainContext::new(&config(77)).unwrap();
        a.apply(Action::RandomizeLehmer, false);
        b.apply(Action::RandomizeLehmer, false);
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_modifier_selects_blend() {
        let mut ctx = TerrainContext::new(&config(5)).unwrap();
        ctx.apply(Action::RandomizeUniform, true);
        // Multiply blend from 0.5 stays within [0.25, 0.5]
        assert!(ctx
            .read_grid()
            .iter()
            .all(|(_, _, &v)| (0.25..=0.5).contains(&v)));

        ctx.apply(Action::Reset, false);
        ctx.apply(Action::RandomizeNoise, true);
        // Biased blend from 0.5 stays within [0.375, 0.75]
        assert!(ctx
            .read_grid()
            .iter()
            .all(|(_, _, &v)| (0.375..=0.75).contains(&v)));
    }

    #[test]
    fn test_normalize_action() {
        let mut ctx = TerrainContext::new(&config(9)).unwrap();
        ctx.apply(Action::RandomizePlatform, false);
        ctx.apply(Action::Normalize, false);
        let (min_val, max_val) = ctx.read_grid().min_max();
        assert!(min_val.abs() < 1e-12);
        assert!((max_val - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_every_mutation_bumps_epoch() {
        let mut ctx = TerrainContext::new(&config(2)).unwrap();
        let actions = [
            Action::Reset,
            Action::RandomizePlatform,
            Action::RandomizeUniform,
            Action::RandomizeNoise,
            Action::RandomizeLehmer,
            Action::Normalize,
        ];
        for (i, action) in actions.into_iter().enumerate() {
            ctx.apply(action, false);
            assert_eq!(ctx.epoch(), i as u64 + 1);
        }
    }

    #[test]
    fn test_layered_publishes() {
        let mut ctx = TerrainContext::new(&config(21)).unwrap();
        ctx.apply(Action::LayeredGenerate, false);
        ctx.wait_idle();
        assert!(!ctx.is_generating());
        assert_eq!(ctx.published_epoch(), ctx.epoch());

        let (min_val, max_val) = ctx.read_grid().min_max();
        assert!(min_val.abs() < 1e-12);
        assert!((max_val - 1.0).abs() < 1e-12);
    }
}
