use std::error::Error;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use tilemap_generator::biomes::biome_histogram;
use tilemap_generator::config::GeneratorConfig;
use tilemap_generator::context::{Action, TerrainContext};
use tilemap_generator::logging::init_logging;
use tilemap_generator::random::NoiseParams;
use tilemap_generator::viewer;

#[derive(Parser, Debug)]
#[command(name = "tilemap_generator")]
#[command(about = "Generate and explore procedural elevation tilemaps")]
struct Args {
    /// Width of the tilemap in tiles
    #[arg(short = 'W', long, default_value = "1200")]
    width: usize,

    /// Height of the tilemap in tiles
    #[arg(short = 'H', long, default_value = "675")]
    height: usize,

    /// Window pixels per tile
    #[arg(long, default_value = "1")]
    scale: usize,

    /// Master seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Explicit Lehmer generator seed (must not be a multiple of 2^31 - 1)
    #[arg(long)]
    lehmer_seed: Option<u64>,

    /// Perlin amplitude divisor per octave
    #[arg(long, default_value = "3.0")]
    alpha: f64,

    /// Perlin frequency multiplier per octave
    #[arg(long, default_value = "4.0")]
    beta: f64,

    /// Perlin octave count
    #[arg(long, default_value = "9")]
    octaves: u32,

    /// Milliseconds to pause before each layered-generation step
    #[arg(long, default_value = "0")]
    pass_delay_ms: u64,

    /// Run one layered generation, log the biome breakdown and exit
    #[arg(long)]
    headless: bool,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = GeneratorConfig {
        width: args.width,
        height: args.height,
        seed: args.seed,
        lehmer_seed: args.lehmer_seed,
        noise: NoiseParams {
            alpha: args.alpha,
            beta: args.beta,
            octaves: args.octaves,
        },
        pass_delay: Duration::from_millis(args.pass_delay_ms),
    };

    let mut ctx = TerrainContext::new(&config)?;
    info!("Generating tilemap with seed: {}", ctx.seeds().master);
    info!("Map size: {}x{}", ctx.width(), ctx.height());

    if args.headless {
        ctx.apply(Action::LayeredGenerate, false);
        ctx.wait_idle();

        let total = (ctx.width() * ctx.height()) as f64;
        for (biome, count) in biome_histogram(&ctx.read_grid()) {
            info!("  {:>14}: {:>8} tiles ({:.1}%)", biome.name(), count, 100.0 * count as f64 / total);
        }
        return Ok(());
    }

    viewer::run_viewer(ctx, args.scale)?;
    Ok(())
}
