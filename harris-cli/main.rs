use std::path::PathBuf;
use std::time::Instant;

use argh::FromArgs;
use harris_cli::{
    default_output_path, highlight_points, load_config, load_luma, parse_probe, to_intensity_grid, Overrides,
};
use harris_core::init_thread_pool;
use harris_corners::{DetectorBuilder, DetectorConfig};
use log::{info, warn};

/// Detect Harris corners in an image and draw them
#[derive(Debug, FromArgs)]
struct Args {
    /// image path
    #[argh(positional)]
    input: PathBuf,

    /// where to write the annotated image (default: <input>_corners.png)
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,

    /// detector config file (.toml or .json)
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// resize factor applied before detection
    #[argh(option, short = 's', default = "0.5")]
    scale: f32,

    /// trace penalty k
    #[argh(option)]
    k: Option<f32>,

    /// minimum corner response
    #[argh(option, short = 't')]
    threshold: Option<f32>,

    /// skip Gaussian smoothing before differentiation
    #[argh(switch)]
    no_pre_blur: bool,

    /// aggregation window size (odd)
    #[argh(option)]
    aggregation_kernel: Option<usize>,

    /// tile grid as columns,rows
    #[argh(option, from_str_fn(parse_tiles))]
    tiles: Option<(usize, usize)>,

    /// maximum points per tile
    #[argh(option)]
    max_per_tile: Option<usize>,

    /// minimum separation between points in pixels
    #[argh(option, short = 'r')]
    radius: Option<usize>,

    /// worker threads
    #[argh(option, short = 'j')]
    threads: Option<usize>,

    /// list the points near x,y in the scaled image
    #[argh(option, from_str_fn(parse_probe))]
    probe: Option<(usize, usize)>,

    /// write the detected points as JSON
    #[argh(option)]
    points_json: Option<PathBuf>,
}

fn parse_tiles(value: &str) -> Result<(usize, usize), String> {
    // Same x,y syntax as --probe, which yields (y, x)
    parse_probe(value).map(|(y, x)| (x, y))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let base = match &args.config {
        Some(path) => {
            let cfg = load_config(path)?;
            info!("loaded {}", cfg.summary());
            cfg
        }
        None => DetectorConfig::new(),
    };
    let overrides = Overrides {
        k: args.k,
        threshold: args.threshold,
        no_pre_blur: args.no_pre_blur,
        aggregation_kernel: args.aggregation_kernel,
        tiles: args.tiles,
        max_per_tile: args.max_per_tile,
        radius: args.radius,
        threads: args.threads,
    };
    let builder = overrides.apply(DetectorBuilder::from_config(base));
    info!("{}", builder.summary());

    init_thread_pool(builder.config().n_threads)?;
    let radius = builder.config().min_pixel_radius;
    let detector = builder.build()?;

    let img = load_luma(&args.input, args.scale)?;
    let grid = to_intensity_grid(&img)?;
    info!("detecting on {}x{} (scale {})", img.width(), img.height(), args.scale);

    let start = Instant::now();
    let index = detector.detect_indexed(&grid)?;
    info!("found {} points in {:.2?}", index.len(), start.elapsed());
    if index.is_empty() {
        warn!("no points above the detection threshold");
    }

    if let Some((row, col)) = args.probe {
        let near = index.query(row, col, radius);
        println!("{} point(s) within {} px of x={}, y={}:", near.len(), radius, col, row);
        for p in near {
            println!("  x={} y={} score={}", p.col, p.row, p.score);
        }
    }

    if let Some(path) = &args.points_json {
        std::fs::write(path, serde_json::to_string_pretty(index.points())?)?;
        info!("wrote {}", path.display());
    }

    let output = args.output.unwrap_or_else(|| default_output_path(&args.input));
    highlight_points(&img, index.points()).save(&output)?;
    println!("Saved result image as {}", output.display());

    Ok(())
}
