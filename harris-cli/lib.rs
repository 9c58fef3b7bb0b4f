use std::path::{Path, PathBuf};

use harris_corners::{DetectorBuilder, DetectorConfig, GridError, HarrisError, IntensityGrid, InterestPoint};
use image::imageops::FilterType;
use image::{GrayImage, ImageReader, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut};
use log::debug;

pub use harris_corners;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("detection error: {0}")]
    Harris(#[from] HarrisError),
    #[error("grid error: {0}")]
    Grid(#[from] GridError),
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config file {path}: {message}")]
    Config { path: PathBuf, message: String },
    #[error("invalid scale factor: {0} (must be finite and > 0)")]
    Scale(f32),
}

pub type CliResult<T> = Result<T, CliError>;

/// Fill color of a detected point
pub const POINT_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
/// Ring drawn around each point so it stays visible on bright areas
pub const RING_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
pub const POINT_RADIUS: i32 = 2;
pub const RING_RADIUS: i32 = 3;

/// Decode any supported image as 8-bit grayscale and rescale it by `scale`
pub fn load_luma<P: AsRef<Path>>(path: P, scale: f32) -> CliResult<GrayImage> {
    let img = ImageReader::open(path.as_ref())?.decode()?.to_luma8();
    debug!("loaded {} ({}x{})", path.as_ref().display(), img.width(), img.height());
    rescale(&img, scale)
}

/// Resize with a triangle filter; a scale of 1 returns a copy
pub fn rescale(img: &GrayImage, scale: f32) -> CliResult<GrayImage> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(CliError::Scale(scale));
    }
    if scale == 1.0 {
        return Ok(img.clone());
    }
    let width = ((img.width() as f32 * scale).round() as u32).max(1);
    let height = ((img.height() as f32 * scale).round() as u32).max(1);
    Ok(image::imageops::resize(img, width, height, FilterType::Triangle))
}

pub fn to_intensity_grid(img: &GrayImage) -> CliResult<IntensityGrid> {
    Ok(IntensityGrid::from_luma8(
        img.width() as usize,
        img.height() as usize,
        img.as_raw(),
    )?)
}

/// Color copy of `img` with every point drawn as a red dot in a black ring
pub fn highlight_points(img: &GrayImage, points: &[InterestPoint]) -> RgbImage {
    let mut canvas = image::DynamicImage::ImageLuma8(img.clone()).into_rgb8();
    for p in points {
        let center = (p.col as i32, p.row as i32);
        draw_filled_circle_mut(&mut canvas, center, POINT_RADIUS, POINT_COLOR);
        draw_hollow_circle_mut(&mut canvas, center, RING_RADIUS, RING_COLOR);
    }
    canvas
}

/// Parse an `x,y` pixel position into (row, col)
pub fn parse_probe(value: &str) -> Result<(usize, usize), String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got '{}'", value))?;
    let x = x.trim().parse::<usize>().map_err(|e| format!("bad x '{}': {}", x, e))?;
    let y = y.trim().parse::<usize>().map_err(|e| format!("bad y '{}': {}", y, e))?;
    Ok((y, x))
}

/// Load a detector config, choosing the format by file extension
pub fn load_config<P: AsRef<Path>>(path: P) -> CliResult<DetectorConfig> {
    let path = path.as_ref();
    let loaded = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => DetectorConfig::load_json(path),
        Some("toml") => DetectorConfig::load_toml(path),
        _ => Err("unsupported extension (expected .json or .toml)".into()),
    };
    loaded.map_err(|e| CliError::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Per-option values given on the command line, applied over a config file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub k: Option<f32>,
    pub threshold: Option<f32>,
    pub no_pre_blur: bool,
    pub aggregation_kernel: Option<usize>,
    pub tiles: Option<(usize, usize)>,
    pub max_per_tile: Option<usize>,
    pub radius: Option<usize>,
    pub threads: Option<usize>,
}

impl Overrides {
    pub fn apply(&self, mut builder: DetectorBuilder) -> DetectorBuilder {
        if let Some(k) = self.k {
            builder = builder.k(k);
        }
        if let Some(threshold) = self.threshold {
            builder = builder.detection_threshold(threshold);
        }
        if self.no_pre_blur {
            builder = builder.pre_blur(false);
        }
        if let Some(size) = self.aggregation_kernel {
            builder = builder.aggregation_kernel(size);
        }
        if let Some((x, y)) = self.tiles {
            builder = builder.tiles(x, y);
        }
        if let Some(max) = self.max_per_tile {
            builder = builder.max_per_tile(max);
        }
        if let Some(radius) = self.radius {
            builder = builder.min_pixel_radius(radius);
        }
        if let Some(threads) = self.threads {
            builder = builder.threads(threads);
        }
        builder
    }
}

/// `<stem>_corners.png` next to the input
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("image");
    input.with_file_name(format!("{}_corners.png", stem))
}
