use harris_core::GridError;

/// Rejected configuration values, detected before any pixel is touched
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {stage} kernel size: {size} (must be odd and positive)")]
    KernelSize { stage: &'static str, size: usize },
    #[error("invalid {stage} sigma: {sigma} (must be finite and > 0)")]
    Sigma { stage: &'static str, sigma: f32 },
    #[error("invalid trace weight k: {0} (must lie in (0, 0.25))")]
    TraceWeight(f32),
    #[error("invalid detection threshold: {0} (must be finite and >= 0)")]
    Threshold(f32),
    #[error("invalid tile grid: {tiles_x}x{tiles_y} (must be > 0)")]
    TileGrid { tiles_x: usize, tiles_y: usize },
    #[error("invalid max points per tile: {0} (must be > 0)")]
    MaxPerTile(usize),
    #[error("invalid minimum pixel radius: {0} (must be > 0)")]
    Radius(usize),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HarrisError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(
        "image {width}x{height} too small for {stage} (requires at least {required_width}x{required_height})"
    )]
    InsufficientSize {
        stage: &'static str,
        width: usize,
        height: usize,
        required_width: usize,
        required_height: usize,
    },
    #[error("malformed grid: {0}")]
    Grid(#[from] GridError),
}

pub type HarrisResult<T> = Result<T, HarrisError>;
