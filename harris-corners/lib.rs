//! Harris corner detection over dense intensity grids.
//!
//! ```no_run
//! use harris_corners::{DetectorBuilder, IntensityGrid};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let grid = IntensityGrid::from_luma8(640, 480, &vec![0u8; 640 * 480])?;
//! let detector = DetectorBuilder::new().k(0.05).min_pixel_radius(8).build()?;
//! for p in detector.detect(&grid)? {
//!     println!("({}, {}) {}", p.row, p.col, p.score);
//! }
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod detector;
pub mod error;
pub mod filter;
pub mod gradient;
pub mod nms;
pub mod response;
pub mod spatial_index;
pub mod structure_tensor;

pub use builder::DetectorBuilder;
pub use config::{resolve_sigma, validate_harris_config, DetectorConfig};
pub use detector::{detect_corners, HarrisDetector};
pub use error::{ConfigError, HarrisError, HarrisResult};
pub use gradient::{GradientEstimator, GradientField};
pub use nms::{NonMaxSuppressor, TileLayout};
pub use response::{corner_response, CornerResponseScorer};
pub use spatial_index::SpatialIndex;
pub use structure_tensor::{StructureTensor, StructureTensorAggregator};

pub use harris_core::{Grid, GridError, HarrisConfig, IntensityGrid, InterestPoint, ResponseMap};
