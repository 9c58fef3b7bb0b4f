use std::time::Instant;

use harris_core::{HarrisConfig, IntensityGrid, InterestPoint, ResponseMap};
use log::debug;

use crate::config::{resolve_sigma, validate_harris_config};
use crate::error::{HarrisError, HarrisResult};
use crate::gradient::{GradientEstimator, GradientField};
use crate::nms::NonMaxSuppressor;
use crate::response::CornerResponseScorer;
use crate::spatial_index::SpatialIndex;
use crate::structure_tensor::{StructureTensor, StructureTensorAggregator};

/// Harris corner detector: gradient, structure tensor, response, then
/// tiled non-maximum suppression.
///
/// The configuration is validated once in [`HarrisDetector::new`]; every
/// call to [`HarrisDetector::detect`] checks the grid shape before touching
/// a pixel. The detector holds no per-image state and can be shared across
/// threads.
#[derive(Debug, Clone)]
pub struct HarrisDetector {
    cfg: HarrisConfig,
    gradients: GradientEstimator,
    aggregator: StructureTensorAggregator,
    scorer: CornerResponseScorer,
    suppressor: NonMaxSuppressor,
}

impl HarrisDetector {
    pub fn new(cfg: HarrisConfig) -> HarrisResult<Self> {
        validate_harris_config(&cfg)?;

        let gradients = if cfg.pre_blur {
            GradientEstimator::with_pre_blur(
                cfg.pre_blur_kernel,
                resolve_sigma(cfg.pre_blur_kernel, cfg.pre_blur_sigma),
            )
        } else {
            GradientEstimator::new()
        };
        let aggregator = StructureTensorAggregator::new(
            cfg.aggregation_kernel,
            resolve_sigma(cfg.aggregation_kernel, cfg.aggregation_sigma),
        );
        let scorer = CornerResponseScorer::new(cfg.k, cfg.detection_threshold);
        let suppressor = NonMaxSuppressor::from_config(&cfg);

        Ok(Self {
            cfg,
            gradients,
            aggregator,
            scorer,
            suppressor,
        })
    }

    pub fn config(&self) -> &HarrisConfig {
        &self.cfg
    }

    /// Reject grids smaller than any kernel footprint or than the tile grid
    fn validate_grid(&self, grid: &IntensityGrid) -> HarrisResult<()> {
        let (width, height) = grid.dimensions();
        let stages = [
            ("gradient", self.gradients.footprint()),
            ("aggregation", self.aggregator.kernel_size()),
        ];
        for (stage, size) in stages {
            if width < size || height < size {
                return Err(HarrisError::InsufficientSize {
                    stage,
                    width,
                    height,
                    required_width: size,
                    required_height: size,
                });
            }
        }
        self.suppressor.tile_layout(width, height)?;
        Ok(())
    }

    /// Intensity derivatives
    pub fn gradients(&self, grid: &IntensityGrid) -> HarrisResult<GradientField> {
        self.validate_grid(grid)?;
        Ok(self.gradients.compute(grid))
    }

    pub fn structure_tensor(&self, grid: &IntensityGrid) -> HarrisResult<StructureTensor> {
        let field = self.gradients(grid)?;
        Ok(self.aggregator.aggregate(&field))
    }

    /// Thresholded corner response for every pixel
    pub fn response_map(&self, grid: &IntensityGrid) -> HarrisResult<ResponseMap> {
        let tensor = self.structure_tensor(grid)?;
        Ok(self.scorer.score(&tensor))
    }

    /// Run the full pipeline. Points come out tile by tile in raster order,
    /// strongest first within a tile.
    pub fn detect(&self, grid: &IntensityGrid) -> HarrisResult<Vec<InterestPoint>> {
        let start = Instant::now();
        let response = self.response_map(grid)?;
        let scored = start.elapsed();

        let points = self.suppressor.suppress(&response)?;
        debug!(
            "harris: {}x{} -> {} points (response {:.2?}, total {:.2?})",
            grid.width(),
            grid.height(),
            points.len(),
            scored,
            start.elapsed()
        );
        Ok(points)
    }

    /// Detect and index the result for proximity queries.
    ///
    /// Buckets are `min_pixel_radius` wide, so a query with that radius
    /// touches at most four of them.
    pub fn detect_indexed(&self, grid: &IntensityGrid) -> HarrisResult<SpatialIndex> {
        let points = self.detect(grid)?;
        Ok(SpatialIndex::new(
            points,
            grid.width(),
            grid.height(),
            self.cfg.min_pixel_radius,
        ))
    }
}

/// One-shot detection with a throwaway detector
pub fn detect_corners(grid: &IntensityGrid, cfg: &HarrisConfig) -> HarrisResult<Vec<InterestPoint>> {
    HarrisDetector::new(cfg.clone())?.detect(grid)
}
