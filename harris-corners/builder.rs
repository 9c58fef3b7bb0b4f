use harris_core::HarrisConfig;
use crate::config::DetectorConfig;
use crate::detector::HarrisDetector;
use crate::error::HarrisResult;

/// Fluent API builder for detector configuration
#[derive(Debug, Clone, Default)]
pub struct DetectorBuilder {
    config: HarrisConfig,
}

impl DetectorBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the trace penalty `k` (typically 0.04-0.06)
    pub fn k(mut self, k: f32) -> Self {
        self.config.k = k;
        self
    }

    /// Enable or disable Gaussian smoothing before differentiation
    pub fn pre_blur(mut self, enable: bool) -> Self {
        self.config.pre_blur = enable;
        self
    }

    pub fn pre_blur_kernel(mut self, size: usize) -> Self {
        self.config.pre_blur_kernel = size;
        self
    }

    pub fn pre_blur_sigma(mut self, sigma: f32) -> Self {
        self.config.pre_blur_sigma = Some(sigma);
        self
    }

    /// Set the Gaussian window over the derivative products
    pub fn aggregation_kernel(mut self, size: usize) -> Self {
        self.config.aggregation_kernel = size;
        self
    }

    pub fn aggregation_sigma(mut self, sigma: f32) -> Self {
        self.config.aggregation_sigma = Some(sigma);
        self
    }

    /// Minimum corner response a point needs to be selected
    pub fn detection_threshold(mut self, threshold: f32) -> Self {
        self.config.detection_threshold = threshold;
        self
    }

    /// Set the NMS tile grid
    pub fn tiles(mut self, tiles_x: usize, tiles_y: usize) -> Self {
        self.config.tiles_x = tiles_x;
        self.config.tiles_y = tiles_y;
        self
    }

    pub fn max_per_tile(mut self, max_per_tile: usize) -> Self {
        self.config.max_per_tile = max_per_tile;
        self
    }

    /// Minimum Chebyshev separation between accepted points
    pub fn min_pixel_radius(mut self, radius: usize) -> Self {
        self.config.min_pixel_radius = radius;
        self
    }

    /// Set the number of threads for parallel processing
    pub fn threads(mut self, n_threads: usize) -> Self {
        self.config.n_threads = n_threads;
        self
    }

    /// Apply the dense preset
    pub fn preset_dense(mut self) -> Self {
        self.config = DetectorConfig::dense_preset().core;
        self
    }

    /// Apply the sparse preset
    pub fn preset_sparse(mut self) -> Self {
        self.config = DetectorConfig::sparse_preset().core;
        self
    }

    /// Validate and build the detector
    pub fn build(self) -> HarrisResult<HarrisDetector> {
        HarrisDetector::new(self.config)
    }

    /// Generate a summary of the builder's configuration
    pub fn summary(&self) -> String {
        self.clone().to_config().summary()
    }

    /// Create a builder from an existing `DetectorConfig`
    pub fn from_config(config: DetectorConfig) -> Self {
        Self { config: config.core }
    }

    /// Convert the builder into a `DetectorConfig`
    pub fn to_config(self) -> DetectorConfig {
        DetectorConfig {
            core: self.config,
            ..DetectorConfig::new()
        }
    }

    pub fn config(&self) -> &HarrisConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, HarrisError};

    #[test]
    fn test_setters() {
        let builder = DetectorBuilder::new()
            .k(0.05)
            .pre_blur(false)
            .aggregation_kernel(5)
            .aggregation_sigma(1.0)
            .detection_threshold(500.0)
            .tiles(4, 3)
            .max_per_tile(2)
            .min_pixel_radius(6)
            .threads(2);

        let cfg = builder.config();
        assert_eq!(cfg.k, 0.05);
        assert!(!cfg.pre_blur);
        assert_eq!(cfg.aggregation_kernel, 5);
        assert_eq!(cfg.aggregation_sigma, Some(1.0));
        assert_eq!(cfg.detection_threshold, 500.0);
        assert_eq!((cfg.tiles_x, cfg.tiles_y), (4, 3));
        assert_eq!(cfg.max_per_tile, 2);
        assert_eq!(cfg.min_pixel_radius, 6);
        assert_eq!(cfg.n_threads, 2);
        assert!(builder.build().is_ok());
    }

    #[test]
    fn test_build_rejects_even_kernel() {
        let result = DetectorBuilder::new().pre_blur_kernel(4).build();
        assert!(matches!(
            result,
            Err(HarrisError::Config(ConfigError::KernelSize { size: 4, .. }))
        ));
    }

    #[test]
    fn test_presets_and_conversion() {
        let builder = DetectorBuilder::new().preset_sparse();
        assert_eq!(builder.config().min_pixel_radius, 40);

        let cfg = builder.to_config();
        let back = DetectorBuilder::from_config(cfg.clone());
        assert_eq!(back.config(), &cfg.core);
        assert!(DetectorBuilder::new().preset_dense().summary().contains("max_per_tile=10"));
    }
}
