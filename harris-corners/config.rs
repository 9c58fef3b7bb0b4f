use harris_core::{sigma_for_kernel, HarrisConfig};
use crate::builder::DetectorBuilder;
use crate::error::ConfigError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sigma actually used for a Gaussian stage
pub fn resolve_sigma(kernel_size: usize, sigma: Option<f32>) -> f32 {
    sigma.unwrap_or_else(|| sigma_for_kernel(kernel_size))
}

fn check_kernel(stage: &'static str, size: usize, sigma: Option<f32>) -> Result<(), ConfigError> {
    if size == 0 || size % 2 == 0 {
        return Err(ConfigError::KernelSize { stage, size });
    }
    if let Some(sigma) = sigma {
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(ConfigError::Sigma { stage, sigma });
        }
    }
    Ok(())
}

/// Check every option that does not depend on the image
pub fn validate_harris_config(cfg: &HarrisConfig) -> Result<(), ConfigError> {
    check_kernel("pre-blur", cfg.pre_blur_kernel, cfg.pre_blur_sigma)?;
    check_kernel("aggregation", cfg.aggregation_kernel, cfg.aggregation_sigma)?;

    if !cfg.k.is_finite() || cfg.k <= 0.0 || cfg.k >= 0.25 {
        return Err(ConfigError::TraceWeight(cfg.k));
    }
    if !cfg.detection_threshold.is_finite() || cfg.detection_threshold < 0.0 {
        return Err(ConfigError::Threshold(cfg.detection_threshold));
    }
    if cfg.tiles_x == 0 || cfg.tiles_y == 0 {
        return Err(ConfigError::TileGrid {
            tiles_x: cfg.tiles_x,
            tiles_y: cfg.tiles_y,
        });
    }
    if cfg.max_per_tile == 0 {
        return Err(ConfigError::MaxPerTile(cfg.max_per_tile));
    }
    if cfg.min_pixel_radius == 0 {
        return Err(ConfigError::Radius(cfg.min_pixel_radius));
    }
    Ok(())
}

/// Detector settings plus descriptive metadata, as stored on disk
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DetectorConfig {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub description: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub version: Option<String>,
    /// Serialized as the trailing `[core]` table
    pub core: HarrisConfig,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectorConfig {
    /// Default settings, no metadata
    pub fn new() -> Self {
        Self {
            core: HarrisConfig::default(),
            name: None,
            description: None,
            version: None,
        }
    }

    /// Up to ten points per tile, ten pixels apart
    pub fn dense_preset() -> Self {
        Self {
            core: HarrisConfig {
                max_per_tile: 10,
                min_pixel_radius: 10,
                ..HarrisConfig::default()
            },
            name: Some("Dense".to_string()),
            description: Some("Many well-spread corners for tracking".to_string()),
            version: Some("1.0".to_string()),
        }
    }

    /// A handful of strong, widely separated corners per tile
    pub fn sparse_preset() -> Self {
        Self {
            core: HarrisConfig {
                max_per_tile: 5,
                min_pixel_radius: 40,
                ..HarrisConfig::default()
            },
            name: Some("Sparse".to_string()),
            description: Some("Few strong corners with wide separation".to_string()),
            version: Some("1.0".to_string()),
        }
    }

    /// Add metadata to configuration
    pub fn with_metadata(mut self, name: &str, description: &str) -> Self {
        self.name = Some(name.to_string());
        self.description = Some(description.to_string());
        self.version = Some("1.0".to_string());
        self
    }

    /// Convert to DetectorBuilder for further customization
    pub fn to_builder(self) -> DetectorBuilder {
        DetectorBuilder::from_config(self)
    }

    /// Generate human-readable summary
    pub fn summary(&self) -> String {
        let c = &self.core;
        format!(
            "DetectorConfig{}: k={}, threshold={}, pre_blur={}, kernels=[pre:{}, agg:{}], tiles={}x{}, max_per_tile={}, radius={}",
            self.name.as_deref().map(|n| format!(" '{}'", n)).unwrap_or_default(),
            c.k,
            c.detection_threshold,
            c.pre_blur,
            c.pre_blur_kernel,
            c.aggregation_kernel,
            c.tiles_x,
            c.tiles_y,
            c.max_per_tile,
            c.min_pixel_radius
        )
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_harris_config(&self.core)
    }

    /// Save configuration to JSON file
    #[cfg(feature = "serde")]
    pub fn save_json<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load configuration from JSON file
    #[cfg(feature = "serde")]
    pub fn load_json<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save configuration to TOML file
    #[cfg(feature = "serde")]
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Load configuration from TOML file
    #[cfg(feature = "serde")]
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "serde")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    #[cfg(feature = "serde")]
    pub fn from_toml(toml_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }
}
