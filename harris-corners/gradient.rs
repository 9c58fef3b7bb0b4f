use harris_core::{Grid, IntensityGrid};
use crate::filter::{self, SOBEL_DERIVATIVE, SOBEL_SMOOTHING};

/// Horizontal and vertical intensity derivatives, same shape as the source
#[derive(Debug, Clone, PartialEq)]
pub struct GradientField {
    pub ix: Grid<f32>,
    pub iy: Grid<f32>,
}

impl GradientField {
    pub fn dimensions(&self) -> (usize, usize) {
        self.ix.dimensions()
    }
}

/// Sobel differentiation with optional Gaussian pre-smoothing.
///
/// The operator is the 3×3 kernel `[1,0,-1; 2,0,-2; 1,0,-1]` (and its
/// transpose for `Iy`) applied as a true convolution, so `Ix` is positive
/// where intensity increases to the right and `Iy` where it increases
/// downward.
#[derive(Debug, Clone)]
pub struct GradientEstimator {
    pre_blur: Option<Vec<f32>>,
}

impl GradientEstimator {
    /// Plain Sobel, no smoothing
    pub fn new() -> Self {
        Self { pre_blur: None }
    }

    /// Smooth with a separable Gaussian before differentiating
    pub fn with_pre_blur(kernel_size: usize, sigma: f32) -> Self {
        Self {
            pre_blur: Some(filter::gaussian_kernel_1d(kernel_size, sigma)),
        }
    }

    /// Widest kernel this estimator applies, per axis
    pub fn footprint(&self) -> usize {
        self.pre_blur
            .as_ref()
            .map_or(filter::SOBEL_SIZE, |k| k.len().max(filter::SOBEL_SIZE))
    }

    pub fn compute(&self, grid: &IntensityGrid) -> GradientField {
        let smoothed;
        let source = match &self.pre_blur {
            Some(kernel) => {
                smoothed = filter::separable_filter(grid, kernel, kernel);
                &smoothed
            }
            None => grid,
        };

        let (ix, iy) = rayon::join(
            || filter::separable_filter(source, &SOBEL_DERIVATIVE, &SOBEL_SMOOTHING),
            || filter::separable_filter(source, &SOBEL_SMOOTHING, &SOBEL_DERIVATIVE),
        );

        GradientField { ix, iy }
    }
}

impl Default for GradientEstimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertical_ramp(width: usize, height: usize, step: f32) -> IntensityGrid {
        let data = (0..width * height).map(|i| (i / width) as f32 * step).collect();
        Grid::from_vec(width, height, data).unwrap()
    }

    #[test]
    fn test_constant_image_has_zero_gradient() {
        let grid = Grid::filled(16, 12, 128.0f32).unwrap();
        for estimator in [GradientEstimator::new(), GradientEstimator::with_pre_blur(5, 1.1)] {
            let field = estimator.compute(&grid);
            assert_eq!(field.dimensions(), (16, 12));
            assert!(field.ix.as_slice().iter().all(|&v| v == 0.0));
            assert!(field.iy.as_slice().iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn test_vertical_ramp_sign_and_magnitude() {
        let grid = vertical_ramp(6, 10, 5.0);
        let field = GradientEstimator::new().compute(&grid);
        for r in 1..9 {
            for c in 0..6 {
                assert_eq!(field.iy[(r, c)], 40.0);
                assert_eq!(field.ix[(r, c)], 0.0);
            }
        }
    }

    #[test]
    fn test_pre_blur_preserves_interior_slope() {
        let grid = vertical_ramp(12, 20, 5.0);
        let field = GradientEstimator::with_pre_blur(5, 1.1).compute(&grid);
        // Blurring a linear ramp leaves it linear away from the border
        for r in 4..16 {
            assert!((field.iy[(r, 6)] - 40.0).abs() < 1e-2, "row {}: {}", r, field.iy[(r, 6)]);
        }
    }

    #[test]
    fn test_footprint() {
        assert_eq!(GradientEstimator::new().footprint(), 3);
        assert_eq!(GradientEstimator::with_pre_blur(5, 1.0).footprint(), 5);
        assert_eq!(GradientEstimator::with_pre_blur(1, 1.0).footprint(), 3);
    }
}
