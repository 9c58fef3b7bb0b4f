use harris_core::Grid;
use rayon::prelude::*;
use crate::filter;
use crate::gradient::GradientField;

/// Gaussian-windowed sums of the derivative products at every pixel.
///
/// Together they form the symmetric matrix `[[sxx, sxy], [sxy, syy]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureTensor {
    pub sxx: Grid<f32>,
    pub syy: Grid<f32>,
    pub sxy: Grid<f32>,
}

impl StructureTensor {
    pub fn dimensions(&self) -> (usize, usize) {
        self.sxx.dimensions()
    }
}

/// Aggregates `Ix²`, `Iy²` and `Ix·Iy` with a separable Gaussian window
#[derive(Debug, Clone)]
pub struct StructureTensorAggregator {
    kernel: Vec<f32>,
}

impl StructureTensorAggregator {
    pub fn new(kernel_size: usize, sigma: f32) -> Self {
        Self {
            kernel: filter::gaussian_kernel_1d(kernel_size, sigma),
        }
    }

    pub fn kernel_size(&self) -> usize {
        self.kernel.len()
    }

    pub fn aggregate(&self, gradients: &GradientField) -> StructureTensor {
        let (ixx, iyy, ixy) = derivative_products(gradients);

        let (sxx, (syy, sxy)) = rayon::join(
            || self.smooth(&ixx),
            || rayon::join(|| self.smooth(&iyy), || self.smooth(&ixy)),
        );

        StructureTensor { sxx, syy, sxy }
    }

    fn smooth(&self, products: &Grid<f32>) -> Grid<f32> {
        filter::separable_filter(products, &self.kernel, &self.kernel)
    }
}

/// Per-pixel `(Ix², Iy², Ix·Iy)`
fn derivative_products(gradients: &GradientField) -> (Grid<f32>, Grid<f32>, Grid<f32>) {
    let mut ixx = gradients.ix.like(0.0f32);
    let mut iyy = gradients.ix.like(0.0f32);
    let mut ixy = gradients.ix.like(0.0f32);

    ixx.as_mut_slice()
        .par_iter_mut()
        .zip(iyy.as_mut_slice().par_iter_mut())
        .zip(ixy.as_mut_slice().par_iter_mut())
        .zip(gradients.ix.as_slice().par_iter().zip(gradients.iy.as_slice().par_iter()))
        .for_each(|(((xx, yy), xy), (&gx, &gy))| {
            *xx = gx * gx;
            *yy = gy * gy;
            *xy = gx * gy;
        });

    (ixx, iyy, ixy)
}
