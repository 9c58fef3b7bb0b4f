use std::ops::{Index, IndexMut};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors raised when a grid is assembled from caller-supplied parts
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("invalid grid dimensions: {width}x{height} (must be > 0)")]
    EmptyDimensions { width: usize, height: usize },
    #[error("grid data length mismatch: expected {expected}, got {actual}")]
    DataLength { expected: usize, actual: usize },
    #[error("grid dimensions {width}x{height} overflow the address space")]
    TooLarge { width: usize, height: usize },
}

/// Dense row-major W×H grid
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

/// Single-channel pixel intensities
pub type IntensityGrid = Grid<f32>;

/// Corner response, one entry per source pixel
pub type ResponseMap = Grid<f32>;

/// `width * height`, rejecting empty or overflowing shapes
fn cell_count(width: usize, height: usize) -> Result<usize, GridError> {
    if width == 0 || height == 0 {
        return Err(GridError::EmptyDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(GridError::TooLarge { width, height })
}

impl<T> Grid<T> {
    /// Wrap a row-major buffer, checking it holds exactly `width * height` cells
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self, GridError> {
        let expected = cell_count(width, height)?;
        if data.len() != expected {
            return Err(GridError::DataLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// (width, height)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.height && col < self.width {
            self.data.get(row * self.width + col)
        } else {
            None
        }
    }

    /// Borrow one row
    pub fn row(&self, row: usize) -> &[T] {
        &self.data[row * self.width..(row + 1) * self.width]
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// A grid of the same shape filled with `value`.
    ///
    /// Infallible: the shape was validated when `self` was built.
    pub fn like<U: Clone>(&self, value: U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            data: vec![value; self.width * self.height],
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T: Clone> Grid<T> {
    /// A `width` × `height` grid with every cell set to `value`
    pub fn filled(width: usize, height: usize, value: T) -> Result<Self, GridError> {
        let len = cell_count(width, height)?;
        Self::from_vec(width, height, vec![value; len])
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    /// Index by (row, col)
    fn index(&self, (row, col): (usize, usize)) -> &T {
        debug_assert!(col < self.width, "column {} out of range", col);
        &self.data[row * self.width + col]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        debug_assert!(col < self.width, "column {} out of range", col);
        &mut self.data[row * self.width + col]
    }
}

impl IntensityGrid {
    /// Convert a row-major 8-bit grayscale buffer.
    ///
    /// Intensities keep their 0-255 scale; the default detection threshold
    /// is calibrated against it.
    pub fn from_luma8(width: usize, height: usize, pixels: &[u8]) -> Result<Self, GridError> {
        Self::from_vec(width, height, pixels.iter().map(|&p| p as f32).collect())
    }
}

/// A salient point selected by non-maximum suppression
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InterestPoint {
    pub row: usize,
    pub col: usize,
    pub score: f32,
}

impl InterestPoint {
    pub fn new(row: usize, col: usize, score: f32) -> Self {
        Self { row, col, score }
    }

    /// max(|Δrow|, |Δcol|)
    pub fn chebyshev_distance(&self, other: &InterestPoint) -> usize {
        self.row.abs_diff(other.row).max(self.col.abs_diff(other.col))
    }
}

/// Tunable parameters of the detection pipeline
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HarrisConfig {
    /// Trace penalty in `det(M) - k * trace(M)^2`
    pub k: f32,
    /// Smooth the intensities before differentiation
    pub pre_blur: bool,
    pub pre_blur_kernel: usize,
    /// `None` derives sigma from the kernel size
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub pre_blur_sigma: Option<f32>,
    /// Gaussian window over the derivative products
    pub aggregation_kernel: usize,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub aggregation_sigma: Option<f32>,
    pub detection_threshold: f32,
    pub tiles_x: usize,
    pub tiles_y: usize,
    pub max_per_tile: usize,
    /// Chebyshev exclusion radius around each accepted point
    pub min_pixel_radius: usize,
    pub n_threads: usize,
}

impl Default for HarrisConfig {
    fn default() -> Self {
        Self {
            k: 0.04,
            pre_blur: true,
            pre_blur_kernel: 5,
            pre_blur_sigma: None,
            aggregation_kernel: 7,
            aggregation_sigma: None,
            detection_threshold: 10_000.0,
            tiles_x: 10,
            tiles_y: 10,
            max_per_tile: 10,
            min_pixel_radius: 10,
            n_threads: num_cpus::get().max(1),
        }
    }
}

/// Sigma used for a Gaussian of `kernel_size` taps when none is given
pub fn sigma_for_kernel(kernel_size: usize) -> f32 {
    0.3 * ((kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Initialize Rayon thread pool with the specified number of threads
pub fn init_thread_pool(n_threads: usize) -> Result<(), rayon::ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .build_global()
}
