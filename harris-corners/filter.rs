//! Separable correlation over dense grids.
//!
//! Every filter here reads out-of-range samples through a reflect-101
//! border (`dcb|abcd|cba`), never zero padding, so responses near the
//! image edge are not biased toward strong gradients.

use harris_core::Grid;
use rayon::prelude::*;

/// Taps of the 3×3 Sobel operator
pub const SOBEL_SIZE: usize = 3;

/// Central difference half of the Sobel operator
pub(crate) const SOBEL_DERIVATIVE: [f32; SOBEL_SIZE] = [-1.0, 0.0, 1.0];

/// Binomial smoothing half of the Sobel operator
pub(crate) const SOBEL_SMOOTHING: [f32; SOBEL_SIZE] = [1.0, 2.0, 1.0];

/// Create a normalized 1D gaussian kernel.
///
/// # Arguments
///
/// * `kernel_size` - Number of taps, odd.
/// * `sigma` - Standard deviation in pixels.
pub fn gaussian_kernel_1d(kernel_size: usize, sigma: f32) -> Vec<f32> {
    let mean = (kernel_size as f32 - 1.0) / 2.0;
    let two_sigma_sq = 2.0 * sigma * sigma;

    let mut kernel: Vec<f32> = (0..kernel_size)
        .map(|i| {
            let x = i as f32 - mean;
            (-(x * x) / two_sigma_sq).exp()
        })
        .collect();

    let norm = kernel.iter().sum::<f32>();
    kernel.iter_mut().for_each(|k| *k /= norm);
    kernel
}

/// Map a possibly out-of-range index into `0..n` by mirroring about the
/// edge pixels without repeating them.
#[inline]
pub(crate) fn reflect_101(i: isize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let last = n as isize - 1;
    let mut i = i;
    while i < 0 || i > last {
        if i < 0 {
            i = -i;
        }
        if i > last {
            i = 2 * last - i;
        }
    }
    i as usize
}

/// Correlate every row with `kernel_x`, then every column with `kernel_y`.
///
/// Both passes run as parallel maps over output rows. Summation order per
/// cell is fixed, so results do not depend on the thread count.
pub fn separable_filter(src: &Grid<f32>, kernel_x: &[f32], kernel_y: &[f32]) -> Grid<f32> {
    let (width, height) = src.dimensions();
    let half_x = (kernel_x.len() / 2) as isize;
    let half_y = (kernel_y.len() / 2) as isize;

    let mut temp = src.like(0.0f32);
    temp.as_mut_slice()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(r, out)| {
            let row = src.row(r);
            for (c, value) in out.iter_mut().enumerate() {
                let mut acc = 0.0f32;
                for (i, &k) in kernel_x.iter().enumerate() {
                    let x = reflect_101(c as isize + i as isize - half_x, width);
                    acc += row[x] * k;
                }
                *value = acc;
            }
        });

    let mut dst = src.like(0.0f32);
    dst.as_mut_slice()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(r, out)| {
            let rows: Vec<&[f32]> = (0..kernel_y.len())
                .map(|i| temp.row(reflect_101(r as isize + i as isize - half_y, height)))
                .collect();
            for (c, value) in out.iter_mut().enumerate() {
                let mut acc = 0.0f32;
                for (row, &k) in rows.iter().zip(kernel_y) {
                    acc += row[c] * k;
                }
                *value = acc;
            }
        });

    dst
}
