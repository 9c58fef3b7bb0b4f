use harris_core::ResponseMap;
use rayon::prelude::*;
use crate::structure_tensor::StructureTensor;

/// `det(M) - k * trace(M)^2` for `M = [[sxx, sxy], [sxy, syy]]`.
///
/// Evaluated in f64: the products of aggregated squared Sobel responses
/// reach ~1e12 on 8-bit input.
#[inline]
pub fn corner_response(sxx: f32, syy: f32, sxy: f32, k: f64) -> f64 {
    let (a, b, c) = (sxx as f64, syy as f64, sxy as f64);
    let det = a * b - c * c;
    let trace = a + b;
    det - k * trace * trace
}

/// Scores every pixel and zeroes the ones below the detection threshold.
///
/// The sign of the response is kept: edges score large negative values and
/// are clamped away with flat regions, rather than being promoted to
/// corners by taking the magnitude.
#[derive(Debug, Clone)]
pub struct CornerResponseScorer {
    k: f64,
    detection_threshold: f32,
}

impl CornerResponseScorer {
    pub fn new(k: f32, detection_threshold: f32) -> Self {
        Self {
            k: k as f64,
            detection_threshold,
        }
    }

    pub fn score(&self, tensor: &StructureTensor) -> ResponseMap {
        let threshold = self.detection_threshold as f64;
        let mut response = tensor.sxx.like(0.0f32);

        response
            .as_mut_slice()
            .par_iter_mut()
            .zip(tensor.sxx.as_slice().par_iter())
            .zip(tensor.syy.as_slice().par_iter().zip(tensor.sxy.as_slice().par_iter()))
            .for_each(|((r, &sxx), (&syy, &sxy))| {
                let value = corner_response(sxx, syy, sxy, self.k);
                *r = if value < threshold { 0.0 } else { value as f32 };
            });

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harris_core::Grid;

    fn tensor(sxx: f32, syy: f32, sxy: f32) -> StructureTensor {
        StructureTensor {
            sxx: Grid::filled(4, 3, sxx).unwrap(),
            syy: Grid::filled(4, 3, syy).unwrap(),
            sxy: Grid::filled(4, 3, sxy).unwrap(),
        }
    }

    #[test]
    fn test_corner_response_values() {
        // Two strong orthogonal directions
        assert!((corner_response(100.0, 100.0, 0.0, 0.04) - 8_400.0).abs() < 1e-9);
        // Single direction is an edge
        assert!(corner_response(100.0, 0.0, 0.0, 0.04) < 0.0);
        assert_eq!(corner_response(0.0, 0.0, 0.0, 0.04), 0.0);
    }

    #[test]
    fn test_edges_are_clamped_not_mirrored() {
        let map = CornerResponseScorer::new(0.04, 0.0).score(&tensor(1000.0, 0.0, 0.0));
        assert!(map.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_threshold_clamps_to_zero() {
        // R = 1e6 - 0.04 * 4e6 = 840_000
        let t = tensor(1000.0, 1000.0, 0.0);
        let kept = CornerResponseScorer::new(0.04, 840_000.0).score(&t);
        assert!(kept.as_slice().iter().all(|&v| v == 840_000.0));

        let clamped = CornerResponseScorer::new(0.04, 840_001.0).score(&t);
        assert_eq!(clamped.dimensions(), (4, 3));
        assert!(clamped.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_larger_k_lowers_response() {
        let low = corner_response(500.0, 300.0, 50.0, 0.04);
        let high = corner_response(500.0, 300.0, 50.0, 0.06);
        assert!(high < low);
    }
}
