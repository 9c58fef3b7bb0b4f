use harris_core::InterestPoint;

/// Bucketed lookup over a finished point sequence.
///
/// Answers "which points are near this position" (e.g. under a cursor)
/// without scanning the whole sequence. Built once and never mutated.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    points: Vec<InterestPoint>,
    cell_size: usize,
    cells_x: usize,
    cells_y: usize,
    /// Indices into `points`, ascending within each bucket
    buckets: Vec<Vec<usize>>,
}

impl SpatialIndex {
    /// Index `points` lying in a `width` × `height` image.
    ///
    /// A `cell_size` of 0 is treated as 1. Points outside the image are
    /// kept in the sequence and land in the nearest edge bucket.
    pub fn new(points: Vec<InterestPoint>, width: usize, height: usize, cell_size: usize) -> Self {
        let cell_size = cell_size.max(1);
        let cells_x = width.max(1).div_ceil(cell_size);
        let cells_y = height.max(1).div_ceil(cell_size);

        let mut buckets = vec![Vec::new(); cells_x * cells_y];
        for (i, p) in points.iter().enumerate() {
            let cx = (p.col / cell_size).min(cells_x - 1);
            let cy = (p.row / cell_size).min(cells_y - 1);
            buckets[cy * cells_x + cx].push(i);
        }

        Self {
            points,
            cell_size,
            cells_x,
            cells_y,
            buckets,
        }
    }

    /// The indexed sequence, in its original order
    pub fn points(&self) -> &[InterestPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points with Chebyshev distance strictly below `radius` from
    /// (row, col), in sequence order.
    pub fn query(&self, row: usize, col: usize, radius: usize) -> Vec<&InterestPoint> {
        if radius == 0 || self.points.is_empty() {
            return Vec::new();
        }
        let reach = radius - 1;

        let cy0 = (row.saturating_sub(reach) / self.cell_size).min(self.cells_y - 1);
        let cy1 = (row.saturating_add(reach) / self.cell_size).min(self.cells_y - 1);
        let cx0 = (col.saturating_sub(reach) / self.cell_size).min(self.cells_x - 1);
        let cx1 = (col.saturating_add(reach) / self.cell_size).min(self.cells_x - 1);

        let mut hits: Vec<usize> = Vec::new();
        for cy in cy0..=cy1 {
            for cx in cx0..=cx1 {
                hits.extend(self.buckets[cy * self.cells_x + cx].iter().copied().filter(|&i| {
                    let p = &self.points[i];
                    p.row.abs_diff(row) < radius && p.col.abs_diff(col) < radius
                }));
            }
        }
        hits.sort_unstable();
        hits.into_iter().map(|i| &self.points[i]).collect()
    }

    /// Closest point by Chebyshev distance within `radius`; ties go to the
    /// earlier point in the sequence.
    pub fn nearest(&self, row: usize, col: usize, radius: usize) -> Option<&InterestPoint> {
        self.query(row, col, radius).into_iter().min_by_key(|p| {
            p.row.abs_diff(row).max(p.col.abs_diff(col))
        })
    }
}
