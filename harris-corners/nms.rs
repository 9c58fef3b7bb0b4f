//! Tiled greedy non-maximum suppression.
//!
//! The response map is cut into `tiles_x × tiles_y` equal tiles; pixels in
//! the trailing strip that does not fill a whole tile are never selected.
//! Tiles are visited in raster order and each tile's candidates in
//! descending score (ties broken by row, then column). A candidate is
//! accepted when its cell is not yet covered by the square exclusion zone
//! of an earlier acceptance and its tile is still under `max_per_tile`.
//!
//! This is a greedy maximal independent set, not a maximum one. Because
//! exclusion zones reach across tile boundaries, a weak point accepted in
//! an early tile can suppress a stronger point in a later tile; the
//! acceptance order above decides who wins.

use std::cmp::Ordering;

use harris_core::{Grid, HarrisConfig, InterestPoint, ResponseMap};
use log::{debug, trace};
use rayon::prelude::*;

use crate::error::{ConfigError, HarrisError, HarrisResult};

/// Partition of a response map into equal, non-overlapping tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileLayout {
    tiles_x: usize,
    tiles_y: usize,
    tile_width: usize,
    tile_height: usize,
}

impl TileLayout {
    pub fn new(width: usize, height: usize, tiles_x: usize, tiles_y: usize) -> HarrisResult<Self> {
        if tiles_x == 0 || tiles_y == 0 {
            return Err(ConfigError::TileGrid { tiles_x, tiles_y }.into());
        }
        if width < tiles_x || height < tiles_y {
            return Err(HarrisError::InsufficientSize {
                stage: "tile grid",
                width,
                height,
                required_width: tiles_x,
                required_height: tiles_y,
            });
        }
        Ok(Self {
            tiles_x,
            tiles_y,
            tile_width: width / tiles_x,
            tile_height: height / tiles_y,
        })
    }

    pub fn tile_count(&self) -> usize {
        self.tiles_x * self.tiles_y
    }

    /// (width, height) of every tile
    pub fn tile_size(&self) -> (usize, usize) {
        (self.tile_width, self.tile_height)
    }

    /// (row, col) of the top-left pixel of tile `index`, raster order
    pub fn tile_origin(&self, index: usize) -> (usize, usize) {
        let ty = index / self.tiles_x;
        let tx = index % self.tiles_x;
        (ty * self.tile_height, tx * self.tile_width)
    }

    /// Tile containing (row, col), or `None` in the dropped trailing strip
    pub fn tile_of(&self, row: usize, col: usize) -> Option<usize> {
        let ty = row / self.tile_height;
        let tx = col / self.tile_width;
        (ty < self.tiles_y && tx < self.tiles_x).then_some(ty * self.tiles_x + tx)
    }
}

/// Occupancy of the exclusion zones of accepted points
struct SuppressionMask {
    cells: Grid<bool>,
}

impl SuppressionMask {
    fn new(response: &ResponseMap) -> Self {
        Self {
            cells: response.like(false),
        }
    }

    fn is_marked(&self, row: usize, col: usize) -> bool {
        self.cells[(row, col)]
    }

    /// Mark every cell within Chebyshev distance `radius`, clipped to the grid
    fn mark_around(&mut self, row: usize, col: usize, radius: usize) {
        let (width, height) = self.cells.dimensions();
        let rows = row.saturating_sub(radius)..=(row + radius).min(height - 1);
        let cols = col.saturating_sub(radius)..=(col + radius).min(width - 1);
        for r in rows {
            let start = r * width;
            self.cells.as_mut_slice()[start + cols.start()..=start + cols.end()].fill(true);
        }
    }
}

/// Descending score, then row, then column
fn by_score_then_position(a: &InterestPoint, b: &InterestPoint) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then(a.row.cmp(&b.row))
        .then(a.col.cmp(&b.col))
}

/// Reduces a dense response map to well-separated interest points
#[derive(Debug, Clone)]
pub struct NonMaxSuppressor {
    tiles_x: usize,
    tiles_y: usize,
    max_per_tile: usize,
    min_pixel_radius: usize,
    detection_threshold: f32,
}

impl NonMaxSuppressor {
    pub fn new(
        tiles_x: usize,
        tiles_y: usize,
        max_per_tile: usize,
        min_pixel_radius: usize,
        detection_threshold: f32,
    ) -> Self {
        Self {
            tiles_x,
            tiles_y,
            max_per_tile,
            min_pixel_radius,
            detection_threshold,
        }
    }

    pub fn from_config(cfg: &HarrisConfig) -> Self {
        Self::new(
            cfg.tiles_x,
            cfg.tiles_y,
            cfg.max_per_tile,
            cfg.min_pixel_radius,
            cfg.detection_threshold,
        )
    }

    pub fn tile_layout(&self, width: usize, height: usize) -> HarrisResult<TileLayout> {
        TileLayout::new(width, height, self.tiles_x, self.tiles_y)
    }

    /// Points in acceptance order: tiles in raster order, then descending
    /// score within a tile. An empty result is not an error.
    pub fn suppress(&self, response: &ResponseMap) -> HarrisResult<Vec<InterestPoint>> {
        let (width, height) = response.dimensions();
        let layout = self.tile_layout(width, height)?;

        // Gathering and sorting is tile-local; only the mask walk is ordered.
        let per_tile: Vec<Vec<InterestPoint>> = (0..layout.tile_count())
            .into_par_iter()
            .map(|tile| self.tile_candidates(response, &layout, tile))
            .collect();

        let mut mask = SuppressionMask::new(response);
        let mut accepted = Vec::new();
        let mut candidate_count = 0;

        for (tile, candidates) in per_tile.into_iter().enumerate() {
            candidate_count += candidates.len();
            let mut taken = 0;
            for candidate in candidates {
                if taken == self.max_per_tile {
                    break;
                }
                if mask.is_marked(candidate.row, candidate.col) {
                    continue;
                }
                mask.mark_around(candidate.row, candidate.col, self.min_pixel_radius);
                accepted.push(candidate);
                taken += 1;
            }
            if taken > 0 {
                trace!("tile {} at {:?}: accepted {}", tile, layout.tile_origin(tile), taken);
            }
        }

        debug!(
            "nms: {} candidates in {} tiles, {} accepted",
            candidate_count,
            layout.tile_count(),
            accepted.len()
        );
        Ok(accepted)
    }

    fn tile_candidates(&self, response: &ResponseMap, layout: &TileLayout, tile: usize) -> Vec<InterestPoint> {
        let (row0, col0) = layout.tile_origin(tile);
        let (tile_width, tile_height) = layout.tile_size();

        // Cells zeroed by scoring are never candidates
        let floor = self.detection_threshold.max(0.0);
        let mut candidates = Vec::new();
        for row in row0..row0 + tile_height {
            let cells = &response.row(row)[col0..col0 + tile_width];
            for (dc, &score) in cells.iter().enumerate() {
                if score > floor {
                    candidates.push(InterestPoint::new(row, col0 + dc, score));
                }
            }
        }
        candidates.sort_by(by_score_then_position);
        candidates
    }
}
