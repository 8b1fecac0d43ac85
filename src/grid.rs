//! Tile grid planning and enumeration.
//!
//! A raw geographic bounding box rarely measures an exact number of tiles,
//! so the planner pads it symmetrically in metric space until its width and
//! height are integer multiples of the tile size. The enumerator then walks
//! the padded grid row by row, projecting each tile window back to
//! geographic degrees independently so projection error never accumulates
//! across the grid.

use std::fmt;

use crate::error::{Result, TileError};
use crate::projection::{CoordinateProjector, GeoBBox, MetricBBox};

/// Integer grid address of a tile. Column 0 is the westernmost column,
/// row 0 the northernmost row (matching raster addressing, where row 0 is
/// the top of the image).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    pub column: u32,
    pub row: u32,
}

impl TileCoord {
    pub fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.column, self.row)
    }
}

/// A bounding box adjusted to hold an exact integer number of tiles.
#[derive(Debug, Clone, Copy)]
pub struct TileGridPlan {
    /// Adjusted bounding box in geographic degrees.
    pub bbox: GeoBBox,
    /// Adjusted bounding box in Web Mercator meters.
    pub metric_bbox: MetricBBox,
    /// Tile edge length in meters.
    pub tile_size_m: f64,
    /// Number of tile columns.
    pub tile_count_x: u32,
    /// Number of tile rows.
    pub tile_count_y: u32,
}

impl TileGridPlan {
    /// Total number of tiles in the grid.
    pub fn tile_count(&self) -> u64 {
        self.tile_count_x as u64 * self.tile_count_y as u64
    }
}

/// Plans tile grids over geographic bounding boxes.
pub struct TileGridPlanner<'a> {
    projector: &'a CoordinateProjector,
}

impl<'a> TileGridPlanner<'a> {
    pub fn new(projector: &'a CoordinateProjector) -> Self {
        Self { projector }
    }

    /// Expands `bbox` so its metric width and height are exact multiples of
    /// `tile_size_m`.
    ///
    /// A partial tile always rounds up to a whole one, and the required
    /// padding is split evenly between opposite edges so the adjusted box
    /// keeps the original center.
    pub fn plan(&self, bbox: &GeoBBox, tile_size_m: f64) -> Result<TileGridPlan> {
        if !tile_size_m.is_finite() || tile_size_m <= 0.0 {
            return Err(TileError::InvalidConfiguration(format!(
                "tile size must be positive, got {} m",
                tile_size_m
            )));
        }

        let metric = self.projector.to_metric(bbox)?;
        let width_m = metric.width();
        let height_m = metric.height();
        if width_m <= 0.0 || height_m <= 0.0 || !width_m.is_finite() || !height_m.is_finite() {
            return Err(TileError::InvalidBoundingBox(format!(
                "degenerate extent: {} m x {} m",
                width_m, height_m
            )));
        }

        // A region smaller than one tile still gets one full tile.
        let tile_count_x = ((width_m / tile_size_m).ceil() as u32).max(1);
        let tile_count_y = ((height_m / tile_size_m).ceil() as u32).max(1);

        let pad_x = tile_count_x as f64 * tile_size_m - width_m;
        let pad_y = tile_count_y as f64 * tile_size_m - height_m;

        let adjusted_metric = MetricBBox {
            min_x: metric.min_x - pad_x / 2.0,
            min_y: metric.min_y - pad_y / 2.0,
            max_x: metric.max_x + pad_x / 2.0,
            max_y: metric.max_y + pad_y / 2.0,
        };
        let adjusted = self.projector.to_geographic(&adjusted_metric)?;

        Ok(TileGridPlan {
            bbox: adjusted,
            metric_bbox: adjusted_metric,
            tile_size_m,
            tile_count_x,
            tile_count_y,
        })
    }
}

/// Enumerates the per-tile geographic windows of a planned grid.
pub struct TileEnumerator<'a> {
    projector: &'a CoordinateProjector,
}

impl<'a> TileEnumerator<'a> {
    pub fn new(projector: &'a CoordinateProjector) -> Self {
        Self { projector }
    }

    /// Returns a row-major iterator over `(coordinate, geographic window)`
    /// pairs. Each call re-derives the same finite sequence from the plan.
    pub fn tiles(&self, plan: &TileGridPlan) -> TileIter<'a> {
        TileIter {
            projector: self.projector,
            origin_x: plan.metric_bbox.min_x,
            top_y: plan.metric_bbox.max_y,
            tile_size_m: plan.tile_size_m,
            tile_count_x: plan.tile_count_x,
            tile_count_y: plan.tile_count_y,
            next: 0,
        }
    }
}

/// Iterator over a planned grid: rows top (north) to bottom, columns west
/// to east within each row.
pub struct TileIter<'a> {
    projector: &'a CoordinateProjector,
    origin_x: f64,
    top_y: f64,
    tile_size_m: f64,
    tile_count_x: u32,
    tile_count_y: u32,
    next: u64,
}

impl Iterator for TileIter<'_> {
    type Item = Result<(TileCoord, GeoBBox)>;

    fn next(&mut self) -> Option<Self::Item> {
        let total = self.tile_count_x as u64 * self.tile_count_y as u64;
        if self.next >= total {
            return None;
        }
        let column = (self.next % self.tile_count_x as u64) as u32;
        let row = (self.next / self.tile_count_x as u64) as u32;
        self.next += 1;

        // Each tile window is derived from the plan origin by whole-tile
        // offsets, never from the previous tile's projected box.
        let min_x = self.origin_x + column as f64 * self.tile_size_m;
        let max_y = self.top_y - row as f64 * self.tile_size_m;
        let metric = MetricBBox {
            min_x,
            min_y: max_y - self.tile_size_m,
            max_x: min_x + self.tile_size_m,
            max_y,
        };

        Some(
            self.projector
                .to_geographic(&metric)
                .map(|bbox| (TileCoord::new(column, row), bbox)),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let total = self.tile_count_x as u64 * self.tile_count_y as u64;
        let remaining = (total - self.next) as usize;
        (remaining, Some(remaining))
    }
}
