//! Paired composites: one side-by-side image per grid coordinate, built
//! from two tile sets covering the same grid.
//!
//! Image-to-image training samples pair an input tile with its target tile
//! in a single file. When the two sources were produced at different
//! resolutions the larger one is scaled down so both halves cover equal
//! pixel area; nothing is ever upscaled past its native resolution.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::RgbImage;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::error::{Result, TileError};
use crate::grid::TileCoord;
use crate::stitch::save_jpeg;
use crate::tileset::TileSet;

/// Options controlling a combine run.
#[derive(Debug, Clone)]
pub struct CombineOptions {
    /// Worker thread count; `None` uses the global rayon pool.
    pub jobs: Option<usize>,
    /// Relative tolerance when comparing per-tile aspect ratios.
    pub aspect_tolerance: f64,
    /// Draw a progress bar while combining.
    pub show_progress: bool,
}

impl Default for CombineOptions {
    fn default() -> Self {
        Self {
            jobs: None,
            aspect_tolerance: 1e-3,
            show_progress: false,
        }
    }
}

/// Per-set scale factors equalizing tile pixel areas.
///
/// The set with the larger area is scaled by `sqrt(smaller / larger)`, the
/// other stays at 1.0.
fn equal_area_scales(dims_a: (u32, u32), dims_b: (u32, u32)) -> (f64, f64) {
    if dims_a == dims_b {
        return (1.0, 1.0);
    }
    let area_a = dims_a.0 as f64 * dims_a.1 as f64;
    let area_b = dims_b.0 as f64 * dims_b.1 as f64;
    if area_a > area_b {
        ((area_b / area_a).sqrt(), 1.0)
    } else {
        (1.0, (area_a / area_b).sqrt())
    }
}

fn scaled(dims: (u32, u32), scale: f64) -> (u32, u32) {
    (
        (dims.0 as f64 * scale).round() as u32,
        (dims.1 as f64 * scale).round() as u32,
    )
}

/// Combines two tile sets into per-coordinate side-by-side composites.
///
/// For every coordinate present in both sets, writes
/// `"{column}_{row}.jpg"` into `out_dir` with set A's tile on the left and
/// set B's on the right, both scaled to equal pixel area. Coordinates are
/// processed in parallel; output paths are independent, so a failed run can
/// simply be retried. Returns the written paths in row-major order.
pub fn combine(
    set_a: &TileSet,
    set_b: &TileSet,
    out_dir: &Path,
    options: &CombineOptions,
) -> Result<Vec<PathBuf>> {
    if set_a.dimensions() != set_b.dimensions() {
        let (a_columns, a_rows) = set_a.dimensions();
        let (b_columns, b_rows) = set_b.dimensions();
        return Err(TileError::GridMismatch {
            a_columns,
            a_rows,
            b_columns,
            b_rows,
        });
    }

    let dims_a = set_a.tile_dimensions();
    let dims_b = set_b.tile_dimensions();
    let aspect_a = dims_a.0 as f64 / dims_a.1 as f64;
    let aspect_b = dims_b.0 as f64 / dims_b.1 as f64;
    if (aspect_a - aspect_b).abs() > options.aspect_tolerance * aspect_a.max(aspect_b) {
        return Err(TileError::AspectRatioMismatch {
            a: aspect_a,
            b: aspect_b,
        });
    }

    let (scale_a, scale_b) = equal_area_scales(dims_a, dims_b);
    let scaled_a = scaled(dims_a, scale_a);
    let scaled_b = scaled(dims_b, scale_b);

    std::fs::create_dir_all(out_dir)?;

    // Only coordinates present in both sets produce a composite.
    let coords: Vec<TileCoord> = set_a
        .tiles()
        .map(|(coord, _)| coord)
        .filter(|coord| set_b.contains(coord.column, coord.row))
        .collect();

    let progress = if options.show_progress {
        let bar = ProgressBar::new(coords.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} tiles")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    } else {
        ProgressBar::hidden()
    };

    let run = || -> Result<Vec<PathBuf>> {
        coords
            .par_iter()
            .map(|coord| {
                let path = combine_one(
                    set_a, set_b, *coord, scaled_a, scaled_b, out_dir,
                )?;
                progress.inc(1);
                Ok(path)
            })
            .collect()
    };

    let written = match options.jobs {
        Some(jobs) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build()
                .map_err(|e| TileError::InvalidConfiguration(e.to_string()))?;
            pool.install(run)
        }
        None => run(),
    }?;
    progress.finish_and_clear();

    Ok(written)
}

/// Builds and writes the composite for a single coordinate.
fn combine_one(
    set_a: &TileSet,
    set_b: &TileSet,
    coord: TileCoord,
    scaled_a: (u32, u32),
    scaled_b: (u32, u32),
    out_dir: &Path,
) -> Result<PathBuf> {
    let tile_a = open_scaled(set_a.get(coord.column, coord.row)?, scaled_a)?;
    let tile_b = open_scaled(set_b.get(coord.column, coord.row)?, scaled_b)?;

    let width = scaled_a.0 + scaled_b.0;
    let height = scaled_a.1.max(scaled_b.1);
    let mut composite = RgbImage::new(width, height);
    imageops::replace(&mut composite, &tile_a, 0, 0);
    imageops::replace(&mut composite, &tile_b, scaled_a.0 as i64, 0);

    let path = out_dir.join(format!("{}.jpg", coord));
    save_jpeg(&composite, &path)?;
    Ok(path)
}

fn open_scaled(path: &Path, target: (u32, u32)) -> Result<RgbImage> {
    let img = image::open(path)?.to_rgb8();
    if img.dimensions() == target {
        return Ok(img);
    }
    Ok(imageops::resize(&img, target.0, target.1, FilterType::Lanczos3))
}
