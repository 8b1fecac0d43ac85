//! Pixel-grid arithmetic: metric extents to pixel dimensions.

use crate::error::{Result, TileError};
use crate::projection::MetricBBox;

fn check_meters_per_pixel(meters_per_pixel: f64) -> Result<()> {
    if !meters_per_pixel.is_finite() || meters_per_pixel <= 0.0 {
        return Err(TileError::InvalidConfiguration(format!(
            "meters per pixel must be positive, got {}",
            meters_per_pixel
        )));
    }
    Ok(())
}

/// Convert a metric extent to a pixel count, rounding up so the raster
/// always covers the full extent.
pub fn meters_to_pixels(extent_m: f64, meters_per_pixel: f64) -> Result<u32> {
    check_meters_per_pixel(meters_per_pixel)?;
    if !extent_m.is_finite() || extent_m <= 0.0 {
        return Err(TileError::InvalidConfiguration(format!(
            "extent must be positive, got {} m",
            extent_m
        )));
    }
    Ok((extent_m / meters_per_pixel).ceil() as u32)
}

/// Pixel edge length of a square tile of `tile_size_m` meters.
pub fn tile_edge_pixels(tile_size_m: f64, meters_per_pixel: f64) -> Result<u32> {
    meters_to_pixels(tile_size_m, meters_per_pixel)
}

/// Pixel dimensions (width, height) of a raster covering `bbox`.
pub fn raster_dimensions(bbox: &MetricBBox, meters_per_pixel: f64) -> Result<(u32, u32)> {
    let width = meters_to_pixels(bbox.width(), meters_per_pixel)?;
    let height = meters_to_pixels(bbox.height(), meters_per_pixel)?;
    Ok((width, height))
}
