//! Mosaic reconstruction: merge a complete tile set back into one raster,
//! mainly for visually inspecting a generated data set.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{imageops, RgbImage};

use crate::error::Result;
use crate::tileset::TileSet;

/// JPEG quality used for all produced artifacts. The `image` encoder does
/// not subsample chroma, which keeps the thin colored map features intact.
pub(crate) const JPEG_QUALITY: u8 = 95;

/// Writes `img` as a quality-95 JPEG.
pub(crate) fn save_jpeg(img: &RgbImage, path: &Path) -> Result<()> {
    let file = BufWriter::new(File::create(path)?);
    let encoder = JpegEncoder::new_with_quality(file, JPEG_QUALITY);
    img.write_with_encoder(encoder)?;
    Ok(())
}

/// Reassembles a rectangular-complete tile set into a single raster.
///
/// Tile (column, row) lands at pixel offset (column * width, row * height);
/// tiles are pasted at native resolution, so the canvas measures exactly
/// (column_count * width, row_count * height). A missing coordinate aborts
/// with that coordinate.
pub fn stitch(tiles: &TileSet) -> Result<RgbImage> {
    let (column_count, row_count) = tiles.dimensions();
    let (tile_width, tile_height) = tiles.tile_dimensions();

    let mut canvas = RgbImage::new(column_count * tile_width, row_count * tile_height);
    for row in 0..row_count {
        for column in 0..column_count {
            let path = tiles.get(column, row)?;
            let tile = image::open(path)?.to_rgb8();
            imageops::replace(
                &mut canvas,
                &tile,
                (column * tile_width) as i64,
                (row * tile_height) as i64,
            );
        }
    }
    Ok(canvas)
}

/// Stitches `tiles` and writes the mosaic to `path` as a JPEG.
pub fn stitch_to_file(tiles: &TileSet, path: &Path) -> Result<()> {
    let mosaic = stitch(tiles)?;
    save_jpeg(&mosaic, path)
}
