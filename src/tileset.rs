//! Sparse, read-only collections of tile images addressed by grid
//! coordinate.
//!
//! Tiles are regular raster files whose base name is `"{column}_{row}"`
//! (any decodable extension). A set is built once from a directory or an
//! explicit list of paths and validated eagerly: naming, grid shape and
//! per-tile pixel dimensions are all checked at construction so later
//! consumers can rely on them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Result, TileError};
use crate::grid::TileCoord;

/// An addressable set of tile image files covering (part of) a tile grid.
#[derive(Debug)]
pub struct TileSet {
    /// row -> column -> path, both levels ordered.
    rows: BTreeMap<u32, BTreeMap<u32, PathBuf>>,
    column_count: u32,
    row_count: u32,
    tile_width: u32,
    tile_height: u32,
}

impl TileSet {
    /// Builds a tile set from every regular file in `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() {
                paths.push(path);
            }
        }
        Self::from_paths(paths)
    }

    /// Builds a tile set from an explicit list of tile image paths.
    ///
    /// Every file name must parse as `"{column}_{row}"`; a non-conforming
    /// name is an error, not a skip. All tiles must share the pixel
    /// dimensions of the origin tile (0, 0).
    pub fn from_paths<I>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut rows: BTreeMap<u32, BTreeMap<u32, PathBuf>> = BTreeMap::new();
        for path in paths {
            let coord = parse_tile_name(&path)?;
            rows.entry(coord.row).or_default().insert(coord.column, path);
        }

        if rows.is_empty() {
            return Err(TileError::EmptyTileSet);
        }
        let first_row = rows.first_key_value().map(|(row, _)| *row);
        if first_row != Some(0) {
            return Err(TileError::MissingOriginTile);
        }

        let row_count = *rows.last_key_value().map(|(row, _)| row).unwrap_or(&0) + 1;
        let column_count = rows[&0].len() as u32;

        let origin = rows[&0]
            .get(&0)
            .ok_or(TileError::MissingOriginTile)?;
        let (tile_width, tile_height) = image::image_dimensions(origin)?;

        // Every tile must match the origin tile's pixel dimensions; a
        // silently differing tile would misalign the mosaic and composites.
        for (row, columns) in &rows {
            for (column, path) in columns {
                let (width, height) = image::image_dimensions(path)?;
                if (width, height) != (tile_width, tile_height) {
                    return Err(TileError::TileSizeMismatch {
                        column: *column,
                        row: *row,
                        expected_width: tile_width,
                        expected_height: tile_height,
                        actual_width: width,
                        actual_height: height,
                    });
                }
            }
        }

        Ok(Self {
            rows,
            column_count,
            row_count,
            tile_width,
            tile_height,
        })
    }

    /// Grid dimensions as (column count, row count). The row count comes
    /// from the highest row present, the column count from row 0.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.column_count, self.row_count)
    }

    /// Pixel dimensions shared by every tile in the set.
    pub fn tile_dimensions(&self) -> (u32, u32) {
        (self.tile_width, self.tile_height)
    }

    /// Path of the tile at the given coordinate.
    ///
    /// A sparse grid is legitimate at this layer, so a miss carries the
    /// coordinate and the caller decides whether it is an error.
    pub fn get(&self, column: u32, row: u32) -> Result<&Path> {
        self.rows
            .get(&row)
            .and_then(|columns| columns.get(&column))
            .map(PathBuf::as_path)
            .ok_or(TileError::MissingTile { column, row })
    }

    /// Returns true if the set has a tile at the given coordinate.
    pub fn contains(&self, column: u32, row: u32) -> bool {
        self.rows
            .get(&row)
            .is_some_and(|columns| columns.contains_key(&column))
    }

    /// Row-major iterator over present tiles, columns ascending within a
    /// row. Restartable; each call walks the same ordered mapping.
    pub fn tiles(&self) -> impl Iterator<Item = (TileCoord, &Path)> + '_ {
        self.rows.iter().flat_map(|(row, columns)| {
            columns
                .iter()
                .map(|(column, path)| (TileCoord::new(*column, *row), path.as_path()))
        })
    }
}

/// Parses a `"{column}_{row}"` file stem into a grid coordinate.
fn parse_tile_name(path: &Path) -> Result<TileCoord> {
    let malformed = || TileError::MalformedTileName(path.display().to_string());
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(malformed)?;
    let (column, row) = stem.split_once('_').ok_or_else(malformed)?;
    let column: u32 = column.parse().map_err(|_| malformed())?;
    let row: u32 = row.parse().map_err(|_| malformed())?;
    Ok(TileCoord::new(column, row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use tempfile::TempDir;

    /// Writes a `columns x rows` grid of solid-color PNG tiles and returns
    /// the directory.
    fn write_tile_grid(
        columns: u32,
        rows: u32,
        width: u32,
        height: u32,
    ) -> TempDir {
        let dir = TempDir::new().unwrap();
        for row in 0..rows {
            for column in 0..columns {
                let shade = (row * columns + column) as u8 * 10 + 10;
                let img = RgbImage::from_pixel(width, height, image::Rgb([shade, 0, 0]));
                img.save(dir.path().join(format!("{}_{}.png", column, row)))
                    .unwrap();
            }
        }
        dir
    }

    #[test]
    fn test_parse_tile_name() {
        let coord = parse_tile_name(Path::new("/tiles/3_12.jpg")).unwrap();
        assert_eq!(coord, TileCoord::new(3, 12));
    }

    #[test]
    fn test_parse_tile_name_rejects_garbage() {
        for name in ["cover.jpg", "3-12.jpg", "a_b.png", "3_12_0.png", "_3.png"] {
            let err = parse_tile_name(Path::new(name)).unwrap_err();
            assert!(matches!(err, TileError::MalformedTileName(_)), "{}", name);
        }
    }

    #[test]
    fn test_from_dir_dimensions() {
        let dir = write_tile_grid(3, 2, 8, 8);
        let tiles = TileSet::from_dir(dir.path()).unwrap();
        assert_eq!(tiles.dimensions(), (3, 2));
        assert_eq!(tiles.tile_dimensions(), (8, 8));
    }

    #[test]
    fn test_empty_set_rejected() {
        let dir = TempDir::new().unwrap();
        let err = TileSet::from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, TileError::EmptyTileSet));
    }

    #[test]
    fn test_missing_origin_rejected() {
        let dir = TempDir::new().unwrap();
        let img = RgbImage::from_pixel(4, 4, image::Rgb([1, 2, 3]));
        img.save(dir.path().join("1_1.png")).unwrap();
        let err = TileSet::from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, TileError::MissingOriginTile));
    }

    #[test]
    fn test_malformed_name_is_an_error_not_a_skip() {
        let dir = write_tile_grid(2, 1, 4, 4);
        let img = RgbImage::from_pixel(4, 4, image::Rgb([1, 2, 3]));
        img.save(dir.path().join("preview.png")).unwrap();
        let err = TileSet::from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, TileError::MalformedTileName(_)));
    }

    #[test]
    fn test_non_uniform_tile_dimensions_rejected() {
        // The lenient original only ever inspected tile (0, 0); here every
        // tile is checked at construction.
        let dir = write_tile_grid(2, 2, 8, 8);
        let odd = RgbImage::from_pixel(8, 9, image::Rgb([1, 2, 3]));
        odd.save(dir.path().join("1_1.png")).unwrap();
        let err = TileSet::from_dir(dir.path()).unwrap_err();
        match err {
            TileError::TileSizeMismatch {
                column,
                row,
                actual_height,
                ..
            } => {
                assert_eq!((column, row), (1, 1));
                assert_eq!(actual_height, 9);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_get_missing_tile() {
        let dir = write_tile_grid(2, 2, 4, 4);
        std::fs::remove_file(dir.path().join("1_1.png")).unwrap();
        let tiles = TileSet::from_dir(dir.path()).unwrap();

        assert!(tiles.get(0, 1).is_ok());
        let err = tiles.get(1, 1).unwrap_err();
        assert!(matches!(err, TileError::MissingTile { column: 1, row: 1 }));
        assert!(!tiles.contains(1, 1));
    }

    #[test]
    fn test_iteration_is_row_major() {
        let dir = write_tile_grid(3, 2, 4, 4);
        let tiles = TileSet::from_dir(dir.path()).unwrap();
        let coords: Vec<TileCoord> = tiles.tiles().map(|(coord, _)| coord).collect();
        let expected: Vec<TileCoord> = (0..2)
            .flat_map(|row| (0..3).map(move |column| TileCoord::new(column, row)))
            .collect();
        assert_eq!(coords, expected);

        // Restartable: a second pass yields the same sequence.
        let again: Vec<TileCoord> = tiles.tiles().map(|(coord, _)| coord).collect();
        assert_eq!(coords, again);
    }
}
