//! CLI argument parsing and validation.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::error::{Result, TileError};
use crate::logger::VerbosityLevel;
use crate::projection::GeoBBox;

/// Command line arguments for tilepair.
#[derive(Parser, Debug)]
#[command(name = "tilepair")]
#[command(version, about = "Prepare paired geospatial tile imagery", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Timestamped detailed logs.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print produced file paths.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Plan a tile grid over a bounding box and list per-tile windows.
    Plan(PlanArgs),
    /// Merge a complete tile directory into one mosaic image.
    Stitch(StitchArgs),
    /// Write side-by-side paired composites from two tile directories.
    Combine(CombineArgs),
}

#[derive(clap::Args, Debug)]
pub struct PlanArgs {
    /// Bounding box: "minLon,minLat,maxLon,maxLat".
    #[arg(short, long)]
    pub bbox: String,

    /// Tile edge length in meters.
    #[arg(short, long)]
    pub tile_size: f64,

    /// Resolution in meters per pixel (adds pixel geometry to the output).
    #[arg(short, long)]
    pub meters_per_pixel: Option<f64>,

    /// Print only the plan summary, without the per-tile windows.
    #[arg(long)]
    pub summary_only: bool,
}

#[derive(clap::Args, Debug)]
pub struct StitchArgs {
    /// Directory of "{column}_{row}" tile images.
    pub tile_dir: PathBuf,

    /// Output mosaic file.
    #[arg(short, long)]
    pub output: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct CombineArgs {
    /// Directory of left-half ("input") tiles.
    pub dir_a: PathBuf,

    /// Directory of right-half ("target") tiles.
    pub dir_b: PathBuf,

    /// Output directory for the composites.
    #[arg(short, long)]
    pub output_dir: PathBuf,

    /// Worker thread count (default: one per CPU).
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Relative tolerance when comparing tile aspect ratios.
    #[arg(long, default_value_t = 1e-3)]
    pub aspect_tolerance: f64,
}

impl Args {
    /// Verbosity level implied by the global flags.
    pub fn verbosity(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}

impl PlanArgs {
    /// Validates the plan parameters.
    pub fn validate(&self) -> Result<(GeoBBox, f64, Option<f64>)> {
        let bbox = parse_bbox(&self.bbox)?;
        if self.tile_size <= 0.0 {
            return Err(TileError::InvalidConfiguration(format!(
                "tile size must be positive, got {} m",
                self.tile_size
            )));
        }
        if let Some(mpp) = self.meters_per_pixel {
            if mpp <= 0.0 {
                return Err(TileError::InvalidConfiguration(format!(
                    "meters per pixel must be positive, got {}",
                    mpp
                )));
            }
        }
        Ok((bbox, self.tile_size, self.meters_per_pixel))
    }
}

impl CombineArgs {
    /// Validates the combine parameters.
    pub fn validate(&self) -> Result<()> {
        if self.jobs == Some(0) {
            return Err(TileError::InvalidConfiguration(
                "--jobs must be at least 1".to_string(),
            ));
        }
        if self.aspect_tolerance < 0.0 {
            return Err(TileError::InvalidConfiguration(format!(
                "aspect tolerance must be non-negative, got {}",
                self.aspect_tolerance
            )));
        }
        Ok(())
    }
}

/// Parses "minLon,minLat,maxLon,maxLat" into a geographic bounding box.
pub fn parse_bbox(s: &str) -> Result<GeoBBox> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 4 {
        return Err(TileError::InvalidBoundingBox(format!(
            "expected 4 comma-separated values, got {}",
            parts.len()
        )));
    }

    let values: std::result::Result<Vec<f64>, _> = parts.iter().map(|p| p.trim().parse()).collect();
    let values =
        values.map_err(|_| TileError::InvalidBoundingBox("invalid number format".to_string()))?;

    let (min_lon, min_lat, max_lon, max_lat) = (values[0], values[1], values[2], values[3]);

    if min_lon >= max_lon {
        return Err(TileError::InvalidBoundingBox(format!(
            "min_lon ({}) must be less than max_lon ({})",
            min_lon, max_lon
        )));
    }
    if min_lat >= max_lat {
        return Err(TileError::InvalidBoundingBox(format!(
            "min_lat ({}) must be less than max_lat ({})",
            min_lat, max_lat
        )));
    }

    Ok(GeoBBox::new(min_lon, min_lat, max_lon, max_lat))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bbox_valid() {
        let bbox = parse_bbox("-74.1,40.65,-73.83,40.87").unwrap();
        assert!((bbox.min_lon - (-74.1)).abs() < 1e-10);
        assert!((bbox.min_lat - 40.65).abs() < 1e-10);
        assert!((bbox.max_lon - (-73.83)).abs() < 1e-10);
        assert!((bbox.max_lat - 40.87).abs() < 1e-10);
    }

    #[test]
    fn test_parse_bbox_with_spaces() {
        let bbox = parse_bbox(" -74.1 , 40.65 , -73.83 , 40.87 ").unwrap();
        assert!((bbox.min_lon - (-74.1)).abs() < 1e-10);
    }

    #[test]
    fn test_parse_bbox_invalid_count() {
        let err = parse_bbox("-74.1,40.65,-73.83").unwrap_err();
        assert!(err.to_string().contains("expected 4"));
    }

    #[test]
    fn test_parse_bbox_invalid_number() {
        let err = parse_bbox("-74.1,abc,-73.83,40.87").unwrap_err();
        assert!(err.to_string().contains("invalid number"));
    }

    #[test]
    fn test_parse_bbox_inverted() {
        let err = parse_bbox("-73.83,40.65,-74.1,40.87").unwrap_err();
        assert!(err.to_string().contains("min_lon"));

        let err = parse_bbox("-74.1,40.87,-73.83,40.65").unwrap_err();
        assert!(err.to_string().contains("min_lat"));

        let err = parse_bbox("-74.1,40.65,-74.1,40.87").unwrap_err();
        assert!(err.to_string().contains("min_lon"));
    }

    #[test]
    fn test_plan_args_validate() {
        let args = PlanArgs {
            bbox: "-74.1,40.65,-73.83,40.87".to_string(),
            tile_size: 500.0,
            meters_per_pixel: Some(0.5),
            summary_only: false,
        };
        let (bbox, tile_size, mpp) = args.validate().unwrap();
        assert!((bbox.max_lat - 40.87).abs() < 1e-10);
        assert!((tile_size - 500.0).abs() < 1e-10);
        assert_eq!(mpp, Some(0.5));
    }

    #[test]
    fn test_plan_args_rejects_bad_tile_size() {
        let args = PlanArgs {
            bbox: "-74.1,40.65,-73.83,40.87".to_string(),
            tile_size: -500.0,
            meters_per_pixel: None,
            summary_only: false,
        };
        let err = args.validate().unwrap_err();
        assert!(matches!(err, TileError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_plan_args_rejects_bad_resolution() {
        let args = PlanArgs {
            bbox: "-74.1,40.65,-73.83,40.87".to_string(),
            tile_size: 500.0,
            meters_per_pixel: Some(0.0),
            summary_only: false,
        };
        let err = args.validate().unwrap_err();
        assert!(matches!(err, TileError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_combine_args_rejects_zero_jobs() {
        let args = CombineArgs {
            dir_a: PathBuf::from("a"),
            dir_b: PathBuf::from("b"),
            output_dir: PathBuf::from("out"),
            jobs: Some(0),
            aspect_tolerance: 1e-3,
        };
        let err = args.validate().unwrap_err();
        assert!(matches!(err, TileError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_combine_args_rejects_negative_tolerance() {
        let args = CombineArgs {
            dir_a: PathBuf::from("a"),
            dir_b: PathBuf::from("b"),
            output_dir: PathBuf::from("out"),
            jobs: None,
            aspect_tolerance: -1.0,
        };
        let err = args.validate().unwrap_err();
        assert!(matches!(err, TileError::InvalidConfiguration(_)));
    }
}
