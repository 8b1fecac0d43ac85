mod cli;
mod combine;
mod error;
mod grid;
mod logger;
mod math;
mod projection;
mod stitch;
mod tileset;

use clap::Parser;

use cli::{Args, CombineArgs, Command, PlanArgs, StitchArgs};
use combine::CombineOptions;
use error::Result;
use grid::{TileEnumerator, TileGridPlanner};
use logger::Logger;
use projection::CoordinateProjector;
use tileset::TileSet;

fn main() {
    let args = Args::parse();
    Logger::init(args.verbosity(), args.no_color);

    let result = match &args.command {
        Command::Plan(plan_args) => run_plan(plan_args),
        Command::Stitch(stitch_args) => run_stitch(stitch_args),
        Command::Combine(combine_args) => run_combine(combine_args),
    };

    if let Err(e) = result {
        logger::error(&e.to_string());
        std::process::exit(1);
    }
}

/// Plans a grid over the given bounding box and prints the per-tile
/// geographic windows for downstream renderers and downloaders.
fn run_plan(args: &PlanArgs) -> Result<()> {
    let (bbox, tile_size_m, meters_per_pixel) = args.validate()?;

    let projector = CoordinateProjector::new()?;
    let planner = TileGridPlanner::new(&projector);
    let plan = planner.plan(&bbox, tile_size_m)?;

    logger::info(&format!(
        "Adjusted bbox: {},{},{},{}",
        plan.bbox.min_lon, plan.bbox.min_lat, plan.bbox.max_lon, plan.bbox.max_lat
    ));
    logger::info(&format!(
        "Grid: {} x {} tiles of {} m ({} total)",
        plan.tile_count_x,
        plan.tile_count_y,
        plan.tile_size_m,
        plan.tile_count()
    ));

    if let Some(mpp) = meters_per_pixel {
        let (width_px, height_px) = math::raster_dimensions(&plan.metric_bbox, mpp)?;
        let tile_px = math::tile_edge_pixels(tile_size_m, mpp)?;
        logger::info(&format!(
            "Raster: {} x {} px at {} m/px, {} px per tile edge",
            width_px, height_px, mpp, tile_px
        ));
    }

    if !args.summary_only {
        let enumerator = TileEnumerator::new(&projector);
        for item in enumerator.tiles(&plan) {
            let (coord, tile_bbox) = item?;
            println!(
                "{} {},{},{},{}",
                coord,
                tile_bbox.min_lon,
                tile_bbox.min_lat,
                tile_bbox.max_lon,
                tile_bbox.max_lat
            );
        }
    }

    Ok(())
}

/// Merges a complete tile directory into one mosaic image.
fn run_stitch(args: &StitchArgs) -> Result<()> {
    logger::debug(&format!("Loading tiles from {}", args.tile_dir.display()));
    let tiles = TileSet::from_dir(&args.tile_dir)?;
    let (columns, rows) = tiles.dimensions();
    let (tile_width, tile_height) = tiles.tile_dimensions();
    logger::info(&format!(
        "Stitching {} x {} tiles of {} x {} px",
        columns, rows, tile_width, tile_height
    ));

    stitch::stitch_to_file(&tiles, &args.output)?;
    logger::output(&args.output.display().to_string());
    Ok(())
}

/// Writes side-by-side composites for two tile directories.
fn run_combine(args: &CombineArgs) -> Result<()> {
    args.validate()?;

    let set_a = TileSet::from_dir(&args.dir_a)?;
    let set_b = TileSet::from_dir(&args.dir_b)?;
    let (columns, rows) = set_a.dimensions();
    logger::info(&format!(
        "Combining {} x {} grids from {} and {}",
        columns,
        rows,
        args.dir_a.display(),
        args.dir_b.display()
    ));

    let options = CombineOptions {
        jobs: args.jobs,
        aspect_tolerance: args.aspect_tolerance,
        show_progress: !logger::is_quiet(),
    };
    let written = combine::combine(&set_a, &set_b, &args.output_dir, &options)?;

    for path in &written {
        logger::output(&path.display().to_string());
    }
    logger::info(&format!("Wrote {} composites", written.len()));
    Ok(())
}
