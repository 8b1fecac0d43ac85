use thiserror::Error;

#[derive(Error, Debug)]
pub enum TileError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid bounding box: {0}")]
    InvalidBoundingBox(String),

    #[error("Coordinate ({lon}, {lat}) is outside the projection domain")]
    ProjectionDomain { lon: f64, lat: f64 },

    #[error("Projection failed: {0}")]
    Projection(#[from] proj::ProjError),

    #[error("Failed to create projection: {0}")]
    ProjectionInit(#[from] proj::ProjCreateError),

    #[error("Tile name '{0}' does not match the '{{column}}_{{row}}' convention")]
    MalformedTileName(String),

    #[error("Tile set contains no tiles")]
    EmptyTileSet,

    #[error("Tile set has no origin tile (0, 0)")]
    MissingOriginTile,

    #[error("No tile at column {column}, row {row}")]
    MissingTile { column: u32, row: u32 },

    #[error(
        "Tile at column {column}, row {row} is {actual_width}x{actual_height} px, \
         expected {expected_width}x{expected_height} px"
    )]
    TileSizeMismatch {
        column: u32,
        row: u32,
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("Tile grids do not match: {a_columns}x{a_rows} vs {b_columns}x{b_rows}")]
    GridMismatch {
        a_columns: u32,
        a_rows: u32,
        b_columns: u32,
        b_rows: u32,
    },

    #[error("Tile aspect ratios do not match: {a} vs {b}")]
    AspectRatioMismatch { a: f64, b: f64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, TileError>;
