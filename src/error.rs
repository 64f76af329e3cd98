use thiserror::Error;

/// Top-level error type for the road-network crate.
#[derive(Debug, Error)]
pub enum RoadnetError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("zero-length segment at ({x}, {y})")]
    DegenerateSegment { x: f64, y: f64 },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("parameter {parameter} = {value} is invalid")]
    InvalidParameter { parameter: &'static str, value: f64 },
}

/// Errors raised by graph lookups and graph reconstruction.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("point not found in graph")]
    PointNotFound,

    #[error("segment not found in graph")]
    SegmentNotFound,

    #[error("segment references unknown point ({x}, {y})")]
    UnresolvedPoint { x: f64, y: f64 },
}

/// Errors related to saving and loading graphs.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("malformed graph json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while handing geometry to a renderer.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid draw style: {0}")]
    InvalidStyle(String),

    #[error("triangulation failed: {0}")]
    Triangulation(String),
}

/// Convenience type alias for results using [`RoadnetError`].
pub type Result<T> = std::result::Result<T, RoadnetError>;
