pub mod editor;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod math;
pub mod render;
pub mod viewport;
pub mod world;

pub use error::{Result, RoadnetError};
