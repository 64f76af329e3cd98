pub mod envelope;
pub mod point;
pub mod polygon;
pub mod segment;

pub use envelope::Envelope;
pub use point::Point;
pub use polygon::Polygon;
pub use segment::{Projection, Segment};
