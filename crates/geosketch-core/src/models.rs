pub mod geometry;
pub mod vertex;

pub use geometry::{Crs, Geometry, GeometryType};
pub use vertex::{CoordinateDims, Vertex};
