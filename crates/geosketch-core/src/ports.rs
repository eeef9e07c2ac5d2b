pub mod layer;
pub mod transform;

pub use layer::VectorLayer;
pub use transform::{CoordinateTransform, IdentityTransform, IdentityTransforms, TransformProvider};
